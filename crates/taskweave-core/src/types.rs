use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Time
// =============================================================================

/// Seconds since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Task priority. Rank 0 (urgent) sorts before rank 3 (normal) on read paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    #[default]
    Normal,
}

impl Priority {
    /// Sort rank: urgent(0) < high(1) < medium(2) < normal(3).
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Normal => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Urgent => write!(f, "urgent"),
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Normal => write!(f, "normal"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "normal" => Ok(Priority::Normal),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Qualitative conflict severity. Used for display ordering only, never for
/// automated gating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Worker status reported by an agent runtime.
///
/// `Error` means the most recent work item failed; the worker itself keeps
/// running and returns to `Processing` on the next item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Idle,
    Processing,
    Error,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Idle => write!(f, "idle"),
            AgentStatus::Processing => write!(f, "processing"),
            AgentStatus::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Domain Structs
// =============================================================================

/// The unit of routed work: a capability key plus a capability-specific
/// payload. The routing layer never inspects the payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkItem {
    pub capability: String,
    pub payload: serde_json::Value,
}

impl WorkItem {
    pub fn new(capability: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            capability: capability.into(),
            payload,
        }
    }
}

/// A candidate task extracted from text, pre-confirmation.
///
/// Confidence is the extractor's own certainty in [0, 1], not a calibrated
/// probability.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionItem {
    pub text: String,
    pub assignee: Option<String>,
    pub deadline: Option<String>,
    pub priority: Option<Priority>,
    pub confidence: f64,
}

impl ActionItem {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            assignee: None,
            deadline: None,
            priority: None,
            confidence,
        }
    }
}

/// An authoritative task. Created only by task synthesis from an approved
/// confirmation item or a directly supplied action list: never speculatively.
///
/// An empty `assignee`/`deadline` (or the literal "unassigned") means the
/// field is missing; the conflict detector reports these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            assignee: String::new(),
            deadline: String::new(),
            priority: Priority::Normal,
        }
    }

    pub fn has_assignee(&self) -> bool {
        !self.assignee.is_empty() && !self.assignee.eq_ignore_ascii_case("unassigned")
    }

    pub fn has_deadline(&self) -> bool {
        !self.deadline.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Timestamp ----

    #[test]
    fn test_timestamp_round_trip() {
        let ts = Timestamp(1700000000);
        let dt = ts.to_datetime();
        assert_eq!(Timestamp::from_datetime(dt), ts);
    }

    #[test]
    fn test_timestamp_now_is_recent() {
        let ts = Timestamp::now();
        assert!(ts.0 > 1700000000);
    }

    // ---- Priority ----

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::Urgent.rank() < Priority::High.rank());
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Normal.rank());
    }

    #[test]
    fn test_priority_display_from_str_round_trip() {
        for p in [
            Priority::Urgent,
            Priority::High,
            Priority::Medium,
            Priority::Normal,
        ] {
            let parsed: Priority = p.to_string().parse().unwrap();
            assert_eq!(p, parsed);
        }
        assert!("bogus".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"urgent\"");
        assert_eq!(serde_json::to_string(&Priority::Normal).unwrap(), "\"normal\"");
    }

    #[test]
    fn test_priority_default_is_normal() {
        assert_eq!(Priority::default(), Priority::Normal);
    }

    // ---- Severity / AgentStatus ----

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Low.to_string(), "low");
        assert_eq!(Severity::Medium.to_string(), "medium");
        assert_eq!(Severity::High.to_string(), "high");
    }

    #[test]
    fn test_agent_status_serde() {
        for status in [AgentStatus::Idle, AgentStatus::Processing, AgentStatus::Error] {
            let json = serde_json::to_string(&status).unwrap();
            let rt: AgentStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, rt);
        }
        assert_eq!(
            serde_json::to_string(&AgentStatus::Processing).unwrap(),
            "\"processing\""
        );
    }

    // ---- WorkItem ----

    #[test]
    fn test_work_item_serde_round_trip() {
        let item = WorkItem::new("extract_actions", serde_json::json!({"text": "hello"}));
        let json = serde_json::to_string(&item).unwrap();
        let rt: WorkItem = serde_json::from_str(&json).unwrap();
        assert_eq!(rt.capability, "extract_actions");
        assert_eq!(rt.payload["text"], "hello");
    }

    // ---- ActionItem / Task ----

    #[test]
    fn test_action_item_defaults() {
        let item = ActionItem::new("Review the proposal", 0.85);
        assert!(item.assignee.is_none());
        assert!(item.deadline.is_none());
        assert!(item.priority.is_none());
        assert!((item.confidence - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_task_missing_fields() {
        let mut task = Task::new("Check logs");
        assert!(!task.has_assignee());
        assert!(!task.has_deadline());

        task.assignee = "unassigned".to_string();
        assert!(!task.has_assignee());

        task.assignee = "Unassigned".to_string();
        assert!(!task.has_assignee());

        task.assignee = "john".to_string();
        task.deadline = "2024-12-22".to_string();
        assert!(task.has_assignee());
        assert!(task.has_deadline());
    }

    #[test]
    fn test_task_serde_defaults_for_missing_fields() {
        let task: Task = serde_json::from_str(r#"{"text":"Just text"}"#).unwrap();
        assert_eq!(task.text, "Just text");
        assert!(task.assignee.is_empty());
        assert!(task.deadline.is_empty());
        assert_eq!(task.priority, Priority::Normal);
    }
}
