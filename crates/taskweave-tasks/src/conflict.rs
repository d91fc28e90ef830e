//! Conflict detection over a task-list snapshot.
//!
//! [`detect`] is a pure function: three independent passes whose outputs are
//! concatenated (duplicates, then deadline collisions, then missing fields).
//! Reports index into the snapshot they were computed from and go stale if
//! the list mutates afterwards. A model-backed detector may append further
//! conflicts of the same shape; its absence never changes these passes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use taskweave_core::{Severity, Task};
use taskweave_extract::dates::parse_fuzzy;

use crate::similarity::jaccard;

/// Similarity strictly above this marks a task pair as duplicates.
const DUPLICATE_THRESHOLD: f64 = 0.8;

/// The kind of problem a conflict reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    Duplicate,
    DeadlineConflict,
    MissingInfo,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::Duplicate => write!(f, "duplicate"),
            ConflictKind::DeadlineConflict => write!(f, "deadline_conflict"),
            ConflictKind::MissingInfo => write!(f, "missing_info"),
        }
    }
}

/// A detected conflict. Derived, never authoritative state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub description: String,
    /// Indices into the snapshot `detect` ran over.
    pub affected_task_indices: Vec<usize>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
}

/// Run all three passes over a task snapshot.
pub fn detect(tasks: &[Task]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    conflicts.extend(detect_duplicates(tasks));
    conflicts.extend(detect_deadline_conflicts(tasks));
    conflicts.extend(detect_missing_info(tasks));
    conflicts
}

/// Pairwise duplicate scan: every unordered pair with Jaccard similarity
/// strictly above 0.8, severity Medium.
fn detect_duplicates(tasks: &[Task]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for i in 0..tasks.len() {
        for j in (i + 1)..tasks.len() {
            if jaccard(&tasks[i].text, &tasks[j].text) > DUPLICATE_THRESHOLD {
                conflicts.push(Conflict {
                    kind: ConflictKind::Duplicate,
                    description: "Possible duplicate tasks detected".to_string(),
                    affected_task_indices: vec![i, j],
                    severity: Severity::Medium,
                    assignee: None,
                    date: None,
                    missing_fields: Vec::new(),
                });
            }
        }
    }

    conflicts
}

/// Same-day collision scan per assignee, severity High.
///
/// Tasks without a usable assignee or deadline are skipped, as are deadlines
/// the fuzzy parser cannot read: an unparsable deadline is not an error.
fn detect_deadline_conflicts(tasks: &[Task]) -> Vec<Conflict> {
    let mut by_assignee: BTreeMap<String, Vec<(usize, NaiveDate)>> = BTreeMap::new();

    for (index, task) in tasks.iter().enumerate() {
        if !task.has_assignee() || !task.has_deadline() {
            continue;
        }
        let Some(date) = parse_fuzzy(&task.deadline) else {
            continue;
        };
        by_assignee
            .entry(task.assignee.to_lowercase())
            .or_default()
            .push((index, date));
    }

    let mut conflicts = Vec::new();
    for (assignee, mut deadlines) in by_assignee {
        deadlines.sort_by_key(|(_, date)| *date);
        for pair in deadlines.windows(2) {
            let (first_idx, first_date) = pair[0];
            let (second_idx, second_date) = pair[1];
            if first_date == second_date {
                conflicts.push(Conflict {
                    kind: ConflictKind::DeadlineConflict,
                    description: format!("{} has multiple tasks due on the same day", assignee),
                    affected_task_indices: vec![first_idx, second_idx],
                    severity: Severity::High,
                    assignee: Some(assignee.clone()),
                    date: Some(first_date),
                    missing_fields: Vec::new(),
                });
            }
        }
    }

    conflicts
}

/// Missing-field scan: one severity Low conflict per task lacking an
/// assignee and/or a deadline.
fn detect_missing_info(tasks: &[Task]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (index, task) in tasks.iter().enumerate() {
        let mut missing = Vec::new();
        if !task.has_assignee() {
            missing.push("assignee".to_string());
        }
        if !task.has_deadline() {
            missing.push("deadline".to_string());
        }

        if !missing.is_empty() {
            conflicts.push(Conflict {
                kind: ConflictKind::MissingInfo,
                description: format!("Task missing: {}", missing.join(", ")),
                affected_task_indices: vec![index],
                severity: Severity::Low,
                assignee: None,
                date: None,
                missing_fields: missing,
            });
        }
    }

    conflicts
}
