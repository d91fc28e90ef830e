//! The authoritative task list.
//!
//! Tasks enter only through [`TaskBoard::synthesize`]: from approved
//! confirmation items or a directly supplied action list: never
//! speculatively. The board is shared across agent threads; one mutex guards
//! every read-modify-write.

use std::sync::Mutex;

use tracing::debug;

use taskweave_core::{ActionItem, Priority, Task};

use crate::similarity::jaccard;

/// Keywords promoting a task straight to urgent.
const URGENT_KEYWORDS: &[&str] = &["urgent", "asap", "immediately", "critical"];
/// Keywords promoting a task to high priority.
const HIGH_KEYWORDS: &[&str] = &["important", "priority", "soon"];

/// Outcome of one synthesis call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthesisOutcome {
    /// Items appended to the authoritative list.
    pub added: usize,
    /// Items discarded as near-duplicates of existing tasks.
    pub duplicates: usize,
    /// Authoritative list size after the call.
    pub total: usize,
}

/// Deduplicating, priority-inferring task list.
pub struct TaskBoard {
    tasks: Mutex<Vec<Task>>,
    duplicate_threshold: f64,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::with_threshold(0.8)
    }

    /// Board with a custom duplicate threshold (comparison stays strict:
    /// similarity must exceed the threshold, equality is not a duplicate).
    pub fn with_threshold(duplicate_threshold: f64) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            duplicate_threshold,
        }
    }

    /// Fold action items into the authoritative list.
    ///
    /// Each item is compared against every existing task; Jaccard similarity
    /// strictly above the threshold discards it as a duplicate. Survivors get
    /// a priority (the item's own if supplied, otherwise inferred from
    /// keywords and deadline) and are appended in arrival order.
    pub fn synthesize(&self, items: &[ActionItem]) -> SynthesisOutcome {
        let mut tasks = self.tasks.lock().unwrap();
        let mut added = 0;
        let mut duplicates = 0;

        for item in items {
            let is_duplicate = tasks
                .iter()
                .any(|task| jaccard(&task.text, &item.text) > self.duplicate_threshold);
            if is_duplicate {
                debug!(text = %item.text, "duplicate action item discarded");
                duplicates += 1;
                continue;
            }

            let deadline = item.deadline.clone().unwrap_or_default();
            let priority = item
                .priority
                .unwrap_or_else(|| infer_priority(&item.text, &deadline));
            tasks.push(Task {
                text: item.text.clone(),
                assignee: item.assignee.clone().unwrap_or_default(),
                deadline,
                priority,
            });
            added += 1;
        }

        SynthesisOutcome {
            added,
            duplicates,
            total: tasks.len(),
        }
    }

    /// Snapshot sorted by priority rank (urgent first), stable among equal
    /// priorities.
    pub fn all_tasks(&self) -> Vec<Task> {
        let mut tasks = self.tasks.lock().unwrap().clone();
        tasks.sort_by_key(|task| task.priority.rank());
        tasks
    }

    /// Snapshot in insertion order. Conflict reports index into this.
    pub fn raw_tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-precedence priority inference: urgent keyword, then high-priority
/// keyword, then deadline present, then normal.
fn infer_priority(text: &str, deadline: &str) -> Priority {
    let lower = text.to_lowercase();
    if URGENT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Priority::Urgent
    } else if HIGH_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Priority::High
    } else if !deadline.is_empty() {
        Priority::Medium
    } else {
        Priority::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str) -> ActionItem {
        ActionItem::new(text, 0.85)
    }

    // ---- priority inference ----

    #[test]
    fn test_urgent_keyword_wins() {
        let board = TaskBoard::new();
        board.synthesize(&[item("Urgent: fix the login bug")]);
        assert_eq!(board.all_tasks()[0].priority, Priority::Urgent);
    }

    #[test]
    fn test_high_keyword() {
        let board = TaskBoard::new();
        board.synthesize(&[item("This is an important refactor")]);
        assert_eq!(board.all_tasks()[0].priority, Priority::High);
    }

    #[test]
    fn test_deadline_implies_medium() {
        let board = TaskBoard::new();
        let mut with_deadline = item("Review the proposal");
        with_deadline.deadline = Some("2024-12-22".to_string());
        board.synthesize(&[with_deadline]);
        assert_eq!(board.all_tasks()[0].priority, Priority::Medium);
    }

    #[test]
    fn test_default_is_normal() {
        let board = TaskBoard::new();
        board.synthesize(&[item("Check logs")]);
        assert_eq!(board.all_tasks()[0].priority, Priority::Normal);
    }

    #[test]
    fn test_urgent_beats_deadline() {
        let board = TaskBoard::new();
        let mut both = item("Deploy the hotfix asap");
        both.deadline = Some("2024-12-22".to_string());
        board.synthesize(&[both]);
        assert_eq!(board.all_tasks()[0].priority, Priority::Urgent);
    }

    #[test]
    fn test_explicit_priority_is_honored() {
        let board = TaskBoard::new();
        let mut edited = item("Check logs");
        edited.priority = Some(Priority::High);
        board.synthesize(&[edited]);
        assert_eq!(board.all_tasks()[0].priority, Priority::High);
    }

    // ---- dedup ----

    #[test]
    fn test_near_duplicate_discarded() {
        let board = TaskBoard::new();
        // {complete,the,quarterly,report,by,friday} vs the same plus
        // "evening": 6/7 ≈ 0.857 > 0.8.
        let outcome = board.synthesize(&[
            item("Complete the quarterly report by Friday"),
            item("Complete the quarterly report by Friday evening"),
        ]);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_similarity_exactly_at_threshold_is_kept() {
        // 4/5 = 0.8 exactly; the comparison is strictly greater-than, so
        // both tasks survive.
        let board = TaskBoard::new();
        let outcome = board.synthesize(&[
            item("Complete the report by Friday"),
            item("Complete report by Friday"),
        ]);
        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.duplicates, 0);
    }

    #[test]
    fn test_dedup_across_calls() {
        let board = TaskBoard::new();
        board.synthesize(&[item("Send the invoice to the vendor today")]);
        let outcome = board.synthesize(&[item("Send the invoice to the vendor today please")]);
        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_distinct_items_all_kept() {
        let board = TaskBoard::new();
        let outcome = board.synthesize(&[
            item("Write the release notes"),
            item("Book the conference room"),
            item("Rotate the API keys"),
        ]);
        assert_eq!(outcome.added, 3);
        assert_eq!(outcome.total, 3);
    }

    // ---- read paths ----

    #[test]
    fn test_all_tasks_sorted_by_priority_stable() {
        let board = TaskBoard::new();
        let mut medium = item("Review the proposal");
        medium.deadline = Some("2025-01-10".to_string());
        board.synthesize(&[
            item("Check logs"),
            item("Urgent: patch the auth bypass"),
            medium,
            item("Critical outage follow-up"),
        ]);

        let sorted = board.all_tasks();
        assert_eq!(sorted[0].text, "Urgent: patch the auth bypass");
        assert_eq!(sorted[1].text, "Critical outage follow-up");
        assert_eq!(sorted[2].text, "Review the proposal");
        assert_eq!(sorted[3].text, "Check logs");
    }

    #[test]
    fn test_raw_tasks_preserve_arrival_order() {
        let board = TaskBoard::new();
        board.synthesize(&[item("Urgent: first"), item("second one here")]);
        let raw = board.raw_tasks();
        assert_eq!(raw[0].text, "Urgent: first");
        assert_eq!(raw[1].text, "second one here");
    }

    #[test]
    fn test_assignee_carried_from_item() {
        let board = TaskBoard::new();
        let mut assigned = item("Prepare the slides for Monday");
        assigned.assignee = Some("Sarah".to_string());
        board.synthesize(&[assigned]);
        assert_eq!(board.all_tasks()[0].assignee, "Sarah");
    }
}
