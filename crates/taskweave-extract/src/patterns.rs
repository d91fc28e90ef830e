//! Regex-based action item and decision extraction.
//!
//! Patterns are compiled once into a [`PatternSet`] and reused for every
//! document. Three action-item patterns are tried per line, most specific
//! first; each carries the base confidence recorded on the extracted item.

use regex::Regex;
use serde::{Deserialize, Serialize};

use taskweave_core::ActionItem;

/// Action verbs that qualify a bullet line as an action item.
const ACTION_VERB_HINTS: &[&str] = &[
    "complete", "review", "prepare", "schedule", "send", "update", "create", "implement",
];

/// Keywords that mark a line as recording a decision.
const DECISION_KEYWORDS: &[&str] = &[
    "decided", "agreed", "approved", "concluded", "resolved", "decision",
];

/// Fixed vocabulary mined for document tags.
const TAG_VOCABULARY: &[&str] = &[
    "project", "research", "deadline", "meeting", "review", "budget", "proposal", "design",
    "development", "testing",
];

const MAX_ACTION_ITEMS: usize = 10;
const MAX_DECISIONS: usize = 5;
const MAX_NOTES: usize = 5;
const MAX_TAGS: usize = 5;

/// Lines shorter than this are noise; longer ones are prose, not items.
const MIN_LINE_LEN: usize = 10;
const MAX_ACTION_LINE_LEN: usize = 200;
const MAX_DECISION_LINE_LEN: usize = 150;

/// A decision recorded in the analyzed text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Decision {
    pub text: String,
    pub confidence: f64,
}

/// Compiled extraction patterns.
pub struct PatternSet {
    /// "Alice needs to/will/should/must <task> [by <deadline>]"
    assignee_action: Regex,
    /// "Action:/TODO:/Task: <task>"
    marker_action: Regex,
    /// "- <task>" bullet lines (qualified by an action verb).
    bullet_action: Regex,
    /// First capitalized word, used as the fallback assignee guess.
    capitalized_name: Regex,
    /// Lines reporting what someone mentioned/suggested/noted/said.
    note_line: Regex,
}

impl PatternSet {
    pub fn new() -> Self {
        Self {
            assignee_action: Regex::new(
                r"([A-Z][a-z]+)\s+(?i:needs to|will|should|must)\s+(.+?)(?:\s+by\s+([\w\s]+))?(?:\.|$)",
            )
            .expect("invalid assignee-action regex"),
            marker_action: Regex::new(r"(?i)(?:Action|TODO|Task):\s*(.+?)(?:\.|$)")
                .expect("invalid marker-action regex"),
            bullet_action: Regex::new(r"^\s*[-•*]\s*(.+?)(?:\.|$)")
                .expect("invalid bullet-action regex"),
            capitalized_name: Regex::new(r"([A-Z][a-z]+)\s")
                .expect("invalid capitalized-name regex"),
            note_line: Regex::new(r"(?i)\b(?:mentioned|suggested|noted|said)\b")
                .expect("invalid note-line regex"),
        }
    }

    /// Extract candidate action items from text, capped at 10.
    ///
    /// Confidence reflects pattern specificity: explicit assignee sentences
    /// score 0.85, marker lines 0.8, qualified bullets 0.75.
    pub fn extract_action_items(&self, text: &str) -> Vec<ActionItem> {
        let mut items = Vec::new();

        for line in text.lines() {
            if items.len() >= MAX_ACTION_ITEMS {
                break;
            }
            let line = line.trim();
            if line.len() < MIN_LINE_LEN || line.len() > MAX_ACTION_LINE_LEN {
                continue;
            }

            if let Some(caps) = self.assignee_action.captures(line) {
                let mut item = ActionItem::new(caps[2].trim(), 0.85);
                item.assignee = Some(caps[1].trim().to_string());
                item.deadline = caps.get(3).map(|m| m.as_str().trim().to_string());
                items.push(item);
                continue;
            }

            if let Some(caps) = self.marker_action.captures(line) {
                let task = caps[1].trim().to_string();
                let mut item = ActionItem::new(task.clone(), 0.8);
                item.assignee = self.guess_assignee(&task);
                items.push(item);
                continue;
            }

            if let Some(caps) = self.bullet_action.captures(line) {
                let lower = line.to_lowercase();
                if ACTION_VERB_HINTS.iter().any(|verb| lower.contains(verb)) {
                    let task = caps[1].trim().to_string();
                    let mut item = ActionItem::new(task.clone(), 0.75);
                    item.assignee = self.guess_assignee(&task);
                    items.push(item);
                }
            }
        }

        items
    }

    /// Extract decisions: lines containing a decision keyword, with the text
    /// after the keyword recorded. Capped at 5.
    pub fn extract_decisions(&self, text: &str) -> Vec<Decision> {
        let mut decisions = Vec::new();

        for line in text.lines() {
            if decisions.len() >= MAX_DECISIONS {
                break;
            }
            let line = line.trim();
            if line.len() < MIN_LINE_LEN || line.len() > MAX_DECISION_LINE_LEN {
                continue;
            }

            let lower = line.to_lowercase();
            for keyword in DECISION_KEYWORDS {
                if let Some(pos) = lower.find(keyword) {
                    // Offsets into the lowered string can drift on non-ASCII
                    // input; fall back to skipping the line rather than slice
                    // mid-character.
                    let Some(after) = line.get(pos + keyword.len()..) else {
                        break;
                    };
                    let decision_text = after.trim_matches([' ', ':', '-']).trim();
                    if !decision_text.is_empty() {
                        decisions.push(Decision {
                            text: decision_text.to_string(),
                            confidence: 0.8,
                        });
                    }
                    break;
                }
            }
        }

        decisions
    }

    /// Extract notable mentions (lines reporting what someone said), capped at 5.
    pub fn extract_notes(&self, text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && self.note_line.is_match(line))
            .take(MAX_NOTES)
            .map(str::to_string)
            .collect()
    }

    /// Mine tags from a fixed vocabulary, capped at 5.
    pub fn extract_tags(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        TAG_VOCABULARY
            .iter()
            .filter(|keyword| lower.contains(**keyword))
            .take(MAX_TAGS)
            .map(|keyword| keyword.to_string())
            .collect()
    }

    fn guess_assignee(&self, task: &str) -> Option<String> {
        self.capitalized_name
            .captures(task)
            .map(|caps| caps[1].to_string())
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> PatternSet {
        PatternSet::new()
    }

    // ---- action items ----

    #[test]
    fn test_assignee_sentence_with_deadline() {
        let items = patterns().extract_action_items("John needs to complete the report by Friday.");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "complete the report");
        assert_eq!(items[0].assignee.as_deref(), Some("John"));
        assert_eq!(items[0].deadline.as_deref(), Some("Friday"));
        assert!((items[0].confidence - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_assignee_sentence_without_deadline() {
        let items = patterns().extract_action_items("Sarah will prepare the slides.");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].assignee.as_deref(), Some("Sarah"));
        assert!(items[0].deadline.is_none());
    }

    #[test]
    fn test_marker_line() {
        let items = patterns().extract_action_items("TODO: update the project roadmap.");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "update the project roadmap");
        assert!((items[0].confidence - 0.8).abs() < f64::EPSILON);
        assert!(items[0].assignee.is_none());
    }

    #[test]
    fn test_marker_line_with_name_guesses_assignee() {
        let items = patterns().extract_action_items("Action: Bob reviews the security audit.");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].assignee.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_bullet_line_requires_action_verb() {
        let set = patterns();

        let items = set.extract_action_items("- Review the budget proposal for Q3");
        assert_eq!(items.len(), 1);
        assert!((items[0].confidence - 0.75).abs() < f64::EPSILON);

        let items = set.extract_action_items("- Just a descriptive bullet about nothing");
        assert!(items.is_empty());
    }

    #[test]
    fn test_short_and_long_lines_skipped() {
        let set = patterns();
        assert!(set.extract_action_items("TODO: x").is_empty());

        let long = format!("TODO: {}", "x".repeat(250));
        assert!(set.extract_action_items(&long).is_empty());
    }

    #[test]
    fn test_items_capped_at_ten() {
        let text: String = (0..20)
            .map(|i| format!("TODO: update module number {}\n", i))
            .collect();
        let items = patterns().extract_action_items(&text);
        assert_eq!(items.len(), 10);
    }

    // ---- decisions ----

    #[test]
    fn test_decision_extraction() {
        let decisions =
            patterns().extract_decisions("The team decided: ship the beta next week");
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].text, "ship the beta next week");
        assert!((decisions[0].confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decision_keyword_variants() {
        let text = "We agreed to move the deadline\nIt was resolved that QA owns the signoff\n";
        let decisions = patterns().extract_decisions(text);
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].text, "to move the deadline");
    }

    #[test]
    fn test_decisions_capped_at_five() {
        let text: String = (0..8)
            .map(|i| format!("We decided option number {} is fine\n", i))
            .collect();
        assert_eq!(patterns().extract_decisions(&text).len(), 5);
    }

    // ---- notes and tags ----

    #[test]
    fn test_note_extraction() {
        let notes = patterns()
            .extract_notes("Alice mentioned the rollout risk\nUnrelated line here\nBob said the vendor is late");
        assert_eq!(notes.len(), 2);
        assert!(notes[0].contains("mentioned"));
    }

    #[test]
    fn test_tag_extraction_is_deterministic() {
        let tags = patterns().extract_tags("The project budget review happens after testing.");
        assert_eq!(tags, vec!["project", "review", "budget", "testing"]);
    }

    #[test]
    fn test_tags_capped_at_five() {
        let text = "project research deadline meeting review budget proposal design";
        assert_eq!(patterns().extract_tags(text).len(), 5);
    }
}
