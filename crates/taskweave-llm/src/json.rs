//! JSON salvage from model output.
//!
//! Models asked for "only JSON" still wrap it in prose or code fences often
//! enough that strict parsing alone loses usable answers. Parsing is
//! attempted strictly first, then on a fenced block, then on the widest
//! bracketed span.

use regex::Regex;
use std::sync::OnceLock;

fn fenced_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("invalid fenced block regex")
    })
}

fn bracketed_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)[\[{].*[\]}]").expect("invalid bracketed span regex"))
}

/// Extract and deserialize the first JSON value found in model output.
pub fn extract_json<T: serde::de::DeserializeOwned>(response: &str) -> Option<T> {
    let trimmed = response.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    if let Some(caps) = fenced_block().captures(trimmed) {
        if let Ok(value) = serde_json::from_str(caps[1].trim()) {
            return Some(value);
        }
    }

    if let Some(m) = bracketed_span().find(trimmed) {
        if let Ok(value) = serde_json::from_str(m.as_str()) {
            return Some(value);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Item {
        task: String,
    }

    #[test]
    fn test_bare_json() {
        let items: Vec<Item> = extract_json(r#"[{"task": "review"}]"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].task, "review");
    }

    #[test]
    fn test_fenced_json() {
        let response = "Here you go:\n```json\n[{\"task\": \"review\"}]\n```\nAnything else?";
        let items: Vec<Item> = extract_json(response).unwrap();
        assert_eq!(items[0].task, "review");
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let response = "The tasks are: [{\"task\": \"review\"}] as requested.";
        let items: Vec<Item> = extract_json(response).unwrap();
        assert_eq!(items[0].task, "review");
    }

    #[test]
    fn test_object_extraction() {
        let response = "Summary below.\n{\"task\": \"ship it\"}";
        let item: Item = extract_json(response).unwrap();
        assert_eq!(item.task, "ship it");
    }

    #[test]
    fn test_plain_text_yields_none() {
        assert!(extract_json::<Vec<Item>>("no structured data here").is_none());
        assert!(extract_json::<Vec<Item>>("").is_none());
    }

    #[test]
    fn test_malformed_json_yields_none() {
        assert!(extract_json::<Vec<Item>>("[{\"task\": ]").is_none());
    }
}
