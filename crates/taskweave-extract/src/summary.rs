//! Extractive summarization.

/// Summarize text as its first three non-empty lines.
///
/// Short texts (three lines or fewer) are returned unchanged; longer ones
/// get a trailing ellipsis. This is deliberately cheap: the model-backed
/// summarizer produces better output when it is reachable.
pub fn summarize(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() <= 3 {
        return text.trim().to_string();
    }

    format!("{}...", lines[..3].join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        let text = "One line only";
        assert_eq!(summarize(text), "One line only");
    }

    #[test]
    fn test_three_lines_unchanged() {
        let text = "a\nb\nc";
        assert_eq!(summarize(text), "a\nb\nc");
    }

    #[test]
    fn test_long_text_truncated_with_ellipsis() {
        let text = "first\nsecond\nthird\nfourth\nfifth";
        assert_eq!(summarize(text), "first second third...");
    }

    #[test]
    fn test_blank_lines_ignored() {
        let text = "first\n\n\nsecond\n\nthird\nfourth";
        assert_eq!(summarize(text), "first second third...");
    }
}
