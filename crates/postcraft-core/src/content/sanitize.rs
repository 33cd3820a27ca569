//! Text clean-up for webhook output and clipboard copies.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADER_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:#+\s+)+").expect("header pattern is valid"));
static BLANK_LINE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("newline pattern is valid"));

/// Cleans the `result_text` returned by the webhook.
///
/// Literal `\n` sequences become real line breaks, then any remaining
/// backslashes are dropped.
pub fn sanitize_result_text(text: &str) -> String {
    text.replace("\\n", "\n").replace('\\', "")
}

/// Strips markdown artifacts so the text can be pasted into a plain-text composer.
///
/// Running it on its own output is a no-op.
pub fn strip_markdown_for_copy(text: &str) -> String {
    let without_emphasis: String = text.chars().filter(|c| *c != '*' && *c != '`').collect();
    let without_headers = HEADER_MARKERS.replace_all(without_emphasis.trim(), "");
    let collapsed = BLANK_LINE_RUNS.replace_all(&without_headers, "\n\n");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_unescapes_newlines() {
        assert_eq!(
            sanitize_result_text(r"Line one\nLine two"),
            "Line one\nLine two"
        );
    }

    #[test]
    fn test_sanitize_drops_stray_backslashes() {
        assert_eq!(sanitize_result_text(r#"He said \"hi\""#), r#"He said "hi""#);
    }

    #[test]
    fn test_sanitize_leaves_clean_text_alone() {
        let clean = "Already clean\nwith lines";
        assert_eq!(sanitize_result_text(clean), clean);
    }

    #[test]
    fn test_strip_markdown() {
        let input = "# Title\n\n**Bold** and *italic* with `code`\n\n\n\nEnd  ";
        assert_eq!(
            strip_markdown_for_copy(input),
            "Title\n\nBold and italic with code\n\nEnd"
        );
    }

    #[test]
    fn test_strip_markdown_nested_headers() {
        assert_eq!(strip_markdown_for_copy("## # Deep\nbody"), "Deep\nbody");
        assert_eq!(strip_markdown_for_copy("#* starred"), "starred");
    }

    #[test]
    fn test_strip_markdown_is_idempotent() {
        let samples = [
            "# Title\n\n**Bold** text\n\n\n\nMore",
            "  # indented header",
            "#* tricky\n\n\n# next\n`x`",
            "plain text",
            "##\n\n\n\n#x\n* bullet\n- dash",
            "",
        ];
        for sample in samples {
            let once = strip_markdown_for_copy(sample);
            let twice = strip_markdown_for_copy(&once);
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }
}
