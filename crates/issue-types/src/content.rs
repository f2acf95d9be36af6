//! Message content → issue title/body transformation.
//!
//! The first line of a message becomes the issue title and the second
//! line its description; single-line messages use the same text for
//! both. An over-length first line is truncated for the title but kept
//! in full in the body, so truncation never loses information.

use crate::types::{Attachment, IssueDraft};

/// First lines longer than this are truncated for the title.
pub const TITLE_LIMIT: usize = 128;

/// Line break marker used in issue bodies (GitHub renders inline HTML
/// in issue Markdown).
pub const LINE_BREAK: &str = "<br />";

const ELLIPSIS: &str = "...";

/// Outcome of splitting raw message content into its title and body
/// parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitContent {
    /// Issue title: the first line, truncated when over [`TITLE_LIMIT`].
    pub title: String,
    /// The full, untruncated first line.
    pub first_line: String,
    /// The second line, when the message has one. Lines beyond the
    /// second never participate.
    pub second_line: Option<String>,
    /// Whether the title was truncated.
    pub truncated: bool,
}

/// Split raw message content on line breaks.
///
/// Truncation keeps the first 127 characters of the first line and
/// appends `...`. Counting is `char`-based so multi-byte content never
/// splits inside a code point.
pub fn split_content(raw: &str) -> SplitContent {
    let mut lines = raw.split('\n');
    let first_line = lines.next().unwrap_or_default().to_string();
    let second_line = lines.next().map(str::to_string);

    let truncated = first_line.chars().count() > TITLE_LIMIT;
    let title = if truncated {
        let mut title: String = first_line.chars().take(TITLE_LIMIT - 1).collect();
        title.push_str(ELLIPSIS);
        title
    } else {
        first_line.clone()
    };

    SplitContent {
        title,
        first_line,
        second_line,
        truncated,
    }
}

/// Render attachments as inline image references, in their original
/// order, with no separator between entries.
pub fn render_attachments(attachments: &[Attachment]) -> String {
    attachments
        .iter()
        .map(|a| format!("![{}]({})", a.filename, a.url))
        .collect()
}

/// Assemble the final issue draft from split content, the author credit
/// and pre-rendered attachment markup.
///
/// Body selection, in priority order:
/// 1. single-line message → that line (title and body share the text);
/// 2. over-length first line → first line plus second line, so the
///    truncated title loses nothing;
/// 3. otherwise → exactly the second line.
pub fn compose_issue(split: &SplitContent, author: &str, attachment_markup: &str) -> IssueDraft {
    let description = match &split.second_line {
        None => split.first_line.clone(),
        Some(second) if split.truncated => {
            format!("{}{}{}", split.first_line, LINE_BREAK, second)
        }
        Some(second) => second.clone(),
    };

    let mut body = format!("{}{} Issue created by: {}", description, LINE_BREAK, author);
    if !attachment_markup.is_empty() {
        body.push_str(LINE_BREAK);
        body.push_str(LINE_BREAK);
        body.push_str(attachment_markup);
    }

    IssueDraft {
        title: split.title.clone(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(filename: &str, url: &str) -> Attachment {
        Attachment {
            filename: filename.to_string(),
            url: url.to_string(),
        }
    }

    // ── split_content ─────────────────────────────────────────────────────────

    #[test]
    fn test_split_single_line() {
        let split = split_content("just one line");
        assert_eq!(split.title, "just one line");
        assert_eq!(split.first_line, "just one line");
        assert_eq!(split.second_line, None);
        assert!(!split.truncated);
    }

    #[test]
    fn test_split_two_lines() {
        let split = split_content("title\ndescription");
        assert_eq!(split.title, "title");
        assert_eq!(split.second_line.as_deref(), Some("description"));
        assert!(!split.truncated);
    }

    #[test]
    fn test_split_ignores_lines_beyond_second() {
        let split = split_content("one\ntwo\nthree\nfour");
        assert_eq!(split.first_line, "one");
        assert_eq!(split.second_line.as_deref(), Some("two"));
    }

    #[test]
    fn test_split_exactly_128_chars_not_truncated() {
        let line = "x".repeat(128);
        let split = split_content(&line);
        assert!(!split.truncated);
        assert_eq!(split.title, line);
    }

    #[test]
    fn test_split_129_chars_truncated() {
        let line = "x".repeat(129);
        let split = split_content(&line);
        assert!(split.truncated);
        assert_eq!(split.title.chars().count(), 130);
        assert!(split.title.ends_with("..."));
        assert_eq!(split.first_line, line);
    }

    #[test]
    fn test_truncation_keeps_leading_character() {
        let line = format!("A{}", "x".repeat(200));
        let split = split_content(&line);
        assert!(split.title.starts_with('A'));
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        // 200 two-byte characters; byte slicing would panic or mangle.
        let line = "é".repeat(200);
        let split = split_content(&line);
        assert!(split.truncated);
        assert_eq!(split.title.chars().count(), 130);
        assert!(split.title.starts_with('é'));
    }

    #[test]
    fn test_split_empty_input() {
        let split = split_content("");
        assert_eq!(split.title, "");
        assert_eq!(split.first_line, "");
        assert_eq!(split.second_line, None);
    }

    #[test]
    fn test_split_trailing_newline_yields_empty_second_line() {
        let split = split_content("title\n");
        assert_eq!(split.second_line.as_deref(), Some(""));
    }

    // ── render_attachments ────────────────────────────────────────────────────

    #[test]
    fn test_render_empty() {
        assert_eq!(render_attachments(&[]), "");
    }

    #[test]
    fn test_render_single() {
        let markup = render_attachments(&[attachment("shot.png", "https://cdn.example/shot.png")]);
        assert_eq!(markup, "![shot.png](https://cdn.example/shot.png)");
    }

    #[test]
    fn test_render_preserves_order_without_separator() {
        let markup = render_attachments(&[attachment("a.png", "u1"), attachment("b.png", "u2")]);
        assert_eq!(markup, "![a.png](u1)![b.png](u2)");
    }

    // ── compose_issue ─────────────────────────────────────────────────────────

    #[test]
    fn test_compose_single_line_body_is_the_line() {
        let split = split_content("everything in one line");
        let draft = compose_issue(&split, "alice", "");
        assert_eq!(draft.title, "everything in one line");
        assert_eq!(
            draft.body,
            "everything in one line<br /> Issue created by: alice"
        );
    }

    #[test]
    fn test_compose_two_lines_body_is_second_line() {
        let split = split_content("Bug: button broken\nClicking the button does nothing.");
        let draft = compose_issue(&split, "alice", "");
        assert_eq!(draft.title, "Bug: button broken");
        assert_eq!(
            draft.body,
            "Clicking the button does nothing.<br /> Issue created by: alice"
        );
    }

    #[test]
    fn test_compose_long_first_line_keeps_both_lines() {
        let first = "y".repeat(200);
        let raw = format!("{}\nsecond line", first);
        let draft = compose_issue(&split_content(&raw), "bob", "");
        assert!(draft.title.ends_with("..."));
        assert!(draft.body.contains(&first));
        assert!(draft.body.contains("second line"));
        assert_eq!(
            draft.body,
            format!("{}<br />second line<br /> Issue created by: bob", first)
        );
    }

    #[test]
    fn test_compose_appends_attachment_block() {
        let split = split_content("title\nbody");
        let markup = render_attachments(&[attachment("a.png", "u1"), attachment("b.png", "u2")]);
        let draft = compose_issue(&split, "alice", &markup);
        assert_eq!(
            draft.body,
            "body<br /> Issue created by: alice<br /><br />![a.png](u1)![b.png](u2)"
        );
    }

    #[test]
    fn test_compose_no_attachment_block_when_markup_empty() {
        let split = split_content("title\nbody");
        let draft = compose_issue(&split, "alice", "");
        assert!(!draft.body.contains("<br /><br />"));
    }

    #[test]
    fn test_compose_body_never_truncated() {
        let first = "z".repeat(500);
        let draft = compose_issue(&split_content(&first), "carol", "");
        assert!(draft.body.starts_with(&first));
    }
}
