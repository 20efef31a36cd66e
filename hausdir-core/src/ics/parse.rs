//! Unfolding and property extraction.

use std::collections::BTreeMap;

use super::{BEGIN_TODO, END_TODO};

/// Property name (upper-case, parameters stripped) to unescaped value.
pub type Properties = BTreeMap<String, String>;

/// Newline convention used by a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn detect(content: &str) -> Self {
        if content.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Join continuation lines (leading space or tab) onto the line before them.
///
/// Trailing blank lines are dropped so a rewrite ends with exactly one newline.
pub fn unfold_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for raw in content.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        match lines.last_mut() {
            Some(prev) if line.starts_with([' ', '\t']) => prev.push_str(&line[1..]),
            _ => lines.push(line.to_string()),
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines
}

/// Marker line positions of the first VTODO component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoRegion {
    pub begin: usize,
    pub end: usize,
}

impl TodoRegion {
    pub fn find(lines: &[String]) -> Option<Self> {
        let begin = lines.iter().position(|l| l == BEGIN_TODO)?;
        let end = begin + 1 + lines[begin + 1..].iter().position(|l| l == END_TODO)?;

        Some(TodoRegion { begin, end })
    }

    /// Lines strictly between the markers.
    pub fn body<'a>(&self, lines: &'a [String]) -> &'a [String] {
        &lines[self.begin + 1..self.end]
    }
}

/// Upper-cased property name of a content line, ignoring parameters.
///
/// `DESCRIPTION;LANGUAGE=de:...` yields `DESCRIPTION`.
pub fn property_key(line: &str) -> Option<String> {
    let (lhs, _) = line.split_once(':')?;
    let name = lhs.split(';').next().unwrap_or(lhs).trim();

    if name.is_empty() {
        return None;
    }

    Some(name.to_ascii_uppercase())
}

/// Read the properties of the first VTODO in `content`.
///
/// A file without a complete VTODO yields an empty set. Later duplicates win.
pub fn read_properties(content: &str) -> Properties {
    let lines = unfold_lines(content);

    let Some(region) = TodoRegion::find(&lines) else {
        return Properties::new();
    };

    region
        .body(&lines)
        .iter()
        .filter_map(|line| {
            let key = property_key(line)?;
            let (_, value) = line.split_once(':')?;
            Some((key, unescape_text(value)))
        })
        .collect()
}

/// Undo TEXT escaping: `\n`, `\N`, `\,`, `\;` and `\\`.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(',') => out.push(','),
            Some(';') => out.push(';'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ics::fold_line;

    const TODO: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VTODO\r\n\
UID:abc-1\r\n\
summary:Keller 3 // Fenster\r\n\
DESCRIPTION;LANGUAGE=de:* Bring trash\\n✓ Water \r\n plants\r\n\
X-NOTE:one\r\n\
X-NOTE:two\r\n\
END:VTODO\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_read_properties() {
        let props = read_properties(TODO);

        assert_eq!(props.get("UID").map(String::as_str), Some("abc-1"));
        assert_eq!(
            props.get("SUMMARY").map(String::as_str),
            Some("Keller 3 // Fenster")
        );
        assert_eq!(
            props.get("DESCRIPTION").map(String::as_str),
            Some("* Bring trash\n✓ Water plants")
        );
        assert_eq!(props.get("X-NOTE").map(String::as_str), Some("two"));
        assert!(!props.contains_key("VERSION"), "outside VTODO");
    }

    #[test]
    fn test_missing_region_yields_nothing() {
        assert!(read_properties("BEGIN:VTODO\nUID:x\n").is_empty());
        assert!(read_properties("UID:x\nEND:VTODO\n").is_empty());
    }

    #[test]
    fn test_unfold_tab_continuation() {
        let lines = unfold_lines("A:one\n\ttwo\n three\nB:x\n\n");
        assert_eq!(lines, vec!["A:onetwothree", "B:x"]);
    }

    #[test]
    fn test_leading_continuation_starts_new_line() {
        let lines = unfold_lines(" orphan\nA:b");
        assert_eq!(lines, vec![" orphan", "A:b"]);
    }

    #[test]
    fn test_fold_then_unfold_reconstructs_value() {
        let value = "DESCRIPTION:".to_string() + &"Fenster im Treppenhaus putzen ✓ ".repeat(6);
        let folded = fold_line(&value);
        assert!(folded.len() > 1);

        let unfolded = unfold_lines(&folded.join("\r\n"));
        assert_eq!(unfolded, vec![value]);
    }

    #[test]
    fn test_property_key_strips_parameters() {
        assert_eq!(
            property_key("dtstart;tzid=Europe/Berlin:20240101T100000").as_deref(),
            Some("DTSTART")
        );
        assert_eq!(property_key("no colon here"), None);
        assert_eq!(property_key(":value"), None);
    }

    #[test]
    fn test_unescape_text() {
        assert_eq!(unescape_text(r"a\, b\; c\\d\ne\Nf"), "a, b; c\\d\ne\nf");
        assert_eq!(unescape_text(r"keep \t and end\"), "keep \\t and end\\");
    }

    #[test]
    fn test_line_ending_detect() {
        assert_eq!(LineEnding::detect(TODO), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("A:b\nC:d\n"), LineEnding::Lf);
    }
}
