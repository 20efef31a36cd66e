//! Rewriting the VTODO component of an existing file.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::parse::{LineEnding, TodoRegion, property_key, unfold_lines};

/// Maximum octets per physical line, excluding the line break.
const FOLD_LIMIT: usize = 75;

/// Apply TEXT escaping for storage.
pub fn escape_text(value: &str) -> String {
    value
        .replace("\r\n", "\n")
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Compact UTC timestamp as used by DTSTAMP and LAST-MODIFIED.
pub fn format_utc_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Split a content line into physical lines of at most 75 octets.
/// Continuations start with a single space; characters are never split.
pub fn fold_line(line: &str) -> Vec<String> {
    let mut folded = Vec::new();
    let mut current = String::with_capacity(FOLD_LIMIT);

    for ch in line.chars() {
        if current.len() + ch.len_utf8() > FOLD_LIMIT {
            folded.push(std::mem::take(&mut current));
            current.push(' ');
        }
        current.push(ch);
    }

    folded.push(current);
    folded
}

/// Replace the first line carrying `name` (parameters ignored) or append one.
/// Later lines with the same key are removed, since reading keeps the last
/// occurrence. `value` must already be escaped. Returns the index of the
/// written line.
pub fn upsert_property(lines: &mut Vec<String>, name: &str, value: &str) -> usize {
    let key = name.to_ascii_uppercase();
    let line = format!("{key}:{value}");

    let Some(first) = lines
        .iter()
        .position(|l| property_key(l).is_some_and(|k| k == key))
    else {
        lines.push(line);
        return lines.len() - 1;
    };

    lines[first] = line;
    let mut i = 0;
    lines.retain(|l| {
        let keep = i <= first || property_key(l).is_none_or(|k| k != key);
        i += 1;
        keep
    });
    first
}

/// Set `updates` inside the first VTODO of `content`.
///
/// Lines outside the component are kept as they were (unfolded); the newline
/// convention of the input is kept. Returns `None` when there is no VTODO.
pub fn rewrite_todo(content: &str, updates: &[(&str, String)]) -> Option<String> {
    let ending = LineEnding::detect(content);
    let lines = unfold_lines(content);
    let region = TodoRegion::find(&lines)?;

    let mut body = region.body(&lines).to_vec();
    let mut touched = HashSet::new();
    for (name, value) in updates {
        upsert_property(&mut body, name, &escape_text(value));
        touched.insert(name.to_ascii_uppercase());
    }

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + updates.len() * 2);
    out.extend_from_slice(&lines[..=region.begin]);
    for line in body {
        if property_key(&line).is_some_and(|k| touched.contains(&k)) {
            out.extend(fold_line(&line));
        } else {
            out.push(line);
        }
    }
    out.extend_from_slice(&lines[region.end..]);

    let newline = ending.as_str();
    let mut result = out.join(newline);
    result.push_str(newline);
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ics::read_properties;
    use chrono::TimeZone;

    #[test]
    fn test_escape_roundtrip() {
        let raw = "a, b; c\\d\ne";
        let escaped = escape_text(raw);

        assert_eq!(escaped, "a\\, b\\; c\\\\d\\ne");
        assert_eq!(crate::ics::unescape_text(&escaped), raw);
    }

    #[test]
    fn test_format_utc_stamp() {
        let at = Utc.with_ymd_and_hms(2025, 3, 20, 7, 5, 9).unwrap();
        assert_eq!(format_utc_stamp(at), "20250320T070509Z");
    }

    #[test]
    fn test_fold_line_never_splits_chars() {
        let line = format!("SUMMARY:{}", "ä".repeat(100));
        let folded = fold_line(&line);

        for physical in &folded {
            assert!(physical.len() <= 75, "too long: {}", physical.len());
        }
        assert!(folded[1..].iter().all(|l| l.starts_with(' ')));
    }

    #[test]
    fn test_short_line_is_not_folded() {
        assert_eq!(fold_line("UID:1"), vec!["UID:1"]);
    }

    #[test]
    fn test_upsert_replaces_first_match_ignoring_params() {
        let mut lines = vec![
            "UID:1".to_string(),
            "description;language=de:old".to_string(),
            "DESCRIPTION:second".to_string(),
        ];

        let i = upsert_property(&mut lines, "DESCRIPTION", "new");

        assert_eq!(i, 1);
        assert_eq!(lines, vec!["UID:1", "DESCRIPTION:new"]);
    }

    #[test]
    fn test_upsert_appends_missing() {
        let mut lines = vec!["UID:1".to_string()];
        let i = upsert_property(&mut lines, "last-modified", "20250101T000000Z");

        assert_eq!(i, 1);
        assert_eq!(lines[1], "LAST-MODIFIED:20250101T000000Z");
    }

    #[test]
    fn test_rewrite_keeps_framing_and_crlf() {
        let content = "BEGIN:VCALENDAR\r\nPRODID:-//test//\r\nBEGIN:VTODO\r\nUID:1\r\nSUMMARY:Mülltonnen\r\nEND:VTODO\r\nEND:VCALENDAR\r\n";

        let rewritten = rewrite_todo(
            content,
            &[
                ("DESCRIPTION", "* a\n✓ b".to_string()),
                ("SUMMARY", "Mülltonnen, raus".to_string()),
            ],
        )
        .unwrap();

        assert_eq!(
            rewritten,
            "BEGIN:VCALENDAR\r\nPRODID:-//test//\r\nBEGIN:VTODO\r\nUID:1\r\nSUMMARY:Mülltonnen\\, raus\r\nDESCRIPTION:* a\\n✓ b\r\nEND:VTODO\r\nEND:VCALENDAR\r\n"
        );
    }

    #[test]
    fn test_rewrite_folds_long_values() {
        let content = "BEGIN:VTODO\nUID:1\nEND:VTODO\n";
        let long = "Treppenhaus fegen und wischen ".repeat(5);

        let rewritten = rewrite_todo(content, &[("DESCRIPTION", long.clone())]).unwrap();

        assert!(rewritten.lines().all(|l| l.len() <= 75));
        assert_eq!(
            read_properties(&rewritten).get("DESCRIPTION"),
            Some(&long)
        );
    }

    #[test]
    fn test_rewrite_wins_over_duplicate_lines() {
        let content = "BEGIN:VTODO\nDESCRIPTION:* a\nUID:1\nDESCRIPTION:* b\nSUMMARY:x\nEND:VTODO\n";

        let rewritten = rewrite_todo(content, &[("DESCRIPTION", "✓ a".to_string())]).unwrap();

        assert_eq!(rewritten, "BEGIN:VTODO\nDESCRIPTION:✓ a\nUID:1\nSUMMARY:x\nEND:VTODO\n");
        assert_eq!(
            read_properties(&rewritten).get("DESCRIPTION").map(String::as_str),
            Some("✓ a")
        );
    }

    #[test]
    fn test_rewrite_without_region() {
        assert_eq!(rewrite_todo("BEGIN:VEVENT\nEND:VEVENT\n", &[]), None);
    }
}
