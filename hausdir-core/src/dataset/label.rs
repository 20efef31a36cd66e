//! Free-text area labels such as `Wohnung 12` or `Gebäude A - Keller 3`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Area, DatasetIndex};

static TRAILING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s+([0-9]+)$").unwrap());

const CLOSING_PUNCTUATION: &[char] = &[')', ']', '}', '"', '\'', '”', '’', '»', '“'];

/// Split a label into `(category name, area id)`.
///
/// Whitespace is collapsed and closing brackets/quotes at the end dropped.
/// Anything up to the last `-` is a building or section qualifier and is
/// ignored. What remains must end in `<space><digits>`.
pub fn parse_area_label(text: &str) -> Option<(String, u32)> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped = collapsed.trim_end_matches(CLOSING_PUNCTUATION).trim_end();

    let segment = match stripped.rsplit_once('-') {
        Some((_, tail)) => tail.trim(),
        None => stripped,
    };

    let captures = TRAILING_NUMBER.captures(segment)?;
    let name = captures.get(1)?.as_str().trim();
    let area_id = captures.get(2)?.as_str().parse().ok()?;

    Some((name.to_string(), area_id))
}

impl DatasetIndex {
    pub fn area_by_label(&self, text: &str) -> Option<&Area> {
        let (name, area_id) = parse_area_label(text)?;
        self.area_by_category_name_and_id(&name, area_id)
    }
}
