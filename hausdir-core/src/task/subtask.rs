//! The subtask list encoded in a task's DESCRIPTION.
//!
//! Every segment of the description is one subtask, optionally prefixed with
//! a status symbol and followed by a short hint:
//!
//! ```text
//! * Bring trash ## blue bin
//! ✓ Water plants
//! .* Read meters
//! ```

use std::cmp::Reverse;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::config::{Modifier, StatusSymbols};

/// Hints are cut to this many characters.
pub const HINT_MAX_CHARS: usize = 20;

static LINE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());

/// The four states a subtask prefix can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubtaskStatus {
    OpenLocked,
    DoneLocked,
    Open,
    Done,
}

impl SubtaskStatus {
    pub const ALL: [SubtaskStatus; 4] = [
        SubtaskStatus::OpenLocked,
        SubtaskStatus::DoneLocked,
        SubtaskStatus::Open,
        SubtaskStatus::Done,
    ];

    pub fn new(done: bool, unlocked: bool) -> Self {
        match (done, unlocked) {
            (false, false) => SubtaskStatus::OpenLocked,
            (true, false) => SubtaskStatus::DoneLocked,
            (false, true) => SubtaskStatus::Open,
            (true, true) => SubtaskStatus::Done,
        }
    }

    pub fn is_done(self) -> bool {
        matches!(self, SubtaskStatus::Done | SubtaskStatus::DoneLocked)
    }

    pub fn is_unlocked(self) -> bool {
        matches!(self, SubtaskStatus::Open | SubtaskStatus::Done)
    }

    pub fn symbol(self, symbols: &StatusSymbols) -> &str {
        match self {
            SubtaskStatus::OpenLocked => symbols.open_locked.as_str(),
            SubtaskStatus::DoneLocked => symbols.done_locked.as_str(),
            SubtaskStatus::Open => symbols.open.as_str(),
            SubtaskStatus::Done => symbols.done.as_str(),
        }
    }

    /// Prefix candidates, longest symbol first so that `.✓` is never read as
    /// `.` followed by text. Ties keep the order of [`SubtaskStatus::ALL`].
    fn candidates(symbols: &StatusSymbols) -> Vec<(SubtaskStatus, &str)> {
        let mut candidates: Vec<_> = Self::ALL
            .into_iter()
            .map(|status| (status, status.symbol(symbols)))
            .collect();
        candidates.sort_by_key(|(_, symbol)| Reverse(symbol.chars().count()));
        candidates
    }
}

/// One entry of a task's checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// The matched prefix, empty if the segment carried none
    pub symbol: String,
    pub done: bool,
    /// Locked subtasks are shown but not meant to be ticked off
    pub unlocked: bool,
    pub title: String,
    pub hint: Option<String>,
}

impl Subtask {
    pub fn status(&self) -> SubtaskStatus {
        SubtaskStatus::new(self.done, self.unlocked)
    }
}

/// Decode a DESCRIPTION value into its subtasks.
pub fn decode_description(raw: &str, modifier: &Modifier) -> Vec<Subtask> {
    let text = raw
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace("\\n", "\n")
        .replace("\\N", "\n");
    let text = text.trim();

    if text.is_empty() {
        return Vec::new();
    }

    let segments: Vec<&str> = if modifier.description_delimiter.contains('\n') {
        LINE_SPLIT.split(text).collect()
    } else {
        text.split(modifier.description_delimiter.as_str()).collect()
    };

    let candidates = SubtaskStatus::candidates(&modifier.symbols);

    segments
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| decode_segment(segment, &candidates, modifier))
        .collect()
}

fn decode_segment(
    segment: &str,
    candidates: &[(SubtaskStatus, &str)],
    modifier: &Modifier,
) -> Subtask {
    let (status, symbol, content) = candidates
        .iter()
        .find_map(|(status, symbol)| {
            segment
                .strip_prefix(symbol)
                .map(|rest| (*status, *symbol, rest.trim()))
        })
        .unwrap_or((SubtaskStatus::Open, "", segment));

    let (title, hint) = split_hint(content, modifier);

    Subtask {
        symbol: symbol.to_string(),
        done: status.is_done(),
        unlocked: status.is_unlocked(),
        title,
        hint,
    }
}

/// Split on the last separator; one at the very start means an empty title.
fn split_hint(content: &str, modifier: &Modifier) -> (String, Option<String>) {
    let Some(separator) = modifier.hint_separator() else {
        return (content.to_string(), None);
    };

    let split = content
        .rsplit_once(&format!(" {separator} "))
        .or_else(|| Some(("", content.strip_prefix(&format!("{separator} "))?)));

    match split {
        Some((title, hint)) => {
            let hint = normalize_hint(hint, modifier);
            (title.trim().to_string(), Some(hint).filter(|h| !h.is_empty()))
        }
        None => (content.to_string(), None),
    }
}

/// Editable form of a subtask, as written back to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskInput {
    pub done: bool,
    pub unlocked: bool,
    pub title: String,
    #[serde(default)]
    pub hint: Option<String>,
}

impl From<&Subtask> for SubtaskInput {
    fn from(subtask: &Subtask) -> Self {
        SubtaskInput {
            done: subtask.done,
            unlocked: subtask.unlocked,
            title: subtask.title.clone(),
            hint: subtask.hint.clone(),
        }
    }
}

/// Encode subtasks back into a DESCRIPTION value.
///
/// The symbol is always derived from `(done, unlocked)`.
pub fn encode_description(subtasks: &[SubtaskInput], modifier: &Modifier) -> String {
    subtasks
        .iter()
        .map(|subtask| {
            let status = SubtaskStatus::new(subtask.done, subtask.unlocked);
            let mut entry = format!("{} {}", status.symbol(&modifier.symbols), subtask.title);

            let hint = subtask.hint.as_deref().filter(|h| !h.is_empty());
            if let (Some(hint), Some(separator)) = (hint, modifier.hint_separator()) {
                entry.push_str(&format!(" {separator} {hint}"));
            }

            entry.trim().to_string()
        })
        .collect::<Vec<_>>()
        .join(&modifier.description_delimiter)
}

/// Clean free text for use as a hint.
///
/// NFKC-normalizes, blanks control characters, removes every token that has
/// meaning inside a description, collapses whitespace and cuts the result to
/// [`HINT_MAX_CHARS`] characters.
pub fn normalize_hint(text: &str, modifier: &Modifier) -> String {
    let mut cleaned: String = text
        .nfkc()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    // Removing one token can join the halves of another, so repeat until stable.
    let tokens = modifier.control_tokens();
    loop {
        let before = cleaned.len();
        for token in &tokens {
            cleaned = cleaned.replace(token, "");
        }
        if cleaned.len() == before {
            break;
        }
    }

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed
        .chars()
        .take(HINT_MAX_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}
