//! Task text conventions ("modifier"): delimiters, hint separator and the
//! four status symbols used inside DESCRIPTION.

use serde::{Deserialize, Serialize};

use crate::error::{HausdirError, HausdirResult};

/// How summaries and subtask lists are written inside a task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifier {
    /// Separates subtasks in DESCRIPTION
    pub description_delimiter: String,
    /// Separates a subtask title from its hint; empty disables hints
    pub hint_separator: String,
    pub symbols: StatusSymbols,
    /// Separates the parts of SUMMARY
    pub summary_delimiter: String,
    /// Names assigned positionally to the SUMMARY parts
    pub summary_fields: Vec<String>,
}

impl Default for Modifier {
    fn default() -> Self {
        Modifier {
            description_delimiter: "\n".to_string(),
            hint_separator: "##".to_string(),
            symbols: StatusSymbols::default(),
            summary_delimiter: "//".to_string(),
            summary_fields: Vec::new(),
        }
    }
}

/// Prefix symbols marking a subtask's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSymbols {
    pub open_locked: String,
    pub done_locked: String,
    pub open: String,
    pub done: String,
}

impl Default for StatusSymbols {
    fn default() -> Self {
        StatusSymbols {
            open_locked: ".*".to_string(),
            done_locked: ".✓".to_string(),
            open: "*".to_string(),
            done: "✓".to_string(),
        }
    }
}

impl StatusSymbols {
    pub fn all(&self) -> [&str; 4] {
        [
            self.open_locked.as_str(),
            self.done_locked.as_str(),
            self.open.as_str(),
            self.done.as_str(),
        ]
    }
}

impl Modifier {
    pub fn validate(&self) -> HausdirResult<()> {
        let symbols = self.symbols.all();

        if symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(HausdirError::Config(
                "status symbols must not be empty".into(),
            ));
        }

        for (i, a) in symbols.iter().enumerate() {
            if symbols[i + 1..].contains(a) {
                return Err(HausdirError::Config(format!(
                    "status symbol '{a}' is used for more than one state"
                )));
            }
        }

        if self.description_delimiter.is_empty() {
            return Err(HausdirError::Config(
                "description_delimiter must not be empty".into(),
            ));
        }

        if self.summary_delimiter.is_empty() {
            return Err(HausdirError::Config(
                "summary_delimiter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// The hint separator, or `None` when hints are disabled.
    pub fn hint_separator(&self) -> Option<&str> {
        Some(self.hint_separator.as_str()).filter(|s| !s.is_empty())
    }

    /// Every token with structural meaning in a DESCRIPTION, longest first.
    pub fn control_tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.symbols.all().to_vec();
        tokens.extend(self.hint_separator());
        tokens.push(self.description_delimiter.as_str());
        tokens.retain(|t| !t.is_empty());
        tokens.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
        tokens.dedup();
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(Modifier::default().validate().is_ok());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut modifier = Modifier::default();
        modifier.symbols.done_locked = "✓".to_string();

        assert!(modifier.validate().is_err());
    }

    #[test]
    fn test_empty_hint_separator_disables_hints() {
        let modifier = Modifier {
            hint_separator: String::new(),
            ..Modifier::default()
        };

        assert!(modifier.validate().is_ok());
        assert_eq!(modifier.hint_separator(), None);
    }

    #[test]
    fn test_control_tokens_longest_first() {
        let modifier = Modifier::default();
        let tokens = modifier.control_tokens();

        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[..3], [".*", ".✓", "##"]);
        assert!(tokens[3..].contains(&"\n"));
    }
}
