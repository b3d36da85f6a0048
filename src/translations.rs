//! Item name translations and candidate ranking
//!
//! The translation table maps internal item identifiers to human-readable
//! display names. It is loaded once at startup and read-only afterwards.

use std::collections::HashMap;

use crate::error::Result;

/// Hard cap on ranked candidates, fixed by the autocomplete surface
pub const MAX_SUGGESTIONS: usize = 25;

/// A ranked candidate for the autocomplete surface
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub display_name: String,
    pub item_id: String,
}

/// Static item-identifier to display-name table
#[derive(Debug, Default)]
pub struct Translations {
    entries: HashMap<String, String>,
}

impl Translations {
    /// Loads the translation table from a JSON file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)?;
        log::info!("loaded {} item translations from {}", entries.len(), path);
        Ok(Self { entries })
    }

    /// Display name for an item, falling back to the raw identifier.
    pub fn display_name<'a>(&'a self, item_id: &'a str) -> &'a str {
        self.entries
            .get(item_id)
            .map(String::as_str)
            .unwrap_or(item_id)
    }

    /// Resolves a display name back to an item identifier.
    ///
    /// Linear scan over the table; an input with no matching translation is
    /// treated as already being an identifier.
    pub fn reverse_lookup<'a>(&'a self, display_name: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(_, translated)| translated.as_str() == display_name)
            .map(|(item_id, _)| item_id.as_str())
            .unwrap_or(display_name)
    }

    /// Filters `candidates` down to those whose display name or raw
    /// identifier contains `query`, case-insensitively.
    ///
    /// Stable filter: candidate order is preserved, there is no relevance
    /// scoring, and the result is truncated at [`MAX_SUGGESTIONS`].
    pub fn rank_candidates<'a, I>(&self, query: &str, candidates: I) -> Vec<Suggestion>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let needle = query.to_lowercase();
        let mut suggestions = Vec::new();
        for item_id in candidates {
            let display_name = self.display_name(item_id);
            if display_name.to_lowercase().contains(&needle)
                || item_id.to_lowercase().contains(&needle)
            {
                suggestions.push(Suggestion {
                    display_name: display_name.to_string(),
                    item_id: item_id.to_string(),
                });
                if suggestions.len() == MAX_SUGGESTIONS {
                    break;
                }
            }
        }
        suggestions
    }

    /// Number of translation entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Create a table from entries (for testing)
    #[cfg(test)]
    pub fn from_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(item_id, display_name)| (item_id.to_string(), display_name.to_string()))
                .collect(),
        }
    }
}
