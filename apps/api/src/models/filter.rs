use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The viewer's current selection of active tags and search text.
///
/// A missing `FilterState` (`Option::None` at call sites) is the default view.
/// Values are never edited in place; toggling a tag yields a new state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid filter state: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Outcome of toggling one tag on a filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToggle {
    pub next: FilterState,
    /// True when the tag was active, i.e. the toggle removes it.
    pub selected: bool,
}

impl FilterState {
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            search: None,
        }
    }

    pub fn with_search(search: impl Into<String>) -> Self {
        Self {
            tags: Vec::new(),
            search: Some(search.into()),
        }
    }

    /// Lowercased search term, or `None` when absent or empty.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn has_tag(&self, id: &str) -> bool {
        self.tags.iter().any(|t| t == id)
    }

    /// Compact JSON form embedded in tag-toggle controls.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn decode(raw: &str) -> Result<Self, FilterError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Derives the state a tag-toggle control for `tag_id` leads to.
///
/// From the default view this selects only `tag_id`. Otherwise the tag is
/// appended when inactive or removed when active; the search text carries over.
pub fn toggle_tag(current: Option<&FilterState>, tag_id: &str) -> TagToggle {
    let Some(current) = current else {
        return TagToggle {
            next: FilterState::with_tags([tag_id]),
            selected: false,
        };
    };

    let mut tags = current.tags.clone();
    let selected = match tags.iter().position(|t| t == tag_id) {
        Some(index) => {
            tags.remove(index);
            true
        }
        None => {
            tags.push(tag_id.to_string());
            false
        }
    };

    TagToggle {
        next: FilterState {
            tags,
            search: current.search.clone(),
        },
        selected,
    }
}
