//! Directory listing snapshot handed to the display surface.

use crate::core::cache::CacheKey;
use crate::core::types::ChildName;

/// The listing currently shown, plus the entry to pre-select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub key: CacheKey,
    pub children: Vec<ChildName>,
    /// Child to place the cursor on (the directory just left on ascend).
    pub selected: Option<ChildName>,
}

impl Listing {
    pub fn new(key: CacheKey, children: Vec<ChildName>) -> Self {
        Self {
            key,
            children,
            selected: None,
        }
    }

    pub fn with_selected(mut self, child: Option<ChildName>) -> Self {
        self.selected = child.filter(|c| self.children.contains(c));
        self
    }

    /// Index of the pre-selected child, if any.
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.children.iter().position(|c| c == selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_index() {
        let listing = Listing::new(
            CacheKey::new("kv", ""),
            vec!["b/".to_string(), "a/".to_string()],
        )
        .with_selected(Some("a/".to_string()));
        assert_eq!(listing.selected_index(), Some(1));
    }

    #[test]
    fn test_unknown_selection_is_dropped() {
        let listing = Listing::new(CacheKey::new("kv", ""), vec!["a/".to_string()])
            .with_selected(Some("gone/".to_string()));
        assert_eq!(listing.selected, None);
    }
}
