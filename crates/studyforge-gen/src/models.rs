//! The ordered model preference list.

use studyforge_core::{StudyError, StudyResult};

/// Default fallback sequence, most capable first, most stable last.
/// Every credential attempt restarts from the first entry.
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-2.5-pro",
    "gemini-2.5-flash",
    "gemini-2.0-flash",
    "gemini-1.5-flash",
];

/// A fixed ordered sequence of backend model identifiers.
///
/// Static configuration: built once, never mutated at runtime.
#[derive(Debug, Clone)]
pub struct ModelList(Vec<String>);

impl ModelList {
    /// Builds a model list, rejecting an empty sequence as invalid
    /// configuration.
    pub fn new(models: Vec<String>) -> StudyResult<Self> {
        if models.is_empty() {
            return Err(StudyError::Config(
                "model preference list must not be empty".into(),
            ));
        }
        Ok(Self(models))
    }

    /// Iterates the identifiers in preference order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of model variants in the list.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty (never true for a constructed list).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ModelList {
    fn default() -> Self {
        Self(DEFAULT_MODELS.iter().map(|m| (*m).to_string()).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_list_matches_preference_order() {
        let list = ModelList::default();
        let ids: Vec<&str> = list.iter().collect();
        assert_eq!(ids, DEFAULT_MODELS);
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = ModelList::new(vec![]).unwrap_err();
        assert!(matches!(err, StudyError::Config(_)));
    }

    #[test]
    fn custom_list_preserves_order() {
        let list = ModelList::new(vec!["m1".into(), "m2".into()]).unwrap();
        let ids: Vec<&str> = list.iter().collect();
        assert_eq!(ids, ["m1", "m2"]);
        assert_eq!(list.len(), 2);
    }
}
