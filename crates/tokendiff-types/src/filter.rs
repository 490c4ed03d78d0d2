//! Filter criteria for re-scoping an existing diff.

use serde::{Deserialize, Serialize};

/// Criteria restricting which changes a diff reports.
///
/// Every field is optional and the fields combine with AND; a filter with
/// no criteria leaves a diff untouched. Values are raw user input and are
/// normalized by the engine before use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffFilter {
    /// Record types (case-insensitive). `untyped` selects records without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    /// Pointer prefixes such as `#/color` or `color.brand`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    /// Group paths split on `/`, `\` or `>`, e.g. `color > brand`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    /// `breaking` and/or `non-breaking`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impacts: Option<Vec<String>>,
    /// `added`, `removed`, `changed` and/or `renamed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<String>>,
}

impl DiffFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_impacts<I, S>(mut self, impacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.impacts = Some(impacts.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kinds = Some(kinds.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_and_missing_fields_are_tolerated() {
        let filter: DiffFilter =
            serde_json::from_str(r#"{"types": ["color"], "severity": "high"}"#).unwrap();
        assert_eq!(filter.types, Some(vec!["color".to_string()]));
        assert!(filter.kinds.is_none());

        let empty: DiffFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DiffFilter::default());
    }
}
