//! Limitation targets.
//!
//! A target describes what is being attempted beyond the object itself,
//! e.g. which translations are published right now. Targets are built
//! fresh for each check and dropped afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::VersionStatus;

/// Intent data for version-level operations.
///
/// Every field is optional; `None` means the caller expressed no intent
/// for that aspect and evaluators ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTarget {
    /// Translations being published.
    #[serde(default)]
    pub translations_to_publish: Option<BTreeSet<String>>,

    /// The user wants to translate into at least one of these languages.
    #[serde(default)]
    pub all_language_codes: Option<BTreeSet<String>>,

    /// Translations whose fields are being updated.
    #[serde(default)]
    pub update_translations: Option<BTreeSet<String>>,

    /// Initial language code of a field update.
    #[serde(default)]
    pub update_initial_language_code: Option<String>,

    /// The content will be created from one of these content types.
    #[serde(default)]
    pub all_content_types: Option<BTreeSet<String>>,

    /// Status the version is moving to.
    #[serde(default)]
    pub new_status: Option<VersionStatus>,
}

impl VersionTarget {
    /// Whether any language-related intent is present.
    pub fn has_language_constraints(&self) -> bool {
        self.translations_to_publish.is_some()
            || self.all_language_codes.is_some()
            || self.update_translations.is_some()
            || self.update_initial_language_code.is_some()
    }
}

/// The location a content item is created in or moved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTarget {
    /// Path string of the (parent) location, e.g. `/1/2/`.
    pub path_string: String,
}

/// Per-check intent data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Target {
    /// Version-level intent.
    Version(VersionTarget),

    /// Location-level intent.
    Location(LocationTarget),
}

impl Target {
    /// A location target for `path_string`.
    pub fn location(path_string: impl Into<String>) -> Self {
        Self::Location(LocationTarget {
            path_string: path_string.into(),
        })
    }

    /// The version target, if this is one.
    pub fn as_version(&self) -> Option<&VersionTarget> {
        match self {
            Self::Version(target) => Some(target),
            _ => None,
        }
    }

    /// The location target, if this is one.
    pub fn as_location(&self) -> Option<&LocationTarget> {
        match self {
            Self::Location(target) => Some(target),
            _ => None,
        }
    }
}

impl From<VersionTarget> for Target {
    fn from(target: VersionTarget) -> Self {
        Self::Version(target)
    }
}

/// Builds a [`Target::Version`].
///
/// Each method consumes the builder and returns it with one field set.
/// Calling the same method again replaces the earlier value; values are
/// never merged.
///
/// ```
/// use ezp_policy::model::VersionBuilder;
///
/// let target = VersionBuilder::new()
///     .publish_translations(["eng-GB"])
///     .publish_translations(["ger-DE"])
///     .build();
///
/// let version = target.as_version().unwrap();
/// let codes = version.translations_to_publish.as_ref().unwrap();
/// assert_eq!(codes.len(), 1);
/// assert!(codes.contains("ger-DE"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VersionBuilder {
    target: VersionTarget,
}

fn code_set<I, V>(codes: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    codes.into_iter().map(Into::into).collect()
}

impl VersionBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The user wants to translate into any of `codes`.
    pub fn translate_to_any_language_of<I, V>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.target.all_language_codes = Some(code_set(codes));
        self
    }

    /// The user publishes exactly the translations in `codes`.
    pub fn publish_translations<I, V>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.target.translations_to_publish = Some(code_set(codes));
        self
    }

    /// The user updates fields in `codes`, starting in
    /// `initial_language_code`.
    pub fn update_fields_to<I, V>(mut self, initial_language_code: Option<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.target.update_initial_language_code = initial_language_code;
        self.target.update_translations = Some(code_set(codes));
        self
    }

    /// The content is created from any of the given content types.
    pub fn create_from_any_content_type_of<I, V>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.target.all_content_types = Some(code_set(identifiers));
        self
    }

    /// The version moves to `status`.
    pub fn change_status_to(mut self, status: VersionStatus) -> Self {
        self.target.new_status = Some(status);
        self
    }

    /// Produce the immutable target.
    pub fn build(self) -> Target {
        Target::Version(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_has_no_constraints() {
        let target = VersionBuilder::new().build();
        let version = target.as_version().unwrap();
        assert_eq!(version, &VersionTarget::default());
        assert!(!version.has_language_constraints());
    }

    #[test]
    fn test_last_write_wins() {
        let target = VersionBuilder::new()
            .translate_to_any_language_of(["ger-DE", "eng-GB"])
            .translate_to_any_language_of(["eng-US"])
            .build();

        let codes = target.as_version().unwrap().all_language_codes.clone().unwrap();
        assert_eq!(codes.into_iter().collect::<Vec<_>>(), vec!["eng-US"]);
    }

    #[test]
    fn test_fields_are_independent() {
        let target = VersionBuilder::new()
            .publish_translations(["ger-DE"])
            .create_from_any_content_type_of(["folder"])
            .change_status_to(VersionStatus::Published)
            .build();

        let version = target.as_version().unwrap();
        assert!(version.has_language_constraints());
        assert!(version.all_language_codes.is_none());
        assert_eq!(version.new_status, Some(VersionStatus::Published));
        assert!(version.all_content_types.as_ref().unwrap().contains("folder"));
    }

    #[test]
    fn test_update_fields_to() {
        let target = VersionBuilder::new()
            .update_fields_to(Some("ger-DE".to_string()), ["ger-DE", "eng-GB"])
            .build();

        let version = target.as_version().unwrap();
        assert_eq!(version.update_initial_language_code.as_deref(), Some("ger-DE"));
        assert_eq!(version.update_translations.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_location_target() {
        let target = Target::location("/1/2/");
        assert_eq!(target.as_location().unwrap().path_string, "/1/2/");
        assert!(target.as_version().is_none());
    }
}
