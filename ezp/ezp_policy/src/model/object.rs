//! Objects under permission checks.
//!
//! These are read-only snapshots supplied by the object provider. The
//! engine never mutates them.

use ezp_core::id::{ContentId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Status of a content version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    /// Work in progress, not visible to readers.
    Draft,

    /// The current published version.
    Published,

    /// A previously published version.
    Archived,
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// Metadata of a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInfo {
    /// The content ID.
    pub id: ContentId,

    /// Identifier of the content type, e.g. `folder`.
    pub content_type_identifier: String,

    /// Identifier of the section the content belongs to.
    pub section_identifier: String,

    /// The owner of the content.
    pub owner_id: UserId,

    /// The main language code.
    pub main_language_code: String,

    /// Language codes of all persisted translations.
    pub language_codes: BTreeSet<String>,

    /// Path strings of the content's locations, e.g. `/1/2/42/`.
    #[serde(default)]
    pub location_paths: Vec<String>,

    /// Whether the content has ever been published.
    #[serde(default)]
    pub published: bool,
}

impl ContentInfo {
    /// Create content metadata with a single translation in
    /// `main_language_code` and no locations.
    pub fn new(
        id: ContentId,
        content_type_identifier: impl Into<String>,
        section_identifier: impl Into<String>,
        owner_id: UserId,
        main_language_code: impl Into<String>,
    ) -> Self {
        let main_language_code = main_language_code.into();
        let mut language_codes = BTreeSet::new();
        language_codes.insert(main_language_code.clone());

        Self {
            id,
            content_type_identifier: content_type_identifier.into(),
            section_identifier: section_identifier.into(),
            owner_id,
            main_language_code,
            language_codes,
            location_paths: Vec::new(),
            published: false,
        }
    }

    /// Add translations.
    pub fn with_languages<I, V>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.language_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Add a location path string.
    pub fn with_location(mut self, path_string: impl Into<String>) -> Self {
        self.location_paths.push(path_string.into());
        self
    }

    /// Mark the content as published.
    pub fn published(mut self) -> Self {
        self.published = true;
        self
    }
}

/// Metadata of one version of a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// The content the version belongs to.
    pub content_info: ContentInfo,

    /// The version number.
    pub version_no: u32,

    /// The version status.
    pub status: VersionStatus,

    /// The language the version was created in.
    pub initial_language_code: String,

    /// Language codes of the translations in this version.
    pub language_codes: BTreeSet<String>,
}

impl VersionInfo {
    /// Create a draft of `content_info` in `initial_language_code`.
    pub fn draft(
        content_info: ContentInfo,
        version_no: u32,
        initial_language_code: impl Into<String>,
    ) -> Self {
        let initial_language_code = initial_language_code.into();
        let mut language_codes = BTreeSet::new();
        language_codes.insert(initial_language_code.clone());

        Self {
            content_info,
            version_no,
            status: VersionStatus::Draft,
            initial_language_code,
            language_codes,
        }
    }

    /// Add translations.
    pub fn with_languages<I, V>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.language_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Whether the version is a draft.
    pub fn is_draft(&self) -> bool {
        self.status == VersionStatus::Draft
    }
}

/// A request to create new content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCreateStruct {
    /// Identifier of the content type to create.
    pub content_type_identifier: String,

    /// Section the content will be placed in.
    pub section_identifier: String,

    /// Owner of the new content. `None` means the creating user.
    #[serde(default)]
    pub owner_id: Option<UserId>,

    /// The main language code.
    pub main_language_code: String,

    /// Language codes of the fields being set.
    #[serde(default)]
    pub language_codes: BTreeSet<String>,
}

impl ContentCreateStruct {
    /// Create a request for content in `main_language_code`.
    pub fn new(
        content_type_identifier: impl Into<String>,
        section_identifier: impl Into<String>,
        main_language_code: impl Into<String>,
    ) -> Self {
        let main_language_code = main_language_code.into();
        let mut language_codes = BTreeSet::new();
        language_codes.insert(main_language_code.clone());

        Self {
            content_type_identifier: content_type_identifier.into(),
            section_identifier: section_identifier.into(),
            owner_id: None,
            main_language_code,
            language_codes,
        }
    }
}

/// The object a permission check is made against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PermissionObject {
    /// An existing content item.
    Content(ContentInfo),

    /// A specific version of a content item.
    Version(VersionInfo),

    /// Content about to be created.
    ContentCreate(ContentCreateStruct),
}

impl PermissionObject {
    /// The content type identifier of the object.
    pub fn content_type_identifier(&self) -> &str {
        match self {
            Self::Content(info) => &info.content_type_identifier,
            Self::Version(version) => &version.content_info.content_type_identifier,
            Self::ContentCreate(create) => &create.content_type_identifier,
        }
    }

    /// The section identifier of the object.
    pub fn section_identifier(&self) -> &str {
        match self {
            Self::Content(info) => &info.section_identifier,
            Self::Version(version) => &version.content_info.section_identifier,
            Self::ContentCreate(create) => &create.section_identifier,
        }
    }

    /// The owner of the object, if known.
    pub fn owner_id(&self) -> Option<UserId> {
        match self {
            Self::Content(info) => Some(info.owner_id),
            Self::Version(version) => Some(version.content_info.owner_id),
            Self::ContentCreate(create) => create.owner_id,
        }
    }

    /// The translations the object carries.
    ///
    /// For a content create request this includes the main language.
    pub fn language_codes(&self) -> BTreeSet<&str> {
        match self {
            Self::Content(info) => info.language_codes.iter().map(String::as_str).collect(),
            Self::Version(version) => version.language_codes.iter().map(String::as_str).collect(),
            Self::ContentCreate(create) => create
                .language_codes
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(create.main_language_code.as_str()))
                .collect(),
        }
    }

    /// Location path strings of the object. Empty for content that has
    /// not been placed yet.
    pub fn location_paths(&self) -> &[String] {
        match self {
            Self::Content(info) => &info.location_paths,
            Self::Version(version) => &version.content_info.location_paths,
            Self::ContentCreate(_) => &[],
        }
    }
}

impl From<ContentInfo> for PermissionObject {
    fn from(info: ContentInfo) -> Self {
        Self::Content(info)
    }
}

impl From<VersionInfo> for PermissionObject {
    fn from(version: VersionInfo) -> Self {
        Self::Version(version)
    }
}

impl From<ContentCreateStruct> for PermissionObject {
    fn from(create: ContentCreateStruct) -> Self {
        Self::ContentCreate(create)
    }
}

impl fmt::Display for PermissionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content(info) => write!(f, "Content #{}", info.id),
            Self::Version(version) => write!(
                f,
                "Version {} of content #{} ({})",
                version.version_no, version.content_info.id, version.status
            ),
            Self::ContentCreate(create) => {
                write!(f, "New '{}' content", create.content_type_identifier)
            }
        }
    }
}
