//! Limitation model.
//!
//! A limitation is stored as an identifier plus an ordered list of string
//! values. How the values are interpreted depends on the evaluator the
//! identifier resolves to in the
//! [`LimitationService`](crate::limitation::LimitationService).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the language limitation.
pub const LANGUAGE: &str = "Language";

/// Identifier of the content type limitation.
pub const CONTENT_TYPE: &str = "Class";

/// Identifier of the section limitation.
pub const SECTION: &str = "Section";

/// Identifier of the owner limitation.
pub const OWNER: &str = "Owner";

/// Identifier of the subtree limitation.
pub const SUBTREE: &str = "Subtree";

/// Owner limitation value meaning "the current user".
pub const OWNER_SELF: &str = "1";

/// Owner limitation value meaning "the session owner". Evaluated like
/// [`OWNER_SELF`].
pub const OWNER_SESSION: &str = "2";

/// A typed rule narrowing a policy to specific objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Limitation {
    /// The identifier selecting the evaluator.
    pub identifier: String,

    /// The accepted values.
    #[serde(default)]
    pub values: Vec<String>,
}

impl Limitation {
    /// Create a limitation with an arbitrary identifier.
    pub fn new<I, V>(identifier: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Limit to translations in the given language codes.
    pub fn language<I, V>(codes: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(LANGUAGE, codes)
    }

    /// Limit to content of the given content type identifiers.
    pub fn content_type<I, V>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(CONTENT_TYPE, identifiers)
    }

    /// Limit to content in the given sections.
    pub fn section<I, V>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(SECTION, identifiers)
    }

    /// Limit to content owned by the current user.
    pub fn owner_self() -> Self {
        Self::new(OWNER, [OWNER_SELF])
    }

    /// Limit to content located below the given path strings.
    pub fn subtree<I, V>(path_strings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(SUBTREE, path_strings)
    }

    /// Check whether `value` is one of the accepted values.
    pub fn accepts_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

impl fmt::Display for Limitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.identifier)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}
