//! Content type limitation.

use ezp_core::error::{LimitationError, Result};
use lazy_static::lazy_static;
use regex::Regex;

use super::{AccessVote, EvaluationInput};
use crate::model::Limitation;

lazy_static! {
    static ref CONTENT_TYPE_IDENTIFIER: Regex = Regex::new(r"^[a-z][a-z0-9_]*$").unwrap();
}

pub(super) fn validate(limitation: &Limitation) -> Result<()> {
    match limitation
        .values
        .iter()
        .find(|value| !CONTENT_TYPE_IDENTIFIER.is_match(value))
    {
        Some(value) => Err(LimitationError::InvalidValue {
            identifier: limitation.identifier.clone(),
            value: value.clone(),
            reason: "expected a content type identifier like 'folder'".to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

pub(super) fn evaluate(values: &[String], input: &EvaluationInput<'_>) -> AccessVote {
    let allowed = |identifier: &str| values.iter().any(|value| value == identifier);

    let mut targets = input
        .version_targets()
        .filter_map(|target| target.all_content_types.as_ref())
        .peekable();

    if targets.peek().is_some() {
        return targets
            .all(|identifiers| identifiers.iter().all(|identifier| allowed(identifier)))
            .into();
    }

    allowed(input.object.content_type_identifier()).into()
}
