//! Subtree limitation. Usable on policies and on role assignments.
//!
//! Values are location path strings such as `/1/2/42/`. Location targets
//! (e.g. the parent of new content, or a move destination) replace the
//! object's own locations, and every one of them must lie below an allowed
//! path. Without location targets, one object location below an allowed
//! path suffices.

use ezp_core::error::{LimitationError, Result};
use lazy_static::lazy_static;
use regex::Regex;

use super::{AccessVote, EvaluationInput};
use crate::model::Limitation;

lazy_static! {
    static ref PATH_STRING: Regex = Regex::new(r"^/(\d+/)+$").unwrap();
}

pub(super) fn validate(limitation: &Limitation) -> Result<()> {
    for value in &limitation.values {
        if !PATH_STRING.is_match(value) {
            return Err(LimitationError::InvalidValue {
                identifier: limitation.identifier.clone(),
                value: value.clone(),
                reason: "expected a path string like /1/2/".to_string(),
            }
            .into());
        }
    }
    Ok(())
}

pub(super) fn evaluate(values: &[String], input: &EvaluationInput<'_>) -> AccessVote {
    let below = |path: &str| values.iter().any(|value| path.starts_with(value.as_str()));

    let targets: Vec<&str> = input
        .location_targets()
        .map(|target| target.path_string.as_str())
        .collect();
    if !targets.is_empty() {
        return targets.into_iter().all(below).into();
    }

    let locations = input.object.location_paths();
    // Nothing placed anywhere yet: the subtree cannot be judged.
    if locations.is_empty() {
        return AccessVote::Abstain;
    }

    locations.iter().any(|path| below(path.as_str())).into()
}
