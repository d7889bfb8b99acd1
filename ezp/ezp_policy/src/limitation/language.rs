//! Language limitation.
//!
//! Allowed values are language codes such as `eng-GB`.
//!
//! When a version target carries language intent, only that intent is
//! judged: translations to publish or update must all be allowed, and a
//! "translate to any of" list must contain at least one allowed code.
//! Without such intent the object's own translations must all be allowed.

use ezp_core::error::{LimitationError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

use super::{AccessVote, EvaluationInput};
use crate::model::{Limitation, VersionTarget};

lazy_static! {
    static ref LANGUAGE_CODE: Regex = Regex::new(r"^[a-z]{3}-[A-Z]{2}$").unwrap();
}

pub(super) fn validate(limitation: &Limitation) -> Result<()> {
    for value in &limitation.values {
        if !LANGUAGE_CODE.is_match(value) {
            return Err(LimitationError::InvalidValue {
                identifier: limitation.identifier.clone(),
                value: value.clone(),
                reason: "expected a language code like eng-GB".to_string(),
            }
            .into());
        }
    }
    Ok(())
}

pub(super) fn evaluate(values: &[String], input: &EvaluationInput<'_>) -> AccessVote {
    // No allowed languages authorizes no translation at all.
    if values.is_empty() {
        return AccessVote::Denied;
    }

    let allowed: BTreeSet<&str> = values.iter().map(String::as_str).collect();

    // A version target without language intent (e.g. a builder that was
    // never given translations) constrains nothing here; such targets are
    // skipped and the object's translations decide instead.
    let mut targets = input
        .version_targets()
        .filter(|target| target.has_language_constraints())
        .peekable();

    if targets.peek().is_some() {
        return targets.all(|target| version_target_allowed(&allowed, target)).into();
    }

    let codes = input.object.language_codes();
    if codes.is_empty() {
        return AccessVote::Abstain;
    }

    codes.iter().all(|code| allowed.contains(code)).into()
}

fn version_target_allowed(allowed: &BTreeSet<&str>, target: &VersionTarget) -> bool {
    let all_allowed =
        |codes: &BTreeSet<String>| codes.iter().all(|code| allowed.contains(code.as_str()));

    if let Some(codes) = &target.translations_to_publish {
        if !all_allowed(codes) {
            return false;
        }
    }

    if let Some(codes) = &target.update_translations {
        if !all_allowed(codes) {
            return false;
        }
    }

    if let Some(code) = &target.update_initial_language_code {
        if !allowed.contains(code.as_str()) {
            return false;
        }
    }

    if let Some(codes) = &target.all_language_codes {
        // An empty wish list restricts nothing.
        if !codes.is_empty() && !codes.iter().any(|code| allowed.contains(code.as_str())) {
            return false;
        }
    }

    true
}
