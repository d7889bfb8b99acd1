//! Owner limitation.
//!
//! Both accepted values mean "content owned by the current user"; the
//! session-owner value is kept for stored policies that still use it.

use ezp_core::error::{LimitationError, Result};

use super::{AccessVote, EvaluationInput};
use crate::model::limitation::{OWNER_SELF, OWNER_SESSION};
use crate::model::Limitation;

pub(super) fn validate(limitation: &Limitation) -> Result<()> {
    for value in &limitation.values {
        if value != OWNER_SELF && value != OWNER_SESSION {
            return Err(LimitationError::InvalidValue {
                identifier: limitation.identifier.clone(),
                value: value.clone(),
                reason: format!("expected '{}' or '{}'", OWNER_SELF, OWNER_SESSION),
            }
            .into());
        }
    }
    Ok(())
}

pub(super) fn evaluate(values: &[String], input: &EvaluationInput<'_>) -> AccessVote {
    if !values
        .iter()
        .any(|value| value == OWNER_SELF || value == OWNER_SESSION)
    {
        return AccessVote::Denied;
    }

    match input.object.owner_id() {
        Some(owner_id) => (owner_id == input.user.user_id).into(),
        // New content without explicit owner is owned by its creator.
        None => AccessVote::Granted,
    }
}
