//! Section limitation. Usable on policies and on role assignments.

use ezp_core::error::{LimitationError, Result};

use super::{AccessVote, EvaluationInput};
use crate::model::Limitation;

pub(super) fn validate(limitation: &Limitation) -> Result<()> {
    for value in &limitation.values {
        if value.trim().is_empty() || value.chars().any(char::is_whitespace) {
            return Err(LimitationError::InvalidValue {
                identifier: limitation.identifier.clone(),
                value: value.clone(),
                reason: "section identifiers cannot contain whitespace".to_string(),
            }
            .into());
        }
    }
    Ok(())
}

pub(super) fn evaluate(values: &[String], input: &EvaluationInput<'_>) -> AccessVote {
    let section = input.object.section_identifier();
    values.iter().any(|value| value == section).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentInfo, PermissionObject, UserReference};
    use ezp_core::id::UserId;

    #[test]
    fn test_section_membership() {
        let user = UserReference::with_login("editor");
        let object = PermissionObject::Content(ContentInfo::new(
            5,
            "image",
            "media",
            UserId::new(),
            "eng-GB",
        ));
        let input = EvaluationInput::new(&user, &object, &[]);

        assert_eq!(
            evaluate(&["standard".to_string(), "media".to_string()], &input),
            AccessVote::Granted
        );
        assert_eq!(evaluate(&["standard".to_string()], &input), AccessVote::Denied);
    }

    #[test]
    fn test_validate() {
        assert!(validate(&Limitation::section(["media"])).is_ok());
        assert!(validate(&Limitation::section(["my section"])).is_err());
        assert!(validate(&Limitation::section([" "])).is_err());
    }
}
