use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Lifecycle status shared by chat and devis requests.
///
/// Stored as a plain string column ("pending" / "validated" / "refused").
/// `pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Validated,
    Refused,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Validated => "validated",
            RequestStatus::Refused => "refused",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "pending" => Ok(RequestStatus::Pending),
            "validated" => Ok(RequestStatus::Validated),
            "refused" => Ok(RequestStatus::Refused),
            other => Err(AppError::Validation(format!(
                "Invalid status '{}'. Must be one of: pending, validated, refused",
                other
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Validate a status transition.
    ///
    /// Only `validated` and `refused` are acceptable targets, and only a
    /// pending request may move at all.
    pub fn transition(current: Self, requested: Self) -> Result<Self, AppError> {
        if requested == RequestStatus::Pending {
            return Err(AppError::Validation(
                "New status must be 'validated' or 'refused'".to_string(),
            ));
        }
        if current.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Request is already {}",
                current.as_str()
            )));
        }
        Ok(requested)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_values() {
        assert_eq!(
            RequestStatus::parse("pending").unwrap(),
            RequestStatus::Pending
        );
        assert_eq!(
            RequestStatus::parse("validated").unwrap(),
            RequestStatus::Validated
        );
        assert_eq!(
            RequestStatus::parse("refused").unwrap(),
            RequestStatus::Refused
        );
    }

    #[test]
    fn parse_unknown_value_fails() {
        assert!(RequestStatus::parse("approved").is_err());
        assert!(RequestStatus::parse("").is_err());
        assert!(RequestStatus::parse("PENDING").is_err());
    }

    #[test]
    fn pending_can_be_validated() {
        let next =
            RequestStatus::transition(RequestStatus::Pending, RequestStatus::Validated).unwrap();
        assert_eq!(next, RequestStatus::Validated);
    }

    #[test]
    fn pending_can_be_refused() {
        let next =
            RequestStatus::transition(RequestStatus::Pending, RequestStatus::Refused).unwrap();
        assert_eq!(next, RequestStatus::Refused);
    }

    #[test]
    fn pending_is_not_a_valid_target() {
        assert!(RequestStatus::transition(RequestStatus::Pending, RequestStatus::Pending).is_err());
    }

    #[test]
    fn terminal_states_reject_further_transitions() {
        assert!(
            RequestStatus::transition(RequestStatus::Validated, RequestStatus::Refused).is_err()
        );
        assert!(
            RequestStatus::transition(RequestStatus::Refused, RequestStatus::Validated).is_err()
        );
        assert!(
            RequestStatus::transition(RequestStatus::Validated, RequestStatus::Validated).is_err()
        );
    }

    #[test]
    fn round_trip_as_str() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Validated,
            RequestStatus::Refused,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()).unwrap(), status);
        }
    }
}
