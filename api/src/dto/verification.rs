//! Verification code DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// `data` payload of a `sendVerificationCode` call
///
/// Neither field is checked beyond being present and non-empty.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SendCodeRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
}

/// `result` payload of a successful call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendCodeResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        let valid = SendCodeRequest {
            email: "user@example.com".to_string(),
            code: "482913".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_code = SendCodeRequest {
            email: "user@example.com".to_string(),
            code: String::new(),
        };
        let errors = empty_code.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("code"));
    }

    #[test]
    fn test_email_format_not_checked() {
        let request = SendCodeRequest {
            email: "not-an-email".to_string(),
            code: "x".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
