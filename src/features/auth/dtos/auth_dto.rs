use serde::Deserialize;
use validator::Validate;

/// Registration form
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterFormDto {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// "patient" or "admin"
    #[serde(default)]
    pub role: String,
}

/// Login form
#[derive(Debug, Deserialize, Validate)]
pub struct LoginFormDto {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_form_validation() {
        let valid = RegisterFormDto {
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
            role: "patient".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterFormDto {
            email: "not-an-email".to_string(),
            ..valid
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        let dto = LoginFormDto {
            email: "ana@example.com".to_string(),
            password: String::new(),
        };
        assert!(dto.validate().is_err());
    }
}
