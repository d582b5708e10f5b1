//! Registration password policy.

use bikeshop_core::config::auth::AuthConfig;
use bikeshop_core::error::AppError;

/// Rules a new password must satisfy.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
}

impl PasswordPolicy {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Checks the password and its confirmation field.
    pub fn validate(&self, password: &str, confirmation: &str) -> Result<(), AppError> {
        if password != confirmation {
            return Err(AppError::validation("Passwords do not match"));
        }
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy() {
        let policy = PasswordPolicy::new(&AuthConfig::default());
        assert!(policy.validate("secret1", "secret1").is_ok());
        assert!(policy.validate("secret1", "secret2").is_err());
        assert!(policy.validate("abc", "abc").is_err());
    }
}
