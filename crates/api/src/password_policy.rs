// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation.
//!
//! Applies to every password set through the API: office bootstrap,
//! provisioned principals and graduate self-registration.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password does not meet complexity requirements.
    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password equals an identifying value of the account.
    #[error("Password must not match the {field}")]
    MatchesForbiddenField { field: String },

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Identifying values a password may not equal.
#[derive(Debug, Clone, Copy)]
pub struct AccountIdentity<'a> {
    /// The login email.
    pub email: &'a str,
    /// The principal's display name.
    pub display_name: &'a str,
}

impl AccountIdentity<'_> {
    fn forbidden_values(&self) -> [(&'static str, String); 3] {
        let email: String = self.email.trim().to_lowercase();
        let local_part: String = email
            .split_once('@')
            .map_or_else(|| email.clone(), |(local, _)| local.to_string());
        [
            ("email", email),
            ("email name", local_part),
            ("display name", self.display_name.trim().to_lowercase()),
        ]
    }
}

/// Password policy configuration.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    /// Minimum password length in characters.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            min_complexity: 3,
        }
    }
}

impl PasswordPolicy {
    /// Validates a new password.
    ///
    /// Checks run in order: confirmation, length, complexity, then the
    /// identifying values (case-insensitive).
    ///
    /// # Arguments
    ///
    /// * `password` - The password to validate
    /// * `confirmation` - The password confirmation
    /// * `identity` - The account the password is for
    ///
    /// # Errors
    ///
    /// Returns the first policy requirement the password fails.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        identity: AccountIdentity<'_>,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let complexity: usize = Self::calculate_complexity(password);
        if complexity < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found: complexity,
            });
        }

        let password_lower: String = password.to_lowercase();
        for (field, value) in identity.forbidden_values() {
            if !value.is_empty() && password_lower == value {
                return Err(PasswordPolicyError::MatchesForbiddenField {
                    field: field.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Counts the character classes present: uppercase, lowercase, digit
    /// and symbol.
    fn calculate_complexity(password: &str) -> usize {
        let classes: [bool; 4] = [
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_lowercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password
                .chars()
                .any(|c| c.is_ascii_graphic() && !c.is_ascii_alphanumeric()),
        ];
        classes.iter().filter(|present| **present).count()
    }
}
