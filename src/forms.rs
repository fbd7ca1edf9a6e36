//! Client-side validation of the login and registration forms.
//!
//! A form that fails validation never reaches the network. The error's
//! `Display` text is the alert shown to the user.

use crate::api::{Credentials, Registration};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill up all the fields")]
    EmptyField,
    #[error("Password doesn't match")]
    PasswordMismatch,
    #[error("Age must be a number")]
    InvalidAge,
}

/// Only the empty string is blank; whitespace is sent as typed.
fn blank(value: &str) -> bool {
    value.is_empty()
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// [`ValidationError::EmptyField`] if either field is blank.
    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        if blank(&self.username) || blank(&self.password) {
            return Err(ValidationError::EmptyField);
        }
        Ok(Credentials { username: self.username.clone(), password: self.password.clone() })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub password_verify: String,
    pub fullname: String,
    /// Raw text as typed; parsed during validation.
    pub age: String,
}

impl RegistrationForm {
    /// Checks run in order: password confirmation, required fields, age.
    ///
    /// # Errors
    ///
    /// The first [`ValidationError`] found.
    pub fn validate(&self) -> Result<Registration, ValidationError> {
        if self.password != self.password_verify {
            return Err(ValidationError::PasswordMismatch);
        }
        if [&self.username, &self.fullname, &self.age, &self.password]
            .iter()
            .any(|field| blank(field))
        {
            return Err(ValidationError::EmptyField);
        }
        let age = self
            .age
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidAge)?;

        Ok(Registration {
            username: self.username.clone(),
            password: self.password.clone(),
            fullname: self.fullname.clone(),
            age,
        })
    }
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
