//! Contact form submission and its validation rules.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;

use crate::config::LimitsConfig;

/// Local part, a domain starting with an alphanumeric, and a 2-63 letter TLD.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9][a-zA-Z0-9.\-]*\.[a-zA-Z]{2,63}$")
        .expect("email regex is valid")
});

/// A contact form submission as posted by the site.
///
/// Missing fields decode as empty strings and are reported by
/// [`validate`] as required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Why a submission was rejected. The `Display` text is returned to the
/// client verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Message is required")]
    MessageRequired,
    #[error("Name is too long")]
    NameTooLong,
    #[error("Email is too long")]
    EmailTooLong,
    #[error("Message is too long")]
    MessageTooLong,
    #[error("Invalid email format")]
    InvalidEmail,
}

/// Trim `submission` in place and check it. The first failing rule wins:
/// presence, then length, then email format.
pub fn validate(submission: &mut Submission, limits: &LimitsConfig) -> Result<(), ValidationError> {
    trim_in_place(&mut submission.name);
    trim_in_place(&mut submission.email);
    trim_in_place(&mut submission.message);

    if submission.name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if submission.email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if submission.message.is_empty() {
        return Err(ValidationError::MessageRequired);
    }

    if submission.name.len() > limits.max_name_len {
        return Err(ValidationError::NameTooLong);
    }
    if submission.email.len() > limits.max_email_len {
        return Err(ValidationError::EmailTooLong);
    }
    if submission.message.len() > limits.max_message_len {
        return Err(ValidationError::MessageTooLong);
    }

    if !EMAIL_REGEX.is_match(&submission.email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}
