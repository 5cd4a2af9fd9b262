//! Field validation for incoming submissions.

use lettre::Address;
use thiserror::Error;

use crate::submission::types::{RawSubmission, Submission};

/// Minimum number of digits a phone number must carry.
const MIN_PHONE_DIGITS: usize = 7;

/// A required submission field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Email => write!(f, "email"),
            Field::Phone => write!(f, "phone"),
        }
    }
}

/// Why a submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(Field),

    #[error("email is not a valid address")]
    InvalidEmail,

    #[error("phone is not a valid number")]
    InvalidPhone,
}

/// Validate a raw payload into an immutable [`Submission`].
///
/// Pure check: no clock, no I/O. Fields are trimmed; name, email and
/// phone must be present, the business name may be blank.
pub fn validate(raw: &RawSubmission) -> Result<Submission, ValidationError> {
    let name = raw.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Missing(Field::Name));
    }

    let email = raw.email.trim();
    if email.is_empty() {
        return Err(ValidationError::Missing(Field::Email));
    }

    let phone = raw.phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::Missing(Field::Phone));
    }

    if email.parse::<Address>().is_err() {
        return Err(ValidationError::InvalidEmail);
    }

    if !phone_shape_ok(phone) {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(Submission {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        business_name: raw.business_name.trim().to_string(),
    })
}

/// Permissive phone check: digits plus common grouping characters,
/// with enough digits to plausibly be a number.
fn phone_shape_ok(phone: &str) -> bool {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '(' | ')' | '-' | '.');
    if !phone.chars().all(allowed) {
        return false;
    }
    phone.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}
