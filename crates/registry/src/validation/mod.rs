//! Registration input validation.
//!
//! Runs before any storage access. Every field is checked and all failures are
//! reported together, in request field order (`name`, `email`, `phone`).
//! Successful validation also produces the canonical values that get stored:
//! the trimmed name and the normalized email.

pub mod email;

use common::protocol::RegisterStudentRequest;
use common::{FieldError, RegistryError};

/// Minimum name length, in characters, after trimming.
pub const NAME_MIN_CHARS: usize = 3;
/// Exact number of ASCII digits in a phone number.
pub const PHONE_DIGITS: usize = 10;

pub const NAME_MESSAGE: &str = "Name must be at least 3 characters long";
pub const EMAIL_MESSAGE: &str = "Please provide a valid email";
pub const PHONE_MESSAGE: &str = "Phone number must be 10 digits";

/// A registration candidate whose fields passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidStudent {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Check a registration request and canonicalise its fields.
///
/// Absent fields are treated as empty strings.
///
/// # Errors
///
/// Returns [`RegistryError::Validation`] listing every rejected field.
pub fn validate(req: &RegisterStudentRequest) -> Result<ValidStudent, RegistryError> {
    let mut errors = Vec::new();

    let name = req.name.as_deref().unwrap_or_default().trim();
    if name.chars().count() < NAME_MIN_CHARS {
        errors.push(FieldError::new("name", NAME_MESSAGE));
    }

    let raw_email = req.email.as_deref().unwrap_or_default();
    let email = if email::is_valid(raw_email) {
        email::normalize(raw_email)
    } else {
        None
    };
    if email.is_none() {
        errors.push(FieldError::new("email", EMAIL_MESSAGE));
    }

    let phone = req.phone.as_deref().unwrap_or_default();
    if !is_valid_phone(phone) {
        errors.push(FieldError::new("phone", PHONE_MESSAGE));
    }

    match email {
        Some(email) if errors.is_empty() => Ok(ValidStudent {
            name: name.to_owned(),
            email,
            phone: phone.to_owned(),
        }),
        _ => Err(RegistryError::Validation(errors)),
    }
}

fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit())
}
