//! Contact form validation
//!
//! Pure format checks for the contact page. Nothing is stored or sent.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

const NAME_MIN_CHARS: usize = 2;
const MESSAGE_MIN_CHARS: usize = 10;
const MESSAGE_MAX_CHARS: usize = 1000;

/// Submitted contact form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Phone number, optional
    #[serde(default)]
    pub phone: String,

    /// Selected subject
    pub subject: String,

    /// Message body
    pub message: String,
}

/// Contact form fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    /// First name
    FirstName,

    /// Last name
    LastName,

    /// Email address
    Email,

    /// Phone number
    Phone,

    /// Subject
    Subject,

    /// Message body
    Message,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContactField::FirstName => "first name",
            ContactField::LastName => "last name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Subject => "subject",
            ContactField::Message => "message",
        })
    }
}

/// Why a single field failed validation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ContactFieldError {
    /// Required but blank
    #[error("This field is required")]
    Required,

    /// Name shorter than two characters
    #[error("Must be at least 2 characters")]
    NameTooShort,

    /// Name containing anything but letters and spaces
    #[error("Only letters and spaces allowed")]
    NameCharacters,

    /// Malformed email address
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Not a Pakistani phone number
    #[error("Please enter a valid Pakistani phone number (e.g., +92XXXXXXXXXX or 0XXXXXXXXXX)")]
    InvalidPhone,

    /// Message under ten characters
    #[error("Message must be at least 10 characters")]
    MessageTooShort,

    /// Message over a thousand characters
    #[error("Message must be less than 1000 characters")]
    MessageTooLong,
}

/// Every failing field of a submitted form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{} contact form field(s) invalid", .errors.len())]
pub struct ContactErrors {
    /// Failing fields with their reasons, in form order
    pub errors: SmallVec<[(ContactField, ContactFieldError); 6]>,
}

impl ContactErrors {
    /// The error for a given field, if it failed.
    pub fn get(&self, field: ContactField) -> Option<ContactFieldError> {
        self.errors
            .iter()
            .find(|(failed, _)| *failed == field)
            .map(|(_, err)| *err)
    }
}

/// Validates contact form submissions.
#[derive(Debug, Clone)]
pub struct ContactValidator {
    name: Regex,
    email: Regex,
    phone: Regex,
}

impl ContactValidator {
    /// Compile the field patterns.
    ///
    /// # Errors
    ///
    /// Returns a [`regex::Error`] if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            name: Regex::new(r"^[a-zA-Z\s]+$")?,
            email: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?,
            phone: Regex::new(r"^(\+92|0)[0-9]{10}$")?,
        })
    }

    /// Validate a submission, reporting every failing field.
    ///
    /// Values are trimmed before checking. The phone number is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ContactErrors`] listing each invalid field.
    pub fn validate(&self, form: &ContactForm) -> Result<(), ContactErrors> {
        let checks = [
            (ContactField::FirstName, self.check_name(&form.first_name)),
            (ContactField::LastName, self.check_name(&form.last_name)),
            (ContactField::Email, self.check_email(&form.email)),
            (ContactField::Phone, self.check_phone(&form.phone)),
            (ContactField::Subject, check_required(&form.subject)),
            (ContactField::Message, check_message(&form.message)),
        ];

        let errors: SmallVec<[(ContactField, ContactFieldError); 6]> = checks
            .into_iter()
            .filter_map(|(field, result)| result.err().map(|err| (field, err)))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ContactErrors { errors })
        }
    }

    /// Check a first or last name.
    ///
    /// # Errors
    ///
    /// Returns the reason the name is invalid.
    pub fn check_name(&self, value: &str) -> Result<(), ContactFieldError> {
        let value = required(value)?;

        if value.chars().count() < NAME_MIN_CHARS {
            return Err(ContactFieldError::NameTooShort);
        }

        if !self.name.is_match(value) {
            return Err(ContactFieldError::NameCharacters);
        }

        Ok(())
    }

    /// Check an email address.
    ///
    /// # Errors
    ///
    /// Returns the reason the address is invalid.
    pub fn check_email(&self, value: &str) -> Result<(), ContactFieldError> {
        let value = required(value)?;

        if self.email.is_match(value) {
            Ok(())
        } else {
            Err(ContactFieldError::InvalidEmail)
        }
    }

    /// Check an optional phone number; whitespace inside the number is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ContactFieldError::InvalidPhone`] for a non-blank, malformed number.
    pub fn check_phone(&self, value: &str) -> Result<(), ContactFieldError> {
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();

        if compact.is_empty() || self.phone.is_match(&compact) {
            Ok(())
        } else {
            Err(ContactFieldError::InvalidPhone)
        }
    }
}

fn required(value: &str) -> Result<&str, ContactFieldError> {
    let value = value.trim();

    if value.is_empty() {
        Err(ContactFieldError::Required)
    } else {
        Ok(value)
    }
}

fn check_required(value: &str) -> Result<(), ContactFieldError> {
    required(value).map(|_| ())
}

fn check_message(value: &str) -> Result<(), ContactFieldError> {
    let chars = required(value)?.chars().count();

    if chars < MESSAGE_MIN_CHARS {
        Err(ContactFieldError::MessageTooShort)
    } else if chars > MESSAGE_MAX_CHARS {
        Err(ContactFieldError::MessageTooLong)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            first_name: "Ayesha".to_string(),
            last_name: "Khan".to_string(),
            email: "ayesha@example.com".to_string(),
            phone: String::new(),
            subject: "order".to_string(),
            message: "Where is my parcel?".to_string(),
        }
    }

    #[test]
    fn valid_form_without_phone_passes() -> TestResult {
        ContactValidator::new()?.validate(&form())?;

        Ok(())
    }

    #[test]
    fn pakistani_numbers_with_spaces_pass() -> TestResult {
        let validator = ContactValidator::new()?;

        assert_eq!(validator.check_phone("+92 300 1234567"), Ok(()));
        assert_eq!(validator.check_phone("0300 1234567"), Ok(()));
        assert_eq!(
            validator.check_phone("12345"),
            Err(ContactFieldError::InvalidPhone)
        );

        Ok(())
    }

    #[test]
    fn name_rules() -> TestResult {
        let validator = ContactValidator::new()?;

        assert_eq!(validator.check_name(" "), Err(ContactFieldError::Required));
        assert_eq!(validator.check_name("A"), Err(ContactFieldError::NameTooShort));
        assert_eq!(
            validator.check_name("R2D2"),
            Err(ContactFieldError::NameCharacters)
        );
        assert_eq!(validator.check_name("Mary Jane"), Ok(()));

        Ok(())
    }

    #[test]
    fn email_rules() -> TestResult {
        let validator = ContactValidator::new()?;

        assert_eq!(validator.check_email("no-at-sign.com"), Err(ContactFieldError::InvalidEmail));
        assert_eq!(validator.check_email("a@b"), Err(ContactFieldError::InvalidEmail));
        assert_eq!(validator.check_email(" a@b.pk "), Ok(()));

        Ok(())
    }

    #[test]
    fn message_length_bounds() {
        assert_eq!(check_message("too short"), Err(ContactFieldError::MessageTooShort));
        assert_eq!(check_message(&"x".repeat(10)), Ok(()));
        assert_eq!(check_message(&"x".repeat(1000)), Ok(()));
        assert_eq!(
            check_message(&"x".repeat(1001)),
            Err(ContactFieldError::MessageTooLong)
        );
    }

    #[test]
    fn every_failing_field_is_reported_in_order() -> TestResult {
        let validator = ContactValidator::new()?;
        let form = ContactForm {
            first_name: String::new(),
            email: "nope".to_string(),
            subject: "  ".to_string(),
            ..form()
        };

        let Err(errors) = validator.validate(&form) else {
            return Err("expected validation to fail".into());
        };

        let fields: Vec<ContactField> = errors.errors.iter().map(|(field, _)| *field).collect();

        assert_eq!(
            fields,
            vec![ContactField::FirstName, ContactField::Email, ContactField::Subject]
        );
        assert_eq!(
            errors.get(ContactField::Subject),
            Some(ContactFieldError::Required)
        );
        assert_eq!(errors.get(ContactField::Message), None);

        Ok(())
    }
}
