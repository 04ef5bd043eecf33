//! The contact record and the field sets used to create and change it.

use std::fmt;

use serde::Serialize;

/// Stable identifier of a contact. Assigned once, never reused.
pub type ContactId = u64;

/// A stored contact.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub age: u32,
}

/// Raw fields for a new contact, as submitted by a client.
///
/// `age` stays a string until the store validates it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub age: String,
}

impl ContactFields {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), age: age.into() }
    }
}

/// A partial update. `None` leaves the stored value as it is.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<String>,
}

/// Why a contact operation was refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContactError {
    /// A field failed validation, or the request body could not be decoded.
    Validation(String),
    /// No live contact has this id: it was never assigned or has been deleted.
    NotFound(ContactId),
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => f.write_str(msg),
            Self::NotFound(id)    => write!(f, "no contact with id {id}"),
        }
    }
}

impl std::error::Error for ContactError {}

/// Parses an age: a non-negative whole number, surrounding whitespace allowed.
pub fn parse_age(raw: &str) -> Result<u32, ContactError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ContactError::Validation("age must be a number".to_owned()));
    }
    trimmed
        .parse()
        .map_err(|_| ContactError::Validation("age is out of range".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_padded_numbers() {
        assert_eq!(parse_age("30"), Ok(30));
        assert_eq!(parse_age(" 41 "), Ok(41));
        assert_eq!(parse_age("0"), Ok(0));
    }

    #[test]
    fn rejects_non_numeric_ages() {
        for bad in ["", "  ", "thirty", "-3", "+3", "3.5", "1e2"] {
            assert_eq!(
                parse_age(bad),
                Err(ContactError::Validation("age must be a number".to_owned())),
                "{bad:?} should be rejected",
            );
        }
    }

    #[test]
    fn rejects_ages_that_overflow() {
        assert!(matches!(parse_age("99999999999"), Err(ContactError::Validation(_))));
    }
}
