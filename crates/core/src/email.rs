//! Normalised email address, the global login key.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A syntactically valid, normalised email address.
///
/// Normalisation trims surrounding whitespace and lower-cases the whole
/// address, so uniqueness checks are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalised = raw.trim().to_lowercase();

        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(DomainError::validation("email must contain '@'"));
        };
        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::validation("email local part and domain must be non-empty"));
        }
        if domain.contains('@') {
            return Err(DomainError::validation("email must contain exactly one '@'"));
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("email must not contain whitespace"));
        }

        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Email {}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}


#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: case and surrounding whitespace never produce a distinct login key.
        #[test]
        fn case_variants_normalise_to_the_same_key(
            local in "[a-z0-9._]{1,16}",
            domain in "[a-z0-9]{1,12}\\.[a-z]{2,6}",
        ) {
            let lower = Email::parse(&format!("{local}@{domain}")).unwrap();
            let shouted = Email::parse(&format!("  {}@{} ", local.to_uppercase(), domain.to_uppercase())).unwrap();
            prop_assert_eq!(lower, shouted);
        }
    }
}
