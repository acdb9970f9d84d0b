//! Identifier types for portal-billing.
//!
//! # Macro-based ID Types
//!
//! The `opaque_id_type!` macro reduces boilerplate for string-backed
//! identifier types, ensuring consistent implementation of serialization,
//! parsing, and display traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to define an opaque string identifier type with standard trait implementations.
///
/// This macro generates a newtype wrapper around `String` with implementations for:
/// - `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `Serialize`, `Deserialize` (as string)
/// - `FromStr`, `Display`, `Debug`
/// - `TryFrom<String>`, `Into<String>`
/// - `AsRef<str>`
///
/// # Example
///
/// ```ignore
/// opaque_id_type!(MyId, "A custom identifier type.");
/// let id: MyId = "abc_123".parse().unwrap();
/// ```
macro_rules! opaque_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier, validating its characters.
            ///
            /// # Errors
            ///
            /// Returns an error if the value is empty or contains characters
            /// other than ASCII alphanumerics, `_` and `-`.
            pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                validate_opaque(&value)?;
                Ok(Self(value))
            }

            /// Return the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id_type!(CustomerId, "A Stripe customer identifier (e.g. `cus_...`).");
opaque_id_type!(PriceId, "A Stripe price identifier (e.g. `price_...`).");
opaque_id_type!(ProductId, "A Stripe product identifier (e.g. `prod_...`).");
opaque_id_type!(
    ApplicationId,
    "A portal application identifier.\n\nStored on Stripe resources as `kong_application_id` metadata."
);

fn validate_opaque(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }

    match value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        Some(c) => Err(IdError::InvalidCharacter(c)),
        None => Ok(()),
    }
}

/// A customer email address.
///
/// Only the shape needed to embed the address safely in a Stripe search
/// query is checked: one `@` with non-empty parts, no whitespace, no single
/// quote (the query language delimits values with `'`) and no backslash
/// (its escape character).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Create a new email address.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidEmail`] if the address is malformed.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();

        let mut parts = value.split('@');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
        );

        let unsafe_char = value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');

        if !well_formed || unsafe_char {
            return Err(IdError::InvalidEmail(value));
        }

        Ok(Self(value))
    }

    /// Return the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Email {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Email({})", self.0)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The identifier is empty.
    #[error("identifier must not be empty")]
    Empty,

    /// The identifier contains a character that is not allowed.
    #[error("invalid character in identifier: {0:?}")]
    InvalidCharacter(char),

    /// The input is not a usable email address.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}
