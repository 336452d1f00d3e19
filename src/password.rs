//! Password strength checks and bcrypt hashing.
//!
//! Raw passwords only live as long as a request. A password is checked with
//! zxcvbn to become a [ValidatedPassword], and only its [PasswordHash] is
//! ever stored.

use std::fmt;

use bcrypt::BcryptError;
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A password strong enough to use, not yet hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password`.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] carrying zxcvbn's suggestions if the password
    /// scores below three out of four.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, &[]);

        if matches!(analysis.score(), Score::Three | Score::Four) {
            return Ok(Self(raw_password.to_owned()));
        }

        let feedback = analysis
            .feedback()
            .map(ToString::to_string)
            .unwrap_or_default();

        Err(Error::TooWeak(feedback))
    }

    /// Skip the strength check. For seeding development and test databases.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl fmt::Display for ValidatedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("********")
    }
}

/// A salted bcrypt hash, the only form of a password that is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// bcrypt's recommended cost.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` bcrypt rounds.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails, e.g. for a cost outside 4..=31.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read back from the database.
    pub fn new_unchecked(hash: &str) -> Self {
        Self(hash.to_owned())
    }

    /// Whether `raw_password` is the password this hash was made from.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        bcrypt::verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
