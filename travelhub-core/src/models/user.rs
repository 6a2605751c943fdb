//! Account field validation
//!
//! Usernames are unique login handles, nicknames are display names,
//! passwords must satisfy the complexity policy before they are hashed.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::validation::required_text;
use super::ValidationError;

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 80;
const MAX_NICKNAME_LEN: usize = 80;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 13;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("invalid username regex"));

static LOWER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").expect("invalid regex"));
static UPPER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("invalid regex"));
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("invalid regex"));
static SYMBOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("invalid regex"));

/// Validated login name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// # Example
    /// ```
    /// use travelhub_core::models::Username;
    ///
    /// assert!(Username::new("alice_01").is_ok());
    /// assert!(Username::new("al").is_err());       // too short
    /// assert!(Username::new("al ice").is_err());   // space
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }
        if s.chars().count() < MIN_USERNAME_LEN {
            return Err(ValidationError::TooShort {
                field: "username",
                min: MIN_USERNAME_LEN,
            });
        }
        if s.chars().count() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }
        if !USERNAME_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "only letters, digits, '.', '_' and '-' are allowed",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name shown next to reviews
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nickname(String);

impl Nickname {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text(s, "nickname", MAX_NICKNAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Plaintext password that passed the complexity policy.
///
/// `Debug` is redacted so the value never reaches logs.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// Check the complexity policy: 8 to 13 characters with at least one
    /// lowercase letter, uppercase letter, digit and non-alphanumeric
    /// character.
    ///
    /// # Example
    /// ```
    /// use travelhub_core::models::Password;
    ///
    /// assert!(Password::new("Abcdef1!").is_ok());
    /// assert!(Password::new("abc").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        let len = s.chars().count();
        if len < MIN_PASSWORD_LEN {
            return Err(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }
        if len > MAX_PASSWORD_LEN {
            return Err(ValidationError::TooLong {
                field: "password",
                max: MAX_PASSWORD_LEN,
            });
        }

        let checks: [(&Lazy<Regex>, &'static str); 4] = [
            (&LOWER_RE, "must contain a lowercase letter"),
            (&UPPER_RE, "must contain an uppercase letter"),
            (&DIGIT_RE, "must contain a digit"),
            (&SYMBOL_RE, "must contain a special character"),
        ];
        for (re, reason) in checks {
            if !re.is_match(s) {
                return Err(ValidationError::InvalidFormat {
                    field: "password",
                    reason,
                });
            }
        }

        Ok(Self(s.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}
