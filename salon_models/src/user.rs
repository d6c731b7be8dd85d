use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Digits-only phone number with the country code applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Strips everything but digits. A bare 10-digit local number gets
    /// `default_country_code` prefixed. Returns `None` when no digits remain.
    pub fn normalize(raw: &str, default_country_code: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        match digits.len() {
            0 => None,
            10 => Some(Self(format!("{default_country_code}{digits}"))),
            _ => Some(Self(digits)),
        }
    }

    /// Wraps a value that was normalized before it was stored.
    pub fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub phone: Option<PhoneNumber>,
    pub email: Option<String>,
    pub is_admin: bool,
    /// UTC.
    pub created_at: NaiveDateTime,
}
