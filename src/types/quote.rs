use std::fmt;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Minimum length of a user-authored quote after trimming.
pub const USER_TEXT_MIN: usize = 4;

/// Maximum length of a user-authored quote after trimming.
pub const USER_TEXT_MAX: usize = 50;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuoteOrigin {
    Builtin,
    UserAuthored,
}

impl fmt::Display for QuoteOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => write!(f, "builtin"),
            Self::UserAuthored => write!(f, "user-authored"),
        }
    }
}

/// A displayable quote plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub origin: QuoteOrigin,
}

impl Quote {
    pub fn builtin(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: QuoteOrigin::Builtin,
        }
    }

    pub fn user_authored(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: QuoteOrigin::UserAuthored,
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.text)
    }
}

/// A user-authored quote record as held by the quote source.
#[derive(Debug, Clone)]
pub struct UserQuote {
    pub id: Uuid,
    pub text: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserQuote {
    /// Validates and creates a new record. The text must be 4–50 characters
    /// after trimming.
    pub fn new(text: &str) -> Result<Self> {
        let text = validate_user_text(text)?;

        Ok(Self {
            id: Uuid::new_v4(),
            text,
            is_active: true,
            created_at: Utc::now(),
        })
    }
}

pub fn validate_user_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.len() < USER_TEXT_MIN {
        bail!(
            "quote text too short: {} characters, minimum is {USER_TEXT_MIN}",
            trimmed.len()
        );
    }
    if trimmed.len() > USER_TEXT_MAX {
        bail!(
            "quote text too long: {} characters, maximum is {USER_TEXT_MAX}",
            trimmed.len()
        );
    }

    Ok(trimmed.to_string())
}
