//! Referral code value object and referral entries.
//!
//! Codes are `PREFIX` + `SUFFIX`: three characters from the member's name
//! and four random base-36 characters (e.g. `MEEK4Z9`). Matching ignores case
//! and surrounding whitespace, so `" meek4z9 "` credits the same member.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{Email, Timestamp, ValidationError};

const PREFIX_LEN: usize = 3;
const SUFFIX_LEN: usize = 4;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A member's per-cycle referral code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Wraps an existing code, trimming whitespace.
    pub fn new(code: impl AsRef<str>) -> Result<Self, ValidationError> {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Err(ValidationError::empty_field("referral_code"));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::invalid_format(
                "referral_code",
                "must be alphanumeric",
            ));
        }
        Ok(Self(code.to_string()))
    }

    /// Generates a fresh code for a member.
    pub fn generate(member_name: &str) -> Self {
        Self::from_seed(member_name, Uuid::new_v4().as_u128())
    }

    /// Deterministic generation from a seed.
    pub fn from_seed(member_name: &str, seed: u128) -> Self {
        let mut code: String = member_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(PREFIX_LEN)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        while code.len() < PREFIX_LEN {
            code.push('X');
        }

        let mut rest = seed;
        for _ in 0..SUFFIX_LEN {
            code.push(BASE36[(rest % 36) as usize] as char);
            rest /= 36;
        }
        Self(code)
    }

    /// Lookup key: trimmed and upper-cased.
    pub fn key(&self) -> String {
        Self::normalize(&self.0)
    }

    /// Normalizes raw user input to a lookup key.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_ascii_uppercase()
    }

    /// Case-insensitive, whitespace-tolerant comparison with user input.
    pub fn matches(&self, raw: &str) -> bool {
        self.key() == Self::normalize(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ReferralCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ReferralCode::new(value)
    }
}

impl From<ReferralCode> for String {
    fn from(code: ReferralCode) -> Self {
        code.0
    }
}

/// What kind of event produced a referral credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralKind {
    /// Referred person registered an account.
    Registration,
    /// Referred person paid for a membership.
    Membership,
}

impl ReferralKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralKind::Registration => "registration",
            ReferralKind::Membership => "membership",
        }
    }
}

/// Identity of the person being referred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferredParty {
    pub name: String,
    pub email: Option<Email>,
    pub mobile: Option<String>,
}

impl ReferredParty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            mobile: None,
        }
    }

    pub fn with_email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = Some(mobile.into());
        self
    }
}

/// One credited referral inside a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,

    pub date: Timestamp,

    #[serde(rename = "type")]
    pub kind: ReferralKind,
}

impl Referral {
    pub fn new(party: ReferredParty, kind: ReferralKind, date: Timestamp) -> Self {
        Self {
            name: party.name,
            mobile: party.mobile,
            email: party.email,
            date,
            kind,
        }
    }
}
