use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::contract::{Theme, UserProfile, MAX_BIO_CHARS, PROFILE_NSID};

#[allow(clippy::expect_used)]
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([a-zA-Z0-9.-]+)(:[0-9]+)?(/.*)?$")
        .expect("static regex should compile")
});
#[allow(clippy::expect_used)]
static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}){1,2}$").expect("static regex should compile")
});
/// Uppercase `T` separator and an uppercase `Z` or numeric offset; chrono alone
/// also accepts a space and lowercase designators.
#[allow(clippy::expect_used)]
static TIMESTAMP_SHAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})$")
        .expect("static regex should compile")
});

pub const INVALID_NSID_REASON: &str = "invalid NSID: only 'social.shareframe.profile' is allowed";
pub const BIO_TOO_LONG_REASON: &str = "bio must be 256 characters or fewer";
pub const INVALID_PROFILE_PICTURE_REASON: &str = "invalid profilePicture URL";
pub const INVALID_PROFILE_BANNER_REASON: &str = "invalid profileBanner URL";
pub const INVALID_THEME_REASON: &str = "theme must be 'light', 'dark', or 'custom'";
pub const INVALID_PRIMARY_COLOR_REASON: &str =
    "primaryColor must be a valid hex code (e.g., #RRGGBB or #RGB)";
pub const INVALID_SECONDARY_COLOR_REASON: &str =
    "secondaryColor must be a valid hex code (e.g., #RRGGBB or #RGB)";
pub const MISSING_UPDATED_AT_REASON: &str = "updatedAt is required";
pub const INVALID_UPDATED_AT_REASON: &str = "invalid datetime format for updatedAt";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("profile validation failed: {}", .reasons.join("; "))]
pub struct ValidationError {
    reasons: Vec<String>,
}

impl ValidationError {
    pub fn new(reasons: Vec<String>) -> Self {
        Self { reasons }
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

/// Checks a candidate profile against the fixed rule set.
///
/// An NSID mismatch fails on its own. Every other rule is evaluated and all
/// violations are reported together, in rule order.
pub fn validate_profile(profile: &UserProfile) -> Result<(), ValidationError> {
    info!(
        component = "validator",
        event = "validation_started",
        received_nsid = %profile.nsid,
    );

    if profile.nsid != PROFILE_NSID {
        warn!(
            component = "validator",
            event = "validation_failed",
            received_nsid = %profile.nsid,
            reason = INVALID_NSID_REASON,
        );
        return Err(ValidationError::new(vec![INVALID_NSID_REASON.to_string()]));
    }

    let checks: [(bool, &str); 6] = [
        (
            profile.bio.chars().count() > MAX_BIO_CHARS,
            BIO_TOO_LONG_REASON,
        ),
        (
            !is_empty_or(&profile.profile_picture, is_valid_url),
            INVALID_PROFILE_PICTURE_REASON,
        ),
        (
            !is_empty_or(&profile.profile_banner, is_valid_url),
            INVALID_PROFILE_BANNER_REASON,
        ),
        (
            !is_empty_or(&profile.theme, |theme| Theme::from_name(theme).is_some()),
            INVALID_THEME_REASON,
        ),
        (
            !is_empty_or(&profile.primary_color, is_valid_hex_color),
            INVALID_PRIMARY_COLOR_REASON,
        ),
        (
            !is_empty_or(&profile.secondary_color, is_valid_hex_color),
            INVALID_SECONDARY_COLOR_REASON,
        ),
    ];

    let mut reasons: Vec<String> = checks
        .iter()
        .filter(|(violated, _)| *violated)
        .map(|(_, reason)| (*reason).to_string())
        .collect();

    if profile.updated_at.is_empty() {
        reasons.push(MISSING_UPDATED_AT_REASON.to_string());
    } else if !is_rfc3339_timestamp(&profile.updated_at) {
        reasons.push(INVALID_UPDATED_AT_REASON.to_string());
    }

    if !reasons.is_empty() {
        warn!(
            component = "validator",
            event = "validation_failed",
            reasons = ?reasons,
        );
        return Err(ValidationError::new(reasons));
    }

    info!(component = "validator", event = "validation_passed");
    Ok(())
}

pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

pub fn is_valid_hex_color(color: &str) -> bool {
    HEX_COLOR_REGEX.is_match(color)
}

pub fn is_rfc3339_timestamp(value: &str) -> bool {
    TIMESTAMP_SHAPE_REGEX.is_match(value) && DateTime::parse_from_rfc3339(value).is_ok()
}

fn is_empty_or(value: &str, rule: impl Fn(&str) -> bool) -> bool {
    value.is_empty() || rule(value)
}
