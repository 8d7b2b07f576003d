use std::fmt;

use serde::{Deserialize, Serialize};

/// Schema tag every profile record must carry. Doubles as the record-service collection.
pub const PROFILE_NSID: &str = "social.shareframe.profile";
pub const PUT_RECORD_ENDPOINT: &str = "https://shareframe.social/xrpc/com.atproto.repo.putRecord";
pub const USERS_TABLE_NAME: &str = "Users";
pub const USER_ID_KEY: &str = "UserId";
pub const MAX_BIO_CHARS: usize = 256;

pub const PROFILE_UPDATED_MESSAGE: &str = "Profile updated successfully";
pub const PROFILE_UPDATE_FAILED_MESSAGE: &str = "Failed to update profile";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    Custom,
}

impl Theme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Profile document as received from clients and forwarded to the record service.
///
/// Fields stay plain strings so malformed values surface as validation reasons
/// instead of decode failures. Empty optional fields are omitted on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub nsid: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bio: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub profile_picture: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub profile_banner: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub theme: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub primary_color: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secondary_color: String,
    pub updated_at: String,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestPayload {
    #[serde(alias = "repo")]
    pub did: String,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(rename = "authToken", default)]
    pub auth_token: String,
}

impl fmt::Debug for RequestPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPayload")
            .field("did", &self.did)
            .field("profile", &self.profile)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub success: bool,
}

impl UpdateProfileResponse {
    pub fn succeeded() -> Self {
        Self {
            message: PROFILE_UPDATED_MESSAGE.to_string(),
            success: true,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

/// Body of a `com.atproto.repo.putRecord` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PutRecordRequest {
    pub repo: String,
    pub collection: String,
    pub rkey: String,
    pub validate: bool,
    pub record: UserProfile,
}

impl PutRecordRequest {
    pub fn for_profile(
        repo: &str,
        rkey: impl Into<String>,
        validate: bool,
        profile: &UserProfile,
    ) -> Self {
        Self {
            repo: repo.to_string(),
            collection: PROFILE_NSID.to_string(),
            rkey: rkey.into(),
            validate,
            record: profile.clone(),
        }
    }
}
