#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use profile_update_lambda::adapters::user_store::{ItemUpdater, UpdateItemRequest};
use profile_update_lambda::runtime::contract::{RequestPayload, UserProfile, PROFILE_NSID};

pub const PUT_RECORD_PATH: &str = "/xrpc/com.atproto.repo.putRecord";

/// In-memory `ItemUpdater` that records every request it receives.
pub struct RecordingUpdater {
    requests: Mutex<Vec<UpdateItemRequest>>,
    failure: Option<String>,
}

impl RecordingUpdater {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn requests(&self) -> Vec<UpdateItemRequest> {
        self.requests.lock().expect("poisoned mutex").clone()
    }
}

#[async_trait]
impl ItemUpdater for RecordingUpdater {
    async fn update_item(&self, request: UpdateItemRequest) -> Result<(), String> {
        self.requests
            .lock()
            .expect("poisoned mutex")
            .push(request);
        match &self.failure {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }
}

pub fn full_profile() -> UserProfile {
    UserProfile {
        nsid: PROFILE_NSID.to_string(),
        display_name: "John Doe".to_string(),
        bio: "Test Bio".to_string(),
        profile_picture: "https://cdn.shareframe.social/john.png".to_string(),
        profile_banner: "https://cdn.shareframe.social/john-banner.png".to_string(),
        theme: "dark".to_string(),
        primary_color: "#0000ff".to_string(),
        secondary_color: "#f00".to_string(),
        updated_at: "2026-10-18T12:00:00Z".to_string(),
    }
}

pub fn request_for(subject_id: &str, profile: UserProfile) -> RequestPayload {
    RequestPayload {
        did: subject_id.to_string(),
        profile,
        auth_token: "token-abc".to_string(),
    }
}
