use std::collections::BTreeMap;

use async_trait::async_trait;
use profile_update_core::contract::{UserProfile, USER_ID_KEY};
use profile_update_core::update_expression::build_update_descriptor;
use tracing::{error, info};

use crate::error::ProfileUpdateError;

/// A single key-value `UpdateItem` call, already expanded from a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItemRequest {
    pub table_name: String,
    pub key_name: String,
    pub key_value: String,
    pub update_expression: String,
    pub values: BTreeMap<String, String>,
}

/// Narrow seam over the store SDK so the update logic can run against fakes.
#[async_trait]
pub trait ItemUpdater: Send + Sync {
    async fn update_item(&self, request: UpdateItemRequest) -> Result<(), String>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn update_user(
        &self,
        subject_id: &str,
        profile: &UserProfile,
    ) -> Result<(), ProfileUpdateError>;
}

/// Mirrors profile updates into the users table.
#[derive(Debug, Clone)]
pub struct ProfileStore<U> {
    updater: U,
    table_name: String,
}

impl<U: ItemUpdater> ProfileStore<U> {
    pub fn new(updater: U, table_name: impl Into<String>) -> Self {
        Self {
            updater,
            table_name: table_name.into(),
        }
    }

    pub fn updater(&self) -> &U {
        &self.updater
    }
}

#[async_trait]
impl<U: ItemUpdater> UserStore for ProfileStore<U> {
    async fn update_user(
        &self,
        subject_id: &str,
        profile: &UserProfile,
    ) -> Result<(), ProfileUpdateError> {
        if subject_id.is_empty() {
            return Err(ProfileUpdateError::InvalidArgument(
                "userID cannot be empty".to_string(),
            ));
        }

        let descriptor = build_update_descriptor(profile);
        if !descriptor.has_user_fields() {
            return Err(ProfileUpdateError::NoFieldsToUpdate);
        }

        let update_expression = format!("SET {}", descriptor.expression());
        info!(
            component = "user_store",
            event = "update_item_started",
            subject_id,
            table = %self.table_name,
            update_expression = %update_expression,
        );

        let request = UpdateItemRequest {
            table_name: self.table_name.clone(),
            key_name: USER_ID_KEY.to_string(),
            key_value: subject_id.to_string(),
            update_expression,
            values: descriptor.into_values(),
        };

        self.updater.update_item(request).await.map_err(|message| {
            error!(
                component = "user_store",
                event = "update_item_failed",
                subject_id,
                error = %message,
            );
            ProfileUpdateError::StoreWrite(message)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use profile_update_core::contract::PROFILE_NSID;

    use super::*;

    struct RecordingUpdater {
        requests: Mutex<Vec<UpdateItemRequest>>,
        failure: Option<String>,
    }

    impl RecordingUpdater {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                failure: None,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                failure: Some(message.to_string()),
            }
        }

        fn requests(&self) -> Vec<UpdateItemRequest> {
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

    fn sample_profile() -> UserProfile {
        UserProfile {
            nsid: PROFILE_NSID.to_string(),
            display_name: "John Doe".to_string(),
            bio: "Test Bio".to_string(),
            profile_picture: "picture.jpg".to_string(),
            profile_banner: "banner.jpg".to_string(),
            theme: "dark".to_string(),
            primary_color: "#00f".to_string(),
            secondary_color: "#f00".to_string(),
            updated_at: "2026-10-18T12:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn updates_all_populated_fields_keyed_by_subject() {
        let store = ProfileStore::new(RecordingUpdater::new(), "Users");

        store
            .update_user("user123", &sample_profile())
            .await
            .expect("update should succeed");

        let requests = store.updater().requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.table_name, "Users");
        assert_eq!(request.key_name, "UserId");
        assert_eq!(request.key_value, "user123");
        assert!(request
            .update_expression
            .starts_with("SET DisplayName = :DisplayName, "));
        assert!(request
            .update_expression
            .ends_with(", UpdatedAt = :UpdatedAt"));
        assert_eq!(request.values.len(), 8);
    }

    #[tokio::test]
    async fn partial_profile_only_sends_populated_fields() {
        let store = ProfileStore::new(RecordingUpdater::new(), "Users");
        let profile = UserProfile {
            display_name: "Jane Doe".to_string(),
            bio: "Hello world".to_string(),
            ..UserProfile::default()
        };

        store
            .update_user("user456", &profile)
            .await
            .expect("update should succeed");

        let requests = store.updater().requests();
        assert_eq!(
            requests[0].update_expression,
            "SET DisplayName = :DisplayName, Bio = :Bio, UpdatedAt = :UpdatedAt"
        );
    }

    #[tokio::test]
    async fn empty_subject_is_rejected_before_store_call() {
        let store = ProfileStore::new(RecordingUpdater::new(), "Users");

        let error = store
            .update_user("", &sample_profile())
            .await
            .expect_err("empty subject should fail");

        assert!(matches!(error, ProfileUpdateError::InvalidArgument(_)));
        assert!(store.updater().requests().is_empty());
    }

    #[tokio::test]
    async fn timestamp_only_update_is_rejected_before_store_call() {
        let store = ProfileStore::new(RecordingUpdater::new(), "Users");

        let error = store
            .update_user("user789", &UserProfile::default())
            .await
            .expect_err("empty profile should fail");

        assert!(matches!(error, ProfileUpdateError::NoFieldsToUpdate));
        assert!(store.updater().requests().is_empty());
    }

    #[tokio::test]
    async fn store_errors_surface_as_write_failures() {
        let store = ProfileStore::new(
            RecordingUpdater::failing("DynamoDB update error"),
            "Users",
        );
        let profile = UserProfile {
            display_name: "Error User".to_string(),
            ..UserProfile::default()
        };

        let error = store
            .update_user("user-error", &profile)
            .await
            .expect_err("store failure should surface");

        assert!(matches!(
            error,
            ProfileUpdateError::StoreWrite(ref message) if message == "DynamoDB update error"
        ));
        assert_eq!(store.updater().requests().len(), 1);
    }
}
