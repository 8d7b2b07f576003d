use std::time::Duration;

use async_trait::async_trait;
use profile_update_core::contract::{PutRecordRequest, UserProfile};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::error::ProfileUpdateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConfirmation {
    pub rkey: String,
    pub status: u16,
}

/// Source-of-truth write for a profile record.
#[async_trait]
pub trait RecordService: Send + Sync {
    async fn put_record(
        &self,
        subject_id: &str,
        profile: &UserProfile,
        bearer_token: &str,
    ) -> Result<RecordConfirmation, ProfileUpdateError>;
}

/// Writes profile records through an XRPC `putRecord` endpoint.
#[derive(Debug, Clone)]
pub struct XrpcRecordClient {
    http: reqwest::Client,
    endpoint: String,
    validate: bool,
}

impl XrpcRecordClient {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        validate: bool,
    ) -> Result<Self, ProfileUpdateError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ProfileUpdateError::ClientConfig(error.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            validate,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, ProfileUpdateError> {
        Self::new(
            config.record_service_url.clone(),
            config.record_service_timeout,
            config.validate_records,
        )
    }
}

#[async_trait]
impl RecordService for XrpcRecordClient {
    async fn put_record(
        &self,
        subject_id: &str,
        profile: &UserProfile,
        bearer_token: &str,
    ) -> Result<RecordConfirmation, ProfileUpdateError> {
        let rkey = Uuid::new_v4().to_string();
        let body = PutRecordRequest::for_profile(subject_id, rkey.clone(), self.validate, profile);

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(bearer_token)
            .json(&body)
            .send()
            .await
            .map_err(|send_error| {
                error!(
                    component = "record_service",
                    event = "put_record_transport_failed",
                    repo = subject_id,
                    error = %send_error,
                );
                ProfileUpdateError::RecordService {
                    status: None,
                    description: send_error.to_string(),
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(
                component = "record_service",
                event = "put_record_rejected",
                repo = subject_id,
                status = %status,
            );
            return Err(ProfileUpdateError::RecordService {
                status: Some(status.as_u16()),
                description: format!("failed to update profile: {status}"),
            });
        }

        info!(
            component = "record_service",
            event = "put_record_succeeded",
            repo = subject_id,
            rkey = %rkey,
        );
        Ok(RecordConfirmation {
            rkey,
            status: status.as_u16(),
        })
    }
}
