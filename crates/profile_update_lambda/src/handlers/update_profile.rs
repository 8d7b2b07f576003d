use profile_update_core::contract::{
    RequestPayload, UpdateProfileResponse, PROFILE_UPDATE_FAILED_MESSAGE,
};
use profile_update_core::validation::validate_profile;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::adapters::record_service::RecordService;
use crate::adapters::user_store::UserStore;
use crate::error::ProfileUpdateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    Received,
    Validated,
    RecordWritten,
    StoreWritten,
    Completed,
}

impl UpdateStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::RecordWritten => "record_written",
            Self::StoreWritten => "store_written",
            Self::Completed => "completed",
        }
    }
}

/// Infrastructure failure that must escalate as an invocation error.
///
/// `stage` is the last stage reached before the failing call. `response` is the
/// caller-facing payload and never contains the source error text.
#[derive(Debug, Error)]
#[error("profile update failed after stage '{}': {source}", .stage.as_str())]
pub struct UpdateFailure {
    pub stage: UpdateStage,
    pub response: UpdateProfileResponse,
    #[source]
    pub source: ProfileUpdateError,
}

impl UpdateFailure {
    fn after(stage: UpdateStage, source: ProfileUpdateError) -> Self {
        Self {
            stage,
            response: UpdateProfileResponse::failed(PROFILE_UPDATE_FAILED_MESSAGE),
            source,
        }
    }
}

/// Decodes a raw invocation event and runs the update flow.
///
/// Accepts either the request object itself or an API Gateway proxy envelope
/// carrying it in `body`. Undecodable payloads are answered, not escalated.
pub async fn handle_update_event(
    event: Value,
    record_service: &impl RecordService,
    user_store: &impl UserStore,
) -> Result<UpdateProfileResponse, UpdateFailure> {
    let request = match decode_request(event) {
        Ok(value) => value,
        Err(message) => {
            warn!(
                component = "update_profile",
                event = "request_rejected",
                error = %message,
            );
            return Ok(UpdateProfileResponse::failed(message));
        }
    };

    handle_update_request(&request, record_service, user_store).await
}

/// Validates the profile, writes it to the record service, then mirrors it
/// into the user store. The store is only touched after the record write
/// succeeded; a store failure after that leaves the two out of sync.
pub async fn handle_update_request(
    request: &RequestPayload,
    record_service: &impl RecordService,
    user_store: &impl UserStore,
) -> Result<UpdateProfileResponse, UpdateFailure> {
    let subject_id = request.did.as_str();
    log_stage(subject_id, UpdateStage::Received);

    if let Err(validation_error) = validate_profile(&request.profile) {
        let rejection = ProfileUpdateError::from(validation_error);
        warn!(
            component = "update_profile",
            event = "validation_rejected",
            subject_id,
            error_code = rejection.code(),
            error = %rejection,
        );
        return Ok(UpdateProfileResponse::failed(rejection.to_string()));
    }
    log_stage(subject_id, UpdateStage::Validated);

    let confirmation = record_service
        .put_record(subject_id, &request.profile, &request.auth_token)
        .await
        .map_err(|source| {
            error!(
                component = "update_profile",
                event = "record_write_failed",
                subject_id,
                error_code = source.code(),
                error = %source,
            );
            UpdateFailure::after(UpdateStage::Validated, source)
        })?;
    log_stage(subject_id, UpdateStage::RecordWritten);

    user_store
        .update_user(subject_id, &request.profile)
        .await
        .map_err(|source| {
            error!(
                component = "update_profile",
                event = "store_write_failed",
                subject_id,
                committed_rkey = %confirmation.rkey,
                error_code = source.code(),
                error = %source,
                record_committed = true,
            );
            UpdateFailure::after(UpdateStage::RecordWritten, source)
        })?;
    log_stage(subject_id, UpdateStage::StoreWritten);

    log_stage(subject_id, UpdateStage::Completed);
    Ok(UpdateProfileResponse::succeeded())
}

pub fn decode_request(event: Value) -> Result<RequestPayload, String> {
    let payload = normalize_apigw_event(event)?;
    serde_json::from_value(payload).map_err(|error| format!("Malformed request: {error}"))
}

fn normalize_apigw_event(event: Value) -> Result<Value, String> {
    let Some(object) = event.as_object() else {
        return Err("Malformed request: payload must be a JSON object".to_string());
    };

    let Some(body) = object.get("body") else {
        return Ok(event);
    };

    match body {
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => serde_json::from_str(text)
            .map_err(|error| format!("Malformed request: invalid JSON body: {error}")),
        _ => Err("Malformed request: body must be a JSON object".to_string()),
    }
}

fn log_stage(subject_id: &str, stage: UpdateStage) {
    info!(
        component = "update_profile",
        event = "stage_reached",
        subject_id,
        stage = stage.as_str(),
    );
}
