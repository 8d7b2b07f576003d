use lambda_runtime::{service_fn, Error, LambdaEvent};
use profile_update_lambda::adapters::dynamodb::DynamoItemUpdater;
use profile_update_lambda::adapters::record_service::XrpcRecordClient;
use profile_update_lambda::adapters::user_store::ProfileStore;
use profile_update_lambda::config::ServiceConfig;
use profile_update_lambda::error::ProfileUpdateError;
use profile_update_lambda::handlers::update_profile::handle_update_event;
use profile_update_lambda::runtime::contract::UpdateProfileResponse;
use profile_update_lambda::telemetry::init_tracing;
use serde_json::Value;
use tracing::{error, info};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

async fn handle_request(event: LambdaEvent<Value>) -> Result<UpdateProfileResponse, Error> {
    let request_id = event.context.request_id.clone();
    info!(
        component = "lambda",
        event = "invocation_started",
        request_id = %request_id,
    );

    let config = ServiceConfig::from_env().map_err(|config_error| {
        abort_invocation(&request_id, &ProfileUpdateError::ClientConfig(config_error.to_string()))
    })?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    if aws_config.region().is_none() {
        return Err(abort_invocation(
            &request_id,
            &ProfileUpdateError::ClientConfig("AWS region is not configured".to_string()),
        ));
    }

    let user_store = ProfileStore::new(
        DynamoItemUpdater::from_sdk_config(&aws_config),
        config.users_table.clone(),
    );
    let record_service = XrpcRecordClient::from_config(&config)
        .map_err(|client_error| abort_invocation(&request_id, &client_error))?;

    match handle_update_event(event.payload, &record_service, &user_store).await {
        Ok(response) => {
            info!(
                component = "lambda",
                event = "invocation_completed",
                request_id = %request_id,
                success = response.success,
            );
            Ok(response)
        }
        Err(failure) => {
            error!(
                component = "lambda",
                event = "invocation_failed",
                request_id = %request_id,
                stage = failure.stage.as_str(),
                error_code = failure.source.code(),
            );
            Err(Error::from(failure.response.message))
        }
    }
}

fn abort_invocation(request_id: &str, cause: &ProfileUpdateError) -> Error {
    error!(
        component = "lambda",
        event = "client_setup_failed",
        request_id,
        error_code = cause.code(),
        error = %cause,
    );
    Error::from(INTERNAL_ERROR_MESSAGE)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
