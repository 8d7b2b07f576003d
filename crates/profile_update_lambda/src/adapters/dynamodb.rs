use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};

use crate::adapters::user_store::{ItemUpdater, UpdateItemRequest};

/// `ItemUpdater` backed by the DynamoDB `UpdateItem` API.
#[derive(Debug, Clone)]
pub struct DynamoItemUpdater {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoItemUpdater {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(aws_sdk_dynamodb::Client::new(sdk_config))
    }
}

#[async_trait]
impl ItemUpdater for DynamoItemUpdater {
    async fn update_item(&self, request: UpdateItemRequest) -> Result<(), String> {
        let values: HashMap<String, AttributeValue> = request
            .values
            .into_iter()
            .map(|(placeholder, value)| (placeholder, AttributeValue::S(value)))
            .collect();

        self.client
            .update_item()
            .table_name(request.table_name)
            .key(request.key_name, AttributeValue::S(request.key_value))
            .update_expression(request.update_expression)
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| {
                format!(
                    "DynamoDB UpdateItem failed: {}",
                    DisplayErrorContext(&error)
                )
            })
    }
}
