pub mod dynamodb;
pub mod record_service;
pub mod user_store;
