use std::time::Duration;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus,
};
use tracing::{debug, info};

use filedesk_core::AuditError;

use crate::dynamodb::{PARTITION_KEY, SORT_KEY};

const ACTIVE_POLL_INTERVAL: Duration = Duration::from_millis(500);
const ACTIVE_POLL_ATTEMPTS: u32 = 60;

/// Create the audit table if it does not exist and wait until it is active.
///
/// The table has a string partition key `pk` and a string sort key
/// `item_name`, with on-demand billing. An existing table is left untouched.
pub async fn create_audit_table(client: &Client, table_name: &str) -> Result<(), AuditError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            debug!(table = %table_name, "audit table already exists");
            return wait_until_active(client, table_name).await;
        }
        Err(err)
            if err
                .as_service_error()
                .is_some_and(DescribeTableError::is_resource_not_found_exception) => {}
        Err(err) => return Err(table_error("describe", &err)),
    }

    info!(table = %table_name, "creating audit table");

    let result = client
        .create_table()
        .table_name(table_name)
        .key_schema(key_element(PARTITION_KEY, KeyType::Hash)?)
        .key_schema(key_element(SORT_KEY, KeyType::Range)?)
        .attribute_definitions(string_attribute(PARTITION_KEY)?)
        .attribute_definitions(string_attribute(SORT_KEY)?)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    // Another instance may have created it between describe and create.
    if let Err(err) = result {
        let service_err = err.into_service_error();
        if !service_err.is_resource_in_use_exception() {
            return Err(table_error("create", &service_err));
        }
    }

    wait_until_active(client, table_name).await
}

async fn wait_until_active(client: &Client, table_name: &str) -> Result<(), AuditError> {
    for _ in 0..ACTIVE_POLL_ATTEMPTS {
        let output = client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| table_error("describe", &e))?;

        if output.table().and_then(|t| t.table_status()) == Some(&TableStatus::Active) {
            return Ok(());
        }
        tokio::time::sleep(ACTIVE_POLL_INTERVAL).await;
    }

    Err(AuditError::Storage(format!(
        "audit table '{table_name}' did not become active"
    )))
}

fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement, AuditError> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(|e| AuditError::Storage(format!("invalid key schema for '{name}': {e}")))
}

fn string_attribute(name: &str) -> Result<AttributeDefinition, AuditError> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| AuditError::Storage(format!("invalid attribute definition '{name}': {e}")))
}

fn table_error(operation: &str, err: &impl std::error::Error) -> AuditError {
    AuditError::Storage(format!(
        "audit table {operation} failed: {}",
        DisplayErrorContext(err)
    ))
}
