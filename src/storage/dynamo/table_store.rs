//! DynamoDB TableStore implementation.
//!
//! Table schema:
//! - `pk`: partition key (String)
//! - `sk`: sort key (String)
//! - any other attributes, mapped to and from JSON values via `serde_dynamo`

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::{debug, info};

use crate::interfaces::{item_key, AttributeFilter, Item, Result, StorageError, TableStore};
use crate::keys::{KeyPrefix, StorageKey, PARTITION_KEY_ATTR, SORT_KEY_ATTR};

type AttributeMap = HashMap<String, AttributeValue>;

/// Placeholder-to-name or placeholder-to-value bindings.
type Bindings = Vec<(String, String)>;

/// DynamoDB implementation of TableStore.
pub struct DynamoTableStore {
    client: Client,
    table_name: String,
}

impl DynamoTableStore {
    /// Create a new DynamoDB table store.
    ///
    /// `endpoint_url` points the client at DynamoDB Local or another
    /// compatible endpoint. `region` overrides the default provider chain.
    pub async fn new(
        table_name: impl Into<String>,
        endpoint_url: Option<&str>,
        region: Option<&str>,
    ) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        let config = loader.load().await;

        let client = if let Some(endpoint) = endpoint_url {
            let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&config)
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(dynamo_config)
        } else {
            Client::new(&config)
        };

        let table_name = table_name.into();
        info!(table = %table_name, "Connected to DynamoDB");

        Ok(Self { client, table_name })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    fn key_attributes(key: &StorageKey) -> AttributeMap {
        HashMap::from([
            (
                PARTITION_KEY_ATTR.to_string(),
                AttributeValue::S(key.pk.clone()),
            ),
            (
                SORT_KEY_ATTR.to_string(),
                AttributeValue::S(key.sk.clone()),
            ),
        ])
    }

    fn decode(item: AttributeMap) -> Result<Item> {
        serde_dynamo::from_item(item).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Filter expression for a conjunction of `contains` conditions.
///
/// Attribute names and values are bound as `#fN` / `:fN` placeholders.
fn filter_expression(filter: &AttributeFilter) -> (String, Bindings, Bindings) {
    let mut clauses = Vec::with_capacity(filter.conditions().len());
    let mut names = Vec::with_capacity(filter.conditions().len());
    let mut values = Vec::with_capacity(filter.conditions().len());

    for (i, condition) in filter.conditions().iter().enumerate() {
        let name = format!("#f{}", i);
        let value = format!(":f{}", i);
        clauses.push(format!("contains({}, {})", name, value));
        names.push((name, condition.attribute.clone()));
        values.push((value, condition.value.clone()));
    }

    (clauses.join(" AND "), names, values)
}

#[async_trait]
impl TableStore for DynamoTableStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key_attributes(key)))
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("DynamoDB get_item failed: {}", e)))?;

        debug!(pk = %key.pk, sk = %key.sk, found = result.item.is_some(), "DynamoDB get_item");

        result.item.map(Self::decode).transpose()
    }

    async fn put(&self, item: Item) -> Result<()> {
        let key = item_key(&item)?;
        let attributes: AttributeMap =
            serde_dynamo::to_item(item).map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(attributes))
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("DynamoDB put_item failed: {}", e)))?;

        debug!(pk = %key.pk, sk = %key.sk, "Stored item in DynamoDB");
        Ok(())
    }

    async fn delete(&self, key: &StorageKey) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key_attributes(key)))
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("DynamoDB delete_item failed: {}", e)))?;

        debug!(pk = %key.pk, sk = %key.sk, "Deleted item from DynamoDB");
        Ok(())
    }

    async fn query_prefix(
        &self,
        prefix: &KeyPrefix,
        filter: Option<&AttributeFilter>,
    ) -> Result<Vec<Item>> {
        let filter = filter.filter(|f| !f.is_empty());
        let mut items = Vec::new();
        let mut exclusive_start_key: Option<AttributeMap> = None;

        loop {
            let mut builder = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("#pk = :pk AND begins_with(#sk, :sk_prefix)")
                .expression_attribute_names("#pk", PARTITION_KEY_ATTR)
                .expression_attribute_names("#sk", SORT_KEY_ATTR)
                .expression_attribute_values(":pk", AttributeValue::S(prefix.pk.clone()))
                .expression_attribute_values(
                    ":sk_prefix",
                    AttributeValue::S(prefix.sk_prefix.clone()),
                )
                .set_exclusive_start_key(exclusive_start_key.take());

            if let Some(filter) = filter {
                let (expression, names, values) = filter_expression(filter);
                builder = builder.filter_expression(expression);
                for (placeholder, attribute) in names {
                    builder = builder.expression_attribute_names(placeholder, attribute);
                }
                for (placeholder, value) in values {
                    builder =
                        builder.expression_attribute_values(placeholder, AttributeValue::S(value));
                }
            }

            let output = builder
                .send()
                .await
                .map_err(|e| StorageError::Backend(format!("DynamoDB query failed: {}", e)))?;

            for item in output.items.unwrap_or_default() {
                items.push(Self::decode(item)?);
            }

            match output.last_evaluated_key {
                Some(last) if !last.is_empty() => exclusive_start_key = Some(last),
                _ => break,
            }
        }

        debug!(
            pk = %prefix.pk,
            sk_prefix = %prefix.sk_prefix,
            count = items.len(),
            "DynamoDB prefix query"
        );

        Ok(items)
    }
}
