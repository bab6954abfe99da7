use std::collections::HashMap;
use std::str::FromStr;

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use gas_core::store::legacy::legacy_category;
use gas_core::store::table_store::table_key;
use gas_core::traits::kv_table::KvTable;
use gas_core::{PriceCategory, Sample, TrackerError};

const PRICE_ATTR: &str = "price";
const TIMESTAMP_ATTR: &str = "timestamp";
const CATEGORY_ATTR: &str = "category";

type Item = HashMap<String, AttributeValue>;

/// DynamoDB table with `timestamp` as its partition key. Credentials and
/// region come from the usual AWS environment and shared config files.
pub struct DynamoTable {
    runtime: Runtime,
    client: Client,
    table: String,
}

impl DynamoTable {
    pub fn connect(table: &str) -> Result<Self, TrackerError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TrackerError::store(format!("failed to start aws runtime: {}", e)))?;
        let config = runtime.block_on(aws_config::load_defaults(BehaviorVersion::latest()));

        Ok(Self {
            client: Client::new(&config),
            runtime,
            table: table.to_string(),
        })
    }
}

impl KvTable for DynamoTable {
    fn scan(&self) -> Result<Vec<Sample>, TrackerError> {
        self.runtime.block_on(async {
            let mut samples = Vec::new();
            let mut start_key: Option<Item> = None;
            loop {
                let page = self
                    .client
                    .scan()
                    .table_name(&self.table)
                    .select(Select::AllAttributes)
                    .set_exclusive_start_key(start_key.take())
                    .send()
                    .await
                    .map_err(|e| {
                        TrackerError::store(format!(
                            "while scanning {}: {}",
                            self.table,
                            DisplayErrorContext(e)
                        ))
                    })?;

                for item in page.items() {
                    samples.push(sample_from_item(item)?);
                }
                match page.last_evaluated_key() {
                    Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                    _ => break,
                }
            }
            debug!("scanned {} items from {}", samples.len(), self.table);
            Ok(samples)
        })
    }

    fn put(&self, sample: &Sample) -> Result<(), TrackerError> {
        self.runtime
            .block_on(
                self.client
                    .put_item()
                    .table_name(&self.table)
                    .set_item(Some(item_from_sample(sample)))
                    .send(),
            )
            .map_err(|e| {
                TrackerError::store(format!(
                    "while writing {} to {}: {}",
                    sample,
                    self.table,
                    DisplayErrorContext(e)
                ))
            })?;
        Ok(())
    }

    fn delete(&self, timestamp: DateTime<Utc>) -> Result<(), TrackerError> {
        let key = table_key(timestamp);
        self.runtime
            .block_on(
                self.client
                    .delete_item()
                    .table_name(&self.table)
                    .key(TIMESTAMP_ATTR, AttributeValue::S(key.clone()))
                    .send(),
            )
            .map_err(|e| {
                TrackerError::store(format!(
                    "while deleting {} from {}: {}",
                    key,
                    self.table,
                    DisplayErrorContext(e)
                ))
            })?;
        Ok(())
    }
}

fn item_from_sample(sample: &Sample) -> Item {
    HashMap::from([
        (
            PRICE_ATTR.to_string(),
            AttributeValue::N(sample.price().to_string()),
        ),
        (
            TIMESTAMP_ATTR.to_string(),
            AttributeValue::S(table_key(sample.timestamp())),
        ),
        (
            CATEGORY_ATTR.to_string(),
            AttributeValue::S(sample.category().to_string()),
        ),
    ])
}

fn attr<'a>(item: &'a Item, name: &str) -> Result<&'a AttributeValue, TrackerError> {
    item.get(name)
        .ok_or_else(|| TrackerError::format(format!("table item has no {}", name)))
}

/// Decode one item. Categories are labels; items written by the first
/// version of the tracker carry the integer code instead.
fn sample_from_item(item: &Item) -> Result<Sample, TrackerError> {
    let price = match attr(item, PRICE_ATTR)? {
        AttributeValue::N(n) => n
            .parse::<u64>()
            .map_err(|e| TrackerError::format(format!("bad price {}: {}", n, e)))?,
        other => {
            return Err(TrackerError::format(format!(
                "price is not a number: {:?}",
                other
            )))
        }
    };

    let timestamp = match attr(item, TIMESTAMP_ATTR)? {
        AttributeValue::S(s) => DateTime::parse_from_rfc3339(s)
            .map_err(|e| TrackerError::format(format!("bad timestamp {}: {}", s, e)))?
            .with_timezone(&Utc),
        other => {
            return Err(TrackerError::format(format!(
                "timestamp is not a string: {:?}",
                other
            )))
        }
    };

    let category = match attr(item, CATEGORY_ATTR)? {
        AttributeValue::S(s) => PriceCategory::from_str(s)
            .map_err(|_| TrackerError::format(format!("unknown price category {}", s)))?,
        AttributeValue::N(n) => legacy_category(
            n.parse::<i64>()
                .map_err(|e| TrackerError::format(format!("bad category code {}: {}", n, e)))?,
        )?,
        other => {
            return Err(TrackerError::format(format!(
                "category is neither label nor code: {:?}",
                other
            )))
        }
    };

    Ok(Sample::new(price, timestamp, category))
}
