pub mod kv_table;
pub mod notifier;
pub mod price_source;
pub mod store;
