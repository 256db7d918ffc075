//! # assetdesk-core
//!
//! Types shared across the AssetDesk crates: configuration and the schema
//! registry that grounds the natural-language query layer.

pub mod config;
pub mod schema;

pub use config::{
    AssetDeskConfig, AuditConfig, ChatConfig, ConfigError, DatabaseConfig, GuardConfig,
    GuardMode, RateLimitConfig, ServerConfig,
};
pub use schema::{
    Cardinality, ColumnDef, Relationship, SchemaDefinition, SchemaDescriptor, TableDef,
    SELECT_OPERATION,
};
