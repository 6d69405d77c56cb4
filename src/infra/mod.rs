//! Usage: Infrastructure adapters (persistence, platform registry contract).

pub mod alert_store;
pub mod app_registry;
pub mod selection;
