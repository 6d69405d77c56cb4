//! Usage: Business logic (override policy, config records, app references, picker backend).

pub mod alert_config;
pub mod alert_override;
pub mod app_ref;
pub mod picker;
