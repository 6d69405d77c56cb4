//! Usage: Per-app notification alert overrides for a host delivery pipeline.

pub mod app;
pub mod delivery;
pub mod domain;
pub mod infra;
mod shared;

pub use delivery::{DeliveryInterceptor, DeliveryPipeline, NotificationDescriptor};
pub use domain::alert_config::AppAlertConfig;
pub use domain::alert_override::{apply_overrides, AlertConfigProvider, AlertOverrideInterceptor};
pub use domain::app_ref::ComponentRef;
pub use domain::picker::{CancelFlag, IconCache, PickerItem};
pub use infra::alert_store::{FileAlertStore, StaticAlertProvider};
pub use infra::app_registry::{AppRegistry, InstalledApp, StaticAppRegistry};
