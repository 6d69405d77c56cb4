//! Usage: One-shot background enumeration of launchable apps (cooperatively cancellable).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::infra::app_registry::AppRegistry;
use crate::shared::blocking;

use super::items::{sort_by_label, PickerItem};

#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Enumerates launchable apps off the calling thread: the none row first,
/// then every installed app sorted by display label. A cancelled run yields
/// a coded error; whatever was collected so far is discarded.
pub async fn enumerate_apps(
    registry: Arc<dyn AppRegistry>,
    none_label: &str,
    cancel: CancelFlag,
) -> Result<Vec<PickerItem>, String> {
    let none_label = none_label.to_string();
    blocking::run("picker_enumerate", move || {
        build_picker_items(registry.as_ref(), &none_label, &cancel)
    })
    .await
}

fn build_picker_items(
    registry: &dyn AppRegistry,
    none_label: &str,
    cancel: &CancelFlag,
) -> Result<Vec<PickerItem>, String> {
    let mut apps = Vec::new();
    for installed in registry.installed_apps() {
        if cancel.is_cancelled() {
            return Err("PICKER_CANCELLED: enumeration aborted before completion".to_string());
        }
        apps.push(PickerItem::app(installed.label, installed.component));
    }
    sort_by_label(&mut apps);

    let mut items = Vec::with_capacity(apps.len() + 1);
    items.push(PickerItem::none(none_label));
    items.extend(apps);
    Ok(items)
}
