//! Usage: Installed-app registry contract (owned by the host platform, consumed here).

use std::collections::HashMap;

use crate::domain::app_ref::ComponentRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledApp {
    pub component: ComponentRef,
    pub label: String,
}

pub trait AppRegistry: Send + Sync {
    /// Launchable components currently installed, in registry order.
    fn installed_apps(&self) -> Vec<InstalledApp>;

    fn resolve_label(&self, component: &ComponentRef) -> Result<String, String>;

    /// Encoded icon image bytes for the component.
    fn load_icon(&self, component: &ComponentRef) -> Result<Vec<u8>, String>;
}

#[derive(Debug, Default)]
pub struct StaticAppRegistry {
    apps: Vec<InstalledApp>,
    icons: HashMap<ComponentRef, Vec<u8>>,
}

impl StaticAppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app(mut self, package: &str, class: &str, label: &str) -> Self {
        self.apps.push(InstalledApp {
            component: ComponentRef::new(package, class),
            label: label.to_string(),
        });
        self
    }

    pub fn with_icon(mut self, package: &str, class: &str, bytes: Vec<u8>) -> Self {
        self.icons.insert(ComponentRef::new(package, class), bytes);
        self
    }
}

impl AppRegistry for StaticAppRegistry {
    fn installed_apps(&self) -> Vec<InstalledApp> {
        self.apps.clone()
    }

    fn resolve_label(&self, component: &ComponentRef) -> Result<String, String> {
        self.apps
            .iter()
            .find(|app| &app.component == component)
            .map(|app| app.label.clone())
            .ok_or_else(|| {
                format!(
                    "REGISTRY_UNKNOWN_COMPONENT: {}",
                    component.flatten_short()
                )
            })
    }

    fn load_icon(&self, component: &ComponentRef) -> Result<Vec<u8>, String> {
        self.icons.get(component).cloned().ok_or_else(|| {
            format!(
                "REGISTRY_UNKNOWN_COMPONENT: no icon for {}",
                component.flatten_short()
            )
        })
    }
}
