//! Usage: Selectable picker rows (labeled app entries + the leading none row).

use crate::domain::app_ref::{format_app_ref, ComponentRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub label: String,
    pub component: Option<ComponentRef>,
}

impl PickerItem {
    pub fn none(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            component: None,
        }
    }

    pub fn app(label: impl Into<String>, component: ComponentRef) -> Self {
        Self {
            label: label.into(),
            component: Some(component),
        }
    }

    /// Persisted app reference value; the none row has no value.
    pub fn value(&self) -> Option<String> {
        self.component.as_ref().map(format_app_ref)
    }
}

pub(super) fn sort_by_label(items: &mut [PickerItem]) {
    items.sort_by(|a, b| a.label.to_lowercase().cmp(&b.label.to_lowercase()));
}

/// Case-insensitive search over display labels. An empty query keeps
/// everything; the none row is always kept so it stays selectable.
pub fn filter_by_label(items: &[PickerItem], query: &str) -> Vec<PickerItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.component.is_none() || item.label.to_lowercase().contains(&query))
        .cloned()
        .collect()
}
