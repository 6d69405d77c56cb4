//! Usage: Persisted picker selections (pref key → app reference value, upgrade on read).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::domain::app_ref::{is_legacy_app_ref, parse_app_ref, upgrade_legacy_app_ref};
use crate::infra::app_registry::AppRegistry;
use crate::shared::fs::{read_optional_file, write_file_atomic_if_changed};

pub const PICKED_APPS_FILE: &str = "picked-apps.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PickedApps {
    pub values: HashMap<String, String>,
}

pub fn read(path: &Path) -> Result<PickedApps, String> {
    let Some(content) = read_optional_file(path)? else {
        return Ok(PickedApps::default());
    };
    serde_json::from_slice(&content).map_err(|e| format!("failed to parse {PICKED_APPS_FILE}: {e}"))
}

pub fn write(path: &Path, picked: &PickedApps) -> Result<(), String> {
    let bytes = serde_json::to_vec_pretty(picked)
        .map_err(|e| format!("failed to serialize {PICKED_APPS_FILE}: {e}"))?;
    write_file_atomic_if_changed(path, &bytes)?;
    Ok(())
}

/// Reads one selection value, running the legacy upgrade at the boundary:
/// a legacy-format value is converted to the URI form and persisted back
/// best-effort; an unreadable value is logged and treated as absent.
pub fn read_value(path: &Path, pref_key: &str) -> Result<Option<String>, String> {
    let mut picked = read(path)?;
    let Some(value) = picked.values.get(pref_key).cloned() else {
        return Ok(None);
    };

    if !is_legacy_app_ref(&value) {
        return Ok(Some(value));
    }

    match upgrade_legacy_app_ref(&value) {
        Ok(upgraded) => {
            picked
                .values
                .insert(pref_key.to_string(), upgraded.clone());
            // Best-effort: persist the upgraded value so the legacy form is
            // parsed at most once.
            if let Err(err) = write(path, &picked) {
                tracing::warn!(pref_key, "picked app upgrade not persisted: {err}");
            }
            Ok(Some(upgraded))
        }
        Err(err) => {
            tracing::warn!(pref_key, "picked app legacy value dropped: {err}");
            Ok(None)
        }
    }
}

pub fn set_value(path: &Path, pref_key: &str, value: Option<String>) -> Result<(), String> {
    let mut picked = read(path)?;
    match value {
        Some(value) => picked.values.insert(pref_key.to_string(), value),
        None => picked.values.remove(pref_key),
    };
    write(path, &picked)
}

/// Human-readable label for a stored value. Resolution failures are logged
/// and yield `None` so the caller falls back to its default summary.
pub fn summary_label(value: &str, registry: &dyn AppRegistry) -> Option<String> {
    let component = match parse_app_ref(value) {
        Ok(component) => component,
        Err(err) => {
            tracing::warn!("picked app value unreadable: {err}");
            return None;
        }
    };

    match registry.resolve_label(&component) {
        Ok(label) => Some(label),
        Err(err) => {
            tracing::warn!("picked app label resolution failed: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::app_ref::format_app_ref;
    use crate::domain::app_ref::ComponentRef;
    use crate::infra::app_registry::StaticAppRegistry;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TMP_DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn unique_tmp_dir() -> std::path::PathBuf {
        let seq = TMP_DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let mut dir = std::env::temp_dir();
        dir.push(format!(
            "notify_control_hub_selection_test_{nanos}_{}_{}",
            std::process::id(),
            seq
        ));
        std::fs::create_dir_all(&dir).expect("create tmp dir");
        dir
    }

    #[test]
    fn read_value_returns_none_for_missing_key() {
        let dir = unique_tmp_dir();
        let path = dir.join(PICKED_APPS_FILE);
        assert_eq!(read_value(&path, "quick_launch").expect("read"), None);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn set_then_read_round_trips_uri_values() {
        let dir = unique_tmp_dir();
        let path = dir.join(PICKED_APPS_FILE);
        let value = format_app_ref(&ComponentRef::new("com.foo", "com.foo.Main"));

        set_value(&path, "quick_launch", Some(value.clone())).expect("set");
        assert_eq!(
            read_value(&path, "quick_launch").expect("read"),
            Some(value)
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn legacy_value_is_upgraded_and_persisted_on_first_read() {
        let dir = unique_tmp_dir();
        let path = dir.join(PICKED_APPS_FILE);
        set_value(
            &path,
            "quick_launch",
            Some("pkg.name#C3C0#ActivityName".to_string()),
        )
        .expect("seed legacy value");

        let upgraded = read_value(&path, "quick_launch")
            .expect("read")
            .expect("value present");
        assert!(upgraded.starts_with("intent:#Intent;"));
        assert_eq!(
            parse_app_ref(&upgraded).expect("parse"),
            ComponentRef::new("pkg.name", "ActivityName")
        );

        // The upgrade was written back: the raw file no longer holds the
        // legacy form.
        let persisted = read(&path).expect("read raw");
        assert_eq!(persisted.values.get("quick_launch"), Some(&upgraded));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unparseable_legacy_value_reads_as_absent() {
        let dir = unique_tmp_dir();
        let path = dir.join(PICKED_APPS_FILE);
        set_value(&path, "quick_launch", Some("#C3C0#Broken".to_string())).expect("seed");

        assert_eq!(read_value(&path, "quick_launch").expect("read"), None);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn summary_label_matches_for_legacy_and_upgraded_forms() {
        let registry = StaticAppRegistry::new().with_app("pkg.name", "ActivityName", "My App");

        let legacy = "pkg.name#C3C0#ActivityName";
        let upgraded = upgrade_legacy_app_ref(legacy).expect("upgrade");

        assert_eq!(
            summary_label(legacy, &registry),
            Some("My App".to_string())
        );
        assert_eq!(summary_label(&upgraded, &registry), summary_label(legacy, &registry));
    }

    #[test]
    fn summary_label_is_none_for_unknown_component_or_garbage() {
        let registry = StaticAppRegistry::new();
        let value = format_app_ref(&ComponentRef::new("com.gone", "com.gone.Main"));
        assert_eq!(summary_label(&value, &registry), None);
        assert_eq!(summary_label("garbage", &registry), None);
    }
}
