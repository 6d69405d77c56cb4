//! Usage: File-backed per-app alert configuration store (schema + lock flag + refresh).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::alert_config::AppAlertConfig;
use crate::domain::alert_override::AlertConfigProvider;
use crate::shared::fs::{read_optional_file, write_file_atomic};
use crate::shared::mutex_ext::MutexExt;

pub const SCHEMA_VERSION: u32 = 2;
const SCHEMA_VERSION_BOOL_LOCK_FLAG: u32 = 2;
pub const ALERT_SETTINGS_FILE: &str = "alert-settings.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub schema_version: u32,
    pub locked: bool,
    pub apps: HashMap<String, Vec<String>>,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            locked: false,
            apps: HashMap::new(),
        }
    }
}

fn parse_settings_json(content: &str) -> Result<(AlertSettings, bool, bool), String> {
    let mut raw: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| format!("failed to parse {ALERT_SETTINGS_FILE}: {e}"))?;
    let schema_version_present = raw.get("schema_version").is_some();

    // v1 stored the lock flag as the string "true"/"false".
    let mut lock_flag_repaired = false;
    if let Some(obj) = raw.as_object_mut() {
        if let Some(serde_json::Value::String(flag)) = obj.get("locked") {
            let locked = flag.trim().eq_ignore_ascii_case("true");
            obj.insert("locked".to_string(), serde_json::Value::Bool(locked));
            lock_flag_repaired = true;
        }
    }

    let settings: AlertSettings = serde_json::from_value(raw)
        .map_err(|e| format!("failed to parse {ALERT_SETTINGS_FILE}: {e}"))?;
    Ok((settings, schema_version_present, lock_flag_repaired))
}

fn migrate_bool_lock_flag(
    settings: &mut AlertSettings,
    schema_version_present: bool,
    lock_flag_repaired: bool,
) -> bool {
    // v2: lock flag becomes a boolean.
    if schema_version_present
        && settings.schema_version >= SCHEMA_VERSION_BOOL_LOCK_FLAG
        && !lock_flag_repaired
    {
        return false;
    }

    let mut changed = lock_flag_repaired;

    // If schema_version is missing, force a write to persist schema_version so we
    // don't keep "migrating" on every startup.
    if !schema_version_present {
        changed = true;
    }

    if settings.schema_version != SCHEMA_VERSION_BOOL_LOCK_FLAG {
        settings.schema_version = SCHEMA_VERSION_BOOL_LOCK_FLAG;
        changed = true;
    }

    changed
}

fn sanitize_app_keys(settings: &mut AlertSettings) -> bool {
    let before = settings.apps.len();
    settings.apps.retain(|package, _| !package.trim().is_empty());
    settings.apps.len() != before
}

pub fn read(path: &Path) -> Result<AlertSettings, String> {
    let Some(content) = read_optional_file(path)? else {
        let settings = AlertSettings::default();
        // Best-effort: create default settings on first read to make the store
        // discoverable/editable.
        let _ = write(path, &settings);
        return Ok(settings);
    };

    let content = String::from_utf8(content)
        .map_err(|e| format!("failed to read {ALERT_SETTINGS_FILE}: {e}"))?;
    let (mut settings, schema_version_present, lock_flag_repaired) =
        parse_settings_json(&content)?;

    let mut repaired = false;
    repaired |= migrate_bool_lock_flag(&mut settings, schema_version_present, lock_flag_repaired);
    repaired |= sanitize_app_keys(&mut settings);
    if repaired {
        // Best-effort: persist repaired values while keeping read semantics.
        let _ = write(path, &settings);
    }

    Ok(settings)
}

pub fn write(path: &Path, settings: &AlertSettings) -> Result<(), String> {
    let bytes = serde_json::to_vec_pretty(settings)
        .map_err(|e| format!("failed to serialize {ALERT_SETTINGS_FILE}: {e}"))?;
    write_file_atomic(path, &bytes)
}

/// Store snapshot shared with the override policy. `refresh` replaces the
/// snapshot from disk; the policy drives it before every evaluation.
#[derive(Debug)]
pub struct FileAlertStore {
    path: PathBuf,
    snapshot: Mutex<AlertSettings>,
}

impl FileAlertStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, String> {
        let path = path.into();
        let snapshot = read(&path)?;
        Ok(Self {
            path,
            snapshot: Mutex::new(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_locked(&self, locked: bool) -> Result<(), String> {
        let mut snapshot = self.snapshot.lock_or_recover();
        snapshot.locked = locked;
        write(&self.path, &snapshot)
    }

    pub fn set_app_config(&self, package: &str, config: &AppAlertConfig) -> Result<(), String> {
        if package.trim().is_empty() {
            return Err("SEC_INVALID_INPUT: empty package identifier".to_string());
        }
        let mut snapshot = self.snapshot.lock_or_recover();
        snapshot
            .apps
            .insert(package.to_string(), config.serialize());
        write(&self.path, &snapshot)
    }

    pub fn remove_app(&self, package: &str) -> Result<(), String> {
        let mut snapshot = self.snapshot.lock_or_recover();
        snapshot.apps.remove(package);
        write(&self.path, &snapshot)
    }
}

impl AlertConfigProvider for FileAlertStore {
    fn refresh(&self) -> Result<(), String> {
        let fresh = read(&self.path)?;
        *self.snapshot.lock_or_recover() = fresh;
        Ok(())
    }

    fn locked(&self) -> bool {
        self.snapshot.lock_or_recover().locked
    }

    fn app_config(&self, package: &str) -> AppAlertConfig {
        let snapshot = self.snapshot.lock_or_recover();
        match snapshot.apps.get(package) {
            Some(entries) => AppAlertConfig::deserialize(entries),
            None => AppAlertConfig::default(),
        }
    }
}

/// In-memory provider for tests and embedding hosts without a settings file.
#[derive(Debug, Default)]
pub struct StaticAlertProvider {
    locked: bool,
    apps: HashMap<String, AppAlertConfig>,
}

impl StaticAlertProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_app(mut self, package: &str, config: AppAlertConfig) -> Self {
        self.apps.insert(package.to_string(), config);
        self
    }
}

impl AlertConfigProvider for StaticAlertProvider {
    fn refresh(&self) -> Result<(), String> {
        Ok(())
    }

    fn locked(&self) -> bool {
        self.locked
    }

    fn app_config(&self, package: &str) -> AppAlertConfig {
        self.apps.get(package).cloned().unwrap_or_default()
    }
}
