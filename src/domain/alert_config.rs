//! Usage: Per-app alert configuration record + its string-entry wire format.

pub const DEFAULT_COLOR: u32 = 0xFFFF_FFFF;
pub const DEFAULT_LED_ON_MS: u32 = 500;
pub const DEFAULT_LED_OFF_MS: u32 = 3000;
const MAX_LED_PERIOD_MS: u32 = 60_000;
const MAX_VIBRATE_PATTERN_ENTRIES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppAlertConfig {
    pub enabled: bool,
    pub ongoing: bool,
    pub color: u32,
    pub led_on_ms: u32,
    pub led_off_ms: u32,
    pub sound_override: bool,
    pub sound: Option<String>,
    pub sound_only_once: bool,
    pub insistent: bool,
    pub vibrate_override: bool,
    pub vibrate_pattern: Vec<u64>,
}

impl Default for AppAlertConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ongoing: false,
            color: DEFAULT_COLOR,
            led_on_ms: DEFAULT_LED_ON_MS,
            led_off_ms: DEFAULT_LED_OFF_MS,
            sound_override: false,
            sound: None,
            sound_only_once: false,
            insistent: false,
            vibrate_override: false,
            vibrate_pattern: Vec::new(),
        }
    }
}

impl AppAlertConfig {
    /// Total deserialization over a `key:value` entry set: unknown keys are
    /// ignored and malformed values fall back to the field default.
    pub fn deserialize(entries: &[String]) -> Self {
        let mut config = Self::default();

        for entry in entries {
            let Some((key, value)) = entry.split_once(':') else {
                continue;
            };
            match key {
                "enabled" => config.enabled = parse_bool(value, false),
                "ongoing" => config.ongoing = parse_bool(value, false),
                "color" => config.color = parse_u32(value, DEFAULT_COLOR, u32::MAX),
                "led_on_ms" => {
                    config.led_on_ms = parse_u32(value, DEFAULT_LED_ON_MS, MAX_LED_PERIOD_MS)
                }
                "led_off_ms" => {
                    config.led_off_ms = parse_u32(value, DEFAULT_LED_OFF_MS, MAX_LED_PERIOD_MS)
                }
                "sound_override" => config.sound_override = parse_bool(value, false),
                "sound" => {
                    config.sound = if value.is_empty() {
                        None
                    } else {
                        Some(value.to_string())
                    }
                }
                "sound_only_once" => config.sound_only_once = parse_bool(value, false),
                "insistent" => config.insistent = parse_bool(value, false),
                "vibrate_override" => config.vibrate_override = parse_bool(value, false),
                "vibrate_pattern" => config.vibrate_pattern = parse_vibrate_pattern(value),
                _ => {}
            }
        }

        config
    }

    pub fn serialize(&self) -> Vec<String> {
        let mut entries = vec![
            format!("enabled:{}", self.enabled),
            format!("ongoing:{}", self.ongoing),
            format!("color:{}", self.color),
            format!("led_on_ms:{}", self.led_on_ms),
            format!("led_off_ms:{}", self.led_off_ms),
            format!("sound_override:{}", self.sound_override),
            format!("sound:{}", self.sound.as_deref().unwrap_or("")),
            format!("sound_only_once:{}", self.sound_only_once),
            format!("insistent:{}", self.insistent),
            format!("vibrate_override:{}", self.vibrate_override),
        ];
        entries.push(format!(
            "vibrate_pattern:{}",
            self.vibrate_pattern
                .iter()
                .map(|ms| ms.to_string())
                .collect::<Vec<_>>()
                .join(",")
        ));
        entries
    }
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value {
        "true" => true,
        "false" => false,
        _ => default,
    }
}

fn parse_u32(value: &str, default: u32, max: u32) -> u32 {
    value.parse::<u32>().unwrap_or(default).min(max)
}

/// Comma-separated durations in ms. Any malformed element invalidates the
/// whole pattern (an empty pattern means "no pattern configured").
pub(crate) fn parse_vibrate_pattern(value: &str) -> Vec<u64> {
    if value.is_empty() {
        return Vec::new();
    }

    let mut pattern = Vec::new();
    for part in value.split(',') {
        match part.trim().parse::<u64>() {
            Ok(ms) => pattern.push(ms),
            Err(_) => return Vec::new(),
        }
    }

    pattern.truncate(MAX_VIBRATE_PATTERN_ENTRIES);
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn deserialize_empty_entry_set_is_disabled_default() {
        let config = AppAlertConfig::deserialize(&[]);
        assert_eq!(config, AppAlertConfig::default());
        assert!(!config.enabled);
    }

    #[test]
    fn deserialize_reads_known_keys() {
        let config = AppAlertConfig::deserialize(&entries(&[
            "enabled:true",
            "ongoing:true",
            "color:4278255360",
            "led_on_ms:250",
            "led_off_ms:1000",
            "sound_override:true",
            "sound:content://ringtone/7",
            "sound_only_once:true",
            "insistent:true",
            "vibrate_override:true",
            "vibrate_pattern:100,200,100",
        ]));

        assert!(config.enabled);
        assert!(config.ongoing);
        assert_eq!(config.color, 0xFF00FF00);
        assert_eq!(config.led_on_ms, 250);
        assert_eq!(config.led_off_ms, 1000);
        assert!(config.sound_override);
        assert_eq!(config.sound.as_deref(), Some("content://ringtone/7"));
        assert!(config.sound_only_once);
        assert!(config.insistent);
        assert!(config.vibrate_override);
        assert_eq!(config.vibrate_pattern, vec![100, 200, 100]);
    }

    #[test]
    fn deserialize_ignores_unknown_keys_and_separator_free_entries() {
        let config = AppAlertConfig::deserialize(&entries(&[
            "enabled:true",
            "brightness:11",
            "not-an-entry",
        ]));
        assert!(config.enabled);
        assert_eq!(config.color, DEFAULT_COLOR);
    }

    #[test]
    fn deserialize_falls_back_on_malformed_values() {
        let config = AppAlertConfig::deserialize(&entries(&[
            "enabled:yes",
            "color:not-a-number",
            "led_on_ms:-5",
        ]));
        assert!(!config.enabled);
        assert_eq!(config.color, DEFAULT_COLOR);
        assert_eq!(config.led_on_ms, DEFAULT_LED_ON_MS);
    }

    #[test]
    fn deserialize_clamps_led_periods() {
        let config = AppAlertConfig::deserialize(&entries(&["led_on_ms:999999"]));
        assert_eq!(config.led_on_ms, 60_000);
    }

    #[test]
    fn malformed_vibrate_pattern_yields_empty_pattern() {
        assert_eq!(parse_vibrate_pattern("100,abc,100"), Vec::<u64>::new());
        assert_eq!(parse_vibrate_pattern(""), Vec::<u64>::new());
        assert_eq!(parse_vibrate_pattern("100, 200 ,100"), vec![100, 200, 100]);
    }

    #[test]
    fn serialize_then_deserialize_preserves_sound_absence() {
        let config = AppAlertConfig {
            enabled: true,
            ..AppAlertConfig::default()
        };
        let round = AppAlertConfig::deserialize(&config.serialize());
        assert_eq!(round.sound, None);
        assert!(round.enabled);
    }
}
