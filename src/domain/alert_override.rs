//! Usage: Per-app alert override policy (gate-then-apply over an intercepted descriptor).

use std::sync::Arc;

use crate::delivery::{
    DeliveryInterceptor, NotificationDescriptor, DEFAULT_LIGHTS, DEFAULT_SOUND, DEFAULT_VIBRATE,
    FLAG_INSISTENT, FLAG_ONLY_ALERT_ONCE, FLAG_SHOW_LIGHTS,
};

use super::alert_config::AppAlertConfig;

/// Injected configuration dependency. `refresh` re-reads persisted state;
/// the policy calls it before every evaluation so a concurrently edited
/// store is always observed.
pub trait AlertConfigProvider: Send + Sync {
    fn refresh(&self) -> Result<(), String>;

    fn locked(&self) -> bool;

    /// Per-app record for `package`; an unknown package yields the
    /// disabled default record.
    fn app_config(&self, package: &str) -> AppAlertConfig;
}

/// Applies the configured overrides to the descriptor. Gating (lock flag,
/// enabled, ongoing permission) happens in the interceptor; from here on
/// lights are overridden unconditionally, sound and vibration only when
/// their override flags request it.
pub fn apply_overrides(config: &AppAlertConfig, descriptor: &mut NotificationDescriptor) {
    // lights
    descriptor.defaults &= !DEFAULT_LIGHTS;
    descriptor.flags |= FLAG_SHOW_LIGHTS;
    descriptor.led_on_ms = config.led_on_ms;
    descriptor.led_off_ms = config.led_off_ms;
    descriptor.led_argb = config.color;

    // sound
    if config.sound_override {
        descriptor.defaults &= !DEFAULT_SOUND;
        descriptor.sound = config.sound.clone();
    }
    if config.sound_only_once {
        descriptor.flags |= FLAG_ONLY_ALERT_ONCE;
    } else {
        descriptor.flags &= !FLAG_ONLY_ALERT_ONCE;
    }
    if config.insistent {
        descriptor.flags |= FLAG_INSISTENT;
    } else {
        descriptor.flags &= !FLAG_INSISTENT;
    }

    // vibration
    if config.vibrate_override && !config.vibrate_pattern.is_empty() {
        descriptor.defaults &= !DEFAULT_VIBRATE;
        descriptor.vibrate = Some(config.vibrate_pattern.clone());
    }
}

pub struct AlertOverrideInterceptor {
    provider: Arc<dyn AlertConfigProvider>,
}

impl AlertOverrideInterceptor {
    pub fn new(provider: Arc<dyn AlertConfigProvider>) -> Self {
        Self { provider }
    }
}

impl DeliveryInterceptor for AlertOverrideInterceptor {
    fn name(&self) -> &'static str {
        "alert_override"
    }

    fn before_deliver(
        &self,
        caller_package: &str,
        descriptor: &mut NotificationDescriptor,
    ) -> Result<(), String> {
        self.provider.refresh()?;

        if self.provider.locked() {
            tracing::debug!("alert override feature locked");
            return Ok(());
        }

        let config = self.provider.app_config(caller_package);
        if !config.enabled {
            return Ok(());
        }

        // Ongoing gate is all-or-nothing: without permission, sound and
        // vibration stay untouched too.
        if descriptor.is_ongoing() && !config.ongoing {
            tracing::debug!(
                package = caller_package,
                "ongoing control not permitted, notification left untouched"
            );
            return Ok(());
        }

        apply_overrides(&config, descriptor);
        tracing::debug!(
            package = caller_package,
            defaults = descriptor.defaults,
            flags = descriptor.flags,
            "alert overrides applied"
        );
        Ok(())
    }
}
