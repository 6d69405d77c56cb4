//! Usage: Mutable notification descriptor handed through the delivery pipeline.

// Bit values match the platform wire format of the intercepted object.
pub const DEFAULT_SOUND: u32 = 0x1;
pub const DEFAULT_VIBRATE: u32 = 0x2;
pub const DEFAULT_LIGHTS: u32 = 0x4;

pub const FLAG_SHOW_LIGHTS: u32 = 0x1;
pub const FLAG_ONGOING_EVENT: u32 = 0x2;
pub const FLAG_INSISTENT: u32 = 0x4;
pub const FLAG_ONLY_ALERT_ONCE: u32 = 0x8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationDescriptor {
    pub defaults: u32,
    pub flags: u32,
    pub led_argb: u32,
    pub led_on_ms: u32,
    pub led_off_ms: u32,
    pub sound: Option<String>,
    pub vibrate: Option<Vec<u64>>,
}

impl NotificationDescriptor {
    pub fn is_ongoing(&self) -> bool {
        self.flags & FLAG_ONGOING_EVENT == FLAG_ONGOING_EVENT
    }
}
