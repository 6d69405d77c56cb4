//! Usage: Byte-bounded LRU cache of decoded, size-normalized app icons.

use std::collections::HashMap;
use std::sync::Arc;

use image::imageops::FilterType;

use crate::domain::app_ref::format_app_ref;
use crate::infra::app_registry::AppRegistry;

use super::items::PickerItem;

pub const ICON_EDGE_PX: u32 = 40;
pub const MAX_ICON_CACHE_BYTES: usize = 4 * 1024 * 1024;
const MEMORY_BUDGET_FRACTION: usize = 6;

pub fn cache_capacity_bytes(memory_budget_bytes: usize) -> usize {
    (memory_budget_bytes / MEMORY_BUDGET_FRACTION).min(MAX_ICON_CACHE_BYTES)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedIcon {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedIcon {
    pub fn byte_count(&self) -> usize {
        self.rgba.len()
    }
}

/// Decodes encoded icon bytes and normalizes them to the picker's icon edge.
pub fn decode_and_normalize(bytes: &[u8]) -> Result<DecodedIcon, String> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| format!("failed to decode icon: {e}"))?;
    let resized = image::imageops::resize(
        &decoded.to_rgba8(),
        ICON_EDGE_PX,
        ICON_EDGE_PX,
        FilterType::Nearest,
    );
    Ok(DecodedIcon {
        width: ICON_EDGE_PX,
        height: ICON_EDGE_PX,
        rgba: resized.into_raw(),
    })
}

/// Load-through lookup for a picker row: cache hit, else decode the
/// registry's icon bytes and cache the result. The none row and any load or
/// decode failure yield `None` (logged, never fatal).
pub fn icon_for(
    item: &PickerItem,
    registry: &dyn AppRegistry,
    cache: &mut IconCache,
) -> Option<Arc<DecodedIcon>> {
    let component = item.component.as_ref()?;
    let key = format_app_ref(component);

    if let Some(icon) = cache.get(&key) {
        return Some(icon);
    }

    let bytes = match registry.load_icon(component) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!("picker icon load failed: {err}");
            return None;
        }
    };
    let icon = match decode_and_normalize(&bytes) {
        Ok(icon) => Arc::new(icon),
        Err(err) => {
            tracing::warn!("picker icon decode failed: {err}");
            return None;
        }
    };

    cache.insert(key, Arc::clone(&icon));
    Some(icon)
}

#[derive(Debug)]
struct CachedIcon {
    icon: Arc<DecodedIcon>,
    last_used: u64,
}

/// Keyed by the app reference value string. Bounded by cumulative decoded
/// byte size; eviction removes the least-recently-used entry first. Callers
/// share the cache behind a mutex.
#[derive(Debug)]
pub struct IconCache {
    capacity_bytes: usize,
    total_bytes: usize,
    tick: u64,
    entries: HashMap<String, CachedIcon>,
}

impl IconCache {
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            total_bytes: 0,
            tick: 0,
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    pub fn get(&mut self, key: &str) -> Option<Arc<DecodedIcon>> {
        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.get_mut(key)?;
        entry.last_used = tick;
        Some(Arc::clone(&entry.icon))
    }

    pub fn insert(&mut self, key: impl Into<String>, icon: Arc<DecodedIcon>) {
        self.tick += 1;
        let added = icon.byte_count();

        if let Some(prev) = self.entries.insert(
            key.into(),
            CachedIcon {
                icon,
                last_used: self.tick,
            },
        ) {
            self.total_bytes = self.total_bytes.saturating_sub(prev.icon.byte_count());
        }
        self.total_bytes += added;

        self.evict_over_capacity();
    }

    fn evict_over_capacity(&mut self) {
        while self.total_bytes > self.capacity_bytes && !self.entries.is_empty() {
            let Some(oldest_key) = self
                .entries
                .iter()
                .min_by_key(|(_, v)| v.last_used)
                .map(|(k, _)| k.clone())
            else {
                return;
            };
            if let Some(removed) = self.entries.remove(&oldest_key) {
                self.total_bytes = self.total_bytes.saturating_sub(removed.icon.byte_count());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn icon_of_bytes(len: usize) -> Arc<DecodedIcon> {
        Arc::new(DecodedIcon {
            width: 1,
            height: 1,
            rgba: vec![0u8; len],
        })
    }

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let buf = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(buf)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .expect("encode png");
        out
    }

    #[test]
    fn capacity_formula_is_budget_fraction_capped() {
        assert_eq!(cache_capacity_bytes(6 * 1024), 1024);
        assert_eq!(cache_capacity_bytes(usize::MAX), MAX_ICON_CACHE_BYTES);
    }

    #[test]
    fn decode_and_normalize_resizes_to_icon_edge() {
        let icon = decode_and_normalize(&encoded_png(8, 8)).expect("decode");
        assert_eq!(icon.width, ICON_EDGE_PX);
        assert_eq!(icon.height, ICON_EDGE_PX);
        assert_eq!(
            icon.byte_count(),
            (ICON_EDGE_PX * ICON_EDGE_PX * 4) as usize
        );
    }

    #[test]
    fn decode_rejects_garbage_bytes() {
        assert!(decode_and_normalize(b"not an image").is_err());
    }

    #[test]
    fn eviction_is_by_cumulative_bytes_not_entry_count() {
        let mut cache = IconCache::new(250);
        cache.insert("a", icon_of_bytes(100));
        cache.insert("b", icon_of_bytes(100));
        cache.insert("c", icon_of_bytes(100));

        // "a" was least recently used.
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.total_bytes(), 200);
    }

    #[test]
    fn lookup_refreshes_recency() {
        let mut cache = IconCache::new(250);
        cache.insert("a", icon_of_bytes(100));
        cache.insert("b", icon_of_bytes(100));

        assert!(cache.get("a").is_some());
        cache.insert("c", icon_of_bytes(100));

        // "b" is now the eviction victim, "a" survived the touch.
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn reinserting_a_key_replaces_its_byte_accounting() {
        let mut cache = IconCache::new(1000);
        cache.insert("a", icon_of_bytes(400));
        cache.insert("a", icon_of_bytes(100));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_bytes(), 100);
    }

    #[test]
    fn entry_larger_than_capacity_does_not_survive() {
        let mut cache = IconCache::new(100);
        cache.insert("huge", icon_of_bytes(500));
        assert!(cache.is_empty());
        assert_eq!(cache.total_bytes(), 0);
    }

    #[test]
    fn icon_for_decodes_once_then_serves_from_cache() {
        use crate::domain::app_ref::ComponentRef;
        use crate::infra::app_registry::StaticAppRegistry;

        let registry = StaticAppRegistry::new()
            .with_app("com.foo", "com.foo.Main", "Foo")
            .with_icon("com.foo", "com.foo.Main", encoded_png(8, 8));
        let item = PickerItem::app("Foo", ComponentRef::new("com.foo", "com.foo.Main"));
        let mut cache = IconCache::new(MAX_ICON_CACHE_BYTES);

        let first = icon_for(&item, &registry, &mut cache).expect("icon");
        assert_eq!(first.width, ICON_EDGE_PX);
        assert_eq!(cache.len(), 1);

        let second = icon_for(&item, &registry, &mut cache).expect("icon again");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn icon_for_is_none_for_none_row_and_missing_icon() {
        use crate::domain::app_ref::ComponentRef;
        use crate::infra::app_registry::StaticAppRegistry;

        let registry = StaticAppRegistry::new().with_app("com.foo", "com.foo.Main", "Foo");
        let mut cache = IconCache::new(MAX_ICON_CACHE_BYTES);

        assert!(icon_for(&PickerItem::none("(none)"), &registry, &mut cache).is_none());

        let item = PickerItem::app("Foo", ComponentRef::new("com.foo", "com.foo.Main"));
        assert!(icon_for(&item, &registry, &mut cache).is_none());
        assert!(cache.is_empty());
    }
}
