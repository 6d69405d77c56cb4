//! Usage: App picker backend (enumeration worker, selectable items, icon cache).

mod enumerate;
mod icon_cache;
mod items;

pub use enumerate::{enumerate_apps, CancelFlag};
pub use icon_cache::{
    cache_capacity_bytes, decode_and_normalize, icon_for, DecodedIcon, IconCache, ICON_EDGE_PX,
    MAX_ICON_CACHE_BYTES,
};
pub use items::{filter_by_label, PickerItem};
