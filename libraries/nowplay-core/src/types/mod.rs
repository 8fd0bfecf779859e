//! Domain types

mod ids;
mod item;

pub use ids::ItemId;
pub use item::MediaItem;
