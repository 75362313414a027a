//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Seeding
//! - Storage (LocalStorage on web)
//! - The wasm-bindgen entry point

#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
#[cfg(target_arch = "wasm32")]
pub use web::WebGame;

use crate::persistence::{KeyValueStore, MemoryStore};

/// Fresh seed for a new engine
#[cfg(target_arch = "wasm32")]
pub fn random_seed() -> u64 {
    use js_sys::Math::random;
    let hi = (random() * f64::from(u32::MAX)) as u64;
    let lo = (random() * f64::from(u32::MAX)) as u64;
    (hi << 32) | lo
}

#[cfg(not(target_arch = "wasm32"))]
pub fn random_seed() -> u64 {
    rand::random()
}

/// The persistent store for this platform. Falls back to memory when
/// LocalStorage is unavailable so play continues without saving.
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn KeyValueStore> {
    match LocalStore::open() {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!("{err}, best scores and settings will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn KeyValueStore> {
    Box::new(MemoryStore::new())
}
