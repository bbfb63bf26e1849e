use crate::error::StorageError;
use crate::render::RasterSurface;
use crate::storage::KeyValueStore;

use super::{ConfigSnapshot, Configuration, FieldSnapshot, RestoreReport};

/// Slot holding the stored configuration JSON.
pub const CONFIG_KEY: &str = "pixelArtConfig";

/// Slot holding a PNG data URL of the last saved frame.
pub const IMAGE_KEY: &str = "pixelGridImage";

/// Slot holding the field-engine snapshot.
pub const FIELD_STATE_KEY: &str = "pixelGridState";

pub fn save_config<K: KeyValueStore + ?Sized>(kv: &mut K, config: &Configuration) -> Result<(), StorageError> {
    let json = ConfigSnapshot::stored_json(config)?;
    kv.set(CONFIG_KEY, &json)?;
    log::info!("configuration saved ({} bytes)", json.len());
    Ok(())
}

/// Loads the stored configuration. `Ok(None)` when nothing was saved.
pub fn load_config<K: KeyValueStore + ?Sized>(kv: &K) -> Result<Option<(Configuration, RestoreReport)>, StorageError> {
    let Some(json) = kv.get(CONFIG_KEY)? else {
        return Ok(None);
    };
    let restored = ConfigSnapshot::restore(&json)?;
    log::info!("configuration loaded: {}", restored.1);
    Ok(Some(restored))
}

pub fn save_field_state<K: KeyValueStore + ?Sized>(kv: &mut K, config: &Configuration) -> Result<(), StorageError> {
    let json = FieldSnapshot::capture(config).to_json()?;
    kv.set(FIELD_STATE_KEY, &json)
}

/// Applies the stored field snapshot on top of `base`. `Ok(None)` when nothing was saved.
pub fn load_field_state<K: KeyValueStore + ?Sized>(
    kv: &K,
    base: &Configuration,
) -> Result<Option<(Configuration, RestoreReport)>, StorageError> {
    let Some(json) = kv.get(FIELD_STATE_KEY)? else {
        return Ok(None);
    };
    Ok(Some(FieldSnapshot::restore(&json, base)?))
}

/// Stores the surface content as a PNG data URL.
pub fn save_image<K, S>(kv: &mut K, surface: &S) -> Result<(), StorageError>
where
    K: KeyValueStore + ?Sized,
    S: RasterSurface + ?Sized,
{
    let url = surface.snapshot_data_url()?;
    kv.set(IMAGE_KEY, &url)
}

/// Paints the stored image onto the surface. Returns `false` when nothing was saved.
pub fn load_image<K, S>(kv: &K, surface: &mut S) -> Result<bool, StorageError>
where
    K: KeyValueStore + ?Sized,
    S: RasterSurface + ?Sized,
{
    let Some(url) = kv.get(IMAGE_KEY)? else {
        return Ok(false);
    };
    surface.restore_data_url(&url)?;
    Ok(true)
}
