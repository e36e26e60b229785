//! Gateway logic between a UI client and a local Hue bridge.
//!
//! - **[`Gateway`]**: the facade a control surface calls. Owns the
//!   persisted state and routes every operation through the pairing,
//!   favorites and aggregation components.
//!
//! - **[`PairingManager`]**: stored-credential lifecycle: validate,
//!   acquire, re-pair when the bridge rejects the stored username.
//!
//! - **[`FavoritesStore`]**: caller-side favorite marks for rooms,
//!   self-healing when the persisted entry is malformed.
//!
//! - **[`ResourceAggregator`]**: fetches groups, lights and scenes and
//!   shapes them into [`Room`], [`Light`] and [`Scene`] summaries.
//!
//! - **[`StateStore`]**: load/save boundary for the credential and
//!   favorites; [`JsonFileStore`] writes via temp file + rename under an
//!   advisory lock shared with other processes.

pub mod aggregate;
pub mod brightness;
pub mod config;
pub mod error;
pub mod favorites;
pub mod gateway;
pub mod model;
pub mod pairing;
pub mod state;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::ResourceAggregator;
pub use config::{DEFAULT_DEVICE_TYPE, GatewayConfig, TlsVerification};
pub use error::CoreError;
pub use favorites::{FavoriteSet, FavoritesStore};
pub use gateway::{Gateway, Health};
pub use pairing::{PairingManager, PairingState};
pub use state::{
    FavoriteRooms, JsonFileStore, MemoryStore, PersistedState, SharedState, StateStore, StoreLock,
};

pub use model::{
    FavoriteToggle, Light, LightBrightness, LightPower, PowerState, Room, RoomBrightness, RoomKind,
    RoomLights, RoomPower, RoomRef, Scene, SceneRecall,
};

/// Success envelope: `{"ok": true, ...payload}`.
///
/// With an empty `key` an object payload is merged into the envelope;
/// otherwise the payload is placed under `key`.
pub fn ok_body(key: &str, payload: serde_json::Value) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert("ok".into(), serde_json::Value::Bool(true));
    match payload {
        serde_json::Value::Object(map) if key.is_empty() => body.extend(map),
        other => {
            body.insert(key.into(), other);
        }
    }
    serde_json::Value::Object(body)
}
