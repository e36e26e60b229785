// huelink-api: Async client for the local Hue bridge JSON API

pub mod client;
pub mod error;
pub mod fault;
pub mod models;
pub mod pairing;
pub mod resources;
pub mod transport;

pub use client::BridgeClient;
pub use error::Error;
pub use fault::{BridgeFault, BridgeResponse, CONNECT_FAILED, UNEXPECTED_RESPONSE, error_returned};
pub use models::{GroupAction, GroupRecord, LightRecord, LightStateUpdate, SceneRecord};
pub use transport::{Scheme, TlsMode, TransportConfig};

pub use reqwest::Method;
