// ── Pairing lifecycle ──
//
// Owns the stored username. `ensure_paired` is the only path that reaches
// the bridge's pairing endpoint, and it is never called speculatively: the
// bridge only grants a username while its link button is pressed.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use huelink_api::{BridgeClient, BridgeFault};

use crate::error::CoreError;
use crate::state::SharedState;

/// Pairing state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingState {
    /// No credential stored.
    Unpaired,
    /// A stored credential is being checked against the bridge.
    Validating,
    /// Credential stored and, as far as we know, accepted.
    Paired,
}

pub struct PairingManager {
    client: Arc<BridgeClient>,
    state: Arc<SharedState>,
    device_type: String,
    pairing_state: watch::Sender<PairingState>,
    /// Serializes `ensure_paired` so concurrent requests never race into
    /// two acquisitions.
    pairing_lock: Mutex<()>,
}

impl PairingManager {
    pub async fn new(
        client: Arc<BridgeClient>,
        state: Arc<SharedState>,
        device_type: impl Into<String>,
    ) -> Self {
        let initial = if state.read(|s| s.username().is_some()).await {
            PairingState::Paired
        } else {
            PairingState::Unpaired
        };
        let (pairing_state, _) = watch::channel(initial);
        Self {
            client,
            state,
            device_type: device_type.into(),
            pairing_state,
            pairing_lock: Mutex::new(()),
        }
    }

    /// Current pairing state.
    pub fn pairing_state(&self) -> PairingState {
        *self.pairing_state.borrow()
    }

    /// Subscribe to pairing state changes.
    pub fn subscribe(&self) -> watch::Receiver<PairingState> {
        self.pairing_state.subscribe()
    }

    fn transition(&self, next: PairingState) {
        self.pairing_state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            debug!(from = ?*current, to = ?next, "pairing state");
            *current = next;
            true
        });
    }

    // ── Bridge operations ────────────────────────────────────────────

    /// Does the bridge accept `username`? Any fault, including an
    /// unreachable bridge, counts as "no". No side effects.
    pub async fn validate(&self, address: &str, username: &str) -> bool {
        !self
            .client
            .check_username(address, username)
            .await
            .is_fault()
    }

    /// Ask the bridge for a new username. No side effects on stored state.
    pub async fn acquire(&self, address: &str) -> Result<String, BridgeFault> {
        self.client.create_username(address, &self.device_type).await
    }

    /// Return a working username, pairing if necessary.
    ///
    /// A stored username is validated first; if the bridge rejects it, it
    /// is cleared from storage and exactly one acquisition is attempted.
    pub async fn ensure_paired(&self, address: &str) -> Result<String, CoreError> {
        let _guard = self.pairing_lock.lock().await;

        let stored = self.state.read(|s| s.username().map(String::from)).await;
        if let Some(username) = stored {
            self.transition(PairingState::Validating);
            if self.validate(address, &username).await {
                self.transition(PairingState::Paired);
                return Ok(username);
            }
            warn!("stored username rejected by bridge, clearing");
            self.clear_if(&username).await?;
        }

        match self.acquire(address).await {
            Ok(username) => {
                self.store(&username).await?;
                info!("paired with bridge");
                Ok(username)
            }
            Err(fault) => {
                self.transition(PairingState::Unpaired);
                warn!(code = fault.code, description = %fault.description, "pairing failed");
                if fault.is_connect_failure() {
                    Err(CoreError::BridgeUnreachable {
                        description: fault.description,
                    })
                } else {
                    Err(CoreError::PairingFailed { fault })
                }
            }
        }
    }

    // ── Local credential ─────────────────────────────────────────────

    /// The stored username, or `NotPaired`. Never touches the network.
    pub async fn require(&self) -> Result<String, CoreError> {
        self.state
            .read(|s| s.username().map(String::from))
            .await
            .ok_or(CoreError::NotPaired)
    }

    /// Store a username obtained out of band.
    pub async fn set_username(&self, username: &str) -> Result<String, CoreError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CoreError::caller_input("username", "username missing"));
        }
        self.store(username).await?;
        Ok(username.to_owned())
    }

    /// Forget the stored username.
    pub async fn clear(&self) -> Result<(), CoreError> {
        self.state
            .update(|s| {
                let changed = s.username.is_some();
                s.username = None;
                ((), changed)
            })
            .await?;
        self.transition(PairingState::Unpaired);
        info!("username cleared");
        Ok(())
    }

    async fn store(&self, username: &str) -> Result<(), CoreError> {
        self.state
            .update(|s| {
                let changed = s.username.as_deref() != Some(username);
                s.username = Some(username.to_owned());
                ((), changed)
            })
            .await?;
        self.transition(PairingState::Paired);
        Ok(())
    }

    /// Clear the credential only if it is still the one that failed.
    async fn clear_if(&self, rejected: &str) -> Result<(), CoreError> {
        self.state
            .update(|s| {
                let stale = s.username() == Some(rejected);
                if stale {
                    s.username = None;
                }
                ((), stale)
            })
            .await?;
        self.transition(PairingState::Unpaired);
        Ok(())
    }
}
