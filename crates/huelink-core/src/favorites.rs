// ── Favorite rooms ──
//
// Favorites are a caller-side marking, not a bridge concept. A corrupted
// favorites entry must only cost the marks: it reads as empty and is
// rewritten as an empty list.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::CoreError;
use crate::state::{FavoriteRooms, PersistedState, SharedState};

/// Duplicate-free set of favorite room ids, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: Vec<String>,
}

impl FavoriteSet {
    pub fn contains(&self, room_id: &str) -> bool {
        self.ids.iter().any(|id| id == room_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    fn insert(&mut self, room_id: &str) {
        if !self.contains(room_id) {
            self.ids.push(room_id.to_owned());
        }
    }

    /// Removing an id that is not present is a no-op.
    fn remove(&mut self, room_id: &str) {
        self.ids.retain(|id| id != room_id);
    }
}

impl FromIterator<String> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::default();
        for id in iter {
            set.insert(&id);
        }
        set
    }
}

impl From<FavoriteSet> for FavoriteRooms {
    fn from(set: FavoriteSet) -> Self {
        Self::List(set.ids)
    }
}

fn well_formed(state: &PersistedState) -> Option<FavoriteSet> {
    match &state.favorite_rooms {
        FavoriteRooms::List(ids) => Some(ids.iter().cloned().collect()),
        FavoriteRooms::Malformed(_) => None,
    }
}

/// Favorite-room bookkeeping on top of [`SharedState`].
pub struct FavoritesStore {
    state: Arc<SharedState>,
}

impl FavoritesStore {
    pub fn new(state: Arc<SharedState>) -> Self {
        Self { state }
    }

    /// Current favorites; repairs a malformed entry on the way.
    pub async fn snapshot(&self) -> FavoriteSet {
        if let Some(set) = self.state.read(well_formed).await {
            return set;
        }
        self.repair().await;
        FavoriteSet::default()
    }

    pub async fn is_favorite(&self, room_id: &str) -> bool {
        self.snapshot().await.contains(room_id)
    }

    /// Flip the favorite mark and return the new state.
    pub async fn toggle(&self, room_id: &str) -> Result<bool, CoreError> {
        let favorite = self
            .state
            .update(|state| {
                let mut set = well_formed(state).unwrap_or_default();
                let favorite = !set.contains(room_id);
                if favorite {
                    set.insert(room_id);
                } else {
                    set.remove(room_id);
                }
                state.favorite_rooms = set.into();
                (favorite, true)
            })
            .await?;
        info!(room_id, favorite, "favorite toggled");
        Ok(favorite)
    }

    async fn repair(&self) {
        let result = self
            .state
            .update(|state| {
                // Another writer may have fixed it in the meantime.
                if well_formed(state).is_some() {
                    return (false, false);
                }
                state.favorite_rooms = FavoriteRooms::default();
                (true, true)
            })
            .await;
        match result {
            Ok(true) => warn!("favoriteRooms was not a list; reset to empty"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "could not repair favoriteRooms"),
        }
    }
}
