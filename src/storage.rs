//! Key-value persistence for client state
//!
//! The planner stores the trip form, unit preference and map filters behind
//! [`KeyValueStore`]. [`FjallStore`] keeps them on disk; [`InMemoryStore`]
//! is for tests and throwaway sessions.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use fjall::Keyspace;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::{debug, instrument};

use crate::models::{MapFilters, TripFormData, UnitPreference};
use crate::{RambleError, Result};

pub const TRIP_FORM_KEY: &str = "ramble66:trip-form";
pub const UNIT_PREFERENCE_KEY: &str = "ramble66:units";
pub const MAP_FILTERS_KEY: &str = "ramble66:map-filters";

/// String key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredValue {
    value: String,
    stored_at: u64, // Unix timestamp (seconds)
}

/// File-backed store on an embedded fjall keyspace
pub struct FjallStore {
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    let value = store.get(key).map_err(storage_error)?;
    Ok(value.map(|v| v.to_vec()))
}

fn storage_error(err: impl std::fmt::Display) -> RambleError {
    RambleError::storage(err.to_string())
}

impl FjallStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        std::fs::create_dir_all(path.as_ref())?;
        let db = fjall::Database::builder(path.as_ref())
            .open()
            .map_err(storage_error)?;
        let store = db
            .keyspace("client_state", fjall::KeyspaceCreateOptions::default)
            .map_err(storage_error)?;
        Ok(Self { store })
    }
}

#[async_trait]
impl KeyValueStore for FjallStore {
    #[instrument(name = "query_store", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || get_from_store(store, key_bytes))
            .await
            .map_err(storage_error)??;

        match maybe_bytes {
            Some(bytes) => {
                let stored: StoredValue = postcard::from_bytes(&bytes).map_err(storage_error)?;
                debug!(stored_at = stored.stored_at, "Key found");
                Ok(Some(stored.value))
            }
            None => {
                debug!("Key not found");
                Ok(None)
            }
        }
    }

    #[instrument(name = "put_store", level = "debug", skip(self, value))]
    async fn set(&self, key: &str, value: String) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let stored_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(storage_error)?
            .as_secs();
        let bytes = postcard::to_stdvec(&StoredValue { value, stored_at }).map_err(storage_error)?;

        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(storage_error)?
            .map_err(storage_error)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || store.remove(key))
            .await
            .map_err(storage_error)?
            .map_err(storage_error)
    }
}

/// Typed access to the persisted client state
pub struct ClientState<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ClientState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.store.get(key).await? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| RambleError::storage(format!("Corrupt value under '{key}': {e}"))),
            None => Ok(T::default()),
        }
    }

    async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| RambleError::storage(format!("Cannot encode '{key}': {e}")))?;
        self.store.set(key, json).await
    }

    pub async fn trip_form(&self) -> Result<TripFormData> {
        self.load(TRIP_FORM_KEY).await
    }

    pub async fn save_trip_form(&self, form: &TripFormData) -> Result<()> {
        self.save(TRIP_FORM_KEY, form).await
    }

    pub async fn clear_trip_form(&self) -> Result<()> {
        self.store.remove(TRIP_FORM_KEY).await
    }

    pub async fn unit_preference(&self) -> Result<UnitPreference> {
        self.load(UNIT_PREFERENCE_KEY).await
    }

    pub async fn save_unit_preference(&self, units: UnitPreference) -> Result<()> {
        self.save(UNIT_PREFERENCE_KEY, &units).await
    }

    pub async fn map_filters(&self) -> Result<MapFilters> {
        self.load(MAP_FILTERS_KEY).await
    }

    pub async fn save_map_filters(&self, filters: &MapFilters) -> Result<()> {
        self.save(MAP_FILTERS_KEY, filters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TripStyle;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);
        store.set("a", "1".to_string()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fjall_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FjallStore::open(dir.path()).unwrap();
            store.set("route", "chicago-la".to_string()).await.unwrap();
            assert_eq!(store.get("route").await.unwrap().as_deref(), Some("chicago-la"));
        }

        let reopened = FjallStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("route").await.unwrap().as_deref(),
            Some("chicago-la")
        );
        reopened.remove("route").await.unwrap();
        assert_eq!(reopened.get("route").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fjall_store_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("ramble66").join("state");

        let store = FjallStore::open(&nested).unwrap();
        store.set("units", "metric".to_string()).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_fjall_store_path_blocked_by_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("state");
        std::fs::write(&file, b"not a directory").unwrap();

        assert!(matches!(
            FjallStore::open(file.join("inner")),
            Err(RambleError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_client_state_defaults_and_round_trip() {
        let state = ClientState::new(InMemoryStore::new());
        assert_eq!(state.trip_form().await.unwrap(), TripFormData::default());
        assert_eq!(state.unit_preference().await.unwrap(), UnitPreference::Imperial);

        let form = TripFormData {
            end_location: "Amarillo, TX".to_string(),
            travel_days: 4,
            trip_style: TripStyle::Express,
            ..TripFormData::default()
        };
        state.save_trip_form(&form).await.unwrap();
        state.save_unit_preference(UnitPreference::Metric).await.unwrap();

        assert_eq!(state.trip_form().await.unwrap(), form);
        assert_eq!(state.unit_preference().await.unwrap(), UnitPreference::Metric);

        state.clear_trip_form().await.unwrap();
        assert_eq!(state.trip_form().await.unwrap(), TripFormData::default());
    }

    #[tokio::test]
    async fn test_client_state_map_filters() {
        let state = ClientState::new(InMemoryStore::new());
        let mut filters = MapFilters::default();
        filters.hidden_categories.insert("lodging".to_string());
        filters.historic_only = true;

        state.save_map_filters(&filters).await.unwrap();
        assert_eq!(state.map_filters().await.unwrap(), filters);
    }

    #[tokio::test]
    async fn test_corrupt_value_is_a_storage_error() {
        let store = InMemoryStore::new();
        store.set(TRIP_FORM_KEY, "{not json".to_string()).await.unwrap();
        let state = ClientState::new(store);
        assert!(matches!(
            state.trip_form().await,
            Err(RambleError::Storage { .. })
        ));
    }
}
