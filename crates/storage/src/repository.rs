use async_trait::async_trait;
use intake_core::autosave::AutoSaveSnapshot;
use intake_core::model::Responses;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::keys;
use crate::mapping::{decode, encode};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String key/value store with the semantics of browser local storage.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed access to the persisted intake state.
#[async_trait]
pub trait FormStateRepository: Send + Sync {
    async fn load_responses(&self) -> Result<Option<Responses>, StorageError>;
    async fn save_responses(&self, responses: &Responses) -> Result<(), StorageError>;

    async fn load_current_section(&self) -> Result<Option<usize>, StorageError>;
    async fn save_current_section(&self, index: usize) -> Result<(), StorageError>;

    async fn load_user_email(&self) -> Result<Option<String>, StorageError>;
    /// `None` clears the stored email.
    async fn save_user_email(&self, email: Option<&str>) -> Result<(), StorageError>;

    async fn load_autosave(&self) -> Result<Option<AutoSaveSnapshot>, StorageError>;
    async fn save_autosave(&self, snapshot: &AutoSaveSnapshot) -> Result<(), StorageError>;

    /// Remove every intake key.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Maps the typed repository onto the fixed keys of a `LocalStore`.
pub struct LocalFormState<S: ?Sized> {
    store: Arc<S>,
}

impl<S: LocalStore + ?Sized> LocalFormState<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn read<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        match self.store.get_item(key).await? {
            Some(raw) => decode(&raw).map(Some),
            None => Ok(None),
        }
    }

    async fn write<T: serde::Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = encode(value)?;
        self.store.set_item(key, &raw).await
    }
}

#[async_trait]
impl<S: LocalStore + ?Sized> FormStateRepository for LocalFormState<S> {
    async fn load_responses(&self) -> Result<Option<Responses>, StorageError> {
        self.read(keys::RESPONSES).await
    }

    async fn save_responses(&self, responses: &Responses) -> Result<(), StorageError> {
        self.write(keys::RESPONSES, responses).await
    }

    async fn load_current_section(&self) -> Result<Option<usize>, StorageError> {
        self.read(keys::CURRENT_SECTION).await
    }

    async fn save_current_section(&self, index: usize) -> Result<(), StorageError> {
        self.write(keys::CURRENT_SECTION, &index).await
    }

    async fn load_user_email(&self) -> Result<Option<String>, StorageError> {
        let email: Option<String> = self.read(keys::USER_EMAIL).await?;
        Ok(email.filter(|val| !val.trim().is_empty()))
    }

    async fn save_user_email(&self, email: Option<&str>) -> Result<(), StorageError> {
        match email {
            Some(email) => self.write(keys::USER_EMAIL, &email).await,
            None => self.store.remove_item(keys::USER_EMAIL).await,
        }
    }

    async fn load_autosave(&self) -> Result<Option<AutoSaveSnapshot>, StorageError> {
        self.read(keys::AUTOSAVE).await
    }

    async fn save_autosave(&self, snapshot: &AutoSaveSnapshot) -> Result<(), StorageError> {
        self.write(keys::AUTOSAVE, snapshot).await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        for key in keys::ALL {
            self.store.remove_item(key).await?;
        }
        Ok(())
    }
}

/// Simple in-memory store for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        let guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }
}

#[async_trait]
impl LocalStore for InMemoryRepository {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Raw store plus the typed view over it, behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub local: Arc<dyn LocalStore>,
    pub form_state: Arc<dyn FormStateRepository>,
}

impl Storage {
    #[must_use]
    pub fn from_local(local: Arc<dyn LocalStore>) -> Self {
        let form_state: Arc<dyn FormStateRepository> =
            Arc::new(LocalFormState::new(Arc::clone(&local)));
        Self { local, form_state }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_local(Arc::new(InMemoryRepository::new()))
    }
}
