use gloo::storage::{LocalStorage, Storage};
use kaboom_core::{KeyValueStore, StoreError};

/// [`KeyValueStore`] backed by the browser's `localStorage`.
///
/// Reads that fail (storage disabled, quota, private mode) behave like a missing key.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("failed to read {}: {:?}", key, err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| StoreError::Write(format!("{err:?}")))
    }

    fn remove(&mut self, key: &str) {
        LocalStorage::delete(key);
    }
}
