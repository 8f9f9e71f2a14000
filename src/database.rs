use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::{
    key_value_store::{KeyValueStore, ListEnd, StoreError},
    state::State,
};

/// Handle shared by every connection.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// The keyspace together with the clients blocked on it.
///
/// Both live behind one lock: a push and the delivery of its elements to
/// blocked clients can never interleave with another command.
#[derive(Debug, Default)]
pub struct Database {
    pub store: KeyValueStore,
    pub state: State,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedDatabase {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Pushes `values` onto the list at `key`, then serves blocked clients.
    ///
    /// Returns the list length right after the push, before any element is
    /// handed to a waiter.
    pub fn push(&mut self, key: Bytes, values: Vec<Bytes>, end: ListEnd) -> Result<usize, StoreError> {
        let length = self.store.push(key.clone(), values, end)?;
        self.state.serve_blocked_clients(&key, &mut self.store);

        Ok(length)
    }
}
