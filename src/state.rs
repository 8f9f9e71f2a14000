use std::collections::{HashMap, VecDeque};

use bytes::Bytes;
use tokio::sync::oneshot;

use crate::key_value_store::{KeyValueStore, ListEnd};

/// A BLPOP invocation waiting for an element to be pushed to its key.
#[derive(Debug)]
pub struct BlockedClient {
    /// Registration order, unique across all keys.
    pub arrival: u64,
    pub sender: oneshot::Sender<Bytes>,
}

/// Clients blocked on list keys, queued per key in arrival order.
///
/// Lives next to the [`KeyValueStore`] under the same lock so that a push and
/// the hand-off of its elements to waiting clients happen as one step.
#[derive(Debug, Default)]
pub struct State {
    pub blocked_clients: HashMap<Bytes, VecDeque<BlockedClient>>, // HashMap<<key>, VecDeque<BlockedClient>>
    next_arrival: u64,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a new waiter at the back of `key`'s queue.
    ///
    /// Returns the waiter's arrival number, used to remove it again, and the
    /// receiving end of its result slot.
    pub fn block_client(&mut self, key: Bytes) -> (u64, oneshot::Receiver<Bytes>) {
        let (sender, receiver) = oneshot::channel();
        let arrival = self.next_arrival;
        self.next_arrival += 1;

        let queue = self.blocked_clients.entry(key).or_default();
        // Waiters whose connection went away never get served, drop them now.
        queue.retain(|client| !client.sender.is_closed());
        queue.push_back(BlockedClient { arrival, sender });

        (arrival, receiver)
    }

    /// Removes the waiter registered as `arrival` on `key`, if it is still queued.
    ///
    /// Safe to call after the waiter has already been served. Returns whether a
    /// waiter was removed.
    pub fn unblock_client(&mut self, key: &[u8], arrival: u64) -> bool {
        let Some(queue) = self.blocked_clients.get_mut(key) else {
            return false;
        };

        let before = queue.len();
        queue.retain(|client| client.arrival != arrival);
        let removed = queue.len() != before;

        if queue.is_empty() {
            self.blocked_clients.remove(key);
        }

        removed
    }

    pub fn blocked_client_count(&self, key: &[u8]) -> usize {
        self.blocked_clients
            .get(key)
            .map(|queue| queue.len())
            .unwrap_or(0)
    }

    /// Hands elements from the head of the list at `key` to blocked clients,
    /// longest waiting first, until either runs out.
    ///
    /// Waiters that are no longer listening are skipped without consuming an
    /// element. Returns the number of clients served.
    pub fn serve_blocked_clients(&mut self, key: &[u8], store: &mut KeyValueStore) -> usize {
        let Some(queue) = self.blocked_clients.get_mut(key) else {
            return 0;
        };

        let mut served = 0;

        while let Some(client) = queue.pop_front() {
            if client.sender.is_closed() {
                continue;
            }

            let element = match store.pop_front(key) {
                Ok(Some(element)) => element,
                _ => {
                    queue.push_front(client);
                    break;
                }
            };

            match client.sender.send(element) {
                Ok(()) => served += 1,
                Err(element) => {
                    // The receiver went away between the check and the send.
                    // The element was just popped, so the key is a list or gone.
                    let pushed_back =
                        store.push(Bytes::copy_from_slice(key), vec![element], ListEnd::Head);
                    debug_assert!(pushed_back.is_ok(), "element popped from a list");
                }
            }
        }

        if queue.is_empty() {
            self.blocked_clients.remove(key);
        }

        served
    }
}
