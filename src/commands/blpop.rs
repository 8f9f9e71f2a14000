use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use tokio::{runtime::Handle, sync::oneshot};
use tracing::{debug, warn};

use crate::{
    commands::{command_error::CommandError, command_utils::parse_timeout},
    database::{Database, SharedDatabase},
    key_value_store::ListEnd,
    resp::RespValue,
};

pub struct BlpopArguments {
    key: Bytes,
    /// `None` blocks until an element arrives.
    timeout: Option<Duration>,
}

impl BlpopArguments {
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        if arguments.len() < 2 {
            return Err(CommandError::WrongNumberOfArguments("blpop"));
        }

        let timeout = parse_timeout(&arguments[1])?;

        Ok(Self {
            key: arguments[0].clone(),
            timeout,
        })
    }
}

/// Handles the Redis BLPOP command.
///
/// Pops the head of the list at the key right away when there is one.
/// Otherwise the client is queued behind earlier waiters on the same key and
/// suspended, without holding the database lock, until a push hands it an
/// element or the timeout elapses.
///
/// # Returns
///
/// * `Ok(RespValue::Array)` - `[key, element]`
/// * `Ok(RespValue::NullArray)` - If the timeout elapsed first
/// * `Err(CommandError::InvalidTimeout | NegativeTimeout)` - If the timeout is invalid
/// * `Err(CommandError::WrongType)` - If the key holds a string or a stream
pub async fn blpop(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let blpop_arguments = BlpopArguments::parse(arguments)?;
    let key = blpop_arguments.key;

    let mut database_guard = database.lock().await;

    if let Some(element) = database_guard.store.pop_front(&key)? {
        return Ok(RespValue::bulk_string_array([key, element]));
    }

    let (arrival, receiver) = database_guard.state.block_client(key.clone());
    drop(database_guard);

    debug!(arrival, "client blocked on list");

    let mut waiter = BlockedWaiter {
        database,
        key,
        arrival,
        receiver: Some(receiver),
    };

    match waiter.wait(blpop_arguments.timeout).await {
        Some(element) => Ok(RespValue::bulk_string_array([waiter.key.clone(), element])),
        None => Ok(RespValue::NullArray),
    }
}

/// A queued BLPOP client.
///
/// Dropping it before [`BlockedWaiter::wait`] completes, as happens when the
/// connection goes away, takes it off the queue. An element that was already
/// handed to it goes back to the head of the list.
struct BlockedWaiter {
    database: SharedDatabase,
    key: Bytes,
    arrival: u64,
    /// `None` once the wait has finished.
    receiver: Option<oneshot::Receiver<Bytes>>,
}

impl BlockedWaiter {
    async fn wait(&mut self, timeout: Option<Duration>) -> Option<Bytes> {
        let receiver = self.receiver.as_mut()?;

        let element = match timeout {
            None => receiver.await.ok(),
            Some(timeout) => match tokio::time::timeout(timeout, &mut *receiver).await {
                Ok(result) => result.ok(),
                Err(_) => {
                    let mut database_guard = self.database.lock().await;
                    database_guard.state.unblock_client(&self.key, self.arrival);
                    drop(database_guard);

                    // A push may have served this client after the timer fired
                    // but before the lock was taken; once unblocked nothing
                    // else can be delivered.
                    receiver.try_recv().ok()
                }
            },
        };

        self.receiver = None;
        element
    }
}

impl Drop for BlockedWaiter {
    fn drop(&mut self) {
        let Some(receiver) = self.receiver.take() else {
            return;
        };

        if let Ok(mut database_guard) = self.database.try_lock() {
            release_waiter(&mut database_guard, &self.key, self.arrival, receiver);
            return;
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!(arrival = self.arrival, "no runtime to release blocked client");
            return;
        };

        let database = Arc::clone(&self.database);
        let key = self.key.clone();
        let arrival = self.arrival;

        runtime.spawn(async move {
            let mut database_guard = database.lock().await;
            release_waiter(&mut database_guard, &key, arrival, receiver);
        });
    }
}

fn release_waiter(
    database: &mut Database,
    key: &Bytes,
    arrival: u64,
    mut receiver: oneshot::Receiver<Bytes>,
) {
    if database.state.unblock_client(key, arrival) {
        debug!(arrival, "blocked client went away");
        return;
    }

    let Ok(element) = receiver.try_recv() else {
        return;
    };

    if let Err(e) = database.push(key.clone(), vec![element], ListEnd::Head) {
        warn!(arrival, error = %e, "dropped element of a client that went away");
    }
}
