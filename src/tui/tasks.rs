//! Background work spawned by the event loop: backend requests and the
//! status auto-clear timer. Both report back as `Action`s on the loop's channel.

use std::sync::{Arc, mpsc};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::{AbortHandle, JoinHandle};

use crate::api::TodoBackend;
use crate::core::action::{Action, Request};

/// Runs one backend call and wraps its result in the matching completion action.
pub async fn perform(backend: &dyn TodoBackend, request: Request) -> Action {
    match request {
        Request::List => Action::Listed(backend.list().await),
        Request::Create(payload) => Action::Created(backend.create(&payload).await),
        Request::Update { id, payload } => {
            let result = backend.update(&id, &payload).await;
            Action::Updated {
                id,
                payload,
                result,
            }
        }
        Request::Delete(id) => {
            let result = backend.delete(&id).await;
            Action::Deleted { id, result }
        }
    }
}

pub fn spawn_request(
    backend: Arc<dyn TodoBackend>,
    request: Request,
    tx: mpsc::Sender<Action>,
) -> JoinHandle<()> {
    info!("Spawning {} request: {:?}", backend.name(), request);
    tokio::spawn(async move {
        let action = perform(backend.as_ref(), request).await;
        debug!("Request finished: {:?}", action);
        if tx.send(action).is_err() {
            warn!("Failed to send request result: receiver dropped");
        }
    })
}

/// Resettable auto-clear for the status message.
///
/// Arming aborts the pending clear before starting a new one; the clear
/// carries its generation so the reducer can still drop one that raced.
pub struct StatusTimer {
    delay: Duration,
    pending: Option<AbortHandle>,
}

impl StatusTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn arm(&mut self, generation: u64, tx: mpsc::Sender<Action>) {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
        let delay = self.delay;
        debug!("Status clear armed for generation {} in {:?}", generation, delay);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(Action::StatusExpired(generation)).is_err() {
                warn!("Failed to send status expiry: receiver dropped");
            }
        });
        self.pending = Some(task.abort_handle());
    }
}

impl Drop for StatusTimer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
