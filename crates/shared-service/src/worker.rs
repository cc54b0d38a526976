//! Worker loop consuming a service's request queue.

use async_trait::async_trait;
use shared_types::{Request, ServiceState};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

/// Domain-specific processing for one dequeued request.
///
/// Each call runs on its own task, so implementations may be slow or fan
/// out further work without stalling the queue.
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    /// Process one request.
    async fn handle_request(&self, req: Request);
}

/// Consume `requests` until the service is stopped.
///
/// Each iteration observes, in order: quit (return without touching the
/// queue), pause (wait for the next state change, queue untouched), and
/// otherwise dequeues one request and spawns its processing.
pub(crate) async fn worker_loop<H>(
    name: String,
    mut requests: mpsc::UnboundedReceiver<Request>,
    mut state: watch::Receiver<ServiceState>,
    handler: Arc<H>,
) where
    H: RequestHandler + ?Sized,
{
    debug!(service = %name, "Worker loop started");

    loop {
        let current = *state.borrow_and_update();
        match current {
            ServiceState::Stopped => break,
            ServiceState::Created | ServiceState::Paused => {
                if state.changed().await.is_err() {
                    break;
                }
                continue;
            }
            ServiceState::Running => {}
        }

        tokio::select! {
            biased;
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            next = requests.recv() => match next {
                Some(req) => {
                    trace!(service = %name, name = %req.name, "Dispatching request");
                    let handler = handler.clone();
                    tokio::spawn(async move { handler.handle_request(req).await });
                }
                None => break,
            },
        }
    }

    debug!(service = %name, "Worker loop exited");
}
