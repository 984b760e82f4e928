//! The async dispatch bridge.
//!
//! Each triggering event spawns one detached unit of work on a dedicated
//! tokio runtime; the simulation thread returns immediately and never
//! blocks. Workers synchronize with the tick loop only through the shared
//! [`SessionContext`]: a successful generation pushes a dialogue reply and
//! appends the completed turn to that entity's history; every failure mode
//! is converted to "nothing happened".
//!
//! The source behavior detached raw OS threads with no timeout, leaking a
//! thread for every call that hung. Here the pool is bounded three ways: a
//! fixed number of runtime worker threads, a semaphore capping in-flight
//! generation calls, and a hard per-call timeout. A cancellation token tied
//! to [`Dispatcher::shutdown`] stops the whole pool at process exit.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use parley_core::queue::{DialogueReply, StatusReply};
use parley_core::session::SessionContext;
use parley_core::types::{EntityId, LocationKey, SessionId};

use crate::client::{Endpoint, GenClient};
use crate::request::GenerateRequest;

/// Tuning for the worker pool.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// OS threads backing the tokio runtime.
    pub worker_threads: usize,
    /// Maximum concurrent in-flight generation calls; further dispatches
    /// queue on the semaphore.
    pub max_in_flight: usize,
    /// Hard timeout for one generation call.
    pub generate_timeout: Duration,
    /// Timeout for one reachability probe.
    pub probe_timeout: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            max_in_flight: 8,
            generate_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(2),
        }
    }
}

/// Owner of the worker pool; one per process, alongside the session context.
#[derive(Debug)]
pub struct Dispatcher {
    runtime: Runtime,
    client: GenClient,
    ctx: Arc<SessionContext>,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
    options: DispatchOptions,
}

impl Dispatcher {
    /// Build the runtime and bind the dispatcher to the shared context.
    ///
    /// # Errors
    ///
    /// Returns an error if the tokio runtime cannot be created.
    pub fn new(ctx: Arc<SessionContext>, options: DispatchOptions) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(options.worker_threads)
            .thread_name("parley-worker")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime,
            client: GenClient::new(),
            ctx,
            permits: Arc::new(Semaphore::new(options.max_in_flight)),
            cancel: CancellationToken::new(),
            options,
        })
    }

    /// Launch a detached generation worker for one player utterance.
    ///
    /// On trimmed non-empty success the worker pushes a [`DialogueReply`]
    /// keyed by `entity`/`location` and appends `turn + " " + text` to that
    /// entity's history — the identity captured here, not whatever the
    /// player is targeting by the time the reply lands. On any failure the
    /// request is dropped, never retried.
    pub fn dispatch_generation(
        &self,
        entity: EntityId,
        location: LocationKey,
        endpoint: Endpoint,
        request: GenerateRequest,
        turn: String,
    ) {
        let ctx = Arc::clone(&self.ctx);
        let client = self.client.clone();
        let permits = Arc::clone(&self.permits);
        let cancel = self.cancel.clone();
        let timeout = self.options.generate_timeout;

        self.runtime.spawn(async move {
            let work = async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };

                match client.generate(&endpoint, &request, timeout).await {
                    Ok(text) => {
                        ctx.conversations.append_turn(entity, &format!("{turn} {text}"));
                        ctx.replies.push_dialogue(DialogueReply {
                            entity,
                            location,
                            text,
                        });
                        debug!(%entity, "generation reply queued");
                    }
                    Err(err) => {
                        debug!(%entity, error = %err, "generation request dropped");
                    }
                }
            };

            tokio::select! {
                () = cancel.cancelled() => {}
                () = work => {}
            }
        });
    }

    /// Launch a detached reachability probe.
    ///
    /// Always produces a [`StatusReply`] — `reachable: false` covers every
    /// failure mode. Probes bypass the generation semaphore: a saturated or
    /// hung generation endpoint must not delay the very probe a player uses
    /// to diagnose it.
    pub fn dispatch_status_check(&self, requester: SessionId, endpoint: Endpoint) {
        let ctx = Arc::clone(&self.ctx);
        let client = self.client.clone();
        let cancel = self.cancel.clone();
        let timeout = self.options.probe_timeout;

        self.runtime.spawn(async move {
            let work = async move {
                let reachable = client.probe(&endpoint, timeout).await;
                ctx.replies.push_status(StatusReply {
                    requester,
                    reachable,
                });
                debug!(%requester, reachable, "status probe completed");
            };

            tokio::select! {
                () = cancel.cancelled() => {}
                () = work => {}
            }
        });
    }

    /// Cancel all workers and tear the runtime down, waiting briefly for
    /// in-flight tasks to notice.
    pub fn shutdown(self) {
        self.cancel.cancel();
        self.runtime.shutdown_timeout(Duration::from_secs(2));
        info!("dispatcher shut down");
    }
}
