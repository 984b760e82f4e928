//! The AI manager — the one object a host embeds.
//!
//! Owns the [`SessionContext`] and the dispatcher, and exposes the two
//! entry points the host invokes from its simulation thread. Neither entry
//! point ever blocks on network I/O or touches a host object off-thread.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use parley_core::error::ConfigError;
use parley_core::queue::ConfigReply;
use parley_core::session::SessionContext;
use parley_core::types::SessionId;
use parley_llm::client::Endpoint;
use parley_llm::dispatch::{DispatchOptions, Dispatcher};
use parley_llm::request::build_request;

use crate::hook::{ChatKind, NpcTarget, PlayerSession, WorldHost};
use crate::protocol::{self, ControlCommand};
use crate::speech;

/// Construction options for [`AiManager`].
#[derive(Debug, Clone)]
pub struct AiManagerOptions {
    /// Where the `key=value` config file lives.
    pub config_path: PathBuf,
    /// Dialogue replies enacted per tick; the rest wait for the next tick.
    pub dialogue_drain_cap: usize,
    /// Per-entity conversation history cap, in bytes.
    pub history_limit: usize,
    /// Worker pool tuning.
    pub dispatch: DispatchOptions,
}

impl Default for AiManagerOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("ai_manager.conf"),
            dialogue_drain_cap: 1,
            history_limit: parley_core::conversation::DEFAULT_HISTORY_LIMIT,
            dispatch: DispatchOptions::default(),
        }
    }
}

/// The bridge's root object: session context plus dispatcher, constructed
/// once at process start.
#[derive(Debug)]
pub struct AiManager {
    ctx: Arc<SessionContext>,
    dispatcher: Dispatcher,
    config_path: PathBuf,
    dialogue_drain_cap: usize,
}

impl AiManager {
    /// Build the manager and its worker pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker runtime cannot be created.
    pub fn new(options: AiManagerOptions) -> io::Result<Self> {
        let ctx = Arc::new(SessionContext::with_history_limit(options.history_limit));
        let dispatcher = Dispatcher::new(Arc::clone(&ctx), options.dispatch)?;
        Ok(Self {
            ctx,
            dispatcher,
            config_path: options.config_path,
            dialogue_drain_cap: options.dialogue_drain_cap,
        })
    }

    /// Load persisted configuration; called once at host startup.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing config file cannot be read, or the
    /// save-on-first-load fallback cannot write.
    pub fn startup(&self) -> Result<(), ConfigError> {
        self.ctx.config.load(&self.config_path)?;
        info!("AI manager module loaded");
        Ok(())
    }

    /// The shared session context, for hosts that pre-register character
    /// cards or inspect state in tests.
    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Script hook: a player message is about to be sent.
    ///
    /// The message itself is never suppressed or altered — the host delivers
    /// it normally after this returns. Control tokens additionally trigger
    /// config traffic; a say-type message with a selected NPC additionally
    /// triggers generation.
    pub fn on_chat_message(
        &self,
        session: &mut dyn PlayerSession,
        speaker: SessionId,
        kind: ChatKind,
        target: Option<&NpcTarget>,
        msg: &str,
    ) {
        match protocol::classify(msg) {
            ControlCommand::GetConfig => {
                self.ctx.replies.push_config(ConfigReply { requester: speaker });
                return;
            }
            ControlCommand::SaveConfig(tail) => {
                let pairs = protocol::parse_pairs(tail);
                let _rejected = self
                    .ctx
                    .config
                    .apply_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                if let Err(err) = self.ctx.config.save(&self.config_path) {
                    warn!(%err, "failed to persist remotely updated config");
                }
                session.send_system_message(&protocol::format_config_reply(
                    &self.ctx.config.snapshot(),
                ));
                return;
            }
            ControlCommand::NotControl => {}
        }

        if kind != ChatKind::Say {
            return;
        }

        match target {
            Some(npc) => {
                self.ctx.conversations.set_target(npc.entity);

                let snapshot = self.ctx.config.snapshot();
                let history = self.ctx.conversations.history(npc.entity);
                let (request, turn) = build_request(&snapshot, &npc.name, &history, msg);
                let endpoint = Endpoint::from_config(&snapshot);

                self.dispatcher
                    .dispatch_generation(npc.entity, npc.location, endpoint, request, turn);
            }
            None => self.ctx.conversations.clear_target(),
        }
    }

    /// Script hook: one simulation tick.
    ///
    /// Drains each reply queue under its own lock, then performs host-side
    /// effects with no lock held. Items whose identifiers no longer resolve
    /// are discarded — replies are best-effort notifications.
    pub fn on_tick(&self, world: &mut dyn WorldHost) {
        for reply in self.ctx.replies.drain_config() {
            let Some(session) = world.session(reply.requester) else {
                continue;
            };
            let snapshot = self.ctx.config.snapshot();
            session.send_system_message(&protocol::format_config_reply(&snapshot));
            self.dispatcher
                .dispatch_status_check(reply.requester, Endpoint::from_config(&snapshot));
        }

        for reply in self.ctx.replies.drain_status() {
            let Some(session) = world.session(reply.requester) else {
                continue;
            };
            session.send_system_message(&protocol::format_status_reply(reply.reachable));
        }

        for reply in self.ctx.replies.drain_dialogue(self.dialogue_drain_cap) {
            let Some(npc) = world.npc(reply.location, reply.entity) else {
                continue;
            };
            speech::deliver(npc, reply.text);
        }
    }

    /// Tear down the worker pool; called once at host shutdown.
    pub fn shutdown(self) {
        self.dispatcher.shutdown();
        info!("AI manager module unloaded");
    }
}
