//! # parley-host — Host Integration for Parley
//!
//! This crate is the seam between the bridge and the simulation host. The
//! host's own entity/world model, chat transport, and event timing stay on
//! its side of the seam; parley sees them only through the narrow traits in
//! [`hook`].
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                  Simulation Host                    │
//! │    chat transport               tick loop           │
//! │         │                           │               │
//! │         ▼                           ▼               │
//! │  AiManager::on_chat_message  AiManager::on_tick     │
//! │         │                           ▲               │
//! │         ▼                           │ drain         │
//! │  ┌───────────────┐        ┌────────────────┐       │
//! │  │  parley-llm   │───────▶│  reply queues  │       │
//! │  │ (worker pool) │        │ (parley-core)  │       │
//! │  └───────────────┘        └────────────────┘       │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! The host calls exactly two entry points, both on its single simulation
//! thread: [`AiManager::on_chat_message`] when a player message is about to
//! go out, and [`AiManager::on_tick`] once per simulation tick. Everything
//! slow happens on the dispatcher's worker pool in between.
//!
//! [`AiManager::on_chat_message`]: module::AiManager::on_chat_message
//! [`AiManager::on_tick`]: module::AiManager::on_tick

pub mod hook;
pub mod module;
pub mod protocol;
pub mod speech;

pub use hook::{ChatKind, NonverbalCue, NpcHandle, NpcTarget, PlayerSession, SpeechAct, WorldHost};
pub use module::{AiManager, AiManagerOptions};
