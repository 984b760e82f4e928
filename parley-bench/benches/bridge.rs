//! Parley benchmark suite — everything the tick thread pays for.
//!
//! The network call runs elsewhere; what the simulation thread actually
//! executes per chat event is request building (prompt assembly plus
//! stop-sequence derivation) and per tick is queue draining. Both must stay
//! cheap relative to a simulation tick.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use parley_core::config::AiConfig;
use parley_core::queue::{DialogueReply, ReplyQueues};
use parley_core::types::{EntityId, LocationKey};
use parley_host::protocol::format_config_reply;
use parley_llm::request::{build_request, stop_sequences};

fn config_with_card() -> AiConfig {
    let mut config = AiConfig::default();
    config.character_cards.insert(
        "Aldric".to_string(),
        "Aldric is a grizzled town guard who has seen too much.".to_string(),
    );
    config
}

/// A realistic mid-conversation history, a few KiB of accumulated turns.
fn long_history() -> String {
    let mut history = String::new();
    for i in 0..40 {
        history.push_str(&format!(
            "\nPlayer: tell me more about the old war, part {i}\nAldric: It was long and grim, and I remember every day of it, part {i}."
        ));
    }
    history
}

fn bench_stop_sequences(c: &mut Criterion) {
    c.bench_function("stop_sequence_derivation", |b| {
        b.iter(|| {
            let tokens = stop_sequences(black_box("\\n||$||Player:||$||[INST]||$||</s>"));
            black_box(tokens);
        });
    });
}

fn bench_build_request(c: &mut Criterion) {
    let config = config_with_card();
    let history = long_history();

    c.bench_function("build_request_4k_history", |b| {
        b.iter(|| {
            let (request, turn) = build_request(
                black_box(&config),
                black_box("Aldric"),
                black_box(&history),
                black_box("what happened at the bridge?"),
            );
            black_box((request, turn));
        });
    });
}

fn bench_queue_cycle(c: &mut Criterion) {
    c.bench_function("queue_push_drain_100", |b| {
        b.iter(|| {
            let queues = ReplyQueues::new();
            for n in 0..100u64 {
                queues.push_dialogue(DialogueReply {
                    entity: EntityId(n),
                    location: LocationKey::new(0, 1),
                    text: "a line of dialogue".to_string(),
                });
            }
            while !queues.is_empty() {
                black_box(queues.drain_dialogue(8));
            }
        });
    });
}

fn bench_config_reply(c: &mut Criterion) {
    let config = AiConfig::default();
    c.bench_function("format_config_reply", |b| {
        b.iter(|| {
            black_box(format_config_reply(black_box(&config)));
        });
    });
}

criterion_group!(
    benches,
    bench_stop_sequences,
    bench_build_request,
    bench_queue_cycle,
    bench_config_reply
);
criterion_main!(benches);
