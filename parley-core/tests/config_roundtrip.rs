//! Config persistence round-trips against real files.

use parley_core::config::{AiConfig, ConfigStore};

fn assert_float_eq(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-5, "{a} != {b}");
}

#[test]
fn save_then_load_reproduces_every_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ai_manager.conf");

    let store = ConfigStore::new();
    store.apply_update("host", "generation.internal").expect("host");
    store.apply_update("port", "5002").expect("port");
    store.apply_update("max_context_length", "4096").expect("ctx");
    store.apply_update("max_length", "200").expect("len");
    store.apply_update("temperature", "1.15").expect("temp");
    store.apply_update("repetition_penalty", "1.25").expect("rep");
    store.apply_update("top_p", "0.85").expect("top_p");
    store.apply_update("top_k", "64").expect("top_k");
    store.save(&path).expect("save");

    let fresh = ConfigStore::new();
    fresh.load(&path).expect("load");
    let got = fresh.snapshot();

    assert_eq!(got.host, "generation.internal");
    assert_eq!(got.port, 5002);
    assert_eq!(got.address, "generation.internal:5002");
    assert_eq!(got.max_context_length, 4096);
    assert_eq!(got.max_length, 200);
    assert_float_eq(got.temperature, 1.15);
    assert_float_eq(got.repetition_penalty, 1.25);
    assert_float_eq(got.top_p, 0.85);
    assert_eq!(got.top_k, 64);
}

#[test]
fn absent_file_is_created_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ai_manager.conf");
    assert!(!path.exists());

    let store = ConfigStore::new();
    store.load(&path).expect("load creates the file");

    assert!(path.exists(), "save-on-first-load fallback");
    let defaults = AiConfig::default();
    let snap = store.snapshot();
    assert_eq!(snap.port, defaults.port);
    assert_eq!(snap.host, defaults.host);

    // The written file itself loads back cleanly.
    let fresh = ConfigStore::new();
    fresh.load(&path).expect("reload");
    assert_eq!(fresh.snapshot().address, defaults.address);
}

#[test]
fn unknown_and_malformed_lines_leave_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ai_manager.conf");
    std::fs::write(
        &path,
        "port=6001\nfuture_knob=17\nnot a key value line\ntemperature=warm\n",
    )
    .expect("write fixture");

    let store = ConfigStore::new();
    store.load(&path).expect("load tolerates junk");
    let snap = store.snapshot();

    assert_eq!(snap.port, 6001, "valid line applied");
    assert!((snap.temperature - 0.8).abs() < 1e-5, "malformed line skipped");
    assert_eq!(snap.address, "127.0.0.1:6001");
}
