#![allow(dead_code)]

use linepad_core::{Document, EditorConfig};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness. Set `RUST_LOG=linepad_core=trace` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `count` lines reading `line 0`, `line 1`, ... without a trailing newline.
pub fn numbered(count: usize) -> String {
    (0..count)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A document whose viewport shows exactly `rows` rows of 16px.
pub fn document(text: &str, rows: usize) -> Document {
    let config = EditorConfig::default().with_viewport(800.0, rows as f64 * 16.0);
    Document::new(text, config).unwrap()
}
