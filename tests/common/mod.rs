#![allow(dead_code)]

use journal_predictor::domain::journal::JournalEntry;
use rust_decimal_macros::dec;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Fresh, process-unique directory under the system temp dir.
pub fn create_test_dir(tag: &str) -> PathBuf {
    let unique_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let temp_dir = std::env::temp_dir().join(format!(
        "journal_predictor_{}_{}_{}_{}",
        tag,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
        unique_id
    ));
    fs::create_dir_all(&temp_dir).expect("Failed to create test temp dir");
    temp_dir
}

pub fn cleanup_test_dir(temp_dir: PathBuf) {
    fs::remove_dir_all(temp_dir).ok();
}

/// XAUUSD breakout trade: entry 2650.50, SL 2645, TP 2660, 2R.
pub fn breakout_entry(result: Option<&str>) -> JournalEntry {
    let mut entry = JournalEntry::new("XAUUSD");
    entry.entry_price = Some(dec!(2650.50));
    entry.stop_loss = Some(dec!(2645.00));
    entry.take_profit = Some(dec!(2660.00));
    entry.risk_reward = Some(2.0);
    entry.strategy = Some("Breakout".to_string());
    entry.result = result.map(str::to_string);
    entry
}
