//! Test fixtures and helpers.
//!
//! Common records for integration tests and benchmarks.

use hella::{Record, RecordEncoder};
use hella_core::Value;

/// A set of quote records over a few tickers with an encoder.
pub struct QuoteFixture {
    pub encoder: RecordEncoder,
    pub records: Vec<Record>,
}

impl QuoteFixture {
    /// `count` quotes cycling through a fixed ticker list, one second apart.
    pub fn new(count: usize) -> Self {
        let records = (0..count).map(quote).collect();
        Self {
            encoder: RecordEncoder::default(),
            records,
        }
    }

    /// Encoded bytes of every record.
    pub fn encoded(&self) -> Vec<Vec<u8>> {
        self.records
            .iter()
            .filter_map(|r| self.encoder.encode(r).ok())
            .map(|e| e.bytes)
            .collect()
    }
}

impl Default for QuoteFixture {
    fn default() -> Self {
        Self::new(16)
    }
}

const TICKERS: [&str; 4] = ["AAPL", "MSFT", "GOOG", "AMZN"];

/// The `i`th quote record.
pub fn quote(i: usize) -> Record {
    let ticker = TICKERS[i % TICKERS.len()];
    Record::new(1_577_398_870_000_000_000 + i as i64 * 1_000_000_000)
        .with_field("/ticker", ticker)
        .with_field("/price", 90.0 + (i % 17) as f64 * 0.25)
        .with_field("/volume", (100 * (i % 9 + 1)) as i64)
        .with_field("/venue/id", (i % 3) as i64)
        .with_field("/flags", Value::Array(vec![Value::Bool(i % 2 == 0), Value::Bool(false)]))
}
