//! Diagnostics go to stderr through `tracing`; verdict output is one JSON object
//! per line (ndjson) on the caller's writer.

use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber writing to stderr; level from RUST_LOG or default.
    pub fn init(json: bool, default_level: &str) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(fmt).init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    /// Write one value as a single JSON line.
    pub fn emit_json(value: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(value)?;
        writeln!(w, "{}", line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_json_writes_one_line() {
        let mut buf = Vec::new();
        StructuredLogger::emit_json(&serde_json::json!({"a": 1}), &mut buf).unwrap();
        StructuredLogger::emit_json(&serde_json::json!({"b": 2}), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"a\":1}\n{\"b\":2}\n");
    }
}
