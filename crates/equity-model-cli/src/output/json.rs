use std::io::{self, Write};

use serde_json::Value;

/// Pretty-print the envelope to stdout, one document per invocation.
pub fn print_json(value: &Value) {
    let rendered = match serde_json::to_string_pretty(value) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize output");
            return;
        }
    };
    let mut out = io::stdout().lock();
    if let Err(e) = writeln!(out, "{rendered}") {
        tracing::warn!(error = %e, "stdout closed before output was written");
    }
}
