//! Normalized error rendering for log lines.

use std::error::Error;

/// Render an error and its `source()` chain as `outer: inner: root`.
pub fn to_log_format(error: &(dyn Error + '_)) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
