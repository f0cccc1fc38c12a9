//! Build timestamps for persisted documents.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the unix epoch, as a string.
///
/// Written into the `built_at` field of saved populations and reports. A
/// clock set before the epoch yields `"0"`.
pub fn timestamp_now() -> String {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_secs().to_string()
}

// ============================================================================
// Tests
// ============================================================================
