//! # Observability & Tracing
//!
//! Every public fetch operation is instrumented with `tracing`. Spans carry the
//! resource type and URI; per-item failures inside a batch are logged at `warn`
//! with the failing URI, and each batch ends with one summary line.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Batch summaries and failures
//! RUST_LOG=info cargo run
//!
//! # Every request and page read
//! RUST_LOG=debug cargo run
//!
//! # Only the resolver
//! RUST_LOG=redfish_framework::resolver=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a partially failing batch reads:
//!
//! ```text
//! WARN list_referenced{resource="Certificate"}: Fetch failed uri=/redfish/v1/.../Certificates/2 error=... returned HTTP 500: internal error
//! WARN list_referenced{resource="Certificate"}: Resolved with failures fetched=2 failed=1
//! ```

/// Installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Spans already name the operation and resource type
        .compact()
        .init();
}
