//! Test logging bootstrap for the jwt-auth suites.
//!
//! Unit tests and integration binaries call [`init`] from a `ctor` hook, so
//! every test binary gets exactly one subscriber.

use once_cell::sync::OnceCell;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test-writer subscriber once per test binary.
///
/// The filter is read in order of precedence:
///
/// 1. `TEST_LOG`
/// 2. `RUST_LOG`
/// 3. `"warn"`, which still shows rejected authentications with their
///    precise error code
///
/// Output goes through `with_test_writer()` so the harness captures it per
/// test. Closing `request` spans are logged, so each `RequestTrace` request
/// shows up with its trace id and timing at `info`. Safe to call repeatedly;
/// a subscriber installed elsewhere is left in place.
///
/// ```bash
/// TEST_LOG=jwt_auth=debug cargo test -p jwt-auth --test auth_tests
/// ```
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .ok();
    });
}
