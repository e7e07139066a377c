//! Tracing subscriber setup shared by binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "dve_engine=debug,dve_cli=info,dve_db=info,dve_events=info";

/// Install the global subscriber.
///
/// Honours `RUST_LOG`; emits JSON lines when `DVE_LOG_FORMAT=json`.
/// Calling this more than once is harmless.
pub fn init_tracing() {
    let json = std::env::var("DVE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .try_init();

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
