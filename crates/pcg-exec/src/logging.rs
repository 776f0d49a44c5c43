use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding per-crate log directives.
pub const LOG_ENV: &str = "PCG_LOG";

/// Installs the global subscriber.
///
/// Reads directives such as `PCG_LOG=pcg_exec=debug,pcg_store=warn` and falls
/// back to `pcg=info` when unset or invalid. Repeated calls are no-ops.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("pcg=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
