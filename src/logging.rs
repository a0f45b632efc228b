//! Process logging for the `nkhost` binary.

use std::{env, io, panic};

use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::uptime},
    prelude::*,
};

/// Our crates log at info, everything else at warn. `RUST_LOG` is layered on top.
const DEFAULT_FILTER: &str = "warn,nkhost=info,nkhost_config=info,nkhost_runtime=info";

/// Install a `tracing` subscriber writing compact lines to stderr, so that
/// stdout stays free for generated output.
pub fn init_logging() {
    let format = fmt::format().compact().with_timer(uptime()).with_target(true);
    let stderr_log = fmt::layer().event_format(format).with_writer(io::stderr);

    let mut filter = DEFAULT_FILTER.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }

    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(stderr_log);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("log subscriber already installed");
        return;
    }

    // Panics go through the log so they carry the same context as other events.
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        tracing::error!("{info}");
        default_hook(info);
    }));
    tracing::trace!("installed panic hook");
}
