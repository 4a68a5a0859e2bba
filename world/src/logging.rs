//! Tracing subscriber installation for hosts and tests.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,feles_level=warn";

static TRACING_INIT: Once = Once::new();

/// Installs a compact `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call any number of times; the first call wins and a subscriber
/// installed elsewhere is left in place.
pub fn init() {
    init_with(DEFAULT_FILTER);
}

/// Same as [`init`], but with a custom fallback filter directive.
pub fn init_with(default_filter: &str) {
    let fallback = default_filter.to_owned();
    TRACING_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .compact();

        let _ = subscriber.try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_is_harmless() {
        init();
        init_with("trace");
        init();
    }
}
