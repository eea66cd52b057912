use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "info,image_captioner_lib=debug,llmapi=debug";

/// Initialize tracing with a compact stdout layer.
///
/// Default level is `info` (debug for this crate and `llmapi`), override via `RUST_LOG`.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .compact();

    // try_init so tests that build the app more than once don't panic
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init();

    tracing::debug!("Tracing initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_names_this_crate() {
        let crate_target = module_path!().split("::").next().unwrap();
        assert!(DEFAULT_LOG_FILTER.contains(&format!("{crate_target}=debug")));
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
