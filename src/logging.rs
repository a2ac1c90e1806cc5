use std::sync::OnceLock;

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize global logging (idempotent). Defaults to `info`, overridable
/// via `RUST_LOG`. Noisy server internals are kept at warn.
pub fn init_logging() {
    INIT.get_or_init(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .filter_module("actix_server", log::LevelFilter::Warn)
            .try_init(); // ignore error if already initialized by tests/other code
    });
}
