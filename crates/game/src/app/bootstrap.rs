use tileworld_engine::LoopConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

const WORLD_FILE_ENV_VAR: &str = "TILEWORLD_WORLD_FILE";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "=== Tile World Startup ===");

    let defaults = LoopConfig::default();
    let world_file = world_file_override(std::env::var(WORLD_FILE_ENV_VAR).ok())
        .unwrap_or_else(|| defaults.world_file.clone());
    let config = LoopConfig {
        world_file,
        ..defaults
    };

    AppWiring { config }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn world_file_override(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
