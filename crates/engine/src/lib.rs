use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;

pub use app::{
    run_app, AppError, AtlasRect, AtlasSet, BackgroundCache, ComposedFrame, Direction, Entity,
    Facing, FrameCompositor, GridPos, HighlightState, InputAction, InputSnapshot, Iteration,
    LoopConfig, LoopMetricsSnapshot, MoveOutcome, PixelBuffer, Renderer, SimState, StepReport,
    Tick, TileCode, Tilemap, TilemapError, TimestepDriver, Vec2, SLOW_FRAME_ENV_VAR,
};
pub use content::{load_atlas_set, load_world_def, AtlasLoadError, WorldDef, WorldDefError};

pub const ROOT_ENV_VAR: &str = "TILEWORLD_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "TILEWORLD_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/tileworld\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
    #[error("assets directory not found at {0}")]
    AssetsDirMissing(PathBuf),
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    app_paths_for_root(root)
}

fn app_paths_for_root(root: PathBuf) -> Result<AppPaths, StartupError> {
    let assets_dir = root.join("assets");
    if !assets_dir.is_dir() {
        return Err(StartupError::AssetsDirMissing(assets_dir));
    }
    Ok(AppPaths { root, assets_dir })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => root_from_env_value(&value),
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;
            search_upward(&exe_dir)
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn root_from_env_value(value: &str) -> Result<PathBuf, StartupError> {
    let normalized = normalize_path(&PathBuf::from(value));
    if is_repo_marker(&normalized) {
        Ok(normalized)
    } else {
        Err(StartupError::InvalidEnvRoot { path: normalized })
    }
}

fn search_upward(start_dir: &Path) -> Result<PathBuf, StartupError> {
    start_dir
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
        .ok_or_else(|| StartupError::RootNotFound {
            start_dir: normalize_path(start_dir),
            env_var: ROOT_ENV_VAR,
        })
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn make_project(root: &Path) {
        fs::write(root.join("Cargo.toml"), "[workspace]\n").expect("write cargo toml");
        fs::create_dir_all(root.join("assets")).expect("create assets");
    }

    #[test]
    fn repo_marker_requires_cargo_toml() {
        let temp = TempDir::new().expect("tempdir");
        fs::create_dir_all(temp.path().join("assets")).expect("create assets");
        assert!(!is_repo_marker(temp.path()));

        fs::write(temp.path().join("Cargo.toml"), "").expect("write cargo toml");
        assert!(is_repo_marker(temp.path()));
    }

    #[test]
    fn upward_search_finds_project_root() {
        let temp = TempDir::new().expect("tempdir");
        make_project(temp.path());
        let nested = temp.path().join("target").join("debug");
        fs::create_dir_all(&nested).expect("create nested");

        let root = search_upward(&nested).expect("root");

        assert_eq!(root, normalize_path(temp.path()));
        let paths = app_paths_for_root(root).expect("paths");
        assert!(paths.assets_dir.ends_with("assets"));
    }

    #[test]
    fn env_root_must_be_a_project() {
        let temp = TempDir::new().expect("tempdir");
        let raw = temp.path().to_string_lossy().to_string();
        assert!(matches!(
            root_from_env_value(&raw),
            Err(StartupError::InvalidEnvRoot { .. })
        ));

        make_project(temp.path());
        assert_eq!(
            root_from_env_value(&raw).expect("root"),
            normalize_path(temp.path())
        );
    }

    #[test]
    fn root_without_assets_is_rejected() {
        let temp = TempDir::new().expect("tempdir");
        assert!(matches!(
            app_paths_for_root(temp.path().to_path_buf()),
            Err(StartupError::AssetsDirMissing(_))
        ));
    }
}
