use std::env;
use std::sync::Arc;
use std::time::Duration;

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::content::{load_atlas_set, load_world_def, AtlasLoadError, WorldDefError};
use crate::{resolve_app_paths, StartupError};

use super::input::ActionStates;
use super::timestep::{DriverConfig, Iteration, TimestepDriver};
use super::{FollowCamera, InputAction, InputSnapshot, Renderer, SimState, SimStateError};

pub const SLOW_FRAME_ENV_VAR: &str = "TILEWORLD_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    /// World definition, relative to the assets directory.
    pub world_file: String,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Tile World".to_string(),
            window_width: 1000,
            window_height: 1000,
            target_fps: 60,
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
            world_file: "world.json".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load world definition: {0}")]
    WorldDef(#[from] WorldDefError),
    #[error("failed to load atlases: {0}")]
    AtlasLoad(#[from] AtlasLoadError),
    #[error("invalid initial simulation state: {0}")]
    SimState(#[from] SimStateError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Loads the world and atlases, opens the window and runs until quit.
/// Everything that can fail is checked before the first frame.
pub fn run_app(config: LoopConfig) -> Result<(), AppError> {
    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        assets_dir = %app_paths.assets_dir.display(),
        "startup"
    );

    let world_path = app_paths.assets_dir.join(&config.world_file);
    let world_def = load_world_def(&world_path)?;
    let tilemap = world_def.build_tilemap()?;
    let atlases = load_atlas_set(&app_paths.assets_dir, &world_def)?;
    let state = SimState::new(
        tilemap,
        world_def.spawn(),
        world_def.entity.speed,
        atlases.entity_layout(),
    )?;
    info!(
        world = %world_path.display(),
        width = state.tilemap().width(),
        height = state.tilemap().height(),
        tile_px = atlases.tile_px(),
        overlay_tiles = state.tilemap().overlay_cells().count(),
        "world_loaded"
    );

    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);
    let driver_config = DriverConfig {
        target_fps: config.target_fps.max(1),
        metrics_log_interval: normalize_non_zero_duration(
            config.metrics_log_interval,
            Duration::from_secs(1),
        ),
        slow_frame_delay,
    };
    let mut driver = TimestepDriver::new(state, atlases, &driver_config);
    let (frame_width, frame_height) = driver.frame_size();
    let tile_px = driver.background().tile_px();

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let window_id = window.id();
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    info!(
        target_fps = driver_config.target_fps,
        metrics_log_interval_ms = driver_config.metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        frame_width,
        frame_height,
        tile_px,
        "loop_config"
    );

    let mut input_collector = InputCollector::default();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent {
                window_id: event_window,
                event,
            } if event_window == window_id => match event {
                WindowEvent::CloseRequested => {
                    input_collector.mark_quit_requested();
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = renderer.window().inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_key(event.physical_key, event.state);
                }
                WindowEvent::RedrawRequested => {
                    let input = input_collector.snapshot_for_iteration();
                    match driver.run_iteration(&input) {
                        Iteration::Quit => {
                            info!(reason = "quit_key", "shutdown_requested");
                            window_target.exit();
                        }
                        Iteration::Frame { frame, .. } => {
                            let camera = FollowCamera::new(driver.state().entity().position);
                            if let Err(error) = renderer.present(&frame.pixels, camera, tile_px) {
                                warn!(error = %error, "renderer_draw_failed");
                                window_target.exit();
                            }
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                renderer.window().request_redraw();
            }
            Event::LoopExiting => {
                info!(
                    tick = driver.state().tick().get(),
                    over_budget_frames = driver.over_budget_frames(),
                    "shutdown"
                );
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Folds raw key events into per-iteration snapshots.
#[derive(Debug, Default)]
struct InputCollector {
    held: ActionStates,
    pressed: ActionStates,
    quit_requested: bool,
}

impl InputCollector {
    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        let Some(action) = action_for_key(key) else {
            return;
        };

        match state {
            ElementState::Pressed => {
                // OS key repeat arrives as more presses; only the first is an edge.
                if !self.held.is_down(action) {
                    self.pressed.set(action, true);
                }
                self.held.set(action, true);
            }
            ElementState::Released => self.held.set(action, false),
        }
    }

    fn snapshot_for_iteration(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(self.held, self.pressed, self.quit_requested);
        self.pressed = ActionStates::default();
        snapshot
    }
}

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(InputAction::MoveUp),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(InputAction::MoveDown),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(InputAction::MoveLeft),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(InputAction::MoveRight),
        KeyCode::KeyE => Some(InputAction::Act),
        KeyCode::Escape | KeyCode::KeyQ => Some(InputAction::Quit),
        _ => None,
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    parse_slow_frame_delay(env::var(SLOW_FRAME_ENV_VAR), config_slow_frame_ms)
}

fn parse_slow_frame_delay(
    env_value: Result<String, env::VarError>,
    config_slow_frame_ms: u64,
) -> Duration {
    match env_value {
        Ok(value) => match value.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(
                    env_var = SLOW_FRAME_ENV_VAR,
                    value = value.as_str(),
                    "invalid slow-frame env var value; falling back to config"
                );
                Duration::from_millis(config_slow_frame_ms)
            }
        },
        Err(env::VarError::NotPresent) => Duration::from_millis(config_slow_frame_ms),
        Err(err) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %err,
                "unable to read slow-frame env var; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }
    }
}
