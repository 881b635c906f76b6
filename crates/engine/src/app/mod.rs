mod animation;
mod entity;
mod highlight;
mod input;
mod loop_runner;
mod metrics;
mod movement;
pub mod rendering;
mod simulation;
mod tick;
mod tilemap;
mod timestep;

pub use animation::{
    select_frame, update_animation, walk_column, EntitySheetLayout, FACING_ROWS,
    WALK_CYCLE_COLUMNS,
};
pub use entity::{Direction, Entity, Facing, Vec2};
pub use highlight::{HighlightState, HIGHLIGHT_LIFETIME_TICKS};
pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use movement::{apply_input_direction, direction_from_input, halt, integrate_movement, MoveOutcome};
pub use rendering::{
    AtlasKind, AtlasRect, AtlasSet, AtlasSetError, BackgroundCache, BlendMode, ComposedFrame,
    FollowCamera, FrameCompositor, PixelBuffer, PixelBufferError, Renderer, TerrainLayout,
    Viewport,
};
pub use simulation::{SimState, SimStateError, StepReport};
pub use tick::{Tick, TICK_MAX, TICK_MIN};
pub use tilemap::{GridPos, TileCode, Tilemap, TilemapError};
pub use timestep::{
    plan_pacing, target_frame_duration, DriverConfig, FramePacer, Iteration, PacedFrame,
    PacingDecision, TimestepDriver,
};
