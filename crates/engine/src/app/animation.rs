use super::entity::{Direction, Entity, Facing};
use super::rendering::AtlasRect;
use super::tick::Tick;

pub const FACING_ROWS: u32 = 4;
pub const WALK_CYCLE_COLUMNS: u32 = 3;
const TICKS_PER_WALK_COLUMN: u32 = 10;

/// Walk-cycle sheet: one row per facing, three columns per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySheetLayout {
    pub cell_width: u32,
    pub cell_height: u32,
}

impl EntitySheetLayout {
    /// Cells are one tile wide and two tiles tall.
    pub fn for_tile(tile_px: u32) -> Self {
        Self {
            cell_width: tile_px,
            cell_height: tile_px * 2,
        }
    }

    pub fn frame(&self, facing: Facing, column: u32) -> AtlasRect {
        AtlasRect::cell(
            column.min(WALK_CYCLE_COLUMNS - 1),
            facing_row(facing),
            self.cell_width,
            self.cell_height,
        )
    }
}

const fn facing_row(facing: Facing) -> u32 {
    match facing {
        Facing::Left => 0,
        Facing::Right => 1,
        Facing::Up => 2,
        Facing::Down => 3,
    }
}

pub fn walk_column(tick: Tick) -> u32 {
    tick.get() / TICKS_PER_WALK_COLUMN
}

/// Picks the sheet cell for this frame. Idle keeps `previous`.
pub fn select_frame(
    layout: &EntitySheetLayout,
    direction: Direction,
    tick: Tick,
    previous: AtlasRect,
) -> AtlasRect {
    match Facing::from_direction(direction) {
        Some(facing) => layout.frame(facing, walk_column(tick)),
        None => previous,
    }
}

pub fn update_animation(entity: &mut Entity, layout: &EntitySheetLayout, tick: Tick) {
    entity.active_frame = select_frame(layout, entity.direction, tick, entity.active_frame);
}
