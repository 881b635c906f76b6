use super::entity::{Direction, Entity, Facing, Vec2};
use super::input::{InputAction, InputSnapshot};
use super::tilemap::Tilemap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    Idle,
    Moved { from: Vec2, to: Vec2 },
    Rejected { candidate: Vec2 },
}

/// Maps held direction keys to a direction pulse.
///
/// Keys are applied in the order up, left, down, right, so when both keys of
/// an axis are held the later one wins.
pub fn direction_from_input(input: &InputSnapshot) -> Direction {
    let mut x = 0;
    let mut y = 0;
    if input.is_down(InputAction::MoveUp) {
        y = -1;
    }
    if input.is_down(InputAction::MoveLeft) {
        x = -1;
    }
    if input.is_down(InputAction::MoveDown) {
        y = 1;
    }
    if input.is_down(InputAction::MoveRight) {
        x = 1;
    }
    Direction { x, y }
}

/// Stores the frame's direction pulse on the entity and updates its facing.
pub fn apply_input_direction(entity: &mut Entity, input: &InputSnapshot) {
    entity.direction = direction_from_input(input);
    if let Some(facing) = Facing::from_direction(entity.direction) {
        entity.facing = facing;
    }
}

/// Moves the entity by `direction * speed` as one step. If either coordinate
/// of the candidate leaves the map the whole step is dropped.
pub fn integrate_movement(entity: &mut Entity, tilemap: &Tilemap) -> MoveOutcome {
    if entity.direction.is_zero() {
        return MoveOutcome::Idle;
    }
    let delta = entity.direction.scaled(entity.speed);
    let from = entity.position;
    let candidate = Vec2 {
        x: from.x + delta.x,
        y: from.y + delta.y,
    };

    if !tilemap.contains_point(candidate.x, candidate.y) {
        return MoveOutcome::Rejected { candidate };
    }
    entity.position = candidate;
    MoveOutcome::Moved {
        from,
        to: candidate,
    }
}

pub fn halt(entity: &mut Entity) {
    entity.direction = Direction::ZERO;
}
