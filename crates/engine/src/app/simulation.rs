use thiserror::Error;

use super::animation::{update_animation, walk_column, EntitySheetLayout};
use super::entity::{Entity, Facing, Vec2};
use super::highlight::HighlightState;
use super::input::{InputAction, InputSnapshot};
use super::movement::{apply_input_direction, halt, integrate_movement, MoveOutcome};
use super::tick::Tick;
use super::tilemap::Tilemap;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimStateError {
    #[error("spawn ({x}, {y}) is outside a {width}x{height} world")]
    SpawnOutOfBounds {
        x: f32,
        y: f32,
        width: u32,
        height: u32,
    },
    #[error("entity speed must be a positive finite number, got {0}")]
    InvalidSpeed(f32),
}

/// What one simulation update did, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub tick: Tick,
    pub movement: MoveOutcome,
    pub highlight_activated: bool,
    pub highlight_expired: bool,
}

/// Everything the loop mutates, owned in one place.
#[derive(Debug, Clone)]
pub struct SimState {
    tilemap: Tilemap,
    entity: Entity,
    highlight: HighlightState,
    tick: Tick,
    entity_layout: EntitySheetLayout,
}

impl SimState {
    pub fn new(
        tilemap: Tilemap,
        spawn: Vec2,
        speed: f32,
        entity_layout: EntitySheetLayout,
    ) -> Result<Self, SimStateError> {
        if !tilemap.contains_point(spawn.x, spawn.y) {
            return Err(SimStateError::SpawnOutOfBounds {
                x: spawn.x,
                y: spawn.y,
                width: tilemap.width(),
                height: tilemap.height(),
            });
        }
        if !(speed.is_finite() && speed > 0.0) {
            return Err(SimStateError::InvalidSpeed(speed));
        }
        let tick = Tick::START;
        let initial_frame = entity_layout.frame(Facing::Right, walk_column(tick));
        Ok(Self {
            tilemap,
            entity: Entity::new(spawn, speed, initial_frame),
            highlight: HighlightState::Inactive,
            tick,
            entity_layout,
        })
    }

    pub fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn highlight_mut(&mut self) -> &mut HighlightState {
        &mut self.highlight
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn advance_tick(&mut self) -> Tick {
        self.tick.advance();
        self.tick
    }

    /// Advances the clock, then runs one update.
    pub fn step(&mut self, input: &InputSnapshot) -> StepReport {
        self.advance_tick();
        self.update(input)
    }

    /// Input, movement, animation, action, highlight expiry. Always in this order.
    pub fn update(&mut self, input: &InputSnapshot) -> StepReport {
        apply_input_direction(&mut self.entity, input);
        let movement = integrate_movement(&mut self.entity, &self.tilemap);
        update_animation(&mut self.entity, &self.entity_layout, self.tick);

        // Targets the post-move cell, offset by the pulse before it is cleared.
        let highlight_activated = input.is_down(InputAction::Act);
        if highlight_activated {
            self.highlight
                .activate(self.entity.action_cell(), self.tick);
        }
        halt(&mut self.entity);

        let highlight_expired = self.highlight.expire_if_stale(self.tick);

        StepReport {
            tick: self.tick,
            movement,
            highlight_activated,
            highlight_expired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Direction, GridPos};

    fn sample_world() -> SimState {
        let tilemap = Tilemap::with_tiles(20, 20, [(5, 5, 1)]).expect("tilemap");
        SimState::new(
            tilemap,
            Vec2::new(15.0, 15.0),
            0.12,
            EntitySheetLayout::for_tile(50),
        )
        .expect("state")
    }

    fn held(actions: &[InputAction]) -> InputSnapshot {
        actions
            .iter()
            .fold(InputSnapshot::empty(), |snapshot, action| {
                snapshot.with_action_down(*action, true)
            })
    }

    #[test]
    fn rejects_spawn_outside_world_and_bad_speed() {
        let tilemap = Tilemap::filled(20, 20).expect("tilemap");
        let layout = EntitySheetLayout::for_tile(10);
        assert!(matches!(
            SimState::new(tilemap.clone(), Vec2::new(20.0, 1.0), 0.1, layout),
            Err(SimStateError::SpawnOutOfBounds { .. })
        ));
        assert!(matches!(
            SimState::new(tilemap, Vec2::new(1.0, 1.0), 0.0, layout),
            Err(SimStateError::InvalidSpeed(_))
        ));
    }

    #[test]
    fn moving_left_decreases_x_and_keeps_y() {
        let mut state = sample_world();
        let input = held(&[InputAction::MoveLeft]);
        let mut previous_x = state.entity().position.x;

        for _ in 0..10 {
            let report = state.step(&input);
            assert!(matches!(report.movement, MoveOutcome::Moved { .. }));
            let position = state.entity().position;
            assert!(position.x < previous_x);
            assert_eq!(position.y, 15.0);
            previous_x = position.x;
        }
        assert!((previous_x - 13.8).abs() < 0.001);
    }

    #[test]
    fn moving_left_stops_at_last_valid_position() {
        let mut state = sample_world();
        let input = held(&[InputAction::MoveLeft]);

        let mut last_x = state.entity().position.x;
        let mut stopped = false;
        for _ in 0..200 {
            let report = state.step(&input);
            let x = state.entity().position.x;
            assert!(x >= 0.0);
            assert_eq!(state.entity().position.y, 15.0);
            match report.movement {
                MoveOutcome::Moved { .. } => {
                    assert!(!stopped, "moved again after a rejected step");
                    assert!(x < last_x);
                }
                MoveOutcome::Rejected { candidate } => {
                    assert!(candidate.x < 0.0);
                    assert_eq!(x, last_x);
                    stopped = true;
                }
                MoveOutcome::Idle => panic!("direction was held"),
            }
            last_x = x;
        }
        assert!(stopped);
        assert!(last_x < 0.12);
    }

    #[test]
    fn direction_is_a_per_frame_pulse() {
        let mut state = sample_world();
        state.step(&held(&[InputAction::MoveDown]));
        assert_eq!(state.entity().direction, Direction::ZERO);

        let before = state.entity().position;
        let report = state.step(&InputSnapshot::empty());
        assert_eq!(report.movement, MoveOutcome::Idle);
        assert_eq!(state.entity().position, before);
    }

    #[test]
    fn idle_frames_keep_last_walk_frame() {
        let mut state = sample_world();
        state.step(&held(&[InputAction::MoveUp]));
        let walking = state.entity().active_frame;

        for _ in 0..15 {
            state.step(&InputSnapshot::empty());
        }

        assert_eq!(state.entity().active_frame, walking);
    }

    #[test]
    fn tick_runs_from_two_on_first_step_and_wraps() {
        let mut state = sample_world();
        assert_eq!(state.step(&InputSnapshot::empty()).tick, Tick::from_raw(2));
        for _ in 0..27 {
            state.step(&InputSnapshot::empty());
        }
        assert_eq!(state.tick(), Tick::from_raw(29));
        assert_eq!(state.step(&InputSnapshot::empty()).tick, Tick::START);
    }

    #[test]
    fn second_action_overwrites_first_highlight() {
        let mut state = sample_world();

        let first = state.step(&held(&[InputAction::Act, InputAction::MoveUp]));
        assert_eq!(first.tick, Tick::from_raw(2));
        assert_eq!(state.highlight().active_tile(), Some(GridPos::new(15, 13)));

        let second = state.step(&held(&[InputAction::Act, InputAction::MoveLeft]));
        assert_eq!(second.tick, Tick::from_raw(3));

        assert_eq!(
            *state.highlight(),
            HighlightState::Active {
                tile: GridPos::new(13, 14),
                activation_tick: Tick::from_raw(3),
            }
        );
    }

    #[test]
    fn idle_action_targets_own_cell() {
        let mut state = sample_world();
        state.step(&held(&[InputAction::MoveRight]));
        state.step(&held(&[InputAction::Act]));
        assert_eq!(state.highlight().active_tile(), Some(GridPos::new(15, 15)));
    }

    #[test]
    fn diagonal_action_targets_diagonal_cell() {
        let mut state = sample_world();
        state.step(&held(&[
            InputAction::Act,
            InputAction::MoveUp,
            InputAction::MoveRight,
        ]));
        assert_eq!(state.highlight().active_tile(), Some(GridPos::new(16, 14)));
    }

    #[test]
    fn action_uses_cell_after_this_frames_move() {
        let tilemap = Tilemap::filled(20, 20).expect("tilemap");
        let mut state = SimState::new(
            tilemap,
            Vec2::new(15.05, 15.0),
            0.12,
            EntitySheetLayout::for_tile(50),
        )
        .expect("state");

        state.step(&held(&[InputAction::Act, InputAction::MoveLeft]));

        assert!(state.entity().position.x < 15.0);
        assert_eq!(state.highlight().active_tile(), Some(GridPos::new(13, 15)));
    }

    #[test]
    fn highlight_expires_eleven_ticks_after_activation() {
        let mut state = sample_world();
        for _ in 0..3 {
            state.step(&InputSnapshot::empty());
        }
        let activation = state.step(&held(&[InputAction::Act]));
        assert_eq!(activation.tick, Tick::from_raw(5));

        for _ in 6..=15 {
            let report = state.step(&InputSnapshot::empty());
            assert!(!report.highlight_expired, "tick={:?}", report.tick);
            assert!(state.highlight().is_active());
        }

        let report = state.step(&InputSnapshot::empty());
        assert_eq!(report.tick, Tick::from_raw(16));
        assert!(report.highlight_expired);
        assert!(!state.highlight().is_active());
    }
}
