use super::tick::Tick;
use super::tilemap::GridPos;

/// Raw tick difference after which an active highlight lapses.
pub const HIGHLIGHT_LIFETIME_TICKS: u32 = 10;

/// Single-slot selected tile. A new activation overwrites the old one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HighlightState {
    #[default]
    Inactive,
    Active {
        tile: GridPos,
        activation_tick: Tick,
    },
}

impl HighlightState {
    pub fn activate(&mut self, tile: GridPos, tick: Tick) {
        *self = HighlightState::Active {
            tile,
            activation_tick: tick,
        };
    }

    /// Clears the highlight once the raw tick difference exceeds the lifetime.
    ///
    /// The comparison does not account for the clock wrapping, so an
    /// activation at 28 checked at 2 counts as 26 ticks old.
    pub fn expire_if_stale(&mut self, current: Tick) -> bool {
        let HighlightState::Active {
            activation_tick, ..
        } = *self
        else {
            return false;
        };
        if current.raw_distance(activation_tick) > HIGHLIGHT_LIFETIME_TICKS {
            *self = HighlightState::Inactive;
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        matches!(self, HighlightState::Active { .. })
    }

    pub fn active_tile(&self) -> Option<GridPos> {
        match self {
            HighlightState::Active { tile, .. } => Some(*tile),
            HighlightState::Inactive => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_active_within_ten_ticks_then_expires() {
        let mut highlight = HighlightState::default();
        highlight.activate(GridPos::new(3, 4), Tick::from_raw(5));

        for raw in 1..=15 {
            assert!(!highlight.expire_if_stale(Tick::from_raw(raw)), "tick={raw}");
            assert!(highlight.is_active(), "tick={raw}");
        }

        assert!(highlight.expire_if_stale(Tick::from_raw(16)));
        assert_eq!(highlight, HighlightState::Inactive);
    }

    #[test]
    fn inactive_is_terminal_until_next_activation() {
        let mut highlight = HighlightState::Inactive;
        assert!(!highlight.expire_if_stale(Tick::from_raw(29)));
        assert_eq!(highlight.active_tile(), None);
    }

    #[test]
    fn later_activation_overwrites_earlier() {
        let mut highlight = HighlightState::default();
        highlight.activate(GridPos::new(1, 1), Tick::from_raw(2));
        highlight.activate(GridPos::new(9, 9), Tick::from_raw(3));

        assert_eq!(
            highlight,
            HighlightState::Active {
                tile: GridPos::new(9, 9),
                activation_tick: Tick::from_raw(3),
            }
        );
    }

    #[test]
    fn wrap_boundary_uses_raw_difference() {
        let mut highlight = HighlightState::default();
        highlight.activate(GridPos::new(0, 0), Tick::from_raw(28));

        assert!(highlight.expire_if_stale(Tick::from_raw(2)));
        assert!(!highlight.is_active());
    }
}
