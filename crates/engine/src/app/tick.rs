/// Wrapping simulation clock shared by animation and highlight expiry.
///
/// Values cycle through `1..=29`; zero is never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tick(u32);

pub const TICK_MIN: u32 = 1;
pub const TICK_MAX: u32 = 29;

impl Tick {
    pub const START: Tick = Tick(TICK_MIN);

    /// Folds any integer onto the clock the way repeated increments would,
    /// so `30` behaves like `1`.
    pub fn from_raw(raw: u32) -> Self {
        if (TICK_MIN..=TICK_MAX).contains(&raw) {
            return Self(raw);
        }
        let span = TICK_MAX - TICK_MIN + 1;
        Self(TICK_MIN + raw.saturating_sub(TICK_MIN) % span)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        if self.0 >= TICK_MAX {
            Self(TICK_MIN)
        } else {
            Self(self.0 + 1)
        }
    }

    pub fn advance(&mut self) {
        *self = self.next();
    }

    /// Raw absolute difference; not wrap-aware.
    pub fn raw_distance(self, other: Tick) -> u32 {
        self.0.abs_diff(other.0)
    }
}

impl Default for Tick {
    fn default() -> Self {
        Self::START
    }
}
