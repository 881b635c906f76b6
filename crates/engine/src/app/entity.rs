use super::rendering::AtlasRect;
use super::tilemap::GridPos;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Per-frame movement pulse; each component is -1, 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Direction {
    pub x: i8,
    pub y: i8,
}

impl Direction {
    pub const ZERO: Direction = Direction { x: 0, y: 0 };
    pub const LEFT: Direction = Direction { x: -1, y: 0 };
    pub const RIGHT: Direction = Direction { x: 1, y: 0 };
    pub const UP: Direction = Direction { x: 0, y: -1 };
    pub const DOWN: Direction = Direction { x: 0, y: 1 };

    pub fn new(x: i8, y: i8) -> Self {
        Self {
            x: x.signum(),
            y: y.signum(),
        }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Not normalized: diagonals have length sqrt(2).
    pub fn scaled(self, speed: f32) -> Vec2 {
        Vec2 {
            x: self.x as f32 * speed,
            y: self.y as f32 * speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
    Up,
    Down,
}

impl Facing {
    /// Horizontal input wins over vertical, so diagonals face sideways.
    pub fn from_direction(direction: Direction) -> Option<Self> {
        match (direction.x, direction.y) {
            (x, _) if x < 0 => Some(Facing::Left),
            (x, _) if x > 0 => Some(Facing::Right),
            (_, y) if y < 0 => Some(Facing::Up),
            (_, y) if y > 0 => Some(Facing::Down),
            _ => None,
        }
    }
}

/// The single controllable entity. Holds state only; textures live in the atlases.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: Vec2,
    pub direction: Direction,
    pub facing: Facing,
    pub speed: f32,
    pub active_frame: AtlasRect,
}

impl Entity {
    pub fn new(position: Vec2, speed: f32, active_frame: AtlasRect) -> Self {
        Self {
            position,
            direction: Direction::ZERO,
            facing: Facing::Right,
            speed,
            active_frame,
        }
    }

    /// Grid cell under the entity's feet.
    pub fn grid_position(&self) -> GridPos {
        GridPos::new(
            self.position.x.floor() as i32,
            self.position.y.floor() as i32,
        )
    }

    /// Grid cell offset by this frame's direction pulse: the entity's own
    /// cell when idle, a diagonal neighbour when two axes are held.
    pub fn action_cell(&self) -> GridPos {
        let here = self.grid_position();
        GridPos::new(
            here.x + i32::from(self.direction.x),
            here.y + i32::from(self.direction.y),
        )
    }
}
