use thiserror::Error;

/// Terrain code stored per cell. Unknown raw codes read back as `Ground`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TileCode {
    #[default]
    Ground,
    Wall,
    Shrub,
    Path,
}

impl TileCode {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => TileCode::Wall,
            2 => TileCode::Shrub,
            3 => TileCode::Path,
            _ => TileCode::Ground,
        }
    }

    pub fn is_default(self) -> bool {
        self == TileCode::Ground
    }
}

/// Signed grid coordinate. Highlight targets may sit one cell outside the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Immutable grid of tile codes, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tilemap {
    width: u32,
    height: u32,
    cells: Vec<TileCode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TilemapError {
    #[error("tilemap dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("tile ({x}, {y}) is outside a {width}x{height} map")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

impl Tilemap {
    pub fn new(width: u32, height: u32, codes: Vec<u8>) -> Result<Self, TilemapError> {
        if width == 0 || height == 0 {
            return Err(TilemapError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        let actual = codes.len();
        if expected != actual {
            return Err(TilemapError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            cells: codes.into_iter().map(TileCode::from_code).collect(),
        })
    }

    pub fn filled(width: u32, height: u32) -> Result<Self, TilemapError> {
        Self::new(width, height, vec![0; width as usize * height as usize])
    }

    /// Builds a ground-filled map and places the listed overlays.
    pub fn with_tiles(
        width: u32,
        height: u32,
        tiles: impl IntoIterator<Item = (u32, u32, u8)>,
    ) -> Result<Self, TilemapError> {
        let mut map = Self::filled(width, height)?;
        for (x, y, code) in tiles {
            let index = map.index_of(x, y).ok_or(TilemapError::OutOfBounds {
                x,
                y,
                width,
                height,
            })?;
            map.cells[index] = TileCode::from_code(code);
        }
        Ok(map)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn tile_at(&self, x: u32, y: u32) -> Option<TileCode> {
        self.index_of(x, y)
            .and_then(|index| self.cells.get(index).copied())
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && x < self.width as f32 && y >= 0.0 && y < self.height as f32
    }

    /// Iterates `(x, y, code)` for every non-ground cell, row by row.
    pub fn overlay_cells(&self) -> impl Iterator<Item = (u32, u32, TileCode)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, code)| !code.is_default())
            .map(move |(index, code)| ((index % width) as u32, (index / width) as u32, *code))
    }
}
