use crate::state::Position;

/// Static terrain oracle exposing the island bounds and land mask.
///
/// Supplied by the terrain subsystem; the decision engine only queries it.
pub trait TerrainOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;

    fn terrain(&self, position: Position) -> Option<TerrainKind>;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// Returns true for in-bounds land cells.
    fn is_land(&self, position: Position) -> bool {
        self.contains(position)
            && self
                .terrain(position)
                .is_some_and(|terrain| terrain.is_land())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Base terrain classes of the island grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TerrainKind {
    Land,
    Sand,
    Water,
}

impl TerrainKind {
    /// Sand is the shoreline ring and is walkable like inland cells.
    pub fn is_land(self) -> bool {
        matches!(self, TerrainKind::Land | TerrainKind::Sand)
    }
}

/// Row-major terrain grid; the simplest oracle implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    dimensions: MapDimensions,
    cells: Vec<TerrainKind>,
}

impl TerrainGrid {
    /// A grid filled with one terrain kind.
    pub fn filled(dimensions: MapDimensions, terrain: TerrainKind) -> Self {
        let len = dimensions.width as usize * dimensions.height as usize;
        Self {
            dimensions,
            cells: vec![terrain; len],
        }
    }

    /// Overrides a single cell. Out-of-bounds positions are ignored.
    pub fn set(&mut self, position: Position, terrain: TerrainKind) {
        if let Some(idx) = self.index(position) {
            self.cells[idx] = terrain;
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions.contains(position).then(|| {
            position.y as usize * self.dimensions.width as usize + position.x as usize
        })
    }
}

impl TerrainOracle for TerrainGrid {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn terrain(&self, position: Position) -> Option<TerrainKind> {
        self.index(position).map(|idx| self.cells[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_and_out_of_bounds_are_not_land() {
        let mut grid = TerrainGrid::filled(MapDimensions::new(4, 3), TerrainKind::Land);
        grid.set(Position::new(1, 1), TerrainKind::Water);
        grid.set(Position::new(2, 1), TerrainKind::Sand);

        assert!(grid.is_land(Position::new(0, 0)));
        assert!(grid.is_land(Position::new(2, 1)));
        assert!(!grid.is_land(Position::new(1, 1)));
        assert!(!grid.is_land(Position::new(-1, 0)));
        assert!(!grid.is_land(Position::new(4, 0)));
        assert!(!grid.is_land(Position::new(0, 3)));
    }
}
