use serde::{Deserialize, Serialize};
use std::fmt;

/// Bit marking the robot start position in a packed cell value
pub const ROBOT_FLAG: u8 = 0x8;

/// Mask selecting the type code of a packed cell value
const TYPE_MASK: u8 = 0x7;

/// Cell types of the maze
/// Codes: 0=road, 1=fire, 2=filled, 3=water (reserved), 4=barrier, 5=finish, 6=post
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    Road,
    Fire,
    Filled,
    Water,
    Barrier,
    Finish,
    Post,
}

impl CellType {
    pub const ALL: [CellType; 7] = [
        CellType::Road,
        CellType::Fire,
        CellType::Filled,
        CellType::Water,
        CellType::Barrier,
        CellType::Finish,
        CellType::Post,
    ];

    /// Decode the type part of a packed cell value. Unknown codes fall back to road.
    pub fn from_value(value: u8) -> Self {
        match value & TYPE_MASK {
            1 => CellType::Fire,
            2 => CellType::Filled,
            3 => CellType::Water,
            4 => CellType::Barrier,
            5 => CellType::Finish,
            6 => CellType::Post,
            _ => CellType::Road,
        }
    }

    /// Type code stored in the low bits of a packed cell value
    pub fn code(self) -> u8 {
        match self {
            CellType::Road => 0,
            CellType::Fire => 1,
            CellType::Filled => 2,
            CellType::Water => 3,
            CellType::Barrier => 4,
            CellType::Finish => 5,
            CellType::Post => 6,
        }
    }

    /// Barrier cells can never be entered
    pub fn is_forbidden(self) -> bool {
        self == CellType::Barrier
    }

    /// Fire and filled cells still need processing before the mission can end
    pub fn is_hazard(self) -> bool {
        matches!(self, CellType::Fire | CellType::Filled)
    }

    /// Short upper-case label drawn inside a cell
    pub fn label(self) -> &'static str {
        match self {
            CellType::Road => "ROAD",
            CellType::Fire => "FIRE",
            CellType::Filled => "FILLED",
            CellType::Water => "WATER",
            CellType::Barrier => "BARRIER",
            CellType::Finish => "FINISH",
            CellType::Post => "POST",
        }
    }

    /// Human-readable name used in history messages
    pub fn name(self) -> &'static str {
        match self {
            CellType::Road => "Road",
            CellType::Fire => "Fire",
            CellType::Filled => "Filled",
            CellType::Water => "Water",
            CellType::Barrier => "Barrier",
            CellType::Finish => "Finish",
            CellType::Post => "Post",
        }
    }

    /// Fill color as (r, g, b)
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            CellType::Road => (255, 255, 255),
            CellType::Fire => (255, 0, 0),
            CellType::Filled => (255, 165, 0),
            CellType::Water => (0, 0, 255),
            CellType::Barrier => (0, 0, 0),
            CellType::Finish => (0, 255, 0),
            CellType::Post => (128, 0, 128),
        }
    }

    /// Whether text drawn over this cell's color should be light
    pub fn wants_light_text(self) -> bool {
        matches!(
            self,
            CellType::Barrier | CellType::Post | CellType::Fire | CellType::Water
        )
    }

    /// Symbol used by the text map format
    pub fn symbol(self) -> char {
        match self {
            CellType::Road => '.',
            CellType::Fire => 'F',
            CellType::Filled => 'L',
            CellType::Water => '~',
            CellType::Barrier => '#',
            CellType::Finish => 'E',
            CellType::Post => 'P',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        CellType::ALL.into_iter().find(|t| t.symbol() == symbol)
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Movement directions. Forward is +y (up), right is +x.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];

    /// Coordinate offset (dx, dy)
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Forward => (0, 1),
            Direction::Backward => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grid coordinate. x grows to the right, y grows upward (row 0 is the bottom row).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Position one step away in the given direction (may lie outside any grid)
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev distance: diagonal neighbors are at distance 1
    pub fn chebyshev_distance(self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A snapshot of one grid cell. Robot occupancy is not stored here;
/// compare `position` with the robot's position instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub cell_type: CellType,
}

impl Cell {
    pub fn is_forbidden(&self) -> bool {
        self.cell_type.is_forbidden()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_value_decoding() {
        for cell_type in CellType::ALL {
            assert_eq!(CellType::from_value(cell_type.code()), cell_type);
            assert_eq!(CellType::from_value(cell_type.code() | ROBOT_FLAG), cell_type);
        }
        assert_eq!(CellType::from_value(7), CellType::Road);
    }

    #[test]
    fn test_only_barrier_is_forbidden() {
        let forbidden: Vec<_> = CellType::ALL.into_iter().filter(|t| t.is_forbidden()).collect();
        assert_eq!(forbidden, vec![CellType::Barrier]);
    }

    #[test]
    fn test_symbols_are_unique() {
        for cell_type in CellType::ALL {
            assert_eq!(CellType::from_symbol(cell_type.symbol()), Some(cell_type));
        }
        assert_eq!(CellType::from_symbol('?'), None);
    }

    #[test]
    fn test_direction_offsets() {
        let origin = Position::new(2, 2);
        assert_eq!(origin.step(Direction::Forward), Position::new(2, 3));
        assert_eq!(origin.step(Direction::Backward), Position::new(2, 1));
        assert_eq!(origin.step(Direction::Left), Position::new(1, 2));
        assert_eq!(origin.step(Direction::Right), Position::new(3, 2));
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = Position::new(1, 1);
        assert_eq!(a.chebyshev_distance(Position::new(2, 2)), 1);
        assert_eq!(a.chebyshev_distance(Position::new(1, 3)), 2);
        assert_eq!(a.chebyshev_distance(a), 0);
    }
}
