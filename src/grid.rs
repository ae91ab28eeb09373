use crate::cell::{Cell, CellType, Direction, Position, ROBOT_FLAG};
use crate::error::LayoutError;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

/// Side length of the gameplay maze
pub const MAZE_SIZE: i32 = 5;

/// Largest width or height a grid can have
pub const MAX_SIDE: i32 = 1024;

/// Special cells scattered over a random maze; every other cell is road
pub const RANDOM_SPECIALS: [CellType; 10] = [
    CellType::Fire,
    CellType::Fire,
    CellType::Fire,
    CellType::Filled,
    CellType::Filled,
    CellType::Barrier,
    CellType::Barrier,
    CellType::Post,
    CellType::Post,
    CellType::Finish,
];

/// Hand-designed mission layout, (x, y, type). Everything else is road.
const MISSION_CELLS: [(i32, i32, CellType); 12] = [
    (4, 4, CellType::Finish),
    (3, 4, CellType::Barrier),
    (2, 4, CellType::Post),
    (1, 4, CellType::Fire),
    (3, 3, CellType::Fire),
    (1, 3, CellType::Filled),
    (3, 2, CellType::Post),
    (1, 2, CellType::Fire),
    (0, 2, CellType::Barrier),
    (2, 1, CellType::Filled),
    (4, 0, CellType::Post),
    (3, 0, CellType::Barrier),
];

/// Grid of typed cells.
/// Cells are stored row by row starting from the bottom row (y = 0).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<CellType>,
    start: Position,
    /// Revision number - incremented whenever a cell type changes
    revision: u64,
}

impl Grid {
    /// Create a grid with every cell set to road and the robot start at (0, 0).
    /// Dimensions are clamped to `1..=MAX_SIDE`.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.clamp(1, MAX_SIDE);
        let height = height.clamp(1, MAX_SIDE);
        Grid {
            width,
            height,
            cells: vec![CellType::Road; (width * height) as usize],
            start: Position::default(),
            revision: 0,
        }
    }

    /// The fixed 5x5 mission map
    pub fn mission_map() -> Self {
        let mut grid = Self::new(MAZE_SIZE, MAZE_SIZE);
        for (x, y, cell_type) in MISSION_CELLS {
            grid.set_cell_type(Position::new(x, y), cell_type);
        }
        grid.reset_revision();
        info!("built mission map");
        grid
    }

    /// A 5x5 map with `RANDOM_SPECIALS` spread over a uniform shuffle of every
    /// cell except the start cell (0, 0), which stays road.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut grid = Self::new(MAZE_SIZE, MAZE_SIZE);
        let start = grid.start;

        let mut candidates: Vec<Position> = (0..MAZE_SIZE)
            .flat_map(|x| (0..MAZE_SIZE).map(move |y| Position::new(x, y)))
            .filter(|&pos| pos != start)
            .collect();
        candidates.shuffle(rng);

        for (&pos, &cell_type) in candidates.iter().zip(RANDOM_SPECIALS.iter()) {
            grid.set_cell_type(pos, cell_type);
        }
        grid.reset_revision();
        info!(finish = ?grid.finish_position(), "built random map");
        grid
    }

    /// Build a grid from packed cell values, top row first.
    /// The low three bits of a value are the type code, `ROBOT_FLAG` marks the start.
    pub fn from_values<T: AsRef<[u8]>>(rows: &[T]) -> Result<Self, LayoutError> {
        let first = rows.first().ok_or(LayoutError::Empty)?;
        let width = first.as_ref().len();
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let height = rows.len();
        let mut grid = Self::sized(width, height)?;
        let mut start = None;

        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }

            let y = (height - 1 - row) as i32;
            for (col, &value) in values.iter().enumerate() {
                if value > (ROBOT_FLAG | 0x7) {
                    return Err(LayoutError::InvalidValue { value, row, col });
                }

                let pos = Position::new(col as i32, y);
                let cell_type = CellType::from_value(value);
                grid.set_cell_type(pos, cell_type);

                if value & ROBOT_FLAG != 0 {
                    grid.claim_start(&mut start, pos)?;
                }
            }
        }

        if let Some(pos) = start {
            grid.start = pos;
        }
        grid.reset_revision();
        Ok(grid)
    }

    /// Road grid for layout input, refusing sides above `MAX_SIDE`
    pub(crate) fn sized(width: usize, height: usize) -> Result<Self, LayoutError> {
        let max = MAX_SIDE as usize;
        if width > max || height > max {
            return Err(LayoutError::TooLarge { width, height, max });
        }
        Ok(Self::new(width as i32, height as i32))
    }

    /// Record `pos` as the start, rejecting duplicates and barriers
    pub(crate) fn claim_start(
        &self,
        start: &mut Option<Position>,
        pos: Position,
    ) -> Result<(), LayoutError> {
        if let Some(first) = *start {
            return Err(LayoutError::MultipleStarts { first, second: pos });
        }
        if self.cell_type(pos).is_some_and(CellType::is_forbidden) {
            return Err(LayoutError::StartOnBarrier { at: pos });
        }
        *start = Some(pos);
        Ok(())
    }

    pub(crate) fn reset_revision(&mut self) {
        self.revision = 0;
    }

    pub(crate) fn set_start(&mut self, start: Position) {
        self.start = start;
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Where a robot bound to this grid begins
    pub fn start(&self) -> Position {
        self.start
    }

    /// Get current grid revision number
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| (pos.x + pos.y * self.width) as usize)
    }

    /// Cell at (x, y), or None when the coordinate is out of bounds
    pub fn get_cell(&self, x: i32, y: i32) -> Option<Cell> {
        let position = Position::new(x, y);
        self.cell_type(position).map(|cell_type| Cell {
            position,
            cell_type,
        })
    }

    pub fn cell_type(&self, pos: Position) -> Option<CellType> {
        self.index(pos).map(|id| self.cells[id])
    }

    /// Adjacent cell in `direction`, or None past the edge
    pub fn neighbor(&self, cell: &Cell, direction: Direction) -> Option<Cell> {
        let target = cell.position.step(direction);
        self.get_cell(target.x, target.y)
    }

    /// Set a cell's type. Returns false if `pos` is out of bounds.
    pub fn set_cell_type(&mut self, pos: Position, cell_type: CellType) -> bool {
        match self.index(pos) {
            Some(id) => {
                if self.cells[id] != cell_type {
                    self.cells[id] = cell_type;
                    self.revision += 1;
                }
                true
            }
            None => false,
        }
    }

    /// All cells, bottom row first, left to right
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().enumerate().map(move |(id, &cell_type)| {
            let id = id as i32;
            Cell {
                position: Position::new(id % self.width, id / self.width),
                cell_type,
            }
        })
    }

    pub fn count(&self, cell_type: CellType) -> usize {
        self.cells.iter().filter(|&&t| t == cell_type).count()
    }

    /// True while any fire or filled cell remains
    pub fn has_hazards(&self) -> bool {
        self.cells.iter().any(|t| t.is_hazard())
    }

    /// First finish cell scanning from the bottom row up
    pub fn finish_position(&self) -> Option<Position> {
        self.cells()
            .find(|cell| cell.cell_type == CellType::Finish)
            .map(|cell| cell.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_grid_is_all_road() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.count(CellType::Road), 6);
        assert_eq!(grid.start(), Position::new(0, 0));
    }

    #[test]
    fn test_new_grid_clamps_sides() {
        let grid = Grid::new(i32::MAX, i32::MIN);
        assert_eq!(grid.width(), MAX_SIDE);
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.count(CellType::Road), MAX_SIDE as usize);
    }

    #[test]
    fn test_get_cell_bounds() {
        let grid = Grid::new(5, 5);
        assert!(grid.get_cell(-1, 0).is_none());
        assert!(grid.get_cell(0, -1).is_none());
        assert!(grid.get_cell(5, 0).is_none());
        assert!(grid.get_cell(0, 5).is_none());
        assert_eq!(grid.get_cell(4, 4).map(|c| c.position), Some(Position::new(4, 4)));
    }

    #[test]
    fn test_y_counts_from_bottom() {
        let grid = Grid::from_values(&[[1u8, 0], [0, 4]]).unwrap();
        assert_eq!(grid.cell_type(Position::new(0, 1)), Some(CellType::Fire));
        assert_eq!(grid.cell_type(Position::new(1, 0)), Some(CellType::Barrier));
    }

    #[test]
    fn test_neighbor_lookup() {
        let grid = Grid::mission_map();
        let origin = grid.get_cell(0, 0).unwrap();
        assert_eq!(grid.neighbor(&origin, Direction::Left), None);
        assert_eq!(grid.neighbor(&origin, Direction::Backward), None);
        let up = grid.neighbor(&origin, Direction::Forward).unwrap();
        assert_eq!(up.position, Position::new(0, 1));
        assert_eq!(up.cell_type, CellType::Road);
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut grid = Grid::new(2, 2);
        assert_eq!(grid.revision(), 0);
        assert!(grid.set_cell_type(Position::new(1, 1), CellType::Fire));
        assert_eq!(grid.revision(), 1);
        // Same type again is not a change
        assert!(grid.set_cell_type(Position::new(1, 1), CellType::Fire));
        assert_eq!(grid.revision(), 1);
        assert!(!grid.set_cell_type(Position::new(2, 0), CellType::Fire));
        assert_eq!(grid.revision(), 1);
    }

    #[test]
    fn test_from_values_robot_flag() {
        let grid = Grid::from_values(&[vec![0u8, 0x8], vec![5, 0]]).unwrap();
        assert_eq!(grid.start(), Position::new(1, 1));
        assert_eq!(grid.finish_position(), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_from_values_errors() {
        let empty: [[u8; 0]; 0] = [];
        assert_eq!(Grid::from_values(&empty), Err(LayoutError::Empty));
        assert_eq!(
            Grid::from_values(&[vec![0u8, 0], vec![0]]),
            Err(LayoutError::RaggedRow { row: 1, expected: 2, found: 1 })
        );
        assert_eq!(
            Grid::from_values(&[[0x10u8]]),
            Err(LayoutError::InvalidValue { value: 0x10, row: 0, col: 0 })
        );
        assert_eq!(
            Grid::from_values(&[[0x8u8, 0x8]]),
            Err(LayoutError::MultipleStarts {
                first: Position::new(0, 0),
                second: Position::new(1, 0),
            })
        );
        assert_eq!(
            Grid::from_values(&[[0xCu8]]),
            Err(LayoutError::StartOnBarrier { at: Position::new(0, 0) })
        );
        let wide = vec![vec![0u8; MAX_SIDE as usize + 1]];
        assert_eq!(
            Grid::from_values(&wide),
            Err(LayoutError::TooLarge {
                width: MAX_SIDE as usize + 1,
                height: 1,
                max: MAX_SIDE as usize,
            })
        );
    }

    #[test]
    fn test_random_map_is_seed_deterministic() {
        let a = Grid::random(&mut StdRng::seed_from_u64(7));
        let b = Grid::random(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.revision(), 0);
    }
}
