//! Plain-text map format.
//!
//! One line per row, top row first:
//! - `.` road, `F` fire, `L` filled, `~` water, `#` barrier, `E` finish, `P` post
//! - `R` robot start on a road cell
//! - lower-case `f`, `l`, `w`, `e`, `p` mark the robot start on that cell type
//!
//! Blank lines and surrounding whitespace are ignored.

use crate::cell::{CellType, Position};
use crate::error::LayoutError;
use crate::grid::Grid;

const ROBOT_SYMBOL: char = 'R';

/// Parse a text map into a grid
pub fn parse_layout(text: &str) -> Result<Grid, LayoutError> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let width = rows.first().ok_or(LayoutError::Empty)?.chars().count();
    let height = rows.len();
    let mut grid = Grid::sized(width, height)?;
    let mut start = None;

    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(LayoutError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }

        let y = (height - 1 - row) as i32;
        for (col, symbol) in line.chars().enumerate() {
            let pos = Position::new(col as i32, y);
            let (cell_type, has_robot) = decode_symbol(symbol)
                .ok_or(LayoutError::UnknownSymbol { symbol, row, col })?;

            grid.set_cell_type(pos, cell_type);
            if has_robot {
                grid.claim_start(&mut start, pos)?;
            }
        }
    }

    if let Some(pos) = start {
        grid.set_start(pos);
    }

    grid.reset_revision();
    Ok(grid)
}

/// Symbol for the robot standing on `cell_type`. Barriers cannot hold the robot.
fn robot_symbol(cell_type: CellType) -> Option<char> {
    match cell_type {
        CellType::Road => Some(ROBOT_SYMBOL),
        CellType::Fire => Some('f'),
        CellType::Filled => Some('l'),
        CellType::Water => Some('w'),
        CellType::Finish => Some('e'),
        CellType::Post => Some('p'),
        CellType::Barrier => None,
    }
}

fn decode_symbol(symbol: char) -> Option<(CellType, bool)> {
    if let Some(cell_type) = CellType::from_symbol(symbol) {
        return Some((cell_type, false));
    }
    CellType::ALL
        .into_iter()
        .find(|&t| robot_symbol(t) == Some(symbol))
        .map(|t| (t, true))
}

/// Render a grid as text, top row first. `robot` marks the robot's cell.
pub fn render_layout(grid: &Grid, robot: Option<Position>) -> String {
    let mut result = String::with_capacity(((grid.width() + 1) * grid.height()) as usize);

    for y in (0..grid.height()).rev() {
        for x in 0..grid.width() {
            let pos = Position::new(x, y);
            let cell_type = grid.cell_type(pos).unwrap_or(CellType::Road);
            let symbol = match robot {
                Some(at) if at == pos => robot_symbol(cell_type).unwrap_or(cell_type.symbol()),
                _ => cell_type.symbol(),
            };
            result.push(symbol);
        }
        result.push('\n');
    }

    result
}
