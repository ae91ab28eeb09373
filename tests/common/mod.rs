use fireman_maze::{CellType, Direction, Grid, Robot, RobotError};
use std::collections::HashMap;

/// Parse a move script: U=forward, D=backward, L=left, R=right
pub fn directions(script: &str) -> Vec<Direction> {
    script
        .chars()
        .filter_map(|c| match c {
            'U' => Some(Direction::Forward),
            'D' => Some(Direction::Backward),
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            _ => None,
        })
        .collect()
}

/// Run a script of moves (U/D/L/R) and processing steps (X=fire, P=filled).
/// Returns every step's outcome in order.
pub fn run_script(robot: &mut Robot, script: &str) -> Vec<Result<(), RobotError>> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'X' => robot.process_fire().map(|_| ()),
            'P' => robot.process_filled().map(|_| ()),
            other => {
                let direction = directions(&other.to_string())
                    .first()
                    .copied()
                    .unwrap_or_else(|| panic!("unknown script step '{}'", other));
                robot.move_in(direction).map(|_| ())
            }
        })
        .collect()
}

/// Number of cells of each type
pub fn type_counts(grid: &Grid) -> HashMap<CellType, usize> {
    let mut counts = HashMap::new();
    for cell in grid.cells() {
        *counts.entry(cell.cell_type).or_insert(0) += 1;
    }
    counts
}

/// Route through the mission map that clears every hazard and ends on the finish
pub const CLEARING_ROUTE: &str = "RUR P LU XP U P U XP DRR XP RU";
