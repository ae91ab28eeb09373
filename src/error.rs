use crate::cell::{CellType, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a robot action is refused. State is left unchanged in every case.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotError {
    #[error("cell {target} is outside the grid")]
    OutOfBounds { target: Position },

    #[error("cell {target} is a barrier")]
    Forbidden { target: Position },

    #[error("teleport from {from} to {target} refused")]
    NonAdjacent { from: Position, target: Position },

    #[error("nothing to process at {at}: expected {expected}, found {found}")]
    WrongCellType {
        at: Position,
        expected: CellType,
        found: CellType,
    },
}

/// Errors building a grid from packed values or a text map
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown symbol '{symbol}' at row {row}, column {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },

    #[error("more than one robot start: {first} and {second}")]
    MultipleStarts { first: Position, second: Position },

    #[error("robot cannot start on barrier {at}")]
    StartOnBarrier { at: Position },

    #[error("layout is {width}x{height}, sides are limited to {max}")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("cell value {value:#x} at row {row}, column {col} is out of range")]
    InvalidValue { value: u8, row: usize, col: usize },
}
