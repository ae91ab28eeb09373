pub mod action_log;
pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod robot;
pub mod session;

pub use action_log::{Action, ActionLog, LoggedAction};
pub use cell::{Cell, CellType, Direction, Position};
pub use config::Config;
pub use error::{LayoutError, RobotError};
pub use grid::Grid;
pub use layout::{parse_layout, render_layout};
pub use robot::{MissionStatus, Robot};
pub use session::{Command, Feedback, Session};
