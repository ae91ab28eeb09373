use crate::cell::{CellType, Position};
use crate::error::RobotError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything a robot can record in its history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Robot placed on its start cell
    MissionStarted { at: Position },
    /// Successful step onto a cell
    Moved { from: Position, to: Position, cell: CellType },
    /// Step attempt that was refused
    MoveRefused { reason: RobotError },
    /// Fire extinguished, cell is now filled
    FireProcessed { at: Position },
    /// Filled cell turned into a post
    FilledProcessed { at: Position },
    /// Processing attempt on a cell of the wrong type
    NothingToProcess { reason: RobotError },
    /// Simulator reset to the base map
    Reset,
    /// Fresh random maze generated
    NewMaze,
}

impl Action {
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            Action::MoveRefused { .. } | Action::NothingToProcess { .. }
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MissionStarted { at } => write!(f, "Mission started at {}.", at),
            Action::Moved { from, to, cell } => {
                write!(f, "Moved {} -> {}. Cell: {}", from, to, cell)
            }
            Action::MoveRefused { reason } => write!(f, "Cannot move: {}!", reason),
            Action::FireProcessed { at } => {
                write!(f, "At {}: found FIRE, extinguished to FILLED.", at)
            }
            Action::FilledProcessed { at } => {
                write!(f, "At {}: found FILLED, placed a POST.", at)
            }
            Action::NothingToProcess { reason } => write!(f, "{}.", reason),
            Action::Reset => f.write_str("Simulator reset. Mission restarted."),
            Action::NewMaze => f.write_str("New random 5x5 maze created."),
        }
    }
}

/// History entry with wall-clock timestamp
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedAction {
    pub timestamp: DateTime<Local>,
    pub action: Action,
}

impl fmt::Display for LoggedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.action)
    }
}

/// Append-only action history. Only `clear` removes entries.
#[derive(Clone, Debug, Default)]
pub struct ActionLog {
    actions: Vec<LoggedAction>,
}

impl ActionLog {
    pub fn new() -> Self {
        ActionLog {
            actions: Vec::new(),
        }
    }

    /// Log an action with the current wall-clock time
    pub fn log(&mut self, action: Action) {
        self.actions.push(LoggedAction {
            timestamp: Local::now(),
            action,
        });
    }

    /// Get all logged actions
    pub fn entries(&self) -> &[LoggedAction] {
        &self.actions
    }

    /// The last `n` entries, oldest first
    pub fn recent(&self, n: usize) -> &[LoggedAction] {
        let skip = self.actions.len().saturating_sub(n);
        &self.actions[skip..]
    }

    pub fn last(&self) -> Option<&LoggedAction> {
        self.actions.last()
    }

    /// Entries formatted as "[HH:MM:SS] message"
    pub fn lines(&self) -> Vec<String> {
        self.actions.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.actions)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Print log to console
    pub fn print(&self) {
        println!("\n=== Action History ({} entries) ===", self.actions.len());
        for (i, logged) in self.actions.iter().enumerate() {
            println!("#{:3} {}", i + 1, logged);
        }
        println!("=== End of History ===\n");
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut moves = 0;
        let mut refused_moves = 0;
        let mut fires = 0;
        let mut filled = 0;
        let mut refused_processing = 0;

        for logged in &self.actions {
            match &logged.action {
                Action::Moved { .. } => moves += 1,
                Action::MoveRefused { .. } => refused_moves += 1,
                Action::FireProcessed { .. } => fires += 1,
                Action::FilledProcessed { .. } => filled += 1,
                Action::NothingToProcess { .. } => refused_processing += 1,
                _ => {}
            }
        }

        format!(
            "Total Entries: {}\n\
             Movement: {} moves, {} refused\n\
             Processing: {} fires extinguished, {} posts placed, {} refused",
            self.actions.len(),
            moves,
            refused_moves,
            fires,
            filled,
            refused_processing
        )
    }
}
