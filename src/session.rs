use crate::action_log::{Action, ActionLog};
use crate::cell::{Direction, Position};
use crate::config::{Config, InitialMap};
use crate::error::RobotError;
use crate::grid::Grid;
use crate::layout::parse_layout;
use crate::robot::{MissionStatus, Robot};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use tracing::{info, warn};

/// User actions a front-end can send to a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    ProcessFire,
    ProcessFilled,
    CheckMission,
    Reset,
    NewMaze,
}

/// What the front-end should tell the user after a command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    /// Action carried out, nothing to announce
    Done,
    /// Action refused, state unchanged
    Refused(RobotError),
    /// Mission completed; reported once per robot
    MissionAccomplished,
    /// Mission was already completed earlier
    AlreadyComplete,
    /// Manual check failed
    NotComplete(MissionStatus),
    /// Grid and robot were replaced
    MapReplaced,
}

/// One user's simulator: the robot with its grid, the map that reset returns
/// to, and the random source for new mazes.
pub struct Session {
    robot: Robot,
    base: Grid,
    rng: StdRng,
    notified: bool,
    /// Bumped every time the robot and its grid are replaced
    generation: u64,
}

impl Session {
    /// Session on `base` with an entropy-seeded random source
    pub fn new(base: Grid) -> Self {
        Self::with_rng(base, StdRng::from_entropy())
    }

    /// Session whose random mazes are reproducible
    pub fn with_seed(base: Grid, seed: u64) -> Self {
        Self::with_rng(base, StdRng::seed_from_u64(seed))
    }

    fn with_rng(base: Grid, rng: StdRng) -> Self {
        Session {
            robot: Robot::new(base.clone()),
            base,
            rng,
            notified: false,
            generation: 0,
        }
    }

    /// Build a session as described by the `[maze]` section.
    /// An unreadable layout file falls back to the mission map.
    pub fn from_config(config: &Config) -> Self {
        let base = match &config.maze.layout_file {
            Some(path) => load_layout_file(path).unwrap_or_else(|e| {
                warn!(path = %path, error = %e, "failed to load layout, using mission map");
                Grid::mission_map()
            }),
            None => Grid::mission_map(),
        };

        let mut session = match config.maze.seed {
            Some(seed) => Self::with_seed(base, seed),
            None => Self::new(base),
        };
        if config.maze.initial == InitialMap::Random {
            session.new_maze();
        }
        session
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn grid(&self) -> &Grid {
        self.robot.grid()
    }

    pub fn position(&self) -> Position {
        self.robot.position()
    }

    pub fn history(&self) -> &ActionLog {
        self.robot.history()
    }

    /// Whether the completion notice has been handed out for this robot
    pub fn notified(&self) -> bool {
        self.notified
    }

    /// Counts map replacements. Together with `Grid::revision` it tells a
    /// front-end whether anything on the map changed since it last looked.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Completion latch of the current robot
    pub fn is_complete(&mut self) -> bool {
        self.robot.is_mission_complete()
    }

    /// Run one command to completion
    pub fn apply(&mut self, command: Command) -> Feedback {
        match command {
            Command::Move(_) | Command::ProcessFire | Command::ProcessFilled => {
                if self.robot.is_mission_complete() {
                    return self.announce_or(Feedback::AlreadyComplete);
                }
                let result = match command {
                    Command::Move(direction) => self.robot.move_in(direction).map(|_| ()),
                    Command::ProcessFire => self.robot.process_fire().map(|_| ()),
                    _ => self.robot.process_filled().map(|_| ()),
                };
                match result {
                    Ok(()) => self.announce_or(Feedback::Done),
                    Err(reason) => Feedback::Refused(reason),
                }
            }
            Command::CheckMission => {
                if self.robot.is_mission_complete() {
                    self.announce_or(Feedback::AlreadyComplete)
                } else {
                    Feedback::NotComplete(self.robot.evaluate_mission())
                }
            }
            Command::Reset => {
                self.reset();
                self.announce_or(Feedback::MapReplaced)
            }
            Command::NewMaze => {
                self.new_maze();
                self.announce_or(Feedback::MapReplaced)
            }
        }
    }

    /// Hand out the completion notice the first time the mission is complete
    fn announce_or(&mut self, otherwise: Feedback) -> Feedback {
        if !self.notified && self.robot.is_mission_complete() {
            self.notified = true;
            info!(position = %self.robot.position(), "mission accomplished");
            Feedback::MissionAccomplished
        } else {
            otherwise
        }
    }

    /// Replace the robot with a fresh one on the base map.
    /// History restarts with a single reset entry.
    pub fn reset(&mut self) {
        self.replace_robot(self.base.clone());
        self.robot.clear_history();
        self.robot.note(Action::Reset);
        info!("session reset");
    }

    /// Replace the robot with a fresh one on a random maze
    pub fn new_maze(&mut self) {
        let grid = Grid::random(&mut self.rng);
        self.replace_robot(grid);
        self.robot.note(Action::NewMaze);
    }

    fn replace_robot(&mut self, grid: Grid) {
        self.robot = Robot::new(grid);
        self.notified = false;
        self.generation += 1;
    }
}

/// Read and parse a text map
pub fn load_layout_file(path: &str) -> Result<Grid, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let grid = parse_layout(&text)?;
    info!(path, "loaded layout");
    Ok(grid)
}
