use crate::action_log::{Action, ActionLog};
use crate::cell::{Cell, CellType, Direction, Position};
use crate::error::RobotError;
use crate::grid::Grid;
use tracing::debug;

/// Result of evaluating the completion condition against the current state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissionStatus {
    pub on_finish: bool,
    pub remaining_fires: usize,
    pub remaining_filled: usize,
}

impl MissionStatus {
    pub fn hazards_remaining(&self) -> usize {
        self.remaining_fires + self.remaining_filled
    }

    /// Robot on a finish cell and nothing left to process
    pub fn is_satisfied(&self) -> bool {
        self.on_finish && self.hazards_remaining() == 0
    }
}

/// The firefighting robot, bound to the grid it works on.
///
/// The robot's position is the only record of where it stands; cells never
/// carry an occupancy flag.
#[derive(Clone, Debug)]
pub struct Robot {
    grid: Grid,
    position: Position,
    history: ActionLog,
    /// Latched once the mission is first found complete
    mission_completed: bool,
}

impl Robot {
    /// Place a robot on the grid's start cell
    pub fn new(grid: Grid) -> Self {
        let position = grid.start();
        let mut history = ActionLog::new();
        history.log(Action::MissionStarted { at: position });
        debug!(%position, "robot placed");

        Robot {
            grid,
            position,
            history,
            mission_completed: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn history(&self) -> &ActionLog {
        &self.history
    }

    /// Drop every history entry
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Append a session-level entry (reset, new maze)
    pub(crate) fn note(&mut self, action: Action) {
        self.history.log(action);
    }

    /// The cell under the robot
    pub fn current_cell(&self) -> Cell {
        Cell {
            position: self.position,
            cell_type: self.current_type(),
        }
    }

    fn current_type(&self) -> CellType {
        // The position is only ever set to an in-bounds cell
        self.grid.cell_type(self.position).unwrap_or(CellType::Road)
    }

    /// Whether the robot stands at `pos`
    pub fn is_at(&self, pos: Position) -> bool {
        self.position == pos
    }

    /// Step one cell in `direction`
    pub fn move_in(&mut self, direction: Direction) -> Result<Position, RobotError> {
        let target = self.position.step(direction);
        debug!(%direction, %target, "move requested");
        self.step_to(target)
    }

    pub fn move_forward(&mut self) -> Result<Position, RobotError> {
        self.move_in(Direction::Forward)
    }

    pub fn move_backward(&mut self) -> Result<Position, RobotError> {
        self.move_in(Direction::Backward)
    }

    pub fn move_left(&mut self) -> Result<Position, RobotError> {
        self.move_in(Direction::Left)
    }

    pub fn move_right(&mut self) -> Result<Position, RobotError> {
        self.move_in(Direction::Right)
    }

    /// Move onto `target` if it is in bounds, not a barrier, and within one
    /// step (diagonals included). Every attempt is recorded in the history.
    pub fn step_to(&mut self, target: Position) -> Result<Position, RobotError> {
        match self.check_step(target) {
            Ok(cell) => {
                let from = self.position;
                self.position = target;
                self.history.log(Action::Moved { from, to: target, cell });
                debug!(%from, to = %target, %cell, "robot moved");
                Ok(target)
            }
            Err(reason) => {
                self.history.log(Action::MoveRefused { reason });
                debug!(%reason, "move refused");
                Err(reason)
            }
        }
    }

    fn check_step(&self, target: Position) -> Result<CellType, RobotError> {
        let cell = self
            .grid
            .cell_type(target)
            .ok_or(RobotError::OutOfBounds { target })?;
        if cell.is_forbidden() {
            return Err(RobotError::Forbidden { target });
        }
        if self.position.chebyshev_distance(target) > 1 {
            return Err(RobotError::NonAdjacent {
                from: self.position,
                target,
            });
        }
        Ok(cell)
    }

    /// Extinguish a fire on the current cell: fire becomes filled
    pub fn process_fire(&mut self) -> Result<CellType, RobotError> {
        self.process(CellType::Fire, CellType::Filled)
    }

    /// Finish a filled cell: filled becomes post
    pub fn process_filled(&mut self) -> Result<CellType, RobotError> {
        self.process(CellType::Filled, CellType::Post)
    }

    fn process(&mut self, expected: CellType, result: CellType) -> Result<CellType, RobotError> {
        let at = self.position;
        let found = self.current_type();

        if found != expected {
            let reason = RobotError::WrongCellType { at, expected, found };
            self.history.log(Action::NothingToProcess { reason });
            debug!(%reason, "processing refused");
            return Err(reason);
        }

        self.grid.set_cell_type(at, result);
        let action = match expected {
            CellType::Fire => Action::FireProcessed { at },
            _ => Action::FilledProcessed { at },
        };
        self.history.log(action);
        debug!(%at, from = %expected, to = %result, "cell processed");
        Ok(result)
    }

    /// Recompute the completion condition from the current state.
    /// Does not read or touch the completion latch.
    pub fn evaluate_mission(&self) -> MissionStatus {
        MissionStatus {
            on_finish: self.current_type() == CellType::Finish,
            remaining_fires: self.grid.count(CellType::Fire),
            remaining_filled: self.grid.count(CellType::Filled),
        }
    }

    /// True once the robot has stood on a finish cell with no fire or filled
    /// cells left. The result latches: after the first true it stays true.
    pub fn is_mission_complete(&mut self) -> bool {
        if self.mission_completed {
            return true;
        }
        if self.evaluate_mission().is_satisfied() {
            self.mission_completed = true;
            debug!(position = %self.position, "mission complete");
        }
        self.mission_completed
    }

    /// State of the completion latch without evaluating anything
    pub fn mission_latched(&self) -> bool {
        self.mission_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robot_on(layout: &str) -> Robot {
        Robot::new(crate::layout::parse_layout(layout).unwrap())
    }

    #[test]
    fn test_starts_at_grid_start_with_one_entry() {
        let robot = robot_on("...\n.R.\n...");
        assert_eq!(robot.position(), Position::new(1, 1));
        assert_eq!(robot.history().len(), 1);
        assert_eq!(
            robot.history().entries()[0].action,
            Action::MissionStarted { at: Position::new(1, 1) }
        );
    }

    #[test]
    fn test_exactly_one_cell_is_occupied() {
        let mut robot = robot_on("...\nR..");
        let occupied = |robot: &Robot| -> Vec<Position> {
            robot
                .grid()
                .cells()
                .map(|cell| cell.position)
                .filter(|&pos| robot.is_at(pos))
                .collect()
        };
        assert_eq!(occupied(&robot), vec![Position::new(0, 0)]);

        robot.move_right().unwrap();
        robot.move_forward().unwrap();
        assert_eq!(occupied(&robot), vec![Position::new(1, 1)]);
        assert!(!robot.is_at(Position::new(-1, 0)));
    }

    #[test]
    fn test_step_to_rejects_teleport() {
        let mut robot = robot_on("...\n...\nR..");
        let result = robot.step_to(Position::new(2, 2));
        assert_eq!(
            result,
            Err(RobotError::NonAdjacent {
                from: Position::new(0, 0),
                target: Position::new(2, 2),
            })
        );
        assert_eq!(robot.position(), Position::new(0, 0));
        // Diagonal neighbors are one step away
        assert_eq!(robot.step_to(Position::new(1, 1)), Ok(Position::new(1, 1)));
    }

    #[test]
    fn test_barrier_checked_before_distance() {
        let mut robot = robot_on("..#\n...\nR..");
        assert_eq!(
            robot.step_to(Position::new(2, 2)),
            Err(RobotError::Forbidden { target: Position::new(2, 2) })
        );
    }

    #[test]
    fn test_move_out_of_bounds() {
        let mut robot = robot_on("R.");
        assert_eq!(
            robot.move_left(),
            Err(RobotError::OutOfBounds { target: Position::new(-1, 0) })
        );
        assert_eq!(robot.position(), Position::new(0, 0));
        assert_eq!(robot.history().len(), 2);
    }

    #[test]
    fn test_processing_chain() {
        let mut robot = robot_on("f.");
        let at = Position::new(0, 0);
        assert!(robot.process_filled().is_err());
        assert_eq!(robot.process_fire(), Ok(CellType::Filled));
        assert_eq!(
            robot.process_fire(),
            Err(RobotError::WrongCellType {
                at,
                expected: CellType::Fire,
                found: CellType::Filled,
            })
        );
        assert_eq!(robot.process_filled(), Ok(CellType::Post));
        assert!(robot.process_fire().is_err());
        assert!(robot.process_filled().is_err());
        assert_eq!(robot.grid().cell_type(at), Some(CellType::Post));
        assert_eq!(robot.grid().revision(), 2);
    }

    #[test]
    fn test_completion_requires_no_hazards() {
        let mut robot = robot_on("L.\ne.");
        let status = robot.evaluate_mission();
        assert!(status.on_finish);
        assert_eq!(status.remaining_filled, 1);
        assert!(!robot.is_mission_complete());
        assert!(!robot.mission_latched());
    }

    #[test]
    fn test_completion_latch_survives_new_hazard() {
        let mut robot = robot_on("e.");
        assert!(robot.is_mission_complete());

        // Reintroduce a hazard behind the robot's back
        robot.grid.set_cell_type(Position::new(1, 0), CellType::Fire);

        assert!(!robot.evaluate_mission().is_satisfied());
        assert!(robot.is_mission_complete());
        assert!(robot.mission_latched());
    }

    #[test]
    fn test_latch_survives_leaving_finish() {
        let mut robot = robot_on("e.");
        assert!(robot.is_mission_complete());
        robot.move_right().unwrap();
        assert!(!robot.evaluate_mission().on_finish);
        assert!(robot.is_mission_complete());
    }
}
