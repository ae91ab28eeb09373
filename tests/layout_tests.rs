mod common;

use common::run_script;
use fireman_maze::{parse_layout, render_layout, CellType, Grid, Position, Robot};

#[test]
fn render_follows_robot_and_processing() {
    let mut robot = Robot::new(Grid::mission_map());
    run_script(&mut robot, "RUU X");
    let text = render_layout(robot.grid(), Some(robot.position()));
    assert_eq!(text, ".FP#E\n.L.F.\n#l.P.\n..L..\n...#P\n");
}

#[test]
fn parsed_layout_drives_a_robot() {
    let grid = parse_layout(
        "
        ..E
        #L.
        R.F
        ",
    )
    .unwrap();
    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 3);
    assert_eq!(grid.start(), Position::new(0, 0));
    assert_eq!(grid.finish_position(), Some(Position::new(2, 2)));

    let mut robot = Robot::new(grid);
    let results = run_script(&mut robot, "RR XP U L P R U");
    assert!(results.iter().all(Result::is_ok), "{:?}", results);
    assert!(robot.is_mission_complete());
}

#[test]
fn water_is_enterable_and_inert() {
    let grid = parse_layout("R~.").unwrap();
    let mut robot = Robot::new(grid);
    robot.move_right().unwrap();
    assert_eq!(robot.current_cell().cell_type, CellType::Water);
    assert!(robot.process_fire().is_err());
    assert!(robot.process_filled().is_err());
    assert_eq!(render_layout(robot.grid(), Some(robot.position())), ".w.\n");
}

#[test]
fn packed_values_match_text_layout() {
    let from_values = Grid::from_values(&[
        [0u8, 1, 6, 4, 5],
        [0, 2, 0, 1, 0],
        [4, 1, 0, 6, 0],
        [0, 0, 2, 0, 0],
        [0x8, 0, 0, 4, 6],
    ])
    .unwrap();
    assert_eq!(from_values, Grid::mission_map());
}
