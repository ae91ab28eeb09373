/// Headless runner: plays a command string against a session and prints the
/// resulting map and history.
///
/// Commands: U D L R (move), X (extinguish fire), P (place post on filled cell),
/// C (check mission), 0 (reset), N (new random maze)

use fireman_maze::config::Config;
use fireman_maze::{render_layout, Command, Direction, Feedback, Grid, Session};
use std::env;
use tracing_subscriber::EnvFilter;

fn parse_command(key: char) -> Option<Command> {
    match key.to_ascii_uppercase() {
        'U' => Some(Command::Move(Direction::Forward)),
        'D' => Some(Command::Move(Direction::Backward)),
        'L' => Some(Command::Move(Direction::Left)),
        'R' => Some(Command::Move(Direction::Right)),
        'X' => Some(Command::ProcessFire),
        'P' => Some(Command::ProcessFilled),
        'C' => Some(Command::CheckMission),
        '0' => Some(Command::Reset),
        'N' => Some(Command::NewMaze),
        _ => None,
    }
}

fn describe(feedback: &Feedback) -> String {
    match feedback {
        Feedback::Done => "ok".to_string(),
        Feedback::Refused(reason) => format!("refused: {}", reason),
        Feedback::MissionAccomplished => {
            "MISSION ACCOMPLISHED: all fires processed and robot on finish".to_string()
        }
        Feedback::AlreadyComplete => "mission already complete".to_string(),
        Feedback::NotComplete(status) => {
            if !status.on_finish {
                "not complete: robot is not on the finish cell".to_string()
            } else {
                format!(
                    "not complete: {} fire and {} filled cells remain",
                    status.remaining_fires, status.remaining_filled
                )
            }
        }
        Feedback::MapReplaced => "new map".to_string(),
    }
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} [--random SEED] COMMANDS", program);
    eprintln!("Commands: U D L R move, X extinguish, P post, C check, 0 reset, N new maze");
    std::process::exit(1);
}

fn main() {
    let config = Config::load();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("fireman_script");

    let (mut session, script) = match args.get(1).map(String::as_str) {
        Some("--random") => {
            let seed = args
                .get(2)
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or_else(|| usage(program));
            let mut session = Session::with_seed(Grid::mission_map(), seed);
            session.new_maze();
            (session, args.get(3).cloned().unwrap_or_default())
        }
        Some(script) => (Session::from_config(&config), script.to_string()),
        None => usage(program),
    };

    println!("{}", render_layout(session.grid(), Some(session.position())));

    for (i, key) in script.chars().enumerate() {
        match parse_command(key) {
            Some(command) => {
                let feedback = session.apply(command);
                println!("#{:3} {} {:?} -> {}", i + 1, key, command, describe(&feedback));
            }
            None => eprintln!("#{:3} skipping unknown command '{}'", i + 1, key),
        }
    }

    println!("\n{}", render_layout(session.grid(), Some(session.position())));
    println!("Robot at {}, mission complete: {}", session.position(), session.is_complete());
    session.history().print();
    println!("{}", session.history().summary());
}
