use arboard::Clipboard;
use fireman_maze::config::Config;
use fireman_maze::grid::MAZE_SIZE;
use fireman_maze::{render_layout, Command, Direction, Feedback, Position, Session};
use macroquad::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const PANEL_WIDTH: f32 = 360.0;
const BUTTON_HEIGHT: f32 = 32.0;
const HISTORY_LINE_HEIGHT: f32 = 18.0;
const ROBOT_COLOR: Color = Color::new(0.0, 0.0, 1.0, 1.0);

/// Clickable control bound to a session command
struct Button {
    label: &'static str,
    rect: Rect,
    command: Command,
}

impl Button {
    fn new(label: &'static str, x: f32, y: f32, w: f32, command: Command) -> Self {
        Button {
            label,
            rect: Rect::new(x, y, w, BUTTON_HEIGHT),
            command,
        }
    }

    fn draw(&self, hovered: bool) {
        let fill = if hovered {
            Color::from_rgba(190, 190, 220, 255)
        } else {
            Color::from_rgba(235, 235, 235, 255)
        };
        draw_rectangle(self.rect.x, self.rect.y, self.rect.w, self.rect.h, fill);
        draw_rectangle_lines(self.rect.x, self.rect.y, self.rect.w, self.rect.h, 1.0, BLACK);
        let dims = measure_text(self.label, None, 18, 1.0);
        draw_text(
            self.label,
            self.rect.x + (self.rect.w - dims.width) / 2.0,
            self.rect.y + (self.rect.h + dims.height) / 2.0,
            18.0,
            BLACK,
        );
    }
}

/// Desktop front-end state
struct App {
    session: Session,
    config: Config,
    buttons: Vec<Button>,
    /// Last message shown under the controls
    status: String,
    /// Completion banner waiting to be dismissed
    banner: Option<String>,
    /// Robot and finish summary, rebuilt when `info_key` goes stale
    info: String,
    /// (map generation, grid revision, robot position) the info was built for
    info_key: Option<(u64, u64, Position)>,
}

impl App {
    fn new(config: Config) -> Self {
        let session = Session::from_config(&config);
        let buttons = Self::layout_buttons(&config);
        App {
            session,
            config,
            buttons,
            status: "Use the arrows to move the robot.".to_string(),
            banner: None,
            info: String::new(),
            info_key: None,
        }
    }

    fn map_size(config: &Config) -> f32 {
        config.grid.margin * 2.0 + config.grid.cell_size * MAZE_SIZE as f32
    }

    fn layout_buttons(config: &Config) -> Vec<Button> {
        let left = Self::map_size(config) + 10.0;
        let third = (PANEL_WIDTH - 40.0) / 3.0;
        let half = (PANEL_WIDTH - 30.0) / 2.0;
        let step = BUTTON_HEIGHT + 8.0;
        let top = 20.0;

        vec![
            Button::new("Forward", left + third + 10.0, top, third, Command::Move(Direction::Forward)),
            Button::new("Left", left, top + step, third, Command::Move(Direction::Left)),
            Button::new("Right", left + 2.0 * (third + 10.0), top + step, third, Command::Move(Direction::Right)),
            Button::new("Backward", left + third + 10.0, top + 2.0 * step, third, Command::Move(Direction::Backward)),
            Button::new("Extinguish fire", left, top + 3.0 * step + 10.0, half, Command::ProcessFire),
            Button::new("Place post", left + half + 10.0, top + 3.0 * step + 10.0, half, Command::ProcessFilled),
            Button::new("Check mission", left, top + 4.0 * step + 20.0, PANEL_WIDTH - 20.0, Command::CheckMission),
            Button::new("Reset", left, top + 5.0 * step + 20.0, half, Command::Reset),
            Button::new("New maze", left + half + 10.0, top + 5.0 * step + 20.0, half, Command::NewMaze),
        ]
    }

    fn history_top(&self) -> f32 {
        20.0 + 6.0 * (BUTTON_HEIGHT + 8.0) + 60.0
    }

    fn handle_input(&mut self) {
        if self.banner.is_some() {
            if is_mouse_button_pressed(MouseButton::Left) || get_last_key_pressed().is_some() {
                self.banner = None;
            }
            return;
        }

        let key_commands = [
            (KeyCode::Up, Command::Move(Direction::Forward)),
            (KeyCode::Down, Command::Move(Direction::Backward)),
            (KeyCode::Left, Command::Move(Direction::Left)),
            (KeyCode::Right, Command::Move(Direction::Right)),
            (KeyCode::F, Command::ProcessFire),
            (KeyCode::P, Command::ProcessFilled),
            (KeyCode::Enter, Command::CheckMission),
            (KeyCode::R, Command::Reset),
            (KeyCode::N, Command::NewMaze),
        ];
        for (key, command) in key_commands {
            if is_key_pressed(key) {
                self.run(command);
            }
        }

        if is_mouse_button_pressed(MouseButton::Left) {
            let (mx, my) = mouse_position();
            let clicked = self
                .buttons
                .iter()
                .find(|b| b.rect.contains(vec2(mx, my)))
                .map(|b| b.command);
            if let Some(command) = clicked {
                self.run(command);
            }
        }

        if is_key_pressed(KeyCode::C) {
            self.copy_to_clipboard();
        }
    }

    fn run(&mut self, command: Command) {
        let feedback = self.session.apply(command);
        self.status = match feedback {
            Feedback::Done => self
                .session
                .history()
                .last()
                .map(|entry| entry.action.to_string())
                .unwrap_or_default(),
            Feedback::Refused(reason) => format!("Refused: {}", reason),
            Feedback::MissionAccomplished => {
                self.banner = Some(
                    "Mission accomplished! All fires are out and the robot is on the finish."
                        .to_string(),
                );
                "Mission accomplished.".to_string()
            }
            Feedback::AlreadyComplete => "Mission already complete!".to_string(),
            Feedback::NotComplete(status) => {
                if !status.on_finish {
                    format!(
                        "Not yet: the robot is at {}, not on the finish.",
                        self.session.position()
                    )
                } else {
                    format!(
                        "Not yet: {} fire and {} filled cells remain.",
                        status.remaining_fires, status.remaining_filled
                    )
                }
            }
            Feedback::MapReplaced => "Map replaced.".to_string(),
        };
    }

    fn refresh_info(&mut self) {
        let key = (
            self.session.generation(),
            self.session.grid().revision(),
            self.session.position(),
        );
        if self.info_key == Some(key) {
            return;
        }

        let cell = self.session.robot().current_cell();
        let finish = self
            .session
            .grid()
            .finish_position()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "none".to_string());
        self.info = format!("Robot {} on {} | finish {}", key.2, cell.cell_type, finish);
        self.info_key = Some(key);
    }

    fn copy_to_clipboard(&mut self) {
        let text = render_layout(self.session.grid(), Some(self.session.position()));
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&text) {
                    warn!(error = %e, "failed to copy to clipboard");
                } else {
                    self.status = "Map copied to clipboard.".to_string();
                    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => warn!(error = %e, "failed to access clipboard"),
        }
    }

    /// Top-left pixel of cell (x, y); row 0 is drawn at the bottom
    fn cell_origin(&self, pos: Position) -> (f32, f32) {
        let size = self.config.grid.cell_size;
        let margin = self.config.grid.margin;
        let rows = self.session.grid().height();
        (
            margin + pos.x as f32 * size,
            margin + (rows - 1 - pos.y) as f32 * size,
        )
    }

    fn draw(&self) {
        let visual = &self.config.visual;
        clear_background(Color::from_rgba(
            visual.background_r,
            visual.background_g,
            visual.background_b,
            255,
        ));

        self.draw_map();
        self.draw_panel();

        if let Some(banner) = &self.banner {
            let w = screen_width();
            draw_rectangle(0.0, screen_height() / 2.0 - 40.0, w, 80.0, Color::from_rgba(0, 120, 0, 230));
            draw_text(banner, 20.0, screen_height() / 2.0, 24.0, WHITE);
            draw_text("Click or press any key", 20.0, screen_height() / 2.0 + 26.0, 18.0, WHITE);
        }
    }

    fn draw_map(&self) {
        let size = self.config.grid.cell_size;
        let margin = self.config.grid.margin;
        let grid = self.session.grid();
        let robot = self.session.robot();

        for cell in grid.cells() {
            let (px, py) = self.cell_origin(cell.position);
            let (r, g, b) = cell.cell_type.color();
            draw_rectangle(px, py, size, size, Color::from_rgba(r, g, b, 255));
            draw_rectangle_lines(px, py, size, size, 1.0, BLACK);

            let text_color = if cell.cell_type.wants_light_text() { WHITE } else { BLACK };
            let label = cell.cell_type.label();
            let dims = measure_text(label, None, 14, 1.0);
            draw_text(label, px + (size - dims.width) / 2.0, py + size - 8.0, 14.0, text_color);
        }

        for x in 0..grid.width() {
            let label = format!("X={}", x);
            draw_text(&label, margin + x as f32 * size + size / 2.0 - 12.0, margin - 8.0, 16.0, BLACK);
        }
        for y in 0..grid.height() {
            let (_, py) = self.cell_origin(Position::new(0, y));
            draw_text(&format!("Y={}", y), 2.0, py + size / 2.0, 14.0, BLACK);
        }

        for cell in grid.cells().filter(|cell| robot.is_at(cell.position)) {
            let (px, py) = self.cell_origin(cell.position);
            let (cx, cy) = (px + size / 2.0, py + size / 2.0 - 6.0);
            draw_circle(cx, cy, 15.0, ROBOT_COLOR);
            draw_circle_lines(cx, cy, 15.0, 2.0, BLACK);
            draw_text("R", cx - 5.0, cy + 6.0, 20.0, WHITE);
        }
    }

    fn draw_panel(&self) {
        let (mx, my) = mouse_position();
        for button in &self.buttons {
            button.draw(button.rect.contains(vec2(mx, my)));
        }

        let left = Self::map_size(&self.config) + 10.0;
        let mut y = self.history_top() - 30.0;
        draw_text(&self.status, left, y, 16.0, BLACK);

        y += 24.0;
        draw_text(&self.info, left, y, 16.0, DARKGRAY);

        y += 24.0;
        draw_text("History", left, y, 20.0, BLACK);
        for entry in self.session.history().recent(self.config.visual.history_lines) {
            y += HISTORY_LINE_HEIGHT;
            draw_text(&entry.to_string(), left, y, 14.0, BLACK);
        }
    }

    fn save_history(&self) {
        let logging = &self.config.logging;
        if !logging.enable_action_log {
            return;
        }
        match self.session.history().save_to_file(&logging.action_log_path) {
            Ok(()) => info!(path = %logging.action_log_path, "saved action history"),
            Err(e) => warn!(error = %e, "failed to save action history"),
        }
    }
}

fn window_conf() -> Conf {
    let config = Config::load();
    let map = App::map_size(&config);
    let history = config.visual.history_lines as f32 * HISTORY_LINE_HEIGHT;
    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: (map + PANEL_WIDTH + 20.0) as i32,
        window_height: map.max(20.0 + 6.0 * (BUTTON_HEIGHT + 8.0) + 80.0 + history) as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = Config::load();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    let mut app = App::new(config);

    loop {
        app.handle_input();
        app.refresh_info();

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            app.save_history();
            app.session.history().print();
            break;
        }

        app.draw();

        next_frame().await
    }
}
