//! Interactive terminal UI for a running world.

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use terrarium_core::{Direction, Kind, Position, Species};
use terrarium_world::World;
use tracing::{error, warn};

const SAVE_PATH: &str = "save.json";

/// Enter the blocking event loop. Returns when the user quits.
pub fn run(world: World) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to build terminal backend")?;
    terminal.hide_cursor().ok();

    let result = event_loop(&mut terminal, App::new(world));

    terminal.show_cursor().ok();
    if let Err(err) = disable_raw_mode() {
        error!(?err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
        error!(?err, "failed to leave alternate screen");
    }

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;
        // The world only moves when the user presses a key, so a blocking
        // read is all the scheduling this loop needs.
        if let Event::Key(key) = event::read()? {
            if app.handle_key(key) {
                break;
            }
        }
    }
    Ok(())
}

struct App {
    world: World,
    /// One-line notice shown in the status panel (save/load feedback)
    notice: Option<String>,
}

impl App {
    fn new(world: World) -> Self {
        Self {
            world,
            notice: None,
        }
    }

    /// Returns true when the app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Up => self.steer(Direction::Up),
            KeyCode::Right => self.steer(Direction::Right),
            KeyCode::Down => self.steer(Direction::Down),
            KeyCode::Left => self.steer(Direction::Left),
            KeyCode::Char(' ') | KeyCode::Char('n') => self.advance(),
            KeyCode::Char('i') => {
                self.world.arm_immortality();
                self.notice = Some("Immortality armed".to_string());
            }
            KeyCode::Char('p') => {
                self.world.populate();
                self.notice = Some("World repopulated".to_string());
            }
            KeyCode::Char('s') => match self.world.save_to(SAVE_PATH) {
                Ok(()) => self.notice = Some(format!("Saved to {SAVE_PATH}")),
                Err(err) => {
                    warn!(%err, "save failed");
                    self.notice = Some(format!("Save failed: {err}"));
                }
            },
            KeyCode::Char('l') => match World::load_from(SAVE_PATH) {
                Ok(world) => {
                    self.world = world;
                    self.notice = Some(format!("Loaded {SAVE_PATH}"));
                }
                Err(err) => {
                    warn!(%err, "load failed");
                    self.notice = Some(format!("Load failed: {err}"));
                }
            },
            _ => {}
        }
        false
    }

    fn steer(&mut self, direction: Direction) {
        self.world.set_human_course(direction);
        self.advance();
    }

    fn advance(&mut self) {
        self.notice = None;
        self.world.simulate();
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let body = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(frame.area());

        self.draw_map(frame, body[0]);

        let sidebar = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(8),
                Constraint::Length(4),
                Constraint::Min(3),
            ])
            .split(body[1]);

        self.draw_status(frame, sidebar[0]);
        self.draw_ability(frame, sidebar[1]);
        self.draw_log(frame, sidebar[2]);
    }

    fn draw_map(&self, frame: &mut Frame<'_>, area: Rect) {
        let grid = self.world.grid();
        let mut lines = Vec::with_capacity(grid.height as usize);
        for y in 0..grid.height {
            let mut spans = Vec::with_capacity(grid.width as usize);
            for x in 0..grid.width {
                let pos = Position::new(x, y);
                let symbol = self.world.tile_symbol(pos);
                let style = grid
                    .get(pos)
                    .top()
                    .and_then(|id| self.world.organism(id))
                    .map(|o| species_style(o.species))
                    .unwrap_or_else(|| Style::default().fg(Color::DarkGray));
                spans.push(Span::styled(format!("{symbol} "), style));
            }
            lines.push(Line::from(spans));
        }

        let title = format!("World {}x{}", grid.width, grid.height);
        let paragraph = Paragraph::new(lines)
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn draw_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let census = self.world.census();
        let stats = self.world.stats();
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Turn ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("{:>5}", self.world.turn())),
                Span::raw("   "),
                Span::styled("Alive ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("{:>3}", census.total())),
            ]),
            Line::from(Span::raw(format!(
                "Animals {:>3}   Plants {:>3}",
                census.animals(),
                census.plants()
            ))),
            Line::from(Span::raw(format!(
                "Births {:>4}   Deaths {:>4}   Peak {:>3}",
                stats.total_births, stats.total_deaths, stats.peak_population
            ))),
            Line::from(Span::raw(
                "arrows steer  space step  i immortality",
            )),
            Line::from(Span::raw("s save  l load  p repopulate  q quit")),
        ];
        if let Some(notice) = &self.notice {
            lines.push(Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Yellow),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Status").borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn draw_ability(&self, frame: &mut Frame<'_>, area: Rect) {
        let status = match self.world.human() {
            Some(human) => human
                .ability
                .as_ref()
                .map(|a| a.status())
                .unwrap_or_else(|| "None".to_string()),
            None => "The Human is dead".to_string(),
        };
        let paragraph = Paragraph::new(Line::from(Span::raw(status)))
            .block(Block::default().title("Immortality").borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn draw_log(&self, frame: &mut Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .world
            .logs()
            .iter()
            .map(|entry| ListItem::new(Span::raw(entry.clone())))
            .collect();
        let title = format!("Events (turn {})", self.world.turn());
        frame.render_widget(
            List::new(items).block(Block::default().title(title).borders(Borders::ALL)),
            area,
        );
    }
}

fn species_style(species: Species) -> Style {
    let color = match species {
        Species::Human => Color::Yellow,
        Species::Wolf => Color::Red,
        Species::Fox => Color::LightRed,
        Species::Sheep => Color::White,
        Species::Turtle => Color::Cyan,
        Species::Antelope => Color::LightMagenta,
        Species::Grass => Color::Green,
        Species::Milkweed => Color::LightGreen,
        Species::Guarana => Color::LightYellow,
        Species::WolfBerries => Color::Blue,
        Species::SosnowskyHogweed => Color::LightBlue,
    };
    let style = Style::default().fg(color);
    if species.kind() == Kind::Animal {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use terrarium_core::WorldConfig;

    fn test_app() -> App {
        let mut world = World::from_config(WorldConfig {
            seed: 17,
            ..Default::default()
        });
        world.populate();
        App::new(world)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_draw_smoke() {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = test_app();

        terminal.draw(|frame| app.draw(frame)).unwrap();
        app.advance();
        terminal.draw(|frame| app.draw(frame)).unwrap();
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        assert!(app.handle_key(press(KeyCode::Char('q'))));
        assert!(app.handle_key(press(KeyCode::Esc)));
        assert!(app.handle_key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!app.handle_key(press(KeyCode::Char(' '))));
    }

    #[test]
    fn test_step_advances_turn() {
        let mut app = test_app();
        let before = app.world.turn();
        app.handle_key(press(KeyCode::Char(' ')));
        assert_eq!(app.world.turn(), before + 1);
    }

    #[test]
    fn test_arrow_steers_human() {
        let mut app = test_app();
        let start = app.world.human().map(|h| h.position);
        app.handle_key(press(KeyCode::Up));
        // The turn ran; if the human survived and the move was legal it
        // stepped up by one.
        if let (Some(start), Some(human)) = (start, app.world.human()) {
            assert!(human.position.manhattan_distance(&start) <= 1);
        }
    }

    #[test]
    fn test_repopulate_resets_turn() {
        let mut app = test_app();
        app.handle_key(press(KeyCode::Char(' ')));
        app.handle_key(press(KeyCode::Char('p')));
        assert_eq!(app.world.turn(), 0);
        assert!(app.world.human().is_some());
    }
}
