use std::io::{self, Stdout, Write};

use anyhow::Context;
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

use mazewalk::config::{Cli, DEFAULT_WORLD, GRID_H, GRID_W};
use mazewalk::{CellState, Direction, GameState, MoveResult, Pos, WorldStore};

const CELL_W: usize = 2;
const MAX_LINE: usize = 32;
const MENU_ITEMS: usize = 2;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Agent,
    Wall,
    Open,
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_footer: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Open,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            last_footer: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Generate,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEdit {
    Pending,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Exit,
    Quit,
    New { seed: u64, world: Option<String> },
    Seed,
    Worlds,
}

pub fn run(stdout: &mut Stdout, cli: &Cli) -> anyhow::Result<()> {
    let mut game = GameState::new();
    let key = cli.world.as_str();

    match cli.seed {
        Some(seed) => {
            game.generate_world(key, GRID_W, GRID_H, seed)?;
        }
        None => {
            let Some(seed) = choose_seed(stdout)? else {
                return Ok(());
            };
            game.generate_world(key, GRID_W, GRID_H, seed)?;
            show_lines(
                stdout,
                &["World generated successfully! Press any key to continue..."],
            )?;
            read_key()?;
        }
    }

    game_loop(stdout, &mut game)
}

fn choose_seed(stdout: &mut Stdout) -> anyhow::Result<Option<u64>> {
    loop {
        if main_menu(stdout)? == MenuChoice::Quit {
            return Ok(None);
        }
        if let Some(seed) = prompt_seed(stdout)? {
            return Ok(Some(seed));
        }
    }
}

fn main_menu(stdout: &mut Stdout) -> anyhow::Result<MenuChoice> {
    show_lines(
        stdout,
        &[
            "Welcome to mazewalk!",
            "1. Generate new",
            "2. Quit",
            "Use arrow keys to choose an option, press Enter to confirm.",
        ],
    )?;

    let mut choice = 0;
    loop {
        for item in 0..MENU_ITEMS {
            stdout.queue(MoveTo(20, 1 + item as u16))?;
            stdout.queue(Print(if item == choice { "<--" } else { "   " }))?;
        }
        stdout.flush()?;

        let key = read_key()?;
        if is_interrupt(&key) {
            return Ok(MenuChoice::Quit);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('w') => choice = (choice + MENU_ITEMS - 1) % MENU_ITEMS,
            KeyCode::Down | KeyCode::Char('s') => choice = (choice + 1) % MENU_ITEMS,
            KeyCode::Enter => {
                return Ok(if choice == 0 {
                    MenuChoice::Generate
                } else {
                    MenuChoice::Quit
                });
            }
            KeyCode::Esc | KeyCode::Char('q') => return Ok(MenuChoice::Quit),
            _ => {}
        }
    }
}

/// Ask for a seed until one parses. `None` when the player backs out.
fn prompt_seed(stdout: &mut Stdout) -> anyhow::Result<Option<u64>> {
    let mut buf = String::new();
    let mut error: Option<String> = None;
    loop {
        let prompt = format!("Enter a seed for the world generation: {buf}");
        match &error {
            Some(err) => show_lines(stdout, &[prompt.as_str(), "", err.as_str()])?,
            None => show_lines(stdout, &[prompt.as_str()])?,
        }

        let key = read_key()?;
        if is_interrupt(&key) {
            return Ok(None);
        }
        match edit_line(&mut buf, key.code) {
            LineEdit::Pending => {}
            LineEdit::Cancel => return Ok(None),
            LineEdit::Submit => match parse_seed(&buf) {
                Some(seed) => return Ok(Some(seed)),
                None => {
                    warn!(input = %buf, "rejected seed");
                    error = Some(format!("{:?} is not a whole number, try again.", buf.trim()));
                    buf.clear();
                }
            },
        }
    }
}

fn game_loop(stdout: &mut Stdout, game: &mut GameState) -> anyhow::Result<()> {
    let grid = game.active_grid()?;
    let mut renderer = Renderer::new(grid.width(), grid.height());
    let mut input: Option<String> = None;
    let mut message = String::new();

    loop {
        render(stdout, game, &mut renderer, &message, input.as_deref())?;
        let event = read_key()?;
        if is_interrupt(&event) {
            return Ok(());
        }

        match input.as_mut() {
            Some(buf) => match edit_line(buf, event.code) {
                LineEdit::Pending => {}
                LineEdit::Cancel => input = None,
                LineEdit::Submit => {
                    let line = std::mem::take(buf);
                    debug!(command = %line, "command entered");
                    // Anything but an error drops back to the map so its
                    // effect is visible.
                    match parse_command(&line) {
                        Ok(Command::Exit) => input = None,
                        Ok(Command::Quit) => return Ok(()),
                        Ok(Command::New { seed, world }) => {
                            let key = match world {
                                Some(world) => world,
                                None => game.active_world().unwrap_or(DEFAULT_WORLD).to_string(),
                            };
                            let replaced = game.worlds().contains(&key);
                            game.generate_world(&key, GRID_W, GRID_H, seed)?;
                            renderer.needs_full = true;
                            input = None;
                            message = if replaced {
                                format!("Replaced {key}, seed {seed}.")
                            } else {
                                format!("Generated {key}, seed {seed}.")
                            };
                        }
                        Ok(Command::Seed) => {
                            input = None;
                            message = match game.active_world() {
                                Some(key) => match game.seed_of(key) {
                                    Some(seed) => format!("{key}: seed {seed}."),
                                    None => format!("{key} has no seed."),
                                },
                                None => "No active world.".to_string(),
                            };
                        }
                        Ok(Command::Worlds) => {
                            input = None;
                            message = describe_worlds(game.worlds(), game.active_world());
                        }
                        Err(err) => message = err,
                    }
                }
            },
            None => match event.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('t') => {
                    message.clear();
                    input = Some(String::new());
                }
                code => {
                    if let Some(dir) = direction_for(code) {
                        if game.move_agent(dir)? == MoveResult::Moved {
                            message.clear();
                        }
                    }
                }
            },
        }
    }
}

fn render(
    stdout: &mut Stdout,
    game: &GameState,
    renderer: &mut Renderer,
    message: &str,
    input: Option<&str>,
) -> anyhow::Result<()> {
    let grid = game.active_grid()?;
    let agent = game.agent_position();
    let hud = match agent {
        Some(pos) => format!(
            "{} at ({}, {})  q: quit",
            game.active_world().unwrap_or("-"),
            pos.x,
            pos.y
        ),
        None => "No active world".to_string(),
    };
    let footer = match input {
        Some(buf) if !message.is_empty() => format!("{message} > {buf}"),
        Some(buf) => format!("Command (exit to leave): {buf}"),
        None if !message.is_empty() => message.to_string(),
        None => "WASD/arrows move, t: command".to_string(),
    };
    let needed_h = (grid.height() + 3) as u16;
    let needed_w = needed_width(grid.width(), &[hud.as_str(), footer.as_str()]);

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size().context("reading terminal size")?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let pos = Pos { x, y };
            let cell = if agent == Some(pos) {
                Cell {
                    glyph: Glyph::Agent,
                    color: Color::Yellow,
                }
            } else {
                cell_for(grid.cell_at(x as isize, y as isize)?)
            };
            let idx = y * grid.width() + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }

    if renderer.needs_full || footer != renderer.last_footer {
        stdout.queue(MoveTo(
            renderer.origin_x,
            renderer.origin_y + grid.height() as u16,
        ))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&footer))?;
        renderer.last_footer = footer;
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

/// Columns needed for the grid and every status line drawn beside it.
fn needed_width(grid_width: usize, lines: &[&str]) -> u16 {
    let widest = lines
        .iter()
        .map(|line| UnicodeWidthStr::width(*line))
        .fold(grid_width * CELL_W, usize::max);
    widest.min(u16::MAX as usize) as u16
}

fn describe_worlds(store: &WorldStore, active: Option<&str>) -> String {
    if store.is_empty() {
        return "No worlds yet.".to_string();
    }
    let mut keys: Vec<&str> = store.keys().collect();
    keys.sort_unstable();
    let listed: Vec<String> = keys
        .into_iter()
        .map(|key| {
            if Some(key) == active {
                format!("*{key}")
            } else {
                key.to_string()
            }
        })
        .collect();
    format!("{} world(s): {}", store.len(), listed.join(" "))
}

fn cell_for(state: CellState) -> Cell {
    match state {
        CellState::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        CellState::Open => Cell {
            glyph: Glyph::Open,
            color: Color::Reset,
        },
    }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Agent => "P",
        Glyph::Wall => "██",
        Glyph::Open => "  ",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

/// Clear the screen and print one line per row from the top-left corner.
fn show_lines(stdout: &mut Stdout, lines: &[&str]) -> io::Result<()> {
    stdout.queue(Clear(ClearType::All))?;
    for (row, line) in lines.iter().enumerate() {
        stdout.queue(MoveTo(0, row as u16))?;
        stdout.queue(Print(line))?;
    }
    stdout.flush()
}

/// Block until a key is pressed (or held down).
fn read_key() -> io::Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => return Ok(key),
                _ => {}
            }
        }
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Up => Some(Direction::Up),
        KeyCode::Char('s') | KeyCode::Down => Some(Direction::Down),
        KeyCode::Char('a') | KeyCode::Left => Some(Direction::Left),
        KeyCode::Char('d') | KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

fn edit_line(buf: &mut String, code: KeyCode) -> LineEdit {
    match code {
        KeyCode::Enter => LineEdit::Submit,
        KeyCode::Esc => LineEdit::Cancel,
        KeyCode::Backspace => {
            buf.pop();
            LineEdit::Pending
        }
        KeyCode::Char(c) if !c.is_control() && buf.chars().count() < MAX_LINE => {
            buf.push(c);
            LineEdit::Pending
        }
        _ => LineEdit::Pending,
    }
}

fn parse_seed(text: &str) -> Option<u64> {
    text.trim().parse().ok()
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let command = match (words.next(), words.next()) {
        (Some("exit"), None) => Command::Exit,
        (Some("quit"), None) => Command::Quit,
        (Some("seed"), None) => Command::Seed,
        (Some("worlds"), None) => Command::Worlds,
        (Some("new"), Some(seed)) => match parse_seed(seed) {
            Some(seed) => Command::New {
                seed,
                world: words.next().map(str::to_string),
            },
            None => return Err(format!("Not a seed: {seed:?}")),
        },
        (Some("new"), None) => return Err("Usage: new <seed> [world]".to_string()),
        (None, _) => return Err("exit, quit, seed, worlds, new".to_string()),
        (Some(other), _) => return Err(format!("Unknown command: {other:?}")),
    };
    if words.next().is_some() {
        return Err(format!("Too many arguments: {line:?}"));
    }
    info!(?command, "command accepted");
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_map_to_directions() {
        assert_eq!(direction_for(KeyCode::Char('w')), Some(Direction::Up));
        assert_eq!(direction_for(KeyCode::Char('a')), Some(Direction::Left));
        assert_eq!(direction_for(KeyCode::Char('s')), Some(Direction::Down));
        assert_eq!(direction_for(KeyCode::Char('d')), Some(Direction::Right));
        assert_eq!(direction_for(KeyCode::Up), Some(Direction::Up));
        assert_eq!(direction_for(KeyCode::Right), Some(Direction::Right));
        assert_eq!(direction_for(KeyCode::Char('t')), None);
    }

    #[test]
    fn line_editing() {
        let mut buf = String::new();
        assert_eq!(edit_line(&mut buf, KeyCode::Char('4')), LineEdit::Pending);
        assert_eq!(edit_line(&mut buf, KeyCode::Char('2')), LineEdit::Pending);
        assert_eq!(edit_line(&mut buf, KeyCode::Char('x')), LineEdit::Pending);
        assert_eq!(edit_line(&mut buf, KeyCode::Backspace), LineEdit::Pending);
        assert_eq!(buf, "42");
        assert_eq!(edit_line(&mut buf, KeyCode::Enter), LineEdit::Submit);
        assert_eq!(edit_line(&mut buf, KeyCode::Esc), LineEdit::Cancel);
    }

    #[test]
    fn line_is_capped() {
        let mut buf = String::new();
        for _ in 0..MAX_LINE + 5 {
            edit_line(&mut buf, KeyCode::Char('9'));
        }
        assert_eq!(buf.len(), MAX_LINE);
    }

    #[test]
    fn seeds_must_be_whole_numbers() {
        assert_eq!(parse_seed(" 42 "), Some(42));
        assert_eq!(parse_seed("18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_seed("abc"), None);
        assert_eq!(parse_seed("-1"), None);
        assert_eq!(parse_seed(""), None);
    }

    #[test]
    fn commands() {
        assert_eq!(parse_command("exit"), Ok(Command::Exit));
        assert_eq!(parse_command(" quit "), Ok(Command::Quit));
        assert_eq!(parse_command("seed"), Ok(Command::Seed));
        assert_eq!(parse_command("worlds"), Ok(Command::Worlds));
        assert_eq!(
            parse_command("new 7"),
            Ok(Command::New {
                seed: 7,
                world: None
            })
        );
        assert_eq!(
            parse_command("new 7 1_0"),
            Ok(Command::New {
                seed: 7,
                world: Some("1_0".to_string())
            })
        );
        assert!(parse_command("new").is_err());
        assert!(parse_command("new seven").is_err());
        assert!(parse_command("new 7 1_0 extra").is_err());
        assert!(parse_command("dance").is_err());
        assert!(parse_command("").is_err());
    }

    #[test]
    fn cells_have_distinct_glyphs() {
        assert!(cell_for(CellState::Wall) != cell_for(CellState::Open));
    }

    #[test]
    fn width_covers_grid_and_status_lines() {
        assert_eq!(needed_width(15, &[]), 30);
        assert_eq!(needed_width(15, &["short"]), 30);
        let long = "x".repeat(44);
        assert_eq!(needed_width(15, &["short", long.as_str()]), 44);
        // Wide glyphs count double.
        assert_eq!(needed_width(0, &["██"]), 2);
    }

    #[test]
    fn default_status_lines_fit_the_grid() {
        let idle = "WASD/arrows move, t: command";
        let hud = format!("{DEFAULT_WORLD} at (13, 13)  q: quit");
        assert_eq!(needed_width(GRID_W, &[idle, hud.as_str()]), (GRID_W * CELL_W) as u16);
    }

    #[test]
    fn world_listing() {
        let mut game = GameState::new();
        assert_eq!(describe_worlds(game.worlds(), None), "No worlds yet.");
        game.generate_world("1_0", GRID_W, GRID_H, 1).unwrap();
        game.generate_world("0_0", GRID_W, GRID_H, 2).unwrap();
        assert_eq!(
            describe_worlds(game.worlds(), game.active_world()),
            "2 world(s): *0_0 1_0"
        );
    }
}
