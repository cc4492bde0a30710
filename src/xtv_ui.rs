use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use rand::thread_rng;
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};
use tracing::warn;
use unicode_width::UnicodeWidthStr;

use crate::xtv_color::WTMatch;
use crate::xtv_files::save_high_score;
use crate::xtv_game::{Outcome, Session};
use crate::xtv_quiz::{CATEGORY_COUNT, Catalog, Category, TIER_COUNT, Tier};
use crate::xtv_score::HighScore;

// board geometry: six 17-column cells plus the surrounding border
const CELL_W: usize = 17;
const MIN_TWIDTH: u16 = (CATEGORY_COUNT * CELL_W) as u16 + 4;
const MIN_THEIGHT: u16 = 22;

/// Which full-screen view the UI is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    NameEntry,
    Board,
    Question,
    Notice,
    GameOver,
}

// Group runtime UI variables into a single structure to simplify passing them around
#[derive(Debug)]
struct UiState {
    name_input: String,
    cursor: (usize, usize), // (column, row) over the board cells
    choice_cursor: usize,
    last_outcome: Option<Outcome>,
    timed_out: bool,
    showing_rules: bool,
    showing_about: bool,
    new_record: bool,
    save_failed: bool,
    // wall clock of the last countdown decrement
    last_second: Instant,
}

impl UiState {
    fn new() -> Self {
        UiState {
            name_input: String::new(),
            cursor: (0, 0),
            choice_cursor: 0,
            last_outcome: None,
            timed_out: false,
            showing_rules: false,
            showing_about: false,
            new_record: false,
            save_failed: false,
            last_second: Instant::now(),
        }
    }

    fn reset_for_new_game(&mut self) {
        self.name_input.clear();
        self.cursor = (0, 0);
        self.choice_cursor = 0;
        self.last_outcome = None;
        self.timed_out = false;
        self.showing_rules = false;
        self.showing_about = false;
        self.new_record = false;
        self.save_failed = false;
        self.last_second = Instant::now();
    }
}

/// Campbell-matched colors, resolved once per run
struct Palette {
    board_bg: Color,
    board_fg: Color,
    cursor_bg: Color,
    cursor_fg: Color,
    menu_key_fg: Color,
    timer_warn_fg: Color,
    timer_warn_bg: Color,
    negative_fg: Color,
    record_fg: Color,
    dim_fg: Color,
}

impl Palette {
    fn new() -> Self {
        Palette {
            board_bg: Color::Blue.wtmatch(),
            board_fg: Color::White.wtmatch(),
            cursor_bg: Color::LightYellow.wtmatch(),
            cursor_fg: Color::Black.wtmatch(),
            menu_key_fg: Color::Yellow.wtmatch(),
            timer_warn_fg: Color::Red.wtmatch(),
            timer_warn_bg: Color::White.wtmatch(),
            negative_fg: Color::Red.wtmatch(),
            record_fg: Color::Green.wtmatch(),
            dim_fg: Color::DarkGray.wtmatch(),
        }
    }
}

pub fn run(catalog: &Catalog, high: &mut HighScore) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, catalog, high);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    catalog: &Catalog,
    high: &mut HighScore,
) -> Result<(), Box<dyn Error>> {
    let mut ui = UiState::new();
    let mut screen = Screen::NameEntry;
    let mut session: Option<Session> = None;
    let mut rng = thread_rng();
    let pal = Palette::new();

    // Centralized menu/key items (key, rest)
    let menu_items = [("F1", "Rules"), ("F2", "New"), ("F9", "About"), ("Esc", "Exit")];

    let tick_rate = Duration::from_millis(200);

    loop {
        // advance the countdown once per elapsed second while a question is live
        if screen == Screen::Question {
            if let Some(s) = session.as_mut() {
                if ui.last_second.elapsed() >= Duration::from_secs(1) {
                    ui.last_second += Duration::from_secs(1);
                    if s.tick() == Some(0) {
                        if let Ok(outcome) = s.time_out() {
                            ui.last_outcome = Some(outcome);
                            ui.timed_out = true;
                            screen = Screen::Notice;
                        }
                    }
                }
            }
        }

        terminal.draw(|f| {
            let size = f.size();
            // If terminal too small, render a centered warning and skip normal UI
            if size.width < MIN_TWIDTH || size.height < MIN_THEIGHT {
                let warn_lines = vec![
                    Spans::from(Span::raw("Terminal size too small.")),
                    Spans::from(Span::raw(format!("Minimum required: {} x {}", MIN_TWIDTH, MIN_THEIGHT))),
                ];
                let warning = Paragraph::new(Text::from(warn_lines))
                    .block(Block::default().borders(Borders::ALL).title("Resize Terminal"))
                    .alignment(Alignment::Center);
                f.render_widget(Clear, size);
                let w = 40u16.min(size.width.saturating_sub(2));
                let h = 5u16.min(size.height.saturating_sub(2));
                f.render_widget(warning, center_rect(w, h, size));
                return;
            }

            // layout: top menu row, center content, bottom status
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(0)
                .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(3)].as_ref())
                .split(size);

            // menu row
            let mut spans_vec: Vec<Span> = vec![Span::raw(" ")];
            for (i, (key, rest)) in menu_items.iter().enumerate() {
                if i > 0 {
                    spans_vec.push(Span::raw("   "));
                }
                spans_vec.push(Span::styled(
                    key.to_string(),
                    Style::default().fg(pal.menu_key_fg).add_modifier(Modifier::BOLD),
                ));
                spans_vec.push(Span::raw(format!(": {}", rest)));
            }
            let menu = Paragraph::new(Spans::from(spans_vec)).block(Block::default().borders(Borders::ALL));
            f.render_widget(menu, chunks[0]);

            // status row: player and score on the left, standing record on the right
            let mut status_spans: Vec<Span> = Vec::new();
            if let Some(s) = session.as_ref() {
                status_spans.push(Span::raw(format!(" Player: {}   ", s.player())));
                let score_style = if s.score() < 0 {
                    Style::default().fg(pal.negative_fg).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                status_spans.push(Span::styled(format!("Score: ${}", s.score()), score_style));
            } else {
                status_spans.push(Span::raw(" Trivia Board "));
            }
            let right_text = if high.name.is_empty() {
                format!("Best: ${} ", high.score)
            } else {
                format!("Best: {} ${} ", high.name, high.score)
            };
            let inner_w = chunks[2].width.saturating_sub(2) as usize;
            let left_w: usize = status_spans.iter().map(|sp| sp.content.as_ref().width()).sum();
            let right_w = right_text.as_str().width();
            let mid = if inner_w > left_w + right_w { inner_w - left_w - right_w } else { 1 };
            status_spans.push(Span::raw(" ".repeat(mid)));
            status_spans.push(Span::raw(right_text));
            let status =
                Paragraph::new(Spans::from(status_spans)).block(Block::default().borders(Borders::ALL));
            f.render_widget(status, chunks[2]);

            match screen {
                Screen::NameEntry => {
                    let area = center_rect(46, 8, chunks[1]);
                    f.render_widget(Clear, area);
                    f.render_widget(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(" New Game ")
                            .title_alignment(Alignment::Center),
                        area,
                    );
                    let inner = Rect::new(
                        area.x + 2,
                        area.y + 1,
                        area.width.saturating_sub(4),
                        area.height.saturating_sub(2),
                    );
                    let lines = vec![
                        Spans::from(Span::raw("")),
                        Spans::from(Span::raw("Please enter your name:")),
                        Spans::from(Span::raw("")),
                        Spans::from(Span::styled(
                            format!(" {}_ ", ui.name_input),
                            Style::default().bg(pal.cursor_bg).fg(pal.cursor_fg),
                        )),
                        Spans::from(Span::raw("")),
                        Spans::from(Span::styled(
                            "Enter: Start   Esc: Exit",
                            Style::default().fg(pal.dim_fg),
                        )),
                    ];
                    f.render_widget(Paragraph::new(Text::from(lines)).alignment(Alignment::Center), inner);
                }
                Screen::Board | Screen::Notice => {
                    if let Some(s) = session.as_ref() {
                        draw_board(f, chunks[1], s, ui.cursor, &pal);
                    }
                    if screen == Screen::Notice {
                        if let Some(outcome) = ui.last_outcome {
                            let title = if ui.timed_out {
                                " Ran Out of Time! "
                            } else if outcome.correct {
                                " Correct! "
                            } else {
                                " Incorrect! "
                            };
                            let delta_text = if outcome.delta >= 0 {
                                format!("+${}", outcome.delta)
                            } else {
                                format!("-${}", -outcome.delta)
                            };
                            let area = center_rect(40, 7, chunks[1]);
                            f.render_widget(Clear, area);
                            f.render_widget(
                                Block::default()
                                    .borders(Borders::ALL)
                                    .title(title)
                                    .title_alignment(Alignment::Center),
                                area,
                            );
                            let inner = Rect::new(
                                area.x + 1,
                                area.y + 1,
                                area.width.saturating_sub(2),
                                area.height.saturating_sub(2),
                            );
                            let delta_style = if outcome.delta >= 0 {
                                Style::default().fg(pal.record_fg).add_modifier(Modifier::BOLD)
                            } else {
                                Style::default().fg(pal.negative_fg).add_modifier(Modifier::BOLD)
                            };
                            let lines = vec![
                                Spans::from(Span::raw("")),
                                Spans::from(Span::styled(delta_text, delta_style)),
                                Spans::from(Span::raw("")),
                                Spans::from(Span::styled("press any key", Style::default().fg(pal.dim_fg))),
                            ];
                            f.render_widget(
                                Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
                                inner,
                            );
                        }
                    }
                }
                Screen::Question => {
                    if let Some(q) = session.as_ref().and_then(|s| s.question()) {
                        let qchunks = Layout::default()
                            .direction(Direction::Vertical)
                            .constraints(
                                [
                                    Constraint::Length(3),
                                    Constraint::Min(5),
                                    Constraint::Length(q.choices.len() as u16 + 2),
                                ]
                                .as_ref(),
                            )
                            .split(chunks[1]);

                        // countdown, flashing red over the last 15 seconds
                        let timer_style = if q.time_left <= 15 {
                            if q.time_left % 2 == 0 {
                                Style::default()
                                    .bg(pal.timer_warn_bg)
                                    .fg(pal.timer_warn_fg)
                                    .add_modifier(Modifier::BOLD)
                            } else {
                                Style::default().fg(pal.timer_warn_fg).add_modifier(Modifier::BOLD)
                            }
                        } else {
                            Style::default().add_modifier(Modifier::BOLD)
                        };
                        let timer = Paragraph::new(Spans::from(Span::styled(
                            format!(" {} ", q.time_left),
                            timer_style,
                        )))
                        .block(
                            Block::default()
                                .borders(Borders::ALL)
                                .title(format!(" {} ${} ", q.category, q.tier.value())),
                        )
                        .alignment(Alignment::Center);
                        f.render_widget(timer, qchunks[0]);

                        let prompt = Paragraph::new(Text::from(q.prompt.clone()))
                            .style(
                                Style::default()
                                    .bg(pal.board_bg)
                                    .fg(pal.board_fg)
                                    .add_modifier(Modifier::BOLD),
                            )
                            .block(Block::default().borders(Borders::ALL))
                            .alignment(Alignment::Center)
                            .wrap(Wrap { trim: true });
                        f.render_widget(prompt, qchunks[1]);

                        let mut lines = vec![];
                        for (i, choice) in q.choices.iter().enumerate() {
                            let style = if i == ui.choice_cursor {
                                Style::default().bg(pal.cursor_bg).fg(pal.cursor_fg)
                            } else {
                                Style::default()
                            };
                            lines.push(Spans::from(Span::styled(format!(" {}. {} ", i + 1, choice), style)));
                        }
                        f.render_widget(
                            Paragraph::new(Text::from(lines))
                                .block(Block::default().borders(Borders::ALL).title(" Answers ")),
                            qchunks[2],
                        );
                    }
                }
                Screen::GameOver => {
                    if let Some(s) = session.as_ref() {
                        let mut lines = vec![
                            Spans::from(Span::raw("")),
                            Spans::from(Span::styled(
                                "Game Over! Thank you for playing",
                                Style::default().add_modifier(Modifier::BOLD),
                            )),
                            Spans::from(Span::raw("")),
                            Spans::from(Span::raw(format!("{}'s final score: ${}", s.player(), s.score()))),
                            Spans::from(Span::raw("")),
                        ];
                        if ui.new_record {
                            lines.push(Spans::from(Span::styled(
                                "NEW HIGH SCORE!",
                                Style::default().fg(pal.record_fg).add_modifier(Modifier::BOLD),
                            )));
                            lines.push(Spans::from(Span::raw(format!("{} ${}", high.name, high.score))));
                            if ui.save_failed {
                                lines.push(Spans::from(Span::styled(
                                    "(the new record could not be saved)",
                                    Style::default().fg(pal.dim_fg),
                                )));
                            }
                        } else {
                            lines.push(Spans::from(Span::raw(if high.name.is_empty() {
                                format!("Best: ${}", high.score)
                            } else {
                                format!("Best: {} ${}", high.name, high.score)
                            })));
                        }
                        lines.push(Spans::from(Span::raw("")));
                        lines.push(Spans::from(Span::styled(
                            "F2: New Game   Esc: Exit",
                            Style::default().fg(pal.dim_fg),
                        )));
                        let area = center_rect(60, lines.len() as u16 + 2, chunks[1]);
                        f.render_widget(Clear, area);
                        f.render_widget(
                            Paragraph::new(Text::from(lines))
                                .block(Block::default().borders(Borders::ALL))
                                .alignment(Alignment::Center),
                            area,
                        );
                    }
                }
            }

            // modals
            if ui.showing_rules {
                let area = center_rect(66, 12, chunks[1]);
                f.render_widget(Clear, area);
                f.render_widget(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Rules ")
                        .title_alignment(Alignment::Center),
                    area,
                );
                let inner = Rect::new(
                    area.x + 2,
                    area.y + 1,
                    area.width.saturating_sub(4),
                    area.height.saturating_sub(2),
                );
                let lines = vec![
                    Spans::from(Span::raw("1. Enter your name.")),
                    Spans::from(Span::raw("2. Pick a category and point value from the board.")),
                    Spans::from(Span::raw("3. Answer the question before the 30-second timer runs out.")),
                    Spans::from(Span::raw("4. A right answer adds the cell's value; a wrong answer")),
                    Spans::from(Span::raw("   or a timeout takes it away.")),
                    Spans::from(Span::raw("5. Keep going until every cell has been played.")),
                    Spans::from(Span::raw("6. Beat the stored high score to take the record!")),
                    Spans::from(Span::raw("")),
                    Spans::from(Span::styled("press any key to close", Style::default().fg(pal.dim_fg))),
                ];
                f.render_widget(Paragraph::new(Text::from(lines)), inner);
            }
            if ui.showing_about {
                let area = center_rect(48, 7, chunks[1]);
                f.render_widget(Clear, area);
                f.render_widget(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" About ")
                        .title_alignment(Alignment::Center),
                    area,
                );
                let inner = Rect::new(
                    area.x + 1,
                    area.y + 1,
                    area.width.saturating_sub(2),
                    area.height.saturating_sub(2),
                );
                let lines = vec![
                    Spans::from(Span::raw("")),
                    Spans::from(Span::raw("A terminal-based trivia quiz board game")),
                    Spans::from(Span::raw(format!("v{} by XHBL", env!("CARGO_PKG_VERSION")))),
                    Spans::from(Span::raw("")),
                ];
                f.render_widget(Paragraph::new(Text::from(lines)).alignment(Alignment::Center), inner);
            }
        })?;

        if event::poll(tick_rate)? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                if kind == KeyEventKind::Press {
                    if ui.showing_rules || ui.showing_about {
                        // any key closes the open modal
                        ui.showing_rules = false;
                        ui.showing_about = false;
                    } else {
                        match screen {
                            Screen::NameEntry => match code {
                                KeyCode::Esc => break,
                                KeyCode::Enter => {
                                    let name = ui.name_input.trim().to_string();
                                    // an empty name keeps the prompt open
                                    if !name.is_empty() {
                                        session = Some(Session::new(name));
                                        screen = Screen::Board;
                                    }
                                }
                                KeyCode::Backspace => {
                                    ui.name_input.pop();
                                }
                                KeyCode::Char(c) if !c.is_control() && ui.name_input.len() < 24 => {
                                    ui.name_input.push(c);
                                }
                                _ => {}
                            },
                            Screen::Board => match code {
                                KeyCode::Esc => break,
                                KeyCode::F(1) => ui.showing_rules = true,
                                KeyCode::F(9) => ui.showing_about = true,
                                KeyCode::F(2) => {
                                    session = None;
                                    ui.reset_for_new_game();
                                    screen = Screen::NameEntry;
                                }
                                KeyCode::Left => ui.cursor.0 = ui.cursor.0.saturating_sub(1),
                                KeyCode::Right => ui.cursor.0 = (ui.cursor.0 + 1).min(CATEGORY_COUNT - 1),
                                KeyCode::Up => ui.cursor.1 = ui.cursor.1.saturating_sub(1),
                                KeyCode::Down => ui.cursor.1 = (ui.cursor.1 + 1).min(TIER_COUNT - 1),
                                KeyCode::Enter | KeyCode::Char(' ') => {
                                    if let Some(s) = session.as_mut() {
                                        let category = Category::ALL[ui.cursor.0];
                                        let tier = Tier::ALL[ui.cursor.1];
                                        // a consumed cell is simply ignored; the board shows it blank
                                        if s.select_cell(catalog, category, tier, &mut rng).is_ok() {
                                            ui.choice_cursor = 0;
                                            ui.last_second = Instant::now();
                                            screen = Screen::Question;
                                        }
                                    }
                                }
                                _ => {}
                            },
                            Screen::Question => {
                                if let Some(s) = session.as_mut() {
                                    let choice_count = s.question().map(|q| q.choices.len()).unwrap_or(0);
                                    let mut submit: Option<usize> = None;
                                    match code {
                                        KeyCode::Esc => break,
                                        KeyCode::Up => ui.choice_cursor = ui.choice_cursor.saturating_sub(1),
                                        KeyCode::Down => {
                                            if choice_count > 0 {
                                                ui.choice_cursor = (ui.choice_cursor + 1).min(choice_count - 1);
                                            }
                                        }
                                        KeyCode::Enter => submit = Some(ui.choice_cursor),
                                        KeyCode::Char(c) if c.is_ascii_digit() => {
                                            let d = c.to_digit(10).map(|d| d as usize).unwrap_or(0);
                                            if (1..=choice_count).contains(&d) {
                                                submit = Some(d - 1);
                                            }
                                        }
                                        _ => {}
                                    }
                                    if let Some(choice) = submit {
                                        if let Ok(outcome) = s.submit_answer(choice) {
                                            ui.last_outcome = Some(outcome);
                                            ui.timed_out = false;
                                            screen = Screen::Notice;
                                        }
                                    }
                                }
                            }
                            Screen::Notice => {
                                // any key acknowledges the outcome
                                if let Some(outcome) = ui.last_outcome {
                                    if outcome.finished {
                                        if let Some(s) = session.as_ref() {
                                            if let Some(new_record) = high.challenge(s.player(), outcome.score) {
                                                *high = new_record;
                                                ui.new_record = true;
                                                if let Err(err) = save_high_score(high) {
                                                    warn!(%err, "failed to persist high score");
                                                    ui.save_failed = true;
                                                }
                                            }
                                        }
                                        screen = Screen::GameOver;
                                    } else {
                                        screen = Screen::Board;
                                    }
                                }
                            }
                            Screen::GameOver => match code {
                                KeyCode::Esc => break,
                                KeyCode::F(2) => {
                                    session = None;
                                    ui.reset_for_new_game();
                                    screen = Screen::NameEntry;
                                }
                                _ => {}
                            },
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Render the 6x5 board grid into `area`
fn draw_board<B: Backend>(f: &mut Frame<'_, B>, area: Rect, session: &Session, cursor: (usize, usize), pal: &Palette) {
    let board_area = center_rect((CATEGORY_COUNT * CELL_W) as u16 + 2, (TIER_COUNT as u16 + 1) * 2 + 2, area);
    let mut lines = vec![];

    // header row: category names
    let mut spans = vec![];
    for category in Category::ALL {
        spans.push(Span::styled(
            format!("{:^width$}", category.name(), width = CELL_W),
            Style::default().bg(pal.board_bg).fg(pal.board_fg).add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Spans::from(spans));
    lines.push(blank_row(pal));

    // value rows: one per tier, blank once consumed
    for (ti, tier) in Tier::ALL.iter().enumerate() {
        let mut spans = vec![];
        for (ci, category) in Category::ALL.iter().enumerate() {
            let text = if session.is_available(*category, *tier) {
                format!("${}", tier.value())
            } else {
                String::new()
            };
            let mut style = Style::default().bg(pal.board_bg).fg(pal.board_fg);
            if cursor == (ci, ti) {
                style = Style::default().bg(pal.cursor_bg).fg(pal.cursor_fg).add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(format!("{:^width$}", text, width = CELL_W), style));
        }
        lines.push(Spans::from(spans));
        lines.push(blank_row(pal));
    }

    let board = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Pick a Category and Value ")
            .title_alignment(Alignment::Center),
    );
    f.render_widget(board, board_area);
}

/// A spacer line carrying the board background
fn blank_row(pal: &Palette) -> Spans<'static> {
    Spans::from(Span::styled(
        " ".repeat(CATEGORY_COUNT * CELL_W),
        Style::default().bg(pal.board_bg),
    ))
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
