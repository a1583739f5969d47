use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::{
    app::{App, Feedback, Screen},
    color::Color as GameColor,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const SWATCH_WIDTH: u16 = 24;
const SWATCH_HEIGHT: u16 = 7;
/// history rows shown on the results screen, most recent first
const MAX_HISTORY_ROWS: usize = 8;

pub const RULES_TEXT: &str = "A color fills the box in the middle of the screen.\n\
Press its key before the countdown reaches zero:\n\
(r)ed (g)reen (b)lue (y)ellow, or 1-4.\n\n\
Every hit scores a point and rolls a new color, which may be the same one again.\n\
A miss costs nothing, but the color stays until you hit it.";

pub fn term_color(color: GameColor) -> Color {
    match color {
        GameColor::Red => Color::Red,
        GameColor::Green => Color::Green,
        GameColor::Blue => Color::Blue,
        GameColor::Yellow => Color::Yellow,
    }
}

/// Rect of `width` x `height` centered in `area`, clipped to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen() {
            Screen::Welcome => render_welcome(area, buf),
            Screen::Rules => {
                render_welcome(area, buf);
                render_rules(area, buf);
            }
            Screen::Playing => render_playing(self, area, buf),
            Screen::Results => render_results(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn render_welcome(area: Rect, buf: &mut Buffer) {
    let title: Vec<Span> = GameColor::ALL
        .iter()
        .zip("TAP!".chars())
        .map(|(&color, c)| {
            Span::styled(
                format!(" {c} "),
                bold().fg(Color::Black).bg(term_color(color)),
            )
        })
        .collect();

    let lines = vec![
        Line::from(Span::styled("chromatap", bold())),
        Line::from(""),
        Line::from(title),
        Line::from(""),
        Line::from(Span::styled(
            "hit the matching color before time runs out",
            italic(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) start / (?) rules / (esc)ape",
            italic().add_modifier(Modifier::DIM),
        )),
    ];

    let height = lines.len() as u16;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered_rect(area.width, height, area), buf);
}

fn render_rules(area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(60, 12, area);
    Clear.render(popup, buf);

    Paragraph::new(format!("{RULES_TEXT}\n\n(enter) start / (esc) back"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" rules ", bold())),
        )
        .wrap(Wrap { trim: true })
        .render(popup, buf);
}

fn render_playing(app: &App, area: Rect, buf: &mut Buffer) {
    let engine = app.engine();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // score / time
            Constraint::Min(SWATCH_HEIGHT),
            Constraint::Length(1), // feedback
            Constraint::Length(1), // padding
            Constraint::Length(1), // color keys
        ])
        .split(area);

    let time_style = if app.is_low_time() {
        bold().fg(Color::Red)
    } else {
        bold()
    };
    let status = Line::from(vec![
        Span::styled(format!("score {}", engine.score()), bold()),
        Span::raw("   "),
        Span::styled(format!("{}s", engine.remaining_secs()), time_style),
    ]);
    Paragraph::new(status)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    if let Some(target) = engine.target() {
        let swatch = centered_rect(SWATCH_WIDTH, SWATCH_HEIGHT, chunks[1]);
        Block::default()
            .style(Style::default().bg(term_color(target)))
            .render(swatch, buf);
    }

    let feedback = match app.feedback() {
        Some(Feedback::Correct) => Span::styled("correct!", bold().fg(Color::Green)),
        Some(Feedback::Incorrect) => Span::styled("wrong color", bold().fg(Color::Red)),
        None => Span::raw(""),
    };
    Paragraph::new(Line::from(feedback))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    let mut keys: Vec<Span> = GameColor::ALL
        .iter()
        .map(|&color| {
            Span::styled(
                format!(" ({}) {} ", color.hotkey(), color.to_string().to_lowercase()),
                bold().fg(term_color(color)),
            )
        })
        .collect();
    keys.push(Span::styled(" / (esc) menu", italic()));
    Paragraph::new(Line::from(keys))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let history = app.history();
    let rows: Vec<Line> = history_lines(app);
    let history_rows = rows.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // final score
            Constraint::Length(1), // best-ever
            Constraint::Length(1), // new record banner
            Constraint::Length(1), // padding
            Constraint::Length(history_rows + 2),
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let summary = app.last_summary();
    let final_score = summary.map(|s| s.final_score).unwrap_or(0);
    Paragraph::new(Span::styled(format!("final score: {final_score}"), bold()))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    if let Some(record) = summary.and_then(|s| s.record) {
        Paragraph::new(Span::styled(
            format!("best ever: {}", record.updated_record),
            Style::default().fg(Color::Cyan),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        if record.is_new_record {
            Paragraph::new(Span::styled(
                "new record!",
                bold().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK),
            ))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
        }
    }

    Paragraph::new(rows)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" this session: {} rounds ", history.count())),
        )
        .render(chunks[4], buf);

    Paragraph::new(Span::styled("(r)etry / (m)enu / (esc)ape", italic())).render(chunks[6], buf);
}

/// One line per round, latest first, with a medal on the session best.
/// Rounds past [`MAX_HISTORY_ROWS`] are folded into a trailing count line.
pub fn history_lines(app: &App) -> Vec<Line<'static>> {
    let history = app.history();
    let best = history.best_rounds();
    let mut lines: Vec<Line> = history
        .all()
        .into_iter()
        .enumerate()
        .rev()
        .take(MAX_HISTORY_ROWS)
        .map(|(idx, score)| {
            let mut spans = vec![Span::raw(format!("round #{:<3} {score:>4} pts", idx + 1))];
            if best.contains(&idx) {
                spans.push(Span::styled("  * best", bold().fg(Color::Yellow)));
            }
            Line::from(spans)
        })
        .collect();

    let earlier = history.count().saturating_sub(MAX_HISTORY_ROWS);
    if earlier > 0 {
        let mut text = format!("... {earlier} earlier");
        if best.iter().any(|&idx| idx < earlier) {
            text.push_str(", best among them");
        }
        lines.push(Line::from(Span::styled(text, italic().add_modifier(Modifier::DIM))));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ScriptedColorSource;
    use crate::config::Config;
    use crate::record::MemoryRecordStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app(round_secs: u32) -> App {
        let config = Config {
            round_secs,
            ..Config::default()
        };
        App::new(
            config,
            Box::new(ScriptedColorSource::new([GameColor::Blue])),
            Box::new(MemoryRecordStore::new()),
        )
    }

    fn render_to_string(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| f.render_widget(app, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(40, 40, area), area);
    }

    #[test]
    fn test_term_colors_are_distinct() {
        let mapped: Vec<Color> = GameColor::ALL.iter().map(|&c| term_color(c)).collect();
        assert_eq!(
            mapped,
            vec![Color::Red, Color::Green, Color::Blue, Color::Yellow]
        );
    }

    #[test]
    fn test_render_welcome() {
        let app = test_app(3);
        let screen = render_to_string(&app);
        assert!(screen.contains("chromatap"));
        assert!(screen.contains("(enter) start"));
    }

    #[test]
    fn test_render_playing_shows_score_and_time() {
        let mut app = test_app(30);
        app.start_round().unwrap();
        let screen = render_to_string(&app);
        assert!(screen.contains("score 0"));
        assert!(screen.contains("30s"));
        assert!(screen.contains("(b) blue"));
    }

    #[test]
    fn test_render_results_with_history() {
        let mut app = test_app(1);
        app.start_round().unwrap();
        app.answer(GameColor::Blue);
        app.on_tick();

        let screen = render_to_string(&app);
        assert!(screen.contains("final score: 1"));
        assert!(screen.contains("best ever: 1"));
        assert!(screen.contains("new record!"));
        assert!(screen.contains("round #1"));
    }

    #[test]
    fn test_history_lines_latest_first_with_medal() {
        let mut app = test_app(1);
        for hits in [2, 0] {
            app.start_round().unwrap();
            for _ in 0..hits {
                app.answer(GameColor::Blue);
            }
            app.on_tick();
        }

        let lines: Vec<String> = history_lines(&app)
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("round #2"));
        assert!(!lines[0].contains("best"));
        assert!(lines[1].starts_with("round #1"));
        assert!(lines[1].contains("best"));
    }

    #[test]
    fn test_history_lines_fold_older_rounds() {
        let mut app = test_app(1);
        for hits in [3, 0, 0, 0, 1, 0, 0, 0, 0, 2] {
            app.start_round().unwrap();
            for _ in 0..hits {
                app.answer(GameColor::Blue);
            }
            app.on_tick();
        }

        let lines: Vec<String> = history_lines(&app)
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(lines.len(), MAX_HISTORY_ROWS + 1);
        assert!(lines[0].starts_with("round #10"));
        assert!(lines[MAX_HISTORY_ROWS - 1].starts_with("round #3"));
        assert!(lines.iter().all(|l| !l.contains("* best")));
        assert_eq!(lines[MAX_HISTORY_ROWS], "... 2 earlier, best among them");

        let screen = render_to_string(&app);
        assert!(screen.contains("this session: 10 rounds"));
        assert!(screen.contains("... 2 earlier"));
    }
}
