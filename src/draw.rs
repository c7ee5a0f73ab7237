use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::banner::GoalBanner;
use crate::components::roster_list::RosterList;
use crate::state::app_state::NoticeLevel;
use crate::ui::layout::{BenchAreas, LayoutAreas};
use lax_engine::{ClockState, Fatigue, LogKind, Zone, format_clock};

static TABS: &[&str; 2] = &["Bench", "Stats"];

const HELP: &[(&str, &str)] = &[
    ("j / k", "move selection"),
    ("Tab", "switch between field and bench"),
    ("Space / Enter", "sub the selected player on or off"),
    ("J / K", "move the selected player down or up the list"),
    ("g", "goal for the selected field player"),
    ("x", "remove the selected player (before kick-off)"),
    ("s", "start the clock"),
    ("p", "pause / resume"),
    ("n", "end the quarter now"),
    ("t", "reset the timer to a full quarter"),
    ("u", "undo"),
    ("R", "reset the game"),
    ("e", "export the activity log"),
    ("1 / 2", "bench / stats"),
    ("\"", "show debug logs"),
    ("f", "full screen"),
    ("q", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Bench => draw_bench(f, layout.main, app),
            MenuItem::Stats => draw_stats(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logger) = layout.logger {
            draw_logger(f, logger);
        }
        draw_status(f, layout.status, app);

        if let Some(scorer) = app.state.celebration.scorer.as_deref() {
            let area = centered(f.area(), 60, 11);
            f.render_widget(Clear, area);
            f.render_widget(
                GoalBanner {
                    scorer,
                    score: app.state.celebration.score,
                    tick: app.state.celebration.tick,
                },
                area,
            );
        }
        if let Some(prompt) = app.state.prompt {
            draw_prompt(f, prompt.question());
        }
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bench => 0,
        MenuItem::Stats => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_bench(f: &mut Frame, area: Rect, app: &App) {
    let areas = BenchAreas::new(area);
    draw_clock(f, areas.clock, app);

    let cursor = app.state.cursor;
    for (zone, rect) in [(Zone::Field, areas.field), (Zone::Bench, areas.bench)] {
        f.render_widget(
            RosterList {
                game: &app.game,
                zone,
                selected: (cursor.zone == zone).then(|| cursor.index(zone)),
            },
            rect,
        );
    }

    draw_activity_log(f, areas.log, app);
}

fn draw_clock(f: &mut Frame, area: Rect, app: &App) {
    let clock = app.game.clock();
    let (state_label, state_color) = match clock.state() {
        ClockState::NotStarted => ("NOT STARTED", Color::DarkGray),
        ClockState::Running => ("RUNNING", Color::Green),
        ClockState::Paused => ("PAUSED", Color::Yellow),
        ClockState::Finished => ("FINAL", Color::Red),
    };

    let block = default_border(state_color).title(" Game ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(inner);

    let time_style = Style::default().fg(state_color).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![
            Span::styled(format_clock(clock.time_left()), time_style),
            Span::raw("  "),
            Span::raw(lax_engine::quarter_name(clock.quarter())),
            Span::raw("  "),
            Span::styled(state_label, Style::default().fg(state_color)),
        ]),
        Line::from(Span::styled(
            match clock.state() {
                ClockState::NotStarted => "s=start  (fill the field first)",
                ClockState::Running => "p=pause  n=end quarter",
                ClockState::Paused => "p=resume  n=end quarter  t=reset timer",
                ClockState::Finished => "R=reset  e=export",
            },
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines), left);

    let mut summary = vec![Line::from(vec![
        Span::raw("Score "),
        Span::styled(
            app.game.score().to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ])];
    if let Some(player) = app.game.longest_stint_on_field()
        && let Some(stint) = app.game.seconds_on_field(&player.id)
    {
        summary.push(Line::from(Span::styled(
            format!("Longest on: {} {}", player.name, format_clock(stint)),
            Style::default().fg(Color::Gray),
        )));
    }
    f.render_widget(Paragraph::new(summary).alignment(Alignment::Right), right);
}

fn draw_activity_log(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Activity ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.game.log().is_empty() {
        f.render_widget(
            Paragraph::new("Nothing yet. Sub players on to get started.")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = app
        .game
        .log()
        .iter()
        .take(inner.height as usize)
        .map(|entry| {
            let color = match entry.kind {
                LogKind::Goal => Color::Yellow,
                LogKind::Field => Color::Green,
                LogKind::Bench => Color::Blue,
                LogKind::Timer => Color::Gray,
                LogKind::Quarter => Color::Cyan,
                LogKind::Game => Color::Magenta,
                LogKind::Error => Color::Red,
            };
            let stamp = entry.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S");
            Line::from(vec![
                Span::styled(format!("{stamp} "), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{} ", entry.kind.icon()), Style::default().fg(color)),
                Span::raw(entry.message.clone()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(format!(" Stats  |  Score {} ", app.game.score()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut players: Vec<_> = app.game.roster().iter().collect();
    players.sort_by_key(|p| p.number);

    let rows: Vec<Row> = players
        .into_iter()
        .map(|player| {
            let stats = app.game.stats_for(&player.id);
            let zone = match app.game.zone_of(&player.id) {
                Some(Zone::Field) => "field",
                Some(Zone::Bench) => "bench",
                None => "-",
            };
            let (fatigue, color) = match app.game.fatigue(&player.id) {
                Some(Fatigue::Fresh) => ("fresh", Color::Green),
                Some(Fatigue::Tiring) => ("tiring", Color::Yellow),
                Some(Fatigue::Flagged) => ("sub off", Color::Red),
                None if player.is_goalie() => ("goalie", Color::Cyan),
                None => ("", Color::White),
            };
            Row::new(vec![
                Cell::from(format!("#{:02}", player.number)),
                Cell::from(player.name.clone()),
                Cell::from(zone),
                Cell::from(stats.goals.to_string()),
                Cell::from(format_clock(app.game.display_field_time(&player.id))),
                Cell::from(
                    app.game
                        .seconds_on_field(&player.id)
                        .map(format_clock)
                        .unwrap_or_default(),
                ),
                Cell::from(Span::styled(fatigue, Style::default().fg(color))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["No", "Player", "Zone", "Goals", "Time", "Stint", ""])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .column_spacing(1);
    f.render_widget(table, inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help (Esc to close) ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(
                    format!("{keys:>14}  "),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logger(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(logger, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.state.notice.as_ref() {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            Line::from(vec![
                Span::styled(format!(" {} ", notice.at), Style::default().fg(Color::DarkGray)),
                Span::styled(notice.text.clone(), Style::default().fg(color)),
            ])
        }
        None => Line::from(Span::styled(
            format!(" {}  |  ? for keys", app.game.clock().display()),
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_prompt(f: &mut Frame, question: &str) {
    let area = centered(f.area(), (question.len() as u16).saturating_add(6), 5);
    f.render_widget(Clear, area);
    let block = default_border(Color::Yellow).title(" Confirm ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(vec![Line::from(question), Line::from("y / n")]).alignment(Alignment::Center),
        inner,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
