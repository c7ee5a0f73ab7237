use lax_engine::{Fatigue, Game, PlayerId, Zone, format_clock};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

/// One zone (field or bench) as a selectable list.
pub struct RosterList<'a> {
    pub game: &'a Game,
    pub zone: Zone,
    pub selected: Option<usize>,
}

impl Widget for RosterList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let focused = self.selected.is_some();
        let ids = match self.zone {
            Zone::Field => self.game.on_field(),
            Zone::Bench => self.game.on_bench(),
        };

        let title = match self.zone {
            Zone::Field => format!(
                " Field {}/{} ",
                self.game.field_count(),
                self.game.config().field_cap
            ),
            Zone::Bench => format!(" Bench ({}) ", ids.len()),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if focused { Color::Yellow } else { Color::DarkGray }))
            .title(title);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        if ids.is_empty() {
            Paragraph::new("(empty)")
                .style(Style::default().fg(Color::DarkGray))
                .render(inner, buf);
            return;
        }

        // Keep the selected row visible.
        let rows = inner.height as usize;
        let skip = self.selected.map(|s| (s + 1).saturating_sub(rows)).unwrap_or(0);

        let lines: Vec<Line> = ids
            .iter()
            .enumerate()
            .skip(skip)
            .take(rows)
            .map(|(idx, id)| {
                let mut style = row_style(self.game, id);
                if self.selected == Some(idx) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(Span::styled(player_row(self.game, id), style))
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

/// "Callum #07   2:15  G1  0:42" : label, total field time, goals and the
/// current stint for players on the field.
pub fn player_row(game: &Game, id: &PlayerId) -> String {
    let Some(player) = game.player(id) else {
        return id.to_string();
    };
    let stats = game.stats_for(id);
    let mut row = format!(
        "{:<14} {:>5}  G{}",
        player.label(),
        format_clock(game.display_field_time(id)),
        stats.goals
    );
    if player.is_goalie() {
        row.push_str("  (G)");
    } else if let Some(stint) = game.seconds_on_field(id) {
        row.push_str(&format!("  {}", format_clock(stint)));
    }
    row
}

fn row_style(game: &Game, id: &PlayerId) -> Style {
    if game.roster().is_goalie(id) {
        return Style::default().fg(Color::Cyan);
    }
    match game.fatigue(id) {
        Some(Fatigue::Fresh) => Style::default().fg(Color::Green),
        Some(Fatigue::Tiring) => Style::default().fg(Color::Yellow),
        Some(Fatigue::Flagged) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        None => Style::default().fg(Color::White),
    }
}
