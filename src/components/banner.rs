use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

const GOAL_ROWS: [&str; 5] = [
    "  ____  ___    _   _     _ ",
    " / ___|/ _ \\  / \\ | |   | |",
    "| |  _| | | |/ _ \\| |   | |",
    "| |_| | |_| / ___ \\ |___|_|",
    " \\____|\\___/_/   \\_\\_____(_)",
];

const BALL: &str = "o";
const NET_WIDTH: u16 = 9;

/// Cycled per tick so the banner flashes.
const PALETTE: [Color; 4] = [Color::Yellow, Color::LightGreen, Color::LightCyan, Color::White];

/// Full-width goal celebration shown for a couple of seconds after a score.
pub struct GoalBanner<'a> {
    pub scorer: &'a str,
    pub score: u32,
    pub tick: u64,
}

impl Widget for GoalBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accent = Style::default()
            .fg(PALETTE[(self.tick % PALETTE.len() as u64) as usize])
            .add_modifier(Modifier::BOLD);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(accent);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let caption = format!("{} scores! Team total: {}", self.scorer, self.score);
        if inner.width < 30 || inner.height < 7 {
            render_centered(Line::from(Span::styled("GOAL!", accent)), inner, inner.y, buf);
            if inner.height > 1 {
                render_centered(Line::from(caption), inner, inner.y + 1, buf);
            }
            return;
        }

        for (row, text) in GOAL_ROWS.iter().enumerate() {
            let line = Line::from(Span::styled(*text, accent));
            render_centered(line, inner, inner.y + row as u16, buf);
        }

        let shot_y = inner.y + GOAL_ROWS.len() as u16;
        render_centered(Line::from(shot_line(self.tick, inner.width)), inner, shot_y, buf);
        render_centered(
            Line::from(Span::styled(caption, Style::default().fg(Color::White))),
            inner,
            shot_y + 1,
            buf,
        );
    }
}

/// A ball flying left to right into a net drawn as `|###|`.
fn shot_line(tick: u64, width: u16) -> String {
    let lane = width.saturating_sub(NET_WIDTH + 4).max(1) as usize;
    let pos = (tick as usize) % lane;
    let mut line = " ".repeat(pos);
    line.push_str(BALL);
    line.push_str(&" ".repeat(lane - pos));
    line.push_str("|#####|");
    line
}

fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = (line.width() as u16).min(area.width);
    let x = area.x + area.width.saturating_sub(w) / 2;
    buf.set_line(x, y, &line, area.width.saturating_sub(x - area.x));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_travels_then_wraps() {
        let first = shot_line(0, 40);
        let later = shot_line(5, 40);
        assert_eq!(first.find(BALL), Some(0));
        assert_eq!(later.find(BALL), Some(5));
        assert!(first.ends_with("|#####|"));
        assert_eq!(first.len(), later.len());

        let lane = (40 - (NET_WIDTH + 4)) as u64;
        assert_eq!(shot_line(lane, 40).find(BALL), Some(0));
    }

    #[test]
    fn renders_scorer_in_small_area() {
        let area = Rect::new(0, 0, 24, 4);
        let mut buf = Buffer::empty(area);
        GoalBanner {
            scorer: "Arlo",
            score: 2,
            tick: 1,
        }
        .render(area, &mut buf);
        let text: String = (0..area.width).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(text.contains("GOAL!"));
    }
}
