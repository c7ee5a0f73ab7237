use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_HEIGHT: u16 = 1;
pub const CLOCK_HEIGHT: u16 = 5;
pub const LOGGER_HEIGHT: u16 = 10;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub logger: Option<Rect>,
    pub status: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let tab_height = if full_screen { 0 } else { TAB_BAR_HEIGHT };
        let logger_height = if show_logs { LOGGER_HEIGHT } else { 0 };

        let [tab, main, logger, status] = Layout::vertical([
            Constraint::Length(tab_height),
            Constraint::Fill(1),
            Constraint::Length(logger_height),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .areas(area);

        LayoutAreas {
            tab_bar: if full_screen {
                [Rect::ZERO, Rect::ZERO]
            } else {
                Self::split_tab_bar(tab)
            },
            main,
            logger: show_logs.then_some(logger),
            status,
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

/// Bench tab: clock strip on top, field and bench side by side, activity log below.
pub struct BenchAreas {
    pub clock: Rect,
    pub field: Rect,
    pub bench: Rect,
    pub log: Rect,
}

impl BenchAreas {
    pub fn new(area: Rect) -> Self {
        let [clock, lists, log] = Layout::vertical([
            Constraint::Length(CLOCK_HEIGHT),
            Constraint::Min(8),
            Constraint::Percentage(35),
        ])
        .areas(area);
        let [field, bench] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(lists);
        BenchAreas {
            clock,
            field,
            bench,
            log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_pane_only_when_shown() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = LayoutAreas::from_rect(area, false, false);
        assert!(layout.logger.is_none());
        assert_eq!(layout.status.y, 39);
        assert_eq!(layout.main.y, TAB_BAR_HEIGHT);

        let layout = LayoutAreas::from_rect(area, true, true);
        assert_eq!(layout.logger.map(|r| r.height), Some(LOGGER_HEIGHT));
        assert_eq!(layout.main.y, 0);
    }
}
