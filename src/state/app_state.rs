use crate::app::MenuItem;
use chrono::Local;
use lax_engine::{Game, PlayerId, Zone};

/// Animation ticks (80ms each) a notice stays on screen.
pub const NOTICE_TICKS: u32 = 60;
/// Animation ticks the goal banner is shown for.
pub const CELEBRATION_TICKS: u32 = 30;

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Non-blocking message in the status bar. Fades after `NOTICE_TICKS`.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub at: String,
    ticks_left: u32,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level,
            at: Local::now().format("%H:%M:%S").to_string(),
            ticks_left: NOTICE_TICKS,
        }
    }
}

// ---------------------------------------------------------------------------
// Goal celebration
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Celebration {
    pub scorer: Option<String>,
    pub score: u32,
    /// Monotonic counter while the banner is up; drives the colour cycling.
    pub tick: u64,
    frames_left: u32,
}

impl Celebration {
    pub fn start(&mut self, scorer: impl Into<String>, score: u32) {
        self.scorer = Some(scorer.into());
        self.score = score;
        self.tick = 0;
        self.frames_left = CELEBRATION_TICKS;
    }

    pub fn is_active(&self) -> bool {
        self.frames_left > 0
    }

    /// Returns true when the banner changed and needs a redraw.
    pub fn advance(&mut self) -> bool {
        if self.frames_left == 0 {
            return false;
        }
        self.tick = self.tick.wrapping_add(1);
        self.frames_left -= 1;
        if self.frames_left == 0 {
            self.scorer = None;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Confirmation prompts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// The field just filled before kick-off.
    StartClock,
    Reset,
}

impl Prompt {
    pub fn question(&self) -> &'static str {
        match self {
            Prompt::StartClock => "The field is full. Start the clock?",
            Prompt::Reset => "Reset the game? Stats and the log will be cleared.",
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Which list has focus and the highlighted row in each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterCursor {
    pub zone: Zone,
    field: usize,
    bench: usize,
}

impl Default for RosterCursor {
    fn default() -> Self {
        Self {
            zone: Zone::Bench,
            field: 0,
            bench: 0,
        }
    }
}

impl RosterCursor {
    pub fn index(&self, zone: Zone) -> usize {
        match zone {
            Zone::Field => self.field,
            Zone::Bench => self.bench,
        }
    }

    fn index_mut(&mut self, zone: Zone) -> &mut usize {
        match zone {
            Zone::Field => &mut self.field,
            Zone::Bench => &mut self.bench,
        }
    }

    pub fn selected<'a>(&self, game: &'a Game) -> Option<&'a PlayerId> {
        let list = zone_list(game, self.zone);
        list.get(self.index(self.zone).min(list.len().saturating_sub(1)))
    }

    pub fn down(&mut self, game: &Game) {
        let max = zone_list(game, self.zone).len().saturating_sub(1);
        let index = self.index_mut(self.zone);
        *index = (*index + 1).min(max);
    }

    pub fn up(&mut self) {
        let index = self.index_mut(self.zone);
        *index = index.saturating_sub(1);
    }

    pub fn switch_zone(&mut self) {
        self.zone = self.zone.other();
    }

    /// Point at `index` in `zone`, e.g. after the selected player was moved.
    pub fn follow(&mut self, zone: Zone, index: usize) {
        self.zone = zone;
        *self.index_mut(zone) = index;
    }

    /// Keep both rows inside their lists after players left or arrived.
    pub fn clamp(&mut self, game: &Game) {
        for zone in [Zone::Field, Zone::Bench] {
            let max = zone_list(game, zone).len().saturating_sub(1);
            let index = self.index_mut(zone);
            *index = (*index).min(max);
        }
    }
}

pub fn zone_list(game: &Game, zone: Zone) -> &[PlayerId] {
    match zone {
        Zone::Field => game.on_field(),
        Zone::Bench => game.on_bench(),
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub notice: Option<Notice>,
    pub prompt: Option<Prompt>,
    pub cursor: RosterCursor,
    pub celebration: Celebration,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice::new(level, text));
    }

    /// Age the notice and the goal banner. Returns true if anything visible changed.
    pub fn advance_animation(&mut self) -> bool {
        let mut changed = self.celebration.advance();
        if let Some(notice) = self.notice.as_mut() {
            notice.ticks_left = notice.ticks_left.saturating_sub(1);
            if notice.ticks_left == 0 {
                self.notice = None;
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lax_engine::{GameConfig, Roster};

    fn game() -> Game {
        Game::new(GameConfig::default(), Roster::seed())
    }

    #[test]
    fn cursor_stays_inside_the_focused_list() {
        let game = game();
        let mut cursor = RosterCursor::default();
        assert_eq!(cursor.selected(&game), Some(&PlayerId::from("player-callum")));

        for _ in 0..20 {
            cursor.down(&game);
        }
        assert_eq!(cursor.index(Zone::Bench), 7);
        assert_eq!(cursor.selected(&game), Some(&PlayerId::from("player-newkid")));

        cursor.switch_zone();
        cursor.down(&game);
        assert_eq!(cursor.selected(&game), Some(&PlayerId::from("player-ben")));
        cursor.up();
        cursor.up();
        assert_eq!(cursor.index(Zone::Field), 0);
    }

    #[test]
    fn clamp_after_list_shrinks() {
        let mut game = game();
        let mut cursor = RosterCursor::default();
        cursor.follow(Zone::Bench, 7);
        game.toggle(&PlayerId::from("player-newkid")).unwrap();
        cursor.clamp(&game);
        assert_eq!(cursor.index(Zone::Bench), 6);
    }

    #[test]
    fn celebration_runs_out() {
        let mut celebration = Celebration::default();
        assert!(!celebration.advance());
        celebration.start("Arlo", 3);
        assert!(celebration.is_active());
        for _ in 0..CELEBRATION_TICKS {
            assert!(celebration.advance());
        }
        assert!(!celebration.is_active());
        assert_eq!(celebration.scorer, None);
    }

    #[test]
    fn notices_fade() {
        let mut state = AppState::new();
        state.notify(NoticeLevel::Error, "Field is full");
        for _ in 1..NOTICE_TICKS {
            state.advance_animation();
        }
        assert!(state.notice.is_some());
        assert!(state.advance_animation());
        assert!(state.notice.is_none());
    }
}
