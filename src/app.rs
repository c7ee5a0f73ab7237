use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, NoticeLevel, Prompt, zone_list};
use lax_engine::game::FLAGGED_AFTER;
use lax_engine::{ClockState, FileStore, Game, GameError, Loaded, Roster, TickOutcome, quarter_name};
use log::{info, warn};
use std::path::Path;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bench,
    Stats,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub game: Game,
    store: FileStore,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        let mut state = AppState::new();
        let seed = match settings.roster_path.as_deref() {
            Some(path) => load_roster(path).unwrap_or_else(|e| {
                warn!("falling back to the built-in roster: {e}");
                state.notify(NoticeLevel::Error, format!("Roster not loaded: {e}"));
                Roster::seed()
            }),
            None => Roster::seed(),
        };

        let store = FileStore::new(settings.state_dir.clone());
        let Loaded { game, warning } = lax_engine::load(&store, settings.game.clone(), seed);
        if let Some(e) = warning {
            state.notify(NoticeLevel::Error, format!("Saved game discarded: {e}"));
        } else if game.clock().has_started() {
            state.notify(NoticeLevel::Info, format!("Resumed {}", game.clock().display()));
        }
        info!("state directory {}", settings.state_dir.display());

        Self {
            settings,
            state,
            game,
            store,
        }
    }

    #[cfg(test)]
    pub fn with_store(settings: AppSettings, game: Game) -> Self {
        Self {
            store: FileStore::new(settings.state_dir.clone()),
            settings,
            state: AppState::new(),
            game,
        }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn select_down(&mut self) {
        self.state.cursor.down(&self.game);
    }

    pub fn select_up(&mut self) {
        self.state.cursor.up();
    }

    pub fn switch_zone(&mut self) {
        self.state.cursor.switch_zone();
    }

    // -----------------------------------------------------------------------
    // Game actions. Every success is saved; every failure becomes a notice.
    // -----------------------------------------------------------------------

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.state.cursor.selected(&self.game).cloned() else {
            return;
        };
        let Some(outcome) = self.commit(|game| game.toggle(&id)) else {
            return;
        };

        self.state.cursor.clamp(&self.game);
        if let Some(sub) = outcome.recommended.as_ref().and_then(|id| self.game.player(id)) {
            let text = format!("Next up from the bench: {}", sub.label());
            self.state.notify(NoticeLevel::Info, text);
        }
        if outcome.ready_to_start {
            self.state.prompt = Some(Prompt::StartClock);
        }
    }

    /// Shift the selected player one row up or down within its list.
    pub fn reorder_selected(&mut self, down: bool) {
        let zone = self.state.cursor.zone;
        let Some(id) = self.state.cursor.selected(&self.game).cloned() else {
            return;
        };
        let Some(current) = zone_list(&self.game, zone).iter().position(|p| p == &id) else {
            return;
        };
        let target = if down {
            current + 1
        } else if current == 0 {
            return;
        } else {
            current - 1
        };
        if target >= zone_list(&self.game, zone).len() {
            return;
        }
        if self.commit(|game| game.move_player(&id, zone, target)).is_some() {
            self.state.cursor.follow(zone, target);
        }
    }

    pub fn goal_selected(&mut self) {
        let Some(id) = self.state.cursor.selected(&self.game).cloned() else {
            return;
        };
        if let Some(event) = self.commit(|game| game.record_goal(&id)) {
            self.state.celebration.start(event.name.clone(), event.score);
            let text = format!("Goal by {}! ({} this game)", event.name, event.player_goals);
            self.state.notify(NoticeLevel::Info, text);
        }
    }

    pub fn remove_selected(&mut self) {
        let Some(id) = self.state.cursor.selected(&self.game).cloned() else {
            return;
        };
        if let Some(player) = self.commit(|game| game.remove_player(&id)) {
            self.state.cursor.clamp(&self.game);
            let text = format!("{} removed from the roster", player.label());
            self.state.notify(NoticeLevel::Info, text);
        }
    }

    pub fn start_clock(&mut self) {
        if self.commit(Game::start_clock).is_some() {
            self.state.notify(NoticeLevel::Info, self.game.clock().display());
        }
    }

    pub fn toggle_pause(&mut self) {
        self.commit(Game::toggle_pause);
    }

    pub fn next_quarter(&mut self) {
        if let Some(outcome) = self.commit(Game::next_quarter) {
            self.announce(outcome);
        }
    }

    pub fn reset_timer(&mut self) {
        if self.commit(Game::reset_clock).is_some() {
            let text = format!("Timer reset {}", self.game.clock().display());
            self.state.notify(NoticeLevel::Info, text);
        }
    }

    pub fn undo(&mut self) {
        if self.commit(Game::undo).is_some() {
            self.state.cursor.clamp(&self.game);
            self.state.notify(NoticeLevel::Info, "Undone");
        }
    }

    pub fn request_reset(&mut self) {
        self.state.prompt = Some(Prompt::Reset);
    }

    pub fn confirm_prompt(&mut self) {
        match self.state.prompt.take() {
            Some(Prompt::StartClock) => self.start_clock(),
            Some(Prompt::Reset) => {
                if self.commit(Game::reset).is_some() {
                    self.state.cursor = Default::default();
                    self.state.notify(NoticeLevel::Info, "Game has been reset.");
                }
            }
            None => {}
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.state.prompt = None;
    }

    pub fn export_log(&mut self) {
        let path = self.settings.export_path.clone();
        match lax_engine::write_export(&path, &self.game) {
            Ok(()) => {
                info!("exported game log to {}", path.display());
                let text = format!("Log exported to {}", path.display());
                self.state.notify(NoticeLevel::Info, text);
            }
            Err(e) => self.fail(e),
        }
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// One second from the clock ticker. Returns false when the clock was not
    /// running and nothing changed.
    pub fn on_clock_tick(&mut self) -> bool {
        let outcome = self.game.tick();
        if outcome == TickOutcome::Idle {
            return false;
        }
        self.persist();
        self.announce(outcome);

        let flagged: Vec<String> = self
            .game
            .on_field()
            .iter()
            .filter(|id| self.game.fatigue(id).is_some())
            .filter(|id| self.game.seconds_on_field(id) == Some(FLAGGED_AFTER))
            .filter_map(|id| self.game.player(id).map(|p| p.name.clone()))
            .collect();
        if !flagged.is_empty() {
            let text = format!("Time for a breather: {}", flagged.join(", "));
            self.state.notify(NoticeLevel::Info, text);
        }
        true
    }

    pub fn advance_animation(&mut self) -> bool {
        self.state.advance_animation()
    }

    pub fn clock_running(&self) -> bool {
        self.game.clock().state() == ClockState::Running
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn commit<T>(&mut self, op: impl FnOnce(&mut Game) -> lax_engine::Result<T>) -> Option<T> {
        match op(&mut self.game) {
            Ok(value) => {
                self.persist();
                Some(value)
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = lax_engine::save(&mut self.store, &self.game) {
            self.fail(e);
        }
    }

    fn fail(&mut self, e: GameError) {
        warn!("{e}");
        self.state.notify(NoticeLevel::Error, e.to_string());
    }

    fn announce(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::QuarterBegan(q) => {
                self.state.notify(NoticeLevel::Info, format!("{} begins", quarter_name(q)));
            }
            TickOutcome::Finished => {
                let text = format!("Game finished. Final score {}", self.game.score());
                self.state.notify(NoticeLevel::Info, text);
            }
            TickOutcome::Idle | TickOutcome::Counted => {}
        }
    }
}

fn load_roster(path: &Path) -> Result<Roster, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("read {} failed: {e}", path.display()))?;
    Roster::from_json(&content).map_err(|e| format!("{}: {e}", path.display()))
}
