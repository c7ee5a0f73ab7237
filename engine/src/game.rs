use crate::activity::{ActivityLog, LogKind};
use crate::clock::{ClockState, GameClock, TickOutcome, quarter_name};
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::history::HistoryStack;
use crate::roster::{Player, PlayerId, Roster};
use crate::stats::{PlayerStats, StatsTable};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Seconds into a stint at which a player turns from fresh to tiring, and
/// from tiring to flagged for a substitution.
pub const TIRING_AFTER: u32 = 15;
pub const FLAGGED_AFTER: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Field,
    Bench,
}

impl Zone {
    pub fn other(self) -> Self {
        match self {
            Zone::Field => Zone::Bench,
            Zone::Bench => Zone::Field,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::Field => "field",
            Zone::Bench => "bench",
        }
    }
}

/// How long a player has been out there in the current stint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fatigue {
    Fresh,
    Tiring,
    Flagged,
}

impl Fatigue {
    pub fn from_stint(seconds: u32) -> Self {
        if seconds >= FLAGGED_AFTER {
            Fatigue::Flagged
        } else if seconds >= TIRING_AFTER {
            Fatigue::Tiring
        } else {
            Fatigue::Fresh
        }
    }
}

/// Result of a successful substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub player: PlayerId,
    pub zone: Zone,
    /// Bench player suggested to come on after someone was benched.
    pub recommended: Option<PlayerId>,
    /// The field just filled up before kick-off; the caller may now start the clock.
    pub ready_to_start: bool,
}

/// Emitted after a goal so the front end can celebrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalEvent {
    pub player: PlayerId,
    pub name: String,
    pub player_goals: u32,
    pub score: u32,
}

/// Everything an undo step restores.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub(crate) roster: Roster,
    pub(crate) on_field: Vec<PlayerId>,
    pub(crate) on_bench: Vec<PlayerId>,
    pub(crate) stats: StatsTable,
    /// Seconds into the current stint, kept only for players on the field.
    pub(crate) stints: BTreeMap<PlayerId, u32>,
    pub(crate) clock: GameClock,
    pub(crate) score: u32,
    pub(crate) log: ActivityLog,
}

impl GameState {
    /// Goalie pinned on the field, everyone else on the bench in roster order.
    pub fn fresh(roster: Roster, config: &GameConfig) -> Self {
        let mut on_field = Vec::new();
        let mut on_bench = Vec::new();
        for player in roster.iter() {
            if player.is_goalie() {
                on_field.push(player.id.clone());
            } else {
                on_bench.push(player.id.clone());
            }
        }
        let stints = on_field.iter().map(|id| (id.clone(), 0)).collect();

        Self {
            stats: StatsTable::for_players(roster.iter().map(|p| &p.id)),
            roster,
            on_field,
            on_bench,
            stints,
            clock: GameClock::new(config),
            score: 0,
            log: ActivityLog::with_capacity(config.log_capacity),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn on_field(&self) -> &[PlayerId] {
        &self.on_field
    }

    pub fn on_bench(&self) -> &[PlayerId] {
        &self.on_bench
    }

    pub fn stats(&self) -> &StatsTable {
        &self.stats
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Skaters on the field; the goalie does not count against the cap.
    pub fn field_count(&self) -> usize {
        self.on_field.iter().filter(|id| !self.roster.is_goalie(id)).count()
    }

    pub fn zone_of(&self, id: &PlayerId) -> Option<Zone> {
        if self.on_field.contains(id) {
            Some(Zone::Field)
        } else if self.on_bench.contains(id) {
            Some(Zone::Bench)
        } else {
            None
        }
    }

    /// Ticks only ever add field time and stint seconds, and only count the
    /// clock down, so anything `live` is ahead by was played after `self` was
    /// captured.
    fn keep_ticked_time(&mut self, live: &GameState) {
        for (id, stats) in live.stats.iter() {
            if self.roster.contains(id) {
                let restored = self.stats.entry(id);
                restored.total_field_time = restored.total_field_time.max(stats.total_field_time);
            }
        }
        for (id, stint) in self.stints.iter_mut() {
            if let Some(live_stint) = live.stints.get(id) {
                *stint = (*stint).max(*live_stint);
            }
        }
        self.clock.keep_countdown(&live.clock);
    }

    fn zone_mut(&mut self, zone: Zone) -> &mut Vec<PlayerId> {
        match zone {
            Zone::Field => &mut self.on_field,
            Zone::Bench => &mut self.on_bench,
        }
    }

    fn player(&self, id: &PlayerId) -> Result<&Player> {
        self.roster.get(id).ok_or_else(|| GameError::UnknownPlayer(id.clone()))
    }

    /// Check the zone partition, goalie placement, field cap and stats
    /// bookkeeping against the roster.
    pub fn validate(&self, config: &GameConfig) -> Result<()> {
        let mut seen = HashSet::new();
        for id in self.on_field.iter().chain(&self.on_bench) {
            if !self.roster.contains(id) {
                return Err(GameError::Validation(format!("unknown player id {id}")));
            }
            if !seen.insert(id) {
                return Err(GameError::Validation(format!("{id} is listed twice")));
            }
        }
        if seen.len() != self.roster.len() {
            return Err(GameError::Validation(format!(
                "{} of {} players are placed on the field or bench",
                seen.len(),
                self.roster.len()
            )));
        }
        if let Some(goalie) = self.roster.goalie()
            && !self.on_field.contains(&goalie.id)
        {
            return Err(GameError::Validation(format!("goalie {} is not on the field", goalie.name)));
        }
        if self.field_count() > config.field_cap {
            return Err(GameError::Validation(format!(
                "{} players on the field, the cap is {}",
                self.field_count(),
                config.field_cap
            )));
        }
        if let Some(id) = self.stats.ids().find(|id| !self.roster.contains(id)) {
            return Err(GameError::Validation(format!("stats recorded for unknown player {id}")));
        }
        if self.stats.total_goals() != self.score {
            return Err(GameError::Validation(format!(
                "score {} does not match {} player goals",
                self.score,
                self.stats.total_goals()
            )));
        }
        Ok(())
    }
}

/// The single owner of game state. Every mutation goes through one of these
/// methods, which snapshot the previous state for undo and leave the state
/// untouched when they fail.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    seed: Roster,
    state: GameState,
    history: HistoryStack<GameState>,
}

impl Game {
    pub fn new(config: GameConfig, seed: Roster) -> Self {
        let config = config.sanitized();
        let state = GameState::fresh(seed.clone(), &config);
        Self {
            history: HistoryStack::with_depth(config.history_depth),
            config,
            seed,
            state,
        }
    }

    /// Adopt a previously saved state after checking it.
    pub fn from_state(config: GameConfig, seed: Roster, state: GameState) -> Result<Self> {
        let config = config.sanitized();
        state.validate(&config)?;
        Ok(Self {
            history: HistoryStack::with_depth(config.history_depth),
            config,
            seed,
            state,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> &Roster {
        &self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn clock(&self) -> &GameClock {
        &self.state.clock
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn roster(&self) -> &Roster {
        &self.state.roster
    }

    pub fn on_field(&self) -> &[PlayerId] {
        &self.state.on_field
    }

    pub fn on_bench(&self) -> &[PlayerId] {
        &self.state.on_bench
    }

    pub fn log(&self) -> &ActivityLog {
        &self.state.log
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.state.roster.get(id)
    }

    pub fn stats_for(&self, id: &PlayerId) -> PlayerStats {
        self.state.stats.get(id)
    }

    pub fn field_count(&self) -> usize {
        self.state.field_count()
    }

    pub fn zone_of(&self, id: &PlayerId) -> Option<Zone> {
        self.state.zone_of(id)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Field time to show for a player right now. Time is credited a second at
    /// a time by `tick`, so there is never an open interval to add on top.
    pub fn display_field_time(&self, id: &PlayerId) -> u32 {
        self.state.stats.get(id).total_field_time
    }

    /// Seconds since the player last came onto the field; `None` on the bench.
    pub fn seconds_on_field(&self, id: &PlayerId) -> Option<u32> {
        self.state.stints.get(id).copied()
    }

    /// Fatigue stage for skaters on the field. The goalie is never flagged.
    pub fn fatigue(&self, id: &PlayerId) -> Option<Fatigue> {
        if self.state.roster.is_goalie(id) {
            return None;
        }
        self.seconds_on_field(id).map(Fatigue::from_stint)
    }

    /// The skater who has been on the field longest in their current stint.
    pub fn longest_stint_on_field(&self) -> Option<&Player> {
        let mut best: Option<(&PlayerId, u32)> = None;
        for id in &self.state.on_field {
            if self.state.roster.is_goalie(id) {
                continue;
            }
            let stint = self.seconds_on_field(id).unwrap_or(0);
            if best.is_none_or(|(_, longest)| stint > longest) {
                best = Some((id, stint));
            }
        }
        best.and_then(|(id, _)| self.state.roster.get(id))
    }

    // -----------------------------------------------------------------------
    // Substitutions
    // -----------------------------------------------------------------------

    /// Click/tap: send the player to the other zone, at the end of the list.
    pub fn toggle(&mut self, id: &PlayerId) -> Result<MoveOutcome> {
        let zone = self
            .state
            .zone_of(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))?;
        let destination = zone.other();
        let index = self.zone_len(destination);
        self.move_player(id, destination, index)
    }

    /// Drag and drop: place the player in `destination` at `index` (clamped).
    /// Dropping a player back where it was changes nothing and is not recorded.
    pub fn move_player(&mut self, id: &PlayerId, destination: Zone, index: usize) -> Result<MoveOutcome> {
        let player = self.state.player(id)?.clone();
        let source = self
            .state
            .zone_of(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))?;

        if player.is_goalie() {
            return Err(GameError::goalie_immovable());
        }
        if destination == Zone::Field
            && source == Zone::Bench
            && self.state.field_count() >= self.config.field_cap
        {
            return Err(GameError::CapacityExceeded {
                cap: self.config.field_cap,
            });
        }

        if source == destination {
            let current = self.position(source, id);
            let target = index.min(self.zone_len(source).saturating_sub(1));
            if current == Some(target) {
                return Ok(MoveOutcome {
                    player: player.id,
                    zone: source,
                    recommended: None,
                    ready_to_start: false,
                });
            }
        }

        let cap = self.config.field_cap;
        self.apply(|state| {
            let list = state.zone_mut(source);
            list.retain(|p| p != &player.id);
            let list = state.zone_mut(destination);
            let index = index.min(list.len());
            list.insert(index, player.id.clone());

            let mut outcome = MoveOutcome {
                player: player.id.clone(),
                zone: destination,
                recommended: None,
                ready_to_start: false,
            };

            if source == destination {
                state.log.push(
                    LogKind::from(destination),
                    format!("{} reordered on the {}.", player.name, destination.label()),
                );
                return Ok(outcome);
            }

            match destination {
                Zone::Field => {
                    state.stints.insert(player.id.clone(), 0);
                    outcome.ready_to_start =
                        state.clock.state() == ClockState::NotStarted && state.field_count() == cap;
                }
                Zone::Bench => {
                    state.stints.remove(&player.id);
                    outcome.recommended = state.on_bench.iter().find(|p| *p != &player.id).cloned();
                }
            }
            state.log.push(
                LogKind::from(destination),
                format!("{} moved to {}.", player.name, destination.label()),
            );
            Ok(outcome)
        })
        .inspect(|outcome| debug!("{} -> {}", outcome.player, outcome.zone.label()))
    }

    /// Drop a skater from the roster entirely. Only possible before kick-off.
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<Player> {
        let player = self.state.player(id)?.clone();
        if self.state.clock.has_started() {
            return Err(GameError::GameInProgress);
        }
        if player.is_goalie() {
            return Err(GameError::InvariantViolation(
                "The goalie cannot be removed from the roster.".to_string(),
            ));
        }
        let roster = self.state.roster.without(id)?;

        self.apply(|state| {
            state.roster = roster;
            state.on_field.retain(|p| p != id);
            state.on_bench.retain(|p| p != id);
            state.stints.remove(id);
            state.stats.remove(id);
            state.log.push(LogKind::Game, format!("{} removed from the roster.", player.name));
            Ok(())
        })?;
        info!("removed {} from the roster", player.id);
        Ok(player)
    }

    // -----------------------------------------------------------------------
    // Scoring
    // -----------------------------------------------------------------------

    pub fn record_goal(&mut self, id: &PlayerId) -> Result<GoalEvent> {
        let player = self.state.player(id)?.clone();
        if player.is_goalie() {
            return Err(GameError::InvariantViolation(
                "Goals are only recorded for field players.".to_string(),
            ));
        }
        if self.state.zone_of(id) != Some(Zone::Field) {
            return Err(GameError::NotOnField(player.name));
        }

        let event = self.apply(|state| {
            state.stats.credit_goal(&player.id);
            state.score += 1;
            state.log.push(LogKind::Goal, format!("Goal by {}!", player.name));
            Ok(GoalEvent {
                player: player.id.clone(),
                name: player.name.clone(),
                player_goals: state.stats.get(&player.id).goals,
                score: state.score,
            })
        })?;
        info!("goal by {} (score {})", event.player, event.score);
        Ok(event)
    }

    // -----------------------------------------------------------------------
    // Clock
    // -----------------------------------------------------------------------

    pub fn start_clock(&mut self) -> Result<()> {
        self.apply(|state| {
            state.clock.start()?;
            let message = format!("{} begins", quarter_name(state.clock.quarter()));
            state.log.push(LogKind::Quarter, message);
            Ok(())
        })?;
        info!("clock started");
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.apply(|state| {
            state.clock.pause()?;
            state.log.push(LogKind::Timer, "Game paused");
            Ok(())
        })
    }

    pub fn resume(&mut self) -> Result<()> {
        self.apply(|state| {
            state.clock.resume()?;
            state.log.push(LogKind::Timer, "Game resumed");
            Ok(())
        })
    }

    /// Refill the current quarter and stop the countdown. Roster and stats are
    /// left alone.
    pub fn reset_clock(&mut self) -> Result<()> {
        self.apply(|state| {
            state.clock.reset_quarter()?;
            state.log.push(LogKind::Timer, "Timer reset.");
            Ok(())
        })?;
        info!("timer reset for {}", quarter_name(self.state.clock.quarter()));
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<ClockState> {
        match self.state.clock.state() {
            ClockState::Paused => self.resume()?,
            _ => self.pause()?,
        }
        Ok(self.state.clock.state())
    }

    /// One wall-clock second. Counts the clock down and credits a second to
    /// everyone on the field. Does nothing unless the clock is running, and is
    /// never recorded for undo.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.state.clock.tick();
        if outcome == TickOutcome::Idle {
            return outcome;
        }

        let state = &mut self.state;
        for id in &state.on_field {
            state.stats.credit_second(id);
            *state.stints.entry(id.clone()).or_insert(0) += 1;
        }
        log_rollover(&mut state.log, outcome);
        outcome
    }

    /// End the current quarter now instead of waiting for the countdown.
    pub fn next_quarter(&mut self) -> Result<TickOutcome> {
        let outcome = self.apply(|state| {
            let outcome = state.clock.end_quarter()?;
            log_rollover(&mut state.log, outcome);
            Ok(outcome)
        })?;
        info!("quarter advanced manually: {outcome:?}");
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Step back to the state before the last recorded operation. Seconds
    /// ticked since that operation stay played: field time, open stints and
    /// the countdown of the current quarter are carried over. A finished game
    /// cannot be undone.
    pub fn undo(&mut self) -> Result<()> {
        if self.state.clock.is_finished() {
            return Err(GameError::InvariantViolation(
                "The game has finished. Reset to start a new one.".to_string(),
            ));
        }
        let mut previous = self.history.pop().ok_or(GameError::NothingToUndo)?;
        previous.keep_ticked_time(&self.state);
        self.state = previous;
        debug!("undo, {} steps left", self.history.len());
        Ok(())
    }

    /// Start over from the seed roster. Can itself be undone.
    pub fn reset(&mut self) -> Result<()> {
        let fresh = GameState::fresh(self.seed.clone(), &self.config);
        self.apply(|state| {
            *state = fresh;
            state.log.push(LogKind::Game, "Game has been reset.");
            Ok(())
        })?;
        info!("game reset");
        Ok(())
    }

    /// Run `op` against the live state. On success the previous state is
    /// pushed for undo; on failure it is put back untouched.
    fn apply<T>(&mut self, op: impl FnOnce(&mut GameState) -> Result<T>) -> Result<T> {
        let before = self.state.clone();
        match op(&mut self.state) {
            Ok(value) => {
                self.history.push(before);
                Ok(value)
            }
            Err(e) => {
                self.state = before;
                Err(e)
            }
        }
    }

    fn zone_len(&self, zone: Zone) -> usize {
        match zone {
            Zone::Field => self.state.on_field.len(),
            Zone::Bench => self.state.on_bench.len(),
        }
    }

    fn position(&self, zone: Zone, id: &PlayerId) -> Option<usize> {
        let list = match zone {
            Zone::Field => &self.state.on_field,
            Zone::Bench => &self.state.on_bench,
        };
        list.iter().position(|p| p == id)
    }
}

impl From<Zone> for LogKind {
    fn from(zone: Zone) -> Self {
        match zone {
            Zone::Field => LogKind::Field,
            Zone::Bench => LogKind::Bench,
        }
    }
}

fn log_rollover(log: &mut ActivityLog, outcome: TickOutcome) {
    match outcome {
        TickOutcome::QuarterBegan(quarter) => {
            log.push(LogKind::Quarter, format!("{} begins", quarter_name(quarter)));
        }
        TickOutcome::Finished => log.push(LogKind::Game, "Game finished"),
        TickOutcome::Idle | TickOutcome::Counted => {}
    }
}
