use crate::activity::{ActivityLog, LogEntry};
use crate::clock::{ClockState, GameClock};
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::game::{Game, GameState};
use crate::roster::{Player, PlayerId, Roster};
use crate::stats::StatsTable;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const SAVE_VERSION: u32 = 1;
pub const STATE_KEY: &str = "lacrosseGameState";

/// Durable key-value storage for saved games.
pub trait SnapshotStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, payload: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GameError::Persistence(format!("read {} failed: {e}", path.display()))),
        }
    }

    /// Writes a sibling temp file first and renames it over the target, so a
    /// crash mid-write never leaves a truncated save behind.
    fn write(&mut self, key: &str, payload: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            GameError::Persistence(format!("create dir {} failed: {e}", self.dir.display()))
        })?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, payload)
            .map_err(|e| GameError::Persistence(format!("write {} failed: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| GameError::Persistence(format!("replace {} failed: {e}", path.display())))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, payload: &str) -> Result<()> {
        self.entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// On-disk shape of a game. Undo history is not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub version: u32,
    pub roster: Vec<Player>,
    pub on_field: Vec<PlayerId>,
    pub on_bench: Vec<PlayerId>,
    pub player_stats: StatsTable,
    pub time_left: u32,
    pub current_quarter: u8,
    /// Derived from `clock_state`; a payload where they disagree is rejected.
    pub is_paused: bool,
    pub is_running: bool,
    pub clock_state: ClockState,
    pub score: u32,
    pub activity_log: Vec<LogEntry>,
}

impl From<&GameState> for SavedGame {
    fn from(state: &GameState) -> Self {
        let clock = state.clock();
        Self {
            version: SAVE_VERSION,
            roster: state.roster().iter().cloned().collect(),
            on_field: state.on_field().to_vec(),
            on_bench: state.on_bench().to_vec(),
            player_stats: state.stats().clone(),
            time_left: clock.time_left(),
            current_quarter: clock.quarter(),
            is_paused: clock.is_paused(),
            is_running: clock.is_running(),
            clock_state: clock.state(),
            score: state.score(),
            activity_log: state.log().to_vec(),
        }
    }
}

impl SavedGame {
    pub fn into_state(self, config: &GameConfig) -> Result<GameState> {
        if self.version != SAVE_VERSION {
            return Err(GameError::Validation(format!(
                "unsupported save version {} (expected {SAVE_VERSION})",
                self.version
            )));
        }
        let expected_flags = (
            self.clock_state == ClockState::Paused,
            matches!(self.clock_state, ClockState::Running | ClockState::Paused),
        );
        if (self.is_paused, self.is_running) != expected_flags {
            return Err(GameError::Validation(format!(
                "isPaused={} isRunning={} contradict clockState {}",
                self.is_paused,
                self.is_running,
                self.clock_state.label()
            )));
        }
        let roster = Roster::new(self.roster).map_err(|e| GameError::Validation(e.to_string()))?;
        let clock = GameClock::restore(config, self.time_left, self.current_quarter, self.clock_state)?;
        let stints = self.on_field.iter().map(|id| (id.clone(), 0)).collect();

        let state = GameState {
            roster,
            on_field: self.on_field,
            on_bench: self.on_bench,
            stats: self.player_stats,
            stints,
            clock,
            score: self.score,
            log: ActivityLog::from_entries(self.activity_log, config.log_capacity),
        };
        state.validate(config)?;
        Ok(state)
    }
}

/// Outcome of loading: always a usable game, plus the reason a fresh one was
/// substituted when the stored payload could not be used.
#[derive(Debug)]
pub struct Loaded {
    pub game: Game,
    pub warning: Option<GameError>,
}

pub fn save(store: &mut impl SnapshotStore, game: &Game) -> Result<()> {
    let saved = SavedGame::from(game.state());
    let payload = serde_json::to_string_pretty(&saved)
        .map_err(|e| GameError::Persistence(format!("serialize game failed: {e}")))?;
    store.write(STATE_KEY, &payload)?;
    debug!("saved game ({} bytes)", payload.len());
    Ok(())
}

pub fn load(store: &impl SnapshotStore, config: GameConfig, seed: Roster) -> Loaded {
    match restore(store, &config) {
        Ok(Some(state)) => match Game::from_state(config.clone(), seed.clone(), state) {
            Ok(game) => Loaded { game, warning: None },
            Err(e) => fresh(config, seed, e),
        },
        Ok(None) => {
            debug!("no saved game, starting fresh");
            Loaded {
                game: Game::new(config, seed),
                warning: None,
            }
        }
        Err(e) => fresh(config, seed, e),
    }
}

fn restore(store: &impl SnapshotStore, config: &GameConfig) -> Result<Option<GameState>> {
    let Some(payload) = store.read(STATE_KEY)? else {
        return Ok(None);
    };
    let value: serde_json::Value = serde_json::from_str(&payload)
        .map_err(|e| GameError::Persistence(format!("corrupt saved game: {e}")))?;
    let saved: SavedGame = serde_json::from_value(value)
        .map_err(|e| GameError::Validation(format!("malformed saved game: {e}")))?;
    saved.into_state(config).map(Some)
}

fn fresh(config: GameConfig, seed: Roster, warning: GameError) -> Loaded {
    warn!("could not load saved game, creating a fresh game state: {warning}");
    Loaded {
        game: Game::new(config, seed),
        warning: Some(warning),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Zone;

    fn id(s: &str) -> PlayerId {
        PlayerId::from(s)
    }

    fn played_game() -> Game {
        let mut game = Game::new(GameConfig::default(), Roster::seed());
        for skater in ["player-callum", "player-ethan", "player-oliver", "player-abraham"] {
            game.toggle(&id(skater)).unwrap();
        }
        game.start_clock().unwrap();
        for _ in 0..42 {
            game.tick();
        }
        game.record_goal(&id("player-ethan")).unwrap();
        game
    }

    #[test]
    fn save_then_load_round_trips_the_game() {
        let game = played_game();
        let mut store = MemoryStore::new();
        save(&mut store, &game).unwrap();

        let loaded = load(&store, GameConfig::default(), Roster::seed());
        assert!(loaded.warning.is_none());
        let restored = loaded.game;
        assert_eq!(restored.on_field(), game.on_field());
        assert_eq!(restored.on_bench(), game.on_bench());
        assert_eq!(restored.state().stats(), game.state().stats());
        assert_eq!(restored.score(), 1);
        assert_eq!(restored.clock().quarter(), game.clock().quarter());
        assert_eq!(restored.clock().time_left(), 558);
        assert_eq!(restored.log(), game.log());
        assert!(!restored.can_undo());
    }

    #[test]
    fn running_clock_comes_back_paused() {
        let game = played_game();
        let mut store = MemoryStore::new();
        save(&mut store, &game).unwrap();

        let restored = load(&store, GameConfig::default(), Roster::seed()).game;
        assert_eq!(restored.clock().state(), ClockState::Paused);
    }

    #[test]
    fn wire_format_uses_camel_case_fields() {
        let mut store = MemoryStore::new();
        save(&mut store, &played_game()).unwrap();
        let payload = store.read(STATE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(value["version"], SAVE_VERSION);
        assert_eq!(value["currentQuarter"], 1);
        assert_eq!(value["timeLeft"], 558);
        assert_eq!(value["isPaused"], false);
        assert_eq!(value["isRunning"], true);
        assert_eq!(value["score"], 1);
        assert_eq!(value["playerStats"]["player-ethan"]["goals"], 1);
        assert_eq!(value["playerStats"]["player-ethan"]["totalFieldTime"], 42);
        assert_eq!(value["onField"][0], "player-ben");
        assert_eq!(value["activityLog"][0]["type"], "goal");
    }

    #[test]
    fn missing_payload_starts_fresh_without_warning() {
        let loaded = load(&MemoryStore::new(), GameConfig::default(), Roster::seed());
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.game.field_count(), 0);
    }

    #[test]
    fn corrupt_json_falls_back_with_persistence_warning() {
        let mut store = MemoryStore::new();
        store.write(STATE_KEY, "{not json").unwrap();
        let loaded = load(&store, GameConfig::default(), Roster::seed());
        assert!(matches!(loaded.warning, Some(GameError::Persistence(_))));
        assert_eq!(loaded.game.roster().len(), 9);
    }

    #[test]
    fn wrong_shape_falls_back_with_validation_warning() {
        let mut store = MemoryStore::new();
        store.write(STATE_KEY, r#"{"onField": 3}"#).unwrap();
        let loaded = load(&store, GameConfig::default(), Roster::seed());
        assert!(matches!(loaded.warning, Some(GameError::Validation(_))));
    }

    #[test]
    fn unknown_player_ids_are_rejected() {
        let mut saved = SavedGame::from(played_game().state());
        saved.on_bench.push(id("player-stranger"));
        let mut store = MemoryStore::new();
        store
            .write(STATE_KEY, &serde_json::to_string(&saved).unwrap())
            .unwrap();

        let loaded = load(&store, GameConfig::default(), Roster::seed());
        assert!(matches!(loaded.warning, Some(GameError::Validation(_))));
        assert_eq!(loaded.game.zone_of(&id("player-callum")), Some(Zone::Bench));
    }

    #[test]
    fn overfull_field_and_bad_version_are_rejected() {
        let config = GameConfig::default();
        let mut saved = SavedGame::from(played_game().state());
        let extra = saved.on_bench.remove(0);
        saved.on_field.push(extra);
        assert!(matches!(saved.into_state(&config), Err(GameError::Validation(_))));

        let mut saved = SavedGame::from(played_game().state());
        saved.version = 99;
        assert!(matches!(saved.into_state(&config), Err(GameError::Validation(_))));
    }

    #[test]
    fn clock_flags_must_agree_with_clock_state() {
        let config = GameConfig::default();
        let mut saved = SavedGame::from(played_game().state());
        saved.is_paused = true;
        assert!(matches!(saved.into_state(&config), Err(GameError::Validation(_))));

        let mut saved = SavedGame::from(played_game().state());
        saved.clock_state = ClockState::Finished;
        assert!(matches!(saved.into_state(&config), Err(GameError::Validation(_))));
    }

    #[test]
    fn invalid_saved_roster_is_a_validation_error() {
        let mut saved = SavedGame::from(played_game().state());
        let dup = saved.roster[1].clone();
        saved.roster.push(dup);
        assert!(matches!(
            saved.into_state(&GameConfig::default()),
            Err(GameError::Validation(_))
        ));
    }

    #[test]
    fn shorter_quarter_setting_keeps_the_saved_game() {
        let mut store = MemoryStore::new();
        save(&mut store, &played_game()).unwrap();

        let config = GameConfig {
            quarter_length: 300,
            ..GameConfig::default()
        };
        let loaded = load(&store, config, Roster::seed());
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.game.score(), 1);
        assert_eq!(loaded.game.clock().time_left(), 300);
        assert_eq!(loaded.game.clock().state(), ClockState::Paused);
    }

    #[test]
    fn file_store_round_trips_and_reports_absence() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.read(STATE_KEY).unwrap(), None);

        let game = played_game();
        save(&mut store, &game).unwrap();
        assert!(store.path_for(STATE_KEY).exists());

        let restored = load(&store, GameConfig::default(), Roster::seed()).game;
        assert_eq!(restored.score(), game.score());
        assert_eq!(restored.on_field(), game.on_field());
    }

    struct BrokenStore;

    impl SnapshotStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(GameError::Persistence("disk unplugged".into()))
        }

        fn write(&mut self, _key: &str, _payload: &str) -> Result<()> {
            Err(GameError::Persistence("quota exceeded".into()))
        }
    }

    #[test]
    fn storage_failures_surface_as_persistence_errors() {
        let loaded = load(&BrokenStore, GameConfig::default(), Roster::seed());
        assert!(matches!(loaded.warning, Some(GameError::Persistence(_))));

        let err = save(&mut BrokenStore, &loaded.game).unwrap_err();
        assert_eq!(err, GameError::Persistence("quota exceeded".into()));
    }
}
