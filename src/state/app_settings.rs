use lax_engine::GameConfig;
use lax_engine::export::DEFAULT_EXPORT_FILE;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "laxtui";
const SETTINGS_FILE: &str = "settings.json";

/// Optional `settings.json` in the state directory. Environment variables win
/// over anything set here.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SettingsFile {
    game: Option<GameConfig>,
    roster: Option<PathBuf>,
    export_path: Option<PathBuf>,
    log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub state_dir: PathBuf,
    pub roster_path: Option<PathBuf>,
    pub export_path: PathBuf,
    pub game: GameConfig,
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let state_dir = var("LAXTUI_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_state_dir(&var));
        let file = read_settings_file(&state_dir);

        let mut game = file.game.unwrap_or_default();
        if let Some(cap) = var("LAXTUI_FIELD_CAP").and_then(|v| v.trim().parse().ok()) {
            game.field_cap = cap;
        }
        if let Some(secs) = var("LAXTUI_QUARTER_SECS").and_then(|v| v.trim().parse().ok()) {
            game.quarter_length = secs;
        }

        let log_level = var("LAXTUI_LOG")
            .or(file.log_level)
            .and_then(|v| v.trim().parse::<LevelFilter>().ok());

        Self {
            full_screen: false,
            log_level,
            roster_path: var("LAXTUI_ROSTER_JSON").map(PathBuf::from).or(file.roster),
            export_path: var("LAXTUI_EXPORT_PATH")
                .map(PathBuf::from)
                .or(file.export_path)
                .unwrap_or_else(|| state_dir.join(DEFAULT_EXPORT_FILE)),
            game: game.sanitized(),
            state_dir,
        }
    }
}

fn default_state_dir(var: &impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(config_dir) = var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_dir).join(APP_DIR);
    }
    if let Some(home) = var("HOME") {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }
    PathBuf::from(".").join(APP_DIR)
}

fn read_settings_file(state_dir: &Path) -> SettingsFile {
    let path = state_dir.join(SETTINGS_FILE);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return SettingsFile::default();
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        log::warn!("ignoring {}: {e}", path.display());
        SettingsFile::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn state_dir_follows_xdg_then_home() {
        let s = settings(&[("XDG_CONFIG_HOME", "/xdg"), ("HOME", "/home/coach")]);
        assert_eq!(s.state_dir, PathBuf::from("/xdg/laxtui"));

        let s = settings(&[("XDG_CONFIG_HOME", "  "), ("HOME", "/home/coach")]);
        assert_eq!(s.state_dir, PathBuf::from("/home/coach/.config/laxtui"));
        assert_eq!(s.export_path, PathBuf::from("/home/coach/.config/laxtui/lacrosse_log.txt"));
    }

    #[test]
    fn explicit_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_path_buf();
        let s = settings(&[
            ("LAXTUI_STATE_DIR", dir.to_str().unwrap()),
            ("LAXTUI_FIELD_CAP", "6"),
            ("LAXTUI_QUARTER_SECS", "480"),
            ("LAXTUI_LOG", "debug"),
            ("LAXTUI_EXPORT_PATH", "/tmp/game.txt"),
            ("LAXTUI_ROSTER_JSON", "/tmp/roster.json"),
        ]);
        assert_eq!(s.state_dir, dir);
        assert_eq!(s.game.field_cap, 6);
        assert_eq!(s.game.quarter_length, 480);
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
        assert_eq!(s.export_path, PathBuf::from("/tmp/game.txt"));
        assert_eq!(s.roster_path, Some(PathBuf::from("/tmp/roster.json")));
    }

    #[test]
    fn garbage_numbers_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(&[
            ("LAXTUI_STATE_DIR", dir.path().to_str().unwrap()),
            ("LAXTUI_FIELD_CAP", "lots"),
            ("LAXTUI_LOG", "chatty"),
        ]);
        assert_eq!(s.game.field_cap, 4);
        assert_eq!(s.log_level, None);
    }

    #[test]
    fn settings_file_is_read_from_state_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        std::fs::write(
            dir.join(SETTINGS_FILE),
            r#"{"game": {"fieldCap": 5, "quarterLength": 720}, "logLevel": "info"}"#,
        )
        .unwrap();
        let s = settings(&[("LAXTUI_STATE_DIR", dir.to_str().unwrap()), ("LAXTUI_FIELD_CAP", "3")]);
        assert_eq!(s.game.field_cap, 3);
        assert_eq!(s.game.quarter_length, 720);
        assert_eq!(s.log_level, Some(LevelFilter::Info));
    }
}
