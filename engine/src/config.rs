use crate::activity::DEFAULT_LOG_CAPACITY;
use crate::history::DEFAULT_HISTORY_DEPTH;
use serde::{Deserialize, Serialize};

/// Tunables for a game. Every field falls back to its default when missing
/// from a serialized config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Skaters allowed on the field at once. The goalie is not counted.
    pub field_cap: usize,
    /// Seconds per quarter.
    pub quarter_length: u32,
    pub quarters: u8,
    pub log_capacity: usize,
    pub history_depth: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_cap: 4,
            quarter_length: 600,
            quarters: 4,
            log_capacity: DEFAULT_LOG_CAPACITY,
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

impl GameConfig {
    /// Clamp values that would make the game unplayable.
    pub fn sanitized(mut self) -> Self {
        self.field_cap = self.field_cap.max(1);
        self.quarter_length = self.quarter_length.max(1);
        self.quarters = self.quarters.max(1);
        self.log_capacity = self.log_capacity.max(1);
        self.history_depth = self.history_depth.max(1);
        self
    }
}
