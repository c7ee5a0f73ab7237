use crate::roster::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub goals: u32,
    /// Whole seconds spent on the field while the clock was running.
    pub total_field_time: u32,
}

/// Cumulative goals and field time per player. Ordered by id so saves and
/// exports are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsTable {
    players: BTreeMap<PlayerId, PlayerStats>,
}

impl StatsTable {
    pub fn for_players<'a>(ids: impl IntoIterator<Item = &'a PlayerId>) -> Self {
        Self {
            players: ids.into_iter().map(|id| (id.clone(), PlayerStats::default())).collect(),
        }
    }

    pub fn get(&self, id: &PlayerId) -> PlayerStats {
        self.players.get(id).copied().unwrap_or_default()
    }

    pub fn entry(&mut self, id: &PlayerId) -> &mut PlayerStats {
        self.players.entry(id.clone()).or_default()
    }

    pub fn credit_goal(&mut self, id: &PlayerId) {
        self.entry(id).goals += 1;
    }

    pub fn credit_second(&mut self, id: &PlayerId) {
        let stats = self.entry(id);
        stats.total_field_time = stats.total_field_time.saturating_add(1);
    }

    pub fn remove(&mut self, id: &PlayerId) {
        self.players.remove(id);
    }

    pub fn total_goals(&self) -> u32 {
        self.players.values().map(|s| s.goals).sum()
    }

    pub fn ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &PlayerStats)> {
        self.players.iter()
    }
}

/// Seconds as "m:ss".
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_players_read_as_zero() {
        let table = StatsTable::default();
        assert_eq!(table.get(&PlayerId::from("ghost")), PlayerStats::default());
    }

    #[test]
    fn goals_and_seconds_accumulate_per_player() {
        let a = PlayerId::from("a");
        let b = PlayerId::from("b");
        let mut table = StatsTable::for_players([&a, &b]);
        table.credit_goal(&a);
        table.credit_goal(&a);
        table.credit_goal(&b);
        table.credit_second(&b);

        assert_eq!(table.get(&a), PlayerStats { goals: 2, total_field_time: 0 });
        assert_eq!(table.get(&b), PlayerStats { goals: 1, total_field_time: 1 });
        assert_eq!(table.total_goals(), 3);
    }

    #[test]
    fn serializes_as_an_id_keyed_object() {
        let a = PlayerId::from("a");
        let mut table = StatsTable::for_players([&a]);
        table.entry(&a).total_field_time = 75;
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"a":{"goals":0,"totalFieldTime":75}}"#);
    }

    #[test]
    fn clock_format_pads_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(600), "10:00");
    }
}
