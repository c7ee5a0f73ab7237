use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub number: u16,
    #[serde(default)]
    is_goalie: bool,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, number: u16) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
            number,
            is_goalie: false,
        }
    }

    pub fn goalie(id: impl Into<String>, name: impl Into<String>, number: u16) -> Self {
        Self {
            is_goalie: true,
            ..Self::new(id, name, number)
        }
    }

    /// Fixed when the player is created; there is no way to flip it afterwards.
    pub fn is_goalie(&self) -> bool {
        self.is_goalie
    }

    /// "Name #07", as shown on the roster cards.
    pub fn label(&self) -> String {
        format!("{} #{:02}", self.name, self.number)
    }
}

/// The players available for a session, in their seed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Player>", into = "Vec<Player>")]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Result<Self> {
        if players.is_empty() {
            return Err(GameError::InvalidRoster("roster is empty".into()));
        }

        let mut ids = HashSet::new();
        let mut numbers = HashSet::new();
        let mut goalies = 0;
        for player in &players {
            if player.id.as_str().trim().is_empty() {
                return Err(GameError::InvalidRoster(format!(
                    "player '{}' has an empty id",
                    player.name
                )));
            }
            if !ids.insert(player.id.clone()) {
                return Err(GameError::InvalidRoster(format!("duplicate player id {}", player.id)));
            }
            if player.number == 0 {
                return Err(GameError::InvalidRoster(format!(
                    "{} needs a positive jersey number",
                    player.name
                )));
            }
            if !numbers.insert(player.number) {
                return Err(GameError::InvalidRoster(format!(
                    "jersey #{} is used twice",
                    player.number
                )));
            }
            if player.is_goalie {
                goalies += 1;
            }
        }
        if goalies > 1 {
            return Err(GameError::InvalidRoster(format!(
                "roster has {goalies} goalies, at most one is allowed"
            )));
        }

        Ok(Self { players })
    }

    /// Parse a JSON array of players, e.g. from a roster file on disk.
    pub fn from_json(json: &str) -> Result<Self> {
        let players: Vec<Player> = serde_json::from_str(json)
            .map_err(|e| GameError::InvalidRoster(format!("not valid JSON: {e}")))?;
        Self::new(players)
    }

    /// The built-in team sheet used for fresh games and resets.
    pub fn seed() -> Self {
        Self {
            players: vec![
                Player::new("player-callum", "Callum", 7),
                Player::new("player-ethan", "Ethan", 10),
                Player::new("player-oliver", "Oliver", 13),
                Player::new("player-abraham", "Abraham", 16),
                Player::new("player-henry", "Henry", 2),
                Player::new("player-henryb", "Henry B", 4),
                Player::new("player-arlo", "Arlo", 9),
                Player::new("player-newkid", "New Kid", 18),
                Player::goalie("player-ben", "Goalie Ben", 1),
            ],
        }
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn goalie(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_goalie)
    }

    pub fn is_goalie(&self, id: &PlayerId) -> bool {
        self.get(id).is_some_and(Player::is_goalie)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// A copy of the roster without `id`. Removing the last player is refused.
    pub fn without(&self, id: &PlayerId) -> Result<Self> {
        if !self.contains(id) {
            return Err(GameError::UnknownPlayer(id.clone()));
        }
        let players: Vec<Player> = self.players.iter().filter(|p| &p.id != id).cloned().collect();
        Self::new(players)
    }
}

impl TryFrom<Vec<Player>> for Roster {
    type Error = GameError;

    fn try_from(players: Vec<Player>) -> Result<Self> {
        Self::new(players)
    }
}

impl From<Roster> for Vec<Player> {
    fn from(roster: Roster) -> Self {
        roster.players
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_roster_has_one_goalie_and_eight_skaters() {
        let roster = Roster::seed();
        assert_eq!(roster.len(), 9);
        assert_eq!(roster.goalie().map(|p| p.name.as_str()), Some("Goalie Ben"));
        assert_eq!(roster.iter().filter(|p| !p.is_goalie()).count(), 8);
        assert!(Roster::new(roster.iter().cloned().collect()).is_ok());
    }

    #[test]
    fn rejects_duplicate_ids_and_numbers() {
        let dup_id = Roster::new(vec![Player::new("a", "A", 1), Player::new("a", "B", 2)]);
        assert!(matches!(dup_id, Err(GameError::InvalidRoster(_))));

        let dup_number = Roster::new(vec![Player::new("a", "A", 3), Player::new("b", "B", 3)]);
        assert!(matches!(dup_number, Err(GameError::InvalidRoster(_))));
    }

    #[test]
    fn rejects_zero_jersey_and_second_goalie() {
        assert!(Roster::new(vec![Player::new("a", "A", 0)]).is_err());
        assert!(
            Roster::new(vec![Player::goalie("a", "A", 1), Player::goalie("b", "B", 2)]).is_err()
        );
    }

    #[test]
    fn parses_roster_json_with_optional_goalie_flag() {
        let json = r#"[
            {"id": "p-1", "name": "Ava", "number": 3},
            {"id": "p-2", "name": "Mia", "number": 1, "isGoalie": true}
        ]"#;
        let roster = Roster::from_json(json).expect("roster should parse");
        assert_eq!(roster.len(), 2);
        assert!(roster.is_goalie(&PlayerId::from("p-2")));
        assert!(!roster.is_goalie(&PlayerId::from("p-1")));
    }

    #[test]
    fn malformed_roster_json_is_an_invalid_roster() {
        let err = Roster::from_json("{").unwrap_err();
        assert!(matches!(err, GameError::InvalidRoster(_)));
        assert!(err.to_string().starts_with("Invalid roster: not valid JSON"));
    }

    #[test]
    fn without_drops_a_single_player() {
        let roster = Roster::seed();
        let smaller = roster.without(&PlayerId::from("player-arlo")).unwrap();
        assert_eq!(smaller.len(), 8);
        assert!(!smaller.contains(&PlayerId::from("player-arlo")));
        assert!(matches!(
            roster.without(&PlayerId::from("nobody")),
            Err(GameError::UnknownPlayer(_))
        ));

        let single = Roster::new(vec![Player::new("a", "A", 1)]).unwrap();
        let err = single.without(&PlayerId::from("a")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid roster: roster is empty");
    }

    #[test]
    fn label_pads_jersey_number() {
        assert_eq!(Player::new("x", "Arlo", 9).label(), "Arlo #09");
    }
}
