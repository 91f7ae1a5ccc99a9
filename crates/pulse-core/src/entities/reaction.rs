//! Reaction types and the per-pulse reaction counters

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Reaction a user can leave on a pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Love,
    Fire,
    Mindblown,
    Laugh,
    Sad,
    Angry,
}

impl ReactionType {
    pub const ALL: [ReactionType; 6] = [
        Self::Love,
        Self::Fire,
        Self::Mindblown,
        Self::Laugh,
        Self::Sad,
        Self::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Love => "love",
            Self::Fire => "fire",
            Self::Mindblown => "mindblown",
            Self::Laugh => "laugh",
            Self::Sad => "sad",
            Self::Angry => "angry",
        }
    }

    /// Counter column on the `pulses` table
    pub fn column(&self) -> &'static str {
        match self {
            Self::Love => "reactions_love",
            Self::Fire => "reactions_fire",
            Self::Mindblown => "reactions_mindblown",
            Self::Laugh => "reactions_laugh",
            Self::Sad => "reactions_sad",
            Self::Angry => "reactions_angry",
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DomainError::InvalidReactionType(s.to_string()))
    }
}

/// Denormalized per-type counters stored on a pulse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionCounts {
    pub love: i64,
    pub fire: i64,
    pub mindblown: i64,
    pub laugh: i64,
    pub sad: i64,
    pub angry: i64,
}

impl ReactionCounts {
    pub fn get(&self, kind: ReactionType) -> i64 {
        match kind {
            ReactionType::Love => self.love,
            ReactionType::Fire => self.fire,
            ReactionType::Mindblown => self.mindblown,
            ReactionType::Laugh => self.laugh,
            ReactionType::Sad => self.sad,
            ReactionType::Angry => self.angry,
        }
    }

    pub fn total(&self) -> i64 {
        ReactionType::ALL.iter().map(|k| self.get(*k)).sum()
    }

    /// Every type keyed by name, zeros included
    pub fn to_map(&self) -> BTreeMap<&'static str, i64> {
        ReactionType::ALL
            .iter()
            .map(|k| (k.as_str(), self.get(*k)))
            .collect()
    }
}

/// What a toggle did to the caller's reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    Switched { from: ReactionType },
}

/// Result of toggling a reaction: fresh counters and the caller's reaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionToggle {
    pub counts: ReactionCounts,
    pub total: i64,
    pub user_reaction: Option<ReactionType>,
    pub outcome: ToggleOutcome,
}

impl ReactionToggle {
    /// Only a brand-new reaction notifies the author
    pub fn is_new_reaction(&self) -> bool {
        self.outcome == ToggleOutcome::Added
    }
}

/// Decide the toggle outcome from the caller's existing reaction
pub fn resolve_toggle(existing: Option<ReactionType>, requested: ReactionType) -> ToggleOutcome {
    match existing {
        None => ToggleOutcome::Added,
        Some(current) if current == requested => ToggleOutcome::Removed,
        Some(current) => ToggleOutcome::Switched { from: current },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reaction_type() {
        assert_eq!("mindblown".parse::<ReactionType>().unwrap(), ReactionType::Mindblown);
        assert!(matches!(
            "like".parse::<ReactionType>(),
            Err(DomainError::InvalidReactionType(_))
        ));
        assert!("Love".parse::<ReactionType>().is_err());
    }

    #[test]
    fn test_counts_map_has_every_type() {
        let counts = ReactionCounts {
            love: 2,
            sad: 1,
            ..Default::default()
        };
        let map = counts.to_map();
        assert_eq!(map.len(), 6);
        assert_eq!(map["love"], 2);
        assert_eq!(map["angry"], 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_resolve_toggle() {
        assert_eq!(resolve_toggle(None, ReactionType::Fire), ToggleOutcome::Added);
        assert_eq!(
            resolve_toggle(Some(ReactionType::Fire), ReactionType::Fire),
            ToggleOutcome::Removed
        );
        assert_eq!(
            resolve_toggle(Some(ReactionType::Love), ReactionType::Fire),
            ToggleOutcome::Switched {
                from: ReactionType::Love
            }
        );
    }

    #[test]
    fn test_columns_are_distinct() {
        let mut columns: Vec<_> = ReactionType::ALL.iter().map(ReactionType::column).collect();
        columns.dedup();
        assert_eq!(columns.len(), 6);
    }
}
