use std::fmt;

use serde::{Deserialize, Serialize};

use super::bank::Funds;
use super::gem::Gem;

pub const NOBLE_VICTORY_POINTS: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Noble {
    pub id: NobleId,
    pub name: String,
    pub points: u8,
    /// Thresholds on bonus counts, not on tokens.
    pub requirement: Funds,
}

impl Noble {
    pub fn new(id: NobleId, name: impl Into<String>, requirement: Funds) -> Self {
        Self {
            id,
            name: name.into(),
            points: NOBLE_VICTORY_POINTS,
            requirement,
        }
    }

    /// Whether a player producing `production` bonuses qualifies.
    pub fn is_satisfied_by(&self, production: &Funds) -> bool {
        Gem::COLORED
            .iter()
            .all(|gem| production.get(*gem) >= self.requirement.get(*gem))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NobleId {
    id: String,
}

impl NobleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for NobleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_is_checked_against_every_color() {
        let noble = Noble::new(NobleId::new("R-08"), "noble", Funds::new(0, 4, 0, 0, 4, 0));

        assert!(noble.is_satisfied_by(&Funds::new(0, 4, 0, 0, 4, 0)));
        assert!(noble.is_satisfied_by(&Funds::new(1, 5, 0, 0, 4, 0)));
        assert!(!noble.is_satisfied_by(&Funds::new(0, 4, 0, 0, 3, 0)));
        assert_eq!(noble.points, NOBLE_VICTORY_POINTS);
    }
}
