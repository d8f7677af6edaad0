use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Gem {
    White,
    Blue,
    Green,
    Red,
    Black,
    Gold,
}

impl Gem {
    /// Every gem kind, colored ones first, the wildcard last.
    pub const ALL: [Gem; 6] = [
        Gem::White,
        Gem::Blue,
        Gem::Green,
        Gem::Red,
        Gem::Black,
        Gem::Gold,
    ];

    /// The five gems that can appear in a cost or as a card bonus.
    pub const COLORED: [Gem; 5] = [Gem::White, Gem::Blue, Gem::Green, Gem::Red, Gem::Black];

    pub fn is_wildcard(&self) -> bool {
        *self == Gem::Gold
    }
}

impl fmt::Display for Gem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Gem::White => "White",
            Gem::Blue => "Blue",
            Gem::Green => "Green",
            Gem::Red => "Red",
            Gem::Black => "Black",
            Gem::Gold => "Gold",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown gem '{0}'")]
pub struct UnknownGem(pub String);

impl FromStr for Gem {
    type Err = UnknownGem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Gem::White),
            "blue" | "u" => Ok(Gem::Blue),
            "green" | "g" => Ok(Gem::Green),
            "red" | "r" => Ok(Gem::Red),
            "black" | "k" => Ok(Gem::Black),
            "gold" | "joker" => Ok(Gem::Gold),
            _ => Err(UnknownGem(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_short_forms() {
        assert_eq!("White".parse::<Gem>().unwrap(), Gem::White);
        assert_eq!("k".parse::<Gem>().unwrap(), Gem::Black);
        assert_eq!(" joker ".parse::<Gem>().unwrap(), Gem::Gold);
        assert_eq!(
            "purple".parse::<Gem>().unwrap_err(),
            UnknownGem("purple".into())
        );
    }

    #[test]
    fn gold_is_the_only_wildcard() {
        assert!(Gem::Gold.is_wildcard());
        assert!(Gem::COLORED.iter().all(|g| !g.is_wildcard()));
    }
}
