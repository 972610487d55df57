//! The bundled games
//!
//! Each game is a `Game` impl: a collision table, a control scheme, spawners
//! and terminal conditions over the shared simulation.

pub mod duel;
pub mod hoops;
pub mod moto;
pub mod pong;
pub mod runner;
pub mod zones;

use std::fmt;
use std::str::FromStr;

pub use duel::Duel;
pub use hoops::Hoops;
pub use moto::Moto;
pub use pong::Pong;
pub use runner::Runner;
pub use zones::Zones;

use crate::error::Error;

/// Which bundled game to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Zones,
    Runner,
    Hoops,
    Moto,
    Pong,
    Duel,
}

impl GameKind {
    pub const ALL: [GameKind; 6] = [
        GameKind::Zones,
        GameKind::Runner,
        GameKind::Hoops,
        GameKind::Moto,
        GameKind::Pong,
        GameKind::Duel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Zones => zones::NAME,
            GameKind::Runner => runner::NAME,
            GameKind::Hoops => hoops::NAME,
            GameKind::Moto => moto::NAME,
            GameKind::Pong => pong::NAME,
            GameKind::Duel => duel::NAME,
        }
    }
}

impl FromStr for GameKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| Error::UnknownGame(s.to_string()))
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_game_names() {
        assert_eq!("zones".parse::<GameKind>().unwrap(), GameKind::Zones);
        assert_eq!(" Runner ".parse::<GameKind>().unwrap(), GameKind::Runner);
        assert_eq!("PONG".parse::<GameKind>().unwrap(), GameKind::Pong);
        assert_eq!("duel".parse::<GameKind>().unwrap(), GameKind::Duel);
        for kind in GameKind::ALL {
            assert_eq!(kind.to_string().parse::<GameKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_game() {
        let err = "pinball".parse::<GameKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownGame(ref name) if name == "pinball"));
    }
}
