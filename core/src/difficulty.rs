use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Built-in board presets.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn game_config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Easy => GameConfig::new_unchecked((8, 8), 10),
            Medium => GameConfig::new_unchecked((16, 16), 40),
            Hard => GameConfig::new_unchecked((16, 30), 99),
        }
    }

    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::UnknownDifficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_classic_boards() {
        assert_eq!(Difficulty::Easy.game_config(), GameConfig::new((8, 8), 10));
        assert_eq!(Difficulty::Medium.game_config(), GameConfig::new((16, 16), 40));
        assert_eq!(Difficulty::Hard.game_config(), GameConfig::new((16, 30), 99));

        for difficulty in Difficulty::ALL {
            let config = difficulty.game_config();
            assert!(config.mines < config.total_cells());
        }
    }

    #[test]
    fn names_round_trip() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.name().parse::<Difficulty>(), Ok(difficulty));
        }
        assert_eq!(" Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("expert".parse::<Difficulty>(), Err(GameError::UnknownDifficulty));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), r#""medium""#);
    }
}
