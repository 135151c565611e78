use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0:?} is not one of left, right, up or down")]
pub struct ParseDirectionError(pub String);

impl Direction {
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();

        Self::iter()
            .find(|direction| direction.name() == normalised)
            .ok_or(ParseDirectionError(normalised))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_order_starts_with_left() {
        let order: Vec<_> = Direction::iter().collect();

        assert_eq!(
            order,
            [Direction::Left, Direction::Right, Direction::Up, Direction::Down]
        );
    }

    #[test]
    fn parse_is_case_and_whitespace_insensitive() {
        assert_eq!(" Up\n".parse(), Ok(Direction::Up));
        assert_eq!("DOWN".parse(), Ok(Direction::Down));
        assert_eq!(
            "left please".parse::<Direction>(),
            Err(ParseDirectionError("left please".to_owned()))
        );
    }

    #[test]
    fn display_matches_serde_name() {
        for direction in Direction::iter() {
            let json = serde_json::to_string(&direction).unwrap();
            assert_eq!(json, format!("\"{direction}\""));
        }
    }
}
