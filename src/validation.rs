//! Input validation: nicknames and client-proposed heads

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::MoveCheckMode;
use crate::game::{Board, Location};

/// Maximum nickname length in characters
pub const MAX_NICKNAME_CHARS: usize = 20;

/// Characters a nickname may not contain
pub const FORBIDDEN_NICKNAME_CHARS: &[char] = &['<', '>', '/', '\\', '{', '}', '[', ']'];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NicknameError {
    #[error("nickname is empty")]
    Empty,

    #[error("nickname has {0} characters, at most 20 allowed")]
    TooLong(usize),

    #[error("nickname contains forbidden character {0:?}")]
    ForbiddenChar(char),
}

/// A nickname that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Nickname(String);

impl Nickname {
    pub fn parse(raw: &str) -> Result<Self, NicknameError> {
        let chars = raw.chars().count();
        if chars == 0 {
            return Err(NicknameError::Empty);
        }
        if chars > MAX_NICKNAME_CHARS {
            return Err(NicknameError::TooLong(chars));
        }
        if let Some(c) = raw.chars().find(|c| FORBIDDEN_NICKNAME_CHARS.contains(c)) {
            return Err(NicknameError::ForbiddenChar(c));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A proposed head the server refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("illegal move from {from} to {to}")]
pub struct IllegalMove {
    pub from: Location,
    pub to: Location,
}

/// Decides whether a client-proposed head is acceptable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCheck {
    /// Apply whatever the client sends
    Trusting,
    /// On the board and one orthogonal step from the current head
    Strict,
}

impl MoveCheck {
    pub fn check(
        &self,
        board: &Board,
        head: Location,
        proposed: Location,
    ) -> Result<(), IllegalMove> {
        match self {
            MoveCheck::Trusting => Ok(()),
            MoveCheck::Strict => {
                if board.contains(proposed) && board.is_step(head, proposed) {
                    Ok(())
                } else {
                    Err(IllegalMove { from: head, to: proposed })
                }
            }
        }
    }
}

impl From<MoveCheckMode> for MoveCheck {
    fn from(mode: MoveCheckMode) -> Self {
        match mode {
            MoveCheckMode::Strict => MoveCheck::Strict,
            MoveCheckMode::Trusting => MoveCheck::Trusting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;

    #[test]
    fn test_valid_nicknames() {
        assert!(Nickname::parse("a").is_ok());
        assert!(Nickname::parse("Player One").is_ok());
        assert!(Nickname::parse(&"x".repeat(20)).is_ok());
        // counted in characters, not bytes
        assert!(Nickname::parse(&"é".repeat(20)).is_ok());
    }

    #[test]
    fn test_invalid_nicknames() {
        assert_eq!(Nickname::parse(""), Err(NicknameError::Empty));
        assert_eq!(
            Nickname::parse(&"x".repeat(21)),
            Err(NicknameError::TooLong(21))
        );
        for bad in ["<b>", "a/b", "a\\b", "{x}", "[x]"] {
            assert!(
                matches!(Nickname::parse(bad), Err(NicknameError::ForbiddenChar(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_strict_check() {
        let board = Board::new(&BoardConfig::default());
        let head = Location::new(5, 5);

        assert!(MoveCheck::Strict.check(&board, head, Location::new(6, 5)).is_ok());
        assert_eq!(
            MoveCheck::Strict.check(&board, head, Location::new(9, 9)),
            Err(IllegalMove { from: head, to: Location::new(9, 9) })
        );
        assert!(MoveCheck::Strict
            .check(&board, Location::new(19, 0), Location::new(20, 0))
            .is_err());
        assert!(MoveCheck::Strict
            .check(&board, Location::new(19, 0), Location::new(0, 0))
            .is_ok());
    }

    #[test]
    fn test_trusting_accepts_anything() {
        let board = Board::new(&BoardConfig::default());
        assert!(MoveCheck::Trusting
            .check(&board, Location::new(5, 5), Location::new(-3, 42))
            .is_ok());
    }
}
