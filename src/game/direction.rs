//! Direction enum sent to the client as descriptive metadata

use serde::{Deserialize, Serialize};

/// Heading of the snake.
///
/// The server never derives movement from it: the client proposes each new
/// head and the server only checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Left,
    Up,
    #[default]
    Right,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Direction::Right).unwrap(), r#""RIGHT""#);
        assert_eq!(
            serde_json::from_str::<Direction>(r#""UP""#).unwrap(),
            Direction::Up
        );
    }

    #[test]
    fn test_default_is_right() {
        assert_eq!(Direction::default(), Direction::Right);
    }
}
