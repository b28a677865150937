//! Location struct for grid positions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// A cell on the game grid, 0-indexed from the top-left corner.
///
/// On the wire a location is a two-element array `[x, y]`, which is what the
/// browser client stores its snake segments as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    /// Create a new location
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Location {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Location> for [i32; 2] {
    fn from(loc: Location) -> Self {
        [loc.x, loc.y]
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_pair() {
        let loc = Location::new(3, 7);
        assert_eq!(serde_json::to_string(&loc).unwrap(), "[3,7]");

        let parsed: Location = serde_json::from_str("[12,0]").unwrap();
        assert_eq!(parsed, Location::new(12, 0));
    }

    #[test]
    fn test_rejects_malformed_pair() {
        assert!(serde_json::from_str::<Location>("[1]").is_err());
        assert!(serde_json::from_str::<Location>(r#"{"x":1,"y":2}"#).is_err());
    }
}
