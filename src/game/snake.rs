//! Snake body and the move/collision rules that act on it

use std::collections::VecDeque;

use serde::{Serialize, Serializer};

use super::location::Location;

/// A snake on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// Snake body segments (head is front, tail is back)
    body: VecDeque<Location>,
}

impl Snake {
    /// Build a snake from its segments, head first.
    ///
    /// # Panics
    /// If `segments` is empty.
    pub fn from_segments(segments: impl IntoIterator<Item = Location>) -> Self {
        let body: VecDeque<Location> = segments.into_iter().collect();
        assert!(!body.is_empty(), "Snake must have a head");
        Self { body }
    }

    /// Get the snake's head location
    pub fn head(&self) -> Location {
        self.body[0]
    }

    /// Get all body locations, head first
    pub fn body(&self) -> &VecDeque<Location> {
        &self.body
    }

    /// Number of segments, including a pending growth duplicate
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Whether any segment sits on `loc`
    pub fn occupies(&self, loc: &Location) -> bool {
        self.body.contains(loc)
    }

    /// Prepend `new_head` and drop the last segment.
    ///
    /// When a tail duplicate was queued by [`Snake::grow`], the duplicate
    /// absorbs the drop and the snake ends up one segment longer than before
    /// the growth was queued.
    pub fn apply_move(&mut self, new_head: Location) {
        self.body.push_front(new_head);
        self.body.pop_back();
    }

    /// Queue one segment of growth by duplicating the tail
    pub fn grow(&mut self) {
        if let Some(tail) = self.body.back().copied() {
            self.body.push_back(tail);
        }
    }

    /// True iff the head sits on any other segment
    pub fn detect_collision(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Segments as a vector, head first
    pub fn to_vec(&self) -> Vec<Location> {
        self.body.iter().copied().collect()
    }
}

/// Serialized as the list of `[x, y]` segments, head first
impl Serialize for Snake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.body.iter())
    }
}
