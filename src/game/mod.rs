//! Game rules: board geometry, snake movement, apples

pub mod apple;
pub mod board;
pub mod direction;
pub mod location;
pub mod snake;

pub use board::{Board, NewGame};
pub use direction::Direction;
pub use location::Location;
pub use snake::Snake;
