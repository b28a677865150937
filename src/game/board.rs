//! Board geometry and the rules that need it

use rand::Rng;

use super::apple::place_apple;
use super::direction::Direction;
use super::location::Location;
use super::snake::Snake;
use crate::config::BoardConfig;

/// Fixed board dimensions plus the starting position of every run
#[derive(Debug, Clone)]
pub struct Board {
    width: i32,
    height: i32,
    start_head: Location,
    start_length: usize,
}

/// Everything a fresh run starts from
#[derive(Debug, Clone, PartialEq)]
pub struct NewGame {
    pub snake: Snake,
    pub direction: Direction,
    pub board_size: [i32; 2],
    pub apple: Location,
    pub score: u32,
}

impl Board {
    /// Build a board from validated configuration
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            start_head: Location::from(config.start_head),
            start_length: config.start_length,
        }
    }

    /// `[width, height]` as sent to the client
    pub fn size(&self) -> [i32; 2] {
        [self.width, self.height]
    }

    /// Horizontal snake heading right, head at the configured start cell,
    /// with an apple on a free cell
    pub fn new_game<R: Rng + ?Sized>(&self, rng: &mut R) -> NewGame {
        let snake = Snake::from_segments(
            (0..self.start_length as i32)
                .map(|i| Location::new(self.start_head.x - i, self.start_head.y)),
        );
        let apple = self.place_apple(&snake, rng);

        NewGame {
            snake,
            direction: Direction::Right,
            board_size: self.size(),
            apple,
            score: 0,
        }
    }

    /// Random free cell for the next apple
    pub fn place_apple<R: Rng + ?Sized>(&self, snake: &Snake, rng: &mut R) -> Location {
        place_apple(self.width, self.height, snake, rng)
    }

    /// Queue one segment of growth, then move the apple to a cell the grown
    /// snake does not occupy
    pub fn grow_and_relocate_apple<R: Rng + ?Sized>(
        &self,
        snake: &mut Snake,
        rng: &mut R,
    ) -> Location {
        snake.grow();
        self.place_apple(snake, rng)
    }

    /// Whether `loc` lies on the board
    pub fn contains(&self, loc: Location) -> bool {
        (0..self.width).contains(&loc.x) && (0..self.height).contains(&loc.y)
    }

    /// Whether `to` is one orthogonal step from `from`, wrapping at the edges
    pub fn is_step(&self, from: Location, to: Location) -> bool {
        let dx = (to.x - from.x).rem_euclid(self.width);
        let dy = (to.y - from.y).rem_euclid(self.height);

        let one_x = dx == 1 || dx == self.width - 1;
        let one_y = dy == 1 || dy == self.height - 1;

        from != to && ((one_x && dy == 0) || (one_y && dx == 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board() -> Board {
        Board::new(&BoardConfig::default())
    }

    #[test]
    fn test_new_game() {
        let mut rng = StdRng::seed_from_u64(1);
        let game = board().new_game(&mut rng);

        assert_eq!(
            game.snake.to_vec(),
            vec![
                Location::new(5, 5),
                Location::new(4, 5),
                Location::new(3, 5),
                Location::new(2, 5),
            ]
        );
        assert_eq!(game.direction, Direction::Right);
        assert_eq!(game.score, 0);
        assert_eq!(game.board_size, [20, 20]);
        assert!(!game.snake.occupies(&game.apple));
        assert!(board().contains(game.apple));
    }

    #[test]
    fn test_grow_and_relocate() {
        let board = board();
        let mut rng = StdRng::seed_from_u64(9);
        let mut game = board.new_game(&mut rng);

        let apple = board.grow_and_relocate_apple(&mut game.snake, &mut rng);
        assert_eq!(game.snake.len(), 5);
        assert!(!game.snake.occupies(&apple));

        game.snake.apply_move(Location::new(6, 5));
        assert_eq!(game.snake.len(), 5);
    }

    #[test]
    fn test_contains() {
        let board = board();
        assert!(board.contains(Location::new(0, 0)));
        assert!(board.contains(Location::new(19, 19)));
        assert!(!board.contains(Location::new(20, 0)));
        assert!(!board.contains(Location::new(0, -1)));
    }

    #[test]
    fn test_is_step() {
        let board = board();
        let head = Location::new(5, 5);

        assert!(board.is_step(head, Location::new(6, 5)));
        assert!(board.is_step(head, Location::new(4, 5)));
        assert!(board.is_step(head, Location::new(5, 4)));
        assert!(board.is_step(head, Location::new(5, 6)));

        assert!(!board.is_step(head, head));
        assert!(!board.is_step(head, Location::new(6, 6)));
        assert!(!board.is_step(head, Location::new(7, 5)));
    }

    #[test]
    fn test_is_step_wraps_at_edges() {
        let board = board();
        assert!(board.is_step(Location::new(19, 3), Location::new(0, 3)));
        assert!(board.is_step(Location::new(0, 3), Location::new(19, 3)));
        assert!(board.is_step(Location::new(4, 0), Location::new(4, 19)));
        assert!(!board.is_step(Location::new(19, 3), Location::new(1, 3)));
    }
}
