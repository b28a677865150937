//! Apple placement - spawns on a random free cell

use rand::Rng;

use super::location::Location;
use super::snake::Snake;

/// Pick a uniformly random cell in `[0, width) x [0, height)` that the snake
/// does not occupy.
///
/// Samples until it hits a free cell, so the board must have one. The config
/// check `start_length + score_ceiling <= width * height` guarantees that for
/// every snake a session can grow.
pub fn place_apple<R: Rng + ?Sized>(
    width: i32,
    height: i32,
    snake: &Snake,
    rng: &mut R,
) -> Location {
    loop {
        let candidate = Location::new(rng.gen_range(0..width), rng.gen_range(0..height));
        if !snake.occupies(&candidate) {
            return candidate;
        }
    }
}

/// Check if the head landed on the apple
pub fn is_apple_eaten(head: Location, apple: Location) -> bool {
    head == apple
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_apple_never_on_snake() {
        let snake = Snake::from_segments([
            Location::new(5, 5),
            Location::new(4, 5),
            Location::new(3, 5),
            Location::new(2, 5),
        ]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1_000 {
            let apple = place_apple(20, 20, &snake, &mut rng);
            assert!(!snake.occupies(&apple));
            assert!((0..20).contains(&apple.x));
            assert!((0..20).contains(&apple.y));
        }
    }

    #[test]
    fn test_finds_last_free_cell() {
        // 3x3 board with every cell but (1, 1) covered
        let cells: Vec<Location> = (0..3)
            .flat_map(|y| (0..3).map(move |x| Location::new(x, y)))
            .filter(|loc| *loc != Location::new(1, 1))
            .collect();
        let snake = Snake::from_segments(cells);
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(place_apple(3, 3, &snake, &mut rng), Location::new(1, 1));
    }

    #[test]
    fn test_is_apple_eaten() {
        assert!(is_apple_eaten(Location::new(2, 3), Location::new(2, 3)));
        assert!(!is_apple_eaten(Location::new(2, 3), Location::new(3, 2)));
    }
}
