use bracket_geometry::prelude::{Point, Rect};

use super::Floor;
use crate::rng::Dice;

/// Produces a fresh floor layout with spawn and exit set.
pub trait Carver {
    fn carve(&mut self, width: i32, height: i32, dice: &mut dyn Dice) -> Floor;
}

/// Rectangular rooms chained by L-shaped corridors. The player starts in the
/// first room and the exit sits in the last one.
#[derive(Clone, Debug)]
pub struct RoomsAndCorridors {
    pub max_rooms: usize,
    pub room_width: (i32, i32),
    pub room_height: (i32, i32),
}

impl Default for RoomsAndCorridors {
    fn default() -> Self {
        Self {
            max_rooms: 24,
            room_width: (6, 14),
            room_height: (5, 10),
        }
    }
}

impl Carver for RoomsAndCorridors {
    fn carve(&mut self, width: i32, height: i32, dice: &mut dyn Dice) -> Floor {
        let mut rooms: Vec<Rect> = Vec::new();

        for _ in 0..self.max_rooms {
            let room_w = dice.roll(self.room_width.0, self.room_width.1);
            let room_h = dice.roll(self.room_height.0, self.room_height.1);
            let x_max = width - room_w - 2;
            let y_max = height - room_h - 2;
            if x_max <= 1 || y_max <= 1 {
                continue;
            }

            let candidate = Rect::with_size(dice.roll(1, x_max), dice.roll(1, y_max), room_w, room_h);
            if rooms.iter().any(|room| room.intersect(&candidate)) {
                continue;
            }
            rooms.push(candidate);
        }

        if rooms.len() < 2 {
            return OpenArena.carve(width, height, dice);
        }

        let mut floor = Floor::solid(width, height);
        for room in &rooms {
            room.for_each(|pt| floor.paint_floor(pt));
        }
        for pair in rooms.windows(2) {
            for pt in corridor_path(pair[0].center(), pair[1].center()) {
                floor.paint_floor(pt);
            }
        }
        floor.seal_border();

        floor.set_spawn(rooms[0].center());
        let last = rooms[rooms.len() - 1];
        floor.set_exit(Point::new(last.x2 - 1, last.y2 - 1));
        floor
    }
}

/// A single walled hall with no randomness. Spawn in the middle, exit in the
/// bottom-right corner.
#[derive(Copy, Clone, Debug, Default)]
pub struct OpenArena;

impl Carver for OpenArena {
    fn carve(&mut self, width: i32, height: i32, _dice: &mut dyn Dice) -> Floor {
        let mut floor = Floor::solid(width, height);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                floor.paint_floor(Point::new(x, y));
            }
        }
        floor.set_spawn(Point::new(width / 2, height / 2));
        floor.set_exit(Point::new(width - 2, height - 2));
        floor
    }
}

fn corridor_path(start: Point, end: Point) -> Vec<Point> {
    let mut path = vec![start];
    let mut cursor = start;

    while cursor.x != end.x {
        cursor.x += if end.x > cursor.x { 1 } else { -1 };
        path.push(cursor);
    }
    while cursor.y != end.y {
        cursor.y += if end.y > cursor.y { 1 } else { -1 };
        path.push(cursor);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Grid;
    use crate::rng::GameRng;

    #[test]
    fn corridor_is_contiguous() {
        let path = corridor_path(Point::new(2, 2), Point::new(5, 7));
        assert_eq!(path.first(), Some(&Point::new(2, 2)));
        assert_eq!(path.last(), Some(&Point::new(5, 7)));
        for pair in path.windows(2) {
            let step = (pair[1].x - pair[0].x).abs() + (pair[1].y - pair[0].y).abs();
            assert_eq!(step, 1);
        }
    }

    #[test]
    fn arena_layout() {
        let mut dice = GameRng::seeded(1);
        let floor = OpenArena.carve(20, 12, &mut dice);
        assert_eq!(floor.spawn_point(), Point::new(10, 6));
        assert!(floor.is_exit(Point::new(18, 10)));
        assert!(!floor.is_walkable(Point::new(0, 0)));
        assert!(floor.is_walkable(Point::new(1, 1)));
    }

    #[test]
    fn rooms_keep_border_sealed_and_spawn_open() {
        for seed in 0..20 {
            let mut dice = GameRng::seeded(seed);
            let floor = RoomsAndCorridors::default().carve(80, 36, &mut dice);
            assert!(floor.is_walkable(floor.spawn_point()));
            assert!(floor.is_exit(floor.exit()));
            assert_ne!(floor.spawn_point(), floor.exit());
            for x in 0..80 {
                assert!(!floor.is_walkable(Point::new(x, 0)));
                assert!(!floor.is_walkable(Point::new(x, 35)));
            }
        }
    }
}
