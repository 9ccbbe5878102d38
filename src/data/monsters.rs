use bracket_terminal::prelude::RGB;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

use crate::rng::Span;

/// Hostile families. Declaration order is the order of the first-floor roll.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumCount,
    Serialize,
    Deserialize,
)]
pub enum Species {
    Rat,
    Bear,
    Snake,
    Ghost,
    Crab,
}

/// How a species picks its step toward the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Gait {
    /// One axis per turn, chosen by coin.
    Axis,
    /// Strictly diagonal; holds still when aligned with the player.
    Diagonal,
    /// Diagonal and ignores walls.
    Phasing,
    /// Rides the player while attached, flees while recovering.
    Clinging,
}

/// Which neighbouring cells count as adjacent for an attack.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reach {
    Orthogonal,
    Surround,
}

impl Reach {
    pub fn touches(self, dx: i32, dy: i32) -> bool {
        let (ax, ay) = (dx.abs(), dy.abs());
        match self {
            Reach::Orthogonal => ax + ay == 1,
            Reach::Surround => ax.max(ay) == 1,
        }
    }
}

impl Species {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Species::Rat,
            1 => Species::Bear,
            2 => Species::Snake,
            3 => Species::Ghost,
            _ => Species::Crab,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn gait(self) -> Gait {
        match self {
            Species::Rat | Species::Bear => Gait::Axis,
            Species::Snake => Gait::Diagonal,
            Species::Ghost => Gait::Phasing,
            Species::Crab => Gait::Clinging,
        }
    }

    pub fn reach(self) -> Reach {
        match self {
            Species::Rat | Species::Bear | Species::Crab => Reach::Orthogonal,
            Species::Snake | Species::Ghost => Reach::Surround,
        }
    }

    /// Dies to any player strike, whatever its damage.
    pub fn is_fragile(self) -> bool {
        matches!(self, Species::Snake | Species::Crab)
    }

    pub fn template(self) -> MonsterTemplate {
        match self {
            Species::Rat => MonsterTemplate::new(
                self,
                'r',
                RGB::from_u8(255, 50, 50),
                Span::new(3, 3),
                Span::new(1, 1),
                Span::new(3, 7),
            ),
            Species::Bear => MonsterTemplate::new(
                self,
                'B',
                RGB::from_u8(139, 69, 19),
                Span::new(8, 12),
                Span::new(3, 5),
                Span::new(1, 3),
            ),
            Species::Snake => MonsterTemplate::new(
                self,
                'S',
                RGB::from_u8(60, 130, 60),
                Span::new(4, 6),
                Span::new(1, 1),
                Span::new(2, 4),
            ),
            Species::Ghost => MonsterTemplate::new(
                self,
                'g',
                RGB::from_u8(170, 170, 170),
                Span::new(5, 5),
                Span::new(1, 1),
                Span::new(1, 2),
            ),
            Species::Crab => MonsterTemplate::new(
                self,
                'C',
                RGB::from_u8(255, 140, 0),
                Span::new(4, 4),
                Span::new(1, 1),
                Span::new(1, 3),
            ),
        }
    }
}

/// Crab tint while it recovers from being shaken off.
pub fn fleeing_color() -> RGB {
    RGB::from_u8(200, 120, 40)
}

#[derive(Clone, Debug)]
pub struct MonsterTemplate {
    pub species: Species,
    pub glyph: char,
    pub color: RGB,
    pub health: Span,
    pub damage: Span,
    /// Head count when this family is the one picked for the first floor.
    pub first_floor: Span,
}

impl MonsterTemplate {
    fn new(
        species: Species,
        glyph: char,
        color: RGB,
        health: Span,
        damage: Span,
        first_floor: Span,
    ) -> Self {
        Self {
            species,
            glyph,
            color,
            health,
            damage,
            first_floor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn index_round_trips_in_roll_order() {
        for (idx, species) in Species::iter().enumerate() {
            assert_eq!(species.index(), idx);
            assert_eq!(Species::from_index(idx), species);
        }
        assert_eq!(Species::COUNT, 5);
    }

    #[test]
    fn reach_shapes() {
        assert!(Reach::Orthogonal.touches(1, 0));
        assert!(!Reach::Orthogonal.touches(1, 1));
        assert!(Reach::Surround.touches(1, 1));
        assert!(Reach::Surround.touches(0, -1));
        assert!(!Reach::Surround.touches(0, 0));
        assert!(!Reach::Surround.touches(2, 1));
    }

    #[test]
    fn snake_and_crab_are_fragile() {
        let fragile: Vec<Species> = Species::iter().filter(|s| s.is_fragile()).collect();
        assert_eq!(fragile, vec![Species::Snake, Species::Crab]);
    }
}
