use bracket_geometry::prelude::Point;
use serde::Serialize;

use crate::data::monsters::Species;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Role {
    Player,
    Hostile(Species),
}

/// State only a clinging hostile carries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Cling {
    pub attached: bool,
    /// Turns until it may attach again.
    pub cooldown: i32,
    pub fleeing: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub pos: Point,
    pub role: Role,
    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub cling: Option<Cling>,
}

impl Entity {
    pub fn player(pos: Point, health: i32, damage: i32) -> Self {
        Self {
            pos,
            role: Role::Player,
            health,
            max_health: health,
            damage,
            cling: None,
        }
    }

    pub fn hostile(species: Species, pos: Point, health: i32, damage: i32) -> Self {
        let cling = (species == Species::Crab).then(Cling::default);
        Self {
            pos,
            role: Role::Hostile(species),
            health,
            max_health: health,
            damage,
            cling,
        }
    }

    pub fn species(&self) -> Option<Species> {
        match self.role {
            Role::Player => None,
            Role::Hostile(species) => Some(species),
        }
    }

    pub fn is(&self, species: Species) -> bool {
        self.species() == Some(species)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_attached(&self) -> bool {
        self.cling.is_some_and(|cling| cling.attached)
    }

    pub fn cooldown(&self) -> i32 {
        self.cling.map_or(0, |cling| cling.cooldown)
    }

    /// Returns the health actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let lost = amount.clamp(0, self.health);
        self.health -= lost;
        lost
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.max_health);
    }

    /// Raises the ceiling without healing.
    pub fn raise_max(&mut self, boost: i32) {
        self.max_health += boost.max(0);
    }

    pub fn kill(&mut self) {
        self.health = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero() {
        let mut rat = Entity::hostile(Species::Rat, Point::new(1, 1), 3, 1);
        assert_eq!(rat.take_damage(2), 2);
        assert_eq!(rat.take_damage(5), 1);
        assert_eq!(rat.health, 0);
        assert!(!rat.is_alive());
    }

    #[test]
    fn heal_stops_at_max() {
        let mut player = Entity::player(Point::new(0, 0), 20, 1);
        player.take_damage(3);
        player.heal(10);
        assert_eq!(player.health, 20);
        player.raise_max(4);
        assert_eq!((player.health, player.max_health), (20, 24));
    }

    #[test]
    fn only_crabs_carry_cling_state() {
        assert!(Entity::hostile(Species::Crab, Point::new(0, 0), 4, 1).cling.is_some());
        assert!(Entity::hostile(Species::Bear, Point::new(0, 0), 9, 3).cling.is_none());
        assert!(Entity::player(Point::new(0, 0), 20, 1).cling.is_none());
    }
}
