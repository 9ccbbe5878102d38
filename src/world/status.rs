use bracket_geometry::prelude::Point;
use serde::Serialize;
use tracing::debug;

use super::WorldState;
use crate::map::Grid;
use crate::rng::{Dice, Span, percent_of};

/// Right, left, down, up. Roll order for landing spots.
pub const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Countdown in player turns. Zero means inactive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Timer {
    remaining: i32,
}

impl Timer {
    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Overwrites whatever is left; effects never stack.
    pub fn apply(&mut self, span: Span, dice: &mut dyn Dice) -> i32 {
        self.remaining = span.roll(dice).max(0);
        self.remaining
    }

    pub fn set(&mut self, turns: i32) {
        self.remaining = turns.max(0);
    }

    /// Returns true on the tick that runs the timer out.
    pub fn tick(&mut self) -> bool {
        if self.remaining <= 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusState {
    pub poison: Timer,
    /// Hides the health readout. No other effect.
    pub curse: Timer,
    pub inversion: Timer,
}

impl StatusState {
    /// Mirror a requested step while controls are inverted.
    pub fn steer(&self, dx: i32, dy: i32) -> (i32, i32) {
        if self.inversion.is_active() {
            (-dx, -dy)
        } else {
            (dx, dy)
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub fn tick_poison(world: &mut WorldState) {
    if !world.status.poison.is_active() {
        return;
    }
    let damage = percent_of(world.player.max_health, world.rules.bite_percent);
    world.player.take_damage(damage);
    if world.status.poison.tick() {
        world.log.push("The poison wears off.");
    }
    if !world.player.is_alive() {
        world.status.poison.clear();
        world.log.push("The poison finishes you.");
    }
}

pub fn tick_curse(world: &mut WorldState) {
    if world.status.curse.tick() {
        world.log.push("The ghostly haze lifts.");
    }
}

pub fn tick_inversion(world: &mut WorldState, grid: &dyn Grid, dice: &mut dyn Dice) {
    if world.status.inversion.tick() {
        detach_crab(world, grid, dice);
    }
}

/// The attached crab lets go on its own: it pinches on the way out and
/// scuttles two cells off along a random open axis.
pub fn detach_crab(world: &mut WorldState, grid: &dyn Grid, dice: &mut dyn Dice) {
    let Some(idx) = world
        .hostiles
        .iter()
        .position(|hostile| hostile.is_alive() && hostile.is_attached())
    else {
        return;
    };

    let damage = percent_of(world.player.max_health, world.rules.detach_percent);
    world.player.take_damage(damage);
    let cooldown = world.rules.cling_cooldown.roll(dice);

    let origin = world.player.pos;
    let mut landing = None;
    for _ in 0..ORTHOGONAL.len() {
        let (dx, dy) = ORTHOGONAL[dice.pick(ORTHOGONAL.len())];
        let target = Point::new(origin.x + dx * 2, origin.y + dy * 2);
        if grid.in_bounds(target) && grid.is_walkable(target) {
            landing = Some(target);
            break;
        }
    }

    let crab = &mut world.hostiles[idx];
    release(crab, cooldown);
    if let Some(target) = landing {
        crab.pos = target;
    }
    debug!(damage, cooldown, ?landing, "crab detached");
    world.log.push(format!("The crab lets go and nips you for {damage}."));
}

/// Pry the crab off by hand. No damage; it lands on the first open
/// neighbour. Returns false when nothing was clinging.
pub fn shake_off(world: &mut WorldState, grid: &dyn Grid, dice: &mut dyn Dice) -> bool {
    if !world.status.inversion.is_active() {
        return false;
    }
    world.status.inversion.clear();

    let origin = world.player.pos;
    let cooldown_span = world.rules.cling_cooldown;
    if let Some(crab) = world
        .hostiles
        .iter_mut()
        .find(|hostile| hostile.is_alive() && hostile.is_attached())
    {
        release(crab, cooldown_span.roll(dice));
        if let Some(target) = ORTHOGONAL
            .iter()
            .map(|(dx, dy)| Point::new(origin.x + dx, origin.y + dy))
            .find(|point| grid.in_bounds(*point) && grid.is_walkable(*point))
        {
            crab.pos = target;
        }
        world.log.push("You pry the crab off.");
    }
    debug!("inversion shaken off");
    true
}

fn release(crab: &mut super::Entity, cooldown: i32) {
    if let Some(cling) = crab.cling.as_mut() {
        cling.attached = false;
        cling.cooldown = cooldown;
        cling.fleeing = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rules;
    use crate::data::monsters::Species;
    use crate::map::{Carver, OpenArena};
    use crate::rng::LoadedDice;
    use crate::world::Entity;

    fn setup() -> (WorldState, crate::map::Floor) {
        let rules = Rules::default();
        let mut dice = LoadedDice::default();
        let floor = OpenArena.carve(20, 12, &mut dice);
        let mut world = WorldState::new(rules);
        world.player.pos = Point::new(10, 6);
        (world, floor)
    }

    fn attach_crab(world: &mut WorldState) {
        let mut crab = Entity::hostile(Species::Crab, world.player.pos, 4, 1);
        if let Some(cling) = crab.cling.as_mut() {
            cling.attached = true;
        }
        world.hostiles.push(crab);
        world.status.inversion.set(1);
    }

    #[test]
    fn timer_ticks_down_and_reports_expiry() {
        let mut timer = Timer::default();
        timer.set(2);
        assert!(!timer.tick());
        assert!(timer.tick());
        assert!(!timer.tick());
        assert!(!timer.is_active());
    }

    #[test]
    fn reapply_overwrites_duration() {
        let mut dice = LoadedDice::new([9, 6]);
        let mut timer = Timer::default();
        timer.apply(Span::new(5, 10), &mut dice);
        timer.apply(Span::new(5, 10), &mut dice);
        assert_eq!(timer.remaining(), 6);
    }

    #[test]
    fn inverted_span_clamps_to_min() {
        let mut dice = LoadedDice::new([0]);
        let mut timer = Timer::default();
        assert_eq!(timer.apply(Span::new(7, 3), &mut dice), 7);
    }

    #[test]
    fn steering_mirrors_only_while_inverted() {
        let mut status = StatusState::default();
        assert_eq!(status.steer(1, -1), (1, -1));
        status.inversion.set(3);
        assert_eq!(status.steer(1, -1), (-1, 1));
        assert_eq!(status.steer(0, 1), (0, -1));
    }

    #[test]
    fn poison_ticks_percent_damage() {
        let (mut world, _) = setup();
        world.status.poison.set(2);
        tick_poison(&mut world);
        assert_eq!(world.player.health, 19);
        assert_eq!(world.status.poison.remaining(), 1);
    }

    #[test]
    fn detach_moves_crab_two_cells_and_hurts() {
        let (mut world, floor) = setup();
        attach_crab(&mut world);
        // cooldown roll, then direction index 0 (right)
        let mut dice = LoadedDice::new([20, 0]);
        tick_inversion(&mut world, &floor, &mut dice);

        let crab = &world.hostiles[0];
        assert_eq!(crab.pos, Point::new(12, 6));
        assert!(!crab.is_attached());
        assert_eq!(crab.cooldown(), 20);
        assert!(crab.cling.is_some_and(|c| c.fleeing));
        assert_eq!(world.player.health, 19);
        assert!(!world.status.inversion.is_active());
    }

    #[test]
    fn detach_stays_put_when_every_landing_is_blocked() {
        let (mut world, floor) = setup();
        world.player.pos = Point::new(1, 1);
        attach_crab(&mut world);
        // left and up twice each: all out of the open area
        let mut dice = LoadedDice::new([15, 1, 3, 1, 3]);
        tick_inversion(&mut world, &floor, &mut dice);
        assert_eq!(world.hostiles[0].pos, Point::new(1, 1));
        assert!(!world.hostiles[0].is_attached());
    }

    #[test]
    fn shake_off_is_free_and_adjacent() {
        let (mut world, floor) = setup();
        attach_crab(&mut world);
        world.status.inversion.set(5);
        let mut dice = LoadedDice::new([30]);
        assert!(shake_off(&mut world, &floor, &mut dice));
        assert_eq!(world.player.health, 20);
        assert_eq!(world.hostiles[0].pos, Point::new(11, 6));
        assert_eq!(world.hostiles[0].cooldown(), 30);
        assert!(!world.status.inversion.is_active());
    }

    #[test]
    fn shake_off_needs_inversion() {
        let (mut world, floor) = setup();
        let mut dice = LoadedDice::default();
        assert!(!shake_off(&mut world, &floor, &mut dice));
    }
}
