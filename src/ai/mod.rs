//! Movement for everything that is not combat: the player's step, hostile
//! gaits and firefly drift.

use bracket_geometry::prelude::Point;
use tracing::trace;

use crate::combat::player_strike;
use crate::data::monsters::Gait;
use crate::map::Grid;
use crate::rng::Dice;
use crate::world::{Entity, WorldState};

const EIGHT_WAY: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const FIREFLY_ATTEMPTS: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    Blocked,
    Struck { killed: bool },
    Moved,
    ReachedExit,
}

/// Resolve the player's step after inversion has been applied: strike a
/// live hostile on the target, otherwise move if the cell allows it.
pub fn player_step(world: &mut WorldState, grid: &dyn Grid, dx: i32, dy: i32) -> StepResult {
    if dx == 0 && dy == 0 {
        return StepResult::Blocked;
    }
    let target = world.player.pos + Point::new(dx, dy);
    if !grid.in_bounds(target) {
        return StepResult::Blocked;
    }

    if let Some(idx) = world.live_hostile_at(target) {
        let killed = player_strike(world, idx);
        return StepResult::Struck { killed };
    }

    let exit = grid.is_exit(target);
    if !exit && !grid.is_walkable(target) {
        return StepResult::Blocked;
    }

    world.player.pos = target;
    world.steps_on_floor += 1;
    carry_rider(world);
    if exit {
        StepResult::ReachedExit
    } else {
        StepResult::Moved
    }
}

/// Keep an attached hostile on the player's cell.
pub fn carry_rider(world: &mut WorldState) {
    let pos = world.player.pos;
    for rider in world
        .hostiles
        .iter_mut()
        .filter(|hostile| hostile.is_alive() && hostile.is_attached())
    {
        rider.pos = pos;
    }
}

/// The step a hostile wants to take toward (or away from) the player.
/// Updates clinging cooldowns as a side effect.
pub fn desired_step(hostile: &mut Entity, player: Point, dice: &mut dyn Dice) -> (i32, i32) {
    let Some(species) = hostile.species() else {
        return (0, 0);
    };
    let dx = (player.x - hostile.pos.x).signum();
    let dy = (player.y - hostile.pos.y).signum();

    match species.gait() {
        Gait::Axis => one_axis(dx, dy, dice),
        Gait::Diagonal => {
            if dx == 0 || dy == 0 {
                (0, 0)
            } else {
                (dx, dy)
            }
        }
        Gait::Phasing => (dx, dy),
        Gait::Clinging => {
            let Some(cling) = hostile.cling.as_mut() else {
                return one_axis(dx, dy, dice);
            };
            if cling.attached {
                return (0, 0);
            }
            if cling.cooldown > 0 {
                cling.cooldown -= 1;
                if cling.cooldown == 0 {
                    cling.fleeing = false;
                }
                one_axis(-dx, -dy, dice)
            } else {
                one_axis(dx, dy, dice)
            }
        }
    }
}

// Tails keeps the horizontal component, heads the vertical one.
fn one_axis(dx: i32, dy: i32, dice: &mut dyn Dice) -> (i32, i32) {
    if dice.coin() { (0, dy) } else { (dx, 0) }
}

/// One move for every live hostile. Nobody walks onto the player or off
/// the map; only phasing hostiles ignore walls.
pub fn advance_hostiles(world: &mut WorldState, grid: &dyn Grid, dice: &mut dyn Dice) {
    let player = world.player.pos;
    for hostile in world.hostiles.iter_mut().filter(|hostile| hostile.is_alive()) {
        let (dx, dy) = desired_step(hostile, player, dice);
        if dx == 0 && dy == 0 {
            continue;
        }
        let target = hostile.pos + Point::new(dx, dy);
        if !grid.in_bounds(target) || target == player {
            continue;
        }
        let phasing = hostile
            .species()
            .is_some_and(|species| species.gait() == Gait::Phasing);
        if phasing || grid.is_walkable(target) {
            trace!(from = ?hostile.pos, to = ?target, "hostile moved");
            hostile.pos = target;
        }
    }
}

/// Fireflies under a live hostile are eaten; the rest try a few random
/// neighbours and settle on the first free one.
pub fn drift_fireflies(world: &mut WorldState, grid: &dyn Grid, dice: &mut dyn Dice) {
    let player = world.player.pos;
    let mut winked_out = false;
    // Newest first.
    for idx in (0..world.fireflies.len()).rev() {
        let fly = world.fireflies[idx];
        if world
            .hostiles
            .iter()
            .any(|hostile| hostile.is_alive() && hostile.pos == fly)
        {
            world.fireflies.remove(idx);
            winked_out = true;
            continue;
        }
        for _ in 0..FIREFLY_ATTEMPTS {
            let (dx, dy) = EIGHT_WAY[dice.pick(EIGHT_WAY.len())];
            let target = world.fireflies[idx] + Point::new(dx, dy);
            if grid.in_bounds(target)
                && grid.is_walkable(target)
                && target != player
                && !world.fireflies.contains(&target)
            {
                world.fireflies[idx] = target;
                break;
            }
        }
    }
    if winked_out {
        world.log.push("A firefly winks out.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rules;
    use crate::data::monsters::Species;
    use crate::map::{Carver, Floor, OpenArena};
    use crate::rng::LoadedDice;

    fn setup() -> (WorldState, Floor) {
        let floor = OpenArena.carve(20, 12, &mut LoadedDice::default());
        let mut world = WorldState::new(Rules::default());
        world.player.pos = Point::new(10, 6);
        (world, floor)
    }

    #[test]
    fn axis_walkers_pick_one_component() {
        let mut rat = Entity::hostile(Species::Rat, Point::new(5, 3), 3, 1);
        let mut dice = LoadedDice::new([0, 1]);
        assert_eq!(desired_step(&mut rat, Point::new(10, 6), &mut dice), (1, 0));
        assert_eq!(desired_step(&mut rat, Point::new(10, 6), &mut dice), (0, 1));
    }

    #[test]
    fn snakes_only_move_diagonally() {
        let mut snake = Entity::hostile(Species::Snake, Point::new(5, 6), 5, 1);
        let mut dice = LoadedDice::default();
        assert_eq!(desired_step(&mut snake, Point::new(10, 6), &mut dice), (0, 0));
        snake.pos = Point::new(12, 2);
        assert_eq!(desired_step(&mut snake, Point::new(10, 6), &mut dice), (-1, 1));
    }

    #[test]
    fn ghosts_pass_through_walls() {
        let (mut world, floor) = setup();
        world.player.pos = Point::new(2, 2);
        world
            .hostiles
            .push(Entity::hostile(Species::Ghost, Point::new(0, 0), 5, 1));
        world
            .hostiles
            .push(Entity::hostile(Species::Bear, Point::new(0, 2), 9, 3));
        let mut dice = LoadedDice::new([0]);
        advance_hostiles(&mut world, &floor, &mut dice);
        assert_eq!(world.hostiles[0].pos, Point::new(1, 1));
        assert_eq!(world.hostiles[1].pos, Point::new(1, 2));
    }

    #[test]
    fn walls_stop_ordinary_walkers() {
        let mut floor = Floor::solid(10, 5);
        for x in 1..9 {
            floor.paint_floor(Point::new(x, 1));
            floor.paint_floor(Point::new(x, 3));
        }
        let mut world = WorldState::new(Rules::default());
        world.player.pos = Point::new(3, 3);
        world
            .hostiles
            .push(Entity::hostile(Species::Rat, Point::new(3, 1), 3, 1));
        world
            .hostiles
            .push(Entity::hostile(Species::Ghost, Point::new(4, 1), 5, 1));
        let mut dice = LoadedDice::new([1]);
        advance_hostiles(&mut world, &floor, &mut dice);
        assert_eq!(world.hostiles[0].pos, Point::new(3, 1));
        assert_eq!(world.hostiles[1].pos, Point::new(3, 2));
    }

    #[test]
    fn hostiles_never_enter_the_player_cell() {
        let (mut world, floor) = setup();
        world
            .hostiles
            .push(Entity::hostile(Species::Rat, Point::new(9, 6), 3, 1));
        let mut dice = LoadedDice::new([0]);
        advance_hostiles(&mut world, &floor, &mut dice);
        assert_eq!(world.hostiles[0].pos, Point::new(9, 6));
    }

    #[test]
    fn fleeing_crab_backs_off_until_cooldown_ends() {
        let mut crab = Entity::hostile(Species::Crab, Point::new(8, 6), 4, 1);
        if let Some(cling) = crab.cling.as_mut() {
            cling.cooldown = 2;
            cling.fleeing = true;
        }
        let mut dice = LoadedDice::new([0, 0, 0]);
        let player = Point::new(10, 6);
        assert_eq!(desired_step(&mut crab, player, &mut dice), (-1, 0));
        assert!(crab.cling.is_some_and(|c| c.fleeing));
        assert_eq!(desired_step(&mut crab, player, &mut dice), (-1, 0));
        assert!(crab.cling.is_some_and(|c| !c.fleeing && c.cooldown == 0));
        assert_eq!(desired_step(&mut crab, player, &mut dice), (1, 0));
    }

    #[test]
    fn attached_crab_holds_still() {
        let mut crab = Entity::hostile(Species::Crab, Point::new(10, 6), 4, 1);
        if let Some(cling) = crab.cling.as_mut() {
            cling.attached = true;
        }
        let mut dice = LoadedDice::default();
        assert_eq!(desired_step(&mut crab, Point::new(10, 6), &mut dice), (0, 0));
    }

    #[test]
    fn step_strikes_before_moving() {
        let (mut world, floor) = setup();
        world
            .hostiles
            .push(Entity::hostile(Species::Bear, Point::new(11, 6), 9, 3));
        let result = player_step(&mut world, &floor, 1, 0);
        assert_eq!(result, StepResult::Struck { killed: false });
        assert_eq!(world.player.pos, Point::new(10, 6));
        assert_eq!(world.hostiles[0].health, 8);
        assert_eq!(world.steps_on_floor, 0);
    }

    #[test]
    fn step_onto_exit_moves_and_reports() {
        let (mut world, floor) = setup();
        world.player.pos = floor.exit() + Point::new(-1, 0);
        let result = player_step(&mut world, &floor, 1, 0);
        assert_eq!(result, StepResult::ReachedExit);
        assert_eq!(world.player.pos, floor.exit());
        assert_eq!(world.steps_on_floor, 1);
    }

    #[test]
    fn walls_block_the_player() {
        let (mut world, floor) = setup();
        world.player.pos = Point::new(1, 1);
        assert_eq!(player_step(&mut world, &floor, -1, 0), StepResult::Blocked);
        assert_eq!(world.player.pos, Point::new(1, 1));
    }

    #[test]
    fn fireflies_are_eaten_and_drift() {
        let (mut world, floor) = setup();
        world.fireflies = vec![Point::new(3, 3), Point::new(15, 8)];
        world
            .hostiles
            .push(Entity::hostile(Species::Rat, Point::new(3, 3), 3, 1));
        let mut dice = LoadedDice::new([0]);
        drift_fireflies(&mut world, &floor, &mut dice);
        assert_eq!(world.fireflies, vec![Point::new(16, 8)]);
    }

    #[test]
    fn newest_firefly_draws_first() {
        let (mut world, floor) = setup();
        world.fireflies = vec![Point::new(5, 5), Point::new(12, 5)];
        let mut dice = LoadedDice::new([0, 1]);
        drift_fireflies(&mut world, &floor, &mut dice);
        assert_eq!(world.fireflies, vec![Point::new(4, 5), Point::new(13, 5)]);
    }
}
