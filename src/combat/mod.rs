//! Contact resolution, run twice per turn: once after the player acts and
//! once after the hostiles move.

use bracket_geometry::prelude::Point;
use tracing::{debug, info};

use crate::data::monsters::Species;
use crate::map::Terrain;
use crate::rng::{Dice, percent_of};
use crate::world::WorldState;

/// Player hits hostile `idx`. Fragile hostiles die outright. Returns true
/// on the killing blow, which is what quests count.
pub fn player_strike(world: &mut WorldState, idx: usize) -> bool {
    let damage = world.player.damage;
    let Some(hostile) = world.hostiles.get_mut(idx) else {
        return false;
    };
    let Some(species) = hostile.species() else {
        return false;
    };
    if !hostile.is_alive() {
        return false;
    }

    if species.is_fragile() && !hostile.is_attached() {
        hostile.kill();
    } else {
        hostile.take_damage(damage);
    }

    if hostile.is_alive() {
        world.log.push(format!("You hit the {species}."));
        false
    } else {
        world.quest.record_kill(species);
        world.log.push(format!("You slay the {species}."));
        true
    }
}

/// Overlap strikes, legend updates, adjacency attacks and knockback, then
/// the dead are cleared away. Every hostile gets its pass even after the
/// player falls; defeat is settled at the end.
pub fn resolve_contacts(world: &mut WorldState, terrain: &dyn Terrain, dice: &mut dyn Dice) {
    for idx in 0..world.hostiles.len() {
        let hostile = &world.hostiles[idx];
        let Some(species) = hostile.species() else {
            continue;
        };
        if !hostile.is_alive() {
            continue;
        }
        let pos = hostile.pos;
        let player = world.player.pos;

        if pos == player {
            player_strike(world, idx);
        }
        if terrain.is_visible(pos) {
            world.tally.seen_species[species.index()] = true;
        }
        if !world.hostiles[idx].is_alive() {
            continue;
        }

        if species.reach().touches(pos.x - player.x, pos.y - player.y) {
            hostile_attack(world, idx, species, dice);
            if species == Species::Bear {
                knockback(world, pos, terrain, dice);
            }
        }
    }
    purge_dead(world);
    world.check_defeat();
}

fn hostile_attack(world: &mut WorldState, idx: usize, species: Species, dice: &mut dyn Dice) {
    let touch = percent_of(world.player.max_health, world.rules.bite_percent);
    match species {
        Species::Snake => venom_bite(world, species, dice),
        Species::Bear if world.progression.current.poison_bears => {
            venom_bite(world, species, dice)
        }
        Species::Ghost => {
            let left = world.shield.absorb(touch);
            if left > 0 {
                world.player.take_damage(left);
                world.status.curse.apply(world.rules.curse, dice);
                world.hostiles[idx].kill();
                world
                    .log
                    .push("The ghost passes through you and fades. Your vision blurs.");
            } else {
                world.log.push("The ghost's touch breaks on your shield.");
            }
        }
        Species::Crab => {
            let cooldown = world.hostiles[idx].cooldown();
            if !world.status.inversion.is_active() && cooldown == 0 {
                let turns = world.status.inversion.apply(world.rules.inversion, dice);
                let crab = &mut world.hostiles[idx];
                if let Some(cling) = crab.cling.as_mut() {
                    cling.attached = true;
                }
                crab.pos = world.player.pos;
                debug!(turns, "crab attached");
                world.log.push("A crab clamps onto you! Your senses twist.");
            } else {
                mitigated_hit(world, species, touch);
            }
        }
        Species::Rat | Species::Bear => {
            let damage = world.hostiles[idx].damage;
            mitigated_hit(world, species, damage);
        }
    }
}

// Venom ignores the shield.
fn venom_bite(world: &mut WorldState, species: Species, dice: &mut dyn Dice) {
    let damage = percent_of(world.player.max_health, world.rules.bite_percent);
    world.player.take_damage(damage);
    world.status.poison.apply(world.rules.poison, dice);
    world
        .log
        .push(format!("The {species} bites you for {damage}. You are poisoned."));
}

fn mitigated_hit(world: &mut WorldState, species: Species, damage: i32) {
    let left = world.shield.absorb(damage);
    world.player.take_damage(left);
    if left < damage {
        world.log.push(format!(
            "The {species} hits you for {left}; your shield takes {}.",
            damage - left
        ));
    } else {
        world.log.push(format!("The {species} hits you for {left}."));
    }
}

/// Shove the player away from the bear along the dominant axis. The
/// distance is rolled even when a shield soaks the shove.
fn knockback(world: &mut WorldState, bear: Point, terrain: &dyn Terrain, dice: &mut dyn Dice) {
    let distance = world.rules.knockback.roll(dice);
    if world.shield.is_up() {
        debug!(distance, "knockback absorbed by shield");
        return;
    }

    let player = world.player.pos;
    let (ddx, ddy) = (player.x - bear.x, player.y - bear.y);
    let dir = if ddx.abs() >= ddy.abs() {
        Point::new(ddx.signum(), 0)
    } else {
        Point::new(0, ddy.signum())
    };

    let mut moved = 0;
    for _ in 0..distance {
        let next = world.player.pos + dir;
        if !terrain.in_bounds(next)
            || !terrain.is_walkable(next)
            || world.live_hostile_at(next).is_some()
        {
            break;
        }
        world.player.pos = next;
        moved += 1;
    }
    if moved > 0 {
        crate::ai::carry_rider(world);
        world
            .log
            .push(format!("The bear's blow sends you flying {moved} cells."));
    }
    debug!(distance, moved, "knockback");
}

/// Drop dead hostiles, count them, and mark the floor cleared the first
/// time none are left.
pub fn purge_dead(world: &mut WorldState) {
    let tally = &mut world.tally;
    world.hostiles.retain(|hostile| {
        if hostile.is_alive() {
            return true;
        }
        if let Some(species) = hostile.species() {
            tally.kills[species.index()] += 1;
        }
        false
    });

    if world.hostiles.is_empty() && !world.floor_cleared {
        world.floor_cleared = true;
        world.log.push("The floor falls silent. The way out glimmers.");
        info!(floor = world.progression.floor, "floor cleared");
    }
}
