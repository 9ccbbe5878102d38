//! Stocking a freshly carved floor with hostiles, items and fireflies.

use bracket_geometry::prelude::Point;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::data::items::{AdvancedItem, Item, ItemFamily, ItemKind};
use crate::data::monsters::Species;
use crate::map::{Cell, Grid};
use crate::rng::{Dice, Span};
use crate::world::{Entity, WorldState};

const HOSTILE_ATTEMPTS: usize = 100;
const ITEM_ATTEMPTS: usize = 200;

const BASE_MEDKITS: i32 = 3;
const BASE_MAX_HP_ITEMS: i32 = 2;
const BASE_SHIELDS: i32 = 3;
const TRAPS: Span = Span::new(1, 5);

/// How many of `species` the current floor gets.
pub fn hostile_count(world: &WorldState, species: Species, dice: &mut dyn Dice) -> i32 {
    let progression = &world.progression;
    if !progression.allows_species(species) {
        return 0;
    }
    let floor = progression.floor as i32;
    if floor == 1 {
        return species.template().first_floor.roll(dice);
    }
    match species {
        Species::Rat => 5 + floor + progression.lasting.extra_rats,
        Species::Bear => 2 + floor / 2,
        Species::Snake => 3 + floor / 2 + progression.current.extra_snakes,
        Species::Ghost => 1 + floor / 2,
        Species::Crab => 2 + floor / 2,
    }
}

/// Random cell matching `accept`, or `None` once the attempts run out.
fn find_spot<F>(grid: &dyn Grid, dice: &mut dyn Dice, attempts: usize, accept: F) -> Option<Point>
where
    F: Fn(Point) -> bool,
{
    for _ in 0..attempts {
        let point = Point::new(
            dice.roll(0, grid.width() - 1),
            dice.roll(0, grid.height() - 1),
        );
        if accept(point) {
            return Some(point);
        }
    }
    None
}

fn open_cell(world: &WorldState, grid: &dyn Grid, point: Point) -> bool {
    grid.cell_at(point) == Cell::Floor
        && point != world.player.pos
        && world.live_hostile_at(point).is_none()
}

pub fn populate_floor(world: &mut WorldState, grid: &mut dyn Grid, dice: &mut dyn Dice) {
    let progression = &world.progression;
    let medkits = if progression.is_item_unlocked(ItemFamily::Medkit) {
        BASE_MEDKITS
    } else {
        0
    };
    let max_hp_items = if progression.is_item_unlocked(ItemFamily::MaxHp) {
        BASE_MAX_HP_ITEMS
    } else {
        0
    };
    place_items(world, grid, dice, medkits, ItemFamily::Medkit);
    place_items(world, grid, dice, max_hp_items, ItemFamily::MaxHp);

    for species in Species::iter() {
        let count = hostile_count(world, species, dice);
        place_hostiles(world, grid, dice, species, count);
    }

    let progression = &world.progression;
    let traps = if progression.allows_item(AdvancedItem::Trap) {
        TRAPS.roll(dice)
    } else {
        0
    };
    let shields = if progression.allows_item(AdvancedItem::Shield) {
        (BASE_SHIELDS + progression.lasting.extra_shields).max(0)
    } else {
        0
    };
    let scrolls = i32::from(progression.allows_item(AdvancedItem::Quest));
    let extra_medkits = progression.lasting.extra_medkits;
    let extra_max_hp = progression.current.extra_max_hp_items;

    place_items(world, grid, dice, traps, ItemFamily::Trap);
    place_items(world, grid, dice, shields, ItemFamily::Shield);
    place_items(world, grid, dice, scrolls, ItemFamily::Quest);
    place_items(world, grid, dice, extra_medkits, ItemFamily::Medkit);
    place_items(world, grid, dice, extra_max_hp, ItemFamily::MaxHp);

    debug!(
        hostiles = world.hostiles.len(),
        items = grid.items().len(),
        "floor populated"
    );
}

fn place_hostiles(
    world: &mut WorldState,
    grid: &dyn Grid,
    dice: &mut dyn Dice,
    species: Species,
    count: i32,
) {
    let template = species.template();
    let exit = grid.exit();
    for _ in 0..count {
        let spot = find_spot(grid, dice, HOSTILE_ATTEMPTS, |point| {
            point != exit && open_cell(world, grid, point)
        });
        let Some(pos) = spot else {
            debug!(%species, "no room for hostile");
            continue;
        };
        let health = template.health.roll(dice);
        let damage = template.damage.roll(dice);
        world
            .hostiles
            .push(Entity::hostile(species, pos, health, damage));
    }
}

fn place_items(
    world: &WorldState,
    grid: &mut dyn Grid,
    dice: &mut dyn Dice,
    count: i32,
    family: ItemFamily,
) {
    for _ in 0..count {
        let Some(pos) = find_spot(&*grid, dice, ITEM_ATTEMPTS, |point| {
            open_cell(world, &*grid, point)
        }) else {
            debug!(%family, "no room for item");
            continue;
        };
        let kind = match family {
            ItemFamily::Medkit => ItemKind::Medkit {
                heal: world.rules.medkit_heal,
            },
            ItemFamily::MaxHp => ItemKind::MaxHp {
                boost: world.rules.max_hp_boost.roll(dice),
            },
            ItemFamily::Trap => ItemKind::Trap,
            ItemFamily::Shield => ItemKind::Shield,
            ItemFamily::Quest => ItemKind::Quest,
        };
        grid.place_item(Item::new(pos, kind));
    }
}

/// Put every surviving firefly, plus any newly granted ones, on open
/// cells of the new floor. A run with fireflies never starts a floor
/// without one.
pub fn release_fireflies(world: &mut WorldState, grid: &dyn Grid, dice: &mut dyn Dice) {
    let mut count = world.fireflies.len() + world.progression.fireflies_owed as usize;
    world.progression.fireflies_owed = 0;
    if world.progression.lasting.fireflies {
        count = count.max(1);
    }
    world.fireflies.clear();

    let exit = grid.exit();
    for _ in 0..count {
        let fireflies = &world.fireflies;
        let player = world.player.pos;
        let spot = find_spot(grid, dice, ITEM_ATTEMPTS, |point| {
            grid.is_walkable(point) && point != player && point != exit && !fireflies.contains(&point)
        });
        if let Some(point) = spot {
            world.fireflies.push(point);
        }
    }
}
