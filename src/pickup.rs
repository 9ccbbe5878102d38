use tracing::debug;

use crate::data::items::ItemKind;
use crate::map::Grid;
use crate::rng::{Dice, percent_of};
use crate::world::{Objective, WorldState};

/// Use up whatever lies under the player.
pub fn collect_items(world: &mut WorldState, grid: &mut dyn Grid, dice: &mut dyn Dice) {
    while let Some((idx, item)) = grid.item_at(world.player.pos) {
        let family = item.kind.family();
        world.tally.pickups[family.index()] += 1;
        world.tally.seen_items[family.index()] = true;
        world.quest.record_pickup(family);

        match item.kind {
            ItemKind::Medkit { heal } => {
                world.player.heal(heal);
                world.log.push(format!("You patch yourself up (+{heal})."));
            }
            ItemKind::MaxHp { boost } => {
                world.player.raise_max(boost);
                world
                    .log
                    .push(format!("You feel sturdier (+{boost} max health)."));
            }
            ItemKind::Trap => {
                let damage = percent_of(world.player.max_health, world.rules.trap_percent);
                world.player.take_damage(damage);
                world.log.push(format!("A trap snaps shut for {damage}!"));
            }
            ItemKind::Shield => {
                world.shield.equip();
                world.log.push("A shield shimmers around you.");
            }
            ItemKind::Quest => {
                if world
                    .quest
                    .activate(Objective::Kill(None), world.rules.quest_kills, dice)
                {
                    let target = world.quest.goals().first().map_or(0, |goal| goal.target);
                    world
                        .log
                        .push(format!("A scroll: slay {target} creatures for a vision."));
                } else {
                    world.log.push("The scroll's words fade; you are already bound.");
                }
            }
        }
        debug!(?family, at = ?item.pos, "item used");
        grid.remove_item(idx);
    }
}

#[cfg(test)]
mod tests {
    use bracket_geometry::prelude::Point;

    use super::*;
    use crate::config::Rules;
    use crate::data::items::{Item, ItemFamily};
    use crate::map::{Carver, Floor, OpenArena};
    use crate::rng::LoadedDice;

    fn setup(kind: ItemKind) -> (WorldState, Floor) {
        let mut floor = OpenArena.carve(20, 12, &mut LoadedDice::default());
        floor.place_item(Item::new(Point::new(10, 6), kind));
        let mut world = WorldState::new(Rules::default());
        world.player.pos = Point::new(10, 6);
        (world, floor)
    }

    #[test]
    fn medkit_heals_up_to_max() {
        let (mut world, mut floor) = setup(ItemKind::Medkit { heal: 5 });
        world.player.health = 17;
        collect_items(&mut world, &mut floor, &mut LoadedDice::default());
        assert_eq!(world.player.health, 20);
        assert!(floor.items().is_empty());
        assert_eq!(world.tally.pickups_of(ItemFamily::Medkit), 1);
    }

    #[test]
    fn max_hp_raises_ceiling_only() {
        let (mut world, mut floor) = setup(ItemKind::MaxHp { boost: 3 });
        collect_items(&mut world, &mut floor, &mut LoadedDice::default());
        assert_eq!(world.player.max_health, 23);
        assert_eq!(world.player.health, 20);
    }

    #[test]
    fn trap_bypasses_shield() {
        let (mut world, mut floor) = setup(ItemKind::Trap);
        world.shield.equip();
        collect_items(&mut world, &mut floor, &mut LoadedDice::default());
        assert_eq!(world.player.health, 17);
        assert_eq!(world.shield.fresh, world.shield.cap);
        assert!(world.tally.seen_items[ItemFamily::Trap.index()]);
    }

    #[test]
    fn shield_item_refills() {
        let (mut world, mut floor) = setup(ItemKind::Shield);
        world.shield.spent = 2;
        collect_items(&mut world, &mut floor, &mut LoadedDice::default());
        assert_eq!(world.shield.fresh, world.shield.cap);
        assert_eq!(world.shield.spent, 0);
    }

    #[test]
    fn second_scroll_does_not_restart_quest() {
        let (mut world, mut floor) = setup(ItemKind::Quest);
        let mut dice = LoadedDice::new([6, 9]);
        collect_items(&mut world, &mut floor, &mut dice);
        assert_eq!(world.quest.goals()[0].target, 6);
        floor.place_item(Item::new(Point::new(10, 6), ItemKind::Quest));
        collect_items(&mut world, &mut floor, &mut dice);
        assert_eq!(world.quest.goals()[0].target, 6);
        assert_eq!(dice.remaining(), 1);
        assert_eq!(world.tally.pickups_of(ItemFamily::Quest), 2);
    }
}
