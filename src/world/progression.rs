use std::mem;

use serde::Serialize;
use strum::EnumCount;
use tracing::info;

use crate::data::items::{AdvancedItem, ItemFamily};
use crate::data::monsters::Species;
use crate::data::{PerkBundle, perk_bundle};
use crate::rng::Dice;

/// Bonuses that stay for the rest of the run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LastingBonuses {
    pub extra_rats: i32,
    pub extra_medkits: i32,
    pub extra_shields: i32,
    pub fireflies: bool,
    pub exit_hint: bool,
}

/// Bonuses that apply to exactly one floor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FloorBonuses {
    pub poison_bears: bool,
    pub extra_snakes: i32,
    pub extra_max_hp_items: i32,
    pub torch_delta: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Progression {
    pub floor: u32,
    pub lasting: LastingBonuses,
    /// Queued for the floor after this one.
    pub next: FloorBonuses,
    /// In force on the floor being played.
    pub current: FloorBonuses,
    unlocked_species: [bool; Species::COUNT],
    unlocked_items: [bool; ItemFamily::COUNT],
    first_floor: Option<(Species, AdvancedItem)>,
    /// Fireflies granted but not yet released onto a floor.
    pub fireflies_owed: u32,
    pub collected: Vec<String>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            floor: 1,
            lasting: LastingBonuses::default(),
            next: FloorBonuses::default(),
            current: FloorBonuses::default(),
            unlocked_species: [false; Species::COUNT],
            unlocked_items: [false; ItemFamily::COUNT],
            first_floor: None,
            fireflies_owed: 0,
            collected: Vec::new(),
        }
    }
}

impl Progression {
    pub fn is_unlocked(&self, species: Species) -> bool {
        self.unlocked_species[species.index()]
    }

    pub fn is_item_unlocked(&self, family: ItemFamily) -> bool {
        self.unlocked_items[family.index()]
    }

    pub fn unlock(&mut self, species: Species) {
        self.unlocked_species[species.index()] = true;
    }

    pub fn unlock_item(&mut self, family: ItemFamily) {
        self.unlocked_items[family.index()] = true;
    }

    /// Pick the one hostile family and the one advanced item family the
    /// first floor offers. The base items come along.
    pub fn roll_first_floor(&mut self, dice: &mut dyn Dice) -> (Species, AdvancedItem) {
        let species = Species::from_index(dice.pick(Species::COUNT));
        let item = AdvancedItem::from_index(dice.pick(AdvancedItem::COUNT));
        self.unlock(species);
        self.unlock_item(item.family());
        self.unlock_item(ItemFamily::Medkit);
        self.unlock_item(ItemFamily::MaxHp);
        self.first_floor = Some((species, item));
        info!(%species, %item, "first floor families rolled");
        (species, item)
    }

    /// Move the queued one-floor bonuses into force and empty the queue.
    pub fn begin_floor(&mut self) {
        self.current = mem::take(&mut self.next);
    }

    pub fn allows_species(&self, species: Species) -> bool {
        if !self.is_unlocked(species) {
            return false;
        }
        match (self.floor, self.first_floor) {
            (1, Some((picked, _))) => picked == species,
            _ => true,
        }
    }

    pub fn allows_item(&self, item: AdvancedItem) -> bool {
        if !self.is_item_unlocked(item.family()) {
            return false;
        }
        match (self.floor, self.first_floor) {
            (1, Some((_, picked))) => picked == item,
            _ => true,
        }
    }

    /// Apply one of the exit bundles and advance the floor counter.
    /// Unknown keys change nothing.
    pub fn apply_bundle(&mut self, key: u8, dice: &mut dyn Dice) -> Option<&'static PerkBundle> {
        let bundle = perk_bundle(key)?;
        match key {
            1 => {
                self.lasting.extra_rats += 5;
                self.lasting.extra_medkits += 2;
                self.lasting.fireflies = true;
                self.fireflies_owed += 1;
                self.unlock(Species::Rat);
                self.unlock_item(ItemFamily::Medkit);
            }
            2 => {
                // Each effect throws a coin; both faces grant the same thing.
                let _ = dice.coin();
                self.next.poison_bears = true;
                let _ = dice.coin();
                self.lasting.extra_shields += 1;
                let _ = dice.coin();
                self.lasting.exit_hint = true;
                self.unlock(Species::Bear);
                self.unlock_item(ItemFamily::Shield);
            }
            _ => {
                self.next.extra_snakes += 2;
                self.next.extra_max_hp_items += 1;
                self.next.torch_delta -= 3;
                self.unlock(Species::Snake);
                self.unlock_item(ItemFamily::MaxHp);
            }
        }
        self.collected
            .extend(bundle.labels.iter().map(|label| label.to_string()));
        self.floor += 1;
        info!(key, floor = self.floor, "bundle chosen");
        Some(bundle)
    }
}
