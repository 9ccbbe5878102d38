use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::{LIGHT_GREEN, RGB};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

/// Item families, used for unlocks, pickup counters and the legend.
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
pub enum ItemFamily {
    Medkit,
    #[strum(to_string = "Max HP")]
    MaxHp,
    Trap,
    Shield,
    Quest,
}

impl ItemFamily {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn glyph(self) -> char {
        match self {
            ItemFamily::Medkit => '$',
            ItemFamily::MaxHp => '+',
            ItemFamily::Trap => '.',
            ItemFamily::Shield => 'O',
            ItemFamily::Quest => '?',
        }
    }

    pub fn color(self) -> RGB {
        match self {
            ItemFamily::Medkit => RGB::named(LIGHT_GREEN),
            ItemFamily::MaxHp => RGB::from_u8(255, 105, 180),
            // Traps are meant to pass for bare floor.
            ItemFamily::Trap => RGB::from_u8(90, 90, 90),
            ItemFamily::Shield => RGB::from_u8(135, 206, 235),
            ItemFamily::Quest => RGB::from_u8(255, 215, 0),
        }
    }
}

/// The three families of which exactly one is offered on the first floor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumIter, EnumCount, Serialize)]
pub enum AdvancedItem {
    Trap,
    Shield,
    Quest,
}

impl AdvancedItem {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => AdvancedItem::Trap,
            1 => AdvancedItem::Shield,
            _ => AdvancedItem::Quest,
        }
    }

    pub fn family(self) -> ItemFamily {
        match self {
            AdvancedItem::Trap => ItemFamily::Trap,
            AdvancedItem::Shield => ItemFamily::Shield,
            AdvancedItem::Quest => ItemFamily::Quest,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Medkit { heal: i32 },
    MaxHp { boost: i32 },
    Trap,
    Shield,
    Quest,
}

impl ItemKind {
    pub fn family(self) -> ItemFamily {
        match self {
            ItemKind::Medkit { .. } => ItemFamily::Medkit,
            ItemKind::MaxHp { .. } => ItemFamily::MaxHp,
            ItemKind::Trap => ItemFamily::Trap,
            ItemKind::Shield => ItemFamily::Shield,
            ItemKind::Quest => ItemFamily::Quest,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub pos: Point,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(pos: Point, kind: ItemKind) -> Self {
        Self { pos, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn advanced_items_map_to_families() {
        let families: Vec<ItemFamily> = AdvancedItem::iter().map(AdvancedItem::family).collect();
        assert_eq!(
            families,
            vec![ItemFamily::Trap, ItemFamily::Shield, ItemFamily::Quest]
        );
        assert_eq!(AdvancedItem::from_index(1), AdvancedItem::Shield);
    }

    #[test]
    fn kinds_report_their_family() {
        assert_eq!(ItemKind::Medkit { heal: 5 }.family(), ItemFamily::Medkit);
        assert_eq!(ItemKind::MaxHp { boost: 2 }.family(), ItemFamily::MaxHp);
        assert_eq!(ItemFamily::Shield.glyph(), 'O');
    }
}
