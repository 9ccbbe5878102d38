pub mod items;
pub mod monsters;

/// One of the three reward bundles offered at a floor exit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PerkBundle {
    pub key: u8,
    pub title: &'static str,
    pub labels: [&'static str; 3],
}

pub const PERK_BUNDLES: [PerkBundle; 3] = [
    PerkBundle {
        key: 1,
        title: "Swarm and salve",
        labels: ["+5 rats", "+2 medkits", "Firefly reveals fog"],
    },
    PerkBundle {
        key: 2,
        title: "Wardens",
        labels: ["Bear with poison", "More shields", "Show exit hint"],
    },
    PerkBundle {
        key: 3,
        title: "Lean descent",
        labels: ["+2 snakes", "More MaxHP items", "Smaller torch"],
    },
];

pub fn perk_bundle(key: u8) -> Option<&'static PerkBundle> {
    PERK_BUNDLES.iter().find(|bundle| bundle.key == key)
}
