//! Everything a run owns between turns.

mod entity;
pub mod progression;
pub mod quest;
pub mod shield;
pub mod status;

use bracket_geometry::prelude::Point;
use serde::Serialize;
use strum::EnumCount;
use tracing::info;

use crate::config::Rules;
use crate::data::items::ItemFamily;
use crate::data::monsters::Species;

pub use entity::{Cling, Entity, Role};
pub use progression::Progression;
pub use quest::{Goal, Objective, QuestTracker};
pub use shield::Shield;
pub use status::{StatusState, Timer};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Exploring,
    /// Standing on the exit; only a bundle choice moves things on.
    ChoicePending,
    Defeated,
    Quit,
}

/// Messages for the event panel, drained by the front end each frame.
#[derive(Clone, Debug, Default)]
pub struct TurnLog {
    pub entries: Vec<String>,
}

impl TurnLog {
    pub fn push<S: Into<String>>(&mut self, entry: S) {
        self.entries.push(entry.into());
    }

    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.entries)
    }
}

/// Run statistics and the legend of things met so far.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub kills: [u32; Species::COUNT],
    pub pickups: [u32; ItemFamily::COUNT],
    pub seen_species: [bool; Species::COUNT],
    pub seen_items: [bool; ItemFamily::COUNT],
}

impl Tally {
    pub fn kills_of(&self, species: Species) -> u32 {
        self.kills[species.index()]
    }

    pub fn pickups_of(&self, family: ItemFamily) -> u32 {
        self.pickups[family.index()]
    }

    pub fn total_kills(&self) -> u32 {
        self.kills.iter().sum()
    }
}

pub struct WorldState {
    pub rules: Rules,
    pub player: Entity,
    pub hostiles: Vec<Entity>,
    pub status: StatusState,
    pub shield: Shield,
    pub quest: QuestTracker,
    pub progression: Progression,
    pub fireflies: Vec<Point>,
    pub tally: Tally,
    /// Set once the floor's last hostile falls; only regeneration clears it.
    pub floor_cleared: bool,
    /// Turns of full-map sight left.
    pub vision_turns: i32,
    pub torch_radius: i32,
    pub steps_on_floor: u32,
    pub phase: Phase,
    pub log: TurnLog,
}

impl WorldState {
    pub fn new(rules: Rules) -> Self {
        let player = Entity::player(Point::new(0, 0), rules.player_health, rules.player_damage);
        let shield = Shield::new(rules.shield_cap());
        let torch_radius = rules.torch_radius;
        Self {
            rules,
            player,
            hostiles: Vec::new(),
            status: StatusState::default(),
            shield,
            quest: QuestTracker::default(),
            progression: Progression::default(),
            fireflies: Vec::new(),
            tally: Tally::default(),
            floor_cleared: false,
            vision_turns: 0,
            torch_radius,
            steps_on_floor: 0,
            phase: Phase::Exploring,
            log: TurnLog::default(),
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Defeated | Phase::Quit)
    }

    /// Terminal state: the quest is dropped and only restart or quit remain.
    pub fn defeat(&mut self) {
        if self.phase == Phase::Defeated {
            return;
        }
        self.quest.clear();
        self.phase = Phase::Defeated;
        self.log.push("You have fallen.");
        info!(
            floor = self.progression.floor,
            kills = self.tally.total_kills(),
            "player defeated"
        );
    }

    /// Defeat the player if their health has run out.
    pub fn check_defeat(&mut self) -> bool {
        if self.player.is_alive() {
            return false;
        }
        self.defeat();
        true
    }

    pub fn live_hostile_at(&self, point: Point) -> Option<usize> {
        self.hostiles
            .iter()
            .position(|hostile| hostile.is_alive() && hostile.pos == point)
    }

    pub fn show_exit(&self) -> bool {
        (self.progression.lasting.exit_hint && self.steps_on_floor <= self.rules.exit_hint_steps)
            || self.floor_cleared
    }

    pub fn snapshot(&self, exit: Point) -> Snapshot {
        let cursed = self.status.curse.is_active();
        Snapshot {
            floor: self.progression.floor,
            phase: self.phase,
            player: PlayerView {
                x: self.player.pos.x,
                y: self.player.pos.y,
                health: (!cursed).then_some(self.player.health),
                max_health: self.player.max_health,
                damage: self.player.damage,
            },
            poison: self.status.poison.remaining(),
            curse: self.status.curse.remaining(),
            inversion: self.status.inversion.remaining(),
            shield: self.shield,
            hostiles: self
                .hostiles
                .iter()
                .filter(|hostile| hostile.is_alive())
                .filter_map(|hostile| {
                    hostile.species().map(|species| HostileView {
                        species,
                        x: hostile.pos.x,
                        y: hostile.pos.y,
                        health: hostile.health,
                        max_health: hostile.max_health,
                        attached: hostile.is_attached(),
                        fleeing: hostile.cling.is_some_and(|cling| cling.fleeing),
                    })
                })
                .collect(),
            quest: self.quest.goals().to_vec(),
            tally: self.tally,
            collected: self.progression.collected.clone(),
            fireflies: self.fireflies.iter().map(|fly| (fly.x, fly.y)).collect(),
            show_exit: self.show_exit(),
            exit: (exit.x, exit.y),
            torch_radius: self.torch_radius,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    /// `None` while cursed.
    pub health: Option<i32>,
    pub max_health: i32,
    pub damage: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HostileView {
    pub species: Species,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub max_health: i32,
    pub attached: bool,
    pub fleeing: bool,
}

/// Read-only view for rendering and state dumps.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub floor: u32,
    pub phase: Phase,
    pub player: PlayerView,
    pub poison: i32,
    pub curse: i32,
    pub inversion: i32,
    pub shield: Shield,
    pub hostiles: Vec<HostileView>,
    pub quest: Vec<Goal>,
    pub tally: Tally,
    pub collected: Vec<String>,
    pub fireflies: Vec<(i32, i32)>,
    pub show_exit: bool,
    pub exit: (i32, i32),
    pub torch_radius: i32,
}
