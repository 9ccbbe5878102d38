//! The turn pipeline and the run that owns it.

use std::fmt;

use tracing::{debug, info};

use crate::ai::{self, StepResult};
use crate::combat;
use crate::config::Rules;
use crate::map::{Carver, Floor, Grid, RoomsAndCorridors, Visibility};
use crate::pickup;
use crate::rng::{Dice, GameRng};
use crate::spawn;
use crate::world::{Phase, Snapshot, WorldState, status};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Step(Direction),
    Wait,
    ShakeOff,
    Restart,
    Quit,
}

/// What a front end reacts to after handing over a command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Nothing happened; the command was not valid in this phase.
    Ignored,
    Continued,
    FloorChoice,
    Defeated,
    Quit,
}

pub struct Game {
    pub world: WorldState,
    pub floor: Floor,
    dice: Box<dyn Dice>,
    carver: Box<dyn Carver>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("floor", &self.world.progression.floor)
            .field("phase", &self.world.phase)
            .finish()
    }
}

impl Game {
    /// Start a run and generate its first floor.
    pub fn new(rules: Rules, dice: Box<dyn Dice>, carver: Box<dyn Carver>) -> Self {
        let floor = Floor::solid(rules.map_width, rules.map_height);
        let mut game = Self {
            world: WorldState::new(rules),
            floor,
            dice,
            carver,
        };
        game.generate_floor();
        game
    }

    pub fn seeded(rules: Rules, seed: u64) -> Self {
        Self::new(
            rules,
            Box::new(GameRng::seeded(seed)),
            Box::new(RoomsAndCorridors::default()),
        )
    }

    pub fn phase(&self) -> Phase {
        self.world.phase
    }

    pub fn snapshot(&self) -> Snapshot {
        self.world.snapshot(self.floor.exit())
    }

    pub fn drain_log(&mut self) -> Vec<String> {
        self.world.log.drain()
    }

    pub fn handle(&mut self, command: Command) -> TurnOutcome {
        match (self.world.phase, command) {
            (Phase::Quit, _) => TurnOutcome::Ignored,
            (_, Command::Quit) => {
                self.world.phase = Phase::Quit;
                info!(floor = self.world.progression.floor, "run abandoned");
                TurnOutcome::Quit
            }
            (Phase::Defeated, Command::Restart) => {
                self.restart();
                TurnOutcome::Continued
            }
            (Phase::Defeated | Phase::ChoicePending, _) => TurnOutcome::Ignored,
            (Phase::Exploring, Command::Restart) => TurnOutcome::Ignored,
            (Phase::Exploring, Command::Step(dir)) => self.play_turn(Some(dir), false),
            (Phase::Exploring, Command::Wait) => self.play_turn(None, false),
            (Phase::Exploring, Command::ShakeOff) => self.play_turn(None, true),
        }
    }

    fn play_turn(&mut self, step: Option<Direction>, shake: bool) -> TurnOutcome {
        let outcome = self.resolve_turn(step, shake);
        if outcome != TurnOutcome::FloorChoice {
            self.refresh_view();
        }
        outcome
    }

    fn resolve_turn(&mut self, step: Option<Direction>, shake: bool) -> TurnOutcome {
        let world = &mut self.world;
        let floor = &mut self.floor;
        let dice = self.dice.as_mut();

        if shake && !status::shake_off(world, floor, dice) {
            world.log.push("Nothing is clinging to you.");
        }

        if let Some(dir) = step {
            let (dx, dy) = dir.delta();
            let (dx, dy) = world.status.steer(dx, dy);
            world.shield.step_cost();
            match ai::player_step(world, floor, dx, dy) {
                StepResult::ReachedExit => {
                    world.phase = Phase::ChoicePending;
                    world.log.push("You found the way down. Choose a bundle: 1, 2 or 3.");
                    info!(floor = world.progression.floor, "exit reached");
                    return TurnOutcome::FloorChoice;
                }
                StepResult::Blocked => debug!(dx, dy, "step blocked"),
                StepResult::Struck { .. } | StepResult::Moved => {}
            }
        }

        combat::resolve_contacts(world, floor, dice);
        if world.is_over() {
            return TurnOutcome::Defeated;
        }
        pickup::collect_items(world, floor, dice);
        if world.check_defeat() {
            return TurnOutcome::Defeated;
        }
        reward_quest(world);

        ai::advance_hostiles(world, floor, dice);
        if world.progression.lasting.fireflies && !world.fireflies.is_empty() {
            ai::drift_fireflies(world, floor, dice);
        }

        combat::resolve_contacts(world, floor, dice);
        if world.is_over() {
            return TurnOutcome::Defeated;
        }
        reward_quest(world);

        status::tick_poison(world);
        if world.check_defeat() {
            return TurnOutcome::Defeated;
        }
        status::tick_curse(world);
        status::tick_inversion(world, floor, dice);
        if world.check_defeat() {
            return TurnOutcome::Defeated;
        }
        TurnOutcome::Continued
    }

    /// Full sight while a quest vision lasts, otherwise torch plus fireflies.
    fn refresh_view(&mut self) {
        let world = &mut self.world;
        if world.vision_turns > 0 {
            self.floor.reveal_all();
            world.vision_turns -= 1;
            return;
        }
        let radius = Rules::fov_radius(world.torch_radius);
        self.floor.compute(world.player.pos, radius);
        for fly in &world.fireflies {
            self.floor.light(*fly, world.rules.firefly_radius);
        }
    }

    /// Accept one of the exit bundles. Only valid while a choice is
    /// pending; anything else leaves the run untouched.
    pub fn choose_level_option(&mut self, key: u8) -> bool {
        if self.world.phase != Phase::ChoicePending {
            return false;
        }
        let Some(bundle) = self.world.progression.apply_bundle(key, self.dice.as_mut()) else {
            return false;
        };
        self.world.log.push(format!("You take \"{}\".", bundle.title));
        self.world.phase = Phase::Exploring;
        self.generate_floor();
        true
    }

    /// Throw the run away and begin again on floor 1 with the same rules.
    pub fn restart(&mut self) {
        let rules = self.world.rules.clone();
        self.world = WorldState::new(rules);
        self.generate_floor();
        info!("run restarted");
    }

    fn generate_floor(&mut self) {
        let world = &mut self.world;
        let dice = self.dice.as_mut();

        if world.progression.floor == 1 {
            world.progression.roll_first_floor(dice);
        }
        world.progression.begin_floor();

        self.floor = self
            .carver
            .carve(world.rules.map_width, world.rules.map_height, dice);
        world.hostiles.clear();
        world.steps_on_floor = 0;
        world.floor_cleared = false;
        world.status.inversion.clear();
        world.torch_radius = world
            .rules
            .torch_for(world.progression.current.torch_delta);
        world.player.pos = self.floor.spawn_point();

        spawn::populate_floor(world, &mut self.floor, dice);
        spawn::release_fireflies(world, &self.floor, dice);
        info!(
            floor = world.progression.floor,
            hostiles = world.hostiles.len(),
            items = self.floor.items().len(),
            torch = world.torch_radius,
            "floor generated"
        );
        self.refresh_view();
    }
}

fn reward_quest(world: &mut WorldState) {
    if world.quest.check_complete() {
        world.vision_turns = 1;
        world.log.push("Quest complete! The whole floor is laid bare.");
        info!(floor = world.progression.floor, "quest complete");
    }
}
