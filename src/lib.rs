pub mod ai;
pub mod combat;
pub mod config;
pub mod data;
pub mod map;
pub mod pickup;
pub mod rng;
pub mod script;
pub mod spawn;
pub mod turn;
pub mod world;

pub use config::{ConfigError, Rules};
pub use rng::{Dice, GameRng, LoadedDice};
pub use turn::{Command, Direction, Game, TurnOutcome};
