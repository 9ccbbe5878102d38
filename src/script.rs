//! Scripted key streams for replaying a run without a terminal.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use tracing::warn;

use crate::turn::{Command, Direction, Game, TurnOutcome};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Choose(u8),
    DumpState,
}

/// One keypress per character. Blank lines and lines starting with `#`
/// are skipped.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    inputs: Vec<Input>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line?);
        }
        Ok(Self::parse(&lines.join("\n")))
    }

    pub fn parse(text: &str) -> Self {
        let mut inputs = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            for key in line.chars() {
                match char_to_input(key) {
                    Some(input) => inputs.push(input),
                    None => warn!(?key, "unknown key in script"),
                }
            }
        }
        Self { inputs, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn next_input(&mut self) -> Option<Input> {
        let input = self.inputs.get(self.cursor).copied();
        if input.is_some() {
            self.cursor += 1;
        }
        input
    }
}

fn char_to_input(c: char) -> Option<Input> {
    let step = |dir| Some(Input::Command(Command::Step(dir)));
    match c.to_ascii_lowercase() {
        'w' => step(Direction::North),
        's' => step(Direction::South),
        'a' => step(Direction::West),
        'd' => step(Direction::East),
        'q' => step(Direction::NorthWest),
        'e' => step(Direction::NorthEast),
        'z' => step(Direction::SouthWest),
        'c' => step(Direction::SouthEast),
        '.' => Some(Input::Command(Command::Wait)),
        'x' | ' ' => Some(Input::Command(Command::ShakeOff)),
        'f' => Some(Input::Command(Command::Restart)),
        '\x1B' => Some(Input::Command(Command::Quit)),
        '1' => Some(Input::Choose(1)),
        '2' => Some(Input::Choose(2)),
        '3' => Some(Input::Choose(3)),
        'p' => Some(Input::DumpState),
        _ => None,
    }
}

/// Feed one input to the run. State dumps are the caller's business and
/// come back as `Ignored`.
pub fn apply(game: &mut Game, input: Input) -> TurnOutcome {
    match input {
        Input::Command(command) => game.handle(command),
        Input::Choose(key) => {
            if game.choose_level_option(key) {
                TurnOutcome::Continued
            } else {
                TurnOutcome::Ignored
            }
        }
        Input::DumpState => TurnOutcome::Ignored,
    }
}

/// Play a whole script, stopping early once the run is quit.
pub fn run_script(game: &mut Game, script: &mut ScriptedInput) -> Vec<TurnOutcome> {
    let mut outcomes = Vec::new();
    while let Some(input) = script.next_input() {
        let outcome = apply(game, input);
        outcomes.push(outcome);
        if outcome == TurnOutcome::Quit {
            break;
        }
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_unknown_keys_are_skipped() {
        let mut script = ScriptedInput::parse("# warm up\n\nwd?.\n  1 \n");
        assert_eq!(script.len(), 4);
        assert_eq!(
            script.next_input(),
            Some(Input::Command(Command::Step(Direction::North)))
        );
        assert_eq!(
            script.next_input(),
            Some(Input::Command(Command::Step(Direction::East)))
        );
        assert_eq!(script.next_input(), Some(Input::Command(Command::Wait)));
        assert_eq!(script.next_input(), Some(Input::Choose(1)));
        assert_eq!(script.next_input(), None);
    }

    #[test]
    fn upper_case_keys_match() {
        let mut script = ScriptedInput::parse("QX\x1B");
        assert_eq!(
            script.next_input(),
            Some(Input::Command(Command::Step(Direction::NorthWest)))
        );
        assert_eq!(script.next_input(), Some(Input::Command(Command::ShakeOff)));
        assert_eq!(script.next_input(), Some(Input::Command(Command::Quit)));
    }

    #[test]
    fn empty_script() {
        let mut script = ScriptedInput::parse("# nothing\n");
        assert!(script.is_empty());
        assert_eq!(script.next_input(), None);
    }
}
