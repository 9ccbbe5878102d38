use serde::Serialize;

use crate::data::items::ItemFamily;
use crate::data::monsters::Species;
use crate::rng::{Dice, Span};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Objective {
    /// Kill hostiles; `None` accepts any species.
    Kill(Option<Species>),
    Collect(ItemFamily),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Goal {
    pub objective: Objective,
    pub target: u32,
    pub progress: u32,
}

impl Goal {
    pub fn is_met(&self) -> bool {
        self.progress >= self.target
    }
}

/// At most one quest at a time; an empty goal list means none is active.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QuestTracker {
    goals: Vec<Goal>,
}

impl QuestTracker {
    pub fn is_active(&self) -> bool {
        !self.goals.is_empty()
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Start a single-goal quest with a sampled target. Ignored while
    /// another quest runs.
    pub fn activate(&mut self, objective: Objective, target: Span, dice: &mut dyn Dice) -> bool {
        if self.is_active() {
            return false;
        }
        let target = target.roll(dice).max(1) as u32;
        self.goals = vec![Goal {
            objective,
            target,
            progress: 0,
        }];
        true
    }

    pub fn record_kill(&mut self, species: Species) {
        for goal in &mut self.goals {
            if let Objective::Kill(wanted) = goal.objective {
                if wanted.is_none_or(|wanted| wanted == species) {
                    goal.progress += 1;
                }
            }
        }
    }

    pub fn record_pickup(&mut self, family: ItemFamily) {
        for goal in &mut self.goals {
            if goal.objective == Objective::Collect(family) {
                goal.progress += 1;
            }
        }
    }

    /// True exactly once: on the call that finds every goal met. The quest
    /// is cleared in the same call.
    pub fn check_complete(&mut self) -> bool {
        if self.is_active() && self.goals.iter().all(Goal::is_met) {
            self.clear();
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.goals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::LoadedDice;

    #[test]
    fn activation_samples_target_once() {
        let mut dice = LoadedDice::new([7, 9]);
        let mut quest = QuestTracker::default();
        assert!(quest.activate(Objective::Kill(None), Span::new(5, 10), &mut dice));
        assert!(!quest.activate(Objective::Kill(None), Span::new(5, 10), &mut dice));
        assert_eq!(quest.goals()[0].target, 7);
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn kills_count_toward_matching_goals() {
        let mut dice = LoadedDice::new([2]);
        let mut quest = QuestTracker::default();
        quest.activate(Objective::Kill(Some(Species::Rat)), Span::new(2, 2), &mut dice);
        quest.record_kill(Species::Bear);
        quest.record_kill(Species::Rat);
        assert!(!quest.check_complete());
        quest.record_kill(Species::Rat);
        assert!(quest.check_complete());
        assert!(!quest.is_active());
    }

    #[test]
    fn completion_is_idempotent() {
        let mut dice = LoadedDice::new([1]);
        let mut quest = QuestTracker::default();
        quest.activate(Objective::Kill(None), Span::new(1, 1), &mut dice);
        quest.record_kill(Species::Ghost);
        assert!(quest.check_complete());
        let after = quest.clone();
        assert!(!quest.check_complete());
        assert_eq!(quest, after);
    }

    #[test]
    fn collect_goals_track_pickups() {
        let mut dice = LoadedDice::new([1]);
        let mut quest = QuestTracker::default();
        quest.activate(Objective::Collect(ItemFamily::Medkit), Span::new(1, 1), &mut dice);
        quest.record_kill(Species::Rat);
        quest.record_pickup(ItemFamily::Shield);
        assert!(!quest.check_complete());
        quest.record_pickup(ItemFamily::Medkit);
        assert!(quest.check_complete());
    }

    #[test]
    fn inactive_quest_never_completes() {
        let mut quest = QuestTracker::default();
        quest.record_kill(Species::Rat);
        assert!(!quest.check_complete());
    }
}
