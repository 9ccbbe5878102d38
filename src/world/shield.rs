use serde::Serialize;

/// Segmented absorber. Fresh segments turn spent when they soak a point of
/// damage; segments that were already spent are consumed outright. A segment
/// converted by a hit does not soak again within that same hit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Shield {
    pub fresh: i32,
    pub spent: i32,
    pub cap: i32,
}

impl Shield {
    pub fn new(cap: i32) -> Self {
        Self {
            fresh: 0,
            spent: 0,
            cap,
        }
    }

    pub fn equip(&mut self) {
        self.fresh = self.cap;
        self.spent = 0;
    }

    pub fn is_up(&self) -> bool {
        self.fresh > 0 || self.spent > 0
    }

    /// Soak `damage` and return what is left for health.
    pub fn absorb(&mut self, damage: i32) -> i32 {
        let mut left = damage.max(0);

        let from_fresh = left.min(self.fresh);
        left -= from_fresh;
        let from_spent = left.min(self.spent);
        left -= from_spent;

        self.fresh -= from_fresh;
        self.spent = self.spent - from_spent + from_fresh;
        left
    }

    /// Wear for one step: a spent segment if there is one, else a fresh one.
    pub fn step_cost(&mut self) {
        if self.spent > 0 {
            self.spent -= 1;
        } else if self.fresh > 0 {
            self.fresh -= 1;
        }
    }

    pub fn clear(&mut self) {
        self.fresh = 0;
        self.spent = 0;
    }
}
