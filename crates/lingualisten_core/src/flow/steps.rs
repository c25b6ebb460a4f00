//! crates/lingualisten_core/src/flow/steps.rs
//!
//! Tracks which step of the fixed intake → listen → quiz → results sequence
//! the user occupies, and which steps have ever been visited.

use std::collections::BTreeSet;

/// A cursor over a fixed N-step sequence, 1-based.
///
/// The visited set only ever grows until [`StepTracker::reset`] and is used
/// purely for progress-indicator rendering, never for gating.
#[derive(Debug, Clone)]
pub struct StepTracker {
    total_steps: usize,
    current_step: usize,
    visited: BTreeSet<usize>,
}

impl StepTracker {
    pub fn new(total_steps: usize) -> Self {
        Self {
            total_steps,
            current_step: 1,
            visited: BTreeSet::from([1]),
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn visited(&self) -> impl Iterator<Item = usize> + '_ {
        self.visited.iter().copied()
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step == 1
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == self.total_steps
    }

    /// Moves to `step`. A silent no-op when `step` is outside `[1, N]`.
    pub fn go_to_step(&mut self, step: usize) {
        if step < 1 || step > self.total_steps {
            return;
        }
        self.current_step = step;
        self.visited.insert(step);
    }

    /// Advances one step; a no-op at the last step.
    pub fn next(&mut self) {
        self.go_to_step(self.current_step + 1);
    }

    /// Goes back one step; a no-op at the first step.
    pub fn prev(&mut self) {
        self.go_to_step(self.current_step.saturating_sub(1));
    }

    /// Returns to step 1 and clears the visited set down to `{1}`.
    pub fn reset(&mut self) {
        self.current_step = 1;
        self.visited = BTreeSet::from([1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_step_one_with_it_visited() {
        let tracker = StepTracker::new(4);
        assert_eq!(tracker.current_step(), 1);
        assert_eq!(tracker.visited().collect::<Vec<_>>(), vec![1]);
        assert!(tracker.is_first_step());
        assert!(!tracker.is_last_step());
    }

    #[test]
    fn out_of_range_steps_never_change_the_current_step() {
        let mut tracker = StepTracker::new(4);
        tracker.go_to_step(3);

        tracker.go_to_step(0);
        assert_eq!(tracker.current_step(), 3);

        tracker.go_to_step(5);
        assert_eq!(tracker.current_step(), 3);
    }

    #[test]
    fn next_and_prev_stop_at_the_boundaries() {
        let mut tracker = StepTracker::new(2);
        tracker.prev();
        assert_eq!(tracker.current_step(), 1);

        tracker.next();
        tracker.next();
        assert_eq!(tracker.current_step(), 2);
        assert!(tracker.is_last_step());
    }

    #[test]
    fn visited_set_grows_monotonically_and_revisits_keep_it() {
        let mut tracker = StepTracker::new(4);
        tracker.next();
        tracker.next();
        tracker.prev();
        assert_eq!(tracker.visited().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(tracker.current_step(), 2);
    }

    #[test]
    fn reset_returns_to_the_initial_state() {
        let mut tracker = StepTracker::new(4);
        tracker.go_to_step(4);
        tracker.reset();
        assert_eq!(tracker.current_step(), 1);
        assert_eq!(tracker.visited().collect::<Vec<_>>(), vec![1]);
    }
}
