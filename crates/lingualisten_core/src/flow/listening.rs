//! crates/lingualisten_core/src/flow/listening.rs
//!
//! The listening gate: the "continue" action stays locked until the learner
//! has engaged with the audio. A UI-level guard, not a security boundary.

use std::time::{Duration, Instant};

/// How the gate may unlock besides explicit playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockPolicy {
    /// Unlock only when playback is reported.
    Explicit,
    /// Also unlock once the given duration has elapsed since the gate
    /// opened, so a silently failing audio backend cannot trap the user.
    TimerFallback(Duration),
}

/// The fallback delay used when no audio backend signal is expected.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct ListeningGate {
    engaged: bool,
    opened_at: Instant,
    policy: UnlockPolicy,
}

impl ListeningGate {
    pub fn new(policy: UnlockPolicy, opened_at: Instant) -> Self {
        Self {
            engaged: false,
            opened_at,
            policy,
        }
    }

    pub fn has_engaged(&self) -> bool {
        self.engaged
    }

    /// Records that audio playback has started. Idempotent.
    pub fn playback_started(&mut self) {
        self.engaged = true;
    }

    /// Whether the "continue" action is enabled at `now`.
    pub fn can_continue(&self, now: Instant) -> bool {
        if self.engaged {
            return true;
        }
        match self.policy {
            UnlockPolicy::Explicit => false,
            UnlockPolicy::TimerFallback(delay) => now.duration_since(self.opened_at) >= delay,
        }
    }
}
