//! Quality-of-experience timing.
//!
//! A [`QoeTimer`] covers a single playlist item. It measures how long the
//! player spends in each [`PlayerState`] while that item is current and when
//! playback milestones were reached, relative to the item's selection.
//! The model replaces its timer every time a new item is selected.

use crate::state::PlayerState;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// Milestone reached on the first position report past zero.
pub const FIRST_FRAME: &str = "firstFrame";

/// State and milestone timing of one playlist item.
#[derive(Debug, Clone)]
pub struct QoeTimer {
    item: Option<usize>,
    origin: Instant,
    milestones: HashMap<&'static str, Duration>,
    /// State currently being timed and when it was entered
    current: Option<(PlayerState, Instant)>,
    totals: HashMap<PlayerState, Duration>,
    entries: HashMap<PlayerState, u32>,
}

impl QoeTimer {
    /// Starts timing `item`, counting the player as being in `state` from
    /// `at` onwards.
    pub fn new(item: Option<usize>, state: PlayerState, at: Instant) -> Self {
        let mut timer = Self {
            item,
            origin: at,
            milestones: HashMap::new(),
            current: None,
            totals: HashMap::new(),
            entries: HashMap::new(),
        };
        timer.enter(state, at);
        timer
    }

    /// Index of the playlist item being timed.
    pub fn item(&self) -> Option<usize> {
        self.item
    }

    /// The state whose interval is still open.
    pub fn current_state(&self) -> Option<PlayerState> {
        self.current.map(|(state, _)| state)
    }

    /// Closes the open interval and opens one for `state`.
    ///
    /// Entering the state that is already open does nothing.
    pub fn enter(&mut self, state: PlayerState, at: Instant) {
        if self.current_state() == Some(state) {
            return;
        }

        if let Some((previous, since)) = self.current.take() {
            *self.totals.entry(previous).or_default() += at.saturating_duration_since(since);
        }

        *self.entries.entry(state).or_default() += 1;
        self.current = Some((state, at));
    }

    /// Records `milestone` at `at`. Only the first occurrence is kept.
    pub fn mark(&mut self, milestone: &'static str, at: Instant) {
        let offset = at.saturating_duration_since(self.origin);
        self.milestones.entry(milestone).or_insert(offset);
    }

    /// Time from item selection to `milestone`, if it was reached.
    pub fn milestone(&self, milestone: &str) -> Option<Duration> {
        self.milestones.get(milestone).copied()
    }

    /// How many times `state` was entered.
    pub fn entries(&self, state: PlayerState) -> u32 {
        self.entries.get(&state).copied().unwrap_or(0)
    }

    /// Total time spent in `state` up to `now`, including the open interval.
    pub fn time_in(&self, state: PlayerState, now: Instant) -> Duration {
        let closed = self.totals.get(&state).copied().unwrap_or_default();
        match self.current {
            Some((open, since)) if open == state => closed + now.saturating_duration_since(since),
            _ => closed,
        }
    }

    /// Serializable summary for analytics hosts.
    pub fn snapshot(&self, now: Instant) -> QoeSnapshot {
        let states = self
            .entries
            .keys()
            .map(|&state| {
                (
                    state.as_str().to_string(),
                    StateTiming {
                        entries: self.entries(state),
                        total_ms: duration_ms(self.time_in(state, now)),
                    },
                )
            })
            .collect();

        let milestones = self
            .milestones
            .iter()
            .map(|(name, offset)| (name.to_string(), duration_ms(*offset)))
            .collect();

        QoeSnapshot {
            item: self.item,
            elapsed_ms: duration_ms(now.saturating_duration_since(self.origin)),
            states,
            milestones,
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Point-in-time copy of a [`QoeTimer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QoeSnapshot {
    pub item: Option<usize>,
    pub elapsed_ms: u64,
    pub states: BTreeMap<String, StateTiming>,
    pub milestones: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateTiming {
    pub entries: u32,
    pub total_ms: u64,
}
