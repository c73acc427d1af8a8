use crate::badge::{self, Badge, BadgeRule, Signals};
use crate::clock::Clock;
use crate::event_log::{CheckInEvent, EventKind};
use crate::journal::JournalEntry;
use crate::state::StateBundle;
use crate::streak::StreakState;
use serde::Serialize;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What one check-in did to a bundle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInOutcome {
    pub event: CheckInEvent,
    pub previous_streak: StreakState,
    pub streak: StreakState,
    pub new_badges: Vec<Badge>,
}

impl CheckInOutcome {
    /// False for a second check-in on the same day.
    pub fn streak_changed(&self) -> bool {
        self.previous_streak != self.streak
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalOutcome {
    pub entry: JournalEntry,
    pub journal_count: u32,
    pub new_badges: Vec<Badge>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Record a check-in: append it, advance the streak to the clock's date, then
/// award any badge whose milestone was just reached.
pub fn check_in(
    bundle: &mut StateBundle,
    location: Option<String>,
    clock: &dyn Clock,
    rules: &[BadgeRule],
) -> CheckInOutcome {
    let event = bundle.logs.append(EventKind::CheckIn, location, clock);

    let previous_streak = bundle.streak;
    bundle.streak = bundle.streak.advance(clock.today());

    let count = count_u32(bundle.logs.count_by_kind(EventKind::CheckIn));
    let signals = Signals::check_in(count, bundle.streak.current);
    let new_badges = award(bundle, rules, &signals, clock);

    info!(
        id = %event.id,
        check_ins = count,
        streak = bundle.streak.current,
        longest = bundle.streak.longest,
        "checked in"
    );

    CheckInOutcome {
        event,
        previous_streak,
        streak: bundle.streak,
        new_badges,
    }
}

/// Check-outs are logged but never move the streak or award badges.
pub fn check_out(bundle: &mut StateBundle, clock: &dyn Clock) -> CheckInEvent {
    let event = bundle.logs.append(EventKind::CheckOut, None, clock);
    info!(id = %event.id, "checked out");
    event
}

pub fn add_journal_entry(
    bundle: &mut StateBundle,
    mood: &str,
    text: &str,
    clock: &dyn Clock,
    rules: &[BadgeRule],
) -> JournalOutcome {
    let entry = JournalEntry::new(mood, text, clock);
    bundle.journal_count = bundle.journal_count.saturating_add(1);
    bundle.journals.push(entry.clone());

    let signals = Signals::journal(bundle.journal_count);
    let new_badges = award(bundle, rules, &signals, clock);

    info!(
        id = %entry.id,
        journals = bundle.journal_count,
        "journal entry added"
    );

    JournalOutcome {
        entry,
        journal_count: bundle.journal_count,
        new_badges,
    }
}

fn award(
    bundle: &mut StateBundle,
    rules: &[BadgeRule],
    signals: &Signals,
    clock: &dyn Clock,
) -> Vec<Badge> {
    let mut owned = bundle.owned_keys();
    let new_badges = badge::evaluate(rules, &mut owned, signals, clock);
    if new_badges.is_empty() {
        debug!(?signals, "no milestone reached");
    }
    for b in &new_badges {
        info!(key = %b.key, label = %b.label, "badge earned");
    }
    bundle.badges.extend(new_badges.iter().cloned());
    new_badges
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
