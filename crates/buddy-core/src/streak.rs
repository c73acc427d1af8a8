use crate::dates::days_between;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Consecutive-day check-in counter as of the last processed check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub longest: u32,
    #[serde(default)]
    pub last_check_in_date: Option<NaiveDate>,
}

impl StreakState {
    /// Apply a check-in on `check_in_date`.
    ///
    /// Same-day and out-of-order dates leave the state untouched; a one-day gap
    /// extends the streak; anything longer starts again at 1 because today
    /// always counts.
    pub fn advance(self, check_in_date: NaiveDate) -> StreakState {
        let current = match self.last_check_in_date {
            None => 1,
            Some(last) => match days_between(last, check_in_date) {
                gap if gap <= 0 => return self,
                1 => self.current.saturating_add(1),
                _ => 1,
            },
        };

        StreakState {
            current,
            longest: self.longest.max(current),
            last_check_in_date: Some(check_in_date),
        }
    }

    /// True once a full calendar day has passed without a check-in.
    pub fn is_lapsed(&self, today: NaiveDate) -> bool {
        match self.last_check_in_date {
            Some(last) => days_between(last, today) > 1,
            None => false,
        }
    }

    /// Streak as an observer sees it today: 0 when lapsed or never started.
    pub fn effective_current(&self, today: NaiveDate) -> u32 {
        if self.last_check_in_date.is_none() || self.is_lapsed(today) {
            0
        } else {
            self.current
        }
    }

    /// Repair a loaded state: a streak needs a last check-in date, and
    /// `longest >= current`.
    pub fn sanitize(self) -> StreakState {
        let current = if self.last_check_in_date.is_some() {
            self.current
        } else {
            0
        };
        StreakState {
            current,
            longest: self.longest.max(current),
            ..self
        }
    }
}

/// Free-function form of [`StreakState::advance`].
pub fn advance(state: StreakState, check_in_date: NaiveDate) -> StreakState {
    state.advance(check_in_date)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
