use crate::badge::{self, Badge};
use crate::dates;
use crate::error::Result;
use crate::event_log::{CheckInEvent, EventKind, EventLog};
use crate::journal::JournalEntry;
use crate::streak::StreakState;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::warn;

// ---------------------------------------------------------------------------
// StateBundle
// ---------------------------------------------------------------------------

/// Everything persisted for one user, loaded and saved as a unit.
///
/// Field names follow the JSON the original app stored, so an exported bundle
/// can be handed back to it. Every field tolerates being missing or malformed
/// and falls back to its zero value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateBundle {
    #[serde(default, deserialize_with = "lenient_log")]
    pub logs: EventLog,
    #[serde(default, deserialize_with = "lenient")]
    pub streak: StreakState,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub badges: Vec<Badge>,
    #[serde(default, deserialize_with = "lenient")]
    pub journal_count: u32,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub journals: Vec<JournalEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub sobriety_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient")]
    pub chat_count: u32,
    /// Contacts and sponsor step work, carried through untouched.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub contacts: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub sponsors: Vec<serde_json::Value>,
}

impl StateBundle {
    pub fn owned_keys(&self) -> BTreeSet<String> {
        badge::owned_keys(&self.badges)
    }

    /// Restore invariants a hand-edited or foreign bundle may violate:
    /// no streak without a last check-in date, `longest >= current` and one
    /// badge per key.
    pub fn sanitize(mut self) -> Self {
        self.streak = self.streak.sanitize();
        let mut seen = HashSet::new();
        let before = self.badges.len();
        self.badges.retain(|b| seen.insert(b.key.clone()));
        if self.badges.len() != before {
            warn!(
                dropped = before - self.badges.len(),
                "dropped badges with duplicate keys"
            );
        }
        self
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let bundle: StateBundle = serde_json::from_str(data)?;
        Ok(bundle.sanitize())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Dashboard numbers as of `today`.
    pub fn summary(&self, today: NaiveDate) -> Summary {
        Summary {
            today,
            check_ins: self.logs.count_by_kind(EventKind::CheckIn),
            check_outs: self.logs.count_by_kind(EventKind::CheckOut),
            streak: self.streak.effective_current(today),
            stored_streak: self.streak.current,
            longest_streak: self.streak.longest,
            last_check_in: self.streak.last_check_in_date,
            lapsed: self.streak.is_lapsed(today),
            journal_count: self.journal_count,
            badges: self.badges.len(),
            days_sober: dates::days_sober(self.sobriety_date, today),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub today: NaiveDate,
    pub check_ins: usize,
    pub check_outs: usize,
    /// Zero once the streak has lapsed.
    pub streak: u32,
    /// Streak as last recorded, before any lapse.
    pub stored_streak: u32,
    pub longest_streak: u32,
    pub last_check_in: Option<NaiveDate>,
    pub lapsed: bool,
    pub journal_count: u32,
    pub badges: usize,
    pub days_sober: Option<i64>,
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(decode_or_default(value))
}

/// Keeps the well-formed elements of a list and drops the rest.
fn lenient_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => return Ok(Vec::new()),
        other => {
            warn!(value = %other, "expected a list, using empty");
            return Ok(Vec::new());
        }
    };
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if kept.len() != total {
        warn!(dropped = total - kept.len(), "dropped malformed list entries");
    }
    Ok(kept)
}

fn lenient_log<'de, D>(deserializer: D) -> std::result::Result<EventLog, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_vec::<D, CheckInEvent>(deserializer).map(EventLog::from_events)
}

fn decode_or_default<T: DeserializeOwned + Default>(value: serde_json::Value) -> T {
    if value.is_null() {
        return T::default();
    }
    match serde_json::from_value(value.clone()) {
        Ok(v) => v,
        Err(e) => {
            warn!(value = %value, error = %e, "malformed field, using default");
            T::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
