use crate::clock::{Clock, Timezone};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "Check-In")]
    CheckIn,
    #[serde(rename = "Check-Out")]
    CheckOut,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::CheckIn => "check-in",
            EventKind::CheckOut => "check-out",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckInEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

// ---------------------------------------------------------------------------
// EventLog
// ---------------------------------------------------------------------------

/// Append-only record of check-ins and check-outs, kept in chronological
/// order. Display code reads it newest-first.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<CheckInEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from persisted events in any order. Events whose id was
    /// already seen are dropped so ids stay unique.
    pub fn from_events(events: impl IntoIterator<Item = CheckInEvent>) -> Self {
        let mut seen = HashSet::new();
        let mut events: Vec<CheckInEvent> = events
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
        // stable: equal timestamps keep their persisted relative order
        events.sort_by_key(|e| e.timestamp);
        Self { events }
    }

    pub fn append(
        &mut self,
        kind: EventKind,
        location: Option<String>,
        clock: &dyn Clock,
    ) -> CheckInEvent {
        let event = CheckInEvent {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: clock.now(),
            kind,
            location: match kind {
                EventKind::CheckIn => location,
                EventKind::CheckOut => None,
            },
        };
        self.events.push(event.clone());
        event
    }

    pub fn count_by_kind(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn most_recent_check_in_date(&self, tz: Timezone) -> Option<NaiveDate> {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::CheckIn)
            .map(|e| e.timestamp)
            .max()
            .map(|instant| tz.date_of(instant))
    }

    pub fn iter_newest_first(&self) -> impl Iterator<Item = &CheckInEvent> {
        self.events.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events newest-first, the order the persisted bundle stores them in.
    pub fn to_newest_first(&self) -> Vec<CheckInEvent> {
        self.iter_newest_first().cloned().collect()
    }
}

// Persisted newest-first, like the original meeting log.
impl Serialize for EventLog {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter_newest_first())
    }
}

impl<'de> Deserialize<'de> for EventLog {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<CheckInEvent>::deserialize(deserializer).map(EventLog::from_events)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, TimeZone};

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap())
    }

    #[test]
    fn append_stamps_and_counts() {
        let clock = clock();
        let mut log = EventLog::new();
        let first = log.append(EventKind::CheckIn, Some("Lat: 1.0, Lon: 2.0".into()), &clock);
        clock.advance(Duration::hours(1));
        log.append(EventKind::CheckOut, Some("ignored".into()), &clock);
        clock.advance(Duration::hours(1));
        log.append(EventKind::CheckIn, None, &clock);

        assert_eq!(first.timestamp, Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap());
        assert_eq!(log.len(), 3);
        assert_eq!(log.count_by_kind(EventKind::CheckIn), 2);
        assert_eq!(log.count_by_kind(EventKind::CheckOut), 1);

        let newest: Vec<EventKind> = log.iter_newest_first().map(|e| e.kind).collect();
        assert_eq!(
            newest,
            vec![EventKind::CheckIn, EventKind::CheckOut, EventKind::CheckIn]
        );
        let checkout = log.iter_newest_first().nth(1).unwrap();
        assert!(checkout.location.is_none(), "check-outs carry no location");
    }

    #[test]
    fn ids_are_unique() {
        let clock = clock();
        let mut log = EventLog::new();
        let ids: HashSet<String> = (0..50)
            .map(|_| log.append(EventKind::CheckIn, None, &clock).id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn most_recent_check_in_date_ignores_check_outs() {
        let clock = clock();
        let mut log = EventLog::new();
        assert_eq!(log.most_recent_check_in_date(Timezone::Utc), None);

        log.append(EventKind::CheckIn, None, &clock);
        clock.advance(Duration::days(2));
        log.append(EventKind::CheckOut, None, &clock);

        assert_eq!(
            log.most_recent_check_in_date(Timezone::Utc),
            NaiveDate::from_ymd_opt(2024, 3, 10)
        );
    }

    #[test]
    fn most_recent_check_in_date_uses_observer_zone() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 10, 22, 0, 0).unwrap());
        let mut log = EventLog::new();
        log.append(EventKind::CheckIn, None, &clock);
        let tz: Timezone = "+04:00".parse().unwrap();
        assert_eq!(
            log.most_recent_check_in_date(tz),
            NaiveDate::from_ymd_opt(2024, 3, 11)
        );
    }

    #[test]
    fn from_events_sorts_and_drops_duplicate_ids() {
        let t = |h| Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap();
        let event = |id: &str, h| CheckInEvent {
            id: id.to_string(),
            timestamp: t(h),
            kind: EventKind::CheckIn,
            location: None,
        };
        let log = EventLog::from_events(vec![event("b", 10), event("a", 8), event("b", 12)]);
        let ids: Vec<&str> = log.iter_newest_first().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(log.to_newest_first()[0].id, "b");
    }

    #[test]
    fn serialises_in_original_log_shape() {
        let clock = clock();
        let mut log = EventLog::new();
        let event = log.append(EventKind::CheckIn, Some("GPS Unavailable".into()), &clock);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Check-In");
        assert_eq!(json["location"], "GPS Unavailable");
        assert!(json["timestamp"].as_str().unwrap().starts_with("2024-03-10T09:00:00"));
    }
}
