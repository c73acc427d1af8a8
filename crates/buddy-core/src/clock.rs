use crate::dates;
use crate::error::{BuddyError, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Timezone
// ---------------------------------------------------------------------------

/// Zone in which an instant is turned into "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timezone {
    /// The host's local zone.
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl Timezone {
    pub fn date_of(self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Timezone::Local => instant.with_timezone(&chrono::Local).date_naive(),
            Timezone::Utc => instant.date_naive(),
            Timezone::Fixed(offset) => dates::local_date(instant, offset),
        }
    }

    /// `YYYY-MM-DD HH:MM` in this zone.
    pub fn format_instant(self, instant: DateTime<Utc>) -> String {
        const FMT: &str = "%Y-%m-%d %H:%M";
        match self {
            Timezone::Local => instant.with_timezone(&chrono::Local).format(FMT).to_string(),
            Timezone::Utc => instant.format(FMT).to_string(),
            Timezone::Fixed(offset) => instant.with_timezone(&offset).format(FMT).to_string(),
        }
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Local => f.write_str("local"),
            Timezone::Utc => f.write_str("utc"),
            Timezone::Fixed(offset) => {
                let secs = offset.local_minus_utc();
                let sign = if secs < 0 { '-' } else { '+' };
                let abs = secs.abs();
                write!(f, "{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
            }
        }
    }
}

impl std::str::FromStr for Timezone {
    type Err = BuddyError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BuddyError::InvalidTimezone(s.to_string());
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => return Ok(Timezone::Local),
            "utc" | "z" => return Ok(Timezone::Utc),
            _ => {}
        }

        let s = s.trim();
        let (sign, rest) = match s.chars().next() {
            Some('+') => (1, &s[1..]),
            Some('-') => (-1, &s[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hours) || !two_digits(minutes) {
            return Err(invalid());
        }
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..60).contains(&minutes) {
            return Err(invalid());
        }
        let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)?;
        Ok(Timezone::Fixed(offset))
    }
}

impl TryFrom<String> for Timezone {
    type Error = BuddyError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Timezone> for String {
    fn from(tz: Timezone) -> Self {
        tz.to_string()
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "now" and "today". Injected so streak logic never reads the
/// wall clock directly.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn timezone(&self) -> Timezone;

    fn today(&self) -> NaiveDate {
        self.timezone().date_of(self.now())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    tz: Timezone,
}

impl SystemClock {
    pub fn new(tz: Timezone) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn timezone(&self) -> Timezone {
        self.tz
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<DateTime<Utc>>,
    tz: Timezone,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Mutex::new(instant),
            tz: Timezone::Utc,
        }
    }

    /// Noon UTC on `date`, far enough from midnight that small offsets
    /// keep the same calendar day.
    pub fn on(date: NaiveDate) -> Self {
        Self::new(noon_utc(date))
    }

    pub fn with_timezone(mut self, tz: Timezone) -> Self {
        self.tz = tz;
        self
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }

    pub fn set_date(&self, date: NaiveDate) {
        self.set(noon_utc(date));
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.instant.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn timezone(&self) -> Timezone {
        self.tz
    }
}

fn noon_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timezone_parse_and_display() {
        assert_eq!("local".parse::<Timezone>().unwrap(), Timezone::Local);
        assert_eq!("UTC".parse::<Timezone>().unwrap(), Timezone::Utc);

        let tz: Timezone = "+05:30".parse().unwrap();
        assert_eq!(tz.to_string(), "+05:30");
        let tz: Timezone = "-08:00".parse().unwrap();
        assert_eq!(tz.to_string(), "-08:00");

        for bad in [
            "", "05:00", "+5", "+05:75", "+99:00", "mars", "+-01:00", "-+01:00", "+1:00", "+01:-5",
        ] {
            assert!(bad.parse::<Timezone>().is_err(), "expected invalid: {bad}");
        }
    }

    #[test]
    fn timezone_yaml_is_a_string() {
        let yaml = serde_yaml::to_string(&Timezone::Utc).unwrap();
        assert_eq!(yaml.trim(), "utc");
        let parsed: Timezone = serde_yaml::from_str("'+02:00'").unwrap();
        assert_eq!(parsed.to_string(), "+02:00");
        assert!(serde_yaml::from_str::<Timezone>("nowhere").is_err());
    }

    #[test]
    fn fixed_clock_today_follows_timezone() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap();
        let utc = FixedClock::new(instant);
        assert_eq!(utc.today(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let east = FixedClock::new(instant).with_timezone("+03:00".parse().unwrap());
        assert_eq!(east.today(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn format_instant_uses_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 10, 23, 30, 0).unwrap();
        assert_eq!(Timezone::Utc.format_instant(instant), "2024-03-10 23:30");
        let tz: Timezone = "+02:00".parse().unwrap();
        assert_eq!(tz.format_instant(instant), "2024-03-11 01:30");
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());
        clock.advance(Duration::days(1));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        clock.set_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }
}
