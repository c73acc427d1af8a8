use crate::clock::Clock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const DEFAULT_ICON: &str = "🏅";

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// Counter a badge rule watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CheckIns,
    Journals,
    Streak,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::CheckIns => "check_ins",
            Metric::Journals => "journals",
            Metric::Streak => "streak",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BadgeRule
// ---------------------------------------------------------------------------

/// Fires once, at the moment `metric` becomes exactly `threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRule {
    pub key: String,
    pub label: String,
    pub metric: Metric,
    pub threshold: u32,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl BadgeRule {
    pub fn new(key: &str, label: &str, metric: Metric, threshold: u32) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            metric,
            threshold,
            icon: default_icon(),
        }
    }

    fn fires(&self, signals: &Signals) -> bool {
        signals.value(self.metric) == Some(self.threshold)
    }
}

/// Milestones the app ships with.
pub fn default_rules() -> Vec<BadgeRule> {
    vec![
        BadgeRule::new("first_meeting", "First Check-In", Metric::CheckIns, 1),
        BadgeRule::new("seven_meetings", "7 Meetings Logged", Metric::CheckIns, 7),
        BadgeRule::new("first_journal", "First Journal Entry", Metric::Journals, 1),
        BadgeRule::new("five_journals", "5 Journal Entries", Metric::Journals, 5),
        BadgeRule::new("seven_streak", "7-Day Streak", Metric::Streak, 7),
    ]
}

// ---------------------------------------------------------------------------
// Badge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub key: String,
    pub label: String,
    pub earned_at: DateTime<Utc>,
    #[serde(default = "default_icon")]
    pub icon: String,
}

pub fn owned_keys(badges: &[Badge]) -> BTreeSet<String> {
    badges.iter().map(|b| b.key.clone()).collect()
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Counter values right after a triggering event. A `None` counter did not
/// change in that event, so rules watching it are not consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signals {
    pub check_ins: Option<u32>,
    pub journals: Option<u32>,
    pub streak: Option<u32>,
}

impl Signals {
    pub fn check_in(check_ins: u32, streak: u32) -> Self {
        Self {
            check_ins: Some(check_ins),
            journals: None,
            streak: Some(streak),
        }
    }

    pub fn journal(journals: u32) -> Self {
        Self {
            check_ins: None,
            journals: Some(journals),
            streak: None,
        }
    }

    pub fn value(&self, metric: Metric) -> Option<u32> {
        match metric {
            Metric::CheckIns => self.check_ins,
            Metric::Journals => self.journals,
            Metric::Streak => self.streak,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Award every rule that fires on `signals` and whose key is not yet in
/// `owned`. Each awarded key is inserted into `owned` before the next rule is
/// looked at, so a batch never contains the same key twice.
pub fn evaluate(
    rules: &[BadgeRule],
    owned: &mut BTreeSet<String>,
    signals: &Signals,
    clock: &dyn Clock,
) -> Vec<Badge> {
    let mut awarded = Vec::new();
    for rule in rules {
        if !rule.fires(signals) || owned.contains(&rule.key) {
            continue;
        }
        owned.insert(rule.key.clone());
        awarded.push(Badge {
            id: uuid::Uuid::new_v4().to_string(),
            key: rule.key.clone(),
            label: rule.label.clone(),
            earned_at: clock.now(),
            icon: rule.icon.clone(),
        });
    }
    awarded
}

/// Problems with a rule table, one message per issue.
pub fn rule_problems(rules: &[BadgeRule]) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen = BTreeSet::new();
    for rule in rules {
        if rule.key.trim().is_empty() {
            problems.push(format!("rule '{}' has an empty key", rule.label));
        } else if !seen.insert(rule.key.as_str()) {
            problems.push(format!("duplicate badge key '{}'", rule.key));
        }
        if rule.label.trim().is_empty() {
            problems.push(format!("badge '{}' has an empty label", rule.key));
        }
        if rule.threshold == 0 {
            problems.push(format!(
                "badge '{}' has threshold 0 and can never fire",
                rule.key
            ));
        }
    }
    problems
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock::on(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())
    }

    fn keys(badges: &[Badge]) -> Vec<&str> {
        badges.iter().map(|b| b.key.as_str()).collect()
    }

    fn all(check_ins: u32, journals: u32, streak: u32) -> Signals {
        Signals {
            check_ins: Some(check_ins),
            journals: Some(journals),
            streak: Some(streak),
        }
    }

    #[test]
    fn first_check_in_fires_once() {
        let clock = clock();
        let rules = default_rules();
        let mut owned = BTreeSet::new();

        let first = evaluate(&rules, &mut owned, &Signals::check_in(1, 1), &clock);
        assert_eq!(keys(&first), vec!["first_meeting"]);
        assert_eq!(first[0].label, "First Check-In");
        assert_eq!(first[0].earned_at, clock.now());

        for _ in 0..3 {
            let again = evaluate(&rules, &mut owned, &Signals::check_in(1, 1), &clock);
            assert!(again.is_empty());
        }
    }

    #[test]
    fn owned_key_is_never_reemitted() {
        let clock = clock();
        let mut owned: BTreeSet<String> = ["first_meeting".to_string()].into();
        let out = evaluate(&default_rules(), &mut owned, &all(1, 0, 1), &clock);
        assert!(out.is_empty());
        assert_eq!(owned.len(), 1);
    }

    #[test]
    fn seven_check_ins_and_seven_day_streak_in_one_batch() {
        let clock = clock();
        let mut owned = BTreeSet::new();
        let out = evaluate(&default_rules(), &mut owned, &all(7, 0, 7), &clock);
        assert_eq!(keys(&out), vec!["seven_meetings", "seven_streak"]);
        assert!(owned.contains("seven_meetings"));
        assert!(owned.contains("seven_streak"));
    }

    #[test]
    fn thresholds_match_exactly() {
        let clock = clock();
        let mut owned = BTreeSet::new();
        let out = evaluate(&default_rules(), &mut owned, &all(8, 6, 8), &clock);
        assert!(out.is_empty(), "counts past a threshold do not fire");
    }

    #[test]
    fn unchanged_counters_are_not_consulted() {
        let clock = clock();
        let mut owned = BTreeSet::new();
        // journal count is already 1 but this event is a check-in
        let signals = Signals {
            check_ins: Some(2),
            journals: None,
            streak: Some(2),
        };
        assert!(evaluate(&default_rules(), &mut owned, &signals, &clock).is_empty());

        let out = evaluate(&default_rules(), &mut owned, &Signals::journal(1), &clock);
        assert_eq!(keys(&out), vec!["first_journal"]);
    }

    #[test]
    fn rules_sharing_a_key_emit_it_once() {
        let clock = clock();
        let rules = vec![
            BadgeRule::new("dedicated", "Dedicated", Metric::CheckIns, 3),
            BadgeRule::new("dedicated", "Dedicated (streak)", Metric::Streak, 3),
        ];
        let mut owned = BTreeSet::new();
        let out = evaluate(&rules, &mut owned, &Signals::check_in(3, 3), &clock);
        assert_eq!(keys(&out), vec!["dedicated"]);
        assert_eq!(out[0].label, "Dedicated");
    }

    #[test]
    fn no_duplicate_keys_across_a_long_history() {
        let clock = clock();
        let rules = default_rules();
        let mut owned = BTreeSet::new();
        let mut emitted = Vec::new();

        let mut streak = 0;
        for check_ins in 1..=30u32 {
            // a missed day every tenth check-in
            streak = if check_ins % 10 == 0 { 1 } else { streak + 1 };
            emitted.extend(evaluate(&rules, &mut owned, &Signals::check_in(check_ins, streak), &clock));
            if check_ins <= 8 {
                emitted.extend(evaluate(&rules, &mut owned, &Signals::journal(check_ins), &clock));
            }
            // replay the same signals, as a double-submitted request would
            emitted.extend(evaluate(&rules, &mut owned, &Signals::check_in(check_ins, streak), &clock));
        }

        let unique: BTreeSet<&str> = emitted.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(unique.len(), emitted.len());
        assert_eq!(unique.len(), 5, "every default milestone is reached: {unique:?}");
    }

    #[test]
    fn owned_keys_collects_from_badges() {
        let clock = clock();
        let mut owned = BTreeSet::new();
        let out = evaluate(&default_rules(), &mut owned, &all(1, 1, 1), &clock);
        assert_eq!(owned_keys(&out), owned);
        assert!(out.iter().all(|b| b.icon == DEFAULT_ICON));
    }

    #[test]
    fn rule_problems_reports_each_issue() {
        assert!(rule_problems(&default_rules()).is_empty());
        let rules = vec![
            BadgeRule::new("a", "A", Metric::CheckIns, 1),
            BadgeRule::new("a", "", Metric::Journals, 0),
        ];
        let problems = rule_problems(&rules);
        assert_eq!(problems.len(), 3, "{problems:?}");
        assert!(problems.iter().any(|p| p.contains("duplicate badge key 'a'")));
        assert!(problems.iter().any(|p| p.contains("empty label")));
        assert!(problems.iter().any(|p| p.contains("threshold 0")));
    }

    #[test]
    fn rule_yaml_defaults_icon() {
        let rule: BadgeRule = serde_yaml::from_str(
            "key: ninety_days\nlabel: 90-Day Streak\nmetric: streak\nthreshold: 90\n",
        )
        .unwrap();
        assert_eq!(rule.metric, Metric::Streak);
        assert_eq!(rule.icon, DEFAULT_ICON);
    }
}
