use crate::clock::Clock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub text: String,
    /// Written by the external reflection service; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_reflection: Option<String>,
}

impl JournalEntry {
    pub fn new(mood: impl Into<String>, text: impl Into<String>, clock: &dyn Clock) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: clock.now(),
            mood: mood.into(),
            text: text.into(),
            ai_reflection: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    #[test]
    fn entry_serialises_with_original_field_names() {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        let entry = JournalEntry::new("grateful", "Called my sponsor.", &clock);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["mood"], "grateful");
        assert!(json["date"].as_str().unwrap().starts_with("2024-03-10T12:00:00"));
        assert!(json.get("aiReflection").is_none());

        let parsed: JournalEntry = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "date": "2024-03-10T08:00:00Z",
            "mood": "calm",
            "text": "",
            "aiReflection": "Keep going."
        }))
        .unwrap();
        assert_eq!(parsed.ai_reflection.as_deref(), Some("Keep going."));
    }
}
