use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CreatorIdentity, EventId, UserId};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses a wall-clock time as entered in the form (`HH:MM`) or as echoed
/// back by a SQL `time` column (`HH:MM:SS[.fff]`).
pub fn parse_wall_clock(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, TIME_FORMAT))
        .ok()
}

pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub id: Option<EventId>,
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub description: String,
    pub creator: Option<CreatorIdentity>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Row shape of the remote `events` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    pub name: String,
    pub date: NaiveDate,
    #[serde(with = "wall_clock")]
    pub time: NaiveTime,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<EventRecord> for EventRow {
    fn from(record: EventRecord) -> Self {
        let (creator_id, creator_name) = match record.creator {
            Some(creator) => (Some(creator.id), Some(creator.display_name)),
            None => (None, None),
        };
        Self {
            id: record.id,
            name: record.name,
            date: record.date,
            time: record.time,
            location: record.location,
            description: record.description,
            creator_id,
            creator_name,
            created_at: record.created_at,
        }
    }
}

impl From<EventRow> for EventRecord {
    fn from(row: EventRow) -> Self {
        let creator = row.creator_id.map(|id| CreatorIdentity {
            id,
            display_name: row
                .creator_name
                .unwrap_or_else(|| format!("User {}", id.0)),
        });
        Self {
            id: row.id,
            name: row.name,
            date: row.date,
            time: row.time,
            location: row.location,
            description: row.description,
            creator,
            created_at: row.created_at,
        }
    }
}

mod wall_clock {
    use chrono::NaiveTime;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::{parse_wall_clock, TIME_FORMAT};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_wall_clock(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid wall-clock time '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_and_sql_time_shapes() {
        let expected = NaiveTime::from_hms_opt(18, 0, 0).expect("time");
        assert_eq!(parse_wall_clock("18:00"), Some(expected));
        assert_eq!(parse_wall_clock("18:00:00"), Some(expected));
        assert_eq!(parse_wall_clock("18:00:00.000"), Some(expected));
        assert_eq!(parse_wall_clock("6pm"), None);
        assert_eq!(parse_wall_clock(""), None);
    }

    #[test]
    fn row_deserializes_postgrest_payload() {
        let row: EventRow = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "Meetup",
                "date": "2099-01-01",
                "time": "18:00:00",
                "location": "Downtown Hall",
                "description": "A community meetup for developers.",
                "creator_id": null,
                "creator_name": null,
                "created_at": "2098-12-01T10:00:00.123456+00:00"
            }"#,
        )
        .expect("row");

        let record = EventRecord::from(row);
        assert_eq!(record.id, Some(EventId(42)));
        assert_eq!(record.time, NaiveTime::from_hms_opt(18, 0, 0).expect("time"));
        assert!(record.creator.is_none());
        assert!(record.created_at.is_some());
    }

    #[test]
    fn row_serializes_without_unset_optionals() {
        let record = EventRecord {
            id: None,
            name: "Meetup".into(),
            date: NaiveDate::from_ymd_opt(2099, 1, 1).expect("date"),
            time: NaiveTime::from_hms_opt(18, 0, 0).expect("time"),
            location: "Downtown Hall".into(),
            description: "A community meetup for developers.".into(),
            creator: Some(CreatorIdentity {
                id: UserId(5),
                display_name: "Ada".into(),
            }),
            created_at: None,
        };

        let value = serde_json::to_value(EventRow::from(record)).expect("json");
        assert_eq!(value["time"], "18:00");
        assert_eq!(value["date"], "2099-01-01");
        assert_eq!(value["creator_id"], 5);
        assert_eq!(value["creator_name"], "Ada");
        assert!(value.get("id").is_none());
        assert!(value.get("created_at").is_none());
    }
}
