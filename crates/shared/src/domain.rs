use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(EventId);
id_newtype!(UserId);

/// The five inputs of the event form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventField {
    Name,
    Date,
    Time,
    Location,
    Description,
}

impl EventField {
    pub const ALL: [EventField; 5] = [
        EventField::Name,
        EventField::Date,
        EventField::Time,
        EventField::Location,
        EventField::Description,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventField::Name => "name",
            EventField::Date => "date",
            EventField::Time => "time",
            EventField::Location => "location",
            EventField::Description => "description",
        }
    }
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const MAX_DISPLAY_NAME_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorIdentity {
    pub id: UserId,
    pub display_name: String,
}

impl CreatorIdentity {
    /// Builds an identity from untrusted host-provided user fields.
    ///
    /// Returns `None` without an id. The display name prefers "first last",
    /// then `@username`, then `User <id>`.
    pub fn from_untrusted(
        id: Option<i64>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        username: Option<&str>,
    ) -> Option<Self> {
        let id = id?;
        let full_name = [first_name, last_name]
            .into_iter()
            .flatten()
            .map(sanitize_name_part)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let display_name = if !full_name.is_empty() {
            full_name
        } else {
            match username.map(sanitize_name_part).filter(|u| !u.is_empty()) {
                Some(username) => format!("@{username}"),
                None => format!("User {id}"),
            }
        };

        Some(Self {
            id: UserId(id),
            display_name: display_name.chars().take(MAX_DISPLAY_NAME_CHARS).collect(),
        })
    }
}

fn sanitize_name_part(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
