//! Presentation seam and the list card produced for each event.

use chrono::NaiveDate;
use shared::{domain::EventField, protocol::EventRecord};

pub const LOCATION_MARKER: &str = "📍";
const WHEN_FORMAT: &str = "%d.%m.%Y %H:%M";

/// What the controller needs from the page: read inputs, show errors,
/// toggle the modal and maintain the event list.
pub trait FormView: Send + Sync {
    fn field_value(&self, field: EventField) -> String;
    /// Empty `message` clears the error.
    fn set_field_error(&self, field: EventField, message: &str);
    fn reset_fields(&self);
    fn set_modal_visible(&self, visible: bool);
    fn set_submit_enabled(&self, enabled: bool);
    fn set_min_date(&self, date: NaiveDate);
    fn apply_theme_variables(&self, variables: &[(&'static str, &str)]);
    fn prepend_event(&self, card: EventCard);
    fn replace_events(&self, cards: Vec<EventCard>);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCard {
    pub title: String,
    pub when: String,
    pub location: String,
    pub description: String,
    pub creator: Option<String>,
}

impl From<&EventRecord> for EventCard {
    fn from(record: &EventRecord) -> Self {
        Self {
            title: record.name.clone(),
            when: record
                .date
                .and_time(record.time)
                .format(WHEN_FORMAT)
                .to_string(),
            location: record.location.clone(),
            description: record.description.clone(),
            creator: record
                .creator
                .as_ref()
                .map(|creator| creator.display_name.clone()),
        }
    }
}

impl EventCard {
    pub fn location_line(&self) -> String {
        format!("{LOCATION_MARKER} {}", self.location)
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"event-card\">\n");
        html.push_str(&format!("  <h3>{}</h3>\n", escape_html(&self.title)));
        html.push_str(&format!(
            "  <p class=\"event-date\">{}</p>\n",
            escape_html(&self.when)
        ));
        html.push_str(&format!(
            "  <p class=\"event-location\">{}</p>\n",
            escape_html(&self.location_line())
        ));
        html.push_str(&format!(
            "  <p class=\"event-description\">{}</p>\n",
            escape_html(&self.description)
        ));
        if let Some(creator) = &self.creator {
            html.push_str(&format!(
                "  <p class=\"event-creator\">Created by {}</p>\n",
                escape_html(creator)
            ));
        }
        html.push_str("</div>");
        html
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
