//! Terminal stand-ins for the mini-app host and the page.

use std::sync::Mutex;

use chrono::NaiveDate;
use client_core::{EventCard, FormValues, FormView, HostShell, Popup, ShellUser, ThemeParams};
use shared::domain::EventField;
use tracing::debug;

pub struct ConsoleShell {
    theme: ThemeParams,
    user: Option<ShellUser>,
}

impl ConsoleShell {
    pub fn new(theme: ThemeParams, user: Option<ShellUser>) -> Self {
        Self { theme, user }
    }
}

impl HostShell for ConsoleShell {
    fn expand(&self) {
        debug!("viewport expanded");
    }

    fn enable_closing_confirmation(&self) {
        debug!("closing confirmation enabled");
    }

    fn theme(&self) -> ThemeParams {
        self.theme.clone()
    }

    fn show_popup(&self, popup: Popup) {
        println!("[{}] {}", popup.title, popup.message);
    }

    fn set_main_button_text(&self, text: &str) {
        debug!(text, "main button relabelled");
    }

    fn show_main_button(&self) {
        debug!("main button shown");
    }

    fn hide_main_button(&self) {
        debug!("main button hidden");
    }

    fn user(&self) -> Option<ShellUser> {
        self.user.clone()
    }
}

#[derive(Default)]
pub struct ConsoleView {
    values: Mutex<FormValues>,
    cards: Mutex<Vec<EventCard>>,
}

impl ConsoleView {
    pub fn type_into(&self, field: EventField, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.set(field, value);
        }
    }

    pub fn print_list(&self) {
        let Ok(cards) = self.cards.lock() else {
            return;
        };
        if cards.is_empty() {
            println!("No events yet.");
            return;
        }
        for card in cards.iter() {
            println!();
            println!("{}", card.title);
            println!("  {}", card.when);
            println!("  {}", card.location_line());
            println!("  {}", card.description);
            if let Some(creator) = &card.creator {
                println!("  Created by {creator}");
            }
        }
    }
}

impl FormView for ConsoleView {
    fn field_value(&self, field: EventField) -> String {
        self.values
            .lock()
            .map(|values| values.get(field).to_string())
            .unwrap_or_default()
    }

    fn set_field_error(&self, field: EventField, message: &str) {
        if !message.is_empty() {
            eprintln!("  {field}: {message}");
        }
    }

    fn reset_fields(&self) {
        if let Ok(mut values) = self.values.lock() {
            *values = FormValues::default();
        }
    }

    fn set_modal_visible(&self, visible: bool) {
        debug!(visible, "event form visibility changed");
    }

    fn set_submit_enabled(&self, enabled: bool) {
        debug!(enabled, "submit control toggled");
    }

    fn set_min_date(&self, date: NaiveDate) {
        debug!(%date, "earliest selectable date set");
    }

    fn apply_theme_variables(&self, variables: &[(&'static str, &str)]) {
        for (name, value) in variables {
            debug!(name, value, "theme variable");
        }
    }

    fn prepend_event(&self, card: EventCard) {
        if let Ok(mut cards) = self.cards.lock() {
            cards.insert(0, card);
        }
    }

    fn replace_events(&self, cards: Vec<EventCard>) {
        if let Ok(mut current) = self.cards.lock() {
            *current = cards;
        }
    }
}
