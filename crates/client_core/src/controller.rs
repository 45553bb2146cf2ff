//! Event form controller: field state, the modal state machine and submission.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Local, NaiveDate, Utc};
use shared::{domain::EventField, protocol::EventRecord};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    host::{HostEvent, HostShell, Popup},
    store::{Persistence, StoreError},
    validation::{
        validate_field, validate_form, FieldValidation, FormReport, FormValues, ValidationError,
    },
    view::{EventCard, FormView},
};

pub const MAIN_BUTTON_LABEL: &str = "Create event";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ValidationFailed,
    EventCreated,
    CreateFailed,
    LoadFailed,
}

impl Notice {
    pub fn popup(self) -> Popup {
        match self {
            Notice::ValidationFailed => Popup::ok(
                "Validation error",
                "Please check that all fields are filled in correctly",
            ),
            Notice::EventCreated => Popup::ok("Success", "Event created"),
            Notice::CreateFailed => Popup::ok(
                "Error",
                "Could not create the event. Please try again later.",
            ),
            Notice::LoadFailed => Popup::ok(
                "Error",
                "Could not load events. Please try again later.",
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] StoreError),
    #[error("a submission is already in flight")]
    SubmitInFlight,
    #[error("events are already loading")]
    LoadInFlight,
    #[error("the event form is not open")]
    ModalClosed,
}

pub trait Clock: Send + Sync {
    /// Local calendar date; the past-date rule compares against it.
    fn today(&self) -> NaiveDate;
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

#[derive(Default)]
struct ControllerState {
    modal: ModalState,
    values: FormValues,
    validity: HashMap<EventField, FieldValidation>,
    /// Bumped on every open so a late submit result can tell whether the
    /// form it came from is still the one on screen.
    session: u64,
    submitting: bool,
    loading: bool,
}

impl ControllerState {
    fn reset_fields(&mut self) {
        self.values = FormValues::default();
        self.validity.clear();
    }
}

pub struct EventFormController {
    shell: Arc<dyn HostShell>,
    view: Arc<dyn FormView>,
    persistence: Persistence,
    clock: Arc<dyn Clock>,
    inner: Mutex<ControllerState>,
}

impl EventFormController {
    pub fn new(
        shell: Arc<dyn HostShell>,
        view: Arc<dyn FormView>,
        persistence: Persistence,
    ) -> Self {
        Self::with_clock(shell, view, persistence, Arc::new(SystemClock))
    }

    pub fn with_clock(
        shell: Arc<dyn HostShell>,
        view: Arc<dyn FormView>,
        persistence: Persistence,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            shell,
            view,
            persistence,
            clock,
            inner: Mutex::new(ControllerState::default()),
        }
    }

    /// Prepares the host and page: full-height viewport, close confirmation,
    /// theme colors and the earliest selectable date.
    pub fn initialize(&self) {
        self.shell.expand();
        self.shell.enable_closing_confirmation();
        self.apply_theme();
        self.view.set_min_date(self.clock.today());
        self.view.set_submit_enabled(true);
        info!(remote = self.persistence.is_remote(), "event form initialized");
    }

    /// Pushes the host's current theme colors to the view. Also the handler
    /// for the host's theme-changed notification.
    pub fn apply_theme(&self) {
        let theme = self.shell.theme();
        let variables = theme.css_variables();
        debug!(count = variables.len(), "applying theme variables");
        self.view.apply_theme_variables(&variables);
    }

    pub async fn modal_state(&self) -> ModalState {
        self.inner.lock().await.modal
    }

    pub async fn is_submitting(&self) -> bool {
        self.inner.lock().await.submitting
    }

    /// Last seen raw value and validity of a field.
    pub async fn field_state(&self, field: EventField) -> (String, FieldValidation) {
        let inner = self.inner.lock().await;
        (
            inner.values.get(field).to_string(),
            inner.validity.get(&field).cloned().unwrap_or_default(),
        )
    }

    pub async fn open_modal(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.modal == ModalState::Open {
            return false;
        }
        inner.modal = ModalState::Open;
        inner.session += 1;
        self.view.set_modal_visible(true);
        self.shell.set_main_button_text(MAIN_BUTTON_LABEL);
        self.shell.show_main_button();
        debug!("event form opened");
        true
    }

    pub async fn close_modal(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.modal == ModalState::Closed {
            return false;
        }
        self.close_locked(&mut inner);
        true
    }

    fn close_locked(&self, inner: &mut ControllerState) {
        inner.modal = ModalState::Closed;
        inner.reset_fields();
        self.view.set_modal_visible(false);
        self.view.reset_fields();
        for field in EventField::ALL {
            self.view.set_field_error(field, "");
        }
        self.shell.hide_main_button();
        debug!("event form closed and reset");
    }

    /// Revalidates one field after an input or blur event and shows the result.
    pub async fn validate_field(&self, field: EventField, value: &str) -> FieldValidation {
        let result = validate_field(field, value, self.clock.today());
        let mut inner = self.inner.lock().await;
        inner.values.set(field, value);
        self.record_result(&mut inner, field, result.clone());
        result
    }

    fn record_result(
        &self,
        inner: &mut ControllerState,
        field: EventField,
        result: FieldValidation,
    ) {
        self.view.set_field_error(field, result.message());
        inner.validity.insert(field, result);
    }

    /// Re-reads and revalidates every field so that all errors show at once.
    pub async fn validate_form(&self) -> bool {
        let mut inner = self.inner.lock().await;
        self.revalidate_all(&mut inner).into_error().is_none()
    }

    fn revalidate_all(&self, inner: &mut ControllerState) -> FormReport {
        for field in EventField::ALL {
            inner.values.set(field, self.view.field_value(field));
        }
        let report = validate_form(&inner.values, self.clock.today());
        for (field, result) in report.results() {
            self.record_result(inner, *field, result.clone());
        }
        report
    }

    pub async fn submit(&self) -> Result<EventRecord, FormError> {
        let (record, session) = {
            let mut inner = self.inner.lock().await;
            if inner.modal != ModalState::Open {
                return Err(FormError::ModalClosed);
            }
            if inner.submitting {
                warn!("submit ignored; previous submission still in flight");
                return Err(FormError::SubmitInFlight);
            }

            let report = self.revalidate_all(&mut inner);
            let mut record = match report.into_record(&inner.values) {
                Ok(record) => record,
                Err(err) => {
                    info!(%err, "event form rejected");
                    self.shell.show_popup(Notice::ValidationFailed.popup());
                    return Err(err.into());
                }
            };
            record.creator = self.shell.user().and_then(|user| user.creator());
            if self.persistence.is_remote() {
                record.created_at = Some(self.clock.now());
            }

            inner.submitting = true;
            self.view.set_submit_enabled(false);
            (record, inner.session)
        };

        let result = self.persistence.persist(record).await;

        let mut inner = self.inner.lock().await;
        inner.submitting = false;
        self.view.set_submit_enabled(true);

        match result {
            Ok(stored) => {
                info!(name = %stored.name, date = %stored.date, "event created");
                self.view.prepend_event(EventCard::from(&stored));
                self.shell.show_popup(Notice::EventCreated.popup());
                if inner.modal == ModalState::Open && inner.session == session {
                    self.close_locked(&mut inner);
                } else {
                    debug!("form was reopened while saving; keeping the new draft");
                }
                Ok(stored)
            }
            Err(err) => {
                warn!(error = %err, "failed to persist event");
                self.shell.show_popup(Notice::CreateFailed.popup());
                Err(err.into())
            }
        }
    }

    /// Entry point for host notifications. A main-button press submits the
    /// form and yields the created record.
    pub async fn handle_host_event(
        &self,
        event: HostEvent,
    ) -> Result<Option<EventRecord>, FormError> {
        debug!(?event, "host event");
        match event {
            HostEvent::ThemeChanged => {
                self.apply_theme();
                Ok(None)
            }
            HostEvent::MainButtonPressed => self.submit().await.map(Some),
        }
    }

    /// Replaces the visible list with the stored events, oldest date first.
    ///
    /// Offline there is nothing to load and `Ok(None)` is returned. On failure
    /// the current list is left as it is.
    pub async fn load_events(&self) -> Result<Option<usize>, FormError> {
        let Persistence::Remote(store) = &self.persistence else {
            debug!("offline mode; skipping event load");
            return Ok(None);
        };

        {
            let mut inner = self.inner.lock().await;
            if inner.loading {
                return Err(FormError::LoadInFlight);
            }
            inner.loading = true;
        }

        let result = store.list().await;
        self.inner.lock().await.loading = false;

        match result {
            Ok(mut events) => {
                events.sort_by_key(|event| (event.date, event.time));
                let count = events.len();
                self.view
                    .replace_events(events.iter().map(EventCard::from).collect());
                info!(count, "event list refreshed");
                Ok(Some(count))
            }
            Err(err) => {
                warn!(error = %err, "failed to load events");
                self.shell.show_popup(Notice::LoadFailed.popup());
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
