use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use client_core::{
    EventCard, EventFormController, FormError, FormValues, FormView, HostShell, ModalState,
    Persistence, Popup, RemoteStore, RemoteStoreConfig, ShellUser, ThemeParams,
};
use serde_json::{json, Value};
use shared::domain::EventField;
use tokio::net::TcpListener;

#[derive(Default)]
struct ConsoleLikeShell {
    popups: Mutex<Vec<Popup>>,
}

impl HostShell for ConsoleLikeShell {
    fn expand(&self) {}
    fn enable_closing_confirmation(&self) {}
    fn theme(&self) -> ThemeParams {
        ThemeParams::default()
    }
    fn show_popup(&self, popup: Popup) {
        self.popups.lock().expect("popups").push(popup);
    }
    fn set_main_button_text(&self, _text: &str) {}
    fn show_main_button(&self) {}
    fn hide_main_button(&self) {}
    fn user(&self) -> Option<ShellUser> {
        Some(ShellUser {
            id: Some(9),
            first_name: Some("Grace".into()),
            last_name: None,
            username: Some("grace".into()),
        })
    }
}

#[derive(Default)]
struct MemoryView {
    values: Mutex<FormValues>,
    cards: Mutex<Vec<EventCard>>,
}

impl FormView for MemoryView {
    fn field_value(&self, field: EventField) -> String {
        self.values.lock().expect("values").get(field).to_string()
    }
    fn set_field_error(&self, _field: EventField, _message: &str) {}
    fn reset_fields(&self) {
        *self.values.lock().expect("values") = FormValues::default();
    }
    fn set_modal_visible(&self, _visible: bool) {}
    fn set_submit_enabled(&self, _enabled: bool) {}
    fn set_min_date(&self, _date: NaiveDate) {}
    fn apply_theme_variables(&self, _variables: &[(&'static str, &str)]) {}
    fn prepend_event(&self, card: EventCard) {
        self.cards.lock().expect("cards").insert(0, card);
    }
    fn replace_events(&self, cards: Vec<EventCard>) {
        *self.cards.lock().expect("cards") = cards;
    }
}

type Table = Arc<Mutex<Vec<Value>>>;

async fn insert_row(
    State(table): State<Table>,
    Json(mut row): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut rows = table.lock().expect("table");
    row["id"] = json!(rows.len() + 1);
    rows.push(row.clone());
    (StatusCode::CREATED, Json(json!([row])))
}

async fn list_rows(State(table): State<Table>) -> Json<Value> {
    let mut rows = table.lock().expect("table").clone();
    rows.sort_by(|a, b| a["date"].as_str().cmp(&b["date"].as_str()));
    Json(Value::Array(rows))
}

async fn spawn_table(table: Table) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/rest/v1/events", post(insert_row).get(list_rows))
        .with_state(table);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn created_event_survives_a_reload_from_the_remote_table() {
    let table: Table = Arc::new(Mutex::new(vec![json!({
        "id": 100,
        "name": "Hackathon",
        "date": "2099-06-01",
        "time": "10:00:00",
        "location": "Lab 3",
        "description": "Build something in a weekend."
    })]));
    let base_url = spawn_table(table.clone()).await;
    let store = RemoteStore::new(RemoteStoreConfig::new(base_url, "anon")).expect("store");

    let shell = Arc::new(ConsoleLikeShell::default());
    let view = Arc::new(MemoryView::default());
    let controller =
        EventFormController::new(shell.clone(), view.clone(), Persistence::remote(store));
    controller.initialize();

    assert_eq!(controller.load_events().await.expect("load"), Some(1));

    controller.open_modal().await;
    *view.values.lock().expect("values") = FormValues {
        name: "Meetup".into(),
        date: "2099-01-01".into(),
        time: "18:00".into(),
        location: "Downtown Hall".into(),
        description: "A community meetup for developers.".into(),
    };
    let record = controller.submit().await.expect("submit");

    assert!(record.id.is_some());
    assert!(record.created_at.is_some());
    assert_eq!(controller.modal_state().await, ModalState::Closed);
    {
        let cards = view.cards.lock().expect("cards");
        assert_eq!(cards[0].title, "Meetup");
        assert_eq!(cards[0].creator.as_deref(), Some("Grace"));
        assert_eq!(cards.len(), 2);
    }

    assert_eq!(controller.load_events().await.expect("reload"), Some(2));
    let titles: Vec<_> = view
        .cards
        .lock()
        .expect("cards")
        .iter()
        .map(|card| card.title.clone())
        .collect();
    assert_eq!(titles, vec!["Meetup".to_string(), "Hackathon".to_string()]);
    assert_eq!(table.lock().expect("table")[1]["creator_name"], "Grace");
}

#[tokio::test]
async fn offline_form_rejects_short_name_then_accepts_fix() {
    let shell = Arc::new(ConsoleLikeShell::default());
    let view = Arc::new(MemoryView::default());
    let controller = EventFormController::new(shell.clone(), view.clone(), Persistence::Offline);

    controller.open_modal().await;
    *view.values.lock().expect("values") = FormValues {
        name: "AB".into(),
        date: "2099-01-01".into(),
        time: "18:00".into(),
        location: "Downtown Hall".into(),
        description: "A community meetup for developers.".into(),
    };
    assert!(matches!(
        controller.submit().await,
        Err(FormError::Validation(_))
    ));
    assert!(view.cards.lock().expect("cards").is_empty());

    view.values.lock().expect("values").name = "ABC".into();
    controller.submit().await.expect("submit");
    assert_eq!(view.cards.lock().expect("cards")[0].title, "ABC");
    assert_eq!(shell.popups.lock().expect("popups").len(), 2);
}
