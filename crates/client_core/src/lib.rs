//! Headless event form: field rules, the modal/submit controller and the
//! persistence seams it drives.

pub mod controller;
pub mod host;
pub mod remote_store;
pub mod store;
pub mod validation;
pub mod view;

pub use controller::{Clock, EventFormController, FormError, ModalState, Notice, SystemClock};
pub use host::{HostEvent, HostShell, Popup, PopupButton, ShellUser, ThemeParams};
pub use remote_store::{RemoteStore, RemoteStoreConfig};
pub use store::{EventStore, Persistence, StoreError};
pub use validation::{validate_field, FieldValidation, FormValues, ValidationError};
pub use view::{EventCard, FormView};
