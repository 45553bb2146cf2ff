use std::{fmt, sync::Arc};

use async_trait::async_trait;
use shared::protocol::EventRecord;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("remote store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("remote store returned no row for insert")]
    EmptyInsert,
    #[error("invalid remote store url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("remote store sent an unreadable response: {0}")]
    InvalidResponse(String),
}

/// Durable home of events: insert one, list all ordered by date ascending.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, record: EventRecord) -> Result<EventRecord, StoreError>;
    async fn list(&self) -> Result<Vec<EventRecord>, StoreError>;
}

/// Where submitted events go after validation.
#[derive(Clone)]
pub enum Persistence {
    /// Events only live in the rendered list.
    Offline,
    Remote(Arc<dyn EventStore>),
}

impl Persistence {
    pub fn remote(store: impl EventStore + 'static) -> Self {
        Self::Remote(Arc::new(store))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub async fn persist(&self, record: EventRecord) -> Result<EventRecord, StoreError> {
        match self {
            Self::Offline => {
                debug!(name = %record.name, "offline mode; event kept in list only");
                Ok(record)
            }
            Self::Remote(store) => store.insert(record).await,
        }
    }
}

impl fmt::Debug for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => f.write_str("Offline"),
            Self::Remote(_) => f.write_str("Remote"),
        }
    }
}
