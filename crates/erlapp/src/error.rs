use thiserror::Error;
use uuid::Uuid;

use crate::model::EntityId;

#[derive(Error, Debug)]
pub enum ErlError {
    #[error("Entity not found: {0}")]
    EntityNotFound(Uuid),

    #[error("Unknown bundle: {0}")]
    UnknownBundle(String),

    #[error("Unknown layout: {0}")]
    UnknownLayout(String),

    #[error("A layout must be selected for item {0}")]
    LayoutRequired(usize),

    #[error("Entity store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(#[from] confique::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ErlError {
    pub fn entity_not_found(id: &EntityId) -> Self {
        ErlError::EntityNotFound(*id)
    }
}

pub type Result<T> = std::result::Result<T, ErlError>;
