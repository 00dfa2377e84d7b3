use thiserror::Error;

#[derive(Debug, Error)]
pub enum EquipmentError {
    #[error("equipment configuration error: {0}")]
    Config(String),

    #[error("{kind} `{name}` failed to initialise: {reason}")]
    Init { kind: String, name: String, reason: String },
}

pub type EquipmentResult<T> = Result<T, EquipmentError>;
