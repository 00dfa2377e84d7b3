use hs_airflow::AirflowError;
use hs_core::ZoneId;
use hs_equipment::EquipmentError;
use hs_loads::LoadError;
use hs_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("zone {zone}: {got} equipment models for an equipment list of {expected}")]
    EquipmentCountMismatch {
        zone:     ZoneId,
        expected: usize,
        got:      usize,
    },

    #[error("zone {zone}: equipment model `{got}` registered for list entry `{expected}`")]
    EquipmentNameMismatch {
        zone:     ZoneId,
        expected: String,
        got:      String,
    },

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("equipment error: {0}")]
    Equipment(#[from] EquipmentError),

    #[error("load distribution error: {0}")]
    Load(#[from] LoadError),

    #[error("mass balance error: {0}")]
    Airflow(#[from] AirflowError),
}

pub type SimResult<T> = Result<T, SimError>;
