use hs_core::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirflowError {
    #[error("mass balance configuration error: {0}")]
    Config(String),

    #[error("node {node} has a non-finite mass flow ({flow})")]
    NonFiniteFlow { node: NodeId, flow: f64 },
}

pub type AirflowResult<T> = Result<T, AirflowError>;
