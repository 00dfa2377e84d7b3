use hs_core::{AirLoopId, NodeId, ZoneId};
use thiserror::Error;

/// Topology and configuration errors detected while building the model.
///
/// All of these are fatal: a model that fails validation is never simulated.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("zone {0} does not exist")]
    UnknownZone(ZoneId),

    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("air loop {0} does not exist")]
    UnknownAirLoop(AirLoopId),

    #[error("node {node} is connected more than once in zone {zone}")]
    DuplicateConnection { zone: ZoneId, node: NodeId },

    #[error("zone {zone}: unsupported return-node topology: {reason}")]
    ReturnTopology { zone: ZoneId, reason: String },

    #[error("zone {zone}: equipment list `{list}`: {reason}")]
    EquipmentList { zone: ZoneId, list: String, reason: String },

    #[error("mixing link from {0} to itself")]
    SelfMixing(ZoneId),
}

pub type ModelResult<T> = Result<T, ModelError>;
