//! `hs-airflow` — zone air mass balance and return-air conditions.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                            |
//! |------------------|---------------------------------------------------------------------|
//! | [`config`]       | `MassBalanceConfig`, `InfiltrationTreatment`, `InfiltrationZones`   |
//! | [`mass_balance`] | `MassBalanceEngine`, `BalanceContext`, `BalanceOutcome`, snapshot    |
//! | [`return_flows`] | `calc_zone_return_flows` — per-return-node flows for one zone       |
//! | [`mixing`]       | Rescaling of inter-zone mixing links                                |
//! | [`leaving`]      | `update_leaving_conditions` — return-node temperature and humidity  |
//! | [`error`]        | `AirflowError`, `AirflowResult<T>`                                  |
//!
//! # Order of operations
//!
//! The zone equipment manager calls [`MassBalanceEngine::balance`] once all
//! zone equipment of a pass has run (so inlet and exhaust node flows are
//! current), then [`update_leaving_conditions`] once return flows are
//! settled.  Nothing in this crate touches inlet or exhaust nodes.

pub mod config;
pub mod error;
pub mod leaving;
pub mod mass_balance;
pub mod mixing;
pub mod return_flows;

#[cfg(test)]
mod tests;

pub use config::{InfiltrationTreatment, InfiltrationZones, MassBalanceConfig};
pub use error::{AirflowError, AirflowResult};
pub use leaving::update_leaving_conditions;
pub use mass_balance::{
    AirLoopReturn, BalanceContext, BalanceOutcome, MassBalanceEngine, MassBalanceSnapshot,
    SMALL_AIR_VOL_FLOW, SMALL_MASS_FLOW,
};
pub use return_flows::calc_zone_return_flows;
