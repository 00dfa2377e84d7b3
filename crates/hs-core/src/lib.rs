//! `hs-core` — foundational types for the HVAC system-timestep core.
//!
//! Every other `hs-*` crate depends on this one.  It has no `hs-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`ids`]      | `ZoneId`, `NodeId`, `AirLoopId`, `PlantLoopId`, `MixingId` |
//! | [`time`]     | `TimestepConfig`, `SubStep`, `HvacClock`                   |
//! | [`psychro`]  | `Psychrometrics` trait, `IdealGasPsychrometrics`           |
//! | [`error`]    | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and config types.    |

pub mod error;
pub mod ids;
pub mod psychro;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{AirLoopId, InfiltrationId, MixingId, NodeId, PlantLoopId, ZoneId};
pub use psychro::{IdealGasPsychrometrics, Psychrometrics, STD_BARO_PRESS, STD_RHO_AIR};
pub use time::{HvacClock, SubStep, TimestepConfig};
