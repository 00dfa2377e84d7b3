//! `hs-equipment` — zone equipment trait and simulation-flag intents.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                              |
//! |-------------|-----------------------------------------------------------------------|
//! | [`intent`]  | `Intent`, `Subsystem`, `SimulationFlags`                              |
//! | [`context`] | `EquipContext<'a>` — mutable node view handed to one equipment call   |
//! | [`model`]   | `ZoneEquipment` trait, `EquipmentDemand`, `EquipmentOutput`           |
//! | [`ideal`]   | `IdealLoads` — capacity-limited stub that meets its target exactly    |
//! | [`noop`]    | `NoopEquipment` — placeholder that never delivers anything            |
//! | [`error`]   | `EquipmentError`, `EquipmentResult<T>`                                |
//!
//! # Design notes
//!
//! Subsystems never touch the solver's flags directly.  A model that changes
//! a boundary condition some other subsystem depends on returns
//! [`Intent::Resimulate`] naming that subsystem, and the solver folds the
//! intents into its [`SimulationFlags`] after the call returns.

pub mod context;
pub mod error;
pub mod ideal;
pub mod intent;
pub mod model;
pub mod noop;

#[cfg(test)]
mod tests;

pub use context::EquipContext;
pub use error::{EquipmentError, EquipmentResult};
pub use ideal::IdealLoads;
pub use intent::{Intent, SimulationFlags, Subsystem};
pub use model::{AvailabilityStatus, EquipmentDemand, EquipmentOutput, ZoneEquipment};
pub use noop::NoopEquipment;
