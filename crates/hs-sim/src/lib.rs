//! `hs-sim` — per-timestep orchestration of the HVAC coordination core.
//!
//! # Zone step
//!
//! ```text
//! TimestepController::advance
//!   ① Trial     — predict / solve / correct at the full zone step.
//!   ② Split     — ΔT above tolerance: revert, then N sub-steps of
//!                 zone_step / N, each predict / solve / correct.
//!   ③ Average   — fold each accepted sub-step into the zone averages.
//!
//! ConvergenceSolver::solve   (once per sub-step)
//!   first pass — air, zone, non-zone, plant, elec, unconditionally
//!   passes     — only flagged subsystems, until no flag is left or the
//!                iteration cap is hit; intents raise flags
//!
//! ZoneEquipmentManager::simulate   (the "zone" subsystem)
//!   per zone   — sim order, load distribution, equipment calls
//!   then       — mass balance, return-node leaving conditions
//! ```
//!
//! # Crate layout
//!
//! | Module             | Contents                                                      |
//! |--------------------|---------------------------------------------------------------|
//! | [`config`]         | `HvacConfig`, `SolverConfig`, `DiagnosticsConfig`             |
//! | [`systems`]        | `HvacSystems`, `ZoneAirModel`, `OverrideHook` traits          |
//! | [`zone_equipment`] | `ZoneEquipmentManager` — the zone-equipment subsystem         |
//! | [`solver`]         | `ConvergenceSolver`, `SolveOutcome`, `SolverParts`            |
//! | [`controller`]     | `TimestepController`, `ZoneStepReport`                        |
//! | [`trace`]          | `ConvergenceTrace` — bounded history per monitored location   |
//! | [`diagnostics`]    | Oscillation and trend detection over the trace                |
//! | [`context`]        | `SolverContext` — warm-up, warning counters, stop signal      |
//! | [`observer`]       | `HvacObserver`, `NoopObserver`                                |
//! | [`sim`]            | `HvacSim` — owns everything                                   |
//! | [`builder`]        | `SimBuilder`                                                  |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the convergence trace.    |
//! | `serde`   | `Serialize`/`Deserialize` on the configuration types.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hs_sim::{HvacConfig, NoSystems, NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(HvacConfig::default(), model, NoSystems, zone_air)
//!     .equipment(zone, Box::new(equipment))
//!     .build()?;
//! sim.run_zone_steps(96, &mut NoopObserver)?;
//! let summary = sim.end_environment(&mut NoopObserver);
//! ```

pub mod builder;
pub mod config;
pub mod context;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod observer;
pub mod sim;
pub mod solver;
pub mod systems;
pub mod trace;
pub mod zone_equipment;


pub use builder::SimBuilder;
pub use config::{DiagnosticsConfig, HvacConfig, SolverConfig};
pub use context::{EnvironmentSummary, SolverContext};
pub use controller::{TimestepController, ZoneAverage, ZoneStepReport};
pub use diagnostics::{ConvergenceFinding, FindingKind, analyse_trace};
pub use error::{SimError, SimResult};
pub use observer::{HvacObserver, NoopObserver};
pub use sim::HvacSim;
pub use solver::{ConvergenceSolver, SolveOutcome, SolverParts};
pub use systems::{
    CallingPoint, HookOutcome, HvacSystems, NoSystems, OverrideHook, PlantFlowLock, SystemContext,
    ZoneAirModel,
};
pub use trace::{
    ConvergenceTrace, InterfaceSide, TRACE_DEPTH, TraceEntry, TraceHistory, TraceLocation,
    TraceQuantity,
};
pub use zone_equipment::{ZoneEquipmentManager, ZonePass};
