//! `hs-model` — the HVAC model arenas.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                     |
//! |------------------|--------------------------------------------------------------|
//! | [`node`]         | `Node`, `NodeStore` (indexed by `NodeId`)                    |
//! | [`zone`]         | `Zone`, `ThermostatType`, return-path gains                  |
//! | [`equip_list`]   | `EquipmentList`, `EquipmentListEntry`, `LoadDistScheme`      |
//! | [`equip_config`] | `ZoneEquipConfig` — per-zone inlet/exhaust/return topology   |
//! | [`air_loop`]     | `AirLoopFlow` — per air-loop flow aggregate                  |
//! | [`airflow`]      | `MixingLink`, `Infiltration`, `MassConservation`             |
//! | [`demand`]       | `DemandRecord`, `ZoneDemand`                                 |
//! | [`model`]        | `HvacModel` — owns every arena                               |
//! | [`builder`]      | `HvacModelBuilder` — validates topology on `build()`         |
//! | [`error`]        | `ModelError`, `ModelResult<T>`                               |
//!
//! # Storage
//!
//! Every arena is a plain `Vec` indexed by the matching typed id from
//! `hs-core`.  Zone-parallel arrays (`equip_configs`, `conservation`,
//! `demands`) have exactly one element per zone, so `ZoneId::index()` is the
//! index into all of them.

pub mod air_loop;
pub mod airflow;
pub mod builder;
pub mod demand;
pub mod equip_config;
pub mod equip_list;
pub mod error;
pub mod model;
pub mod node;
pub mod zone;


pub use air_loop::AirLoopFlow;
pub use airflow::{Infiltration, MassConservation, MixingLink};
pub use builder::{HvacModelBuilder, ZoneSpec};
pub use demand::{DemandRecord, ZoneDemand};
pub use equip_config::ZoneEquipConfig;
pub use equip_list::{EquipmentList, EquipmentListEntry, LoadDistScheme};
pub use error::{ModelError, ModelResult};
pub use model::HvacModel;
pub use node::{Node, NodeStore};
pub use zone::{AirflowWindowReturn, ReturnAirGain, ThermostatType, Zone};
