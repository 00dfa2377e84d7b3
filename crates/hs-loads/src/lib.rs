//! `hs-loads` — sharing a zone's load across its equipment list.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                          |
//! |----------------|-------------------------------------------------------------------|
//! | [`order`]      | `SimOrder` — priority-sorted run order for the active mode        |
//! | [`distribute`] | `LoadDistributor` — init / distribute / update per zone           |
//! | [`deadband`]   | `dead_band_or_setback` — thermostat state from remaining loads    |
//! | [`error`]      | `LoadError`, `LoadResult<T>`                                      |
//!
//! # Per-zone cycle
//!
//! ```text
//! predictor writes DemandRecord::{total, to_lower_sp, to_upper_sp}
//! SimOrder::resolve(list, total)
//! LoadDistributor::init()          remaining = unadjusted = predicted
//! LoadDistributor::distribute()    sequenced[slot] per scheme; remaining = slot 0
//! for slot in order:
//!     equipment.simulate(remaining)
//!     LoadDistributor::update(slot, delivered)   remaining = next slot / unadjusted
//! ```
//!
//! Slots are positions in the sim order, not positions in the equipment list.

pub mod deadband;
pub mod distribute;
pub mod error;
pub mod order;


pub use deadband::dead_band_or_setback;
pub use distribute::LoadDistributor;
pub use error::{LoadError, LoadResult};
pub use order::SimOrder;
