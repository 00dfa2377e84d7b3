//! Rescaling of inter-zone mixing links.

use hs_core::ZoneId;
use hs_model::{MassConservation, MixingLink};

/// Rescale the links delivering air into `zone` so they sum to `wanted`
/// [kg/s].
///
/// Links keep the proportions of their design flows; with no design flow at
/// all, `wanted` is split equally.  Does nothing if no link feeds the zone.
pub fn set_receiving_flow(links: &mut [MixingLink], zone: ZoneId, wanted: f64) {
    let (count, design) = links
        .iter()
        .filter(|m| m.to == zone)
        .fold((0usize, 0.0), |(n, d), m| (n + 1, d + m.design_flow));
    if count == 0 {
        return;
    }
    for m in links.iter_mut().filter(|m| m.to == zone) {
        m.flow = if design > 0.0 {
            wanted * m.design_flow / design
        } else {
            wanted / count as f64
        };
    }
}

/// Recompute the mixing-source flow of every zone feeding `zone`.
pub fn refresh_sources(links: &[MixingLink], conservation: &mut [MassConservation], zone: ZoneId) {
    for src in links.iter().filter(|m| m.to == zone).map(|m| m.from) {
        conservation[src.index()].mixing_source_flow =
            links.iter().filter(|m| m.from == src).map(|m| m.flow).sum();
    }
}

/// Mixing-link flow into and out of `zone` [kg/s].
pub fn zone_flows(links: &[MixingLink], zone: ZoneId) -> (f64, f64) {
    links.iter().fold((0.0, 0.0), |(i, o), m| {
        (
            if m.to == zone { i + m.flow } else { i },
            if m.from == zone { o + m.flow } else { o },
        )
    })
}
