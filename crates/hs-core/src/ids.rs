//! Strongly typed, zero-cost arena indices.
//!
//! Zones, nodes, air loops and plant loops all live in plain `Vec`s owned by
//! the model.  Wrapping each index in its own type stops a zone ordinal from
//! being used to index the node arena (and vice versa).  The inner integer is
//! `pub`; prefer `.index()` when indexing.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "not connected".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so unconnected ids are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a thermal zone.
    pub struct ZoneId(u32);
}

typed_id! {
    /// Index of a fluid node (zone air, inlet, exhaust, return, loop interface).
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a primary air loop.
    pub struct AirLoopId(u32);
}

typed_id! {
    /// Index of a plant (hydronic) loop.
    pub struct PlantLoopId(u32);
}

typed_id! {
    /// Index of an inter-zone mixing link.
    pub struct MixingId(u32);
}

typed_id! {
    /// Index of a zone infiltration object.
    pub struct InfiltrationId(u32);
}
