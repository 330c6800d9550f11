use core::fmt;

/// Declares a compact, copyable identifier over a caller-assigned `u32`.
///
/// Station and pipe ids come from the external registries, so unlike
/// arena indices they are not contiguous and are never reassigned.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        pub struct $name(u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a compressor station (a node of the network graph).
    StationId,
    "Station"
);

define_id!(
    /// Identifier of a physical pipe (backs at most one connection).
    PipeId,
    "Pipe"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_raw() {
        for raw in [1_u32, 2, 42, 10_000] {
            assert_eq!(StationId::new(raw).get(), raw);
            assert_eq!(PipeId::from(raw).get(), raw);
        }
    }

    #[test]
    fn id_formatting() {
        let kc = StationId::new(7);
        assert_eq!(format!("{kc}"), "7");
        assert_eq!(format!("{kc:?}"), "Station(7)");
        assert_eq!(format!("{:?}", PipeId::new(3)), "Pipe(3)");
    }

    #[test]
    fn ids_order_by_raw_value() {
        let mut ids = vec![StationId::new(3), StationId::new(1), StationId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![StationId::new(1), StationId::new(2), StationId::new(3)]);
    }
}
