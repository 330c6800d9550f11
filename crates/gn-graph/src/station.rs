//! Compressor station records.

use gn_core::{GnError, GnResult, Real, StationId};

/// A compressor station ("KC") as owned by the station registry.
///
/// The engine only ever reads `id`; the remaining fields travel with the
/// record for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub workshops: u32,
    pub workshops_in_operation: u32,
    pub class: String,
}

impl Station {
    pub fn new(
        id: StationId,
        name: impl Into<String>,
        workshops: u32,
        workshops_in_operation: u32,
        class: impl Into<String>,
    ) -> GnResult<Self> {
        if workshops_in_operation > workshops {
            return Err(GnError::InvalidArg {
                what: "workshops in operation exceed total workshops",
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            workshops,
            workshops_in_operation,
            class: class.into(),
        })
    }

    /// Share of workshops standing idle, 0 for a station without workshops.
    pub fn idle_fraction(&self) -> Real {
        if self.workshops == 0 {
            return 0.0;
        }
        Real::from(self.workshops - self.workshops_in_operation) / Real::from(self.workshops)
    }

    /// Change how many workshops run; the record is untouched on error.
    pub fn set_workshops_in_operation(&mut self, count: u32) -> GnResult<()> {
        if count > self.workshops {
            return Err(GnError::InvalidArg {
                what: "workshops in operation exceed total workshops",
            });
        }
        self.workshops_in_operation = count;
        Ok(())
    }
}
