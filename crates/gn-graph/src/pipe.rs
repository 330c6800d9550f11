//! Pipe records and the snapshot the engine caches per pipe.

use gn_core::{GnError, GnResult, Length, PipeId, Real, ensure_non_negative, m, meters};

/// Diameters (mm) a connection can be requested by.
pub const STANDARD_DIAMETERS_MM: [u32; 4] = [500, 700, 1000, 1400];

/// Throughput per standard diameter, ascending.
const CAPACITY_TABLE: [(u32, u64); 4] = [(500, 60), (700, 130), (1000, 300), (1400, 600)];

/// Capacity of a pipe in working order.
///
/// Non-standard diameters are rated as the largest standard diameter that
/// does not exceed them; anything narrower than 500 mm carries nothing.
pub fn capacity_for_diameter(diameter_mm: u32) -> u64 {
    CAPACITY_TABLE
        .iter()
        .rev()
        .find(|(d, _)| diameter_mm >= *d)
        .map_or(0, |&(_, capacity)| capacity)
}

/// A physical pipe as owned by the pipe registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub id: PipeId,
    pub name: String,
    pub length: Length,
    pub diameter_mm: u32,
    pub in_repair: bool,
}

impl Pipe {
    pub fn new(
        id: PipeId,
        name: impl Into<String>,
        length_m: Real,
        diameter_mm: u32,
        in_repair: bool,
    ) -> GnResult<Self> {
        let length_m = ensure_non_negative(length_m, "pipe length")?;
        if diameter_mm == 0 {
            return Err(GnError::InvalidArg {
                what: "pipe diameter must be positive",
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            length: m(length_m),
            diameter_mm,
            in_repair,
        })
    }

    pub fn length_m(&self) -> Real {
        meters(self.length)
    }

    /// Zero while under repair.
    pub fn capacity(&self) -> u64 {
        if self.in_repair {
            0
        } else {
            capacity_for_diameter(self.diameter_mm)
        }
    }

    /// Traversal cost for path search; infinite while under repair.
    pub fn weight(&self) -> Real {
        if self.in_repair {
            Real::INFINITY
        } else {
            self.length_m()
        }
    }

    pub fn snapshot(&self) -> PipeSnapshot {
        PipeSnapshot {
            capacity: self.capacity(),
            weight: self.weight(),
        }
    }
}

/// Edge attributes derived from a pipe at registration or update time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeSnapshot {
    pub capacity: u64,
    pub weight: Real,
}

impl PipeSnapshot {
    /// Weights are lengths: never NaN or negative. `+inf` marks a pipe
    /// under repair.
    pub fn is_valid(&self) -> bool {
        self.weight >= 0.0
    }
}
