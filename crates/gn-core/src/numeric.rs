use crate::GnError;

/// Floating point type used for lengths and path weights.
pub type Real = f64;

/// Comparison tolerances for accumulated path distances.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    if a == b {
        // covers matching infinities
        return true;
    }
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, GnError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(GnError::NonFinite { what, value: v })
    }
}

/// Finite and not below zero (physical lengths).
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, GnError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(GnError::InvalidArg { what });
    }
    Ok(v)
}
