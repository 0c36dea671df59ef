use crate::HlError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, HlError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HlError::NonFinite { what, value: v })
    }
}

/// Strictly positive, finite value (areas, resistances, capacities, timesteps).
pub fn ensure_positive(v: f64, what: &'static str) -> Result<f64, HlError> {
    ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(HlError::InvalidParameter {
            what,
            value: v,
            reason: "must be > 0",
        })
    }
}

pub fn ensure_non_negative(v: f64, what: &'static str) -> Result<f64, HlError> {
    ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(HlError::InvalidParameter {
            what,
            value: v,
            reason: "must be >= 0",
        })
    }
}

/// Value in the closed interval [0, 1] (emissivity, absorptance, transmittance).
pub fn ensure_unit_interval(v: f64, what: &'static str) -> Result<f64, HlError> {
    ensure_finite(v, what)?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(HlError::InvalidParameter {
            what,
            value: v,
            reason: "must lie in [0, 1]",
        })
    }
}

/// Absolute temperature in kelvin; must be strictly above absolute zero.
pub fn ensure_kelvin(v: f64, what: &'static str) -> Result<f64, HlError> {
    ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(HlError::InvalidParameter {
            what,
            value: v,
            reason: "absolute temperature must be > 0 K",
        })
    }
}
