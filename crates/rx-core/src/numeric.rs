use crate::CoreError;

/// Scalar type for every simulated quantity
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and `>= 0`.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(CoreError::OutOfRange { what });
    }
    Ok(v)
}

/// Finite and within `[0, 1]`.
pub fn ensure_fraction(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(CoreError::OutOfRange { what });
    }
    Ok(v)
}

/// Clamp to `[0, 1]`. NaN maps to 0.
#[inline]
pub fn clamp_unit(v: Real) -> Real {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Clamp to `[0, Real::MAX]`. NaN maps to 0.
///
/// Quantities without an upper bound are still kept finite so that later
/// arithmetic (`inf - inf`) cannot produce NaN.
#[inline]
pub fn saturate_non_negative(v: Real) -> Real {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, Real::MAX)
    }
}

/// Step length actually used for a requested `dt`.
///
/// Negative, NaN and infinite steps advance nothing.
#[inline]
pub fn sanitize_dt(dt: Real) -> Real {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_rate_is_reported_by_name() {
        let err = ensure_non_negative(Real::NAN, "decay_rate").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
        assert!(msg.contains("decay_rate"));
    }

    #[test]
    fn fraction_bounds() {
        assert!(ensure_fraction(0.0, "f").is_ok());
        assert!(ensure_fraction(1.0, "f").is_ok());
        assert!(ensure_fraction(1.01, "f").is_err());
        assert!(ensure_fraction(-0.01, "f").is_err());
        assert!(ensure_non_negative(-1e-9, "r").is_err());
        assert!(ensure_non_negative(Real::INFINITY, "r").is_err());
    }

    #[test]
    fn clamp_unit_handles_nan_and_range() {
        assert_eq!(clamp_unit(Real::NAN), 0.0);
        assert_eq!(clamp_unit(-3.0), 0.0);
        assert_eq!(clamp_unit(0.25), 0.25);
        assert_eq!(clamp_unit(7.0), 1.0);
    }

    #[test]
    fn saturate_keeps_values_finite() {
        assert_eq!(saturate_non_negative(Real::NAN), 0.0);
        assert_eq!(saturate_non_negative(-1.0), 0.0);
        assert_eq!(saturate_non_negative(Real::INFINITY), Real::MAX);
        assert_eq!(saturate_non_negative(42.0), 42.0);
    }

    #[test]
    fn sanitize_dt_rejects_bad_steps() {
        assert_eq!(sanitize_dt(-0.5), 0.0);
        assert_eq!(sanitize_dt(Real::NAN), 0.0);
        assert_eq!(sanitize_dt(Real::INFINITY), 0.0);
        assert_eq!(sanitize_dt(1.0 / 60.0), 1.0 / 60.0);
    }
}
