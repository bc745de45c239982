#[allow(unused_imports)]
use core_maths::CoreFloat;

/// Normalizes an angle in degrees to the range [0, 360).
///
/// This function takes any angle value (positive or negative) and converts it
/// to an equivalent angle in the range [0, 360). Values outside this range
/// are wrapped around using modulo arithmetic.
///
/// # Arguments
///
/// * `degrees` - The angle in degrees to normalize
///
/// # Returns
///
/// The normalized angle in degrees, in the range [0, 360)
pub(crate) fn normalize_degrees_360(degrees: f64) -> f64 {
    let degrees = degrees / 360.0;
    let mut limited = 360.0 * (degrees - degrees.floor());
    if limited < 0.0 {
        limited += 360.0;
    }
    limited
}

/// Sine of an angle given in degrees.
pub(crate) fn sin_deg(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

/// Cosine of an angle given in degrees.
pub(crate) fn cos_deg(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

/// Tangent of an angle given in degrees.
pub(crate) fn tan_deg(degrees: f64) -> f64 {
    degrees.to_radians().tan()
}

/// Arc-cosine returning degrees, or `None` when `x` lies outside [-1, 1].
///
/// An out-of-range cosine is how an unreachable solar elevation shows up in the
/// hour-angle equation, so callers treat `None` as "the event does not happen".
pub(crate) fn acos_deg(x: f64) -> Option<f64> {
    if !(-1.0..=1.0).contains(&x) {
        return None;
    }
    Some(x.acos().to_degrees())
}

/// Arc-cotangent returning degrees in (0, 180).
///
/// # Arguments
///
/// * `x` - Cotangent value
///
/// # Returns
///
/// The angle whose cotangent is `x`, in degrees
pub(crate) fn acot_deg(x: f64) -> f64 {
    (1.0f64).atan2(x).to_degrees()
}

/// Solar altitude at which an object's shadow is `factor` times its height
/// plus the shadow it casts at transit.
///
/// `zenith_distance` is the angular distance between the sun's declination and
/// the observer's latitude at transit, in degrees.
pub(crate) fn shadow_altitude(factor: f64, zenith_distance: f64) -> f64 {
    acot_deg(factor + tan_deg(zenith_distance.abs()))
}
