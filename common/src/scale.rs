//! Linear value scaling shared by gauges and the thermostat column.

/// Clamp `value` into `[min, max]` and return its position as a fraction in `[0, 1]`.
///
/// A degenerate range (`max <= min`) maps everything to `0.0`; configuration
/// validation never lets one through, but the column renderer is also fed
/// raw attribute values.
#[inline]
pub fn fraction(
    value: f32,
    min: f32,
    max: f32,
) -> f32 {
    if max <= min || value.is_nan() {
        return 0.0;
    }
    (value.clamp(min, max) - min) / (max - min)
}

/// Height in pixels of a column filled to `fraction` of `full_height`.
///
/// Rounded to the nearest pixel so a half-full 101px column reads 51px.
#[inline]
pub fn column_height(
    fraction: f32,
    full_height: u32,
) -> u32 {
    let px = fraction.clamp(0.0, 1.0) * full_height as f32 + 0.5;
    (px as u32).min(full_height)
}
