//! Fast inverse square root and sine/cosine for rendering math.

use core::f64::consts::{FRAC_PI_2, TAU};

/// Seed for the bit-level inverse square root estimate.
const INV_SQRT_MAGIC: u32 = 0x5f37_59df;

/// Taylor coefficients of sin(r)/r in r^2, lowest order first.
const SIN_COEFFS: [f64; 8] = [
    1.0,
    -1.0 / 6.0,
    1.0 / 120.0,
    -1.0 / 5_040.0,
    1.0 / 362_880.0,
    -1.0 / 39_916_800.0,
    1.0 / 6_227_020_800.0,
    -1.0 / 1_307_674_368_000.0,
];

/// Taylor coefficients of cos(r) in r^2, lowest order first.
const COS_COEFFS: [f64; 9] = [
    1.0,
    -1.0 / 2.0,
    1.0 / 24.0,
    -1.0 / 720.0,
    1.0 / 40_320.0,
    -1.0 / 3_628_800.0,
    1.0 / 479_001_600.0,
    -1.0 / 87_178_291_200.0,
    1.0 / 20_922_789_888_000.0,
];

/// Approximate `1 / sqrt(x)` for `x > 0`.
///
/// Two Newton-Raphson steps from the bit-level seed keep the relative error
/// near 5e-6 over the normal range. Non-positive input yields an
/// unspecified value.
pub fn inverse_sqrt(x: f32) -> f32 {
    let half = 0.5 * x;
    let mut y = f32::from_bits(INV_SQRT_MAGIC.wrapping_sub(x.to_bits() >> 1));
    y *= 1.5 - half * y * y;
    y *= 1.5 - half * y * y;
    y
}

pub fn sine(x: f32) -> f32 {
    sin_cos(x).0
}

pub fn cosine(x: f32) -> f32 {
    sin_cos(x).1
}

/// Both trig values of `x` (radians). Non-finite input gives NaN.
pub fn sin_cos(x: f32) -> (f32, f32) {
    if !x.is_finite() {
        return (f32::NAN, f32::NAN);
    }

    // fmod is exact, so even huge inputs land in (-TAU, TAU) without
    // blowing up the polynomial.
    let reduced = f64::from(x) % TAU;
    let quadrant = (reduced / FRAC_PI_2).round();
    let r = reduced - quadrant * FRAC_PI_2;

    let r2 = r * r;
    let s = r * horner(&SIN_COEFFS, r2);
    let c = horner(&COS_COEFFS, r2);

    let (s, c) = match (quadrant as i64).rem_euclid(4) {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    };
    (s as f32, c as f32)
}

fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &coeff| acc * x + coeff)
}

/// `NK_INV_SQRT` hook.
#[unsafe(no_mangle)]
pub extern "C" fn nkhost_inv_sqrt(x: f32) -> f32 {
    inverse_sqrt(x)
}

/// `NK_SIN` hook.
#[unsafe(no_mangle)]
pub extern "C" fn nkhost_sin(x: f32) -> f32 {
    sine(x)
}

/// `NK_COS` hook.
#[unsafe(no_mangle)]
pub extern "C" fn nkhost_cos(x: f32) -> f32 {
    cosine(x)
}
