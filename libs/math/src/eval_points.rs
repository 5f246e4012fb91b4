//! Evaluation point sets used to turn a secret into Shamir shares.
//!
//! Two flavors are supported: plain sequential points `1, 2, 3, ...`
//! (one per party, indexed by party position) and points drawn from a
//! power-of-two subgroup of `GF(p)^*`, which make batched share generation
//! and reconstruction amenable to FFT-based techniques.

use crate::{errors::EvalPointError, field::GF};
use num_bigint::BigUint;
use num_traits::One;

/// The 2-adicity of the field's multiplicative group: `p - 1` is divisible
/// by `2^32` but not `2^33`, so subgroups of any power-of-two order up to
/// `2^32` exist.
const TWO_ADICITY: u32 = 32;

/// A fixed generator of `GF(p)^*` used to derive roots of unity.
const GENERATOR: u64 = 7;

/// The sequential evaluation points `1, 2, ..., n`.
pub fn sequential_points(n: usize) -> Vec<GF> {
    (1..=n as u64).map(GF::from_u64).collect()
}

/// A primitive `order`-th root of unity, where `order` must be a power of two.
fn root_of_unity(order: u64) -> Result<GF, EvalPointError> {
    if order == 0 || !order.is_power_of_two() {
        return Err(EvalPointError::NoSubgroup(order));
    }
    if order > (1u64 << TWO_ADICITY) {
        return Err(EvalPointError::NoSubgroup(order));
    }
    let p_minus_one = GF::modulus() - BigUint::one();
    let exponent = p_minus_one / BigUint::from(order);
    Ok(GF::from_u64(GENERATOR).pow_biguint(&exponent))
}

/// `n` points drawn from the smallest power-of-two subgroup that contains at
/// least `n` elements: `1, omega, omega^2, ..., omega^(n-1)`.
pub fn fft_points(n: usize) -> Result<Vec<GF>, EvalPointError> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let order = (n as u64).next_power_of_two();
    let omega = root_of_unity(order)?;
    let mut points = Vec::with_capacity(n);
    let mut current = GF::one();
    for _ in 0..n {
        points.push(current.clone());
        current = &current * &omega;
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_points_start_at_one() {
        let points = sequential_points(3);
        assert_eq!(points, vec![GF::from_u64(1), GF::from_u64(2), GF::from_u64(3)]);
    }

    #[test]
    fn fft_points_are_distinct() {
        let points = fft_points(8).unwrap();
        assert_eq!(points.len(), 8);
        let unique: std::collections::HashSet<_> = points.iter().cloned().collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn fft_points_root_has_correct_order() {
        let points = fft_points(8).unwrap();
        let omega = &points[1];
        // omega^8 == 1
        assert_eq!(omega.pow(8), GF::one());
        // omega^4 != 1 (omega is primitive, not just any 8th root)
        assert_ne!(omega.pow(4), GF::one());
    }

    #[test]
    fn rejects_non_power_of_two_order() {
        assert!(root_of_unity(3).is_err());
    }
}
