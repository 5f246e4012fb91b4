//! Lagrange interpolation over [GF].

use crate::{errors::InterpolationError, field::GF, polynomial::Polynomial};
use std::collections::HashSet;

/// Checks a set of `(x, y)` points for duplicate abscissas.
fn check_no_duplicates(points: &[(GF, GF)]) -> Result<(), InterpolationError> {
    let mut seen = HashSet::with_capacity(points.len());
    for (x, _) in points {
        if !seen.insert(x.clone()) {
            return Err(InterpolationError::DegenerateInputs);
        }
    }
    Ok(())
}

/// Interpolates the unique minimal-degree polynomial through `points` and returns it.
///
/// `points.len()` must exceed the target degree implicitly through the caller's choice
/// of how many points to supply; duplicate abscissas fail with [InterpolationError::DegenerateInputs].
pub fn interpolate(points: &[(GF, GF)]) -> Result<Polynomial, InterpolationError> {
    if points.is_empty() {
        return Err(InterpolationError::EmptySequence);
    }
    check_no_duplicates(points)?;

    let mut result = Polynomial::zero();
    for (i, (xi, yi)) in points.iter().enumerate() {
        let mut numerator = Polynomial::new(vec![GF::one()]);
        let mut denominator = GF::one();
        for (j, (xj, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            // (x - xj)
            let term = Polynomial::new(vec![-xj, GF::one()]);
            numerator = numerator.mul(&term);
            denominator = &denominator * &(xi - xj);
        }
        let factor = yi * &denominator.inverse()?;
        result = result.add(&numerator.scale(&factor));
    }
    Ok(result)
}

/// Evaluates the interpolant through `points` directly at `0`, without constructing
/// the full polynomial — this is the common case (opening a secret).
pub fn interpolate_at_zero(points: &[(GF, GF)]) -> Result<GF, InterpolationError> {
    if points.is_empty() {
        return Err(InterpolationError::EmptySequence);
    }
    check_no_duplicates(points)?;

    let mut result = GF::zero();
    for (i, (xi, yi)) in points.iter().enumerate() {
        let mut numerator = GF::one();
        let mut denominator = GF::one();
        for (j, (xj, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            numerator = &numerator * &(-xj.clone());
            denominator = &denominator * &(xi - xj);
        }
        let term = &(yi * &numerator) * &denominator.inverse()?;
        result = &result + &term;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_a_line() {
        // y = 5 + 3x
        let points = vec![(GF::from_u64(1), GF::from_u64(8)), (GF::from_u64(2), GF::from_u64(11))];
        let poly = interpolate(&points).unwrap();
        assert_eq!(poly.eval(&GF::from_u64(0)), GF::from_u64(5));
        assert_eq!(poly.eval(&GF::from_u64(3)), GF::from_u64(14));
    }

    #[test]
    fn interpolate_at_zero_matches_full_interpolation() {
        let points = vec![
            (GF::from_u64(1), GF::from_u64(8)),
            (GF::from_u64(2), GF::from_u64(11)),
            (GF::from_u64(3), GF::from_u64(14)),
        ];
        let poly = interpolate(&points).unwrap();
        let direct = interpolate_at_zero(&points).unwrap();
        assert_eq!(poly.eval(&GF::zero()), direct);
    }

    #[test]
    fn duplicate_abscissas_fail() {
        let points = vec![(GF::from_u64(1), GF::from_u64(8)), (GF::from_u64(1), GF::from_u64(11))];
        assert_eq!(interpolate(&points).unwrap_err(), InterpolationError::DegenerateInputs);
    }

    #[test]
    fn empty_points_fail() {
        assert_eq!(interpolate(&[]).unwrap_err(), InterpolationError::EmptySequence);
    }
}
