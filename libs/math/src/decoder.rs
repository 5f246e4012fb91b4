//! Robust polynomial reconstruction via Gao decoding (a reformulation of
//! Berlekamp-Welch in terms of the extended Euclidean algorithm).
//!
//! Given `n` points lying on a degree-`<= degree` polynomial except for at
//! most `max_errors` of them, recovers that polynomial even though which
//! points are wrong is unknown in advance.

use crate::{errors::DecodeError, field::GF, lagrange, polynomial::Polynomial};
use std::collections::HashSet;

/// The outcome of a successful decode: the recovered low-degree polynomial
/// and the error locator polynomial (its roots are the faulty abscissas).
pub struct Decoded {
    pub message: Polynomial,
    pub error_locator: Polynomial,
}

fn product_of_roots(xs: &[GF]) -> Polynomial {
    let mut acc = Polynomial::new(vec![GF::one()]);
    for x in xs {
        acc = acc.mul(&Polynomial::new(vec![-x.clone(), GF::one()]));
    }
    acc
}

/// Decodes `points`, recovering the unique polynomial of degree at most
/// `degree` that agrees with all but at most `max_errors` of the points.
///
/// Fails with [DecodeError::Unrecoverable] if there are not enough
/// agreeing points to pin down such a polynomial (requires
/// `points.len() >= degree + 1 + 2 * max_errors`), or if no consistent
/// polynomial exists at all.
pub fn gao_decode(points: &[(GF, GF)], degree: usize, max_errors: usize) -> Result<Decoded, DecodeError> {
    let n = points.len();
    if n == 0 {
        return Err(DecodeError::EmptySequence);
    }
    let mut seen = HashSet::with_capacity(n);
    for (x, _) in points {
        if !seen.insert(x.clone()) {
            return Err(DecodeError::HasDuplicates);
        }
    }
    let min_len = degree + 1 + 2 * max_errors;
    if n < min_len {
        return Err(DecodeError::Unrecoverable);
    }

    let xs: Vec<GF> = points.iter().map(|(x, _)| x.clone()).collect();
    let g0 = product_of_roots(&xs);
    let g1 = lagrange::interpolate(points)?;

    // Extended Euclidean algorithm on (g0, g1), tracking only the Bezout
    // coefficient of g1 (`t`), stopped once the remainder degree drops
    // below the threshold that guarantees a unique low-degree quotient.
    let threshold = (n + degree) / 2;
    let mut r_prev = g0;
    let mut r_cur = g1;
    let mut t_prev = Polynomial::zero();
    let mut t_cur = Polynomial::new(vec![GF::one()]);

    while !r_cur.is_zero() && r_cur.degree() >= threshold {
        let (q, rem) = r_prev.div_rem(&r_cur)?;
        let t_next = t_prev.sub(&q.mul(&t_cur));
        r_prev = r_cur;
        r_cur = rem;
        t_prev = t_cur;
        t_cur = t_next;
    }

    if t_cur.is_zero() {
        return Err(DecodeError::Unrecoverable);
    }
    let (message, leftover) = r_cur.div_rem(&t_cur)?;
    if !leftover.is_zero() || message.degree() > degree && !message.is_zero() {
        return Err(DecodeError::Unrecoverable);
    }
    Ok(Decoded { message, error_locator: t_cur })
}

/// Indices into `points` that the error locator from a successful decode
/// identifies as faulty.
pub fn error_positions(points: &[(GF, GF)], error_locator: &Polynomial) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter_map(|(i, (x, _))| error_locator.eval(x).is_zero().then_some(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(poly: &Polynomial, xs: &[u64]) -> Vec<(GF, GF)> {
        xs.iter().map(|&x| { let x = GF::from_u64(x); (x.clone(), poly.eval(&x)) }).collect()
    }

    #[test]
    fn decodes_with_no_errors() {
        let poly = Polynomial::new(vec![GF::from_u64(3), GF::from_u64(5)]);
        let points = encode(&poly, &[1, 2, 3, 4, 5]);
        let decoded = gao_decode(&points, 1, 2).unwrap();
        assert_eq!(decoded.message, poly);
    }

    #[test]
    fn decodes_with_corrupted_shares() {
        let poly = Polynomial::new(vec![GF::from_u64(7), GF::from_u64(2), GF::from_u64(1)]);
        let mut points = encode(&poly, &[1, 2, 3, 4, 5, 6, 7]);
        // corrupt two of the seven points; degree 2, max_errors 2 requires 2+1+4=7 points.
        points[1].1 = &points[1].1 + &GF::one();
        points[4].1 = &points[4].1 + &GF::from_u64(99);
        let decoded = gao_decode(&points, 2, 2).unwrap();
        assert_eq!(decoded.message, poly);
        assert_eq!(error_positions(&points, &decoded.error_locator), vec![1, 4]);
    }

    #[test]
    fn fails_when_too_many_errors() {
        let poly = Polynomial::new(vec![GF::from_u64(7), GF::from_u64(2), GF::from_u64(1)]);
        let mut points = encode(&poly, &[1, 2, 3, 4, 5, 6, 7]);
        points[0].1 = &points[0].1 + &GF::one();
        points[1].1 = &points[1].1 + &GF::one();
        points[2].1 = &points[2].1 + &GF::one();
        let result = gao_decode(&points, 2, 2);
        assert!(result.is_err());
    }

    #[test]
    fn fails_on_insufficient_points() {
        let poly = Polynomial::new(vec![GF::from_u64(1), GF::from_u64(1)]);
        let points = encode(&poly, &[1, 2]);
        assert_eq!(gao_decode(&points, 1, 1).unwrap_err(), DecodeError::Unrecoverable);
    }
}
