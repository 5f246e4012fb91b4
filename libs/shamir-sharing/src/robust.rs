//! Robust reconstruction of a single degree-`t` secret from `n` party shares,
//! tolerating up to `t` arbitrarily corrupted shares via Berlekamp-Welch (Gao)
//! decoding.
//!
//! The accumulation strategy follows the optimistic-then-robust shape: once
//! `n - t` shares have arrived, interpolate directly and check the result
//! against every share seen so far (including ones collected after the
//! interpolation window). A mismatch falls back to Gao decoding over
//! everything received; more shares are awaited until either a consistent
//! polynomial is found or all `n` shares are in and decoding still fails.

use crate::errors::ReconstructError;
use math_lib::{gao_decode, lagrange, GF};

/// The result of feeding in one more share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconstructOutcome {
    /// Not enough shares have arrived yet to decide.
    Pending,
    /// The secret has been recovered.
    Resolved(GF),
}

/// Attempts to decide the secret from the shares received so far, in arrival order.
pub fn decide(received: &[(usize, GF)], points: &[GF], n: usize, t: usize) -> Result<ReconstructOutcome, ReconstructError> {
    let threshold = n.saturating_sub(t);
    if received.len() < threshold {
        return Ok(ReconstructOutcome::Pending);
    }

    let prefix: Vec<(GF, GF)> =
        received.iter().take(threshold).map(|(i, v)| (points[*i].clone(), v.clone())).collect();
    let candidate = lagrange::interpolate(&prefix)?;
    let consistent = received.iter().all(|(i, v)| &candidate.eval(&points[*i]) == v);
    if consistent {
        return Ok(ReconstructOutcome::Resolved(candidate.eval(&GF::zero())));
    }

    let max_errors = n.saturating_sub(1).saturating_sub(t) / 2;
    let all: Vec<(GF, GF)> = received.iter().map(|(i, v)| (points[*i].clone(), v.clone())).collect();
    match gao_decode(&all, t, max_errors) {
        Ok(decoded) => Ok(ReconstructOutcome::Resolved(decoded.message.eval(&GF::zero()))),
        Err(_) if received.len() < n => Ok(ReconstructOutcome::Pending),
        Err(_) => Err(ReconstructError::ReconstructionFailed { error_positions: received.iter().map(|(i, _)| *i).collect() }),
    }
}

/// Stateful accumulator for a single share opening.
pub struct RobustReconstructor {
    n: usize,
    t: usize,
    points: Vec<GF>,
    received: Vec<(usize, GF)>,
    seen: Vec<bool>,
}

impl RobustReconstructor {
    /// Creates a reconstructor for `n` parties at threshold `t`, each holding the given evaluation point.
    pub fn new(n: usize, t: usize, points: Vec<GF>) -> Self {
        Self { n, t, points, received: Vec::with_capacity(n), seen: vec![false; n] }
    }

    /// Records party `party_index`'s share and re-evaluates whether the secret can be decided.
    ///
    /// A repeated call for the same party index is ignored; detecting and rejecting
    /// duplicate shares outright is the share manager's responsibility.
    pub fn add_share(&mut self, party_index: usize, value: GF) -> Result<ReconstructOutcome, ReconstructError> {
        let slot = self.seen.get_mut(party_index).ok_or(ReconstructError::UnknownParty(party_index))?;
        if *slot {
            return Ok(ReconstructOutcome::Pending);
        }
        *slot = true;
        self.received.push((party_index, value));
        decide(&self.received, &self.points, self.n, self.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_lib::Polynomial;

    fn points(n: usize) -> Vec<GF> {
        (1..=n as u64).map(GF::from_u64).collect()
    }

    #[test]
    fn resolves_with_no_faults() {
        let poly = Polynomial::new(vec![GF::from_u64(42), GF::from_u64(7)]);
        let pts = points(4);
        let mut reconstructor = RobustReconstructor::new(4, 1, pts.clone());
        let mut last = ReconstructOutcome::Pending;
        for (i, x) in pts.iter().enumerate() {
            last = reconstructor.add_share(i, poly.eval(x)).unwrap();
            if matches!(last, ReconstructOutcome::Resolved(_)) {
                break;
            }
        }
        assert_eq!(last, ReconstructOutcome::Resolved(GF::from_u64(42)));
    }

    #[test]
    fn resolves_despite_a_fault() {
        let poly = Polynomial::new(vec![GF::from_u64(100), GF::from_u64(1)]);
        let pts = points(4);
        let mut reconstructor = RobustReconstructor::new(4, 1, pts.clone());
        let shares: Vec<GF> = pts.iter().map(|x| poly.eval(x)).collect();
        reconstructor.add_share(0, &shares[0] + &GF::one()).unwrap();
        reconstructor.add_share(1, shares[1].clone()).unwrap();
        let outcome = reconstructor.add_share(2, shares[2].clone()).unwrap();
        let outcome = match outcome {
            ReconstructOutcome::Resolved(_) => outcome,
            ReconstructOutcome::Pending => reconstructor.add_share(3, shares[3].clone()).unwrap(),
        };
        assert_eq!(outcome, ReconstructOutcome::Resolved(GF::from_u64(100)));
    }

    #[test]
    fn fails_with_too_many_faults() {
        let poly = Polynomial::new(vec![GF::from_u64(5), GF::from_u64(2)]);
        let pts = points(4);
        let shares: Vec<GF> = pts.iter().map(|x| poly.eval(x)).collect();
        let mut reconstructor = RobustReconstructor::new(4, 1, pts);
        reconstructor.add_share(0, &shares[0] + &GF::one()).unwrap();
        reconstructor.add_share(1, &shares[1] + &GF::one()).unwrap();
        reconstructor.add_share(2, shares[2].clone()).unwrap();
        let result = reconstructor.add_share(3, shares[3].clone());
        assert!(matches!(result, Err(ReconstructError::ReconstructionFailed { .. })));
    }
}
