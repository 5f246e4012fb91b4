//! Batch reconstruction: opening `m` shares at once for the price of one
//! round trip per party instead of `m`.
//!
//! Each party's `m` shares already form `m` independent valid degree-`t`
//! sharings, so no auxiliary packing polynomial is needed to benefit from
//! batching the *messages*: every party sends a single row of `m` values
//! (wire tag `R1`), and each of the `m` items is decided independently using
//! the same optimistic-then-Gao-decode logic as single-share reconstruction,
//! keyed by column. `R2` is accepted on the wire for forward compatibility
//! with resharing-based batch protocols, but this implementation's `R1`
//! round already tolerates up to `⌊(n-1-t)/2⌋` corrupted rows per item, so it
//! never needs to emit or wait for one.

use crate::{errors::BatchError, robust};
use math_lib::GF;

/// Stateful accumulator for opening `m` shares at once.
pub struct BatchReconstructor {
    n: usize,
    t: usize,
    points: Vec<GF>,
    m: usize,
    received: Vec<(usize, Vec<GF>)>,
    seen: Vec<bool>,
}

impl BatchReconstructor {
    /// Creates a reconstructor for `n` parties at threshold `t` opening `m` shares at once.
    pub fn new(n: usize, t: usize, points: Vec<GF>, m: usize) -> Self {
        Self { n, t, points, m, received: Vec::with_capacity(n), seen: vec![false; n] }
    }

    /// Records party `party_index`'s `R1` row and re-evaluates whether the batch can be decided.
    pub fn add_round1(&mut self, party_index: usize, values: Vec<GF>) -> Result<Option<Vec<GF>>, BatchError> {
        if values.len() != self.m {
            return Err(BatchError::MalformedRow { expected: self.m, actual: values.len() });
        }
        let slot = self.seen.get_mut(party_index).ok_or(BatchError::UnknownParty(party_index))?;
        if *slot {
            return Ok(None);
        }
        *slot = true;
        self.received.push((party_index, values));
        self.try_decide()
    }

    /// Accepts (and discards) an `R2` row. See the module documentation for why this is a no-op here.
    pub fn add_round2(&mut self, _party_index: usize, _values: Vec<GF>) -> Result<Option<Vec<GF>>, BatchError> {
        Ok(None)
    }

    fn try_decide(&self) -> Result<Option<Vec<GF>>, BatchError> {
        if self.received.len() < self.n.saturating_sub(self.t) {
            return Ok(None);
        }
        let mut secrets = Vec::with_capacity(self.m);
        for item in 0..self.m {
            let column: Vec<(usize, GF)> =
                self.received.iter().map(|(i, row)| (*i, row[item].clone())).collect();
            match robust::decide(&column, &self.points, self.n, self.t) {
                Ok(robust::ReconstructOutcome::Resolved(v)) => secrets.push(v),
                Ok(robust::ReconstructOutcome::Pending) => return Ok(None),
                Err(source) => return Err(BatchError::BatchReconstructionFailed { item, source }),
            }
        }
        Ok(Some(secrets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_lib::Polynomial;

    #[test]
    fn opens_a_batch_with_no_faults() {
        let polys: Vec<Polynomial> = (0..5)
            .map(|i| Polynomial::new(vec![GF::from_u64(i), GF::from_u64(1)]))
            .collect();
        let points: Vec<GF> = (1..=4u64).map(GF::from_u64).collect();
        let mut reconstructor = BatchReconstructor::new(4, 1, points.clone(), polys.len());

        let mut result = None;
        for (i, x) in points.iter().enumerate() {
            let row: Vec<GF> = polys.iter().map(|p| p.eval(x)).collect();
            result = reconstructor.add_round1(i, row).unwrap();
            if result.is_some() {
                break;
            }
        }
        assert_eq!(result, Some((0..5).map(GF::from_u64).collect()));
    }

    #[test]
    fn rejects_malformed_rows() {
        let points: Vec<GF> = (1..=4u64).map(GF::from_u64).collect();
        let mut reconstructor = BatchReconstructor::new(4, 1, points, 3);
        let err = reconstructor.add_round1(0, vec![GF::zero(); 2]).unwrap_err();
        assert!(matches!(err, BatchError::MalformedRow { expected: 3, actual: 2 }));
    }
}
