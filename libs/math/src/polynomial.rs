//! Polynomials over [GF]: coefficients low-to-high, Horner's-method
//! evaluation, canonicalization of trailing zero coefficients, and full
//! Euclidean division for the Gao decoder.

use crate::{errors::PolynomialError, field::GF};

/// A polynomial over `GF(p)`, represented by its coefficients from the
/// constant term up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<GF>,
}

impl Polynomial {
    /// Builds a polynomial from its coefficients, constant term first.
    pub fn new(coefficients: Vec<GF>) -> Self {
        let mut poly = Polynomial { coefficients };
        poly.canonicalize();
        poly
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Polynomial { coefficients: Vec::new() }
    }

    /// Removes trailing zero coefficients.
    pub fn canonicalize(&mut self) {
        while matches!(self.coefficients.last(), Some(c) if c.is_zero()) {
            self.coefficients.pop();
        }
    }

    /// True if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// The coefficients, constant term first.
    pub fn coefficients(&self) -> &[GF] {
        &self.coefficients
    }

    /// The polynomial's degree. The zero polynomial has degree `0` by convention here
    /// (callers that need to distinguish it should check [Polynomial::is_zero] first).
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the polynomial at `x` using Horner's method.
    pub fn eval(&self, x: &GF) -> GF {
        let mut acc = GF::zero();
        for coefficient in self.coefficients.iter().rev() {
            acc = &(&acc * x) + coefficient;
        }
        acc
    }

    /// Polynomial addition.
    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let len = self.coefficients.len().max(other.coefficients.len());
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let a = self.coefficients.get(i).cloned().unwrap_or_else(GF::zero);
            let b = other.coefficients.get(i).cloned().unwrap_or_else(GF::zero);
            out.push(&a + &b);
        }
        Polynomial::new(out)
    }

    /// Polynomial subtraction.
    pub fn sub(&self, other: &Polynomial) -> Polynomial {
        let len = self.coefficients.len().max(other.coefficients.len());
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let a = self.coefficients.get(i).cloned().unwrap_or_else(GF::zero);
            let b = other.coefficients.get(i).cloned().unwrap_or_else(GF::zero);
            out.push(&a - &b);
        }
        Polynomial::new(out)
    }

    /// Polynomial multiplication (convolution).
    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }
        let mut out = vec![GF::zero(); self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                let ab = a * b;
                out[i + j] = &out[i + j] + &ab;
            }
        }
        Polynomial::new(out)
    }

    /// Multiplies by a scalar.
    pub fn scale(&self, scalar: &GF) -> Polynomial {
        Polynomial::new(self.coefficients.iter().map(|c| c * scalar).collect())
    }

    /// Polynomial division with remainder: `self = quotient * divisor + remainder`.
    pub fn div_rem(&self, divisor: &Polynomial) -> Result<(Polynomial, Polynomial), PolynomialError> {
        if divisor.is_zero() {
            return Err(PolynomialError::DivByZero);
        }
        let divisor_lead = divisor.coefficients.last().ok_or(PolynomialError::CoefficientNotFound)?;
        let divisor_lead_inv = divisor_lead.inverse()?;
        let mut remainder = self.clone();
        let mut quotient = vec![GF::zero(); self.degree().saturating_sub(divisor.degree()) + 1];

        while !remainder.is_zero() && remainder.degree() >= divisor.degree() {
            let shift = remainder.degree() - divisor.degree();
            let remainder_lead = remainder.coefficients.last().ok_or(PolynomialError::CoefficientNotFound)?;
            let factor = remainder_lead * &divisor_lead_inv;
            if let Some(slot) = quotient.get_mut(shift) {
                *slot = factor.clone();
            }
            let mut term = vec![GF::zero(); shift];
            term.push(factor);
            let term = Polynomial::new(term);
            remainder = remainder.sub(&term.mul(divisor));
        }
        Ok((Polynomial::new(quotient), remainder))
    }
}

impl std::ops::Div<&Polynomial> for Polynomial {
    type Output = Result<Polynomial, PolynomialError>;
    fn div(self, rhs: &Polynomial) -> Self::Output {
        Ok(self.div_rem(rhs)?.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coeffs: &[i64]) -> Polynomial {
        Polynomial::new(coeffs.iter().map(|&c| GF::from_i64(c)).collect())
    }

    #[test]
    fn eval_horner() {
        // 10 + 2x + 3x^2 at x=2 -> 10 + 4 + 12 = 26
        let p = poly(&[10, 2, 3]);
        assert_eq!(p.eval(&GF::from_u64(2)), GF::from_u64(26));
    }

    #[test]
    fn canonicalize_trims_trailing_zeros() {
        let p = Polynomial::new(vec![GF::from_u64(1), GF::zero(), GF::zero()]);
        assert_eq!(p.degree(), 0);
    }

    #[test]
    fn mul_matches_manual_convolution() {
        // (1 + x) * (1 + x) = 1 + 2x + x^2
        let a = poly(&[1, 1]);
        let expected = poly(&[1, 2, 1]);
        assert_eq!(a.mul(&a), expected);
    }

    #[test]
    fn div_rem_exact() {
        // (x^2 - 1) / (x - 1) = x + 1, remainder 0
        let dividend = poly(&[-1, 0, 1]);
        let divisor = poly(&[-1, 1]);
        let (q, r) = dividend.div_rem(&divisor).unwrap();
        assert_eq!(q, poly(&[1, 1]));
        assert!(r.is_zero());
    }

    #[test]
    fn div_rem_with_remainder() {
        // (x^2 + 1) / (x) = x remainder 1
        let dividend = poly(&[1, 0, 1]);
        let divisor = poly(&[0, 1]);
        let (q, r) = dividend.div_rem(&divisor).unwrap();
        assert_eq!(q, poly(&[0, 1]));
        assert_eq!(r, poly(&[1]));
    }
}
