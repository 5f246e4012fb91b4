//! `GF(p)` — the fixed prime field the runtime operates over: the BLS12-381
//! scalar field. A single fixed modulus rather than a generic parameter;
//! arithmetic favors readability over constant time.

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use std::{
    cmp::Ordering,
    fmt::{self, Debug, Display},
    ops::{Add, Mul, Neg, Sub},
    sync::OnceLock,
};

use crate::errors::DivByZero;

/// The BLS12-381 scalar field modulus.
const MODULUS_HEX: &str = "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001";

fn modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| BigUint::parse_bytes(MODULUS_HEX.as_bytes(), 16).expect("modulus is a valid hex literal"))
}

/// Width of a field element once encoded as bytes on the wire (spec §6).
pub const ENCODED_LEN: usize = 32;

/// An element of `GF(p)`.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct GF(BigUint);

impl GF {
    /// The additive identity.
    pub fn zero() -> Self {
        GF(BigUint::zero())
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        GF(BigUint::one())
    }

    /// The field modulus.
    pub fn modulus() -> BigUint {
        modulus().clone()
    }

    /// Constructs a field element from a `u64`, reducing modulo `p`.
    pub fn from_u64(value: u64) -> Self {
        GF(BigUint::from(value) % modulus())
    }

    /// Constructs a field element from an `i64`, reducing modulo `p`.
    pub fn from_i64(value: i64) -> Self {
        if value >= 0 {
            Self::from_u64(value as u64)
        } else {
            -Self::from_u64(value.unsigned_abs())
        }
    }

    /// Constructs a field element out of a [BigUint], reducing modulo `p`.
    pub fn from_biguint(value: BigUint) -> Self {
        GF(value % modulus())
    }

    /// Returns the element's canonical representative in `[0, p)`.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Returns true if this is the additive identity.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Samples a uniformly random element using the provided RNG.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        GF(rng.gen_biguint_below(modulus()))
    }

    /// Multiplicative inverse via Fermat's little theorem: `a^(p-2) mod p`.
    pub fn inverse(&self) -> Result<Self, DivByZero> {
        if self.is_zero() {
            return Err(DivByZero);
        }
        let exponent = modulus() - BigUint::from(2u32);
        Ok(GF(self.0.modpow(&exponent, modulus())))
    }

    /// Raises this element to an integer power.
    pub fn pow(&self, exponent: u64) -> Self {
        GF(self.0.modpow(&BigUint::from(exponent), modulus()))
    }

    /// Raises this element to an arbitrary-precision power.
    pub fn pow_biguint(&self, exponent: &BigUint) -> Self {
        GF(self.0.modpow(exponent, modulus()))
    }

    /// The Legendre symbol of this element, `a^((p-1)/2) mod p`, classified into
    /// [Legendre::Zero], [Legendre::Residue] or [Legendre::NonResidue].
    pub fn legendre(&self) -> Legendre {
        if self.is_zero() {
            return Legendre::Zero;
        }
        let exponent = (modulus() - BigUint::one()) / BigUint::from(2u32);
        let result = self.0.modpow(&exponent, modulus());
        if result.is_one() {
            Legendre::Residue
        } else {
            // p is prime, so the only other possible result is p - 1.
            Legendre::NonResidue
        }
    }

    /// Encodes this element as a fixed-width big-endian byte array.
    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        let mut buf = [0u8; ENCODED_LEN];
        let bytes = self.0.to_bytes_be();
        let offset = ENCODED_LEN.saturating_sub(bytes.len());
        buf[offset..].copy_from_slice(&bytes);
        buf
    }

    /// Decodes a fixed-width big-endian byte array into a field element.
    pub fn from_bytes(bytes: &[u8; ENCODED_LEN]) -> Self {
        GF::from_biguint(BigUint::from_bytes_be(bytes))
    }

    /// Returns the value as a signed integer in `(-p/2, p/2]`, useful for human-readable tests.
    pub fn to_signed_bigint(&self) -> BigInt {
        let half = modulus() / BigUint::from(2u32);
        if self.0 > half {
            BigInt::from_biguint(Sign::Minus, modulus() - &self.0)
        } else {
            BigInt::from_biguint(Sign::Plus, self.0.clone())
        }
    }
}

/// The Legendre symbol classification of a field element.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Legendre {
    /// The element is zero.
    Zero,
    /// The element is a nonzero quadratic residue (symbol `+1`).
    Residue,
    /// The element is a quadratic non-residue (symbol `-1`).
    NonResidue,
}

impl Legendre {
    /// The symbol as `{-1, 0, 1}`.
    pub fn as_i8(self) -> i8 {
        match self {
            Legendre::Zero => 0,
            Legendre::Residue => 1,
            Legendre::NonResidue => -1,
        }
    }

    /// The symbol expressed as a field element (`0`, `1` or `p - 1`).
    pub fn as_field_element(self) -> GF {
        match self {
            Legendre::Zero => GF::zero(),
            Legendre::Residue => GF::one(),
            Legendre::NonResidue => -GF::one(),
        }
    }
}

impl Add for &GF {
    type Output = GF;
    fn add(self, rhs: &GF) -> GF {
        GF((&self.0 + &rhs.0) % modulus())
    }
}

impl Sub for &GF {
    type Output = GF;
    fn sub(self, rhs: &GF) -> GF {
        let modulus = modulus();
        if self.0 >= rhs.0 {
            GF(&self.0 - &rhs.0)
        } else {
            GF(modulus - (&rhs.0 - &self.0))
        }
    }
}

impl Mul for &GF {
    type Output = GF;
    fn mul(self, rhs: &GF) -> GF {
        GF((&self.0 * &rhs.0) % modulus())
    }
}

impl Neg for &GF {
    type Output = GF;
    fn neg(self) -> GF {
        if self.is_zero() { GF::zero() } else { GF(modulus() - &self.0) }
    }
}

impl Neg for GF {
    type Output = GF;
    fn neg(self) -> GF {
        -&self
    }
}

impl Add for GF {
    type Output = GF;
    fn add(self, rhs: GF) -> GF {
        &self + &rhs
    }
}

impl Sub for GF {
    type Output = GF;
    fn sub(self, rhs: GF) -> GF {
        &self - &rhs
    }
}

impl Mul for GF {
    type Output = GF;
    fn mul(self, rhs: GF) -> GF {
        &self * &rhs
    }
}

impl<'a> Add<&'a GF> for GF {
    type Output = GF;
    fn add(self, rhs: &'a GF) -> GF {
        &self + rhs
    }
}

impl<'a> Sub<&'a GF> for GF {
    type Output = GF;
    fn sub(self, rhs: &'a GF) -> GF {
        &self - rhs
    }
}

impl<'a> Mul<&'a GF> for GF {
    type Output = GF;
    fn mul(self, rhs: &'a GF) -> GF {
        &self * rhs
    }
}

impl Ord for GF {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for GF {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Debug for GF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GF({})", self.0)
    }
}

impl Display for GF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for GF {
    fn from(value: u32) -> Self {
        GF::from_u64(value as u64)
    }
}

impl From<u64> for GF {
    fn from(value: u64) -> Self {
        GF::from_u64(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for GF {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GF {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Vec<u8> = serde::Deserialize::deserialize(deserializer)?;
        let bytes: [u8; ENCODED_LEN] = bytes.try_into().map_err(|_| serde::de::Error::custom("invalid length"))?;
        Ok(GF::from_bytes(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn addition_wraps() {
        let p_minus_one = GF::from_biguint(GF::modulus() - BigUint::one());
        let one = GF::one();
        assert_eq!(&p_minus_one + &one, GF::zero());
    }

    #[test]
    fn subtraction_wraps() {
        let zero = GF::zero();
        let one = GF::one();
        assert_eq!(&zero - &one, GF::from_biguint(GF::modulus() - BigUint::one()));
    }

    #[rstest]
    #[case(2, 4)]
    #[case(10, 100)]
    #[case(0, 0)]
    fn multiplication(#[case] a: u64, #[case] expected: u64) {
        let a = GF::from_u64(a);
        assert_eq!(&a * &a, GF::from_u64(expected));
    }

    #[test]
    fn inverse_roundtrip() {
        let a = GF::from_u64(1234567);
        let inv = a.inverse().unwrap();
        assert_eq!(&a * &inv, GF::one());
    }

    #[test]
    fn inverse_of_zero_fails() {
        assert!(GF::zero().inverse().is_err());
    }

    #[test]
    fn legendre_of_zero_is_zero() {
        assert_eq!(GF::zero().legendre(), Legendre::Zero);
    }

    #[test]
    fn legendre_of_square_is_residue() {
        let a = GF::from_u64(7);
        let square = &a * &a;
        assert_eq!(square.legendre(), Legendre::Residue);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let a = GF::from_u64(424242);
        let bytes = a.to_bytes();
        assert_eq!(GF::from_bytes(&bytes), a);
    }

    #[test]
    fn modulus_is_odd_and_one_mod_eight() {
        let m = GF::modulus();
        assert_eq!(&m % BigUint::from(2u32), BigUint::one());
        assert_eq!(&m % BigUint::from(8u32), BigUint::one());
    }
}
