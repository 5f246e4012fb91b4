//! `ShareLessThan`: bitwise comparison via Reistad's (2007) protocol.
//!
//! Requires `2a+1 < p` and `2b+1 < p` for the operands' plaintext values; the protocol does
//! not and cannot check this itself without revealing information, so a caller that violates
//! it gets a meaningless result rather than an error.

use crate::{
    context::{require_mixin, DebugChecks, MixinName},
    errors::ContextError,
    mixins::multiply,
    share::Share,
};
use math_lib::GF;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// The number of bits in the field's modulus; both operands' bit-decompositions run this wide.
fn bit_length() -> usize {
    GF::modulus().bits() as usize
}

fn bit_at(value: &BigUint, index: usize) -> bool {
    value.bit(index as u64)
}

fn gf_bit(value: &BigUint, index: usize) -> GF {
    if bit_at(value, index) {
        GF::one()
    } else {
        GF::zero()
    }
}

/// `[a] < [b]`, opening to `1` iff `a < b`.
pub async fn less_than(a: &Share, b: &Share) -> Result<Share, ContextError> {
    let context = a.context.clone();
    require_mixin(&context.mixins, MixinName::LessThan)?;
    let l = bit_length();
    let two = GF::from_u64(2);
    let one = GF::one();

    // Phase 1: mask z = a - b with a random bit-decomposed r, and open c = 2z + r to learn
    // r XOR'd against z's sign bit without revealing z itself.
    let mut r_bits = Vec::with_capacity(l);
    for _ in 0..l {
        r_bits.push(context.next_bit().await?);
    }
    let mut r_big = GF::zero();
    for (i, r) in r_bits.iter().enumerate() {
        r_big = &r_big + &(&two.pow(i as u64) * r);
    }
    let z = &a.value - &b.value;
    let c_value = &(&two * &z) + &r_big;
    let c = Share::new(c_value, context.t, context.clone()).open().await?;
    let c_bits = c.as_biguint().clone();

    // Phase 2: bigx accumulates, bit by bit, whether r's high bits exceed c's, each term
    // weighted by a plaintext power of two recovered from one small opened XOR-sum.
    let mut bigx = GF::zero();
    for i in 0..l - 1 {
        let mut cr = GF::zero();
        for j in (i + 1)..l {
            let c_j = gf_bit(&c_bits, j);
            let xor_j = &(&r_bits[j] + &c_j) - &(&two * &(&c_j * &r_bits[j]));
            cr = &cr + &xor_j;
        }
        let cr_open = Share::new(cr, context.t, context.clone()).open().await?;
        let exponent = cr_open
            .as_biguint()
            .to_u64()
            .ok_or_else(|| ContextError::InvalidOperand("less-than exponent too large to open".into()))?;
        let pp = two.pow(exponent);
        let c_i = gf_bit(&c_bits, i);
        let coeff = &(&one - &c_i) * &pp;
        bigx = &bigx + &(&coeff * &r_bits[i]);
    }
    let c_last = gf_bit(&c_bits, l - 1);
    bigx = &bigx + &(&(&one - &c_last) * &r_bits[l - 1]);

    // Phase 3: extract bigx's low bit via a second random mask, using the four-case table for
    // whether d wrapped past 2^(L-1), 2^(L-2), or both.
    let mut s_bits = Vec::with_capacity(l);
    for _ in 0..l {
        s_bits.push(context.next_bit().await?);
    }
    let s0 = s_bits[0].clone();
    let s1 = s_bits[l - 1].clone();
    let s2 = s_bits[l - 2].clone();

    let s1_share = Share::new(s1.clone(), context.t, context.clone());
    let s2_share = Share::new(s2.clone(), context.t, context.clone());
    let s1s2 = multiply::multiply(&s1_share, &s2_share).await?.value;

    let mut s_big = GF::zero();
    for (i, s) in s_bits.iter().enumerate() {
        s_big = &s_big + &(&two.pow(i as u64) * s);
    }

    let bigd = &s_big + &bigx;
    let d = Share::new(bigd.clone(), context.t, context.clone()).open().await?;
    let d_value = d.as_biguint().clone();
    let d0_bool = bit_at(&d_value, 0);
    let d0 = if d0_bool { one.clone() } else { GF::zero() };

    let threshold1 = BigUint::from(1u32) << (l - 1);
    let threshold2 = BigUint::from(1u32) << (l - 2);
    let threshold12 = &threshold1 + &threshold2;
    let to_gf = |flag: bool| if flag { one.clone() } else { GF::zero() };
    let dxor1 = to_gf(d0_bool ^ (d_value < threshold1));
    let dxor2 = to_gf(d0_bool ^ (d_value < threshold2));
    let dxor12 = to_gf(d0_bool ^ (d_value < threshold12));

    let term0 = &d0 * &(&(&one + &s1s2) - &(&s1 + &s2));
    let term2 = &dxor2 * &(&s2 - &s1s2);
    let term1 = &dxor1 * &(&s1 - &s1s2);
    let term12 = &dxor12 * &s1s2;
    let d0_recombined = &(&(&term0 + &term2) + &term1) + &term12;

    if context.debug_checks == DebugChecks::Enabled {
        let mut s_hat_big = GF::zero();
        for (i, s) in s_bits[..l - 2].iter().enumerate() {
            s_hat_big = &s_hat_big + &(&two.pow(i as u64) * s);
        }
        let d_hat = Share::new(&s_hat_big + &bigx, context.t, context.clone()).open().await?;
        let d_hat_0 = bit_at(d_hat.as_biguint(), 0);
        let d0_open = Share::new(d0_recombined.clone(), context.t, context.clone()).open().await?;
        if bit_at(d0_open.as_biguint(), 0) != d_hat_0 {
            return Err(ContextError::InvalidOperand("less-than debug check failed: d0 parity mismatch".into()));
        }
    }

    // [x0] = [s0] XOR [d0], the share analogue of "did r's high bits exceed c's".
    let s0_share = Share::new(s0.clone(), context.t, context.clone());
    let d0_share = Share::new(d0_recombined.clone(), context.t, context.clone());
    let s0d0 = multiply::multiply(&s0_share, &d0_share).await?.value;
    let x0 = &(&s0 + &d0_recombined) - &(&two * &s0d0);

    // Compose with c0 XOR r0 (c0 is plaintext, so this half is a local scale) to recover a<b.
    let c0 = gf_bit(&c_bits, 0);
    let r0 = r_bits[0].clone();
    let c0_xor_r0 = &(&c0 + &r0) - &(&(&two * &c0) * &r0);

    let c0_xor_r0_share = Share::new(c0_xor_r0.clone(), context.t, context.clone());
    let x0_share = Share::new(x0.clone(), context.t, context.clone());
    let cross = multiply::multiply(&c0_xor_r0_share, &x0_share).await?.value;
    let result = &(&c0_xor_r0 + &x0) - &(&two * &cross);

    Ok(Share::new(result, context.t, context.clone()))
}
