// RSA Number Theory Primitives
// Primality, modular exponentiation and modular inverse on machine integers

use num_integer::{Integer, Roots};
use num_traits::ToPrimitive;

use crate::error::{Error, Result};

/// Convert a caller-supplied number into a non-negative whole `u64`.
/// Returns None for NaN, infinities, fractions and negative values.
pub(crate) fn to_whole<N: ToPrimitive>(n: &N) -> Option<u64> {
    let as_float = n.to_f64()?;
    if !as_float.is_finite() || as_float.fract() != 0.0 {
        return None;
    }
    n.to_u64()
}

/// Trial-division primality test using the 6k ± 1 wheel
pub fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let limit = n.sqrt();
    let mut i = 5u64;
    while i <= limit {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }

    true
}

/// Modular exponentiation: base^exponent mod modulus
/// Uses square-and-multiply algorithm
///
/// # Panics
/// Panics if `modulus` is zero. Use [`modular_exponentiation`] for a checked call.
pub fn mod_pow(base: u64, exponent: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }

    let modulus = u128::from(modulus);
    let mut result: u128 = 1;
    let mut base = u128::from(base) % modulus;
    let mut exponent = exponent;

    while exponent > 0 {
        if exponent.is_odd() {
            result = (result * base) % modulus;
        }
        exponent /= 2;
        base = (base * base) % modulus;
    }

    result as u64
}

/// Checked modular exponentiation for loosely typed inputs.
///
/// Fails with [`Error::InvalidArgument`] when `base` or `exponent` is not a
/// finite non-negative whole number, or when `modulus` is zero.
pub fn modular_exponentiation<B, E>(base: B, exponent: E, modulus: u64) -> Result<u64>
where
    B: ToPrimitive,
    E: ToPrimitive,
{
    let base = to_whole(&base)
        .ok_or_else(|| Error::InvalidArgument("base must be a finite whole number".to_string()))?;
    let exponent = to_whole(&exponent).ok_or_else(|| {
        Error::InvalidArgument("exponent must be a finite whole number".to_string())
    })?;
    if modulus == 0 {
        return Err(Error::InvalidArgument("modulus must be non-zero".to_string()));
    }

    Ok(mod_pow(base, exponent, modulus))
}

/// Euclid's remainder loop; true when gcd(a, b) == 1
pub fn are_relatively_prime(a: u64, b: u64) -> bool {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a == 1
}

/// Compute modular inverse: value^(-1) mod modulus
/// Extended Euclidean algorithm, tracking only the Bézout coefficient of `value`
pub fn mod_inverse(value: u64, modulus: u64) -> Result<u64> {
    if modulus == 0 {
        return Err(Error::InvalidArgument("modulus must be non-zero".to_string()));
    }

    let (mut t1, mut t2): (i128, i128) = (0, 1);
    let (mut r1, mut r2): (i128, i128) = (i128::from(modulus), i128::from(value));

    while r2 != 0 {
        let quotient = Integer::div_floor(&r1, &r2);
        (t1, t2) = (t2, t1 - quotient * t2);
        (r1, r2) = (r2, r1 - quotient * r2);
    }

    if r1 > 1 {
        return Err(Error::NoInverseExists { value, modulus });
    }

    if t1 < 0 {
        t1 += i128::from(modulus);
    }

    Ok(t1 as u64)
}
