//! High-precision decimal numeric type backed by bigdecimal.
//!
//! Spot-price math raises reserve ratios to fractional powers; doing that in
//! binary floating point drifts across pools with extreme reserves. `Dec`
//! keeps every intermediate in a 100-significant-digit decimal context and
//! builds `pow` from `exp`/`ln` series so results stay accurate to well over
//! 50 significant digits.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Working precision, in significant decimal digits.
///
/// Twice the 50-digit accuracy target, so series truncation and repeated
/// squaring never eat into the guaranteed digits.
const PRECISION: u64 = 100;

/// Scale factor of on-chain fixed-point values (1e18).
const WEI_DECIMALS: i64 = 18;

/// Errors from decimal math.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
    #[error("invalid decimal literal: {0}")]
    Parse(String),
    #[error("logarithm of non-positive value")]
    NonPositiveLog,
}

/// High-precision decimal for pool rate calculations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dec(BigDecimal);

impl Dec {
    /// Create a Dec from a BigDecimal.
    pub fn new(value: BigDecimal) -> Self {
        Dec(value)
    }

    /// Parse from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, DecimalError> {
        BigDecimal::from_str(s)
            .map(Dec)
            .map_err(|e| DecimalError::Parse(format!("{}: {}", s, e)))
    }

    /// Convert a raw on-chain fixed-point integer into the real domain
    /// (divide by 1e18).
    pub fn from_wei(raw: &BigUint) -> Self {
        Dec(BigDecimal::new(BigInt::from(raw.clone()), WEI_DECIMALS))
    }

    /// Exact conversion from an unsigned big integer.
    pub fn from_biguint(v: &BigUint) -> Self {
        Dec(BigDecimal::from(BigInt::from(v.clone())))
    }

    /// Exact conversion from a signed big integer.
    pub fn from_bigint(v: &BigInt) -> Self {
        Dec(BigDecimal::from(v.clone()))
    }

    /// The additive identity (0).
    pub fn zero() -> Self {
        Dec(BigDecimal::from(0))
    }

    /// The multiplicative identity (1).
    pub fn one() -> Self {
        Dec(BigDecimal::from(1))
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0 == BigDecimal::from(0)
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        self.0 > BigDecimal::from(0)
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        self.0 < BigDecimal::from(0)
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Dec(self.0.abs())
    }

    /// Get the underlying BigDecimal.
    pub fn inner(&self) -> &BigDecimal {
        &self.0
    }

    /// Natural logarithm.
    ///
    /// Range-reduces with square roots until the argument is near 1, then
    /// sums the artanh series: ln(v) = 2 * (z + z^3/3 + z^5/5 + ...) with
    /// z = (v-1)/(v+1).
    ///
    /// # Errors
    /// Returns `NonPositiveLog` for arguments <= 0.
    pub fn ln(&self) -> Result<Self, DecimalError> {
        if !self.is_positive() {
            return Err(DecimalError::NonPositiveLog);
        }
        let one = BigDecimal::from(1);
        let mut v = self.0.clone().with_prec(PRECISION);
        let mut halvings: u32 = 0;
        let near = BigDecimal::new(BigInt::from(1), 1); // 0.1
        while (&v - &one).abs() > near {
            // sqrt of a positive value is always Some
            v = match v.sqrt() {
                Some(root) => root.with_prec(PRECISION),
                None => return Err(DecimalError::NonPositiveLog),
            };
            halvings += 1;
        }
        let z = ((&v - &one) / (&v + &one)).with_prec(PRECISION);
        let z2 = (&z * &z).with_prec(PRECISION);
        let mut term = z.clone();
        let mut sum = z;
        let mut n: u64 = 1;
        let eps = epsilon();
        loop {
            term = (&term * &z2).with_prec(PRECISION);
            n += 2;
            let contrib = (&term / BigDecimal::from(n)).with_prec(PRECISION);
            if contrib.abs() < eps {
                break;
            }
            sum = sum + contrib;
        }
        let doubled = sum * BigDecimal::from(2);
        let unscaled = doubled * BigDecimal::from(BigInt::from(1u8) << halvings);
        Ok(Dec(unscaled.with_prec(PRECISION)))
    }

    /// Exponential function.
    ///
    /// Halves the argument until it is small, sums the Taylor series, then
    /// squares back up.
    pub fn exp(&self) -> Self {
        let two = BigDecimal::from(2);
        let half = BigDecimal::new(BigInt::from(5), 1); // 0.5
        let mut v = self.0.clone().with_prec(PRECISION);
        let mut squarings: u32 = 0;
        while v.abs() > half {
            v = (&v / &two).with_prec(PRECISION);
            squarings += 1;
        }
        let mut term = BigDecimal::from(1);
        let mut sum = BigDecimal::from(1);
        let mut n: u64 = 0;
        let eps = epsilon();
        loop {
            n += 1;
            term = (&term * &v / BigDecimal::from(n)).with_prec(PRECISION);
            sum = sum + &term;
            if term.abs() < eps {
                break;
            }
        }
        for _ in 0..squarings {
            sum = (&sum * &sum).with_prec(PRECISION);
        }
        Dec(sum.with_prec(PRECISION))
    }

    /// Raise to an arbitrary (possibly fractional) power: b^e = exp(e*ln(b)).
    ///
    /// # Errors
    /// Returns `NonPositiveLog` when the base is <= 0 (zero base with a
    /// positive exponent is handled as 0).
    pub fn pow(&self, exponent: &Dec) -> Result<Self, DecimalError> {
        if exponent.is_zero() {
            return Ok(Dec::one());
        }
        if self.is_zero() && exponent.is_positive() {
            return Ok(Dec::zero());
        }
        let log = self.ln()?;
        let scaled = Dec((&exponent.0 * &log.0).with_prec(PRECISION));
        Ok(scaled.exp())
    }
}

/// Convergence cutoff: 1e-100.
fn epsilon() -> BigDecimal {
    BigDecimal::new(BigInt::from(1), PRECISION as i64)
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalized())
    }
}

impl FromStr for Dec {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<BigDecimal> for Dec {
    fn from(value: BigDecimal) -> Self {
        Dec(value)
    }
}

impl From<u64> for Dec {
    fn from(value: u64) -> Self {
        Dec(BigDecimal::from(value))
    }
}

// Arithmetic delegates to bigdecimal. Division uses bigdecimal's default
// 100-digit context, which matches PRECISION.
impl std::ops::Add for Dec {
    type Output = Dec;

    fn add(self, rhs: Dec) -> Dec {
        Dec(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Dec {
    type Output = Dec;

    fn sub(self, rhs: Dec) -> Dec {
        Dec(self.0 - rhs.0)
    }
}

impl std::ops::Mul for Dec {
    type Output = Dec;

    fn mul(self, rhs: Dec) -> Dec {
        Dec((self.0 * rhs.0).with_prec(PRECISION))
    }
}

impl std::ops::Div for Dec {
    type Output = Dec;

    fn div(self, rhs: Dec) -> Dec {
        Dec((self.0 / rhs.0).with_prec(PRECISION))
    }
}

impl std::ops::Neg for Dec {
    type Output = Dec;

    fn neg(self) -> Dec {
        Dec(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Dec {
        Dec::from_str_canonical(s).unwrap()
    }

    /// |a - b| < 10^-digits
    fn assert_close(a: &Dec, b: &Dec, digits: i64) {
        let diff = (a.clone() - b.clone()).abs();
        let tolerance = Dec(BigDecimal::new(BigInt::from(1), digits));
        assert!(
            diff < tolerance,
            "expected {} ~ {} within 1e-{}, diff {}",
            a,
            b,
            digits,
            diff
        );
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(d("123.4500").to_string(), "123.45");
        assert_eq!(d("0").to_string(), "0");
        assert!(Dec::from_str_canonical("not-a-number").is_err());
    }

    #[test]
    fn test_from_wei() {
        let raw: BigUint = "1050000000000000000".parse().unwrap();
        assert_eq!(Dec::from_wei(&raw), d("1.05"));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(d("10.5") + d("2.5"), d("13"));
        assert_eq!(d("10.5") - d("2.5"), d("8"));
        assert_eq!(d("10.5") * d("2.5"), d("26.25"));
        assert_eq!(d("10") / d("4"), d("2.5"));
        assert_eq!(-d("3"), d("-3"));
    }

    #[test]
    fn test_exp_one_to_fifty_digits() {
        // e, first 60 digits
        let reference = d("2.718281828459045235360287471352662497757247093699959574966967");
        assert_close(&Dec::one().exp(), &reference, 55);
    }

    #[test]
    fn test_ln_two_to_fifty_digits() {
        let reference = d("0.693147180559945309417232121458176568075500134360255254120680");
        assert_close(&d("2").ln().unwrap(), &reference, 55);
    }

    #[test]
    fn test_ln_of_non_positive_fails() {
        assert_eq!(d("0").ln().unwrap_err(), DecimalError::NonPositiveLog);
        assert_eq!(d("-1").ln().unwrap_err(), DecimalError::NonPositiveLog);
    }

    #[test]
    fn test_ln_exp_inverse_on_extreme_magnitudes() {
        for s in ["1e18", "1e-18", "37.5", "0.0004"] {
            let x = d(s);
            let roundtrip = x.ln().unwrap().exp();
            assert_close(&(roundtrip / x), &Dec::one(), 60);
        }
    }

    #[test]
    fn test_pow_square_root() {
        let result = d("4").pow(&d("0.5")).unwrap();
        assert_close(&result, &d("2"), 60);
    }

    #[test]
    fn test_pow_identity_and_zero_exponent() {
        assert_eq!(d("7.25").pow(&Dec::zero()).unwrap(), Dec::one());
        let result = d("7.25").pow(&Dec::one()).unwrap();
        assert_close(&result, &d("7.25"), 60);
    }

    #[test]
    fn test_pow_zero_base() {
        assert_eq!(Dec::zero().pow(&d("0.5")).unwrap(), Dec::zero());
        assert!(d("-2").pow(&d("0.5")).is_err());
    }

    #[test]
    fn test_pow_fractional_reference() {
        // 1e18 ^ 0.05 = 10^0.9, reference from a 110-digit decimal context
        let result = d("1000000000000000000").pow(&d("0.05")).unwrap();
        let reference = d("7.943282347242815020659182828363879325889606317554843320923239");
        assert_close(&result, &reference, 55);
    }

    #[test]
    fn test_ordering() {
        assert!(d("1.5") < d("2"));
        assert!(d("-3") < d("0"));
    }
}
