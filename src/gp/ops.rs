//! Standard integer operation set.
//!
//! Every function here is total: evolved programs feed arbitrary operand
//! pairs into them, so undefined results map to a conventional value
//! instead of panicking.
//!
//! | Operation | Result |
//! |-----------|--------|
//! | [`add`], [`sub`], [`mul`] | wrapping two's complement arithmetic |
//! | [`div`], [`rem`] | truncating; `0` on division by zero or `MIN / -1` |
//! | [`pow`] | computed in `f64`, truncated toward zero, saturating |
//! | [`and`], [`or`], [`xor`] | bitwise |

use super::types::Value;

/// Wrapping addition.
pub fn add(lhs: Value, rhs: Value) -> Value {
    lhs.wrapping_add(rhs)
}

/// Wrapping subtraction.
pub fn sub(lhs: Value, rhs: Value) -> Value {
    lhs.wrapping_sub(rhs)
}

/// Wrapping multiplication.
pub fn mul(lhs: Value, rhs: Value) -> Value {
    lhs.wrapping_mul(rhs)
}

/// Truncating division; `0` when the quotient is undefined.
pub fn div(lhs: Value, rhs: Value) -> Value {
    lhs.checked_div(rhs).unwrap_or(0)
}

/// Truncating remainder; `0` when the quotient is undefined.
pub fn rem(lhs: Value, rhs: Value) -> Value {
    lhs.checked_rem(rhs).unwrap_or(0)
}

/// Integer power.
///
/// Negative exponents yield the truncated fraction (`2 ** -1 == 0`,
/// `1 ** -5 == 1`). Results beyond the value range saturate.
pub fn pow(lhs: Value, rhs: Value) -> Value {
    // `as` saturates on overflow and maps NaN to 0
    f64::from(lhs).powi(rhs) as Value
}

/// Bitwise and.
pub fn and(lhs: Value, rhs: Value) -> Value {
    lhs & rhs
}

/// Bitwise or.
pub fn or(lhs: Value, rhs: Value) -> Value {
    lhs | rhs
}

/// Bitwise exclusive or.
pub fn xor(lhs: Value, rhs: Value) -> Value {
    lhs ^ rhs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(add(Value::MAX, 1), Value::MIN);
        assert_eq!(sub(Value::MIN, 1), Value::MAX);
        assert_eq!(mul(Value::MAX, 2), -2);
        assert_eq!(add(2, 3), 5);
        assert_eq!(sub(2, 3), -1);
        assert_eq!(mul(-4, 3), -12);
    }

    #[test]
    fn test_division_fallbacks() {
        assert_eq!(div(7, 2), 3);
        assert_eq!(div(-7, 2), -3);
        assert_eq!(div(7, 0), 0);
        assert_eq!(div(Value::MIN, -1), 0);
        assert_eq!(div(Value::MIN, 1), Value::MIN);
    }

    #[test]
    fn test_remainder_fallbacks() {
        assert_eq!(rem(7, 3), 1);
        assert_eq!(rem(-7, 3), -1);
        assert_eq!(rem(7, 0), 0);
        assert_eq!(rem(Value::MIN, -1), 0);
    }

    #[test]
    fn test_pow_truncates() {
        assert_eq!(pow(2, 10), 1024);
        assert_eq!(pow(2, 17), 131_072);
        assert_eq!(pow(-3, 3), -27);
        assert_eq!(pow(2, -1), 0);
        assert_eq!(pow(1, -5), 1);
        assert_eq!(pow(0, 0), 1);
    }

    #[test]
    fn test_pow_saturates() {
        assert_eq!(pow(10, 100), Value::MAX);
        assert_eq!(pow(-10, 101), Value::MIN);
        // 0 ** -1 is infinity
        assert_eq!(pow(0, -1), Value::MAX);
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(and(0b1100, 0b1010), 0b1000);
        assert_eq!(or(0b1100, 0b1010), 0b1110);
        assert_eq!(xor(0b1100, 0b1010), 0b0110);
    }
}
