//! Runtime value representation
//!
//! Every value is a 32-bit signed integer. Arithmetic wraps on overflow with
//! two's-complement semantics; division and remainder by zero are the only
//! operations that fail.

use super::FaultKind;
use serde::Serialize;
use std::fmt;

/// A single 32-bit signed integer moved between the stack and locals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Value(i32);

impl Value {
    pub const ZERO: Value = Value(0);

    pub const fn new(v: i32) -> Self {
        Value(v)
    }

    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// c1 + c2 modulo 2^32
    pub fn wrapping_add(self, rhs: Value) -> Value {
        Value(self.0.wrapping_add(rhs.0))
    }

    /// c1 - c2 modulo 2^32
    pub fn wrapping_sub(self, rhs: Value) -> Value {
        Value(self.0.wrapping_sub(rhs.0))
    }

    /// c1 * c2 modulo 2^32
    pub fn wrapping_mul(self, rhs: Value) -> Value {
        Value(self.0.wrapping_mul(rhs.0))
    }

    /// Signed division truncating toward zero.
    ///
    /// `i32::MIN / -1` wraps to `i32::MIN` rather than trapping.
    pub fn try_div(self, rhs: Value) -> Result<Value, FaultKind> {
        if rhs.0 == 0 {
            return Err(FaultKind::DivisionByZero);
        }
        Ok(Value(self.0.wrapping_div(rhs.0)))
    }

    /// Signed remainder; the result takes the sign of the dividend.
    ///
    /// `i32::MIN % -1` is 0.
    pub fn try_rem(self, rhs: Value) -> Result<Value, FaultKind> {
        if rhs.0 == 0 {
            return Err(FaultKind::DivisionByZero);
        }
        Ok(Value(self.0.wrapping_rem(rhs.0)))
    }

    /// Two's-complement negation; `-i32::MIN` is `i32::MIN`
    pub fn wrapping_neg(self) -> Value {
        Value(self.0.wrapping_neg())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value(v)
    }
}

impl From<Value> for i32 {
    fn from(v: Value) -> Self {
        v.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: i32) -> Value {
        Value::new(n)
    }

    #[test]
    fn wrapping_arithmetic() {
        assert_eq!(v(i32::MAX).wrapping_add(v(1)), v(i32::MIN));
        assert_eq!(v(i32::MIN).wrapping_sub(v(1)), v(i32::MAX));
        assert_eq!(v(0x10000).wrapping_mul(v(0x10000)), v(0));
        assert_eq!(v(i32::MIN).wrapping_neg(), v(i32::MIN));
        assert_eq!(v(5).wrapping_neg(), v(-5));
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(v(7).try_div(v(2)), Ok(v(3)));
        assert_eq!(v(-7).try_div(v(2)), Ok(v(-3)));
        assert_eq!(v(-7).try_rem(v(2)), Ok(v(-1)));
        assert_eq!(v(7).try_rem(v(-2)), Ok(v(1)));
    }

    #[test]
    fn division_overflow_wraps() {
        assert_eq!(v(i32::MIN).try_div(v(-1)), Ok(v(i32::MIN)));
        assert_eq!(v(i32::MIN).try_rem(v(-1)), Ok(v(0)));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(v(1).try_div(v(0)), Err(FaultKind::DivisionByZero));
        assert_eq!(v(0).try_rem(v(0)), Err(FaultKind::DivisionByZero));
    }

    #[test]
    fn display() {
        assert_eq!(v(-42).to_string(), "-42");
        assert_eq!(i32::from(Value::from(9)), 9);
    }
}
