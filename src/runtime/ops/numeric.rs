//! Numeric operations
//!
//! Constants and integer arithmetic. Binary operations pop the right operand
//! first and the left operand second, so `a b isub` computes `a - b`.

use super::{FaultKind, Stack, Value};

// ============================================================================
// Constants
// ============================================================================

/// iconst_<n>, bipush, sipush
/// Push the (sign-extended) literal to the stack.
pub fn push_const(stack: &mut Stack, value: i32) -> Result<(), FaultKind> {
    stack.push(Value::new(value))
}

// ============================================================================
// Binary Operations
// ============================================================================

/// iadd
/// 1. Pop value c2 from stack
/// 2. Pop value c1 from stack
/// 3. Push c1 + c2 modulo 2^32
pub fn iadd(stack: &mut Stack) -> Result<(), FaultKind> {
    let (c1, c2) = stack.pop_pair()?;
    stack.push(c1.wrapping_add(c2))
}

/// isub
/// 1. Pop value c2 from stack
/// 2. Pop value c1 from stack
/// 3. Push c1 - c2 modulo 2^32
pub fn isub(stack: &mut Stack) -> Result<(), FaultKind> {
    let (c1, c2) = stack.pop_pair()?;
    stack.push(c1.wrapping_sub(c2))
}

/// imul
/// 1. Pop value c2 from stack
/// 2. Pop value c1 from stack
/// 3. Push c1 * c2 modulo 2^32
pub fn imul(stack: &mut Stack) -> Result<(), FaultKind> {
    let (c1, c2) = stack.pop_pair()?;
    stack.push(c1.wrapping_mul(c2))
}

/// idiv
/// 1. Pop value c2 from stack
/// 2. Pop value c1 from stack
/// 3. If c2 is 0, fault
/// 4. Push c1 / c2, truncated toward zero
///
/// Both operands are consumed even when the division faults.
pub fn idiv(stack: &mut Stack) -> Result<(), FaultKind> {
    let (c1, c2) = stack.pop_pair()?;
    stack.push(c1.try_div(c2)?)
}

/// irem
/// 1. Pop value c2 from stack
/// 2. Pop value c1 from stack
/// 3. If c2 is 0, fault
/// 4. Push c1 - (c1 / c2) * c2
pub fn irem(stack: &mut Stack) -> Result<(), FaultKind> {
    let (c1, c2) = stack.pop_pair()?;
    stack.push(c1.try_rem(c2)?)
}

// ============================================================================
// Unary Operations
// ============================================================================

/// ineg
pub fn ineg(stack: &mut Stack) -> Result<(), FaultKind> {
    let c1 = stack.pop()?;
    stack.push(c1.wrapping_neg())
}

#[cfg(test)]
mod tests {
    use crate::bytecode::InstructionKind;
    use crate::runtime::test_utils::test::ProgramTest;
    use crate::runtime::FaultKind;

    #[test]
    fn constants() {
        ProgramTest::new()
            .inst(InstructionKind::Iconst(-1))
            .inst(InstructionKind::Bipush(-128))
            .inst(InstructionKind::Sipush(32767))
            .expect_stack(vec![-1, -128, 32767]);
    }

    #[test]
    fn add_sub_mul() {
        ProgramTest::new()
            .inst(InstructionKind::Bipush(20))
            .inst(InstructionKind::Bipush(7))
            .inst(InstructionKind::Isub)
            .inst(InstructionKind::Iconst(3))
            .inst(InstructionKind::Imul)
            .inst(InstructionKind::Iconst(2))
            .inst(InstructionKind::Iadd)
            .expect_stack(vec![41]);
    }

    #[test]
    fn subtraction_operand_order() {
        ProgramTest::new()
            .inst(InstructionKind::Iconst(2))
            .inst(InstructionKind::Iconst(5))
            .inst(InstructionKind::Isub)
            .expect_stack(vec![-3]);
    }

    #[test]
    fn add_wraps() {
        ProgramTest::new()
            .push(i32::MAX)
            .inst(InstructionKind::Iconst(1))
            .inst(InstructionKind::Iadd)
            .expect_stack(vec![i32::MIN]);
    }

    #[test]
    fn mul_wraps() {
        ProgramTest::new()
            .push(i32::MIN)
            .inst(InstructionKind::Iconst(-1))
            .inst(InstructionKind::Imul)
            .expect_stack(vec![i32::MIN]);
    }

    #[test]
    fn div_and_rem() {
        ProgramTest::new()
            .inst(InstructionKind::Bipush(-7))
            .inst(InstructionKind::Iconst(2))
            .inst(InstructionKind::Idiv)
            .inst(InstructionKind::Bipush(-7))
            .inst(InstructionKind::Iconst(2))
            .inst(InstructionKind::Irem)
            .expect_stack(vec![-3, -1]);
    }

    #[test]
    fn div_min_by_minus_one_wraps() {
        ProgramTest::new()
            .push(i32::MIN)
            .inst(InstructionKind::Iconst(-1))
            .inst(InstructionKind::Idiv)
            .expect_stack(vec![i32::MIN]);
    }

    #[test]
    fn div_by_zero() {
        ProgramTest::new()
            .inst(InstructionKind::Iconst(1))
            .inst(InstructionKind::Iconst(0))
            .inst(InstructionKind::Idiv)
            .expect_fault(FaultKind::DivisionByZero, 2);
    }

    #[test]
    fn rem_by_zero() {
        ProgramTest::new()
            .inst(InstructionKind::Iconst(1))
            .inst(InstructionKind::Iconst(0))
            .inst(InstructionKind::Irem)
            .expect_fault(FaultKind::DivisionByZero, 2);
    }

    #[test]
    fn neg() {
        ProgramTest::new()
            .inst(InstructionKind::Iconst(4))
            .inst(InstructionKind::Ineg)
            .expect_stack(vec![-4]);
    }

    #[test]
    fn binary_underflow() {
        ProgramTest::new()
            .inst(InstructionKind::Iconst(4))
            .inst(InstructionKind::Iadd)
            .expect_fault(FaultKind::StackUnderflow, 1);
    }

    #[test]
    fn neg_underflow() {
        ProgramTest::new()
            .inst(InstructionKind::Ineg)
            .expect_fault(FaultKind::StackUnderflow, 0);
    }
}
