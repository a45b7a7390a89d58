//! Text assembler for writing programs by hand.
//!
//! One instruction per line, written with its mnemonic and at most one
//! operand. Everything after `//`, `;` or `#` is a comment. Lines may carry a
//! `javap -c` style `N:` offset prefix, so disassembler output from `javap`
//! can be pasted in directly.
//!
//! Branch operands are either a number or the name of a label. On a plain
//! line the number is a raw signed offset, relative to the branch's own
//! opcode byte, exactly as encoded. On a line with an `N:` prefix it is an
//! absolute target in the listing, the way `javap` prints it, and is encoded
//! as the distance from `N`. A label is an identifier followed by `:`, either
//! alone on its line or in front of an instruction.
//!
//! ```
//! let code = stackvm::bytecode::asm::assemble(
//!     "
//!         bipush 10
//!         bipush 5
//!         if_icmpgt bigger
//!         iconst_0
//!         ireturn
//!     bigger:
//!         iconst_1
//!         ireturn
//!     ",
//! )
//! .unwrap();
//! assert_eq!(code, vec![0x10, 10, 0x10, 5, 0xa3, 0x00, 0x05, 0x03, 0xac, 0x04, 0xac]);
//! ```

use super::opcode::{Immediate, Opcode};
use byteorder::{BigEndian, ByteOrder};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

static LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?P<listed_at>\d+)\s*:)?\s*(?:(?P<label>[A-Za-z_][A-Za-z0-9_]*)\s*:)?\s*(?:(?P<mnemonic>[a-z][a-z0-9_]*)(?:\s+(?P<operand>\S+))?)?\s*$",
    )
    .expect("assembler line pattern is valid")
});

/// An error in assembler source, with the 1-based line it occurred on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct AsmError {
    pub line: usize,
    pub kind: AsmErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmErrorKind {
    #[error("cannot parse `{0}`")]
    Syntax(String),
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),
    #[error("{0} needs an operand")]
    MissingOperand(Opcode),
    #[error("{0} takes no operand")]
    UnexpectedOperand(Opcode),
    #[error("invalid operand `{operand}` for {opcode}")]
    InvalidOperand { opcode: Opcode, operand: String },
    #[error("operand {value} out of range for {opcode}")]
    OperandOutOfRange { opcode: Opcode, value: i64 },
    #[error("label `{0}` defined twice")]
    DuplicateLabel(String),
    #[error("undefined label `{0}`")]
    UndefinedLabel(String),
    #[error("label `{label}` is {offset} bytes away, beyond a 16-bit offset")]
    BranchOutOfRange { label: String, offset: i64 },
}

struct Line<'s> {
    number: usize,
    offset: usize,
    opcode: Opcode,
    operand: Option<&'s str>,
    /// Offset from a `javap` style `N:` prefix
    listed_at: Option<i64>,
}

/// Assemble source text into a raw code buffer (no file header)
pub fn assemble(source: &str) -> Result<Vec<u8>, AsmError> {
    let mut labels: HashMap<&str, usize> = HashMap::new();
    let mut lines = Vec::new();
    let mut offset = 0usize;

    // First pass: lay out instructions and record label positions
    for (idx, raw) in source.lines().enumerate() {
        let number = idx + 1;
        let err = |kind| AsmError { line: number, kind };
        let text = strip_comment(raw);
        let caps = LINE
            .captures(text)
            .ok_or_else(|| err(AsmErrorKind::Syntax(text.trim().to_string())))?;

        if let Some(label) = caps.name("label") {
            if labels.insert(label.as_str(), offset).is_some() {
                return Err(err(AsmErrorKind::DuplicateLabel(label.as_str().to_string())));
            }
        }

        let Some(mnemonic) = caps.name("mnemonic") else {
            continue;
        };
        let opcode = Opcode::from_mnemonic(mnemonic.as_str())
            .ok_or_else(|| err(AsmErrorKind::UnknownMnemonic(mnemonic.as_str().to_string())))?;
        let listed_at = match caps.name("listed_at") {
            Some(m) => Some(
                m.as_str()
                    .parse::<i64>()
                    .map_err(|_| err(AsmErrorKind::Syntax(text.trim().to_string())))?,
            ),
            None => None,
        };
        lines.push(Line {
            number,
            offset,
            opcode,
            operand: caps.name("operand").map(|m| m.as_str()),
            listed_at,
        });
        offset += opcode.encoded_len();
    }

    // Second pass: emit bytes
    let mut out = Vec::with_capacity(offset);
    for line in &lines {
        emit(line, &labels, &mut out).map_err(|kind| AsmError {
            line: line.number,
            kind,
        })?;
    }
    Ok(out)
}

fn emit(line: &Line<'_>, labels: &HashMap<&str, usize>, out: &mut Vec<u8>) -> Result<(), AsmErrorKind> {
    let opcode = line.opcode;
    let immediate = opcode.immediate();

    let operand = match (immediate, line.operand) {
        (Immediate::None, None) => {
            out.push(opcode.byte());
            return Ok(());
        }
        (Immediate::None, Some(_)) => return Err(AsmErrorKind::UnexpectedOperand(opcode)),
        (_, None) => return Err(AsmErrorKind::MissingOperand(opcode)),
        (_, Some(operand)) => operand,
    };

    out.push(opcode.byte());
    match immediate {
        Immediate::I8 => {
            let value = parse_int(opcode, operand)?;
            let value = i8::try_from(value).map_err(|_| AsmErrorKind::OperandOutOfRange { opcode, value })?;
            out.push(value as u8);
        }
        Immediate::LocalIndex => {
            let value = parse_int(opcode, operand)?;
            let value = u8::try_from(value).map_err(|_| AsmErrorKind::OperandOutOfRange { opcode, value })?;
            out.push(value);
        }
        Immediate::I16 => {
            let value = parse_int(opcode, operand)?;
            push_i16(out, opcode, value)?;
        }
        Immediate::BranchOffset => {
            if operand.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
                let target = *labels
                    .get(operand)
                    .ok_or_else(|| AsmErrorKind::UndefinedLabel(operand.to_string()))?;
                let offset = target as i64 - line.offset as i64;
                push_i16(out, opcode, offset).map_err(|_| AsmErrorKind::BranchOutOfRange {
                    label: operand.to_string(),
                    offset,
                })?;
            } else {
                let value = parse_int(opcode, operand)?;
                let offset = match line.listed_at {
                    Some(at) => value - at,
                    None => value,
                };
                push_i16(out, opcode, offset)?;
            }
        }
        Immediate::None => unreachable!("handled above"),
    }
    Ok(())
}

fn push_i16(out: &mut Vec<u8>, opcode: Opcode, value: i64) -> Result<(), AsmErrorKind> {
    let value = i16::try_from(value).map_err(|_| AsmErrorKind::OperandOutOfRange { opcode, value })?;
    let mut buf = [0u8; 2];
    BigEndian::write_i16(&mut buf, value);
    out.extend_from_slice(&buf);
    Ok(())
}

fn parse_int(opcode: Opcode, operand: &str) -> Result<i64, AsmErrorKind> {
    let invalid = || AsmErrorKind::InvalidOperand {
        opcode,
        operand: operand.to_string(),
    };
    let (negative, digits) = match operand.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, operand.strip_prefix('+').unwrap_or(operand)),
    };
    // A second sign would otherwise be accepted by `from_str_radix` and `parse`
    if digits.starts_with(['+', '-']) {
        return Err(invalid());
    }
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|_| invalid())?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn strip_comment(line: &str) -> &str {
    let end = [line.find("//"), line.find(';'), line.find('#')]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn error_kind(source: &str) -> AsmErrorKind {
        assemble(source).unwrap_err().kind
    }

    #[test]
    fn assembles_locals_program() {
        let code = assemble(
            "bipush 42
             istore_0
             bipush 10
             istore_1
             iload_0
             iload_1
             iadd
             ireturn",
        )
        .unwrap();
        assert_eq!(code, vec![0x10, 42, 0x3b, 0x10, 10, 0x3c, 0x1a, 0x1b, 0x60, 0xac]);
    }

    #[test]
    fn accepts_javap_offsets_and_comments() {
        let code = assemble(
            "   0: bipush        100   // push
                2: sipush        -1000 ; push more
                5: iadd
                # nothing here
                6: ireturn",
        )
        .unwrap();
        assert_eq!(code, vec![0x10, 100, 0x11, 0xfc, 0x18, 0x60, 0xac]);
    }

    #[test]
    fn backward_label() {
        let code = assemble(
            "top:
                 nop
                 goto top",
        )
        .unwrap();
        assert_eq!(code, vec![0x00, 0xa7, 0xff, 0xff]);
    }

    #[test]
    fn raw_branch_offset() {
        assert_eq!(assemble("goto -3").unwrap(), vec![0xa7, 0xff, 0xfd]);
        assert_eq!(assemble("if_icmpeq 0x10").unwrap(), vec![0x9f, 0x00, 0x10]);
    }

    #[test]
    fn javap_branch_operands_are_absolute_targets() {
        let code = assemble(
            "   0: bipush        5
                2: bipush        10
                4: if_icmple     9
                7: iconst_1
                8: ireturn
                9: iconst_0
               10: ireturn",
        )
        .unwrap();
        assert_eq!(code, vec![0x10, 5, 0x10, 10, 0xa4, 0x00, 0x05, 0x04, 0xac, 0x03, 0xac]);

        // Backward target
        assert_eq!(assemble("0: nop\n1: goto 0").unwrap(), vec![0x00, 0xa7, 0xff, 0xff]);
    }

    #[test]
    fn javap_branch_target_out_of_range() {
        assert_eq!(
            error_kind("40000: goto 0"),
            AsmErrorKind::OperandOutOfRange {
                opcode: Opcode::Goto,
                value: -40000
            }
        );
    }

    #[rstest]
    #[case("bipush --5")]
    #[case("bipush -+5")]
    #[case("bipush +-5")]
    #[case("sipush ++5")]
    #[case("goto --3")]
    fn repeated_sign_is_rejected(#[case] source: &str) {
        let operand = source.split_whitespace().nth(1).unwrap();
        assert!(
            matches!(error_kind(source), AsmErrorKind::InvalidOperand { operand: o, .. } if o == operand),
            "{source}"
        );
    }

    #[test]
    fn single_sign_is_accepted() {
        assert_eq!(assemble("bipush -5").unwrap(), vec![0x10, 0xfb]);
        assert_eq!(assemble("bipush +5").unwrap(), vec![0x10, 5]);
    }

    #[test]
    fn operand_errors() {
        assert_eq!(error_kind("iadd 1"), AsmErrorKind::UnexpectedOperand(Opcode::Iadd));
        assert_eq!(error_kind("bipush"), AsmErrorKind::MissingOperand(Opcode::Bipush));
        assert_eq!(
            error_kind("bipush 128"),
            AsmErrorKind::OperandOutOfRange {
                opcode: Opcode::Bipush,
                value: 128
            }
        );
        assert_eq!(
            error_kind("iload -1"),
            AsmErrorKind::OperandOutOfRange {
                opcode: Opcode::Iload,
                value: -1
            }
        );
        assert_eq!(
            error_kind("sipush ten"),
            AsmErrorKind::InvalidOperand {
                opcode: Opcode::Sipush,
                operand: "ten".to_string()
            }
        );
    }

    #[test]
    fn label_errors() {
        assert_eq!(error_kind("goto nowhere"), AsmErrorKind::UndefinedLabel("nowhere".to_string()));
        assert_eq!(
            error_kind("a:\nnop\na:\nnop"),
            AsmErrorKind::DuplicateLabel("a".to_string())
        );
    }

    #[test]
    fn syntax_error() {
        assert_eq!(error_kind("bipush 1 2"), AsmErrorKind::Syntax("bipush 1 2".to_string()));
    }

    #[test]
    fn unknown_mnemonic_reports_line() {
        let err = assemble("nop\n\ninvokestatic 2").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, AsmErrorKind::UnknownMnemonic("invokestatic".to_string()));
        assert_eq!(err.to_string(), "line 3: unknown mnemonic `invokestatic`");
    }
}
