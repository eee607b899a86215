//! Script disassembly.
//!
//! Turns raw script bytes into an ordered sequence of [`Operation`]s,
//! resolving PUSHDATA length prefixes and pairing IF/NOTIF, ELSE, and
//! ENDIF so the runner can jump without scanning. Positions throughout
//! are operation indices, not byte offsets.

use crate::error::ScriptError;
use crate::opcodes::{self, Opcode};

/// A single disassembled operation.
///
/// `raw` holds the exact bytes the operation occupied in the script, so
/// concatenating `raw` over a disassembly reproduces the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Table entry for this operation's opcode.
    pub opcode: &'static Opcode,
    /// The serialized form, length prefixes included.
    pub raw: Vec<u8>,
    /// Push payload, for data-carrying operations.
    pub data: Option<Vec<u8>>,
    /// Operation index of the paired OP_ELSE, set on IF/NOTIF.
    pub else_pos: Option<usize>,
    /// Operation index of the paired OP_ENDIF, set on IF/NOTIF/ELSE.
    pub endif_pos: Option<usize>,
}

impl Operation {
    fn plain(opcode: &'static Opcode, raw: Vec<u8>) -> Self {
        Operation {
            opcode,
            raw,
            data: None,
            else_pos: None,
            endif_pos: None,
        }
    }

    fn push(opcode: &'static Opcode, raw: Vec<u8>, data: Vec<u8>) -> Self {
        Operation {
            opcode,
            raw,
            data: Some(data),
            else_pos: None,
            endif_pos: None,
        }
    }

    /// Render this operation as assembly text: hex for data pushes, the
    /// mnemonic otherwise.
    pub fn to_asm_string(&self) -> String {
        match &self.data {
            Some(data) if !data.is_empty() => hex::encode(data),
            _ => self.opcode.name.to_string(),
        }
    }
}

/// One open IF/NOTIF block during disassembly. Frames form an arena
/// linked through `parent` so nesting unwinds without a second pass.
struct Frame {
    opener: usize,
    else_idx: Option<usize>,
    parent: Option<usize>,
}

/// Render a slice of operations as space-separated assembly.
pub fn render_asm(ops: &[Operation]) -> String {
    ops.iter()
        .map(|op| op.to_asm_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reserialize operations back to script bytes.
pub fn serialize(ops: &[Operation]) -> Vec<u8> {
    let mut out = Vec::new();
    for op in ops {
        out.extend_from_slice(&op.raw);
    }
    out
}

fn unknown_opcode_error(code: u8, position: usize, ops: &[Operation]) -> ScriptError {
    let seen = if ops.is_empty() {
        "nothing decoded".to_string()
    } else {
        render_asm(ops)
    };
    ScriptError::UnknownOpcode(format!(
        "0x{:02x} at operation {} ({})",
        code, position, seen
    ))
}

fn read_push(
    bytes: &[u8],
    pos: usize,
    prefix_len: usize,
    opcode: &'static Opcode,
) -> Result<Operation, ScriptError> {
    let body = pos + 1;
    if body + prefix_len > bytes.len() {
        return Err(ScriptError::NotEnoughData(format!(
            "{} length prefix truncated at byte {}",
            opcode.name, pos
        )));
    }
    let mut len = 0usize;
    for (i, &b) in bytes[body..body + prefix_len].iter().enumerate() {
        len |= (b as usize) << (8 * i);
    }
    let start = body + prefix_len;
    if start + len > bytes.len() {
        return Err(ScriptError::NotEnoughData(format!(
            "{} payload of {} bytes truncated at byte {}",
            opcode.name, len, start
        )));
    }
    Ok(Operation::push(
        opcode,
        bytes[pos..start + len].to_vec(),
        bytes[start..start + len].to_vec(),
    ))
}

/// Disassemble raw script bytes into operations with resolved branch
/// targets.
///
/// Byte codes 1..=75 are implicit pushes of that many bytes; they decode
/// against the OP_PUSHDATA1 table entry. Structural problems surface as
/// `SyntaxError` with the offending operation index; truncation surfaces
/// as `NotEnoughData`; bytes outside the table as `UnknownOpcode` with
/// the partial disassembly for diagnostics.
pub fn disassemble(bytes: &[u8]) -> Result<Vec<Operation>, ScriptError> {
    let mut ops: Vec<Operation> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    let mut current: Option<usize> = None;
    let mut pos = 0usize;

    while pos < bytes.len() {
        let idx = ops.len();
        let b = bytes[pos];

        let op = if (1..=opcodes::MAX_DIRECT_PUSH as u8).contains(&b) {
            let len = b as usize;
            let end = pos + 1 + len;
            if end > bytes.len() {
                return Err(ScriptError::NotEnoughData(format!(
                    "push of {} bytes truncated at byte {}",
                    len,
                    pos + 1
                )));
            }
            Operation::push(
                opcodes::opcode_by_code(opcodes::OP_PUSHDATA1)?,
                bytes[pos..end].to_vec(),
                bytes[pos + 1..end].to_vec(),
            )
        } else {
            let opcode =
                opcodes::opcode_by_code(b).map_err(|_| unknown_opcode_error(b, idx, &ops))?;
            match b {
                opcodes::OP_PUSHDATA1 => read_push(bytes, pos, 1, opcode)?,
                opcodes::OP_PUSHDATA2 => read_push(bytes, pos, 2, opcode)?,
                opcodes::OP_PUSHDATA4 => read_push(bytes, pos, 4, opcode)?,
                _ => Operation::plain(opcode, vec![b]),
            }
        };
        pos += op.raw.len();

        match op.opcode.code {
            opcodes::OP_IF | opcodes::OP_NOTIF => {
                ops.push(op);
                frames.push(Frame {
                    opener: idx,
                    else_idx: None,
                    parent: current,
                });
                current = Some(frames.len() - 1);
            }
            opcodes::OP_ELSE => {
                ops.push(op);
                let fi = current.ok_or_else(|| ScriptError::SyntaxError {
                    message: "OP_ELSE without a matching OP_IF".to_string(),
                    position: idx,
                })?;
                if frames[fi].else_idx.is_some() {
                    return Err(ScriptError::SyntaxError {
                        message: "second OP_ELSE in the same branch".to_string(),
                        position: idx,
                    });
                }
                frames[fi].else_idx = Some(idx);
                let opener = frames[fi].opener;
                ops[opener].else_pos = Some(idx);
            }
            opcodes::OP_ENDIF => {
                ops.push(op);
                let fi = current.ok_or_else(|| ScriptError::SyntaxError {
                    message: "OP_ENDIF without a matching OP_IF".to_string(),
                    position: idx,
                })?;
                ops[frames[fi].opener].endif_pos = Some(idx);
                if let Some(e) = frames[fi].else_idx {
                    ops[e].endif_pos = Some(idx);
                }
                current = frames[fi].parent;
            }
            _ => ops.push(op),
        }
    }

    if let Some(fi) = current {
        return Err(ScriptError::SyntaxError {
            message: "OP_IF without a matching OP_ENDIF".to_string(),
            position: frames[fi].opener,
        });
    }

    Ok(ops)
}

#[cfg(test)]
mod tests {
    //! Disassembly coverage: push decoding, branch pairing, truncation,
    //! unknown bytes, and reserialization.

    use super::*;
    use crate::opcodes::*;

    // -----------------------------------------------------------------------
    // Push decoding
    // -----------------------------------------------------------------------

    /// Implicit pushes decode against the OP_PUSHDATA1 entry and keep
    /// their raw encoding.
    #[test]
    fn test_implicit_push() {
        let ops = disassemble(&[0x02, 0xde, 0xad]).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].opcode.name, "OP_PUSHDATA1");
        assert_eq!(ops[0].data.as_deref(), Some(&[0xde, 0xad][..]));
        assert_eq!(ops[0].raw, vec![0x02, 0xde, 0xad]);
    }

    /// PUSHDATA1/2/4 read little-endian length prefixes.
    #[test]
    fn test_pushdata_prefixes() {
        let ops = disassemble(&[OP_PUSHDATA1, 0x01, 0xaa]).unwrap();
        assert_eq!(ops[0].data.as_deref(), Some(&[0xaa][..]));

        let ops = disassemble(&[OP_PUSHDATA2, 0x02, 0x00, 0xbb, 0xcc]).unwrap();
        assert_eq!(ops[0].data.as_deref(), Some(&[0xbb, 0xcc][..]));

        let ops = disassemble(&[OP_PUSHDATA4, 0x01, 0x00, 0x00, 0x00, 0xdd]).unwrap();
        assert_eq!(ops[0].data.as_deref(), Some(&[0xdd][..]));
    }

    /// Truncated payloads and truncated length prefixes are NotEnoughData.
    #[test]
    fn test_truncation() {
        assert!(matches!(
            disassemble(&[0x05, 0x01, 0x02]),
            Err(ScriptError::NotEnoughData(_))
        ));
        assert!(matches!(
            disassemble(&[OP_PUSHDATA2, 0x02]),
            Err(ScriptError::NotEnoughData(_))
        ));
        assert!(matches!(
            disassemble(&[OP_PUSHDATA1, 0x10, 0xaa]),
            Err(ScriptError::NotEnoughData(_))
        ));
    }

    /// Unknown bytes report the opcode position and the partial
    /// disassembly.
    #[test]
    fn test_unknown_opcode_diagnostics() {
        let err = disassemble(&[OP_DUP, OP_HASH160, 0xba]).unwrap_err();
        match err {
            ScriptError::UnknownOpcode(msg) => {
                assert!(msg.contains("0xba"), "{}", msg);
                assert!(msg.contains("operation 2"), "{}", msg);
                assert!(msg.contains("OP_DUP OP_HASH160"), "{}", msg);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    // -----------------------------------------------------------------------
    // Branch pairing
    // -----------------------------------------------------------------------

    /// IF/ELSE/ENDIF link up by operation index.
    #[test]
    fn test_branch_pairing() {
        // OP_1 OP_IF <dead> OP_ELSE <beef> OP_ENDIF
        let script = [
            OP_1, OP_IF, 0x02, 0xde, 0xad, OP_ELSE, 0x02, 0xbe, 0xef, OP_ENDIF,
        ];
        let ops = disassemble(&script).unwrap();
        assert_eq!(ops.len(), 6);
        assert_eq!(ops[1].else_pos, Some(3));
        assert_eq!(ops[1].endif_pos, Some(5));
        assert_eq!(ops[3].endif_pos, Some(5));
        assert_eq!(ops[5].else_pos, None);
        assert_eq!(ops[5].endif_pos, None);
    }

    /// Nested branches pair with their own openers.
    #[test]
    fn test_nested_branch_pairing() {
        // IF IF ENDIF ELSE ENDIF
        let script = [OP_IF, OP_IF, OP_ENDIF, OP_ELSE, OP_ENDIF];
        let ops = disassemble(&script).unwrap();
        assert_eq!(ops[0].else_pos, Some(3));
        assert_eq!(ops[0].endif_pos, Some(4));
        assert_eq!(ops[1].else_pos, None);
        assert_eq!(ops[1].endif_pos, Some(2));
        assert_eq!(ops[3].endif_pos, Some(4));
    }

    /// Branchless IF has only an endif target.
    #[test]
    fn test_if_without_else() {
        let ops = disassemble(&[OP_IF, OP_DUP, OP_ENDIF]).unwrap();
        assert_eq!(ops[0].else_pos, None);
        assert_eq!(ops[0].endif_pos, Some(2));
    }

    /// Structural violations are syntax errors carrying the operation
    /// index.
    #[test]
    fn test_branch_syntax_errors() {
        assert!(matches!(
            disassemble(&[OP_ELSE]),
            Err(ScriptError::SyntaxError { position: 0, .. })
        ));
        assert!(matches!(
            disassemble(&[OP_ENDIF]),
            Err(ScriptError::SyntaxError { position: 0, .. })
        ));
        assert!(matches!(
            disassemble(&[OP_IF, OP_ELSE, OP_ELSE, OP_ENDIF]),
            Err(ScriptError::SyntaxError { position: 2, .. })
        ));
        assert!(matches!(
            disassemble(&[OP_1, OP_IF]),
            Err(ScriptError::SyntaxError { position: 1, .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Reserialization and rendering
    // -----------------------------------------------------------------------

    /// Concatenated raw bytes reproduce the input exactly.
    #[test]
    fn test_reserialize_roundtrip() {
        let script = vec![
            OP_DUP, OP_HASH160, 0x03, 0x01, 0x02, 0x03, OP_EQUALVERIFY, OP_CHECKSIG,
        ];
        let ops = disassemble(&script).unwrap();
        assert_eq!(serialize(&ops), script);
    }

    /// Assembly rendering uses mnemonics for ops and hex for pushes.
    #[test]
    fn test_render_asm() {
        let ops = disassemble(&[OP_DUP, 0x02, 0xbe, 0xef, OP_CHECKSIG]).unwrap();
        assert_eq!(render_asm(&ops), "OP_DUP beef OP_CHECKSIG");
    }

    /// The position counter counts operations, not bytes.
    #[test]
    fn test_positions_are_operation_indices() {
        // A 3-byte push is one operation; the bad byte after it is at
        // operation index 1.
        let err = disassemble(&[0x03, 0x01, 0x02, 0x03, 0xfe]).unwrap_err();
        match err {
            ScriptError::UnknownOpcode(msg) => assert!(msg.contains("operation 1"), "{}", msg),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
