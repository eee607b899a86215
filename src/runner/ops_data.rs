//! Data push, equality, size, and hashing handlers.

use crate::disasm::Operation;
use crate::error::ScriptError;
use crate::hash;
use crate::opcodes;

use super::ops_flow;
use super::scriptnum::ScriptNumber;
use super::Runner;

/// OP_0: push the empty byte array (numeric zero, boolean false).
pub fn op_push_empty(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.push_byte_array(Vec::new());
    Ok(())
}

/// Shared handler for implicit pushes and OP_PUSHDATA1/2/4: the payload
/// was already decoded by the disassembler.
pub fn op_push_data(r: &mut Runner<'_>, op: &Operation) -> Result<(), ScriptError> {
    r.dstack.push_byte_array(op.data.clone().unwrap_or_default());
    Ok(())
}

/// OP_1..OP_16: the value is derived from the byte code, so one handler
/// serves all sixteen entries.
pub fn op_push_small_int(r: &mut Runner<'_>, op: &Operation) -> Result<(), ScriptError> {
    let n = op.opcode.code - (opcodes::OP_1 - 1);
    r.dstack.push_byte_array(vec![n]);
    Ok(())
}

/// OP_1NEGATE: minimal encoding of -1.
pub fn op_push_1negate(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.push_byte_array(vec![0x81]);
    Ok(())
}

pub fn op_equal(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let a = r.dstack.pop_byte_array()?;
    let b = r.dstack.pop_byte_array()?;
    r.dstack.push_bool(a == b);
    Ok(())
}

pub fn op_equalverify(r: &mut Runner<'_>, op: &Operation) -> Result<(), ScriptError> {
    op_equal(r, op)?;
    ops_flow::op_verify(r, op)
}

pub fn op_size(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let so = r.dstack.peek_byte_array(0)?;
    r.dstack.push_int(&ScriptNumber::new(so.len() as i64));
    Ok(())
}

pub fn op_ripemd160(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let data = r.dstack.pop_byte_array()?;
    r.dstack.push_byte_array(hash::ripemd160(&data).to_vec());
    Ok(())
}

pub fn op_sha1(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let data = r.dstack.pop_byte_array()?;
    r.dstack.push_byte_array(hash::sha1(&data).to_vec());
    Ok(())
}

pub fn op_sha256(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let data = r.dstack.pop_byte_array()?;
    r.dstack.push_byte_array(hash::sha256(&data).to_vec());
    Ok(())
}

pub fn op_hash160(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let data = r.dstack.pop_byte_array()?;
    r.dstack.push_byte_array(hash::hash160(&data).to_vec());
    Ok(())
}

pub fn op_hash256(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let data = r.dstack.pop_byte_array()?;
    r.dstack.push_byte_array(hash::sha256d(&data).to_vec());
    Ok(())
}
