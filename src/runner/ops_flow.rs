//! Flow control handlers.
//!
//! Branch targets were resolved at disassembly time, so OP_IF and
//! OP_ELSE request jumps by operation index instead of tracking a
//! conditional stack at runtime.

use crate::disasm::Operation;
use crate::error::ScriptError;

use super::ops_arith;
use super::scriptnum::ScriptNumber;
use super::Runner;

/// Lock time threshold separating block heights from timestamps.
const LOCK_TIME_THRESHOLD: i64 = 500_000_000;

/// Max sequence number, marking an input as finalized.
const MAX_TX_IN_SEQUENCE_NUM: u32 = 0xffffffff;
/// Sequence lock time disabled bit.
const SEQUENCE_LOCK_TIME_DISABLED: i64 = 1 << 31;
/// Sequence lock time is-seconds flag.
const SEQUENCE_LOCK_TIME_IS_SECONDS: i64 = 1 << 22;
/// Sequence lock time value mask.
const SEQUENCE_LOCK_TIME_MASK: i64 = 0x0000ffff;

pub fn op_nop(_r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    Ok(())
}

pub fn op_reserved(_r: &mut Runner<'_>, op: &Operation) -> Result<(), ScriptError> {
    Err(ScriptError::InvalidScript(format!(
        "attempt to execute reserved opcode {}",
        op.opcode.name
    )))
}

fn branch_exit(op: &Operation) -> Result<usize, ScriptError> {
    op.endif_pos.ok_or_else(|| {
        ScriptError::InvalidScript(format!(
            "{} has no resolved OP_ENDIF target",
            op.opcode.name
        ))
    })
}

/// OP_IF: pop the condition; on false, jump past the OP_ELSE if one
/// exists, to the OP_ENDIF otherwise.
pub fn op_if(r: &mut Runner<'_>, op: &Operation) -> Result<(), ScriptError> {
    let cond = r.dstack.pop_bool()?;
    if !cond {
        r.jump = Some(match op.else_pos {
            Some(e) => e + 1,
            None => branch_exit(op)?,
        });
    }
    Ok(())
}

/// OP_NOTIF is OP_NOT followed by OP_IF.
pub fn op_notif(r: &mut Runner<'_>, op: &Operation) -> Result<(), ScriptError> {
    ops_arith::op_not(r, op)?;
    op_if(r, op)
}

/// OP_ELSE is only executed when the taken arm runs into it; it jumps
/// to its OP_ENDIF.
pub fn op_else(r: &mut Runner<'_>, op: &Operation) -> Result<(), ScriptError> {
    r.jump = Some(branch_exit(op)?);
    Ok(())
}

/// OP_ENDIF: branch bookkeeping happened at disassembly, nothing to do.
pub fn op_endif(_r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    Ok(())
}

pub fn op_verify(r: &mut Runner<'_>, op: &Operation) -> Result<(), ScriptError> {
    let verified = r.dstack.pop_bool()?;
    if !verified {
        return Err(ScriptError::InvalidScript(format!(
            "{} failed",
            op.opcode.name
        )));
    }
    Ok(())
}

pub fn op_return(_r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    Err(ScriptError::InvalidScript(
        "script returned early".to_string(),
    ))
}

pub fn op_check_lock_time_verify(
    r: &mut Runner<'_>,
    _op: &Operation,
) -> Result<(), ScriptError> {
    let ctx = r.ctx.ok_or_else(|| {
        ScriptError::InvalidScript("no tx context for CHECKLOCKTIMEVERIFY".to_string())
    })?;

    // Peek, not pop: the stack operand is conventionally dropped by a
    // following OP_DROP.
    let so = r.dstack.peek_byte_array(0)?;
    let lock_time = ScriptNumber::from_bytes(&so, 5, false)?;

    if lock_time.less_than_int(0) {
        return Err(ScriptError::InvalidScript(format!(
            "negative lock time: {}",
            lock_time.to_int()
        )));
    }

    verify_lock_time(
        ctx.lock_time() as i64,
        LOCK_TIME_THRESHOLD,
        lock_time.to_int(),
    )?;

    if ctx.input_sequence(ctx.input_index()) == MAX_TX_IN_SEQUENCE_NUM {
        return Err(ScriptError::InvalidScript(
            "transaction input is finalized".to_string(),
        ));
    }

    Ok(())
}

pub fn op_check_sequence_verify(
    r: &mut Runner<'_>,
    _op: &Operation,
) -> Result<(), ScriptError> {
    let ctx = r.ctx.ok_or_else(|| {
        ScriptError::InvalidScript("no tx context for CHECKSEQUENCEVERIFY".to_string())
    })?;

    let so = r.dstack.peek_byte_array(0)?;
    let stack_seq = ScriptNumber::from_bytes(&so, 5, false)?;

    if stack_seq.less_than_int(0) {
        return Err(ScriptError::InvalidScript(format!(
            "negative sequence: {}",
            stack_seq.to_int()
        )));
    }

    let sequence = stack_seq.to_int();

    // With the disabled bit set the operand imposes no constraint.
    if sequence & SEQUENCE_LOCK_TIME_DISABLED != 0 {
        return Ok(());
    }

    if ctx.version() < 2 {
        return Err(ScriptError::InvalidScript(format!(
            "invalid transaction version: {}",
            ctx.version()
        )));
    }

    let tx_sequence = ctx.input_sequence(ctx.input_index()) as i64;
    if tx_sequence & SEQUENCE_LOCK_TIME_DISABLED != 0 {
        return Err(ScriptError::InvalidScript(format!(
            "transaction sequence has the disable bit set: 0x{:x}",
            tx_sequence
        )));
    }

    let lock_time_mask = SEQUENCE_LOCK_TIME_IS_SECONDS | SEQUENCE_LOCK_TIME_MASK;
    verify_lock_time(
        tx_sequence & lock_time_mask,
        SEQUENCE_LOCK_TIME_IS_SECONDS,
        sequence & lock_time_mask,
    )
}

/// Shared comparison for CLTV/CSV: both values must be the same kind
/// (below or at-or-above `threshold`) and the stack value must not
/// exceed the transaction value.
fn verify_lock_time(
    tx_lock_time: i64,
    threshold: i64,
    lock_time: i64,
) -> Result<(), ScriptError> {
    if (tx_lock_time < threshold && lock_time >= threshold)
        || (tx_lock_time >= threshold && lock_time < threshold)
    {
        return Err(ScriptError::InvalidScript(format!(
            "mismatched locktime types -- tx locktime {}, stack locktime {}",
            tx_lock_time, lock_time
        )));
    }
    if lock_time > tx_lock_time {
        return Err(ScriptError::InvalidScript(format!(
            "locktime requirement not satisfied: {} > {}",
            lock_time, tx_lock_time
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Lock-time and verify handlers exercised with a scripted context.

    use crate::error::ScriptError;
    use crate::runner::testutil::FakeContext;
    use crate::runner::Runner;
    use crate::script::Script;

    fn run_with(asm: &str, ctx: &FakeContext) -> Result<(), ScriptError> {
        let script = Script::from_asm(asm).unwrap();
        let mut r = Runner::new().with_context(ctx);
        r.execute(&script)
    }

    /// CLTV passes when the tx lock time covers the operand and the
    /// input is not finalized.
    #[test]
    fn test_cltv_satisfied() {
        let ctx = FakeContext {
            lock_time: 100,
            ..FakeContext::default()
        };
        assert!(run_with("OP_10 OP_CHECKLOCKTIMEVERIFY OP_DROP OP_1", &ctx).is_ok());
    }

    /// CLTV fails when the operand exceeds the tx lock time.
    #[test]
    fn test_cltv_unsatisfied() {
        let ctx = FakeContext {
            lock_time: 5,
            ..FakeContext::default()
        };
        assert!(matches!(
            run_with("OP_10 OP_CHECKLOCKTIMEVERIFY", &ctx).unwrap_err(),
            ScriptError::InvalidScript(_)
        ));
    }

    /// Block-height and timestamp lock times must not be mixed.
    #[test]
    fn test_cltv_type_mismatch() {
        let ctx = FakeContext {
            lock_time: 100, // block height
            ..FakeContext::default()
        };
        // 0065cd1d little-endian = 500000000, a timestamp.
        assert!(run_with("0065cd1d OP_CHECKLOCKTIMEVERIFY", &ctx).is_err());
    }

    /// A finalized input (max sequence) cannot satisfy CLTV.
    #[test]
    fn test_cltv_finalized_input() {
        let ctx = FakeContext {
            lock_time: 100,
            sequences: vec![0xffffffff],
            ..FakeContext::default()
        };
        assert!(run_with("OP_10 OP_CHECKLOCKTIMEVERIFY", &ctx).is_err());
    }

    /// CLTV peeks its operand instead of popping it.
    #[test]
    fn test_cltv_leaves_operand() {
        let ctx = FakeContext {
            lock_time: 100,
            ..FakeContext::default()
        };
        let script = Script::from_asm("OP_10 OP_CHECKLOCKTIMEVERIFY").unwrap();
        let mut r = Runner::new().with_context(&ctx);
        r.execute(&script).unwrap();
        assert_eq!(r.stack(), &[vec![10u8]]);
    }

    /// CSV with the disable bit set is a no-op.
    #[test]
    fn test_csv_disabled_bit() {
        let ctx = FakeContext::default();
        // 0x80000000 little-endian with a trailing zero byte keeps it positive.
        assert!(run_with("0000008000 OP_CHECKSEQUENCEVERIFY OP_DROP OP_1", &ctx).is_ok());
    }

    /// CSV requires transaction version 2 or later.
    #[test]
    fn test_csv_version_gate() {
        let ctx = FakeContext {
            version: 1,
            sequences: vec![5],
            ..FakeContext::default()
        };
        assert!(run_with("OP_5 OP_CHECKSEQUENCEVERIFY", &ctx).is_err());
    }

    /// CSV compares masked relative lock values.
    #[test]
    fn test_csv_satisfied() {
        let ctx = FakeContext {
            version: 2,
            sequences: vec![10],
            ..FakeContext::default()
        };
        assert!(run_with("OP_5 OP_CHECKSEQUENCEVERIFY OP_DROP OP_1", &ctx).is_ok());

        let ctx = FakeContext {
            version: 2,
            sequences: vec![3],
            ..FakeContext::default()
        };
        assert!(run_with("OP_5 OP_CHECKSEQUENCEVERIFY", &ctx).is_err());
    }

    /// Negative operands are rejected by both opcodes.
    #[test]
    fn test_negative_operands() {
        let ctx = FakeContext {
            lock_time: 100,
            ..FakeContext::default()
        };
        assert!(run_with("OP_1NEGATE OP_CHECKLOCKTIMEVERIFY", &ctx).is_err());
        assert!(run_with("OP_1NEGATE OP_CHECKSEQUENCEVERIFY", &ctx).is_err());
    }
}
