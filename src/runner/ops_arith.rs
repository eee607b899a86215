//! Arithmetic and comparison handlers.
//!
//! Operands are numeric stack items of at most 4 bytes; results are
//! re-encoded minimally and may exceed 4 bytes.

use crate::disasm::Operation;
use crate::error::ScriptError;

use super::ops_flow;
use super::scriptnum::ScriptNumber;
use super::Runner;

fn unary_num(
    r: &mut Runner<'_>,
    f: impl FnOnce(&mut ScriptNumber),
) -> Result<(), ScriptError> {
    let mut n = r.dstack.pop_int()?;
    f(&mut n);
    r.dstack.push_int(&n);
    Ok(())
}

fn binary_num(
    r: &mut Runner<'_>,
    f: impl FnOnce(&mut ScriptNumber, &ScriptNumber),
) -> Result<(), ScriptError> {
    let b = r.dstack.pop_int()?;
    let mut a = r.dstack.pop_int()?;
    f(&mut a, &b);
    r.dstack.push_int(&a);
    Ok(())
}

fn binary_bool(
    r: &mut Runner<'_>,
    f: impl FnOnce(&ScriptNumber, &ScriptNumber) -> bool,
) -> Result<(), ScriptError> {
    let b = r.dstack.pop_int()?;
    let a = r.dstack.pop_int()?;
    r.dstack.push_bool(f(&a, &b));
    Ok(())
}

pub fn op_1add(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    unary_num(r, |n| {
        n.incr();
    })
}

pub fn op_1sub(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    unary_num(r, |n| {
        n.decr();
    })
}

pub fn op_negate(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    unary_num(r, |n| {
        n.neg();
    })
}

pub fn op_abs(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    unary_num(r, |n| {
        n.abs();
    })
}

pub fn op_not(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let n = r.dstack.pop_int()?;
    r.dstack.push_bool(n.is_zero());
    Ok(())
}

pub fn op_0notequal(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let n = r.dstack.pop_int()?;
    r.dstack.push_bool(!n.is_zero());
    Ok(())
}

pub fn op_add(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_num(r, |a, b| {
        a.add(b);
    })
}

pub fn op_sub(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_num(r, |a, b| {
        a.sub(b);
    })
}

pub fn op_booland(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_bool(r, |a, b| !a.is_zero() && !b.is_zero())
}

pub fn op_boolor(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_bool(r, |a, b| !a.is_zero() || !b.is_zero())
}

pub fn op_numequal(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_bool(r, |a, b| a.equal(b))
}

pub fn op_numequalverify(r: &mut Runner<'_>, op: &Operation) -> Result<(), ScriptError> {
    op_numequal(r, op)?;
    ops_flow::op_verify(r, op)
}

pub fn op_numnotequal(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_bool(r, |a, b| !a.equal(b))
}

pub fn op_lessthan(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_bool(r, |a, b| a.less_than(b))
}

pub fn op_greaterthan(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_bool(r, |a, b| a.greater_than(b))
}

pub fn op_lessthanorequal(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_bool(r, |a, b| a.less_than_or_equal(b))
}

pub fn op_greaterthanorequal(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_bool(r, |a, b| a.greater_than_or_equal(b))
}

pub fn op_min(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_num(r, |a, b| {
        if b.less_than(a) {
            a.val = b.val.clone();
        }
    })
}

pub fn op_max(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    binary_num(r, |a, b| {
        if b.greater_than(a) {
            a.val = b.val.clone();
        }
    })
}

/// OP_WITHIN: x is within [min, max).
pub fn op_within(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let max = r.dstack.pop_int()?;
    let min = r.dstack.pop_int()?;
    let x = r.dstack.pop_int()?;
    r.dstack
        .push_bool(min.less_than_or_equal(&x) && x.less_than(&max));
    Ok(())
}
