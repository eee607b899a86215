//! Stack manipulation handlers.

use crate::disasm::Operation;
use crate::error::ScriptError;

use super::scriptnum::ScriptNumber;
use super::stack::as_bool;
use super::Runner;

pub fn op_to_alt_stack(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let data = r.dstack.pop_byte_array()?;
    r.astack.push_byte_array(data);
    Ok(())
}

pub fn op_from_alt_stack(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let data = r.astack.pop_byte_array()?;
    r.dstack.push_byte_array(data);
    Ok(())
}

pub fn op_2drop(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.drop_n(2)
}

pub fn op_2dup(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.dup_n(2)
}

pub fn op_3dup(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.dup_n(3)
}

pub fn op_2over(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.over_n(2)
}

pub fn op_2rot(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.rot_n(2)
}

pub fn op_2swap(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.swap_n(2)
}

pub fn op_ifdup(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let so = r.dstack.peek_byte_array(0)?;
    if as_bool(&so) {
        r.dstack.push_byte_array(so);
    }
    Ok(())
}

pub fn op_depth(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let depth = r.dstack.depth();
    r.dstack.push_int(&ScriptNumber::new(depth as i64));
    Ok(())
}

pub fn op_drop(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.drop_n(1)
}

pub fn op_dup(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.dup_n(1)
}

pub fn op_nip(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.nip_n_discard(1)
}

pub fn op_over(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.over_n(1)
}

pub fn op_pick(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let val = r.dstack.pop_int()?;
    r.dstack.pick_n(val.to_i32())
}

pub fn op_roll(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let val = r.dstack.pop_int()?;
    r.dstack.roll_n(val.to_i32())
}

pub fn op_rot(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.rot_n(1)
}

pub fn op_swap(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.swap_n(1)
}

pub fn op_tuck(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.dstack.tuck()
}
