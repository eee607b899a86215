//! Signature checking handlers.

use crate::disasm::Operation;
use crate::error::ScriptError;

use super::ops_flow;
use super::{Runner, TxContext};

/// Consensus bound on CHECKMULTISIG key counts.
const MAX_PUBKEYS_PER_MULTISIG: i64 = 20;

fn context<'a>(r: &Runner<'a>) -> Result<&'a dyn TxContext, ScriptError> {
    r.ctx.ok_or_else(|| {
        ScriptError::InvalidScript("missing transaction context".to_string())
    })
}

/// OP_CODESEPARATOR: subsequent signature checks cover the script from
/// the next operation onward.
pub fn op_code_separator(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    r.code_sep = r.position() + 1;
    Ok(())
}

pub fn op_checksig(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let ctx = context(r)?;
    let pubkey = r.dstack.pop_byte_array()?;
    let sig = r.dstack.pop_byte_array()?;

    if ctx.is_native_segwit() && !r.verifier.is_compressed(&pubkey) {
        return Err(ScriptError::InvalidScript(
            "uncompressed public key in a native segwit script".to_string(),
        ));
    }

    // An empty signature is a defined failure of the check, not of the
    // script.
    if sig.is_empty() {
        r.dstack.push_bool(false);
        return Ok(());
    }

    let hash_type = sig[sig.len() - 1];
    let der = &sig[..sig.len() - 1];
    let digest = ctx.signature_digest(&r.sub_script(), hash_type)?;
    let ok = r.verifier.verify(&digest, der, &pubkey);
    r.dstack.push_bool(ok);
    Ok(())
}

pub fn op_checksigverify(r: &mut Runner<'_>, op: &Operation) -> Result<(), ScriptError> {
    op_checksig(r, op)?;
    ops_flow::op_verify(r, op)
}

pub fn op_checkmultisig(r: &mut Runner<'_>, _op: &Operation) -> Result<(), ScriptError> {
    let ctx = context(r)?;

    let keys_count = r.dstack.pop_int()?.to_int();
    if keys_count < 0 || keys_count > MAX_PUBKEYS_PER_MULTISIG {
        return Err(ScriptError::InvalidScript(format!(
            "invalid pubkey count {}",
            keys_count
        )));
    }
    let mut pubkeys = Vec::with_capacity(keys_count as usize);
    for _ in 0..keys_count {
        pubkeys.push(r.dstack.pop_byte_array()?);
    }
    pubkeys.reverse(); // back to script order

    let sigs_count = r.dstack.pop_int()?.to_int();
    if sigs_count < 0 || sigs_count > keys_count {
        return Err(ScriptError::InvalidScript(format!(
            "invalid signature count {} for {} pubkeys",
            sigs_count, keys_count
        )));
    }
    let mut sigs = Vec::with_capacity(sigs_count as usize);
    for _ in 0..sigs_count {
        sigs.push(r.dstack.pop_byte_array()?);
    }
    sigs.reverse();

    // The extra element consumed by the off-by-one bug must be empty,
    // whatever the check's outcome.
    let dummy = r.dstack.pop_byte_array()?;
    if !dummy.is_empty() {
        return Err(ScriptError::InvalidScript(
            "multisig dummy argument must be empty".to_string(),
        ));
    }

    if ctx.is_native_segwit() {
        for pk in &pubkeys {
            if !r.verifier.is_compressed(pk) {
                return Err(ScriptError::InvalidScript(
                    "uncompressed public key in a native segwit script".to_string(),
                ));
            }
        }
    }

    let sub = r.sub_script();

    // Single left-to-right walk: signatures must appear in pubkey order,
    // and the check cannot succeed once fewer keys than signatures
    // remain.
    let mut success = true;
    let mut sigs_left = sigs.len();
    let mut keys_left = pubkeys.len();
    while sigs_left > 0 {
        if sigs_left > keys_left {
            success = false;
            break;
        }
        let sig = &sigs[sigs.len() - sigs_left];
        let pk = &pubkeys[pubkeys.len() - keys_left];
        keys_left -= 1;
        if !sig.is_empty() {
            let hash_type = sig[sig.len() - 1];
            let der = &sig[..sig.len() - 1];
            let digest = ctx.signature_digest(&sub, hash_type)?;
            if r.verifier.verify(&digest, der, pk) {
                sigs_left -= 1;
            }
        }
    }

    r.dstack.push_bool(success);
    Ok(())
}

pub fn op_checkmultisigverify(
    r: &mut Runner<'_>,
    op: &Operation,
) -> Result<(), ScriptError> {
    op_checkmultisig(r, op)?;
    ops_flow::op_verify(r, op)
}
