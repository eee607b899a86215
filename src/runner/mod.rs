//! Script execution.
//!
//! [`Runner`] is a resumable state machine over a disassembled script:
//! callers may `step` one operation at a time or drive the whole script
//! with `execute`. Transaction-dependent opcodes consult an injected
//! [`TxContext`]; signature checks delegate to a [`KeyVerifier`], with a
//! k256-backed [`EcdsaVerifier`] as the default.

pub mod ops_arith;
pub mod ops_crypto;
pub mod ops_data;
pub mod ops_flow;
pub mod ops_stack;
pub mod scriptnum;
pub mod stack;

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, VerifyingKey};

use crate::disasm::{disassemble, Operation};
use crate::error::ScriptError;
use crate::script::Script;

use stack::Stack;

/// Transaction-level facts the script alone cannot supply.
///
/// Implemented by whatever owns the spending transaction; the engine
/// never sees the transaction itself, only the answers it needs.
pub trait TxContext {
    /// Digest to be signed for the given subscript and sighash type.
    fn signature_digest(&self, sub_script: &[u8], hash_type: u8)
        -> Result<Vec<u8>, ScriptError>;

    /// The transaction's nLockTime field.
    fn lock_time(&self) -> u32;

    /// The transaction's version field.
    fn version(&self) -> u32;

    /// Index of the input whose script is executing.
    fn input_index(&self) -> usize;

    /// The nSequence field of input `idx`.
    fn input_sequence(&self, idx: usize) -> u32;

    /// Whether the executing input spends a native segwit output, which
    /// restricts public keys to compressed encodings.
    fn is_native_segwit(&self) -> bool {
        false
    }
}

/// Signature verification collaborator.
pub trait KeyVerifier {
    /// Verify a DER-encoded ECDSA signature over `digest` with the
    /// SEC1-encoded `pubkey`.
    fn verify(&self, digest: &[u8], sig_der: &[u8], pubkey: &[u8]) -> bool;

    /// Whether `pubkey` uses the compressed SEC1 encoding.
    fn is_compressed(&self, pubkey: &[u8]) -> bool {
        pubkey.len() == 33 && (pubkey[0] == 0x02 || pubkey[0] == 0x03)
    }
}

/// Default verifier over secp256k1 ECDSA.
#[derive(Debug, Default, Clone, Copy)]
pub struct EcdsaVerifier;

impl KeyVerifier for EcdsaVerifier {
    fn verify(&self, digest: &[u8], sig_der: &[u8], pubkey: &[u8]) -> bool {
        let key = match VerifyingKey::from_sec1_bytes(pubkey) {
            Ok(k) => k,
            Err(_) => return false,
        };
        let sig = match Signature::from_der(sig_der) {
            Ok(s) => s,
            Err(_) => return false,
        };
        // Historical signatures may carry a high S value.
        let sig = sig.normalize_s().unwrap_or(sig);
        key.verify_prehash(digest, &sig).is_ok()
    }
}

static DEFAULT_VERIFIER: EcdsaVerifier = EcdsaVerifier;

/// Execution lifecycle of a [`Runner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    NotStarted,
    Running,
    Completed,
    Failed,
}

/// A resumable script interpreter.
pub struct Runner<'a> {
    /// Main data stack.
    pub(crate) dstack: Stack,
    /// Alt stack (OP_TOALTSTACK / OP_FROMALTSTACK).
    pub(crate) astack: Stack,
    ops: Vec<Operation>,
    pc: usize,
    state: RunnerState,
    /// Branch target requested by the current operation, consumed after
    /// its handler returns.
    pub(crate) jump: Option<usize>,
    /// Operation index just past the last executed OP_CODESEPARATOR.
    pub(crate) code_sep: usize,
    pub(crate) ctx: Option<&'a dyn TxContext>,
    pub(crate) verifier: &'a dyn KeyVerifier,
}

impl<'a> Default for Runner<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Runner<'a> {
    pub fn new() -> Self {
        Runner {
            dstack: Stack::new(),
            astack: Stack::new(),
            ops: Vec::new(),
            pc: 0,
            state: RunnerState::NotStarted,
            jump: None,
            code_sep: 0,
            ctx: None,
            verifier: &DEFAULT_VERIFIER,
        }
    }

    /// Attach a transaction context for CHECKSIG-family, lock-time, and
    /// code-separator opcodes.
    pub fn with_context(mut self, ctx: &'a dyn TxContext) -> Self {
        self.ctx = Some(ctx);
        self
    }

    /// Replace the default signature verifier.
    pub fn with_verifier(mut self, verifier: &'a dyn KeyVerifier) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Main stack contents, bottom to top. Stacks persist across
    /// `start` calls so unlocking and locking scripts can be run in
    /// sequence on one runner.
    pub fn stack(&self) -> &[Vec<u8>] {
        self.dstack.items()
    }

    pub fn alt_stack(&self) -> &[Vec<u8>] {
        self.astack.items()
    }

    /// Disassemble `script` and arm the runner at its first operation.
    pub fn start(&mut self, script: &Script) -> Result<(), ScriptError> {
        self.ops = disassemble(script.as_bytes())?;
        self.pc = 0;
        self.jump = None;
        self.code_sep = 0;
        self.state = if self.ops.is_empty() {
            RunnerState::Completed
        } else {
            RunnerState::Running
        };
        Ok(())
    }

    /// Execute the next operation. Returns true while more operations
    /// remain.
    pub fn step(&mut self) -> Result<bool, ScriptError> {
        match self.state {
            RunnerState::Running => {}
            RunnerState::NotStarted => {
                return Err(ScriptError::InvalidScript(
                    "runner has not been started".to_string(),
                ))
            }
            RunnerState::Completed | RunnerState::Failed => {
                return Err(ScriptError::InvalidScript(
                    "runner has already finished".to_string(),
                ))
            }
        }

        let op = self.ops[self.pc].clone();

        if op.opcode.needs_transaction && self.ctx.is_none() {
            self.state = RunnerState::Failed;
            return Err(ScriptError::InvalidScript(format!(
                "{} requires a transaction context",
                op.opcode.name
            )));
        }

        let handler = match op.opcode.handler {
            Some(h) => h,
            None => {
                self.state = RunnerState::Failed;
                return Err(ScriptError::NotImplemented(op.opcode.name));
            }
        };

        if let Err(e) = handler(self, &op) {
            self.state = RunnerState::Failed;
            return Err(e);
        }

        self.pc = self.jump.take().unwrap_or(self.pc + 1);
        if self.pc >= self.ops.len() {
            self.state = RunnerState::Completed;
            Ok(false)
        } else {
            Ok(true)
        }
    }

    /// Step until the script completes or fails.
    pub fn run_to_completion(&mut self) -> Result<(), ScriptError> {
        while self.step()? {}
        Ok(())
    }

    /// `start` followed by `run_to_completion`.
    pub fn execute(&mut self, script: &Script) -> Result<(), ScriptError> {
        self.start(script)?;
        if self.state == RunnerState::Running {
            self.run_to_completion()?;
        }
        Ok(())
    }

    /// The script bytes from the last OP_CODESEPARATOR onward, as signed
    /// by CHECKSIG-family opcodes.
    pub(crate) fn sub_script(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for op in &self.ops[self.code_sep..] {
            out.extend_from_slice(&op.raw);
        }
        out
    }

    /// Index of the currently executing operation.
    pub(crate) fn position(&self) -> usize {
        self.pc
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    //! A scripted transaction context shared by the runner tests.

    use super::*;
    use crate::hash::sha256d;

    /// Fixed-answer context: the digest is sha256d over the subscript
    /// with the hash type appended, which is enough for verifier tests.
    pub struct FakeContext {
        pub lock_time: u32,
        pub version: u32,
        pub input_index: usize,
        pub sequences: Vec<u32>,
        pub native_segwit: bool,
    }

    impl Default for FakeContext {
        fn default() -> Self {
            FakeContext {
                lock_time: 0,
                version: 2,
                input_index: 0,
                sequences: vec![0],
                native_segwit: false,
            }
        }
    }

    impl TxContext for FakeContext {
        fn signature_digest(
            &self,
            sub_script: &[u8],
            hash_type: u8,
        ) -> Result<Vec<u8>, ScriptError> {
            let mut preimage = sub_script.to_vec();
            preimage.push(hash_type);
            Ok(sha256d(&preimage).to_vec())
        }

        fn lock_time(&self) -> u32 {
            self.lock_time
        }

        fn version(&self) -> u32 {
            self.version
        }

        fn input_index(&self) -> usize {
            self.input_index
        }

        fn input_sequence(&self, idx: usize) -> u32 {
            self.sequences.get(idx).copied().unwrap_or(0)
        }

        fn is_native_segwit(&self) -> bool {
            self.native_segwit
        }
    }
}
