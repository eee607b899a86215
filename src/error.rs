//! Error types for script construction, disassembly, and execution.

use thiserror::Error;

/// Errors produced by the script engine.
///
/// One taxonomy covers the whole pipeline: building scripts, decoding
/// them back into operations, recognizing standard types, and running
/// them through the interpreter.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ScriptError {
    /// A mnemonic or byte code that is not in the opcode table.
    #[error("unknown opcode: {0}")]
    UnknownOpcode(String),

    /// Attempted to push a zero-length data item.
    #[error("empty push: use OP_0 to push an empty value")]
    EmptyPush,

    /// Data push larger than the 2^32-1 byte PUSHDATA4 ceiling.
    #[error("push of {0} bytes exceeds the maximum push size")]
    PushTooLarge(usize),

    /// Structurally malformed script (unbalanced branches and the like).
    #[error("syntax error at operation {position}: {message}")]
    SyntaxError { message: String, position: usize },

    /// The script ended in the middle of a multi-byte element.
    #[error("not enough data: {0}")]
    NotEnoughData(String),

    /// Stack arity or index violation during execution.
    #[error("stack error: {0}")]
    StackError(String),

    /// A well-formed script violated an execution rule.
    #[error("invalid script: {0}")]
    InvalidScript(String),

    /// Opcode exists but carries no executable semantics.
    #[error("opcode {0} is not implemented")]
    NotImplemented(&'static str),

    /// Address/network combination does not line up.
    #[error("network check failed: {0}")]
    NetworkCheckError(String),

    /// Witness program version or length violation.
    #[error("invalid witness program: {0}")]
    SegwitProgramError(String),

    /// Hex decoding failure.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Address string could not be decoded.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl From<hex::FromHexError> for ScriptError {
    fn from(e: hex::FromHexError) -> Self {
        ScriptError::InvalidHex(e.to_string())
    }
}
