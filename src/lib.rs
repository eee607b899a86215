//! A Bitcoin script engine: an opcode table, a script builder,
//! a disassembler with pre-resolved branch targets, a standard-type
//! recognizer, and a stepwise interpreter.
//!
//! The pieces compose in pipeline order. [`Script`] holds and builds
//! raw script bytes; [`disassemble`] decodes them into [`Operation`]s;
//! [`templates`] matches the bytes against the standard locking
//! shapes; and [`Runner`] executes the decoded operations over a pair
//! of stacks, with transaction-dependent opcodes fed by a [`TxContext`].

pub mod address;
pub mod disasm;
pub mod error;
pub mod hash;
pub mod opcodes;
pub mod runner;
pub mod script;
pub mod templates;

pub use address::{Address, AddressKind, Network};
pub use disasm::{disassemble, render_asm, Operation};
pub use error::ScriptError;
pub use runner::{EcdsaVerifier, KeyVerifier, Runner, RunnerState, TxContext};
pub use script::{Script, StandardScript};
pub use templates::ScriptType;
