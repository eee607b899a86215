//! The opcode table.
//!
//! Maps mnemonics and byte codes to executable semantics. The table is
//! built once per process behind a lazy static; every `Operation` and
//! every runner dispatch borrows `&'static Opcode` entries out of it.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::disasm::Operation;
use crate::error::ScriptError;
use crate::runner::{ops_arith, ops_crypto, ops_data, ops_flow, ops_stack, Runner};

// ---------------------------------------------------------------------------
// Byte codes
// ---------------------------------------------------------------------------

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_RESERVED: u8 = 0x50;
pub const OP_1: u8 = 0x51;
pub const OP_2: u8 = 0x52;
pub const OP_3: u8 = 0x53;
pub const OP_4: u8 = 0x54;
pub const OP_5: u8 = 0x55;
pub const OP_6: u8 = 0x56;
pub const OP_7: u8 = 0x57;
pub const OP_8: u8 = 0x58;
pub const OP_9: u8 = 0x59;
pub const OP_10: u8 = 0x5a;
pub const OP_11: u8 = 0x5b;
pub const OP_12: u8 = 0x5c;
pub const OP_13: u8 = 0x5d;
pub const OP_14: u8 = 0x5e;
pub const OP_15: u8 = 0x5f;
pub const OP_16: u8 = 0x60;
pub const OP_NOP: u8 = 0x61;
pub const OP_VER: u8 = 0x62;
pub const OP_IF: u8 = 0x63;
pub const OP_NOTIF: u8 = 0x64;
pub const OP_VERIF: u8 = 0x65;
pub const OP_VERNOTIF: u8 = 0x66;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;
pub const OP_VERIFY: u8 = 0x69;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_TOALTSTACK: u8 = 0x6b;
pub const OP_FROMALTSTACK: u8 = 0x6c;
pub const OP_2DROP: u8 = 0x6d;
pub const OP_2DUP: u8 = 0x6e;
pub const OP_3DUP: u8 = 0x6f;
pub const OP_2OVER: u8 = 0x70;
pub const OP_2ROT: u8 = 0x71;
pub const OP_2SWAP: u8 = 0x72;
pub const OP_IFDUP: u8 = 0x73;
pub const OP_DEPTH: u8 = 0x74;
pub const OP_DROP: u8 = 0x75;
pub const OP_DUP: u8 = 0x76;
pub const OP_NIP: u8 = 0x77;
pub const OP_OVER: u8 = 0x78;
pub const OP_PICK: u8 = 0x79;
pub const OP_ROLL: u8 = 0x7a;
pub const OP_ROT: u8 = 0x7b;
pub const OP_SWAP: u8 = 0x7c;
pub const OP_TUCK: u8 = 0x7d;
pub const OP_CAT: u8 = 0x7e;
pub const OP_SUBSTR: u8 = 0x7f;
pub const OP_LEFT: u8 = 0x80;
pub const OP_RIGHT: u8 = 0x81;
pub const OP_SIZE: u8 = 0x82;
pub const OP_INVERT: u8 = 0x83;
pub const OP_AND: u8 = 0x84;
pub const OP_OR: u8 = 0x85;
pub const OP_XOR: u8 = 0x86;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_RESERVED1: u8 = 0x89;
pub const OP_RESERVED2: u8 = 0x8a;
pub const OP_1ADD: u8 = 0x8b;
pub const OP_1SUB: u8 = 0x8c;
pub const OP_2MUL: u8 = 0x8d;
pub const OP_2DIV: u8 = 0x8e;
pub const OP_NEGATE: u8 = 0x8f;
pub const OP_ABS: u8 = 0x90;
pub const OP_NOT: u8 = 0x91;
pub const OP_0NOTEQUAL: u8 = 0x92;
pub const OP_ADD: u8 = 0x93;
pub const OP_SUB: u8 = 0x94;
pub const OP_MUL: u8 = 0x95;
pub const OP_DIV: u8 = 0x96;
pub const OP_MOD: u8 = 0x97;
pub const OP_LSHIFT: u8 = 0x98;
pub const OP_RSHIFT: u8 = 0x99;
pub const OP_BOOLAND: u8 = 0x9a;
pub const OP_BOOLOR: u8 = 0x9b;
pub const OP_NUMEQUAL: u8 = 0x9c;
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
pub const OP_LESSTHAN: u8 = 0x9f;
pub const OP_GREATERTHAN: u8 = 0xa0;
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
pub const OP_MIN: u8 = 0xa3;
pub const OP_MAX: u8 = 0xa4;
pub const OP_WITHIN: u8 = 0xa5;
pub const OP_RIPEMD160: u8 = 0xa6;
pub const OP_SHA1: u8 = 0xa7;
pub const OP_SHA256: u8 = 0xa8;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_HASH256: u8 = 0xaa;
pub const OP_CODESEPARATOR: u8 = 0xab;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_CHECKMULTISIG: u8 = 0xae;
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;
pub const OP_NOP1: u8 = 0xb0;
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;
pub const OP_NOP4: u8 = 0xb3;
pub const OP_NOP5: u8 = 0xb4;
pub const OP_NOP6: u8 = 0xb5;
pub const OP_NOP7: u8 = 0xb6;
pub const OP_NOP8: u8 = 0xb7;
pub const OP_NOP9: u8 = 0xb8;
pub const OP_NOP10: u8 = 0xb9;

/// Largest single-byte direct push length.
pub const MAX_DIRECT_PUSH: usize = 75;

// ---------------------------------------------------------------------------
// Table entries
// ---------------------------------------------------------------------------

/// The executable semantics of an opcode.
pub type OpHandler = fn(&mut Runner<'_>, &Operation) -> Result<(), ScriptError>;

/// A single opcode table entry.
pub struct Opcode {
    /// Canonical mnemonic.
    pub name: &'static str,
    /// Byte code as it appears in serialized scripts.
    pub code: u8,
    /// Whether execution consults the injected transaction context.
    pub needs_transaction: bool,
    /// Whether the opcode pushes literal data carried in the script.
    pub pushes: bool,
    /// The handler, or None for opcodes with no executable semantics.
    pub handler: Option<OpHandler>,
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opcode({} 0x{:02x})", self.name, self.code)
    }
}

impl PartialEq for Opcode {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Opcode {}

/// The registry of all opcodes, indexed by name and by byte code.
pub struct OpcodeTable {
    entries: Vec<Opcode>,
    by_name: HashMap<&'static str, usize>,
    by_code: [Option<u16>; 256],
}

const SMALL_INT_NAMES: [&str; 16] = [
    "OP_1", "OP_2", "OP_3", "OP_4", "OP_5", "OP_6", "OP_7", "OP_8", "OP_9", "OP_10", "OP_11",
    "OP_12", "OP_13", "OP_14", "OP_15", "OP_16",
];

impl OpcodeTable {
    fn add(
        &mut self,
        name: &'static str,
        code: u8,
        needs_transaction: bool,
        pushes: bool,
        handler: Option<OpHandler>,
    ) {
        let idx = self.entries.len();
        self.entries.push(Opcode {
            name,
            code,
            needs_transaction,
            pushes,
            handler,
        });
        self.by_name.insert(name, idx);
        self.by_code[code as usize] = Some(idx as u16);
    }

    /// Register an alternate mnemonic for an already-registered opcode.
    ///
    /// Aliases resolve by name only; byte-code lookup always returns the
    /// canonical entry.
    fn alias(&mut self, name: &'static str, canonical: &'static str) {
        if let Some(&idx) = self.by_name.get(canonical) {
            self.by_name.insert(name, idx);
        }
    }

    fn build() -> Self {
        let mut t = OpcodeTable {
            entries: Vec::with_capacity(120),
            by_name: HashMap::new(),
            by_code: [None; 256],
        };

        // Data pushes. Byte codes 0x01..=0x4b are implicit pushes and have
        // no named entry; the disassembler maps them to OP_PUSHDATA1.
        t.add("OP_0", OP_0, false, true, Some(ops_data::op_push_empty));
        t.add("OP_PUSHDATA1", OP_PUSHDATA1, false, true, Some(ops_data::op_push_data));
        t.add("OP_PUSHDATA2", OP_PUSHDATA2, false, true, Some(ops_data::op_push_data));
        t.add("OP_PUSHDATA4", OP_PUSHDATA4, false, true, Some(ops_data::op_push_data));
        t.add("OP_1NEGATE", OP_1NEGATE, false, true, Some(ops_data::op_push_1negate));
        for (n, name) in SMALL_INT_NAMES.iter().enumerate() {
            t.add(name, OP_1 + n as u8, false, true, Some(ops_data::op_push_small_int));
        }

        // Flow control.
        t.add("OP_NOP", OP_NOP, false, false, Some(ops_flow::op_nop));
        t.add("OP_IF", OP_IF, false, false, Some(ops_flow::op_if));
        t.add("OP_NOTIF", OP_NOTIF, false, false, Some(ops_flow::op_notif));
        t.add("OP_ELSE", OP_ELSE, false, false, Some(ops_flow::op_else));
        t.add("OP_ENDIF", OP_ENDIF, false, false, Some(ops_flow::op_endif));
        t.add("OP_VERIFY", OP_VERIFY, false, false, Some(ops_flow::op_verify));
        t.add("OP_RETURN", OP_RETURN, false, false, Some(ops_flow::op_return));

        // Reserved opcodes fail any script that executes them.
        t.add("OP_RESERVED", OP_RESERVED, false, false, Some(ops_flow::op_reserved));
        t.add("OP_VER", OP_VER, false, false, Some(ops_flow::op_reserved));
        t.add("OP_VERIF", OP_VERIF, false, false, Some(ops_flow::op_reserved));
        t.add("OP_VERNOTIF", OP_VERNOTIF, false, false, Some(ops_flow::op_reserved));
        t.add("OP_RESERVED1", OP_RESERVED1, false, false, Some(ops_flow::op_reserved));
        t.add("OP_RESERVED2", OP_RESERVED2, false, false, Some(ops_flow::op_reserved));

        // Stack manipulation.
        t.add("OP_TOALTSTACK", OP_TOALTSTACK, false, false, Some(ops_stack::op_to_alt_stack));
        t.add("OP_FROMALTSTACK", OP_FROMALTSTACK, false, false, Some(ops_stack::op_from_alt_stack));
        t.add("OP_2DROP", OP_2DROP, false, false, Some(ops_stack::op_2drop));
        t.add("OP_2DUP", OP_2DUP, false, false, Some(ops_stack::op_2dup));
        t.add("OP_3DUP", OP_3DUP, false, false, Some(ops_stack::op_3dup));
        t.add("OP_2OVER", OP_2OVER, false, false, Some(ops_stack::op_2over));
        t.add("OP_2ROT", OP_2ROT, false, false, Some(ops_stack::op_2rot));
        t.add("OP_2SWAP", OP_2SWAP, false, false, Some(ops_stack::op_2swap));
        t.add("OP_IFDUP", OP_IFDUP, false, false, Some(ops_stack::op_ifdup));
        t.add("OP_DEPTH", OP_DEPTH, false, false, Some(ops_stack::op_depth));
        t.add("OP_DROP", OP_DROP, false, false, Some(ops_stack::op_drop));
        t.add("OP_DUP", OP_DUP, false, false, Some(ops_stack::op_dup));
        t.add("OP_NIP", OP_NIP, false, false, Some(ops_stack::op_nip));
        t.add("OP_OVER", OP_OVER, false, false, Some(ops_stack::op_over));
        t.add("OP_PICK", OP_PICK, false, false, Some(ops_stack::op_pick));
        t.add("OP_ROLL", OP_ROLL, false, false, Some(ops_stack::op_roll));
        t.add("OP_ROT", OP_ROT, false, false, Some(ops_stack::op_rot));
        t.add("OP_SWAP", OP_SWAP, false, false, Some(ops_stack::op_swap));
        t.add("OP_TUCK", OP_TUCK, false, false, Some(ops_stack::op_tuck));

        // Splice group: disabled, no semantics.
        t.add("OP_CAT", OP_CAT, false, false, None);
        t.add("OP_SUBSTR", OP_SUBSTR, false, false, None);
        t.add("OP_LEFT", OP_LEFT, false, false, None);
        t.add("OP_RIGHT", OP_RIGHT, false, false, None);
        t.add("OP_SIZE", OP_SIZE, false, false, Some(ops_data::op_size));

        // Bitwise group: disabled except the equality tests.
        t.add("OP_INVERT", OP_INVERT, false, false, None);
        t.add("OP_AND", OP_AND, false, false, None);
        t.add("OP_OR", OP_OR, false, false, None);
        t.add("OP_XOR", OP_XOR, false, false, None);
        t.add("OP_EQUAL", OP_EQUAL, false, false, Some(ops_data::op_equal));
        t.add("OP_EQUALVERIFY", OP_EQUALVERIFY, false, false, Some(ops_data::op_equalverify));

        // Arithmetic.
        t.add("OP_1ADD", OP_1ADD, false, false, Some(ops_arith::op_1add));
        t.add("OP_1SUB", OP_1SUB, false, false, Some(ops_arith::op_1sub));
        t.add("OP_2MUL", OP_2MUL, false, false, None);
        t.add("OP_2DIV", OP_2DIV, false, false, None);
        t.add("OP_NEGATE", OP_NEGATE, false, false, Some(ops_arith::op_negate));
        t.add("OP_ABS", OP_ABS, false, false, Some(ops_arith::op_abs));
        t.add("OP_NOT", OP_NOT, false, false, Some(ops_arith::op_not));
        t.add("OP_0NOTEQUAL", OP_0NOTEQUAL, false, false, Some(ops_arith::op_0notequal));
        t.add("OP_ADD", OP_ADD, false, false, Some(ops_arith::op_add));
        t.add("OP_SUB", OP_SUB, false, false, Some(ops_arith::op_sub));
        t.add("OP_MUL", OP_MUL, false, false, None);
        t.add("OP_DIV", OP_DIV, false, false, None);
        t.add("OP_MOD", OP_MOD, false, false, None);
        t.add("OP_LSHIFT", OP_LSHIFT, false, false, None);
        t.add("OP_RSHIFT", OP_RSHIFT, false, false, None);
        t.add("OP_BOOLAND", OP_BOOLAND, false, false, Some(ops_arith::op_booland));
        t.add("OP_BOOLOR", OP_BOOLOR, false, false, Some(ops_arith::op_boolor));
        t.add("OP_NUMEQUAL", OP_NUMEQUAL, false, false, Some(ops_arith::op_numequal));
        t.add("OP_NUMEQUALVERIFY", OP_NUMEQUALVERIFY, false, false, Some(ops_arith::op_numequalverify));
        t.add("OP_NUMNOTEQUAL", OP_NUMNOTEQUAL, false, false, Some(ops_arith::op_numnotequal));
        t.add("OP_LESSTHAN", OP_LESSTHAN, false, false, Some(ops_arith::op_lessthan));
        t.add("OP_GREATERTHAN", OP_GREATERTHAN, false, false, Some(ops_arith::op_greaterthan));
        t.add("OP_LESSTHANOREQUAL", OP_LESSTHANOREQUAL, false, false, Some(ops_arith::op_lessthanorequal));
        t.add("OP_GREATERTHANOREQUAL", OP_GREATERTHANOREQUAL, false, false, Some(ops_arith::op_greaterthanorequal));
        t.add("OP_MIN", OP_MIN, false, false, Some(ops_arith::op_min));
        t.add("OP_MAX", OP_MAX, false, false, Some(ops_arith::op_max));
        t.add("OP_WITHIN", OP_WITHIN, false, false, Some(ops_arith::op_within));

        // Crypto.
        t.add("OP_RIPEMD160", OP_RIPEMD160, false, false, Some(ops_data::op_ripemd160));
        t.add("OP_SHA1", OP_SHA1, false, false, Some(ops_data::op_sha1));
        t.add("OP_SHA256", OP_SHA256, false, false, Some(ops_data::op_sha256));
        t.add("OP_HASH160", OP_HASH160, false, false, Some(ops_data::op_hash160));
        t.add("OP_HASH256", OP_HASH256, false, false, Some(ops_data::op_hash256));
        t.add("OP_CODESEPARATOR", OP_CODESEPARATOR, true, false, Some(ops_crypto::op_code_separator));
        t.add("OP_CHECKSIG", OP_CHECKSIG, true, false, Some(ops_crypto::op_checksig));
        t.add("OP_CHECKSIGVERIFY", OP_CHECKSIGVERIFY, true, false, Some(ops_crypto::op_checksigverify));
        t.add("OP_CHECKMULTISIG", OP_CHECKMULTISIG, true, false, Some(ops_crypto::op_checkmultisig));
        t.add("OP_CHECKMULTISIGVERIFY", OP_CHECKMULTISIGVERIFY, true, false, Some(ops_crypto::op_checkmultisigverify));

        // Lock-time verification and the remaining NOPs.
        t.add("OP_NOP1", OP_NOP1, false, false, Some(ops_flow::op_nop));
        t.add("OP_CHECKLOCKTIMEVERIFY", OP_CHECKLOCKTIMEVERIFY, true, false, Some(ops_flow::op_check_lock_time_verify));
        t.add("OP_CHECKSEQUENCEVERIFY", OP_CHECKSEQUENCEVERIFY, true, false, Some(ops_flow::op_check_sequence_verify));
        t.add("OP_NOP4", OP_NOP4, false, false, Some(ops_flow::op_nop));
        t.add("OP_NOP5", OP_NOP5, false, false, Some(ops_flow::op_nop));
        t.add("OP_NOP6", OP_NOP6, false, false, Some(ops_flow::op_nop));
        t.add("OP_NOP7", OP_NOP7, false, false, Some(ops_flow::op_nop));
        t.add("OP_NOP8", OP_NOP8, false, false, Some(ops_flow::op_nop));
        t.add("OP_NOP9", OP_NOP9, false, false, Some(ops_flow::op_nop));
        t.add("OP_NOP10", OP_NOP10, false, false, Some(ops_flow::op_nop));

        // Name-only aliases.
        t.alias("OP_FALSE", "OP_0");
        t.alias("OP_TRUE", "OP_1");
        t.alias("OP_NOP2", "OP_CHECKLOCKTIMEVERIFY");
        t.alias("OP_NOP3", "OP_CHECKSEQUENCEVERIFY");

        t
    }
}

lazy_static! {
    static ref OPCODES: OpcodeTable = OpcodeTable::build();
}

fn table() -> &'static OpcodeTable {
    &OPCODES
}

/// Look up an opcode by mnemonic, aliases included.
pub fn opcode_by_name(name: &str) -> Result<&'static Opcode, ScriptError> {
    let t = table();
    t.by_name
        .get(name)
        .map(|&idx| &t.entries[idx])
        .ok_or_else(|| ScriptError::UnknownOpcode(name.to_string()))
}

/// Look up an opcode by byte code. Never resolves to an alias.
pub fn opcode_by_code(code: u8) -> Result<&'static Opcode, ScriptError> {
    let t = table();
    t.by_code[code as usize]
        .map(|idx| &t.entries[idx as usize])
        .ok_or_else(|| ScriptError::UnknownOpcode(format!("0x{:02x}", code)))
}
