//! Standard script recognition.
//!
//! Script types are described declaratively as blueprints, ordered by
//! priority, and matched directly against the raw bytes. A blueprint
//! only matches when it consumes the buffer exactly; a script matching
//! no blueprint is simply untyped.

use std::fmt;

use crate::opcodes::{
    MAX_DIRECT_PUSH, OP_0, OP_1, OP_16, OP_CHECKMULTISIG, OP_CHECKSIG, OP_DUP, OP_EQUAL,
    OP_EQUALVERIFY, OP_HASH160, OP_PUSHDATA1, OP_RETURN,
};

/// The recognized standard script types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptType {
    /// Pay to public key.
    P2pk,
    /// Pay to public key hash.
    P2pkh,
    /// Pay to script hash.
    P2sh,
    /// Bare multisig.
    P2ms,
    /// Witness v0 key hash.
    P2wpkh,
    /// Witness v0 script hash.
    P2wsh,
    /// Provably unspendable data carrier.
    NullData,
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptType::P2pk => "p2pk",
            ScriptType::P2pkh => "p2pkh",
            ScriptType::P2sh => "p2sh",
            ScriptType::P2ms => "p2ms",
            ScriptType::P2wpkh => "p2wpkh",
            ScriptType::P2wsh => "p2wsh",
            ScriptType::NullData => "nulldata",
        };
        f.write_str(name)
    }
}

/// Allowed payload lengths for a data term.
enum Lens {
    Set(&'static [usize]),
    Range(usize, usize),
}

impl Lens {
    fn allows(&self, len: usize) -> bool {
        match self {
            Lens::Set(set) => set.contains(&len),
            Lens::Range(min, max) => (*min..=*max).contains(&len),
        }
    }
}

/// One matching step of a blueprint.
enum Term {
    /// An exact opcode byte.
    Op(u8),
    /// A direct data push whose payload length satisfies `lens`. With
    /// `pushdata1_alt` the same position may instead hold an
    /// OP_PUSHDATA1 push of 1..=255 bytes, tried only when the direct
    /// form does not match.
    Data { lens: Lens, pushdata1_alt: bool },
    /// 1..=16 consecutive direct pushes satisfying `lens`, followed by
    /// the OP_n byte matching the exact count.
    DataRepeated { lens: Lens },
    /// A small-int opcode encoding a value in min..=max (0 is OP_0).
    OpN { min: u8, max: u8 },
}

struct Blueprint {
    kind: ScriptType,
    terms: &'static [Term],
}

/// Blueprints in priority order; the first full match wins.
static BLUEPRINTS: &[Blueprint] = &[
    Blueprint {
        kind: ScriptType::P2pk,
        terms: &[
            Term::Data {
                lens: Lens::Set(&[33, 65]),
                pushdata1_alt: false,
            },
            Term::Op(OP_CHECKSIG),
        ],
    },
    Blueprint {
        kind: ScriptType::P2pkh,
        terms: &[
            Term::Op(OP_DUP),
            Term::Op(OP_HASH160),
            Term::Data {
                lens: Lens::Set(&[20]),
                pushdata1_alt: false,
            },
            Term::Op(OP_EQUALVERIFY),
            Term::Op(OP_CHECKSIG),
        ],
    },
    Blueprint {
        kind: ScriptType::P2sh,
        terms: &[
            Term::Op(OP_HASH160),
            Term::Data {
                lens: Lens::Set(&[20]),
                pushdata1_alt: false,
            },
            Term::Op(OP_EQUAL),
        ],
    },
    Blueprint {
        kind: ScriptType::P2ms,
        terms: &[
            Term::OpN { min: 0, max: 16 },
            Term::DataRepeated {
                lens: Lens::Set(&[33, 65]),
            },
            Term::Op(OP_CHECKMULTISIG),
        ],
    },
    Blueprint {
        kind: ScriptType::P2wpkh,
        terms: &[
            Term::Op(OP_0),
            Term::Data {
                lens: Lens::Set(&[20]),
                pushdata1_alt: false,
            },
        ],
    },
    Blueprint {
        kind: ScriptType::P2wsh,
        terms: &[
            Term::Op(OP_0),
            Term::Data {
                lens: Lens::Set(&[32]),
                pushdata1_alt: false,
            },
        ],
    },
    Blueprint {
        kind: ScriptType::NullData,
        terms: &[
            Term::Op(OP_RETURN),
            Term::Data {
                lens: Lens::Range(1, MAX_DIRECT_PUSH),
                pushdata1_alt: true,
            },
        ],
    },
];

/// The value a small-int opcode byte encodes, if it is one.
fn small_int_value(b: u8) -> Option<u8> {
    if b == OP_0 {
        Some(0)
    } else if (OP_1..=OP_16).contains(&b) {
        Some(b - OP_1 + 1)
    } else {
        None
    }
}

fn match_terms(bytes: &[u8], pos: usize, terms: &[Term]) -> bool {
    let (term, rest) = match terms.split_first() {
        Some(split) => split,
        None => return pos == bytes.len(),
    };

    match term {
        Term::Op(code) => bytes.get(pos) == Some(code) && match_terms(bytes, pos + 1, rest),
        Term::OpN { min, max } => match bytes.get(pos).copied().and_then(small_int_value) {
            Some(n) => n >= *min && n <= *max && match_terms(bytes, pos + 1, rest),
            None => false,
        },
        Term::Data {
            lens,
            pushdata1_alt,
        } => {
            if let Some(&b) = bytes.get(pos) {
                let len = b as usize;
                if (1..=MAX_DIRECT_PUSH).contains(&len)
                    && lens.allows(len)
                    && pos + 1 + len <= bytes.len()
                    && match_terms(bytes, pos + 1 + len, rest)
                {
                    return true;
                }
                // Backtracking alternative: the same data encoded behind
                // an explicit OP_PUSHDATA1 prefix.
                if *pushdata1_alt && b == OP_PUSHDATA1 {
                    if let Some(&len_byte) = bytes.get(pos + 1) {
                        let len = len_byte as usize;
                        return len >= 1
                            && pos + 2 + len <= bytes.len()
                            && match_terms(bytes, pos + 2 + len, rest);
                    }
                }
            }
            false
        }
        Term::DataRepeated { lens } => {
            let mut pos = pos;
            let mut count = 0u8;
            while count < 16 {
                match bytes.get(pos) {
                    Some(&b) => {
                        let len = b as usize;
                        if !(1..=MAX_DIRECT_PUSH).contains(&len)
                            || !lens.allows(len)
                            || pos + 1 + len > bytes.len()
                        {
                            break;
                        }
                        pos += 1 + len;
                        count += 1;
                    }
                    None => break,
                }
            }
            count >= 1
                && bytes.get(pos) == Some(&(OP_1 + count - 1))
                && match_terms(bytes, pos + 1, rest)
        }
    }
}

/// Match `bytes` against the blueprints and return the first full match.
pub fn classify(bytes: &[u8]) -> Option<ScriptType> {
    if bytes.is_empty() {
        return None;
    }
    BLUEPRINTS
        .iter()
        .find(|bp| match_terms(bytes, 0, bp.terms))
        .map(|bp| bp.kind)
}
