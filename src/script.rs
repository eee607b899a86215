//! The script buffer.
//!
//! [`Script`] is an append-only builder over raw script bytes, with
//! minimal-push encoding, standard script construction, lazily cached
//! type detection, hashing, and address derivation.

use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::address::{self, Address, AddressKind, Network};
use crate::disasm::{disassemble, render_asm};
use crate::error::ScriptError;
use crate::hash::hash160;
use crate::opcodes::{self, MAX_DIRECT_PUSH};
use crate::templates::{self, ScriptType};

/// Largest byte length a PUSHDATA4 prefix can express.
const MAX_PUSH_SIZE: u64 = 0xffff_ffff;

/// A Bitcoin script under construction or inspection.
///
/// Equality considers the script bytes and the associated network, not
/// the type-detection cache.
#[derive(Clone)]
pub struct Script {
    bytes: Vec<u8>,
    network: Option<Network>,
    /// `None` until `detect_type` runs; cleared by any mutation.
    cached_type: Option<Option<ScriptType>>,
}

impl Script {
    /// Create an empty script.
    pub fn new() -> Self {
        Script {
            bytes: Vec::new(),
            network: None,
            cached_type: None,
        }
    }

    /// Wrap existing script bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Script {
            bytes,
            network: None,
            cached_type: None,
        }
    }

    /// Parse a hex-encoded script.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Ok(Self::from_bytes(hex::decode(hex_str)?))
    }

    /// Parse assembly text: whitespace-separated mnemonics and hex data
    /// pushes, as produced by `to_asm`.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        for token in asm.split_whitespace() {
            if token.starts_with("OP_") {
                script.append_operation(token)?;
            } else {
                let data = hex::decode(token)?;
                script.push_data(&data)?;
            }
        }
        Ok(script)
    }

    /// Associate a network for address derivation and validation.
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    pub fn network(&self) -> Option<Network> {
        self.network
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Disassemble into assembly text.
    pub fn to_asm(&self) -> Result<String, ScriptError> {
        Ok(render_asm(&disassemble(&self.bytes)?))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Append raw bytes without any encoding.
    pub fn append_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self.cached_type = None;
        self
    }

    /// Append a single opcode by mnemonic.
    pub fn append_operation(&mut self, name: &str) -> Result<&mut Self, ScriptError> {
        let opcode = opcodes::opcode_by_name(name)?;
        self.bytes.push(opcode.code);
        self.cached_type = None;
        Ok(self)
    }

    /// Append a data push using the minimal encoding for its length.
    ///
    /// Empty data is rejected (`OP_0` pushes the empty value); a single
    /// byte representable as a small-int opcode becomes that opcode;
    /// longer payloads use a direct push or the smallest PUSHDATA form.
    pub fn push_data(&mut self, data: &[u8]) -> Result<&mut Self, ScriptError> {
        if data.is_empty() {
            return Err(ScriptError::EmptyPush);
        }

        if data.len() == 1 {
            match data[0] {
                0 => {
                    self.bytes.push(opcodes::OP_0);
                    self.cached_type = None;
                    return Ok(self);
                }
                n @ 1..=16 => {
                    self.bytes.push(opcodes::OP_1 + n - 1);
                    self.cached_type = None;
                    return Ok(self);
                }
                0x81 => {
                    self.bytes.push(opcodes::OP_1NEGATE);
                    self.cached_type = None;
                    return Ok(self);
                }
                _ => {}
            }
        }

        let len = data.len();
        if len <= MAX_DIRECT_PUSH {
            self.bytes.push(len as u8);
        } else if len <= 0xff {
            self.bytes.push(opcodes::OP_PUSHDATA1);
            self.bytes.push(len as u8);
        } else if len <= 0xffff {
            self.bytes.push(opcodes::OP_PUSHDATA2);
            self.bytes.extend_from_slice(&(len as u16).to_le_bytes());
        } else if len as u64 <= MAX_PUSH_SIZE {
            self.bytes.push(opcodes::OP_PUSHDATA4);
            self.bytes.extend_from_slice(&(len as u32).to_le_bytes());
        } else {
            return Err(ScriptError::PushTooLarge(len));
        }
        self.bytes.extend_from_slice(data);
        self.cached_type = None;
        Ok(self)
    }

    /// Recognize the standard script type, if any.
    ///
    /// The result is cached until the script is mutated, so repeated
    /// calls are cheap and idempotent.
    pub fn detect_type(&mut self) -> Option<ScriptType> {
        if let Some(cached) = self.cached_type {
            return cached;
        }
        let t = templates::classify(&self.bytes);
        self.cached_type = Some(t);
        t
    }

    /// HASH160 of the script bytes, as committed to by P2SH outputs.
    pub fn compute_hash(&self) -> [u8; 20] {
        hash160(&self.bytes)
    }

    /// Derive the canonical address for this script on its network
    /// (mainnet when none is set).
    pub fn address(&mut self) -> Result<String, ScriptError> {
        let network = self.network.unwrap_or(Network::Mainnet);
        let kind = self.detect_type().ok_or_else(|| {
            ScriptError::InvalidScript("script has no standard type".to_string())
        })?;

        match kind {
            ScriptType::P2pk => {
                let key_len = self.bytes[0] as usize;
                let pubkey = &self.bytes[1..1 + key_len];
                let hash = hash160(pubkey);
                Ok(Address::from_public_key_hash(&hash, network).address_string)
            }
            ScriptType::P2pkh => {
                let mut hash = [0u8; 20];
                hash.copy_from_slice(&self.bytes[3..23]);
                Ok(Address::from_public_key_hash(&hash, network).address_string)
            }
            ScriptType::P2sh => {
                let mut hash = [0u8; 20];
                hash.copy_from_slice(&self.bytes[2..22]);
                Ok(Address::from_script_hash(&hash, network).address_string)
            }
            ScriptType::P2wpkh | ScriptType::P2wsh => {
                address::encode_segwit_address(network, 0, &self.bytes[2..])
            }
            other => Err(ScriptError::InvalidScript(format!(
                "{} scripts have no address form",
                other
            ))),
        }
    }

    /// Build a standard locking script.
    pub fn from_standard(
        standard: &StandardScript,
        network: Network,
    ) -> Result<Self, ScriptError> {
        let mut script = Script::new().with_network(network);
        match standard {
            StandardScript::P2pk { pubkey } => {
                check_pubkey(pubkey)?;
                script
                    .push_data(pubkey)?
                    .append_operation("OP_CHECKSIG")?;
            }
            StandardScript::P2pkh { address } => {
                let addr = Address::from_string(address)?;
                check_address(&addr, AddressKind::P2pkh, network)?;
                script
                    .append_operation("OP_DUP")?
                    .append_operation("OP_HASH160")?
                    .push_data(&addr.hash160)?
                    .append_operation("OP_EQUALVERIFY")?
                    .append_operation("OP_CHECKSIG")?;
            }
            StandardScript::P2sh { address } => {
                let addr = Address::from_string(address)?;
                check_address(&addr, AddressKind::P2sh, network)?;
                script
                    .append_operation("OP_HASH160")?
                    .push_data(&addr.hash160)?
                    .append_operation("OP_EQUAL")?;
            }
            StandardScript::P2ms { required, pubkeys } => {
                let m = *required as usize;
                let n = pubkeys.len();
                if m > 15 || n > 15 || m > n || n == 0 {
                    return Err(ScriptError::InvalidScript(format!(
                        "unsupported multisig shape {}-of-{}",
                        m, n
                    )));
                }
                script.append_raw(&[small_int_opcode(m)]);
                for pubkey in pubkeys {
                    check_pubkey(pubkey)?;
                    script.push_data(pubkey)?;
                }
                script
                    .append_raw(&[small_int_opcode(n)])
                    .append_operation("OP_CHECKMULTISIG")?;
            }
            StandardScript::P2wpkh { program } => {
                check_witness_program(program, 20)?;
                script.append_operation("OP_0")?.push_data(program)?;
            }
            StandardScript::P2wsh { program } => {
                check_witness_program(program, 32)?;
                script.append_operation("OP_0")?.push_data(program)?;
            }
            StandardScript::NullData { data } => {
                if data.is_empty() {
                    return Err(ScriptError::EmptyPush);
                }
                script.append_operation("OP_RETURN")?;
                if data.len() <= MAX_DIRECT_PUSH {
                    script.append_raw(&[data.len() as u8]);
                } else if data.len() <= 0xff {
                    script.append_raw(&[opcodes::OP_PUSHDATA1, data.len() as u8]);
                } else {
                    return Err(ScriptError::PushTooLarge(data.len()));
                }
                script.append_raw(data);
            }
        }
        Ok(script)
    }
}

/// Parameters for the standard locking script shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandardScript {
    P2pk { pubkey: Vec<u8> },
    P2pkh { address: String },
    P2sh { address: String },
    P2ms { required: u8, pubkeys: Vec<Vec<u8>> },
    P2wpkh { program: Vec<u8> },
    P2wsh { program: Vec<u8> },
    NullData { data: Vec<u8> },
}

fn small_int_opcode(n: usize) -> u8 {
    if n == 0 {
        opcodes::OP_0
    } else {
        opcodes::OP_1 + n as u8 - 1
    }
}

fn check_pubkey(pubkey: &[u8]) -> Result<(), ScriptError> {
    if pubkey.len() != 33 && pubkey.len() != 65 {
        return Err(ScriptError::InvalidScript(format!(
            "public key must be 33 or 65 bytes, got {}",
            pubkey.len()
        )));
    }
    Ok(())
}

fn check_address(
    addr: &Address,
    kind: AddressKind,
    network: Network,
) -> Result<(), ScriptError> {
    if addr.network != network {
        return Err(ScriptError::NetworkCheckError(format!(
            "address {} belongs to {:?}, script targets {:?}",
            addr.address_string, addr.network, network
        )));
    }
    if addr.kind != kind {
        return Err(ScriptError::InvalidAddress(format!(
            "address {} is {:?}, expected {:?}",
            addr.address_string, addr.kind, kind
        )));
    }
    Ok(())
}

fn check_witness_program(program: &[u8], want: usize) -> Result<(), ScriptError> {
    if program.len() != want {
        return Err(ScriptError::SegwitProgramError(format!(
            "witness program must be {} bytes, got {}",
            want,
            program.len()
        )));
    }
    Ok(())
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Script {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes && self.network == other.network
    }
}

impl Eq for Script {}

impl fmt::Display for Script {
    /// Display the script as hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl Serialize for Script {
    /// Serialize as a hex string.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Script {
    /// Deserialize from a hex string.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    //! Script building, push encoding boundaries, type detection and its
    //! cache, standard script construction, and address derivation.

    use super::*;

    // -----------------------------------------------------------------------
    // Builder and push encoding
    // -----------------------------------------------------------------------

    /// Empty pushes are rejected outright.
    #[test]
    fn test_push_data_empty() {
        assert_eq!(
            Script::new().push_data(&[]).unwrap_err(),
            ScriptError::EmptyPush
        );
    }

    /// Single bytes with small-int encodings become opcodes.
    #[test]
    fn test_push_data_small_ints() {
        let mut s = Script::new();
        s.push_data(&[0]).unwrap();
        assert_eq!(s.as_bytes(), &[opcodes::OP_0]);

        let mut s = Script::new();
        s.push_data(&[5]).unwrap();
        assert_eq!(s.as_bytes(), &[opcodes::OP_5]);

        let mut s = Script::new();
        s.push_data(&[16]).unwrap();
        assert_eq!(s.as_bytes(), &[opcodes::OP_16]);

        let mut s = Script::new();
        s.push_data(&[0x81]).unwrap();
        assert_eq!(s.as_bytes(), &[opcodes::OP_1NEGATE]);

        // 17 has no small-int form.
        let mut s = Script::new();
        s.push_data(&[17]).unwrap();
        assert_eq!(s.as_bytes(), &[0x01, 17]);
    }

    /// Length prefixes switch exactly at the 75/255/65535 boundaries.
    #[test]
    fn test_push_data_boundaries() {
        let mut s = Script::new();
        s.push_data(&[0xaa; 75]).unwrap();
        assert_eq!(s.as_bytes()[0], 75);

        let mut s = Script::new();
        s.push_data(&[0xaa; 76]).unwrap();
        assert_eq!(&s.as_bytes()[..2], &[opcodes::OP_PUSHDATA1, 76]);

        let mut s = Script::new();
        s.push_data(&[0xaa; 255]).unwrap();
        assert_eq!(&s.as_bytes()[..2], &[opcodes::OP_PUSHDATA1, 255]);

        let mut s = Script::new();
        s.push_data(&[0xaa; 256]).unwrap();
        assert_eq!(&s.as_bytes()[..3], &[opcodes::OP_PUSHDATA2, 0x00, 0x01]);

        let mut s = Script::new();
        s.push_data(&[0xaa; 65536]).unwrap();
        assert_eq!(
            &s.as_bytes()[..5],
            &[opcodes::OP_PUSHDATA4, 0x00, 0x00, 0x01, 0x00]
        );
    }

    /// Chained building reads like the script it produces.
    #[test]
    fn test_builder_chaining() {
        let mut s = Script::new();
        s.append_operation("OP_DUP")
            .unwrap()
            .append_operation("OP_HASH160")
            .unwrap()
            .push_data(&[0xab; 20])
            .unwrap()
            .append_operation("OP_EQUALVERIFY")
            .unwrap()
            .append_operation("OP_CHECKSIG")
            .unwrap();
        assert_eq!(s.len(), 25);
        assert_eq!(s.as_bytes()[0], opcodes::OP_DUP);
    }

    /// Unknown mnemonics are rejected.
    #[test]
    fn test_append_unknown_operation() {
        assert!(matches!(
            Script::new().append_operation("OP_BOGUS"),
            Err(ScriptError::UnknownOpcode(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Hex / asm round trips
    // -----------------------------------------------------------------------

    #[test]
    fn test_hex_roundtrip() {
        let s = Script::from_hex("76a914ababababababababababababababababababab88ac").unwrap();
        assert_eq!(
            s.to_hex(),
            "76a914ababababababababababababababababababab88ac"
        );
        assert!(Script::from_hex("zz").is_err());
    }

    #[test]
    fn test_asm_roundtrip() {
        let asm = "OP_DUP OP_HASH160 abababababababababababababababababababab OP_EQUALVERIFY OP_CHECKSIG";
        let s = Script::from_asm(asm).unwrap();
        assert_eq!(s.to_asm().unwrap(), asm);
    }

    #[test]
    fn test_display_and_debug() {
        let s = Script::from_hex("51ac").unwrap();
        assert_eq!(format!("{}", s), "51ac");
        assert_eq!(format!("{:?}", s), "Script(51ac)");
    }

    /// Serde round-trips through a JSON hex string.
    #[test]
    fn test_serde_roundtrip() {
        let s = Script::from_hex("76a988ac").unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"76a988ac\"");
        let back: Script = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_bytes(), s.as_bytes());
    }

    // -----------------------------------------------------------------------
    // Type detection and caching
    // -----------------------------------------------------------------------

    /// Detection is idempotent and survives repeated calls.
    #[test]
    fn test_detect_type_idempotent() {
        let mut s = Script::from_hex(&format!("76a914{}88ac", "ab".repeat(20))).unwrap();
        assert_eq!(s.detect_type(), Some(ScriptType::P2pkh));
        assert_eq!(s.detect_type(), Some(ScriptType::P2pkh));
    }

    /// Mutation invalidates the cached type.
    #[test]
    fn test_detect_type_cache_invalidation() {
        let mut s = Script::from_hex(&format!("76a914{}88ac", "ab".repeat(20))).unwrap();
        assert_eq!(s.detect_type(), Some(ScriptType::P2pkh));
        s.append_operation("OP_1").unwrap();
        assert_eq!(s.detect_type(), None);
    }

    /// Untyped results are cached as well.
    #[test]
    fn test_detect_type_none_cached() {
        let mut s = Script::from_hex("7676").unwrap();
        assert_eq!(s.detect_type(), None);
        assert_eq!(s.detect_type(), None);
    }

    // -----------------------------------------------------------------------
    // Standard script construction
    // -----------------------------------------------------------------------

    #[test]
    fn test_from_standard_p2pkh() {
        let script = Script::from_standard(
            &StandardScript::P2pkh {
                address: "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr".to_string(),
            },
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(
            script.to_hex(),
            "76a9148fe80c75c9560e8b56ed64ea3c26e18d2c52211b88ac"
        );
        let mut script = script;
        assert_eq!(script.detect_type(), Some(ScriptType::P2pkh));
    }

    /// Address network must agree with the requested network.
    #[test]
    fn test_from_standard_network_check() {
        let err = Script::from_standard(
            &StandardScript::P2pkh {
                address: "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr".to_string(),
            },
            Network::Testnet,
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::NetworkCheckError(_)));
    }

    #[test]
    fn test_from_standard_p2sh() {
        let mut script = Script::from_standard(
            &StandardScript::P2sh {
                address: "3P14159f73E4gFr7JterCCQh9QjiTjiZrG".to_string(),
            },
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(script.detect_type(), Some(ScriptType::P2sh));
        assert_eq!(
            script.to_hex(),
            "a914e9c3dd0c07aac76179ebc76a6c78d4d67c6c160a87"
        );
    }

    #[test]
    fn test_from_standard_p2pk_and_p2ms() {
        let pubkey = vec![0x02; 33];
        let mut script = Script::from_standard(
            &StandardScript::P2pk {
                pubkey: pubkey.clone(),
            },
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(script.detect_type(), Some(ScriptType::P2pk));

        let mut script = Script::from_standard(
            &StandardScript::P2ms {
                required: 2,
                pubkeys: vec![pubkey.clone(), pubkey.clone(), pubkey.clone()],
            },
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(script.detect_type(), Some(ScriptType::P2ms));
        assert_eq!(script.as_bytes()[0], opcodes::OP_2);
        assert_eq!(script.as_bytes()[script.len() - 2], opcodes::OP_3);

        // A 0-of-n script round-trips through detection as well.
        let mut script = Script::from_standard(
            &StandardScript::P2ms {
                required: 0,
                pubkeys: vec![pubkey.clone(), pubkey.clone()],
            },
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(script.as_bytes()[0], opcodes::OP_0);
        assert_eq!(script.detect_type(), Some(ScriptType::P2ms));

        // Degenerate multisig shapes are rejected.
        assert!(Script::from_standard(
            &StandardScript::P2ms {
                required: 4,
                pubkeys: vec![pubkey.clone()],
            },
            Network::Mainnet,
        )
        .is_err());
        // Bad key length is rejected.
        assert!(Script::from_standard(
            &StandardScript::P2pk {
                pubkey: vec![0x02; 32],
            },
            Network::Mainnet,
        )
        .is_err());
    }

    #[test]
    fn test_from_standard_witness() {
        let mut script = Script::from_standard(
            &StandardScript::P2wpkh {
                program: vec![0xab; 20],
            },
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(script.detect_type(), Some(ScriptType::P2wpkh));

        let mut script = Script::from_standard(
            &StandardScript::P2wsh {
                program: vec![0xcd; 32],
            },
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(script.detect_type(), Some(ScriptType::P2wsh));

        assert!(matches!(
            Script::from_standard(
                &StandardScript::P2wpkh {
                    program: vec![0xab; 21],
                },
                Network::Mainnet,
            ),
            Err(ScriptError::SegwitProgramError(_))
        ));
    }

    /// NULLDATA uses a length-byte push, or PUSHDATA1 beyond 75 bytes.
    #[test]
    fn test_from_standard_nulldata() {
        let mut script = Script::from_standard(
            &StandardScript::NullData {
                data: b"hello".to_vec(),
            },
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(script.detect_type(), Some(ScriptType::NullData));
        assert_eq!(script.as_bytes()[..2], [opcodes::OP_RETURN, 5]);

        let mut script = Script::from_standard(
            &StandardScript::NullData {
                data: vec![0xee; 100],
            },
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(script.detect_type(), Some(ScriptType::NullData));
        assert_eq!(
            script.as_bytes()[..3],
            [opcodes::OP_RETURN, opcodes::OP_PUSHDATA1, 100]
        );

        assert!(matches!(
            Script::from_standard(
                &StandardScript::NullData {
                    data: vec![0xee; 256],
                },
                Network::Mainnet,
            ),
            Err(ScriptError::PushTooLarge(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Hashing and addresses
    // -----------------------------------------------------------------------

    /// compute_hash is HASH160 of the raw bytes.
    #[test]
    fn test_compute_hash() {
        let s = Script::from_hex("51ac").unwrap();
        assert_eq!(s.compute_hash(), crate::hash::hash160(&[0x51, 0xac]));
    }

    /// P2PKH scripts derive the address that built them.
    #[test]
    fn test_address_p2pkh() {
        let mut script = Script::from_standard(
            &StandardScript::P2pkh {
                address: "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr".to_string(),
            },
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(
            script.address().unwrap(),
            "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr"
        );
    }

    /// Witness scripts derive bech32 addresses.
    #[test]
    fn test_address_segwit() {
        let program = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        let mut script = Script::from_standard(
            &StandardScript::P2wpkh { program },
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(
            script.address().unwrap(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );
    }

    /// Scripts without an address form say so.
    #[test]
    fn test_address_unsupported() {
        let mut script = Script::from_standard(
            &StandardScript::NullData {
                data: b"x".to_vec(),
            },
            Network::Mainnet,
        )
        .unwrap();
        assert!(script.address().is_err());
    }
}
