//! Bitcoin address handling.
//!
//! Supports P2PKH and P2SH addresses in Base58Check with SHA-256d
//! checksums, witness v0 addresses in bech32, and mainnet/testnet
//! discrimination.

use std::fmt;

use bech32::{FromBase32, ToBase32, Variant};

use crate::error::ScriptError;
use crate::hash::{hash160, sha256d};

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Mainnet P2SH address version byte.
const MAINNET_P2SH: u8 = 0x05;
/// Testnet P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x6f;
/// Testnet P2SH address version byte.
const TESTNET_P2SH: u8 = 0xc4;

/// Bitcoin network type for address prefix selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Bitcoin mainnet (P2PKH prefix 0x00, P2SH prefix 0x05, HRP "bc").
    Mainnet,
    /// Bitcoin testnet (P2PKH prefix 0x6f, P2SH prefix 0xc4, HRP "tb").
    Testnet,
}

impl Network {
    fn p2pkh_version(self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet => TESTNET_P2PKH,
        }
    }

    fn p2sh_version(self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_P2SH,
            Network::Testnet => TESTNET_P2SH,
        }
    }

    /// Human-readable part for bech32 addresses.
    fn hrp(self) -> &'static str {
        match self {
            Network::Mainnet => "bc",
            Network::Testnet => "tb",
        }
    }
}

/// What a Base58Check address pays to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressKind {
    P2pkh,
    P2sh,
}

/// A legacy Bitcoin address.
///
/// Contains the 20-byte hash, the kind (pubkey hash or script hash),
/// and the network it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The human-readable Base58Check address string.
    pub address_string: String,
    /// The 20-byte RIPEMD-160(SHA-256(..)) hash the address commits to.
    pub hash160: [u8; 20],
    /// Pubkey-hash or script-hash address.
    pub kind: AddressKind,
    /// The network this address belongs to.
    pub network: Network,
}

impl Address {
    /// Parse a Base58Check-encoded address string.
    ///
    /// Decodes the string, validates the checksum, and detects kind and
    /// network from the version byte.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let decoded = bs58::decode(addr)
            .into_vec()
            .map_err(|_| ScriptError::InvalidAddress(format!("bad char for '{}'", addr)))?;

        if decoded.len() != 25 {
            return Err(ScriptError::InvalidAddress(format!(
                "'{}' decodes to {} bytes, want 25",
                addr,
                decoded.len()
            )));
        }

        // Last 4 bytes must equal sha256d of the first 21.
        let checksum = sha256d(&decoded[..21]);
        if decoded[21..25] != checksum[..4] {
            return Err(ScriptError::InvalidAddress(format!(
                "checksum mismatch for '{}'",
                addr
            )));
        }

        let (kind, network) = match decoded[0] {
            MAINNET_P2PKH => (AddressKind::P2pkh, Network::Mainnet),
            MAINNET_P2SH => (AddressKind::P2sh, Network::Mainnet),
            TESTNET_P2PKH => (AddressKind::P2pkh, Network::Testnet),
            TESTNET_P2SH => (AddressKind::P2sh, Network::Testnet),
            v => {
                return Err(ScriptError::InvalidAddress(format!(
                    "unsupported version byte 0x{:02x} in '{}'",
                    v, addr
                )))
            }
        };

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&decoded[1..21]);

        Ok(Address {
            address_string: addr.to_string(),
            hash160: hash,
            kind,
            network,
        })
    }

    fn encode(version: u8, hash: &[u8; 20]) -> String {
        let mut payload = Vec::with_capacity(25);
        payload.push(version);
        payload.extend_from_slice(hash);
        let checksum = sha256d(&payload);
        payload.extend_from_slice(&checksum[..4]);
        bs58::encode(&payload).into_string()
    }

    /// Create a P2PKH address from a 20-byte public key hash.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        Address {
            address_string: Self::encode(network.p2pkh_version(), hash),
            hash160: *hash,
            kind: AddressKind::P2pkh,
            network,
        }
    }

    /// Create a P2SH address from a 20-byte script hash.
    pub fn from_script_hash(hash: &[u8; 20], network: Network) -> Self {
        Address {
            address_string: Self::encode(network.p2sh_version(), hash),
            hash160: *hash,
            kind: AddressKind::P2sh,
            network,
        }
    }

    /// Create a P2PKH address from a hex-encoded public key string.
    pub fn from_public_key_string(
        pub_key_hex: &str,
        network: Network,
    ) -> Result<Self, ScriptError> {
        let pub_key_bytes = hex::decode(pub_key_hex)?;
        let h = hash160(&pub_key_bytes);
        Ok(Self::from_public_key_hash(&h, network))
    }
}

impl fmt::Display for Address {
    /// Display the address as its Base58Check string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

/// Encode a witness program as a bech32 address.
///
/// Only witness version 0 programs of 20 or 32 bytes are accepted.
pub fn encode_segwit_address(
    network: Network,
    version: u8,
    program: &[u8],
) -> Result<String, ScriptError> {
    if version != 0 {
        return Err(ScriptError::SegwitProgramError(format!(
            "unsupported witness version {}",
            version
        )));
    }
    if program.len() != 20 && program.len() != 32 {
        return Err(ScriptError::SegwitProgramError(format!(
            "witness v0 program must be 20 or 32 bytes, got {}",
            program.len()
        )));
    }

    let v = bech32::u5::try_from_u8(version)
        .map_err(|e| ScriptError::SegwitProgramError(e.to_string()))?;
    let mut data = vec![v];
    data.extend_from_slice(&program.to_base32());
    bech32::encode(network.hrp(), data, Variant::Bech32)
        .map_err(|e| ScriptError::SegwitProgramError(e.to_string()))
}

/// Decode a bech32 segwit address into network, witness version, and
/// program bytes.
pub fn decode_segwit_address(addr: &str) -> Result<(Network, u8, Vec<u8>), ScriptError> {
    let (hrp, data, variant) =
        bech32::decode(addr).map_err(|e| ScriptError::InvalidAddress(e.to_string()))?;

    let network = match hrp.as_str() {
        "bc" => Network::Mainnet,
        "tb" => Network::Testnet,
        other => {
            return Err(ScriptError::InvalidAddress(format!(
                "unknown address prefix '{}'",
                other
            )))
        }
    };

    let (version, rest) = match data.split_first() {
        Some((v, rest)) => (v.to_u8(), rest),
        None => {
            return Err(ScriptError::SegwitProgramError(
                "address carries no witness version".to_string(),
            ))
        }
    };

    if version != 0 {
        return Err(ScriptError::SegwitProgramError(format!(
            "unsupported witness version {}",
            version
        )));
    }
    if variant != Variant::Bech32 {
        return Err(ScriptError::SegwitProgramError(
            "witness v0 addresses use the bech32 variant".to_string(),
        ));
    }

    let program =
        Vec::<u8>::from_base32(rest).map_err(|e| ScriptError::InvalidAddress(e.to_string()))?;
    if program.len() != 20 && program.len() != 32 {
        return Err(ScriptError::SegwitProgramError(format!(
            "witness v0 program must be 20 or 32 bytes, got {}",
            program.len()
        )));
    }

    Ok((network, version, program))
}
