//! Key derivation and signing.
//!
//! - `derivation`: mnemonic → BIP-32 keypair → bech32 address
//! - `signing`: deterministic secp256k1 ECDSA and the signature envelope

pub mod derivation;
pub mod signing;

pub use derivation::{
    derive_keypair, encode_address, mnemonic_from_entropy, parse_mnemonic, KeyDeriver, Keypair,
    ADDRESS_HRP, ADDRESS_PREFIX, COIN_TYPE,
};
pub use signing::{sign, StdSignature, SIGNATURE_LEN};
