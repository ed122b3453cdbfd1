//! Deterministic ECDSA signing over secp256k1.
//!
//! The payload is hashed with SHA-256 and signed with RFC 6979 nonces.
//! Signatures are the 64-byte compact `r || s` form with low-S, which is
//! what Tendermint-based chains verify.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bitcoin::secp256k1::{ecdsa, Message, PublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::derivation::{KeyDeriver, Keypair};
use crate::errors::{ColdVaultError, Result};

/// Length of a compact ECDSA signature.
pub const SIGNATURE_LEN: usize = 64;

/// Amino type tag of a secp256k1 public key.
pub const PUBKEY_TYPE: &str = "tendermint/PubKeySecp256k1";

impl KeyDeriver {
    /// Sign `payload` with `keypair`.
    pub fn sign(&self, keypair: &Keypair, payload: &[u8]) -> [u8; SIGNATURE_LEN] {
        let msg = Message::from_digest(Sha256::digest(payload).into());
        self.secp()
            .sign_ecdsa(&msg, keypair.secret_key())
            .serialize_compact()
    }

    /// Check a compact signature against a serialized public key.
    pub fn verify(&self, public_key: &[u8], payload: &[u8], signature: &[u8]) -> bool {
        let (Ok(pk), Ok(sig)) = (
            PublicKey::from_slice(public_key),
            ecdsa::Signature::from_compact(signature),
        ) else {
            return false;
        };
        let msg = Message::from_digest(Sha256::digest(payload).into());
        self.secp().verify_ecdsa(&msg, &sig, &pk).is_ok()
    }
}

/// Re-derive the keypair for `mnemonic` and sign `payload`.
///
/// Returns `(signature, compressed public key)`.
pub fn sign(mnemonic: &str, payload: &[u8]) -> Result<([u8; SIGNATURE_LEN], [u8; 33])> {
    let deriver = KeyDeriver::new();
    let keypair = deriver.derive(mnemonic)?;
    let signature = deriver.sign(&keypair, payload);
    Ok((signature, keypair.public_key().serialize()))
}

/// Typed public key inside a [`StdSignature`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedPubKey {
    #[serde(rename = "type")]
    pub kind: String,
    /// Base64 of the 33-byte compressed key.
    pub value: String,
}

/// Signature envelope handed back to the wallet that asked for a signature.
///
/// ```json
/// {"pub_key":{"type":"tendermint/PubKeySecp256k1","value":"…"},"signature":"…"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: TypedPubKey,
    /// Base64 of the 64-byte compact signature.
    pub signature: String,
}

impl StdSignature {
    pub fn new(signature: &[u8], public_key: &[u8]) -> Self {
        Self {
            pub_key: TypedPubKey {
                kind: PUBKEY_TYPE.to_string(),
                value: BASE64.encode(public_key),
            },
            signature: BASE64.encode(signature),
        }
    }

    /// Compact JSON, the form that gets shown to the user.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ColdVaultError::SerializationError(format!("signature: {e}")))
    }
}
