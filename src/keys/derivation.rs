//! Deterministic key derivation from a BIP-39 mnemonic.
//!
//! Pipeline:
//!
//! ```text
//! mnemonic + "" ──PBKDF2──▶ 64-byte seed ──BIP-32──▶ m/44'/688'/0'/0/0
//!   ──▶ secp256k1 keypair ──RIPEMD160(SHA256(pubkey))──▶ bech32("coinex", …)
//! ```
//!
//! The same mnemonic always yields the same keypair and address, which is
//! what lets the vanity search keep nothing but the mnemonic of a match.

use bech32::{ToBase32, Variant};
use bip39::{Language, Mnemonic};
use bitcoin::bip32::{ChildNumber, DerivationPath, Xpriv};
use bitcoin::secp256k1::{All, PublicKey, Secp256k1, SecretKey};
use bitcoin::Network;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::errors::{ColdVaultError, Result};

/// SLIP-44 coin type of the target chain.
pub const COIN_TYPE: u32 = 688;

/// Human-readable part of every account address.
pub const ADDRESS_HRP: &str = "coinex";

/// Literal text every address starts with (`HRP` + bech32 separator).
pub const ADDRESS_PREFIX: &str = "coinex1";

/// BIP-39 passphrase mixed into the seed.  Always empty.
pub const BIP39_PASSPHRASE: &str = "";

/// A derived secp256k1 keypair and its address.
///
/// Deliberately neither `Clone` nor `Debug` so the secret key does not
/// leak into logs or linger in copies.
pub struct Keypair {
    secret_key: SecretKey,
    public_key: PublicKey,
    address: String,
}

impl Keypair {
    /// The account address (`coinex1…`).
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The 33-byte compressed public key.
    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.public_key.serialize()
    }

    /// The 32-byte private key.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.secret_key.secret_bytes()
    }

    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub(crate) fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

/// Reusable derivation context.
///
/// Building a secp256k1 context is not free, so hot loops (the vanity
/// search) keep one `KeyDeriver` per thread instead of calling
/// [`derive_keypair`] repeatedly.
pub struct KeyDeriver {
    secp: Secp256k1<All>,
    path: DerivationPath,
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDeriver {
    /// Create a deriver for the fixed path `m/44'/688'/0'/0/0`.
    pub fn new() -> Self {
        let path = DerivationPath::from(vec![
            ChildNumber::Hardened { index: 44 },
            ChildNumber::Hardened { index: COIN_TYPE },
            ChildNumber::Hardened { index: 0 },
            ChildNumber::Normal { index: 0 },
            ChildNumber::Normal { index: 0 },
        ]);
        Self {
            secp: Secp256k1::new(),
            path,
        }
    }

    /// The derivation path used for every account.
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    pub(crate) fn secp(&self) -> &Secp256k1<All> {
        &self.secp
    }

    /// Parse `phrase` and derive its keypair.
    pub fn derive(&self, phrase: &str) -> Result<Keypair> {
        let mnemonic = parse_mnemonic(phrase)?;
        self.derive_from_mnemonic(&mnemonic)
    }

    /// Derive the keypair for an already parsed mnemonic.
    pub fn derive_from_mnemonic(&self, mnemonic: &Mnemonic) -> Result<Keypair> {
        let seed = mnemonic.to_seed(BIP39_PASSPHRASE);

        let master = Xpriv::new_master(Network::Bitcoin, &seed)
            .map_err(|e| ColdVaultError::KeyDerivationFailed(e.to_string()))?;
        let child = master
            .derive_priv(&self.secp, &self.path)
            .map_err(|e| ColdVaultError::KeyDerivationFailed(e.to_string()))?;

        let secret_key = child.private_key;
        let public_key = PublicKey::from_secret_key(&self.secp, &secret_key);
        let address = encode_address(&public_key)?;

        Ok(Keypair {
            secret_key,
            public_key,
            address,
        })
    }
}

/// Derive `(private key, public key, address)` for a mnemonic phrase.
pub fn derive_keypair(phrase: &str) -> Result<Keypair> {
    KeyDeriver::new().derive(phrase)
}

/// Parse an English BIP-39 phrase.
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    Mnemonic::parse_in(Language::English, phrase)
        .map_err(|e| ColdVaultError::InvalidMnemonic(e.to_string()))
}

/// Encode 32 bytes of entropy as a 24-word mnemonic.
pub fn mnemonic_from_entropy(entropy: &[u8; 32]) -> Result<Mnemonic> {
    Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|e| ColdVaultError::KeyDerivationFailed(format!("mnemonic encoding: {e}")))
}

/// Bech32 address of a public key: `coinex1` + RIPEMD160(SHA256(pubkey)).
pub fn encode_address(public_key: &PublicKey) -> Result<String> {
    let sha = Sha256::digest(public_key.serialize());
    let hash160 = Ripemd160::digest(sha);

    bech32::encode(ADDRESS_HRP, hash160.to_base32(), Variant::Bech32)
        .map_err(|e| ColdVaultError::KeyDerivationFailed(format!("bech32 encoding: {e}")))
}
