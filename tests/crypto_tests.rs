//! Integration tests for the ColdVault crypto and key modules.

use coldvault::crypto::{
    decrypt, encrypt, passphrase_checksum, verify_checksum, PassphraseKey, NONCE_LEN,
};
use coldvault::keys::{derive_keypair, parse_mnemonic, sign, KeyDeriver, StdSignature};

const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = PassphraseKey::derive("correct horse");
    let plaintext = PHRASE.as_bytes();

    let (ciphertext, nonce) = encrypt(key.as_bytes(), plaintext).expect("encrypt should succeed");
    assert_eq!(nonce.len(), NONCE_LEN);
    // 16-byte GCM tag.
    assert_eq!(ciphertext.len(), plaintext.len() + 16);

    let recovered = decrypt(key.as_bytes(), &ciphertext, &nonce).expect("decrypt should succeed");
    assert_eq!(recovered, plaintext);
}

#[test]
fn nonces_are_fresh() {
    let key = [0xCDu8; 32];
    let (ct1, n1) = encrypt(&key, b"same").unwrap();
    let (ct2, n2) = encrypt(&key, b"same").unwrap();
    assert_ne!(n1, n2);
    assert_ne!(ct1, ct2);
}

#[test]
fn wrong_key_is_fatal() {
    let (ct, nonce) = encrypt(&[1u8; 32], b"data").unwrap();
    let err = decrypt(&[2u8; 32], &ct, &nonce).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn tampered_ciphertext_is_fatal() {
    let (mut ct, nonce) = encrypt(&[1u8; 32], b"data").unwrap();
    ct[0] ^= 0x01;
    assert!(decrypt(&[1u8; 32], &ct, &nonce).unwrap_err().is_fatal());
}

#[test]
fn bad_key_length_is_fatal() {
    assert!(encrypt(&[0u8; 16], b"data").unwrap_err().is_fatal());
}

// ---------------------------------------------------------------------------
// Checksums
// ---------------------------------------------------------------------------

#[test]
fn checksum_is_deterministic_and_distinct() {
    assert_eq!(passphrase_checksum("a"), passphrase_checksum("a"));
    assert_ne!(passphrase_checksum("a"), passphrase_checksum("b"));
    // The checksum is not the key itself.
    assert_ne!(
        passphrase_checksum("a"),
        *PassphraseKey::derive("a").as_bytes()
    );
}

#[test]
fn verify_checksum_matches_only_the_right_passphrase() {
    let stored = passphrase_checksum("secret");
    assert!(verify_checksum("secret", &stored));
    assert!(!verify_checksum("Secret", &stored));
    assert!(!verify_checksum("secret", &stored[..31]));
}

// ---------------------------------------------------------------------------
// Key derivation and signing
// ---------------------------------------------------------------------------

#[test]
fn known_mnemonic_gives_stable_address() {
    let a = derive_keypair(PHRASE).unwrap();
    assert_eq!(a.address(), "coinex193t97nfaqlt8qusv4h2mw7ry6qfc444mcukt4d");
    assert_eq!(derive_keypair(PHRASE).unwrap().address(), a.address());
}

#[test]
fn different_mnemonics_give_different_addresses() {
    let other = "legal winner thank year wave sausage worth useful legal winner thank yellow";
    assert_ne!(
        derive_keypair(PHRASE).unwrap().address(),
        derive_keypair(other).unwrap().address()
    );
}

#[test]
fn invalid_mnemonic_is_a_user_error() {
    let err = parse_mnemonic("not a real mnemonic phrase").unwrap_err();
    assert!(!err.is_fatal());
}

#[test]
fn sign_returns_verifiable_signature() {
    let (sig, pk) = sign(PHRASE, b"hello").unwrap();
    let kp = derive_keypair(PHRASE).unwrap();
    assert_eq!(pk, kp.public_key_bytes());
    assert!(KeyDeriver::new().verify(&pk, b"hello", &sig));
}

#[test]
fn std_signature_json_shape() {
    let (sig, pk) = sign(PHRASE, b"hello").unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&StdSignature::new(&sig, &pk).to_json().unwrap()).unwrap();
    assert_eq!(json["pub_key"]["type"], "tendermint/PubKeySecp256k1");
    assert!(json["pub_key"]["value"].is_string());
    assert!(json["signature"].is_string());
}
