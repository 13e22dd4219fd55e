use crate::foundation::{Address, GuardError, RECOVERABLE_SIGNATURE_SIZE};
use crate::infrastructure::verifier::SignatureVerifier;
use alloy_primitives::eip191_hash_message;
use async_trait::async_trait;
use log::trace;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};

/// Ethereum `personal_sign` verification: keccak-256 over the EIP-191 prefixed
/// payload, secp256k1 public-key recovery, address comparison.
#[derive(Clone, Copy, Debug, Default)]
pub struct Eip191Verifier;

impl Eip191Verifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SignatureVerifier for Eip191Verifier {
    async fn verify(&self, payload: &[u8], signature: &[u8], claimed_signer: &Address) -> Result<bool, GuardError> {
        let recovered = recover_signer(payload, signature);
        trace!("eip191 verify claimed={} recovered={:?}", claimed_signer, recovered);
        Ok(recovered.as_ref() == Some(claimed_signer))
    }
}

/// Recovers the signing address, or `None` for malformed signatures.
pub fn recover_signer(payload: &[u8], signature: &[u8]) -> Option<Address> {
    if signature.len() != RECOVERABLE_SIGNATURE_SIZE {
        return None;
    }
    let v = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        _ => return None,
    };
    let recovery_id = RecoveryId::from_i32(i32::from(v)).ok()?;
    let sig = RecoverableSignature::from_compact(&signature[..64], recovery_id).ok()?;
    let digest = eip191_hash_message(payload);
    let message = Message::from_digest_slice(digest.as_slice()).ok()?;
    let public_key = SECP256K1.recover_ecdsa(&message, &sig).ok()?;
    Some(address_from_public_key(&public_key))
}

pub fn address_from_public_key(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();
    Address::from_raw_public_key(&uncompressed[1..])
}

pub fn address_from_secret_key(secret_key: &SecretKey) -> Address {
    address_from_public_key(&PublicKey::from_secret_key(SECP256K1, secret_key))
}

/// Produces a 65-byte `r || s || v` signature with `v` in {27, 28}.
pub fn sign_eip191(secret_key: &SecretKey, payload: &[u8]) -> Result<[u8; RECOVERABLE_SIGNATURE_SIZE], GuardError> {
    let digest = eip191_hash_message(payload);
    let message = Message::from_digest_slice(digest.as_slice()).map_err(|err| GuardError::EncodingError(err.to_string()))?;
    let (recovery_id, compact) = SECP256K1.sign_ecdsa_recoverable(&message, secret_key).serialize_compact();
    let mut out = [0u8; RECOVERABLE_SIGNATURE_SIZE];
    out[..64].copy_from_slice(&compact);
    // Recovery ids are 0..=3; only 0 and 1 occur for valid secp256k1 signatures.
    out[64] = 27 + recovery_id.to_i32() as u8;
    Ok(out)
}
