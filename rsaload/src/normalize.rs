use crate::decoded::DecodedKey;
use crate::error::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};

pub(crate) fn private_key(key: DecodedKey) -> Result<RsaPrivateKey> {
    match key {
        DecodedKey::RsaPrivate(key) => Ok(key),
        DecodedKey::RsaPublic(_) | DecodedKey::Foreign(_) => {
            Err(Error::UnsupportedKeyType(key.kind()))
        }
    }
}

/// Private RSA material is reduced to its public half.
pub(crate) fn public_key(key: DecodedKey) -> Result<RsaPublicKey> {
    match key {
        DecodedKey::RsaPrivate(key) => Ok(key.into_public_key()),
        DecodedKey::RsaPublic(key) => Ok(key),
        DecodedKey::Foreign(kind) => Err(Error::UnsupportedKeyType(kind)),
    }
}
