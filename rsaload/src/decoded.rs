use pkcs::{KeyAlgorithm, KeyKind};

use crate::key::{RsaPrivateKey, RsaPublicKey};

/// Whatever a cascade format recognised, before narrowing to RSA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DecodedKey {
    RsaPrivate(RsaPrivateKey),
    RsaPublic(RsaPublicKey),
    /// Structurally valid key of another algorithm.
    Foreign(KeyKind),
}

impl DecodedKey {
    pub(crate) fn kind(&self) -> KeyKind {
        match self {
            DecodedKey::RsaPrivate(_) => KeyKind::Private(KeyAlgorithm::Rsa),
            DecodedKey::RsaPublic(_) => KeyKind::Public(KeyAlgorithm::Rsa),
            DecodedKey::Foreign(kind) => *kind,
        }
    }
}
