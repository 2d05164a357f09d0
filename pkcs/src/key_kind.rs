use std::fmt::Display;

use crate::algorithm::NamedCurve;

/// Algorithm of a decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    Rsa,
    Ec(NamedCurve),
    Dsa,
    Ed25519,
    Ed448,
    X25519,
    X448,
}

impl KeyAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            KeyAlgorithm::Rsa => "RSA",
            KeyAlgorithm::Ec(_) => "EC",
            KeyAlgorithm::Dsa => "DSA",
            KeyAlgorithm::Ed25519 => "Ed25519",
            KeyAlgorithm::Ed448 => "Ed448",
            KeyAlgorithm::X25519 => "X25519",
            KeyAlgorithm::X448 => "X448",
        }
    }

    /// Key length in bytes for the RFC 8410 algorithms, whose public keys
    /// and private seeds have the same fixed size.
    pub fn octet_key_len(&self) -> Option<usize> {
        match self {
            KeyAlgorithm::Ed25519 | KeyAlgorithm::X25519 => Some(32),
            KeyAlgorithm::Ed448 => Some(57),
            KeyAlgorithm::X448 => Some(56),
            KeyAlgorithm::Rsa | KeyAlgorithm::Ec(_) | KeyAlgorithm::Dsa => None,
        }
    }
}

/// Algorithm plus visibility, e.g. `EC private key (P-256)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Private(KeyAlgorithm),
    Public(KeyAlgorithm),
}

impl KeyKind {
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            KeyKind::Private(algorithm) | KeyKind::Public(algorithm) => *algorithm,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, KeyKind::Private(_))
    }
}

impl Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let visibility = if self.is_private() {
            "private"
        } else {
            "public"
        };
        let algorithm = self.algorithm();
        write!(f, "{} {} key", algorithm.name(), visibility)?;
        if let KeyAlgorithm::Ec(curve) = algorithm {
            write!(f, " ({curve})")?;
        }
        Ok(())
    }
}
