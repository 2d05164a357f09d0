//! PEM armor and password protection.

use codec::decoder::Decoder;
use log::debug;
use pem::{Label, Pem};
use pkcs::pkcs8::EncryptedPrivateKeyInfo;

use crate::error::{DecryptError, Result};

/// Cleartext DER of the first PEM block, with the label it was found under.
#[derive(Debug)]
pub(crate) struct Block {
    pub(crate) label: Label,
    pub(crate) bytes: Vec<u8>,
}

/// Parses the first PEM block of `input` and decrypts it if needed.
///
/// A `DEK-Info` header selects legacy OpenSSL encryption; an
/// `ENCRYPTED PRIVATE KEY` label selects PKCS#8 PBES2. Decryption is tried
/// once; an empty password is rejected before any work is done.
pub(crate) fn open(input: &[u8], password: &str) -> Result<Block> {
    let trimmed = input.trim_ascii();
    let pem: Pem = trimmed.decode()?;

    if pem.is_encrypted() {
        if password.is_empty() {
            return Err(DecryptError::MissingPassword.into());
        }
        debug!("decrypting legacy encrypted {} block", pem.label());
        let decrypted = pem
            .decrypt(password.as_bytes())
            .map_err(DecryptError::from)?;
        return Ok(Block {
            label: decrypted.label().clone(),
            bytes: decrypted.decode()?,
        });
    }

    let bytes: Vec<u8> = pem.decode()?;
    if *pem.label() != Label::EncryptedPrivateKey {
        return Ok(Block {
            label: pem.label().clone(),
            bytes,
        });
    }

    if password.is_empty() {
        return Err(DecryptError::MissingPassword.into());
    }
    let info = EncryptedPrivateKeyInfo::from_der(&bytes).map_err(DecryptError::from)?;
    debug!(
        "decrypting {} block with {}",
        pem.label(),
        info.encryption_algorithm.algorithm()
    );
    let bytes = info
        .decrypt(password.as_bytes())
        .map_err(DecryptError::from)?;
    Ok(Block {
        label: pem.label().clone(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::Error;

    const PASSWORD: &str = "correct-horse";

    fn fixture(name: &str) -> Vec<u8> {
        let path = format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"));
        std::fs::read(path).unwrap()
    }

    #[rstest]
    #[case::aes128("rsa2048_aes128.pem", Label::RSAPrivateKey)]
    #[case::des3("rsa2048_des3.pem", Label::RSAPrivateKey)]
    #[case::pbes2("rsa2048_pbes2.pem", Label::EncryptedPrivateKey)]
    fn test_open_encrypted(#[case] name: &str, #[case] label: Label) {
        let block = open(&fixture(name), PASSWORD).unwrap();

        assert_eq!(label, block.label);
        assert_eq!(0x30, block.bytes[0]);
    }

    #[test]
    fn test_legacy_decryption_matches_cleartext() {
        let cleartext = open(&fixture("rsa2048_pkcs1.pem"), "").unwrap();

        for name in ["rsa2048_aes128.pem", "rsa2048_des3.pem"] {
            let block = open(&fixture(name), PASSWORD).unwrap();
            assert_eq!(cleartext.bytes, block.bytes);
        }
    }

    #[rstest]
    #[case::aes128("rsa2048_aes128.pem", "wrong-password")]
    #[case::des3("rsa2048_des3.pem", "wrong-password")]
    #[case::pbes2("rsa2048_pbes2.pem", "wrong-password")]
    #[case::aes128_valid_padding("rsa2048_aes128.pem", "wrong-340")]
    #[case::des3_valid_padding("rsa2048_des3.pem", "wrong-34")]
    #[case::pbes2_valid_padding("rsa2048_pbes2.pem", "wrong-242")]
    fn test_open_wrong_password(#[case] name: &str, #[case] password: &str) {
        let err = open(&fixture(name), password).unwrap_err();

        assert!(matches!(err, Error::Decrypt(_)));

        assert_eq!(
            "error decrypting PEM block: decryption password incorrect",
            err.to_string()
        );
    }

    #[rstest]
    #[case::aes128("rsa2048_aes128.pem")]
    #[case::pbes2("rsa2048_pbes2.pem")]
    fn test_open_missing_password(#[case] name: &str) {
        let err = open(&fixture(name), "").unwrap_err();

        assert!(matches!(
            err,
            Error::Decrypt(DecryptError::MissingPassword)
        ));
        assert_eq!("error decrypting PEM block: missing password", err.to_string());
    }

    #[test]
    fn test_open_ignores_password_for_cleartext() {
        let with = open(&fixture("rsa2048_pkcs8.pem"), PASSWORD).unwrap();
        let without = open(&fixture("rsa2048_pkcs8.pem"), "").unwrap();

        assert_eq!(Label::PrivateKey, with.label);
        assert_eq!(with.bytes, without.bytes);
    }

    #[test]
    fn test_open_skips_non_utf8_explanatory_text() {
        let mut input = b"Comment: caf\xe9\n".to_vec();
        input.extend(fixture("rsa2048_pkcs1.pem"));

        let block = open(&input, "").unwrap();

        assert_eq!(Label::RSAPrivateKey, block.label);
        assert_eq!(open(&fixture("rsa2048_pkcs1.pem"), "").unwrap().bytes, block.bytes);
    }

    #[test]
    fn test_open_skips_explanatory_text() {
        let mut input = b"\n  Subject: test key\n\n".to_vec();
        input.extend(fixture("rsa2048_spki.pem"));
        input.extend(b"\n\n   \n");

        let block = open(&input, "").unwrap();

        assert_eq!(Label::PublicKey, block.label);
    }

    #[rstest]
    #[case::empty(b"")]
    #[case::whitespace(b" \n\t\r\n")]
    #[case::no_armor(b"MIIBCgKCAQEAvKPBW4YDwLzslrQ0UHi0JJuGAEsgLBIjwubhInydmNE29qmGsT0x")]
    #[case::garbled_boundary(b"\xff\xfe-----BEGIN PUBLIC KEY-----")]
    fn test_open_invalid_envelope(#[case] input: &[u8]) {
        let err = open(input, "").unwrap_err();

        assert!(matches!(err, Error::Pem(_)));
        assert!(err.to_string().starts_with("invalid PEM key file: "));
    }
}
