pub mod encryption;
pub mod error;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use codec::decoder::{DecodableFrom, Decoder};
use error::Error;
use regex::Regex;

const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";
const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";
const EC_PRIVATE_KEY_LABEL: &str = "EC PRIVATE KEY";
const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";
const CERTIFICATE_LABEL: &str = "CERTIFICATE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// PKCS#8 private key (non-encrypted)
    PrivateKey,
    /// PKCS#8 encrypted private key
    EncryptedPrivateKey,
    /// PKCS#1 RSA private key
    RSAPrivateKey,
    /// SEC1 EC private key
    ECPrivateKey,
    /// X.509 SubjectPublicKeyInfo
    PublicKey,
    /// PKCS#1 RSA public key
    RSAPublicKey,
    /// X.509 Certificate
    Certificate,
    /// Any other well-formed label, kept verbatim.
    Other(String),
}

impl Label {
    pub fn as_str(&self) -> &str {
        match self {
            Label::PrivateKey => PRIVATE_KEY_LABEL,
            Label::EncryptedPrivateKey => ENCRYPTED_PRIVATE_KEY_LABEL,
            Label::RSAPrivateKey => RSA_PRIVATE_KEY_LABEL,
            Label::ECPrivateKey => EC_PRIVATE_KEY_LABEL,
            Label::PublicKey => PUBLIC_KEY_LABEL,
            Label::RSAPublicKey => RSA_PUBLIC_KEY_LABEL,
            Label::Certificate => CERTIFICATE_LABEL,
            Label::Other(label) => label,
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PRIVATE_KEY_LABEL => Ok(Label::PrivateKey),
            ENCRYPTED_PRIVATE_KEY_LABEL => Ok(Label::EncryptedPrivateKey),
            RSA_PRIVATE_KEY_LABEL => Ok(Label::RSAPrivateKey),
            EC_PRIVATE_KEY_LABEL => Ok(Label::ECPrivateKey),
            PUBLIC_KEY_LABEL => Ok(Label::PublicKey),
            RSA_PUBLIC_KEY_LABEL => Ok(Label::RSAPublicKey),
            CERTIFICATE_LABEL => Ok(Label::Certificate),
            "" => Err(Error::InvalidLabel),
            // RFC 7468: a hyphen may only join two label characters.
            s if s.starts_with('-') || s.ends_with('-') || s.contains("--") => {
                Err(Error::InvalidLabel)
            }
            s => Ok(Label::Other(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Begin,
    End,
}

impl Label {
    fn get_boundary(line: &str) -> Result<(Boundary, Label), Error> {
        let re = Regex::new(r"^-----(BEGIN|END) ([^-]*(?:-[^-]+)*)-----\s*$")
            .map_err(|_| Error::InvalidEncapsulationBoundary)?;
        let captured = re
            .captures(line)
            .ok_or(Error::InvalidEncapsulationBoundary)?;
        let boundary = match captured.get(1).map(|m| m.as_str()) {
            Some("BEGIN") => Boundary::Begin,
            Some("END") => Boundary::End,
            _ => return Err(Error::InvalidEncapsulationBoundary),
        };
        let label = captured
            .get(2)
            .ok_or(Error::InvalidEncapsulationBoundary)
            .and_then(|c| Label::from_str(c.as_str()))?;
        Ok((boundary, label))
    }
}

/*
ref: https://www.rfc-editor.org/rfc/rfc7468.html#section-3
ref: https://www.rfc-editor.org/rfc/rfc1421.html#section-4.4 (encapsulated headers)
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem {
    label: Label,
    headers: Vec<(String, String)>,
    base64_data: String, // base64 encoded data
}

impl Pem {
    pub fn new(label: Label, base64_data: String) -> Self {
        Pem {
            label,
            headers: Vec::new(),
            base64_data,
        }
    }

    pub fn from_bytes(label: Label, data: &[u8]) -> Self {
        Pem::new(label, STANDARD.encode(data))
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// RFC 1421 headers in the order they appeared.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn data(&self) -> &str {
        &self.base64_data
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----BEGIN {}-----", self.label)?;
        if !self.headers.is_empty() {
            for (name, value) in &self.headers {
                writeln!(f, "{}: {}", name, value)?;
            }
            writeln!(f)?;
        }
        // RFC 7468: base64 text should be wrapped at 64 characters
        for chunk in self.base64_data.as_bytes().chunks(64) {
            let line = std::str::from_utf8(chunk).map_err(|_| std::fmt::Error)?;
            writeln!(f, "{}", line)?;
        }
        write!(f, "-----END {}-----", self.label)
    }
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        // This discards the label and headers.
        STANDARD.decode(self.data()).map_err(Error::Base64Decode)
    }
}

impl DecodableFrom<String> for Pem {}

impl Decoder<String, Pem> for String {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}

impl DecodableFrom<&str> for Pem {}

impl Decoder<&str, Pem> for &str {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}

impl DecodableFrom<&[u8]> for Pem {}

/// Bytes that are not UTF-8 are replaced before parsing. Outside the armor
/// they are explanatory text and skipped; inside it they fail the label or
/// base64 checks.
impl Decoder<&[u8], Pem> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(&String::from_utf8_lossy(self))
    }
}

/// Parses the first PEM block of `s`.
///
/// Text before the first BEGIN line is treated as explanatory text and
/// skipped, as is everything after the matching END line.
impl FromStr for Pem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut state = PemParsingState::default();
        let mut label = None;
        let mut headers: Vec<(String, String)> = Vec::new();
        let mut base64_lines = vec![];
        let mut base64_finl_lines = vec![];
        let mut lines = s.lines().map(str::trim_end);
        loop {
            match state {
                PemParsingState::Init => match lines.next() {
                    Some(line) => {
                        if let Ok((Boundary::Begin, l)) = Label::get_boundary(line) {
                            label = Some(l);
                            state = PemParsingState::PreEncapsulationBoundary;
                        }
                        // Anything else is explanatory text.
                    }
                    None => return Err(Error::MissingPreEncapsulationBoundary),
                },
                PemParsingState::PreEncapsulationBoundary => match lines.next() {
                    Some(line) => {
                        if line.is_empty() || Label::get_boundary(line).is_ok() {
                            return Err(Error::MissingData);
                        }
                        if line.contains(':') {
                            headers.push(parse_header(line)?);
                            state = PemParsingState::Headers;
                        } else {
                            state = start_body(line, &mut base64_lines, &mut base64_finl_lines);
                        }
                    }
                    None => return Err(Error::MissingData),
                },
                PemParsingState::Headers => match lines.next() {
                    Some("") => state = PemParsingState::Body,
                    Some(line) if line.starts_with([' ', '\t']) => match headers.last_mut() {
                        Some((_, value)) => value.push_str(line.trim()),
                        None => return Err(Error::InvalidHeader),
                    },
                    Some(line) if line.contains(':') => headers.push(parse_header(line)?),
                    Some(line) => {
                        if Label::get_boundary(line).is_ok() {
                            return Err(Error::MissingData);
                        }
                        state = start_body(line, &mut base64_lines, &mut base64_finl_lines);
                    }
                    None => return Err(Error::MissingPostEncapsulationBoundary),
                },
                PemParsingState::Body => match lines.next() {
                    Some(line) => {
                        if line.is_empty() || Label::get_boundary(line).is_ok() {
                            return Err(Error::MissingData);
                        }
                        state = start_body(line, &mut base64_lines, &mut base64_finl_lines);
                    }
                    None => return Err(Error::MissingData),
                },
                PemParsingState::Base64Lines => match lines.next() {
                    Some(line) => {
                        if line.is_empty() {
                            return Err(Error::InvalidBase64Line);
                        }
                        if let Ok((_, l)) = Label::get_boundary(line) {
                            // reach post-eb
                            if Some(&l) != label.as_ref() {
                                return Err(Error::LabelMissMatch);
                            }
                            state = PemParsingState::PostEncapsulationBoundary;
                        } else if is_base64_finl(line) {
                            base64_finl_lines.push(line);
                            state = PemParsingState::Base64Finl;
                        } else {
                            base64_lines.push(line.trim_start());
                        }
                    }
                    None => return Err(Error::MissingPostEncapsulationBoundary),
                },
                PemParsingState::Base64Finl => match lines.next() {
                    Some(line) => {
                        if line.is_empty() {
                            return Err(Error::InvalidBase64Finl);
                        }
                        if let Ok((_, l)) = Label::get_boundary(line) {
                            // reach post-eb
                            if Some(&l) != label.as_ref() {
                                return Err(Error::LabelMissMatch);
                            }
                            state = PemParsingState::PostEncapsulationBoundary;
                        } else {
                            if !is_base64_finl(line) {
                                return Err(Error::InvalidBase64Finl);
                            }
                            base64_finl_lines.push(line);
                        }
                    }
                    None => return Err(Error::MissingPostEncapsulationBoundary),
                },
                PemParsingState::PostEncapsulationBoundary => break,
            }
        }
        let label = label.ok_or(Error::MissingPreEncapsulationBoundary)?;
        let finl = base64_finl(&base64_finl_lines);
        base64_lines.push(&finl);

        Ok(Pem {
            label,
            headers,
            base64_data: base64_lines.join(""),
        })
    }
}

/*
* pre-eb -> headers -> (blank) -> base64lines ----------> post-eb
*        |          |                  |_|      |       ^
*        |          +-> base64lines     +--> base64finl-+
*        +-----------> base64lines / base64finl
 */
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
enum PemParsingState {
    #[default]
    Init,
    PreEncapsulationBoundary,
    Headers,
    Body,
    Base64Lines,
    Base64Finl,
    PostEncapsulationBoundary,
}

fn parse_header(line: &str) -> Result<(String, String), Error> {
    let (name, value) = line.split_once(':').ok_or(Error::InvalidHeader)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidHeader);
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn start_body<'a>(
    line: &'a str,
    base64_lines: &mut Vec<&'a str>,
    base64_finl_lines: &mut Vec<&'a str>,
) -> PemParsingState {
    if is_base64_finl(line) {
        base64_finl_lines.push(line);
        PemParsingState::Base64Finl
    } else {
        base64_lines.push(line.trim_start());
        PemParsingState::Base64Lines
    }
}

fn base64_finl(lines: &[&str]) -> String {
    // base64finl = *base64char (base64pad *WSP eol base64pad / *2base64pad) *WSP eol
    lines.iter().map(|l| l.trim()).collect()
}

fn is_base64_finl(line: &str) -> bool {
    line.contains('=')
}
