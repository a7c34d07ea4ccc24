//! Text encodings and file contents
//!
//! Contents are either decoded text or raw bytes. Which one a read returns is
//! decided by the encoding the caller passes: no encoding means bytes.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Text encoding applied when converting between bytes and strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// UTF-8; invalid sequences decode to U+FFFD
    Utf8,
    /// One byte per code point; code points above U+00FF keep their low byte
    Latin1,
}

/// An encoding name that is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown encoding: {0}")]
pub struct UnknownEncoding(pub String);

impl Encoding {
    /// Canonical name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Latin1 => "latin1",
        }
    }

    /// Encode text into bytes
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            #[allow(clippy::cast_possible_truncation)]
            Self::Latin1 => text.chars().map(|c| c as u32 as u8).collect(),
        }
    }

    /// Decode bytes into text
    #[must_use]
    pub fn decode(self, bytes: Vec<u8>) -> String {
        match self {
            Self::Utf8 => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            },
            Self::Latin1 => bytes.into_iter().map(char::from).collect(),
        }
    }
}

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "latin1" | "binary" => Ok(Self::Latin1),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options accepted by read, write and append
///
/// Anything that converts into `FileOptions` can be passed where an
/// "encoding or options" argument is expected: an [`Encoding`], an
/// `Option<Encoding>`, or the options struct itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileOptions {
    /// Encoding for text; `None` reads raw bytes and writes text as UTF-8
    pub encoding: Option<Encoding>,
}

impl FileOptions {
    /// Options with no encoding
    #[must_use]
    pub const fn new() -> Self {
        Self { encoding: None }
    }

    /// Options with the given encoding
    #[must_use]
    pub const fn with_encoding(encoding: Encoding) -> Self {
        Self {
            encoding: Some(encoding),
        }
    }
}

impl From<Encoding> for FileOptions {
    fn from(encoding: Encoding) -> Self {
        Self::with_encoding(encoding)
    }
}

impl From<Option<Encoding>> for FileOptions {
    fn from(encoding: Option<Encoding>) -> Self {
        Self { encoding }
    }
}

/// File contents, as text or as raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    /// Decoded text
    Text(String),
    /// Opaque bytes
    Bytes(Vec<u8>),
}

impl Contents {
    /// Bytes to put on disk for these contents
    ///
    /// Text is encoded with `encoding` (UTF-8 when `None`); bytes are written
    /// verbatim whatever the encoding.
    #[must_use]
    pub fn encode(self, encoding: Option<Encoding>) -> Vec<u8> {
        match self {
            Self::Text(text) => encoding.unwrap_or(Encoding::Utf8).encode(&text),
            Self::Bytes(bytes) => bytes,
        }
    }

    /// Contents read from disk: text when an encoding is given, else bytes
    #[must_use]
    pub fn decode(bytes: Vec<u8>, encoding: Option<Encoding>) -> Self {
        match encoding {
            Some(encoding) => Self::Text(encoding.decode(bytes)),
            None => Self::Bytes(bytes),
        }
    }

    /// The text, if these contents are text
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }

    /// Borrow the contents as bytes (UTF-8 for text)
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    /// Length in bytes of [`Contents::as_bytes`]
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether there are no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Contents {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Contents {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for Contents {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Contents {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Contents {
    fn from(bytes: &[u8; N]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}
