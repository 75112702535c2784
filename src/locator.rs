//! Opaque references to playable audio resources.
//!
//! A `Locator` is what the playlist stores and what the decoder opens. Only
//! local files are playable, so it wraps a path; `parse` also accepts
//! `file://` URIs as handed over by desktop integrations (MPRIS `OpenUri`).

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    #[error("empty locator")]
    Empty,
    #[error("unsupported URI scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("malformed percent-encoding in `{0}`")]
    BadEncoding(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locator(PathBuf);

impl Locator {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Parse a path or a `file://` URI.
    pub fn parse(s: &str) -> Result<Self, LocatorError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LocatorError::Empty);
        }

        if let Some(rest) = s.strip_prefix("file://") {
            // `file://localhost/x` and `file:///x` both name `/x`.
            let rest = rest.strip_prefix("localhost").unwrap_or(rest);
            let decoded = percent_decode(rest).ok_or_else(|| LocatorError::BadEncoding(s.into()))?;
            if decoded.is_empty() {
                return Err(LocatorError::Empty);
            }
            return Ok(Self(PathBuf::from(decoded)));
        }

        if let Some((scheme, _)) = s.split_once("://") {
            return Err(LocatorError::UnsupportedScheme(scheme.to_ascii_lowercase()));
        }

        Ok(Self(PathBuf::from(s)))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File stem used in user-facing messages.
    pub fn short_name(&self) -> String {
        self.0
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.0.display().to_string())
    }

    /// Render as a `file://` URI (absolute when the path can be resolved).
    pub fn to_uri(&self) -> String {
        let abs = if self.0.is_absolute() {
            self.0.clone()
        } else {
            std::env::current_dir()
                .map(|d| d.join(&self.0))
                .unwrap_or_else(|_| self.0.clone())
        };
        format!("file://{}", percent_encode(&abs.to_string_lossy()))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            // `from_str_radix` alone would accept a sign such as `%+1`.
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'/' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_paths() {
        let l = Locator::parse("/music/a.mp3").unwrap();
        assert_eq!(l.path(), Path::new("/music/a.mp3"));
        let l = Locator::parse("  relative/b.flac ").unwrap();
        assert_eq!(l.path(), Path::new("relative/b.flac"));
    }

    #[test]
    fn parse_decodes_file_uris() {
        let l = Locator::parse("file:///music/My%20Song.ogg").unwrap();
        assert_eq!(l.path(), Path::new("/music/My Song.ogg"));
        let l = Locator::parse("file://localhost/x.mp3").unwrap();
        assert_eq!(l.path(), Path::new("/x.mp3"));
    }

    #[test]
    fn parse_rejects_network_schemes_and_garbage() {
        assert_eq!(
            Locator::parse("https://example.com/a.mp3"),
            Err(LocatorError::UnsupportedScheme("https".into()))
        );
        assert_eq!(Locator::parse("   "), Err(LocatorError::Empty));
        assert!(matches!(
            Locator::parse("file:///bad%zz"),
            Err(LocatorError::BadEncoding(_))
        ));
    }

    #[test]
    fn percent_escapes_must_be_two_hex_digits() {
        for raw in ["file:///a%+1.mp3", "file:///a%-1.mp3", "file:///a%4"] {
            assert!(
                matches!(Locator::parse(raw), Err(LocatorError::BadEncoding(_))),
                "{raw}"
            );
        }
        assert_eq!(
            Locator::parse("file:///a%2B1.mp3").unwrap(),
            Locator::from_path("/a+1.mp3")
        );
    }

    #[test]
    fn to_uri_escapes_and_parses_back() {
        let l = Locator::from_path("/music/Ünïcode song.mp3");
        let uri = l.to_uri();
        assert!(uri.starts_with("file:///music/"));
        assert!(!uri.contains(' '));
        assert_eq!(Locator::parse(&uri).unwrap(), l);
    }

    #[test]
    fn short_name_is_file_stem() {
        assert_eq!(Locator::from_path("/a/b/Track 01.flac").short_name(), "Track 01");
    }
}
