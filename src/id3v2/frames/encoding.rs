//! The one-byte text-encoding indicator that prefixes most ID3v2 text-bearing frames.

use crate::core::io::BufStream;
use crate::core::string::Encoding;
use crate::error::{ParseError, ParseResult};
use crate::id3v2::header::Version;
use log::{error, info};

const FLAG_LATIN1: u8 = 0x00;
const FLAG_UTF16: u8 = 0x01;
const FLAG_UTF16BE: u8 = 0x02;
const FLAG_UTF8: u8 = 0x03;

pub fn parse(stream: &mut BufStream) -> ParseResult<Encoding> {
    match stream.read_u8()? {
        FLAG_LATIN1 => Ok(Encoding::Latin1),
        FLAG_UTF16 => Ok(Encoding::Utf16),
        FLAG_UTF16BE => Ok(Encoding::Utf16Be),
        FLAG_UTF8 => Ok(Encoding::Utf8),
        enc => {
            error!("unrecognized text encoding byte {}", enc);
            Err(ParseError::MalformedData)
        }
    }
}

/// Downgrades an encoding that only exists in ID3v2.4 (UTF-8, UTF-16BE) to its ID3v2.3
/// equivalent when rendering to an older tag version.
pub fn check(enc: Encoding, version: Version) -> Encoding {
    match enc {
        Encoding::Utf16Be | Encoding::Utf8 if version < Version::V24 => {
            info!("mapping unsupported ID3v2.4 encoding {:?} to UTF-16 for {}", enc, version);
            Encoding::Utf16
        }
        Encoding::Utf16Le => Encoding::Utf16,
        _ => enc,
    }
}

pub fn render(enc: Encoding) -> u8 {
    match enc {
        Encoding::Latin1 => FLAG_LATIN1,
        Encoding::Utf16 => FLAG_UTF16,
        Encoding::Utf16Be => FLAG_UTF16BE,
        Encoding::Utf8 => FLAG_UTF8,
        Encoding::Utf16Le => FLAG_UTF16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_encoding_byte() {
        assert_eq!(render(Encoding::Latin1), 0x00);
        assert_eq!(render(Encoding::Utf16), 0x01);
        assert_eq!(render(Encoding::Utf16Be), 0x02);
        assert_eq!(render(Encoding::Utf8), 0x03);
    }

    #[test]
    fn downgrade_v24_only_encodings() {
        assert_eq!(check(Encoding::Utf8, Version::V23), Encoding::Utf16);
        assert_eq!(check(Encoding::Utf16Be, Version::V23), Encoding::Utf16);
        assert_eq!(check(Encoding::Utf8, Version::V24), Encoding::Utf8);
    }
}
