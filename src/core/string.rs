//! Tag string handling.

use crate::core::io::BufStream;
use log::warn;

/// The internal representation of text encodings used across this crate's tag formats.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Encoding {
    /// ISO-8859-1, also known as Latin1. Used by ID3v1 and as one of the ID3v2 encodings.
    /// Unicode text is flattened into `?` characters when written with this encoding.
    Latin1,
    /// UTF-16 with a BOM. In practice this is UTF-16LE with a `0xFFFE` BOM.
    Utf16,
    /// UTF-16BE with no BOM. Only valid in ID3v2.4; mapped to [`Utf16`](Encoding::Utf16)
    /// elsewhere.
    Utf16Be,
    /// UTF-8. Only valid in ID3v2.4; mapped to [`Utf16`](Encoding::Utf16) elsewhere.
    Utf8,
    /// UTF-16LE with no BOM. Not part of the ID3v2 spec; always mapped to
    /// [`Utf16`](Encoding::Utf16) when written.
    Utf16Le,
}

impl Encoding {
    pub(crate) fn nul_size(&self) -> usize {
        match self {
            Self::Utf8 | Self::Latin1 => 1,
            _ => 2,
        }
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self::Utf8
    }
}

/// Consumes the rest of this stream and decodes it into a string according to the encoding.
pub(crate) fn read(encoding: Encoding, stream: &mut BufStream) -> String {
    decode(encoding, stream.take_rest())
}

/// Searches and consumes the stream up until a NUL terminator and decodes it into a string
/// according to the encoding. The string will not include the terminator.
pub(crate) fn read_terminated(encoding: Encoding, stream: &mut BufStream) -> String {
    let string_data = match encoding.nul_size() {
        1 => stream.search(&[0]),
        2 => stream.search(&[0, 0]),
        _ => unreachable!(),
    };

    decode(encoding, string_data)
}

/// Renders a string according to the encoding.
pub(crate) fn render(encoding: Encoding, string: &str) -> Vec<u8> {
    match encoding {
        Encoding::Latin1 => encode_latin1(string),
        Encoding::Utf16 => encode_utf16(string),
        Encoding::Utf16Be => encode_utf16be(string),
        Encoding::Utf8 => string.as_bytes().to_vec(),
        Encoding::Utf16Le => encode_utf16le(string),
    }
}

/// Renders a string plus a NUL terminator according to the encoding.
pub(crate) fn render_terminated(encoding: Encoding, string: &str) -> Vec<u8> {
    let mut result = render(encoding, string);
    result.resize(result.len() + encoding.nul_size(), 0);
    result
}

fn decode(encoding: Encoding, data: &[u8]) -> String {
    // Terminated reads hand us the terminator along with the data, and non-terminated
    // fields are often nul-padded regardless, so strip a trailing terminator either way.
    let data = match encoding.nul_size() {
        1 => data.strip_suffix(&[0]).unwrap_or(data),
        2 => data.strip_suffix(&[0, 0]).unwrap_or(data),
        _ => unreachable!(),
    };

    match encoding {
        Encoding::Latin1 => decode_latin1(data),
        Encoding::Utf16 => decode_utf16(data),
        Encoding::Utf16Be => decode_utf16be(data),
        Encoding::Utf8 => String::from_utf8_lossy(data).to_string(),
        Encoding::Utf16Le => decode_utf16le(data),
    }
}

fn decode_latin1(data: &[u8]) -> String {
    // Every Latin1 byte maps 1:1 to a Unicode code point below 0x100.
    data.iter().map(|&byte| char::from(byte)).collect()
}

fn decode_utf16(data: &[u8]) -> String {
    if data.len() < 2 {
        return String::new();
    }

    match (data[0], data[1]) {
        (0xFF, 0xFE) => decode_utf16le(&data[2..]),
        (0xFE, 0xFF) => decode_utf16be(&data[2..]),
        _ => {
            warn!("could not determine UTF-16 BOM, defaulting to UTF-16BE");
            decode_utf16be(data)
        }
    }
}

fn decode_utf16be(data: &[u8]) -> String {
    String::from_utf16_lossy(
        data.chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect::<Vec<u16>>()
            .as_slice(),
    )
}

fn decode_utf16le(data: &[u8]) -> String {
    String::from_utf16_lossy(
        data.chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect::<Vec<u16>>()
            .as_slice(),
    )
}

fn encode_latin1(string: &str) -> Vec<u8> {
    string
        .chars()
        .map(|ch| if u32::from(ch) > 0xFF { b'?' } else { ch as u8 })
        .collect()
}

fn encode_utf16(string: &str) -> Vec<u8> {
    let mut result: Vec<u8> = vec![0xFF, 0xFE];
    result.extend(encode_utf16le(string));
    result
}

fn encode_utf16be(string: &str) -> Vec<u8> {
    string
        .encode_utf16()
        .flat_map(|cp| cp.to_be_bytes())
        .collect()
}

fn encode_utf16le(string: &str) -> Vec<u8> {
    string
        .encode_utf16()
        .flat_map(|cp| cp.to_le_bytes())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STR_LATIN1: &str = "L\u{ee}ke \u{e2} while loop w\u{ef}th n\u{f8} escap\u{ea}";
    const STR_UNICODE: &str =
        "\u{2551} L\u{ee}ke \u{e2} \u{1d568}\u{1d569}\u{1d55a}le l\u{1d490}\u{1d490}p w\u{ef}th n\u{f8} escap\u{ea} \u{2551}";

    const DATA_LATIN1: &[u8] = b"L\xEEke \xE2 while loop w\xEFth n\xF8 escap\xEA";

    #[test]
    fn parse_latin1() {
        assert_eq!(decode(Encoding::Latin1, DATA_LATIN1), STR_LATIN1);
    }

    #[test]
    fn render_latin1() {
        assert_eq!(render(Encoding::Latin1, STR_LATIN1), DATA_LATIN1);
    }

    #[test]
    fn render_latin1_lossy() {
        let rendered = render(Encoding::Latin1, STR_UNICODE);
        assert!(rendered.contains(&b'?'));
    }

    #[test]
    fn round_trip_utf16() {
        let rendered = render(Encoding::Utf16, STR_UNICODE);
        assert_eq!(decode(Encoding::Utf16, &rendered), STR_UNICODE);
    }

    #[test]
    fn round_trip_utf16be() {
        let rendered = render(Encoding::Utf16Be, STR_UNICODE);
        assert_eq!(decode(Encoding::Utf16Be, &rendered), STR_UNICODE);
    }

    #[test]
    fn round_trip_utf8() {
        let rendered = render(Encoding::Utf8, STR_UNICODE);
        assert_eq!(decode(Encoding::Utf8, &rendered), STR_UNICODE);
    }

    #[test]
    fn parse_terminated() {
        let data = b"L\xEEke \xE2 while loo\0p w\xEFth n\xF8 escap\xEA";
        let mut stream = BufStream::new(data);

        let terminated = read_terminated(Encoding::Latin1, &mut stream);
        assert_eq!(terminated, "L\u{ee}ke \u{e2} while loo");

        let rest = read_terminated(Encoding::Latin1, &mut stream);
        assert_eq!(rest, "p w\u{ef}th n\u{f8} escap\u{ea}");
    }

    #[test]
    fn render_nul() {
        let out = render_terminated(Encoding::Latin1, "Hi");
        assert_eq!(out, b"Hi\0");
    }
}
