//! Media-statistics frames.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::error::ParseResult;
use crate::id3v2::frames::{Frame, FrameId};
use crate::id3v2::header::TagHeader;
use log::info;
use std::fmt::{self, Display, Formatter};

/// `POPM`: a rating (0-255) plus a play count, both attributed to whichever application is
/// named by `email`.
#[derive(Default, Debug, Clone)]
pub struct PopularimeterFrame {
    pub email: String,
    pub rating: u8,
    pub plays: u64,
}

impl PopularimeterFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let email = string::read_terminated(Encoding::Latin1, stream);
        let rating = stream.read_u8()?;
        let plays = read_play_count(stream);

        Ok(Self {
            email,
            rating,
            plays,
        })
    }

    /// Buckets the 0-255 rating into the 0-5 star scale most players show.
    pub fn rating_simple(&self) -> u8 {
        match self.rating {
            0 => 0,
            1..=63 => 1,
            64..=127 => 2,
            128..=195 => 3,
            196..=254 => 4,
            255 => 5,
        }
    }
}

impl Frame for PopularimeterFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"POPM")
    }

    fn key(&self) -> String {
        format!["POPM:{}", self.email]
    }

    fn is_empty(&self) -> bool {
        false
    }

    fn render(&self, _: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();

        result.extend(string::render_terminated(Encoding::Latin1, &self.email));
        result.push(self.rating);

        if self.plays > 0 {
            result.extend(render_play_count(self.plays));
        } else {
            info!("omitting zero play count from POPM");
        }

        result
    }
}

impl Display for PopularimeterFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{} [{}/255, plays={}]", self.email, self.rating, self.plays]
    }
}

/// `PCNT`: a play counter with no other sub-fields.
#[derive(Default, Debug, Clone)]
pub struct PlayCounterFrame {
    pub plays: u64,
}

impl PlayCounterFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let plays = read_play_count(stream);

        Ok(Self { plays })
    }
}

impl Frame for PlayCounterFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"PCNT")
    }

    fn key(&self) -> String {
        String::from("PCNT")
    }

    fn is_empty(&self) -> bool {
        false
    }

    fn render(&self, _: &TagHeader) -> Vec<u8> {
        render_play_count(self.plays)
    }
}

impl Display for PlayCounterFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.plays]
    }
}

/// The spec leaves the play counter's width unspecified beyond "at least 4 bytes", so this
/// reads up to 8 bytes and falls back to a lossy fill for anything wider.
fn read_play_count(stream: &mut BufStream) -> u64 {
    match stream.read_be_u64() {
        Ok(plays) => plays,
        Err(_) => {
            let mut arr = [0; 8];
            let remaining = stream.remaining();
            if remaining <= arr.len() {
                stream.read(&mut arr[arr.len() - remaining..]);
            }
            u64::from_be_bytes(arr)
        }
    }
}

fn render_play_count(play_count: u64) -> Vec<u8> {
    let bytes = play_count.to_be_bytes();

    for i in 0..4 {
        if bytes[i] > 0 {
            return bytes[i..].into();
        }
    }

    bytes[4..].into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const POPM_DATA: &[u8] = b"test@test.com\0\x80\x00\x00\x16\x16";
    const PCNT_DATA: &[u8] = b"\x00\x00\x16\x16";

    #[test]
    fn parse_popm() {
        let mut stream = BufStream::new(POPM_DATA);
        let frame = PopularimeterFrame::parse(&mut stream).unwrap();

        assert_eq!(frame.email, "test@test.com");
        assert_eq!(frame.rating, 0x80);
        assert_eq!(frame.plays, 0x1616);
    }

    #[test]
    fn parse_pcnt() {
        let mut stream = BufStream::new(PCNT_DATA);
        let frame = PlayCounterFrame::parse(&mut stream).unwrap();

        assert_eq!(frame.plays, 0x1616);
    }

    #[test]
    fn render_large_play_counts() {
        let plays: u64 = 0x0001_2345_6789_ABCD;
        assert_eq!(render_play_count(plays), b"\x01\x23\x45\x67\x89\xAB\xCD");
    }

    #[test]
    fn rating_buckets() {
        let frame = PopularimeterFrame {
            email: String::new(),
            rating: 255,
            plays: 0,
        };
        assert_eq!(frame.rating_simple(), 5);
    }
}
