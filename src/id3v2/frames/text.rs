//! Text information frames.
//!
//! Text frames store plain textual metadata — titles, artists, dates, and the like. ID3v2
//! handles them somewhat uniformly (an encoding byte followed by one or more NUL-delimited
//! strings), which this module factors into shared `parse_text`/`render_text` helpers shared
//! by every text-bearing frame template.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::error::ParseResult;
use crate::id3v2::frames::{encoding, Frame, FrameId};
use crate::id3v2::header::TagHeader;
use log::{info, warn};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Plain text metadata — titles, artists, genres, dates, and the many other text frames the
/// spec defines. All share the same wire layout: an encoding byte followed by one or more
/// strings delimited by a NUL appropriate to that encoding.
#[derive(Debug, Clone)]
pub struct TextFrame {
    frame_id: FrameId,
    pub encoding: Encoding,
    pub text: Vec<String>,
}

impl TextFrame {
    /// # Panics
    /// Panics if `frame_id` is not a valid `TextFrame` ID (see [`TextFrame::is_id`]).
    pub fn new(frame_id: FrameId) -> Self {
        if !Self::is_id(frame_id) {
            panic!("expected a valid text frame id, found {}", frame_id);
        }

        Self {
            frame_id,
            encoding: Encoding::default(),
            text: Vec::new(),
        }
    }

    #[rustfmt::skip]
    pub fn is_id(frame_id: FrameId) -> bool {
        is_id!(
            frame_id,
            b"TALB", b"TCOM", b"TCON", b"TCOP", b"TENC", b"TEXT", b"TFLT", b"TIT1",
            b"TIT2", b"TIT3", b"TKEY", b"TLAN", b"TMED", b"TOAL", b"TOFN", b"TOLY",
            b"TOPE", b"TOWN", b"TPE1", b"TPE2", b"TPE3", b"TPE4", b"TPUB", b"TRSN",
            b"TRSO", b"TSRC", b"TSSE", b"TRDA", b"TLEN", b"TYER", b"TDAT", b"TIME",
            b"TORY", b"TSIZ", b"TDLY", b"TBPM", b"TPOS", b"TRCK"
        )
    }

    pub(crate) fn parse(frame_id: FrameId, stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let text = parse_text(encoding, stream);

        Ok(Self {
            frame_id,
            encoding,
            text,
        })
    }
}

impl Frame for TextFrame {
    fn id(&self) -> FrameId {
        self.frame_id
    }

    fn key(&self) -> String {
        self.id().to_string()
    }

    fn is_empty(&self) -> bool {
        self.text.iter().all(|s| s.is_empty())
    }

    fn render(&self, tag_header: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();

        let encoding = encoding::check(self.encoding, tag_header.version());
        result.push(encoding::render(encoding));
        result.extend(render_text(encoding, &self.text));

        result
    }
}

impl Display for TextFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        fmt_joined(f, &self.text)
    }
}

/// `TXXX`: user-defined text information, identified by a free-form `desc` rather than a
/// fixed frame ID. Multiple `TXXX` frames may coexist in one tag as long as their
/// descriptions differ.
#[derive(Default, Debug, Clone)]
pub struct UserTextFrame {
    pub encoding: Encoding,
    pub desc: String,
    pub text: Vec<String>,
}

impl UserTextFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let desc = string::read_terminated(encoding, stream);
        let text = parse_text(encoding, stream);

        Ok(Self {
            encoding,
            desc,
            text,
        })
    }
}

impl Frame for UserTextFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"TXXX")
    }

    fn key(&self) -> String {
        format!["TXXX:{}", self.desc]
    }

    fn is_empty(&self) -> bool {
        self.desc.is_empty() && self.text.is_empty()
    }

    fn render(&self, tag_header: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();

        let encoding = encoding::check(self.encoding, tag_header.version());
        result.push(encoding::render(encoding));
        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(render_text(encoding, &self.text));

        result
    }
}

impl Display for UserTextFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        fmt_joined(f, &self.text)
    }
}

/// A mapping of roles to the people who filled them — `IPLS` in ID3v2.2/.3, split into
/// `TIPL` (involved people) and `TMCL` (musician credits) from ID3v2.4 onward. This crate
/// always keys the frame map entry as `TIPL`/`TMCL` regardless of which ID was parsed, since
/// `IPLS` and `TIPL` describe the same data.
#[derive(Debug, Clone)]
pub struct CreditsFrame {
    frame_id: FrameId,
    pub encoding: Encoding,
    pub people: BTreeMap<String, String>,
}

impl CreditsFrame {
    /// # Panics
    /// Panics if `frame_id` is not `IPLS`, `TIPL`, or `TMCL`.
    pub fn new(frame_id: FrameId) -> Self {
        if !Self::is_id(frame_id) {
            panic!("expected a valid credits frame id, found {}", frame_id);
        }

        Self {
            frame_id,
            encoding: Encoding::default(),
            people: BTreeMap::new(),
        }
    }

    pub fn is_id(frame_id: FrameId) -> bool {
        is_id!(frame_id, b"IPLS", b"TIPL", b"TMCL")
    }

    pub(crate) fn parse(frame_id: FrameId, stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let mut text = parse_text(encoding, stream);

        if text.len() % 2 != 0 {
            info!("found an uneven number of entries in {}, truncating", frame_id);
            text.pop();
        }

        let mut people = BTreeMap::new();
        let mut text = text.into_iter();

        while let Some(role) = text.next() {
            let role_people = text.next().unwrap();
            people.insert(role, role_people);
        }

        Ok(Self {
            frame_id,
            encoding,
            people,
        })
    }
}

impl Frame for CreditsFrame {
    fn id(&self) -> FrameId {
        self.frame_id
    }

    fn key(&self) -> String {
        match self.frame_id.inner() {
            b"TIPL" | b"IPLS" => String::from("TIPL"),
            b"TMCL" => String::from("TMCL"),
            _ => unreachable!(),
        }
    }

    fn is_empty(&self) -> bool {
        self.people.iter().all(|(role, people)| role.is_empty() || people.is_empty())
    }

    fn render(&self, tag_header: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();

        let encoding = encoding::check(self.encoding, tag_header.version());
        result.push(encoding::render(encoding));

        let pairs = self.people.iter().filter(|(role, people)| {
            if role.is_empty() || people.is_empty() {
                warn!("dropping incomplete role/people pair in {}", self.frame_id);
                false
            } else {
                true
            }
        });

        for (i, (role, people)) in pairs.enumerate() {
            if i > 0 {
                result.resize(result.len() + encoding.nul_size(), 0);
            }

            result.extend(string::render_terminated(encoding, role));
            result.extend(string::render(encoding, people));
        }

        result
    }
}

impl Display for CreditsFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, (role, people)) in self.people.iter().enumerate() {
            if i > 0 {
                writeln![f]?;
            }
            write![f, "{}: {}", role, people]?;
        }

        Ok(())
    }
}

fn fmt_joined<D: Display>(f: &mut Formatter, items: &[D]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write![f, ", "]?;
        }
        write![f, "{}", item]?;
    }

    Ok(())
}

/// Splits the remainder of `stream` on NUL terminators appropriate to `encoding`, discarding
/// empty strings (taggers sometimes zero-pad text frames).
fn parse_text(encoding: Encoding, stream: &mut BufStream) -> Vec<String> {
    let mut text = Vec::new();

    while !stream.is_empty() {
        let string = string::read_terminated(encoding, stream);

        if !string.is_empty() {
            text.push(string);
        }
    }

    text
}

/// The plain-multi-value rendering: strings are NUL-delimited, with no terminator after the
/// last one.
fn render_text(encoding: Encoding, text: &[String]) -> Vec<u8> {
    let mut result = Vec::new();

    for (i, string) in text.iter().enumerate() {
        if i > 0 {
            result.resize(result.len() + encoding.nul_size(), 0);
        }

        result.extend(string::render(encoding, string));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const TCON_DATA: &[u8] = b"\x00Post-Rock\0Electronica\0";
    const TXXX_DATA: &[u8] = b"\x00replaygain_track_gain\0-7.429688 dB";
    const TMCL_DATA: &[u8] = b"\x00Bassist\0John Smith\0Violinist\0Vanessa Evans";

    #[test]
    fn parse_text_frame() {
        let mut stream = BufStream::new(TCON_DATA);
        let frame = TextFrame::parse(FrameId::new(b"TCON"), &mut stream).unwrap();

        assert_eq!(frame.encoding, Encoding::Latin1);
        assert_eq!(frame.text[0], "Post-Rock");
        assert_eq!(frame.text[1], "Electronica");
    }

    #[test]
    fn parse_user_text_frame() {
        let mut stream = BufStream::new(TXXX_DATA);
        let frame = UserTextFrame::parse(&mut stream).unwrap();

        assert_eq!(frame.desc, "replaygain_track_gain");
        assert_eq!(frame.text[0], "-7.429688 dB");
    }

    #[test]
    fn parse_credits_frame() {
        let mut stream = BufStream::new(TMCL_DATA);
        let frame = CreditsFrame::parse(FrameId::new(b"TMCL"), &mut stream).unwrap();

        assert_eq!(frame.people["Bassist"], "John Smith");
        assert_eq!(frame.people["Violinist"], "Vanessa Evans");
        assert_eq!(frame.key(), "TMCL");
    }

    #[test]
    fn ipls_and_tipl_share_a_key() {
        let mut stream = BufStream::new(TMCL_DATA);
        let frame = CreditsFrame::parse(FrameId::new(b"IPLS"), &mut stream).unwrap();
        assert_eq!(frame.key(), "TIPL");
    }
}
