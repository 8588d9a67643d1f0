//! URL link frames.
//!
//! URL frames are laid out like text frames but with two differences: they're always
//! rendered as Latin-1, and only ever hold a single string.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::error::ParseResult;
use crate::id3v2::frames::{encoding, Frame, FrameId};
use crate::id3v2::header::TagHeader;
use std::fmt::{self, Display, Formatter};

/// A link to a webpage, stored under one of the `W...` frame IDs (`WCOM`, `WOAF`, `WOAR`,
/// `WOAS`, `WORS`, `WPAY`, `WPUB`, `WCOP`).
#[derive(Debug, Clone)]
pub struct UrlFrame {
    frame_id: FrameId,
    pub url: String,
}

impl UrlFrame {
    /// # Panics
    /// Panics if `frame_id` is not a valid `UrlFrame` ID.
    pub fn new(frame_id: FrameId) -> Self {
        if !Self::is_id(frame_id) {
            panic!("expected a valid url frame id, found {}", frame_id);
        }

        Self {
            frame_id,
            url: String::new(),
        }
    }

    pub fn is_id(frame_id: FrameId) -> bool {
        is_id!(
            frame_id, b"WCOM", b"WCOP", b"WOAF", b"WOAR", b"WOAS", b"WORS", b"WPAY", b"WPUB"
        )
    }

    pub(crate) fn parse(frame_id: FrameId, stream: &mut BufStream) -> ParseResult<Self> {
        let url = string::read(Encoding::Latin1, stream);
        Ok(Self { frame_id, url })
    }
}

impl Frame for UrlFrame {
    fn id(&self) -> FrameId {
        self.frame_id
    }

    fn key(&self) -> String {
        self.id().to_string()
    }

    fn is_empty(&self) -> bool {
        self.url.is_empty()
    }

    fn render(&self, _: &TagHeader) -> Vec<u8> {
        string::render(Encoding::Latin1, &self.url)
    }
}

impl Display for UrlFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.url]
    }
}

/// `WXXX`: a user-defined URL, identified by `desc`.
#[derive(Default, Debug, Clone)]
pub struct UserUrlFrame {
    pub encoding: Encoding,
    pub desc: String,
    pub url: String,
}

impl UserUrlFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let desc = string::read_terminated(encoding, stream);
        let url = string::read(Encoding::Latin1, stream);

        Ok(Self { encoding, desc, url })
    }
}

impl Frame for UserUrlFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"WXXX")
    }

    fn key(&self) -> String {
        format!["WXXX:{}", self.desc]
    }

    fn is_empty(&self) -> bool {
        self.url.is_empty()
    }

    fn render(&self, tag_header: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();

        let encoding = encoding::check(self.encoding, tag_header.version());
        result.push(encoding::render(encoding));
        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(string::render(Encoding::Latin1, &self.url));

        result
    }
}

impl Display for UserUrlFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.url]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WOAR_DATA: &[u8] = b"https://fourtet.net";
    const WXXX_DATA: &[u8] = b"\x03ID3v2.3.0\0https://id3.org/id3v2.3.0";

    #[test]
    fn parse_url_frame() {
        let mut stream = BufStream::new(WOAR_DATA);
        let frame = UrlFrame::parse(FrameId::new(b"WOAR"), &mut stream).unwrap();
        assert_eq!(frame.url, "https://fourtet.net");
    }

    #[test]
    fn parse_user_url_frame() {
        let mut stream = BufStream::new(WXXX_DATA);
        let frame = UserUrlFrame::parse(&mut stream).unwrap();
        assert_eq!(frame.desc, "ID3v2.3.0");
        assert_eq!(frame.url, "https://id3.org/id3v2.3.0");
    }
}
