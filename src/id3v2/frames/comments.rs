//! Comment and unsynchronized-lyrics frames.
//!
//! Both frame templates share an identical layout — encoding, language, a short
//! description, then the free-form text — differing only in their frame ID and what the
//! text field conventionally holds.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::error::ParseResult;
use crate::id3v2::frames::{encoding, Frame, FrameId, Language};
use crate::id3v2::header::TagHeader;
use std::fmt::{self, Display, Formatter};

/// `COMM`: a free-form comment, identified by its `desc` and `lang` so multiple comments can
/// coexist in one tag.
#[derive(Default, Debug, Clone)]
pub struct CommentsFrame {
    pub encoding: Encoding,
    pub lang: Language,
    pub desc: String,
    pub text: String,
}

impl CommentsFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let lang = Language::parse(stream)?;
        let desc = string::read_terminated(encoding, stream);
        let text = string::read(encoding, stream);

        Ok(Self {
            encoding,
            lang,
            desc,
            text,
        })
    }
}

impl Frame for CommentsFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"COMM")
    }

    fn key(&self) -> String {
        format!["COMM:{}:{}", self.desc, self.lang]
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn render(&self, tag_header: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();

        let encoding = encoding::check(self.encoding, tag_header.version());
        result.push(encoding::render(encoding));
        result.extend(self.lang.as_ref());
        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(string::render(encoding, &self.text));

        result
    }
}

impl Display for CommentsFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.text]
    }
}

/// `USLT`: unsynchronized (non-timestamped) lyrics. Identical layout to [`CommentsFrame`].
#[derive(Default, Debug, Clone)]
pub struct UnsyncedLyricsFrame {
    pub encoding: Encoding,
    pub lang: Language,
    pub desc: String,
    pub lyrics: String,
}

impl UnsyncedLyricsFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let lang = Language::parse(stream)?;
        let desc = string::read_terminated(encoding, stream);
        let lyrics = string::read(encoding, stream);

        Ok(Self {
            encoding,
            lang,
            desc,
            lyrics,
        })
    }
}

impl Frame for UnsyncedLyricsFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"USLT")
    }

    fn key(&self) -> String {
        format!["USLT:{}:{}", self.desc, self.lang]
    }

    fn is_empty(&self) -> bool {
        self.lyrics.is_empty()
    }

    fn render(&self, tag_header: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();

        let encoding = encoding::check(self.encoding, tag_header.version());
        result.push(encoding::render(encoding));
        result.extend(self.lang.as_ref());
        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(string::render(encoding, &self.lyrics));

        result
    }
}

impl Display for UnsyncedLyricsFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.lyrics]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMM_DATA: &[u8] = b"\x03engDescription\x00Text";

    #[test]
    fn parse_comments_frame() {
        let mut stream = BufStream::new(COMM_DATA);
        let frame = CommentsFrame::parse(&mut stream).unwrap();

        assert_eq!(frame.encoding, Encoding::Utf8);
        assert_eq!(frame.lang, *b"eng");
        assert_eq!(frame.desc, "Description");
        assert_eq!(frame.text, "Text");
    }

    #[test]
    fn render_round_trips() {
        let frame = CommentsFrame {
            encoding: Encoding::Utf8,
            lang: Language::new(b"eng").unwrap(),
            desc: String::from("Description"),
            text: String::from("Text"),
        };

        let rendered = frame.render(&TagHeader::with_version(crate::id3v2::header::Version::V23));
        let mut stream = BufStream::new(&rendered);
        let reparsed = CommentsFrame::parse(&mut stream).unwrap();

        assert_eq!(reparsed.desc, "Description");
        assert_eq!(reparsed.text, "Text");
    }
}
