//! ID3v1 and ID3v1.1: the fixed 128-byte tag appended to the end of a file.
//!
//! ID3v1 predates the framed ID3v2 container by several years and has none of its
//! structure: every field is a fixed-width, space-padded byte run. ID3v1.1 is the same
//! layout with the last two comment bytes repurposed for a track number, detected the way
//! id3lib's original parser does it — by inspecting those two bytes directly, which comes
//! with a known false-positive (see [`Id3v1Tag::parse`]).

use crate::error::{ParseError, ParseResult};
use crate::id3v2::frames::{CommentsFrame, Frame, FrameId, Language, TextFrame};

/// The fixed size of an ID3v1/v1.1 tag.
pub const TAG_SIZE: usize = 128;

const LEN_TITLE: usize = 30;
const LEN_ARTIST: usize = 30;
const LEN_ALBUM: usize = 30;
const LEN_YEAR: usize = 4;
const LEN_COMMENT: usize = 30;

/// The description id3lib stamps onto the `COMM` frame synthesized from an ID3v1 comment.
pub const V1_COMMENT_DESC: &str = "ID3v1_Comment";

/// A parsed ID3v1/v1.1 tag.
#[derive(Debug, Clone, Default)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    /// Present only for ID3v1.1 tags.
    pub track: Option<u8>,
    pub genre: u8,
}

impl Id3v1Tag {
    /// Parses a tag from exactly [`TAG_SIZE`] bytes, which must begin with the `"TAG"` magic.
    ///
    /// ID3v1.1 is detected the same way id3lib's `ParseID3v1` does: the comment field is
    /// treated as a track number if its next-to-last byte is `0x00` and its last byte is not.
    /// A legitimate ID3v1.0 comment ending in `"\0X"` is indistinguishable from this and will
    /// be misclassified; this is a known limitation, not a bug to fix.
    pub fn parse(data: &[u8; TAG_SIZE]) -> ParseResult<Self> {
        if &data[0..3] != b"TAG" {
            return Err(ParseError::NotFound);
        }

        let mut pos = 3;
        let title = read_field(data, &mut pos, LEN_TITLE);
        let artist = read_field(data, &mut pos, LEN_ARTIST);
        let album = read_field(data, &mut pos, LEN_ALBUM);
        let year = read_field(data, &mut pos, LEN_YEAR);

        let comment_bytes = &data[pos..pos + LEN_COMMENT];
        pos += LEN_COMMENT;

        let (comment, track) = if comment_bytes[LEN_COMMENT - 2] == 0
            && comment_bytes[LEN_COMMENT - 1] != 0
        {
            (
                trim(&comment_bytes[..LEN_COMMENT - 2]),
                Some(comment_bytes[LEN_COMMENT - 1]),
            )
        } else {
            (trim(comment_bytes), None)
        };

        let genre = data[pos];

        Ok(Self {
            title,
            artist,
            album,
            year,
            comment,
            track,
            genre,
        })
    }

    /// Renders this tag to a fixed 128-byte block. Non-Latin1 characters are truncated to
    /// their low 8 bits, matching id3lib's behavior rather than transliterating or erroring.
    pub fn render(&self) -> [u8; TAG_SIZE] {
        let mut out = [0x20u8; TAG_SIZE];
        out[0..3].copy_from_slice(b"TAG");

        write_field(&mut out, 3, LEN_TITLE, &self.title);
        write_field(&mut out, 33, LEN_ARTIST, &self.artist);
        write_field(&mut out, 63, LEN_ALBUM, &self.album);
        write_field(&mut out, 93, LEN_YEAR, &self.year);

        if let Some(track) = self.track {
            write_field(&mut out, 97, LEN_COMMENT - 2, &self.comment);
            out[125] = 0;
            out[126] = track;
        } else {
            write_field(&mut out, 97, LEN_COMMENT, &self.comment);
        }

        out[127] = self.genre;

        out
    }

    /// Converts this tag's fields into the ID3v2 frames a [`Tag`](crate::id3v2::Tag) would
    /// hold for the same data, per id3lib's `ID3_AddTitle`/`ID3_AddArtist`/etc. mapping.
    pub fn into_frames(self) -> Vec<Box<dyn Frame>> {
        let mut frames: Vec<Box<dyn Frame>> = Vec::new();

        if !self.title.is_empty() {
            frames.push(Box::new(text_frame(b"TIT2", &self.title)));
        }
        if !self.artist.is_empty() {
            frames.push(Box::new(text_frame(b"TPE1", &self.artist)));
        }
        if !self.album.is_empty() {
            frames.push(Box::new(text_frame(b"TALB", &self.album)));
        }
        if !self.year.is_empty() {
            frames.push(Box::new(text_frame(b"TYER", &self.year)));
        }
        if !self.comment.is_empty() {
            frames.push(Box::new(CommentsFrame {
                encoding: Default::default(),
                lang: Language::default(),
                desc: String::from(V1_COMMENT_DESC),
                text: self.comment.clone(),
            }));
        }
        if let Some(track) = self.track {
            frames.push(Box::new(text_frame(b"TRCK", &track.to_string())));
        }
        if self.genre != 0xFF {
            frames.push(Box::new(text_frame(b"TCON", &format!["({})", self.genre])));
        }

        frames
    }
}

fn text_frame(id: &[u8; 4], value: &str) -> TextFrame {
    let mut frame = TextFrame::new(FrameId::new(id));
    frame.text.push(String::from(value));
    frame
}

fn read_field(data: &[u8], pos: &mut usize, len: usize) -> String {
    let field = trim(&data[*pos..*pos + len]);
    *pos += len;
    field
}

fn trim(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0x20 && b != 0x00)
        .map_or(0, |i| i + 1);

    bytes[..end].iter().map(|&b| char::from(b)).collect()
}

fn write_field(out: &mut [u8; TAG_SIZE], offset: usize, len: usize, value: &str) {
    let bytes: Vec<u8> = value
        .chars()
        .map(|ch| if u32::from(ch) > 0xFF { b'?' } else { ch as u8 })
        .take(len)
        .collect();

    out[offset..offset + bytes.len()].copy_from_slice(&bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(s: &str, len: usize) -> Vec<u8> {
        let mut v = s.as_bytes().to_vec();
        v.resize(len, 0x20);
        v
    }

    fn build_tag(comment_tail: &[u8]) -> [u8; TAG_SIZE] {
        let mut data = Vec::new();
        data.extend(b"TAG");
        data.extend(padded("Title", LEN_TITLE));
        data.extend(padded("Artist", LEN_ARTIST));
        data.extend(padded("Album", LEN_ALBUM));
        data.extend(b"2024");
        data.extend(comment_tail);
        data.push(23);

        let mut arr = [0; TAG_SIZE];
        arr.copy_from_slice(&data);
        arr
    }

    #[test]
    fn parse_v1_0_tag() {
        let mut comment = padded("Hello", LEN_COMMENT);
        comment[LEN_COMMENT - 1] = b'X';
        let data = build_tag(&comment);

        let tag = Id3v1Tag::parse(&data).unwrap();
        assert_eq!(tag.title, "Title");
        assert_eq!(tag.artist, "Artist");
        assert_eq!(tag.album, "Album");
        assert_eq!(tag.year, "2024");
        assert!(tag.comment.starts_with("Hello"));
        assert_eq!(tag.track, None);
        assert_eq!(tag.genre, 23);
    }

    #[test]
    fn parse_v1_1_tag() {
        let mut comment = padded("Hello", LEN_COMMENT - 2);
        comment.push(0);
        comment.push(7);
        let data = build_tag(&comment);

        let tag = Id3v1Tag::parse(&data).unwrap();
        assert_eq!(tag.comment, "Hello");
        assert_eq!(tag.track, Some(7));
    }

    #[test]
    fn render_round_trips_v1_1() {
        let tag = Id3v1Tag {
            title: String::from("Title"),
            artist: String::from("Artist"),
            album: String::from("Album"),
            year: String::from("2024"),
            comment: String::from("Hello"),
            track: Some(7),
            genre: 23,
        };

        let rendered = tag.render();
        let reparsed = Id3v1Tag::parse(&rendered).unwrap();

        assert_eq!(reparsed.title, tag.title);
        assert_eq!(reparsed.track, tag.track);
        assert_eq!(reparsed.genre, tag.genre);
    }

    #[test]
    fn into_frames_maps_fields() {
        let tag = Id3v1Tag {
            title: String::from("Title"),
            artist: String::new(),
            album: String::new(),
            year: String::new(),
            comment: String::new(),
            track: None,
            genre: 23,
        };

        let frames = tag.into_frames();
        assert!(frames.iter().any(|f| f.id() == *b"TIT2"));
        assert!(frames.iter().any(|f| f.id() == *b"TCON"));
    }
}
