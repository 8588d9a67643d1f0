//! Lyrics3 v2: a legacy trailing tag, predating ID3v2's wide adoption, that sits between the
//! audio and any ID3v1 tag at the end of a file.
//!
//! This module only parses Lyrics3 v2; there is no render/write path. The original parser it
//! is grounded on was itself only partially implemented and duplicated across two revisions
//! of id3lib's sources, so this crate treats Lyrics3 as read-only rather than guessing at a
//! faithful write-back (see the crate's design notes).

use crate::core::io::BufStream;
use crate::id3v2::frames::{Frame, FrameId, TextFrame};
use std::str;

/// The fixed marker closing a Lyrics3 v2 tag, immediately preceded by a 6-ASCII-digit size
/// field giving the length of everything between the opening marker and that size field.
pub const FOOTER_MARKER: &[u8] = b"LYRICS200";
/// The marker opening the tag's field list.
const HEADER_MARKER: &[u8] = b"LYRICSBEGIN";

const SIZE_FIELD_LEN: usize = 6;

/// A parsed Lyrics3 v2 tag. Only the fields this crate has a synthetic ID3v2 frame for are
/// kept; others (`IND`, `IMG`, ...) are read past but discarded.
#[derive(Debug, Clone, Default)]
pub struct Lyrics3v2 {
    pub lyrics: Option<String>,
    pub author: Option<String>,
    pub album: Option<String>,
    pub track_title: Option<String>,
    /// The number of trailing bytes this tag occupies, including its header and footer
    /// markers. The caller uses this to know how many bytes to strip from the end of the
    /// file alongside any ID3v1 tag.
    pub size: u64,
}

impl Lyrics3v2 {
    /// Looks for a Lyrics3 v2 tag ending at the end of `region`, which should be the portion
    /// of a file preceding any ID3v1 tag (Lyrics3 always sits immediately before ID3v1, or at
    /// the very end of the file if there is none).
    pub fn find_and_parse(region: &[u8]) -> Option<Self> {
        if region.len() < FOOTER_MARKER.len() + SIZE_FIELD_LEN {
            return None;
        }

        let footer_start = region.len() - FOOTER_MARKER.len();
        if &region[footer_start..] != FOOTER_MARKER {
            return None;
        }

        let size_start = footer_start - SIZE_FIELD_LEN;
        let content_size: usize = str::from_utf8(&region[size_start..footer_start])
            .ok()
            .and_then(|s| s.trim().parse().ok())?;

        let content_end = size_start;
        let content_start = content_end.checked_sub(content_size)?;
        let content = &region[content_start..content_end];

        // The header marker is conventional, not load-bearing for parsing (the size field
        // already delimits the content), so its absence doesn't invalidate the tag.
        let total_size = if region[..content_start].ends_with(HEADER_MARKER) {
            content_size + SIZE_FIELD_LEN + FOOTER_MARKER.len() + HEADER_MARKER.len()
        } else {
            content_size + SIZE_FIELD_LEN + FOOTER_MARKER.len()
        };

        let mut tag = Lyrics3v2 {
            size: total_size as u64,
            ..Default::default()
        };

        let mut stream = BufStream::new(content);

        while stream.remaining() >= 3 + 5 {
            let id: [u8; 3] = match stream.read_array() {
                Ok(id) => id,
                Err(_) => break,
            };

            let field_size: usize = match stream
                .read_array::<5>()
                .ok()
                .and_then(|digits| str::from_utf8(&digits).ok()?.parse().ok())
            {
                Some(size) => size,
                None => break,
            };

            let data = match stream.slice(field_size) {
                Ok(data) => data,
                Err(_) => break,
            };

            let text = String::from_utf8_lossy(data).trim_end().to_string();

            match &id {
                b"LYR" => tag.lyrics = Some(text),
                b"AUT" => tag.author = Some(text),
                b"EAL" => tag.album = Some(text),
                b"ETT" => tag.track_title = Some(text),
                // IND/IMG/EAR and any unrecognized field ID carry no analogue this crate
                // surfaces; they're consumed above so the cursor stays aligned.
                _ => {}
            }
        }

        Some(tag)
    }

    /// Converts the recognized fields into the synthetic ID3v2 frames a
    /// [`FileBinder`](crate::file::FileBinder) merges into a [`Tag`](crate::id3v2::Tag).
    pub fn into_frames(self) -> Vec<Box<dyn Frame>> {
        let mut frames: Vec<Box<dyn Frame>> = Vec::new();

        if let Some(lyrics) = self.lyrics {
            if !lyrics.is_empty() {
                let mut frame = crate::id3v2::frames::UnsyncedLyricsFrame::default();
                frame.lyrics = lyrics;
                frames.push(Box::new(frame));
            }
        }

        if let Some(author) = self.author {
            if !author.is_empty() {
                frames.push(Box::new(text_frame(b"TCOM", &author)));
            }
        }

        if let Some(album) = self.album {
            if !album.is_empty() {
                frames.push(Box::new(text_frame(b"TALB", &album)));
            }
        }

        if let Some(title) = self.track_title {
            if !title.is_empty() {
                frames.push(Box::new(text_frame(b"TIT2", &title)));
            }
        }

        frames
    }
}

fn text_frame(id: &[u8; 4], value: &str) -> TextFrame {
    let mut frame = TextFrame::new(FrameId::new(id));
    frame.text.push(String::from(value));
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: &[u8; 3], data: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(id);
        out.extend(format!("{:05}", data.len()).as_bytes());
        out.extend(data.as_bytes());
        out
    }

    fn build_tag(fields: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(HEADER_MARKER);
        out.extend(fields);
        out.extend(format!("{:06}", fields.len()).as_bytes());
        out.extend(FOOTER_MARKER);
        out
    }

    #[test]
    fn parses_lyr_and_aut_fields() {
        let mut fields = Vec::new();
        fields.extend(field(b"LYR", "La la la"));
        fields.extend(field(b"AUT", "Some Author"));

        let data = build_tag(&fields);
        let tag = Lyrics3v2::find_and_parse(&data).unwrap();

        assert_eq!(tag.lyrics.as_deref(), Some("La la la"));
        assert_eq!(tag.author.as_deref(), Some("Some Author"));
        assert_eq!(tag.size, data.len() as u64);
    }

    #[test]
    fn rejects_data_without_footer_marker() {
        assert!(Lyrics3v2::find_and_parse(b"not a lyrics3 tag at all").is_none());
    }

    #[test]
    fn into_frames_maps_recognized_fields() {
        let tag = Lyrics3v2 {
            lyrics: Some(String::from("La la la")),
            author: Some(String::from("Some Author")),
            album: None,
            track_title: None,
            size: 0,
        };

        let frames = tag.into_frames();
        assert!(frames.iter().any(|f| f.id() == *b"USLT"));
        assert!(frames.iter().any(|f| f.id() == *b"TCOM"));
    }

    #[test]
    fn tolerates_region_without_header_marker() {
        let mut fields = Vec::new();
        fields.extend(field(b"LYR", "Text"));

        let mut data = Vec::new();
        data.extend(b"...audio bytes...");
        data.extend(&fields);
        data.extend(format!("{:06}", fields.len()).as_bytes());
        data.extend(FOOTER_MARKER);

        let tag = Lyrics3v2::find_and_parse(&data).unwrap();
        assert_eq!(tag.lyrics.as_deref(), Some("Text"));
    }
}
