//! ID3v2.2/v2.3/v2.4 tag parsing and rendering.
//!
//! A [`Tag`] owns an ordered collection of frames ([`FrameMap`]) plus the handful of
//! tag-level policy flags (unsynchronization, extended header) that control how it renders.
//! Tags are always rendered as ID3v2.3 (see [`header::SAVE_VERSION`]) regardless of what
//! version they were parsed from, mirroring id3lib's write-only-2.3 behavior.

pub mod collections;
pub mod frames;
pub mod header;
pub mod syncdata;

pub use collections::FrameMap;
pub use frames::Frame;
pub use header::{ExtendedHeader, TagFlags, TagHeader, Version};

use crate::core::io::BufStream;
use crate::error::{ParseError, ParseResult, SaveError, SaveResult};
use crate::id3v1::{Id3v1Tag, V1_COMMENT_DESC};
use collections::FindCursor;
use log::{info, warn};
use std::convert::TryInto;

/// A parsed (or freshly-created) ID3v2 tag.
pub struct Tag {
    header: TagHeader,
    ext_header: Option<ExtendedHeader>,
    frames: FrameMap,
    cursor: FindCursor,
    unsync: bool,
    ext_header_policy: bool,
    compression: bool,
    padding: bool,
    /// Set by any structural mutation (add/remove/clear) and never cleared; there is no
    /// generic dirty-tracking on concrete frame structs, so in-place edits to a frame's
    /// public fields are not observed here. See the crate's design notes.
    changed: bool,
}

impl Tag {
    /// Creates an empty tag that will render as [`header::SAVE_VERSION`].
    pub fn new() -> Self {
        Self {
            header: TagHeader::with_version(header::SAVE_VERSION),
            ext_header: None,
            frames: FrameMap::new(),
            cursor: FindCursor::default(),
            unsync: false,
            ext_header_policy: false,
            compression: false,
            padding: true,
            changed: false,
        }
    }

    /// Parses a tag beginning at the first byte of `data`, which must start with the 10-byte
    /// `"ID3"` header. Follows the read algorithm: decode the header, resync the body if
    /// unsynchronized, skip an extended header if present, then iterate frames until the
    /// body is exhausted or padding (a run of NUL bytes) is reached.
    pub fn parse(data: &[u8]) -> ParseResult<Self> {
        if data.len() < header::TAG_HEADER_SIZE {
            return Err(ParseError::NotEnoughData);
        }

        let mut raw_header = [0; header::TAG_HEADER_SIZE];
        raw_header.copy_from_slice(&data[..header::TAG_HEADER_SIZE]);
        let header = TagHeader::parse(raw_header)?;

        let body_end = header::TAG_HEADER_SIZE + header.size() as usize;
        if data.len() < body_end {
            return Err(ParseError::NotEnoughData);
        }

        let mut body = data[header::TAG_HEADER_SIZE..body_end].to_vec();
        if header.flags().unsync {
            body = syncdata::decode(&body);
        }

        let mut stream = BufStream::new(&body);

        let ext_header = if header.flags().ext_header {
            match ExtendedHeader::parse(&mut stream, header.version()) {
                Ok(ext) => Some(ext),
                Err(_) => {
                    warn!("extended header flag was set but the header could not be parsed");
                    None
                }
            }
        } else {
            None
        };

        let mut frames = FrameMap::new();

        while !stream.is_empty() {
            if matches!(stream.peek(0..1), Ok(b) if b == [0]) {
                break;
            }

            match frames::parse(&header, &mut stream) {
                Ok(frame) => frames.add(frame),
                Err(err) => {
                    info!("stopping frame iteration early: {}", err);
                    break;
                }
            }
        }

        Ok(Self {
            header,
            ext_header,
            frames,
            cursor: FindCursor::default(),
            unsync: header.flags().unsync,
            ext_header_policy: false,
            compression: false,
            padding: true,
            changed: false,
        })
    }

    pub fn version(&self) -> Version {
        self.header.version()
    }

    pub fn frames(&self) -> &FrameMap {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut FrameMap {
        &mut self.frames
    }

    pub fn ext_header(&self) -> Option<&ExtendedHeader> {
        self.ext_header.as_ref()
    }

    pub fn unsync(&self) -> bool {
        self.unsync
    }

    pub fn set_unsync(&mut self, unsync: bool) {
        self.unsync = unsync;
    }

    pub fn set_ext_header(&mut self, enabled: bool) {
        self.ext_header_policy = enabled;
    }

    /// Whether frames are attempted to be zlib-compressed on render. Compression is only
    /// actually applied per-frame when it shrinks that frame; see [`frames::render`].
    pub fn compression(&self) -> bool {
        self.compression
    }

    pub fn set_compression(&mut self, enabled: bool) {
        self.compression = enabled;
    }

    /// Whether a [`crate::file::FileBinder`] should pad this tag's rendering to leave room for
    /// future in-place growth.
    pub fn padding(&self) -> bool {
        self.padding
    }

    pub fn set_padding(&mut self, enabled: bool) {
        self.padding = enabled;
    }

    /// Adds `frame`, merging with any existing frame of the same key.
    pub fn add_frame(&mut self, frame: Box<dyn Frame>) {
        self.cursor.reset();
        self.frames.add(frame);
        self.changed = true;
    }

    /// Adds any type implementing [`Frame`] by value, boxing it. A thin convenience over
    /// [`Tag::add_frame`] for callers holding a concrete frame rather than a trait object.
    pub fn add_frame_owned<F: Frame>(&mut self, frame: F) {
        self.add_frame(Box::new(frame));
    }

    /// Adds every frame in `frames`, in order, via [`Tag::add_frame`].
    pub fn add_frames<I: IntoIterator<Item = Box<dyn Frame>>>(&mut self, frames: I) {
        for frame in frames {
            self.add_frame(frame);
        }
    }

    /// Removes and returns every frame with the given four-character ID.
    pub fn remove_frame(&mut self, id: &[u8; 4]) -> Vec<Box<dyn Frame>> {
        self.cursor.reset();
        let removed = self.frames.remove_all(id);
        if !removed.is_empty() {
            self.changed = true;
        }
        removed
    }

    /// Returns the frame after the find-cursor whose ID matches `id`, advancing the cursor
    /// past it and wrapping once the search is exhausted. Switching to a different `id`
    /// resets the cursor back to the start (see the crate's find-cursor design notes).
    pub fn find(&mut self, id: &[u8; 4]) -> Option<&dyn Frame> {
        let matches = self.frames.get_all(id);
        if matches.is_empty() {
            return None;
        }

        let index = self.cursor.advance(id) % matches.len();
        self.frames.get_all(id).into_iter().nth(index)
    }

    /// Like [`Tag::find`], but only considers frames for which `pred` returns `true`. The
    /// cursor is shared with `find`/`find_value` — it tracks a selector by `id` alone, so
    /// switching between a plain `find(id)` and a predicated search on the same `id` is seen
    /// as the same selector and does not reset the cursor.
    pub fn find_where<F: Fn(&dyn Frame) -> bool>(&mut self, id: &[u8; 4], pred: F) -> Option<&dyn Frame> {
        let matches: Vec<&dyn Frame> = self.frames.get_all(id).into_iter().filter(|f| pred(f)).collect();
        if matches.is_empty() {
            return None;
        }

        let index = self.cursor.advance(id) % matches.len();
        self.frames
            .get_all(id)
            .into_iter()
            .filter(|f| pred(f))
            .nth(index)
    }

    /// Like [`Tag::find`], but only considers frames whose rendered [`Display`](std::fmt::Display)
    /// text equals `value`. There is no generic sub-field type in this crate's frame model, so
    /// this stands in for the field-value lookup id3lib exposes: most templates' `Display`
    /// already reproduces the single value callers would otherwise compare against.
    pub fn find_value(&mut self, id: &[u8; 4], value: &str) -> Option<&dyn Frame> {
        self.find_where(id, |frame| frame.to_string() == value)
    }

    /// The number of frames currently held, regardless of key.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// The frame at `index` in insertion order, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&dyn Frame> {
        self.frames.get_index(index)
    }

    pub fn clear(&mut self) {
        let had_frames = !self.frames.is_empty();
        self.frames.clear();
        self.cursor.reset();
        if had_frames {
            self.changed = true;
        }
    }

    /// Whether any frame has been added, removed, or cleared since this tag was created or
    /// parsed. Only tracks structural mutation through [`Tag::add_frame`]/[`Tag::add_frame_owned`]/
    /// [`Tag::add_frames`]/[`Tag::remove_frame`]/[`Tag::clear`] — editing a frame's own public
    /// fields in place (there is no generic dirty-flag abstraction over concrete frame structs)
    /// is not observed.
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Derives the ID3v1.1 equivalent of this tag's recognized text frames. Frames with no
    /// ID3v1 analogue are dropped; `TCON` is expected in the `"(NN)"` form this crate writes
    /// when converting an `Id3v1Tag` to frames, and falls back to genre `0xFF` ("none") when
    /// absent or unparseable.
    pub fn to_v1(&self) -> Id3v1Tag {
        let text_of = |id: &[u8; 4]| -> String {
            self.frames
                .get_all(id)
                .first()
                .map(|f| f.to_string())
                .unwrap_or_default()
        };

        let comment = self
            .frames
            .get(&format!["COMM:{}:{}", V1_COMMENT_DESC, crate::id3v2::frames::Language::default()])
            .map(|f| f.to_string())
            .unwrap_or_default();

        let track = self
            .frames
            .get_all(b"TRCK")
            .first()
            .and_then(|f| f.to_string().parse::<u8>().ok());

        let genre = self
            .frames
            .get_all(b"TCON")
            .first()
            .and_then(|f| {
                let s = f.to_string();
                s.strip_prefix('(')?.strip_suffix(')')?.parse::<u8>().ok()
            })
            .unwrap_or(0xFF);

        Id3v1Tag {
            title: text_of(b"TIT2"),
            artist: text_of(b"TPE1"),
            album: text_of(b"TALB"),
            year: text_of(b"TYER"),
            comment,
            track,
            genre,
        }
    }

    /// Renders this tag's ID3v1.1 equivalent to a fixed 128-byte block. Shorthand for
    /// `self.to_v1().render()`.
    pub fn render_v1(&self) -> [u8; crate::id3v1::TAG_SIZE] {
        self.to_v1().render()
    }

    /// Renders this tag with no padding.
    pub fn render(&self) -> SaveResult<Vec<u8>> {
        self.render_padded(0)
    }

    /// Renders this tag, appending `padding_size` zero bytes inside the tag body after the
    /// frames. Padding lets a future update grow the tag in place without moving audio data.
    pub fn render_padded(&self, padding_size: u32) -> SaveResult<Vec<u8>> {
        // Always render against SAVE_VERSION, even if this tag was parsed from an older or
        // newer version: this crate only ever writes ID3v2.3.
        let save_header = TagHeader::with_version(header::SAVE_VERSION);
        let mut body = Vec::new();

        for frame in self.frames.values() {
            body.extend(frames::render(frame, &save_header, self.compression)?);
        }

        if self.unsync {
            body = syncdata::encode(&body);
        }

        body.resize(body.len() + padding_size as usize, 0);

        let total_size: u32 = body.len().try_into().map_err(|_| SaveError::TooLarge)?;
        if total_size > header::MAX_TAG_SIZE {
            return Err(SaveError::TooLarge);
        }

        let mut header = TagHeader::with_version(header::SAVE_VERSION);
        *header.size_mut() = total_size;
        header.flags_mut().unsync = self.unsync;

        let mut out = Vec::with_capacity(header::TAG_HEADER_SIZE + body.len());
        out.extend(header.render());
        out.extend(body);

        Ok(out)
    }

    /// The number of bytes [`Tag::render`] would currently produce, with no padding.
    pub fn size(&self) -> usize {
        self.render().map(|data| data.len()).unwrap_or(0)
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frames::{FrameId, TextFrame};

    fn sample_tag_bytes() -> Vec<u8> {
        let mut frame = TextFrame::new(FrameId::new(b"TIT2"));
        frame.text.push(String::from("Hurricane"));

        let header = TagHeader::with_version(Version::V23);
        let rendered_frame = frames::render(&frame, &header, false).unwrap();

        let mut body = rendered_frame;
        let size = body.len() as u32;

        let mut out = vec![b'I', b'D', b'3', 3, 0, 0];
        out.extend(syncdata::from_u28(size));
        out.extend(body.drain(..));

        out
    }

    #[test]
    fn parse_tag_with_one_frame() {
        let data = sample_tag_bytes();
        let mut tag = Tag::parse(&data).unwrap();

        let frame = tag.find(b"TIT2").unwrap();
        let text_frame = frame.downcast::<TextFrame>().unwrap();
        assert_eq!(text_frame.text[0], "Hurricane");
    }

    #[test]
    fn render_round_trips() {
        let mut tag = Tag::new();
        let mut frame = TextFrame::new(FrameId::new(b"TALB"));
        frame.text.push(String::from("Foxtrot"));
        tag.add_frame(Box::new(frame));

        let rendered = tag.render().unwrap();
        let reparsed = Tag::parse(&rendered).unwrap();

        let frame = reparsed.frames().get("TALB").unwrap();
        assert_eq!(frame.downcast::<TextFrame>().unwrap().text[0], "Foxtrot");
    }

    #[test]
    fn find_cursor_resets_on_selector_change() {
        let mut tag = Tag::new();
        tag.add_frame(Box::new({
            let mut f = TextFrame::new(FrameId::new(b"TPE1"));
            f.text.push(String::from("A"));
            f
        }));

        assert!(tag.find(b"TPE1").is_some());
        assert!(tag.find(b"TALB").is_none());
        assert!(tag.find(b"TPE1").is_some());
    }

    #[test]
    fn find_wraps_after_exhausting_matches() {
        use frames::CommentsFrame;

        let mut tag = Tag::new();
        for desc in ["first", "second", "third"] {
            tag.add_frame(Box::new(CommentsFrame {
                desc: String::from(desc),
                text: desc.to_string(),
                ..Default::default()
            }));
        }

        let mut seen = Vec::new();
        for _ in 0..3 {
            let frame = tag.find(b"COMM").unwrap();
            seen.push(frame.downcast::<CommentsFrame>().unwrap().desc.clone());
        }

        // Three successive calls return three distinct frames, in insertion order...
        assert_eq!(seen, vec!["first", "second", "third"]);

        // ...and the fourth call wraps back around to the first match.
        let wrapped = tag.find(b"COMM").unwrap();
        assert_eq!(wrapped.downcast::<CommentsFrame>().unwrap().desc, "first");
    }
}
