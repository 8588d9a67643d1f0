//! Frame parsing and implementations.
//!
//! An ID3v2 tag is made up of chunks of data the spec calls "frames". Frames are
//! heterogeneous enough — some hold plain text, some hold binary blobs, some hold a handful
//! of independent sub-fields — that representing them as one generic struct would mean
//! runtime dispatch on every field access. Instead each frame template gets its own
//! concrete type, all implementing [`Frame`] as a trait object so a tag can hold a
//! mixed collection of them.

mod bin;
mod comments;
mod encoding;
mod lang;
mod picture;
mod stats;
mod text;
mod url;

pub use bin::{
    EncryptionRegistrationFrame, GeneralObjectFrame, GroupIdRegistrationFrame, LinkedInfoFrame,
    PrivateFrame, RawFrameId, UniqueFileIdFrame, UnknownFrame,
};
pub use comments::{CommentsFrame, UnsyncedLyricsFrame};
pub use lang::{InvalidLanguageError, Language};
pub use picture::AttachedPictureFrame;
pub use stats::{PlayCounterFrame, PopularimeterFrame};
pub use text::{CreditsFrame, TextFrame, UserTextFrame};
pub use url::{UrlFrame, UserUrlFrame};

use crate::core::io::BufStream;
use crate::error::{ParseError, ParseResult, SaveError, SaveResult};
use crate::id3v2::header::{TagHeader, Version};
use crate::id3v2::syncdata;
use dyn_clone::DynClone;
use log::warn;
use std::any::Any;
use std::convert::TryInto;
use std::fmt::{self, Debug, Display, Formatter};
use std::str;

/// A single tag entry: a typed chunk of metadata identified by a four-character ID.
///
/// Downcasting follows the pattern used by the `downcast-rs` crate: [`AsAny`] is implemented
/// for every `Frame` automatically, gated behind a [`Sealed`] token so that callers outside
/// this module cannot call it directly and bypass the typed accessors on `dyn Frame`.
pub trait Frame: Display + Debug + AsAny + DynClone {
    fn id(&self) -> FrameId;
    /// The key this frame is stored under in a tag's frame map. For frames that are unique
    /// per tag this is just the frame ID; for frames that can repeat (`TXXX`, `COMM`, `APIC`,
    /// ...) it also folds in whatever sub-field the spec uses to distinguish instances.
    fn key(&self) -> String;
    fn is_empty(&self) -> bool;
    fn render(&self, tag_header: &TagHeader) -> Vec<u8>;
}

dyn_clone::clone_trait_object!(Frame);

impl dyn Frame {
    pub fn is<T: Frame>(&self) -> bool {
        self.as_any(Sealed(())).is::<T>()
    }

    pub fn downcast<T: Frame>(&self) -> Option<&T> {
        self.as_any(Sealed(())).downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Frame>(&mut self) -> Option<&mut T> {
        self.as_any_mut(Sealed(())).downcast_mut::<T>()
    }
}

pub trait AsAny: Any {
    fn as_any(&self, _: Sealed) -> &dyn Any;
    fn as_any_mut(&mut self, _: Sealed) -> &mut dyn Any;
}

impl<T: Frame> AsAny for T {
    fn as_any(&self, _: Sealed) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self, _: Sealed) -> &mut dyn Any {
        self
    }
}

/// A token for calling internal methods.
///
/// This struct limits [`AsAny`]'s methods to this module, since its only constructor is
/// private.
pub struct Sealed(());

/// A four-character ID3v2 frame identifier. ID3v2.2's three-character IDs are upgraded to
/// their ID3v2.3 equivalent on parse (see [`upgrade_v2_id`]), so the rest of this crate only
/// ever deals with four-character IDs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FrameId([u8; 4]);

impl FrameId {
    pub fn new(id: &[u8; 4]) -> Self {
        Self::parse(id).expect("frame IDs must be 4 uppercase ASCII characters or numbers")
    }

    pub fn parse(id: &[u8; 4]) -> ParseResult<Self> {
        if !is_frame_id(id) {
            return Err(ParseError::MalformedData);
        }

        Ok(Self(*id))
    }

    pub fn inner(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        str::from_utf8(&self.0).unwrap()
    }

    pub fn starts_with(&self, ch: u8) -> bool {
        self.0[0] == ch
    }
}

impl Display for FrameId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.as_str()]
    }
}

impl PartialEq<[u8; 4]> for FrameId {
    fn eq(&self, other: &[u8; 4]) -> bool {
        self.0 == *other
    }
}

impl PartialEq<&[u8; 4]> for FrameId {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        self == *other
    }
}

fn is_frame_id(id: &[u8; 4]) -> bool {
    id.iter().all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
}

/// Upgrades a three-character ID3v2.2 frame ID to the four-character ID3v2.3 equivalent it
/// shares a field layout with. IDs outside this table are not representable in ID3v2.3 and
/// are kept as raw, unrecognized data by [`UnknownFrame`].
fn upgrade_v2_id(id: [u8; 3]) -> Option<[u8; 4]> {
    Some(match &id {
        b"COM" => *b"COMM",
        b"TAL" => *b"TALB",
        b"TCO" => *b"TCON",
        b"TCM" => *b"TCOM",
        b"TCR" => *b"TCOP",
        b"TDA" => *b"TDAT",
        b"TEN" => *b"TENC",
        b"TFT" => *b"TFLT",
        b"TIM" => *b"TIME",
        b"TKE" => *b"TKEY",
        b"TLA" => *b"TLAN",
        b"TLE" => *b"TLEN",
        b"TMT" => *b"TMED",
        b"TOA" => *b"TOPE",
        b"TOF" => *b"TOFN",
        b"TOL" => *b"TOLY",
        b"TOR" => *b"TORY",
        b"TOT" => *b"TOAL",
        b"TP1" => *b"TPE1",
        b"TP2" => *b"TPE2",
        b"TP3" => *b"TPE3",
        b"TP4" => *b"TPE4",
        b"TPA" => *b"TPOS",
        b"TPB" => *b"TPUB",
        b"TRC" => *b"TSRC",
        b"TRD" => *b"TRDA",
        b"TRK" => *b"TRCK",
        b"TSI" => *b"TSIZ",
        b"TSS" => *b"TSSE",
        b"TT1" => *b"TIT1",
        b"TT2" => *b"TIT2",
        b"TT3" => *b"TIT3",
        b"TXT" => *b"TEXT",
        b"TXX" => *b"TXXX",
        b"TYE" => *b"TYER",
        b"UFI" => *b"UFID",
        b"ULT" => *b"USLT",
        b"WAF" => *b"WOAF",
        b"WAR" => *b"WOAR",
        b"WAS" => *b"WOAS",
        b"WCM" => *b"WCOM",
        b"WCP" => *b"WCOP",
        b"WPB" => *b"WPUB",
        b"WXX" => *b"WXXX",
        b"IPL" => *b"IPLS",
        b"PIC" => *b"APIC",
        b"GEO" => *b"GEOB",
        b"CNT" => *b"PCNT",
        b"POP" => *b"POPM",
        b"CRM" => *b"PRIV",
        b"SLT" => *b"SYLT",
        b"ETC" => *b"ETCO",
        b"MLL" => *b"MLLT",
        b"CRA" => *b"AENC",
        b"LNK" => *b"LINK",
        _ => return None,
    })
}

/// Parses a single frame from `stream`, dispatching on the tag's version. `stream` is
/// positioned at the start of the frame header and is left positioned just past this frame's
/// data on success.
pub(crate) fn parse(tag_header: &TagHeader, stream: &mut BufStream) -> ParseResult<Box<dyn Frame>> {
    match tag_header.version() {
        Version::V22 => parse_frame_v2(stream),
        Version::V23 => parse_frame_v3(tag_header, stream),
        Version::V24 => parse_frame_v4(tag_header, stream),
    }
}

fn parse_frame_v2(stream: &mut BufStream) -> ParseResult<Box<dyn Frame>> {
    let raw_id: [u8; 3] = stream.read_array()?;
    let size = stream.read_be_u24()? as usize;

    if size == 0 {
        return Err(ParseError::MalformedData);
    }

    let mut stream = stream.slice_stream(size)?;

    let upgraded = upgrade_v2_id(raw_id);

    let frame = match upgraded {
        Some(id_bytes) if &id_bytes == b"APIC" => {
            Box::new(picture::AttachedPictureFrame::parse_v2(&mut stream)?) as Box<dyn Frame>
        }
        Some(id_bytes) => {
            let frame_id = FrameId::new(&id_bytes);
            parse_body(frame_id, &mut stream)?
        }
        None => Box::new(UnknownFrame::from_v2_id(raw_id, &mut stream)),
    };

    Ok(frame)
}

fn parse_frame_v3(tag_header: &TagHeader, stream: &mut BufStream) -> ParseResult<Box<dyn Frame>> {
    let frame_id = FrameId::parse(&stream.read_array()?)?;
    let size = stream.read_be_u32()? as usize;
    let flags = stream.read_be_u16()?;

    if size == 0 {
        return Err(ParseError::MalformedData);
    }

    let mut stream = stream.slice_stream(size)?;
    let mut decoded = Vec::new();

    if flags & 0x40 != 0 {
        warn!("encryption is not supported for frame {}", frame_id);
        return Ok(Box::new(UnknownFrame::from_stream(frame_id, &mut stream)));
    }

    // Compression implies a 4-byte decompressed-size indicator ahead of the zlib stream.
    if flags & 0x80 != 0 {
        stream.skip(4)?;

        decoded = match inflate_frame(&mut stream) {
            Ok(data) => data,
            Err(_) => return Ok(Box::new(UnknownFrame::from_stream(frame_id, &mut stream))),
        };

        stream = BufStream::new(&decoded);
    }

    if flags & 0x20 != 0 && !stream.is_empty() {
        stream.skip(1)?;
    }

    let _ = tag_header;
    let frame = parse_body(frame_id, &mut stream)?;
    let _ = &decoded;

    Ok(frame)
}

fn parse_frame_v4(tag_header: &TagHeader, stream: &mut BufStream) -> ParseResult<Box<dyn Frame>> {
    let frame_id = FrameId::parse(&stream.read_array()?)?;
    let size = syncdata::to_u28(stream.read_array()?) as usize;
    let flags = stream.read_be_u16()?;

    if size == 0 {
        return Err(ParseError::MalformedData);
    }

    let mut stream = stream.slice_stream(size)?;
    let mut decoded = Vec::new();

    if flags & 0x2 != 0 || tag_header.flags().unsync {
        decoded = syncdata::decode(stream.take_rest());
        stream = BufStream::new(&decoded);
    }

    if flags & 0x40 != 0 {
        stream.skip(1)?;
    }

    if flags & 0x4 != 0 {
        warn!("encryption is not supported for frame {}", frame_id);
        return Ok(Box::new(UnknownFrame::from_stream(frame_id, &mut stream)));
    }

    if flags & 0x1 != 0 || flags & 0x8 != 0 {
        stream.skip(4)?;
    }

    if flags & 0x8 != 0 {
        decoded = match inflate_frame(&mut stream) {
            Ok(data) => data,
            Err(_) => return Ok(Box::new(UnknownFrame::from_stream(frame_id, &mut stream))),
        };

        stream = BufStream::new(&decoded);
    }

    let frame = parse_body(frame_id, &mut stream)?;
    let _ = &decoded;

    Ok(frame)
}

/// Dispatches on the (already-upgraded-to-v2.3-shape) frame ID to build the right concrete
/// frame type. Unrecognized IDs fall back to [`UnknownFrame`], preserving the raw bytes.
fn parse_body(frame_id: FrameId, stream: &mut BufStream) -> ParseResult<Box<dyn Frame>> {
    let frame: Box<dyn Frame> = match frame_id.inner() {
        b"UFID" => Box::new(bin::UniqueFileIdFrame::parse(stream)?),

        b"TXXX" => Box::new(text::UserTextFrame::parse(stream)?),
        _ if text::TextFrame::is_id(frame_id) => Box::new(text::TextFrame::parse(frame_id, stream)?),
        b"IPLS" | b"TIPL" | b"TMCL" => Box::new(text::CreditsFrame::parse(frame_id, stream)?),

        b"WXXX" => Box::new(url::UserUrlFrame::parse(stream)?),
        _ if frame_id.starts_with(b'W') => Box::new(url::UrlFrame::parse(frame_id, stream)?),

        b"USLT" => Box::new(comments::UnsyncedLyricsFrame::parse(stream)?),
        b"COMM" => Box::new(comments::CommentsFrame::parse(stream)?),

        b"APIC" => Box::new(picture::AttachedPictureFrame::parse(stream)?),
        b"GEOB" => Box::new(bin::GeneralObjectFrame::parse(stream)?),

        b"PCNT" => Box::new(stats::PlayCounterFrame::parse(stream)?),
        b"POPM" => Box::new(stats::PopularimeterFrame::parse(stream)?),

        b"ENCR" => Box::new(bin::EncryptionRegistrationFrame::parse(stream)?),
        b"GRID" => Box::new(bin::GroupIdRegistrationFrame::parse(stream)?),
        b"LINK" => Box::new(bin::LinkedInfoFrame::parse(stream)?),
        b"PRIV" => Box::new(bin::PrivateFrame::parse(stream)?),

        // SYLT/ETCO/MLLT carry their own internal sub-structure, but nothing downstream of
        // this crate needs it interpreted, so they are kept as opaque binary payloads.
        b"SYLT" | b"ETCO" | b"MLLT" => Box::new(bin::UnknownFrame::from_stream(frame_id, stream)),

        _ => Box::new(bin::UnknownFrame::from_stream(frame_id, stream)),
    };

    Ok(frame)
}

#[cfg(feature = "id3v2_zlib")]
fn inflate_frame(stream: &mut BufStream) -> ParseResult<Vec<u8>> {
    miniz_oxide::inflate::decompress_to_vec_zlib(stream.take_rest()).map_err(|err| {
        warn!("could not decompress frame: {:?}", err);
        ParseError::MalformedData
    })
}

#[cfg(not(feature = "id3v2_zlib"))]
fn inflate_frame(_stream: &mut BufStream) -> ParseResult<Vec<u8>> {
    warn!("frame decompression is not enabled");
    Err(ParseError::Unsupported)
}

/// Renders a single frame, including its ID3v2.3 frame header. Encryption is never applied on
/// write — this crate never produces encrypted frames. Compression is attempted only when
/// `compress` is set and only kept if it actually shrinks the frame; taggers that read a
/// compressed flag with no size reduction are within their rights to reject the frame, so a
/// compression attempt that doesn't pay off is silently discarded in favor of a plain frame.
pub(crate) fn render(frame: &dyn Frame, tag_header: &TagHeader, compress: bool) -> SaveResult<Vec<u8>> {
    let mut data = Vec::new();
    data.extend(frame.id().inner());

    let frame_data = frame.render(tag_header);

    let (flags, body) = if compress {
        match try_compress(&frame_data) {
            Some(compressed) if compressed.len() < frame_data.len() => {
                let mut body = Vec::with_capacity(4 + compressed.len());
                body.extend((frame_data.len() as u32).to_be_bytes());
                body.extend(compressed);
                ([0x00, 0x80], body)
            }
            _ => ([0x00, 0x00], frame_data),
        }
    } else {
        ([0x00, 0x00], frame_data)
    };

    let size: u32 = body.len().try_into().map_err(|_| {
        warn!("frame size {}b exceeds the maximum ID3v2 frame size", body.len());
        SaveError::TooLarge
    })?;

    data.extend(size.to_be_bytes());
    data.extend(flags);
    data.extend(body);

    Ok(data)
}

#[cfg(feature = "id3v2_zlib")]
fn try_compress(data: &[u8]) -> Option<Vec<u8>> {
    Some(miniz_oxide::deflate::compress_to_vec_zlib(data, 6))
}

#[cfg(not(feature = "id3v2_zlib"))]
fn try_compress(_data: &[u8]) -> Option<Vec<u8>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_known_v2_id() {
        assert_eq!(upgrade_v2_id(*b"TT2"), Some(*b"TIT2"));
    }

    #[test]
    fn upgrade_unknown_v2_id_is_none() {
        assert_eq!(upgrade_v2_id(*b"ZZZ"), None);
    }

    #[test]
    fn parse_v2_frame_upgrades_and_dispatches() {
        let data = b"TT2\x00\x00\x0A\x00Hurricane";
        let mut stream = BufStream::new(data);
        let frame = parse_frame_v2(&mut stream).unwrap();
        assert_eq!(frame.id(), FrameId::new(b"TIT2"));
    }

    #[test]
    fn render_without_compression_clears_flags() {
        let mut frame = text::TextFrame::new(FrameId::new(b"TIT2"));
        frame.text.push(String::from("Hurricane"));

        let header = TagHeader::with_version(Version::V23);
        let rendered = render(&frame, &header, false).unwrap();

        assert_eq!(&rendered[8..10], &[0, 0]);
    }

    #[cfg(feature = "id3v2_zlib")]
    #[test]
    fn render_with_compression_sets_flag_when_smaller() {
        let mut frame = text::TextFrame::new(FrameId::new(b"TIT2"));
        frame.text.push("a".repeat(500));

        let header = TagHeader::with_version(Version::V23);
        let rendered = render(&frame, &header, true).unwrap();

        assert_eq!(&rendered[8..10], &[0x00, 0x80]);

        let raw_size = u32::from_be_bytes(rendered[10..14].try_into().unwrap());
        assert_eq!(raw_size as usize, frame.render(&header).len());
    }

    #[test]
    fn render_with_compression_falls_back_when_not_smaller() {
        let mut frame = text::TextFrame::new(FrameId::new(b"TIT2"));
        frame.text.push(String::from("short"));

        let header = TagHeader::with_version(Version::V23);
        let rendered = render(&frame, &header, true).unwrap();

        assert_eq!(&rendered[8..10], &[0, 0]);
    }
}
