//! Frames whose payload is mostly or entirely opaque binary data, distinguished from one
//! another by a small header of owner/identifier strings.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::error::ParseResult;
use crate::id3v2::frames::{encoding, Frame, FrameId};
use crate::id3v2::header::TagHeader;
use std::fmt::{self, Display, Formatter};

/// Any frame this crate does not recognize, or recognizes but cannot decode (encrypted
/// frames). The raw frame body is kept so the frame can still be rendered back out
/// unchanged.
#[derive(Debug, Clone)]
pub struct UnknownFrame {
    frame_id: FrameId,
    data: Vec<u8>,
}

impl UnknownFrame {
    pub(crate) fn from_stream(frame_id: FrameId, stream: &mut BufStream) -> Self {
        Self {
            frame_id,
            data: stream.take_rest().to_vec(),
        }
    }

    /// Built from a frame ID that could not be upgraded from ID3v2.2's three-character form;
    /// the original three bytes are kept (uppercased into the low three bytes of a synthetic
    /// 4-byte ID) purely for display purposes.
    pub(crate) fn from_v2_id(raw_id: [u8; 3], stream: &mut BufStream) -> Self {
        let frame_id = FrameId::parse(&[b'X', raw_id[0], raw_id[1], raw_id[2]])
            .unwrap_or_else(|_| FrameId::new(b"XXXX"));

        Self {
            frame_id,
            data: stream.take_rest().to_vec(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }
}

impl Frame for UnknownFrame {
    fn id(&self) -> FrameId {
        self.frame_id
    }

    fn key(&self) -> String {
        self.id().to_string()
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn render(&self, _: &TagHeader) -> Vec<u8> {
        self.data.clone()
    }
}

impl Display for UnknownFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let shown = &self.data[..self.data.len().min(64)];
        for byte in shown {
            write![f, "{:02x}", byte]?;
        }
        Ok(())
    }
}

/// `UFID`: an identifier assigned by `owner` (usually a URL naming the scheme), such as a
/// MusicBrainz recording ID.
#[derive(Default, Debug, Clone)]
pub struct UniqueFileIdFrame {
    pub owner: String,
    pub identifier: Vec<u8>,
}

impl UniqueFileIdFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let owner = string::read_terminated(Encoding::Latin1, stream);
        let identifier = stream.take_rest().to_vec();

        Ok(Self { owner, identifier })
    }
}

impl Frame for UniqueFileIdFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"UFID")
    }

    fn key(&self) -> String {
        format!["UFID:{}", self.owner]
    }

    fn is_empty(&self) -> bool {
        self.identifier.is_empty()
    }

    fn render(&self, _: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();
        result.extend(string::render_terminated(Encoding::Latin1, &self.owner));
        result.extend(&self.identifier);
        result
    }
}

impl Display for UniqueFileIdFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.owner]
    }
}

/// `PRIV`: an application-private blob, identified by an `owner` string naming the
/// application (a reverse-DNS-style identifier by convention, but not enforced).
#[derive(Default, Debug, Clone)]
pub struct PrivateFrame {
    pub owner: String,
    pub data: Vec<u8>,
}

impl PrivateFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let owner = string::read_terminated(Encoding::Latin1, stream);
        let data = stream.take_rest().to_vec();

        Ok(Self { owner, data })
    }
}

impl Frame for PrivateFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"PRIV")
    }

    fn key(&self) -> String {
        format!["PRIV:{}", self.owner]
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn render(&self, _: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();
        result.extend(string::render_terminated(Encoding::Latin1, &self.owner));
        result.extend(&self.data);
        result
    }
}

impl Display for PrivateFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.owner]
    }
}

/// `ENCR`: registers a symbol (`method_symbol`) that other frames' encryption flags refer
/// to, pointing at `owner` for the actual decryption scheme. This crate never decrypts
/// frames, so `ENCR` is preserved only so a tag can be round-tripped unchanged.
#[derive(Default, Debug, Clone)]
pub struct EncryptionRegistrationFrame {
    pub owner: String,
    pub method_symbol: u8,
    pub data: Vec<u8>,
}

impl EncryptionRegistrationFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let owner = string::read_terminated(Encoding::Latin1, stream);
        let method_symbol = stream.read_u8()?;
        let data = stream.take_rest().to_vec();

        Ok(Self {
            owner,
            method_symbol,
            data,
        })
    }
}

impl Frame for EncryptionRegistrationFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"ENCR")
    }

    fn key(&self) -> String {
        format!["ENCR:{}", self.owner]
    }

    fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }

    fn render(&self, _: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();
        result.extend(string::render_terminated(Encoding::Latin1, &self.owner));
        result.push(self.method_symbol);
        result.extend(&self.data);
        result
    }
}

impl Display for EncryptionRegistrationFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.owner]
    }
}

/// `GRID`: registers a symbol (`group_symbol`) that other frames' grouping flags refer to.
#[derive(Default, Debug, Clone)]
pub struct GroupIdRegistrationFrame {
    pub owner: String,
    pub group_symbol: u8,
    pub data: Vec<u8>,
}

impl GroupIdRegistrationFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let owner = string::read_terminated(Encoding::Latin1, stream);
        let group_symbol = stream.read_u8()?;
        let data = stream.take_rest().to_vec();

        Ok(Self {
            owner,
            group_symbol,
            data,
        })
    }
}

impl Frame for GroupIdRegistrationFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"GRID")
    }

    fn key(&self) -> String {
        format!["GRID:{}", self.owner]
    }

    fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }

    fn render(&self, _: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();
        result.extend(string::render_terminated(Encoding::Latin1, &self.owner));
        result.push(self.group_symbol);
        result.extend(&self.data);
        result
    }
}

impl Display for GroupIdRegistrationFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.owner]
    }
}

/// `LINK`: points at a frame in another ID3v2 tag (usually in another file) instead of
/// duplicating its content. Kept opaque beyond its three named fields since following the
/// link is outside this crate's scope.
#[derive(Default, Debug, Clone)]
pub struct LinkedInfoFrame {
    pub linked_id: RawFrameId,
    pub url: String,
    pub additional_data: String,
}

/// A raw 4-byte frame identifier, used by [`LinkedInfoFrame`] where the linked frame may not
/// be one this crate's [`FrameId`] can validate (it lives in a different tag entirely).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrameId(pub [u8; 4]);

impl LinkedInfoFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let linked_id = RawFrameId(stream.read_array()?);
        let url = string::read_terminated(Encoding::Latin1, stream);
        let additional_data = string::read(Encoding::Latin1, stream);

        Ok(Self {
            linked_id,
            url,
            additional_data,
        })
    }
}

impl Frame for LinkedInfoFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"LINK")
    }

    fn key(&self) -> String {
        format!["LINK:{:?}:{}", self.linked_id.0, self.url]
    }

    fn is_empty(&self) -> bool {
        self.url.is_empty()
    }

    fn render(&self, _: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();
        result.extend(self.linked_id.0);
        result.extend(string::render_terminated(Encoding::Latin1, &self.url));
        result.extend(string::render(Encoding::Latin1, &self.additional_data));
        result
    }
}

impl Display for LinkedInfoFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.url]
    }
}

/// `GEOB`: an arbitrary file embedded in the tag, with a MIME type, an optional original
/// filename, and a description.
#[derive(Default, Debug, Clone)]
pub struct GeneralObjectFrame {
    pub encoding: Encoding,
    pub mime: String,
    pub filename: String,
    pub desc: String,
    pub data: Vec<u8>,
}

impl GeneralObjectFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let mime = string::read_terminated(Encoding::Latin1, stream);
        let filename = string::read_terminated(encoding, stream);
        let desc = string::read_terminated(encoding, stream);
        let data = stream.take_rest().to_vec();

        Ok(Self {
            encoding,
            mime,
            filename,
            desc,
            data,
        })
    }
}

impl Frame for GeneralObjectFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"GEOB")
    }

    fn key(&self) -> String {
        format!["GEOB:{}", self.desc]
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn render(&self, tag_header: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();

        let encoding = encoding::check(self.encoding, tag_header.version());
        result.push(encoding::render(encoding));
        result.extend(string::render_terminated(Encoding::Latin1, &self.mime));
        result.extend(string::render_terminated(encoding, &self.filename));
        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(&self.data);

        result
    }
}

impl Display for GeneralObjectFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if !self.mime.is_empty() {
            write![f, "{} ", self.mime]?;
        }
        if !self.filename.is_empty() {
            write![f, "\"{}\"", self.filename]?;
        }
        if !self.desc.is_empty() {
            write![f, " [{}]", self.desc]?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIV_DATA: &[u8] = b"test@test.com\0\x16\x16\x16\x16\x16\x16";
    const UFID_DATA: &[u8] = b"http://www.id3.org/dummy/ufid.html\0\x16\x16\x16\x16\x16\x16";
    const GEOB_DATA: &[u8] = b"\x00text/txt\0Lyrics.lrc\0Lyrics\0\x16\x16\x16\x16\x16\x16";

    #[test]
    fn parse_priv_frame() {
        let mut stream = BufStream::new(PRIV_DATA);
        let frame = PrivateFrame::parse(&mut stream).unwrap();
        assert_eq!(frame.owner, "test@test.com");
        assert_eq!(frame.data, b"\x16\x16\x16\x16\x16\x16");
    }

    #[test]
    fn parse_ufid_frame() {
        let mut stream = BufStream::new(UFID_DATA);
        let frame = UniqueFileIdFrame::parse(&mut stream).unwrap();
        assert_eq!(frame.owner, "http://www.id3.org/dummy/ufid.html");
        assert_eq!(frame.identifier, b"\x16\x16\x16\x16\x16\x16");
    }

    #[test]
    fn parse_geob_frame() {
        let mut stream = BufStream::new(GEOB_DATA);
        let frame = GeneralObjectFrame::parse(&mut stream).unwrap();
        assert_eq!(frame.mime, "text/txt");
        assert_eq!(frame.filename, "Lyrics.lrc");
        assert_eq!(frame.desc, "Lyrics");
        assert_eq!(frame.data, b"\x16\x16\x16\x16\x16\x16");
    }
}
