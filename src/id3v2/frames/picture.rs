//! `APIC`: an embedded picture, such as cover art.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::error::ParseResult;
use crate::id3v2::frames::{encoding, Frame, FrameId};
use crate::id3v2::header::TagHeader;
use std::fmt::{self, Display, Formatter};

byte_enum! {
    /// The role a picture plays, as assigned by the tagger.
    pub enum PictureType {
        Other = 0x00,
        FileIcon = 0x01,
        OtherFileIcon = 0x02,
        FrontCover = 0x03,
        BackCover = 0x04,
        LeafletPage = 0x05,
        Media = 0x06,
        LeadArtist = 0x07,
        Artist = 0x08,
        Conductor = 0x09,
        Band = 0x0A,
        Composer = 0x0B,
        Lyricist = 0x0C,
        RecordingLocation = 0x0D,
        DuringRecording = 0x0E,
        DuringPerformance = 0x0F,
        ScreenCapture = 0x10,
        BrightColoredFish = 0x11,
        Illustration = 0x12,
        BandLogo = 0x13,
        PublisherLogo = 0x14,
    };
    PictureType::Other
}

#[derive(Debug, Clone)]
pub struct AttachedPictureFrame {
    pub encoding: Encoding,
    pub mime: String,
    pub pic_type: PictureType,
    pub desc: String,
    pub picture: Vec<u8>,
}

impl Default for AttachedPictureFrame {
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            mime: String::new(),
            pic_type: PictureType::Other,
            desc: String::new(),
            picture: Vec::new(),
        }
    }
}

impl AttachedPictureFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let mime = string::read_terminated(Encoding::Latin1, stream);
        let pic_type = PictureType::parse(stream.read_u8()?);
        let desc = string::read_terminated(encoding, stream);
        let picture = stream.take_rest().to_vec();

        Ok(Self {
            encoding,
            mime,
            pic_type,
            desc,
            picture,
        })
    }

    /// Parses an ID3v2.2 `PIC` frame, which uses a three-character image format code
    /// (`PNG`, `JPG`, ...) in place of a MIME type.
    pub(crate) fn parse_v2(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let format: [u8; 3] = stream.read_array()?;
        let mime = mime_for_v2_format(&format);
        let pic_type = PictureType::parse(stream.read_u8()?);
        let desc = string::read_terminated(encoding, stream);
        let picture = stream.take_rest().to_vec();

        Ok(Self {
            encoding,
            mime,
            pic_type,
            desc,
            picture,
        })
    }
}

fn mime_for_v2_format(format: &[u8; 3]) -> String {
    match format {
        b"PNG" => String::from("image/png"),
        b"JPG" => String::from("image/jpeg"),
        b"BMP" => String::from("image/bmp"),
        b"GIF" => String::from("image/gif"),
        _ => String::from("image/"),
    }
}

impl Frame for AttachedPictureFrame {
    fn id(&self) -> FrameId {
        FrameId::new(b"APIC")
    }

    fn key(&self) -> String {
        format!["APIC:{}", self.desc]
    }

    fn is_empty(&self) -> bool {
        self.picture.is_empty()
    }

    fn render(&self, tag_header: &TagHeader) -> Vec<u8> {
        let mut result = Vec::new();

        let encoding = encoding::check(self.encoding, tag_header.version());
        result.push(encoding::render(encoding));
        result.extend(string::render_terminated(Encoding::Latin1, &self.mime));
        result.push(self.pic_type as u8);
        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(&self.picture);

        result
    }
}

impl Display for AttachedPictureFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{:?}", self.pic_type]?;
        if !self.desc.is_empty() {
            write![f, ": {}", self.desc]?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APIC_DATA: &[u8] = b"\x00image/png\0\x03Cover\0\x16\x16\x16\x16";
    const PIC_DATA: &[u8] = b"\x00PNG\x03Cover\0\x16\x16\x16\x16";

    #[test]
    fn parse_apic_frame() {
        let mut stream = BufStream::new(APIC_DATA);
        let frame = AttachedPictureFrame::parse(&mut stream).unwrap();

        assert_eq!(frame.mime, "image/png");
        assert_eq!(frame.pic_type, PictureType::FrontCover);
        assert_eq!(frame.desc, "Cover");
        assert_eq!(frame.picture, b"\x16\x16\x16\x16");
    }

    #[test]
    fn parse_pic_v2_frame() {
        let mut stream = BufStream::new(PIC_DATA);
        let frame = AttachedPictureFrame::parse_v2(&mut stream).unwrap();

        assert_eq!(frame.mime, "image/png");
        assert_eq!(frame.pic_type, PictureType::FrontCover);
        assert_eq!(frame.desc, "Cover");
        assert_eq!(frame.picture, b"\x16\x16\x16\x16");
    }
}
