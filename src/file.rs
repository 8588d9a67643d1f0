//! Linking a [`Tag`] to a file on disk: discovering whatever mix of a prepended ID3v2 tag, a
//! trailing ID3v1/v1.1 tag, and a trailing Lyrics3 v2 tag a file already carries, folding them
//! into one frame collection, and writing mutations back.
//!
//! There is no ancestor counterpart to this module; it is grounded directly on id3lib's
//! `ID3_TagImpl::Link`/`RenderV1ToFile`/`RenderV2ToFile`/`Update`/`Strip` (`src/tag_file.cpp`).
//! Unlike id3lib's `ID3_Tag`, which folds file association directly into the tag class, this
//! crate keeps [`Tag`] a pure in-memory codec and gives file association its own type,
//! [`FileBinder`], the way the ancestor crate's own `File` keeps format-sniffing separate from
//! `id3v2::Tag` parsing (see `file.rs` in the ancestor crate).

use crate::error::{FileError, FileResult};
use crate::id3v2::Tag;
use crate::lyrics3::Lyrics3v2;
use log::{info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// The ID3v1 trailer is always exactly 128 bytes.
const ID3V1_SIZE: u64 = crate::id3v1::TAG_SIZE as u64;

/// A bitset describing which on-disk tag(s) an operation applies to, mirroring id3lib's
/// `ID3_TagType` rather than pulling in a `bitflags` dependency for seven bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagTypes(u8);

impl TagTypes {
    pub const NONE: TagTypes = TagTypes(0);
    pub const ID3V1: TagTypes = TagTypes(0x01);
    pub const ID3V2: TagTypes = TagTypes(0x02);
    pub const LYRICS3: TagTypes = TagTypes(0x04);
    pub const LYRICS3V2: TagTypes = TagTypes(0x08);
    pub const PREPENDED: TagTypes = TagTypes(0x10);
    pub const APPENDED: TagTypes = TagTypes(0x20);
    pub const ALL: TagTypes = TagTypes(0x3F);

    pub fn contains(self, other: TagTypes) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for TagTypes {
    type Output = TagTypes;

    fn bitor(self, rhs: TagTypes) -> TagTypes {
        TagTypes(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TagTypes {
    fn bitor_assign(&mut self, rhs: TagTypes) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for TagTypes {
    type Output = TagTypes;

    fn bitand(self, rhs: TagTypes) -> TagTypes {
        TagTypes(self.0 & rhs.0)
    }
}

impl std::ops::BitAndAssign for TagTypes {
    fn bitand_assign(&mut self, rhs: TagTypes) {
        self.0 &= rhs.0;
    }
}

impl std::ops::Not for TagTypes {
    type Output = TagTypes;

    fn not(self) -> TagTypes {
        TagTypes(!self.0 & Self::ALL.0)
    }
}

/// The alignment quantum: once a fresh tag must be rendered (reuse isn't viable), its padding is
/// sized so that the audio bytes following it land on a boundary this many bytes apart, so small
/// future edits don't force a full file rewrite.
const PADDING_ROUND: u32 = 2048;
/// When the existing prepended region is already larger than the freshly rendered tag, it is
/// reused (as extra padding) to keep the in-place write path rather than shrinking the file,
/// but only up to this much slack; beyond it the tag is re-aligned to `PADDING_ROUND` and the
/// file is rewritten, so a tag that shrinks drastically doesn't drag megabytes of dead padding
/// forward forever. Also caps the padding `aligned_target_size` adds in that rewrite path.
const MAX_REUSED_SLACK: u32 = 4096;

/// Links a [`Tag`] to a file on disk, tracking which tag formats were found and where they
/// sit so [`FileBinder::update`] and [`FileBinder::strip`] know what to rewrite.
pub struct FileBinder {
    path: PathBuf,
    tag: Tag,
    present: TagTypes,
    prepended_bytes: u64,
    /// Combined size of any trailing Lyrics3 v2 tag plus any trailing ID3v1 tag.
    appended_bytes: u64,
    file_size: u64,
}

impl FileBinder {
    /// Opens `path` and parses whatever tags it finds: a prepended ID3v2 tag, a trailing
    /// Lyrics3 v2 tag, and a trailing ID3v1/v1.1 tag, folding all of their frames into one
    /// [`Tag`]. Mirrors `ID3_TagImpl::Link`'s read-everything-present behavior.
    pub fn link<P: AsRef<Path>>(path: P) -> FileResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;
        let file_size = file.metadata()?.len();

        let mut data = Vec::with_capacity(file_size as usize);
        file.read_to_end(&mut data)?;

        let mut tag = Tag::new();
        let mut present = TagTypes::NONE;
        let mut prepended_bytes = 0u64;
        let mut appended_bytes = 0u64;

        if let Some(v2_size) = prepended_id3v2_size(&data) {
            match Tag::parse(&data[..v2_size]) {
                Ok(parsed) => {
                    tag = parsed;
                    prepended_bytes = v2_size as u64;
                    present |= TagTypes::ID3V2 | TagTypes::PREPENDED;
                }
                Err(err) => {
                    warn!("found an ID3v2 header but could not parse it: {}", err);
                }
            }
        }

        let trailing = &data[prepended_bytes as usize..];

        let v1 = if trailing.len() >= ID3V1_SIZE as usize {
            let mut raw = [0u8; crate::id3v1::TAG_SIZE];
            raw.copy_from_slice(&trailing[trailing.len() - ID3V1_SIZE as usize..]);
            crate::id3v1::Id3v1Tag::parse(&raw).ok()
        } else {
            None
        };

        // Lyrics3 always sits immediately before any ID3v1 tag, so its search region must
        // exclude the trailing 128 bytes only when an ID3v1 tag actually occupies them.
        let lyrics3_region = if v1.is_some() {
            &trailing[..trailing.len() - ID3V1_SIZE as usize]
        } else {
            trailing
        };

        if let Some(lyrics3) = Lyrics3v2::find_and_parse(lyrics3_region) {
            appended_bytes += lyrics3.size;
            present |= TagTypes::LYRICS3 | TagTypes::LYRICS3V2 | TagTypes::APPENDED;

            for frame in lyrics3.into_frames() {
                tag.add_frame(frame);
            }
        }

        if let Some(v1) = v1 {
            appended_bytes += ID3V1_SIZE;
            present |= TagTypes::ID3V1 | TagTypes::APPENDED;

            for frame in v1.into_frames() {
                tag.add_frame(frame);
            }
        }

        Ok(Self {
            path,
            tag,
            present,
            prepended_bytes,
            appended_bytes,
            file_size,
        })
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn tag_mut(&mut self) -> &mut Tag {
        &mut self.tag
    }

    pub fn has_v1_tag(&self) -> bool {
        self.present.contains(TagTypes::ID3V1)
    }

    pub fn has_v2_tag(&self) -> bool {
        self.present.contains(TagTypes::ID3V2)
    }

    pub fn has_lyrics(&self) -> bool {
        self.present.contains(TagTypes::LYRICS3)
    }

    /// Writes the requested tag type(s) back to the linked file. `ID3V2` renders and writes the
    /// prepended tag (in place if it still fits the existing region, otherwise via a
    /// sibling-temp-file swap); `ID3V1` renders and writes (or appends) the trailing ID3v1.1
    /// tag. Lyrics3 is read-only and is never written by this method.
    pub fn update(&mut self, tag_types: TagTypes) -> FileResult<()> {
        if tag_types.contains(TagTypes::ID3V2) {
            self.update_v2()?;
        }

        if tag_types.contains(TagTypes::ID3V1) {
            self.update_v1()?;
        }

        Ok(())
    }

    fn update_v2(&mut self) -> FileResult<()> {
        let unpadded = self.tag.render()?;
        let content_size = unpadded.len() as u32;

        let target_size = if !self.tag.padding() {
            content_size
        } else if self.prepended_bytes as u32 >= content_size
            && self.prepended_bytes as u32 - content_size <= MAX_REUSED_SLACK
        {
            self.prepended_bytes as u32
        } else {
            self.aligned_target_size(content_size)
        };

        let padding = target_size - content_size;
        let rendered = self.tag.render_padded(padding)?;

        if rendered.len() as u64 == self.prepended_bytes {
            let mut file = OpenOptions::new().write(true).open(&self.path)?;
            file.write_all(&rendered)?;
        } else {
            self.rewrite_prepended(&rendered)?;
        }

        let delta = rendered.len() as i64 - self.prepended_bytes as i64;
        self.prepended_bytes = rendered.len() as u64;
        self.file_size = (self.file_size as i64 + delta) as u64;
        self.present |= TagTypes::ID3V2 | TagTypes::PREPENDED;

        Ok(())
    }

    /// Replaces the prepended region with `rendered`, preserving everything after it, via a
    /// sibling-temp-file-plus-rename swap (the `mkstemp`-equivalent id3lib's `RenderV2ToFile`
    /// falls back to whenever the new tag doesn't fit the old prepended region exactly).
    fn rewrite_prepended(&mut self, rendered: &[u8]) -> FileResult<()> {
        let mut original = File::open(&self.path)?;
        original.seek(SeekFrom::Start(self.prepended_bytes))?;

        let (tmp_path, mut tmp) = create_sibling_temp_file(&self.path)?;

        let result = (|| -> FileResult<()> {
            tmp.write_all(rendered)?;
            std::io::copy(&mut original, &mut tmp)?;
            tmp.flush()?;
            Ok(())
        })();

        if let Err(err) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }

        drop(tmp);
        drop(original);
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    fn update_v1(&mut self) -> FileResult<()> {
        let rendered = self.tag.render_v1();

        let mut file = OpenOptions::new().write(true).open(&self.path)?;

        if self.present.contains(TagTypes::ID3V1) {
            file.seek(SeekFrom::End(-(ID3V1_SIZE as i64)))?;
            file.write_all(&rendered)?;
        } else {
            file.seek(SeekFrom::End(0))?;
            file.write_all(&rendered)?;
            self.appended_bytes += ID3V1_SIZE;
            self.file_size += ID3V1_SIZE;
        }

        self.present |= TagTypes::ID3V1 | TagTypes::APPENDED;

        Ok(())
    }

    /// Removes the requested tag type(s) from the linked file. Stripping `ID3V2` shifts
    /// everything after the prepended region to the start of the file and truncates; stripping
    /// `ID3V1` and/or `LYRICS3` truncates the corresponding trailing bytes. Mirrors
    /// `ID3_TagImpl::Strip`.
    pub fn strip(&mut self, tag_types: TagTypes) -> FileResult<()> {
        if tag_types.contains(TagTypes::ID3V2) && self.present.contains(TagTypes::ID3V2) {
            self.strip_v2()?;
        }

        if tag_types.contains(TagTypes::ID3V1) && self.present.contains(TagTypes::ID3V1) {
            self.truncate_tail(ID3V1_SIZE)?;
            self.present &= !TagTypes::ID3V1;
        }

        if tag_types.contains(TagTypes::LYRICS3) && self.present.contains(TagTypes::LYRICS3) {
            self.strip_lyrics3()?;
        }

        Ok(())
    }

    fn strip_v2(&mut self) -> FileResult<()> {
        if self.prepended_bytes == 0 {
            return Ok(());
        }

        let mut file = OpenOptions::new().read(true).write(true).open(&self.path)?;

        let mut read_pos = self.prepended_bytes;
        let mut write_pos = 0u64;
        let mut buf = vec![0u8; 64 * 1024];

        loop {
            file.seek(SeekFrom::Start(read_pos))?;
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }

            file.seek(SeekFrom::Start(write_pos))?;
            file.write_all(&buf[..n])?;

            read_pos += n as u64;
            write_pos += n as u64;
        }

        file.set_len(write_pos)?;

        self.file_size -= self.prepended_bytes;
        self.prepended_bytes = 0;
        self.present &= !(TagTypes::ID3V2 | TagTypes::PREPENDED);

        Ok(())
    }

    /// Truncates `len` bytes off the end of the file.
    fn truncate_tail(&mut self, len: u64) -> FileResult<()> {
        let file = OpenOptions::new().write(true).open(&self.path)?;
        let new_len = self.file_size.saturating_sub(len);
        file.set_len(new_len)?;

        self.file_size = new_len;
        self.appended_bytes = self.appended_bytes.saturating_sub(len);

        Ok(())
    }

    /// Removes a trailing Lyrics3 v2 tag. Lyrics3 always sits immediately before any ID3v1 tag
    /// (or at the very end of the file if there is none); if ID3v1 is still present, its 128
    /// bytes are preserved by shifting them left over the removed Lyrics3 span rather than
    /// truncated away along with it.
    /// Sizes a freshly padded v2 tag so that the audio bytes following it (everything but the
    /// old prepended tag and any appended Lyrics3/ID3v1 trailers) land on a 2048-byte boundary,
    /// capping the added padding at 4096 bytes so a much smaller tag doesn't drag an oversized
    /// gap forward; `update_v2` takes this path once reusing the old prepended region's slack is
    /// no longer an option, which is also the point where the file is rewritten and the audio
    /// shifts into its newly aligned position.
    fn aligned_target_size(&self, content_size: u32) -> u32 {
        let audio_size = self
            .file_size
            .saturating_sub(self.prepended_bytes)
            .saturating_sub(self.appended_bytes);

        let sum = audio_size + content_size as u64;
        let remainder = sum % PADDING_ROUND as u64;

        let padding = if remainder == 0 {
            0
        } else {
            PADDING_ROUND as u64 - remainder
        };
        let padding = padding.min(MAX_REUSED_SLACK as u64) as u32;

        content_size + padding
    }

    fn strip_lyrics3(&mut self) -> FileResult<()> {
        let mut file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        let file_len = file.metadata()?.len();

        let region_end = if self.present.contains(TagTypes::ID3V1) {
            file_len.saturating_sub(ID3V1_SIZE)
        } else {
            file_len
        };

        let mut region = vec![0u8; region_end as usize];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut region)?;

        let lyrics3 = match Lyrics3v2::find_and_parse(&region) {
            Some(tag) => tag,
            None => return Ok(()),
        };

        if self.present.contains(TagTypes::ID3V1) {
            let mut v1 = [0u8; crate::id3v1::TAG_SIZE];
            file.seek(SeekFrom::Start(region_end))?;
            file.read_exact(&mut v1)?;

            file.seek(SeekFrom::Start(region_end - lyrics3.size))?;
            file.write_all(&v1)?;
        }

        let new_len = file_len - lyrics3.size;
        file.set_len(new_len)?;

        self.file_size = new_len;
        self.appended_bytes = self.appended_bytes.saturating_sub(lyrics3.size);
        self.present &= !(TagTypes::LYRICS3 | TagTypes::LYRICS3V2);

        Ok(())
    }
}

/// Returns the total size (header + body) of a prepended ID3v2 tag at the start of `data`, if
/// one is present.
fn prepended_id3v2_size(data: &[u8]) -> Option<usize> {
    if data.len() < crate::id3v2::header::TAG_HEADER_SIZE || &data[0..3] != b"ID3" {
        return None;
    }

    let mut raw = [0u8; crate::id3v2::header::TAG_HEADER_SIZE];
    raw.copy_from_slice(&data[..crate::id3v2::header::TAG_HEADER_SIZE]);
    let header = crate::id3v2::header::TagHeader::parse(raw).ok()?;

    Some(crate::id3v2::header::TAG_HEADER_SIZE + header.size() as usize)
}

/// Creates a uniquely-named sibling of `path` for the temp-file-plus-rename swap, the
/// `mkstemp`-equivalent id3lib's `RenderV2ToFile` uses. No fixture in the teacher crate or its
/// siblings pulls in a dedicated temp-file crate, so this hand-rolls the create-exclusive retry
/// loop instead of introducing one.
fn create_sibling_temp_file(path: &Path) -> FileResult<(PathBuf, File)> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("id3ox");
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let pid = std::process::id();

    for attempt in 0..1000u32 {
        let candidate = dir.join(format!(".{}.id3ox-tmp-{}-{}", file_name, pid, attempt));

        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err.into()),
        }
    }

    warn!("exhausted temp file name attempts for {}", path.display());
    Err(FileError::Io(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        "could not create a unique temp file",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3v2::frames::{FrameId, TextFrame};

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("id3ox-test-{}-{}", std::process::id(), name));
        path
    }

    #[test]
    fn tag_types_bitops() {
        let both = TagTypes::ID3V1 | TagTypes::ID3V2;
        assert!(both.contains(TagTypes::ID3V1));
        assert!(both.contains(TagTypes::ID3V2));
        assert!(!both.contains(TagTypes::LYRICS3));
    }

    #[test]
    fn aligned_target_size_reaches_next_2048_boundary() {
        let path = temp_path("aligned-target-size");
        let _ = fs::write(&path, b"");

        let mut binder = FileBinder::link(&path).unwrap();
        binder.file_size = 100;
        binder.prepended_bytes = 0;
        binder.appended_bytes = 0;

        // 100 bytes of audio plus a 100-byte tag needs 1848 bytes of padding to land on 2048.
        assert_eq!(binder.aligned_target_size(100), 1948);

        // Audio already sits on a boundary once the tag is included, so no padding is added.
        binder.file_size = 1948;
        assert_eq!(binder.aligned_target_size(100), 100);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn link_finds_prepended_v2_and_trailing_v1() {
        crate::init_test_logging();
        let path = temp_path("link-v1-v2");

        let mut tag = Tag::new();
        let mut frame = TextFrame::new(FrameId::new(b"TIT2"));
        frame.text.push(String::from("Hurricane"));
        tag.add_frame(Box::new(frame));
        let v2_bytes = tag.render().unwrap();

        let mut v1 = crate::id3v1::Id3v1Tag::default();
        v1.artist = String::from("Boards of Canada");
        let v1_bytes = v1.render();

        let mut data = Vec::new();
        data.extend(&v2_bytes);
        data.extend(b"fake audio data");
        data.extend(&v1_bytes);

        {
            let mut file = File::create(&path).unwrap();
            file.write_all(&data).unwrap();
        }

        let mut binder = FileBinder::link(&path).unwrap();
        assert!(binder.has_v2_tag());
        assert!(binder.has_v1_tag());
        assert!(!binder.has_lyrics());

        let title = binder.tag_mut().find(b"TIT2").unwrap();
        assert_eq!(title.downcast::<TextFrame>().unwrap().text[0], "Hurricane");

        let artist = binder.tag_mut().find(b"TPE1").unwrap();
        assert_eq!(artist.downcast::<TextFrame>().unwrap().text[0], "Boards of Canada");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn update_v2_in_place_when_size_unchanged() {
        let path = temp_path("update-in-place");

        let mut tag = Tag::new();
        let mut frame = TextFrame::new(FrameId::new(b"TIT2"));
        frame.text.push(String::from("Hurricane"));
        tag.add_frame(Box::new(frame));
        tag.set_padding(false);
        let v2_bytes = tag.render().unwrap();

        let mut data = Vec::new();
        data.extend(&v2_bytes);
        data.extend(b"audio");

        {
            let mut file = File::create(&path).unwrap();
            file.write_all(&data).unwrap();
        }

        let mut binder = FileBinder::link(&path).unwrap();
        binder.tag_mut().set_padding(false);

        let before_len = fs::metadata(&path).unwrap().len();
        binder.update(TagTypes::ID3V2).unwrap();
        let after_len = fs::metadata(&path).unwrap().len();

        assert_eq!(before_len, after_len);

        let mut check = File::open(&path).unwrap();
        let mut tail = Vec::new();
        check.seek(SeekFrom::Start(binder.prepended_bytes)).unwrap();
        check.read_to_end(&mut tail).unwrap();
        assert_eq!(tail, b"audio");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn update_v2_rewrites_when_size_grows() {
        let path = temp_path("update-rewrite");

        let tag = Tag::new();
        let v2_bytes = tag.render().unwrap();

        let mut data = Vec::new();
        data.extend(&v2_bytes);
        data.extend(b"audio-bytes-should-survive");

        {
            let mut file = File::create(&path).unwrap();
            file.write_all(&data).unwrap();
        }

        let mut binder = FileBinder::link(&path).unwrap();
        binder.tag_mut().set_padding(false);
        let mut frame = TextFrame::new(FrameId::new(b"TIT2"));
        frame.text.push(String::from("A brand new title, much longer than before"));
        binder.tag_mut().add_frame(Box::new(frame));

        binder.update(TagTypes::ID3V2).unwrap();

        let mut check = File::open(&path).unwrap();
        let mut all = Vec::new();
        check.read_to_end(&mut all).unwrap();
        assert!(all.windows(b"audio-bytes-should-survive".len()).any(|w| w == b"audio-bytes-should-survive"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn strip_v2_removes_prepended_tag() {
        let path = temp_path("strip-v2");

        let tag = Tag::new();
        let v2_bytes = tag.render().unwrap();

        let mut data = Vec::new();
        data.extend(&v2_bytes);
        data.extend(b"audio only");

        {
            let mut file = File::create(&path).unwrap();
            file.write_all(&data).unwrap();
        }

        let mut binder = FileBinder::link(&path).unwrap();
        binder.strip(TagTypes::ID3V2).unwrap();
        assert!(!binder.has_v2_tag());

        let mut check = File::open(&path).unwrap();
        let mut all = Vec::new();
        check.read_to_end(&mut all).unwrap();
        assert_eq!(all, b"audio only");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn update_is_idempotent_without_intervening_mutation() {
        let path = temp_path("update-idempotent");

        let mut tag = Tag::new();
        let mut frame = TextFrame::new(FrameId::new(b"TIT2"));
        frame.text.push(String::from("Hurricane"));
        tag.add_frame(Box::new(frame));

        let mut data = Vec::new();
        data.extend(b"audio-bytes-should-survive");

        {
            let mut file = File::create(&path).unwrap();
            file.write_all(&data).unwrap();
        }

        let mut binder = FileBinder::link(&path).unwrap();
        *binder.tag_mut() = tag;
        binder.tag_mut().set_padding(false);

        binder.update(TagTypes::ID3V2).unwrap();
        let first_pass = fs::read(&path).unwrap();
        let first_len = first_pass.len();

        binder.update(TagTypes::ID3V2).unwrap();
        let second_pass = fs::read(&path).unwrap();

        assert_eq!(first_pass, second_pass);
        assert_eq!(second_pass.len(), first_len);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn stripping_all_tags_then_relinking_reports_nothing_present() {
        let path = temp_path("strip-then-link");

        let mut tag = Tag::new();
        let mut frame = TextFrame::new(FrameId::new(b"TIT2"));
        frame.text.push(String::from("Hurricane"));
        tag.add_frame(Box::new(frame));
        let v2_bytes = tag.render().unwrap();

        let v1 = crate::id3v1::Id3v1Tag {
            artist: String::from("Boards of Canada"),
            ..Default::default()
        };
        let v1_bytes = v1.render();

        let mut data = Vec::new();
        data.extend(&v2_bytes);
        data.extend(b"audio");
        data.extend(&v1_bytes);

        {
            let mut file = File::create(&path).unwrap();
            file.write_all(&data).unwrap();
        }

        let mut binder = FileBinder::link(&path).unwrap();
        binder.strip(TagTypes::ALL).unwrap();

        let relinked = FileBinder::link(&path).unwrap();
        assert!(!relinked.has_v1_tag());
        assert!(!relinked.has_v2_tag());
        assert!(!relinked.has_lyrics());
        assert_eq!(relinked.prepended_bytes, 0);
        assert_eq!(relinked.appended_bytes, 0);

        let _ = fs::remove_file(&path);
    }
}
