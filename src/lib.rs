//! `id3ox`: read, mutate, and write ID3v1/v1.1, ID3v2.2/v2.3, and Lyrics3 v2 tags.
//!
//! A [`file::FileBinder`] links a [`id3v2::Tag`] to a file on disk, discovering whatever
//! mix of a prepended ID3v2 tag, a trailing ID3v1/v1.1 tag, and a trailing Lyrics3 v2 tag
//! the file already carries, and folding all of them into one frame collection. Mutating
//! that collection and calling [`file::FileBinder::update`] writes the changes back,
//! converting formats and managing padding/truncation as needed.
//!
//! Crates that only need to work with tag bytes already in memory (no file I/O) can use
//! [`id3v2::Tag`], [`id3v1::Id3v1Tag`], and [`lyrics3::Lyrics3v2`] directly.

#![forbid(unsafe_code)]

pub mod core;
pub mod error;
pub mod file;
pub mod id3v1;
pub mod id3v2;
pub mod lyrics3;

pub use error::{FileError, FileResult, ParseError, ParseResult, SaveError, SaveResult};
pub use file::{FileBinder, TagTypes};
pub use id3v1::Id3v1Tag;
pub use id3v2::Tag;
pub use lyrics3::Lyrics3v2;

/// Turns on `warn!`/`info!` output for a test run, so a failure can be correlated with the
/// anomalies this crate logs (unrecognized text encoding, truncated frames, ...). Safe to
/// call from multiple tests in the same binary.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
