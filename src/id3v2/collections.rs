//! Frame collection and lookup.

use crate::id3v2::frames::{CreditsFrame, Frame, TextFrame, UserTextFrame};
use indexmap::map::{Entry, IntoIter, Iter, IterMut, Keys};
use indexmap::IndexMap;
use std::ops::{Deref, DerefMut, Index, IndexMut};

/// An ordered, key-addressed collection of a tag's frames.
///
/// Frames are keyed by [`Frame::key`], which for most frame templates is just the frame ID,
/// but folds in a distinguishing sub-field (a description, a language) for templates that
/// can legally repeat within one tag.
#[derive(Debug, Clone, Default)]
pub struct FrameMap {
    map: IndexMap<String, Box<dyn Frame>>,
}

impl FrameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `frame`, merging it into an existing entry with the same key when the frame
    /// template supports merging (currently: the multi-valued text templates). Otherwise a
    /// pre-existing entry is left untouched.
    pub fn add(&mut self, frame: Box<dyn Frame>) {
        match self.map.entry(frame.key()) {
            Entry::Occupied(mut entry) => {
                let orig = entry.get_mut().deref_mut();
                let new = frame.deref();

                if is_both::<TextFrame>(orig, new) {
                    orig.downcast_mut::<TextFrame>()
                        .unwrap()
                        .text
                        .extend(new.downcast::<TextFrame>().unwrap().text.clone());
                } else if is_both::<UserTextFrame>(orig, new) {
                    orig.downcast_mut::<UserTextFrame>()
                        .unwrap()
                        .text
                        .extend(new.downcast::<UserTextFrame>().unwrap().text.clone());
                } else if is_both::<CreditsFrame>(orig, new) {
                    orig.downcast_mut::<CreditsFrame>()
                        .unwrap()
                        .people
                        .extend(new.downcast::<CreditsFrame>().unwrap().people.clone());
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(frame);
            }
        }
    }

    /// Inserts `frame`, overwriting any existing entry with the same key.
    pub fn insert(&mut self, frame: Box<dyn Frame>) {
        self.map.insert(frame.key(), frame);
    }

    pub fn get(&self, key: &str) -> Option<&dyn Frame> {
        Some(self.map.get(key)?.deref())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut dyn Frame> {
        Some(self.map.get_mut(key)?.deref_mut())
    }

    pub fn get_all(&self, id: &[u8; 4]) -> Vec<&dyn Frame> {
        self.values().filter(|frame| frame.id() == id).collect()
    }

    pub fn get_all_mut(&mut self, id: &[u8; 4]) -> Vec<&mut dyn Frame> {
        self.values_mut().filter(|frame| frame.id() == id).collect()
    }

    /// Removes every frame with the given four-character ID, returning what was removed.
    pub fn remove_all(&mut self, id: &[u8; 4]) -> Vec<Box<dyn Frame>> {
        let keys: Vec<String> = self
            .iter()
            .filter(|(_, frame)| frame.id() == id)
            .map(|(key, _)| key.to_string())
            .collect();

        keys.iter()
            .filter_map(|key| self.map.shift_remove(key))
            .collect()
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Frame>> {
        self.map.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn contains_any(&self, id: &[u8; 4]) -> bool {
        self.values().any(|frame| frame.id() == id)
    }

    pub fn keys(&self) -> Keys<String, Box<dyn Frame>> {
        self.map.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &dyn Frame> + '_ {
        self.map.values().map(|v| v.deref())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut dyn Frame> + '_ {
        self.map.values_mut().map(|v| v.deref_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Frame)> + '_ {
        self.map.iter().map(|(k, v)| (k.as_str(), v.deref()))
    }

    /// Returns the frame at `index` in insertion order, or `None` if out of range.
    pub fn get_index(&self, index: usize) -> Option<&dyn Frame> {
        Some(self.map.get_index(index)?.1.deref())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear()
    }
}

impl Index<&str> for FrameMap {
    type Output = dyn Frame;

    fn index(&self, key: &str) -> &Self::Output {
        self.map[key].deref()
    }
}

impl IndexMut<&str> for FrameMap {
    fn index_mut(&mut self, key: &str) -> &mut Self::Output {
        self.map[key].deref_mut()
    }
}

impl IntoIterator for FrameMap {
    type Item = (String, Box<dyn Frame>);
    type IntoIter = IntoIter<String, Box<dyn Frame>>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a> IntoIterator for &'a FrameMap {
    type Item = (&'a String, &'a Box<dyn Frame>);
    type IntoIter = Iter<'a, String, Box<dyn Frame>>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl<'a> IntoIterator for &'a mut FrameMap {
    type Item = (&'a String, &'a mut Box<dyn Frame>);
    type IntoIter = IterMut<'a, String, Box<dyn Frame>>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter_mut()
    }
}

#[inline(always)]
fn is_both<T: Frame>(orig: &mut dyn Frame, new: &dyn Frame) -> bool {
    orig.is::<T>() && new.is::<T>()
}

/// Tracks the last selector used with [`Tag::find`](crate::id3v2::Tag::find) so repeated
/// calls with the same selector step forward through matches instead of always returning the
/// first one; a new selector resets the cursor to the start.
#[derive(Debug, Clone, Default)]
pub(crate) struct FindCursor {
    last_id: Option<[u8; 4]>,
    next_index: usize,
}

impl FindCursor {
    /// Returns the index to resume searching from for `id`, advancing internal state so the
    /// next call with the same `id` continues from the following match.
    pub(crate) fn advance(&mut self, id: &[u8; 4]) -> usize {
        match self.last_id {
            Some(last) if last == *id => {}
            _ => {
                self.last_id = Some(*id);
                self.next_index = 0;
            }
        }

        let index = self.next_index;
        self.next_index += 1;
        index
    }

    pub(crate) fn reset(&mut self) {
        self.last_id = None;
        self.next_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3v2::frames::FrameId;

    #[test]
    fn add_merges_text_frames() {
        let mut map = FrameMap::new();

        let mut a = TextFrame::new(FrameId::new(b"TPE1"));
        a.text.push(String::from("Artist A"));
        map.add(Box::new(a));

        let mut b = TextFrame::new(FrameId::new(b"TPE1"));
        b.text.push(String::from("Artist B"));
        map.add(Box::new(b));

        assert_eq!(map.len(), 1);
        let merged = map.get("TPE1").unwrap().downcast::<TextFrame>().unwrap();
        assert_eq!(merged.text, vec!["Artist A", "Artist B"]);
    }

    #[test]
    fn remove_all_by_id() {
        let mut map = FrameMap::new();
        map.insert(Box::new(TextFrame::new(FrameId::new(b"TPE1"))));

        let removed = map.remove_all(b"TPE1");
        assert_eq!(removed.len(), 1);
        assert!(map.is_empty());
    }

    #[test]
    fn remove_all_removes_every_distinct_key_sharing_an_id() {
        use crate::id3v2::frames::CommentsFrame;

        let mut map = FrameMap::new();
        for desc in ["first", "second", "third"] {
            map.insert(Box::new(CommentsFrame {
                desc: String::from(desc),
                text: desc.to_string(),
                ..Default::default()
            }));
        }
        map.insert(Box::new(TextFrame::new(FrameId::new(b"TPE1"))));

        let removed = map.remove_all(b"COMM");
        assert_eq!(removed.len(), 3);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("TPE1"));
    }

    #[test]
    fn cursor_advances_on_repeated_selector_and_resets_on_change() {
        let mut cursor = FindCursor::default();

        assert_eq!(cursor.advance(b"COMM"), 0);
        assert_eq!(cursor.advance(b"COMM"), 1);
        assert_eq!(cursor.advance(b"USLT"), 0);
        assert_eq!(cursor.advance(b"COMM"), 0);
    }
}
