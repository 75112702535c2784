//! Ordered locators plus the current position.
//!
//! Every index operation checks for emptiness here so callers never do
//! arithmetic on a zero-length list.

use crate::locator::Locator;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    locators: Vec<Locator>,
    index: usize,
}

impl Playlist {
    pub fn new(locators: Vec<Locator>) -> Self {
        Self { locators, index: 0 }
    }

    /// A playlist holding exactly one entry.
    pub fn single(locator: Locator) -> Self {
        Self::new(vec![locator])
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, index: usize) -> Option<&Locator> {
        self.locators.get(index)
    }

    pub fn current(&self) -> Option<&Locator> {
        self.locators.get(self.index)
    }

    pub fn position(&self, locator: &Locator) -> Option<usize> {
        self.locators.iter().position(|l| l == locator)
    }

    /// Move to `index`. Returns false (and leaves the position alone) when out of bounds.
    pub fn set_index(&mut self, index: usize) -> bool {
        if index < self.locators.len() {
            self.index = index;
            true
        } else {
            false
        }
    }

    /// Advance circularly and return the new index; `None` on an empty playlist.
    pub fn advance(&mut self) -> Option<usize> {
        if self.locators.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.locators.len();
        Some(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pl(n: usize) -> Playlist {
        Playlist::new(
            (0..n)
                .map(|i| Locator::from_path(format!("/m/{i}.mp3")))
                .collect(),
        )
    }

    #[test]
    fn advance_len_times_returns_to_start() {
        for n in 1..6 {
            for start in 0..n {
                let mut p = pl(n);
                assert!(p.set_index(start));
                for _ in 0..n {
                    p.advance();
                }
                assert_eq!(p.index(), start, "len {n} start {start}");
            }
        }
    }

    #[test]
    fn advance_wraps_at_end() {
        let mut p = pl(3);
        p.set_index(2);
        assert_eq!(p.advance(), Some(0));
    }

    #[test]
    fn empty_playlist_guards_index_arithmetic() {
        let mut p = Playlist::default();
        assert_eq!(p.advance(), None);
        assert!(!p.set_index(0));
        assert_eq!(p.current(), None);
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn set_index_rejects_out_of_bounds() {
        let mut p = pl(2);
        p.set_index(1);
        assert!(!p.set_index(2));
        assert_eq!(p.index(), 1);
    }

    #[test]
    fn single_replaces_with_one_entry() {
        let p = Playlist::single(Locator::from_path("/x.mp3"));
        assert_eq!(p.len(), 1);
        assert_eq!(p.index(), 0);
        assert_eq!(p.position(&Locator::from_path("/x.mp3")), Some(0));
    }
}
