//! Standard character classes for regular expression scanning.
//!
//! `StandardChars<U>` answers the questions the regex literal scanner and a
//! pattern compiler ask about units of width `U` (`u8` for UTF-8 sources,
//! `u16` for UTF-16): digits, word characters, whitespace, newlines, word
//! boundaries and non-Unicode case canonicalization. The escape classes
//! (`\d`, `\w`, `\s` and their complements) are built once and shared.

use once_cell::sync::Lazy;
use std::fmt;
use std::marker::PhantomData;

/// A code unit width the regex tables are instantiated for.
pub trait CharUnit: Copy + Eq + Ord + fmt::Debug + 'static {
    /// Largest value a unit can hold.
    const MAX: u32;

    fn to_u32(self) -> u32;

    fn from_u32(value: u32) -> Option<Self>;
}

impl CharUnit for u8 {
    const MAX: u32 = 0xFF;

    #[inline]
    fn to_u32(self) -> u32 {
        u32::from(self)
    }

    #[inline]
    fn from_u32(value: u32) -> Option<Self> {
        u8::try_from(value).ok()
    }
}

impl CharUnit for u16 {
    const MAX: u32 = 0xFFFF;

    #[inline]
    fn to_u32(self) -> u32 {
        u32::from(self)
    }

    #[inline]
    fn from_u32(value: u32) -> Option<Self> {
        u16::try_from(value).ok()
    }
}

/// A set of code points stored as sorted, disjoint, inclusive ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharSet {
    ranges: Vec<(u32, u32)>,
}

impl CharSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from arbitrary ranges, sorting and merging them.
    pub fn from_ranges(ranges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut sorted: Vec<(u32, u32)> = ranges.into_iter().filter(|(lo, hi)| lo <= hi).collect();
        sorted.sort_unstable();
        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(sorted.len());
        for (lo, hi) in sorted {
            match merged.last_mut() {
                Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
                _ => merged.push((lo, hi)),
            }
        }
        Self { ranges: merged }
    }

    #[inline]
    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, cp: u32) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < cp {
                    std::cmp::Ordering::Less
                } else if lo > cp {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Everything in `0..=max` not in this set.
    pub fn complement(&self, max: u32) -> CharSet {
        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = 0u32;
        for &(lo, hi) in &self.ranges {
            if lo > max {
                break;
            }
            if lo > next {
                ranges.push((next, lo - 1));
            }
            next = hi.saturating_add(1);
        }
        if next <= max {
            ranges.push((next, max));
        }
        CharSet { ranges }
    }

    /// The part of this set at or below `max`.
    pub fn clipped(&self, max: u32) -> CharSet {
        let ranges = self
            .ranges
            .iter()
            .filter(|&&(lo, _)| lo <= max)
            .map(|&(lo, hi)| (lo, hi.min(max)))
            .collect();
        CharSet { ranges }
    }
}

struct ClassTables {
    digit: CharSet,
    word: CharSet,
    whitespace: CharSet,
}

static CLASS_TABLES: Lazy<ClassTables> = Lazy::new(|| ClassTables {
    digit: CharSet::from_ranges([(0x30, 0x39)]),
    word: CharSet::from_ranges([(0x30, 0x39), (0x41, 0x5A), (0x5F, 0x5F), (0x61, 0x7A)]),
    whitespace: CharSet::from_ranges([
        (0x09, 0x0D),
        (0x20, 0x20),
        (0xA0, 0xA0),
        (0x1680, 0x1680),
        (0x2000, 0x200A),
        (0x2028, 0x2029),
        (0x202F, 0x202F),
        (0x205F, 0x205F),
        (0x3000, 0x3000),
        (0xFEFF, 0xFEFF),
    ]),
});

/// Character class queries over units of type `U`.
pub struct StandardChars<U: CharUnit> {
    _unit: PhantomData<U>,
}

impl<U: CharUnit> StandardChars<U> {
    pub fn new() -> Self {
        Self { _unit: PhantomData }
    }

    #[inline]
    pub fn is_digit(&self, c: U) -> bool {
        matches!(c.to_u32(), 0x30..=0x39)
    }

    /// `[0-9A-Za-z_]`
    #[inline]
    pub fn is_word(&self, c: U) -> bool {
        matches!(c.to_u32(), 0x30..=0x39 | 0x41..=0x5A | 0x5F | 0x61..=0x7A)
    }

    #[inline]
    pub fn is_newline(&self, c: U) -> bool {
        matches!(c.to_u32(), 0x0A | 0x0D | 0x2028 | 0x2029)
    }

    pub fn is_whitespace_or_newline(&self, c: U) -> bool {
        CLASS_TABLES.whitespace.contains(c.to_u32())
    }

    /// Whether a `\b` assertion holds before `input[offset]`.
    pub fn is_word_boundary(&self, input: &[U], offset: usize) -> bool {
        let before = offset > 0 && input.get(offset - 1).is_some_and(|&c| self.is_word(c));
        let after = input.get(offset).is_some_and(|&c| self.is_word(c));
        before != after
    }

    /// Case canonicalization for non-Unicode patterns: upper-case, unless
    /// that maps to several characters or folds a non-ASCII character into
    /// ASCII.
    pub fn to_canonical(&self, c: U) -> U {
        let value = c.to_u32();
        let Some(ch) = char::from_u32(value) else {
            return c;
        };
        let mut upper = ch.to_uppercase();
        let (Some(single), None) = (upper.next(), upper.next()) else {
            return c;
        };
        let upper = u32::from(single);
        if upper < 0x80 && value >= 0x80 {
            return c;
        }
        U::from_u32(upper).unwrap_or(c)
    }

    /// The set for `\d`, `\D`, `\w`, `\W`, `\s` or `\S`, limited to the
    /// unit range; None for any other escape letter.
    pub fn class_for_escape(&self, escape: u8) -> Option<CharSet> {
        let tables = &*CLASS_TABLES;
        let set = match escape {
            b'd' => tables.digit.clipped(U::MAX),
            b'D' => tables.digit.complement(U::MAX),
            b'w' => tables.word.clipped(U::MAX),
            b'W' => tables.word.complement(U::MAX),
            b's' => tables.whitespace.clipped(U::MAX),
            b'S' => tables.whitespace.complement(U::MAX),
            _ => return None,
        };
        Some(set)
    }
}

impl<U: CharUnit> Default for StandardChars<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: CharUnit> fmt::Debug for StandardChars<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StandardChars<{}>", std::any::type_name::<U>())
    }
}
