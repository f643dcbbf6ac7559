//! Identifier interning table.
//!
//! Every identifier (and every string literal value) the scanner sees is
//! interned exactly once. The table maps a UTF-16 spelling to an arena
//! allocated [`Ident`]; the same spelling always yields the same pointer, no
//! matter which source width it was read from.
//!
//! Buckets hold intrusive singly-linked chains through [`Ident::next`]. The
//! bucket count is a power of two and the chain for a spelling is
//! `hash & mask`; the table grows by [`GROW_FACTOR`] once a walked chain
//! gets longer than [`BUCKET_LENGTH_LIMIT`] while the load is above one.

use crate::encoding::Utf8Units;
use crate::number::number_to_string;
use jsscan_core::arena::{ArenaExhausted, IdentArena};
use jsscan_core::utf16;
use jsscan_syntax::{IdentFlags, KeywordFlags, TokenKind};
use rustc_hash::FxHashMap;
use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use thiserror::Error;
use tracing::debug;

/// Chains longer than this trigger growth.
pub const BUCKET_LENGTH_LIMIT: usize = 5;
/// Bucket count multiplier on growth.
pub const GROW_FACTOR: usize = 4;
/// Longest spelling the table accepts.
pub const MAX_SPELLING_LEN: usize = i32::MAX as usize;

const DEFAULT_BUCKET_COUNT: usize = 256;
const MAX_KEYWORD_LEN: usize = 10;

/// A handle to an interned identifier.
pub type IdentPtr<'a> = &'a Ident<'a>;

/// Errors raised while interning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InternError {
    #[error("identifier is too long")]
    TooLong,
    #[error("out of memory while interning identifier")]
    OutOfMemory,
}

impl From<ArenaExhausted> for InternError {
    fn from(_: ArenaExhausted) -> Self {
        InternError::OutOfMemory
    }
}

/// How often a binding has been assigned, as observed by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AssignmentState {
    #[default]
    NotAssigned,
    AssignedOnce,
    AssignedMultipleTimes,
}

impl AssignmentState {
    fn promoted(self) -> Self {
        match self {
            AssignmentState::NotAssigned => AssignmentState::AssignedOnce,
            _ => AssignmentState::AssignedMultipleTimes,
        }
    }
}

/// Anything that can be read as a sequence of UTF-16 units for interning.
pub trait Spelling {
    type Units<'s>: Iterator<Item = u16>
    where
        Self: 's;

    fn units(&self) -> Self::Units<'_>;
}

impl Spelling for [u16] {
    type Units<'s> = iter::Copied<std::slice::Iter<'s, u16>>;

    fn units(&self) -> Self::Units<'_> {
        self.iter().copied()
    }
}

impl Spelling for str {
    type Units<'s> = std::str::EncodeUtf16<'s>;

    fn units(&self) -> Self::Units<'_> {
        self.encode_utf16()
    }
}

/// UTF-8 bytes; CESU-8 encoded surrogates are accepted.
impl Spelling for [u8] {
    type Units<'s> = Utf8Units<'s>;

    fn units(&self) -> Self::Units<'_> {
        Utf8Units::new(self)
    }
}

/// Single-byte text where each byte is one code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latin1<'s>(pub &'s [u8]);

fn widen(byte: &u8) -> u16 {
    u16::from(*byte)
}

impl Spelling for Latin1<'_> {
    type Units<'u> = iter::Map<std::slice::Iter<'u, u8>, fn(&u8) -> u16>
    where
        Self: 'u;

    fn units(&self) -> Self::Units<'_> {
        self.0.iter().map(widen as fn(&u8) -> u16)
    }
}

/// Hash of a spelling: `h = 17 * h + unit` over its UTF-16 units.
pub fn spelling_hash<S: Spelling + ?Sized>(spelling: &S) -> u32 {
    hash_and_len(spelling).0
}

fn hash_and_len<S: Spelling + ?Sized>(spelling: &S) -> (u32, usize) {
    spelling.units().fold((0u32, 0usize), |(hash, len), unit| {
        (hash.wrapping_mul(17).wrapping_add(u32::from(unit)), len + 1)
    })
}

/// An interned identifier.
pub struct Ident<'a> {
    hash: u32,
    /// Units followed by a NUL terminator.
    spelling: &'a [u16],
    next: Cell<Option<IdentPtr<'a>>>,
    kind: Cell<TokenKind>,
    flags: Cell<IdentFlags>,
    property_id: Cell<Option<u32>>,
    assignment: Cell<AssignmentState>,
}

impl<'a> Ident<'a> {
    fn new(hash: u32, spelling: &'a [u16]) -> Self {
        Self {
            hash,
            spelling,
            next: Cell::new(None),
            kind: Cell::new(TokenKind::Identifier),
            flags: Cell::new(IdentFlags::NONE),
            property_id: Cell::new(None),
            assignment: Cell::new(AssignmentState::NotAssigned),
        }
    }

    #[inline]
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Length in UTF-16 units, without the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.spelling.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_units(&self) -> &'a [u16] {
        &self.spelling[..self.len()]
    }

    /// Units including the trailing NUL.
    #[inline]
    pub fn as_units_with_nul(&self) -> &'a [u16] {
        self.spelling
    }

    pub fn to_string_lossy(&self) -> String {
        utf16::to_string_lossy(self.as_units())
    }

    /// The next identifier in this bucket's chain.
    #[inline]
    pub fn next_in_chain(&self) -> Option<IdentPtr<'a>> {
        self.next.get()
    }

    /// The token this spelling scans as under the given strictness.
    pub fn token_kind(&self, strict: bool) -> TokenKind {
        let flags = self.resolve_keyword();
        if flags.contains(IdentFlags::RESERVED)
            || (strict && flags.contains(IdentFlags::FUTURE_RESERVED))
        {
            self.kind.get()
        } else {
            TokenKind::Identifier
        }
    }

    /// The keyword this spelling names, whether or not it applies.
    pub fn keyword_kind(&self) -> Option<TokenKind> {
        if self.resolve_keyword().intersects(IdentFlags::KEYWORD) {
            Some(self.kind.get())
        } else {
            None
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.resolve_keyword().contains(IdentFlags::RESERVED)
    }

    pub fn is_future_reserved(&self) -> bool {
        self.resolve_keyword().contains(IdentFlags::FUTURE_RESERVED)
    }

    fn resolve_keyword(&self) -> IdentFlags {
        let flags = self.flags.get();
        if flags.contains(IdentFlags::KEYWORD_RESOLVED) {
            return flags;
        }
        let mut resolved = flags | IdentFlags::KEYWORD_RESOLVED;
        if let Some((kind, keyword)) = self.lookup_keyword() {
            self.kind.set(kind);
            if keyword.contains(KeywordFlags::RESERVED) {
                resolved |= IdentFlags::RESERVED;
            }
            if keyword.contains(KeywordFlags::FUTURE_RESERVED_STRICT) {
                resolved |= IdentFlags::FUTURE_RESERVED;
            }
        }
        self.flags.set(resolved);
        resolved
    }

    fn lookup_keyword(&self) -> Option<(TokenKind, KeywordFlags)> {
        let units = self.as_units();
        if units.len() > MAX_KEYWORD_LEN {
            return None;
        }
        let mut buf = [0u8; MAX_KEYWORD_LEN];
        for (dst, &unit) in buf.iter_mut().zip(units) {
            *dst = u8::try_from(unit).ok().filter(u8::is_ascii)?;
        }
        let text = std::str::from_utf8(&buf[..units.len()]).ok()?;
        TokenKind::from_keyword(text)
    }

    /// Record that the keyword for `kind` has this spelling.
    fn prime_keyword(&self, kind: TokenKind) {
        self.resolve_keyword();
        debug_assert_eq!(self.kind.get(), kind);
    }

    #[inline]
    pub fn flags(&self) -> IdentFlags {
        self.flags.get()
    }

    fn set_flag(&self, flag: IdentFlags, value: bool) {
        let mut flags = self.flags.get();
        flags.set(flag, value);
        self.flags.set(flags);
    }

    pub fn is_eval(&self) -> bool {
        self.flags.get().contains(IdentFlags::EVAL)
    }

    pub fn set_is_eval(&self, value: bool) {
        self.set_flag(IdentFlags::EVAL, value);
    }

    pub fn is_let_or_const(&self) -> bool {
        self.flags.get().contains(IdentFlags::LET_OR_CONST)
    }

    pub fn set_is_let_or_const(&self, value: bool) {
        self.set_flag(IdentFlags::LET_OR_CONST, value);
    }

    pub fn is_module_export(&self) -> bool {
        self.flags.get().contains(IdentFlags::MODULE_EXPORT)
    }

    pub fn set_is_module_export(&self, value: bool) {
        self.set_flag(IdentFlags::MODULE_EXPORT, value);
    }

    pub fn is_used_in_element_access(&self) -> bool {
        self.flags.get().contains(IdentFlags::USED_IN_ELEMENT_ACCESS)
    }

    pub fn set_is_used_in_element_access(&self, value: bool) {
        self.set_flag(IdentFlags::USED_IN_ELEMENT_ACCESS, value);
    }

    #[inline]
    pub fn property_id(&self) -> Option<u32> {
        self.property_id.get()
    }

    #[inline]
    pub fn set_property_id(&self, id: u32) {
        self.property_id.set(Some(id));
    }

    #[inline]
    pub fn assignment_state(&self) -> AssignmentState {
        self.assignment.get()
    }

    /// Advance NotAssigned -> AssignedOnce -> AssignedMultipleTimes.
    pub fn promote_assignment_state(&self) -> AssignmentState {
        let state = self.assignment.get().promoted();
        self.assignment.set(state);
        state
    }
}

impl PartialEq for Ident<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Ident<'_> {}

impl Hash for Ident<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self, state);
    }
}

impl fmt::Debug for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ident").field(&self.to_string_lossy()).finish()
    }
}

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// Result of walking one chain.
struct ChainWalk<'a> {
    found: Option<IdentPtr<'a>>,
    bucket: usize,
    tail: Option<IdentPtr<'a>>,
    walked: usize,
}

/// The identifier hash table.
pub struct HashTbl<'a> {
    arena: &'a IdentArena,
    buckets: Vec<Option<IdentPtr<'a>>>,
    mask: u32,
    count: u32,
    keywords: FxHashMap<TokenKind, IdentPtr<'a>>,
}

impl<'a> HashTbl<'a> {
    /// Create a table with `initial_bucket_count` buckets, rounded up to a
    /// power of two.
    pub fn new(arena: &'a IdentArena, initial_bucket_count: usize) -> Self {
        let bucket_count = initial_bucket_count.clamp(1, 1 << 31).next_power_of_two();
        Self {
            arena,
            buckets: vec![None; bucket_count],
            mask: (bucket_count - 1) as u32,
            count: 0,
            keywords: FxHashMap::default(),
        }
    }

    pub fn with_default_buckets(arena: &'a IdentArena) -> Self {
        Self::new(arena, DEFAULT_BUCKET_COUNT)
    }

    #[inline]
    pub fn arena(&self) -> &'a IdentArena {
        self.arena
    }

    /// Number of interned identifiers.
    #[inline]
    pub fn len(&self) -> usize {
        self.count as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn walk_chain(&self, hash: u32, len: usize, spelling: &(impl Spelling + ?Sized)) -> ChainWalk<'a> {
        let bucket = (hash & self.mask) as usize;
        let mut walk = ChainWalk {
            found: None,
            bucket,
            tail: None,
            walked: 0,
        };
        let mut cur = self.buckets[bucket];
        while let Some(ident) = cur {
            if ident.hash == hash
                && ident.len() == len
                && ident.as_units().iter().copied().eq(spelling.units())
            {
                walk.found = Some(ident);
                return walk;
            }
            walk.walked += 1;
            walk.tail = Some(ident);
            cur = ident.next.get();
        }
        walk
    }

    /// Look up a spelling without inserting it.
    pub fn lookup<S: Spelling + ?Sized>(&self, spelling: &S) -> Option<IdentPtr<'a>> {
        let (hash, len) = hash_and_len(spelling);
        self.walk_chain(hash, len, spelling).found
    }

    pub fn contains<S: Spelling + ?Sized>(&self, spelling: &S) -> bool {
        self.lookup(spelling).is_some()
    }

    /// Intern a spelling, returning the unique identifier for it.
    pub fn intern<S: Spelling + ?Sized>(&mut self, spelling: &S) -> Result<IdentPtr<'a>, InternError> {
        let (hash, len) = hash_and_len(spelling);
        if len > MAX_SPELLING_LEN {
            return Err(InternError::TooLong);
        }
        let mut walk = self.walk_chain(hash, len, spelling);
        if let Some(found) = walk.found {
            return Ok(found);
        }

        let units = self.arena.try_alloc_spelling(len, spelling.units())?;
        let ident: IdentPtr<'a> = self.arena.try_alloc(Ident::new(hash, units))?;

        if walk.walked > BUCKET_LENGTH_LIMIT && self.count > self.mask {
            self.grow();
            walk = self.walk_chain(hash, len, spelling);
        }
        match walk.tail {
            Some(tail) => tail.next.set(Some(ident)),
            None => self.buckets[walk.bucket] = Some(ident),
        }
        self.count += 1;
        Ok(ident)
    }

    /// The identifier spelled like the keyword `kind`, memoized.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `kind` is not a keyword.
    pub fn intern_keyword(&mut self, kind: TokenKind) -> Result<IdentPtr<'a>, InternError> {
        if let Some(&ident) = self.keywords.get(&kind) {
            return Ok(ident);
        }
        let text = kind.keyword_text();
        debug_assert!(text.is_some(), "{kind:?} is not a keyword");
        let ident = self.intern(text.unwrap_or_default())?;
        ident.prime_keyword(kind);
        self.keywords.insert(kind, ident);
        Ok(ident)
    }

    /// Intern the decimal spelling of an integer.
    pub fn intern_i32(&mut self, value: i32) -> Result<IdentPtr<'a>, InternError> {
        self.intern(value.to_string().as_str())
    }

    /// Intern the ECMAScript `Number::toString` spelling of a double.
    pub fn intern_f64(&mut self, value: f64) -> Result<IdentPtr<'a>, InternError> {
        self.intern(number_to_string(value).as_str())
    }

    /// Multiply the bucket count by [`GROW_FACTOR`] and re-link every chain.
    pub fn grow(&mut self) {
        let Some(new_count) = self
            .buckets
            .len()
            .checked_mul(GROW_FACTOR)
            .filter(|&n| n <= 1 << 31)
        else {
            return;
        };
        let new_mask = (new_count - 1) as u32;
        let mut new_buckets: Vec<Option<IdentPtr<'a>>> = vec![None; new_count];
        for head in std::mem::take(&mut self.buckets) {
            let mut cur = head;
            while let Some(ident) = cur {
                cur = ident.next.get();
                let bucket = (ident.hash & new_mask) as usize;
                ident.next.set(new_buckets[bucket]);
                new_buckets[bucket] = Some(ident);
            }
        }
        self.buckets = new_buckets;
        self.mask = new_mask;
        debug!(buckets = new_count, idents = self.count, "grew identifier table");
    }

    /// Every interned identifier with the bucket it lives in.
    pub fn chains(&self) -> impl Iterator<Item = (usize, IdentPtr<'a>)> + '_ {
        self.buckets.iter().enumerate().flat_map(|(bucket, head)| {
            iter::successors(*head, |ident| ident.next.get()).map(move |ident| (bucket, ident))
        })
    }
}

impl fmt::Debug for HashTbl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTbl")
            .field("buckets", &self.buckets.len())
            .field("count", &self.count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_intern_is_idempotent() {
        let arena = IdentArena::new();
        let mut table = HashTbl::new(&arena, 16);
        let a = table.intern("foo").unwrap();
        let b = table.intern("foo").unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(table.len(), 1);
        assert_eq!(a.as_units_with_nul().last(), Some(&0));
    }

    #[test]
    fn test_case_sensitive() {
        let arena = IdentArena::new();
        let mut table = HashTbl::new(&arena, 16);
        let lower = table.intern("name").unwrap();
        let upper = table.intern("Name").unwrap();
        assert_ne!(lower, upper);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_identity_across_widths() {
        let arena = IdentArena::new();
        let mut table = HashTbl::new(&arena, 16);
        let wide: Vec<u16> = "caf\u{e9}\u{1F600}".encode_utf16().collect();
        let from_utf16 = table.intern(wide.as_slice()).unwrap();
        let from_utf8 = table.intern("caf\u{e9}\u{1F600}".as_bytes()).unwrap();
        let from_str = table.intern("caf\u{e9}\u{1F600}").unwrap();
        assert!(std::ptr::eq(from_utf16, from_utf8));
        assert!(std::ptr::eq(from_utf16, from_str));

        let latin = table.intern(&Latin1(&[b'c', b'a', b'f', 0xE9])).unwrap();
        let text = table.intern("caf\u{e9}").unwrap();
        assert!(std::ptr::eq(latin, text));
    }

    #[test]
    fn test_hash_formula() {
        assert_eq!(spelling_hash("ab"), 17 * u32::from(b'a') + u32::from(b'b'));
        assert_eq!(spelling_hash(""), 0);
    }

    #[test]
    fn test_growth_keeps_identity_and_placement() {
        let arena = IdentArena::new();
        let mut table = HashTbl::new(&arena, 1);
        let names: Vec<String> = (0..64).map(|i| format!("id{i}")).collect();
        let first: Vec<_> = names.iter().map(|n| table.intern(n.as_str()).unwrap()).collect();
        assert!(table.bucket_count() > 1);
        assert_eq!(table.len(), names.len());
        for (name, ident) in names.iter().zip(&first) {
            assert!(std::ptr::eq(table.intern(name.as_str()).unwrap(), *ident));
        }
        let mask = table.bucket_count() - 1;
        for (bucket, ident) in table.chains() {
            assert_eq!(ident.hash() as usize & mask, bucket);
        }
        assert_eq!(table.chains().count(), names.len());
    }

    #[test]
    fn test_keyword_resolution() {
        let arena = IdentArena::new();
        let mut table = HashTbl::new(&arena, 16);
        let kw_while = table.intern("while").unwrap();
        assert_eq!(kw_while.token_kind(false), TokenKind::WhileKeyword);
        let kw_let = table.intern("let").unwrap();
        assert_eq!(kw_let.token_kind(false), TokenKind::Identifier);
        assert_eq!(kw_let.token_kind(true), TokenKind::LetKeyword);
        assert!(kw_let.is_future_reserved());
        let plain = table.intern("whilst").unwrap();
        assert_eq!(plain.token_kind(true), TokenKind::Identifier);
        assert_eq!(plain.keyword_kind(), None);

        let memo = table.intern_keyword(TokenKind::WhileKeyword).unwrap();
        assert!(std::ptr::eq(memo, kw_while));
        assert!(std::ptr::eq(table.intern_keyword(TokenKind::WhileKeyword).unwrap(), memo));
    }

    #[test]
    fn test_flags_and_assignment_state() {
        let arena = IdentArena::new();
        let mut table = HashTbl::new(&arena, 16);
        let ident = table.intern("eval").unwrap();
        ident.set_is_eval(true);
        ident.set_is_let_or_const(true);
        ident.set_is_let_or_const(false);
        assert!(ident.is_eval());
        assert!(!ident.is_let_or_const());
        ident.set_property_id(42);
        assert_eq!(ident.property_id(), Some(42));
        assert_eq!(ident.assignment_state(), AssignmentState::NotAssigned);
        assert_eq!(ident.promote_assignment_state(), AssignmentState::AssignedOnce);
        assert_eq!(ident.promote_assignment_state(), AssignmentState::AssignedMultipleTimes);
        assert_eq!(ident.promote_assignment_state(), AssignmentState::AssignedMultipleTimes);
    }

    #[test]
    fn test_number_spellings() {
        let arena = IdentArena::new();
        let mut table = HashTbl::new(&arena, 16);
        assert_eq!(table.intern_i32(-17).unwrap().to_string_lossy(), "-17");
        assert_eq!(table.intern_f64(0.5).unwrap().to_string_lossy(), "0.5");
        assert!(std::ptr::eq(table.intern_f64(3.0).unwrap(), table.intern_i32(3).unwrap()));
    }

    #[test]
    fn test_arena_exhaustion() {
        let arena = IdentArena::with_limit(0);
        let mut table = HashTbl::new(&arena, 16);
        assert_eq!(table.intern("x").unwrap_err(), InternError::OutOfMemory);
        assert!(table.is_empty());
    }
}
