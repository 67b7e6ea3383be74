//! Soft and hard hashing.
//!
//! The soft family is a seedless multiplicative rolling hash (the golden-ratio
//! scheme used by SQLite) plus 60-bit tagged variants and an order-independent
//! XOR combiner. It is fast and deterministic, and offers no collision
//! resistance. [`HardHash`] wraps SHA-256 for the places where that matters.
//!
//! # XOR cancellation
//!
//! [`combine_unordered64`] folds member hashes with XOR, so any byte string
//! that appears an even number of times in a collection contributes nothing:
//! `combine_unordered64([x, x]) == combine_unordered64([])`. This is a known
//! collision mode of the scheme and part of its defined output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fmt;

/// The 64-bit golden-ratio constant; both seed and multiplier.
pub const GOLDEN_RATIO_64: u64 = 0x9e37_79b9_7f4a_7c15;

/// Mask selecting the 60 content bits of a tagged hash.
pub const MASK_60: u64 = (1 << 60) - 1;

/// Tag shifted into the top nibble. Only the low four bits of `tag` are used.
#[inline]
fn tag_bits(tag: u8) -> u64 {
    debug_assert!(tag <= 0xf, "tag must fit in 4 bits");
    u64::from(tag & 0xf) << 60
}

/// Order-dependent 64-bit soft hash of a byte string.
///
/// Empty input hashes to [`GOLDEN_RATIO_64`].
pub fn soft_hash64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(GOLDEN_RATIO_64, |acc, &b| {
        acc.wrapping_add(u64::from(b)).wrapping_mul(GOLDEN_RATIO_64)
    })
}

/// Soft hash truncated to 60 bits with `tag` in the top nibble.
pub fn soft_hash60(bytes: &[u8], tag: u8) -> u64 {
    (soft_hash64(bytes) & MASK_60) | tag_bits(tag)
}

/// XOR of the soft hashes of every item; invariant under permutation.
///
/// An empty collection combines to zero. See the module docs for the
/// cancellation behavior of repeated items.
pub fn combine_unordered64<I, T>(items: I) -> u64
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    items
        .into_iter()
        .fold(0, |acc, item| acc ^ soft_hash64(item.as_ref()))
}

/// [`combine_unordered64`] truncated to 60 bits with `tag` in the top nibble.
pub fn combine_unordered60<I, T>(items: I, tag: u8) -> u64
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    (combine_unordered64(items) & MASK_60) | tag_bits(tag)
}

/// Tagged combined hash for every non-empty subset of `items`.
///
/// Keys list subset members in input order. The result holds `2^n - 1`
/// entries (fewer only if `items` repeats a value), so callers must keep `n`
/// small. Use [`ComboIter`] to walk the subsets without materializing them.
pub fn combo_unordered60<T: AsRef<[u8]>>(items: &[T], tag: u8) -> IndexMap<Vec<&[u8]>, u64> {
    let members: Vec<&[u8]> = items.iter().map(AsRef::as_ref).collect();
    let mut out = IndexMap::new();
    for combo in ComboIter::new(&members, tag) {
        let key = combo.indices.iter().map(|&i| members[i]).collect();
        out.insert(key, combo.hash);
    }
    out
}

/// One subset produced by [`ComboIter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    /// Positions of the members in the input, ascending.
    pub indices: Vec<usize>,
    /// `combine_unordered60` over the members.
    pub hash: u64,
}

/// Lazy enumeration of all non-empty subsets with their combined hash.
///
/// Subsets come out by size, then lexicographically by input position:
/// `{a}, {b}, {c}, {a,b}, {a,c}, {b,c}, {a,b,c}`.
pub struct ComboIter<'a, T> {
    items: &'a [T],
    tag: u8,
    indices: Vec<usize>,
    done: bool,
}

impl<'a, T: AsRef<[u8]>> ComboIter<'a, T> {
    pub fn new(items: &'a [T], tag: u8) -> Self {
        Self {
            items,
            tag,
            indices: vec![0],
            done: items.is_empty(),
        }
    }

    /// Step `indices` to the next subset, growing the subset size when the
    /// current size is exhausted.
    fn advance(&mut self) {
        let n = self.items.len();
        let k = self.indices.len();

        for i in (0..k).rev() {
            if self.indices[i] < n - k + i {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return;
            }
        }

        if k == n {
            self.done = true;
        } else {
            self.indices = (0..=k).collect();
        }
    }
}

impl<'a, T: AsRef<[u8]>> Iterator for ComboIter<'a, T> {
    type Item = Combination;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let hash = combine_unordered60(
            self.indices.iter().map(|&i| self.items[i].as_ref()),
            self.tag,
        );
        let combo = Combination {
            indices: self.indices.clone(),
            hash,
        };
        self.advance();
        Some(combo)
    }
}

/// A SHA-256 digest read as a 256-bit little-endian integer.
///
/// Bytes are stored in digest order, so `0` is the least significant byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HardHash(pub [u8; 32]);

impl HardHash {
    /// Hash `data` with SHA-256.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The integer as four 64-bit limbs, least significant first.
    pub fn to_le_limbs(&self) -> [u64; 4] {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(self.0.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *limb = u64::from_le_bytes(word);
        }
        limbs
    }

    /// The low 64 bits of the integer.
    pub fn low_u64(&self) -> u64 {
        self.to_le_limbs()[0]
    }
}

impl Ord for HardHash {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for HardHash {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for HardHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HardHash({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for HardHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for HardHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Cryptographic 256-bit hash of `bytes`.
pub fn hard_hash256(bytes: &[u8]) -> HardHash {
    HardHash::hash(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_hash64_empty_is_seed() {
        assert_eq!(soft_hash64(b""), GOLDEN_RATIO_64);
    }

    #[test]
    fn test_soft_hash64_single_byte() {
        let expected = GOLDEN_RATIO_64
            .wrapping_add(0x61)
            .wrapping_mul(GOLDEN_RATIO_64);
        assert_eq!(soft_hash64(b"a"), expected);
    }

    #[test]
    fn test_soft_hash64_order_dependent() {
        assert_ne!(soft_hash64(b"ab"), soft_hash64(b"ba"));
    }

    #[test]
    fn test_soft_hash60_tag() {
        let h = soft_hash60(b"ticker", 0xc);
        assert_eq!(h >> 60, 0xc);
        assert_eq!(h & MASK_60, soft_hash64(b"ticker") & MASK_60);
        assert_eq!(soft_hash60(b"ticker", 0) >> 60, 0);
    }

    #[test]
    fn test_combine_order_independent() {
        let a = combine_unordered64([b"x".as_slice(), b"yy", b"zzz"]);
        let b = combine_unordered64([b"zzz".as_slice(), b"x", b"yy"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_combine_xor_cancellation() {
        let empty: [&[u8]; 0] = [];
        assert_eq!(
            combine_unordered64([b"x".as_slice(), b"x"]),
            combine_unordered64(empty)
        );
        assert_eq!(combine_unordered64(empty), 0);
        assert_eq!(
            combine_unordered64([b"x".as_slice(), b"y", b"x"]),
            combine_unordered64([b"y".as_slice()])
        );
    }

    #[test]
    fn test_combine_single_is_soft_hash() {
        assert_eq!(combine_unordered64([b"abc"]), soft_hash64(b"abc"));
    }

    #[test]
    fn test_combine60_tag() {
        let h = combine_unordered60([b"a".as_slice(), b"b"], 0xd);
        assert_eq!(h >> 60, 0xd);
        assert_eq!(h & MASK_60, combine_unordered64([b"a".as_slice(), b"b"]) & MASK_60);
    }

    #[test]
    fn test_combo_two_items() {
        let items = [b"a".as_slice(), b"b"];
        let combos = combo_unordered60(&items, 0x1);
        assert_eq!(combos.len(), 3);

        let keys: Vec<_> = combos.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                vec![b"a".as_slice()],
                vec![b"b".as_slice()],
                vec![b"a".as_slice(), b"b".as_slice()],
            ]
        );
        assert_eq!(
            combos[&vec![b"a".as_slice(), b"b".as_slice()]],
            combine_unordered60([b"a".as_slice(), b"b"], 0x1)
        );
    }

    #[test]
    fn test_combo_count() {
        let items: Vec<Vec<u8>> = (0u8..5).map(|i| vec![i]).collect();
        assert_eq!(combo_unordered60(&items, 0).len(), 31);
        assert_eq!(ComboIter::new(&items, 0).count(), 31);
    }

    #[test]
    fn test_combo_iter_order() {
        let items = [b"a".as_slice(), b"b", b"c"];
        let order: Vec<Vec<usize>> = ComboIter::new(&items, 0).map(|c| c.indices).collect();
        assert_eq!(
            order,
            vec![
                vec![0],
                vec![1],
                vec![2],
                vec![0, 1],
                vec![0, 2],
                vec![1, 2],
                vec![0, 1, 2],
            ]
        );
    }

    #[test]
    fn test_combo_empty() {
        let items: [&[u8]; 0] = [];
        assert!(combo_unordered60(&items, 0).is_empty());
    }

    #[test]
    fn test_hard_hash_known_vector() {
        // SHA-256("abc")
        let h = hard_hash256(b"abc");
        assert_eq!(
            h.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(h.low_u64(), u64::from_le_bytes([0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea]));
    }

    #[test]
    fn test_hard_hash_ordering_is_little_endian() {
        let mut low = [0u8; 32];
        low[0] = 0xff;
        let mut high = [0u8; 32];
        high[31] = 0x01;
        assert!(HardHash(low) < HardHash(high));
    }
}
