//! Sequence encoding: nucleotide strings to fixed-width integer segments.
//!
//! Conventions
//! - Each base maps to one decimal digit (A=1, C=2, G=3, T=4, N=5;
//!   anything else 6, with a warning).
//! - Digits pack left-to-right into groups of `dps` characters; each group
//!   parses as one base-10 `i64` segment. The final group keeps only the
//!   digits present, so a key always has `ceil(len / dps)` segments.
//! - No digit is ever 0, so [`decode`] reproduces the input exactly for
//!   the supported alphabet.

use tracing::warn;

/// 256-entry LUT: ASCII → decimal digit (A=1, C=2, G=3, T=4, N=5), 0xFF
/// for anything outside the alphabet.
pub static DIGIT_LUT: [u8; 256] = {
    const X: u8 = 0xFF;
    let mut t = [X; 256];
    t[b'A' as usize] = 1;
    t[b'a' as usize] = 1;
    t[b'C' as usize] = 2;
    t[b'c' as usize] = 2;
    t[b'G' as usize] = 3;
    t[b'g' as usize] = 3;
    t[b'T' as usize] = 4;
    t[b't' as usize] = 4;
    t[b'N' as usize] = 5;
    t[b'n' as usize] = 5;
    t
};

/// Digit used for bases outside the `ACGTN` alphabet.
const UNKNOWN_BASE_DIGIT: u8 = 6;

/// Decimal digits that fit in one `i64` segment without overflow.
///
/// A segment of this many digits is at most `6.7e18` (all sixes), below
/// `i64::MAX`.
pub const SEGMENT_DIGITS: usize = {
    let mut n = i64::MAX;
    let mut d = 0;
    while n != 0 {
        d += 1;
        n /= 10;
    }
    d
};

/// Digit-encoded sequence key. Equality is pairwise over segments, in
/// order; two keys with different segment counts are never equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeqKey {
    segments: Vec<i64>,
}

impl SeqKey {
    /// Borrow the ordered segment array.
    #[inline]
    pub fn segments(&self) -> &[i64] {
        &self.segments
    }

    /// Build a key directly from segments.
    pub fn from_segments(segments: Vec<i64>) -> Self {
        SeqKey { segments }
    }
}

/// Map one base to its digit. Unknown bases become `6` with a warning.
#[inline]
fn base_digit(b: u8) -> u8 {
    let v = DIGIT_LUT[b as usize];
    if v != 0xFF {
        v
    } else {
        warn!(base = %(b as char), "unknown base in sequence");
        UNKNOWN_BASE_DIGIT
    }
}

/// Encode a sequence into a [`SeqKey`] with `dps` digits per segment.
///
/// Returns `None` for an empty sequence or a `dps` outside
/// `1..=SEGMENT_DIGITS` (a wider segment would overflow `i64`).
pub fn encode(seq: &str, dps: usize) -> Option<SeqKey> {
    if seq.is_empty() || dps == 0 || dps > SEGMENT_DIGITS {
        return None;
    }
    let bytes = seq.as_bytes();
    let mut segments = Vec::with_capacity(bytes.len().div_ceil(dps));
    let mut acc: i64 = 0;
    let mut filled = 0usize;
    for &b in bytes {
        acc = acc * 10 + base_digit(b) as i64;
        filled += 1;
        if filled == dps {
            segments.push(acc);
            acc = 0;
            filled = 0;
        }
    }
    if filled > 0 {
        segments.push(acc);
    }
    Some(SeqKey { segments })
}

/// Decode a [`SeqKey`] back to its sequence string.
///
/// Each segment contributes its decimal digits; digits outside 1..=5
/// render as `?` with a warning. There is no padding to strip: the final
/// segment holds exactly the digits that were encoded.
pub fn decode(key: &SeqKey) -> String {
    let mut out = String::with_capacity(key.segments.len() * SEGMENT_DIGITS);
    for &seg in &key.segments {
        for d in seg.to_string().bytes() {
            out.push(match d {
                b'1' => 'A',
                b'2' => 'C',
                b'3' => 'G',
                b'4' => 'T',
                b'5' => 'N',
                _ => {
                    warn!(digit = %(d as char), "unknown digit in sequence key");
                    '?'
                }
            });
        }
    }
    out
}
