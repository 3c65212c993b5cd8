//! Plain-text report: header plus one row per distinct k-mer.
//!
//! Counts are right-justified in 12 columns; GOF values use C-style
//! scientific notation with five fractional digits (`1.00000e+01`).
//! Rows walk the store and the arena in lock-step, so the store must not
//! change between fit and report.

use crate::arena::BlockArena;
use crate::encode::decode;
use crate::store::CountStore;
use std::io::{self, Write};

const COL_WIDTH: usize = 12;

/// Write the header line: `kmer`, `lib1..libN`, then one brace-delimited
/// column of 1-based library indices per comparison set.
pub fn write_header<W: Write>(w: &mut W, nlibs: usize, sets: &[Vec<usize>]) -> io::Result<()> {
    write!(w, "kmer")?;
    for i in 1..=nlibs {
        write!(w, "\tlib{i}")?;
    }
    for set in sets {
        write!(w, "\t{{ ")?;
        for &i in set {
            write!(w, "{} ", i + 1)?;
        }
        write!(w, "}}")?;
    }
    writeln!(w)
}

/// Write one row per record: decoded sequence, per-library counts, then
/// one GOF value per comparison set read sequentially from the arena.
pub fn write_table<W: Write>(
    w: &mut W,
    store: &CountStore,
    nsets: usize,
    arena: &BlockArena<f64>,
) -> io::Result<()> {
    if arena.len() != store.len() * nsets {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "arena holds {} statistics but the table needs {} ({} kmers x {} sets)",
                arena.len(),
                store.len() * nsets,
                store.len(),
                nsets
            ),
        ));
    }
    let mut stats = arena.iter();
    for (key, counts) in store.iter() {
        write!(w, "{}", decode(key))?;
        for &c in counts {
            write!(w, "\t{:>width$}", c, width = COL_WIDTH)?;
        }
        for _ in 0..nsets {
            // length checked above; every row has its statistics
            let v = *stats.next().expect("arena exhausted mid-table");
            write!(w, "\t{:>width$}", sci(v), width = COL_WIDTH)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// C-style scientific notation: 5 fractional digits, signed two-digit
/// exponent. Non-finite values print `inf`, `-inf`, or `nan`.
pub(crate) fn sci(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let s = format!("{x:.5e}");
    let (mant, exp) = s.split_once('e').expect("exponent in {:e} output");
    match exp.strip_prefix('-') {
        Some(d) => format!("{mant}e-{d:0>2}"),
        None => format!("{mant}e+{exp:0>2}"),
    }
}
