/// Digit histograms for the radix sort passes.
///
/// Narrow words (1 and 2 bytes) get one table indexed by the whole value:
/// 256 entries sit in L1, 65536 in L2. Wide words (4 and 8 bytes) get one
/// 2048-entry table per 11-bit digit, all filled in a single traversal.
use super::key::{ElementWidth, NumericCategory, RadixWord, to_order_domain};

/// Count (or, after `prefix_sum`, cumulative count) per digit value.
pub type FrequencyTable = Vec<u64>;

/// Single-table histogram for 1- and 2-byte words.
///
/// Signed words are counted at their order-domain index; `data` is left
/// untouched. Float has no narrow representation and yields an all-zero table.
pub fn compute_frequency<W: RadixWord>(data: &[W], category: NumericCategory) -> FrequencyTable {
    debug_assert!(is_single_table(W::WIDTH));
    let mut table = vec![0u64; W::WIDTH.table_len()];
    match category {
        NumericCategory::Unsigned => {
            for &w in data {
                table[w.as_index()] += 1;
            }
        }
        NumericCategory::Signed => {
            for &w in data {
                table[w.toggle_sign_bit().as_index()] += 1;
            }
        }
        NumericCategory::Float => {}
    }
    table
}

/// Per-digit histograms for 4- and 8-byte words: 3 or 6 tables of 2048.
///
/// For Signed and Float every element of `data` is overwritten with its
/// order-domain form before its digits are counted. The sort passes that
/// follow read those transformed words and must not transform them again.
pub fn compute_frequency_passes<W: RadixWord>(
    data: &mut [W],
    category: NumericCategory,
) -> Vec<FrequencyTable> {
    let passes = W::WIDTH.digit_passes();
    let mut tables = vec![vec![0u64; W::WIDTH.table_len()]; passes];
    match category {
        NumericCategory::Unsigned => {
            for &w in data.iter() {
                count_digits(&mut tables, w);
            }
        }
        NumericCategory::Signed | NumericCategory::Float => {
            for w in data.iter_mut() {
                let value = to_order_domain(*w, category);
                *w = value;
                count_digits(&mut tables, value);
            }
        }
    }
    tables
}

#[inline(always)]
fn count_digits<W: RadixWord>(tables: &mut [FrequencyTable], value: W) {
    for (pass, table) in tables.iter_mut().enumerate() {
        table[value.extract_digit(pass)] += 1;
    }
}

/// Rewrite every word of `data` in its order-domain form.
pub fn transform_to_order_domain<W: RadixWord>(data: &mut [W], category: NumericCategory) {
    if category == NumericCategory::Unsigned {
        return;
    }
    for w in data.iter_mut() {
        *w = to_order_domain(*w, category);
    }
}

/// In-place inclusive prefix sum: `table[i] += table[i - 1]`.
///
/// Afterwards `table[d]` is the number of elements whose digit is `<= d`.
#[inline]
pub fn prefix_sum(table: &mut [u64]) {
    for i in 1..table.len() {
        table[i] += table[i - 1];
    }
}

/// Sum of all counts in a frequency table.
pub fn table_total(table: &[u64]) -> u64 {
    table.iter().sum()
}

/// Whether a histogram pass for `width` tracks a single whole-value table.
#[inline]
pub fn is_single_table(width: ElementWidth) -> bool {
    width.digit_passes() == 1
}
