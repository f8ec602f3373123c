/// LSD radix sort driver for fixed-width numeric slices.
///
/// Sorting happens in the order domain (see `key`): Signed and Float words
/// are transformed, sorted as unsigned words, and transformed back on the
/// final write.
///
/// Pass layout per width:
/// - 1 and 2 bytes: one counting-sort pass on the whole value
/// - 4 bytes: three 11-bit passes (bits 0-10, 11-21, 22-32)
/// - 8 bytes: six 11-bit passes (bits 0-10, ..., 55-65)
///
/// Each pass scatters back to front through an inclusive prefix-sum table,
/// decrementing the digit's entry before using it as the destination. That
/// keeps every pass stable, which later passes depend on.
use std::mem;

use super::histogram::{
    FrequencyTable, compute_frequency, compute_frequency_passes, is_single_table, prefix_sum,
    table_total,
};
use super::key::{
    ElementKind, ElementWidth, NumericCategory, RadixElement, RadixWord, from_order_domain,
    to_order_domain,
};

/// Errors reported by the sorter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SortError {
    /// No sort routine exists for this width/category combination.
    ///
    /// Widths other than 1, 2, 4 and 8 bytes are never supported, and
    /// Float is only supported at 4 and 8 bytes.
    #[error("unsupported element type: {width_bytes}-byte {category}")]
    UnsupportedElementType {
        width_bytes: usize,
        category: NumericCategory,
    },

    /// A raw byte buffer cannot be viewed as a slice of elements.
    #[error("invalid buffer: {len} bytes is not an aligned run of {width_bytes}-byte elements")]
    InvalidBuffer { len: usize, width_bytes: usize },
}

/// What to do when asked to sort an unsupported element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// Return `SortError::UnsupportedElementType`.
    #[default]
    Error,
    /// Leave the data untouched and report success.
    Ignore,
}

/// Configuration for a `RadixSorter`.
#[derive(Debug, Clone, Default)]
pub struct SortConfig {
    pub unsupported: UnsupportedPolicy,
}

/// Sort routine selected for an element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortRoutine {
    /// One counting-sort pass keyed on the whole value.
    SinglePass,
    /// `passes` counting-sort passes over 11-bit digits.
    MultiPass { passes: usize },
    Unsupported,
}

impl SortRoutine {
    pub fn select(kind: ElementKind) -> Self {
        match (kind.width(), kind.category) {
            (None, _) => SortRoutine::Unsupported,
            (Some(ElementWidth::One | ElementWidth::Two), NumericCategory::Float) => {
                SortRoutine::Unsupported
            }
            (Some(width), _) if is_single_table(width) => SortRoutine::SinglePass,
            (Some(width), _) => SortRoutine::MultiPass {
                passes: width.digit_passes(),
            },
        }
    }
}

/// Reusable radix sorter.
///
/// Holds its configuration and a scratch arena that grows to the largest
/// input seen; nothing else carries over between calls. Every sort borrows
/// both the sorter and the data mutably, and Signed/Float data is rewritten
/// in place mid-sort, so the data must not be observed until the call
/// returns.
#[derive(Debug, Default)]
pub struct RadixSorter {
    config: SortConfig,
    scratch: Vec<u64>,
}

impl RadixSorter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SortConfig) -> Self {
        RadixSorter {
            config,
            scratch: Vec::new(),
        }
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Bytes currently held by the scratch arena.
    pub fn scratch_capacity_bytes(&self) -> usize {
        self.scratch.len() * mem::size_of::<u64>()
    }

    /// Release the scratch arena.
    pub fn shrink(&mut self) {
        self.scratch = Vec::new();
    }

    /// Sort `data` ascending in its natural numeric order.
    ///
    /// Floats are ordered like `total_cmp`: negative NaNs first, then
    /// -inf..-0.0, then 0.0..inf, then positive NaNs.
    pub fn sort<T: RadixElement>(&mut self, data: &mut [T]) -> Result<(), SortError> {
        let words: &mut [T::Word] = bytemuck::cast_slice_mut(data);
        self.sort_words(words, T::CATEGORY)
    }

    /// Sort a native-endian buffer of `kind` elements in place.
    ///
    /// `bytes` must be aligned for the element width and hold a whole
    /// number of elements.
    pub fn sort_bytes(&mut self, bytes: &mut [u8], kind: ElementKind) -> Result<(), SortError> {
        let width = match (SortRoutine::select(kind), kind.width()) {
            (SortRoutine::Unsupported, _) | (_, None) => return self.unsupported(kind),
            (_, Some(width)) => width,
        };
        // An empty Vec<u8> has a dangling pointer that need not be aligned.
        if bytes.is_empty() {
            return Ok(());
        }
        let invalid = SortError::InvalidBuffer {
            len: bytes.len(),
            width_bytes: width.bytes(),
        };
        if bytes.len() % width.bytes() != 0 {
            return Err(invalid);
        }
        match width {
            ElementWidth::One => self.sort_words(bytes, kind.category),
            ElementWidth::Two => {
                let words: &mut [u16] = bytemuck::try_cast_slice_mut(bytes).map_err(|_| invalid)?;
                self.sort_words(words, kind.category)
            }
            ElementWidth::Four => {
                let words: &mut [u32] = bytemuck::try_cast_slice_mut(bytes).map_err(|_| invalid)?;
                self.sort_words(words, kind.category)
            }
            ElementWidth::Eight => {
                let words: &mut [u64] = bytemuck::try_cast_slice_mut(bytes).map_err(|_| invalid)?;
                self.sort_words(words, kind.category)
            }
        }
    }

    /// Sort words whose native interpretation is `category`.
    pub fn sort_words<W: RadixWord>(
        &mut self,
        data: &mut [W],
        category: NumericCategory,
    ) -> Result<(), SortError> {
        let kind = ElementKind::new(W::WIDTH.bytes(), category);
        match SortRoutine::select(kind) {
            SortRoutine::Unsupported => self.unsupported(kind),
            _ if data.len() <= 1 => Ok(()),
            SortRoutine::SinglePass => {
                self.sort_single_pass(data, category);
                Ok(())
            }
            SortRoutine::MultiPass { .. } => {
                self.sort_multi_pass(data, category);
                Ok(())
            }
        }
    }

    fn unsupported(&self, kind: ElementKind) -> Result<(), SortError> {
        match self.config.unsupported {
            UnsupportedPolicy::Ignore => Ok(()),
            UnsupportedPolicy::Error => Err(SortError::UnsupportedElementType {
                width_bytes: kind.width_bytes,
                category: kind.category,
            }),
        }
    }

    /// Counting sort on the whole value of a 1- or 2-byte word.
    fn sort_single_pass<W: RadixWord>(&mut self, data: &mut [W], category: NumericCategory) {
        let mut table = compute_frequency(data, category);
        debug_assert_eq!(table_total(&table), data.len() as u64);
        prefix_sum(&mut table);

        let scratch = scratch_slice::<W>(&mut self.scratch, data.len());
        for &w in data.iter().rev() {
            let key = to_order_domain(w, category);
            let slot = &mut table[key.as_index()];
            *slot -= 1;
            scratch[*slot as usize] = key;
        }

        for (dst, &src) in data.iter_mut().zip(scratch.iter()) {
            *dst = from_order_domain(src, category);
        }
    }

    /// 11-bit digit passes, alternating between `data` and scratch.
    fn sort_multi_pass<W: RadixWord>(&mut self, data: &mut [W], category: NumericCategory) {
        // Leaves Signed/Float words of `data` in order-domain form.
        let mut tables = compute_frequency_passes(data, category);
        for table in tables.iter_mut() {
            debug_assert_eq!(table_total(table), data.len() as u64);
            prefix_sum(table);
        }

        let scratch = scratch_slice::<W>(&mut self.scratch, data.len());
        let mut in_scratch = false;
        for (pass, table) in tables.iter_mut().enumerate() {
            if in_scratch {
                scatter_pass(scratch, data, table, pass);
            } else {
                scatter_pass(data, scratch, table, pass);
            }
            in_scratch = !in_scratch;
        }

        if in_scratch {
            for (dst, &src) in data.iter_mut().zip(scratch.iter()) {
                *dst = from_order_domain(src, category);
            }
        } else if category != NumericCategory::Unsigned {
            for w in data.iter_mut() {
                *w = from_order_domain(*w, category);
            }
        }
    }
}

/// Stable scatter of `src` into `dst` by the digit at `pass`.
///
/// `table` must hold the inclusive prefix sum of the digit counts of `src`.
#[inline]
pub(super) fn scatter_pass<W: RadixWord>(
    src: &[W],
    dst: &mut [W],
    table: &mut FrequencyTable,
    pass: usize,
) {
    for &w in src.iter().rev() {
        let slot = &mut table[w.extract_digit(pass)];
        *slot -= 1;
        dst[*slot as usize] = w;
    }
}

/// View the first `len` words of the arena as `[W]`, growing it if needed.
fn scratch_slice<W: RadixWord>(arena: &mut Vec<u64>, len: usize) -> &mut [W] {
    let needed = (len * mem::size_of::<W>()).div_ceil(mem::size_of::<u64>());
    if arena.len() < needed {
        arena.resize(needed, 0);
    }
    let words: &mut [W] = bytemuck::cast_slice_mut(&mut arena[..needed]);
    &mut words[..len]
}

/// Sort `data` ascending with a throwaway sorter.
///
/// Every `RadixElement` has a supported width, so this never fails.
pub fn radix_sort<T: RadixElement>(data: &mut [T]) {
    let mut sorter = RadixSorter::with_config(SortConfig {
        unsupported: UnsupportedPolicy::Ignore,
    });
    // The Ignore policy turns the only error into a no-op.
    let _ = sorter.sort(data);
}

/// Check that `data` is ascending in the order the sorter produces.
pub fn is_radix_sorted<T: RadixElement>(data: &[T]) -> bool {
    let words: &[T::Word] = bytemuck::cast_slice(data);
    words.windows(2).all(|pair| {
        to_order_domain(pair[0], T::CATEGORY) <= to_order_domain(pair[1], T::CATEGORY)
    })
}
