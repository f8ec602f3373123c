/// Order-domain key transforms for radix sorting.
///
/// Every supported element is reinterpreted as an unsigned word of the same
/// width. The transforms below map that word into a domain where plain
/// unsigned comparison matches the element's numeric order:
///
/// - Unsigned: `0x00..00` is the minimum, `0xFF..FF` the maximum. Identity.
/// - Signed: negatives occupy `0x80..00..=0xFF..FF`, non-negatives
///   `0x00..00..=0x7F..FF`. Toggling the sign bit puts MIN at zero.
/// - Float: negatives run from `0xFF..FF` (most negative) down to
///   `0x80..00` (-0.0), non-negatives from `0x00..00` up. Toggling the sign
///   bit of non-negatives and complementing negatives gives one ascending run.
use std::fmt;

/// Width of the digit used by the 32- and 64-bit passes.
pub const DIGIT_BITS: u32 = 11;

/// Mask selecting one 11-bit digit.
pub const DIGIT_MASK: u64 = (1 << DIGIT_BITS) - 1;

/// Numeric interpretation of an element's bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericCategory {
    Unsigned,
    Signed,
    Float,
}

impl NumericCategory {
    pub fn name(self) -> &'static str {
        match self {
            NumericCategory::Unsigned => "unsigned",
            NumericCategory::Signed => "signed",
            NumericCategory::Float => "float",
        }
    }
}

impl fmt::Display for NumericCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte width of a sortable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementWidth {
    One,
    Two,
    Four,
    Eight,
}

impl ElementWidth {
    /// Map a byte count to a width, `None` for anything but 1, 2, 4 or 8.
    pub fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(ElementWidth::One),
            2 => Some(ElementWidth::Two),
            4 => Some(ElementWidth::Four),
            8 => Some(ElementWidth::Eight),
            _ => None,
        }
    }

    #[inline]
    pub fn bytes(self) -> usize {
        match self {
            ElementWidth::One => 1,
            ElementWidth::Two => 2,
            ElementWidth::Four => 4,
            ElementWidth::Eight => 8,
        }
    }

    /// Number of counting-sort passes. Narrow widths sort on the whole value.
    #[inline]
    pub fn digit_passes(self) -> usize {
        match self {
            ElementWidth::One | ElementWidth::Two => 1,
            ElementWidth::Four => 3,
            ElementWidth::Eight => 6,
        }
    }

    /// Entries in one frequency table for this width.
    #[inline]
    pub fn table_len(self) -> usize {
        match self {
            ElementWidth::One => 1 << 8,
            ElementWidth::Two => 1 << 16,
            ElementWidth::Four | ElementWidth::Eight => 1 << DIGIT_BITS,
        }
    }
}

/// An unsigned word holding an element's bit pattern.
///
/// Implemented for `u8`, `u16`, `u32` and `u64`.
pub trait RadixWord: bytemuck::Pod + Ord + fmt::Debug + Send + Sync {
    const WIDTH: ElementWidth;
    const SIGN_BIT: Self;

    /// Toggle the most significant bit. Self-inverse.
    fn toggle_sign_bit(self) -> Self;

    /// Float forward transform.
    fn flip_float(self) -> Self;

    /// Float inverse transform.
    fn flop_float(self) -> Self;

    /// 11-bit digit at `pass`, least significant first.
    fn extract_digit(self, pass: usize) -> usize;

    /// The whole word as a table index (narrow single-pass sorts).
    fn as_index(self) -> usize;
}

macro_rules! radix_word_impl {
    ($($t:ty => $width:expr),* $(,)?) => ($(
        impl RadixWord for $t {
            const WIDTH: ElementWidth = $width;
            const SIGN_BIT: $t = 1 << (<$t>::BITS - 1);

            #[inline(always)]
            fn toggle_sign_bit(self) -> Self {
                self ^ Self::SIGN_BIT
            }

            #[inline(always)]
            fn flip_float(self) -> Self {
                if self & Self::SIGN_BIT != 0 {
                    !self
                } else {
                    self ^ Self::SIGN_BIT
                }
            }

            // Tests the sign bit of the transformed word: set means the
            // original was non-negative.
            #[inline(always)]
            fn flop_float(self) -> Self {
                if self & Self::SIGN_BIT != 0 {
                    self ^ Self::SIGN_BIT
                } else {
                    !self
                }
            }

            #[inline(always)]
            fn extract_digit(self, pass: usize) -> usize {
                let shift = DIGIT_BITS as usize * pass;
                if shift >= <$t>::BITS as usize {
                    return 0;
                }
                ((self >> shift) as u64 & DIGIT_MASK) as usize
            }

            #[inline(always)]
            fn as_index(self) -> usize {
                self as usize
            }
        }
    )*)
}

radix_word_impl! {
    u8 => ElementWidth::One,
    u16 => ElementWidth::Two,
    u32 => ElementWidth::Four,
    u64 => ElementWidth::Eight,
}

/// A numeric element type the sorter accepts.
///
/// `Word` must have the same size and bit layout as `Self`; the sorter
/// reinterprets element slices as word slices in place.
pub trait RadixElement: bytemuck::Pod {
    type Word: RadixWord;
    const CATEGORY: NumericCategory;
}

macro_rules! radix_element_impl {
    ($category:expr; $($t:ty => $w:ty),* $(,)?) => ($(
        impl RadixElement for $t {
            type Word = $w;
            const CATEGORY: NumericCategory = $category;
        }
    )*)
}

radix_element_impl! { NumericCategory::Unsigned; u8 => u8, u16 => u16, u32 => u32, u64 => u64 }
radix_element_impl! { NumericCategory::Signed; i8 => u8, i16 => u16, i32 => u32, i64 => u64 }
radix_element_impl! { NumericCategory::Float; f32 => u32, f64 => u64 }

#[cfg(target_pointer_width = "64")]
radix_element_impl! { NumericCategory::Unsigned; usize => u64 }
#[cfg(target_pointer_width = "64")]
radix_element_impl! { NumericCategory::Signed; isize => u64 }
#[cfg(target_pointer_width = "32")]
radix_element_impl! { NumericCategory::Unsigned; usize => u32 }
#[cfg(target_pointer_width = "32")]
radix_element_impl! { NumericCategory::Signed; isize => u32 }

/// Width and category of a (possibly type-erased) element buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementKind {
    pub width_bytes: usize,
    pub category: NumericCategory,
}

impl ElementKind {
    pub fn new(width_bytes: usize, category: NumericCategory) -> Self {
        ElementKind {
            width_bytes,
            category,
        }
    }

    /// Kind of a statically typed element.
    pub fn of<T: RadixElement>() -> Self {
        ElementKind::new(std::mem::size_of::<T>(), T::CATEGORY)
    }

    pub fn width(self) -> Option<ElementWidth> {
        ElementWidth::from_bytes(self.width_bytes)
    }
}

/// Map a word into the order domain for `category`.
#[inline(always)]
pub fn to_order_domain<W: RadixWord>(word: W, category: NumericCategory) -> W {
    match category {
        NumericCategory::Unsigned => word,
        NumericCategory::Signed => word.toggle_sign_bit(),
        NumericCategory::Float => word.flip_float(),
    }
}

/// Map an order-domain word back to its native bit pattern.
#[inline(always)]
pub fn from_order_domain<W: RadixWord>(word: W, category: NumericCategory) -> W {
    match category {
        NumericCategory::Unsigned => word,
        NumericCategory::Signed => word.toggle_sign_bit(),
        NumericCategory::Float => word.flop_float(),
    }
}
