//! Single-bit flags and packed flag sets

use crate::error::RawError;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;

/// A named single-bit value of a native flags type
pub trait BitFlag: Copy + Eq + fmt::Debug + 'static {
    /// Every flag, in declaration order
    const ALL: &'static [Self];

    /// The bit this flag stands for
    fn bit(self) -> u32;

    /// Look up the flag for an exact bit
    fn from_bit(bit: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|flag| flag.bit() == bit)
    }
}

/// Look up a flag by bit, reporting unknown bits as an error
pub fn flag_from_bit<F: BitFlag>(bit: u32, type_name: &'static str) -> Result<F, RawError> {
    F::from_bit(bit).ok_or(RawError::UnknownValue {
        type_name,
        value: i64::from(bit),
    })
}

/// A set of flags packed into one native integer
///
/// Bits that name no known flag are kept, so converting a native value into
/// a set and back never loses information.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagSet<F> {
    bits: u32,
    _flag: PhantomData<fn() -> F>,
}

impl<F> FlagSet<F> {
    /// The empty set
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Wrap packed native bits
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            _flag: PhantomData,
        }
    }

    /// The packed native bits
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Whether no bit is set
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl<F: BitFlag> FlagSet<F> {
    /// Every known flag
    pub fn all() -> Self {
        F::ALL.iter().copied().collect()
    }

    /// Whether `flag` is in the set
    pub fn contains(&self, flag: F) -> bool {
        let bit = flag.bit();
        bit != 0 && self.bits & bit == bit
    }

    /// Add a flag
    pub fn insert(&mut self, flag: F) {
        self.bits |= flag.bit();
    }

    /// Remove a flag
    pub fn remove(&mut self, flag: F) {
        self.bits &= !flag.bit();
    }

    /// Builder form of [`FlagSet::insert`]
    pub fn with(mut self, flag: F) -> Self {
        self.insert(flag);
        self
    }

    /// Known flags in the set, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        F::ALL.iter().copied().filter(move |flag| self.contains(*flag))
    }

    /// Bits that name no known flag
    pub fn unknown_bits(&self) -> u32 {
        F::ALL.iter().fold(self.bits, |bits, flag| bits & !flag.bit())
    }
}

impl<F> Default for FlagSet<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: BitFlag> From<F> for FlagSet<F> {
    fn from(flag: F) -> Self {
        Self::from_bits(flag.bit())
    }
}

impl<F: BitFlag> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::empty();
        set.extend(iter);
        set
    }
}

impl<F: BitFlag> Extend<F> for FlagSet<F> {
    fn extend<I: IntoIterator<Item = F>>(&mut self, iter: I) {
        for flag in iter {
            self.insert(flag);
        }
    }
}

impl<F: BitFlag> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        list.entries(self.iter());
        let unknown = self.unknown_bits();
        if unknown != 0 {
            list.entry(&format_args!("{:#x}", unknown));
        }
        list.finish()
    }
}
