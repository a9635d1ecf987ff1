// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// A marker trait for the tag types of [`TypedIndex`].
///
/// The tag only exists at the type level; `NAME` is used when the
/// index is printed.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A `usize` index that cannot be confused with an index into
/// a different collection.
///
/// Device pools, bucket lists and dynamic-program state tables are all
/// addressed by plain positions. Wrapping each kind in its own tag keeps
/// a bucket position from being used to look up a device by accident.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new `TypedIndex` with the given `usize` index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use offboard_core::utils::index::{TypedIndex, TypedIndexTag};
    ///
    /// #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    /// struct DriveTag;
    ///
    /// impl TypedIndexTag for DriveTag {
    ///    const NAME: &'static str = "Drive";
    /// }
    ///
    /// type DriveIndex = TypedIndex<DriveTag>;
    ///
    /// let index = DriveIndex::new(5);
    /// assert_eq!(index.get(), 5);
    /// ```
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the underlying `usize` index.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    /// Returns the index that directly follows this one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use offboard_core::utils::index::{TypedIndex, TypedIndexTag};
    ///
    /// #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    /// struct DriveTag;
    ///
    /// impl TypedIndexTag for DriveTag {
    ///    const NAME: &'static str = "Drive";
    /// }
    ///
    /// let index = TypedIndex::<DriveTag>::new(3);
    /// assert_eq!(index.next().get(), 4);
    /// ```
    #[inline(always)]
    pub const fn next(&self) -> Self {
        Self::new(self.index + 1)
    }

    /// Returns an iterator over the indices `0..len`.
    #[inline]
    pub fn range(len: usize) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..len).map(Self::new)
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct SlotTag;

    impl TypedIndexTag for SlotTag {
        const NAME: &'static str = "Slot";
    }

    type SlotIndex = TypedIndex<SlotTag>;

    #[test]
    fn test_new_and_get() {
        let idx = SlotIndex::new(10);
        assert_eq!(idx.get(), 10);
    }

    #[test]
    fn test_conversions() {
        let idx: SlotIndex = 42.into();
        assert_eq!(idx.get(), 42);

        let val: usize = idx.into();
        assert_eq!(val, 42);
    }

    #[test]
    fn test_debug_and_display_use_tag_name() {
        let idx = SlotIndex::new(7);
        assert_eq!(format!("{}", idx), "Slot(7)");
        assert_eq!(format!("{:?}", idx), "Slot(7)");
    }

    #[test]
    fn test_next_and_range() {
        assert_eq!(SlotIndex::new(0).next(), SlotIndex::new(1));

        let all: Vec<SlotIndex> = SlotIndex::range(3).collect();
        assert_eq!(all, vec![SlotIndex::new(0), SlotIndex::new(1), SlotIndex::new(2)]);

        let reversed: Vec<usize> = SlotIndex::range(3).rev().map(|i| i.get()).collect();
        assert_eq!(reversed, vec![2, 1, 0]);
        assert_eq!(SlotIndex::range(0).len(), 0);
    }

    #[test]
    fn test_ordering_follows_position() {
        let mut indices = vec![SlotIndex::new(4), SlotIndex::new(1), SlotIndex::new(3)];
        indices.sort();
        assert_eq!(
            indices.iter().map(|i| i.get()).collect::<Vec<_>>(),
            vec![1, 3, 4]
        );
    }
}
