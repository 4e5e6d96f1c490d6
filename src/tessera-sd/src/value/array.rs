use std::{
    fmt, mem,
    ops::{Deref, Index, IndexMut},
};

use super::{drop, Value};

/// Errors from positional array operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("index {index} is out of range for an array of length {len}")]
pub struct IndexError {
    /// The requested position.
    pub index: usize,
    /// The length of the array at the time of the request.
    pub len: usize,
}

/// An ordered sequence of values with a non-recursive drop impl.
///
/// Elements are not required to share a kind.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Array {
    pub(super) inner: Vec<Value>,
}

impl Array {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty array with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Vec::with_capacity(capacity),
        }
    }

    fn check(&self, index: usize, len: usize) -> Result<(), IndexError> {
        if index < len {
            Ok(())
        } else {
            Err(IndexError {
                index,
                len: self.inner.len(),
            })
        }
    }

    /// Appends a value to the end.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.inner.push(value.into());
    }

    /// Appends a string value to the end.
    pub fn push_str(&mut self, text: &str) {
        self.inner.push(Value::String(text.to_owned()));
    }

    /// Inserts a value at `index`, shifting later elements back.
    ///
    /// `index` may equal the length to append.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<(), IndexError> {
        self.check(index, self.inner.len() + 1)?;
        self.inner.insert(index, value.into());
        Ok(())
    }

    /// Replaces the value at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<Value, IndexError> {
        self.check(index, self.inner.len())?;
        Ok(mem::replace(&mut self.inner[index], value.into()))
    }

    /// Removes and returns the value at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<Value, IndexError> {
        self.check(index, self.inner.len())?;
        Ok(self.inner.remove(index))
    }

    /// Removes the first element equal to `value`.
    ///
    /// Returns whether an element was removed.
    pub fn remove(&mut self, value: &Value) -> bool {
        match self.index_of(value) {
            Some(index) => {
                drop::safely(self.inner.remove(index));
                true
            }
            None => false,
        }
    }

    /// Finds the position of the first element equal to `value`.
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.inner.iter().position(|v| v == value)
    }

    /// Whether any element is a string equal to `text`.
    ///
    /// Elements of other kinds never match, even if their string
    /// coercion would.
    pub fn contains_str(&self, text: &str) -> bool {
        self.inner
            .iter()
            .any(|v| matches!(v, Value::String(s) if s == text))
    }

    /// Gets a mutable reference to the value at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.inner.get_mut(index)
    }

    /// Gets an iterator over mutable references to the elements.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.inner.iter_mut()
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.inner.drain(..).for_each(drop::safely);
    }
}

impl Drop for Array {
    fn drop(&mut self) {
        self.inner.drain(..).for_each(drop::safely);
    }
}

impl Deref for Array {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// # Panics
///
/// Panics when `index` is out of range.
impl Index<usize> for Array {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self.inner.get(index) {
            Some(v) => v,
            None => panic!("{}", IndexError { index, len: self.len() }),
        }
    }
}

impl IndexMut<usize> for Array {
    fn index_mut(&mut self, index: usize) -> &mut Value {
        let len = self.inner.len();
        match self.inner.get_mut(index) {
            Some(v) => v,
            None => panic!("{}", IndexError { index, len }),
        }
    }
}

/// Renders as `["a","b"]`, for diagnostics.
impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.inner.iter().enumerate() {
            if i != 0 {
                f.write_str(",")?;
            }
            write!(f, "\"{}\"", value.as_string())?;
        }
        f.write_str("]")
    }
}

impl From<Vec<Value>> for Array {
    fn from(inner: Vec<Value>) -> Self {
        Self { inner }
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<V: Into<Value>> Extend<V> for Array {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.inner.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(mut self) -> Self::IntoIter {
        mem::take(&mut self.inner).into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<'a> IntoIterator for &'a mut Array {
    type Item = &'a mut Value;
    type IntoIter = std::slice::IterMut<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter_mut()
    }
}
