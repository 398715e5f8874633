//! Order-dependent binary archive used to persist opaque state.
//!
//! The format carries no magic number, no version and no type tags. Reader and
//! writer have to agree on the exact sequence of fields out of band:
//!
//! - primitives are written in native byte order, `size_of::<T>()` bytes each
//! - `bool` is a single byte (`0` or `1`)
//! - strings and byte blobs are a `u64` length followed by the raw bytes
//! - `Vec<T>` and `BTreeSet<T>` are a `u64` count followed by the elements in
//!   iteration order
//! - `BTreeMap<K, V>` is a `u64` count followed by `(key, value)` pairs
//! - tuples are their fields in declaration order
//!
//! This is an internal persistence format. It is used for title adapter
//! bookkeeping and for exported snapshots and must not be treated as a stable
//! interchange format across versions.
//!
//! # Usage
//!
//! ```rust
//! use ale_core::archive::{ArchiveReader, ArchiveWriter};
//!
//! let mut out = ArchiveWriter::new();
//! out.write(&42i32).write(&true).write(&String::from("pong"));
//! let bytes = out.into_bytes();
//!
//! let mut input = ArchiveReader::new(&bytes);
//! let score: i32 = input.read().unwrap();
//! let terminal: bool = input.read().unwrap();
//! let title: String = input.read().unwrap();
//! assert_eq!((score, terminal, title.as_str()), (42, true, "pong"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("Unexpected end of archive: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },
    #[error("Invalid bool byte: {0:#04X}")]
    InvalidBool(u8),
    #[error("Invalid UTF-8 in archived string")]
    InvalidUtf8,
    #[error("Archived length {0} does not fit in memory")]
    LengthOverflow(u64),
}

/// A value that can be appended to an [`ArchiveWriter`].
pub trait Encode {
    fn encode(&self, out: &mut ArchiveWriter);
}

/// A value that can be read back from an [`ArchiveReader`].
pub trait Decode: Sized {
    fn decode(input: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError>;
}

/// Growable output archive.
#[derive(Debug, Default, Clone)]
pub struct ArchiveWriter {
    buf: Vec<u8>,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value; returns `self` so fields can be chained in order.
    pub fn write<T: Encode + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.encode(self);
        self
    }

    /// Append a length-prefixed byte blob.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_len(bytes.len());
        self.buf.extend_from_slice(bytes);
        self
    }

    fn write_len(&mut self, len: usize) {
        self.buf.extend_from_slice(&(len as u64).to_ne_bytes());
    }

    fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an archived byte slice.
#[derive(Debug, Clone)]
pub struct ArchiveReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ArchiveReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn read<T: Decode>(&mut self) -> Result<T, ArchiveError> {
        T::decode(self)
    }

    /// Read a length-prefixed byte blob.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, ArchiveError> {
        let len = self.read_len()?;
        Ok(self.take(len)?.to_vec())
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn read_len(&mut self) -> Result<usize, ArchiveError> {
        let raw = u64::decode(self)?;
        usize::try_from(raw).map_err(|_| ArchiveError::LengthOverflow(raw))
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], ArchiveError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(ArchiveError::UnexpectedEof { needed, remaining });
        }
        let slice = &self.data[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ArchiveError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

macro_rules! impl_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Encode for $ty {
                #[inline]
                fn encode(&self, out: &mut ArchiveWriter) {
                    out.write_raw(&self.to_ne_bytes());
                }
            }

            impl Decode for $ty {
                #[inline]
                fn decode(input: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
                    Ok(<$ty>::from_ne_bytes(input.take_array()?))
                }
            }
        )*
    };
}

impl_primitive!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl Encode for bool {
    fn encode(&self, out: &mut ArchiveWriter) {
        out.write_raw(&[u8::from(*self)]);
    }
}

impl Decode for bool {
    fn decode(input: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        match input.take_array::<1>()?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ArchiveError::InvalidBool(other)),
        }
    }
}

impl Encode for str {
    fn encode(&self, out: &mut ArchiveWriter) {
        out.write_bytes(self.as_bytes());
    }
}

impl Encode for String {
    fn encode(&self, out: &mut ArchiveWriter) {
        self.as_str().encode(out);
    }
}

impl Decode for String {
    fn decode(input: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        let bytes = input.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| ArchiveError::InvalidUtf8)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, out: &mut ArchiveWriter) {
        out.write_len(self.len());
        for item in self {
            item.encode(out);
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, out: &mut ArchiveWriter) {
        self.as_slice().encode(out);
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(input: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        let count = input.read_len()?;
        // Cap the pre-allocation so a corrupt count cannot request huge buffers.
        let mut items = Vec::with_capacity(count.min(input.remaining()));
        for _ in 0..count {
            items.push(T::decode(input)?);
        }
        Ok(items)
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode(&self, out: &mut ArchiveWriter) {
        out.write_len(self.len());
        for item in self {
            item.encode(out);
        }
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode(input: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        let count = input.read_len()?;
        let mut set = BTreeSet::new();
        for _ in 0..count {
            set.insert(T::decode(input)?);
        }
        Ok(set)
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, out: &mut ArchiveWriter) {
        out.write_len(self.len());
        for (key, value) in self {
            key.encode(out);
            value.encode(out);
        }
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode(input: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        let count = input.read_len()?;
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key = K::decode(input)?;
            let value = V::decode(input)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode(&self, out: &mut ArchiveWriter) {
        self.0.encode(out);
        self.1.encode(out);
    }
}

impl<A: Decode, B: Decode> Decode for (A, B) {
    fn decode(input: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        let a = A::decode(input)?;
        let b = B::decode(input)?;
        Ok((a, b))
    }
}
