//! Big-endian primitives shared by the record codec and the wire protocol.
//!
//! Writing goes straight through [`bytes::BufMut`] (which is big-endian by
//! default). Reading goes through [`WireReader`], a bounds-checked cursor:
//! `Buf::get_*` panics on short input, so every read is preceded by a length
//! check that turns truncation into a [`Truncated`] value the caller maps to
//! its own error variant.

use std::fmt;

use bytes::{Buf, BufMut};

/// A read ran past the end of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncated {
    /// Which field was being read
    pub field: &'static str,
    /// Bytes the field needed
    pub needed: usize,
    /// Bytes that were left
    pub remaining: usize,
}

impl fmt::Display for Truncated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "truncated {}: needed {} bytes, {} remaining",
            self.field, self.needed, self.remaining
        )
    }
}

/// Bounds-checked big-endian cursor over a byte slice
pub struct WireReader<'a> {
    buf: &'a [u8],
    consumed: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, consumed: 0 }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.consumed
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn ensure(&self, field: &'static str, needed: usize) -> Result<(), Truncated> {
        if self.buf.remaining() < needed {
            return Err(Truncated {
                field,
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn u8(&mut self, field: &'static str) -> Result<u8, Truncated> {
        self.ensure(field, 1)?;
        self.consumed += 1;
        Ok(self.buf.get_u8())
    }

    /// Any non-zero byte is `true`
    pub fn bool(&mut self, field: &'static str) -> Result<bool, Truncated> {
        Ok(self.u8(field)? != 0)
    }

    pub fn i32(&mut self, field: &'static str) -> Result<i32, Truncated> {
        self.ensure(field, 4)?;
        self.consumed += 4;
        Ok(self.buf.get_i32())
    }

    pub fn u32(&mut self, field: &'static str) -> Result<u32, Truncated> {
        self.ensure(field, 4)?;
        self.consumed += 4;
        Ok(self.buf.get_u32())
    }

    pub fn i64(&mut self, field: &'static str) -> Result<i64, Truncated> {
        self.ensure(field, 8)?;
        self.consumed += 8;
        Ok(self.buf.get_i64())
    }

    pub fn u64(&mut self, field: &'static str) -> Result<u64, Truncated> {
        self.ensure(field, 8)?;
        self.consumed += 8;
        Ok(self.buf.get_u64())
    }

    pub fn f32(&mut self, field: &'static str) -> Result<f32, Truncated> {
        self.ensure(field, 4)?;
        self.consumed += 4;
        Ok(self.buf.get_f32())
    }

    pub fn f64(&mut self, field: &'static str) -> Result<f64, Truncated> {
        self.ensure(field, 8)?;
        self.consumed += 8;
        Ok(self.buf.get_f64())
    }

    /// Borrow the next `len` bytes
    pub fn bytes(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], Truncated> {
        self.ensure(field, len)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        self.consumed += len;
        Ok(head)
    }

    /// `[u32 len][bytes]`
    pub fn len_prefixed(&mut self, field: &'static str) -> Result<&'a [u8], Truncated> {
        let len = self.u32(field)? as usize;
        self.bytes(field, len)
    }

    /// `[u32 count][f32 * count]`
    pub fn f32_vec(&mut self, field: &'static str) -> Result<Vec<f32>, Truncated> {
        let count = self.u32(field)? as usize;
        self.ensure(field, count.saturating_mul(4))?;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.f32(field)?);
        }
        Ok(out)
    }
}

/// Write `[u32 len][bytes]`
pub fn put_len_prefixed<B: BufMut>(buf: &mut B, bytes: &[u8]) {
    buf.put_u32(bytes.len() as u32);
    buf.put_slice(bytes);
}

/// Write `[u32 count][f32 * count]`
pub fn put_f32_vec<B: BufMut>(buf: &mut B, values: &[f32]) {
    buf.put_u32(values.len() as u32);
    for v in values {
        buf.put_f32(*v);
    }
}
