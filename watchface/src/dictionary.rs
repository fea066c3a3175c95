//! Key/value dictionary exchanged with the companion app
//!
//! Layout: one count byte, then per tuple a little-endian `u32` key, a type byte, a
//! little-endian `u16` length and the value bytes. Integers are 1, 2 or 4 bytes wide.

use heapless::Vec;

use crate::error::DictionaryError;

const TUPLE_HEADER_LEN: usize = 7;

/// Tuple value type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TupleType {
    ByteArray = 0,
    CString = 1,
    Uint = 2,
    Int = 3,
}

impl TryFrom<u8> for TupleType {
    type Error = DictionaryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::ByteArray),
            1 => Ok(Self::CString),
            2 => Ok(Self::Uint),
            3 => Ok(Self::Int),
            other => Err(DictionaryError::UnknownType(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Bytes(&'a [u8]),
    CString(&'a [u8]),
    Uint(u32),
    Int(i32),
}

impl<'a> Value<'a> {
    /// Integer view; unsigned values are reinterpreted as `i32`.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Value::Int(v) => Some(v),
            Value::Uint(v) => Some(v as i32),
            _ => None,
        }
    }

    /// Text view of string or byte values, without trailing NULs.
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Value::CString(bytes) | Value::Bytes(bytes) => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                core::str::from_utf8(&bytes[..end]).ok()
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple<'a> {
    pub key: u32,
    pub value: Value<'a>,
}

/// Borrowed view of a received dictionary.
#[derive(Debug, Clone, Copy)]
pub struct Dictionary<'a> {
    count: u8,
    body: &'a [u8],
}

impl<'a> Dictionary<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<Self, DictionaryError> {
        match bytes.split_first() {
            Some((&count, body)) => Ok(Self { count, body }),
            None => Err(DictionaryError::MissingHeader),
        }
    }

    /// Number of tuples announced in the header.
    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> Tuples<'a> {
        Tuples {
            remaining: self.count,
            body: self.body,
            offset: 1,
            failed: false,
        }
    }
}

/// Iterator over tuples; yields one error and then stops.
pub struct Tuples<'a> {
    remaining: u8,
    body: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Tuples<'a> {
    fn fail(&mut self, error: DictionaryError) -> Option<Result<Tuple<'a>, DictionaryError>> {
        self.failed = true;
        Some(Err(error))
    }
}

impl<'a> Iterator for Tuples<'a> {
    type Item = Result<Tuple<'a>, DictionaryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        if self.body.len() < TUPLE_HEADER_LEN {
            return self.fail(DictionaryError::TruncatedHeader(self.offset));
        }
        let (header, rest) = self.body.split_at(TUPLE_HEADER_LEN);
        let key = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let kind = match TupleType::try_from(header[4]) {
            Ok(kind) => kind,
            Err(e) => return self.fail(e),
        };
        let length = u16::from_le_bytes([header[5], header[6]]);

        if rest.len() < length as usize {
            return self.fail(DictionaryError::TruncatedValue(
                self.offset + TUPLE_HEADER_LEN,
            ));
        }
        let (data, rest) = rest.split_at(length as usize);

        let value = match kind {
            TupleType::ByteArray => Value::Bytes(data),
            TupleType::CString => Value::CString(data),
            TupleType::Uint => match data {
                [a] => Value::Uint(*a as u32),
                [a, b] => Value::Uint(u16::from_le_bytes([*a, *b]) as u32),
                [a, b, c, d] => Value::Uint(u32::from_le_bytes([*a, *b, *c, *d])),
                _ => return self.fail(DictionaryError::InvalidIntegerWidth(length)),
            },
            TupleType::Int => match data {
                [a] => Value::Int(*a as i8 as i32),
                [a, b] => Value::Int(i16::from_le_bytes([*a, *b]) as i32),
                [a, b, c, d] => Value::Int(i32::from_le_bytes([*a, *b, *c, *d])),
                _ => return self.fail(DictionaryError::InvalidIntegerWidth(length)),
            },
        };

        self.body = rest;
        self.offset += TUPLE_HEADER_LEN + length as usize;
        Some(Ok(Tuple { key, value }))
    }
}

/// Builds an outbound dictionary into an `N`-byte buffer.
pub struct DictionaryWriter<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> DictionaryWriter<N> {
    pub fn new() -> Result<Self, DictionaryError> {
        let mut buf = Vec::new();
        buf.push(0).map_err(|_| DictionaryError::Overflow)?;
        Ok(Self { buf })
    }

    pub fn write_uint8(&mut self, key: u32, value: u8) -> Result<(), DictionaryError> {
        self.write(key, TupleType::Uint, &[value])
    }

    pub fn write_int32(&mut self, key: u32, value: i32) -> Result<(), DictionaryError> {
        self.write(key, TupleType::Int, &value.to_le_bytes())
    }

    /// Write `value` followed by its NUL terminator.
    pub fn write_cstring(&mut self, key: u32, value: &str) -> Result<(), DictionaryError> {
        let length = u16::try_from(value.len() + 1).map_err(|_| DictionaryError::Overflow)?;
        self.header(key, TupleType::CString, length)?;
        self.extend(value.as_bytes())?;
        self.extend(&[0])
    }

    pub fn finish(self) -> Vec<u8, N> {
        self.buf
    }

    fn write(&mut self, key: u32, kind: TupleType, data: &[u8]) -> Result<(), DictionaryError> {
        let length = u16::try_from(data.len()).map_err(|_| DictionaryError::Overflow)?;
        self.header(key, kind, length)?;
        self.extend(data)
    }

    fn header(&mut self, key: u32, kind: TupleType, length: u16) -> Result<(), DictionaryError> {
        if self.buf[0] == u8::MAX {
            return Err(DictionaryError::TooManyTuples);
        }
        if self.buf.len() + TUPLE_HEADER_LEN + length as usize > N {
            return Err(DictionaryError::Overflow);
        }
        self.extend(&key.to_le_bytes())?;
        self.extend(&[kind as u8])?;
        self.extend(&length.to_le_bytes())?;
        self.buf[0] += 1;
        Ok(())
    }

    fn extend(&mut self, data: &[u8]) -> Result<(), DictionaryError> {
        self.buf
            .extend_from_slice(data)
            .map_err(|_| DictionaryError::Overflow)
    }
}
