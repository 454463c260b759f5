//! Streaming write side of the codec.
//!
//! Output goes straight to the writer as fields are written; no document tree
//! is built. Layout (compact or indented) is delegated to serde_json's
//! formatters.

use super::error::Result;
use super::value::{Scalar, WireEnum, WireValue};
use super::{CodecOptions, Serializable, TYPE_KEY};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use std::borrow::Cow;
use std::io;

enum Style {
    Compact(CompactFormatter),
    Pretty(PrettyFormatter<'static>),
}

macro_rules! format_with {
    ($ctx:expr, $method:ident $(, $arg:expr)*) => {
        match &mut $ctx.style {
            Style::Compact(f) => f.$method(&mut *$ctx.out $(, $arg)*),
            Style::Pretty(f) => f.$method(&mut *$ctx.out $(, $arg)*),
        }
    };
}

/// Receives the fields of the object currently being written.
///
/// [`Serializable::write_fields`] gets one of these positioned inside the
/// entity's object and writes its members in any order it likes.
pub struct WriteContext<'w> {
    out: &'w mut dyn io::Write,
    style: Style,
    first: bool,
}

impl<'w> WriteContext<'w> {
    pub(crate) fn new(out: &'w mut dyn io::Write, options: CodecOptions) -> Self {
        let style = if options.pretty {
            Style::Pretty(PrettyFormatter::new())
        } else {
            Style::Compact(CompactFormatter)
        };
        Self {
            out,
            style,
            first: true,
        }
    }

    /// Write a primitive, timestamp, identity, vector or optional member.
    pub fn write_value<V: WireValue>(&mut self, name: &str, value: &V) -> Result<()> {
        self.key(name)?;
        self.scalar(value.to_scalar())?;
        self.end_member()
    }

    /// Write a byte buffer as standard base64 text.
    pub fn write_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let encoded = STANDARD.encode(bytes);
        self.key(name)?;
        self.scalar(Scalar::Str(Cow::Owned(encoded)))?;
        self.end_member()
    }

    /// Write an enumeration by variant name.
    pub fn write_enum<E: WireEnum>(&mut self, name: &str, value: &E) -> Result<()> {
        self.key(name)?;
        self.scalar(Scalar::Str(Cow::Borrowed(value.name())))?;
        self.end_member()
    }

    /// Write a nested object without a type discriminator.
    pub fn write_object<T: Serializable + ?Sized>(&mut self, name: &str, value: &T) -> Result<()> {
        self.key(name)?;
        self.object(value, false)?;
        self.end_member()
    }

    /// Write a nested object tagged with its concrete type name.
    pub fn write_polymorphic<T: Serializable + ?Sized>(
        &mut self,
        name: &str,
        value: &T,
    ) -> Result<()> {
        self.key(name)?;
        self.object(value, true)?;
        self.end_member()
    }

    /// Write a homogeneous list of plain objects.
    pub fn write_list<'i, T>(
        &mut self,
        name: &str,
        items: impl IntoIterator<Item = &'i T>,
    ) -> Result<()>
    where
        T: Serializable + 'i,
    {
        self.array(name, items, |ctx, item| ctx.object(item, false))
    }

    /// Write a list whose elements each carry their concrete type name.
    pub fn write_polymorphic_list<'i, T>(
        &mut self,
        name: &str,
        items: impl IntoIterator<Item = &'i T>,
    ) -> Result<()>
    where
        T: Serializable + 'i,
    {
        self.array(name, items, |ctx, item| ctx.object(item, true))
    }

    /// Write a list of leaf values.
    pub fn write_value_list<'i, V>(
        &mut self,
        name: &str,
        items: impl IntoIterator<Item = &'i V>,
    ) -> Result<()>
    where
        V: WireValue + 'i,
    {
        self.array(name, items, |ctx, item| ctx.scalar(item.to_scalar()))
    }

    pub(crate) fn root<T: Serializable + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.object(value, false)?;
        self.out.flush()?;
        Ok(())
    }

    fn object<T: Serializable + ?Sized>(&mut self, value: &T, tagged: bool) -> Result<()> {
        format_with!(self, begin_object)?;
        let outer = std::mem::replace(&mut self.first, true);
        if tagged {
            self.key(TYPE_KEY)?;
            self.scalar(Scalar::Str(Cow::Borrowed(value.type_name())))?;
            self.end_member()?;
        }
        value.write_fields(self)?;
        self.first = outer;
        format_with!(self, end_object)?;
        Ok(())
    }

    fn array<I, F>(&mut self, name: &str, items: I, mut write: F) -> Result<()>
    where
        I: IntoIterator,
        F: FnMut(&mut Self, I::Item) -> Result<()>,
    {
        self.key(name)?;
        format_with!(self, begin_array)?;
        for (index, item) in items.into_iter().enumerate() {
            format_with!(self, begin_array_value, index == 0)?;
            write(self, item)?;
            format_with!(self, end_array_value)?;
        }
        format_with!(self, end_array)?;
        self.end_member()
    }

    fn key(&mut self, name: &str) -> Result<()> {
        let first = std::mem::replace(&mut self.first, false);
        format_with!(self, begin_object_key, first)?;
        serde_json::to_writer(&mut *self.out, name)?;
        format_with!(self, end_object_key)?;
        format_with!(self, begin_object_value)?;
        Ok(())
    }

    fn end_member(&mut self) -> Result<()> {
        format_with!(self, end_object_value)?;
        Ok(())
    }

    fn scalar(&mut self, scalar: Scalar<'_>) -> Result<()> {
        match scalar {
            Scalar::Null => format_with!(self, write_null)?,
            Scalar::Bool(value) => format_with!(self, write_bool, value)?,
            Scalar::Int(value) => format_with!(self, write_i64, value)?,
            Scalar::Float(value) => format_with!(self, write_f64, value)?,
            Scalar::Float32(value) => format_with!(self, write_f32, value)?,
            Scalar::Str(text) => serde_json::to_writer(&mut *self.out, text.as_ref())?,
        }
        Ok(())
    }
}
