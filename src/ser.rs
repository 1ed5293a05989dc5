//! Serialize any [`serde::Serialize`] value through a [`Template`].
//!
//! The serializer walks the value, pairing each leaf (booleans, numbers,
//! characters, strings, unit-variant names) with the template's next
//! placeholder and emitting literal runs between them. Sequences, tuples,
//! and structs flatten in declaration order, so a struct and a template
//! line up field by field:
//!
//! ```
//! # use ggfmt::format_specs::Template;
//! # use ggfmt::ser::to_string;
//! #[derive(serde::Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let t = Template::parse("({}, {})").unwrap();
//! let s = to_string(&Point { x: 3, y: 4 }, &t).unwrap();
//! assert_eq!(s, "(3, 4)");
//! ```
//!
//! Maps are rejected: a positional template has no way to address values by
//! key. Deserialization is likewise out of scope; this engine only renders.
use serde::ser::{self, Impossible};

use crate::buffer::FormatBuffer;
use crate::convert::GgFormat;
use crate::format_specs::{FormatOpts, Segment, Template};
use crate::serde_error::{SError, SResult};

/// Serialize `value` through `template` into a freshly allocated `String`.
pub fn to_string<T>(value: &T, template: &Template) -> SResult<String>
where
    T: ser::Serialize,
{
    let mut serializer = Serializer::new(template, FormatBuffer::growable());
    value.serialize(&mut serializer)?;
    let fb = serializer.finish()?;
    Ok(fb.into_string())
}

/// Serialize `value` through `template` into a caller-owned buffer,
/// clipping at its capacity. Returns the pre-truncation length.
pub fn to_fixed<T>(value: &T, dst: &mut [u8], template: &Template) -> SResult<usize>
where
    T: ser::Serialize,
{
    let mut serializer = Serializer::new(template, FormatBuffer::new(dst));
    value.serialize(&mut serializer)?;
    let fb = serializer.finish()?;
    Ok(fb.finish())
}

/// Serializer pairing serialized leaves with template placeholders
struct Serializer<'f, 'b> {
    fb: FormatBuffer<'b>,
    template: &'f Template,
    seg_idx: usize,
}

impl<'f, 'b> Serializer<'f, 'b> {
    fn new(template: &'f Template, fb: FormatBuffer<'b>) -> Self {
        Self { fb, template, seg_idx: 0 }
    }

    /// Emit literal runs up to the next placeholder and consume it.
    fn next_opts(&mut self) -> SResult<FormatOpts> {
        while let Some(segment) = self.template.segments.get(self.seg_idx) {
            self.seg_idx += 1;
            match segment {
                Segment::Literal(text) => self.fb.write_str(text),
                Segment::Placeholder(opts) => return Ok(*opts),
            }
        }
        Err(SError::TemplateTooShort)
    }

    fn put<V: GgFormat>(&mut self, value: V) -> SResult<()> {
        let opts = self.next_opts()?;
        value.format(&mut self.fb, &opts);
        Ok(())
    }

    /// Flush trailing literal runs; every placeholder must be filled.
    fn finish(mut self) -> SResult<FormatBuffer<'b>> {
        while let Some(segment) = self.template.segments.get(self.seg_idx) {
            match segment {
                Segment::Literal(text) => {
                    self.fb.write_str(text);
                    self.seg_idx += 1;
                }
                Segment::Placeholder(_) => {
                    let remaining = self.template.segments[self.seg_idx..]
                        .iter()
                        .filter(|s| matches!(s, Segment::Placeholder(_)))
                        .count();
                    return Err(SError::UnfilledPlaceholders(remaining));
                }
            }
        }
        Ok(self.fb)
    }
}

impl<'a, 'f, 'b> ser::Serializer for &'a mut Serializer<'f, 'b> {
    type Ok = ();
    type Error = SError;

    // the template cursor lives on the serializer, so compound types just
    // keep feeding their elements through it
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Impossible<(), SError>;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, v: bool) -> SResult<()> {
        self.put(v)
    }

    fn serialize_i8(self, v: i8) -> SResult<()> {
        self.put(v)
    }

    fn serialize_i16(self, v: i16) -> SResult<()> {
        self.put(v)
    }

    fn serialize_i32(self, v: i32) -> SResult<()> {
        self.put(v)
    }

    fn serialize_i64(self, v: i64) -> SResult<()> {
        self.put(v)
    }

    fn serialize_i128(self, v: i128) -> SResult<()> {
        self.put(v)
    }

    fn serialize_u8(self, v: u8) -> SResult<()> {
        self.put(v)
    }

    fn serialize_u16(self, v: u16) -> SResult<()> {
        self.put(v)
    }

    fn serialize_u32(self, v: u32) -> SResult<()> {
        self.put(v)
    }

    fn serialize_u64(self, v: u64) -> SResult<()> {
        self.put(v)
    }

    fn serialize_u128(self, v: u128) -> SResult<()> {
        self.put(v)
    }

    fn serialize_f32(self, v: f32) -> SResult<()> {
        self.put(v)
    }

    fn serialize_f64(self, v: f64) -> SResult<()> {
        self.put(v)
    }

    fn serialize_char(self, v: char) -> SResult<()> {
        self.put(v)
    }

    fn serialize_str(self, v: &str) -> SResult<()> {
        self.put(v)
    }

    fn serialize_bytes(self, _v: &[u8]) -> SResult<()> {
        Err(SError::Unrepresentable("byte array"))
    }

    fn serialize_none(self) -> SResult<()> {
        Err(SError::Unrepresentable("None"))
    }

    fn serialize_some<T: ?Sized>(self, value: &T) -> SResult<()>
    where
        T: ser::Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> SResult<()> {
        Err(SError::Unrepresentable("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> SResult<()> {
        Err(SError::Unrepresentable("unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> SResult<()> {
        // a variant with no payload serializes as its name
        self.put(variant)
    }

    fn serialize_newtype_struct<T: ?Sized>(self, _name: &'static str, value: &T) -> SResult<()>
    where
        T: ser::Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> SResult<()>
    where
        T: ser::Serialize,
    {
        // the variant name takes one placeholder, the payload the next
        self.serialize_unit_variant(name, variant_index, variant)?;
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> SResult<Self::SerializeSeq> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> SResult<Self::SerializeTuple> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> SResult<Self::SerializeTupleStruct> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> SResult<Self::SerializeTupleVariant> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> SResult<Self::SerializeMap> {
        Err(SError::Unrepresentable("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> SResult<Self::SerializeStruct> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> SResult<Self::SerializeStructVariant> {
        Ok(self)
    }
}

impl<'a, 'f, 'b> ser::SerializeSeq for &'a mut Serializer<'f, 'b> {
    type Ok = ();
    type Error = SError;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> SResult<()>
    where
        T: ser::Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> SResult<()> {
        Ok(())
    }
}

impl<'a, 'f, 'b> ser::SerializeTuple for &'a mut Serializer<'f, 'b> {
    type Ok = ();
    type Error = SError;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> SResult<()>
    where
        T: ser::Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> SResult<()> {
        Ok(())
    }
}

impl<'a, 'f, 'b> ser::SerializeTupleStruct for &'a mut Serializer<'f, 'b> {
    type Ok = ();
    type Error = SError;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> SResult<()>
    where
        T: ser::Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> SResult<()> {
        Ok(())
    }
}

impl<'a, 'f, 'b> ser::SerializeTupleVariant for &'a mut Serializer<'f, 'b> {
    type Ok = ();
    type Error = SError;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> SResult<()>
    where
        T: ser::Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> SResult<()> {
        Ok(())
    }
}

impl<'a, 'f, 'b> ser::SerializeStruct for &'a mut Serializer<'f, 'b> {
    type Ok = ();
    type Error = SError;

    fn serialize_field<T: ?Sized>(&mut self, _key: &'static str, value: &T) -> SResult<()>
    where
        T: ser::Serialize,
    {
        // fields pair with placeholders in declaration order; the name is
        // the template author's responsibility
        value.serialize(&mut **self)
    }

    fn end(self) -> SResult<()> {
        Ok(())
    }
}

impl<'a, 'f, 'b> ser::SerializeStructVariant for &'a mut Serializer<'f, 'b> {
    type Ok = ();
    type Error = SError;

    fn serialize_field<T: ?Sized>(&mut self, _key: &'static str, value: &T) -> SResult<()>
    where
        T: ser::Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> SResult<()> {
        Ok(())
    }
}
