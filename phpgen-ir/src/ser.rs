//! Convert any `Serialize` value into a [`Value`].
//!
//! Scalars, options, sequences and maps map onto PHP literals. Structs,
//! enum variants carrying data and byte buffers have no literal form and
//! fail with [`Error::UnsupportedValueKind`].

use std::fmt;

use phpgen_core::{Error, Result};
use serde::ser::{self, Impossible, Serialize};

use crate::{ArrayKey, PhpArray, Value};

/// Serialize `value` into a formatter value.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer).map_err(|e| e.0)
}

#[derive(Debug)]
struct SerError(Error);

impl fmt::Display for SerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for SerError {}

impl ser::Error for SerError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        SerError(Error::unsupported(msg.to_string()))
    }
}

fn unsupported(kind: impl Into<String>) -> SerError {
    SerError(Error::unsupported(kind))
}

struct ValueSerializer;

type SerResult<T> = std::result::Result<T, SerError>;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = SerError;
    type SerializeSeq = ArraySerializer;
    type SerializeTuple = ArraySerializer;
    type SerializeTupleStruct = Impossible<Value, SerError>;
    type SerializeTupleVariant = Impossible<Value, SerError>;
    type SerializeMap = MapSerializer;
    type SerializeStruct = Impossible<Value, SerError>;
    type SerializeStructVariant = Impossible<Value, SerError>;

    fn serialize_bool(self, v: bool) -> SerResult<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> SerResult<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> SerResult<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> SerResult<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> SerResult<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> SerResult<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> SerResult<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> SerResult<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u64(self, v: u64) -> SerResult<Value> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| unsupported(format!("integer {} (exceeds PHP_INT_MAX)", v)))
    }

    fn serialize_f32(self, v: f32) -> SerResult<Value> {
        Ok(Value::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> SerResult<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> SerResult<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> SerResult<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> SerResult<Value> {
        Err(unsupported("byte buffer"))
    }

    fn serialize_none(self) -> SerResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> SerResult<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> SerResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> SerResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> SerResult<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> SerResult<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        _value: &T,
    ) -> SerResult<Value> {
        Err(unsupported(format!("enum variant `{}::{}`", name, variant)))
    }

    fn serialize_seq(self, _len: Option<usize>) -> SerResult<ArraySerializer> {
        Ok(ArraySerializer::default())
    }

    fn serialize_tuple(self, _len: usize) -> SerResult<ArraySerializer> {
        Ok(ArraySerializer::default())
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> SerResult<Self::SerializeTupleStruct> {
        Err(unsupported(format!("struct `{}`", name)))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> SerResult<Self::SerializeTupleVariant> {
        Err(unsupported(format!("enum variant `{}::{}`", name, variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> SerResult<MapSerializer> {
        Ok(MapSerializer::default())
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> SerResult<Self::SerializeStruct> {
        Err(unsupported(format!("struct `{}`", name)))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> SerResult<Self::SerializeStructVariant> {
        Err(unsupported(format!("enum variant `{}::{}`", name, variant)))
    }
}

#[derive(Default)]
struct ArraySerializer {
    array: PhpArray,
}

impl ser::SerializeSeq for ArraySerializer {
    type Ok = Value;
    type Error = SerError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> SerResult<()> {
        self.array.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> SerResult<Value> {
        Ok(Value::Array(self.array))
    }
}

impl ser::SerializeTuple for ArraySerializer {
    type Ok = Value;
    type Error = SerError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> SerResult<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> SerResult<Value> {
        ser::SerializeSeq::end(self)
    }
}

#[derive(Default)]
struct MapSerializer {
    array: PhpArray,
    key: Option<ArrayKey>,
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = SerError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> SerResult<()> {
        let key = match key.serialize(ValueSerializer)? {
            Value::String(s) => ArrayKey::normalized(s),
            Value::Int(i) => ArrayKey::Int(i),
            Value::Bool(b) => ArrayKey::Int(i64::from(b)),
            other => return Err(unsupported(format!("{} map key", other.kind()))),
        };
        self.key = Some(key);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> SerResult<()> {
        let key = self
            .key
            .take()
            .ok_or_else(|| <SerError as ser::Error>::custom("map value without a key"))?;
        self.array.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> SerResult<Value> {
        Ok(Value::Array(self.array))
    }
}
