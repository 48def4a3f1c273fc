use std::fmt::{self, Display, Formatter};

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AttributeError {
    #[error("Value Is A {found} Not A {expected}")]
    TypeMismatch { expected: ValueKind, found: ValueKind },
}

/// A calendar timestamp as stored on the wire: no timezone, no
/// sub-second precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    /// Creates a timestamp from the date and time parts of a [NaiveDateTime].
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self {
            year: value.year() as u16,
            month: value.month() as u8,
            day: value.day() as u8,
            hour: value.hour() as u8,
            minute: value.minute() as u8,
            second: value.second() as u8,
        }
    }

    /// Converts the timestamp to a [NaiveDateTime]. Returns None if the
    /// fields do not name a real calendar date or time of day.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?
            .and_hms_opt(self.hour as u32, self.minute as u32, self.second as u32)
    }
}

impl From<NaiveDateTime> for DateTime {
    fn from(value: NaiveDateTime) -> Self {
        Self::from_naive(value)
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// The wire type of a [Value], one byte on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Byte,
    DateTime,
}

impl ValueKind {
    /// Returns the tag byte that identifies this kind on the wire.
    pub fn tag(self) -> u8 {
        match self {
            Self::String => 0x00,
            Self::Int32 => 0x01,
            Self::UInt32 => 0x02,
            Self::Int64 => 0x03,
            Self::UInt64 => 0x04,
            Self::Float32 => 0x05,
            Self::Float64 => 0x06,
            Self::Byte => 0x07,
            Self::DateTime => 0x08,
        }
    }

    /// Returns the kind for a tag byte. Returns None for tags outside the
    /// defined set.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x00 => Some(Self::String),
            0x01 => Some(Self::Int32),
            0x02 => Some(Self::UInt32),
            0x03 => Some(Self::Int64),
            0x04 => Some(Self::UInt64),
            0x05 => Some(Self::Float32),
            0x06 => Some(Self::Float64),
            0x07 => Some(Self::Byte),
            0x08 => Some(Self::DateTime),
            _ => None,
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "String",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Byte => "Byte",
            Self::DateTime => "DateTime",
        })
    }
}

/// A typed attribute value. Exactly one variant per [ValueKind].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Byte(u8),
    DateTime(DateTime),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Int32(_) => ValueKind::Int32,
            Self::UInt32(_) => ValueKind::UInt32,
            Self::Int64(_) => ValueKind::Int64,
            Self::UInt64(_) => ValueKind::UInt64,
            Self::Float32(_) => ValueKind::Float32,
            Self::Float64(_) => ValueKind::Float64,
            Self::Byte(_) => ValueKind::Byte,
            Self::DateTime(_) => ValueKind::DateTime,
        }
    }
}

macro_rules! declare_value {
    ($qualifier:ty, $variant:path, $kind:path) => {
        impl From<$qualifier> for Value {
            fn from(value: $qualifier) -> Self {
                $variant(value)
            }
        }

        impl<'a> TryFrom<&'a Value> for &'a $qualifier {
            type Error = AttributeError;

            fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
                match value {
                    $variant(inner) => Ok(inner),
                    other => Err(AttributeError::TypeMismatch {
                        expected: $kind,
                        found: other.kind(),
                    }),
                }
            }
        }
    };
}

declare_value!(String, Value::String, ValueKind::String);
declare_value!(i32, Value::Int32, ValueKind::Int32);
declare_value!(u32, Value::UInt32, ValueKind::UInt32);
declare_value!(i64, Value::Int64, ValueKind::Int64);
declare_value!(u64, Value::UInt64, ValueKind::UInt64);
declare_value!(f32, Value::Float32, ValueKind::Float32);
declare_value!(f64, Value::Float64, ValueKind::Float64);
declare_value!(u8, Value::Byte, ValueKind::Byte);
declare_value!(DateTime, Value::DateTime, ValueKind::DateTime);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// A named value attached to an [Element](crate::Element).
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    name: String,
    value: Value,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the name of the attribute.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the attribute.
    pub fn get_value(&self) -> &Value {
        &self.value
    }

    /// Returns the attribute value as the requested payload type.
    pub fn get<'a, V>(&'a self) -> Result<&'a V, AttributeError>
    where
        &'a V: TryFrom<&'a Value, Error = AttributeError>,
    {
        (&self.value).try_into()
    }
}
