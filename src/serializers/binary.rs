use thiserror::Error as ThisError;

use crate::{DateTime, Document, Element, Serializer, Value, ValueKind};

const ELEMENT_START: u8 = 0x0A;
const ELEMENT_END: u8 = 0x0B;

/// Longest name, string value, or attribute list that fits the one-byte
/// length fields of the wire format.
const MAX_LENGTH: usize = u8::MAX as usize;

#[derive(Debug, ThisError)]
pub enum BinarySerializationError {
    #[error("Unexpected End Of File")]
    UnexpectedEof,
    #[error("Unrecognized Marker Byte: {0:#04X}")]
    UnrecognizedMarker(u8),
    #[error("Element End Without Matching Start")]
    UnbalancedEnd,
    #[error("Incomplete Elements Present")]
    UnterminatedElement,
    #[error("Invalid Data Type: {0:#04X}")]
    UnknownValueType(u8),
    #[error("Failed To Parse {kind} Value From: {text}")]
    ValueParseFailure { kind: ValueKind, text: String },
    #[error("{kind} Value Out Of Range: {text}")]
    ValueOutOfRange { kind: ValueKind, text: String },
    #[error("Invalid {kind} Payload Length: {length}")]
    InvalidValueLength { kind: ValueKind, length: u8 },
    #[error("Name Too Long With Size: {0}")]
    NameTooLong(usize),
    #[error("String Too Long With Size: {0}")]
    StringTooLong(usize),
    #[error("Too Many Attributes With Attribute Count Of: {0}")]
    TooManyAttributes(usize),
    #[error("Failed To Find File")]
    FileNotFound,
    #[error("File Permission Denied")]
    FilePermissionDenied,
    #[error("File Read Error")]
    FileReadError,
    #[error("File Write Error")]
    FileWriteError,
}

/// How attribute-value payloads are laid out on the wire.
///
/// The legacy format is asymmetric: files were decoded with [Text] values
/// and encoded with [Binary] values, which are not inverses of each other.
/// The defaults on [BinarySerializer] keep that pairing; pick one encoding
/// on both sides to get an exact round trip. [Binary] is the canonical
/// convention for new data.
///
/// [Text]: ValueEncoding::Text
/// [Binary]: ValueEncoding::Binary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueEncoding {
    /// Length-prefixed decimal or textual rendering of the value.
    Text,
    /// Length-prefixed fixed-width little-endian payload per type.
    Binary,
}

struct BinaryReader<'a> {
    data: &'a [u8],
    index: usize,
}

impl<'a> BinaryReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, index: 0 }
    }

    fn is_empty(&self) -> bool {
        self.index >= self.data.len()
    }

    fn read_byte(&mut self) -> Result<u8, BinarySerializationError> {
        let byte = self.data.get(self.index).ok_or(BinarySerializationError::UnexpectedEof)?;
        self.index += 1;
        Ok(*byte)
    }

    fn read_bytes(&mut self, num_bytes: usize) -> Result<&'a [u8], BinarySerializationError> {
        let bytes = self
            .data
            .get(self.index..self.index + num_bytes)
            .ok_or(BinarySerializationError::UnexpectedEof)?;
        self.index += num_bytes;
        Ok(bytes)
    }

    /// Reads a length-prefixed string: one length byte followed by that
    /// many raw bytes. Invalid UTF-8 is replaced, not rejected.
    fn read_string(&mut self) -> Result<String, BinarySerializationError> {
        let length = self.read_byte()? as usize;
        let bytes = self.read_bytes(length)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    fn write_byte(&mut self, value: u8) {
        self.buffer.push(value);
    }

    fn write_bytes(&mut self, value: &[u8]) {
        self.buffer.extend_from_slice(value);
    }

    fn write_name(&mut self, name: &str) -> Result<(), BinarySerializationError> {
        if name.len() > MAX_LENGTH {
            return Err(BinarySerializationError::NameTooLong(name.len()));
        }
        self.write_byte(name.len() as u8);
        self.write_bytes(name.as_bytes());
        Ok(())
    }
}

fn parse_date_time(text: &str) -> Result<DateTime, BinarySerializationError> {
    // Fixed-position slices of the RFC-3339-like form YYYY-MM-DDTHH:MM:SS.
    // Separators and anything past the seconds field are not inspected.
    fn field(text: &str, start: usize, length: usize) -> Option<u16> {
        text.get(start..start + length)?.parse().ok()
    }

    let parse_failure = || BinarySerializationError::ValueParseFailure {
        kind: ValueKind::DateTime,
        text: text.to_string(),
    };

    Ok(DateTime {
        year: field(text, 0, 4).ok_or_else(parse_failure)?,
        month: field(text, 5, 2).ok_or_else(parse_failure)? as u8,
        day: field(text, 8, 2).ok_or_else(parse_failure)? as u8,
        hour: field(text, 11, 2).ok_or_else(parse_failure)? as u8,
        minute: field(text, 14, 2).ok_or_else(parse_failure)? as u8,
        second: field(text, 17, 2).ok_or_else(parse_failure)? as u8,
    })
}

fn parse_text_value(kind: ValueKind, text: &str) -> Result<Value, BinarySerializationError> {
    let parse_failure = || BinarySerializationError::ValueParseFailure {
        kind,
        text: text.to_string(),
    };

    match kind {
        ValueKind::String => Ok(Value::String(text.to_string())),
        ValueKind::Int32 => text.parse().map(Value::Int32).map_err(|_| parse_failure()),
        ValueKind::UInt32 => text.parse().map(Value::UInt32).map_err(|_| parse_failure()),
        ValueKind::Int64 => text.parse().map(Value::Int64).map_err(|_| parse_failure()),
        ValueKind::UInt64 => text.parse().map(Value::UInt64).map_err(|_| parse_failure()),
        ValueKind::Float32 => text.parse().map(Value::Float32).map_err(|_| parse_failure()),
        ValueKind::Float64 => text.parse().map(Value::Float64).map_err(|_| parse_failure()),
        ValueKind::Byte => {
            let value = text.parse::<i64>().map_err(|_| parse_failure())?;
            u8::try_from(value)
                .map(Value::Byte)
                .map_err(|_| BinarySerializationError::ValueOutOfRange {
                    kind,
                    text: text.to_string(),
                })
        }
        ValueKind::DateTime => parse_date_time(text).map(Value::DateTime),
    }
}

fn read_binary_value(reader: &mut BinaryReader, kind: ValueKind) -> Result<Value, BinarySerializationError> {
    let length = reader.read_byte()?;
    let payload = reader.read_bytes(length as usize)?;

    let invalid_length = || BinarySerializationError::InvalidValueLength { kind, length };

    match kind {
        ValueKind::String => Ok(Value::String(String::from_utf8_lossy(payload).into_owned())),
        ValueKind::Int32 => payload
            .try_into()
            .map(|bytes| Value::Int32(i32::from_le_bytes(bytes)))
            .map_err(|_| invalid_length()),
        ValueKind::UInt32 => payload
            .try_into()
            .map(|bytes| Value::UInt32(u32::from_le_bytes(bytes)))
            .map_err(|_| invalid_length()),
        ValueKind::Int64 => payload
            .try_into()
            .map(|bytes| Value::Int64(i64::from_le_bytes(bytes)))
            .map_err(|_| invalid_length()),
        ValueKind::UInt64 => payload
            .try_into()
            .map(|bytes| Value::UInt64(u64::from_le_bytes(bytes)))
            .map_err(|_| invalid_length()),
        ValueKind::Float32 => payload
            .try_into()
            .map(|bytes| Value::Float32(f32::from_le_bytes(bytes)))
            .map_err(|_| invalid_length()),
        ValueKind::Float64 => payload
            .try_into()
            .map(|bytes| Value::Float64(f64::from_le_bytes(bytes)))
            .map_err(|_| invalid_length()),
        ValueKind::Byte => match payload {
            [byte] => Ok(Value::Byte(*byte)),
            _ => Err(invalid_length()),
        },
        ValueKind::DateTime => match payload {
            [year_low, year_high, month, day, hour, minute, second] => Ok(Value::DateTime(DateTime {
                year: u16::from_le_bytes([*year_low, *year_high]),
                month: *month,
                day: *day,
                hour: *hour,
                minute: *minute,
                second: *second,
            })),
            _ => Err(invalid_length()),
        },
    }
}

fn write_text_value(writer: &mut BinaryWriter, value: &Value) -> Result<(), BinarySerializationError> {
    let text = match value {
        Value::String(value) => value.clone(),
        Value::Int32(value) => value.to_string(),
        Value::UInt32(value) => value.to_string(),
        Value::Int64(value) => value.to_string(),
        Value::UInt64(value) => value.to_string(),
        Value::Float32(value) => value.to_string(),
        Value::Float64(value) => value.to_string(),
        Value::Byte(value) => value.to_string(),
        Value::DateTime(value) => value.to_string(),
    };

    if text.len() > MAX_LENGTH {
        return Err(BinarySerializationError::StringTooLong(text.len()));
    }

    writer.write_byte(text.len() as u8);
    writer.write_bytes(text.as_bytes());
    Ok(())
}

fn write_binary_value(writer: &mut BinaryWriter, value: &Value) -> Result<(), BinarySerializationError> {
    match value {
        Value::String(value) => {
            if value.len() > MAX_LENGTH {
                return Err(BinarySerializationError::StringTooLong(value.len()));
            }
            writer.write_byte(value.len() as u8);
            writer.write_bytes(value.as_bytes());
        }
        Value::Int32(value) => {
            writer.write_byte(4);
            writer.write_bytes(&value.to_le_bytes());
        }
        Value::UInt32(value) => {
            writer.write_byte(4);
            writer.write_bytes(&value.to_le_bytes());
        }
        Value::Int64(value) => {
            writer.write_byte(8);
            writer.write_bytes(&value.to_le_bytes());
        }
        Value::UInt64(value) => {
            writer.write_byte(8);
            writer.write_bytes(&value.to_le_bytes());
        }
        Value::Float32(value) => {
            writer.write_byte(4);
            writer.write_bytes(&value.to_le_bytes());
        }
        Value::Float64(value) => {
            writer.write_byte(8);
            writer.write_bytes(&value.to_le_bytes());
        }
        Value::Byte(value) => {
            writer.write_byte(1);
            writer.write_byte(*value);
        }
        Value::DateTime(value) => {
            writer.write_byte(7);
            writer.write_bytes(&value.year.to_le_bytes());
            writer.write_bytes(&[value.month, value.day, value.hour, value.minute, value.second]);
        }
    }
    Ok(())
}

fn serialize_element(writer: &mut BinaryWriter, element: &Element, encoding: ValueEncoding) -> Result<(), BinarySerializationError> {
    writer.write_byte(ELEMENT_START);
    writer.write_name(element.get_name())?;

    let attributes = element.get_attributes();
    if attributes.len() > MAX_LENGTH {
        return Err(BinarySerializationError::TooManyAttributes(attributes.len()));
    }
    writer.write_byte(attributes.len() as u8);

    for attribute in attributes {
        writer.write_name(attribute.get_name())?;
        writer.write_byte(attribute.get_value().kind().tag());

        match encoding {
            ValueEncoding::Text => write_text_value(writer, attribute.get_value())?,
            ValueEncoding::Binary => write_binary_value(writer, attribute.get_value())?,
        }
    }

    for child in element.get_children() {
        serialize_element(writer, child, encoding)?;
    }

    writer.write_byte(ELEMENT_END);
    Ok(())
}

pub struct BinarySerializer;

impl BinarySerializer {
    /// Decodes a byte buffer into a [Document] with the given value
    /// encoding.
    ///
    /// A single forward pass over the buffer with an explicit stack of the
    /// currently open elements, so nesting depth is not bounded by the call
    /// stack. Any malformed byte aborts the whole decode; no partial tree
    /// is returned.
    pub fn deserialize_with(data: &[u8], encoding: ValueEncoding) -> Result<Document, BinarySerializationError> {
        let mut reader = BinaryReader::new(data);
        let mut document = Document::new();
        let mut stack: Vec<Element> = Vec::new();

        while !reader.is_empty() {
            let marker = reader.read_byte()?;

            match marker {
                ELEMENT_START => {
                    let name = reader.read_string()?;
                    let attribute_count = reader.read_byte()?;

                    let mut element = Element::named(name);

                    for _ in 0..attribute_count {
                        let attribute_name = reader.read_string()?;

                        let tag = reader.read_byte()?;
                        let kind = ValueKind::from_tag(tag).ok_or(BinarySerializationError::UnknownValueType(tag))?;

                        let value = match encoding {
                            ValueEncoding::Text => {
                                let text = reader.read_string()?;
                                parse_text_value(kind, &text)?
                            }
                            ValueEncoding::Binary => read_binary_value(&mut reader, kind)?,
                        };

                        element.add_attribute(attribute_name, value);
                    }

                    stack.push(element);
                }
                ELEMENT_END => {
                    let element = stack.pop().ok_or(BinarySerializationError::UnbalancedEnd)?;

                    match stack.last_mut() {
                        Some(parent) => {
                            parent.add_child(element);
                        }
                        None => {
                            document.add_element(element);
                        }
                    }
                }
                _ => return Err(BinarySerializationError::UnrecognizedMarker(marker)),
            }
        }

        if !stack.is_empty() {
            return Err(BinarySerializationError::UnterminatedElement);
        }

        Ok(document)
    }

    /// Encodes a [Document] into bytes with the given value encoding.
    ///
    /// Recursive pre-order traversal: each element is written as a start
    /// marker, its name, its attributes, its children depth-first, and an
    /// end marker. Root elements are concatenated in order.
    pub fn serialize_with(document: &Document, encoding: ValueEncoding) -> Result<Vec<u8>, BinarySerializationError> {
        let mut writer = BinaryWriter::new();

        for element in document.get_elements() {
            serialize_element(&mut writer, element, encoding)?;
        }

        Ok(writer.into_inner())
    }
}

impl Serializer for BinarySerializer {
    type Error = BinarySerializationError;

    /// Encodes with [ValueEncoding::Binary], the legacy writer convention.
    fn serialize(document: &Document) -> Result<Vec<u8>, Self::Error> {
        Self::serialize_with(document, ValueEncoding::Binary)
    }

    /// Decodes with [ValueEncoding::Text], the legacy reader convention.
    fn deserialize(data: &[u8]) -> Result<Document, Self::Error> {
        Self::deserialize_with(data, ValueEncoding::Text)
    }
}
