use std::{
    fs::{read, write},
    io::ErrorKind,
    path::Path,
};

mod binary;

pub use self::binary::BinarySerializationError;
pub use self::binary::BinarySerializer;
pub use self::binary::ValueEncoding;
use crate::Document;

pub trait Serializer {
    type Error;

    fn serialize(document: &Document) -> Result<Vec<u8>, Self::Error>;
    fn deserialize(data: &[u8]) -> Result<Document, Self::Error>;
}

/// Reads the file at the given path and decodes it into a [Document].
pub fn deserialize<P: AsRef<Path>>(path: P) -> Result<Document, BinarySerializationError> {
    let data = match read(path) {
        Ok(data) => data,
        Err(error) => match error.kind() {
            ErrorKind::NotFound => return Err(BinarySerializationError::FileNotFound),
            ErrorKind::PermissionDenied => return Err(BinarySerializationError::FilePermissionDenied),
            _ => return Err(BinarySerializationError::FileReadError),
        },
    };

    BinarySerializer::deserialize(&data)
}

/// Encodes the [Document] and writes the bytes to the file at the given
/// path.
pub fn serialize<P: AsRef<Path>>(path: P, document: &Document) -> Result<(), BinarySerializationError> {
    let data = BinarySerializer::serialize(document)?;

    write(path, data).map_err(|error| match error.kind() {
        ErrorKind::PermissionDenied => BinarySerializationError::FilePermissionDenied,
        _ => BinarySerializationError::FileWriteError,
    })
}
