use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::constants::attr_types;
use crate::error::{Result, RgisfError};
use crate::types::{AttributeField, AttributeRecord, AttributeValue};

/// Read an attribute block: field count, then name/type/value triples
pub fn read_attributes<R: Read>(reader: &mut R) -> Result<AttributeRecord> {
    let err = || RgisfError::truncated("attribute block");
    let count = reader.read_u16::<BigEndian>().map_err(err())?;
    let mut record = AttributeRecord::new();

    for _ in 0..count {
        let name_len = reader.read_u16::<BigEndian>().map_err(err())? as usize;
        let mut name = vec![0u8; name_len];
        reader.read_exact(&mut name).map_err(err())?;
        let name = String::from_utf8(name).map_err(|e| {
            RgisfError::MalformedContainer(format!("attribute name is not UTF-8: {}", e))
        })?;

        let value_type = reader.read_u16::<BigEndian>().map_err(err())?;
        let value_len = reader.read_u16::<BigEndian>().map_err(err())? as usize;
        let mut raw = vec![0u8; value_len];
        reader.read_exact(&mut raw).map_err(err())?;

        let value = match value_type {
            attr_types::VARCHAR => AttributeValue::Varchar(String::from_utf8(raw).map_err(|e| {
                RgisfError::MalformedContainer(format!("attribute '{}' is not UTF-8: {}", name, e))
            })?),
            attr_types::BOOL => AttributeValue::Bool(fixed::<1>(&name, &raw)?[0] != 0),
            attr_types::FLOAT32 => AttributeValue::Float32(f32::from_be_bytes(fixed::<4>(&name, &raw)?)),
            attr_types::INT32 => AttributeValue::Int32(i32::from_be_bytes(fixed::<4>(&name, &raw)?)),
            other => return Err(RgisfError::UnsupportedAttributeType(other)),
        };
        record.0.push(AttributeField { name, value });
    }

    Ok(record)
}

pub fn write_attributes<W: Write>(writer: &mut W, record: &AttributeRecord) -> Result<()> {
    writer.write_u16::<BigEndian>(wire_len("attribute count", record.len())?)?;
    for field in record.fields() {
        writer.write_u16::<BigEndian>(wire_len("attribute name", field.name.len())?)?;
        writer.write_all(field.name.as_bytes())?;
        writer.write_u16::<BigEndian>(field.value.type_tag())?;

        let raw = match &field.value {
            AttributeValue::Varchar(s) => s.as_bytes().to_vec(),
            AttributeValue::Bool(b) => vec![u8::from(*b)],
            AttributeValue::Float32(f) => f.to_be_bytes().to_vec(),
            AttributeValue::Int32(i) => i.to_be_bytes().to_vec(),
        };
        writer.write_u16::<BigEndian>(wire_len("attribute value", raw.len())?)?;
        writer.write_all(&raw)?;
    }
    Ok(())
}

fn fixed<const N: usize>(name: &str, raw: &[u8]) -> Result<[u8; N]> {
    raw.try_into().map_err(|_| {
        RgisfError::MalformedContainer(format!(
            "attribute '{}' has {} value bytes, expected {}",
            name,
            raw.len(),
            N
        ))
    })
}

fn wire_len(what: &str, len: usize) -> Result<u16> {
    u16::try_from(len)
        .map_err(|_| RgisfError::MalformedContainer(format!("{} length {} exceeds 65535", what, len)))
}
