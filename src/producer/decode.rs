//! Decoding of raw data payloads into [`DataValue`]s
//!
//! Payloads are the bytes the instrumented program passes along with a
//! notification, in target (little-endian, 32-bit) layout. Pointer payloads
//! carry the four address bytes followed by a snapshot of the memory around
//! the pointee.

use crate::constants::POINTER_WIDTH;
use crate::errors::ProducerError;
use crate::trace::ctype::{classify, TypeClass};
use crate::trace::step::DataValue;

/// Decode `payload` according to `data_type`
pub fn decode_value(data_type: &str, payload: &[u8]) -> Result<DataValue, ProducerError> {
    let value = match classify(data_type) {
        TypeClass::Integer { signed, width } => {
            let bytes = take(data_type, payload, width)?;
            DataValue::Int(read_integer(bytes, signed))
        }
        TypeClass::Char { signed } => {
            let bytes = take(data_type, payload, 1)?;
            DataValue::Int(read_integer(bytes, signed))
        }
        TypeClass::Bool => {
            let bytes = take(data_type, payload, 1)?;
            DataValue::Int(i64::from(bytes[0] != 0))
        }
        TypeClass::Float => {
            let bytes = take(data_type, payload, 4)?;
            let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
            DataValue::Float(f64::from(f32::from_le_bytes(raw)))
        }
        TypeClass::Double => {
            let bytes = take(data_type, payload, 8)?;
            let mut raw = [0u8; 8];
            raw.copy_from_slice(bytes);
            DataValue::Float(f64::from_le_bytes(raw))
        }
        TypeClass::Pointer => {
            let bytes = take(data_type, payload, POINTER_WIDTH)?;
            let address = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            DataValue::Pointer {
                address,
                bytes: payload[POINTER_WIDTH..].to_vec(),
            }
        }
        TypeClass::Other => return Err(ProducerError::UnsupportedDataType(data_type.to_string())),
    };
    Ok(value)
}

fn take<'a>(data_type: &str, payload: &'a [u8], needed: usize) -> Result<&'a [u8], ProducerError> {
    payload
        .get(..needed)
        .ok_or_else(|| ProducerError::PayloadTooShort {
            data_type: data_type.to_string(),
            needed,
            got: payload.len(),
        })
}

/// Sign- or zero-extend a little-endian integer of up to eight bytes
fn read_integer(bytes: &[u8], signed: bool) -> i64 {
    let mut raw = [0u8; 8];
    raw[..bytes.len()].copy_from_slice(bytes);
    let unsigned = u64::from_le_bytes(raw);

    let bits = bytes.len() * 8;
    if signed && bits < 64 && unsigned & (1 << (bits - 1)) != 0 {
        (unsigned | (u64::MAX << bits)) as i64
    } else {
        unsigned as i64
    }
}
