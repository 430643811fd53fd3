use winnow::binary::{le_u32, le_u64};
use winnow::error::ContextError;
use winnow::token::{any, take};
use winnow::Parser;

use crate::prelude::DecodeError;

const AZIMUTH_FIELD: u64 = 1;
const RANGE_FIELD: u64 = 2;
const DATA_FIELD: u64 = 3;

const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_LENGTH_DELIMITED: u8 = 2;
const WIRE_FIXED32: u8 = 5;

/// Undecoded radar spoke record as produced by the sensor.
///
/// The record uses the middleware's protobuf-style field encoding:
/// - field 1, varint: azimuth in 1/4096 of a turn
/// - field 2, fixed32: maximum reported range (f32, meters)
/// - field 3, length-delimited: one intensity byte per range bin
///
/// Absent fields keep their zero value and unknown fields are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSpoke {
    pub azimuth: u16,
    pub range: f32,
    pub data: Vec<u8>,
}

enum WireValue<'a> {
    Varint(u64),
    Fixed32(u32),
    Bytes(&'a [u8]),
    Skipped,
    Unsupported(u8),
}

type WireResult<T> = Result<T, ContextError>;

fn byte(input: &mut &[u8]) -> WireResult<u8> {
    any.parse_next(input)
}

fn fixed32(input: &mut &[u8]) -> WireResult<u32> {
    le_u32.parse_next(input)
}

fn fixed64(input: &mut &[u8]) -> WireResult<u64> {
    le_u64.parse_next(input)
}

fn bytes<'a>(input: &mut &'a [u8], len: usize) -> WireResult<&'a [u8]> {
    take(len).parse_next(input)
}

fn varint(input: &mut &[u8]) -> WireResult<u64> {
    let mut value = 0u64;
    for shift in (0..64).step_by(7) {
        let next = byte(input)?;
        value |= u64::from(next & 0x7f) << shift;
        if next & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(ContextError::new())
}

fn field<'a>(input: &mut &'a [u8]) -> WireResult<(u64, WireValue<'a>)> {
    let key = varint(input)?;
    let value = match (key & 0x7) as u8 {
        WIRE_VARINT => WireValue::Varint(varint(input)?),
        WIRE_FIXED64 => {
            fixed64(input)?;
            WireValue::Skipped
        }
        WIRE_LENGTH_DELIMITED => {
            let len = usize::try_from(varint(input)?).map_err(|_| ContextError::new())?;
            WireValue::Bytes(bytes(input, len)?)
        }
        WIRE_FIXED32 => WireValue::Fixed32(fixed32(input)?),
        other => WireValue::Unsupported(other),
    };
    Ok((key >> 3, value))
}

fn put_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn put_key(out: &mut Vec<u8>, field: u64, wire_type: u8) {
    put_varint(out, (field << 3) | u64::from(wire_type));
}

impl RawSpoke {
    pub fn new(azimuth: u16, range: f32, data: Vec<u8>) -> Self {
        Self {
            azimuth,
            range,
            data,
        }
    }

    /// Parses an encoded spoke record.
    pub fn parse(payload: &[u8]) -> Result<Self, DecodeError> {
        let mut input = payload;
        let mut spoke = RawSpoke::default();

        while !input.is_empty() {
            let offset = payload.len() - input.len();
            let (number, value) =
                field(&mut input).map_err(|_| DecodeError::Malformed { offset })?;

            match (number, value) {
                (_, WireValue::Unsupported(wire_type)) => {
                    return Err(DecodeError::UnsupportedWireType {
                        field: number,
                        wire_type,
                    })
                }
                (AZIMUTH_FIELD, WireValue::Varint(raw)) => {
                    spoke.azimuth =
                        u16::try_from(raw).map_err(|_| DecodeError::AzimuthOverflow(raw))?;
                }
                (RANGE_FIELD, WireValue::Fixed32(bits)) => spoke.range = f32::from_bits(bits),
                (DATA_FIELD, WireValue::Bytes(data)) => spoke.data = data.to_vec(),
                (AZIMUTH_FIELD | RANGE_FIELD | DATA_FIELD, _) => {
                    return Err(DecodeError::Malformed { offset })
                }
                _ => {}
            }
        }

        if !spoke.range.is_finite() || spoke.range < 0.0 {
            return Err(DecodeError::InvalidRange(spoke.range));
        }

        Ok(spoke)
    }

    /// Encodes the record in the same field layout [`RawSpoke::parse`] reads.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 16);
        put_key(&mut out, AZIMUTH_FIELD, WIRE_VARINT);
        put_varint(&mut out, u64::from(self.azimuth));
        put_key(&mut out, RANGE_FIELD, WIRE_FIXED32);
        out.extend_from_slice(&self.range.to_le_bytes());
        put_key(&mut out, DATA_FIELD, WIRE_LENGTH_DELIMITED);
        put_varint(&mut out, self.data.len() as u64);
        out.extend_from_slice(&self.data);
        out
    }
}
