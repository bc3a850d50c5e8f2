//! On-disk layout of events.
//!
//! Key: `[timestamp micros, sign bit flipped; u64 BE][sequence; u64 BE]`
//!
//! Flipping the sign bit makes the big-endian bytes sort like the signed
//! timestamp, so pre-1970 events stay in order. The sequence number keeps
//! events with equal timestamps apart.
//!
//! Value: `[amount; f64 BE][sales rep; UTF-8]`

use crate::Event;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Timelike, Utc};

pub const KEY_LEN: usize = 16;

const SIGN_BIT: u64 = 1 << 63;

#[allow(clippy::cast_sign_loss)]
fn encode_micros(micros: i64) -> u64 {
    (micros as u64) ^ SIGN_BIT
}

#[allow(clippy::cast_possible_wrap)]
fn decode_ts(raw: u64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros((raw ^ SIGN_BIT) as i64)
}

/// Smallest key whose timestamp is at or after `ts`.
///
/// Stored timestamps are whole microseconds, so a bound with sub-microsecond
/// digits is rounded up to the next microsecond.
pub fn lower_bound(ts: DateTime<Utc>) -> [u8; KEY_LEN] {
    let micros = ts
        .timestamp_micros()
        .saturating_add(i64::from(ts.nanosecond() % 1_000 != 0));

    key_from_micros(micros, 0)
}

pub fn encode_key(ts: DateTime<Utc>, seqno: u64) -> [u8; KEY_LEN] {
    key_from_micros(ts.timestamp_micros(), seqno)
}

fn key_from_micros(micros: i64, seqno: u64) -> [u8; KEY_LEN] {
    let mut key = [0; KEY_LEN];
    key[..8].copy_from_slice(&encode_micros(micros).to_be_bytes());
    key[8..].copy_from_slice(&seqno.to_be_bytes());
    key
}

/// Returns the sequence number of a stored key.
pub fn decode_seqno(key: &[u8]) -> crate::Result<u64> {
    let mut reader = key
        .get(8..KEY_LEN)
        .ok_or(crate::Error::Decode("key too short"))?;

    Ok(reader.read_u64::<BigEndian>()?)
}

pub fn encode_value(event: &Event) -> crate::Result<Vec<u8>> {
    let mut value = Vec::with_capacity(8 + event.sales_rep().len());
    value.write_f64::<BigEndian>(event.amount())?;
    value.extend_from_slice(event.sales_rep().as_bytes());
    Ok(value)
}

pub fn decode(key: &[u8], value: &[u8]) -> crate::Result<Event> {
    if key.len() != KEY_LEN {
        return Err(crate::Error::Decode("invalid key length"));
    }

    let mut reader = key;
    let timestamp = decode_ts(reader.read_u64::<BigEndian>()?)
        .ok_or(crate::Error::Decode("timestamp out of range"))?;

    let mut reader = value;
    let amount = reader.read_f64::<BigEndian>()?;

    let sales_rep =
        std::str::from_utf8(reader).map_err(|_| crate::Error::Decode("sales rep is not UTF-8"))?;

    Event::new(timestamp, sales_rep, amount)
        .map_err(|_| crate::Error::Decode("stored event is invalid"))
}
