//! Public room identifiers: a Sqids encoding of the internal row id, at
//! least eight characters from the default alphanumeric alphabet.

use std::sync::Arc;

use sqids::Sqids;

use crate::error::Error;

pub const MIN_LENGTH: usize = 8;

#[derive(Clone)]
pub struct RoomIdCodec {
    sqids: Arc<Sqids>,
}

impl RoomIdCodec {
    pub fn new() -> Result<Self, sqids::Error> {
        let sqids = Sqids::builder().min_length(MIN_LENGTH as u8).build()?;
        Ok(Self {
            sqids: Arc::new(sqids),
        })
    }

    pub fn encode(&self, id: u64) -> Result<String, Error> {
        self.sqids
            .encode(&[id])
            .map_err(|err| Error::IdAllocation(err.to_string()))
    }

    /// Shape check on an externally supplied code, applied before any store
    /// lookup: at least eight characters, all printable ASCII.
    pub fn is_valid(&self, code: &str) -> bool {
        code.len() >= MIN_LENGTH && code.bytes().all(|b| b.is_ascii_graphic())
    }

    /// Decode back to the internal id. Rejects codes that fail the shape
    /// check, decode to anything but a single number, or are not the
    /// canonical encoding of that number.
    pub fn decode(&self, code: &str) -> Option<u64> {
        if !self.is_valid(code) {
            return None;
        }
        let numbers = self.sqids.decode(code);
        if numbers.len() != 1 {
            return None;
        }
        let id = numbers[0];
        (self.sqids.encode(&[id]).ok()? == code).then_some(id)
    }
}
