use bech32::{u5, ToBase32, Variant};

use super::error::AddressError;

/// Filler for every position of the payload that carries no information.
pub const BURN_PATTERN: [u8; 5] = [0x7b, 0xde, 0xf7, 0xbd, 0xef];
pub const BURN_PREFIX_LEN: usize = 5;
pub const PAYLOAD_LEN: usize = 32;
/// Bytes before this offset are the burn prefix and three pattern repeats.
const DATA_REGION_START: usize = 20;
pub const MAX_DATA_LEN: usize = PAYLOAD_LEN - DATA_REGION_START;
const WITNESS_VERSION: u8 = 0;

/// Builds the 32 byte burn payload: prefix, pattern filler, then `data`
/// right-aligned at the end.
pub fn burn_payload(
    burn_prefix: &[u8; BURN_PREFIX_LEN],
    data: &[u8],
) -> Result<[u8; PAYLOAD_LEN], AddressError> {
    if data.len() > MAX_DATA_LEN {
        return Err(AddressError::DataTooLong {
            len: data.len(),
            max: MAX_DATA_LEN,
        });
    }

    let mut payload = [0u8; PAYLOAD_LEN];
    payload[..BURN_PREFIX_LEN].copy_from_slice(burn_prefix);

    // The filler restarts at pattern index 0 both at byte 5 and at byte 20,
    // which a single cycle from byte 5 satisfies since 15 is a multiple of 5.
    let data_start = PAYLOAD_LEN - data.len();
    for (i, byte) in payload[BURN_PREFIX_LEN..data_start].iter_mut().enumerate() {
        *byte = BURN_PATTERN[i % BURN_PATTERN.len()];
    }

    payload[data_start..].copy_from_slice(data);
    Ok(payload)
}

/// Encodes application data into provably unspendable witness v0 addresses.
#[derive(Debug, Clone)]
pub struct BurnAddrEncoder {
    hrp: String,
    burn_prefix: [u8; BURN_PREFIX_LEN],
}

impl BurnAddrEncoder {
    pub fn new(hrp: &str, burn_prefix: &[u8]) -> Result<Self, AddressError> {
        let burn_prefix = <[u8; BURN_PREFIX_LEN]>::try_from(burn_prefix).map_err(|_| {
            AddressError::InvalidBurnPrefix {
                len: burn_prefix.len(),
            }
        })?;

        let encoder = Self {
            hrp: hrp.to_owned(),
            burn_prefix,
        };
        // Surface a bad human-readable prefix now rather than on first use
        encoder.with_data(&[])?;
        Ok(encoder)
    }

    pub fn with_data(&self, data: &[u8]) -> Result<String, AddressError> {
        let payload = burn_payload(&self.burn_prefix, data)?;

        let mut words = Vec::with_capacity(1 + (PAYLOAD_LEN * 8 + 4) / 5);
        words.push(u5::try_from_u8(WITNESS_VERSION)?);
        words.extend(payload.to_base32());

        Ok(bech32::encode(&self.hrp, words, Variant::Bech32)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: [u8; 5] = [0xc7, 0x66, 0xce, 0xc1, 0xef];

    #[test]
    fn payload_layout() {
        let payload = burn_payload(&PREFIX, &[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(&payload[..5], &PREFIX);
        for repeat in 0..3 {
            let start = 5 + repeat * 5;
            assert_eq!(&payload[start..start + 5], &BURN_PATTERN);
        }
        // Seven bytes of padding restart the pattern
        assert_eq!(&payload[20..27], &[0x7b, 0xde, 0xf7, 0xbd, 0xef, 0x7b, 0xde]);
        assert_eq!(&payload[27..], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn full_data_region() {
        let data = [0xaa; MAX_DATA_LEN];
        let payload = burn_payload(&PREFIX, &data).unwrap();
        assert_eq!(&payload[20..], &data);
        assert!(matches!(
            burn_payload(&PREFIX, &[0; MAX_DATA_LEN + 1]),
            Err(AddressError::DataTooLong { len: 13, max: 12 })
        ));
    }

    #[test]
    fn prefix_must_be_five_bytes() {
        assert!(matches!(
            BurnAddrEncoder::new("tpc", &[1, 2, 3, 4]),
            Err(AddressError::InvalidBurnPrefix { len: 4 })
        ));
        assert!(matches!(
            BurnAddrEncoder::new("tpc", &[1, 2, 3, 4, 5, 6]),
            Err(AddressError::InvalidBurnPrefix { len: 6 })
        ));
    }

    #[test]
    fn rejects_invalid_hrp() {
        assert!(matches!(
            BurnAddrEncoder::new("", &PREFIX),
            Err(AddressError::Bech32(_))
        ));
    }
}
