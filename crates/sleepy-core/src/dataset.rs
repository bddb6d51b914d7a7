//! The operational dataset: the TLV-encoded credentials of one Thread
//! network (keys, channel, PAN identifiers).

use core::fmt;

use crate::constants::{
    NETWORK_NAME_MAX_LENGTH, OPERATIONAL_DATASET_MAX_LENGTH, TLV_CHANNEL, TLV_NETWORK_NAME,
    TLV_PAN_ID,
};
use crate::error::{DatasetError, DecodeError};
use crate::hex;

/// A validated, decoded operational dataset.
///
/// Holds between 1 and [`OPERATIONAL_DATASET_MAX_LENGTH`] bytes. The bytes
/// are credentials, so `Debug` only shows the length.
#[derive(Clone, PartialEq, Eq)]
pub struct OperationalDataset {
    tlvs: [u8; OPERATIONAL_DATASET_MAX_LENGTH],
    len: usize,
}

impl OperationalDataset {
    /// Decode and validate a dataset from its hex representation.
    ///
    /// The length is checked against the maximum before any byte is
    /// decoded, so oversized input never reaches the buffer.
    pub fn from_hex(hex_str: &str) -> Result<Self, DatasetError> {
        if hex_str.len() % 2 != 0 {
            return Err(DecodeError::OddLength { len: hex_str.len() }.into());
        }
        let len = hex_str.len() / 2;
        if len > OPERATIONAL_DATASET_MAX_LENGTH {
            return Err(DatasetError::TooLong {
                len,
                max: OPERATIONAL_DATASET_MAX_LENGTH,
            });
        }

        let mut tlvs = [0u8; OPERATIONAL_DATASET_MAX_LENGTH];
        let len = hex::decode_into(hex_str, &mut tlvs)?;
        if len == 0 {
            return Err(DatasetError::EmptyDataset);
        }
        Ok(Self { tlvs, len })
    }

    /// Validate an already decoded TLV blob.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DatasetError> {
        if bytes.len() > OPERATIONAL_DATASET_MAX_LENGTH {
            return Err(DatasetError::TooLong {
                len: bytes.len(),
                max: OPERATIONAL_DATASET_MAX_LENGTH,
            });
        }
        if bytes.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        let mut tlvs = [0u8; OPERATIONAL_DATASET_MAX_LENGTH];
        tlvs[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            tlvs,
            len: bytes.len(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.tlvs[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false for a constructed dataset; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Best-effort view of the non-secret TLVs, for logging.
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary::parse(self.as_bytes())
    }
}

impl fmt::Debug for OperationalDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationalDataset")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Non-secret fields extracted from a dataset.
///
/// Parsing stops at the first truncated TLV; fields seen before it are kept.
/// The stack does its own validation, this is only for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub channel: Option<u16>,
    pub pan_id: Option<u16>,
    network_name: [u8; NETWORK_NAME_MAX_LENGTH],
    network_name_len: usize,
    pub tlv_count: usize,
    pub truncated: bool,
}

impl DatasetSummary {
    fn parse(mut bytes: &[u8]) -> Self {
        let mut summary = Self::default();
        while !bytes.is_empty() {
            if bytes.len() < 2 || bytes.len() < 2 + bytes[1] as usize {
                summary.truncated = true;
                break;
            }
            let tlv_type = bytes[0];
            let value = &bytes[2..2 + bytes[1] as usize];
            match tlv_type {
                // Channel TLV: page (1 byte) followed by channel (2 bytes).
                TLV_CHANNEL if value.len() == 3 => {
                    summary.channel = Some(u16::from_be_bytes([value[1], value[2]]));
                }
                TLV_PAN_ID if value.len() == 2 => {
                    summary.pan_id = Some(u16::from_be_bytes([value[0], value[1]]));
                }
                TLV_NETWORK_NAME if value.len() <= NETWORK_NAME_MAX_LENGTH => {
                    summary.network_name[..value.len()].copy_from_slice(value);
                    summary.network_name_len = value.len();
                }
                _ => {}
            }
            summary.tlv_count += 1;
            bytes = &bytes[2 + value.len()..];
        }
        summary
    }

    /// The network name, if present and valid UTF-8.
    pub fn network_name(&self) -> Option<&str> {
        if self.network_name_len == 0 {
            return None;
        }
        core::str::from_utf8(&self.network_name[..self.network_name_len]).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_NETWORK_DATASET;
    use alloc::format;

    #[test]
    fn default_dataset_decodes() {
        assert_eq!(DEFAULT_NETWORK_DATASET.len(), 212);
        let ds = OperationalDataset::from_hex(DEFAULT_NETWORK_DATASET).unwrap();
        assert_eq!(ds.len(), 106);
        assert!(ds.len() <= OPERATIONAL_DATASET_MAX_LENGTH);
        assert_eq!(&ds.as_bytes()[..2], &[0x0e, 0x08]);
    }

    #[test]
    fn sample_168_char_dataset_is_84_bytes() {
        let ds = OperationalDataset::from_hex(&DEFAULT_NETWORK_DATASET[..168]).unwrap();
        assert_eq!(ds.len(), 84);
    }

    #[test]
    fn empty_string_is_empty_dataset() {
        assert_eq!(
            OperationalDataset::from_hex(""),
            Err(DatasetError::EmptyDataset)
        );
    }

    #[test]
    fn odd_length_is_decode_error() {
        assert_eq!(
            OperationalDataset::from_hex("0A1"),
            Err(DatasetError::Decode(DecodeError::OddLength { len: 3 }))
        );
    }

    #[test]
    fn invalid_digit_is_decode_error() {
        assert_eq!(
            OperationalDataset::from_hex("0AG1"),
            Err(DatasetError::Decode(DecodeError::InvalidHexDigit {
                pair: 1,
                byte: b'G'
            }))
        );
    }

    #[test]
    fn exactly_max_length_is_accepted() {
        let hex = "00".repeat(OPERATIONAL_DATASET_MAX_LENGTH);
        let ds = OperationalDataset::from_hex(&hex).unwrap();
        assert_eq!(ds.len(), OPERATIONAL_DATASET_MAX_LENGTH);
    }

    #[test]
    fn one_over_max_is_too_long() {
        let hex = "00".repeat(OPERATIONAL_DATASET_MAX_LENGTH + 1);
        assert_eq!(
            OperationalDataset::from_hex(&hex),
            Err(DatasetError::TooLong {
                len: OPERATIONAL_DATASET_MAX_LENGTH + 1,
                max: OPERATIONAL_DATASET_MAX_LENGTH
            })
        );
    }

    #[test]
    fn too_long_is_reported_before_bad_digits() {
        let hex = "zz".repeat(OPERATIONAL_DATASET_MAX_LENGTH + 1);
        assert!(matches!(
            OperationalDataset::from_hex(&hex),
            Err(DatasetError::TooLong { .. })
        ));
    }

    #[test]
    fn from_bytes_validates_length() {
        assert_eq!(
            OperationalDataset::from_bytes(&[]),
            Err(DatasetError::EmptyDataset)
        );
        assert!(OperationalDataset::from_bytes(&[0u8; 255]).is_err());
        assert_eq!(OperationalDataset::from_bytes(&[1, 2]).unwrap().as_bytes(), &[1, 2]);
    }

    #[test]
    fn debug_hides_credentials() {
        let ds = OperationalDataset::from_hex("deadbeef").unwrap();
        assert_eq!(format!("{ds:?}"), "OperationalDataset { len: 4, .. }");
    }

    #[test]
    fn summary_of_default_dataset() {
        let ds = OperationalDataset::from_hex(DEFAULT_NETWORK_DATASET).unwrap();
        let summary = ds.summary();
        assert_eq!(summary.channel, Some(11));
        assert_eq!(summary.pan_id, Some(0xaf16));
        assert_eq!(summary.network_name(), Some("OpenThread-af16"));
        assert_eq!(summary.tlv_count, 10);
        assert!(!summary.truncated);
    }

    #[test]
    fn summary_stops_at_truncated_tlv() {
        // PAN ID TLV followed by a network name TLV claiming 5 bytes but carrying 2.
        let ds = OperationalDataset::from_bytes(&[0x01, 0x02, 0x12, 0x34, 0x03, 0x05, b'a', b'b'])
            .unwrap();
        let summary = ds.summary();
        assert_eq!(summary.pan_id, Some(0x1234));
        assert_eq!(summary.network_name(), None);
        assert_eq!(summary.tlv_count, 1);
        assert!(summary.truncated);
    }
}
