//! RIFF/WAVE header codec for uncompressed PCM.
//!
//! Recordings start with a zero-filled placeholder of `WAV_HEADER_SIZE`
//! bytes; the finalizer overwrites it with `generate_wav_header` once the
//! data size is known.

use crate::models::error::LoggerError;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Largest data chunk a 32-bit RIFF size field can describe.
pub const MAX_DATA_SIZE: u64 = u32::MAX as u64 - 36;

/// Fields decoded from a 44-byte PCM header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

/// Generate a 44-byte WAV RIFF header.
///
/// Format: PCM (format code 1), little-endian.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    36 + data_size
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bits / 8
/// [32-33]  block_align = channels * bits / 8
/// [34-35]  bits_per_sample
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
pub fn generate_wav_header(
    sample_rate: u32,
    bits_per_sample: u16,
    channels: u16,
    data_size: u32,
) -> [u8; WAV_HEADER_SIZE] {
    let bytes_per_sample = bits_per_sample / 8;
    let byte_rate = sample_rate * channels as u32 * bytes_per_sample as u32;
    let block_align = channels * bytes_per_sample;
    let chunk_size = 36u32.saturating_add(data_size);

    let mut header = [0u8; WAV_HEADER_SIZE];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bits_per_sample.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Clamp a byte count to what the header can express, warning when it can't.
pub fn header_data_size(data_bytes: u64) -> u32 {
    if data_bytes > MAX_DATA_SIZE {
        log::warn!(
            "Recording data size {} exceeds WAV limit; header clamped to {}",
            data_bytes,
            MAX_DATA_SIZE
        );
    }
    data_bytes.min(MAX_DATA_SIZE) as u32
}

/// Decode a PCM header produced by `generate_wav_header`.
pub fn parse_wav_header(bytes: &[u8]) -> Result<WavHeader, LoggerError> {
    if bytes.len() < WAV_HEADER_SIZE {
        return Err(LoggerError::StorageError(format!(
            "WAV header needs {} bytes, got {}",
            WAV_HEADER_SIZE,
            bytes.len()
        )));
    }
    for (offset, tag) in [(0usize, b"RIFF"), (8, b"WAVE"), (12, b"fmt "), (36, b"data")] {
        if bytes[offset..offset + 4] != tag[..] {
            return Err(LoggerError::StorageError(format!(
                "missing {:?} tag at offset {}",
                String::from_utf8_lossy(tag),
                offset
            )));
        }
    }
    let format_code = read_u16(bytes, 20);
    if format_code != 1 {
        return Err(LoggerError::StorageError(format!(
            "unsupported WAV format code {}",
            format_code
        )));
    }

    Ok(WavHeader {
        channels: read_u16(bytes, 22),
        sample_rate: read_u32(bytes, 24),
        byte_rate: read_u32(bytes, 28),
        block_align: read_u16(bytes, 32),
        bits_per_sample: read_u16(bytes, 34),
        data_size: read_u32(bytes, 40),
    })
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_riff_magic() {
        let header = generate_wav_header(22050, 16, 1, 0);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(&header[36..40], b"data");
    }

    #[test]
    fn header_22khz_mono_16bit() {
        let header = generate_wav_header(22050, 16, 1, 220500);

        assert_eq!(u32::from_le_bytes([header[16], header[17], header[18], header[19]]), 16);
        assert_eq!(u16::from_le_bytes([header[20], header[21]]), 1);
        assert_eq!(u16::from_le_bytes([header[22], header[23]]), 1);
        assert_eq!(u32::from_le_bytes([header[24], header[25], header[26], header[27]]), 22050);
        assert_eq!(u32::from_le_bytes([header[28], header[29], header[30], header[31]]), 44100);
        assert_eq!(u16::from_le_bytes([header[32], header[33]]), 2);
        assert_eq!(u16::from_le_bytes([header[34], header[35]]), 16);
        assert_eq!(u32::from_le_bytes([header[40], header[41], header[42], header[43]]), 220500);
        assert_eq!(u32::from_le_bytes([header[4], header[5], header[6], header[7]]), 36 + 220500);
    }

    #[test]
    fn parse_recovers_generated_fields() {
        for (rate, size) in [(22050, 0), (16000, 1), (48000, 9_600_000)] {
            let parsed = parse_wav_header(&generate_wav_header(rate, 16, 1, size)).unwrap();
            assert_eq!(parsed.sample_rate, rate);
            assert_eq!(parsed.data_size, size);
            assert_eq!(parsed.bits_per_sample, 16);
            assert_eq!(parsed.channels, 1);
            assert_eq!(parsed.block_align, 2);
            assert_eq!(parsed.byte_rate, rate * 2);
        }
    }

    #[test]
    fn parse_rejects_placeholder_and_short_input() {
        assert!(parse_wav_header(&[0u8; WAV_HEADER_SIZE]).is_err());
        assert!(parse_wav_header(b"RIFF").is_err());
    }

    #[test]
    fn oversized_data_is_clamped() {
        assert_eq!(header_data_size(1024), 1024);
        assert_eq!(header_data_size(u64::MAX), MAX_DATA_SIZE as u32);

        let header = generate_wav_header(22050, 16, 1, header_data_size(u64::MAX));
        let chunk_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        assert_eq!(chunk_size, u32::MAX);
    }
}
