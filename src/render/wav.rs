//! In-memory WAV encoding

use crate::Result;
use std::io::Cursor;

/// Size of the canonical RIFF/WAVE header written by the encoder
pub const WAV_HEADER_LEN: usize = 44;

/// Format of every encoded take: mono, 16-bit signed integer PCM
pub fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Encode quantized samples as a mono 16-bit WAV byte stream
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::with_capacity(WAV_HEADER_LEN + samples.len() * 2));

    let mut writer = hound::WavWriter::new(&mut cursor, wav_spec(sample_rate))?;
    {
        let mut pcm = writer.get_i16_writer(samples.len() as u32);
        for &sample in samples {
            pcm.write_sample(sample);
        }
        pcm.flush()?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let bytes = encode_wav(&[0, 1, -1, i16::MAX], 44_100).unwrap();
        assert_eq!(bytes.len(), WAV_HEADER_LEN + 8);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        // format tag 1 (PCM), one channel
        assert_eq!(u16::from_le_bytes([bytes[20], bytes[21]]), 1);
        assert_eq!(u16::from_le_bytes([bytes[22], bytes[23]]), 1);
        assert_eq!(
            u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
            44_100
        );
        assert_eq!(u16::from_le_bytes([bytes[34], bytes[35]]), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(
            u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]),
            8
        );
        // little-endian samples
        assert_eq!(&bytes[44..46], &[0, 0]);
        assert_eq!(&bytes[46..48], &[1, 0]);
        assert_eq!(&bytes[48..50], &[0xFF, 0xFF]);
        assert_eq!(&bytes[50..52], &[0xFF, 0x7F]);
    }

    #[test]
    fn test_decodes_with_hound() {
        let samples: Vec<i16> = (0..100).map(|i| i * 100 - 5000).collect();
        let bytes = encode_wav(&samples, 22_050).unwrap();

        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec(), wav_spec(22_050));
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, samples);
    }
}
