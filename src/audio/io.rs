//! WAV file reading and writing

use super::resample::resample;
use crate::{Result, RobopError};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;
use std::io::Cursor;
use std::path::Path;

/// Read a WAV file into per-channel float samples
pub fn read_wav(path: &Path) -> Result<(Vec<Vec<f32>>, u32)> {
    let mut reader = WavReader::open(path).map_err(|e| RobopError::audio(path, e))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    let mut samples = vec![Vec::new(); channels];

    match spec.sample_format {
        SampleFormat::Float => {
            for (idx, sample) in reader.samples::<f32>().enumerate() {
                samples[idx % channels].push(sample.map_err(|e| RobopError::audio(path, e))?);
            }
        }
        SampleFormat::Int => {
            let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            for (idx, sample) in reader.samples::<i32>().enumerate() {
                let value = sample.map_err(|e| RobopError::audio(path, e))? as f32 / max;
                samples[idx % channels].push(value);
            }
        }
    }

    Ok((samples, spec.sample_rate))
}

/// Load a WAV file as mono at the requested sample rate
///
/// Channels are averaged, then the result is resampled if needed.
pub fn load_mono(path: &Path, sample_rate: u32) -> Result<Vec<f32>> {
    let (channels, file_rate) = read_wav(path)?;
    let len = channels.first().map_or(0, Vec::len);

    let mono = if channels.len() == 1 {
        channels.into_iter().next().unwrap_or_default()
    } else {
        let scale = 1.0 / channels.len() as f32;
        (0..len)
            .map(|i| channels.iter().map(|c| c[i]).sum::<f32>() * scale)
            .collect()
    };

    debug!(
        "Loaded {} samples at {} Hz from {}",
        mono.len(),
        file_rate,
        path.display()
    );
    resample(mono, file_rate, sample_rate).map_err(|e| RobopError::audio(path, e))
}

fn spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn to_i16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

/// Write mono samples as a 16-bit PCM WAV file
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let mut writer =
        WavWriter::create(path, spec(sample_rate)).map_err(|e| RobopError::audio(path, e))?;
    for &value in samples {
        writer
            .write_sample(to_i16(value))
            .map_err(|e| RobopError::audio(path, e))?;
    }
    writer.finalize().map_err(|e| RobopError::audio(path, e))
}

/// Encode mono samples as an in-memory 16-bit PCM WAV file
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let fail = |e: hound::Error| RobopError::audio("<memory>", e);
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec(sample_rate)).map_err(fail)?;
        for &value in samples {
            writer.write_sample(to_i16(value)).map_err(fail)?;
        }
        writer.finalize().map_err(fail)?;
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read_mono() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("mono.wav");
        write_wav(&path, &[0.0, 0.5, -0.5, 1.5], 16000).expect("write wav");

        let (channels, rate) = read_wav(&path).expect("read wav");
        assert_eq!(rate, 16000);
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].len(), 4);
        assert!((channels[0][1] - 0.5).abs() < 1e-3);
        // clamped on write
        assert!((channels[0][3] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_load_mono_downmixes_stereo() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..10 {
            writer.write_sample(0.5f32).unwrap();
            writer.write_sample(-0.1f32).unwrap();
        }
        writer.finalize().unwrap();

        let mono = load_mono(&path, 8000).expect("load mono");
        assert_eq!(mono.len(), 10);
        assert!(mono.iter().all(|&v| (v - 0.2).abs() < 1e-6));
    }

    #[test]
    fn test_encode_wav_has_riff_header() {
        let bytes = encode_wav(&[0.0; 8], 48000).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }

    #[test]
    fn test_missing_file_is_audio_error() {
        let err = read_wav(Path::new("/nonexistent/robop.wav")).unwrap_err();
        assert!(matches!(err, RobopError::Audio { .. }));
    }
}
