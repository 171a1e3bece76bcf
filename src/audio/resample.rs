//! Sample rate conversion

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Resample a mono signal
///
/// The resampler's group delay is removed so the output lines up with the
/// input and has `len * to / from` samples (rounded).
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>, String> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples);
    }
    if from_rate == 0 || to_rate == 0 {
        return Err(format!("cannot resample from {} Hz to {} Hz", from_rate, to_rate));
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let expected = (samples.len() as f64 * ratio).round() as usize;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, samples.len(), 1)
        .map_err(|e| e.to_string())?;
    let delay = resampler.output_delay();

    let mut output = resampler
        .process(&[samples], None)
        .map_err(|e| e.to_string())?
        .swap_remove(0);
    let tail = resampler
        .process_partial::<Vec<f32>>(None, None)
        .map_err(|e| e.to_string())?
        .swap_remove(0);
    output.extend(tail);

    let mut aligned: Vec<f32> = output.into_iter().skip(delay).collect();
    aligned.resize(expected, 0.0);
    Ok(aligned)
}
