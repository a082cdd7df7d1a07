//! Concatenation of sub-waveforms into one composite stimulus.

use crate::error::{StimulusError, StimulusResult};
use crate::stimulus::Stimulus;

/// Append `parts` end to end.
///
/// Each part is shifted so that it starts one sample interval after the last
/// time point of everything before it. The interval is the spacing of the
/// first two samples of the part just appended, so every part that is
/// followed by another needs at least two samples.
pub fn concat<I>(parts: I) -> StimulusResult<Stimulus>
where
    I: IntoIterator<Item = Stimulus>,
{
    let parts: Vec<Stimulus> = parts.into_iter().collect();
    let total = parts.iter().map(Stimulus::len).sum();
    let mut time = Vec::with_capacity(total);
    let mut signal = Vec::with_capacity(total);
    let mut offset = 0.0;
    let last = parts.len().saturating_sub(1);

    for (index, part) in parts.into_iter().enumerate() {
        part.validate()?;
        let interval = part.sample_interval();
        let (part_time, part_signal) = part.into_parts();
        time.extend(part_time.iter().map(|t| t + offset));
        signal.extend(part_signal);

        if index < last {
            let interval = interval.ok_or(StimulusError::InvalidArg {
                what: "concatenated parts need at least two samples",
            })?;
            offset = time.last().copied().unwrap_or(0.0) + interval;
        }
    }

    Stimulus::new(time, signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::{TriangularWave, triangular};

    #[test]
    fn parts_are_shifted_by_one_interval() {
        let a = Stimulus::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
        let b = Stimulus::new(vec![0.0, 1.0], vec![4.0, 5.0]).unwrap();
        let c = Stimulus::new(vec![0.0], vec![6.0]).unwrap();

        let out = concat([a, b, c]).unwrap();
        assert_eq!(out.time(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(out.signal(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn interval_comes_from_the_appended_part() {
        let a = Stimulus::new(vec![0.0, 0.5], vec![0.0, 0.0]).unwrap();
        let b = Stimulus::new(vec![0.0, 2.0], vec![1.0, 1.0]).unwrap();
        let out = concat([a, b]).unwrap();
        assert_eq!(out.time(), &[0.0, 0.5, 1.0, 3.0]);
    }

    #[test]
    fn short_inner_part_is_rejected() {
        let a = Stimulus::new(vec![0.0], vec![1.0]).unwrap();
        let b = Stimulus::new(vec![0.0, 1.0], vec![1.0, 1.0]).unwrap();
        assert!(concat([a, b]).is_err());
    }

    #[test]
    fn empty_input_gives_empty_stimulus() {
        let out = concat(Vec::new()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn butterfly_sweep_is_continuous_in_time() {
        let neg = triangular(&TriangularWave::new(-1.0, 8.0, 1.0)).unwrap();
        let pos = triangular(&TriangularWave::new(1.0, 8.0, 1.0)).unwrap();
        let out = concat([neg, pos]).unwrap();
        assert_eq!(out.len(), 16);
        let expected: Vec<f64> = (0..16).map(|k| k as f64).collect();
        assert_eq!(out.time(), expected.as_slice());
        assert_eq!(out.signal()[4], -1.0);
        assert_eq!(out.signal()[12], 1.0);
    }
}
