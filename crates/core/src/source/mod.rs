use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    ingest::GrainEvent,
    params::{GranulatorControl, ParameterSignal},
};

const MIN_DENSITY: f32 = 0.01;

/// Stand-in for the audio granulator: decides, sample by sample, when a
/// new grain starts and reports it as a [`GrainEvent`].
///
/// Onsets are spaced `max(1, -ceil(ln(u) / density * 1000))` samples apart
/// with `u` drawn from `[0.1, 1.0)`, so higher density means more grains.
#[derive(Debug)]
pub struct SyntheticGrainSource {
    density: f32,
    duration_ms: f32,
    position: f32,
    next_onset: u64,
    rng: StdRng,
}

impl SyntheticGrainSource {
    pub fn new(density: f32, duration_ms: f32, seed: u64) -> Self {
        Self {
            density: density.max(MIN_DENSITY),
            duration_ms,
            position: 0.0,
            next_onset: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Runs the onset scheduler over `samples` samples and returns the
    /// grains that started, in order.
    pub fn process(&mut self, samples: usize) -> Vec<GrainEvent> {
        let mut events = Vec::new();
        for _ in 0..samples {
            if self.next_onset == 0 {
                self.next_onset = self.next_interonset();
                events.push(
                    GrainEvent::new(f64::from(self.duration_ms))
                        .with_position(f64::from(self.position)),
                );
            } else {
                self.next_onset -= 1;
            }
        }
        events
    }

    fn next_interonset(&mut self) -> u64 {
        let u: f32 = self.rng.gen_range(0.1..1.0);
        let samples = -(u.ln() / self.density * 1000.0).ceil();
        (samples as u64).max(1)
    }
}

impl GranulatorControl for SyntheticGrainSource {
    fn apply(&mut self, signal: ParameterSignal) {
        match signal {
            ParameterSignal::Density(value) => self.density = value.max(MIN_DENSITY),
            ParameterSignal::Duration(value) => self.duration_ms = value,
            ParameterSignal::Position(value) => self.position = value,
            other => tracing::trace!(?other, "signal has no effect on grain onsets"),
        }
    }
}

/// Samples elapsed during one redraw period.
pub fn samples_per_tick(sample_rate: u32, refresh_rate_ms: u32) -> usize {
    (u64::from(sample_rate) * u64::from(refresh_rate_ms) / 1000) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_starts_a_grain() {
        let mut source = SyntheticGrainSource::new(50.0, 40.0, 10);
        let events = source.process(1);
        assert_eq!(events, vec![GrainEvent::new(40.0).with_position(0.0)]);
    }

    #[test]
    fn interonset_stays_within_bounds() {
        let mut source = SyntheticGrainSource::new(10.0, 40.0, 10);
        for _ in 0..1000 {
            let gap = source.next_interonset();
            // ln(0.1) / 10 * 1000 = -230.26
            assert!((1..=231).contains(&gap), "gap {gap} out of range");
        }
    }

    #[test]
    fn denser_sources_emit_more_grains() {
        let mut sparse = SyntheticGrainSource::new(2.0, 40.0, 7);
        let mut dense = SyntheticGrainSource::new(80.0, 40.0, 7);

        let sparse_count = sparse.process(41_000).len();
        let dense_count = dense.process(41_000).len();
        assert!(dense_count > sparse_count * 10);
    }

    #[test]
    fn same_seed_same_schedule() {
        let mut a = SyntheticGrainSource::new(30.0, 40.0, 99);
        let mut b = SyntheticGrainSource::new(30.0, 40.0, 99);
        assert_eq!(a.process(5000), b.process(5000));
    }

    #[test]
    fn control_signals_update_events() {
        let mut source = SyntheticGrainSource::new(30.0, 40.0, 1);
        source.apply(ParameterSignal::Duration(120.0));
        source.apply(ParameterSignal::Position(800.0));
        source.apply(ParameterSignal::Density(-5.0));
        source.apply(ParameterSignal::Volume(0.3));

        assert_eq!(source.density(), MIN_DENSITY);
        let event = source.process(1)[0];
        assert_eq!(event.duration_ms, 120.0);
        assert_eq!(event.position, Some(800.0));
    }

    #[test]
    fn samples_per_default_tick() {
        assert_eq!(samples_per_tick(41_000, 40), 1640);
    }
}
