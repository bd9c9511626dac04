//! Vitals providers: user-entered readings and a simulated wearable.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use triage_contracts::patient::VitalSigns;

/// Source of the vitals attached to each analysis request.
pub trait VitalsProvider: Send + Sync {
    /// A fresh reading. Called once per request.
    fn current(&self) -> VitalSigns;
}

/// Readings typed in by staff; returned unchanged every time.
#[derive(Debug, Clone)]
pub struct ManualVitals {
    vitals: VitalSigns,
}

impl ManualVitals {
    pub fn new(heart_rate: u32, blood_pressure: impl Into<String>, spo2: u32) -> Self {
        Self {
            vitals: VitalSigns {
                heart_rate,
                blood_pressure: blood_pressure.into(),
                spo2,
            },
        }
    }
}

impl VitalsProvider for ManualVitals {
    fn current(&self) -> VitalSigns {
        self.vitals.clone()
    }
}

/// Resting values a simulated wearable drifts around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VitalsBaseline {
    pub heart_rate: u32,
    pub systolic: u32,
    pub diastolic: u32,
    pub spo2: u32,
}

impl Default for VitalsBaseline {
    fn default() -> Self {
        Self {
            heart_rate: 72,
            systolic: 120,
            diastolic: 80,
            spo2: 98,
        }
    }
}

/// Maximum deviation from the baseline per reading.
const HEART_RATE_JITTER: i64 = 5;
const SYSTOLIC_JITTER: i64 = 6;
const DIASTOLIC_JITTER: i64 = 4;
const SPO2_DROP: i64 = 2;

/// A wearable simulator producing jittered readings around a baseline.
pub struct SimulatedVitals {
    baseline: VitalsBaseline,
    rng: Mutex<StdRng>,
}

impl SimulatedVitals {
    pub fn new(baseline: VitalsBaseline) -> Self {
        Self {
            baseline,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible readings for tests and recorded demos.
    pub fn with_seed(baseline: VitalsBaseline, seed: u64) -> Self {
        Self {
            baseline,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn baseline(&self) -> VitalsBaseline {
        self.baseline
    }
}

fn jitter(rng: &mut StdRng, value: u32, below: i64, above: i64) -> u32 {
    let delta = rng.gen_range(-below..=above);
    (i64::from(value) + delta).clamp(0, i64::from(u32::MAX)) as u32
}

impl VitalsProvider for SimulatedVitals {
    fn current(&self) -> VitalSigns {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let b = self.baseline;

        let systolic = jitter(&mut rng, b.systolic, SYSTOLIC_JITTER, SYSTOLIC_JITTER);
        let diastolic = jitter(&mut rng, b.diastolic, DIASTOLIC_JITTER, DIASTOLIC_JITTER);
        VitalSigns {
            heart_rate: jitter(&mut rng, b.heart_rate, HEART_RATE_JITTER, HEART_RATE_JITTER),
            blood_pressure: format!("{systolic}/{diastolic}"),
            spo2: jitter(&mut rng, b.spo2, SPO2_DROP, 1).min(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use triage_contracts::patient::BloodPressure;

    use super::*;

    #[test]
    fn manual_vitals_are_stable() {
        let manual = ManualVitals::new(88, "150/95", 96);
        assert_eq!(manual.current(), manual.current());
        assert_eq!(manual.current().blood_pressure, "150/95");
    }

    #[test]
    fn simulated_readings_stay_near_baseline() {
        let sim = SimulatedVitals::with_seed(VitalsBaseline::default(), 7);
        for _ in 0..200 {
            let v = sim.current();
            assert!((67..=77).contains(&v.heart_rate), "heart rate {}", v.heart_rate);
            assert!((96..=99).contains(&v.spo2), "spo2 {}", v.spo2);
            let bp = BloodPressure::parse(&v.blood_pressure).expect("simulated BP must parse");
            assert!((114..=126).contains(&bp.systolic));
            assert!((76..=84).contains(&bp.diastolic));
        }
    }

    #[test]
    fn seeded_simulators_agree() {
        let a = SimulatedVitals::with_seed(VitalsBaseline::default(), 42);
        let b = SimulatedVitals::with_seed(VitalsBaseline::default(), 42);
        for _ in 0..10 {
            assert_eq!(a.current(), b.current());
        }
    }

    #[test]
    fn spo2_never_exceeds_one_hundred() {
        let baseline = VitalsBaseline { spo2: 100, ..VitalsBaseline::default() };
        let sim = SimulatedVitals::with_seed(baseline, 3);
        assert!((0..100).all(|_| sim.current().spo2 <= 100));
    }

    #[test]
    fn zero_baseline_does_not_underflow() {
        let baseline = VitalsBaseline { heart_rate: 0, systolic: 0, diastolic: 0, spo2: 0 };
        let sim = SimulatedVitals::with_seed(baseline, 1);
        let v = sim.current();
        assert!(v.heart_rate <= 5);
    }
}
