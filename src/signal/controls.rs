use std::sync::Arc;

use super::{AnalogInput, Tunables, ADC_MAX};

/// Maps the two analog sticks into the live tunables.
///
/// Pure function of the raw readings; sampled once per main-loop cycle. The
/// producer picks the new values up on its next tick.
pub struct ControlSurface {
    amplitude_stick: Arc<dyn AnalogInput>,
    rate_stick: Arc<dyn AnalogInput>,
    tunables: Arc<Tunables>,
}

impl ControlSurface {
    pub fn new(
        amplitude_stick: Arc<dyn AnalogInput>,
        rate_stick: Arc<dyn AnalogInput>,
        tunables: Arc<Tunables>,
    ) -> Self {
        Self {
            amplitude_stick,
            rate_stick,
            tunables,
        }
    }

    pub fn sample(&self) {
        let amplitude_raw = self.amplitude_stick.read().min(ADC_MAX) as i64;
        let rate_raw = self.rate_stick.read().min(ADC_MAX) as i64;

        let amplitude = map_range(amplitude_raw, 0, ADC_MAX as i64, 10, 100) as f32 / 100.0;
        self.tunables.set_amplitude(amplitude);

        self.tunables
            .set_target_rate(map_range(rate_raw, 0, ADC_MAX as i64, 40, 220) as u32);
        self.tunables
            .set_tick_skip(map_range(rate_raw, 0, ADC_MAX as i64, 9, 48) as u32);
    }
}

/// Linear integer remap of `value` from `[in_lo, in_hi]` to
/// `[out_lo, out_hi]`, truncating toward zero.
fn map_range(value: i64, in_lo: i64, in_hi: i64, out_lo: i64, out_hi: i64) -> i64 {
    (value - in_lo) * (out_hi - out_lo) / (in_hi - in_lo) + out_lo
}
