use std::sync::Arc;
use std::time::Duration;

use crossbeam::atomic::AtomicCell;

pub mod controls;
pub mod debounce;
pub mod producer;
pub mod queue;
pub mod system;
pub mod waveform;

pub use system::SignalSystem;

pub type Sample = u8;

/// A boolean flag writable from one context and readable from another.
pub type SharedFlag = Arc<AtomicCell<bool>>;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1);
pub const LOOP_INTERVAL: Duration = Duration::from_millis(1);
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(50);

pub const QUEUE_CAPACITY: usize = 512;

/// Full-scale raw reading of an analog control.
pub const ADC_MAX: u16 = 4095;

/// Logic level of a digital input. Buttons are wired pull-up, so `Low`
/// is the pressed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

impl Level {
    pub fn is_pressed(self) -> bool {
        self == Level::Low
    }
}

/// Mode flags shared between the tick context and the main loop.
///
/// Written only by the debounced input trackers on the main loop, read by
/// the producer on its next tick. Each flag is a single-word atomic, so the
/// producer always observes the most recently completed write.
pub struct MonitorFlags {
    pub alive: SharedFlag,
    pub alternate_rhythm: SharedFlag,
}

impl MonitorFlags {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicCell::new(true)),
            alternate_rhythm: Arc::new(AtomicCell::new(false)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load()
    }

    pub fn alternate_rhythm(&self) -> bool {
        self.alternate_rhythm.load()
    }
}

impl Default for MonitorFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Live tunables written by the control-surface sampler and read by the
/// producer and delivery loop. Stale-by-one-tick reads are fine; the values
/// change slowly relative to the tick rate.
pub struct Tunables {
    amplitude: AtomicCell<f32>,
    target_rate: AtomicCell<u32>,
    tick_skip: AtomicCell<u32>,
}

impl Tunables {
    pub fn new() -> Self {
        Self {
            amplitude: AtomicCell::new(1.0),
            target_rate: AtomicCell::new(60),
            tick_skip: AtomicCell::new(9),
        }
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude.load()
    }

    pub fn set_amplitude(&self, value: f32) {
        self.amplitude.store(value);
    }

    /// Informational only; nothing in the pipeline consumes it.
    pub fn target_rate(&self) -> u32 {
        self.target_rate.load()
    }

    pub fn set_target_rate(&self, value: u32) {
        self.target_rate.store(value);
    }

    pub fn tick_skip(&self) -> u32 {
        self.tick_skip.load()
    }

    /// Clamped to at least 1 so a mis-mapped control can never stall
    /// production entirely.
    pub fn set_tick_skip(&self, value: u32) {
        self.tick_skip.store(value.max(1));
    }
}

impl Default for Tunables {
    fn default() -> Self {
        Self::new()
    }
}

/// A digital control polled each main-loop cycle.
pub trait DigitalInput: Send + Sync {
    fn level(&self) -> Level;
}

/// A continuous control polled each main-loop cycle. Readings are expected
/// in `[0, ADC_MAX]`.
pub trait AnalogInput: Send + Sync {
    fn read(&self) -> u16;
}

/// Best-effort delivery of one scaled sample to any number of consumers.
/// Failures are not surfaced; a missing consumer is not an error.
pub trait FanoutSink: Send + Sync {
    fn deliver(&self, value: f32, timestamp_ms: u64);
}

/// The physical control surface: two momentary buttons and two analog
/// sticks, abstracted behind the input traits.
pub struct ControlPanel {
    pub amplitude_stick: Arc<dyn AnalogInput>,
    pub rate_stick: Arc<dyn AnalogInput>,
    pub rhythm_button: Arc<dyn DigitalInput>,
    pub kill_button: Arc<dyn DigitalInput>,
}

/// Bring-up parameters for the signal pipeline.
#[derive(Debug, Clone, Copy)]
pub struct SignalOptions {
    pub tick_interval: Duration,
    pub debounce_delay: Duration,
    pub queue_capacity: usize,
}

impl Default for SignalOptions {
    fn default() -> Self {
        Self {
            tick_interval: TICK_INTERVAL,
            debounce_delay: DEBOUNCE_DELAY,
            queue_capacity: QUEUE_CAPACITY,
        }
    }
}
