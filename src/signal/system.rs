use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::controls::ControlSurface;
use super::debounce::DebouncedToggle;
use super::producer::SampleProducer;
use super::queue::{sample_queue, SampleDrain};
use super::{
    ControlPanel, DigitalInput, FanoutSink, MonitorFlags, SignalOptions, Tunables, LOOP_INTERVAL,
};

/// Owns the whole acquisition-and-delivery pipeline.
///
/// Construction splits the sample queue, moves the feed half plus a
/// producer into a dedicated tick thread, and keeps the drain half for the
/// cooperative main cycle. The tick thread and the main cycle share only
/// the queue and the atomic flags/tunables; nothing in either context ever
/// blocks on the other.
pub struct SignalSystem {
    flags: Arc<MonitorFlags>,
    tunables: Arc<Tunables>,
    controls: ControlSurface,
    drain: SampleDrain,
    sink: Arc<dyn FanoutSink>,

    rhythm_button: Arc<dyn DigitalInput>,
    kill_button: Arc<dyn DigitalInput>,
    rhythm_tracker: DebouncedToggle,
    kill_tracker: DebouncedToggle,

    started: Instant,
}

impl SignalSystem {
    pub fn new(panel: ControlPanel, sink: Arc<dyn FanoutSink>, options: SignalOptions) -> Self {
        let (feed, drain) = sample_queue(options.queue_capacity);
        let system = Self::assemble(panel, sink, options, drain);

        let producer =
            SampleProducer::new(feed, system.flags.clone(), system.tunables.clone());

        spawn_tick_thread(producer, options.tick_interval);
        system
    }

    fn assemble(
        panel: ControlPanel,
        sink: Arc<dyn FanoutSink>,
        options: SignalOptions,
        drain: SampleDrain,
    ) -> Self {
        let flags = Arc::new(MonitorFlags::new());
        let tunables = Arc::new(Tunables::new());

        let controls = ControlSurface::new(
            panel.amplitude_stick,
            panel.rate_stick,
            tunables.clone(),
        );

        let rhythm_tracker =
            DebouncedToggle::new(flags.alternate_rhythm.clone(), options.debounce_delay);
        let kill_tracker = DebouncedToggle::new(flags.alive.clone(), options.debounce_delay);

        Self {
            flags,
            tunables,
            controls,
            drain,
            sink,
            rhythm_button: panel.rhythm_button,
            kill_button: panel.kill_button,
            rhythm_tracker,
            kill_tracker,
            started: Instant::now(),
        }
    }

    pub fn flags(&self) -> Arc<MonitorFlags> {
        self.flags.clone()
    }

    pub fn tunables(&self) -> Arc<Tunables> {
        self.tunables.clone()
    }

    /// Runs the main cycle forever.
    pub fn run(mut self) -> ! {
        loop {
            self.cycle(Instant::now());
            thread::sleep(LOOP_INTERVAL);
        }
    }

    /// One cooperative cycle: refresh the tunables, deliver at most one
    /// sample, poll both buttons. Every step returns promptly.
    fn cycle(&mut self, now: Instant) {
        self.controls.sample();

        if !self.drain.is_empty() {
            if let Some(sample) = self.drain.dequeue() {
                let scaled = sample as f32 * self.tunables.amplitude();
                let timestamp = now.duration_since(self.started).as_millis() as u64;

                self.sink.deliver(scaled, timestamp);
            }
        }

        self.rhythm_tracker.poll(self.rhythm_button.level(), now);
        self.kill_tracker.poll(self.kill_button.level(), now);
    }
}

/// The periodic trigger: invokes the producer at a fixed interval from a
/// dedicated thread. The producer's tick is cheap enough to always return
/// well before the next invocation is due.
fn spawn_tick_thread(mut producer: SampleProducer, interval: Duration) {
    let run = move || loop {
        producer.tick();
        thread::sleep(interval);
    };

    thread::Builder::new()
        .name("ticker".to_string())
        .spawn(run)
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::queue::SampleFeed;
    use crate::signal::{AnalogInput, Level, ADC_MAX};
    use crossbeam::atomic::AtomicCell;
    use parking_lot::Mutex;

    struct StubStick(AtomicCell<u16>);

    impl AnalogInput for StubStick {
        fn read(&self) -> u16 {
            self.0.load()
        }
    }

    struct StubButton(AtomicCell<Level>);

    impl DigitalInput for StubButton {
        fn level(&self) -> Level {
            self.0.load()
        }
    }

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<(f32, u64)>>);

    impl FanoutSink for RecordingSink {
        fn deliver(&self, value: f32, timestamp_ms: u64) {
            self.0.lock().push((value, timestamp_ms));
        }
    }

    struct Fixture {
        system: SignalSystem,
        feed: SampleFeed,
        sink: Arc<RecordingSink>,
        rhythm: Arc<StubButton>,
        kill: Arc<StubButton>,
    }

    /// Assembles a system without the tick thread so tests drive the queue
    /// and clock by hand.
    fn fixture() -> Fixture {
        let sink = Arc::new(RecordingSink::default());
        let rhythm = Arc::new(StubButton(AtomicCell::new(Level::High)));
        let kill = Arc::new(StubButton(AtomicCell::new(Level::High)));

        let panel = ControlPanel {
            amplitude_stick: Arc::new(StubStick(AtomicCell::new(ADC_MAX))),
            rate_stick: Arc::new(StubStick(AtomicCell::new(0))),
            rhythm_button: rhythm.clone(),
            kill_button: kill.clone(),
        };

        let (feed, drain) = sample_queue(16);
        let system = SignalSystem::assemble(
            panel,
            sink.clone(),
            SignalOptions::default(),
            drain,
        );

        Fixture {
            system,
            feed,
            sink,
            rhythm,
            kill,
        }
    }

    #[test]
    fn delivers_at_most_one_sample_per_cycle() {
        let mut f = fixture();

        f.feed.enqueue(100);
        f.feed.enqueue(200);

        let t0 = Instant::now();
        f.system.cycle(t0);

        assert_eq!(f.sink.0.lock().len(), 1);

        f.system.cycle(t0 + Duration::from_millis(1));
        f.system.cycle(t0 + Duration::from_millis(2));

        // Two samples total; the third cycle found the queue empty.
        assert_eq!(f.sink.0.lock().len(), 2);
    }

    #[test]
    fn scales_by_the_live_amplitude() {
        let mut f = fixture();

        // Full-scale amplitude stick maps to a factor of 1.0.
        f.feed.enqueue(100);
        f.system.cycle(Instant::now());

        let delivered = f.sink.0.lock();
        assert_eq!(delivered.len(), 1);
        assert!((delivered[0].0 - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn timestamps_are_monotonic_millis_since_start() {
        let mut f = fixture();

        f.feed.enqueue(1);
        f.feed.enqueue(2);

        let t0 = Instant::now();
        f.system.cycle(t0 + Duration::from_millis(5));
        f.system.cycle(t0 + Duration::from_millis(9));

        let delivered = f.sink.0.lock();
        assert!(delivered[0].1 <= delivered[1].1);
    }

    #[test]
    fn kill_button_press_flips_the_alive_flag() {
        let mut f = fixture();
        let flags = f.system.flags();
        assert!(flags.is_alive());

        let t0 = Instant::now();
        f.kill.0.store(Level::Low);

        f.system.cycle(t0);
        f.system.cycle(t0 + Duration::from_millis(60));

        assert!(!flags.is_alive());

        // Holding it longer changes nothing.
        f.system.cycle(t0 + Duration::from_millis(120));
        assert!(!flags.is_alive());
    }

    #[test]
    fn rhythm_button_press_flips_the_rhythm_flag_only() {
        let mut f = fixture();
        let flags = f.system.flags();

        let t0 = Instant::now();
        f.rhythm.0.store(Level::Low);

        f.system.cycle(t0);
        f.system.cycle(t0 + Duration::from_millis(60));

        assert!(flags.alternate_rhythm());
        assert!(flags.is_alive());
    }

    #[test]
    fn empty_queue_is_a_quiet_cycle() {
        let mut f = fixture();

        f.system.cycle(Instant::now());

        assert!(f.sink.0.lock().is_empty());
    }
}
