use std::sync::Arc;

use super::queue::SampleFeed;
use super::waveform::{self, WAVEFORM_LEN};
use super::{MonitorFlags, Tunables};

/// Generates one waveform sample per effective tick.
///
/// Runs in the periodic tick context and must return promptly on every
/// invocation: it never blocks, never retries, and treats a full queue as
/// backpressure rather than an error. It reads the mode flags and tick-skip
/// divisor but writes only the queue and its own counters.
pub struct SampleProducer {
    feed: SampleFeed,
    flags: Arc<MonitorFlags>,
    tunables: Arc<Tunables>,
    tick: u32,
    index: usize,
}

impl SampleProducer {
    pub fn new(feed: SampleFeed, flags: Arc<MonitorFlags>, tunables: Arc<Tunables>) -> Self {
        Self {
            feed,
            flags,
            tunables,
            tick: 0,
            index: 0,
        }
    }

    /// Called once per periodic trigger. Only every Nth invocation produces
    /// a sample, where N is the live tick-skip divisor.
    pub fn tick(&mut self) {
        // The tunables setter guarantees the divisor is at least 1.
        let skip = self.tunables.tick_skip();

        self.tick = (self.tick + 1) % skip;
        if self.tick != 0 {
            return;
        }

        self.index = (self.index + 1) % WAVEFORM_LEN;

        let table =
            waveform::active_table(self.flags.is_alive(), self.flags.alternate_rhythm());

        // Full queue: drop the sample and move on.
        self.feed.enqueue(table[self.index]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::queue::{sample_queue, SampleDrain};
    use crate::signal::waveform::{ARRHYTHMIA, FLATLINE, SINUS};

    fn producer(capacity: usize) -> (SampleProducer, SampleDrain, Arc<MonitorFlags>, Arc<Tunables>) {
        let (feed, drain) = sample_queue(capacity);
        let flags = Arc::new(MonitorFlags::new());
        let tunables = Arc::new(Tunables::new());

        (
            SampleProducer::new(feed, flags.clone(), tunables.clone()),
            drain,
            flags,
            tunables,
        )
    }

    #[test]
    fn decimates_to_one_sample_per_divisor() {
        let (mut producer, mut drain, _flags, tunables) = producer(64);
        tunables.set_tick_skip(9);

        for _ in 0..90 {
            producer.tick();
        }

        let mut produced = 0;
        while drain.dequeue().is_some() {
            produced += 1;
        }

        assert_eq!(produced, 10);
    }

    #[test]
    fn zero_divisor_request_falls_back_to_every_tick() {
        let (mut producer, mut drain, _flags, tunables) = producer(16);
        tunables.set_tick_skip(0);

        for _ in 0..3 {
            producer.tick();
        }

        assert_eq!(drain.len(), 3);
    }

    #[test]
    fn divisor_one_produces_every_tick() {
        let (mut producer, mut drain, _flags, tunables) = producer(64);
        tunables.set_tick_skip(1);

        for _ in 0..5 {
            producer.tick();
        }

        assert_eq!(drain.len(), 5);
        assert_eq!(drain.dequeue(), Some(SINUS[1]));
        assert_eq!(drain.dequeue(), Some(SINUS[2]));
    }

    #[test]
    fn follows_sinus_table_in_cyclic_order() {
        let (mut producer, mut drain, _flags, tunables) = producer(128);
        tunables.set_tick_skip(1);

        for _ in 0..WAVEFORM_LEN + 3 {
            producer.tick();
        }

        // Index advances before the read, so the first sample is entry 1.
        for offset in 0..WAVEFORM_LEN + 3 {
            let expected = SINUS[(offset + 1) % WAVEFORM_LEN];
            assert_eq!(drain.dequeue(), Some(expected));
        }
    }

    #[test]
    fn dead_patient_flatlines_regardless_of_rhythm() {
        let (mut producer, mut drain, flags, tunables) = producer(64);
        tunables.set_tick_skip(1);
        flags.alive.store(false);
        flags.alternate_rhythm.store(true);

        for _ in 0..10 {
            producer.tick();
        }

        while let Some(sample) = drain.dequeue() {
            assert_eq!(sample, FLATLINE[0]);
        }
    }

    #[test]
    fn alternate_rhythm_matches_arrhythmia_table() {
        let (mut producer, mut drain, flags, tunables) = producer(64);
        tunables.set_tick_skip(1);
        flags.alternate_rhythm.store(true);

        for _ in 0..4 {
            producer.tick();
        }

        for offset in 0..4 {
            assert_eq!(drain.dequeue(), Some(ARRHYTHMIA[offset + 1]));
        }
    }

    #[test]
    fn full_queue_drops_without_disturbing_order() {
        let (mut producer, mut drain, _flags, tunables) = producer(2);
        tunables.set_tick_skip(1);

        for _ in 0..6 {
            producer.tick();
        }

        assert_eq!(drain.dequeue(), Some(SINUS[1]));
        assert_eq!(drain.dequeue(), Some(SINUS[2]));
        assert_eq!(drain.dequeue(), None);
    }

    #[test]
    fn flag_flip_takes_effect_on_next_tick() {
        let (mut producer, mut drain, flags, tunables) = producer(64);
        tunables.set_tick_skip(1);

        producer.tick();
        flags.alive.store(false);
        producer.tick();

        assert_eq!(drain.dequeue(), Some(SINUS[1]));
        assert_eq!(drain.dequeue(), Some(FLATLINE[2]));
    }
}
