use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

use super::Sample;

/// Creates a bounded sample queue, returning its two halves.
///
/// The feed half belongs to the tick context, the drain half to the main
/// loop. Exactly one context writes and exactly one reads; that discipline
/// is what makes the ring safe without any lock.
pub fn sample_queue(capacity: usize) -> (SampleFeed, SampleDrain) {
    let (producer, consumer) = HeapRb::new(capacity).split();

    (SampleFeed(producer), SampleDrain(consumer))
}

/// Write half of the sample queue.
pub struct SampleFeed(HeapProducer<Sample>);

impl SampleFeed {
    /// Appends a sample. Returns false when the queue is full, in which
    /// case the sample is dropped and the queue is left untouched.
    pub fn enqueue(&mut self, sample: Sample) -> bool {
        self.0.push(sample).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Read half of the sample queue.
pub struct SampleDrain(HeapConsumer<Sample>);

impl SampleDrain {
    /// Removes the oldest sample, or `None` when there is nothing to
    /// deliver this cycle.
    pub fn dequeue(&mut self) -> Option<Sample> {
        self.0.pop()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
