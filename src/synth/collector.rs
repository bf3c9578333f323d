//! Lock-free hand-off of timestamped note messages to the audio thread.
//!
//! The producer half ([`NoteSender`]) lives on whatever thread receives input
//! and pushes into an `rtrb` SPSC ring. The consumer half ([`MidiCollector`])
//! is owned by the block renderer and, once per callback, pulls everything out
//! of the ring into a time-ordered pending store and hands back the messages
//! due inside the current block.
//!
//! Both halves are wait-free. All storage is sized when the channel is
//! created; draining never allocates.
//!
//! # Overflow
//!
//! When the ring is full the message being pushed is dropped (newest loses)
//! and counted by the sender. The collector empties the ring on every drain.
//! If its pending store is already full, it keeps the earliest-stamped
//! messages and drops the latest one, counting it on the collector side. An
//! event that is due therefore never waits behind events scheduled after it.

use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::{
    io::{converter::midi_to_synth, midi::MidiEvent},
    synth::{
        clock::SampleClock,
        message::{BlockEvent, SynthMessage, TimedMessage},
    },
};

/// Create a connected sender/collector pair holding up to `capacity` messages.
pub fn channel(capacity: usize, clock: SampleClock) -> (NoteSender, MidiCollector) {
    let (producer, consumer) = RingBuffer::new(capacity);
    let sender = NoteSender {
        producer,
        clock,
        dropped: 0,
    };
    let collector = MidiCollector {
        consumer,
        pending: Vec::with_capacity(capacity),
        due: Vec::with_capacity(capacity),
        capacity,
        dropped: 0,
    };
    (sender, collector)
}

/// Producer half. Move it to the input thread.
pub struct NoteSender {
    producer: Producer<TimedMessage>,
    clock: SampleClock,
    dropped: u64,
}

impl NoteSender {
    /// Queue `message` at host time `time` (seconds on the [`SampleClock`]
    /// timeline). Returns `false` if the queue was full and it was dropped.
    pub fn push(&mut self, message: SynthMessage, time: f64) -> bool {
        match self.producer.push(TimedMessage { time, message }) {
            Ok(()) => true,
            Err(PushError::Full(rejected)) => {
                self.dropped += 1;
                log::warn!(
                    "event queue full, dropped {:?} (total dropped: {})",
                    rejected.message,
                    self.dropped
                );
                false
            }
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: f32, channel: u8, time: f64) -> bool {
        self.push(
            SynthMessage::NoteOn {
                note,
                velocity,
                channel,
            },
            time,
        )
    }

    pub fn note_off(&mut self, note: u8, channel: u8, time: f64) -> bool {
        self.push(SynthMessage::NoteOff { note, channel }, time)
    }

    /// Queue a decoded MIDI message. Returns `false` if it carries nothing the
    /// engine uses or if the queue was full.
    pub fn push_midi(&mut self, midi: MidiEvent, time: f64) -> bool {
        match midi_to_synth(midi) {
            Some(message) => self.push(message, time),
            None => false,
        }
    }

    /// Host time at which the next block starts.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Messages rejected because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn has_space(&self) -> bool {
        self.producer.slots() > 0
    }
}

/// Consumer half. Owned by the audio thread.
pub struct MidiCollector {
    consumer: Consumer<TimedMessage>,
    /// Sorted by time; equal times keep arrival order
    pending: Vec<TimedMessage>,
    due: Vec<BlockEvent>,
    capacity: usize,
    dropped: u64,
}

impl MidiCollector {
    /// Discard pending messages and whatever is waiting in the ring.
    ///
    /// Call it whenever the time base changes; stamps from the old one are
    /// meaningless afterwards.
    pub fn clear(&mut self) {
        let mut discarded = self.pending.len();
        while self.consumer.pop().is_ok() {
            discarded += 1;
        }
        self.pending.clear();
        self.due.clear();
        log::debug!("collector cleared ({} queued messages discarded)", discarded);
    }

    /// Messages accepted by the ring but dropped because the pending store
    /// was full of earlier ones.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Messages held back for later blocks.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Return the messages due in `[block_start, block_start + num_samples)`,
    /// in time order, as offsets from the block start.
    ///
    /// Messages stamped before `block_start` arrived late and are placed at
    /// offset 0. Messages at or after the block end stay pending.
    pub fn drain_for_block(
        &mut self,
        block_start: f64,
        num_samples: usize,
        sample_rate: f64,
    ) -> &[BlockEvent] {
        self.due.clear();

        while let Ok(timed) = self.consumer.pop() {
            if self.pending.len() >= self.capacity {
                // Full: the latest stamp loses, whether queued or incoming.
                self.dropped += 1;
                match self.pending.last() {
                    Some(last) if timed.time < last.time => {
                        self.pending.pop();
                    }
                    _ => continue,
                }
            }
            let at = self.pending.partition_point(|p| p.time <= timed.time);
            self.pending.insert(at, timed);
        }

        let mut taken = 0;
        for timed in &self.pending {
            let position = ((timed.time - block_start) * sample_rate).floor();
            // Late (negative) and NaN positions both land on sample 0.
            let offset = if position > 0.0 { position as usize } else { 0 };
            if offset >= num_samples {
                break;
            }
            self.due.push(BlockEvent::new(offset, timed.message));
            taken += 1;
        }
        self.pending.drain(..taken);

        &self.due
    }
}
