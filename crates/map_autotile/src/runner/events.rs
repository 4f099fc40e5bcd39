//! Event types and sinks for observing generate runs.
//!
//! The runner works fine without any observer; install a sink via
//! [`crate::runner::generate_with_events`] to trace matches and placements,
//! e.g. for debugging a rule that fires in unexpected cells. Events carry
//! plain numbers only, so an installed sink costs no formatting in the hot
//! loop.
use crate::runner::{LayerSummary, RunSummary};
use crate::{TileId, Uid};

/// Describes events emitted while generating a level.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum GenerateEvent {
    /// Emitted when a run starts.
    RunStarted {
        /// Number of layers that will be processed.
        layer_count: usize,
    },

    /// Emitted when the whole run finishes.
    RunFinished {
        /// Aggregated counts over all layers.
        summary: RunSummary,
    },

    /// Emitted when a layer starts processing.
    LayerStarted {
        /// Index of the layer in the definitions.
        index: usize,
        /// The layer definition uid.
        uid: Uid,
        /// The seed in effect for this layer.
        seed: i32,
    },

    /// Emitted when a layer finishes processing.
    LayerFinished {
        /// Index of the layer in the definitions.
        index: usize,
        /// The layer definition uid.
        uid: Uid,
        /// Counts for this layer alone.
        summary: LayerSummary,
    },

    /// Emitted when a rule matches a cell, before its tiles are placed.
    RuleMatched {
        layer_index: usize,
        rule_uid: Uid,
        cell_x: i32,
        cell_y: i32,
        /// Flip flags of the matching pattern variant.
        flags: u8,
    },

    /// Emitted for every placed tile record.
    TilePlaced {
        layer_index: usize,
        tile_id: TileId,
        cell_x: i32,
        cell_y: i32,
        flags: u8,
        priority: u8,
    },

    /// Non-fatal warning generated during a run.
    Warning {
        /// Context string (e.g. layer uid).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// A generic event sink that accepts [`GenerateEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GenerateEvent);

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = GenerateEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GenerateEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(GenerateEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(GenerateEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(GenerateEvent),
{
    #[inline]
    fn send(&mut self, event: GenerateEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GenerateEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<GenerateEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[GenerateEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GenerateEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: GenerateEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last_idx].send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning() -> GenerateEvent {
        GenerateEvent::Warning {
            context: "ctx".into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::with_capacity(2);
        assert!(sink.is_empty());
        sink.send(warning());
        sink.send(warning());
        assert_eq!(sink.len(), 2);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning());
        assert_eq!(count, 1);
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(warning());
        assert_eq!(multi.sinks.len(), 2);
        assert_eq!(multi.sinks[0].len(), 1);
        assert_eq!(multi.sinks[1].len(), 1);
    }

    #[test]
    fn send_many_forwards_all() {
        let mut sink = VecSink::new();
        sink.send_many(vec![warning(), warning(), warning()]);
        assert_eq!(sink.len(), 3);
    }
}
