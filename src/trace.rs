//! Runtime-configurable diagnostics facade.
//!
//! The engine narrates everything it does - enqueues, dequeues, guard
//! verdicts, transitions, drops - through a [`Trace`] owned by the machine.
//! Each record that passes the severity filter is kept in a bounded
//! in-memory ring (oldest evicted first) and mirrored to the [`log`] facade,
//! so any sink the application installs sees the same story. The engine
//! itself never depends on a particular sink.
//!
//! The filter level and ring capacity are plain runtime values injected at
//! construction via [`TraceConfig`], not compile-time switches.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::EventId;

/// Severity of a single trace record.
///
/// `Fatal` marks conditions the engine treats as configuration bugs (enqueue
/// before init, queue overflow). They are logged and suppressed - nothing in
/// the engine ever halts. The `log` facade has no fatal level, so `Fatal`
/// records are emitted at `error` while the ring keeps the distinct tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Per-callback narration: guard verdicts, enter/exit/internal.
    Noise,
    /// Queue traffic: enqueue, dequeue, defer.
    Debug,
    /// An event was dropped: unconsumed and not deferrable.
    Error,
    /// Engine misuse: enqueue before init, queue full.
    Fatal,
}

/// Runtime filter threshold.
///
/// Levels are cumulative: `Error` admits `Error` and `Fatal`, `Noise` admits
/// everything, `Off` admits nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TraceLevel {
    Off,
    Fatal,
    Error,
    Debug,
    Noise,
}

impl TraceLevel {
    /// Whether a record of `severity` passes this filter.
    pub fn admits(self, severity: Severity) -> bool {
        let threshold = match self {
            TraceLevel::Off => return false,
            TraceLevel::Fatal => Severity::Fatal,
            TraceLevel::Error => Severity::Error,
            TraceLevel::Debug => Severity::Debug,
            TraceLevel::Noise => Severity::Noise,
        };
        severity >= threshold
    }
}

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TraceKind {
    /// Machine initialized with its start state.
    Init,
    /// Event accepted onto the active queue.
    Enqueue,
    /// Event taken off the active queue.
    Dequeue,
    /// Event taken off the deferred queue during a replay pass.
    DequeueDeferred,
    /// Event accepted onto the deferred queue.
    Deferred,
    /// A candidate next state's guard said no.
    GuardRejected,
    /// The old state was told to clean up.
    Exit,
    /// The new state was told to set up.
    Enter,
    /// Self-targeted transition handled in place.
    Internal,
    /// Event was unconsumed and not deferrable; permanently dropped.
    Dropped,
    /// Enqueue attempted against a full queue; event dropped.
    QueueFull,
    /// Enqueue or pump attempted before `init`.
    NotInitialized,
    /// Current state overwritten without exit/enter.
    ForcedState,
    /// A pump invocation ran to its fixed point.
    PumpDone,
}

/// One entry in the trace ring.
///
/// Records are compact copyable values; state names are static strings from
/// the descriptors, so recording allocates nothing.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct TraceRecord {
    /// When the record was made.
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub kind: TraceKind,
    /// Name of the state involved, when one is.
    pub state: Option<&'static str>,
    /// Id of the event involved, when one is.
    pub event: Option<EventId>,
    /// Length of the relevant queue after the operation, when one is.
    pub queue_len: Option<usize>,
}

/// Configuration injected at machine construction.
#[derive(Clone, Copy, Debug)]
pub struct TraceConfig {
    /// Severity filter; records below it are neither kept nor logged.
    pub level: TraceLevel,
    /// Ring capacity; the oldest record is evicted when full.
    pub capacity: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            level: TraceLevel::Debug,
            capacity: 64,
        }
    }
}

/// Bounded diagnostic ring plus `log` emission for one machine instance.
#[derive(Debug)]
pub struct Trace {
    instance: String,
    level: TraceLevel,
    capacity: usize,
    ring: VecDeque<TraceRecord>,
}

impl Trace {
    pub(crate) fn new(instance: impl Into<String>, config: TraceConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            instance: instance.into(),
            level: config.level,
            capacity,
            ring: VecDeque::with_capacity(capacity),
        }
    }

    /// The instance name stamped on every log line.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// The active severity filter.
    pub fn level(&self) -> TraceLevel {
        self.level
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &TraceRecord> {
        self.ring.iter()
    }

    /// Serialize the retained records as a JSON array.
    pub fn export_json(&self) -> serde_json::Result<String> {
        let records: Vec<&TraceRecord> = self.ring.iter().collect();
        serde_json::to_string(&records)
    }

    pub(crate) fn record(
        &mut self,
        severity: Severity,
        kind: TraceKind,
        state: Option<&'static str>,
        event: Option<EventId>,
        queue_len: Option<usize>,
    ) {
        if !self.level.admits(severity) {
            return;
        }

        let record = TraceRecord {
            timestamp: Utc::now(),
            severity,
            kind,
            state,
            event,
            queue_len,
        };
        if self.ring.len() == self.capacity {
            self.ring.pop_front();
        }
        self.ring.push_back(record);
        self.emit(&record);
    }

    fn emit(&self, record: &TraceRecord) {
        let level = match record.severity {
            Severity::Noise => log::Level::Trace,
            Severity::Debug => log::Level::Debug,
            Severity::Error | Severity::Fatal => log::Level::Error,
        };
        log::log!(
            target: "smengine",
            level,
            "{} {:?}: st: {}, e: {}, c: {}",
            self.instance,
            record.kind,
            record.state.unwrap_or("-"),
            record
                .event
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            record
                .queue_len
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(level: TraceLevel, capacity: usize) -> Trace {
        Trace::new("test", TraceConfig { level, capacity })
    }

    #[test]
    fn level_admits_cumulatively() {
        assert!(!TraceLevel::Off.admits(Severity::Fatal));
        assert!(TraceLevel::Fatal.admits(Severity::Fatal));
        assert!(!TraceLevel::Fatal.admits(Severity::Error));
        assert!(TraceLevel::Error.admits(Severity::Fatal));
        assert!(TraceLevel::Error.admits(Severity::Error));
        assert!(!TraceLevel::Error.admits(Severity::Debug));
        assert!(TraceLevel::Debug.admits(Severity::Error));
        assert!(!TraceLevel::Debug.admits(Severity::Noise));
        assert!(TraceLevel::Noise.admits(Severity::Noise));
    }

    #[test]
    fn filtered_records_are_not_retained() {
        let mut trace = trace(TraceLevel::Error, 8);
        trace.record(Severity::Debug, TraceKind::Enqueue, None, Some(1), Some(1));
        trace.record(Severity::Error, TraceKind::Dropped, Some("Idle"), Some(2), None);
        let kinds: Vec<TraceKind> = trace.records().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![TraceKind::Dropped]);
    }

    #[test]
    fn ring_evicts_oldest_when_full() {
        let mut trace = trace(TraceLevel::Noise, 2);
        trace.record(Severity::Debug, TraceKind::Enqueue, None, Some(1), None);
        trace.record(Severity::Debug, TraceKind::Enqueue, None, Some(2), None);
        trace.record(Severity::Debug, TraceKind::Enqueue, None, Some(3), None);

        let events: Vec<Option<EventId>> = trace.records().map(|r| r.event).collect();
        assert_eq!(events, vec![Some(2), Some(3)]);
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        let mut trace = trace(TraceLevel::Noise, 0);
        trace.record(Severity::Debug, TraceKind::Enqueue, None, Some(1), None);
        assert_eq!(trace.records().count(), 1);
    }

    #[test]
    fn export_json_round_trips_structure() {
        let mut trace = trace(TraceLevel::Noise, 4);
        trace.record(
            Severity::Noise,
            TraceKind::Enter,
            Some("Accel"),
            Some(3),
            None,
        );
        let json = trace.export_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["kind"], "Enter");
        assert_eq!(parsed[0]["state"], "Accel");
        assert_eq!(parsed[0]["event"], 3);
    }

    #[test]
    fn off_level_keeps_nothing() {
        let mut trace = trace(TraceLevel::Off, 4);
        trace.record(Severity::Fatal, TraceKind::QueueFull, None, Some(1), None);
        assert_eq!(trace.records().count(), 0);
    }
}
