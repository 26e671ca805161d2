use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::kanban::Column;
use crate::model::TaskId;
use crate::state::View;

/// Every observable state change produces an Event.
/// Views subscribe through an [`EventSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The visible month changed; carries the new month bounds.
    WindowChanged {
        view: View,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// A kanban move was applied and accepted by the service.
    TaskMoved {
        task_id: TaskId,
        from: Column,
        to: Column,
        position: u32,
        updates: usize,
        at: DateTime<Utc>,
    },
    /// A kanban move was applied locally, then undone because the
    /// service rejected it.
    MoveRolledBack {
        task_id: TaskId,
        reason: String,
        at: DateTime<Utc>,
    },
}

/// Receiver for [`Event`]s.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: Event) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::WindowChanged {
            view: View::Calendar,
            start: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "WindowChanged");
        assert_eq!(json["view"], "calendar");
        assert_eq!(json["end"], "2024-06-30");
    }

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink: Vec<Event> = Vec::new();
        let at = Utc::now();
        sink.emit(Event::MoveRolledBack {
            task_id: 1,
            reason: "a".into(),
            at,
        });
        sink.emit(Event::MoveRolledBack {
            task_id: 2,
            reason: "b".into(),
            at,
        });
        let ids: Vec<_> = sink
            .iter()
            .map(|e| match e {
                Event::MoveRolledBack { task_id, .. } => *task_id,
                _ => 0,
            })
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
