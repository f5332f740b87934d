//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free progress bars drawn on stderr

use crate::core::events::{EventSink, ReleaseEvent};
use linya::{Bar, Progress};

/// Draws one bar over the release order, then forwards every event
///
/// The bar appears once the order is known and advances per finished module.
pub struct ProgressSink<S> {
  inner: S,
  progress: Progress,
  bar: Option<Bar>,
}

impl<S: EventSink> ProgressSink<S> {
  pub fn new(inner: S) -> Self {
    Self {
      inner,
      progress: Progress::new(),
      bar: None,
    }
  }

  /// Unwrap the forwarded sink
  pub fn into_inner(self) -> S {
    self.inner
  }
}

impl<S: EventSink> EventSink for ProgressSink<S> {
  fn emit(&mut self, event: ReleaseEvent) {
    match &event {
      ReleaseEvent::OrderResolved { order } if self.bar.is_none() => {
        self.bar = Some(self.progress.bar(order.len(), "Releasing modules"));
      }
      ReleaseEvent::ModuleUpdated { .. } => {
        if let Some(bar) = &self.bar {
          self.progress.inc_and_draw(bar, 1);
        }
      }
      _ => {}
    }
    self.inner.emit(event);
  }
}
