use crossbeam::channel::Sender;

use crate::events::Event;

/// Receiver of interaction events — the dependency-injected channel through
/// which the surrounding application learns that a mutation occurred (and,
/// e.g., owes a save). Implemented for crossbeam senders; wrap plain closures
/// in [`FnSink`].
pub trait EventSink {
    fn send(&self, event: Event);
}

impl EventSink for Sender<Event> {
    fn send(&self, event: Event) {
        let _ = Sender::send(self, event);
    }
}

/// Adapter implementing [`EventSink`] for a plain closure.
pub struct FnSink<F: Fn(Event)>(pub F);

impl<F: Fn(Event)> EventSink for FnSink<F> {
    fn send(&self, event: Event) {
        (self.0)(event);
    }
}
