//! Gameplay signal bus.

use feles_core::{EntityId, Signal};

/// Receives gameplay signals delivered at the end of each tick.
pub trait SignalObserver {
    /// Handles one raised signal.
    fn handle_signal(&mut self, signal: Signal, source: Option<EntityId>);
}

/// Queues raised signals until the tick delivers them.
#[derive(Default)]
pub(crate) struct SignalBus {
    pending: Vec<(Signal, Option<EntityId>)>,
    counts: [u32; Signal::COUNT],
    observers: [Vec<Box<dyn SignalObserver>>; Signal::COUNT],
}

impl SignalBus {
    pub(crate) fn raise(&mut self, signal: Signal, source: Option<EntityId>) {
        self.counts[signal.index()] += 1;
        self.pending.push((signal, source));
    }

    pub(crate) fn listen(&mut self, signal: Signal, observer: Box<dyn SignalObserver>) {
        self.observers[signal.index()].push(observer);
    }

    /// Times `signal` was raised this session.
    pub(crate) const fn count(&self, signal: Signal) -> u32 {
        self.counts[signal.index()]
    }

    /// Takes every pending signal after handing each to its observers.
    pub(crate) fn deliver(&mut self) -> Vec<(Signal, Option<EntityId>)> {
        let pending = std::mem::take(&mut self.pending);
        for &(signal, source) in &pending {
            for observer in &mut self.observers[signal.index()] {
                observer.handle_signal(signal, source);
            }
        }
        pending
    }
}

impl std::fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalBus")
            .field("pending", &self.pending)
            .field("counts", &self.counts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    struct Recorder(Rc<RefCell<Vec<Signal>>>);

    impl SignalObserver for Recorder {
        fn handle_signal(&mut self, signal: Signal, _source: Option<EntityId>) {
            self.0.borrow_mut().push(signal);
        }
    }

    #[test]
    fn observers_only_hear_their_signal() {
        let heard = Rc::new(RefCell::new(Vec::new()));
        let mut bus = SignalBus::default();
        bus.listen(Signal::CatRule, Box::new(Recorder(Rc::clone(&heard))));

        bus.raise(Signal::PlayerShot, None);
        bus.raise(Signal::CatRule, Some(EntityId::new(4)));
        let delivered = bus.deliver();

        assert_eq!(delivered.len(), 2);
        assert_eq!(*heard.borrow(), vec![Signal::CatRule]);
        assert_eq!(bus.count(Signal::CatRule), 1);
        assert!(bus.deliver().is_empty());
    }
}
