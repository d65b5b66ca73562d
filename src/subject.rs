//! Observer registry shared by all model types.
//!
//! A [`Subject`] owns an ordered list of listener callbacks. Broadcasting
//! iterates over a snapshot of that list, so a listener that subscribes or
//! unsubscribes during a broadcast never affects the broadcast in flight.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Opaque handle identifying one subscription on one [`Subject`].
///
/// Ids are never reused within a subject, so a stale handle passed to
/// [`Subject::unsubscribe`] is a harmless no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry<A> {
    id: ListenerId,
    callback: Rc<dyn Fn(&A)>,
}

/// Ordered listener registry with synchronous, snapshot-iterated broadcast.
pub struct Subject<A> {
    entries: RefCell<Vec<Entry<A>>>,
    next_id: Cell<u64>,
}

impl<A> Subject<A> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register `callback`; insertion order is invocation order.
    pub fn subscribe(&self, callback: impl Fn(&A) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries.borrow_mut().push(Entry {
            id,
            callback: Rc::new(callback),
        });
        id
    }

    /// Drop the subscription identified by `id`. Returns `false` (and does
    /// nothing) if the id is not currently registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|e| e.id == id) {
            Some(idx) => {
                entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Invoke every listener registered at the start of this call, in
    /// subscription order, passing `arg`. Completes before returning.
    pub fn notify(&self, arg: &A) {
        // Snapshot before invoking: the registry may change mid-broadcast.
        let snapshot: Vec<Rc<dyn Fn(&A)>> = self
            .entries
            .borrow()
            .iter()
            .map(|e| Rc::clone(&e.callback))
            .collect();
        for callback in snapshot {
            callback(arg);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<A> Default for Subject<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Subject<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_run_in_subscription_order() {
        let subject = Subject::<u32>::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let c = Rc::clone(&calls);
        subject.subscribe(move |v| c.borrow_mut().push(("first", *v)));
        let c = Rc::clone(&calls);
        subject.subscribe(move |v| c.borrow_mut().push(("second", *v)));

        subject.notify(&7);
        assert_eq!(*calls.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn unsubscribe_absent_id_is_a_noop() {
        let subject = Subject::<u32>::new();
        let id = subject.subscribe(|_| {});
        assert!(subject.unsubscribe(id));
        assert!(!subject.unsubscribe(id));
        assert_eq!(subject.len(), 0);
    }

    #[test]
    fn listener_removed_mid_broadcast_still_runs_this_broadcast() {
        let subject = Rc::new(Subject::<u32>::new());
        let calls = Rc::new(RefCell::new(Vec::new()));

        // The first listener removes the second one; the snapshot taken at
        // notify() time still includes it.
        let later = Rc::new(Cell::new(None::<ListenerId>));

        let s = Rc::clone(&subject);
        let l = Rc::clone(&later);
        let c = Rc::clone(&calls);
        subject.subscribe(move |_| {
            c.borrow_mut().push("remover");
            if let Some(id) = l.get() {
                s.unsubscribe(id);
            }
        });
        let c = Rc::clone(&calls);
        let id = subject.subscribe(move |_| c.borrow_mut().push("removed"));
        later.set(Some(id));

        subject.notify(&0);
        assert_eq!(*calls.borrow(), vec!["remover", "removed"]);

        // Next broadcast no longer sees the removed listener.
        calls.borrow_mut().clear();
        subject.notify(&0);
        assert_eq!(*calls.borrow(), vec!["remover"]);
    }

    #[test]
    fn listener_added_mid_broadcast_waits_for_next_broadcast() {
        let subject = Rc::new(Subject::<u32>::new());
        let calls = Rc::new(RefCell::new(Vec::new()));

        let s = Rc::clone(&subject);
        let c = Rc::clone(&calls);
        let added = Rc::new(Cell::new(false));
        let a = Rc::clone(&added);
        subject.subscribe(move |_| {
            c.borrow_mut().push("outer");
            if !a.get() {
                a.set(true);
                let c2 = Rc::clone(&c);
                s.subscribe(move |_| c2.borrow_mut().push("inner"));
            }
        });

        subject.notify(&0);
        assert_eq!(*calls.borrow(), vec!["outer"]);

        calls.borrow_mut().clear();
        subject.notify(&0);
        assert_eq!(*calls.borrow(), vec!["outer", "inner"]);
    }
}
