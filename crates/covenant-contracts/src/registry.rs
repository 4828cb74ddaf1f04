//! Thread-local queue of pending annotations.
//!
//! Declarations buffer here between a declaration call and the next
//! definition event on the same thread. The queue is partitioned per thread:
//! a method defined on thread B can never pick up annotations declared on
//! thread A, and no locking is needed.

use std::cell::RefCell;

use crate::annotations::Annotation;

thread_local! {
    static PENDING: RefCell<Vec<Annotation>> = const { RefCell::new(Vec::new()) };
}

/// Queues `annotation` for the next method defined on this thread.
///
/// If no definition event follows on this thread, the queued annotation is
/// silently orphaned. [`crate::method::ContractBuilder`] attaches annotations
/// at the definition site and has no such failure mode; prefer it when the
/// declaration and the definition live in the same expression.
pub fn declare(annotation: Annotation) {
    PENDING.with(|pending| pending.borrow_mut().push(annotation));
}

/// Takes and clears this thread's pending queue, or `None` when nothing was
/// declared. Called exactly once per definition event, before the wrapper is
/// built, so later unrelated definitions are never annotated by accident.
pub fn consume() -> Option<Vec<Annotation>> {
    PENDING.with(|pending| {
        let drained = std::mem::take(&mut *pending.borrow_mut());
        if drained.is_empty() {
            None
        } else {
            Some(drained)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::nothrow;

    #[test]
    fn consume_takes_and_clears() {
        assert!(consume().is_none());

        declare(nothrow());
        declare(nothrow());
        let drained = consume().expect("two pending annotations");
        assert_eq!(drained.len(), 2);

        assert!(consume().is_none());
    }

    #[test]
    fn declarations_stay_on_their_thread() {
        declare(nothrow());

        let other = std::thread::spawn(|| consume().is_none())
            .join()
            .unwrap();
        assert!(other, "another thread must not see this thread's queue");

        assert_eq!(consume().map(|a| a.len()), Some(1));
    }
}
