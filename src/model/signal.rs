//! Ordered, in-process multicast with mute support.
//!
//! All methods take `&self` so a signal can be shared (`Rc<Signal<_>>`) and
//! handlers may connect or disconnect during an emission. Emission iterates
//! over a snapshot of the connection table taken when it starts: handlers
//! connected mid-emission run from the next emission on, handlers
//! disconnected mid-emission still see the in-flight one.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Token returned by [`Signal::connect`].
    pub struct SubscriptionId;
}

type Handler<A> = Rc<dyn Fn(&A)>;

pub struct Signal<A> {
    handlers: RefCell<SlotMap<SubscriptionId, Handler<A>>>,
    order: RefCell<Vec<SubscriptionId>>,
    muted: Cell<bool>,
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self {
            handlers: RefCell::new(SlotMap::with_key()),
            order: RefCell::new(Vec::new()),
            muted: Cell::new(false),
        }
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.order.borrow().len())
            .field("muted", &self.muted.get())
            .finish()
    }
}

impl<A> Signal<A> {
    pub fn new() -> Self { Self::default() }

    pub fn connect(&self, handler: impl Fn(&A) + 'static) -> SubscriptionId {
        let id = self.handlers.borrow_mut().insert(Rc::new(handler));
        self.order.borrow_mut().push(id);
        id
    }

    /// Returns false if the token was not connected.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        if self.handlers.borrow_mut().remove(id).is_none() {
            return false;
        }
        self.order.borrow_mut().retain(|&other| other != id);
        true
    }

    pub fn handler_count(&self) -> usize { self.order.borrow().len() }

    pub fn set_muted(&self, muted: bool) { self.muted.set(muted); }

    pub fn is_muted(&self) -> bool { self.muted.get() }

    /// Invokes every connected handler in registration order. Returns the
    /// number of handlers invoked.
    pub fn emit(&self, args: &A) -> usize {
        if self.muted.get() {
            return 0;
        }
        let snapshot: Vec<Handler<A>> = {
            let handlers = self.handlers.borrow();
            self.order.borrow().iter().filter_map(|id| handlers.get(*id).cloned()).collect()
        };
        for handler in &snapshot {
            handler(args);
        }
        snapshot.len()
    }
}
