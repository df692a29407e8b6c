// Copyright (c) 2024 Mike Tsao

//! The channel plumbing shared by services.

use crossbeam::channel::{Receiver, Sender};

/// Both halves of an unbounded crossbeam channel. A service owns one of these
/// for its inputs and one for its events.
#[derive(Debug)]
pub struct CrossbeamChannel<T> {
    #[allow(missing_docs)]
    pub sender: Sender<T>,
    #[allow(missing_docs)]
    pub receiver: Receiver<T>,
}
impl<T> Default for CrossbeamChannel<T> {
    fn default() -> Self {
        let (sender, receiver) = crossbeam::channel::unbounded();
        Self { sender, receiver }
    }
}

/// A service runs on its own thread and talks to clients only through
/// channels. Clients send it Inputs (`I`) and listen for Events (`E`).
///
/// Senders and receivers are cheap to clone. A client typically clones both
/// right after creating the service, then keeps the service itself alive only
/// so that its thread isn't orphaned.
pub trait ProvidesService<I: core::fmt::Debug, E: core::fmt::Debug> {
    /// Where Inputs go.
    fn sender(&self) -> &Sender<I>;

    /// Sends an Input, logging rather than failing if the service is gone.
    fn send_input(&self, input: I) {
        if let Err(e) = self.sender().try_send(input) {
            log::warn!("While sending: {e:?}");
        }
    }

    /// Where Events come from.
    fn receiver(&self) -> &Receiver<E>;
}
