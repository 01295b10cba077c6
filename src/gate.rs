//! One-shot readiness gate and router host discovery
//!
//! Application code often needs the router before the host that owns it
//! exists (the page shell is still being set up). [`readiness`] returns a
//! signal/waiter pair: any number of waiters resolve together, once, when the
//! signal fires. [`RouterHost`] applies this to a [`NavigationController`].

use crate::controller::NavigationController;
use crate::error::RouterError;
use crate::{debug_log, warn_log};
use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};
use parking_lot::Mutex;
use std::fmt;

/// Firing side of a readiness gate
pub struct ReadySignal<T> {
    sender: Mutex<Option<oneshot::Sender<T>>>,
}

/// Waiting side of a readiness gate; clone it to wait from several places
pub struct WhenReady<T> {
    receiver: Shared<oneshot::Receiver<T>>,
}

/// Create a readiness gate carrying a value of type `T`
///
/// ```
/// let (signal, ready) = slot_navigator::readiness::<u8>();
/// let waiter = ready.clone();
///
/// signal.signal(7).unwrap();
/// assert_eq!(pollster::block_on(waiter.wait()), Ok(7));
/// assert!(ready.is_ready());
/// ```
pub fn readiness<T: Clone>() -> (ReadySignal<T>, WhenReady<T>) {
    let (sender, receiver) = oneshot::channel();
    (
        ReadySignal {
            sender: Mutex::new(Some(sender)),
        },
        WhenReady {
            receiver: receiver.shared(),
        },
    )
}

impl<T> ReadySignal<T> {
    /// Open the gate with `value`.
    ///
    /// Fails with [`RouterError::AlreadyReady`] on the second call. Firing
    /// after every waiter was dropped is not an error.
    pub fn signal(&self, value: T) -> Result<(), RouterError> {
        let sender = self.sender.lock().take().ok_or(RouterError::AlreadyReady)?;
        // No waiters left is fine; readiness is still consumed.
        let _ = sender.send(value);
        Ok(())
    }

    /// Check if the gate was already opened
    pub fn is_signalled(&self) -> bool {
        self.sender.lock().is_none()
    }
}

impl<T: Clone> WhenReady<T> {
    /// Wait for the gate to open.
    ///
    /// Fails with [`RouterError::HostUnavailable`] if the signal is dropped
    /// without firing.
    pub async fn wait(&self) -> Result<T, RouterError> {
        self.receiver
            .clone()
            .await
            .map_err(|_| RouterError::HostUnavailable)
    }

    /// Check if the gate already opened, without waiting
    pub fn is_ready(&self) -> bool {
        matches!(self.receiver.peek(), Some(Ok(_)))
    }
}

impl<T> Clone for WhenReady<T> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
        }
    }
}

impl<T> fmt::Debug for ReadySignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadySignal")
            .field("signalled", &self.is_signalled())
            .finish()
    }
}

impl<T> fmt::Debug for WhenReady<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhenReady").finish_non_exhaustive()
    }
}

// ============================================================================
// RouterHost
// ============================================================================

/// Place where the router lives once it is defined.
///
/// Code that wants to register routes waits on [`RouterHost::when_ready`];
/// the shell calls [`RouterHost::define`] once the controller exists.
///
/// ```
/// use slot_navigator::{EventBus, NavigationController, RouteDefinition, RouterHost, RouteTable};
///
/// let host = RouterHost::<&'static str>::new();
/// let ready = host.when_ready();
///
/// host.define(NavigationController::new(RouteTable::empty(), EventBus::new())).unwrap();
///
/// let router = pollster::block_on(ready.wait()).unwrap();
/// router.add(vec![RouteDefinition::component("", "home")]).unwrap();
/// assert_eq!(router.table().len(), 1);
/// ```
pub struct RouterHost<C> {
    signal: ReadySignal<NavigationController<C>>,
    ready: WhenReady<NavigationController<C>>,
}

impl<C> RouterHost<C> {
    pub fn new() -> Self {
        let (signal, ready) = readiness();
        Self { signal, ready }
    }

    /// Make `controller` available to everyone waiting on this host
    pub fn define(&self, controller: NavigationController<C>) -> Result<(), RouterError> {
        match self.signal.signal(controller) {
            Ok(()) => {
                debug_log!("Router host defined");
                Ok(())
            }
            Err(error) => {
                warn_log!("Router host defined twice");
                Err(error)
            }
        }
    }

    /// Future resolving to the controller once the host is defined
    pub fn when_ready(&self) -> WhenReady<NavigationController<C>> {
        self.ready.clone()
    }

    pub fn is_defined(&self) -> bool {
        self.signal.is_signalled()
    }
}

impl<C> Default for RouterHost<C> {
    fn default() -> Self {
        Self::new()
    }
}
