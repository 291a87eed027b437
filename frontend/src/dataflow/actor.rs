//! Single-value actor: one task owns the state and applies events to it in order.

use std::future::Future;
use std::sync::Arc;

use zoon::{Mutable, Signal, Task, TaskHandle};

/// Reactive state container mutated only by its own processing task.
///
/// The UI reads the state through [`Actor::signal`] and friends and talks to
/// the task through relays. Dropping the last clone cancels the task.
///
/// ```rust,ignore
/// let (command_relay, mut command_stream) = relay();
/// let counter = Actor::new(0, async move |state| {
///     while let Some(amount) = command_stream.next().await {
///         state.update_mut(|count| *count += amount);
///     }
/// });
/// command_relay.send(5);
/// ```
#[derive(Clone, Debug)]
pub struct Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    state: Mutable<T>,
    #[allow(dead_code)]
    task_handle: Arc<TaskHandle>,
}

impl<T> Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(initial_state: T, processor: F) -> Self
    where
        F: FnOnce(Mutable<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = Mutable::new(initial_state);
        let task_handle = Arc::new(Task::start_droppable(processor(state.clone())));
        Self { state, task_handle }
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.state.signal_cloned()
    }

    /// Maps the state by reference; use it for large state such as the whole store.
    pub fn signal_ref<U>(
        &self,
        f: impl Fn(&T) -> U + Send + Sync + 'static,
    ) -> impl Signal<Item = U> + use<T, U>
    where
        U: PartialEq + Send + Sync + 'static,
    {
        self.state.signal_ref(f)
    }

    /// Current value for one-off reads in event handlers.
    pub fn get_cloned(&self) -> T {
        self.state.get_cloned()
    }

    /// Reads part of the current value without cloning the rest.
    pub fn read<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        f(&self.state.lock_ref())
    }
}
