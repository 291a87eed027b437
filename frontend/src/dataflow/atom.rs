//! Local UI state such as form fields and open dialogs.

use crate::dataflow::{Actor, Relay, relay};
use futures::StreamExt;
use zoon::Signal;

#[derive(Clone)]
enum AtomUpdate<T> {
    Set(T),
    Map(fn(&T) -> T),
}

/// An [`Actor`] with a built-in setter relay, for state that belongs to one view.
#[derive(Clone)]
pub struct Atom<T>
where
    T: Clone + Send + Sync + 'static,
{
    actor: Actor<T>,
    setter: Relay<AtomUpdate<T>>,
}

impl<T> Atom<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (setter, mut setter_stream) = relay();

        let actor = Actor::new(initial, async move |state| {
            while let Some(update) = setter_stream.next().await {
                match update {
                    AtomUpdate::Set(value) => state.set_neq(value),
                    AtomUpdate::Map(f) => {
                        let next = f(&state.lock_ref());
                        state.set_neq(next);
                    }
                }
            }
        });

        Self { actor, setter }
    }

    pub fn set(&self, value: T) {
        self.setter.send(AtomUpdate::Set(value));
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.actor.signal()
    }

    pub fn get_cloned(&self) -> T {
        self.actor.get_cloned()
    }
}

impl Atom<bool> {
    pub fn toggle(&self) {
        self.setter.send(AtomUpdate::Map(|open| !open));
    }
}

impl<T> Default for Atom<T>
where
    T: Clone + Default + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle() {
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn set_and_toggle() {
        let note = Atom::new(String::new());
        let dialog_open = Atom::new(false);
        settle().await;

        note.set("pump warm".to_string());
        dialog_open.toggle();
        dialog_open.toggle();
        dialog_open.toggle();
        settle().await;

        assert_eq!(note.get_cloned(), "pump warm");
        assert!(dialog_open.get_cloned());
    }
}
