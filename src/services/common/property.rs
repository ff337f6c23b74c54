use std::fmt::Debug;

use futures::stream::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A reactive value with one writer and any number of readers.
///
/// Each watcher gets the current value immediately when subscribing and
/// again whenever it changes. Reads never block the writer.
#[derive(Clone)]
pub struct Property<T: Clone + Send + Sync + 'static> {
    tx: watch::Sender<T>,
    rx: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(initial: T) -> Self {
        let (tx, rx) = watch::channel(initial);
        Self { tx, rx }
    }

    /// Set a new value and notify all watchers.
    ///
    /// Only notifies if the value is different. Crate-private so that the
    /// owning controller stays the only writer.
    pub(crate) fn set(&self, new_value: T)
    where
        T: PartialEq,
    {
        let _ = self.tx.send_if_modified(|current| {
            if *current != new_value {
                *current = new_value;
                true
            } else {
                false
            }
        });
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Read the current value in place without cloning it.
    ///
    /// The closure must not block; the writer waits for the borrow to end.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.rx.borrow())
    }

    /// Watch for changes to this property.
    pub fn watch(&self) -> impl Stream<Item = T> + Send {
        WatchStream::new(self.rx.clone())
    }
}

impl<T: Clone + Send + Sync + Debug + 'static> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("value", &*self.rx.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[test]
    fn set_skips_equal_values() {
        let property = Property::new(1);
        let mut rx = property.tx.subscribe();

        property.set(1);
        assert!(!rx.has_changed().unwrap());

        property.set(2);
        assert!(rx.has_changed().unwrap());
        assert_eq!(property.get(), 2);
    }

    #[test]
    fn with_reads_without_clone() {
        let property = Property::new(String::from("title"));
        assert_eq!(property.with(|s| s.len()), 5);
    }

    #[tokio::test]
    async fn watch_yields_current_then_updates() {
        let property = Property::new(0u64);
        let mut stream = Box::pin(property.watch());

        assert_eq!(stream.next().await, Some(0));
        property.set(7);
        assert_eq!(stream.next().await, Some(7));
    }
}
