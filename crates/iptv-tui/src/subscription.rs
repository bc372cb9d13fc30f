//! Store subscriptions: forward watch-cell changes into the event loop.
//!
//! Each stream gets a task that pushes the current value immediately and then
//! every change. `release` aborts the tasks; dropping `Subscriptions` does the
//! same.

use iptv_proto::channel::Channel;
use iptv_proto::store::StoreHandle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Favorites(Vec<String>),
    ActiveChannel(Option<Channel>),
}

pub struct Subscriptions {
    handles: Vec<JoinHandle<()>>,
}

impl Subscriptions {
    pub fn attach(store: &StoreHandle, tx: mpsc::Sender<StoreEvent>) -> Self {
        let handles = vec![
            forward(store.favorites(), tx.clone(), StoreEvent::Favorites),
            forward(store.active_channel(), tx, StoreEvent::ActiveChannel),
        ];
        Self { handles }
    }

    pub fn is_attached(&self) -> bool {
        !self.handles.is_empty()
    }

    pub fn release(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        debug!("releasing {} store subscriptions", self.handles.len());
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.release();
    }
}

fn forward<T>(
    mut rx: watch::Receiver<T>,
    tx: mpsc::Sender<StoreEvent>,
    wrap: fn(T) -> StoreEvent,
) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        loop {
            let value = rx.borrow_and_update().clone();
            if tx.send(wrap(value)).await.is_err() {
                break;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use iptv_proto::store::{Store, StoreIntent};

    #[tokio::test]
    async fn test_initial_values_then_changes() {
        let (store, handle, _intents) = Store::new(vec!["u1".into()]);
        let (tx, mut rx) = mpsc::channel(16);
        let _subs = Subscriptions::attach(&handle, tx);

        let mut first = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
        first.sort_by_key(|e| matches!(e, StoreEvent::ActiveChannel(_)));
        assert_eq!(first[0], StoreEvent::Favorites(vec!["u1".into()]));
        assert_eq!(first[1], StoreEvent::ActiveChannel(None));

        let ch = Channel::new("ch42", "News", "u42");
        store.apply(StoreIntent::SetActiveChannel(ch.clone()));
        assert_eq!(rx.recv().await, Some(StoreEvent::ActiveChannel(Some(ch))));
    }

    #[tokio::test]
    async fn test_release_severs_delivery() {
        let (store, handle, _intents) = Store::new(vec![]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut subs = Subscriptions::attach(&handle, tx);
        rx.recv().await.unwrap();
        rx.recv().await.unwrap();

        subs.release();
        assert!(!subs.is_attached());
        store.apply(StoreIntent::UpdateFavorites(Channel::new("1", "A", "u1")));

        // Aborted tasks drop their senders, so the channel closes empty.
        assert_eq!(rx.recv().await, None);
    }
}
