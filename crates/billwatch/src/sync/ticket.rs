//! In-flight fetch deduplication.
//!
//! A [`TicketTable`] maps a key to the single outstanding fetch for it. The
//! first caller for a key becomes the [`TicketOwner`]; everyone arriving
//! before the owner resolves gets a receiver for the same outcome. The table
//! lock is never held across an await.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

type Slot<T> = watch::Receiver<Option<T>>;

/// Table of outstanding fetches keyed by `K`, resolving to `T`.
pub struct TicketTable<K, T> {
    tickets: Arc<Mutex<HashMap<K, Slot<T>>>>,
}

impl<K, T> Clone for TicketTable<K, T> {
    fn clone(&self) -> Self {
        Self {
            tickets: self.tickets.clone(),
        }
    }
}

impl<K, T> Default for TicketTable<K, T> {
    fn default() -> Self {
        Self {
            tickets: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// Result of joining a ticket table.
pub enum Ticket<K: Eq + Hash, T> {
    /// The caller must perform the fetch and resolve the ticket.
    Owner(TicketOwner<K, T>),
    /// Another fetch is already in flight.
    Waiter(TicketWaiter<T>),
}

impl<K, T> TicketTable<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches to the outstanding ticket for `key`, or creates one.
    pub fn join(&self, key: K) -> Ticket<K, T> {
        let mut tickets = self.tickets.lock();

        if let Some(slot) = tickets.get(&key) {
            // A closed sender means the owner went away without resolving.
            if slot.has_changed().is_ok() {
                return Ticket::Waiter(TicketWaiter { slot: slot.clone() });
            }
        }

        let (sender, slot) = watch::channel(None);
        tickets.insert(key.clone(), slot);

        Ticket::Owner(TicketOwner {
            key,
            sender: Some(sender),
            table: self.clone(),
        })
    }

    /// Number of outstanding tickets.
    pub fn len(&self) -> usize {
        self.tickets.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle held by the caller responsible for the fetch.
///
/// Dropping an owner without calling [`TicketOwner::resolve`] removes the
/// ticket and wakes waiters with [`Abandoned`].
pub struct TicketOwner<K: Eq + Hash, T> {
    key: K,
    sender: Option<watch::Sender<Option<T>>>,
    table: TicketTable<K, T>,
}

impl<K: Eq + Hash, T> TicketOwner<K, T> {
    /// A waiter for this owner's own outcome.
    pub fn waiter(&self) -> TicketWaiter<T> {
        let slot = match &self.sender {
            Some(sender) => sender.subscribe(),
            // Unreachable: the sender is only taken by `resolve`, which consumes self.
            None => watch::channel(None).1,
        };
        TicketWaiter { slot }
    }

    /// Publishes the outcome to every waiter and destroys the ticket.
    pub fn resolve(mut self, outcome: T) {
        let mut tickets = self.table.tickets.lock();
        tickets.remove(&self.key);
        if let Some(sender) = self.sender.take() {
            sender.send_replace(Some(outcome));
        }
    }
}

impl<K: Eq + Hash, T> Drop for TicketOwner<K, T> {
    fn drop(&mut self) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        let mut tickets = self.table.tickets.lock();
        let ours = tickets
            .get(&self.key)
            .is_some_and(|slot| slot.same_channel(&sender.subscribe()));
        if ours {
            tickets.remove(&self.key);
        }
    }
}

/// The owner dropped its ticket without publishing an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abandoned;

/// A caller suspended on someone else's fetch.
pub struct TicketWaiter<T> {
    slot: Slot<T>,
}

impl<T: Clone> TicketWaiter<T> {
    /// Waits for the ticket to resolve.
    pub async fn outcome(mut self) -> Result<T, Abandoned> {
        let resolved = self
            .slot
            .wait_for(Option::is_some)
            .await
            .map_err(|_| Abandoned)?;
        (*resolved).clone().ok_or(Abandoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_owner<K: Eq + Hash, T>(ticket: Ticket<K, T>) -> TicketOwner<K, T> {
        match ticket {
            Ticket::Owner(owner) => owner,
            Ticket::Waiter(_) => panic!("expected to own the ticket"),
        }
    }

    fn expect_waiter<K: Eq + Hash, T>(ticket: Ticket<K, T>) -> TicketWaiter<T> {
        match ticket {
            Ticket::Waiter(waiter) => waiter,
            Ticket::Owner(_) => panic!("expected to wait on the ticket"),
        }
    }

    #[tokio::test]
    async fn test_first_caller_owns_rest_wait() {
        let table: TicketTable<&str, u32> = TicketTable::new();

        let owner = expect_owner(table.join("AB-1"));
        let first = expect_waiter(table.join("AB-1"));
        let second = expect_waiter(table.join("AB-1"));
        assert_eq!(table.len(), 1);

        owner.resolve(7);

        assert_eq!(first.outcome().await, Ok(7));
        assert_eq!(second.outcome().await, Ok(7));
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let table: TicketTable<&str, u32> = TicketTable::new();

        let _a = expect_owner(table.join("AB-1"));
        let _b = expect_owner(table.join("AB-2"));

        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn test_owner_waiter_sees_outcome() {
        let table: TicketTable<&str, u32> = TicketTable::new();
        let owner = expect_owner(table.join("AB-1"));
        let own = owner.waiter();

        let handle = tokio::spawn(async move { own.outcome().await });
        owner.resolve(3);

        assert_eq!(handle.await.unwrap(), Ok(3));
    }

    #[tokio::test]
    async fn test_new_ticket_after_resolution() {
        let table: TicketTable<&str, u32> = TicketTable::new();

        expect_owner(table.join("AB-1")).resolve(1);

        let owner = expect_owner(table.join("AB-1"));
        owner.resolve(2);
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_owner_abandons_waiters() {
        let table: TicketTable<&str, u32> = TicketTable::new();
        let owner = expect_owner(table.join("AB-1"));
        let waiter = expect_waiter(table.join("AB-1"));

        drop(owner);

        assert_eq!(waiter.outcome().await, Err(Abandoned));
        assert!(table.is_empty());
        expect_owner(table.join("AB-1"));
    }

    #[tokio::test]
    async fn test_dropping_waiter_does_not_cancel() {
        let table: TicketTable<&str, u32> = TicketTable::new();
        let owner = expect_owner(table.join("AB-1"));
        let gone = expect_waiter(table.join("AB-1"));
        let stays = expect_waiter(table.join("AB-1"));

        drop(gone);
        owner.resolve(5);

        assert_eq!(stays.outcome().await, Ok(5));
    }
}
