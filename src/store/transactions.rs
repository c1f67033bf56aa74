//! The client-side cache of transactions.

use crate::{
    Error,
    database_id::TransactionId,
    store::{NoticeLog, TransactionBackend},
    transaction::{Transaction, TransactionInput, TransactionPatch},
};

/// A cached list of transactions kept in step with a [TransactionBackend].
///
/// Mutations take `&mut self`, so there is only ever one writer. The cache is
/// not reconciled with the server beyond merging the response of each call.
#[derive(Debug)]
pub struct TransactionStore<B> {
    backend: B,
    transactions: Vec<Transaction>,
    refresh_flag: bool,
    notices: NoticeLog,
}

impl<B: TransactionBackend> TransactionStore<B> {
    /// Create an empty store. Call [TransactionStore::refresh] to load the transactions.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            transactions: Vec::new(),
            refresh_flag: false,
            notices: NoticeLog::default(),
        }
    }

    /// The cached transactions, newest first as of the last refresh.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Flips on every call to [TransactionStore::refresh].
    pub fn refresh_flag(&self) -> bool {
        self.refresh_flag
    }

    /// The notices recorded by this store.
    pub fn notices(&self) -> &NoticeLog {
        &self.notices
    }

    /// Mutable access to the notices, e.g. to take them once shown.
    pub fn notices_mut(&mut self) -> &mut NoticeLog {
        &mut self.notices
    }

    /// Replace the cache with the backend's transactions.
    ///
    /// # Errors
    /// Returns the backend error. The cache keeps its previous contents.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.refresh_flag = !self.refresh_flag;

        match self.backend.list_transactions().await {
            Ok(transactions) => {
                self.transactions = transactions;
                Ok(())
            }
            Err(error) => {
                self.notices.error("Failed to load transactions");
                Err(error)
            }
        }
    }

    /// Create a transaction and add it to the front of the cache.
    ///
    /// # Errors
    /// Returns the backend error, e.g. a validation error. The cache is not changed.
    pub async fn add(&mut self, input: TransactionInput) -> Result<Transaction, Error> {
        match self.backend.create_transaction(input).await {
            Ok(transaction) => {
                self.transactions.insert(0, transaction.clone());
                self.notices.success("Transaction added successfully");
                Ok(transaction)
            }
            Err(error) => {
                self.notices.error("Failed to add transaction");
                Err(error)
            }
        }
    }

    /// Edit a transaction and replace the cached copy with the result.
    ///
    /// # Errors
    /// Returns the backend error. The cache is not changed.
    pub async fn update(
        &mut self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error> {
        match self.backend.update_transaction(id, patch).await {
            Ok(updated) => {
                for transaction in self.transactions.iter_mut() {
                    if transaction.id == updated.id {
                        *transaction = updated.clone();
                    }
                }
                self.notices.success("Transaction updated successfully");
                Ok(updated)
            }
            Err(error) => {
                self.notices.error("Failed to update transaction");
                Err(error)
            }
        }
    }

    /// Delete a transaction and drop it from the cache.
    ///
    /// # Errors
    /// Returns the backend error. The cache is not changed.
    pub async fn remove(&mut self, id: TransactionId) -> Result<(), Error> {
        match self.backend.delete_transaction(id).await {
            Ok(()) => {
                self.transactions.retain(|transaction| transaction.id != id);
                self.notices.success("Transaction deleted successfully");
                Ok(())
            }
            Err(error) => {
                self.notices.error("Failed to delete transaction");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        category::{Category, TransactionKind},
        database_id::TransactionId,
        store::{LocalBackend, NoticeKind, TransactionBackend, TransactionStore},
        test_utils::get_shared_test_connection,
        transaction::{Transaction, TransactionInput, TransactionPatch},
    };

    fn get_store() -> TransactionStore<LocalBackend> {
        let backend = LocalBackend::new(get_shared_test_connection(), "Etc/UTC")
            .expect("Could not create backend");

        TransactionStore::new(backend)
    }

    /// A backend whose calls always fail.
    struct FailingBackend;

    impl TransactionBackend for FailingBackend {
        async fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
            Err(Error::DatabaseLockError)
        }

        async fn create_transaction(&self, _: TransactionInput) -> Result<Transaction, Error> {
            Err(Error::DatabaseLockError)
        }

        async fn update_transaction(
            &self,
            _: TransactionId,
            _: TransactionPatch,
        ) -> Result<Transaction, Error> {
            Err(Error::DatabaseLockError)
        }

        async fn delete_transaction(&self, _: TransactionId) -> Result<(), Error> {
            Err(Error::DatabaseLockError)
        }
    }

    fn food(amount: f64) -> TransactionInput {
        TransactionInput::new(amount, TransactionKind::Expense, Category::Food)
    }

    #[tokio::test]
    async fn add_prepends_to_cache() {
        let mut store = get_store();

        let first = store.add(food(1.0)).await.unwrap();
        let second = store.add(food(2.0)).await.unwrap();

        assert_eq!(store.transactions(), &[second, first]);
        assert_eq!(
            store.notices().last().map(|notice| notice.kind),
            Some(NoticeKind::Success)
        );
    }

    #[tokio::test]
    async fn refresh_loads_from_backend_and_flips_flag() {
        let mut store = get_store();
        store.add(food(1.0)).await.unwrap();
        let flag = store.refresh_flag();

        store.refresh().await.expect("Could not refresh");

        assert_eq!(store.transactions().len(), 1);
        assert_ne!(store.refresh_flag(), flag);
    }

    #[tokio::test]
    async fn update_replaces_cached_record() {
        let mut store = get_store();
        let transaction = store.add(food(1.0)).await.unwrap();

        let updated = store
            .update(transaction.id, TransactionPatch::default().amount(9.0))
            .await
            .unwrap();

        assert_eq!(store.transactions(), &[updated]);
        assert_eq!(store.transactions()[0].amount, 9.0);
    }

    #[tokio::test]
    async fn invalid_update_leaves_cache_unchanged() {
        let mut store = get_store();
        let transaction = store.add(food(1.0)).await.unwrap();

        let result = store
            .update(
                transaction.id,
                TransactionPatch {
                    kind: Some("income".to_owned()),
                    ..Default::default()
                },
            )
            .await;

        assert!(result.is_err());
        assert_eq!(store.transactions(), &[transaction]);
        assert_eq!(
            store.notices().last().map(|notice| notice.kind),
            Some(NoticeKind::Error)
        );
    }

    #[tokio::test]
    async fn remove_drops_from_cache() {
        let mut store = get_store();
        let keep = store.add(food(1.0)).await.unwrap();
        let removed = store.add(food(2.0)).await.unwrap();

        store.remove(removed.id).await.unwrap();

        assert_eq!(store.transactions(), &[keep]);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_last_known_good_cache() {
        let mut store = get_store();
        let transaction = store.add(food(1.0)).await.unwrap();
        let mut failing = TransactionStore::new(FailingBackend);
        failing.transactions = vec![transaction.clone()];

        let result = failing.refresh().await;

        assert_eq!(result, Err(Error::DatabaseLockError));
        assert_eq!(failing.transactions(), &[transaction]);
        assert_eq!(
            failing.notices().last().map(|notice| notice.message.as_str()),
            Some("Failed to load transactions")
        );
    }

    #[tokio::test]
    async fn failed_add_does_not_touch_cache() {
        let mut store = TransactionStore::new(FailingBackend);

        let result = store.add(food(1.0)).await;

        assert!(result.is_err());
        assert!(store.transactions().is_empty());
        assert_eq!(store.notices().notices().len(), 1);
    }
}
