use std::sync::Arc;

use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::storage::snapshot_store::SnapshotStore;

/// Newsletter subscriptions over the snapshot store.
#[derive(Clone)]
pub struct NewsletterService {
    store: Arc<SnapshotStore>,
}

impl NewsletterService {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    /// Subscribe an email. Uniqueness is enforced at insertion, inside the
    /// same store update that appends the entry.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn subscribe(&self, email: String) -> Result<(), ServiceError> {
        self.store
            .update(|snapshot| {
                if snapshot.is_subscribed(&email) {
                    return Err(ServiceError::DuplicateSubscriber);
                }
                snapshot.newsletter.push(email.clone());
                Ok(())
            })
            .await?;

        info!("newsletter_subscribed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::snapshot_store::StoreOptions;
    use uuid::Uuid;

    #[tokio::test]
    async fn second_subscription_rejected_and_stored_once() -> Result<(), anyhow::Error> {
        let path = std::env::temp_dir().join(format!("newsletter_{}", Uuid::new_v4())).join("db.json");
        let store = SnapshotStore::open(&path, StoreOptions::default()).await?;
        let svc = NewsletterService::new(Arc::clone(&store));

        svc.subscribe("a@b.com".into()).await?;
        let res = svc.subscribe("a@b.com".into()).await;
        assert!(matches!(res, Err(ServiceError::DuplicateSubscriber)));

        let count = store.read(|s| s.newsletter.iter().filter(|e| *e == "a@b.com").count()).await;
        assert_eq!(count, 1);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }
}
