use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::storage::snapshot::User;
use crate::storage::snapshot_store::SnapshotStore;

/// Public view of an account; the stored password never leaves the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountUser {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&User> for AccountUser {
    fn from(u: &User) -> Self {
        Self { email: u.email.clone(), name: u.name.clone() }
    }
}

/// Account workflows over the snapshot store.
#[derive(Clone)]
pub struct AccountsService {
    store: Arc<SnapshotStore>,
}

impl AccountsService {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    /// Register a new account. Email is the unique key; matching is exact and
    /// case-sensitive. The duplicate check and the insert run inside one
    /// store update, so two racing signups cannot both pass the check.
    #[instrument(skip(self, password, name), fields(email = %email))]
    pub async fn signup(
        &self,
        email: String,
        password: String,
        name: Option<String>,
    ) -> Result<AccountUser, ServiceError> {
        let user = self
            .store
            .update(|snapshot| {
                if snapshot.user_by_email(&email).is_some() {
                    return Err(ServiceError::DuplicateUser);
                }
                let user = User {
                    email: email.clone(),
                    password: password.clone(),
                    name: name.clone(),
                    created_at: Utc::now(),
                };
                snapshot.users.push(user.clone());
                Ok(user)
            })
            .await?;

        info!(email = %user.email, "user_registered");
        Ok(AccountUser::from(&user))
    }

    /// Authenticate with the primary credential match only: exact email plus
    /// exact plain-text password.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AccountUser, ServiceError> {
        self.store
            .read(|snapshot| {
                snapshot
                    .users
                    .iter()
                    .find(|u| u.email == email && u.password == password)
                    .map(AccountUser::from)
            })
            .await
            .ok_or(ServiceError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::snapshot_store::StoreOptions;
    use uuid::Uuid;

    async fn setup() -> (Arc<SnapshotStore>, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("accounts_{}", Uuid::new_v4())).join("db.json");
        let store = SnapshotStore::open(&path, StoreOptions::default()).await.expect("store open");
        (store, path)
    }

    #[tokio::test]
    async fn signup_adds_exactly_one_user_per_distinct_email() -> Result<(), anyhow::Error> {
        let (store, path) = setup().await;
        let svc = AccountsService::new(Arc::clone(&store));

        svc.signup("a@b.com".into(), "pw1".into(), Some("Ann".into())).await?;
        svc.signup("c@d.com".into(), "pw2".into(), None).await?;
        assert_eq!(store.read(|s| s.users.len()).await, 2);

        let found = store.read(|s| s.user_by_email("a@b.com").cloned()).await.unwrap();
        assert_eq!(found.name.as_deref(), Some("Ann"));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_signup_rejected_and_count_unchanged() -> Result<(), anyhow::Error> {
        let (store, path) = setup().await;
        let svc = AccountsService::new(Arc::clone(&store));

        svc.signup("a@b.com".into(), "pw1".into(), None).await?;
        let res = svc.signup("a@b.com".into(), "other".into(), None).await;
        assert!(matches!(res, Err(ServiceError::DuplicateUser)));
        assert_eq!(store.read(|s| s.users.len()).await, 1);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn login_matches_only_exact_credentials() -> Result<(), anyhow::Error> {
        let (store, path) = setup().await;
        let svc = AccountsService::new(Arc::clone(&store));

        svc.signup("a@b.com".into(), "pw1".into(), Some("Ann".into())).await?;

        let user = svc.login("a@b.com", "pw1").await?;
        assert_eq!(user.name.as_deref(), Some("Ann"));

        assert!(matches!(svc.login("a@b.com", "wrong").await, Err(ServiceError::Unauthorized)));
        assert!(matches!(svc.login("nobody@b.com", "pw1").await, Err(ServiceError::Unauthorized)));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn signup_survives_reopen() -> Result<(), anyhow::Error> {
        let (store, path) = setup().await;
        AccountsService::new(store).signup("a@b.com".into(), "pw1".into(), None).await?;

        let reloaded = SnapshotStore::open(&path, StoreOptions::default()).await?;
        let svc = AccountsService::new(reloaded);
        let user = svc.login("a@b.com", "pw1").await?;
        assert_eq!(user.email, "a@b.com");

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }
}
