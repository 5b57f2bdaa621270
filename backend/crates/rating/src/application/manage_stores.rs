//! Store Administration Use Cases
//!
//! ADMIN-only creation, update and deletion of stores. An owner, when
//! assigned, must be an existing STORE_OWNER who does not already own
//! another store.

use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::models::{address::Address, email::Email, user_role::UserRole};
use kernel::id::{StoreId, UserId};

use crate::application::browse_stores::StoreView;
use crate::domain::entity::store::{NewStore, StoreChanges, StoreSummary};
use crate::domain::repository::StoreRepository;
use crate::domain::value_object::store_name::StoreName;
use crate::error::{RatingError, RatingResult};

/// Create input (already validated)
#[derive(Debug)]
pub struct CreateStoreInput {
    pub name: StoreName,
    pub email: Email,
    pub address: Address,
    pub owner_id: Option<UserId>,
}

/// Update input; `owner_id: Some(None)` unassigns the owner
#[derive(Debug, Default)]
pub struct UpdateStoreInput {
    pub name: Option<StoreName>,
    pub email: Option<Email>,
    pub address: Option<Address>,
    pub owner_id: Option<Option<UserId>>,
}

pub struct ManageStoresUseCase<R, U>
where
    R: StoreRepository,
    U: UserRepository,
{
    repo: Arc<R>,
    users: Arc<U>,
}

impl<R, U> ManageStoresUseCase<R, U>
where
    R: StoreRepository,
    U: UserRepository,
{
    pub fn new(repo: Arc<R>, users: Arc<U>) -> Self {
        Self { repo, users }
    }

    pub async fn create(&self, input: CreateStoreInput) -> RatingResult<StoreView> {
        if let Some(owner) = input.owner_id {
            self.check_owner(owner, None).await?;
        }

        let id = self
            .repo
            .create(&NewStore {
                name: input.name,
                email: input.email,
                address: input.address,
                owner_id: input.owner_id,
            })
            .await?;

        let store = self.reload(id).await?;
        tracing::info!(store_id = %id, owner_id = ?store.owner_id.map(|o| o.get()), "Store created");

        Ok(StoreView {
            store,
            user_rating: None,
        })
    }

    pub async fn update(&self, id: StoreId, input: UpdateStoreInput) -> RatingResult<StoreView> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(RatingError::StoreNotFound);
        }

        if let Some(Some(owner)) = input.owner_id {
            self.check_owner(owner, Some(id)).await?;
        }

        self.repo
            .update(
                id,
                &StoreChanges {
                    name: input.name,
                    email: input.email,
                    address: input.address,
                    owner: input.owner_id,
                },
            )
            .await?;

        let store = self.reload(id).await?;
        tracing::info!(store_id = %id, "Store updated");

        Ok(StoreView {
            store,
            user_rating: None,
        })
    }

    pub async fn delete(&self, id: StoreId) -> RatingResult<()> {
        if !self.repo.delete(id).await? {
            return Err(RatingError::StoreNotFound);
        }
        tracing::info!(store_id = %id, "Store deleted");
        Ok(())
    }

    /// `store` is the store being edited, which may keep its current owner
    async fn check_owner(&self, owner: UserId, store: Option<StoreId>) -> RatingResult<()> {
        let user = self
            .users
            .find_by_id(owner)
            .await?
            .ok_or(RatingError::OwnerNotFound)?;

        match user.role {
            UserRole::StoreOwner => {}
            UserRole::Admin | UserRole::User => return Err(RatingError::OwnerNotStoreOwner),
        }

        match self.repo.find_by_owner(owner).await? {
            Some(owned) if Some(owned.id) != store => Err(RatingError::OwnerAlreadyAssigned),
            _ => Ok(()),
        }
    }

    async fn reload(&self, id: StoreId) -> RatingResult<StoreSummary> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| RatingError::Internal(format!("store {id} missing after write")))
    }
}
