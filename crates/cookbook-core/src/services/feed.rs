//! Profile feed use-cases.

use std::sync::Arc;

use uuid::Uuid;

use crate::access::{Operation, authorize};
use crate::domain::{ProfileFeedItem, validate_status_text};
use crate::error::{DomainError, FieldErrors};
use crate::ports::FeedRepository;

pub struct FeedService {
    feed: Arc<dyn FeedRepository>,
}

impl FeedService {
    pub fn new(feed: Arc<dyn FeedRepository>) -> Self {
        Self { feed }
    }

    /// The requester's own feed items, newest first.
    pub async fn list(&self, requester: Uuid) -> Result<Vec<ProfileFeedItem>, DomainError> {
        Ok(self.feed.list_by_owner(requester).await?)
    }

    /// Any feed item; feed items are readable by every authenticated user.
    pub async fn get(&self, requester: Uuid, id: Uuid) -> Result<ProfileFeedItem, DomainError> {
        let item = self.find(id).await?;
        authorize(requester, &item, Operation::Read)?;
        Ok(item)
    }

    /// Post a status update owned by the requester.
    pub async fn create(
        &self,
        requester: Uuid,
        status_text: String,
    ) -> Result<ProfileFeedItem, DomainError> {
        validate(&status_text)?;
        let item = ProfileFeedItem::new(requester, status_text);
        Ok(self.feed.insert(item).await?)
    }

    /// Replace the status text. `created_on` and the owner never change.
    pub async fn update(
        &self,
        requester: Uuid,
        id: Uuid,
        status_text: Option<String>,
    ) -> Result<ProfileFeedItem, DomainError> {
        let mut item = self.find(id).await?;
        authorize(requester, &item, Operation::Write)?;

        if let Some(status_text) = status_text {
            validate(&status_text)?;
            item.status_text = status_text;
        }

        Ok(self.feed.update(item).await?)
    }

    pub async fn delete(&self, requester: Uuid, id: Uuid) -> Result<(), DomainError> {
        let item = self.find(id).await?;
        authorize(requester, &item, Operation::Write)?;
        Ok(self.feed.delete(id).await?)
    }

    async fn find(&self, id: Uuid) -> Result<ProfileFeedItem, DomainError> {
        self.feed.find_by_id(id).await?.ok_or(DomainError::NotFound {
            entity_type: "feed item",
            id,
        })
    }
}

fn validate(status_text: &str) -> Result<(), DomainError> {
    let mut errors = FieldErrors::default();
    validate_status_text(status_text, &mut errors);
    errors.into_result()
}
