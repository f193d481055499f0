//! Ownership-based access control.
//!
//! Every record has exactly one owning user. Reads are open to any
//! authenticated requester; writes (update/delete) require the requester to
//! be the owner. Unauthenticated requests never reach this check.

use uuid::Uuid;

use crate::domain::{ProfileFeedItem, Recipe, User};
use crate::error::DomainError;

/// Kind of operation being attempted on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

/// A record with a single owning user.
pub trait Owned {
    /// Entity name used in errors and logs.
    const ENTITY: &'static str;

    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;

    fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id() == user_id
    }
}

/// A profile is owned by itself.
impl Owned for User {
    const ENTITY: &'static str = "user";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.id
    }
}

impl Owned for ProfileFeedItem {
    const ENTITY: &'static str = "feed item";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for Recipe {
    const ENTITY: &'static str = "recipe";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Decide whether `requester` may perform `operation` on `record`.
pub fn is_allowed<R: Owned + ?Sized>(requester: Uuid, record: &R, operation: Operation) -> bool {
    match operation {
        Operation::Read => true,
        Operation::Write => record.is_owned_by(requester),
    }
}

/// Like [`is_allowed`], but returns `DomainError::Forbidden` on denial.
pub fn authorize<R: Owned + ?Sized>(
    requester: Uuid,
    record: &R,
    operation: Operation,
) -> Result<(), DomainError> {
    if is_allowed(requester, record, operation) {
        Ok(())
    } else {
        tracing::warn!(
            requester = %requester,
            entity = R::ENTITY,
            id = %record.id(),
            "Denied write on record owned by another user"
        );
        Err(DomainError::Forbidden {
            entity_type: R::ENTITY,
            id: record.id(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("owner@example.com".into(), "Owner".into(), "hash".into())
    }

    #[test]
    fn test_read_always_allowed() {
        let profile = user();
        let stranger = Uuid::now_v7();

        assert!(is_allowed(stranger, &profile, Operation::Read));
    }

    #[test]
    fn test_profile_write_requires_self() {
        let profile = user();
        let stranger = Uuid::now_v7();

        assert!(is_allowed(profile.id, &profile, Operation::Write));
        assert!(!is_allowed(stranger, &profile, Operation::Write));
    }

    #[test]
    fn test_feed_item_write_requires_owner() {
        let owner = user();
        let item = ProfileFeedItem::new(owner.id, "hello".into());

        assert!(authorize(owner.id, &item, Operation::Write).is_ok());

        let err = authorize(Uuid::now_v7(), &item, Operation::Write).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { entity_type: "feed item", .. }));
    }
}
