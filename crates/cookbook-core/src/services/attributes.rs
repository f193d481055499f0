//! Tag and ingredient use-cases.

use std::sync::Arc;

use uuid::Uuid;

use crate::access::{Operation, Owned, authorize};
use crate::domain::{RecipeAttribute, validate_attribute_name};
use crate::error::{DomainError, FieldErrors};
use crate::filter::AttributeFilter;
use crate::ports::AttributeRepository;

/// Owner-scoped CRUD over one kind of recipe attribute.
pub struct AttributeService<A: RecipeAttribute> {
    repo: Arc<dyn AttributeRepository<A>>,
}

impl<A: RecipeAttribute> AttributeService<A> {
    pub fn new(repo: Arc<dyn AttributeRepository<A>>) -> Self {
        Self { repo }
    }

    /// The requester's records, ordered by name.
    pub async fn list(&self, requester: Uuid, filter: AttributeFilter) -> Result<Vec<A>, DomainError> {
        Ok(self.repo.list_by_owner(requester, filter).await?)
    }

    pub async fn get(&self, requester: Uuid, id: Uuid) -> Result<A, DomainError> {
        self.find_owned(requester, id).await
    }

    pub async fn create(&self, requester: Uuid, name: &str) -> Result<A, DomainError> {
        let name = validated_name(name)?;
        self.ensure_name_free(requester, &name, None).await?;
        let record = A::create(requester, name);
        Ok(self.repo.insert(record).await?)
    }

    /// Rename a record. The owner is left as is.
    pub async fn rename(&self, requester: Uuid, id: Uuid, name: &str) -> Result<A, DomainError> {
        let mut record = self.find_owned(requester, id).await?;
        authorize(requester, &record, Operation::Write)?;

        let name = validated_name(name)?;
        self.ensure_name_free(requester, &name, Some(id)).await?;
        record.rename(name);
        Ok(self.repo.update(record).await?)
    }

    pub async fn delete(&self, requester: Uuid, id: Uuid) -> Result<(), DomainError> {
        let record = self.find_owned(requester, id).await?;
        authorize(requester, &record, Operation::Write)?;

        self.repo.delete(id).await?;
        tracing::debug!(entity = A::ENTITY, %id, "Deleted");
        Ok(())
    }

    /// Names are unique per owner.
    async fn ensure_name_free(&self, owner: Uuid, name: &str, current: Option<Uuid>) -> Result<(), DomainError> {
        match self.repo.find_by_name(owner, name).await? {
            Some(existing) if Some(existing.id()) != current => Err(DomainError::Duplicate(
                format!("{} with this name already exists.", A::ENTITY),
            )),
            _ => Ok(()),
        }
    }

    /// Records outside the requester's scope look the same as missing ones.
    async fn find_owned(&self, requester: Uuid, id: Uuid) -> Result<A, DomainError> {
        match self.repo.find_by_id(id).await? {
            Some(record) if record.is_owned_by(requester) => Ok(record),
            _ => Err(DomainError::NotFound {
                entity_type: A::ENTITY,
                id,
            }),
        }
    }
}

fn validated_name(name: &str) -> Result<String, DomainError> {
    let mut errors = FieldErrors::default();
    let name = validate_attribute_name("name", name, &mut errors);
    errors.into_result()?;
    Ok(name)
}
