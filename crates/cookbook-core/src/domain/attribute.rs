//! Tags and ingredients: named records a user attaches to recipes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::Owned;
use crate::error::FieldErrors;

const MAX_NAME_LEN: usize = 255;

/// Common shape of [`Tag`] and [`Ingredient`].
///
/// Both are owned by one user and linked to any number of that user's
/// recipes; the services and repositories are written once against this trait.
pub trait RecipeAttribute: Owned + Clone + Send + Sync + 'static {
    fn create(user_id: Uuid, name: String) -> Self;
    fn name(&self) -> &str;
    fn rename(&mut self, name: String);
}

/// Tag for filtering recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}

/// Ingredient used by recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}

macro_rules! recipe_attribute {
    ($ty:ident, $kind:literal) => {
        impl $ty {
            pub fn new(user_id: Uuid, name: String) -> Self {
                Self {
                    id: Uuid::now_v7(),
                    user_id,
                    name,
                }
            }
        }

        impl RecipeAttribute for $ty {
            fn create(user_id: Uuid, name: String) -> Self {
                Self::new(user_id, name)
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn rename(&mut self, name: String) {
                self.name = name;
            }
        }

        impl Owned for $ty {
            const ENTITY: &'static str = $kind;

            fn id(&self) -> Uuid {
                self.id
            }

            fn owner_id(&self) -> Uuid {
                self.user_id
            }
        }
    };
}

recipe_attribute!(Tag, "tag");
recipe_attribute!(Ingredient, "ingredient");

/// Validate a tag/ingredient name into `errors`, returning the trimmed name.
pub fn validate_attribute_name(field: &str, name: &str, errors: &mut FieldErrors) -> String {
    let name = name.trim();
    if name.is_empty() {
        errors.add(field, "This field may not be blank.");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.add(field, "Ensure this field has no more than 255 characters.");
    }
    name.to_string()
}

/// Validate a list of names for one link field. Returns the trimmed names
/// in first-seen order with duplicates dropped.
pub fn validate_attribute_names(field: &str, names: &[String], errors: &mut FieldErrors) -> Vec<String> {
    let mut unique = Vec::with_capacity(names.len());
    for name in names {
        let name = validate_attribute_name(field, name, errors);
        if !name.is_empty() && !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_keeps_owner() {
        let owner = Uuid::now_v7();
        let mut tag = Tag::new(owner, "English".into());

        tag.rename("Indian".into());

        assert_eq!(tag.name, "Indian");
        assert_eq!(tag.user_id, owner);
    }

    #[test]
    fn test_validate_attribute_name() {
        let mut errors = FieldErrors::default();
        assert_eq!(validate_attribute_name("name", "  Salt ", &mut errors), "Salt");
        assert!(errors.is_empty());

        validate_attribute_name("name", "   ", &mut errors);
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_validate_attribute_names_dedups_in_order() {
        let mut errors = FieldErrors::default();
        let names = ["Salt".to_string(), " Pepper".to_string(), "Salt ".to_string()];

        assert_eq!(
            validate_attribute_names("ingredients", &names, &mut errors),
            ["Salt", "Pepper"]
        );
        assert!(errors.is_empty());
    }
}
