use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attribute::{Ingredient, Tag, validate_attribute_names};
use super::price::Price;
use crate::error::{DomainError, FieldErrors};

const MAX_TITLE_LEN: usize = 255;
const MAX_LINK_LEN: usize = 255;

/// Recipe entity with its tag and ingredient links resolved.
///
/// `tags` and `ingredients` hold the linked records, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: Price,
    pub link: String,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// Create a recipe without links.
    pub fn new(user_id: Uuid, title: String, time_minutes: i32, price: Price) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            title,
            description: String::new(),
            time_minutes,
            price,
            link: String::new(),
            tags: Vec::new(),
            ingredients: Vec::new(),
        }
    }

    pub fn tag_ids(&self) -> Vec<Uuid> {
        self.tags.iter().map(|t| t.id).collect()
    }

    pub fn ingredient_ids(&self) -> Vec<Uuid> {
        self.ingredients.iter().map(|i| i.id).collect()
    }

    /// Apply scalar changes; link changes are resolved by the service.
    pub fn apply(&mut self, changes: &RecipeChanges) {
        if let Some(title) = &changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(time_minutes) = changes.time_minutes {
            self.time_minutes = time_minutes;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(link) = &changes.link {
            self.link = link.clone();
        }
    }
}

/// Tag and ingredient names to link on a recipe write.
///
/// A present list is resolved within the owner's records, creating missing
/// ones, and replaces the link set. `None` keeps the links the recipe carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeLinks {
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

/// Recipe create/update input. `None` leaves a field unchanged on update.
///
/// `tags`/`ingredients` carry names; a present list replaces the link set.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Price>,
    pub link: Option<String>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

impl RecipeChanges {
    /// Check required fields are present (create and full update).
    pub fn require_complete(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        if self.title.is_none() {
            errors.add("title", "This field is required.");
        }
        if self.time_minutes.is_none() {
            errors.add("time_minutes", "This field is required.");
        }
        if self.price.is_none() {
            errors.add("price", "This field is required.");
        }
        errors.into_result()
    }

    /// Validate the link names and return them trimmed and deduplicated.
    /// Only meaningful once `errors` is known to be empty.
    pub fn links(&self, errors: &mut FieldErrors) -> RecipeLinks {
        RecipeLinks {
            tags: self
                .tags
                .as_deref()
                .map(|names| validate_attribute_names("tags", names, errors)),
            ingredients: self
                .ingredients
                .as_deref()
                .map(|names| validate_attribute_names("ingredients", names, errors)),
        }
    }

    /// Validate the values that are present.
    pub fn validate(&self, errors: &mut FieldErrors) {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                errors.add("title", "This field may not be blank.");
            } else if title.chars().count() > MAX_TITLE_LEN {
                errors.add("title", "Ensure this field has no more than 255 characters.");
            }
        }
        if let Some(time_minutes) = self.time_minutes {
            if time_minutes < 0 {
                errors.add(
                    "time_minutes",
                    "Ensure this value is greater than or equal to 0.",
                );
            }
        }
        if let Some(link) = &self.link {
            if link.chars().count() > MAX_LINK_LEN {
                errors.add("link", "Ensure this field has no more than 255 characters.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut recipe = Recipe::new(Uuid::now_v7(), "Pancakes".into(), 5, price("5.00"));
        recipe.link = "https://example.com".into();

        recipe.apply(&RecipeChanges {
            title: Some("Waffles".into()),
            ..Default::default()
        });

        assert_eq!(recipe.title, "Waffles");
        assert_eq!(recipe.time_minutes, 5);
        assert_eq!(recipe.link, "https://example.com");
    }

    #[test]
    fn test_require_complete_lists_missing_fields() {
        let err = RecipeChanges::default().require_complete().unwrap_err();
        match err {
            DomainError::Validation(errors) => {
                assert!(errors.contains("title"));
                assert!(errors.contains("time_minutes"));
                assert!(errors.contains("price"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_negative_time() {
        let mut errors = FieldErrors::default();
        RecipeChanges {
            time_minutes: Some(-1),
            ..Default::default()
        }
        .validate(&mut errors);
        assert!(errors.contains("time_minutes"));
    }

    #[test]
    fn test_links_collects_errors_from_both_lists() {
        let mut errors = FieldErrors::default();
        let changes = RecipeChanges {
            tags: Some(vec!["Vegan".into(), "".into()]),
            ingredients: Some(vec!["  ".into()]),
            ..Default::default()
        };

        changes.links(&mut errors);

        assert!(errors.contains("tags"));
        assert!(errors.contains("ingredients"));
    }

    #[test]
    fn test_links_keeps_absent_lists_absent() {
        let mut errors = FieldErrors::default();
        let changes = RecipeChanges {
            tags: Some(vec![" Vegan ".into(), "Vegan".into()]),
            ..Default::default()
        };

        let links = changes.links(&mut errors);

        assert_eq!(links.tags, Some(vec!["Vegan".to_string()]));
        assert_eq!(links.ingredients, None);
    }
}
