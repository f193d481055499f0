//! Domain entities - the core business objects.

mod attribute;
mod feed;
mod price;
mod recipe;
mod user;

pub use attribute::{
    Ingredient, RecipeAttribute, Tag, validate_attribute_name, validate_attribute_names,
};
pub use feed::{ProfileFeedItem, validate_status_text};
pub use price::{Price, PriceError};
pub use recipe::{Recipe, RecipeChanges, RecipeLinks};
pub use user::{
    NewUser, ProfileChanges, User, normalize_email, validate_email, validate_name,
};
