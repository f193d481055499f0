//! Use-case services composing the domain rules with the repository ports.

mod attributes;
mod feed;
mod recipes;
mod users;

pub use attributes::AttributeService;
pub use feed::FeedService;
pub use recipes::RecipeService;
pub use users::UserService;
