pub mod health;
pub mod get_preferences;
pub mod update_preferences;
pub mod list_favorites;
pub mod add_favorite;
pub mod delete_favorite;

pub use health::health_handler;
pub use get_preferences::get_preferences_handler;
pub use update_preferences::update_preferences_handler;
pub use list_favorites::list_favorites_handler;
pub use add_favorite::add_favorite_handler;
pub use delete_favorite::delete_favorite_handler;
