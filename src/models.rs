use serde::{Deserialize, Serialize};

use crate::store::Document;

pub const PREFERENCES_UPDATED: &str = "Preferences updated successfully";
pub const FAVORITE_ADDED: &str = "User favorite recipe added successfully.";
pub const FAVORITE_DELETED: &str = "User favorite recipe deleted successfully.";

/// Response type for operations that only confirm success
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Response type for the favorites listing
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct FavoritesResponse {
    #[schema(value_type = Vec<Object>)]
    pub favorites: Vec<Document>,
}

/// Response type for a newly added favorite
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AddFavoriteResponse {
    pub message: String,
    pub favorite_id: String,
}
