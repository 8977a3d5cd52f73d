// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const PREFERENCES: &str = "/preferences/{user_id}";
pub const FAVORITES: &str = "/preferences/{user_id}/favorites";
pub const FAVORITE_ITEM: &str = "/preferences/{user_id}/favorites/{recipe_id}";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
