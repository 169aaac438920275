pub const BASE_URL: &str = "https://api.spoonacular.com";

// API query keys
pub const QUERY_SEARCH: &str = "query";
pub const QUERY_NUMBER: &str = "number";
pub const QUERY_API_KEY: &str = "apiKey";
pub const QUERY_TYPE: &str = "type";
pub const QUERY_DIET: &str = "diet";
pub const QUERY_ADD_RECIPE_INFORMATION: &str = "addRecipeInformation";
pub const QUERY_FILL_INGREDIENTS: &str = "fillIngredients";

// Filter defaults
pub const DEFAULT_RECIPES_NUMBER: &str = "50";
pub const DEFAULT_MEAL_TYPE: &str = "main course";
pub const DEFAULT_DIET_TYPE: &str = "gluten free";

// Database
pub const DATABASE_NAME: &str = "recipes_db.sqlite";
pub const RECIPES_TABLE: &str = "recipes_table";
pub const FAVORITE_RECIPES_TABLE: &str = "favorite_recipes_table";
pub const FOOD_JOKE_TABLE: &str = "food_joke_table";
pub const PREFERENCES_TABLE: &str = "preferences";

// Preference keys
pub const PREFERENCES_MEAL_TYPE: &str = "mealType";
pub const PREFERENCES_MEAL_TYPE_ID: &str = "mealTypeId";
pub const PREFERENCES_DIET_TYPE: &str = "dietType";
pub const PREFERENCES_DIET_TYPE_ID: &str = "dietTypeId";
pub const PREFERENCES_BACK_ONLINE: &str = "backOnline";
