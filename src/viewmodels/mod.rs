mod main;
mod recipes;

pub use main::{handle_food_joke_response, handle_food_recipes_response, MainViewModel};
pub use recipes::{RecipesViewModel, BACK_ONLINE, NO_INTERNET_CONNECTION};
