use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use mealmuse::{
    AppConfig, FavoritesEntity, FoodJoke, FoodRecipe, MealMuse, MealMuseError, NetworkResult,
    Recipe,
};

#[derive(Parser, Debug)]
#[command(name = "mealmuse", version, about = "Browse and cache Spoonacular recipes")]
struct Cli {
    /// Skip the network and answer from the local cache
    #[arg(long, global = true)]
    offline: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// SQLite cache file (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch recipes for the saved (or given) meal and diet filter
    Recipes {
        #[arg(long)]
        meal_type: Option<String>,
        #[arg(long)]
        diet_type: Option<String>,
        /// How many recipes to request
        #[arg(long)]
        number: Option<u32>,
    },
    /// Free-text recipe search
    Search { query: String },
    /// Fetch a random food joke
    Joke,
    /// Show the recipes cached by the last successful fetch
    Cached,
    /// Print the details of a cached or favorite recipe
    Show { recipe_id: i64 },
    /// Manage favorite recipes
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Save the meal and diet filter used by `recipes`
    Filter {
        #[arg(long)]
        meal_type: Option<String>,
        #[arg(long)]
        diet_type: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    List,
    /// Mark a cached recipe as favorite
    Add { recipe_id: i64 },
    /// Remove a favorite by its favorite id
    Remove { id: i64 },
    /// Remove all favorites
    Clear,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    debug!("{:?}", cli);

    let mut builder = MealMuse::builder().config(AppConfig::load()?);
    if let Some(path) = &cli.database {
        builder = builder.database_path(path);
    }
    if cli.offline {
        builder = builder.offline();
    }
    let mut app = builder.build().await?;

    match cli.command {
        Command::Recipes {
            meal_type,
            diet_type,
            number,
        } => {
            report_network_status(&mut app).await;
            app.require_api_key()?;
            app.recipes.load_meal_and_diet_type().await;
            let mut queries = app.recipes.apply_queries();
            if let Some(meal_type) = meal_type {
                queries.insert(mealmuse::constants::QUERY_TYPE.to_string(), meal_type);
            }
            if let Some(diet_type) = diet_type {
                queries.insert(mealmuse::constants::QUERY_DIET.to_string(), diet_type);
            }
            if let Some(number) = number {
                queries.insert(
                    mealmuse::constants::QUERY_NUMBER.to_string(),
                    number.to_string(),
                );
            }
            let state = app.main.get_recipes(&queries).await;
            Ok(print_state(&state, cli.json, print_food_recipe)?)
        }
        Command::Search { query } => {
            report_network_status(&mut app).await;
            app.require_api_key()?;
            let queries = app.recipes.apply_search_query(&query);
            let state = app.main.search_recipes(&queries).await;
            Ok(print_state(&state, cli.json, print_food_recipe)?)
        }
        Command::Joke => {
            report_network_status(&mut app).await;
            let api_key = app.require_api_key()?.to_string();
            let state = app.main.get_food_joke(&api_key).await;
            Ok(print_state(&state, cli.json, print_food_joke)?)
        }
        Command::Cached => {
            let cached = app.main.read_recipes().await?;
            match cached.into_iter().next() {
                Some(entity) if cli.json => print_json(&entity.food_recipe)?,
                Some(entity) => print_food_recipe(&entity.food_recipe),
                None => eprintln!("No cached recipes"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { recipe_id } => {
            let recipe = find_recipe(&app, recipe_id).await?;
            if cli.json {
                print_json(&recipe)?;
            } else {
                print_recipe_details(&recipe);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Favorites { action } => {
            run_favorites(&app, action, cli.json).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Filter {
            meal_type,
            diet_type,
        } => {
            let current = app.recipes.read_meal_and_diet_type().await;
            let meal_changed = meal_type.is_some();
            let diet_changed = diet_type.is_some();
            let meal_type = meal_type.unwrap_or(current.selected_meal_type);
            let diet_type = diet_type.unwrap_or(current.selected_diet_type);
            app.recipes.save_meal_and_diet_type_temp(
                &meal_type,
                if meal_changed { 0 } else { current.selected_meal_type_id },
                &diet_type,
                if diet_changed { 0 } else { current.selected_diet_type_id },
            );
            app.recipes.save_meal_and_diet_type().await;
            println!("meal type: {}\ndiet type: {}", meal_type, diet_type);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn report_network_status(app: &mut MealMuse) {
    if let Some(notice) = app.refresh_network_status().await {
        eprintln!("{}", notice);
    }
}

async fn run_favorites(
    app: &MealMuse,
    action: FavoritesAction,
    json: bool,
) -> Result<(), MealMuseError> {
    match action {
        FavoritesAction::List => {
            let favorites = app.main.read_favorite_recipes().await?;
            if json {
                print_json(&favorites)?;
            } else if favorites.is_empty() {
                eprintln!("No favorite recipes");
            } else {
                for favorite in &favorites {
                    println!("[{}] {}", favorite.id, format_recipe(&favorite.result));
                }
            }
        }
        FavoritesAction::Add { recipe_id } => {
            let local = &app.main.repository().local;
            if let Some(existing) = local.find_favorite_by_recipe_id(recipe_id).await? {
                println!("Already a favorite [{}]", existing.id);
                return Ok(());
            }
            let recipe = app
                .main
                .read_recipes()
                .await?
                .into_iter()
                .flat_map(|entity| entity.food_recipe.results)
                .find(|recipe| recipe.recipe_id == recipe_id)
                .ok_or(MealMuseError::RecipeNotCached(recipe_id))?;
            let id = app
                .main
                .insert_favorite_recipe(FavoritesEntity::new(recipe))
                .await?;
            println!("Recipe saved. [{}]", id);
        }
        FavoritesAction::Remove { id } => {
            let favorite = app
                .main
                .read_favorite_recipes()
                .await?
                .into_iter()
                .find(|favorite| favorite.id == id);
            match favorite {
                Some(favorite) => {
                    app.main.delete_favorite_recipe(favorite).await?;
                    println!("Removed from favorites.");
                }
                None => eprintln!("No favorite with id {}", id),
            }
        }
        FavoritesAction::Clear => {
            let removed = app.main.delete_all_favorite_recipes().await?;
            println!("All recipes removed. ({})", removed);
        }
    }
    Ok(())
}

/// Look in the recipe cache first, then in the favorites
async fn find_recipe(app: &MealMuse, recipe_id: i64) -> Result<Recipe, MealMuseError> {
    let cached = app
        .main
        .read_recipes()
        .await?
        .into_iter()
        .flat_map(|entity| entity.food_recipe.results)
        .find(|recipe| recipe.recipe_id == recipe_id);
    if let Some(recipe) = cached {
        return Ok(recipe);
    }

    app.main
        .repository()
        .local
        .find_favorite_by_recipe_id(recipe_id)
        .await?
        .map(|favorite| favorite.result)
        .ok_or(MealMuseError::RecipeNotCached(recipe_id))
}

fn print_state<T: Serialize>(
    state: &NetworkResult<T>,
    json: bool,
    print: fn(&T),
) -> Result<ExitCode, MealMuseError> {
    if json {
        print_json(state)?;
    } else {
        if let Some(message) = state.message() {
            eprintln!("{}", message);
        }
        if let Some(data) = state.data() {
            if state.is_error() {
                eprintln!("Showing cached data:");
            }
            print(data);
        }
    }

    Ok(if state.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), MealMuseError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_recipe(recipe: &Recipe) -> String {
    let mut tags = Vec::new();
    if recipe.vegan {
        tags.push("vegan");
    } else if recipe.vegetarian {
        tags.push("vegetarian");
    }
    if recipe.gluten_free {
        tags.push("gluten free");
    }
    if recipe.dairy_free {
        tags.push("dairy free");
    }
    if recipe.very_healthy {
        tags.push("healthy");
    }
    if recipe.cheap {
        tags.push("cheap");
    }

    let mut line = format!(
        "{} {} ({} min, {} likes)",
        recipe.recipe_id, recipe.title, recipe.ready_in_minutes, recipe.aggregate_likes
    );
    if !tags.is_empty() {
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }
    line
}

fn print_recipe_details(recipe: &Recipe) {
    println!("{}", format_recipe(recipe));

    let summary = recipe.summary_text();
    if !summary.is_empty() {
        println!("\n{}", summary);
    }

    if !recipe.extended_ingredients.is_empty() {
        println!("\nIngredients:");
        for ingredient in &recipe.extended_ingredients {
            let line = if ingredient.original.is_empty() {
                format!("{} {} {}", ingredient.amount, ingredient.unit, ingredient.name)
            } else {
                ingredient.original.clone()
            };
            println!("  - {}", line.trim());
        }
    }

    match (&recipe.source_name, &recipe.source_url) {
        (Some(name), Some(url)) => println!("\nSource: {} <{}>", name, url),
        (None, Some(url)) => println!("\nSource: {}", url),
        (Some(name), None) => println!("\nSource: {}", name),
        (None, None) => {}
    }
}

fn print_food_recipe(food_recipe: &FoodRecipe) {
    for recipe in &food_recipe.results {
        println!("{}", format_recipe(recipe));
    }
}

fn print_food_joke(food_joke: &FoodJoke) {
    println!("{}", food_joke.text);
}
