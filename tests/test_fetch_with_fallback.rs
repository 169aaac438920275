use async_trait::async_trait;
use mealmuse::{Connectivity, FoodRecipe, MealMuse, NetworkResult, Queries};
use mockito::{Matcher, Server};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Connectivity that a test can flip at will
struct Switch(AtomicBool);

impl Switch {
    fn new(online: bool) -> Arc<Self> {
        Arc::new(Switch(AtomicBool::new(online)))
    }

    fn set(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }
}

#[async_trait]
impl Connectivity for Switch {
    async fn has_internet_connection(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

async fn app(base_url: &str, network: Arc<Switch>) -> MealMuse {
    MealMuse::builder()
        .api_key("test-key")
        .base_url(base_url)
        .timeout(Duration::from_secs(5))
        .in_memory()
        .connectivity(network)
        .build()
        .await
        .unwrap()
}

fn recipes_body(titles: &[(i64, &str)]) -> String {
    let results: Vec<String> = titles
        .iter()
        .map(|(id, title)| {
            format!(
                r#"{{"id": {id}, "title": "{title}", "readyInMinutes": 20, "vegan": true}}"#
            )
        })
        .collect();
    format!(r#"{{"results": [{}], "totalResults": {}}}"#, results.join(","), titles.len())
}

fn titles(food_recipe: &FoodRecipe) -> Vec<&str> {
    food_recipe.results.iter().map(|r| r.title.as_str()).collect()
}

#[tokio::test]
async fn test_success_is_cached() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
            Matcher::UrlEncoded("type".into(), "main course".into()),
            Matcher::UrlEncoded("diet".into(), "gluten free".into()),
            Matcher::UrlEncoded("number".into(), "50".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipes_body(&[(1, "Pad Thai"), (2, "Ramen")]))
        .create_async()
        .await;

    let app = app(&server.url(), Switch::new(true)).await;
    let queries = app.recipes.apply_queries();
    let state = app.main.get_recipes(&queries).await;

    mock.assert_async().await;
    match &state {
        NetworkResult::Success(food_recipe) => {
            assert_eq!(titles(food_recipe), vec!["Pad Thai", "Ramen"]);
        }
        other => panic!("Expected success, got {:?}", other),
    }

    let cached = app.main.read_recipes().await.unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(Some(&cached[0].food_recipe), state.data());
}

#[tokio::test]
async fn test_server_error_falls_back_to_cache() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(recipes_body(&[(1, "Pad Thai")]))
        .create_async()
        .await;

    let app = app(&server.url(), Switch::new(true)).await;
    let queries = app.recipes.apply_queries();
    let first = app.main.get_recipes(&queries).await;
    assert!(first.is_success());
    ok.remove_async().await;

    let _failing = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let second = app.main.get_recipes(&queries).await;
    assert!(second.is_error());
    assert_eq!(second.message(), Some("Internal Server Error"));
    assert_eq!(second.data(), first.data());
}

#[tokio::test]
async fn test_error_without_cache_has_no_data() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(402)
        .with_body(r#"{"status": "failure", "code": 402}"#)
        .create_async()
        .await;

    let app = app(&server.url(), Switch::new(true)).await;
    let state = app.main.get_recipes(&app.recipes.apply_queries()).await;

    assert_eq!(
        state,
        NetworkResult::Error {
            message: "API Key Limitada".to_string(),
            data: None,
        }
    );
    assert!(app.main.read_recipes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_results_are_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": [], "totalResults": 0}"#)
        .create_async()
        .await;

    let app = app(&server.url(), Switch::new(true)).await;
    let state = app.main.get_recipes(&app.recipes.apply_queries()).await;

    assert_eq!(state.message(), Some("Recetas no encontradas"));
    assert!(app.main.read_recipes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_last_successful_fetch_wins() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(recipes_body(&[(1, "Pad Thai")]))
        .create_async()
        .await;

    let app = app(&server.url(), Switch::new(true)).await;
    let queries = app.recipes.apply_queries();
    app.main.get_recipes(&queries).await;
    first.remove_async().await;

    let _second = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(recipes_body(&[(3, "Pho"), (4, "Laksa")]))
        .create_async()
        .await;
    app.main.get_recipes(&queries).await;

    let cached = app.main.read_recipes().await.unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(titles(&cached[0].food_recipe), vec!["Pho", "Laksa"]);
}

#[tokio::test]
async fn test_offline_returns_cached_data() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(recipes_body(&[(1, "Pad Thai")]))
        .expect(1)
        .create_async()
        .await;

    let network = Switch::new(true);
    let app = app(&server.url(), Arc::clone(&network)).await;
    let queries = app.recipes.apply_queries();
    let online = app.main.get_recipes(&queries).await;

    network.set(false);
    let offline = app.main.get_recipes(&queries).await;

    // The second call never reached the server
    mock.assert_async().await;
    assert_eq!(offline.message(), Some("No Internet Connection."));
    assert_eq!(offline.data(), online.data());
}

#[tokio::test]
async fn test_connection_refused_uses_generic_message() {
    // Bind then drop to get a port nobody listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let app = app(&format!("http://127.0.0.1:{}", port), Switch::new(true)).await;
    let state = app.main.get_recipes(&app.recipes.apply_queries()).await;

    assert_eq!(state.message(), Some("Recipes not found."));
    assert!(state.data().is_none());
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept connections and never answer
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let app = MealMuse::builder()
        .api_key("test-key")
        .base_url(format!("http://{}", addr))
        .timeout(Duration::from_millis(300))
        .in_memory()
        .connectivity(Switch::new(true))
        .build()
        .await
        .unwrap();

    let state = app.main.get_recipes(&app.recipes.apply_queries()).await;
    assert_eq!(state.message(), Some("Timeout"));
}

#[tokio::test]
async fn test_search_does_not_touch_cache() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::UrlEncoded("query".into(), "curry".into()))
        .with_status(200)
        .with_body(recipes_body(&[(9, "Green Curry")]))
        .create_async()
        .await;

    let app = app(&server.url(), Switch::new(true)).await;
    let queries = app.recipes.apply_search_query("curry");
    let state = app.main.search_recipes(&queries).await;

    assert_eq!(titles(state.data().unwrap()), vec!["Green Curry"]);
    assert!(app.main.read_recipes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_failure_attaches_recipe_cache() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::UrlEncoded("type".into(), "main course".into()))
        .with_status(200)
        .with_body(recipes_body(&[(1, "Pad Thai")]))
        .create_async()
        .await;

    let network = Switch::new(true);
    let app = app(&server.url(), Arc::clone(&network)).await;
    app.main.get_recipes(&app.recipes.apply_queries()).await;

    network.set(false);
    let state = app
        .main
        .search_recipes(&app.recipes.apply_search_query("curry"))
        .await;

    assert_eq!(state.message(), Some("No Internet Connection."));
    assert_eq!(titles(state.data().unwrap()), vec!["Pad Thai"]);
}

#[tokio::test]
async fn test_food_joke_cache_and_fallback() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("GET", "/food/jokes/random")
        .match_query(Matcher::UrlEncoded("apiKey".into(), "test-key".into()))
        .with_status(200)
        .with_body(r#"{"text": "Why did the tomato blush? It saw the salad dressing."}"#)
        .create_async()
        .await;

    let app = app(&server.url(), Switch::new(true)).await;
    let first = app.main.get_food_joke("test-key").await;
    assert!(first.is_success());
    ok.remove_async().await;

    let _limited = server
        .mock("GET", "/food/jokes/random")
        .match_query(Matcher::Any)
        .with_status(402)
        .create_async()
        .await;

    let second = app.main.get_food_joke("test-key").await;
    assert_eq!(second.message(), Some("API Key Limited."));
    assert_eq!(second.data(), first.data());

    let cached = app.main.read_food_joke().await.unwrap();
    assert_eq!(cached.len(), 1);
}

#[tokio::test]
async fn test_subscribers_see_latest_state() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(recipes_body(&[(1, "Pad Thai")]))
        .create_async()
        .await;

    let app = app(&server.url(), Switch::new(true)).await;
    let mut receiver = app.main.recipes_response();
    assert!(receiver.borrow().is_loading());

    let state = app.main.get_recipes(&Queries::new()).await;
    receiver.changed().await.unwrap();
    assert_eq!(*receiver.borrow_and_update(), state);
}

#[tokio::test]
async fn test_null_results_are_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": null}"#)
        .create_async()
        .await;

    let app = app(&server.url(), Switch::new(true)).await;
    let state = app.main.get_recipes(&app.recipes.apply_queries()).await;

    assert_eq!(state.message(), Some("Recetas no encontradas"));
}

#[tokio::test]
async fn test_null_recipe_fields_still_succeed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"results": [{
                "id": 12,
                "title": "Dal",
                "summary": null,
                "extendedIngredients": [{"name": "lentils", "consistency": null, "unit": null}]
            }]}"#,
        )
        .create_async()
        .await;

    let app = app(&server.url(), Switch::new(true)).await;
    let state = app.main.get_recipes(&app.recipes.apply_queries()).await;

    let food_recipe = state.data().unwrap();
    assert!(state.is_success());
    assert_eq!(food_recipe.results[0].summary, "");
    assert_eq!(food_recipe.results[0].extended_ingredients[0].name, "lentils");
    assert_eq!(app.main.read_recipes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_body_falls_back_to_cache() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(recipes_body(&[(1, "Pad Thai")]))
        .create_async()
        .await;

    let app = app(&server.url(), Switch::new(true)).await;
    let queries = app.recipes.apply_queries();
    let first = app.main.get_recipes(&queries).await;
    ok.remove_async().await;

    let _garbled = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let second = app.main.get_recipes(&queries).await;
    assert_eq!(second.message(), Some("Recipes not found."));
    assert_eq!(second.data(), first.data());
}

#[tokio::test]
async fn test_connection_refused_falls_back_to_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipes_db.sqlite");

    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(recipes_body(&[(1, "Pad Thai")]))
        .create_async()
        .await;

    let online = MealMuse::builder()
        .api_key("test-key")
        .base_url(server.url())
        .database_path(&path)
        .connectivity(Switch::new(true))
        .build()
        .await
        .unwrap();
    let first = online.main.get_recipes(&online.recipes.apply_queries()).await;
    drop(online);

    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let unreachable = MealMuse::builder()
        .api_key("test-key")
        .base_url(format!("http://127.0.0.1:{}", port))
        .database_path(&path)
        .connectivity(Switch::new(true))
        .build()
        .await
        .unwrap();
    let second = unreachable
        .main
        .get_recipes(&unreachable.recipes.apply_queries())
        .await;

    assert_eq!(second.message(), Some("Recipes not found."));
    assert_eq!(second.data(), first.data());
}

#[tokio::test]
async fn test_failed_cache_write_still_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipes_db.sqlite");

    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(recipes_body(&[(1, "Pad Thai")]))
        .create_async()
        .await;

    let app = MealMuse::builder()
        .api_key("test-key")
        .base_url(server.url())
        .database_path(&path)
        .connectivity(Switch::new(true))
        .build()
        .await
        .unwrap();

    // Break the cache table behind the app's back
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(&format!("DROP TABLE {}", mealmuse::constants::RECIPES_TABLE))
        .unwrap();
    drop(conn);

    let state = app.main.get_recipes(&app.recipes.apply_queries()).await;
    assert!(state.is_success());
    assert_eq!(titles(state.data().unwrap()), vec!["Pad Thai"]);
    assert!(app.main.read_recipes().await.is_err());
}
