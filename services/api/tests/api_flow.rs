//! End-to-end flow against a live database
//!
//! Requires a running PostgreSQL reachable via `DATABASE_URL`; migrations are
//! applied on startup. Ignored by default:
//! `cargo test -p api -- --ignored`

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use api::{
    routes,
    state::AppState,
    storage::ImageStore,
    token::{JwtConfig, TokenService},
};
use common::database::{DatabaseConfig, init_pool};

async fn live_app() -> Router {
    let db_config = DatabaseConfig::from_env().unwrap();
    let pool = init_pool(&db_config).await.expect("database unavailable");
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    let token_service = TokenService::new(&JwtConfig {
        secret: "api-flow-test-secret".to_string(),
        token_expiry: 3600,
    });
    let image_store = ImageStore::new(std::env::temp_dir().join("recipe-api-flow-test"));

    routes::create_router(AppState::new(pool, token_service, image_store))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn request(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn signup_and_login(app: &Router, email: &str) -> String {
    let response = request(
        app,
        "POST",
        "/users",
        None,
        Some(serde_json::json!({"email": email, "password": "password", "name": "Test Name"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = request(
        app,
        "POST",
        "/users/token",
        None,
        Some(serde_json::json!({"email": email, "password": "password"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

fn sample_png() -> Vec<u8> {
    let img = image::RgbImage::new(10, 10);
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn multipart_image_body(boundary: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; \
             filename=\"test.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

async fn upload_image(
    app: &Router,
    token: &str,
    recipe_id: &str,
    data: &[u8],
) -> axum::response::Response {
    let boundary = "recipe-image-upload";
    app.clone()
        .oneshot(
            Request::post(format!("/recipes/{}/upload-image", recipe_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(multipart_image_body(boundary, data)))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_full_api_flow() {
    let app = live_app().await;
    let run = Uuid::new_v4().simple().to_string();
    let alice_email = format!("alice-{}@example.com", run);
    let bob_email = format!("bob-{}@example.com", run);

    let alice = signup_and_login(&app, &alice_email).await;
    let bob = signup_and_login(&app, &bob_email).await;

    // Duplicate signup is rejected and reports the offending field.
    let response = request(
        &app,
        "POST",
        "/users",
        None,
        Some(serde_json::json!({"email": alice_email, "password": "password"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["errors"]["email"].is_array());

    // Profile reflects signup data and nothing else.
    let response = request(&app, "GET", "/users/me", Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"name": "Test Name", "email": alice_email})
    );

    // Create a recipe with nested tags and ingredients.
    let response = request(
        &app,
        "POST",
        "/recipes",
        Some(&alice),
        Some(serde_json::json!({
            "title": "Sample recipe",
            "time_minutes": 22,
            "price": "5.25",
            "link": "http://example.com/recipe.pdf",
            "tags": [{"name": "Thai"}, {"name": "Dinner"}],
            "ingredients": [{"name": "Prawns"}]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let recipe = body_json(response).await;
    let recipe_id = recipe["id"].as_str().unwrap().to_string();
    assert_eq!(recipe["price"], "5.25");
    assert_eq!(recipe["tags"].as_array().unwrap().len(), 2);

    // Reusing a tag name does not create a duplicate.
    let response = request(
        &app,
        "POST",
        "/recipes",
        Some(&alice),
        Some(serde_json::json!({
            "title": "Second recipe",
            "time_minutes": 10,
            "price": "2.50",
            "tags": [{"name": "Thai"}]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = request(&app, "GET", "/tags", Some(&alice), None).await;
    let tags = body_json(response).await;
    let thai_tags: Vec<_> = tags
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["name"] == "Thai")
        .collect();
    assert_eq!(thai_tags.len(), 1);

    // assigned_only de-duplicates across recipes.
    let response = request(&app, "GET", "/tags?assigned_only=1", Some(&alice), None).await;
    let assigned = body_json(response).await;
    let assigned_thai: Vec<_> = assigned
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["name"] == "Thai")
        .collect();
    assert_eq!(assigned_thai.len(), 1);

    // Cross-owner access looks like a missing resource.
    let detail_path = format!("/recipes/{}", recipe_id);
    let response = request(&app, "GET", &detail_path, Some(&bob), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Bob's listing does not include Alice's recipes.
    let response = request(&app, "GET", "/recipes", Some(&bob), None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    // Partial update keeps untouched fields.
    let response = request(
        &app,
        "PATCH",
        &detail_path,
        Some(&alice),
        Some(serde_json::json!({"title": "New recipe title"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "New recipe title");
    assert_eq!(updated["link"], "http://example.com/recipe.pdf");
    assert_eq!(updated["tags"].as_array().unwrap().len(), 2);

    // Full update clears omitted optional fields; an absent tags key still
    // leaves the association set alone.
    let response = request(
        &app,
        "PUT",
        &detail_path,
        Some(&alice),
        Some(serde_json::json!({
            "title": "Replaced recipe title",
            "time_minutes": 30,
            "price": "4.00"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let replaced = body_json(response).await;
    assert_eq!(replaced["title"], "Replaced recipe title");
    assert!(replaced["link"].is_null());
    assert!(replaced["description"].is_null());
    assert_eq!(replaced["tags"].as_array().unwrap().len(), 2);

    // An empty tag list clears every association.
    let response = request(
        &app,
        "PATCH",
        &detail_path,
        Some(&alice),
        Some(serde_json::json!({"tags": []})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["tags"].as_array().unwrap().len(), 0);

    // Delete, then the detail is gone.
    let response = request(&app, "DELETE", &detail_path, Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = request(&app, "GET", &detail_path, Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_image_upload_flow() {
    let app = live_app().await;
    let run = Uuid::new_v4().simple().to_string();
    let token = signup_and_login(&app, &format!("carol-{}@example.com", run)).await;

    let response = request(
        &app,
        "POST",
        "/recipes",
        Some(&token),
        Some(serde_json::json!({
            "title": "Sample recipe",
            "time_minutes": 10,
            "price": "3.00"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let recipe_id = body_json(response).await["id"].as_str().unwrap().to_string();

    // A decodable image is stored and linked to the recipe.
    let response = upload_image(&app, &token, &recipe_id, &sample_png()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let image_url = body_json(response).await["image"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(image_url.ends_with(".png"));

    // The stored image is served back.
    let response = request(&app, "GET", &image_url, None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Bytes that do not decode as an image are rejected.
    let response = upload_image(&app, &token, &recipe_id, b"notanimage").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["errors"]["image"].is_array());

    // Uploading to a deleted recipe is a 404 and leaves nothing stored.
    let detail_path = format!("/recipes/{}", recipe_id);
    let response = request(&app, "DELETE", &detail_path, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = upload_image(&app, &token, &recipe_id, &sample_png()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
