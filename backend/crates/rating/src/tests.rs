//! Router-level tests against in-memory repositories

use std::sync::{Arc, Mutex};

use auth::AuthConfig;
use auth::application::tokens::issue_pair;
use auth::domain::entity::user::{
    NewUser, User, UserChanges, UserCredentials, UserFilter, UserSummary,
};
use auth::domain::repository::UserRepository;
use auth::models::{email::Email, user_role::UserRole};
use auth::AuthResult;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::Utc;
use kernel::id::{RatingId, StoreId, UserId};
use kernel::pagination::{Page, PageRequest};
use kernel::rating::AverageRating;
use platform::password::HashedPassword;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::domain::entity::rating::{
    Rating, RatingDetail, RatingFilter, RatingListItem, SubmitOutcome,
};
use crate::domain::entity::store::{NewStore, Rater, StoreChanges, StoreFilter, StoreSummary};
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::domain::value_object::rating_value::RatingValue;
use crate::error::RatingResult;
use crate::presentation::router::{
    dashboard_router_generic, rating_router_generic, store_router_generic,
};

// ============================================================================
// In-memory repositories
// ============================================================================

struct StoredStore {
    id: StoreId,
    name: String,
    email: String,
    address: String,
    owner_id: Option<UserId>,
}

#[derive(Default)]
struct World {
    users: Vec<User>,
    stores: Vec<StoredStore>,
    ratings: Vec<Rating>,
    next_user: i32,
    next_store: i32,
    next_rating: i32,
}

impl World {
    fn summary(&self, store: &StoredStore) -> StoreSummary {
        let values: Vec<_> = self
            .ratings
            .iter()
            .filter(|r| r.store_id == store.id)
            .map(|r| r.rating_value)
            .collect();
        StoreSummary {
            id: store.id,
            name: store.name.clone(),
            email: store.email.clone(),
            address: store.address.clone(),
            owner_id: store.owner_id,
            average_rating: AverageRating::of(values.iter().copied()),
            rating_count: values.len() as i64,
        }
    }

    fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn store(&self, id: StoreId) -> Option<&StoredStore> {
        self.stores.iter().find(|s| s.id == id)
    }
}

/// Case-insensitive substring filter; `None` matches everything
fn contains(haystack: &str, needle: &Option<String>) -> bool {
    needle
        .as_ref()
        .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Page::new(items, page, total)
}

#[derive(Clone, Default)]
struct MemoryUsers {
    world: Arc<Mutex<World>>,
}

impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        Ok(self.world.lock().unwrap().user(id).cloned())
    }

    async fn find_credentials_by_email(
        &self,
        _email: &Email,
    ) -> AuthResult<Option<UserCredentials>> {
        Ok(None)
    }

    async fn find_credentials_by_id(&self, _id: UserId) -> AuthResult<Option<UserCredentials>> {
        Ok(None)
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let world = self.world.lock().unwrap();
        Ok(world.users.iter().any(|u| &u.email == email))
    }

    async fn role_id(&self, role: UserRole) -> AuthResult<Option<i32>> {
        Ok(UserRole::ALL.iter().position(|r| *r == role).map(|i| i as i32 + 1))
    }

    async fn create(&self, _user: &NewUser) -> AuthResult<UserId> {
        unreachable!("users are seeded directly")
    }

    async fn update(&self, _id: UserId, _changes: &UserChanges) -> AuthResult<()> {
        unreachable!("user updates are not routed here")
    }

    async fn update_password(
        &self,
        _id: UserId,
        _password: &HashedPassword,
    ) -> AuthResult<()> {
        unreachable!("password changes are not routed here")
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        let mut world = self.world.lock().unwrap();
        let before = world.users.len();
        world.users.retain(|u| u.id != id);
        Ok(world.users.len() < before)
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> AuthResult<Page<UserSummary>> {
        let world = self.world.lock().unwrap();
        let matching = world
            .users
            .iter()
            .filter(|u| contains(&u.name, &filter.name))
            .map(|u| UserSummary {
                user: u.clone(),
                ranking: None,
            })
            .collect();
        Ok(paginate(matching, page))
    }

    async fn owns_store(&self, owner: UserId) -> AuthResult<bool> {
        let world = self.world.lock().unwrap();
        Ok(world.stores.iter().any(|s| s.owner_id == Some(owner)))
    }

    async fn owned_store_rating(&self, owner: UserId) -> AuthResult<AverageRating> {
        let world = self.world.lock().unwrap();
        Ok(world
            .stores
            .iter()
            .find(|s| s.owner_id == Some(owner))
            .map(|s| world.summary(s).average_rating)
            .unwrap_or(AverageRating::ZERO))
    }

    async fn count(&self) -> AuthResult<i64> {
        Ok(self.world.lock().unwrap().users.len() as i64)
    }
}

#[derive(Clone, Default)]
struct MemoryStores {
    world: Arc<Mutex<World>>,
}

impl StoreRepository for MemoryStores {
    async fn list(
        &self,
        filter: &StoreFilter,
        page: PageRequest,
    ) -> RatingResult<Page<StoreSummary>> {
        let world = self.world.lock().unwrap();
        let matching = world
            .stores
            .iter()
            .filter(|s| contains(&s.name, &filter.name))
            .filter(|s| contains(&s.email, &filter.email))
            .filter(|s| contains(&s.address, &filter.address))
            .map(|s| world.summary(s))
            .collect();
        Ok(paginate(matching, page))
    }

    async fn find_by_id(&self, id: StoreId) -> RatingResult<Option<StoreSummary>> {
        let world = self.world.lock().unwrap();
        Ok(world.store(id).map(|s| world.summary(s)))
    }

    async fn find_by_owner(&self, owner: UserId) -> RatingResult<Option<StoreSummary>> {
        let world = self.world.lock().unwrap();
        Ok(world
            .stores
            .iter()
            .find(|s| s.owner_id == Some(owner))
            .map(|s| world.summary(s)))
    }

    async fn create(&self, store: &NewStore) -> RatingResult<StoreId> {
        let mut world = self.world.lock().unwrap();
        world.next_store += 1;
        let id = StoreId::new(world.next_store);
        world.stores.push(StoredStore {
            id,
            name: store.name.as_str().to_owned(),
            email: store.email.as_str().to_owned(),
            address: store.address.as_str().to_owned(),
            owner_id: store.owner_id,
        });
        Ok(id)
    }

    async fn update(&self, id: StoreId, changes: &StoreChanges) -> RatingResult<()> {
        let mut world = self.world.lock().unwrap();
        if let Some(s) = world.stores.iter_mut().find(|s| s.id == id) {
            if let Some(name) = &changes.name {
                s.name = name.as_str().to_owned();
            }
            if let Some(email) = &changes.email {
                s.email = email.as_str().to_owned();
            }
            if let Some(address) = &changes.address {
                s.address = address.as_str().to_owned();
            }
            if let Some(owner) = changes.owner {
                s.owner_id = owner;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: StoreId) -> RatingResult<bool> {
        let mut world = self.world.lock().unwrap();
        let before = world.stores.len();
        world.stores.retain(|s| s.id != id);
        world.ratings.retain(|r| r.store_id != id);
        Ok(world.stores.len() < before)
    }

    async fn raters(&self, store: StoreId, page: PageRequest) -> RatingResult<Page<Rater>> {
        let world = self.world.lock().unwrap();
        let raters = world
            .ratings
            .iter()
            .filter(|r| r.store_id == store)
            .filter_map(|r| {
                world.user(r.user_id).map(|u| Rater {
                    id: u.id,
                    name: u.name.clone(),
                    email: u.email.as_str().to_owned(),
                    address: u.address.clone(),
                    rating_value: r.rating_value,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                })
            })
            .collect();
        Ok(paginate(raters, page))
    }

    async fn count_stores(&self) -> RatingResult<i64> {
        Ok(self.world.lock().unwrap().stores.len() as i64)
    }
}

impl RatingRepository for MemoryStores {
    async fn upsert(
        &self,
        user: UserId,
        store: StoreId,
        value: RatingValue,
    ) -> RatingResult<(RatingId, SubmitOutcome)> {
        let mut world = self.world.lock().unwrap();
        let now = Utc::now();
        if let Some(r) = world
            .ratings
            .iter_mut()
            .find(|r| r.user_id == user && r.store_id == store)
        {
            r.rating_value = value;
            r.updated_at = now;
            return Ok((r.id, SubmitOutcome::Updated));
        }
        world.next_rating += 1;
        let id = RatingId::new(world.next_rating);
        world.ratings.push(Rating {
            id,
            user_id: user,
            store_id: store,
            rating_value: value,
            created_at: now,
            updated_at: now,
        });
        Ok((id, SubmitOutcome::Created))
    }

    async fn find_detail(&self, id: RatingId) -> RatingResult<Option<RatingDetail>> {
        let world = self.world.lock().unwrap();
        Ok(world.ratings.iter().find(|r| r.id == id).and_then(|r| {
            let user = world.user(r.user_id)?;
            let store = world.store(r.store_id)?;
            Some(RatingDetail {
                id: r.id,
                rating_value: r.rating_value,
                created_at: r.created_at,
                updated_at: r.updated_at,
                user_id: r.user_id,
                store_id: r.store_id,
                user_name: user.name.clone(),
                store_name: store.name.clone(),
            })
        }))
    }

    async fn find_by_user_and_store(
        &self,
        user: UserId,
        store: StoreId,
    ) -> RatingResult<Option<Rating>> {
        let world = self.world.lock().unwrap();
        Ok(world
            .ratings
            .iter()
            .find(|r| r.user_id == user && r.store_id == store)
            .cloned())
    }

    async fn ratings_by_user(
        &self,
        user: UserId,
        stores: &[StoreId],
    ) -> RatingResult<Vec<(StoreId, RatingValue)>> {
        let world = self.world.lock().unwrap();
        Ok(world
            .ratings
            .iter()
            .filter(|r| r.user_id == user && stores.contains(&r.store_id))
            .map(|r| (r.store_id, r.rating_value))
            .collect())
    }

    async fn search(
        &self,
        filter: &RatingFilter,
        page: PageRequest,
    ) -> RatingResult<Page<RatingListItem>> {
        let world = self.world.lock().unwrap();
        let matching = world
            .ratings
            .iter()
            .filter(|r| filter.user_id.is_none_or(|u| u == r.user_id))
            .filter(|r| filter.store_id.is_none_or(|s| s == r.store_id))
            .filter(|r| filter.min_rating.is_none_or(|m| r.rating_value >= m))
            .filter(|r| filter.max_rating.is_none_or(|m| r.rating_value <= m))
            .filter_map(|r| {
                let user = world.user(r.user_id)?;
                let store = world.store(r.store_id)?;
                Some(RatingListItem {
                    id: r.id,
                    rating_value: r.rating_value,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                    user_name: user.name.clone(),
                    user_email: user.email.as_str().to_owned(),
                    store_name: store.name.clone(),
                })
            })
            .collect();
        Ok(paginate(matching, page))
    }

    async fn count_ratings(&self) -> RatingResult<i64> {
        Ok(self.world.lock().unwrap().ratings.len() as i64)
    }
}

// ============================================================================
// Harness
// ============================================================================

struct TestApp {
    router: Router,
    world: Arc<Mutex<World>>,
    config: Arc<AuthConfig>,
}

impl TestApp {
    fn new() -> Self {
        let world = Arc::new(Mutex::new(World::default()));
        let stores = Arc::new(MemoryStores {
            world: world.clone(),
        });
        let users = Arc::new(MemoryUsers {
            world: world.clone(),
        });
        let config = Arc::new(AuthConfig::with_random_secret());

        let router = Router::new()
            .nest(
                "/api/stores",
                store_router_generic(stores.clone(), users.clone(), config.clone()),
            )
            .nest(
                "/api/ratings",
                rating_router_generic(stores.clone(), users.clone(), config.clone()),
            )
            .nest(
                "/api/dashboard",
                dashboard_router_generic(stores, users, config.clone()),
            );

        Self {
            router,
            world,
            config,
        }
    }

    /// Insert a user directly and return an access token for it
    fn seed_user(&self, name: &str, email: &str, role: UserRole) -> (UserId, String) {
        let user = {
            let mut world = self.world.lock().unwrap();
            world.next_user += 1;
            let now = Utc::now();
            let user = User {
                id: UserId::new(world.next_user),
                name: name.to_owned(),
                email: Email::new(email).unwrap(),
                address: "1 Test Road".to_owned(),
                role,
                created_at: now,
                updated_at: now,
            };
            world.users.push(user.clone());
            user
        };
        let tokens = issue_pair(&self.config, &user).unwrap();
        (user.id, tokens.token)
    }

    fn seed_store(&self, name: &str, owner: Option<UserId>) -> StoreId {
        let mut world = self.world.lock().unwrap();
        world.next_store += 1;
        let id = StoreId::new(world.next_store);
        world.stores.push(StoredStore {
            id,
            name: name.to_owned(),
            email: format!("store{}@example.com", id.get()),
            address: "2 Market Square".to_owned(),
            owner_id: owner,
        });
        id
    }

    fn rating_rows(&self, user: UserId, store: StoreId) -> usize {
        let world = self.world.lock().unwrap();
        world
            .ratings
            .iter()
            .filter(|r| r.user_id == user && r.store_id == store)
            .count()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

const ADMIN_NAME: &str = "System Administrator Account";
const SHOPPER_NAME: &str = "Regular Shopper With Long Name";
const OWNER_NAME: &str = "Owner Of The Corner Shop";

// ============================================================================
// Ratings
// ============================================================================

#[tokio::test]
async fn test_submit_then_resubmit_keeps_one_row() {
    let app = TestApp::new();
    let (shopper, token) = app.seed_user(SHOPPER_NAME, "shopper@example.com", UserRole::User);
    let store = app.seed_store("Corner Shop", None);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/ratings",
            Some(&token),
            Some(json!({"store_id": store.get(), "rating_value": 4})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rating submitted successfully");
    assert_eq!(body["data"]["rating_value"], 4);
    assert_eq!(body["data"]["user_name"], SHOPPER_NAME);
    assert_eq!(body["data"]["store_name"], "Corner Shop");
    let first_id = body["data"]["id"].clone();

    // Same value again is still a single row
    let (_, body) = app
        .send(
            Method::POST,
            "/api/ratings",
            Some(&token),
            Some(json!({"store_id": store.get(), "rating_value": 4})),
        )
        .await;
    assert_eq!(body["message"], "Rating updated successfully");
    assert_eq!(app.rating_rows(shopper, store), 1);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/ratings",
            Some(&token),
            Some(json!({"store_id": store.get().to_string(), "rating_value": "2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rating updated successfully");
    assert_eq!(body["data"]["id"], first_id);
    assert_eq!(app.rating_rows(shopper, store), 1);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/ratings/store/{}", store.get()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rating_value"], 2);
    assert_eq!(body["data"]["user_id"], shopper.get());
}

#[tokio::test]
async fn test_submit_rating_rejections() {
    let app = TestApp::new();
    let (_, shopper) = app.seed_user(SHOPPER_NAME, "shopper@example.com", UserRole::User);
    let (_, admin) = app.seed_user(ADMIN_NAME, "admin@example.com", UserRole::Admin);
    let store = app.seed_store("Corner Shop", None);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/ratings",
            Some(&shopper),
            Some(json!({"store_id": store.get(), "rating_value": 6})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation Error");
    assert_eq!(body["errors"][0]["field"], "rating_value");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/ratings",
            Some(&shopper),
            Some(json!({"store_id": 999, "rating_value": 3})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Store not found");

    // Only plain users rate stores
    let (status, _) = app
        .send(
            Method::POST,
            "/api/ratings",
            Some(&admin),
            Some(json!({"store_id": store.get(), "rating_value": 3})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/ratings",
            None,
            Some(json!({"store_id": store.get(), "rating_value": 3})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_my_rating_not_found() {
    let app = TestApp::new();
    let (_, token) = app.seed_user(SHOPPER_NAME, "shopper@example.com", UserRole::User);
    let store = app.seed_store("Corner Shop", None);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/ratings/store/{}", store.get()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Rating not found");
}

#[tokio::test]
async fn test_admin_rating_listing_and_count() {
    let app = TestApp::new();
    let (_, admin) = app.seed_user(ADMIN_NAME, "admin@example.com", UserRole::Admin);
    let (_, shopper) = app.seed_user(SHOPPER_NAME, "shopper@example.com", UserRole::User);
    let low = app.seed_store("Low Street Shop", None);
    let high = app.seed_store("High Street Shop", None);

    for (store, value) in [(low, 1), (high, 5)] {
        app.send(
            Method::POST,
            "/api/ratings",
            Some(&shopper),
            Some(json!({"store_id": store.get(), "rating_value": value})),
        )
        .await;
    }

    let (status, body) = app
        .send(Method::GET, "/api/ratings?minRating=3", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["store_name"], "High Street Shop");
    assert_eq!(body["data"][0]["user_email"], "shopper@example.com");

    let (status, body) = app
        .send(Method::GET, "/api/ratings?maxRating=9", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "maxRating");

    let (_, body) = app
        .send(Method::GET, "/api/ratings/count", Some(&admin), None)
        .await;
    assert_eq!(body["data"]["count"], 2);

    let (status, _) = app
        .send(Method::GET, "/api/ratings/count", Some(&shopper), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// Stores
// ============================================================================

#[tokio::test]
async fn test_store_averages_render_one_decimal() {
    let app = TestApp::new();
    let rated = app.seed_store("Rated Shop", None);
    app.seed_store("Quiet Shop", None);

    for (i, value) in [3, 5].into_iter().enumerate() {
        let (_, token) = app.seed_user(
            SHOPPER_NAME,
            &format!("shopper{i}@example.com"),
            UserRole::User,
        );
        app.send(
            Method::POST,
            "/api/ratings",
            Some(&token),
            Some(json!({"store_id": rated.get(), "rating_value": value})),
        )
        .await;
    }

    let (status, body) = app.send(Method::GET, "/api/stores", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["average_rating"], "4.0");
    assert_eq!(body["data"][0]["rating_count"], 2);
    assert_eq!(body["data"][1]["average_rating"], "0.0");
    assert_eq!(body["data"][1]["rating_count"], 0);
    assert!(body["data"][0].get("user_rating").is_none());
}

#[tokio::test]
async fn test_store_listing_personalised_for_signed_in_caller() {
    let app = TestApp::new();
    let (_, token) = app.seed_user(SHOPPER_NAME, "shopper@example.com", UserRole::User);
    let rated = app.seed_store("Rated Shop", None);
    let unrated = app.seed_store("Unrated Shop", None);

    app.send(
        Method::POST,
        "/api/ratings",
        Some(&token),
        Some(json!({"store_id": rated.get(), "rating_value": 5})),
    )
    .await;

    let (_, body) = app.send(Method::GET, "/api/stores", Some(&token), None).await;
    assert_eq!(body["data"][0]["user_rating"], 5);
    assert_eq!(body["data"][1]["user_rating"], Value::Null);
    assert!(body["data"][1].get("user_rating").is_some());

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/stores/{}", unrated.get()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["owner_id"], Value::Null);
    assert_eq!(body["data"]["user_rating"], Value::Null);

    // A broken token on a public route falls back to anonymous
    let (status, body) = app
        .send(Method::GET, "/api/stores", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"][0].get("user_rating").is_none());
}

#[tokio::test]
async fn test_store_pagination_past_last_page() {
    let app = TestApp::new();
    for i in 0..5 {
        app.seed_store(&format!("Shop {i}"), None);
    }

    let (status, body) = app
        .send(Method::GET, "/api/stores?page=2&limit=2", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["totalPages"], 3);

    let (status, body) = app
        .send(Method::GET, "/api/stores?page=9&limit=2", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(
        body["pagination"],
        json!({"page": 9, "limit": 2, "total": 5, "totalPages": 3})
    );

    let (status, body) = app
        .send(Method::GET, "/api/stores?limit=0", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "limit");
}

#[tokio::test]
async fn test_store_name_filter() {
    let app = TestApp::new();
    app.seed_store("Green Grocer", None);
    app.seed_store("Hardware Depot", None);

    let (_, body) = app
        .send(Method::GET, "/api/stores?name=GROCER", None, None)
        .await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Green Grocer");
}

#[tokio::test]
async fn test_admin_store_lifecycle() {
    let app = TestApp::new();
    let (_, admin) = app.seed_user(ADMIN_NAME, "admin@example.com", UserRole::Admin);
    let (owner, _) = app.seed_user(OWNER_NAME, "owner@example.com", UserRole::StoreOwner);
    let (shopper, shopper_token) =
        app.seed_user(SHOPPER_NAME, "shopper@example.com", UserRole::User);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/stores",
            Some(&admin),
            Some(json!({
                "name": "Corner Shop",
                "email": "Corner@Example.com",
                "address": "3 High Street",
                "owner_id": owner.get()
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Store created successfully");
    assert_eq!(body["data"]["email"], "corner@example.com");
    assert_eq!(body["data"]["owner_id"], owner.get());
    assert_eq!(body["data"]["average_rating"], "0.0");
    let id = body["data"]["id"].as_i64().unwrap();

    // Owner must be a STORE_OWNER
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/stores/{id}"),
            Some(&admin),
            Some(json!({"owner_id": shopper.get()})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "User must have a STORE_OWNER role to be assigned as owner"
    );

    let (status, body) = app
        .send(
            Method::POST,
            "/api/stores",
            Some(&admin),
            Some(json!({
                "name": "Ghost Shop",
                "email": "ghost@example.com",
                "address": "4 High Street",
                "owner_id": 999
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Owner not found");

    // One store per owner
    let (status, _) = app
        .send(
            Method::POST,
            "/api/stores",
            Some(&admin),
            Some(json!({
                "name": "Second Shop",
                "email": "second@example.com",
                "address": "5 High Street",
                "owner_id": owner.get()
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/stores/{id}"),
            Some(&admin),
            Some(json!({"name": "Corner Shop Renamed", "address": "", "owner_id": null})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Store updated successfully");
    assert_eq!(body["data"]["name"], "Corner Shop Renamed");
    assert_eq!(body["data"]["address"], "3 High Street");
    assert_eq!(body["data"]["owner_id"], Value::Null);

    // Non-admins cannot write
    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/stores/{id}"),
            Some(&shopper_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/stores/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Store deleted successfully");

    let (status, body) = app
        .send(Method::GET, &format!("/api/stores/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Store not found");
}

#[tokio::test]
async fn test_raters_visible_to_owning_store_owner_only() {
    let app = TestApp::new();
    let (_, admin) = app.seed_user(ADMIN_NAME, "admin@example.com", UserRole::Admin);
    let (owner, owner_token) =
        app.seed_user(OWNER_NAME, "owner@example.com", UserRole::StoreOwner);
    let (_, shopper) = app.seed_user(SHOPPER_NAME, "shopper@example.com", UserRole::User);
    let own = app.seed_store("Corner Shop", Some(owner));
    let other = app.seed_store("Rival Shop", None);

    app.send(
        Method::POST,
        "/api/ratings",
        Some(&shopper),
        Some(json!({"store_id": own.get(), "rating_value": 3})),
    )
    .await;

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/stores/{}/raters", own.get()),
            Some(&owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], SHOPPER_NAME);
    assert_eq!(body["data"][0]["rating_value"], 3);
    assert_eq!(body["pagination"]["total"], 1);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/stores/{}/raters", other.get()),
            Some(&owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "You do not have permission to access this resource"
    );

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/stores/{}/raters", other.get()),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/stores/{}/raters", own.get()),
            Some(&shopper),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::GET, "/api/stores/99/raters", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Dashboards
// ============================================================================

#[tokio::test]
async fn test_admin_dashboard_totals() {
    let app = TestApp::new();
    let (_, admin) = app.seed_user(ADMIN_NAME, "admin@example.com", UserRole::Admin);
    let (_, shopper) = app.seed_user(SHOPPER_NAME, "shopper@example.com", UserRole::User);
    let store = app.seed_store("Corner Shop", None);
    app.seed_store("Rival Shop", None);
    app.send(
        Method::POST,
        "/api/ratings",
        Some(&shopper),
        Some(json!({"store_id": store.get(), "rating_value": 5})),
    )
    .await;

    let (status, body) = app
        .send(Method::GET, "/api/dashboard/admin", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"totalUsers": 2, "totalStores": 2, "totalRatings": 1})
    );

    let (status, _) = app
        .send(Method::GET, "/api/dashboard/admin", Some(&shopper), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_store_owner_dashboard() {
    let app = TestApp::new();
    let (owner, owner_token) =
        app.seed_user(OWNER_NAME, "owner@example.com", UserRole::StoreOwner);
    let (_, idle_token) =
        app.seed_user("Owner Without Any Store", "idle@example.com", UserRole::StoreOwner);
    let (_, shopper) = app.seed_user(SHOPPER_NAME, "shopper@example.com", UserRole::User);
    let store = app.seed_store("Corner Shop", Some(owner));

    app.send(
        Method::POST,
        "/api/ratings",
        Some(&shopper),
        Some(json!({"store_id": store.get(), "rating_value": 4})),
    )
    .await;

    let (status, body) = app
        .send(Method::GET, "/api/dashboard/store-owner", Some(&owner_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["store"]["name"], "Corner Shop");
    assert_eq!(body["data"]["store"]["averageRating"], "4.0");
    assert_eq!(body["data"]["store"]["totalRatings"], 1);
    assert_eq!(body["data"]["raters"][0]["email"], "shopper@example.com");
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (status, body) = app
        .send(Method::GET, "/api/dashboard/store-owner", Some(&idle_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "You do not have a store assigned");
}
