//! API DTOs (Data Transfer Objects)

use auth::models::{
    address::{Address, InvalidAddress},
    email::Email,
};
use kernel::id::{Id, StoreId, UserId};
use kernel::pagination::Pagination;
use kernel::rating::AverageRating;
use kernel::validation::{ValidationErrors, integer_value};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::application::{
    CreateStoreInput, OwnerDashboard, StoreView, SubmitRatingInput, SystemTotals,
    UpdateStoreInput,
};
use crate::domain::entity::rating::RatingFilter;
use crate::domain::entity::store::{Rater, StoreFilter};
use crate::domain::value_object::{rating_value::RatingValue, store_name::StoreName};

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Distinguishes an explicit `null` from a missing key
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Integer id from a JSON value (numbers or numeric strings)
fn json_id<T>(value: &Value, message: &'static str) -> Result<Id<T>, &'static str> {
    integer_value(value)
        .and_then(|v| i32::try_from(v).ok())
        .map(Id::new)
        .ok_or(message)
}

/// Integer id from a query string value
fn query_id<T>(value: &str, message: &'static str) -> Result<Id<T>, &'static str> {
    value.trim().parse().map_err(|_| message)
}

fn store_address(raw: &str) -> Result<Address, String> {
    Address::required(raw).map_err(|e| match e {
        InvalidAddress::Empty => "Store address is required".to_string(),
        other => other.to_string(),
    })
}

const OWNER_ID_MESSAGE: &str = "Owner ID must be an integer";
const STORE_ID_MESSAGE: &str = "Store ID must be an integer";
const USER_ID_MESSAGE: &str = "User ID must be an integer";

// ============================================================================
// Stores
// ============================================================================

/// Create-store request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateStoreRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub owner_id: Option<Value>,
}

impl CreateStoreRequest {
    pub fn validate(self) -> Result<CreateStoreInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = errors.check("name", StoreName::new(text(&self.name)));
        let email = errors.check("email", Email::new(text(&self.email)));
        let address = errors.check("address", store_address(text(&self.address)));
        let owner_id = errors.check_optional(
            "owner_id",
            self.owner_id
                .as_ref()
                .filter(|v| !v.is_null())
                .map(|v| json_id::<_>(v, OWNER_ID_MESSAGE)),
        );

        match (name, email, address) {
            (Some(name), Some(email), Some(address)) if errors.is_empty() => Ok(CreateStoreInput {
                name,
                email,
                address,
                owner_id,
            }),
            _ => Err(errors),
        }
    }
}

/// Update-store request
///
/// An empty `address` is ignored; `owner_id: null` unassigns the owner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStoreRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub owner_id: Option<Value>,
}

impl UpdateStoreRequest {
    pub fn validate(self) -> Result<UpdateStoreInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let input = UpdateStoreInput {
            name: errors.check_optional("name", self.name.map(StoreName::new)),
            email: errors.check_optional("email", self.email.map(Email::new)),
            address: errors.check_optional("address", non_empty(self.address).map(Address::new)),
            owner_id: match &self.owner_id {
                None => None,
                Some(Value::Null) => Some(None),
                Some(v) => errors
                    .check("owner_id", json_id(v, OWNER_ID_MESSAGE))
                    .map(Some),
            },
        };

        errors.into_result()?;
        Ok(input)
    }
}

/// `GET /api/stores` filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreListQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<StoreListQuery> for StoreFilter {
    fn from(query: StoreListQuery) -> Self {
        Self {
            name: non_empty(query.name),
            email: non_empty(query.email),
            address: non_empty(query.address),
        }
    }
}

/// Store listing row
#[derive(Debug, Clone, Serialize)]
pub struct StoreListItem {
    pub id: StoreId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub average_rating: AverageRating,
    pub rating_count: i64,
    /// Present only for signed-in callers; `null` when they have not rated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<Option<RatingValue>>,
}

impl From<StoreView> for StoreListItem {
    fn from(view: StoreView) -> Self {
        let store = view.store;
        Self {
            id: store.id,
            name: store.name,
            email: store.email,
            address: store.address,
            average_rating: store.average_rating,
            rating_count: store.rating_count,
            user_rating: view.user_rating,
        }
    }
}

/// Store detail; the listing row plus `owner_id`
#[derive(Debug, Clone, Serialize)]
pub struct StoreDetailResponse {
    pub id: StoreId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Option<UserId>,
    pub average_rating: AverageRating,
    pub rating_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<Option<RatingValue>>,
}

impl From<StoreView> for StoreDetailResponse {
    fn from(view: StoreView) -> Self {
        let store = view.store;
        Self {
            id: store.id,
            name: store.name,
            email: store.email,
            address: store.address,
            owner_id: store.owner_id,
            average_rating: store.average_rating,
            rating_count: store.rating_count,
            user_rating: view.user_rating,
        }
    }
}

// ============================================================================
// Ratings
// ============================================================================

/// Rating submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitRatingRequest {
    pub store_id: Option<Value>,
    pub rating_value: Option<Value>,
}

impl SubmitRatingRequest {
    pub fn validate(self, user_id: UserId) -> Result<SubmitRatingInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let store_id = errors.check(
            "store_id",
            json_id(self.store_id.as_ref().unwrap_or(&Value::Null), STORE_ID_MESSAGE),
        );
        let rating_value = errors.check(
            "rating_value",
            RatingValue::from_json(self.rating_value.as_ref().unwrap_or(&Value::Null)),
        );

        match (store_id, rating_value) {
            (Some(store_id), Some(rating_value)) => Ok(SubmitRatingInput {
                user_id,
                store_id,
                rating_value,
            }),
            _ => Err(errors),
        }
    }
}

/// `GET /api/ratings` filters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingListQuery {
    pub user_id: Option<String>,
    pub store_id: Option<String>,
    pub min_rating: Option<String>,
    pub max_rating: Option<String>,
}

impl RatingListQuery {
    pub fn validate(self) -> Result<RatingFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let bound = |raw: &str| {
            raw.trim()
                .parse::<i64>()
                .ok()
                .and_then(|v| RatingValue::new(v).ok())
                .ok_or("Rating must be an integer between 1 and 5")
        };

        let filter = RatingFilter {
            user_id: errors.check_optional(
                "userId",
                non_empty(self.user_id).map(|v| query_id(&v, USER_ID_MESSAGE)),
            ),
            store_id: errors.check_optional(
                "storeId",
                non_empty(self.store_id).map(|v| query_id(&v, STORE_ID_MESSAGE)),
            ),
            min_rating: errors.check_optional("minRating", non_empty(self.min_rating).map(|v| bound(&v))),
            max_rating: errors.check_optional("maxRating", non_empty(self.max_rating).map(|v| bound(&v))),
        };

        errors.into_result()?;
        Ok(filter)
    }
}

/// `GET /api/ratings/count`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

// ============================================================================
// Dashboards
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardResponse {
    pub total_users: i64,
    pub total_stores: i64,
    pub total_ratings: i64,
}

impl From<SystemTotals> for AdminDashboardResponse {
    fn from(totals: SystemTotals) -> Self {
        Self {
            total_users: totals.users,
            total_stores: totals.stores,
            total_ratings: totals.ratings,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStore {
    pub id: StoreId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub average_rating: AverageRating,
    pub total_ratings: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreOwnerDashboardResponse {
    pub store: DashboardStore,
    pub raters: Vec<Rater>,
    pub pagination: Pagination,
}

impl From<OwnerDashboard> for StoreOwnerDashboardResponse {
    fn from(dashboard: OwnerDashboard) -> Self {
        let store = dashboard.store;
        Self {
            store: DashboardStore {
                id: store.id,
                name: store.name,
                email: store.email,
                address: store.address,
                average_rating: store.average_rating,
                total_ratings: store.rating_count,
            },
            raters: dashboard.raters.items,
            pagination: dashboard.raters.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(body: Value) -> Result<UpdateStoreInput, ValidationErrors> {
        serde_json::from_value::<UpdateStoreRequest>(body)
            .unwrap()
            .validate()
    }

    #[test]
    fn test_create_store_collects_every_error() {
        let errors = CreateStoreRequest {
            name: Some("  ".into()),
            email: Some("not-an-email".into()),
            address: None,
            owner_id: Some(json!("abc")),
        }
        .validate()
        .unwrap_err();

        let fields: Vec<_> = errors.into_iter().map(|e| (e.field, e.message)).collect();
        assert_eq!(
            fields,
            vec![
                ("name".to_string(), "Store name is required".to_string()),
                ("email".to_string(), "Must provide a valid email address".to_string()),
                ("address".to_string(), "Store address is required".to_string()),
                ("owner_id".to_string(), "Owner ID must be an integer".to_string()),
            ]
        );
    }

    #[test]
    fn test_create_store_null_owner_is_unowned() {
        let input = serde_json::from_value::<CreateStoreRequest>(json!({
            "name": "Corner Shop",
            "email": "Shop@Example.com",
            "address": "1 Main Street",
            "owner_id": null
        }))
        .unwrap()
        .validate()
        .unwrap();

        assert_eq!(input.email.as_str(), "shop@example.com");
        assert!(input.owner_id.is_none());
    }

    #[test]
    fn test_update_owner_presence() {
        assert_eq!(update(json!({})).unwrap().owner_id, None);
        assert_eq!(update(json!({"owner_id": null})).unwrap().owner_id, Some(None));
        assert_eq!(
            update(json!({"owner_id": "7"})).unwrap().owner_id,
            Some(Some(UserId::new(7)))
        );
        assert!(update(json!({"owner_id": 1.5})).is_err());
    }

    #[test]
    fn test_update_ignores_empty_address() {
        let input = update(json!({"address": ""})).unwrap();
        assert!(input.address.is_none());
    }

    #[test]
    fn test_submit_rating_validation() {
        let user = UserId::new(1);
        let ok = SubmitRatingRequest {
            store_id: Some(json!(3)),
            rating_value: Some(json!("5")),
        }
        .validate(user)
        .unwrap();
        assert_eq!(ok.store_id, StoreId::new(3));
        assert_eq!(ok.rating_value.get(), 5);

        let errors = SubmitRatingRequest {
            store_id: None,
            rating_value: Some(json!(6)),
        }
        .validate(user)
        .unwrap_err();
        let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
        assert_eq!(
            messages,
            vec!["Store ID must be an integer", "Rating must be an integer between 1 and 5"]
        );
    }

    #[test]
    fn test_rating_filter_bounds() {
        let filter = RatingListQuery {
            min_rating: Some("2".into()),
            max_rating: Some("".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(filter.min_rating.map(RatingValue::get), Some(2));
        assert!(filter.max_rating.is_none());

        assert!(
            RatingListQuery {
                min_rating: Some("0".into()),
                ..Default::default()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_user_rating_omitted_for_anonymous() {
        let item = |user_rating| StoreListItem {
            id: StoreId::new(1),
            name: "Corner Shop".into(),
            email: "shop@example.com".into(),
            address: "1 Main Street".into(),
            average_rating: AverageRating::ZERO,
            rating_count: 0,
            user_rating,
        };

        let anonymous = serde_json::to_value(item(None)).unwrap();
        assert!(anonymous.get("user_rating").is_none());
        assert_eq!(anonymous["average_rating"], "0.0");

        let unrated = serde_json::to_value(item(Some(None))).unwrap();
        assert_eq!(unrated["user_rating"], Value::Null);
    }
}
