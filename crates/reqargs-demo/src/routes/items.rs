//! # Catalog Routes
//!
//! | Method | Path | Arguments from | Guard |
//! |--------|------|----------------|-------|
//! | `GET` | `/v1/items` | query string | `Validated<ListItems>` |
//! | `POST` | `/v1/items` | form body | `Validated<NewItem>` |
//! | `POST` | `/v1/items/lookup` | JSON body | `Validated<Lookup>` |
//! | `GET` | `/v1/items/{id}` | route parameters | `validated(item_args())` |
//! | `GET`, `POST` | `/v1/search` | query string and form | `validated(search_args())` |

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use reqargs_axum::{validated, ArgSchema, ErrorBody, ErrorDetail, SchemaCell, Validated};
use reqargs_core::{
    Args, Field, FieldType, RangeInfo, Schema, SchemaError, Source, Validator, Value,
};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::state::{AppState, Item, Order};

/// Pagination arguments shared by every listing.
pub fn paging() -> Result<Schema, SchemaError> {
    Schema::builder().field(Field::range("range")).build()
}

/// `GET /v1/items` arguments.
pub struct ListItems;

impl ArgSchema for ListItems {
    const SOURCE: Source = Source::QueryString;

    fn schema() -> Result<Arc<Schema>, SchemaError> {
        static CELL: SchemaCell = SchemaCell::new();
        CELL.get_or_build(|| {
            let base = paging()?;
            Schema::builder()
                .extend(&base)
                .field(Field::optional("tag", FieldType::Str))
                .field(
                    Field::new("order", FieldType::one_of(["id", "name", "price"]))
                        .with_default("id"),
                )
                .build()
        })
    }
}

/// `POST /v1/items` arguments.
pub struct NewItem;

impl ArgSchema for NewItem {
    const SOURCE: Source = Source::Form;

    fn schema() -> Result<Arc<Schema>, SchemaError> {
        static CELL: SchemaCell = SchemaCell::new();
        CELL.get_or_build(|| {
            Schema::builder()
                .field(Field::new("name", FieldType::Str).with_transform(trim))
                .field(Field::new("price", FieldType::int_range(Some(0), None)))
                .field(Field::optional("tags", FieldType::csv(FieldType::Str)))
                .build()
        })
    }
}

/// `POST /v1/items/lookup` arguments.
pub struct Lookup;

impl ArgSchema for Lookup {
    const SOURCE: Source = Source::JsonBody;

    fn schema() -> Result<Arc<Schema>, SchemaError> {
        static CELL: SchemaCell = SchemaCell::new();
        CELL.get_or_build(|| {
            Schema::builder()
                .field(Field::new("ids", FieldType::JsonList))
                .build()
        })
    }
}

/// `GET /v1/items/{id}` arguments.
pub fn item_args() -> Result<Validator, SchemaError> {
    Validator::rparams(&[], [Field::new("id", FieldType::Int)])
}

/// `/v1/search` arguments.
pub fn search_args() -> Result<Validator, SchemaError> {
    Validator::params(
        &[],
        [
            Field::new("q", FieldType::Str),
            Field::new("limit", FieldType::int_range(Some(1), Some(50))).with_default(10i64),
        ],
    )
}

pub fn router(state: AppState) -> Result<Router<AppState>, SchemaError> {
    let show = {
        let state = state.clone();
        move |args: Args| show_item(state.clone(), args)
    };
    let search = move |args: Args| search_items(state.clone(), args);
    let search_v = search_args()?;

    Ok(Router::new()
        .route("/v1/items", get(list_items).post(create_item))
        .route("/v1/items/lookup", post(lookup_items))
        .route("/v1/items/{id}", get(validated(item_args()?, show)))
        .route(
            "/v1/search",
            get(validated(search_v.clone(), search.clone())).post(validated(search_v, search)),
        ))
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct ItemPage {
    pub total: usize,
    pub offset: u64,
    pub limit: Option<u64>,
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct LookupResult {
    pub items: Vec<Item>,
    /// Requested ids with no matching item, as sent.
    pub missing: Vec<JsonValue>,
}

async fn list_items(State(state): State<AppState>, args: Validated<ListItems>) -> Json<ItemPage> {
    let tag = args.get("tag").and_then(Value::as_str);
    let order = args
        .get("order")
        .and_then(Value::as_str)
        .and_then(Order::parse)
        .unwrap_or(Order::Id);
    let range = args
        .get("range")
        .and_then(Value::as_range)
        .unwrap_or_default();

    let items = state.catalog.list(tag, order);
    Json(paginate(items, range, state.config.default_page_size))
}

async fn create_item(
    State(state): State<AppState>,
    args: Validated<NewItem>,
) -> (StatusCode, Json<Item>) {
    let name = args
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let price = args.get("price").and_then(Value::as_i64).unwrap_or_default();
    let tags = args
        .get("tags")
        .and_then(Value::as_list)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let item = state.catalog.insert(name, price, tags);
    tracing::info!(id = item.id, name = %item.name, "item created");
    (StatusCode::CREATED, Json(item))
}

async fn lookup_items(
    State(state): State<AppState>,
    args: Validated<Lookup>,
) -> Json<LookupResult> {
    let mut result = LookupResult {
        items: Vec::new(),
        missing: Vec::new(),
    };
    for requested in args.get("ids").and_then(Value::as_list).unwrap_or_default() {
        let raw = requested.to_json();
        match raw.as_i64().and_then(|id| state.catalog.get(id)) {
            Some(item) => result.items.push(item),
            None => result.missing.push(raw),
        }
    }
    Json(result)
}

async fn show_item(state: AppState, args: Args) -> Response {
    let item = args
        .get("id")
        .and_then(Value::as_i64)
        .and_then(|id| state.catalog.get(id));
    match item {
        Some(item) => Json(item).into_response(),
        None => not_found("item not found"),
    }
}

async fn search_items(state: AppState, args: Args) -> Json<Vec<Item>> {
    let q = args.get("q").and_then(Value::as_str).unwrap_or_default();
    let limit = args
        .get("limit")
        .and_then(Value::as_i64)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(usize::MAX);
    let mut found = state.catalog.search(q);
    found.truncate(limit);
    Json(found)
}

fn paginate(items: Vec<Item>, range: RangeInfo, page_size: u64) -> ItemPage {
    let total = items.len();
    let (offset, limit) = range.window(page_size);
    let skip = usize::try_from(offset).unwrap_or(usize::MAX);
    let take = limit
        .and_then(|l| usize::try_from(l).ok())
        .unwrap_or(usize::MAX);
    ItemPage {
        total,
        offset,
        limit,
        items: items.into_iter().skip(skip).take(take).collect(),
    }
}

fn trim(value: Value) -> Value {
    match value {
        Value::Str(s) => Value::Str(s.trim().to_string()),
        other => other,
    }
}

fn not_found(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "NOT_FOUND".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: i64) -> Vec<Item> {
        (1..=n)
            .map(|id| Item {
                id,
                name: format!("item-{id}"),
                price: id,
                tags: vec![],
            })
            .collect()
    }

    #[test]
    fn paginate_by_page() {
        let page = paginate(items(5), RangeInfo::Page { page: 2 }, 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.offset, 2);
        let ids: Vec<_> = page.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, [3, 4]);
    }

    #[test]
    fn paginate_unbounded_offset() {
        let range = RangeInfo::Offset {
            offset: 3,
            limit: None,
        };
        let page = paginate(items(5), range, 2);
        let ids: Vec<_> = page.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, [4, 5]);
        assert_eq!(page.limit, None);
    }

    #[test]
    fn trim_only_touches_strings() {
        assert_eq!(trim(Value::from("  a ")), Value::from("a"));
        assert_eq!(trim(Value::Int(1)), Value::Int(1));
    }

    #[test]
    fn every_schema_builds() {
        assert!(ListItems::schema().is_ok());
        assert!(NewItem::schema().is_ok());
        assert!(Lookup::schema().is_ok());
        assert!(item_args().is_ok());
        assert!(search_args().is_ok());
    }

    #[test]
    fn listing_extends_paging() {
        let schema = ListItems::schema().unwrap();
        let names: Vec<_> = schema.names().collect();
        assert_eq!(names, ["range", "tag", "order"]);
    }
}
