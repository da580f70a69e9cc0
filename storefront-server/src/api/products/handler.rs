//! Product API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
};

use shared::client::ProductUpdateRequest;
use shared::models::Product as SharedProduct;
use shared::response::{self, MessageBody};

use crate::core::ServerState;
use crate::db::models::{ProductCreate, ProductUpdate};
use crate::db::repository::{ProductListQuery, ProductRepository};
use crate::utils::{AppError, AppResult};

/// GET /api/products - paginated catalog listing
///
/// The body is a bare array; total count, page, page size and page count
/// travel in the X- response headers.
pub async fn list(
    State(state): State<ServerState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<(HeaderMap, Json<Vec<SharedProduct>>)> {
    let query = parse_list_params(&pairs);

    let repo = ProductRepository::new(state.get_db());
    let (products, total) = repo.find_page(&query).await.map_err(AppError::from)?;

    let limit = query.limit();
    let total_pages = (total + limit - 1) / limit;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(response::X_TOTAL_COUNT),
        HeaderValue::from(total),
    );
    headers.insert(
        HeaderName::from_static(response::X_PAGE),
        HeaderValue::from(query.page()),
    );
    headers.insert(
        HeaderName::from_static(response::X_PAGE_SIZE),
        HeaderValue::from(limit),
    );
    headers.insert(
        HeaderName::from_static(response::X_TOTAL_PAGES),
        HeaderValue::from(total_pages),
    );

    Ok((
        headers,
        Json(products.into_iter().map(Into::into).collect()),
    ))
}

/// GET /api/products/categories - distinct category labels
pub async fn categories(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let repo = ProductRepository::new(state.get_db());
    let categories = repo.distinct_categories().await.map_err(AppError::from)?;
    Ok(Json(categories))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SharedProduct>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product.into()))
}

/// POST /api/products - create a product (multipart, optional image file)
pub async fn create(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<SharedProduct>)> {
    let mut name: Option<String> = None;
    let mut brand: Option<String> = None;
    let mut category: Option<String> = None;
    let mut description: Option<String> = None;
    let mut price: Option<f64> = None;
    let mut count_in_stock: i32 = 0;
    let mut image = String::new();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = Some(field.text().await?),
            "brand" => brand = Some(field.text().await?),
            "category" => category = Some(field.text().await?),
            "description" => description = Some(field.text().await?),
            "price" => price = field.text().await?.parse().ok(),
            "countInStock" => count_in_stock = field.text().await?.parse().unwrap_or(0),
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                if !data.is_empty() {
                    image = state.image_store().save(&data, file_name.as_deref())?;
                }
            }
            _ => {}
        }
    }

    let (Some(name), Some(price)) = (name.filter(|n| !n.is_empty()), price) else {
        return Err(AppError::validation("Name and price are required"));
    };
    if price < 0.0 {
        return Err(AppError::validation("Price must be non-negative"));
    }
    if count_in_stock < 0 {
        return Err(AppError::validation("countInStock must be non-negative"));
    }

    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .create(ProductCreate {
            name,
            brand,
            category,
            description,
            price,
            count_in_stock,
            image,
        })
        .await
        .map_err(AppError::from)?;

    tracing::info!(product_id = %product.id.as_ref().map(|id| id.to_string()).unwrap_or_default(), "Product created");
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /api/products/:id - update a product (JSON; image by URL)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<ProductUpdateRequest>,
) -> AppResult<Json<SharedProduct>> {
    if req.price.is_some_and(|p| p < 0.0) {
        return Err(AppError::validation("Price must be non-negative"));
    }
    if req.count_in_stock.is_some_and(|c| c < 0) {
        return Err(AppError::validation("countInStock must be non-negative"));
    }

    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .update(&id, ProductUpdate::from(req))
        .await
        .map_err(AppError::from)?;

    Ok(Json(product.into()))
}

/// DELETE /api/products/:id - remove from the catalog; historical orders
/// keep their snapshots
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageBody>> {
    let repo = ProductRepository::new(state.get_db());
    repo.delete(&id).await.map_err(AppError::from)?;

    Ok(Json(MessageBody::new("Product removed")))
}

// =============================================================================
// Query-string parsing
// =============================================================================

/// Fold raw query pairs into a catalog query. `categories` may repeat;
/// `sortBy` uses the API's camelCase field names and an optional `-` prefix
/// for descending order.
fn parse_list_params(pairs: &[(String, String)]) -> ProductListQuery {
    let mut query = ProductListQuery::default();
    for (key, value) in pairs {
        match key.as_str() {
            "keyword" if !value.is_empty() => query.keyword = Some(value.clone()),
            "categories" if !value.is_empty() => query.categories.push(value.clone()),
            "sortBy" if !value.is_empty() => {
                let (descending, field) = match value.strip_prefix('-') {
                    Some(field) => (true, field),
                    None => (false, value.as_str()),
                };
                let field = camel_to_snake(field);
                query.sort_by = Some(if descending {
                    format!("-{field}")
                } else {
                    field
                });
            }
            "page" => query.page = value.parse().unwrap_or(1),
            "limit" => query.limit = value.parse().unwrap_or(10),
            _ => {}
        }
    }
    query
}

/// API field names are camelCase, stored fields are snake_case
fn camel_to_snake(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
