//! Product Repository
//!
//! Catalog queries (keyword/category filtering, sorting, pagination) and
//! admin CRUD.

use serde::Deserialize;

use super::{BaseRepository, RepoError, RepoResult, now_millis};
use crate::db::models::{Product, ProductCreate, ProductId, ProductUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

/// Catalog listing query.
///
/// `sort_by` takes a store field name, optionally prefixed with `-` for
/// descending order. The field is not validated against any schema; an
/// unknown field simply orders by a missing value.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    pub keyword: Option<String>,
    pub categories: Vec<String>,
    pub sort_by: Option<String>,
    pub page: i64,
    pub limit: i64,
}

impl ProductListQuery {
    /// Effective page number (>= 1)
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    /// Effective page size (>= 1, default 10)
    pub fn limit(&self) -> i64 {
        if self.limit >= 1 { self.limit } else { 10 }
    }

    /// Category filter; empty list or an "All" entry means no filter
    fn category_filter(&self) -> Option<Vec<String>> {
        if self.categories.is_empty() || self.categories.iter().any(|c| c == "All") {
            None
        } else {
            Some(self.categories.clone())
        }
    }

    fn keyword_filter(&self) -> Option<String> {
        self.keyword
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|k| k.to_lowercase())
    }

    /// ORDER BY clause from the sort spec. The field name is spliced into
    /// the query text, so it is reduced to identifier characters first.
    fn order_clause(&self) -> String {
        let Some(spec) = self.sort_by.as_deref().filter(|s| !s.is_empty()) else {
            return String::new();
        };
        let (field, direction) = match spec.strip_prefix('-') {
            Some(field) => (field, "DESC"),
            None => (spec, "ASC"),
        };
        let field: String = field
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if field.is_empty() {
            return String::new();
        }
        format!(" ORDER BY {} {}", field, direction)
    }
}

// =============================================================================
// Product Repository
// =============================================================================

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// One catalog page plus the total match count
    pub async fn find_page(&self, q: &ProductListQuery) -> RepoResult<(Vec<Product>, i64)> {
        let keyword = q.keyword_filter();
        let categories = q.category_filter();

        let mut conditions: Vec<&str> = Vec::new();
        if keyword.is_some() {
            conditions.push("string::contains(string::lowercase(name), $keyword)");
        }
        if categories.is_some() {
            conditions.push("category IN $categories");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        // Total count first; pagination headers need it regardless of page
        let count_sql = format!("SELECT count() FROM product{} GROUP ALL", where_clause);
        let mut count_query = self.base.db().query(count_sql);
        if let Some(kw) = keyword.clone() {
            count_query = count_query.bind(("keyword", kw));
        }
        if let Some(cats) = categories.clone() {
            count_query = count_query.bind(("categories", cats));
        }

        #[derive(Deserialize)]
        struct CountRow {
            count: i64,
        }
        let rows: Vec<CountRow> = count_query.await?.take(0)?;
        let total = rows.first().map(|r| r.count).unwrap_or(0);

        let page_sql = format!(
            "SELECT * FROM product{}{} LIMIT $limit START $start",
            where_clause,
            q.order_clause()
        );
        let mut page_query = self
            .base
            .db()
            .query(page_sql)
            .bind(("limit", q.limit()))
            .bind(("start", (q.page() - 1) * q.limit()));
        if let Some(kw) = keyword {
            page_query = page_query.bind(("keyword", kw));
        }
        if let Some(cats) = categories {
            page_query = page_query.bind(("categories", cats));
        }

        let products: Vec<Product> = page_query.await?.take(0)?;
        Ok((products, total))
    }

    /// Distinct category labels, sorted
    pub async fn distinct_categories(&self) -> RepoResult<Vec<String>> {
        #[derive(Deserialize)]
        struct Row {
            category: String,
        }
        let rows: Vec<Row> = self
            .base
            .db()
            .query("SELECT category FROM product")
            .await?
            .take(0)?;

        let set: std::collections::BTreeSet<String> =
            rows.into_iter().map(|r| r.category).collect();
        Ok(set.into_iter().collect())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let Ok(record_id) = id.parse::<ProductId>() else {
            return Ok(None);
        };
        self.find_by_record(&record_id).await
    }

    pub async fn find_by_record(&self, id: &ProductId) -> RepoResult<Option<Product>> {
        let product: Option<Product> = self.base.db().select(id.clone()).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let now = now_millis();
        let product = Product {
            id: None,
            name: data.name,
            brand: data.brand.filter(|b| !b.is_empty()).unwrap_or_else(|| "Generic".to_string()),
            category: data
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "All".to_string()),
            description: data.description.unwrap_or_default(),
            price: data.price,
            count_in_stock: data.count_in_stock,
            image: data.image,
            rating: 0.0,
            num_reviews: 0,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product; unset fields are left untouched
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let record_id: ProductId = id
            .parse()
            .map_err(|_| RepoError::NotFound("Product not found".to_string()))?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.brand.is_some() {
            set_parts.push("brand = $brand");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.count_in_stock.is_some() {
            set_parts.push("count_in_stock = $count_in_stock");
        }
        if data.image.is_some() {
            set_parts.push("image = $image");
        }

        if set_parts.is_empty() {
            return self
                .find_by_record(&record_id)
                .await?
                .ok_or_else(|| RepoError::NotFound("Product not found".to_string()));
        }
        set_parts.push("updated_at = $now");

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("id", record_id))
            .bind(("now", now_millis()));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.brand {
            query = query.bind(("brand", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.count_in_stock {
            query = query.bind(("count_in_stock", v));
        }
        if let Some(v) = data.image {
            query = query.bind(("image", v));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("Product not found".to_string()))
    }

    /// Hard delete; historical orders keep their snapshots
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id: ProductId = id
            .parse()
            .map_err(|_| RepoError::NotFound("Product not found".to_string()))?;

        let deleted: Option<Product> = self.base.db().delete(record_id).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(sort_by: Option<&str>) -> ProductListQuery {
        ProductListQuery {
            sort_by: sort_by.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn sort_spec_parses_direction_prefix() {
        assert_eq!(query(Some("price")).order_clause(), " ORDER BY price ASC");
        assert_eq!(query(Some("-price")).order_clause(), " ORDER BY price DESC");
        assert_eq!(query(None).order_clause(), "");
    }

    #[test]
    fn sort_field_is_reduced_to_identifier_chars() {
        assert_eq!(
            query(Some("-price; DROP TABLE product")).order_clause(),
            " ORDER BY priceDROPTABLEproduct DESC"
        );
        assert_eq!(query(Some("--")).order_clause(), "");
    }

    #[test]
    fn page_and_limit_have_sane_floors() {
        let q = ProductListQuery {
            page: 0,
            limit: -3,
            ..Default::default()
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 10);
    }

    #[test]
    fn all_category_disables_the_filter() {
        let q = ProductListQuery {
            categories: vec!["All".into(), "Shoes".into()],
            ..Default::default()
        };
        assert!(q.category_filter().is_none());
    }
}
