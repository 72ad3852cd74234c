use sea_orm::{
    sea_query::{extension::postgres::PgExpr, Expr},
    Condition, DatabaseConnection, EntityTrait, QueryFilter,
};
use tracing::error;

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        profile::entities::dedupe_tokens,
        recommendation::{entities::Product, ports::ProductRepository},
    },
    entity::products::{Column, Entity},
};

#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pub db: DatabaseConnection,
}

impl PostgresProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ProductRepository for PostgresProductRepository {
    /// Any-of containment match over the comma-separated ingredient column.
    async fn find_by_ingredients(&self, names: Vec<String>) -> Result<Vec<Product>, CoreError> {
        let normalized = dedupe_tokens(names.iter().map(String::as_str));
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        let mut condition = Condition::any();
        for ingredient in &normalized {
            condition =
                condition.add(Expr::col(Column::Ingredients).ilike(format!("%{}%", ingredient)));
        }

        let products = Entity::find()
            .filter(condition)
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to fetch products by ingredients: {}", e);
                CoreError::InternalServerError
            })?
            .iter()
            .map(Product::from)
            .collect();

        Ok(products)
    }
}
