use sea_orm::{
    sea_query::{extension::postgres::PgExpr, Expr},
    Condition, DatabaseConnection, EntityTrait, QueryFilter,
};
use tracing::error;

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        recommendation::{entities::IngredientInsight, ports::IngredientRepository},
    },
    entity::ingredients::{Column, Entity},
};

#[derive(Debug, Clone)]
pub struct PostgresIngredientRepository {
    pub db: DatabaseConnection,
}

impl PostgresIngredientRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl IngredientRepository for PostgresIngredientRepository {
    /// Case-insensitive exact name match; missing entries are simply absent
    /// from the result, the caller infers descriptions for those.
    async fn find_by_names(&self, names: Vec<String>) -> Result<Vec<IngredientInsight>, CoreError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut condition = Condition::any();
        for name in &names {
            condition = condition.add(Expr::col(Column::Name).ilike(name));
        }

        let insights = Entity::find()
            .filter(condition)
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to fetch ingredient metadata: {}", e);
                CoreError::InternalServerError
            })?
            .iter()
            .map(IngredientInsight::from)
            .collect();

        Ok(insights)
    }
}
