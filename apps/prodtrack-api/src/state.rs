//! Shared application state.

use prodtrack_db::Database;

use crate::services::{ProductService, ProductionService};

/// Router state. Cloned per request; the pool inside is shared.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }

    pub fn productions(&self) -> ProductionService {
        ProductionService::new(self.db.clone())
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(self.db.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodtrack_core::{NewProduct, RecipeIngredient, RecipeInput, Unit};
    use prodtrack_db::DbConfig;

    #[tokio::test]
    async fn test_services_share_the_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(db);

        let created = state
            .products()
            .create(NewProduct {
                code: "A123".to_string(),
                name: "Brioche".to_string(),
                category: "bakery".to_string(),
                recipe: RecipeInput {
                    ingredients: vec![RecipeIngredient {
                        name: "Flour".to_string(),
                        quantity: 50.0,
                        unit: Unit::Kg,
                        notes: String::new(),
                    }],
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        let cloned = state.clone();
        let found = cloned.products().get_by_code("A123").await.unwrap();
        assert_eq!(found.id, created.id);
        assert!(cloned.db.health_check().await);
    }
}
