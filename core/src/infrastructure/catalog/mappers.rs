use crate::{
    domain::recommendation::entities::{IngredientInsight, Product},
    entity::{ingredients, products},
};

fn split_simple_array(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

impl From<&products::Model> for Product {
    fn from(model: &products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            brand: model.brand.clone(),
            ingredients: split_simple_array(&model.ingredients),
            purchase_url: model.purchase_url.clone(),
        }
    }
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self::from(&model)
    }
}

impl From<&ingredients::Model> for IngredientInsight {
    fn from(model: &ingredients::Model) -> Self {
        Self {
            name: model.name.clone(),
            description: model.description.clone(),
            benefits: split_simple_array(&model.benefits),
        }
    }
}

impl From<ingredients::Model> for IngredientInsight {
    fn from(model: ingredients::Model) -> Self {
        Self::from(&model)
    }
}
