use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::dto::validation::field_order;
use crate::utils::string_utils::{deserialize_optional_string, deserialize_trimmed};

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateIngredientRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 120, message = "Ingredient name is required (max 120 characters)"))]
    pub name: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 20, message = "Unit is required (e.g. kg, l, pcs)"))]
    pub unit: String,

    #[serde(deserialize_with = "deserialize_optional_string")]
    pub category: Option<String>,
}

field_order!(CreateIngredientRequest: name, unit, category);
