use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::ParameterType;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParameterDto {
    pub id: i32,
    pub key: String,
    pub value: String,
    #[schema(value_type = String, example = "BOOLEAN")]
    pub parameter_type: ParameterType,
    pub category: String,
    pub description: Option<String>,
    pub is_readonly: bool,
    pub updated_at: NaiveDateTime,
}

impl From<entity::system_parameter::Model> for ParameterDto {
    fn from(p: entity::system_parameter::Model) -> Self {
        Self {
            id: p.id,
            key: p.key,
            value: p.value,
            parameter_type: p.parameter_type,
            category: p.category,
            description: p.description,
            is_readonly: p.is_readonly,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateParameterDto {
    pub key: String,
    pub value: String,
    #[schema(value_type = String, example = "STRING")]
    pub parameter_type: ParameterType,
    pub category: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_readonly: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateParameterDto {
    pub value: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParameterFilter {
    pub category: Option<String>,
}
