use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::{InstallationStatus, ModuleCategory, ModuleStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricingDto {
    /// `FREE`, `ONE_TIME` or `SUBSCRIPTION`
    #[serde(rename = "type")]
    pub pricing_type: String,
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

impl From<entity::marketplace_module::Pricing> for PricingDto {
    fn from(p: entity::marketplace_module::Pricing) -> Self {
        Self {
            pricing_type: p.pricing_type,
            amount: p.amount,
            currency: p.currency,
        }
    }
}

impl From<PricingDto> for entity::marketplace_module::Pricing {
    fn from(p: PricingDto) -> Self {
        Self {
            pricing_type: p.pricing_type,
            amount: p.amount,
            currency: p.currency,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModuleDto {
    pub id: i32,
    pub module_key: String,
    pub display_name: String,
    pub description: String,
    pub short_description: Option<String>,
    #[schema(value_type = String, example = "ANALYTICS")]
    pub category: ModuleCategory,
    pub publisher: String,
    pub version: String,
    #[schema(value_type = String, example = "PUBLISHED")]
    pub status: ModuleStatus,
    pub pricing: PricingDto,
    pub dependencies: Vec<String>,
    pub permissions: Vec<String>,
    pub api_routes: Vec<String>,
    #[schema(value_type = Option<Object>)]
    pub menu_configuration: Option<serde_json::Value>,
    pub icon: Option<String>,
    pub download_count: i32,
    pub rating_average: f64,
    pub rating_count: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::marketplace_module::Model> for ModuleDto {
    fn from(m: entity::marketplace_module::Model) -> Self {
        Self {
            id: m.id,
            module_key: m.module_key,
            display_name: m.display_name,
            description: m.description,
            short_description: m.short_description,
            category: m.category,
            publisher: m.publisher,
            version: m.version,
            status: m.status,
            pricing: m.pricing.into(),
            dependencies: m.dependencies.0,
            permissions: m.permissions.0,
            api_routes: m.api_routes.0,
            menu_configuration: m.menu_configuration,
            icon: m.icon,
            download_count: m.download_count,
            rating_average: m.rating_average,
            rating_count: m.rating_count,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateModuleDto {
    pub module_key: String,
    pub display_name: String,
    pub description: String,
    pub short_description: Option<String>,
    #[schema(value_type = String, example = "ANALYTICS")]
    pub category: ModuleCategory,
    pub publisher: String,
    pub version: String,
    pub pricing: PricingDto,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub api_routes: Vec<String>,
    #[schema(value_type = Option<Object>)]
    pub menu_configuration: Option<serde_json::Value>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateModuleDto {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub category: Option<ModuleCategory>,
    pub version: Option<String>,
    pub pricing: Option<PricingDto>,
    pub dependencies: Option<Vec<String>>,
    pub permissions: Option<Vec<String>>,
    pub api_routes: Option<Vec<String>>,
    #[schema(value_type = Option<Object>)]
    pub menu_configuration: Option<serde_json::Value>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModuleFilter {
    #[param(value_type = Option<String>)]
    pub category: Option<ModuleCategory>,
    /// Defaults to `PUBLISHED`
    #[param(value_type = Option<String>)]
    pub status: Option<ModuleStatus>,
    pub publisher: Option<String>,
    pub min_rating: Option<f64>,
    pub is_free: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Case-insensitive match on names and descriptions
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct InstallModuleDto {
    #[schema(value_type = Option<Object>)]
    pub configuration: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InstallationResultDto {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installation_id: Option<i32>,
    pub module_id: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl InstallationResultDto {
    pub fn failed(module_id: i32, message: impl Into<String>) -> Self {
        Self {
            success: false,
            installation_id: None,
            module_id,
            message: message.into(),
            errors: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InstallationLogDto {
    pub level: String,
    pub message: String,
    pub at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InstallationDto {
    pub id: i32,
    pub societe_id: i32,
    pub module_id: i32,
    pub installed_version: String,
    #[schema(value_type = String, example = "INSTALLED")]
    pub status: InstallationStatus,
    #[schema(value_type = Option<Object>)]
    pub configuration: Option<serde_json::Value>,
    pub installed_by: Option<i32>,
    pub installed_at: Option<NaiveDateTime>,
    pub failure_reason: Option<String>,
    pub logs: Vec<InstallationLogDto>,
}

impl From<entity::module_installation::Model> for InstallationDto {
    fn from(i: entity::module_installation::Model) -> Self {
        Self {
            id: i.id,
            societe_id: i.societe_id,
            module_id: i.module_id,
            installed_version: i.installed_version,
            status: i.status,
            configuration: i.configuration,
            installed_by: i.installed_by,
            installed_at: i.installed_at,
            failure_reason: i.failure_reason,
            logs: i
                .logs
                .0
                .into_iter()
                .map(|l| InstallationLogDto {
                    level: l.level,
                    message: l.message,
                    at: l.at,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InstalledModuleDto {
    pub installation: InstallationDto,
    pub module: ModuleDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateModuleDto {
    /// 1 to 5
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatingDto {
    pub id: i32,
    pub module_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub version: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<entity::module_rating::Model> for RatingDto {
    fn from(r: entity::module_rating::Model) -> Self {
        Self {
            id: r.id,
            module_id: r.module_id,
            user_id: r.user_id,
            rating: r.rating,
            comment: r.comment,
            version: r.version,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RatingsQuery {
    /// Defaults to 10
    pub limit: Option<u64>,
}
