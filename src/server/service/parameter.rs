use entity::sea_orm_active_enums::ParameterType;
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::FieldError,
        parameter::{CreateParameterDto, ParameterDto, UpdateParameterDto},
    },
    server::{
        data::system_parameter::SystemParameterRepository,
        error::{business::BusinessError, Error},
    },
};

pub const MAINTENANCE_MODE: &str = "maintenance_mode";

/// Checks that `value` parses as `parameter_type`
pub fn check_value(parameter_type: ParameterType, value: &str) -> Result<(), FieldError> {
    let valid = match parameter_type {
        ParameterType::String => true,
        ParameterType::Number => value.trim().parse::<f64>().is_ok_and(f64::is_finite),
        ParameterType::Boolean => matches!(value, "true" | "false"),
        ParameterType::Json => serde_json::from_str::<serde_json::Value>(value).is_ok(),
        ParameterType::Enum => !value.trim().is_empty(),
    };

    if valid {
        Ok(())
    } else {
        Err(FieldError::new(
            "value",
            format!("is not a valid {:?} value", parameter_type).to_lowercase(),
        ))
    }
}

fn default_parameters() -> Vec<CreateParameterDto> {
    let parameter = |key: &str, value: &str, parameter_type, category: &str, description: &str, is_readonly| {
        CreateParameterDto {
            key: key.to_string(),
            value: value.to_string(),
            parameter_type,
            category: category.to_string(),
            description: Some(description.to_string()),
            is_readonly,
        }
    };

    vec![
        parameter("app_name", "TopSteel ERP", ParameterType::String, "general", "Application name", false),
        parameter(
            "app_version",
            env!("CARGO_PKG_VERSION"),
            ParameterType::String,
            "general",
            "Application version",
            true,
        ),
        parameter(
            MAINTENANCE_MODE,
            "false",
            ParameterType::Boolean,
            "system",
            "Maintenance mode",
            false,
        ),
        parameter(
            "notifications_enabled",
            "true",
            ParameterType::Boolean,
            "notifications",
            "Send notifications",
            false,
        ),
    ]
}

pub struct ParameterService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ParameterService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, category: Option<&str>) -> Result<Vec<ParameterDto>, Error> {
        let parameters = SystemParameterRepository::new(self.db).list(category).await?;

        Ok(parameters.into_iter().map(ParameterDto::from).collect())
    }

    pub async fn get(&self, key: &str) -> Result<ParameterDto, Error> {
        Ok(self.find(key).await?.into())
    }

    pub async fn create(&self, parameter: CreateParameterDto) -> Result<ParameterDto, Error> {
        let repo = SystemParameterRepository::new(self.db);

        let mut errors = Vec::new();
        if parameter.key.trim().is_empty() {
            errors.push(FieldError::new("key", "must not be empty"));
        }
        if parameter.category.trim().is_empty() {
            errors.push(FieldError::new("category", "must not be empty"));
        }
        if let Err(error) = check_value(parameter.parameter_type, &parameter.value) {
            errors.push(error);
        }
        BusinessError::check(errors)?;

        if repo.find_by_key(&parameter.key).await?.is_some() {
            return Err(BusinessError::Conflict(format!(
                "Parameter {} already exists",
                parameter.key
            ))
            .into());
        }

        let created = repo.create(&parameter).await?;
        tracing::info!(key = %created.key, "System parameter created");

        Ok(created.into())
    }

    /// Replaces the value of a writable parameter
    pub async fn update(&self, key: &str, changes: UpdateParameterDto) -> Result<ParameterDto, Error> {
        let parameter = self.find(key).await?;
        if parameter.is_readonly {
            return Err(BusinessError::Forbidden(format!("Parameter {} is read-only", key)).into());
        }
        check_value(parameter.parameter_type, &changes.value)
            .map_err(|error| BusinessError::Validation(vec![error]))?;

        let updated = SystemParameterRepository::new(self.db)
            .update_value(parameter, changes.value, changes.description)
            .await?;
        tracing::info!(key = %key, "System parameter updated");

        Ok(updated.into())
    }

    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        let parameter = self.find(key).await?;
        if parameter.is_readonly {
            return Err(BusinessError::Forbidden(format!("Parameter {} is read-only", key)).into());
        }

        SystemParameterRepository::new(self.db)
            .delete(parameter.id)
            .await?;
        tracing::info!(key = %key, "System parameter deleted");

        Ok(())
    }

    /// Inserts the default parameters when none exist, returns how many were inserted
    pub async fn seed_defaults(&self) -> Result<usize, Error> {
        let repo = SystemParameterRepository::new(self.db);
        if repo.count().await? > 0 {
            return Ok(0);
        }

        let defaults = default_parameters();
        for parameter in &defaults {
            repo.create(parameter).await?;
        }
        tracing::info!(count = defaults.len(), "Default system parameters seeded");

        Ok(defaults.len())
    }

    /// Boolean value of `key`, `None` when the parameter does not exist
    pub async fn get_bool(&self, key: &str) -> Result<Option<bool>, Error> {
        let Some(parameter) = SystemParameterRepository::new(self.db)
            .find_by_key(key)
            .await?
        else {
            return Ok(None);
        };

        match parameter.value.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(BusinessError::InvalidState(format!(
                "Parameter {} is not a boolean: {:?}",
                key, other
            ))
            .into()),
        }
    }

    async fn find(&self, key: &str) -> Result<entity::system_parameter::Model, Error> {
        SystemParameterRepository::new(self.db)
            .find_by_key(key)
            .await?
            .ok_or_else(|| BusinessError::not_found("Parameter", key).into())
    }
}
