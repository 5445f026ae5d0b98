use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::validation::{Validatable, ValidationError, ValidationErrors, validators};

const MAX_NAME_LENGTH: usize = 200;

/// Category a composition is served as. Stored as its name in the `type` column.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum MealType {
    #[sea_orm(string_value = "Starter")]
    Starter,
    #[sea_orm(string_value = "Main")]
    Main,
    #[sea_orm(string_value = "Dessert")]
    Dessert,
}

impl MealType {
    /// Courses of a meal, in serving order.
    pub const COURSES: [MealType; 3] = [MealType::Starter, MealType::Main, MealType::Dessert];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "Starter",
            Self::Main => "Main",
            Self::Dessert => "Dessert",
        }
    }

    /// Parse the `type` field of a payload.
    ///
    /// # Errors
    ///
    /// Fails when the field is missing or names an unknown category.
    pub fn parse_field(value: Option<&str>) -> Result<Self, ValidationError> {
        match value {
            None => Err(ValidationError::new("type", "This field is required")),
            Some(raw) => raw.parse().map_err(|_| {
                ValidationError::new(
                    "type",
                    format!("Unknown type '{raw}', expected one of Starter, Main, Dessert"),
                )
            }),
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::COURSES
            .into_iter()
            .find(|course| course.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "compositions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub meal_type: MealType,
    pub calories: i32,
    pub created: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A food item of the catalog as exposed over the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub calories: i32,
    pub created: DateTime<Utc>,
}

impl Composition {
    pub const RESOURCE_NAME_PLURAL: &'static str = "compositions";

    /// Field names accepted in `orderBy`, mapped to their columns.
    #[must_use]
    pub fn sortable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("name", Column::Name),
            ("type", Column::MealType),
            ("calories", Column::Calories),
            ("created", Column::Created),
        ]
    }
}

impl From<Model> for Composition {
    fn from(model: Model) -> Self {
        Composition {
            id: model.id,
            name: model.name,
            meal_type: model.meal_type,
            calories: model.calories,
            created: model.created,
        }
    }
}

/// Payload for creating a composition.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompositionCreate {
    #[schema(example = "Tomato soup")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "Starter")]
    pub meal_type: Option<String>,
    #[serde(default)]
    #[schema(example = 180)]
    pub calories: i32,
    /// Defaults to the time of creation.
    pub created: Option<DateTime<Utc>>,
}

/// Payload for replacing a composition.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompositionUpdate {
    /// When present, must equal the id in the path.
    pub id: Option<i32>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub calories: i32,
    /// Keeps the stored value when omitted.
    pub created: Option<DateTime<Utc>>,
}

fn validate_fields(
    name: Option<&str>,
    meal_type: Option<&str>,
    calories: i32,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(validators::validate_required("name", name));
    if let Some(name) = name {
        errors.check(validators::validate_length(
            "name",
            name.trim(),
            None,
            Some(MAX_NAME_LENGTH),
        ));
    }
    errors.check(MealType::parse_field(meal_type).map(|_| ()));
    errors.check(validators::validate_range("calories", calories, Some(0), None));
    errors.result()
}

impl Validatable for CompositionCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_fields(self.name.as_deref(), self.meal_type.as_deref(), self.calories)
    }
}

impl Validatable for CompositionUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_fields(self.name.as_deref(), self.meal_type.as_deref(), self.calories)
    }
}

impl TryFrom<CompositionCreate> for ActiveModel {
    type Error = ValidationErrors;

    fn try_from(create: CompositionCreate) -> Result<Self, Self::Error> {
        create.validate()?;
        let meal_type = MealType::parse_field(create.meal_type.as_deref())?;

        Ok(ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(create.name.unwrap_or_default().trim().to_string()),
            meal_type: ActiveValue::Set(meal_type),
            calories: ActiveValue::Set(create.calories),
            created: ActiveValue::Set(create.created.unwrap_or_else(Utc::now)),
        })
    }
}

impl CompositionUpdate {
    /// Replace every field of `existing` with this payload, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns the collected [`ValidationErrors`] when the payload is invalid.
    pub fn merge_into_active_model(self, existing: Model) -> Result<ActiveModel, ValidationErrors> {
        self.validate()?;
        let meal_type = MealType::parse_field(self.meal_type.as_deref())?;

        let mut active: ActiveModel = existing.into();
        active.name = ActiveValue::Set(self.name.unwrap_or_default().trim().to_string());
        active.meal_type = ActiveValue::Set(meal_type);
        active.calories = ActiveValue::Set(self.calories);
        if let Some(created) = self.created {
            active.created = ActiveValue::Set(created);
        }
        Ok(active)
    }
}
