//! Person document model and its query vocabulary.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// A stored person document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    pub age: Option<i64>,
    pub favorite_foods: Vec<String>,
    /// Bumped on every full save of the document.
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for a new document; `id` and timestamps are assigned by the store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub name: String,
    pub age: Option<i64>,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl NewPerson {
    pub fn new(name: impl Into<String>, age: Option<i64>, favorite_foods: &[&str]) -> Self {
        Self {
            name: name.into(),
            age,
            favorite_foods: favorite_foods.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The record the exercise saves on its own.
    pub fn sample() -> Self {
        Self::new("John", Some(32), &["fruit", "veggies", "eggs"])
    }

    /// Apply the schema rules: `name` is required and stored trimmed.
    pub fn validated(self) -> Result<Self, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        Ok(Self { name, ..self })
    }
}

/// A person with `age` hidden.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonView {
    pub id: String,
    pub name: String,
    pub favorite_foods: Vec<String>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Person> for PersonView {
    fn from(p: Person) -> Self {
        Self {
            id: p.id,
            name: p.name,
            favorite_foods: p.favorite_foods,
            version: p.version,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Parameters of the food search chain: filter, sort on name, limit.
/// Projection is expressed by the result type ([`PersonView`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonQuery {
    pub food: String,
    pub name_order: SortOrder,
    pub limit: Option<u32>,
}

impl PersonQuery {
    pub fn by_food(food: impl Into<String>) -> Self {
        Self {
            food: food.into(),
            name_order: SortOrder::Asc,
            limit: None,
        }
    }

    pub fn sort_by_name(mut self, order: SortOrder) -> Self {
        self.name_order = order;
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validated_trims_name() {
        let p = NewPerson::new("  Ann ", None, &[]).validated().unwrap();
        assert_eq!(p.name, "Ann");
    }

    #[test]
    fn validated_rejects_blank_name() {
        let err = NewPerson::new("   ", Some(3), &[]).validated().unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn new_person_deserializes_without_foods() {
        let p: NewPerson = serde_json::from_str(r#"{"name":"Zed"}"#).unwrap();
        assert_eq!(p.age, None);
        assert!(p.favorite_foods.is_empty());
    }

    #[test]
    fn view_serialization_has_no_age() {
        let person = Person {
            id: "1".into(),
            name: "Ann".into(),
            age: Some(40),
            favorite_foods: vec!["burrito".into()],
            version: 0,
            created_at: "t".into(),
            updated_at: "t".into(),
        };
        let v = serde_json::to_value(PersonView::from(person)).unwrap();
        assert!(v.get("age").is_none());
        assert_eq!(v["favoriteFoods"][0], "burrito");
    }
}
