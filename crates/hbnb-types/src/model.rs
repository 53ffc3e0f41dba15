//! The closed registry of model names.
//!
//! The set is fixed at build time. Anything that accepts a model name from
//! outside must check it here before touching a store.

use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;
use crate::value::FieldValue;

/// A registered model type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl ModelKind {
    /// Every registered model, in registry order.
    pub const ALL: [ModelKind; 7] = [
        Self::BaseModel,
        Self::User,
        Self::State,
        Self::City,
        Self::Amenity,
        Self::Place,
        Self::Review,
    ];

    /// The registered type name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BaseModel => "BaseModel",
            Self::User => "User",
            Self::State => "State",
            Self::City => "City",
            Self::Amenity => "Amenity",
            Self::Place => "Place",
            Self::Review => "Review",
        }
    }

    /// Business fields every instance of this model carries, with their
    /// initial values.
    pub fn default_fields(&self) -> Vec<(&'static str, FieldValue)> {
        let text = |name| (name, FieldValue::Str(String::new()));
        let count = |name| (name, FieldValue::Int(0));
        let coord = |name| (name, FieldValue::Float(0.0));

        match self {
            Self::BaseModel => Vec::new(),
            Self::User => vec![
                text("email"),
                text("password"),
                text("first_name"),
                text("last_name"),
            ],
            Self::State => vec![text("name")],
            Self::City => vec![text("state_id"), text("name")],
            Self::Amenity => vec![text("name")],
            Self::Place => vec![
                text("city_id"),
                text("user_id"),
                text("name"),
                text("description"),
                count("number_rooms"),
                count("number_bathrooms"),
                count("max_guest"),
                count("price_by_night"),
                coord("latitude"),
                coord("longitude"),
                ("amenity_ids", FieldValue::List(Vec::new())),
            ],
            Self::Review => vec![text("place_id"), text("user_id"), text("text")],
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeError::UnknownModel(s.to_string()))
    }
}

/// Returns `true` if `name` is a registered model name. Matching is exact
/// and case-sensitive.
pub fn is_valid_model(name: &str) -> bool {
    name.parse::<ModelKind>().is_ok()
}
