//! Branch domain entity

use chrono::{DateTime, Utc};

use serde::Serialize;

use crate::domain::query::{Criteria, FieldValue, Listing, Queryable, Specification};
use crate::domain::repositories::Entity;

/// A company branch; cities and merchants are attached to one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub id: i32,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Queryable for Branch {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "is_active" => Some(self.is_active.into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

impl Entity for Branch {
    type Id = i32;
    const NAME: &'static str = "Branch";

    fn id(&self) -> i32 {
        self.id
    }
}

impl Listing for Branch {
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];
}

pub struct BranchSpecs;

impl BranchSpecs {
    /// Active branches by name, for drop-downs.
    pub fn active_by_name() -> Specification<Branch> {
        let mut spec = Specification::with_criteria(Criteria::eq("is_active", true));
        spec.set_order_by_field("name");
        spec
    }

    /// Branches whose name matches exactly, ignoring case; used to reject duplicates.
    pub fn named(name: &str) -> Specification<Branch> {
        let wanted = name.trim().to_lowercase();
        Specification::filtered(move |b: &Branch| b.name.to_lowercase() == wanted)
    }
}
