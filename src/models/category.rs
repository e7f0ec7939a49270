use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, NewCategory as DomainNewCategory,
    UpdateCategory as DomainUpdateCategory,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub hub_id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub image: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub hub_id: i32,
    pub parent_id: Option<i32>,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub image: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCategory<'a> {
    pub parent_id: Option<i32>,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub image: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Category> for DomainCategory {
    fn from(value: Category) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            parent_id: value.parent_id,
            name: value.name,
            description: value.description,
            image: value.image,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCategory> for NewCategory<'a> {
    fn from(value: &'a DomainNewCategory) -> Self {
        Self {
            hub_id: value.hub_id,
            parent_id: value.parent_id,
            name: value.name.as_str(),
            description: value.description.as_deref(),
            image: value.image.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateCategory> for UpdateCategory<'a> {
    fn from(value: &'a DomainUpdateCategory) -> Self {
        Self {
            parent_id: value.parent_id,
            name: value.name.as_str(),
            description: value.description.as_deref(),
            image: value.image.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
