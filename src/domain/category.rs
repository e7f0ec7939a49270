use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Product category of a hub's storefront.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Category {
    pub id: i32,
    pub hub_id: i32,
    /// Parent category when this is a subcategory.
    pub parent_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    /// Public URL of the category picture.
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    /// Top-level categories have no parent.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Payload required to insert a new category for a hub.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub hub_id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl NewCategory {
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        Self {
            hub_id,
            parent_id: None,
            name: name.into(),
            description: None,
            image: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_parent_id(mut self, parent_id: i32) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Full overwrite of a category's editable fields.
#[derive(Debug, Clone)]
pub struct UpdateCategory {
    pub name: String,
    /// `None` clears the description.
    pub description: Option<String>,
    /// `None` moves the category to the top level.
    pub parent_id: Option<i32>,
    /// `None` clears the picture.
    pub image: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl UpdateCategory {
    pub fn new(name: String, description: Option<String>, parent_id: Option<i32>) -> Self {
        Self {
            name,
            description,
            parent_id,
            image: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }
}

/// Query definition used to list categories for a hub.
#[derive(Debug, Clone)]
pub struct CategoryListQuery {
    pub hub_id: i32,
    /// Only return categories without a parent.
    pub top_level_only: bool,
    /// Optional substring filter applied to names.
    pub search: Option<String>,
}

impl CategoryListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            top_level_only: false,
            search: None,
        }
    }

    pub fn top_level_only(mut self) -> Self {
        self.top_level_only = true;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}
