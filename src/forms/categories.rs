use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{NewCategory, UpdateCategory};
use crate::forms::{collapse_whitespace, tidy_paragraphs};

/// Maximum length allowed for a category name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum length allowed for a category description.
const DESCRIPTION_MAX_LEN: usize = 2048;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = DESCRIPTION_MAX_LEN as u64;

/// File extensions accepted for category pictures.
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

pub type CategoryFormResult<T> = Result<T, CategoryFormError>;

/// Errors that can occur while processing category forms.
#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("category name cannot be empty")]
    EmptyName,
    #[error("invalid parent category `{0}`")]
    InvalidParent(String),
    #[error("a category cannot be its own parent")]
    SelfParent,
    #[error("unsupported image file `{0}`")]
    UnsupportedImage(String),
    #[error("failed to store image: {0}")]
    ImageStorage(#[from] io::Error),
}

/// Fields shared by the "New category" and "Update category" dialogs.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
    /// Parent category picked from the top-level list; blank means none.
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Multipart body posted by the category dialogs.
#[derive(MultipartForm)]
pub struct CategoryUploadForm {
    pub name: Text<String>,
    pub description: Option<Text<String>>,
    pub parent_id: Option<Text<String>>,
    #[multipart(limit = "5MB")]
    pub image: Option<TempFile>,
}

impl CategoryUploadForm {
    /// Splits the body into its text fields and the picture.
    ///
    /// Browsers post an empty file part when nothing was picked; that counts
    /// as no picture.
    pub fn into_parts(self) -> (CategoryForm, Option<TempFile>) {
        let form = CategoryForm {
            name: self.name.into_inner(),
            description: self.description.map(Text::into_inner),
            parent_id: self.parent_id.map(Text::into_inner),
        };
        let image = self.image.filter(|file| file.size > 0);

        (form, image)
    }
}

/// Directory of uploaded category pictures and the URL it is served under.
#[derive(Debug, Clone)]
pub struct CategoryImageStore {
    dir: PathBuf,
    url_prefix: String,
}

impl CategoryImageStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copies `upload` into the store and returns its public URL.
    pub fn save(&self, hub_id: i32, upload: &TempFile) -> CategoryFormResult<String> {
        let original = upload.file_name.as_deref().unwrap_or_default();
        let extension = Path::new(original)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| CategoryFormError::UnsupportedImage(original.to_string()))?;

        fs::create_dir_all(&self.dir)?;

        let file_name = format!(
            "{hub_id}-{}.{extension}",
            Utc::now().format("%Y%m%d%H%M%S%f")
        );
        fs::copy(upload.file.path(), self.dir.join(&file_name))?;

        Ok(format!(
            "{}/{file_name}",
            self.url_prefix.trim_end_matches('/')
        ))
    }
}

struct SanitizedCategory {
    name: String,
    description: Option<String>,
    parent_id: Option<i32>,
}

impl CategoryForm {
    /// Validates and sanitizes the payload into a domain `NewCategory`.
    pub fn into_new_category(self, hub_id: i32) -> CategoryFormResult<NewCategory> {
        let SanitizedCategory {
            name,
            description,
            parent_id,
        } = self.sanitize()?;

        let mut category = NewCategory::new(hub_id, name);
        if let Some(description) = description {
            category = category.with_description(description);
        }
        if let Some(parent_id) = parent_id {
            category = category.with_parent_id(parent_id);
        }

        Ok(category)
    }

    /// Validates and sanitizes the payload into an update for `category_id`.
    pub fn into_update_category(self, category_id: i32) -> CategoryFormResult<UpdateCategory> {
        let sanitized = self.sanitize()?;

        if sanitized.parent_id == Some(category_id) {
            return Err(CategoryFormError::SelfParent);
        }

        Ok(UpdateCategory::new(
            sanitized.name,
            sanitized.description,
            sanitized.parent_id,
        ))
    }

    fn sanitize(self) -> CategoryFormResult<SanitizedCategory> {
        self.validate()?;

        let name = collapse_whitespace(&self.name);
        if name.is_empty() {
            return Err(CategoryFormError::EmptyName);
        }

        let description = self
            .description
            .as_deref()
            .map(tidy_paragraphs)
            .filter(|text| !text.is_empty());

        let parent_id = match self.parent_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i32>() {
                Ok(id) if id > 0 => Some(id),
                _ => return Err(CategoryFormError::InvalidParent(raw.to_string())),
            },
        };

        Ok(SanitizedCategory {
            name,
            description,
            parent_id,
        })
    }
}
