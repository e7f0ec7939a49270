use std::collections::HashMap;

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;
use serde::{Deserialize, Serialize};

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::category::{Category, CategoryListQuery};
use crate::forms::categories::{CategoryImageStore, CategoryUploadForm};
use crate::repository::{CategoryReader, CategoryWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the categories index page.
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesQuery {
    pub search: Option<String>,
}

/// Data required to render the categories index template.
pub struct CategoriesPageData {
    pub categories: Vec<CategoryView>,
    /// Candidates for the parent picker.
    pub parents: Vec<Category>,
    pub search: Option<String>,
}

/// Row of the categories table.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub parent_id: Option<i32>,
    pub parent_name: Option<String>,
}

/// Loads the categories overview page.
pub fn load_categories_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CategoriesQuery,
) -> ServiceResult<CategoriesPageData>
where
    R: CategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let all = repo
        .list_categories(CategoryListQuery::new(user.hub_id))
        .map_err(ServiceError::from)?;

    let names: HashMap<i32, &str> = all
        .iter()
        .map(|category| (category.id, category.name.as_str()))
        .collect();

    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase);

    let categories = all
        .iter()
        .filter(|category| match needle.as_deref() {
            Some(needle) => category.name.to_lowercase().contains(needle),
            None => true,
        })
        .map(|category| CategoryView {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            image: category.image.clone(),
            parent_id: category.parent_id,
            parent_name: category
                .parent_id
                .and_then(|parent_id| names.get(&parent_id))
                .map(|name| name.to_string()),
        })
        .collect();

    let parents = all
        .iter()
        .filter(|category| category.is_top_level())
        .cloned()
        .collect();

    Ok(CategoriesPageData {
        categories,
        parents,
        search: query.search,
    })
}

/// Creates a new category for the authenticated user's hub.
///
/// The picture is written to `images` only after the fields pass validation.
pub fn create_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    upload: CategoryUploadForm,
    images: &CategoryImageStore,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let (form, image) = upload.into_parts();

    let mut new_category = form
        .into_new_category(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    ensure_unique_name(repo, user.hub_id, &new_category.name, None)?;
    if let Some(parent_id) = new_category.parent_id {
        ensure_top_level_parent(repo, user.hub_id, parent_id)?;
    }

    if let Some(image) = image {
        let url = images
            .save(user.hub_id, &image)
            .map_err(|err| ServiceError::Form(err.to_string()))?;
        new_category = new_category.with_image(url);
    }

    repo.create_category(&new_category)
        .map_err(ServiceError::from)
}

/// Updates category `category_id` of the authenticated user's hub.
///
/// Without a new picture the stored one is kept.
pub fn modify_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    category_id: i32,
    upload: CategoryUploadForm,
    images: &CategoryImageStore,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let existing = repo
        .get_category_by_id(category_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let (form, image) = upload.into_parts();

    let update = form
        .into_update_category(category_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    ensure_unique_name(repo, user.hub_id, &update.name, Some(category_id))?;
    if let Some(parent_id) = update.parent_id {
        ensure_top_level_parent(repo, user.hub_id, parent_id)?;
        ensure_childless(repo, user.hub_id, &existing)?;
    }

    let image = match image {
        Some(image) => Some(
            images
                .save(user.hub_id, &image)
                .map_err(|err| ServiceError::Form(err.to_string()))?,
        ),
        None => existing.image,
    };

    repo.update_category(category_id, user.hub_id, &update.with_image(image))
        .map_err(ServiceError::from)
}

/// Deletes a category; its subcategories move to the top level.
pub fn remove_category<R>(repo: &R, user: &AuthenticatedUser, category_id: i32) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_category(category_id, user.hub_id)
        .map_err(ServiceError::from)
}

fn ensure_unique_name<R>(
    repo: &R,
    hub_id: i32,
    name: &str,
    own_id: Option<i32>,
) -> ServiceResult<()>
where
    R: CategoryReader + ?Sized,
{
    match repo
        .get_category_by_name(name, hub_id)
        .map_err(ServiceError::from)?
    {
        Some(existing) if Some(existing.id) != own_id => Err(ServiceError::Conflict),
        _ => Ok(()),
    }
}

/// Categories nest one level deep, which also rules out cycles.
fn ensure_top_level_parent<R>(repo: &R, hub_id: i32, parent_id: i32) -> ServiceResult<()>
where
    R: CategoryReader + ?Sized,
{
    match repo
        .get_category_by_id(parent_id, hub_id)
        .map_err(ServiceError::from)?
    {
        Some(parent) if parent.is_top_level() => Ok(()),
        Some(parent) => Err(ServiceError::Form(format!(
            "category `{}` is itself a subcategory",
            parent.name
        ))),
        None => Err(ServiceError::Form(format!(
            "parent category {parent_id} does not exist"
        ))),
    }
}

/// A category with subcategories stays top-level.
fn ensure_childless<R>(repo: &R, hub_id: i32, category: &Category) -> ServiceResult<()>
where
    R: CategoryReader + ?Sized,
{
    if repo
        .has_child_categories(category.id, hub_id)
        .map_err(ServiceError::from)?
    {
        return Err(ServiceError::Form(format!(
            "category `{}` has subcategories and cannot be nested",
            category.name
        )));
    }

    Ok(())
}
