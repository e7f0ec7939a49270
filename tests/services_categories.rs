use std::io::Write;

use actix_multipart::form::{tempfile::TempFile, text::Text};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::services::errors::ServiceError;
use pushkind_shop_admin::SERVICE_ACCESS_ROLE;
use pushkind_shop_admin::domain::category::CategoryListQuery;
use pushkind_shop_admin::forms::categories::{CategoryImageStore, CategoryUploadForm};
use pushkind_shop_admin::repository::{CategoryReader, DieselRepository};
use pushkind_shop_admin::services::categories::{create_category, modify_category};
use tempfile::{NamedTempFile, TempDir};

mod common;

fn admin(hub_id: i32) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "admin".to_string(),
        email: "admin@example.com".to_string(),
        hub_id,
        name: "Admin".to_string(),
        roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        exp: 0,
    }
}

fn form(name: &str, parent_id: Option<i32>) -> CategoryUploadForm {
    CategoryUploadForm {
        name: Text(name.to_string()),
        description: None,
        parent_id: parent_id.map(|id| Text(id.to_string())),
        image: None,
    }
}

fn image(file_name: &str) -> TempFile {
    let bytes = b"\x89PNG\r\n";
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");

    TempFile {
        file,
        content_type: None,
        file_name: Some(file_name.to_string()),
        size: bytes.len(),
    }
}

#[test]
fn test_parent_with_children_cannot_be_nested() {
    let test_db = common::TestDb::new("test_parent_with_children.db");
    let repo = DieselRepository::new(test_db.pool());
    let uploads = TempDir::new().unwrap();
    let images = CategoryImageStore::new(uploads.path(), "/assets/uploads/categories");
    let user = admin(1);

    let sarees = create_category(&repo, &user, form("Sarees", None), &images).unwrap();
    create_category(&repo, &user, form("Silk", Some(sarees.id)), &images).unwrap();
    let apparel = create_category(&repo, &user, form("Apparel", None), &images).unwrap();

    let result = modify_category(
        &repo,
        &user,
        sarees.id,
        form("Sarees", Some(apparel.id)),
        &images,
    );
    assert!(matches!(result, Err(ServiceError::Form(_))));

    let stored = repo.get_category_by_id(sarees.id, 1).unwrap().unwrap();
    assert!(stored.is_top_level());

    let nested = modify_category(
        &repo,
        &user,
        apparel.id,
        form("Apparel", Some(sarees.id)),
        &images,
    )
    .unwrap();
    assert_eq!(nested.parent_id, Some(sarees.id));

    let categories = repo.list_categories(CategoryListQuery::new(1)).unwrap();
    for category in &categories {
        if let Some(parent_id) = category.parent_id {
            let parent = categories.iter().find(|c| c.id == parent_id).unwrap();
            assert!(parent.is_top_level());
        }
    }
}

#[test]
fn test_category_image_upload_is_kept_across_edits() {
    let test_db = common::TestDb::new("test_category_image_upload.db");
    let repo = DieselRepository::new(test_db.pool());
    let uploads = TempDir::new().unwrap();
    let images = CategoryImageStore::new(uploads.path(), "/assets/uploads/categories");
    let user = admin(1);

    let mut upload = form("Sarees", None);
    upload.image = Some(image("sarees.png"));
    let created = create_category(&repo, &user, upload, &images).unwrap();

    let url = created.image.clone().unwrap();
    assert!(url.starts_with("/assets/uploads/categories/1-"));
    let file_name = url.rsplit('/').next().unwrap();
    assert!(uploads.path().join(file_name).exists());

    let renamed = modify_category(&repo, &user, created.id, form("Saris", None), &images).unwrap();
    assert_eq!(renamed.name, "Saris");
    assert_eq!(renamed.image, created.image);

    let mut replacement = form("Saris", None);
    replacement.image = Some(image("saris.webp"));
    let replaced = modify_category(&repo, &user, created.id, replacement, &images).unwrap();
    assert!(replaced.image.as_deref().is_some_and(|url| url.ends_with(".webp")));
}
