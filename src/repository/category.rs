use chrono::Local;
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::category::{
    Category as DomainCategory, CategoryListQuery, NewCategory as DomainNewCategory,
    UpdateCategory as DomainUpdateCategory,
};
use crate::models::category::{
    Category as DbCategory, NewCategory as DbNewCategory, UpdateCategory,
};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let mut items_query = categories::table
            .filter(categories::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if query.top_level_only {
            items_query = items_query.filter(categories::parent_id.is_null());
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{term}%");
            items_query = items_query.filter(
                categories::name
                    .like(pattern.clone())
                    .or(categories::description.like(pattern)),
            );
        }

        let categories = items_query
            .order(categories::name.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(DomainCategory::from)
            .collect();

        Ok(categories)
    }

    fn get_category_by_id(
        &self,
        category_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(category_id))
            .filter(categories::hub_id.eq(hub_id))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(DomainCategory::from))
    }

    fn get_category_by_name(
        &self,
        name: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::name.eq(name))
            .filter(categories::hub_id.eq(hub_id))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(DomainCategory::from))
    }

    fn has_child_categories(&self, category_id: i32, hub_id: i32) -> RepositoryResult<bool> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let has_children = select(exists(
            categories::table
                .filter(categories::hub_id.eq(hub_id))
                .filter(categories::parent_id.eq(Some(category_id))),
        ))
        .get_result(&mut conn)?;

        Ok(has_children)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(
        &self,
        new_category: &DomainNewCategory,
    ) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        if let Some(parent_id) = new_category.parent_id {
            ensure_category_with_hub(&mut conn, new_category.hub_id, parent_id)?;
        }

        let insertable = DbNewCategory::from(new_category);

        let created = diesel::insert_into(categories::table)
            .values(&insertable)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.into())
    }

    fn update_category(
        &self,
        category_id: i32,
        hub_id: i32,
        updates: &DomainUpdateCategory,
    ) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        if let Some(parent_id) = updates.parent_id {
            ensure_category_with_hub(&mut conn, hub_id, parent_id)?;
        }

        let db_updates = UpdateCategory::from(updates);

        let target = categories::table
            .filter(categories::id.eq(category_id))
            .filter(categories::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbCategory>(&mut conn)
            .optional()?;

        updated.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    fn delete_category(&self, category_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            ensure_category_with_hub(conn, hub_id, category_id)?;

            diesel::update(
                categories::table
                    .filter(categories::hub_id.eq(hub_id))
                    .filter(categories::parent_id.eq(Some(category_id))),
            )
            .set((
                categories::parent_id.eq::<Option<i32>>(None),
                categories::updated_at.eq(Local::now().naive_utc()),
            ))
            .execute(conn)?;

            diesel::delete(
                categories::table
                    .filter(categories::id.eq(category_id))
                    .filter(categories::hub_id.eq(hub_id)),
            )
            .execute(conn)?;

            Ok(())
        })
    }
}

fn ensure_category_with_hub(
    conn: &mut SqliteConnection,
    hub_id: i32,
    category_id: i32,
) -> RepositoryResult<()> {
    use crate::schema::categories;

    let exists = select(exists(
        categories::table
            .filter(categories::id.eq(category_id))
            .filter(categories::hub_id.eq(hub_id)),
    ))
    .get_result(conn)?;

    if exists {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}
