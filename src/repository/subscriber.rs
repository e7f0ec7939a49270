use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::subscriber::{
    NewSubscriber as DomainNewSubscriber, Subscriber as DomainSubscriber, SubscriberListQuery,
};
use crate::models::subscriber::{NewSubscriber as DbNewSubscriber, Subscriber as DbSubscriber};
use crate::repository::{DieselRepository, SubscriberReader, SubscriberWriter, page_window};

impl SubscriberReader for DieselRepository {
    fn list_subscribers(
        &self,
        query: SubscriberListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainSubscriber>)> {
        use crate::schema::newsletter_subscribers as subscribers;

        let mut conn = self.conn()?;

        // Addresses are stored lower-cased, so lowering the term is enough.
        let pattern = query
            .search
            .as_ref()
            .map(|term| format!("%{}%", term.trim().to_lowercase()));

        let mut count_query = subscribers::table
            .filter(subscribers::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pattern) = pattern.as_ref() {
            count_query = count_query.filter(subscribers::email.like(pattern.clone()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items_query = subscribers::table
            .filter(subscribers::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pattern) = pattern {
            items_query = items_query.filter(subscribers::email.like(pattern));
        }

        items_query = items_query.order((subscribers::created_at.desc(), subscribers::id.desc()));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_window(pagination.page, pagination.per_page);
            items_query = items_query.offset(offset).limit(limit);
        }

        let subscribers = items_query
            .load::<DbSubscriber>(&mut conn)?
            .into_iter()
            .map(DomainSubscriber::from)
            .collect();

        Ok((total, subscribers))
    }

    fn get_subscriber_by_email(
        &self,
        email: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainSubscriber>> {
        use crate::schema::newsletter_subscribers as subscribers;

        let mut conn = self.conn()?;

        let subscriber = subscribers::table
            .filter(subscribers::email.eq(email))
            .filter(subscribers::hub_id.eq(hub_id))
            .first::<DbSubscriber>(&mut conn)
            .optional()?;

        Ok(subscriber.map(DomainSubscriber::from))
    }

    fn count_subscribers(&self, hub_id: i32) -> RepositoryResult<usize> {
        use crate::schema::newsletter_subscribers as subscribers;

        let mut conn = self.conn()?;

        let total = subscribers::table
            .filter(subscribers::hub_id.eq(hub_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(total as usize)
    }
}

impl SubscriberWriter for DieselRepository {
    fn create_subscriber(
        &self,
        new_subscriber: &DomainNewSubscriber,
    ) -> RepositoryResult<DomainSubscriber> {
        use crate::schema::newsletter_subscribers as subscribers;

        let mut conn = self.conn()?;

        let insertable = DbNewSubscriber::from(new_subscriber);

        let created = diesel::insert_into(subscribers::table)
            .values(&insertable)
            .get_result::<DbSubscriber>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_subscriber(&self, subscriber_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::newsletter_subscribers as subscribers;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            subscribers::table
                .filter(subscribers::id.eq(subscriber_id))
                .filter(subscribers::hub_id.eq(hub_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
