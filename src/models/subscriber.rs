use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::subscriber::{
    NewSubscriber as DomainNewSubscriber, Subscriber as DomainSubscriber,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::newsletter_subscribers)]
pub struct Subscriber {
    pub id: i32,
    pub hub_id: i32,
    pub email: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::newsletter_subscribers)]
pub struct NewSubscriber<'a> {
    pub hub_id: i32,
    pub email: &'a str,
    pub created_at: NaiveDateTime,
}

impl From<Subscriber> for DomainSubscriber {
    fn from(value: Subscriber) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            email: value.email,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewSubscriber> for NewSubscriber<'a> {
    fn from(value: &'a DomainNewSubscriber) -> Self {
        Self {
            hub_id: value.hub_id,
            email: value.email.as_str(),
            created_at: value.created_at,
        }
    }
}
