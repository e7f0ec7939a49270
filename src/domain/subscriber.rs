use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// E-mail address subscribed to a hub's newsletter.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Subscriber {
    /// Unique identifier of the subscription.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Subscribed address, stored lower-cased.
    pub email: String,
    /// When the address subscribed.
    pub created_at: NaiveDateTime,
}

/// Payload required to register a new subscriber.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub hub_id: i32,
    pub email: String,
    pub created_at: NaiveDateTime,
}

impl NewSubscriber {
    pub fn new(hub_id: i32, email: impl Into<String>) -> Self {
        Self {
            hub_id,
            email: email.into(),
            created_at: Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list newsletter subscribers for a hub.
#[derive(Debug, Clone)]
pub struct SubscriberListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Case-insensitive substring filter applied to e-mail addresses.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl SubscriberListQuery {
    /// Construct a query that targets all subscribers of `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            pagination: None,
        }
    }

    /// Filter the results by part of the e-mail address.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
