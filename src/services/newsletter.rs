use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::subscriber::{Subscriber, SubscriberListQuery};
use crate::forms::newsletter::AddSubscriberForm;
use crate::repository::{SubscriberReader, SubscriberWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the newsletter page and API.
#[derive(Debug, Default, Deserialize)]
pub struct NewsletterQuery {
    /// Part of an e-mail address, matched case-insensitively.
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the newsletter index template.
pub struct NewsletterPageData {
    pub subscribers: Paginated<Subscriber>,
    pub total_pages: usize,
    pub search: Option<String>,
    /// Subscribers of the hub regardless of the search filter.
    pub total_subscribers: usize,
}

fn list_query(hub_id: i32, query: &NewsletterQuery) -> SubscriberListQuery {
    let list_query = SubscriberListQuery::new(hub_id);

    match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => list_query.search(term),
        _ => list_query,
    }
}

/// Loads the newsletter subscribers page.
pub fn load_newsletter_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: NewsletterQuery,
) -> ServiceResult<NewsletterPageData>
where
    R: SubscriberReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1);
    let list_query = list_query(user.hub_id, &query).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, subscribers) = repo
        .list_subscribers(list_query)
        .map_err(ServiceError::from)?;
    let total_subscribers = repo
        .count_subscribers(user.hub_id)
        .map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(NewsletterPageData {
        subscribers: Paginated::new(subscribers, page, total_pages),
        total_pages,
        search: query.search,
        total_subscribers,
    })
}

/// Returns every subscriber of the hub matching `query`, unpaginated.
pub fn list_subscribers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: NewsletterQuery,
) -> ServiceResult<Vec<Subscriber>>
where
    R: SubscriberReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let (_, subscribers) = repo
        .list_subscribers(list_query(user.hub_id, &query))
        .map_err(ServiceError::from)?;

    Ok(subscribers)
}

/// Subscribes an address to the hub's newsletter.
pub fn add_subscriber<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddSubscriberForm,
) -> ServiceResult<Subscriber>
where
    R: SubscriberReader + SubscriberWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_subscriber = form
        .into_new_subscriber(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_subscriber_by_email(&new_subscriber.email, user.hub_id)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict);
    }

    repo.create_subscriber(&new_subscriber)
        .map_err(ServiceError::from)
}

/// Removes a subscriber from the hub's newsletter.
pub fn remove_subscriber<R>(
    repo: &R,
    user: &AuthenticatedUser,
    subscriber_id: i32,
) -> ServiceResult<()>
where
    R: SubscriberWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_subscriber(subscriber_id, user.hub_id)
        .map_err(ServiceError::from)
}
