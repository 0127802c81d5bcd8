//! Web handlers for the Ticketmaster backed routes.

use actix_web::{
    get,
    web::{Data, Query},
    HttpResponse,
};
use cadence::{Histogrammed, StatsdClient};
use marquee_discovery::{
    EventDetail, EventSummary, RawSearchQuery, SearchQuery, ValidationError, VenueInfo,
};
use serde::{Deserialize, Serialize};

use super::{record_outcome, required};
use crate::{errors::HandlerError, upstreams::Upstreams};

/// Query parameters for routes that take a keyword.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct KeywordQuery {
    /// The keyword to look up.
    keyword: Option<String>,
}

/// Query parameters for the event detail route.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct EventQuery {
    /// The upstream event id.
    id: Option<String>,
}

/// The response to an event search.
#[derive(Debug, Serialize)]
struct SearchResponse {
    /// Matching events, soonest first.
    events: Vec<EventSummary>,
}

/// The response to an event lookup.
#[derive(Debug, Serialize)]
struct EventResponse {
    /// The event.
    event: EventDetail,
}

/// The response to a venue lookup.
#[derive(Debug, Serialize)]
struct VenueResponse {
    /// The best matching venue, or `null` if nothing matched.
    venue: Option<VenueInfo>,
}

/// The response to a keyword suggestion.
#[derive(Debug, Serialize)]
struct SuggestResponse {
    /// Attraction names, best match first.
    suggestions: Vec<String>,
}

/// Search for events near a position.
#[get("/search")]
#[tracing::instrument(skip_all)]
pub(crate) async fn search(
    query: Query<RawSearchQuery>,
    upstreams: Data<Upstreams>,
    metrics_client: Data<StatsdClient>,
) -> Result<HttpResponse, HandlerError> {
    let events = upstreams.events()?;
    let query = SearchQuery::validate(&query)?;

    tracing::info!(
        r#type = "web.search.request",
        sensitive = true,
        keyword = %query.keyword,
        category = %query.category,
        distance = query.distance,
        "Searching events"
    );

    let summaries = record_outcome(
        &metrics_client,
        &events.name(),
        "search",
        events.search_events(&query).await,
    )?;

    tracing::debug!(
        r#type = "web.search.provided-count",
        event_count = summaries.len(),
        "Providing events"
    );
    metrics_client
        .histogram("search.results", summaries.len() as u64)
        .ok();

    Ok(HttpResponse::Ok().json(SearchResponse { events: summaries }))
}

/// Details of a single event.
#[get("/event")]
#[tracing::instrument(skip_all)]
pub(crate) async fn event(
    query: Query<EventQuery>,
    upstreams: Data<Upstreams>,
    metrics_client: Data<StatsdClient>,
) -> Result<HttpResponse, HandlerError> {
    let events = upstreams.events()?;
    let id = required(&query.id, ValidationError::MissingParameter("event id"))?;

    tracing::info!(r#type = "web.event.request", %id, "Looking up event");
    let detail = record_outcome(
        &metrics_client,
        &events.name(),
        "event",
        events.event_detail(id).await,
    )?;

    Ok(HttpResponse::Ok().json(EventResponse { event: detail }))
}

/// The venue best matching a keyword.
#[get("/venue")]
#[tracing::instrument(skip_all)]
pub(crate) async fn venue(
    query: Query<KeywordQuery>,
    upstreams: Data<Upstreams>,
    metrics_client: Data<StatsdClient>,
) -> Result<HttpResponse, HandlerError> {
    let events = upstreams.events()?;
    let keyword = required(&query.keyword, ValidationError::MissingKeyword)?;

    tracing::info!(
        r#type = "web.venue.request",
        sensitive = true,
        %keyword,
        "Looking up venue"
    );
    let venue = record_outcome(
        &metrics_client,
        &events.name(),
        "venue",
        events.find_venue(keyword).await,
    )?;
    if venue.is_none() {
        tracing::debug!(r#type = "web.venue.no-match", "No venue matched");
    }

    Ok(HttpResponse::Ok().json(VenueResponse { venue }))
}

/// Attraction names that complete a partial keyword.
#[get("/suggest")]
#[tracing::instrument(skip_all)]
pub(crate) async fn suggest(
    query: Query<KeywordQuery>,
    upstreams: Data<Upstreams>,
    metrics_client: Data<StatsdClient>,
) -> Result<HttpResponse, HandlerError> {
    let events = upstreams.events()?;
    let keyword = query.keyword.as_deref().map(str::trim).unwrap_or_default();
    let suggestions = if keyword.is_empty() {
        Vec::new()
    } else {
        record_outcome(
            &metrics_client,
            &events.name(),
            "suggest",
            events.suggest(keyword).await,
        )?
    };

    Ok(HttpResponse::Ok().json(SuggestResponse { suggestions }))
}
