use crate::config::ClientConfig;
use crate::model::{Entrant, EntrantId, EventInfo, EventStatus, MatchSet, Standing};
use crate::queries::{self, Query};
use crate::retry::RetryState;
use crate::schema::{self, Connection, GqlResponse};
use crate::transport::{GraphqlRequest, ReqwestTransport, Transport, TransportError};
use logger::{now_iso, ApiStatusEvent, EventLogger, PageTruncatedEvent};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

/// Result of one page request as the paginator sees it.
#[derive(Debug)]
pub enum PageOutcome<D> {
    Page(D),
    Retryable(TransportError),
    Exhausted { attempts: u32, error: TransportError },
}

/// Sequential start.gg fetcher. One request in flight at a time.
pub struct Fetcher<T: Transport = ReqwestTransport> {
    transport: T,
    config:    ClientConfig,
    events:    Option<EventLogger>,
}

impl Fetcher<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { transport, config, events: None }
    }

    /// Mirror every page request into the JSONL event stream.
    pub fn with_event_log(mut self, events: EventLogger) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ====================================================================
    // Logical queries
    // ====================================================================

    pub async fn event_info(&self, slug: &str) -> Option<EventInfo> {
        let vars = variables([("slug", json!(slug))]);
        match self.fetch_page::<schema::EventInfoData>(&queries::EVENT_INFO, vars, 1).await {
            PageOutcome::Page(data) => schema::to_event_info(data),
            _ => None,
        }
    }

    pub async fn event_status(&self, event_id: i64) -> Option<EventStatus> {
        let vars = variables([("eventId", json!(event_id))]);
        match self.fetch_page::<schema::EventStatusData>(&queries::EVENT_STATUS, vars, 1).await {
            PageOutcome::Page(data) => schema::to_event_status(data),
            _ => None,
        }
    }

    pub async fn entrants(&self, event_id: i64) -> Vec<Entrant> {
        self.paginate(
            &queries::ENTRANTS,
            variables([("eventId", json!(event_id))]),
            queries::ENTRANTS_PER_PAGE,
            schema::entrants_connection,
        )
        .await
        .into_iter()
        .filter_map(schema::to_entrant)
        .collect()
    }

    pub async fn standings(&self, event_id: i64) -> Vec<Standing> {
        self.paginate(
            &queries::STANDINGS,
            variables([("eventId", json!(event_id))]),
            queries::STANDINGS_PER_PAGE,
            schema::standings_connection,
        )
        .await
        .into_iter()
        .map(schema::to_standing)
        .collect()
    }

    /// Every set the entrant played or is scheduled for, byes hidden.
    pub async fn entrant_sets(&self, entrant_id: EntrantId) -> Vec<MatchSet> {
        self.paginate(
            &queries::ENTRANT_SETS,
            variables([("entrantId", json!(entrant_id))]),
            queries::SETS_PER_PAGE,
            schema::entrant_sets_connection,
        )
        .await
        .into_iter()
        .map(schema::to_match_set)
        .collect()
    }

    /// Sets of one event filtered server-side by entrant.
    pub async fn event_sets(&self, event_id: i64, entrant_id: EntrantId) -> Vec<MatchSet> {
        self.paginate(
            &queries::EVENT_SETS,
            variables([("eventId", json!(event_id)), ("entrantId", json!(entrant_id))]),
            queries::SETS_PER_PAGE,
            schema::event_sets_connection,
        )
        .await
        .into_iter()
        .map(schema::to_match_set)
        .collect()
    }

    // ====================================================================
    // Pagination + retry
    // ====================================================================

    /// Concatenates `nodes` of every page in server order.
    ///
    /// Stops on an empty page, when `page >= totalPages`, or when a page exhausts its
    /// retries. The last case drops every remaining page and is reported as a warning.
    pub async fn paginate<D, N, F>(
        &self,
        query: &Query,
        mut vars: Map<String, Value>,
        per_page: u32,
        extract: F,
    ) -> Vec<N>
    where
        D: DeserializeOwned + Default,
        F: Fn(D) -> Connection<N>,
    {
        let mut all = Vec::new();
        let mut page: u32 = 1;

        loop {
            vars.insert("page".to_string(), json!(page));
            vars.insert("perPage".to_string(), json!(per_page));

            let data = match self.fetch_page::<D>(query, vars.clone(), page).await {
                PageOutcome::Page(data) => data,
                PageOutcome::Exhausted { attempts, error } => {
                    self.report_truncation(query, page, attempts, &error, all.len());
                    break;
                }
                PageOutcome::Retryable(error) => {
                    self.report_truncation(query, page, self.config.retry.max_attempts, &error, all.len());
                    break;
                }
            };

            let connection = extract(data);
            let total_pages = connection.total_pages();
            let nodes = connection.into_nodes();
            if nodes.is_empty() {
                debug!("{} page {} empty, done", query.name, page);
                break;
            }
            all.extend(nodes);

            if i64::from(page) >= total_pages {
                break;
            }
            page += 1;
        }

        info!("{}: {} items over {} page(s)", query.name, all.len(), page);
        all
    }

    /// One page, up to `retry.max_attempts` tries with a fixed backoff in between.
    pub async fn fetch_page<D>(&self, query: &Query, vars: Map<String, Value>, page: u32) -> PageOutcome<D>
    where
        D: DeserializeOwned + Default,
    {
        let policy = self.config.retry;
        let request = GraphqlRequest { query: query.text, variables: vars };
        let mut state = RetryState::start();

        loop {
            match self.attempt::<D>(&request).await {
                PageOutcome::Retryable(error) => {
                    state = state.on_failure(&policy);
                    if let RetryState::Exhausted { attempts } = state {
                        warn!("{} page {} giving up after {} attempts: {}", query.name, page, attempts, error);
                        self.log_status(query, page, false, attempts, &error.to_string());
                        return PageOutcome::Exhausted { attempts, error };
                    }
                    warn!(
                        "{} page {} attempt {}/{} failed: {}; retrying in {:?}",
                        query.name, page, state.attempts(), policy.max_attempts, error, policy.backoff
                    );
                    tokio::time::sleep(policy.backoff).await;
                    state = state.on_backoff_elapsed();
                }
                outcome => {
                    state = state.on_success();
                    self.log_status(query, page, true, state.attempts(), "ok");
                    return outcome;
                }
            }
        }
    }

    async fn attempt<D>(&self, request: &GraphqlRequest) -> PageOutcome<D>
    where
        D: DeserializeOwned + Default,
    {
        let raw = match self.transport.post(request).await {
            Ok(v) => v,
            Err(e) => return PageOutcome::Retryable(e),
        };

        let envelope: GqlResponse<D> = match serde_json::from_value(raw) {
            Ok(g) => g,
            Err(e) => return PageOutcome::Retryable(e.into()),
        };

        let messages: Vec<String> = envelope.errors
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.message)
            .collect();

        match envelope.data {
            Some(data) => {
                for m in &messages {
                    warn!("GraphQL error alongside data: {}", m);
                }
                PageOutcome::Page(data)
            }
            None if !messages.is_empty() => PageOutcome::Retryable(TransportError::GraphQl(messages)),
            None => PageOutcome::Page(D::default()),
        }
    }

    fn log_status(&self, query: &Query, page: u32, ok: bool, attempts: u32, message: &str) {
        if let Some(events) = &self.events {
            events.log_quiet(&ApiStatusEvent {
                ts: now_iso(),
                event: "API_STATUS",
                query: query.name.to_string(),
                page,
                ok,
                attempts,
                message: message.to_string(),
            });
        }
    }

    fn report_truncation(&self, query: &Query, page: u32, attempts: u32, error: &TransportError, items_so_far: usize) {
        warn!(
            "{} page {} failed after {} attempts ({}); keeping {} items, remaining pages dropped",
            query.name, page, attempts, error, items_so_far
        );
        if let Some(events) = &self.events {
            events.log_quiet(&PageTruncatedEvent {
                ts: now_iso(),
                event: "PAGE_TRUNCATED",
                query: query.name.to_string(),
                page,
                attempts,
                items_so_far,
            });
        }
    }
}

fn variables<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
