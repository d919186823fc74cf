//! Dashboard orchestration: reducer-style form transitions, search + hydration, and
//! generation tracking so only the newest request's response reaches the screen.

use std::sync::Arc;

use shared::{
    domain::{Dog, DogId, SortDirection},
    protocol::SearchQuery,
};
use tokio::{
    sync::{broadcast, watch, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    pagination::Pagination,
    screen::ScreenState,
    search::{BreedFilter, SearchFormState},
    selection::{SelectedDogs, SelectionError},
    ClientError, DogApi,
};

const EVENT_CAPACITY: usize = 64;
const MAX_REFRESH_ATTEMPTS: usize = 3;
const PAGES_UNSETTLED_MESSAGE: &str = "Results changed while loading. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardAction {
    SetSearch(String),
    ToggleBreed(String),
    SetSort(SortDirection),
    NextPage,
    PreviousPage,
    GoToPage(u32),
    ToggleDog(Dog),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    BreedsLoaded { count: usize },
    ResultsLoaded { generation: u64, count: usize },
    StaleResultsDropped { generation: u64 },
    SelectionChanged { selected: usize },
    LoggedOut,
    Error(String),
}

#[derive(Default)]
struct DashboardState {
    form: SearchFormState,
    pagination: Pagination,
    breeds: BreedFilter,
    selection: SelectedDogs,
    generation: u64,
}

struct RefreshTicket {
    generation: u64,
    query: SearchQuery,
}

enum RefreshOutcome {
    Applied,
    Stale,
    PageClamped(RefreshTicket),
}

pub struct Dashboard {
    api: Arc<dyn DogApi>,
    inner: Mutex<DashboardState>,
    screen: watch::Sender<ScreenState>,
    events: broadcast::Sender<DashboardEvent>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn DogApi>) -> Arc<Self> {
        let (screen, _) = watch::channel(ScreenState::Loading);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            api,
            inner: Mutex::new(DashboardState::default()),
            screen,
            events,
        })
    }

    pub fn screen(&self) -> ScreenState {
        self.screen.borrow().clone()
    }

    pub fn subscribe_screen(&self) -> watch::Receiver<ScreenState> {
        self.screen.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub async fn form(&self) -> SearchFormState {
        self.inner.lock().await.form.clone()
    }

    pub async fn pagination(&self) -> Pagination {
        self.inner.lock().await.pagination
    }

    pub async fn selection(&self) -> SelectedDogs {
        self.inner.lock().await.selection.clone()
    }

    pub async fn is_selected(&self, id: &DogId) -> bool {
        self.inner.lock().await.selection.contains(id)
    }

    /// Breeds offered in the dropdown for the current free-text query.
    pub async fn matching_breeds(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner
            .breeds
            .matching(inner.form.search())
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Link to the match screen carrying the current selection.
    pub async fn selection_link(&self, base: &Url) -> Result<Url, SelectionError> {
        self.inner.lock().await.selection.navigation_url(base)
    }

    pub async fn mount(&self) {
        self.load_breeds().await;
        self.refresh().await;
    }

    /// A failed breed fetch is logged and leaves the dropdown empty.
    pub async fn load_breeds(&self) {
        let breeds = match self.api.breeds().await {
            Ok(breeds) => breeds,
            Err(err) => {
                warn!("failed to fetch breeds: {err}");
                return;
            }
        };

        let count = breeds.len();
        {
            let mut inner = self.inner.lock().await;
            inner.breeds = BreedFilter::new(breeds.clone());
            self.screen.send_modify(|screen| {
                if let ScreenState::Success {
                    available_breeds, ..
                } = screen
                {
                    *available_breeds = breeds;
                }
            });
        }
        debug!(count, "breeds loaded");
        let _ = self.events.send(DashboardEvent::BreedsLoaded { count });
    }

    /// Applies `action` and, when it changed the server-visible form state, refreshes inline.
    /// Returns whether a refresh ran.
    pub async fn apply(&self, action: DashboardAction) -> bool {
        match self.reduce(action).await {
            Some(ticket) => {
                self.complete_refresh(ticket).await;
                true
            }
            None => false,
        }
    }

    /// Like [`Dashboard::apply`] but runs the refresh on a spawned task.
    pub async fn dispatch(self: &Arc<Self>, action: DashboardAction) -> Option<JoinHandle<()>> {
        let ticket = self.reduce(action).await?;
        Some(self.spawn_refresh(ticket))
    }

    /// Applies `action` to the form. When the server-visible state changed, the refresh
    /// ticket is issued under the same guard, so no older completion can land in between.
    async fn reduce(&self, action: DashboardAction) -> Option<RefreshTicket> {
        let mut inner = self.inner.lock().await;
        let before = inner.form.fetch_key();
        let next = match action {
            DashboardAction::SetSearch(text) => inner.form.with_search(text),
            DashboardAction::ToggleBreed(breed) => inner.form.toggle_breed(&breed),
            DashboardAction::SetSort(sort) => inner.form.with_sort(sort),
            DashboardAction::NextPage => match inner.pagination.next() {
                Some(offset) => inner.form.with_offset(offset),
                None => return None,
            },
            DashboardAction::PreviousPage => match inner.pagination.previous() {
                Some(offset) => inner.form.with_offset(offset),
                None => return None,
            },
            DashboardAction::GoToPage(page) => match inner.pagination.go_to(page) {
                Some(offset) => inner.form.with_offset(offset),
                None => return None,
            },
            DashboardAction::ToggleDog(dog) => {
                inner.selection.toggle(dog);
                let selected = inner.selection.len();
                let _ = self
                    .events
                    .send(DashboardEvent::SelectionChanged { selected });
                return None;
            }
        };
        let changed = next.fetch_key() != before;
        inner.form = next;
        changed.then(|| self.issue_ticket(&mut inner))
    }

    pub async fn refresh(&self) {
        let ticket = self.begin_refresh().await;
        self.complete_refresh(ticket).await;
    }

    /// Takes the generation now and finishes the request on a spawned task, so that
    /// generations follow dispatch order rather than scheduling order.
    pub async fn refresh_detached(self: &Arc<Self>) -> JoinHandle<()> {
        let ticket = self.begin_refresh().await;
        self.spawn_refresh(ticket)
    }

    fn spawn_refresh(self: &Arc<Self>, ticket: RefreshTicket) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.complete_refresh(ticket).await })
    }

    async fn begin_refresh(&self) -> RefreshTicket {
        let mut inner = self.inner.lock().await;
        self.issue_ticket(&mut inner)
    }

    /// Caller holds the state lock.
    fn issue_ticket(&self, inner: &mut DashboardState) -> RefreshTicket {
        inner.generation += 1;
        self.screen.send_replace(ScreenState::Loading);
        RefreshTicket {
            generation: inner.generation,
            query: inner.form.query(),
        }
    }

    async fn complete_refresh(&self, mut ticket: RefreshTicket) {
        for attempt in 1..=MAX_REFRESH_ATTEMPTS {
            let last_attempt = attempt == MAX_REFRESH_ATTEMPTS;
            match self.run_refresh(&ticket, last_attempt).await {
                RefreshOutcome::Applied | RefreshOutcome::Stale => return,
                RefreshOutcome::PageClamped(next) => ticket = next,
            }
        }
    }

    async fn run_refresh(&self, ticket: &RefreshTicket, last_attempt: bool) -> RefreshOutcome {
        let result = self.search_and_hydrate(&ticket.query).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != ticket.generation {
            debug!(
                generation = ticket.generation,
                latest = inner.generation,
                "dropping stale dashboard results"
            );
            let _ = self.events.send(DashboardEvent::StaleResultsDropped {
                generation: ticket.generation,
            });
            return RefreshOutcome::Stale;
        }

        match result {
            Ok((total, dogs)) => {
                let pages = Pagination::pages_for(total);
                if let Some(offset) = inner.pagination.set_total_pages(pages) {
                    debug!(pages, offset, "current page out of range; moving back");
                    inner.form = inner.form.with_offset(offset);
                    if !last_attempt {
                        return RefreshOutcome::PageClamped(self.issue_ticket(&mut inner));
                    }
                    warn!(
                        generation = ticket.generation,
                        "page count kept shrinking; giving up on refresh"
                    );
                    self.publish_error(PAGES_UNSETTLED_MESSAGE.to_string());
                    return RefreshOutcome::Applied;
                }

                let count = dogs.len();
                self.screen.send_replace(ScreenState::Success {
                    dogs,
                    available_breeds: inner.breeds.available().to_vec(),
                });
                info!(generation = ticket.generation, count, pages, "dashboard results loaded");
                let _ = self.events.send(DashboardEvent::ResultsLoaded {
                    generation: ticket.generation,
                    count,
                });
            }
            Err(err) => {
                warn!(generation = ticket.generation, "dashboard fetch failed: {err}");
                self.publish_error(err.user_message());
            }
        }
        RefreshOutcome::Applied
    }

    fn publish_error(&self, message: String) {
        self.screen.send_replace(ScreenState::Error {
            message: message.clone(),
        });
        let _ = self.events.send(DashboardEvent::Error(message));
    }

    async fn search_and_hydrate(&self, query: &SearchQuery) -> Result<(u64, Vec<Dog>), ClientError> {
        let page = self.api.search(query).await?;
        if page.result_ids.is_empty() {
            return Ok((page.total, Vec::new()));
        }
        let dogs = self.api.fetch_by_ids(&page.result_ids).await?;
        Ok((page.total, dogs))
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        match self.api.logout().await {
            Ok(()) => {
                let _ = self.events.send(DashboardEvent::LoggedOut);
                Ok(())
            }
            Err(err) => {
                warn!("logout failed: {err}");
                let _ = self.events.send(DashboardEvent::Error(err.user_message()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
