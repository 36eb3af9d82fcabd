use rustc_hash::FxHashMap;

use crate::assets::fetch::{AssetKind, LoadRequest, LoadTicket};

/// Progress notification emitted by the [`LoadingManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    /// The first item of a batch started.
    Started {
        url: String,
        loaded: usize,
        total: usize,
    },
    /// An item ended, successfully or not.
    Progress {
        url: String,
        loaded: usize,
        total: usize,
    },
    /// Every registered item has ended.
    Loaded,
    Error {
        url: String,
    },
}

/// Aggregates the progress of every asset the stage requested.
///
/// A failed item still ends, so a batch with failures completes and `Loaded` fires.
#[derive(Debug, Default)]
pub struct LoadingManager {
    total: usize,
    loaded: usize,
    loading: bool,
    next_ticket: u64,
    in_flight: FxHashMap<LoadTicket, String>,
    queued: Vec<LoadRequest>,
    events: Vec<LoadEvent>,
}

impl LoadingManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new item and queues its request for the fetcher.
    pub fn register(&mut self, kind: AssetKind, uri: impl Into<String>) -> LoadTicket {
        let uri = uri.into();
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;

        self.item_start(&uri);
        self.in_flight.insert(ticket, uri.clone());
        self.queued.push(LoadRequest { ticket, kind, uri });
        ticket
    }

    /// Requests registered since the last call, for the host to fetch.
    pub fn take_requests(&mut self) -> Vec<LoadRequest> {
        std::mem::take(&mut self.queued)
    }

    pub fn take_events(&mut self) -> Vec<LoadEvent> {
        std::mem::take(&mut self.events)
    }

    /// Marks a ticket finished. Returns the item's URL, or `None` for an unknown
    /// or already finished ticket.
    pub fn complete(&mut self, ticket: LoadTicket, failed: bool) -> Option<String> {
        let url = self.in_flight.remove(&ticket)?;
        if failed {
            self.item_error(&url);
        }
        self.item_end(&url);
        Some(url)
    }

    fn item_start(&mut self, url: &str) {
        self.total += 1;
        if !self.loading {
            self.events.push(LoadEvent::Started {
                url: url.to_string(),
                loaded: self.loaded,
                total: self.total,
            });
        }
        self.loading = true;
    }

    fn item_end(&mut self, url: &str) {
        self.loaded += 1;
        log::debug!("Loaded {url} ({}/{})", self.loaded, self.total);
        self.events.push(LoadEvent::Progress {
            url: url.to_string(),
            loaded: self.loaded,
            total: self.total,
        });

        if self.loaded == self.total {
            self.loading = false;
            log::info!("All {} assets finished loading", self.total);
            self.events.push(LoadEvent::Loaded);
        }
    }

    fn item_error(&mut self, url: &str) {
        log::error!("Failed to load {url}");
        self.events.push(LoadEvent::Error {
            url: url.to_string(),
        });
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.loaded == self.total
    }

    #[must_use]
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whole-number completion percentage; 0 before anything was registered.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.loaded * 100) / self.total) as u32
    }
}
