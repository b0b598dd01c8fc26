//! List of postings, reloaded when a child screen reports a change.
//!
//! Each `refresh` supersedes the previous one: results are tagged with the
//! generation that requested them and only the latest generation is applied.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::detail::ScreenResult;
use crate::live::Lifecycle;
use crate::repository::LostFoundRepository;
use crate::result::AsyncResult;
use crate::types::{ListFilter, LostFound};

pub struct ListSession {
    repository: LostFoundRepository,
    filter: ListFilter,
    items: Vec<LostFound>,
    loading: bool,
    generation: u64,
    lifecycle: Lifecycle,
    inbox: Receiver<(u64, AsyncResult<Vec<LostFound>>)>,
    outbox: Sender<(u64, AsyncResult<Vec<LostFound>>)>,
}

impl ListSession {
    pub fn new(repository: LostFoundRepository, filter: ListFilter) -> Self {
        let (outbox, inbox) = mpsc::channel();
        Self {
            repository,
            filter,
            items: Vec::new(),
            loading: false,
            generation: 0,
            lifecycle: Lifecycle::new(),
            inbox,
            outbox,
        }
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: ListFilter) {
        self.filter = filter;
        self.refresh();
    }

    pub fn items(&self) -> &[LostFound] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn refresh(&mut self) {
        self.generation += 1;
        self.loading = true;
        let generation = self.generation;
        let outbox = self.outbox.clone();
        self.repository
            .list_lost_founds(self.filter.clone())
            .observe_once(&self.lifecycle, move |result| {
                let _ = outbox.send((generation, result.clone()));
            });
    }

    /// Returns whether a reload was started.
    pub fn on_child_result(&mut self, result: ScreenResult) -> bool {
        if !result.should_refresh() {
            return false;
        }
        tracing::debug!("child screen changed data; reloading list");
        self.refresh();
        true
    }

    /// Apply delivered results. Returns messages for the user.
    pub fn process(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        while let Ok((generation, result)) = self.inbox.try_recv() {
            if generation != self.generation {
                tracing::debug!(generation, latest = self.generation, "dropping superseded list result");
                continue;
            }
            match result {
                AsyncResult::Loading => self.loading = true,
                AsyncResult::Success(items) => {
                    self.loading = false;
                    self.items = items;
                }
                AsyncResult::Error(message) => {
                    self.loading = false;
                    messages.push(message);
                }
            }
        }
        messages
    }
}

impl Drop for ListSession {
    fn drop(&mut self) {
        self.lifecycle.destroy();
    }
}
