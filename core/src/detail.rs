//! Detail screen for one posting.
//!
//! # Design
//! `DetailScreen` is a pure state machine: the host feeds it `DetailEvent`s
//! (user input and operation results) and it answers with `DetailEffect`s
//! (network calls to make, prompts and messages to show, and the final
//! `Finish`). It never performs I/O, so every transition is unit-testable.
//!
//! `DetailSession` wires the machine to a `LostFoundRepository`: network
//! effects are executed and observed once, their results come back as events
//! through an inbox, and only UI-facing effects are returned to the host.
//!
//! Lifecycle: `Initializing → Loaded → (Mutating → Loaded)* → Exiting`.
//! Exactly one `Finish` is produced per screen; events after it are ignored.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::highlight::{highlight_status, HighlightedText};
use crate::live::Lifecycle;
use crate::repository::LostFoundRepository;
use crate::result::AsyncResult;
use crate::types::{LostFound, LostFoundItem, UpdateLostFound};

/// Result code a screen reports when it exits through its own contract.
pub const RESULT_CODE: i32 = 1001;
/// Result code for a screen that aborted.
pub const RESULT_CANCELED: i32 = 0;

/// What a child screen hands back to the screen that launched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenResult {
    pub code: i32,
    pub changed: bool,
}

impl ScreenResult {
    pub fn with_change(changed: bool) -> Self {
        Self {
            code: RESULT_CODE,
            changed,
        }
    }

    pub fn canceled() -> Self {
        Self {
            code: RESULT_CANCELED,
            changed: false,
        }
    }

    /// Whether the launching screen should reload its data.
    pub fn should_refresh(&self) -> bool {
        self.code == RESULT_CODE && self.changed
    }
}

/// How completion toggles feed the change flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeTracking {
    /// A successful toggle to a value different from the one seen when the
    /// screen loaded marks the session changed, and it stays changed even if
    /// the user toggles back.
    #[default]
    EntrySnapshot,
    /// The session counts as changed only while the last confirmed
    /// completion differs from the value seen when the screen loaded.
    NetDifference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Toggle { requested: bool },
    Delete,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPhase {
    Initializing,
    Loaded,
    Mutating(Mutation),
    Exiting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEvent {
    Fetched(AsyncResult<LostFound>),
    ToggleCompleted(bool),
    ToggleFinished {
        requested: bool,
        result: AsyncResult<()>,
    },
    DeleteClicked,
    DeleteConfirmed,
    DeleteDismissed,
    DeleteFinished(AsyncResult<()>),
    EditClicked,
    EditorClosed(ScreenResult),
    BackPressed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEffect {
    Fetch(i64),
    Update { id: i64, input: UpdateLostFound },
    Delete(i64),
    /// Ask the user to confirm deletion with a yes/no prompt.
    ConfirmDelete,
    /// Launch the editor for this item in edit mode.
    OpenEditor(LostFoundItem),
    Toast(String),
    Finish(ScreenResult),
}

impl DetailEffect {
    fn is_network(&self) -> bool {
        matches!(
            self,
            DetailEffect::Fetch(_) | DetailEffect::Update { .. } | DetailEffect::Delete(_)
        )
    }
}

/// Everything the host renders for a loaded item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub item: LostFoundItem,
    pub created_at: String,
    pub status: HighlightedText,
    /// Checkbox state; follows the user's toggle while an update is in
    /// flight.
    pub checked: bool,
}

#[derive(Debug)]
pub struct DetailScreen {
    id: i64,
    tracking: ChangeTracking,
    phase: DetailPhase,
    view: Option<DetailView>,
    entry_completed: bool,
    confirmed_completed: bool,
    changed: bool,
    confirming_delete: bool,
    content_visible: bool,
    loading: bool,
}

impl DetailScreen {
    pub fn new(id: i64, tracking: ChangeTracking) -> Self {
        Self {
            id,
            tracking,
            phase: DetailPhase::Initializing,
            view: None,
            entry_completed: false,
            confirmed_completed: false,
            changed: false,
            confirming_delete: false,
            content_visible: false,
            loading: false,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn phase(&self) -> DetailPhase {
        self.phase
    }

    pub fn view(&self) -> Option<&DetailView> {
        self.view.as_ref()
    }

    pub fn is_content_visible(&self) -> bool {
        self.content_visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    /// Current value of the change flag.
    pub fn changed(&self) -> bool {
        match self.tracking {
            ChangeTracking::EntrySnapshot => self.changed,
            ChangeTracking::NetDifference => {
                self.changed || (self.view.is_some() && self.confirmed_completed != self.entry_completed)
            }
        }
    }

    /// Entry point. A missing id (`<= 0`) finishes at once without any
    /// network effect.
    pub fn start(&mut self) -> Vec<DetailEffect> {
        if self.id <= 0 {
            tracing::debug!(id = self.id, "detail opened without a valid id");
            return self.finish(ScreenResult::canceled());
        }
        vec![DetailEffect::Fetch(self.id)]
    }

    pub fn handle(&mut self, event: DetailEvent) -> Vec<DetailEffect> {
        if self.phase == DetailPhase::Exiting {
            tracing::debug!(?event, "detail screen already exiting; event ignored");
            return Vec::new();
        }

        match event {
            DetailEvent::Fetched(result) => self.on_fetched(result),
            DetailEvent::ToggleCompleted(checked) => self.on_toggle(checked),
            DetailEvent::ToggleFinished { requested, result } => {
                self.on_toggle_finished(requested, result)
            }
            DetailEvent::DeleteClicked => {
                if self.phase != DetailPhase::Loaded {
                    return Vec::new();
                }
                self.confirming_delete = true;
                vec![DetailEffect::ConfirmDelete]
            }
            DetailEvent::DeleteDismissed => {
                self.confirming_delete = false;
                Vec::new()
            }
            DetailEvent::DeleteConfirmed => self.on_delete_confirmed(),
            DetailEvent::DeleteFinished(result) => self.on_delete_finished(result),
            DetailEvent::EditClicked => {
                let Some(view) = self.loaded_view() else {
                    return Vec::new();
                };
                let item = view.item.clone();
                self.phase = DetailPhase::Mutating(Mutation::Edit);
                vec![DetailEffect::OpenEditor(item)]
            }
            DetailEvent::EditorClosed(result) => self.on_editor_closed(result),
            DetailEvent::BackPressed => {
                let result = ScreenResult::with_change(self.changed());
                self.finish(result)
            }
        }
    }

    fn loaded_view(&self) -> Option<&DetailView> {
        match self.phase {
            DetailPhase::Loaded => self.view.as_ref(),
            _ => None,
        }
    }

    fn on_fetched(&mut self, result: AsyncResult<LostFound>) -> Vec<DetailEffect> {
        if self.phase != DetailPhase::Initializing {
            return Vec::new();
        }
        match result {
            AsyncResult::Loading => {
                self.loading = true;
                Vec::new()
            }
            AsyncResult::Success(record) => {
                self.loading = false;
                self.content_visible = true;
                let item = record.to_item();
                self.entry_completed = item.is_completed;
                self.confirmed_completed = item.is_completed;
                self.view = Some(DetailView {
                    checked: item.is_completed,
                    status: highlight_status(&item.status),
                    created_at: record.created_at,
                    item,
                });
                self.phase = DetailPhase::Loaded;
                tracing::debug!(id = self.id, "detail loaded");
                Vec::new()
            }
            AsyncResult::Error(message) => {
                self.loading = false;
                let result = if self.changed() {
                    ScreenResult::with_change(true)
                } else {
                    ScreenResult::canceled()
                };
                let mut effects = vec![DetailEffect::Toast(message)];
                effects.extend(self.finish(result));
                effects
            }
        }
    }

    fn on_toggle(&mut self, checked: bool) -> Vec<DetailEffect> {
        if let DetailPhase::Mutating(Mutation::Toggle { .. } | Mutation::Delete) = self.phase {
            tracing::warn!(id = self.id, "toggle refused while another change is in flight");
            return vec![DetailEffect::Toast(
                "Please wait, the previous change is still being saved".to_string(),
            )];
        }
        let Some(view) = self.view.as_mut().filter(|_| self.phase == DetailPhase::Loaded) else {
            return Vec::new();
        };
        if checked == self.confirmed_completed {
            return Vec::new();
        }
        view.checked = checked;
        let input = UpdateLostFound::completion(&view.item, checked);
        self.phase = DetailPhase::Mutating(Mutation::Toggle { requested: checked });
        vec![DetailEffect::Update { id: self.id, input }]
    }

    fn on_toggle_finished(&mut self, requested: bool, result: AsyncResult<()>) -> Vec<DetailEffect> {
        if self.phase != DetailPhase::Mutating(Mutation::Toggle { requested }) {
            return Vec::new();
        }
        let title = self.view.as_ref().map(|v| v.item.title.clone()).unwrap_or_default();
        match result {
            AsyncResult::Loading => Vec::new(),
            AsyncResult::Success(()) => {
                self.confirmed_completed = requested;
                if let Some(view) = self.view.as_mut() {
                    view.checked = requested;
                    view.item.is_completed = requested;
                }
                if self.tracking == ChangeTracking::EntrySnapshot && requested != self.entry_completed {
                    self.changed = true;
                }
                self.phase = DetailPhase::Loaded;
                let action = if requested {
                    "Marked as resolved"
                } else {
                    "Unmarked as resolved"
                };
                vec![DetailEffect::Toast(format!("{action}: {title}"))]
            }
            AsyncResult::Error(message) => {
                if let Some(view) = self.view.as_mut() {
                    view.checked = self.confirmed_completed;
                }
                self.phase = DetailPhase::Loaded;
                let action = if requested { "mark" } else { "unmark" };
                vec![DetailEffect::Toast(format!(
                    "Failed to {action} {title}: {message}"
                ))]
            }
        }
    }

    fn on_delete_confirmed(&mut self) -> Vec<DetailEffect> {
        if !self.confirming_delete || self.phase != DetailPhase::Loaded {
            return Vec::new();
        }
        self.confirming_delete = false;
        self.content_visible = false;
        self.loading = true;
        self.phase = DetailPhase::Mutating(Mutation::Delete);
        vec![DetailEffect::Delete(self.id)]
    }

    fn on_delete_finished(&mut self, result: AsyncResult<()>) -> Vec<DetailEffect> {
        if self.phase != DetailPhase::Mutating(Mutation::Delete) {
            return Vec::new();
        }
        match result {
            AsyncResult::Loading => Vec::new(),
            AsyncResult::Success(()) => {
                self.loading = false;
                self.changed = true;
                let mut effects = vec![DetailEffect::Toast("Item deleted".to_string())];
                effects.extend(self.finish(ScreenResult::with_change(true)));
                effects
            }
            AsyncResult::Error(message) => {
                self.loading = false;
                self.content_visible = true;
                self.phase = DetailPhase::Loaded;
                vec![DetailEffect::Toast(format!("Failed to delete item: {message}"))]
            }
        }
    }

    fn on_editor_closed(&mut self, result: ScreenResult) -> Vec<DetailEffect> {
        if self.phase != DetailPhase::Mutating(Mutation::Edit) {
            return Vec::new();
        }
        if !result.should_refresh() {
            self.phase = DetailPhase::Loaded;
            return Vec::new();
        }
        // Start over as if the screen had been reopened, keeping only the
        // fact that the item changed.
        tracing::debug!(id = self.id, "item edited; reloading detail");
        *self = Self {
            changed: true,
            ..Self::new(self.id, self.tracking)
        };
        self.start()
    }

    fn finish(&mut self, result: ScreenResult) -> Vec<DetailEffect> {
        self.phase = DetailPhase::Exiting;
        self.confirming_delete = false;
        tracing::debug!(id = self.id, code = result.code, changed = result.changed, "detail finishing");
        vec![DetailEffect::Finish(result)]
    }
}

/// A `DetailScreen` connected to the repository.
///
/// Results of network effects arrive through the UI thread's looper; call
/// `process` after draining the looper to apply them.
pub struct DetailSession {
    screen: DetailScreen,
    repository: LostFoundRepository,
    lifecycle: Lifecycle,
    inbox: Receiver<DetailEvent>,
    outbox: Sender<DetailEvent>,
}

impl DetailSession {
    /// Open the screen for `id` and return the session with its first
    /// UI-facing effects (a `Finish` if the id is missing).
    pub fn open(
        repository: LostFoundRepository,
        id: i64,
        tracking: ChangeTracking,
    ) -> (Self, Vec<DetailEffect>) {
        let (outbox, inbox) = mpsc::channel();
        let mut session = Self {
            screen: DetailScreen::new(id, tracking),
            repository,
            lifecycle: Lifecycle::new(),
            inbox,
            outbox,
        };
        let effects = session.screen.start();
        let ui = session.run(effects);
        (session, ui)
    }

    pub fn screen(&self) -> &DetailScreen {
        &self.screen
    }

    /// Feed a user event.
    pub fn dispatch(&mut self, event: DetailEvent) -> Vec<DetailEffect> {
        let effects = self.screen.handle(event);
        self.run(effects)
    }

    /// Apply every operation result delivered so far.
    pub fn process(&mut self) -> Vec<DetailEffect> {
        let mut ui = Vec::new();
        while let Ok(event) = self.inbox.try_recv() {
            let effects = self.screen.handle(event);
            ui.extend(self.run(effects));
        }
        ui
    }

    fn run(&self, effects: Vec<DetailEffect>) -> Vec<DetailEffect> {
        let (network, ui): (Vec<_>, Vec<_>) = effects.into_iter().partition(DetailEffect::is_network);
        for effect in network {
            let outbox = self.outbox.clone();
            match effect {
                DetailEffect::Fetch(id) => {
                    self.repository
                        .get_lost_found(id)
                        .observe_once(&self.lifecycle, move |result| {
                            let _ = outbox.send(DetailEvent::Fetched(result.clone()));
                        });
                }
                DetailEffect::Update { id, input } => {
                    let requested = input.is_completed.unwrap_or_default();
                    self.repository
                        .update_lost_found(id, input)
                        .observe_once(&self.lifecycle, move |result| {
                            let _ = outbox.send(DetailEvent::ToggleFinished {
                                requested,
                                result: result.clone(),
                            });
                        });
                }
                DetailEffect::Delete(id) => {
                    self.repository
                        .delete_lost_found(id)
                        .observe_once(&self.lifecycle, move |result| {
                            let _ = outbox.send(DetailEvent::DeleteFinished(result.clone()));
                        });
                }
                _ => {}
            }
        }
        ui
    }
}

impl Drop for DetailSession {
    fn drop(&mut self) {
        self.lifecycle.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, completed: i32) -> LostFound {
        LostFound {
            id,
            user_id: Some(1),
            title: "Black wallet".to_string(),
            description: "Found near the canteen".to_string(),
            status: "found".to_string(),
            is_completed: completed,
            cover: Some("https://img.test/wallet.png".to_string()),
            created_at: "2024-05-01 10:00:00".to_string(),
            updated_at: None,
        }
    }

    fn loaded(completed: i32, tracking: ChangeTracking) -> DetailScreen {
        let mut screen = DetailScreen::new(5, tracking);
        assert_eq!(screen.start(), vec![DetailEffect::Fetch(5)]);
        assert!(screen.handle(DetailEvent::Fetched(AsyncResult::Loading)).is_empty());
        assert!(screen.is_loading());
        screen.handle(DetailEvent::Fetched(AsyncResult::Success(record(5, completed))));
        screen
    }

    fn toggle_ok(screen: &mut DetailScreen, checked: bool) {
        let effects = screen.handle(DetailEvent::ToggleCompleted(checked));
        assert!(matches!(effects[..], [DetailEffect::Update { .. }]));
        screen.handle(DetailEvent::ToggleFinished {
            requested: checked,
            result: AsyncResult::Success(()),
        });
    }

    #[test]
    fn missing_id_finishes_without_network() {
        for id in [0, -3] {
            let mut screen = DetailScreen::new(id, ChangeTracking::default());
            assert_eq!(
                screen.start(),
                vec![DetailEffect::Finish(ScreenResult::canceled())]
            );
            assert_eq!(screen.phase(), DetailPhase::Exiting);
            assert!(screen.handle(DetailEvent::BackPressed).is_empty());
        }
    }

    #[test]
    fn fetch_success_populates_view() {
        let screen = loaded(1, ChangeTracking::default());
        assert_eq!(screen.phase(), DetailPhase::Loaded);
        assert!(screen.is_content_visible());
        assert!(!screen.is_loading());
        let view = screen.view().unwrap();
        assert_eq!(view.item.title, "Black wallet");
        assert_eq!(view.item.description, "Found near the canteen");
        assert_eq!(view.item.status, "found");
        assert_eq!(view.item.cover.as_deref(), Some("https://img.test/wallet.png"));
        assert_eq!(view.created_at, "2024-05-01 10:00:00");
        assert_eq!(view.status.text, "Found");
        assert!(view.checked);
    }

    #[test]
    fn non_one_completion_is_unchecked() {
        for completed in [0, 2, -1] {
            let screen = loaded(completed, ChangeTracking::default());
            assert!(!screen.view().unwrap().checked);
        }
    }

    #[test]
    fn fetch_error_toasts_and_exits() {
        let mut screen = DetailScreen::new(5, ChangeTracking::default());
        screen.start();
        let effects = screen.handle(DetailEvent::Fetched(AsyncResult::Error("Lost-found not found".to_string())));
        assert_eq!(
            effects,
            vec![
                DetailEffect::Toast("Lost-found not found".to_string()),
                DetailEffect::Finish(ScreenResult::canceled()),
            ]
        );
        assert!(screen.view().is_none());
    }

    #[test]
    fn toggle_sends_current_fields_and_new_completion() {
        let mut screen = loaded(0, ChangeTracking::default());
        let effects = screen.handle(DetailEvent::ToggleCompleted(true));
        assert_eq!(
            effects,
            vec![DetailEffect::Update {
                id: 5,
                input: UpdateLostFound {
                    title: "Black wallet".to_string(),
                    description: "Found near the canteen".to_string(),
                    status: Some("found".to_string()),
                    is_completed: Some(true),
                },
            }]
        );
        assert_eq!(
            screen.phase(),
            DetailPhase::Mutating(Mutation::Toggle { requested: true })
        );
        assert!(screen.view().unwrap().checked);
    }

    #[test]
    fn snapshot_tracking_stays_changed_after_toggling_back() {
        let mut screen = loaded(0, ChangeTracking::EntrySnapshot);
        toggle_ok(&mut screen, true);
        assert!(screen.changed());
        toggle_ok(&mut screen, false);
        assert!(screen.changed());
        assert_eq!(
            screen.handle(DetailEvent::BackPressed),
            vec![DetailEffect::Finish(ScreenResult::with_change(true))]
        );
    }

    #[test]
    fn net_difference_tracking_clears_after_toggling_back() {
        let mut screen = loaded(0, ChangeTracking::NetDifference);
        toggle_ok(&mut screen, true);
        assert!(screen.changed());
        toggle_ok(&mut screen, false);
        assert!(!screen.changed());
        assert_eq!(
            screen.handle(DetailEvent::BackPressed),
            vec![DetailEffect::Finish(ScreenResult::with_change(false))]
        );
    }

    #[test]
    fn failed_toggle_reverts_checkbox_and_keeps_flag() {
        let mut screen = loaded(0, ChangeTracking::default());
        screen.handle(DetailEvent::ToggleCompleted(true));
        let effects = screen.handle(DetailEvent::ToggleFinished {
            requested: true,
            result: AsyncResult::Error("HTTP 500: boom".to_string()),
        });
        assert_eq!(
            effects,
            vec![DetailEffect::Toast("Failed to mark Black wallet: HTTP 500: boom".to_string())]
        );
        assert_eq!(screen.phase(), DetailPhase::Loaded);
        assert!(!screen.view().unwrap().checked);
        assert!(!screen.changed());
    }

    #[test]
    fn second_toggle_is_refused_while_first_is_in_flight() {
        let mut screen = loaded(0, ChangeTracking::default());
        screen.handle(DetailEvent::ToggleCompleted(true));
        let effects = screen.handle(DetailEvent::ToggleCompleted(false));
        assert!(matches!(effects[..], [DetailEffect::Toast(_)]));
        assert_eq!(
            screen.phase(),
            DetailPhase::Mutating(Mutation::Toggle { requested: true })
        );
    }

    #[test]
    fn toggle_to_confirmed_value_is_noop() {
        let mut screen = loaded(1, ChangeTracking::default());
        assert!(screen.handle(DetailEvent::ToggleCompleted(true)).is_empty());
        assert_eq!(screen.phase(), DetailPhase::Loaded);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut screen = loaded(0, ChangeTracking::default());
        assert!(screen.handle(DetailEvent::DeleteConfirmed).is_empty());
        assert_eq!(screen.handle(DetailEvent::DeleteClicked), vec![DetailEffect::ConfirmDelete]);
        assert!(screen.handle(DetailEvent::DeleteDismissed).is_empty());
        assert!(screen.handle(DetailEvent::DeleteConfirmed).is_empty());
        assert_eq!(screen.phase(), DetailPhase::Loaded);
    }

    #[test]
    fn successful_delete_exits_changed_regardless_of_toggles() {
        let mut screen = loaded(0, ChangeTracking::NetDifference);
        toggle_ok(&mut screen, true);
        toggle_ok(&mut screen, false);
        assert!(!screen.changed());

        screen.handle(DetailEvent::DeleteClicked);
        assert_eq!(screen.handle(DetailEvent::DeleteConfirmed), vec![DetailEffect::Delete(5)]);
        assert!(!screen.is_content_visible());
        assert!(screen.is_loading());

        let effects = screen.handle(DetailEvent::DeleteFinished(AsyncResult::Success(())));
        assert_eq!(
            effects,
            vec![
                DetailEffect::Toast("Item deleted".to_string()),
                DetailEffect::Finish(ScreenResult::with_change(true)),
            ]
        );
        assert_eq!(screen.phase(), DetailPhase::Exiting);
    }

    #[test]
    fn failed_delete_restores_loaded_state() {
        let mut screen = loaded(0, ChangeTracking::default());
        let before = screen.view().cloned();
        screen.handle(DetailEvent::DeleteClicked);
        screen.handle(DetailEvent::DeleteConfirmed);
        let effects = screen.handle(DetailEvent::DeleteFinished(AsyncResult::Error("not authorized".to_string())));
        assert_eq!(
            effects,
            vec![DetailEffect::Toast("Failed to delete item: not authorized".to_string())]
        );
        assert_eq!(screen.phase(), DetailPhase::Loaded);
        assert!(screen.is_content_visible());
        assert!(!screen.is_loading());
        assert_eq!(screen.view().cloned(), before);
        assert!(!screen.changed());
    }

    #[test]
    fn edit_with_change_reinitializes() {
        let mut screen = loaded(0, ChangeTracking::default());
        let effects = screen.handle(DetailEvent::EditClicked);
        assert!(matches!(&effects[..], [DetailEffect::OpenEditor(item)] if item.id == 5));
        assert_eq!(screen.phase(), DetailPhase::Mutating(Mutation::Edit));

        // User input is ignored while the editor is up.
        assert!(screen.handle(DetailEvent::ToggleCompleted(true)).is_empty());
        assert!(!screen.view().unwrap().checked);
        assert!(screen.handle(DetailEvent::DeleteClicked).is_empty());

        let effects = screen.handle(DetailEvent::EditorClosed(ScreenResult::with_change(true)));
        assert_eq!(effects, vec![DetailEffect::Fetch(5)]);
        assert_eq!(screen.phase(), DetailPhase::Initializing);
        assert!(screen.view().is_none());
        assert!(screen.changed());

        let mut renamed = record(5, 0);
        renamed.title = "Brown wallet".to_string();
        screen.handle(DetailEvent::Fetched(AsyncResult::Success(renamed)));
        assert_eq!(screen.view().unwrap().item.title, "Brown wallet");
        assert_eq!(
            screen.handle(DetailEvent::BackPressed),
            vec![DetailEffect::Finish(ScreenResult::with_change(true))]
        );
    }

    #[test]
    fn edit_without_change_returns_to_loaded() {
        let mut screen = loaded(0, ChangeTracking::default());
        screen.handle(DetailEvent::EditClicked);
        assert!(screen.handle(DetailEvent::EditorClosed(ScreenResult::canceled())).is_empty());
        assert_eq!(screen.phase(), DetailPhase::Loaded);
        assert!(!screen.changed());
    }

    #[test]
    fn back_without_changes_reports_unchanged() {
        let mut screen = loaded(0, ChangeTracking::default());
        assert_eq!(
            screen.handle(DetailEvent::BackPressed),
            vec![DetailEffect::Finish(ScreenResult::with_change(false))]
        );
        assert!(!ScreenResult::with_change(false).should_refresh());
    }

    #[test]
    fn results_after_exit_are_ignored() {
        let mut screen = loaded(0, ChangeTracking::default());
        screen.handle(DetailEvent::ToggleCompleted(true));
        screen.handle(DetailEvent::BackPressed);
        assert!(screen
            .handle(DetailEvent::ToggleFinished {
                requested: true,
                result: AsyncResult::Success(()),
            })
            .is_empty());
        assert!(screen.handle(DetailEvent::BackPressed).is_empty());
    }
}
