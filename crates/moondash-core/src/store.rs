// ── View store ──
//
// Holds the current role view. Loads replace it wholesale; mutations
// patch the one record they changed. Readers subscribe through `watch`
// and always see the latest committed view.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::command::RoverDraft;
use crate::model::Rover;
use crate::view::RoleView;

pub struct ViewStore {
    view: watch::Sender<Option<Arc<RoleView>>>,
    last_loaded: watch::Sender<Option<DateTime<Utc>>>,
}

impl ViewStore {
    pub fn new() -> Self {
        let (view, _) = watch::channel(None);
        let (last_loaded, _) = watch::channel(None);
        Self { view, last_loaded }
    }

    pub fn snapshot(&self) -> Option<Arc<RoleView>> {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<RoleView>>> {
        self.view.subscribe()
    }

    pub fn last_loaded(&self) -> Option<DateTime<Utc>> {
        *self.last_loaded.borrow()
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub fn replace(&self, view: RoleView) {
        self.view.send_replace(Some(Arc::new(view)));
        self.last_loaded.send_replace(Some(Utc::now()));
    }

    pub fn clear(&self) {
        self.view.send_replace(None);
        self.last_loaded.send_replace(None);
    }

    /// Overwrite the driver's rover with the server's copy. Returns
    /// `false` (and changes nothing) when no driver view is loaded.
    pub fn patch_rover(&self, rover: Rover) -> bool {
        self.view.send_if_modified(|slot| {
            let Some(view) = slot.as_mut() else {
                return false;
            };
            match Arc::make_mut(view) {
                RoleView::Driver(driver) => {
                    driver.rover = Some(rover);
                    true
                }
                _ => false,
            }
        })
    }

    /// Edit the admin's rover draft in place.
    pub fn edit_draft(&self, edit: impl FnOnce(&mut RoverDraft)) -> bool {
        self.view.send_if_modified(|slot| {
            let Some(view) = slot.as_mut() else {
                return false;
            };
            if !matches!(view.as_ref(), RoleView::Admin(_)) {
                return false;
            }
            if let RoleView::Admin(admin) = Arc::make_mut(view) {
                edit(&mut admin.draft);
            }
            true
        })
    }

    pub fn draft(&self) -> Option<RoverDraft> {
        self.view
            .borrow()
            .as_deref()
            .and_then(RoleView::as_admin)
            .map(|admin| admin.draft.clone())
    }

    pub fn reset_draft(&self) -> bool {
        self.edit_draft(|draft| *draft = RoverDraft::default())
    }
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}
