// ── Controller abstraction ──
//
// The application shell. Runs the startup sequence (probe, restore,
// role load), owns the session and the current view, and routes
// commands. Spawns no background tasks: every operation runs to
// completion on the caller's task.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};
use url::Url;

use crate::command::{Command, CommandResult, CreateRoverRequest, RoverController, RoverDraft};
use crate::config::ClientConfig;
use crate::dispatch::RoleDispatcher;
use crate::error::CoreError;
use crate::gateway::Gateway;
use crate::model::{Role, User};
use crate::session::{Session, SessionManager, SignupRequest};
use crate::store::ViewStore;
use crate::view::RoleView;

// ── ConnectionState ──────────────────────────────────────────────

/// Backend reachability, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Checking,
    Connected,
    /// Probe failed. Terminal for this controller; nothing retries.
    Disconnected,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ClientConfig,
    gateway: Arc<dyn Gateway>,
    session: SessionManager,
    dispatcher: RoleDispatcher,
    rovers: RoverController,
    store: ViewStore,
    connection_state: watch::Sender<ConnectionState>,
    loading: watch::Sender<bool>,
    notice: watch::Sender<Option<String>>,
    mutation: Mutex<()>,
}

impl Controller {
    /// Create a controller. Does NOT contact the backend -- call
    /// [`start()`](Self::start).
    pub fn new(config: ClientConfig, gateway: Arc<dyn Gateway>) -> Self {
        let (connection_state, _) = watch::channel(ConnectionState::Checking);
        let (loading, _) = watch::channel(false);
        let (notice, _) = watch::channel(None);

        Self {
            inner: Arc::new(ControllerInner {
                session: SessionManager::new(Arc::clone(&gateway)),
                dispatcher: RoleDispatcher::new(Arc::clone(&gateway)),
                rovers: RoverController::new(Arc::clone(&gateway)),
                store: ViewStore::new(),
                config,
                gateway,
                connection_state,
                loading,
                notice,
                mutation: Mutex::new(()),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Probe the backend, restore any existing session, and load the
    /// dashboard for it.
    ///
    /// Never fails: an unreachable backend ends in
    /// [`Disconnected`](ConnectionState::Disconnected) without a
    /// restore attempt, a missing session ends on the landing screen.
    pub async fn start(&self) -> ConnectionState {
        self.inner
            .connection_state
            .send_replace(ConnectionState::Checking);
        self.inner.loading.send_replace(true);

        if let Err(e) = self.inner.gateway.probe().await {
            let err = CoreError::from(e);
            warn!(
                backend = %self.inner.config.backend_url,
                error = %err,
                "backend unreachable"
            );
            self.inner
                .connection_state
                .send_replace(ConnectionState::Disconnected);
            self.inner.loading.send_replace(false);
            return ConnectionState::Disconnected;
        }

        self.inner
            .connection_state
            .send_replace(ConnectionState::Connected);
        info!(backend = %self.inner.config.backend_url, "connected");

        if let Some(user) = self.inner.session.restore_session().await {
            self.load_view(&user).await;
        }
        self.inner.loading.send_replace(false);
        ConnectionState::Connected
    }

    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Arc<User>, CoreError> {
        self.ensure_connected()?;
        let previous = self.current_user();
        let result = self.inner.session.login(email, password).await;
        self.after_auth(previous, result).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<Arc<User>, CoreError> {
        self.ensure_connected()?;
        let previous = self.current_user();
        let result = self.inner.session.signup(request).await;
        self.after_auth(previous, result).await
    }

    /// Log out and drop all loaded data.
    pub async fn logout(&self) {
        self.inner.session.logout().await;
        self.inner.store.clear();
        self.inner.notice.send_replace(None);
    }

    /// Reload the current user's view.
    ///
    /// On failure the previous view stays in place and the error is
    /// returned for display.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let user = self.require_user()?;
        self.inner.loading.send_replace(true);
        let result = self.inner.dispatcher.load_for_role(&user).await;
        self.inner.loading.send_replace(false);

        match result {
            Ok(view) => {
                self.inner.store.replace(view);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "dashboard refresh failed, keeping previous data");
                Err(e)
            }
        }
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command.
    ///
    /// Commands are serialized: one submitted while another is in
    /// flight fails with [`CoreError::MutationInFlight`].
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let Ok(_guard) = self.inner.mutation.try_lock() else {
            debug!("rejecting command, another is in flight");
            return Err(CoreError::MutationInFlight);
        };

        let result = self.route_command(cmd).await;
        match &result {
            Ok(_) => {
                self.inner.notice.send_replace(None);
            }
            Err(e) if e.is_user_facing() => {
                self.inner.notice.send_replace(Some(e.to_string()));
            }
            Err(_) => {}
        }
        result
    }

    /// Change the logged-in driver's rover status.
    pub async fn set_rover_status(&self, status: &str) -> Result<CommandResult, CoreError> {
        self.execute(Command::UpdateRoverStatus {
            status: status.to_owned(),
        })
        .await
    }

    /// Submit the admin's current rover draft.
    pub async fn create_rover(&self) -> Result<CommandResult, CoreError> {
        self.require_user()?;
        let draft = self
            .inner
            .store
            .draft()
            .ok_or_else(|| self.wrong_role(Role::Admin))?;
        self.execute(Command::CreateRover(CreateRoverRequest::from(&draft)))
            .await
    }

    /// Edit the admin's rover draft. Returns `false` outside the admin
    /// view.
    pub fn edit_draft(&self, edit: impl FnOnce(&mut RoverDraft)) -> bool {
        self.inner.store.edit_draft(edit)
    }

    async fn route_command(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let user = self.require_user()?;

        match cmd {
            Command::UpdateRoverStatus { status } => {
                if user.role != Role::Driver {
                    return Err(self.wrong_role(Role::Driver));
                }
                let rover = self
                    .inner
                    .store
                    .snapshot()
                    .and_then(|view| view.as_driver().and_then(|d| d.rover.clone()))
                    .ok_or(CoreError::NoRoverAssigned)?;

                let updated = self.inner.rovers.update_status(&rover, &status).await?;
                self.inner.store.patch_rover(updated.clone());
                Ok(CommandResult::RoverUpdated(updated))
            }

            Command::CreateRover(request) => {
                if user.role != Role::Admin {
                    return Err(self.wrong_role(Role::Admin));
                }
                let created = self.inner.rovers.create_rover(&request).await?;
                self.inner.store.reset_draft();
                Ok(CommandResult::RoverCreated(created))
            }
        }
    }

    // ── State observation ────────────────────────────────────────

    pub fn connection_state(&self) -> ConnectionState {
        *self.inner.connection_state.borrow()
    }

    pub fn subscribe_connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        *self.inner.loading.borrow()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.inner.loading.subscribe()
    }

    pub fn session(&self) -> Session {
        self.inner.session.current()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<Session> {
        self.inner.session.subscribe()
    }

    pub fn current_user(&self) -> Option<Arc<User>> {
        self.inner.session.user()
    }

    pub fn view(&self) -> Option<Arc<RoleView>> {
        self.inner.store.snapshot()
    }

    pub fn subscribe_view(&self) -> watch::Receiver<Option<Arc<RoleView>>> {
        self.inner.store.subscribe()
    }

    pub fn store(&self) -> &ViewStore {
        &self.inner.store
    }

    /// Last error shown next to a form or action, if any.
    pub fn notice(&self) -> Option<String> {
        self.inner.notice.borrow().clone()
    }

    pub fn admin_console_url(&self) -> Result<Url, CoreError> {
        self.inner.config.admin_console_url()
    }

    // ── Helpers ──────────────────────────────────────────────────

    /// Publish the view for a freshly authenticated user. A view loaded
    /// for someone else is dropped first so it can never outlive a
    /// failed load.
    async fn after_auth(
        &self,
        previous: Option<Arc<User>>,
        result: Result<Arc<User>, CoreError>,
    ) -> Result<Arc<User>, CoreError> {
        match result {
            Ok(user) => {
                if previous.is_none_or(|p| p.id != user.id) {
                    self.inner.store.clear();
                }
                self.inner.notice.send_replace(None);
                self.inner.loading.send_replace(true);
                self.load_view(&user).await;
                self.inner.loading.send_replace(false);
                Ok(user)
            }
            Err(e) => {
                if e.is_user_facing() {
                    self.inner.notice.send_replace(Some(e.to_string()));
                }
                Err(e)
            }
        }
    }

    /// Load the role view, keeping the previous one on failure.
    async fn load_view(&self, user: &User) {
        match self.inner.dispatcher.load_for_role(user).await {
            Ok(view) => self.inner.store.replace(view),
            Err(e) => warn!(error = %e, "dashboard load failed, keeping previous data"),
        }
    }

    fn ensure_connected(&self) -> Result<(), CoreError> {
        match self.connection_state() {
            ConnectionState::Connected => Ok(()),
            _ => Err(CoreError::Connectivity {
                url: self.inner.config.backend_url.to_string(),
                reason: "backend is not connected".into(),
            }),
        }
    }

    fn require_user(&self) -> Result<Arc<User>, CoreError> {
        self.current_user().ok_or(CoreError::NotAuthenticated)
    }

    fn wrong_role(&self, expected: Role) -> CoreError {
        CoreError::WrongRole {
            expected: expected.to_string(),
            actual: self
                .current_user()
                .map_or_else(|| "none".to_owned(), |u| u.role.to_string()),
        }
    }
}
