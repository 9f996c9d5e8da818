//! App controller.
//!
//! [`App`] owns the session, the active screen and the store handle. Front
//! ends feed it [`Action`]s and render whatever it exposes afterwards.
//! Store failures never escape `dispatch`: they are logged and shown as a
//! failure status while the screen and its inputs stay put.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::navigation::{Route, ScreenKind};
use crate::screens::{EditNoteScreen, HomeScreen, Screen, Transition};
use crate::session::{NoteForm, Session, Status};
use crate::store::SharedStore;
use crate::{Error, Result};

/// Status shown when a store call fails or times out.
pub const STORE_UNAVAILABLE: &str = "Could not reach the note store.";

/// User input the controller understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetLoginUsername(String),
    SetLoginPassword(String),
    SubmitLogin,
    OpenSignup,
    SetNewUsername(String),
    SetNewPassword(String),
    SetConfirmPassword(String),
    SubmitSignup,
    OpenLogin,
    Refresh,
    /// Open the home card at this zero-based position
    OpenNote(usize),
    /// Open the note with this id or unique id prefix
    OpenNoteById(String),
    NewNote,
    SetNoteTitle(String),
    SetNoteContent(String),
    Save,
    Delete,
    Discard,
    Back,
}

impl Action {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetLoginUsername(_) => "set login username",
            Self::SetLoginPassword(_) => "set login password",
            Self::SubmitLogin => "login",
            Self::OpenSignup => "open signup",
            Self::SetNewUsername(_) => "set new username",
            Self::SetNewPassword(_) => "set new password",
            Self::SetConfirmPassword(_) => "set confirm password",
            Self::SubmitSignup => "signup",
            Self::OpenLogin => "open login",
            Self::Refresh => "refresh",
            Self::OpenNote(_) | Self::OpenNoteById(_) => "open note",
            Self::NewNote => "new note",
            Self::SetNoteTitle(_) => "set title",
            Self::SetNoteContent(_) => "set content",
            Self::Save => "save",
            Self::Delete => "delete",
            Self::Discard => "discard",
            Self::Back => "back",
        }
    }

    /// Typing into a field leaves the last status alone
    const fn is_input(&self) -> bool {
        matches!(
            self,
            Self::SetLoginUsername(_)
                | Self::SetLoginPassword(_)
                | Self::SetNewUsername(_)
                | Self::SetNewPassword(_)
                | Self::SetConfirmPassword(_)
                | Self::SetNoteTitle(_)
                | Self::SetNoteContent(_)
        )
    }
}

pub struct App {
    store: SharedStore,
    session: Session,
    route: Route,
    screen: Screen,
    request_timeout: Duration,
    running: bool,
}

impl App {
    /// Create a controller sitting on the Login screen.
    pub fn new(store: SharedStore) -> Self {
        let mut session = Session::new();
        let route = Route::Login;
        let screen = Screen::enter(&route, &mut session);
        Self {
            store,
            session,
            route,
            screen,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            running: true,
        }
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Jump straight to `route`, as when a screen is opened with parameters.
    ///
    /// A route scoped to a user makes that user the session user.
    pub async fn start_at(&mut self, route: Route) {
        self.session.username = route.username().cloned();
        self.navigate(route).await;
    }

    pub const fn route(&self) -> &Route {
        &self.route
    }

    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn status(&self) -> Option<&Status> {
        self.session.status.as_ref()
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// `false` once Back was used on the Login screen
    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn home(&self) -> Option<&HomeScreen> {
        match &self.screen {
            Screen::Home(home) => Some(home),
            _ => None,
        }
    }

    pub const fn edit_note(&self) -> Option<&EditNoteScreen> {
        match &self.screen {
            Screen::EditNote(edit) => Some(edit),
            _ => None,
        }
    }

    /// Handle one action.
    ///
    /// Errors are returned only for actions the current screen does not
    /// offer or that point at nothing (such as a note position past the end
    /// of the list). Store trouble is reported through the status.
    pub async fn dispatch(&mut self, action: Action) -> Result<()> {
        if !self.running {
            return Err(Error::InvalidInput("the app has exited".to_string()));
        }
        if !action.is_input() {
            self.session.clear_status();
        }
        if action == Action::Back {
            return self.back().await;
        }

        let timeout = self.request_timeout;
        let store = Arc::clone(&self.store);
        let session = &mut self.session;

        let result = match (&mut self.screen, action) {
            (Screen::Login(_), Action::SetLoginUsername(value)) => {
                session.login.username = value;
                Ok(Transition::Stay)
            }
            (Screen::Login(_), Action::SetLoginPassword(value)) => {
                session.login.password = value;
                Ok(Transition::Stay)
            }
            (Screen::Login(screen), Action::SubmitLogin) => {
                bounded(timeout, screen.submit(store.as_ref(), session)).await
            }
            (Screen::Login(screen), Action::OpenSignup) => Ok(screen.open_signup()),

            (Screen::Signup(_), Action::SetNewUsername(value)) => {
                session.signup.new_username = value;
                Ok(Transition::Stay)
            }
            (Screen::Signup(_), Action::SetNewPassword(value)) => {
                session.signup.new_password = value;
                Ok(Transition::Stay)
            }
            (Screen::Signup(_), Action::SetConfirmPassword(value)) => {
                session.signup.confirm_password = value;
                Ok(Transition::Stay)
            }
            (Screen::Signup(screen), Action::SubmitSignup) => {
                bounded(timeout, screen.submit(store.as_ref(), session)).await
            }
            (Screen::Signup(screen), Action::OpenLogin) => Ok(screen.open_login()),

            (Screen::Home(screen), Action::Refresh) => bounded(timeout, screen.load(store.as_ref()))
                .await
                .map(|_| Transition::Stay),
            (Screen::Home(screen), Action::OpenNote(index)) => Ok(screen.open(index)?),
            (Screen::Home(screen), Action::OpenNoteById(query)) => Ok(screen.open_by_id(&query)?),
            (Screen::Home(screen), Action::NewNote) => Ok(screen.add_note()),

            (Screen::AddNote(_) | Screen::EditNote(_), Action::SetNoteTitle(value)) => {
                session.note.title = value;
                Ok(Transition::Stay)
            }
            (Screen::AddNote(_) | Screen::EditNote(_), Action::SetNoteContent(value)) => {
                session.note.content = value;
                Ok(Transition::Stay)
            }
            (Screen::AddNote(screen), Action::Save) => {
                bounded(timeout, screen.save(store.as_ref(), session)).await
            }
            (Screen::AddNote(screen), Action::Discard) => Ok(screen.discard(session)),
            (Screen::EditNote(screen), Action::Save) => {
                bounded(timeout, screen.save(store.as_ref(), session)).await
            }
            (Screen::EditNote(screen), Action::Delete) => {
                bounded(timeout, screen.delete(store.as_ref(), session)).await
            }
            (Screen::EditNote(screen), Action::Discard) => Ok(screen.discard(session)),

            (screen, action) => {
                return Err(Error::InvalidInput(format!(
                    "'{}' is not available on the {} screen",
                    action.name(),
                    screen.kind()
                )))
            }
        };

        match result {
            Ok(Transition::Stay) => {}
            Ok(Transition::Navigate(route)) => self.navigate(route).await,
            Err(error) => self.report_store_failure(&error),
        }
        Ok(())
    }

    async fn back(&mut self) -> Result<()> {
        let Some(route) = self.route.back() else {
            tracing::debug!("Back from login, leaving the app");
            self.running = false;
            return Ok(());
        };

        match self.route.kind() {
            ScreenKind::Home => self.session.sign_out(),
            ScreenKind::AddNote | ScreenKind::EditNote => self.session.note = NoteForm::default(),
            ScreenKind::Login | ScreenKind::Signup => {}
        }
        self.navigate(route).await;
        Ok(())
    }

    async fn navigate(&mut self, route: Route) {
        tracing::debug!("Navigating {} -> {}", self.route.kind(), route.kind());
        self.screen = Screen::enter(&route, &mut self.session);
        self.route = route;

        let store = Arc::clone(&self.store);
        let loaded = match &mut self.screen {
            Screen::Home(home) => bounded(self.request_timeout, home.load(store.as_ref())).await,
            _ => return,
        };
        if let Err(error) = loaded {
            self.report_store_failure(&error);
        }
    }

    fn report_store_failure(&mut self, error: &Error) {
        tracing::warn!(
            "Store call on the {} screen failed ({} backend): {error}",
            self.route.kind(),
            self.store.backend_name()
        );
        self.session.set_status(Status::failure(STORE_UNAVAILABLE));
    }
}

async fn bounded<T>(timeout: Duration, operation: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(timeout, operation)
        .await
        .map_err(|_| Error::Timeout(timeout))?
}
