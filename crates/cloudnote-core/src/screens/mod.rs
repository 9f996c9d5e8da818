//! Screen models.
//!
//! Each screen reads its inputs from the [`Session`], talks to the store,
//! records a status and answers with a [`Transition`]. Store calls are
//! awaited before any navigation happens.

mod add_note;
mod edit_note;
mod home;
mod login;
mod signup;

pub use add_note::AddNoteScreen;
pub use edit_note::EditNoteScreen;
pub use home::HomeScreen;
pub use login::LoginScreen;
pub use signup::SignupScreen;

use crate::navigation::{Route, ScreenKind};
use crate::session::Session;

/// What the app should do after a screen handled an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Navigate(Route),
}

/// The active screen and its local state.
#[derive(Debug, Clone)]
pub enum Screen {
    Login(LoginScreen),
    Signup(SignupScreen),
    Home(HomeScreen),
    AddNote(AddNoteScreen),
    EditNote(EditNoteScreen),
}

impl Screen {
    /// Build the screen for `route`, seeding session inputs it owns.
    pub fn enter(route: &Route, session: &mut Session) -> Self {
        match route {
            Route::Login => Self::Login(LoginScreen),
            Route::Signup => Self::Signup(SignupScreen),
            Route::Home { username } => Self::Home(HomeScreen::new(username.clone())),
            Route::AddNote { username } => {
                Self::AddNote(AddNoteScreen::enter(username.clone(), session))
            }
            Route::EditNote { username, note } => {
                Self::EditNote(EditNoteScreen::enter(username.clone(), note.clone(), session))
            }
        }
    }

    pub const fn kind(&self) -> ScreenKind {
        match self {
            Self::Login(_) => ScreenKind::Login,
            Self::Signup(_) => ScreenKind::Signup,
            Self::Home(_) => ScreenKind::Home,
            Self::AddNote(_) => ScreenKind::AddNote,
            Self::EditNote(_) => ScreenKind::EditNote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Note, NoteFields, NoteId, Username};
    use crate::session::NoteForm;

    #[test]
    fn entering_edit_prefills_raw_note_values() {
        let mut session = Session::new();
        let route = Route::EditNote {
            username: Username::parse("alice").unwrap(),
            note: Note::new(NoteId::new("n1"), NoteFields::new("", "  body")),
        };

        let screen = Screen::enter(&route, &mut session);

        assert_eq!(screen.kind(), ScreenKind::EditNote);
        assert_eq!(
            session.note,
            NoteForm {
                title: String::new(),
                content: "  body".to_string(),
            }
        );
    }

    #[test]
    fn entering_add_clears_note_form() {
        let mut session = Session::new();
        session.note.title = "leftover".to_string();
        let route = Route::AddNote {
            username: Username::parse("alice").unwrap(),
        };

        Screen::enter(&route, &mut session);

        assert_eq!(session.note, NoteForm::default());
    }
}
