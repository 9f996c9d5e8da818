use cloudnote_core::App;

use crate::cli::Credentials;
use crate::commands::common::{format_note_lines, note_to_list_item, sign_in, NoteListItem};
use crate::error::CliError;

pub async fn run_list(app: &mut App, credentials: &Credentials, as_json: bool) -> Result<(), CliError> {
    sign_in(app, credentials).await?;
    let cards = app.home().map(|home| home.notes()).unwrap_or_default();

    if as_json {
        let json_items = cards
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_note_lines(cards) {
            println!("{line}");
        }
    }

    Ok(())
}
