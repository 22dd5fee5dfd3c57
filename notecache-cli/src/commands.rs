use std::error::Error;
use std::io::{self, Write};
use futures::StreamExt;
use notecache::auth::AuthProvider;
use notecache::data::{NoteView, ProfileDraft, UserProfile};
use notecache::repository::RepositoryError;
use notecache::user_id::UserId;
use time::format_description::well_known::Rfc3339;
use crate::app_setup::App;
use crate::cli::{Command, ProfileCommand};

pub async fn execute(app: &App, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List => {
            let mut notes = app.notes.current_notes();
            if let Some(snapshot) = notes.next().await {
                print_notes(&snapshot)?;
            }
        },
        Command::Add { title, body } => {
            let saved = app.notes.save(NoteView::draft(title, body)).await?;
            print_notes(&[saved])?;
        },
        Command::Edit { id, title, body } => {
            require_user(app)?;
            let Some(mut note) = app.notes.note(id).await else {
                return Err(format!("no note with id {id}").into())
            };
            if let Some(title) = title {
                note.title = title;
            }
            if let Some(body) = body {
                note.body = body;
            }
            let saved = app.notes.save(note).await?;
            print_notes(&[saved])?;
        },
        Command::Remove { id } => {
            require_user(app)?;
            if app.notes.note(id).await.is_none() {
                return Err(format!("no note with id {id}").into())
            }
            app.notes.remove(id).await?;
        },
        Command::Watch { count } => {
            let mut notes = app.notes.current_notes();
            let mut printed = 0;
            while count.is_none_or(|count| printed < count)
                && let Some(snapshot) = notes.next().await
            {
                if printed > 0 {
                    println!();
                }
                print_notes(&snapshot)?;
                printed += 1;
            }
            notes.cancel();
        },
        Command::Profile(ProfileCommand::Show) => {
            let user_id = require_user(app)?;
            if let Some(profile) = current_profile(app, &user_id).await {
                print_profile(&profile)?;
            }
        },
        Command::Profile(ProfileCommand::Set { name, username, date_of_birth, gender }) => {
            let user_id = require_user(app)?;
            let mut draft = current_profile(app, &user_id)
                .await
                .map(|profile| ProfileDraft::from(&profile))
                .unwrap_or_default();
            let fields = [
                (&mut draft.name, name),
                (&mut draft.username, username),
                (&mut draft.date_of_birth, date_of_birth),
                (&mut draft.gender, gender),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    *field = value;
                }
            }
            let saved = app.profiles.save(draft).await?;
            print_profile(&saved)?;
        },
    }
    Ok(())
}

fn require_user(app: &App) -> Result<UserId, RepositoryError> {
    app.auth.current_user_id().ok_or(RepositoryError::Unauthenticated)
}

async fn current_profile(app: &App, user_id: &UserId) -> Option<UserProfile> {
    let mut profile = app.profiles.profile_for(user_id);
    profile.next().await?.into_iter().next().flatten()
}

fn print_notes(notes: &[NoteView]) -> Result<(), Box<dyn Error>> {
    let mut out = io::stdout().lock();
    for note in notes {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            note.id,
            note.updated_at.format(&Rfc3339)?,
            escape_field(&note.title),
            escape_field(&note.body),
        )?;
    }
    out.flush()?;
    Ok(())
}

fn print_profile(profile: &UserProfile) -> Result<(), Box<dyn Error>> {
    let mut out = io::stdout().lock();
    writeln!(out, "user\t{}", profile.user_id)?;
    let fields = [
        ("name", &profile.name),
        ("username", &profile.username),
        ("date_of_birth", &profile.date_of_birth),
        ("gender", &profile.gender),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            writeln!(out, "{key}\t{}", escape_field(value))?;
        }
    }
    Ok(())
}

// keeps one note per line
fn escape_field(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
