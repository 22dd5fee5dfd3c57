use std::path::PathBuf;
use clap::{Parser, Subcommand};
use notecache::user_id::UserId;
use uuid::Uuid;

#[derive(Clone, Debug, Eq, Parser, PartialEq)]
#[command(version, author, about)]
pub struct CliConfig {
    /// Configuration file, defaults and the environment are used without one
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Signs in as this user for the duration of the command
    #[arg(long, env = "NOTECACHE_USER")]
    pub user: Option<UserId>,

    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Debug, Eq, PartialEq, Subcommand)]
pub enum Command {
    /// Prints the signed in user's notes, newest first
    List,

    /// Saves a new note
    Add {
        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        body: String,
    },

    /// Changes an existing note
    Edit {
        id: Uuid,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        body: Option<String>,
    },

    Remove {
        id: Uuid,
    },

    /// Prints the note list again after every change
    Watch {
        /// Stop after this many lists
        #[arg(long)]
        count: Option<usize>,
    },

    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Clone, Debug, Eq, PartialEq, Subcommand)]
pub enum ProfileCommand {
    Show,

    /// Changes the given fields, an empty value clears the field
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        date_of_birth: Option<String>,

        #[arg(long)]
        gender: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use super::*;

    #[test]
    fn cli_is_consistent() {
        CliConfig::command().debug_assert();
    }

    #[test]
    fn parses_edit() {
        let config = CliConfig::try_parse_from([
            "notecache",
            "--user=u1",
            "edit",
            "00000000-0000-0000-0000-000000000001",
            "--body=new",
        ]).unwrap();
        assert_eq!(config.user.as_deref(), Some("u1"));
        assert_eq!(
            config.command,
            Command::Edit {
                id: Uuid::from_u128(1),
                title: None,
                body: Some("new".into()),
            },
        );
    }

    #[test]
    fn rejects_invalid_user() {
        assert!(CliConfig::try_parse_from(["notecache", "--user=a b", "list"]).is_err());
    }
}
