use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use cloudnote_core::models::EditorType;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "cloudnote",
    about = "Operate on a cloudnote database as a given user.",
    version,
    arg_required_else_help = true,
    after_help = r#"Examples:
  cloudnote users add alice@example.com
  cloudnote --as alice@example.com notes create --title "Trip Plan" --folder Travel
  cloudnote --as alice@example.com notes list --sort -title --limit 10
  cloudnote --as alice@example.com folders rename Travel Trips
  cloudnote --as alice@example.com share set <ID> --email bob@example.com
"#
)]
pub struct Args {
    /// Config file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = "cloudnote.toml")]
    pub config: PathBuf,

    /// Database file; overrides `database_path` from the config.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Email of the registered user to act as.
    #[arg(long = "as", global = true, value_name = "EMAIL")]
    pub acting_as: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Users {
        #[command(subcommand)]
        cmd: UsersCmd,
    },
    Notes {
        #[command(subcommand)]
        cmd: NotesCmd,
    },
    /// List the distinct tags across your notes.
    Tags,
    Folders {
        #[command(subcommand)]
        cmd: FoldersCmd,
    },
    Share {
        #[command(subcommand)]
        cmd: ShareCmd,
    },
}

#[derive(Debug, Subcommand)]
pub enum UsersCmd {
    /// Register a user so notes can be shared with them.
    Add { email: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Editor {
    Rich,
    Markdown,
    Simple,
}

impl From<Editor> for EditorType {
    fn from(value: Editor) -> Self {
        match value {
            Editor::Rich => EditorType::Rich,
            Editor::Markdown => EditorType::Markdown,
            Editor::Simple => EditorType::Simple,
        }
    }
}

#[derive(Debug, ClapArgs)]
pub struct NoteFields {
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub folder: Option<String>,
    /// Repeat for several tags.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Hex code (#abc, #a1b2c3) or palette name.
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long, value_enum)]
    pub editor: Option<Editor>,
    #[arg(long)]
    pub pinned: Option<bool>,
    #[arg(long)]
    pub favorite: Option<bool>,
    #[arg(long)]
    pub public: Option<bool>,
}

#[derive(Debug, Subcommand)]
pub enum NotesCmd {
    Create {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        fields: NoteFields,
    },
    Show {
        id: String,
    },
    List {
        #[arg(long)]
        folder: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        /// Case-insensitive text matched against title, content and tags.
        #[arg(long)]
        query: Option<String>,
        #[arg(long, value_enum)]
        editor: Option<Editor>,
        #[arg(long)]
        favorite: Option<bool>,
        #[arg(long)]
        pinned: Option<bool>,
        #[arg(long)]
        public: Option<bool>,
        /// Only notes with (true) or without (false) collaborators.
        #[arg(long)]
        shared: Option<bool>,
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        skip: Option<i64>,
        /// updatedAt, createdAt, title or lastAccessed; prefix with - to reverse.
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: NoteFields,
    },
    Delete {
        id: String,
    },
    /// Flip the pinned flag.
    Pin {
        id: String,
    },
    /// Flip the favorite flag.
    Favorite {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum FoldersCmd {
    List,
    /// Note count per folder.
    Counts,
    /// Create a folder with a starter note in it.
    Create { name: String },
    Rename { old: String, new: String },
    /// Remove a folder; its notes move to Default unless --delete-notes.
    Delete {
        name: String,
        #[arg(long)]
        delete_notes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ShareCmd {
    /// Change the public flag and/or replace the collaborators.
    Set {
        id: String,
        #[arg(long)]
        public: Option<bool>,
        /// Repeat for several collaborators.
        #[arg(long = "email")]
        emails: Vec<String>,
    },
    /// Remove one collaborator.
    Revoke { id: String, email: String },
    /// Notes others have shared with you.
    Inbox {
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        skip: Option<i64>,
    },
}
