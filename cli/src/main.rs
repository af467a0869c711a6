mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cloudnote_core::models::{self, NewNote, Note, NoteUpdate, Principal, ShareRequest, User};
use cloudnote_core::query::{ListFilter, PageRequest, Sort};
use cloudnote_core::visibility::Visibility;
use cloudnote_core::{CoreConfig, Services};
use serde::Serialize;

use cli::{Args, Command, FoldersCmd, NoteFields, NotesCmd, ShareCmd, UsersCmd};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run(Args::parse()).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// A note as `notes show` prints it, with its computed visibility.
#[derive(Serialize)]
struct NoteView {
    #[serde(flatten)]
    note: Note,
    visibility: Visibility,
}

impl From<Note> for NoteView {
    fn from(note: Note) -> Self {
        let visibility = Visibility::of(&note);
        Self { note, visibility }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn acting_principal(services: &Services, email: Option<&str>) -> Result<Principal> {
    let email = email.ok_or_else(|| anyhow!("this command needs --as EMAIL"))?;
    let user = services
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| anyhow!("no user registered with email {email}"))?;
    Ok(user.principal())
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = CoreConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(db) = args.db {
        config.database_path = db;
    }
    tracing::debug!(db = %config.database_path.display(), "using database");
    let services = Services::sqlite(&config);

    let acting_as = args.acting_as.as_deref();

    match args.cmd {
        Command::Users { cmd: UsersCmd::Add { email } } => add_user(&services, &email).await,
        Command::Notes { cmd } => {
            let principal = acting_principal(&services, acting_as).await?;
            run_notes(&services, &principal, cmd).await
        }
        Command::Tags => {
            let principal = acting_principal(&services, acting_as).await?;
            print_json(&services.notes.search_tags(&principal).await?)
        }
        Command::Folders { cmd } => {
            let principal = acting_principal(&services, acting_as).await?;
            run_folders(&services, &principal, cmd).await
        }
        Command::Share { cmd } => {
            let principal = acting_principal(&services, acting_as).await?;
            run_share(&services, &principal, cmd).await
        }
    }
}

async fn add_user(services: &Services, email: &str) -> Result<()> {
    if !models::email::is_valid(email) {
        return Err(anyhow!("'{email}' is not a valid email address"));
    }
    let user = User::new(email);
    services.users.create(&user).await.context("registering user")?;
    print_json(&user)
}

async fn run_notes(services: &Services, principal: &Principal, cmd: NotesCmd) -> Result<()> {
    let notes = &services.notes;
    match cmd {
        NotesCmd::Create { title, fields } => {
            let NoteFields { content, folder, tags, color, editor, pinned, favorite, public } =
                fields;
            let payload = NewNote {
                title,
                content,
                tags: non_empty(tags),
                folder,
                color,
                is_pinned: pinned,
                is_favorite: favorite,
                is_public: public,
                editor_type: editor.map(Into::into),
                shared_with: None,
                owner_id: None,
            };
            print_json(&notes.create(principal, payload).await?)
        }
        NotesCmd::Show { id } => {
            let note = notes.get_by_id(principal, &id).await?;
            print_json(&NoteView::from(note))
        }
        NotesCmd::List {
            folder,
            tag,
            query,
            editor,
            favorite,
            pinned,
            public,
            shared,
            limit,
            skip,
            sort,
        } => {
            let filter = ListFilter {
                folder,
                tag,
                editor_type: editor.map(Into::into),
                is_favorite: favorite,
                is_pinned: pinned,
                is_public: public,
                has_shares: shared,
                query,
            };
            let page = notes
                .list(principal, &filter, PageRequest::new(limit, skip), Sort::from_param(sort.as_deref()))
                .await?;
            print_json(&page)
        }
        NotesCmd::Update { id, title, fields } => {
            let NoteFields { content, folder, tags, color, editor, pinned, favorite, public } =
                fields;
            let update = NoteUpdate {
                title,
                content,
                tags: non_empty(tags),
                folder,
                color,
                is_pinned: pinned,
                is_favorite: favorite,
                is_public: public,
                editor_type: editor.map(Into::into),
                shared_with: None,
                owner_id: None,
            };
            print_json(&notes.update(principal, &id, update).await?)
        }
        NotesCmd::Delete { id } => {
            notes.delete(principal, &id).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        NotesCmd::Pin { id } => print_json(&notes.toggle_pin(principal, &id).await?),
        NotesCmd::Favorite { id } => print_json(&notes.toggle_favorite(principal, &id).await?),
    }
}

async fn run_folders(services: &Services, principal: &Principal, cmd: FoldersCmd) -> Result<()> {
    let folders = &services.folders;
    match cmd {
        FoldersCmd::List => print_json(&folders.list_folders(principal).await?),
        FoldersCmd::Counts => print_json(&folders.folder_counts(principal).await?),
        FoldersCmd::Create { name } => print_json(&folders.create_folder(principal, &name).await?),
        FoldersCmd::Rename { old, new } => {
            let modified = folders.rename_folder(principal, &old, &new).await?;
            print_json(&serde_json::json!({ "modified": modified }))
        }
        FoldersCmd::Delete { name, delete_notes } => {
            print_json(&folders.delete_folder(principal, &name, delete_notes).await?)
        }
    }
}

async fn run_share(services: &Services, principal: &Principal, cmd: ShareCmd) -> Result<()> {
    let sharing = &services.sharing;
    match cmd {
        ShareCmd::Set { id, public, emails } => {
            let request = ShareRequest {
                is_public: public,
                emails: non_empty(emails),
            };
            print_json(&sharing.set_sharing(principal, &id, request).await?)
        }
        ShareCmd::Revoke { id, email } => print_json(&sharing.revoke(principal, &id, &email).await?),
        ShareCmd::Inbox { limit, skip } => {
            print_json(&sharing.shared_with_me(principal, PageRequest::new(limit, skip)).await?)
        }
    }
}
