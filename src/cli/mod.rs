//! Command-line interface wiring for news-digest.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::{config::Settings, data::store::UserStore, nlp::Pipeline};

pub mod history;
pub mod search;
pub mod shell;
pub mod summary;
pub mod topics;

/// Default number of history entries shown.
pub const HISTORY_LIMIT: usize = 10;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Search, embed and summarise the news", long_about = None)]
pub struct Cli {
    /// User data file (defaults to USER_DATA_PATH or ./user_data.json).
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command; no sub-command opens the shell.
    pub async fn dispatch(self, mut settings: Settings) -> Result<()> {
        if let Some(path) = self.data_file {
            settings.user_data_path = path;
        }
        let mut app = App::new(settings);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.command.map(Commands::into_action) {
            None | Some(None) => shell::run(&mut app, io::stdin().lock(), &mut out).await,
            Some(Some(action)) => {
                let result = execute(&mut app, action, &mut out).await;
                out.flush()?;
                result
            }
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch, embed and summarise news on a topic.
    Search(TopicArgs),
    /// Save a topic of interest.
    Save(TopicArgs),
    /// List saved topics.
    List,
    /// Remove a saved topic.
    Remove(TopicArgs),
    /// Show recent searches, newest first.
    History(HistoryArgs),
    /// Show or set the summary type (brief or detailed).
    Summary(SummaryArgs),
    /// Clear search history.
    Clear,
    /// Interactive prompt (the default).
    Shell,
}

impl Commands {
    fn into_action(self) -> Option<Action> {
        Some(match self {
            Self::Search(args) => Action::Search(args.topic()),
            Self::Save(args) => Action::Save(args.topic()),
            Self::List => Action::List,
            Self::Remove(args) => Action::Remove(args.topic()),
            Self::History(args) => Action::History { limit: args.limit },
            Self::Summary(args) => Action::Summary(args.kind),
            Self::Clear => Action::Clear,
            Self::Shell => return None,
        })
    }
}

/// Free-text topic; multiple words are joined with spaces.
#[derive(Debug, Clone, Args)]
pub struct TopicArgs {
    #[arg(required = true, num_args = 1..)]
    pub topic: Vec<String>,
}

impl TopicArgs {
    pub fn topic(&self) -> String {
        self.topic.join(" ")
    }
}

#[derive(Debug, Clone, Args)]
pub struct HistoryArgs {
    /// Maximum entries to show.
    #[arg(long, default_value_t = HISTORY_LIMIT, value_parser = positive_limit)]
    pub limit: usize,
}

fn positive_limit(raw: &str) -> std::result::Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("must be a positive number, got '{raw}'")),
    }
}

#[derive(Debug, Clone, Args)]
pub struct SummaryArgs {
    /// `brief` or `detailed`; omit to show the current setting.
    pub kind: Option<String>,
}

/// Store operation or search requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    Save(String),
    List,
    Remove(String),
    History { limit: usize },
    Summary(Option<String>),
    Clear,
}

/// State shared by every command: settings, the user store and the
/// lazily-built search pipeline.
pub struct App {
    pub settings: Settings,
    pub store: UserStore,
    pipeline: Option<Pipeline>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let store = UserStore::open(settings.user_data_path.clone())
            .with_history_retention(settings.history_retention);
        Self {
            settings,
            store,
            pipeline: None,
        }
    }

    /// Use `pipeline` for searches instead of building one from settings.
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }
}

/// Run one action, writing user-facing output to `out`.
pub async fn execute(app: &mut App, action: Action, out: &mut dyn Write) -> Result<()> {
    match action {
        Action::Search(topic) => search::run(app, &topic, out).await,
        Action::Save(topic) => topics::save(&mut app.store, &topic, out),
        Action::List => topics::list(&app.store, out),
        Action::Remove(topic) => topics::remove(&mut app.store, &topic, out),
        Action::History { limit } => history::list(&app.store, limit, out),
        Action::Summary(kind) => summary::run(&mut app.store, kind.as_deref(), out),
        Action::Clear => history::clear(&mut app.store, out),
    }
}
