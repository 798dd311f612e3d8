//! Command-line front end
//!
//! Every command runs behind the role guard. Read commands open a page
//! through [`WithRole`]; write commands check the same guard and then go
//! through a [`Submitter`], so validation, notifications and revalidation
//! behave exactly as they do for any other caller of the library.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use crate::api::{ApiClient, FileUpload, WriteResponse};
use crate::cache::create_cache;
use crate::config::{Config, UploadConfig};
use crate::forms::{ActionDialog, CategoryForm, EpisodeForm, FeedbackForm, LoginForm, Submitter};
use crate::guard::{Navigation, RoleGuard, Rendered, WithRole};
use crate::hooks::Hooks;
use crate::models::{ContentKind, UserRole};
use crate::notify::{Notifier, TracingNotifier};
use crate::pages::{DetailPage, ListPage, Page, PageView};
use crate::session::{source_from_config, RoleClaimSource};

const USER_LOGIN: &str = "/auth/user/login";
const STAFF_LOGIN: &str = "/auth/staff/login";

#[derive(Parser, Debug)]
#[command(name = "skilins")]
#[command(about = "Command-line client for the skilins content platform")]
#[command(version)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file
    #[arg(long, global = true, default_value = "config.yml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List a collection
    List {
        resource: Resource,

        /// Filter categories by name
        #[arg(long)]
        search: Option<String>,

        /// Competition whose submissions or parameters to list
        #[arg(long)]
        competition: Option<String>,

        /// Page of a content collection, starting at 1
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,
    },

    /// Comments and likes over the last three months
    Stats,

    /// Show one content item by slug or UUID
    Show { kind: Kind, id: String },

    /// Show the signed-in user
    Me,

    /// Delete the item at an API path
    Delete { path: String },

    /// Reject the content at an API path
    Reject { path: String },

    /// Approve the content at an API path
    Approve { path: String },

    /// Manage categories
    Category {
        #[command(subcommand)]
        cmd: CategoryCommands,
    },

    /// Add an episode to one of your stories
    Episode {
        /// Story slug
        story: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        #[arg(long)]
        order: u32,
    },

    /// Score a competition submission
    Judge {
        competition: String,
        submission: String,

        /// PARAMETER=SCORE[:NOTES], parameter by name or UUID
        #[arg(long = "score", value_parser = parse_score)]
        scores: Vec<ScoreArg>,
    },

    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a category
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Avatar image file
        #[arg(long)]
        avatar: Option<PathBuf>,
    },

    /// Edit a category
    Edit {
        uuid: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        avatar: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Categories,
    Tags,
    Students,
    Majors,
    Stories,
    Ebooks,
    Audios,
    Videos,
    Reports,
    Blogs,
    Competitions,
    Submissions,
    Parameters,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Story,
    Ebook,
    Audio,
    Video,
    Report,
    Blog,
}

impl From<Kind> for ContentKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Story => ContentKind::Story,
            Kind::Ebook => ContentKind::Ebook,
            Kind::Audio => ContentKind::Audio,
            Kind::Video => ContentKind::Video,
            Kind::Report => ContentKind::Report,
            Kind::Blog => ContentKind::Blog,
        }
    }
}

/// One `--score` argument
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreArg {
    pub parameter: String,
    pub score: f64,
    pub notes: Option<String>,
}

fn content_kind(resource: Resource) -> Option<ContentKind> {
    match resource {
        Resource::Stories => Some(ContentKind::Story),
        Resource::Ebooks => Some(ContentKind::Ebook),
        Resource::Audios => Some(ContentKind::Audio),
        Resource::Videos => Some(ContentKind::Video),
        Resource::Reports => Some(ContentKind::Report),
        Resource::Blogs => Some(ContentKind::Blog),
        _ => None,
    }
}

fn parse_score(raw: &str) -> Result<ScoreArg, String> {
    let (parameter, rest) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PARAMETER=SCORE, got '{}'", raw))?;
    let (score, notes) = match rest.split_once(':') {
        Some((score, notes)) => (score, Some(notes.to_string())),
        None => (rest, None),
    };
    let score = score
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
        .ok_or_else(|| format!("'{}' is not a number", score.trim()))?;
    if parameter.trim().is_empty() {
        return Err("parameter name is empty".to_string());
    }
    Ok(ScoreArg {
        parameter: parameter.trim().to_string(),
        score,
        notes,
    })
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Result of one command
#[derive(Debug, Clone)]
pub enum Outcome {
    View(PageView),
    Redirect(String),
    Written(WriteResponse),
}

impl Outcome {
    pub fn render(&self, format: OutputFormat) -> String {
        match (self, format) {
            (Outcome::View(view), OutputFormat::Text) => {
                format!("{}\n{}\n{}", view.title, "=".repeat(view.title.chars().count()), view.body)
            }
            (Outcome::View(view), OutputFormat::Json) => pretty(&view.data),
            (Outcome::Redirect(path), OutputFormat::Text) => format!("Redirected to {}", path),
            (Outcome::Redirect(path), OutputFormat::Json) => pretty(&json!({ "redirect": path })),
            (Outcome::Written(response), OutputFormat::Text) => response
                .message
                .clone()
                .unwrap_or_else(|| "Done.".to_string()),
            (Outcome::Written(response), OutputFormat::Json) => {
                pretty(&serde_json::to_value(response).unwrap_or_default())
            }
        }
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Everything a command needs
pub struct App {
    hooks: Hooks,
    session: Box<dyn RoleClaimSource>,
    submitter: Submitter,
    upload: UploadConfig,
}

impl App {
    pub fn new(
        hooks: Hooks,
        session: Box<dyn RoleClaimSource>,
        notifier: Arc<dyn Notifier>,
        upload: UploadConfig,
    ) -> Self {
        let submitter = Submitter::for_hooks(&hooks, notifier).with_upload_config(upload.clone());
        Self {
            hooks,
            session,
            submitter,
            upload,
        }
    }

    /// Build the client stack from configuration, forwarding the session
    /// cookie to the API
    pub async fn from_config(config: &Config) -> Result<Self> {
        let session = source_from_config(&config.session);
        let cookie = session.cookie_header().await;
        let client = ApiClient::new(&config.api)
            .context("Failed to build API client")?
            .with_cookie(cookie);
        let hooks = Hooks::new(client, create_cache(&config.cache));
        Ok(Self::new(
            hooks,
            session,
            Arc::new(TracingNotifier),
            config.upload.clone(),
        ))
    }

    pub async fn execute(&self, command: Commands) -> Result<Outcome> {
        match command {
            Commands::List {
                resource,
                search,
                competition,
                page,
            } => self.list(resource, search, competition, page).await,
            Commands::Show { kind, id } => {
                let kind = ContentKind::from(kind);
                let page = DetailPage::new(kind.to_string(), self.hooks.content(kind, &id));
                self.open(page, RoleGuard::new(&UserRole::ALL, USER_LOGIN)).await
            }
            Commands::Stats => {
                let page = DetailPage::new("Feedback", self.hooks.feedback_stats());
                let staff = RoleGuard::new(&[UserRole::Staff, UserRole::Admin], STAFF_LOGIN);
                self.open(page, staff).await
            }
            Commands::Me => {
                let page = DetailPage::new("Profile", self.hooks.current_user());
                self.open(page, RoleGuard::new(&UserRole::ALL, USER_LOGIN)).await
            }
            Commands::Delete { path } => self.dialog(ActionDialog::delete(&path)).await,
            Commands::Reject { path } => self.dialog(ActionDialog::reject(&path)).await,
            Commands::Approve { path } => self.dialog(ActionDialog::approve(&path)).await,
            Commands::Category { cmd } => self.category(cmd).await,
            Commands::Episode {
                story,
                title,
                content,
                order,
            } => {
                if let Some(path) = self.check(&RoleGuard::only(UserRole::Student)).await {
                    return Ok(Outcome::Redirect(path));
                }
                let story = self.hooks.story_by_slug(&story).fetch().await?;
                let form = EpisodeForm {
                    story_uuid: story.uuid,
                    title,
                    content,
                    order,
                };
                self.write(&form).await
            }
            Commands::Judge {
                competition,
                submission,
                scores,
            } => self.judge(competition, submission, scores).await,
            Commands::Login { email, password } => self.write(&LoginForm { email, password }).await,
        }
    }

    async fn list(
        &self,
        resource: Resource,
        search: Option<String>,
        competition: Option<String>,
        page: Option<u32>,
    ) -> Result<Outcome> {
        let anyone = RoleGuard::new(&UserRole::ALL, USER_LOGIN);
        let staff = RoleGuard::new(&[UserRole::Staff, UserRole::Admin], STAFF_LOGIN);
        let hooks = &self.hooks;
        let contents = |kind: ContentKind| match page {
            Some(page) => hooks.contents_page(kind, page),
            None => hooks.contents(kind),
        };
        if page.is_some() && content_kind(resource).is_none() {
            bail!("--page only applies to content collections");
        }

        let (page, guard): (Box<dyn Page>, RoleGuard) = match resource {
            Resource::Categories => {
                let hook = match search.as_deref() {
                    Some(term) => hooks.category_search(term),
                    None => hooks.categories(),
                };
                (Box::new(ListPage::new("Categories", hook)), anyone)
            }
            Resource::Tags => (Box::new(ListPage::new("Tags", hooks.tags())), anyone),
            Resource::Students => (Box::new(ListPage::new("Students", hooks.students())), staff),
            Resource::Majors => (Box::new(ListPage::new("Majors", hooks.majors())), anyone),
            Resource::Stories => (Box::new(ListPage::new("Stories", contents(ContentKind::Story))), anyone),
            Resource::Ebooks => (Box::new(ListPage::new("Ebooks", contents(ContentKind::Ebook))), anyone),
            Resource::Audios => (Box::new(ListPage::new("Audios", contents(ContentKind::Audio))), anyone),
            Resource::Videos => (Box::new(ListPage::new("Videos", contents(ContentKind::Video))), anyone),
            Resource::Reports => (Box::new(ListPage::new("Reports", contents(ContentKind::Report))), anyone),
            Resource::Blogs => (Box::new(ListPage::new("Blogs", contents(ContentKind::Blog))), anyone),
            Resource::Competitions => (
                Box::new(ListPage::new("Competitions", hooks.competitions())),
                anyone,
            ),
            Resource::Submissions => {
                let competition = require_competition(competition)?;
                let page = ListPage::new("Submissions", hooks.submissions(&competition));
                (
                    Box::new(page),
                    RoleGuard::new(&[UserRole::Judge, UserRole::Staff, UserRole::Admin], USER_LOGIN),
                )
            }
            Resource::Parameters => {
                let competition = require_competition(competition)?;
                let page = ListPage::new(
                    "Evaluation parameters",
                    hooks.evaluation_parameters(&competition),
                );
                (Box::new(page), anyone)
            }
        };
        self.open(page, guard).await
    }

    async fn category(&self, cmd: CategoryCommands) -> Result<Outcome> {
        if let Some(path) = self.check(&RoleGuard::only(UserRole::Admin)).await {
            return Ok(Outcome::Redirect(path));
        }
        let form = match cmd {
            CategoryCommands::Create {
                name,
                description,
                avatar,
            } => CategoryForm::create(name, description).with_avatar(self.upload(avatar).await?),
            CategoryCommands::Edit {
                uuid,
                name,
                description,
                avatar,
            } => CategoryForm::edit(uuid, name, description).with_avatar(self.upload(avatar).await?),
        };
        self.write(&form).await
    }

    async fn judge(
        &self,
        competition: String,
        submission: String,
        scores: Vec<ScoreArg>,
    ) -> Result<Outcome> {
        if let Some(path) = self.check(&RoleGuard::only(UserRole::Judge)).await {
            return Ok(Outcome::Redirect(path));
        }
        let judge = self.hooks.judge_user().fetch().await?;
        let parameters = self
            .hooks
            .evaluation_parameters(&competition)
            .fetch()
            .await?;

        let mut form =
            FeedbackForm::new(judge.uuid, submission, &parameters).for_competition(&competition);
        for arg in &scores {
            let uuid = parameters
                .iter()
                .find(|p| p.uuid == arg.parameter || p.parameter_name.eq_ignore_ascii_case(&arg.parameter))
                .map(|p| p.uuid.clone())
                .ok_or_else(|| anyhow!("Competition has no parameter '{}'", arg.parameter))?;
            if !form.score(&uuid, arg.score, arg.notes.as_deref()) {
                bail!("Invalid score {} for '{}'", arg.score, arg.parameter);
            }
        }
        self.write(&form).await
    }

    async fn dialog(&self, dialog: ActionDialog) -> Result<Outcome> {
        let guard = RoleGuard::new(&[UserRole::Staff, UserRole::Admin], STAFF_LOGIN);
        if let Some(path) = self.check(&guard).await {
            return Ok(Outcome::Redirect(path));
        }
        self.write(&dialog).await
    }

    async fn open<P: Page>(&self, page: P, guard: RoleGuard) -> Result<Outcome> {
        let mut guarded = WithRole::new(page, guard);
        Ok(match guarded.open(self.session.as_ref()).await? {
            Rendered::Page(view) => Outcome::View(view),
            Rendered::Redirect(path) => Outcome::Redirect(path),
            Rendered::Loading => bail!("Role guard did not settle"),
        })
    }

    /// Redirect target if the visitor may not run a write command
    async fn check(&self, guard: &RoleGuard) -> Option<String> {
        let claim = self.session.role_claim().await;
        match guard.decide(claim.as_deref()) {
            Navigation::Render(_) => None,
            Navigation::Redirect(path) => Some(path),
        }
    }

    async fn write<F: crate::forms::Form>(&self, form: &F) -> Result<Outcome> {
        Ok(Outcome::Written(self.submitter.submit(form).await?))
    }

    async fn upload(&self, path: Option<PathBuf>) -> Result<Option<FileUpload>> {
        match path {
            Some(path) => Ok(Some(
                FileUpload::from_path(&path, &self.upload)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            )),
            None => Ok(None),
        }
    }
}

fn require_competition(competition: Option<String>) -> Result<String> {
    competition.ok_or_else(|| anyhow!("--competition is required for this listing"))
}

/// Run a parsed command line and print its outcome
pub async fn run(cli: Cli) -> Result<()> {
    let format = OutputFormat::from_cli(&cli);
    let config = Config::load_with_env(&cli.config)?;
    tracing::debug!("API base URL: {}", config.api.base_url);

    let app = App::from_config(&config).await?;
    let outcome = app.execute(cli.command).await?;
    println!("{}", outcome.render(format));
    Ok(())
}
