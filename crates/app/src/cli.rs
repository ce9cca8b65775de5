//! `portal` command line: argument parsing and command dispatch
//!
//! Every command prints a single JSON document on stdout. Logs go to stderr.
//! Tokens are never part of any output.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use studentportal_core::ResourceId;
use studentportal_domain::{ApiError, PortalError};

use crate::context::{load_config, AppContext};
use crate::screens::{
    ApplicationsScreen, DashboardScreen, GradesScreen, NotificationsScreen, OpportunitiesScreen,
    ProfileScreen, SavedOpportunitiesScreen,
};
use crate::utils::logging::{init_tracing, log_command_execution};

/// Environment variable consulted for the login password
pub const ENV_PASSWORD: &str = "STUDENTPORTAL_PASSWORD";

#[derive(Debug, Parser)]
#[command(name = "portal", version, about = "Student portal client")]
pub struct Cli {
    /// Config file (TOML or JSON); defaults to the standard locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL, e.g. `https://portal.example.edu/api`
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and persist the session
    Login {
        username: String,
        /// Read from the environment or prompted for when absent
        #[arg(long, env = ENV_PASSWORD, hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// Exchange the refresh token for a new access token
    Refresh,
    Dashboard,
    /// Account profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    /// Student record
    StudentProfile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    Opportunities {
        #[command(subcommand)]
        action: Option<OpportunityAction>,
    },
    Saved {
        #[command(subcommand)]
        action: Option<SavedAction>,
    },
    Applications {
        #[command(subcommand)]
        action: Option<ApplicationAction>,
    },
    Notifications {
        #[command(subcommand)]
        action: Option<NotificationAction>,
    },
    Grades {
        #[command(subcommand)]
        action: Option<GradeAction>,
    },
    Semesters,
    CourseUnits,
    Reports {
        #[command(subcommand)]
        action: Option<ReportAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    Show,
    /// Patch the profile with a JSON object of changed fields
    Update {
        #[arg(long)]
        json: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum OpportunityAction {
    List,
    Show { id: ResourceId },
    Save { id: ResourceId },
    Apply {
        id: ResourceId,
        #[arg(long)]
        cover_letter: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SavedAction {
    List,
    /// Un-save by saved-record id
    Remove { id: ResourceId },
}

#[derive(Debug, Subcommand)]
pub enum ApplicationAction {
    List,
    Show { id: ResourceId },
}

#[derive(Debug, Subcommand)]
pub enum NotificationAction {
    List,
    Read { id: ResourceId },
}

#[derive(Debug, Subcommand)]
pub enum GradeAction {
    /// Grades grouped by semester, with the GPA
    List,
    Add {
        #[arg(long)]
        json: String,
    },
    Gpa,
}

#[derive(Debug, Subcommand)]
pub enum ReportAction {
    List,
    /// Ask the backend to generate a report from JSON parameters
    Create {
        #[arg(long)]
        json: String,
    },
}

impl Command {
    /// Stable label for logs; carries no user data
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Status => "status",
            Self::Refresh => "refresh",
            Self::Dashboard => "dashboard",
            Self::Profile { .. } => "profile",
            Self::StudentProfile { .. } => "student_profile",
            Self::Opportunities { .. } => "opportunities",
            Self::Saved { .. } => "saved",
            Self::Applications { .. } => "applications",
            Self::Notifications { .. } => "notifications",
            Self::Grades { .. } => "grades",
            Self::Semesters => "semesters",
            Self::CourseUnits => "course_units",
            Self::Reports { .. } => "reports",
        }
    }
}

/// Errors surfaced by the CLI
#[derive(Debug)]
pub enum CliError {
    /// Bad input or configuration
    Validation(String),
    /// The API call failed
    Api(ApiError),
    /// Anything else, e.g. the password prompt
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// 2 for bad input, 3 when the user has to log in (again), 1 otherwise
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Api(ApiError::AuthenticationFailed { .. } | ApiError::SessionExpired) => 3,
            Self::Api(_) | Self::Failure(_) => 1,
        }
    }

    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Api(ApiError::SessionExpired) => {
                format!("{} Run `portal login` to sign in.", ApiError::SessionExpired.user_message())
            }
            Self::Api(err) => err.user_message(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }

    /// Stable log label
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Api(err) => err.category().as_str(),
            Self::Failure(_) => "failure",
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => err.status(),
            _ => None,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<PortalError> for CliError {
    fn from(err: PortalError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Load configuration, install logging, wire the client and run one command
///
/// # Errors
///
/// See [`CliError`]; the exit code is derived from the variant
pub async fn run(cli: Cli) -> CliResult<Option<Value>> {
    // A missing .env is the normal case.
    dotenvy::dotenv().ok();

    let config = load_config(cli.config, cli.base_url)?;
    init_tracing(&config.logging).map_err(CliError::failure)?;
    let context = AppContext::from_config(config)?;

    let label = cli.command.label();
    let started = Instant::now();
    let result = execute(&context, cli.command).await;
    log_command_execution(label, started.elapsed(), result.as_ref().map(|_| ()));
    result
}

/// Run one command against an already wired context
///
/// # Errors
///
/// See [`CliError`]
pub async fn execute(context: &AppContext, command: Command) -> CliResult<Option<Value>> {
    let api = &context.api;

    let output = match command {
        Command::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => rpassword::prompt_password("Password: ").map_err(CliError::failure)?,
            };
            api.login(&username, &password).await?;
            json!({ "authenticated": true, "username": username })
        }
        Command::Logout => {
            api.logout().await?;
            json!({ "authenticated": false })
        }
        Command::Status => json!({
            "authenticated": api.is_authenticated().await,
            "base_url": context.config.api.base_url,
            "session_backend": context.config.session.backend.to_string(),
        }),
        Command::Refresh => {
            api.refresh_session().await?;
            json!({ "authenticated": true, "refreshed": true })
        }
        Command::Dashboard => {
            let mut screen = DashboardScreen::new(api.clone());
            serde_json::to_value(screen.load().await.result()?).map_err(CliError::failure)?
        }
        Command::Profile { action } => match action.unwrap_or(ProfileAction::Show) {
            ProfileAction::Show => {
                let mut screen = ProfileScreen::new(api.clone());
                serde_json::to_value(screen.load().await.result()?).map_err(CliError::failure)?
            }
            ProfileAction::Update { json } => {
                let mut screen = ProfileScreen::new(api.clone());
                screen.update_user(&parse_object(&json)?).await?
            }
        },
        Command::StudentProfile { action } => match action.unwrap_or(ProfileAction::Show) {
            ProfileAction::Show => api.fetch_student_profile().await?,
            ProfileAction::Update { json } => {
                let mut screen = ProfileScreen::new(api.clone());
                screen.update_student(&parse_object(&json)?).await?
            }
        },
        Command::Opportunities { action } => {
            let mut screen = OpportunitiesScreen::new(api.clone());
            match action.unwrap_or(OpportunityAction::List) {
                OpportunityAction::List => Value::Array(screen.load().await.result()?.clone()),
                OpportunityAction::Show { id } => screen.detail(id).await?,
                OpportunityAction::Save { id } => screen.save(id).await?,
                OpportunityAction::Apply { id, cover_letter } => {
                    screen.apply(id, cover_letter.as_deref()).await?
                }
            }
        }
        Command::Saved { action } => {
            let mut screen = SavedOpportunitiesScreen::new(api.clone());
            match action.unwrap_or(SavedAction::List) {
                SavedAction::List => Value::Array(screen.load().await.result()?.clone()),
                SavedAction::Remove { id } => {
                    screen.remove(id).await?;
                    json!({ "removed": id })
                }
            }
        }
        Command::Applications { action } => {
            let mut screen = ApplicationsScreen::new(api.clone());
            match action.unwrap_or(ApplicationAction::List) {
                ApplicationAction::List => Value::Array(screen.load().await.result()?.clone()),
                ApplicationAction::Show { id } => screen.detail(id).await?,
            }
        }
        Command::Notifications { action } => {
            let mut screen = NotificationsScreen::new(api.clone());
            match action.unwrap_or(NotificationAction::List) {
                NotificationAction::List => {
                    screen.load().await.result()?;
                    json!({ "unread": screen.unread_count(), "notifications": screen.state.data })
                }
                NotificationAction::Read { id } => {
                    screen.mark_as_read(id).await?;
                    json!({ "read": id })
                }
            }
        }
        Command::Grades { action } => match action.unwrap_or(GradeAction::List) {
            GradeAction::List => {
                let mut screen = GradesScreen::new(api.clone());
                let data = screen.load().await.result()?;
                json!({ "gpa": data.gpa, "sections": data.sections() })
            }
            GradeAction::Add { json } => api.add_grade(&parse_object(&json)?).await?,
            GradeAction::Gpa => api.fetch_gpa().await?,
        },
        Command::Semesters => api.fetch_semesters().await?,
        Command::CourseUnits => api.fetch_course_units().await?,
        Command::Reports { action } => match action.unwrap_or(ReportAction::List) {
            ReportAction::List => api.fetch_reports().await?,
            ReportAction::Create { json } => api.generate_report(&parse_object(&json)?).await?,
        },
    };

    Ok(Some(output))
}

/// Pretty JSON for stdout
///
/// # Errors
///
/// Returns `Failure` if the value cannot be serialised
pub fn render(output: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(output).map_err(CliError::failure)
}

fn parse_object(raw: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| CliError::validation(format!("--json is not valid JSON: {err}")))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(CliError::validation("--json must be a JSON object"))
    }
}
