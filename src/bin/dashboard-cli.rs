use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use dashboard_client::api::types::{
    CreateUserRequest, RegisterRequest, RoleRequest, SignInRequest, UpdateUserRequest, UserStatus,
};
use dashboard_client::auth::FileTokenStore;
use dashboard_client::config::{load_config, load_default, DashboardConfig};
use dashboard_client::health::{aggregate, StatusPoller};
use dashboard_client::observability::logging;
use dashboard_client::{ApiClient, NormalizedError, SessionEvent};

/// Used when neither the config nor the command line names a session file.
const DEFAULT_SESSION_FILE: &str = ".dashboard-session.json";

#[derive(Parser)]
#[command(name = "dashboard-cli")]
#[command(about = "Admin CLI for the user-management backend", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override api.base_url.
    #[arg(short, long)]
    url: Option<String>,

    /// File holding the credential between invocations.
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Log every request to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the credential
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the credential
    Logout,
    /// Check the stored credential with the backend
    Validate,
    /// Rotate the stored credential
    Refresh,
    /// Show the signed-in user
    Me,
    /// Manage users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage roles
    Roles {
        #[command(subcommand)]
        command: RoleCommands,
    },
    /// Probe every configured service once
    Status,
    /// Show the resolved settings and check that the backend answers
    Doctor,
}

#[derive(Subcommand)]
enum UserCommands {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// Role id; repeat for several roles
        #[arg(long = "role")]
        roles: Vec<String>,
        #[arg(long, default_value = "ACTIVE")]
        status: UserStatus,
    },
    Update {
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Replaces all roles; repeat for several roles
        #[arg(long = "role")]
        roles: Vec<String>,
        #[arg(long)]
        status: Option<UserStatus>,
    },
    SetStatus {
        id: String,
        status: UserStatus,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum RoleCommands {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.verbose {
        logging::init(&config.observability, logging::Output::Stderr);
    }

    let session_file = cli
        .session_file
        .clone()
        .or_else(|| config.session.path.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    let tokens = Arc::new(FileTokenStore::open(session_file, config.session.key.clone()));

    let client = match ApiClient::from_config(&config, tokens) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: invalid base URL: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut session_events = client.session_events();

    let result = execute(&client, &config, cli.command).await;

    if let Ok(SessionEvent::SignInRequired { .. }) = session_events.try_recv() {
        eprintln!("Stored credential was rejected and has been removed. Run `dashboard-cli login`.");
    }

    match result {
        Ok(Value::Null) => ExitCode::SUCCESS,
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn load(cli: &Cli) -> Result<DashboardConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default()?,
    };
    if let Some(url) = &cli.url {
        config.api.base_url = url.clone();
    }
    if !cli.verbose {
        config.observability.debug = false;
    }
    Ok(config)
}

async fn execute(
    client: &ApiClient,
    config: &DashboardConfig,
    command: Commands,
) -> Result<Value, NormalizedError> {
    match command {
        Commands::Login { email, password } => {
            let response = client.auth().sign_in(&SignInRequest { email, password }).await?;
            Ok(json!({ "signedIn": true, "user": response.user, "expiresIn": response.expires_in }))
        }
        Commands::Register {
            email,
            name,
            password,
        } => {
            let request = RegisterRequest {
                email,
                name,
                confirm_password: password.clone(),
                password,
            };
            to_json(client.auth().sign_up(&request).await?)
        }
        Commands::Logout => {
            client.auth().sign_out().await;
            Ok(Value::Null)
        }
        Commands::Validate => Ok(json!({ "valid": client.auth().validate().await? })),
        Commands::Refresh => {
            let response = client.auth().refresh().await?;
            Ok(json!({ "refreshed": true, "expiresIn": response.expires_in }))
        }
        Commands::Me => to_json(client.auth().current_user().await?),
        Commands::Users { command } => users(client, command).await,
        Commands::Roles { command } => roles(client, command).await,
        Commands::Doctor => {
            let mut report = client.check_connectivity().await;
            match report.error.take() {
                Some(err) if !report.reachable => {
                    if let Ok(text) = serde_json::to_string_pretty(&report) {
                        println!("{}", text);
                    }
                    Err(err)
                }
                error => {
                    report.error = error;
                    to_json(report)
                }
            }
        }
        Commands::Status => {
            let poller = StatusPoller::from_config(client.clone(), &config.status);
            let records = poller.run_cycle().await;
            let ordered: Vec<_> = poller
                .services()
                .iter()
                .filter_map(|s| records.get(&s.id))
                .collect();
            Ok(json!({
                "overall": aggregate(records.values()),
                "services": ordered,
            }))
        }
    }
}

async fn users(client: &ApiClient, command: UserCommands) -> Result<Value, NormalizedError> {
    let api = client.users();
    match command {
        UserCommands::List => to_json(api.list().await?),
        UserCommands::Get { id } => to_json(api.get(&id).await?),
        UserCommands::Create {
            email,
            name,
            roles,
            status,
        } => {
            let request = CreateUserRequest {
                email,
                name,
                role_ids: roles,
                status,
            };
            to_json(api.create(&request).await?)
        }
        UserCommands::Update {
            id,
            email,
            name,
            roles,
            status,
        } => {
            let request = UpdateUserRequest {
                email,
                name,
                role_ids: (!roles.is_empty()).then_some(roles),
                status,
            };
            to_json(api.update(&id, &request).await?)
        }
        UserCommands::SetStatus { id, status } => to_json(api.set_status(&id, status).await?),
        UserCommands::Delete { id } => {
            api.delete(&id).await?;
            Ok(Value::Null)
        }
    }
}

async fn roles(client: &ApiClient, command: RoleCommands) -> Result<Value, NormalizedError> {
    let api = client.roles();
    match command {
        RoleCommands::List => to_json(api.list().await?),
        RoleCommands::Get { id } => to_json(api.get(&id).await?),
        RoleCommands::Create { name, description } => {
            to_json(api.create(&RoleRequest { name, description }).await?)
        }
        RoleCommands::Update {
            id,
            name,
            description,
        } => to_json(api.update(&id, &RoleRequest { name, description }).await?),
        RoleCommands::Delete { id } => {
            api.delete(&id).await?;
            Ok(Value::Null)
        }
    }
}

fn to_json<T: serde::Serialize>(value: T) -> Result<Value, NormalizedError> {
    serde_json::to_value(value).map_err(|e| {
        NormalizedError::new(dashboard_client::ErrorKind::Unknown, e.to_string())
    })
}

fn print_error(err: &NormalizedError) {
    match err.status_code {
        Some(status) => eprintln!("Error ({}, HTTP {}): {}", err.kind.as_str(), status, err.human_message),
        None => eprintln!("Error ({}): {}", err.kind.as_str(), err.human_message),
    }
    if let Some(code) = &err.error_code {
        eprintln!("Code: {}", code);
    }
    for detail in &err.validation_details {
        eprintln!("  - {}: {}", detail.field, detail.message);
    }
    if let Some(suggestion) = &err.suggestion {
        eprintln!("Suggestion: {}", suggestion);
    }
    for (i, hint) in err.remediation.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, hint);
    }
}
