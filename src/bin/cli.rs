//! Logscope CLI
//!
//! Terminal client for the two log backends:
//! - Log in / register with MFA
//! - Inspect the current session
//! - Print the request-log dashboard

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use logscope::api::client::fetch_dashboard_logs;
use logscope::auth::{self, login_failure, register_failure};
use logscope::config::{generate_default_config, Config, LoggingConfig};
use logscope::dashboard::{Card, CardBody, DashboardView, ServerFilter};
use logscope::forms::{Field, FormKind, FormState};
use logscope::guard::{self, Access, Route};
use logscope::mfa::EnrollmentCode;
use logscope::session::{FileSessionStore, SessionStore};
use logscope::BackendClient;

#[derive(Parser)]
#[command(name = "logscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Login and request-log dashboard for two backend servers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/logscope/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with email, password and MFA code
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Current code from the authenticator app
        #[arg(short = 'k', long)]
        code: String,
    },

    /// Create an account and show its MFA enrollment code
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        /// Password confirmation
        #[arg(long)]
        confirm: String,
    },

    /// Forget the stored session
    Logout,

    /// Show who the stored session belongs to
    Whoami,

    /// Show backend 1 server info
    Info,

    /// Fetch both servers' logs and print the dashboard
    Dashboard {
        /// all, server1 or server2
        #[arg(short, long, default_value = "all")]
        server: ServerFilter,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_tracing(&config.logging);

    let session = FileSessionStore::new(&config.session.file);
    let client = BackendClient::new(config.backends.urls(), config.backends.request_timeout())
        .context("Failed to create backend client")?;
    let json = cli.format == "json";

    match cli.command {
        Commands::Login {
            email,
            password,
            code,
        } => {
            let form = FormState::new(FormKind::Login)
                .with(Field::Email, &email)
                .with(Field::Password, &password)
                .with(Field::MfaCode, &code);

            match auth::login(&client, &session, &form).await {
                Ok(outcome) => {
                    println!("{}", outcome.message);
                    let identity = session.identity();
                    if !identity.is_empty() {
                        println!("Sesión iniciada como {}", identity);
                    }
                }
                Err(e) => {
                    eprintln!("{}", login_failure(&e));
                    std::process::exit(1);
                }
            }
        }

        Commands::Register {
            email,
            username,
            password,
            confirm,
        } => {
            let form = FormState::new(FormKind::Register)
                .with(Field::Email, &email)
                .with(Field::Username, &username)
                .with(Field::Password, &password)
                .with(Field::ConfirmPassword, &confirm);

            match auth::register(&client, &form).await {
                Ok(enrollment) => {
                    println!("{}", enrollment.message);
                    if let Some(value) = enrollment.provisioning {
                        print_enrollment(&value);
                    }
                }
                Err(e) => {
                    eprintln!("{}", register_failure(&e));
                    std::process::exit(1);
                }
            }
        }

        Commands::Logout => {
            auth::logout(&session)?;
            println!("Sesión cerrada");
        }

        Commands::Whoami => match session.token() {
            None => {
                println!("Not logged in");
            }
            Some(_) => {
                let claims = session.claims().unwrap_or_default();
                if json {
                    println!("{}", serde_json::to_string_pretty(&claims)?);
                } else {
                    println!("Email:   {}", claims.email.as_deref().unwrap_or("-"));
                    match claims.expires_at() {
                        Some(at) => {
                            let state = if claims.is_expired(Utc::now()) {
                                " (expired)"
                            } else {
                                ""
                            };
                            println!("Expires: {}{}", at.format("%Y-%m-%d %H:%M:%S UTC"), state);
                        }
                        None => println!("Expires: -"),
                    }
                }
            }
        },

        Commands::Info => {
            let info = client.server_info().await.map_err(|e| {
                eprintln!("Cannot reach backend 1 at {}", client.urls().primary);
                e
            })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else if let Some((version, mensaje)) = info.details() {
                println!("Node version: {}", version);
                println!("Mensaje:      {}", mensaje);
            } else {
                println!("Backend 1 did not report a Node version");
            }
        }

        Commands::Dashboard { server } => {
            if let Access::Redirect(_) = guard::resolve(Route::Logs, &session) {
                eprintln!("Not logged in. Run `logscope login` first.");
                std::process::exit(1);
            }

            let logs = fetch_dashboard_logs(&client).await;
            let view = DashboardView::build(&logs, server);

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("Logs: {}", view.filter.label());
                for card in &view.cards {
                    println!();
                    print_card(card);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => write_config(&path, &config)?,
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("logscope={}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_config(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    println!("Config written to {:?}", path);
    Ok(())
}

fn print_enrollment(value: &str) {
    println!();
    println!("Escanea este código con tu app de autenticación:");
    match EnrollmentCode::new(value) {
        Ok(code) => println!("{}", code.to_terminal()),
        Err(e) => tracing::warn!("Cannot render enrollment code: {}", e),
    }
    println!("{}", value);
}

fn print_card(card: &Card) {
    println!("{}", card.title);
    println!("{}", "-".repeat(48));

    match &card.body {
        CardBody::Bar(chart) => {
            if chart.is_empty() {
                println!("(sin datos)");
                return;
            }
            print!("{:<16}", "");
            for dataset in &chart.datasets {
                print!(" | {:>10}", dataset.label);
            }
            println!();
            for (i, label) in chart.labels.iter().enumerate() {
                print!("{:<16}", label);
                for dataset in &chart.datasets {
                    print!(" | {:>10}", dataset.data.get(i).copied().unwrap_or(0));
                }
                println!();
            }
        }
        CardBody::Pie(chart) => {
            if chart.slices.is_empty() {
                println!("(sin datos)");
                return;
            }
            for (slice, fraction) in chart.slices.iter().zip(chart.fractions()) {
                println!(
                    "{:<16} {:>6} {:>6.1}%",
                    slice.label,
                    slice.value,
                    fraction * 100.0
                );
            }
        }
        CardBody::Line(chart) => {
            if chart.buckets.is_empty() {
                println!("(sin datos)");
                return;
            }
            print!("{:<8}", "");
            for dataset in &chart.datasets {
                print!(" | {:>10}", dataset.label);
            }
            println!();
            for (i, label) in chart.labels().iter().enumerate() {
                print!("{:<8}", label);
                for dataset in &chart.datasets {
                    print!(" | {:>10}", dataset.data.get(i).copied().unwrap_or(0));
                }
                println!();
            }
        }
        CardBody::Stats { lines } => {
            for line in lines {
                println!("{}", line);
            }
        }
    }
}
