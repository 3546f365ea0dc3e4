//! PriceTrack CLI
//!
//! Command-line client for the PriceTrack service:
//! - Log in / register / log out
//! - List, track and untrack products
//! - Show a product with its price history chart

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use pricetrack::config::{generate_default_config, Config};
use pricetrack::routes::{self, render, Navigation, Route, ViewState};
use pricetrack::{ApiClient, FileTokenStore, Store};

#[derive(Parser)]
#[command(name = "pricetrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track product prices from the terminal")]
#[command(long_about = "PriceTrack watches product prices for you.\nSubmit a product URL, then check its price history any time.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend URL (overrides config and PRICETRACK_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: ~/.config/pricetrack/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the welcome page
    Home,

    /// Sign in and remember the session
    Login {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "PRICETRACK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "PRICETRACK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List tracked products
    Dashboard,

    /// Start tracking a product URL
    Track { url: String },

    /// Stop tracking a product
    Untrack {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show a product and its price history
    Show { id: i64 },

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

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    pricetrack::logging::init(&config.logging);
    tracing::debug!(backend = %config.api.base_url, "PriceTrack CLI v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Config { output } = &cli.command {
        return write_config(output.as_ref());
    }

    let backend = Arc::new(ApiClient::new(&config.api)?);
    let tokens = Arc::new(FileTokenStore::new(config.session.token_path()));
    let store = Store::new(backend, tokens);

    // Every command starts from the restored session
    store.auth.check_auth().await;

    run(cli.command, &store, cli.format).await
}

async fn run(command: Commands, store: &Store, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        Commands::Home => {
            println!("{}", render::render_home());
        }

        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };

            if let Err(e) = store.auth.login(&email, &password).await {
                bail!("{}", e);
            }

            let auth = store.auth.snapshot();
            if let Some(next) = routes::after_login(&auth) {
                println!("Logged in as {}", email);
                show_route(store, next, format).await?;
            }
        }

        Commands::Register { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };

            let user = store.auth.register(&email, &password).await?;
            println!("Registered {} (id {})", user.email, user.id);
            println!("Log in with: pricetrack login {}", user.email);
        }

        Commands::Logout => {
            store.auth.logout();
            println!("Logged out");
        }

        Commands::Whoami => match store.auth.snapshot().user {
            Some(user) => match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
                OutputFormat::Table => println!("{} (id {})", user.email, user.id),
            },
            None => bail!("Not logged in"),
        },

        Commands::Dashboard => {
            show_route(store, Route::Dashboard, format).await?;
        }

        Commands::Track { url } => {
            require_session(store, &Route::Dashboard)?;

            match store.products.add_product(&url).await {
                Ok(scraped) => {
                    let name = scraped.name.as_deref().unwrap_or(url.as_str());
                    println!("Now tracking: {}", name);
                }
                Err(e) => bail!("{}", e),
            }

            print_dashboard(store, format)?;
        }

        Commands::Untrack { id, yes } => {
            require_session(store, &Route::ProductDetail(id))?;

            if !yes && !confirm("Are you sure you want to stop tracking this product?")? {
                println!("Cancelled");
                return Ok(());
            }

            if let Err(e) = store.products.delete_product(id).await {
                bail!("{}", e);
            }
            println!("Product {} removed from your tracking list", id);
        }

        Commands::Show { id } => {
            show_route(store, Route::ProductDetail(id), format).await?;
        }

        Commands::Config { output } => {
            write_config(output.as_ref())?;
        }
    }

    Ok(())
}

/// Enter a route through the guard and print its view
async fn show_route(store: &Store, route: Route, format: OutputFormat) -> anyhow::Result<()> {
    match routes::visit(store, route).await {
        Navigation::Redirect(to) => Err(redirect_error(&to)),
        Navigation::Render(Route::Dashboard) => print_dashboard(store, format),
        Navigation::Render(Route::ProductDetail(_)) => print_detail(store, format),
        Navigation::Render(Route::Home) => {
            println!("{}", render::render_home());
            Ok(())
        }
        Navigation::Render(Route::Login) => {
            println!("Log in with: pricetrack login <email>");
            Ok(())
        }
        Navigation::Render(Route::NotFound(path)) => bail!(render::render_not_found(&path)),
    }
}

fn require_session(store: &Store, route: &Route) -> anyhow::Result<()> {
    match routes::guard(route.clone(), &store.auth.snapshot()) {
        Navigation::Redirect(to) => Err(redirect_error(&to)),
        Navigation::Render(_) => Ok(()),
    }
}

fn redirect_error(to: &Route) -> anyhow::Error {
    anyhow!(
        "Not logged in; redirected to {}. Run: pricetrack login <email>",
        to.path()
    )
}

fn print_dashboard(store: &Store, format: OutputFormat) -> anyhow::Result<()> {
    let view = routes::dashboard_view(&store.auth.snapshot(), &store.products.snapshot());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Table => println!("{}", render::render_dashboard(&view)),
    }

    if let ViewState::Error(message) = &view.products {
        bail!("{}", message);
    }
    Ok(())
}

fn print_detail(store: &Store, format: OutputFormat) -> anyhow::Result<()> {
    let view = routes::detail_view(&store.products.snapshot());

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    match view {
        ViewState::Ready(detail) => {
            if format == OutputFormat::Table {
                println!("{}", render::render_detail(&detail));
            }
            Ok(())
        }
        ViewState::Error(message) => bail!("{}", message),
        ViewState::Loading => bail!("Product details unavailable"),
    }
}

fn write_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)
                .with_context(|| format!("Failed to write config to {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
