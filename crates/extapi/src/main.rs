mod cli; // Base application and output helpers

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use http::Method;
use log::{debug, error, info};
use serde_json::Value;

use extapi_core::config::ApiConfig;
use extapi_core::driver::Driver;
use extapi_core::kernel::bootstrap::{AppState, Bootstrap};
use extapi_core::kernel::constants;
use extapi_core::kernel::error::{Error as KernelError, Result as KernelResult};
use extapi_core::{ApiRequest, ExtensionDescriptor};

/// extapi: an extensible OpenStack-style REST API front end
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Simple ping command for testing
    #[arg(long)]
    ping: bool,

    /// Configuration file (.json, .yaml or .toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extension directory searched before the built-in one; repeatable
    #[arg(long = "extensions-path", global = true)]
    extensions_path: Vec<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect loaded extensions
    Extensions {
        #[command(subcommand)]
        command: ExtensionCommand,
    },
    /// Print the merged attribute map, or the attributes of one resource
    Attributes {
        /// Collection name, e.g. `vnfs`
        resource: Option<String>,
    },
    /// Send one request through the extension middleware
    Request {
        /// HTTP method
        method: String,
        /// Request path, optionally with a query string
        path: String,
        /// JSON request body
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,
        /// Read the request body from a file
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
    /// Inspect and call VIM drivers
    Drivers {
        #[command(subcommand)]
        command: DriverCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ExtensionCommand {
    /// List loaded extensions in load order
    List {},
    /// Show one extension
    Show {
        /// The alias of the extension
        alias: String,
    },
}

#[derive(Subcommand, Debug)]
enum DriverCommand {
    /// List loaded VIM drivers
    List {},
    /// Call a driver method
    Invoke {
        /// Driver type, e.g. `openstack`
        driver_type: String,
        /// Method name, e.g. `register_vim`
        method: String,
        /// Keyword arguments as a JSON object
        #[arg(long, default_value = "{}")]
        kwargs: String,
    },
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // A logger installed earlier in the process stays in place
    let _ = builder.try_init();
}

async fn load_config(args: &CliArgs) -> KernelResult<ApiConfig> {
    let mut config = match &args.config {
        Some(path) => ApiConfig::load(path).await?,
        None => ApiConfig::default(),
    };
    if !args.extensions_path.is_empty() {
        config.append_api_extensions_path(args.extensions_path.as_slice());
    }
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

async fn build_state(config: ApiConfig) -> KernelResult<AppState> {
    let mut setup = Bootstrap::new(config, core_extensions::BUILTIN_EXTENSIONS_PATH);
    core_extensions::register_all(&mut setup)?;
    let state = AppState::bootstrap(setup, Arc::new(cli::VersionsApp)).await?;
    if !state.extend_report.unprocessed.is_empty() {
        eprintln!(
            "Warning: extensions with missing requirements: {}",
            state.extend_report.unprocessed.join(", ")
        );
    }
    Ok(state)
}

async fn send(state: &AppState, request: ApiRequest) -> KernelResult<()> {
    let response = state.handle(request).await;
    cli::print_response(&response);
    if response.is_success() {
        Ok(())
    } else {
        Err(KernelError::Other(format!("Request failed with status {}", response.status)))
    }
}

async fn run(args: CliArgs) -> KernelResult<()> {
    let config = load_config(&args).await?;

    let Some(command) = args.command else {
        println!("{} v{} (API v{})", constants::APP_NAME, constants::APP_VERSION, config.api_version);
        println!("No command specified. Run with --help for usage.");
        return Ok(());
    };

    info!("Initializing application...");
    let state = build_state(config).await?;

    match command {
        Commands::Extensions { command } => match command {
            ExtensionCommand::List {} => {
                if state.manager.is_empty() {
                    println!("No extensions loaded.");
                }
                for extension in state.manager.extensions() {
                    println!(
                        "{:<12} {} - {}",
                        extension.alias(),
                        extension.name(),
                        extension.description()
                    );
                }
                Ok(())
            }
            ExtensionCommand::Show { alias } => {
                let path = format!("/{}/{}", constants::EXTENSIONS_COLLECTION, alias);
                send(&state, ApiRequest::new(Method::GET, &path)).await
            }
        },
        Commands::Attributes { resource } => {
            let value = match resource {
                Some(name) => {
                    let attrs = state
                        .attributes
                        .resource(&name)
                        .ok_or_else(|| KernelError::Other(format!("Unknown resource '{}'", name)))?;
                    serde_json::to_value(attrs).map_err(|e| KernelError::Other(e.to_string()))?
                }
                None => state.attributes.to_json(),
            };
            println!("{}", cli::pretty(&value));
            Ok(())
        }
        Commands::Request {
            method,
            path,
            body,
            body_file,
        } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .map_err(|e| KernelError::Other(format!("Invalid method '{}': {}", method, e)))?;
            let body = match body_file {
                Some(file) => Some(
                    tokio::fs::read_to_string(&file)
                        .await
                        .map_err(|e| KernelError::io(e, "read request body", file.clone()))?,
                ),
                None => body,
            };
            let mut request = ApiRequest::new(method, &path);
            if let Some(body) = body {
                request = request.with_body(body);
            }
            send(&state, request).await
        }
        Commands::Drivers { command } => match command {
            DriverCommand::List {} => {
                for driver_type in state.drivers.driver_types() {
                    let name = state.drivers.get(driver_type).map(|d| d.name()).unwrap_or_default();
                    println!("{:<12} {}", driver_type, name);
                }
                Ok(())
            }
            DriverCommand::Invoke {
                driver_type,
                method,
                kwargs,
            } => {
                let kwargs: Value = serde_json::from_str(&kwargs)
                    .map_err(|e| KernelError::Other(format!("Invalid kwargs: {}", e)))?;
                let result = state.drivers.invoke(&driver_type, &method, &kwargs)?;
                println!("{}", cli::pretty(&result));
                Ok(())
            }
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
