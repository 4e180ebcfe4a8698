//! # RIPS CLI
//!
//! Command line client for the RIPS static analysis API.
//!
//! ## Usage
//!
//! ```bash
//! # Point the CLI at your server once
//! rips config set --base-url https://rips.example.com/api --username alice
//!
//! # Upload an archive, wait for the scan and print the issues
//! RIPS_PASSWORD=secret rips scan shop.zip
//!
//! # Download the PDF report
//! RIPS_PASSWORD=secret rips report 42 --output shop.pdf
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rips_api::commands;
use rips_api::commands::LoginArgs;
use rips_api::commands::config::ConfigSetArgs;

/// Initialize logger based on verbose flag
fn init_logger(verbose: bool) {
    let mut log_builder = env_logger::Builder::from_default_env();
    if verbose {
        log_builder.filter_level(log::LevelFilter::Debug);
    } else {
        log_builder.filter_level(log::LevelFilter::Info);
    }
    log_builder.init();
}

/// Main CLI structure
#[derive(Parser)]
#[command(name = "rips")]
#[command(about = "Command line client for the RIPS static analysis API", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output (logs every request)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Login options
#[derive(Args, Clone, Debug)]
struct LoginOpts {
    /// Username (defaults to the configured one)
    #[arg(long, short = 'u', value_name = "NAME")]
    username: Option<String>,
    /// Password
    #[arg(long, env = "RIPS_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl From<LoginOpts> for LoginArgs {
    fn from(opts: LoginOpts) -> Self {
        LoginArgs {
            username: opts.username,
            password: opts.password,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Upload an archive, wait for its scan and print the issues as JSON
    Scan {
        /// Source code archive (zip); its file name is the project name
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
        /// Give up after this many seconds (default: wait forever)
        #[arg(long, value_name = "SECS")]
        max_wait: Option<u64>,
        /// Seconds between two status polls
        #[arg(long, value_name = "SECS", default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
        #[command(flatten)]
        login: LoginOpts,
    },
    /// Check server connectivity and login
    Status {
        #[command(flatten)]
        login: LoginOpts,
    },
    /// Download the PDF report of a project
    Report {
        /// Project id
        #[arg(value_name = "PROJECT_ID")]
        project_id: u64,
        /// Output file
        #[arg(long, short = 'o', value_name = "FILE")]
        output: PathBuf,
        #[command(flatten)]
        login: LoginOpts,
    },
    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Change configuration values
    Set {
        /// API base URL
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
        /// Default username
        #[arg(long, value_name = "NAME")]
        username: Option<String>,
        /// File the session cookies are kept in
        #[arg(long, value_name = "FILE")]
        cookie_file: Option<PathBuf>,
        /// Additional trusted root certificate (PEM)
        #[arg(long, value_name = "FILE")]
        ca_certificate: Option<PathBuf>,
        /// Public suffix list (public_suffix_list.dat format)
        #[arg(long, value_name = "FILE")]
        public_suffix_list: Option<PathBuf>,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let exit_code = run_command(cli.command).await;
    std::process::exit(exit_code);
}

async fn run_command(command: Commands) -> i32 {
    use rips_api::exit_codes::*;

    match command {
        Commands::Scan {
            archive,
            max_wait,
            interval,
            login,
        } => {
            let args = commands::scan::ScanArgs {
                login: login.into(),
                archive,
                max_wait,
                interval,
            };
            match commands::scan::execute(args).await {
                Ok(exit_code) => exit_code,
                Err(e) => {
                    eprintln!("Scan error: {:#}", e);
                    EXIT_ERROR
                }
            }
        }
        Commands::Status { login } => match commands::status::execute(login.into()).await {
            Ok(exit_code) => exit_code,
            Err(e) => {
                eprintln!("Status error: {:#}", e);
                EXIT_ERROR
            }
        },
        Commands::Report {
            project_id,
            output,
            login,
        } => {
            let args = commands::report::ReportArgs {
                login: login.into(),
                project_id,
                output,
            };
            match commands::report::execute(args).await {
                Ok(exit_code) => exit_code,
                Err(e) => {
                    eprintln!("Report error: {:#}", e);
                    EXIT_ERROR
                }
            }
        }
        Commands::Config { command } => run_config_command(command),
    }
}

fn run_config_command(command: ConfigCommands) -> i32 {
    use rips_api::exit_codes::*;

    let result = match command {
        ConfigCommands::Show => commands::config::execute_show(),
        ConfigCommands::Set {
            base_url,
            username,
            cookie_file,
            ca_certificate,
            public_suffix_list,
            timeout,
        } => commands::config::execute_set(ConfigSetArgs {
            base_url,
            username,
            cookie_file,
            ca_certificate,
            public_suffix_list,
            timeout_secs: timeout,
        }),
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            EXIT_CONFIG_ERROR
        }
    }
}
