//! Clap derive structures for the `moondash` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// moondash -- lunar food delivery from the command line
#[derive(Debug, Parser)]
#[command(
    name = "moondash",
    version,
    about = "Order, deliver, and dispatch lunar food from the command line",
    long_about = "Command-line client for a MoonDash backend.\n\n\
        Customers see outposts and their orders, drivers manage their rover\n\
        and deliveries, admins provision rovers for drivers.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL (overrides config file)
    #[arg(long, short = 'b', env = "MOONDASH_BACKEND_URL", global = true)]
    pub backend: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MOONDASH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MOONDASH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config file)
    #[arg(long, env = "MOONDASH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check backend reachability and show who is logged in
    Status,

    /// Log in with email and password
    Login(LoginArgs),

    /// Create a customer account and log in
    Signup(SignupArgs),

    /// End the current session
    Logout,

    /// Show the dashboard for the logged-in role
    #[command(alias = "dash", alias = "d")]
    Dashboard,

    /// Driver and admin rover operations
    Rover(RoverArgs),

    /// Print the admin console URL
    AdminUrl,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted if omitted)
    #[arg(long, env = "MOONDASH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Account email (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Display name (prompted if omitted)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Delivery address on the lunar surface (prompted if omitted)
    #[arg(long, short = 'a')]
    pub address: Option<String>,

    /// Password (prompted if omitted)
    #[arg(long, env = "MOONDASH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ROVERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RoverArgs {
    #[command(subcommand)]
    pub command: RoverCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoverCommand {
    /// Set your rover's status (drivers)
    Status {
        /// New status: idle, delivering, or charging
        status: String,
    },

    /// Create a rover for a driver (admins)
    Create {
        /// Rover name
        #[arg(long, short = 'n')]
        name: String,

        /// Operating driver, by id or email
        #[arg(long)]
        operator: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
