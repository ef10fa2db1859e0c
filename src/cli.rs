//! CLI flags and terminal styling shared by the binary.

use clap::Parser;

/// Runtime CLI configuration derived from the common flags.
#[derive(Debug, Clone)]
pub struct Cli {
    /// Verbosity level (0 = quiet, 1 = normal, 2 = verbose)
    pub verbosity: u8,
    /// Whether colors are enabled
    pub color: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Self { verbosity: 1, color: true }
    }
}

impl Cli {
    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == 0
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbosity >= 2
    }
}

/// Common flags that can be mixed into any command.
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CommonArgs {
    /// Convert to Cli config.
    pub fn to_cli(&self) -> Cli {
        let verbosity = if self.quiet {
            0
        } else if self.verbose {
            2
        } else {
            1
        };

        Cli { verbosity, color: !self.no_color }
    }
}

/// Terminal styling helpers.
pub mod styles {
    /// ANSI color codes for consistent styling.
    pub struct Colors;

    impl Colors {
        pub const RESET: &'static str = "\x1b[0m";
        pub const BOLD: &'static str = "\x1b[1m";
        pub const DIM: &'static str = "\x1b[2m";
        pub const RED: &'static str = "\x1b[31m";
        pub const GREEN: &'static str = "\x1b[32m";
        pub const BLUE: &'static str = "\x1b[34m";
    }

    /// Format a success message.
    pub fn success(msg: &str) -> String {
        format!("{}✓{} {}", Colors::GREEN, Colors::RESET, msg)
    }

    /// Format an error message.
    pub fn error(msg: &str) -> String {
        format!("{}✗{} {}", Colors::RED, Colors::RESET, msg)
    }

    /// Format an info message.
    pub fn info(msg: &str) -> String {
        format!("{}ℹ{} {}", Colors::BLUE, Colors::RESET, msg)
    }

    /// Format a header/title.
    pub fn header(msg: &str) -> String {
        format!("{}{}{}", Colors::BOLD, msg, Colors::RESET)
    }

    /// Format a dim/secondary message.
    pub fn dim(msg: &str) -> String {
        format!("{}{}{}", Colors::DIM, msg, Colors::RESET)
    }
}
