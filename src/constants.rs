//! Constants used throughout the crate
//!
//! This module centralizes the fixed strings other systems depend on
//! (build log lines, descriptor identifiers, configuration file names)
//! so they stay byte-for-byte stable.
//!
//! # Organization
//!
//! - **Build Log**: Lines written to the build's log stream
//! - **Descriptors**: Registry identifiers and display names
//! - **Configuration**: File names and keys of the job definition
//! - **Git LFS**: Arguments passed to the `git lfs` tool
//! - **Environment**: Environment variables read by the binary
//!
//! # Usage
//!
//! ```rust
//! use git_lfs_checkout::constants::{LOG_ENABLING_LFS_PULL, LFS_PULL_DISPLAY_NAME};
//!
//! assert_eq!(LOG_ENABLING_LFS_PULL, "Enabling Git LFS pull");
//! assert_eq!(LFS_PULL_DISPLAY_NAME, "Git LFS pull after checkout");
//! ```

use colored::*;

// Build Log
// Scraped by the surrounding build system; wording must not change.
pub const LOG_ENABLING_LFS_PULL: &str = "Enabling Git LFS pull";

// Descriptors
pub const LFS_PULL_ID: &str = "git-lfs-pull";
pub const LFS_PULL_DISPLAY_NAME: &str = "Git LFS pull after checkout";

// Configuration
pub const CONFIG_FILE_NAME: &str = ".lfs-checkout.toml";

// Git LFS
pub const GIT_COMMAND: &str = "git";
pub const LFS_SUBCOMMAND: &str = "lfs";
pub const LFS_PULL: &str = "pull";
pub const LFS_INCLUDE_FLAG: &str = "-I";
pub const LFS_EXCLUDE_FLAG: &str = "-X";

// Environment
pub const ENV_LOG_FILTER: &str = "LFS_CHECKOUT_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

// UI Formatting
pub const SEPARATOR_WIDTH: usize = 40;

// Rendering of an absent configuration value
pub const DISPLAY_NULL: &str = "null";

/// Creates a section header with title and separator
pub fn section_header(title: &str) -> String {
    let title_formatted = title.bright_cyan().bold();
    let separator = "=".repeat(SEPARATOR_WIDTH).bright_blue();
    format!("{title_formatted}\n{separator}")
}
