//! Command line options for the spendwise binary.
//!
//! Every global option can also be set through an environment variable so
//! that the API URL and credential do not need to be repeated per command.

use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand, ValueEnum};

use crate::{
    Error,
    client::{ApiConfig, DEFAULT_TIMEOUT_MS},
    record::Credential,
    timezone::LocalTimezone,
};

/// A command line client for the spendwise expense tracking service.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The base URL of the expense service.
    #[arg(long, env = "SPENDWISE_API_URL")]
    pub api_url: String,

    /// How long to wait for the expense service before giving up, in milliseconds.
    #[arg(long, env = "SPENDWISE_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// The canonical name of the timezone used to decide which day a record
    /// falls on, e.g. "Pacific/Auckland".
    #[arg(long, env = "SPENDWISE_TIMEZONE", default_value = "UTC")]
    pub timezone: String,

    /// The credential printed by `log-in`.
    #[arg(long, env = "SPENDWISE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Where the monthly summary comes from.
    #[arg(long, value_enum, default_value_t = SummarySource::Server)]
    pub summary_source: SummarySource,

    /// Also write debug logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// The settings for [crate::ApiClient].
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            url: self.api_url.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    /// The configured timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the name is not in the timezone database.
    pub fn local_timezone(&self) -> Result<LocalTimezone, Error> {
        LocalTimezone::from_name(&self.timezone)
    }

    /// The configured credential.
    ///
    /// # Errors
    /// Returns [Error::MissingCredential] if no non-empty token was given.
    pub fn credential(&self) -> Result<Credential, Error> {
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(Credential::new(token)),
            _ => Err(Error::MissingCredential),
        }
    }
}

/// Where the spending summary of a month is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SummarySource {
    /// Ask the expense service for the summary alongside the records.
    #[default]
    Server,
    /// Compute the summary from the fetched records.
    Local,
}

/// The subcommands of the spendwise binary.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Show the expenses of a month.
    Report {
        /// The year to show, defaults to the current year.
        #[arg(long, requires = "month")]
        year: Option<i32>,

        /// The month to show as a number from 1 to 12, defaults to the current month.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
        month: Option<u8>,

        /// Only show this many of the largest categories.
        #[arg(long)]
        top: Option<usize>,

        /// Write the daily spending chart as ECharts JSON to this file.
        #[arg(long)]
        chart: Option<PathBuf>,
    },

    /// List the available categories.
    Categories,

    /// Record a new expense.
    Add {
        /// The amount spent, e.g. 12.50.
        amount: String,

        /// The name of the category.
        category: String,

        /// When the expense happened as "YYYY-MM-DD HH:MM" local time, defaults to now.
        #[arg(long)]
        at: Option<String>,
    },

    /// Record a new expense from a voice recording.
    AddAudio {
        /// The audio file to upload.
        path: PathBuf,
    },

    /// Create a new category.
    AddCategory {
        /// The category name.
        name: String,

        /// A single emoji for the category.
        emoji: String,
    },

    /// Log in and print the credential to set as SPENDWISE_TOKEN.
    LogIn {
        /// Your username.
        username: String,
    },

    /// Register a new user.
    SignUp {
        /// The username to register.
        username: String,
    },
}
