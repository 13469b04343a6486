use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::PearlError;
use crate::models::RuleInput;
use crate::recurrence::{Frequency, RecurrenceRecord, WeekDay};

#[derive(Parser)]
#[command(
    name = "pearl",
    version,
    about = "Personal task manager with recurrence previews and a month calendar",
    after_help = "\
NOTE:
  The database defaults to ./.pearl/pearl.db. Override with --db or PEARL_DB.
  Run `pearl init` before any other command.
  `pearl serve` reads host/port from config.json next to the database,
  then PEARL_HOST / PEARL_PORT, then --host / --port.

EXIT CODES:
  0  Success
  1  Error (validation, not found, database, etc.)

RECURRENCE:
  Rules describe how a task repeats; they are previewed, never expanded
  into extra tasks. Monthly and yearly steps clamp to the last day of a
  short month (Jan 31 + 1 month = Feb 28/29)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and default config
    Init,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show or change preferences
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Preview the dates a recurrence rule produces
    #[command(after_help = "\
NOTE:
  Prints the start date followed by --count occurrences.
  --ends is informational unless --bounded is given.
  `custom` rules have no unit and show the start date only.")]
    Preview {
        /// Anchor date (YYYY-MM-DD); defaults to --starts
        #[arg(long)]
        start: Option<String>,
        #[command(flatten)]
        rule: RuleArgs,
        /// Occurrences after the start date
        #[arg(long, default_value = "10")]
        count: usize,
        /// Stop at the rule's end date
        #[arg(long)]
        bounded: bool,
    },

    /// Month calendar of tasks by due date
    Calendar {
        /// Month to show (YYYY-MM); defaults to the current month
        #[arg(long)]
        month: Option<String>,
        /// First column, 0 = Sunday .. 6 = Saturday; defaults to settings
        #[arg(long)]
        start_of_week: Option<u8>,
    },

    /// Task statistics
    Stats,

    /// Run the REST API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// List tasks by due date
    List,
    /// Show task details and its next occurrences
    Show {
        /// Task ID
        id: String,
        /// Occurrences to preview for recurring tasks
        #[arg(long, default_value = "10")]
        count: usize,
    },
    /// Change task fields
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        #[command(flatten)]
        rule: RuleArgs,
        /// Remove the recurrence rule
        #[arg(long, conflicts_with = "repeat")]
        no_repeat: bool,
    },
    /// Mark a task completed
    Done { id: String },
    /// Mark a task not completed
    Undone { id: String },
    /// Delete a task
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show settings (defaults are created on first read)
    Show,
    /// Change one or more settings
    Set {
        /// light | dark | system
        #[arg(long)]
        theme: Option<String>,
        /// Language code, e.g. en
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        notifications: Option<bool>,
        /// tasks | calendar | statistics
        #[arg(long)]
        default_view: Option<String>,
        /// MM/DD/YYYY | DD/MM/YYYY | YYYY-MM-DD
        #[arg(long)]
        date_format: Option<String>,
        /// 12h | 24h
        #[arg(long)]
        time_format: Option<String>,
        /// 0 = Sunday .. 6 = Saturday
        #[arg(long, allow_negative_numbers = true)]
        start_day_of_week: Option<i64>,
    },
}

/// Recurrence flags shared by `task add`, `task update` and `preview`.
#[derive(Args, Clone, Debug, Default)]
pub struct RuleArgs {
    /// none | daily | weekly | monthly | yearly | custom
    #[arg(long, value_name = "FREQUENCY")]
    pub repeat: Option<String>,
    /// Repeat every N units
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub every: Option<i64>,
    /// Weekdays for weekly rules, e.g. MO,WE
    #[arg(long, value_name = "DAYS", value_delimiter = ',')]
    pub on: Vec<String>,
    /// Day of month for monthly rules (1-31)
    #[arg(long, allow_negative_numbers = true)]
    pub month_day: Option<i64>,
    /// Rule start date (YYYY-MM-DD)
    #[arg(long)]
    pub starts: Option<String>,
    /// Rule end date (YYYY-MM-DD)
    #[arg(long)]
    pub ends: Option<String>,
}

impl RuleArgs {
    /// Build a rule input from the flags. `None` when `--repeat` is absent.
    pub fn to_input(&self) -> Result<Option<RuleInput>, PearlError> {
        let Some(ref repeat) = self.repeat else {
            let dangling = self.every.is_some()
                || !self.on.is_empty()
                || self.month_day.is_some()
                || self.starts.is_some()
                || self.ends.is_some();
            if dangling {
                return Err(PearlError::validation(
                    "--every, --on, --month-day, --starts and --ends require --repeat",
                ));
            }
            return Ok(None);
        };

        let frequency = Frequency::from_str(&repeat.to_ascii_lowercase())
            .ok_or_else(|| PearlError::validation(format!("Unknown frequency: {repeat}")))?;
        let week_days = self
            .on
            .iter()
            .map(|code| {
                WeekDay::from_code(code)
                    .ok_or_else(|| PearlError::validation(format!("Unknown weekday code: {code}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut record = RecurrenceRecord::new(frequency);
        if let Some(every) = self.every {
            record.interval = every;
        }
        record.week_days = week_days;
        record.month_day = self.month_day;
        record.start_date = self.starts.clone();
        record.end_date = self.ends.clone();
        Ok(Some(RuleInput::Record(record)))
    }
}
