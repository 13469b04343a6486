use serde_json::json;

use crate::cli::commands::RuleArgs;
use crate::cli::{finish, Context};
use crate::error::PearlError;
use crate::models::DateFormat;
use crate::output;
use crate::recurrence::preview::PreviewRequest;

/// Needs no database: the preview is computed from the flags alone, and
/// dates print as ISO since there are no settings to read.
pub fn run(start: Option<String>, rule: &RuleArgs, count: usize, bounded: bool, ctx: &Context) -> i32 {
    finish(run_inner(start, rule, count, bounded, ctx), ctx.json)
}

fn run_inner(
    start: Option<String>,
    rule: &RuleArgs,
    count: usize,
    bounded: bool,
    ctx: &Context,
) -> Result<i32, PearlError> {
    let preview = PreviewRequest {
        start,
        rule: rule.to_input()?,
        count: Some(count),
        bounded,
    }
    .run()?;

    if ctx.json {
        output::json::print_success(json!(preview));
    } else {
        match preview.summary {
            Some(ref summary) => println!("Rule: {summary}"),
            None => println!("No recurrence."),
        }
        if preview.dates.is_empty() {
            println!("Nothing to preview (needs a rule and a start date).");
        } else {
            output::text::print_dates("Occurrences", &preview.dates, DateFormat::Iso);
        }
    }
    Ok(0)
}
