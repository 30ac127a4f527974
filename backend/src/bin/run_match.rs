//! Run one matching round for a guild from the command line.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;

use clap::Parser;
use tokio::runtime::Builder;

use guild_matcher::MatcherSettings;
use guild_matcher::bootstrap::{build_match_service, init_tracing};
use guild_matcher::domain::{GuildId, MatchRunOutcome, NotificationOutcome, ScheduleOutcome};

/// `run-match` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "run-match",
    about = "Pair a guild's waiting candidates and record the new round",
    version
)]
struct CliArgs {
    /// Guild whose candidate pool is matched.
    #[arg(long = "guild-id", value_name = "id")]
    guild_id: String,
    /// Database connection URL. Falls back to `MATCHER_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    init_tracing();
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let guild_id = GuildId::new(args.guild_id)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    let mut settings = MatcherSettings::load_without_cli("run-match").map_err(io::Error::other)?;
    if args.database_url.is_some() {
        settings.database_url = args.database_url;
    }
    let config = settings.resolve().map_err(io::Error::other)?;

    let service = build_match_service(&config)
        .await
        .map_err(|error| io::Error::other(format!("wire matcher: {error}")))?;
    let outcome = service
        .run(&guild_id)
        .await
        .map_err(|error| io::Error::other(format!("match run failed: {error}")))?;

    for line in summary_lines(&outcome) {
        println!("{line}");
    }
    Ok(())
}

fn summary_lines(outcome: &MatchRunOutcome) -> Vec<String> {
    let mut lines = vec![
        format!("run_id={}", outcome.run_id),
        format!("guild_id={}", outcome.guild_id),
        format!("candidate_count={}", outcome.candidate_count),
        format!("pair_count={}", outcome.plan.pair_count()),
        format!(
            "trio={}",
            outcome
                .plan
                .trio()
                .map(|trio| format!("{}+{}", trio.anchor(), trio.joiner()))
                .unwrap_or_else(|| "none".to_owned())
        ),
        format!(
            "unpaired={}",
            outcome
                .plan
                .unpaired()
                .map(ToString::to_string)
                .unwrap_or_else(|| "none".to_owned())
        ),
        format!("deactivated_rows={}", outcome.round.deactivated),
        format!("inserted_rows={}", outcome.round.inserted),
    ];
    lines.push(match outcome.schedule {
        ScheduleOutcome::Advanced(update) => {
            format!("next_match_date={}", update.next_match_date.to_rfc3339())
        }
        ScheduleOutcome::MissingConfig => "next_match_date=unscheduled".to_owned(),
        ScheduleOutcome::InvalidFrequency { days } => {
            format!("next_match_date=unscheduled (frequency {days})")
        }
    });
    lines.push(match &outcome.notification {
        NotificationOutcome::Delivered { status } => format!("notification=delivered ({status})"),
        NotificationOutcome::Failed { message } => format!("notification=failed ({message})"),
        NotificationOutcome::Skipped => "notification=skipped".to_owned(),
    });
    lines
}
