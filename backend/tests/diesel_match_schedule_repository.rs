//! `DieselMatchScheduleRepository` against embedded PostgreSQL, plus the
//! pool's `sslmode` handling against a server without TLS.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use guild_matcher::domain::ports::{
    MatchHistoryRepository, MatchHistoryRepositoryError, MatchScheduleRepository,
};
use guild_matcher::domain::{GuildId, MatchFrequency};
use guild_matcher::outbound::persistence::{
    DatabaseSslMode, DbPool, DieselMatchHistoryRepository, DieselMatchScheduleRepository,
    PoolConfig,
};
use pg_embedded_setup_unpriv::{TemporaryDatabase, TestCluster};
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use uuid::Uuid;

#[path = "support/pg_embed.rs"]
mod pg_embed;

use pg_embed::{create_bot_tables, format_postgres_error, handle_cluster_setup_failure, test_cluster};

struct TestContext {
    schedules: DieselMatchScheduleRepository,
    runtime: Runtime,
    database: TemporaryDatabase,
    _cluster: TestCluster,
}

impl TestContext {
    fn seed_schedule(&self, guild: &str, frequency: Option<i32>) {
        Client::connect(self.database.url(), NoTls)
            .and_then(|mut client| {
                client.execute(
                    r#"INSERT INTO "Match" ("dGuildId", "matchFrequency") VALUES ($1, $2)"#,
                    &[&guild, &frequency],
                )
            })
            .map_err(|err| format_postgres_error(&err))
            .expect("seed schedule row");
    }

    fn stored_dates(&self, guild: &str) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let row = Client::connect(self.database.url(), NoTls)
            .and_then(|mut client| {
                client.query_one(
                    r#"SELECT "lastMatchDate", "nextMatchDate" FROM "Match" WHERE "dGuildId" = $1"#,
                    &[&guild],
                )
            })
            .map_err(|err| format_postgres_error(&err))
            .expect("read schedule row");
        (row.get(0), row.get(1))
    }

    fn frequency(&self, guild: &str) -> Option<i32> {
        let guild = GuildId::new(guild).expect("valid guild");
        self.runtime
            .block_on(async { self.schedules.find_frequency_days(&guild).await })
            .expect("frequency lookup")
    }
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    let database = cluster
        .temporary_database(format!("schedules_{}", Uuid::new_v4().simple()))
        .map_err(|err| format!("{err:?}"))?;
    create_bot_tables(database.url())?;

    let config = PoolConfig::new(database.url())
        .with_max_size(2)
        .with_ssl_mode(Some(DatabaseSslMode::Prefer));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        schedules: DieselMatchScheduleRepository::new(pool),
        runtime,
        database,
        _cluster: cluster,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn frequency_is_read_per_guild(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: frequency_is_read_per_guild skipped");
        return;
    };

    context.seed_schedule("weekly", Some(7));
    context.seed_schedule("unset", None);

    assert_eq!(context.frequency("weekly"), Some(7));
    assert_eq!(context.frequency("unset"), None);
    assert_eq!(context.frequency("unknown"), None);
}

#[rstest]
fn recorded_schedule_is_stored(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: recorded_schedule_is_stored skipped");
        return;
    };

    context.seed_schedule("weekly", Some(7));
    let now = Utc
        .with_ymd_and_hms(2026, 10, 18, 18, 0, 0)
        .single()
        .expect("valid timestamp");
    let update = MatchFrequency::from_days(7)
        .expect("positive frequency")
        .advance_from(now);
    let guild = GuildId::new("weekly").expect("valid guild");

    context
        .runtime
        .block_on(async { context.schedules.record_schedule(&guild, &update).await })
        .expect("schedule recorded");

    assert_eq!(
        context.stored_dates("weekly"),
        (Some(update.last_match_date), Some(update.next_match_date))
    );
}

#[rstest]
fn missing_schedule_row_is_not_an_error(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: missing_schedule_row_is_not_an_error skipped");
        return;
    };

    let now = Utc::now();
    let update = MatchFrequency::from_days(1)
        .expect("positive frequency")
        .advance_from(now);
    let guild = GuildId::new("gone").expect("valid guild");

    let result = context
        .runtime
        .block_on(async { context.schedules.record_schedule(&guild, &update).await });

    assert!(result.is_ok());
}

#[rstest]
fn required_tls_is_refused_by_a_plain_server(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: required_tls_is_refused_by_a_plain_server skipped");
        return;
    };

    let config = PoolConfig::new(context.database.url())
        .with_max_size(1)
        .with_connection_timeout(Duration::from_secs(2))
        .with_ssl_mode(Some(DatabaseSslMode::Require));
    let guild = GuildId::new("weekly").expect("valid guild");

    let result = context.runtime.block_on(async {
        let pool = DbPool::new(config).await.expect("pool builds lazily");
        DieselMatchHistoryRepository::new(pool)
            .load_history(&guild)
            .await
    });

    assert!(matches!(
        result,
        Err(MatchHistoryRepositoryError::Connection { .. })
    ));
}
