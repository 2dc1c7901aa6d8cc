use std::{process, sync::Arc};

use ataps::{
    application::{
        encode::{self, Payload},
        error::{AppError, TapError},
        query::QueryExecutor,
        sync::SyncService,
    },
    config::{self, Command, QueryArgs, Settings},
    infra::{
        db::PostgresExecutor,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tokio::io::AsyncWriteExt;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match cli_args.command.unwrap_or_default() {
        Command::Serve(_) => run_serve(settings).await,
        Command::Query(args) => run_query(settings, args).await,
    }
}

async fn connect_executor(settings: &Settings) -> Result<Arc<PostgresExecutor>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    let pool = PostgresExecutor::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;

    Ok(Arc::new(PostgresExecutor::new(pool)))
}

async fn run_serve(settings: Settings) -> Result<(), AppError> {
    let executor = connect_executor(&settings).await?;
    let state = HttpState {
        sync: SyncService::new(executor.clone()),
        db: executor,
    };
    let router = http::build_router(state);

    let addr = settings.server.addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| InfraError::bind(addr, err))?;

    info!(target = "ataps::serve", %addr, "listening");
    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_query(settings: Settings, args: QueryArgs) -> Result<(), AppError> {
    let executor = connect_executor(&settings).await?;

    info!(target = "ataps::query", format = %args.format, "running statement");
    let result = executor
        .execute(&args.query)
        .await
        .map_err(TapError::from)?;
    let payload = encode::dispatch(&result, &args.format)?;

    write_payload(&payload, args.output.as_deref()).await?;
    info!(
        target = "ataps::query",
        rows = result.len(),
        bytes = payload.len(),
        "statement written"
    );
    Ok(())
}

async fn write_payload(payload: &Payload, output: Option<&std::path::Path>) -> Result<(), AppError> {
    match output {
        Some(path) => tokio::fs::write(path, &payload.body)
            .await
            .map_err(InfraError::from)?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&payload.body)
                .await
                .map_err(InfraError::from)?;
            stdout.flush().await.map_err(InfraError::from)?;
        }
    }
    Ok(())
}
