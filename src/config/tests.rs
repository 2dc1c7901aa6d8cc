use super::*;
use clap::CommandFactory;

#[test]
fn defaults_apply_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.server.addr.to_string(), "127.0.0.1:8080");
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert_eq!(settings.logging.format, LogFormat::Compact);
    assert_eq!(settings.database.url, None);
    assert_eq!(settings.database.max_connections.get(), 8);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        logging: LoggingOverride {
            log_level: Some("debug".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    raw.apply_logging_override(&LoggingOverride {
        log_json: Some(true),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.logging.format, LogFormat::Json);
}

#[test]
fn blank_database_url_counts_as_unset() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.database.url, None);
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero port");
    assert!(matches!(err, LoadError::Invalid { key: "server.port", .. }));
}

#[test]
fn zero_pool_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.database.max_connections = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero pool");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "database.max_connections",
            ..
        }
    ));
}

#[test]
fn unknown_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "logging.level",
            ..
        })
    ));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["ataps"]);
    let command = args.command.unwrap_or_default();
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "ataps",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--server-port",
        "9000",
        "--database-url",
        "postgres://override",
    ]);

    match args.command.as_ref().expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(serve.overrides.server_port, Some(9000));
        }
        _ => panic!("wrong command parsed"),
    }
    assert_eq!(args.database.database_url.as_deref(), Some("postgres://override"));
}

#[test]
fn parse_query_arguments() {
    let args = CliArgs::parse_from([
        "ataps",
        "query",
        "--format",
        "csv",
        "--output",
        "/tmp/out.csv",
        "SELECT 1",
    ]);

    match args.command.expect("query command") {
        Command::Query(query) => {
            assert_eq!(query.format, "csv");
            assert_eq!(
                query.output.as_deref(),
                Some(std::path::Path::new("/tmp/out.csv"))
            );
            assert_eq!(query.query, "SELECT 1");
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn query_format_defaults_to_votable() {
    let args = CliArgs::parse_from(["ataps", "query", "SELECT 1"]);
    match args.command.expect("query command") {
        Command::Query(query) => assert_eq!(query.format, "votable"),
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn database_override_applies_without_subcommand() {
    let args = CliArgs::parse_from(["ataps", "--database-url", "postgres://bare/db"]);
    assert!(args.command.is_none());

    let mut raw = RawSettings::default();
    raw.apply_cli(&args);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.database.url.as_deref(), Some("postgres://bare/db"));
}

#[test]
fn database_url_reads_environment_at_top_level() {
    let command = CliArgs::command();
    let url = command
        .get_arguments()
        .find(|arg| arg.get_id() == "database_url")
        .expect("top-level database url argument");
    assert_eq!(url.get_env(), Some(std::ffi::OsStr::new("DATABASE_URL")));
    assert!(url.is_global_set());
}

#[test]
fn query_subcommand_accepts_database_flags() {
    let args = CliArgs::parse_from([
        "ataps",
        "query",
        "--database-url",
        "postgres://query/db",
        "--database-max-connections",
        "2",
        "SELECT 1",
    ]);

    let mut raw = RawSettings::default();
    raw.apply_cli(&args);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.database.url.as_deref(), Some("postgres://query/db"));
    assert_eq!(settings.database.max_connections.get(), 2);
}
