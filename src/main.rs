use anyhow::Context;
use nyaya::{
    api::routes::create_router,
    cli::{
        init::{self, InitConfig, InitResult},
        output::Output,
        repl, Cli, Commands,
    },
    session::{ChatSession, SessionSettings},
    types::CortexModel,
    utils::{logging, toml_config::NyayaConfig},
    AppState,
};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Some(Commands::Init { path, force }) => {
            return match init::run(InitConfig { path, force }, &output) {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => anyhow::bail!(e),
            };
        }
        Some(Commands::Models) => {
            output.header("Models");
            for model in CortexModel::ALL {
                let marker = if model == CortexModel::default() {
                    " (default)"
                } else {
                    ""
                };
                output.list_item(&format!("{}{}", model, marker));
            }
            return Ok(());
        }
        Some(Commands::Config { full, validate }) => {
            return show_config(&cli.config, full, validate, &output);
        }
        _ => {}
    }

    let config = load_config(&cli.config, &output)?;
    let level = if cli.verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    logging::init(level, config.server.log_format);

    for warning in config.validate_with_warnings()? {
        tracing::warn!("{}", warning);
    }

    match cli.command {
        None => serve(config, None, None).await,
        Some(Commands::Serve { host, port }) => serve(config, host, port).await,
        Some(Commands::Chat { model, no_history }) => {
            let settings = SessionSettings {
                model: model.unwrap_or(config.generation.default_model),
                remember_history: config.chat.remember_history && !no_history,
            };
            let state = AppState::from_config(config)?;
            let pipeline = state.sessions.pipeline();
            let mut session = ChatSession::new("terminal", pipeline, settings);
            repl::run(&mut session, &output).await?;
            Ok(())
        }
        Some(Commands::Ask {
            question,
            model,
            json,
        }) => {
            let state = AppState::from_config(config)?;
            let id = state.sessions.create(model, Some(false));
            let outcome = state.sessions.ask(&id, &question).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&nyaya::types::AskResponse {
                        session_id: id,
                        is_error: outcome.is_error(),
                        retrieved: outcome.retrieved,
                        summarized_query: outcome.summarized_query,
                        turn: outcome.turn,
                    })?
                );
            } else {
                output.turn(&outcome.turn);
            }
            Ok(())
        }
        Some(Commands::Init { .. } | Commands::Models | Commands::Config { .. }) => Ok(()),
    }
}

fn load_config(path: &Path, output: &Output) -> anyhow::Result<NyayaConfig> {
    NyayaConfig::load(path)
        .inspect_err(|e| {
            output.error(&e.to_string());
            output.hint("Run 'nyaya-server init' to create a configuration file");
        })
        .with_context(|| format!("Failed to load {}", path.display()))
}

fn show_config(path: &Path, full: bool, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config = load_config(path, output)?;

    if validate {
        let warnings = config.validate_with_warnings()?;
        output.success("Configuration is valid");
        for warning in &warnings {
            output.warning(&warning.message);
        }
        return Ok(());
    }

    output.header("Configuration");
    output.kv("File", &path.display().to_string());
    output.kv(
        "Server",
        &format!("{}:{}", config.server.host, config.server.port),
    );
    output.kv("Account", &config.snowflake.account);
    output.kv("Endpoint", &config.snowflake.base_url());
    output.kv(
        "Search service",
        &format!(
            "{}.{}.{}",
            config.search.database, config.search.schema, config.search.service
        ),
    );
    output.kv("Default model", config.generation.default_model.as_str());

    if full {
        output.header("Full configuration");
        println!("{}", toml::to_string_pretty(&config)?);
    }

    Ok(())
}

async fn serve(
    mut config: NyayaConfig,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::from_config(config)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Nyaya listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
