use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use cardiorisk_cli::config::{self, CliConfig};
use cardiorisk_cli::render;
use cardiorisk_client::api::{ScoringApi, with_timeout};
use cardiorisk_client::error::{HistoryError, NO_SESSION_MESSAGE};
use cardiorisk_client::features::load_feature_schema;
use cardiorisk_client::history::HistoryAggregator;
use cardiorisk_client::http::HttpScoringClient;
use cardiorisk_client::session::SessionProvider;
use cardiorisk_client::store::FileStore;
use cardiorisk_client::workbench::{AttemptError, Workbench};
use cardiorisk_core::controls::FieldView;
use cardiorisk_core::error::FormError;
use cardiorisk_core::form::FormEngine;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Everything a command needs, built from the effective config.
struct Context {
    config: CliConfig,
    api: Arc<HttpScoringClient>,
    sessions: Arc<SessionProvider>,
}

impl Context {
    fn load() -> eyre::Result<Self> {
        let config = effective_config()?;
        let api = Arc::new(HttpScoringClient::new(&config.api_url, config.timeout()));
        let store = Arc::new(FileStore::new(config.resolved_store_path()?));
        let sessions = Arc::new(SessionProvider::open(store, &config.session_key)?);
        Ok(Self {
            config,
            api,
            sessions,
        })
    }

    fn history(&self) -> HistoryAggregator {
        HistoryAggregator::new(self.api.clone(), self.sessions.clone(), self.config.timeout())
    }
}

fn effective_config() -> eyre::Result<CliConfig> {
    config::load_config()?.with_overrides(|key| std::env::var(key).ok())
}

/// clap parser for `--value id=value`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got {raw:?}"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing field id in {raw:?}"));
    }
    Ok((id.to_string(), value.trim().to_string()))
}

pub async fn features() -> eyre::Result<()> {
    let ctx = Context::load()?;
    let schema = load_feature_schema(ctx.api.as_ref(), ctx.config.timeout())
        .await
        .map_err(|e| eyre::eyre!(e.user_message()))?;

    let form = FormEngine::new(Arc::new(schema));
    print!("{}", render::render_features(&form.field_views()));
    Ok(())
}

pub async fn predict(values: Vec<(String, String)>, no_prompt: bool) -> eyre::Result<()> {
    let ctx = Context::load()?;
    let mut bench = Workbench::start(ctx.api.clone(), ctx.sessions.clone(), ctx.config.timeout())
        .await
        .map_err(|e| eyre::eyre!(e.user_message()))?;

    for (id, value) in values {
        bench.form_mut().edit(&id, value)?;
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !no_prompt {
            prompt_open_fields(&mut bench, &mut input).await?;
        }

        match bench.submit().await {
            Ok(result) => {
                print!("{}", render::render_result(&result));
                return Ok(());
            }
            // Prompting again shows each field's error next to it.
            Err(AttemptError::Form(FormError::Invalid(errors))) if no_prompt => {
                for (id, message) in errors.iter() {
                    eprintln!("  {id}: {message}");
                }
                eyre::bail!("{} field(s) failed validation", errors.len());
            }
            Err(AttemptError::Form(FormError::Invalid(_))) => {}
            Err(AttemptError::Form(e)) => return Err(e.into()),
            Err(AttemptError::Submit(e)) => eyre::bail!(e.user_message()),
        }
    }
}

/// Ask for every field that is still empty or was rejected last time.
async fn prompt_open_fields(
    bench: &mut Workbench,
    input: &mut Lines<BufReader<Stdin>>,
) -> eyre::Result<()> {
    let open: Vec<FieldView> = bench
        .form()
        .field_views()
        .into_iter()
        .filter(|view| view.value.is_empty() || view.error.is_some())
        .collect();

    for view in open {
        if let Some(error) = &view.error {
            eprintln!("{error}");
        }
        print!("{}: ", render::field_prompt(&view));
        std::io::stdout().flush()?;

        let Some(line) = input.next_line().await? else {
            eyre::bail!("input closed before the form was complete");
        };
        bench.form_mut().edit(&view.id, line.trim())?;
    }
    Ok(())
}

pub async fn history() -> eyre::Result<()> {
    let ctx = Context::load()?;
    match ctx.history().load().await {
        Ok(history) => {
            print!("{}", render::render_history(&history));
            Ok(())
        }
        Err(e @ (HistoryError::NoSession | HistoryError::NoHistory)) => {
            println!("{}", e.user_message());
            Ok(())
        }
        Err(e) => eyre::bail!(e.user_message()),
    }
}

pub async fn export(dir: Option<PathBuf>) -> eyre::Result<()> {
    let ctx = Context::load()?;
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match ctx.history().export_to_dir(&dir).await {
        Some(path) => println!("Exported to {}", path.display()),
        None => eprintln!("warning: export failed; see logs for details"),
    }
    Ok(())
}

pub fn session() -> eyre::Result<()> {
    let ctx = Context::load()?;
    match ctx.sessions.current() {
        Some(session) => println!("{session}"),
        None => println!("{NO_SESSION_MESSAGE}"),
    }
    Ok(())
}

pub async fn health() -> eyre::Result<()> {
    let ctx = Context::load()?;
    let health = with_timeout(ctx.config.timeout(), ctx.api.health()).await?;

    println!("Service: {} ({})", health.status, ctx.api.base_url());
    println!("Model loaded:  {}", health.model_loaded);
    println!("Scaler loaded: {}", health.scaler_loaded);
    if !health.is_ready() {
        eyre::bail!("service is not ready to score");
    }
    Ok(())
}

pub fn config_show() -> eyre::Result<()> {
    let config = effective_config()?;
    println!("# {}", config::config_path()?.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    println!("# session store: {}", config.resolved_store_path()?.display());
    Ok(())
}

pub fn config_set_url(url: String) -> eyre::Result<()> {
    let mut config = config::load_config()?;
    config.api_url = url.trim().trim_end_matches('/').to_string();
    config::save_config(&config)?;
    println!("api_url = {}", config.api_url);
    Ok(())
}

pub fn config_reset() -> eyre::Result<()> {
    config::delete_config()?;
    println!("Configuration reset to defaults.");
    Ok(())
}
