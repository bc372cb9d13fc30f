use std::sync::Arc;

use iptv_proto::{channel, config::Config, platform, routes::RouteTable, store::Store};
use iptv_tui::{app::App, epg::EpgClient, i18n::Translator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("iptv-grid.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("iptv-grid log: {}", log_path.display());
    tracing::info!("iptv-grid starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {:#}", e);
        Config::default()
    });

    // ── Startup route ────────────────────────────────────────────────────────
    let desktop_shell = platform::is_desktop_shell();
    let routes = RouteTable::compose(desktop_shell);
    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    match routes.resolve(&path) {
        Some(resolved) if resolved.view.shows_channel_grid() => {
            tracing::info!("route {} -> {:?} {:?}", path, resolved.view, resolved.params);
        }
        Some(resolved) => {
            tracing::info!(
                "route {} -> {:?} has no terminal view, showing the channel grid",
                path,
                resolved.view
            );
        }
        None => tracing::warn!("route {} did not resolve, showing the channel grid", path),
    }
    tracing::debug!("desktop shell: {}", desktop_shell);

    // ── Channels ─────────────────────────────────────────────────────────────
    let (channels, load_error) = match channel::load_channels_from_toml(&config.channels.channels_toml) {
        Ok(list) => {
            tracing::info!("loaded {} channels", list.len());
            (Some(list), None)
        }
        Err(e) => {
            tracing::warn!("{}", e);
            (None, Some(e.to_string()))
        }
    };

    // ── Translations ─────────────────────────────────────────────────────────
    let locale = config.i18n.locale.as_str();
    let translator = Translator::load(locale, &platform::config_dir().join("i18n"))
        .unwrap_or_else(|e| {
            tracing::warn!("{}; using bundled translations", e);
            Translator::embedded(locale)
        });

    // ── Store ────────────────────────────────────────────────────────────────
    let (store, handle, intents) = Store::new(Vec::new());
    tokio::spawn(store.run(intents));

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let epg = Arc::new(EpgClient::new(config.epg.base_url.clone()));
    let app = App::new(&config, handle, epg, translator, channels, load_error);
    app.run().await?;

    tracing::info!("iptv-grid exiting");
    Ok(())
}
