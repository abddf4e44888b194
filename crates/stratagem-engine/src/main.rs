//! Numpad macro runner entry point.
//!
//! Loads the configuration, wires the platform hook, synthesizer and cue into
//! a [`MacroEngine`], and runs until Ctrl-C.
//!
//! ```text
//! main()
//!  └─ load config (first CLI argument, or the platform config file)
//!  └─ SlotTable + SharedSettings from config, built-in StratagemBook
//!  └─ MacroEngine::new(...)
//!       ├─ WH_KEYBOARD_LL hook thread   (enable)
//!       └─ playback tasks on this runtime
//!  └─ log PlaybackCompleted events until Ctrl-C, then disable
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stratagem_core::{SharedSettings, StratagemBook};
use stratagem_engine::application::lifecycle::EnginePorts;
use stratagem_engine::infrastructure::feedback::{platform_audio_cue, TracingStatusSink};
use stratagem_engine::infrastructure::key_synthesis::platform_synthesizer;
use stratagem_engine::infrastructure::keyboard_hook::platform_hook;
use stratagem_engine::infrastructure::storage::config;
use stratagem_engine::MacroEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => config::load_config_from(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => config::load_config().context("loading config")?,
    };

    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level)),
        )
        .init();

    info!("numpad macros starting");

    let book = Arc::new(StratagemBook::builtin());
    let slots = cfg
        .build_slot_table(book.as_ref())
        .context("building slot layout")?;
    let settings = cfg.engine_settings();
    info!(
        stratagems = book.len(),
        assigned = slots.assigned_count(),
        latency_ms = settings.latency_ms,
        scheme = settings.binding_scheme.as_str(),
        "configuration loaded"
    );

    let engine = MacroEngine::new(
        Handle::current(),
        EnginePorts {
            hook: platform_hook(),
            synthesizer: platform_synthesizer(),
            slots: Arc::new(slots),
            stratagems: book,
            settings: Arc::new(SharedSettings::new(settings)),
            audio: platform_audio_cue(),
            status: Arc::new(TracingStatusSink),
        },
    );

    let mut completed = engine.subscribe();
    tokio::spawn(async move {
        loop {
            match completed.recv().await {
                Ok(event) => info!(
                    playback_id = %event.playback_id,
                    key = %event.key_label,
                    steps = event.sequence.len(),
                    "{} played",
                    event.macro_name
                ),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "playback log lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    if cfg.engine.macros_enabled {
        engine.enable().context("enabling macro engine")?;
    } else {
        info!("macros disabled in config; set engine.macros_enabled = true to enable");
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;

    info!("shutting down");
    engine.disable();
    Ok(())
}
