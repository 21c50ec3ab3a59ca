use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use synctv_core::{
    bootstrap::{load_config, NotifyType, SysNotify},
    logging,
    service::{
        CachedUserDirectory, PlaybackService, RoomClockRegistry, SyncMessageBuilder,
        UsernameStore,
    },
};

#[derive(Parser, Debug)]
#[command(name = "synctv")]
#[command(about = "SyncTV room playback synchronization server", long_about = None)]
struct Args {
    /// Config file path (YAML or TOML)
    #[arg(long, short, env = "SYNCTV_CONFIG_PATH")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load configuration
    let config = load_config(args.config.as_deref())?;

    // 2. Initialize logging (guard flushes the file writer on drop)
    let _log_guard = logging::init_logging(&config.logging)?;
    info!("SyncTV starting...");

    // 3. Initialize services
    let users = UsernameStore::new();
    let directory = Arc::new(CachedUserDirectory::new(Arc::new(users), &config.users));
    let rooms = RoomClockRegistry::new();
    let playback = PlaybackService::new(
        rooms.clone(),
        SyncMessageBuilder::new(directory.clone()),
        config.playback.clone(),
    );
    info!(
        max_delay_seconds = config.playback.max_delay_seconds,
        "Playback service initialized"
    );

    // 4. Register lifecycle tasks
    let sys_notify = SysNotify::new(&config.lifecycle);
    {
        let rooms = rooms.clone();
        sys_notify.register(NotifyType::Exit, "close-rooms", move || {
            let rooms = rooms.clone();
            async move {
                info!(rooms = rooms.len(), "Closing room clocks");
                rooms.clear();
                anyhow::Ok(())
            }
        });
    }
    {
        let directory = directory.clone();
        let config_path = args.config.clone();
        sys_notify.register(NotifyType::Reload, "reload-config", move || {
            let directory = directory.clone();
            let config_path = config_path.clone();
            async move {
                let config = load_config(config_path.as_deref())?;
                directory.invalidate_all();
                warn!(
                    max_delay_seconds = config.playback.max_delay_seconds,
                    "Configuration re-read; playback and logging settings apply after restart"
                );
                anyhow::Ok(())
            }
        });
    }

    info!(rooms = playback.rooms().len(), "SyncTV ready, waiting for signals");

    // 5. Block until a termination signal has run the exit tasks
    sys_notify.wait().await?;

    info!("SyncTV stopped");
    Ok(())
}
