use std::time::Duration;

use clap::Parser;
use inkpost::app_state::AppState;
use inkpost::http::setup_http_server;
use inkpost::init_telemetry::init_telemetry_and_tracing;
use inkpost::settings::config::Settings;
use tokio::time::sleep;
use tracing::info;

#[derive(Parser)]
#[command(name = "inkpost")]
#[command(about = "REST backend for a small blogging platform")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Start the inkpost server (default)
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local overrides first, dotenvy never overwrites a variable already set
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Config => {
            let app_state = AppState::new_for_config_only().await?;
            println!("{:#?}", &app_state.settings);
            return Ok(());
        }
        Commands::Run => {}
    }

    let settings = Settings::new()?;
    let telemetry_enabled = settings.traces_enabled();
    init_telemetry_and_tracing(telemetry_enabled)?;

    let app_state = AppState::new(settings).await?;
    let mut handles = vec![];

    {
        let handle = setup_http_server(
            app_state.clone(),
            &app_state.settings.api.bind_address,
            telemetry_enabled,
        )
        .await?;
        handles.push(handle);
    }

    sleep(Duration::from_millis(100)).await;

    loop {
        handles.retain(|handle| !handle.is_finished());

        if handles.is_empty() {
            info!("All tasks are done");
            break;
        }

        sleep(Duration::from_millis(200)).await;
    }

    Ok(())
}
