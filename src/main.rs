/*
 *  main.rs
 *
 *  screend - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

#[cfg(unix)] // Only compile this block on Unix-like systems
use tokio::signal::unix::{signal, SignalKind}; // Import specific Unix signals

use screend::config::{self, Cli, Command, EngineConfig};
use screend::{Engine, ScreenFactory};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
///
/// Once a signal is caught it is logged and the function returns,
/// allowing for graceful shutdown.
#[cfg(unix)]
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received. Initiating graceful shutdown.");
    Ok(())
}

/// Sleep until no line carries temporary content any more
async fn wait_for_expiry(engine: &Engine, grace: std::time::Duration) {
    while let Some(deadline) = engine.last_expiry().await {
        tokio::time::sleep_until(deadline + grace * 2).await;
    }
}

/// Run the one-shot command given on the command line
async fn run_command(engine: &Engine, limits: &EngineConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Print { line: Some(line), duration: Some(secs), text } => {
            engine.set_line_temporary(&text, line, limits.clamp_message(secs)).await?;
        }
        Command::Print { line: Some(line), duration: None, text } => {
            engine.set_line(&text, line).await?;
        }
        Command::Print { line: None, duration, text } => {
            if duration.is_some() {
                warn!("Duration is not applicable when appending, ignored");
            }
            engine.append_line(&text).await?;
        }
        Command::Clear { line: Some(line) } => engine.clear_line(line).await?,
        Command::Clear { line: None } => engine.clear_all().await?,
        Command::Image { path, duration } => {
            let png = tokio::fs::read(&path).await?;
            match duration {
                Some(secs) => engine.display_image_temporary(&png, limits.clamp_image(secs)).await?,
                None => engine.display_image(&png).await?,
            }
        }
        Command::Show => {
            for (line, text) in engine.lines().await.iter().enumerate() {
                info!("line {}: {:?}", line, text);
            }
        }
    }
    Ok(())
}

#[tokio::main] // Requires the `tokio` runtime with `macros` and `rt-multi-thread` features
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli)?;

    if cli.dump_config {
        println!("{}", config::dump(&cfg)?);
        return Ok(());
    }

    // Initialize the logger with the appropriate level based on debug flag
    let level = if cli.debug { "debug" } else { cfg.log_level.as_deref().unwrap_or("info") };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let display = cfg.display.clone().unwrap_or_default();
    let limits = cfg.engine.clone().unwrap_or_default();
    let opener = ScreenFactory::opener_from_config(&display);
    let engine = Engine::connect(opener.as_ref(), &limits);

    if engine.is_connected().await {
        info!("Screen connected via {}", opener.describe());
    } else if let Some(reason) = engine.connection_error().await {
        warn!("Running without a screen: {}", reason);
    }

    if let Some(command) = cli.command.clone() {
        if let Err(e) = run_command(&engine, &limits, command).await {
            error!("Command failed: {}", e);
        }
    }

    if cli.once {
        tokio::select! {
            _ = signal_handler() => {}
            _ = wait_for_expiry(&engine, limits.grace()) => {
                info!("Temporary content expired, exiting.");
            }
        }
    } else if let Err(e) = signal_handler().await {
        error!("Signal handling failed: {}", e);
    }

    info!("Main application exiting. Clearing display.");
    engine.shutdown().await;

    Ok(())
}
