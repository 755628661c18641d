use clap::Parser;
use moto2sprit::core::Storage;
use moto2sprit::utils::{logger, validation::Validate};
use moto2sprit::{feed_lines, CliConfig, ConversionPipeline, EtlEngine, LocalStorage};
use std::io::IsTerminal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.debug);
    if cli.debug {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }
    let config = cli.to_converter_config();

    let storage = LocalStorage::new(config.output_dir.clone());
    if let Err(e) = storage.prepare().await {
        tracing::error!("{}", e);
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if std::io::stdin().is_terminal() {
        tracing::info!("Application can read only from STDIN pipe");
        tracing::info!("Example of usage:");
        tracing::info!("$ cat file.csv | moto2sprit");
        return Ok(());
    }

    let stop_reader = CancellationToken::new();
    let stop_worker = CancellationToken::new();
    spawn_signal_listener(stop_reader.clone());

    let (pipeline, tx) = ConversionPipeline::new(storage, config, stop_worker.clone());
    let engine = EtlEngine::new(pipeline);
    let worker = tokio::spawn(async move { engine.run().await });

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let read_result = feed_lines(stdin, tx, stop_reader.clone()).await;
    stop_worker.cancel();

    let run_result = worker.await?;
    let outcome = match (read_result, run_result) {
        (Ok(queued), Ok(report)) => {
            tracing::debug!("Queued {} lines", queued);
            Ok(report)
        }
        (Err(e), _) => {
            tracing::error!("Reading STDIN failed: {}", e);
            Err(e)
        }
        (Ok(_), Err(e)) => {
            tracing::error!("Conversion failed: {}", e);
            Err(e)
        }
    };

    match outcome {
        Ok(report) => {
            for file in &report.files {
                tracing::info!("Output saved to: {} ({} rows)", file.path, file.rows);
            }
        }
        Err(e) => {
            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    if stop_reader.is_cancelled() {
        // an interrupted STDIN read still occupies a blocking thread
        std::process::exit(0);
    }
    Ok(())
}

fn spawn_signal_listener(stop: CancellationToken) {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::debug!("TERM or INT signal received.");
        stop.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!("Cannot listen for SIGTERM: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
