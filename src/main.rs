//! Ecwid Images Downloader - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use ecwid_images_downloader::{
    api::{build_http_client, retrieve_public_token, EcwidApi},
    cli::Args,
    config::{validate_config, Config},
    download::{Pipeline, PipelineOptions},
    error::{exit_codes, Error, Result},
    fs::ensure_dir,
    output::{
        create_spinner, print_banner, print_config_summary, print_error, print_info,
        print_run_stats, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        tracing::debug!(
            "Configuration file not found: {}, using CLI arguments only",
            config_path.display()
        );
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&mut config)?;

    let download_dir = config.download_directory();
    ensure_dir(&download_dir)?;

    let client = build_http_client()?;
    let store_id = config.store.store_id;

    let token = match config.store.token.clone() {
        Some(token) => token,
        None => {
            print_info("No token provided, retrieving the public storefront token...");
            retrieve_public_token(&client, store_id)
                .await
                .ok_or(Error::TokenUnavailable(store_id))?
        }
    };

    let scope = config.scope();
    print_config_summary(
        &scope.to_string(),
        store_id,
        &token,
        &download_dir.display().to_string(),
        config.options.parallelism,
        config.options.use_combinations,
    );

    let api = EcwidApi::new(client.clone(), store_id, token)?;
    let cancel = CancellationToken::new();
    let pipeline = Pipeline::new(
        Arc::new(api),
        client,
        PipelineOptions::from_config(&config),
        cancel.clone(),
    );

    // Count the catalog
    let spinner = create_spinner("Counting catalog items...");
    let totals = pipeline.count_totals().await;
    spinner.finish_and_clear();
    let totals = totals?;

    if config.options.verbose {
        print_info(&format!(
            "Found {} products and {} categories",
            totals.products, totals.categories
        ));
    }

    tokio::spawn(cancel_on_shutdown_signal(cancel));

    let summary = pipeline.run(totals).await;
    if !summary.nothing_to_download {
        print_run_stats(&summary);
    }

    summary.into_result().map(|_| ())
}

/// Request cancellation on Ctrl-C or SIGTERM.
async fn cancel_on_shutdown_signal(cancel: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(terminate) => terminate,
            Err(e) => {
                tracing::debug!("Could not install SIGTERM handler: {}", e);
                wait_for_ctrl_c().await;
                return stop(&cancel);
            }
        };

        tokio::select! {
            _ = wait_for_ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;

    stop(&cancel);
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::debug!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn stop(cancel: &CancellationToken) {
    print_warning("Interrupted, finishing in-flight downloads...");
    cancel.cancel();
}
