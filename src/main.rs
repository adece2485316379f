use clap::Parser;
use exhibitor_scout::{Exhibitors, ScrapeResponse, SessionEvent};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting extraction for URL: {}", args.url);

    let mut exhibitors = Exhibitors::new(&args.url, args.options());
    if let Some(path) = &args.config {
        exhibitors = match exhibitors.with_config_file(path) {
            Ok(exhibitors) => exhibitors,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        };
    }

    let start_time = std::time::Instant::now();
    let success = if args.stream {
        stream(exhibitors).await
    } else {
        respond(exhibitors).await
    };

    ::log::info!(
        "Extraction finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Print each event as one JSON line as it arrives
async fn stream(exhibitors: Exhibitors) -> bool {
    let mut rx = exhibitors.generate();
    let mut success = false;

    while let Some(event) = rx.recv().await {
        if let SessionEvent::Complete { count } = &event {
            ::log::info!("Extracted {} exhibitors", count);
            success = true;
        }
        print_json(&event);
        if event.is_terminal() {
            break;
        }
    }
    success
}

/// Print a single response once the session is done
async fn respond(exhibitors: Exhibitors) -> bool {
    let response = match exhibitors.collect().await {
        Ok(records) => {
            ::log::info!("Extracted {} exhibitors", records.len());
            ScrapeResponse::ok(records)
        }
        Err(e) => {
            ::log::error!("Extraction failed: {}", e);
            ScrapeResponse::failed(e.to_string())
        }
    };
    print_json(&response);
    response.success
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{}", line),
        Err(e) => ::log::error!("Failed to serialize output: {}", e),
    }
}
