use anyhow::Context;
use clap::Parser;
use secret_santa::core::matcher::CategorySummary;
use secret_santa::utils::error::SantaError;
use secret_santa::utils::logger;
use secret_santa::{
    AutoConfirm, CliConfig, Confirmer, LocalStorage, SantaEngine, SantaPipeline, Settings,
    TerminalConfirmer,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting secret-santa");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let input = match &cli.input {
        Some(path) => path.clone(),
        None => prompt_for_input().context("could not read the input file name")?,
    };

    let settings = match cli.into_settings(input) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    display_settings(&settings);

    let max_rounds = settings.max_rounds;
    let pipeline = SantaPipeline::new(LocalStorage::new(), settings);
    let engine = SantaEngine::new(pipeline, max_rounds);

    if cli.dry_run {
        tracing::info!("Dry run: participants are checked but not matched");
        match engine.inspect().await {
            Ok(summary) => {
                display_summary(&summary);
                if summary.iter().any(|c| c.blocker.is_some()) {
                    std::process::exit(2);
                }
                return Ok(());
            }
            Err(e) => exit_with(&e),
        }
    }

    let mut confirmer: Box<dyn Confirmer> = if cli.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(TerminalConfirmer::stdio())
    };

    match engine.run(confirmer.as_mut()).await {
        Ok(report) => {
            tracing::info!(
                "Matched {} participants in {} round(s)",
                report.participants,
                report.rounds
            );
            println!("\nMatches written to {}", report.output_path);
            if let Some(debug) = &report.debug_log_path {
                println!("Debug log written to {}", debug);
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn prompt_for_input() -> std::io::Result<PathBuf> {
    let mut stdout = std::io::stdout();
    write!(stdout, "Please enter the input file name: ")?;
    stdout.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}

fn display_settings(settings: &Settings) {
    tracing::info!("Input: {}", settings.input_path.display());
    tracing::info!("Output directory: {}", settings.output_dir.display());
    tracing::info!(
        "Strategy: {}, max retries: {}, max rounds: {}, format: {}",
        settings.strategy,
        settings.max_retries,
        settings.max_rounds,
        settings.output_format
    );
    if let Some(seed) = settings.seed {
        tracing::info!("Seed: {}", seed);
    }
}

fn display_summary(summary: &[CategorySummary]) {
    println!("Category summary:");
    for category in summary {
        println!(
            "  {}: {} participants, {} families (largest: {} with {})",
            category.category,
            category.participants,
            category.families,
            category.largest_family,
            category.largest_family_size
        );
        match &category.blocker {
            Some(reason) => println!("    cannot be matched: {}", reason),
            None => println!("    ok"),
        }
    }
}

fn exit_with(e: &SantaError) -> ! {
    tracing::error!(
        "secret-santa failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
