mod cli;

use framelift::{config, pipeline, state};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use framelift_av::probe;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "framelift=trace,framelift_av=trace".to_string()
        } else {
            "framelift=debug,framelift_av=debug".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Run { input, mode } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_file(&input, &mode, cli.config.as_deref()))
        }
        Commands::Probe { file, json } => probe_file(&file, json, cli.config.as_deref()),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("framelift {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run_file(
    input: &std::path::Path,
    mode: &str,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }
    if !pipeline::is_supported_input(input) {
        anyhow::bail!(
            "Unsupported input container: {:?} (expected one of {})",
            input,
            pipeline::SUPPORTED_EXTENSIONS.join(", ")
        );
    }

    let mode: pipeline::OutputMode = mode.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;

    tracing::info!("Processing file: {:?}", input);

    let (events, mut rx) = state::EventSink::channel();
    let orchestrator = pipeline::PipelineOrchestrator::new(Arc::new(config), events);
    let request = pipeline::PipelineRequest::new(input, mode);

    // The orchestrator owns the only sink, so the event stream closes
    // once the run is over.
    let worker = tokio::task::spawn_blocking(move || orchestrator.run(&request));

    let mut run_state = state::PipelineState::default();
    while let Some(event) = rx.recv().await {
        run_state.apply(&event);
        render_event(&event);
    }

    match worker.await? {
        Ok(output) => {
            println!("\nProcessing complete!");
            println!("Output: {:?}", output);
            Ok(())
        }
        Err(e) => {
            if let Some(stage) = run_state.current_stage {
                eprintln!("\nFailed during: {}", stage.label());
            }
            Err(e)
        }
    }
}

fn render_event(event: &state::PipelineEvent) {
    match event {
        state::PipelineEvent::Progress { percent, message } => {
            println!("[{:>3.0}%] {}", percent, message);
        }
        state::PipelineEvent::StageStatus { stage, status } => {
            if *status == state::StepStatus::Error {
                eprintln!("Stage failed: {}", stage.label());
            }
        }
        state::PipelineEvent::Finished { .. } | state::PipelineEvent::Failed { .. } => {}
    }
}

fn probe_file(
    file: &std::path::Path,
    json: bool,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let binaries = config.tool_resolver().resolve()?;
    let fps = probe::frame_rate(&framelift_av::SystemRunner, &binaries.ffprobe, file)?;

    if json {
        let value = serde_json::json!({
            "file": file.display().to_string(),
            "frame_rate": fps,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("File: {}", file.display());
        println!("Frame rate: {:.3} fps", fps);
    }

    Ok(())
}

fn check_tools(config_path: Option<&std::path::Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = config.tool_resolver().check()?;
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.tool);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        print!(" - {}", tool.path.display());
        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Place them in the binaries directory.");
    }

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Video bitrate: {}", config.encode.video_bitrate);
            match config.interpolation.threads {
                0 => println!("  Interpolation threads: auto"),
                n => println!("  Interpolation threads: {}", n),
            }
            println!("  Model: {}", config.interpolation.model);
            if let Some(ref dir) = config.output.dir {
                println!("  Output dir: {:?}", dir);
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Video bitrate: {}", config.encode.video_bitrate);
            println!("  Model: {}", config.interpolation.model);
        }
    }

    Ok(())
}
