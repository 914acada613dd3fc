mod cli;

use officepdf::{
    config::{self, Config, CreatePolicy},
    controller::{AddOutcome, Controller},
    display,
    prompt::TerminalPrompt,
    session::Session,
};
use officepdf_engine::{check_converter, locate_converter, ConversionRunner, LibreOfficeConverter};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "officepdf=debug,officepdf_engine=debug,officepdf_core=debug".to_string()
        } else {
            "officepdf=info,officepdf_engine=info,officepdf_core=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert {
            files,
            output,
            yes,
            no_create,
            all_files,
            timeout,
            json,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            apply_output_override(&mut config, output);
            if yes {
                config.output.create = CreatePolicy::Always;
            } else if no_create {
                config.output.create = CreatePolicy::Never;
            }
            if let Some(secs) = timeout {
                if secs == 0 {
                    anyhow::bail!("--timeout must be greater than 0");
                }
                config.converter.timeout_secs = secs;
            }
            convert_files(&config, &files, all_files, json)
        }
        Commands::Check => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            check(&config)
        }
        Commands::Session { output, all_files } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            apply_output_override(&mut config, output);
            run_session(&config, all_files)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::InitConfig { path, force } => {
            config::persist::save_config(&path, &Config::default(), force)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
        Commands::Version => {
            println!("officepdf {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn apply_output_override(config: &mut Config, output: Option<PathBuf>) {
    if let Some(dir) = output {
        config.output.dir = config::expand(&dir);
    }
}

/// Locate the converter and wrap it in a runner.
fn build_runner(config: &Config) -> officepdf_core::Result<ConversionRunner> {
    let program = locate_converter(&config.converter)?;
    tracing::debug!("Using converter {}", program.display());
    let converter = LibreOfficeConverter::from_config(program, &config.converter);
    Ok(ConversionRunner::new(Arc::new(converter)))
}

fn convert_files(config: &Config, files: &[PathBuf], all_files: bool, json: bool) -> Result<()> {
    let runner = build_runner(config)?;
    let mut controller = Controller::new(config, Some(runner));

    for file in files {
        match controller.add_file(file, all_files)? {
            AddOutcome::Added => {}
            AddOutcome::Duplicate => eprintln!("Skipping duplicate: {}", file.display()),
            AddOutcome::Unsupported => eprintln!(
                "Skipping {}: not an office document (use --all-files to include it)",
                file.display()
            ),
            AddOutcome::Missing => eprintln!("Skipping {}: no such file", file.display()),
        }
    }

    let rt = tokio::runtime::Runtime::new()?;
    let handle = {
        let _guard = rt.enter();
        controller.start_run(&TerminalPrompt)?
    };

    let summary = rt
        .block_on(controller.drive(handle, |_, event| {
            if json {
                println!("{}", display::json_line(event));
            } else if let Some(line) = display::event_line(event) {
                println!("{}", line);
            }
        }))
        .context("Conversion worker stopped before finishing")?;

    if !json {
        println!();
        println!("{}", display::headline(&summary));
        println!("{}", display::details(&summary));
    }

    Ok(())
}

fn check(config: &Config) -> Result<()> {
    println!("Checking converter...\n");

    let tool = check_converter(&config.converter);
    if !tool.available {
        println!("✗ {}", tool.name);
        println!();
        println!("{}", officepdf_core::error::INSTALL_GUIDANCE);
        anyhow::bail!("converter not found: {}", tool.name);
    }

    print!("✓ {}", tool.name);
    if let Some(ref version) = tool.version {
        print!(" ({})", version);
    }
    if let Some(ref path) = tool.path {
        print!(" - {}", path.display());
    }
    println!();
    println!("\nReady to convert files");

    Ok(())
}

fn run_session(config: &Config, all_files: bool) -> Result<()> {
    // A missing converter leaves the session usable for building the queue.
    let runner = build_runner(config)
        .map_err(|e| tracing::warn!("{}", e))
        .ok();
    let mut controller = Controller::new(config, runner);
    let rt = tokio::runtime::Runtime::new()?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Session::new(&mut controller, &rt, stdin.lock(), stdout.lock())
        .all_files(all_files)
        .run()?;

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Converter: {}", config.converter.binary);
    if let Some(ref path) = config.converter.path {
        println!("  Converter path: {}", path.display());
    }
    println!("  Timeout: {}s", config.converter.timeout_secs);
    println!("  Output folder: {}", config.output.dir.display());
    println!("  Create folder: {:?}", config.output.create);
    println!("  Extensions: {}", config.queue.extensions.join(", "));

    Ok(())
}
