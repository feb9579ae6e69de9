//! om2m - oneM2M device client
//!
//! Registers a device with a oneM2M CSE, provisions its containers and
//! publishes telemetry from the command line.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use anyhow::{bail, Context};
use console::style;
use om2m_client::cli::{Cli, Commands};
use om2m_client::{ClientConfig, ConfigError, CseClient, CseOperationError, Outcome};
use tracing::debug;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

/// Main application entry point
fn run() -> i32 {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {err:#}", style("Error:").red().bold());
            exit_code(&err)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},hyper=error,reqwest=warn")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(if verbose { FmtSpan::CLOSE } else { FmtSpan::NONE })
                .event_format(fmt::format().compact().with_target(false).without_time()),
        )
        .init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<CseOperationError>() {
        err.exit_code()
    } else if let Some(err) = err.downcast_ref::<ConfigError>() {
        err.exit_code()
    } else {
        1
    }
}

/// Execute the requested command
fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;
    debug!("{config:#?}");

    if matches!(cli.command, Commands::Config) {
        print_config(&config);
        return Ok(());
    }

    let client = CseClient::new(config)?;

    match cli.command {
        Commands::Register => report("AE", client.register_ae()?),
        Commands::Container => report("Container", client.create_container()?),
        Commands::Descriptor => report("Descriptor", client.create_descriptor()?),
        Commands::Provision => {
            let provisioned = client.provision()?;
            report("AE", provisioned.ae);
            report("Container", provisioned.container);
            report("Descriptor", provisioned.descriptor);
        }
        Commands::Send { payload } => {
            let payload: serde_json::Value =
                serde_json::from_str(&payload).context("payload is not valid JSON")?;
            if !payload.is_object() {
                bail!("payload must be a JSON object");
            }
            let _ = client.send_data(&payload)?;
            println!("{} Data uploaded", style("✓").green());
        }
        Commands::Config => {}
    }

    Ok(())
}

fn report(resource: &str, outcome: Outcome) {
    match outcome {
        Outcome::Created => println!("{} {resource} created", style("✓").green()),
        Outcome::AlreadyExists => {
            println!("{} {resource} already exists", style("✓").green().dim());
        }
    }
}

fn print_config(config: &ClientConfig) {
    let endpoints = om2m_client::client::Endpoints::new(config);
    println!("{}", style("Configuration").bold());
    println!("  CSE:        {} ({})", config.cse_type.cse_id(), endpoints.base);
    println!("  Device:     {}", config.device_name);
    println!("  Container:  {}", config.container_name);
    println!("  Credential: {}", config.masked_credential());
    println!("  Names:      {:?}", config.name_style);
    println!("{}", style("Resources").bold());
    println!("  AE:         {}", endpoints.ae);
    println!("  Container:  {}", endpoints.container);
    println!("  Descriptor: {}", endpoints.descriptor);
}
