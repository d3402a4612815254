use anyhow::Result;
use binman::cli::{Cli, Commands};
use binman::commands::install::InstallOptions;
use binman::commands::list::ListOptions;
use binman::output::{self, Report};
use binman::registry::MatchMode;
use binman::{BinmanContext, commands};
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Usage errors share exit status 1 with every other failure
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.exit_code() == 0 { 0 } else { 1 };
            if let Err(io_err) = e.print() {
                eprintln!("{io_err}");
            }
            process::exit(code);
        }
    };
    init_logging(cli.verbose);
    output::configure_color();

    match run(cli) {
        Ok(report) if report.failed() => process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "binman=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<Report> {
    let mut report = Report::new();

    if let Commands::Completion { shell } = cli.command {
        print_completions(shell, &mut Cli::command());
        return Ok(report);
    }

    let ctx = BinmanContext::new()?;

    match cli.command {
        Commands::Path => commands::path::execute(&ctx),
        Commands::Install {
            programs,
            force,
            copy,
            move_,
            no_ext,
            rename,
        } => {
            let options = InstallOptions {
                force,
                copy,
                move_,
                no_ext,
                rename,
            };
            commands::install::execute(&ctx, &programs, &options, &mut report)?;
        }
        Commands::List {
            programs,
            path,
            long,
            direct,
            target,
            quiet,
        } => {
            let options = ListOptions {
                show_path: path,
                long,
                mode: MatchMode::from_flags(direct, target)?,
                quiet,
            };
            commands::list::execute(&ctx, &programs, options, &mut report)?;
        }
        Commands::Remove {
            programs,
            direct,
            target,
            quiet,
        } => {
            let mode = MatchMode::from_flags(direct, target)?;
            commands::remove::execute(&ctx, &programs, mode, quiet, &mut report)?;
        }
        Commands::Prune => commands::prune::execute(&ctx, &mut report)?,
        Commands::Doctor => commands::doctor::execute(&ctx, &mut report)?,
        Commands::Completion { .. } => {}
    }

    Ok(report)
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
