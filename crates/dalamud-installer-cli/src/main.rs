use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use dalamud_installer_core::session::{is_missing_config, InstallPaths, RunSummary, Session};
use dalamud_installer_core::settings::Settings;
use dalamud_installer_core::{InstallOutcome, InstallerError, MergeReport, Result};

mod args;
use args::{Cli, Commands, ConfigAction, Shell};

const DIR_ENV: &str = "DALAMUD_INSTALLER_DIR";
const LAUNCHER_DIR: &str = "XIVLauncher";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        None | Some(Commands::Install) => {
            handle_install(cli.settings, cli.dalamud_dir, cli.quiet)
        }
        Some(Commands::Config { action }) => {
            handle_config(action, cli.settings).map(|()| ExitCode::SUCCESS)
        }
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dalamud_installer={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn print_error(e: &InstallerError) {
    let chain = e.chain();
    eprintln!("{} {}", "[ERROR]".red().bold(), chain[0]);
    for (depth, cause) in chain.iter().enumerate().skip(1) {
        eprintln!("{}{} {}", "  ".repeat(depth), "caused by:".dimmed(), cause);
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "dalamud-installer", &mut io::stdout());
}

fn resolve_settings_path(cli_path: Option<PathBuf>) -> Result<PathBuf> {
    match cli_path {
        Some(path) => Ok(path),
        None => Settings::default_path(),
    }
}

fn resolve_dalamud_dir(cli_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = cli_dir {
        return Ok(dir);
    }

    if let Ok(dir) = std::env::var(DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    dirs::config_dir()
        .map(|d| d.join(LAUNCHER_DIR))
        .ok_or(InstallerError::HomeNotFound)
}

fn handle_config(action: ConfigAction, settings: Option<PathBuf>) -> Result<()> {
    let path = resolve_settings_path(settings)?;
    tracing::debug!(path = %path.display(), "Using settings file");

    match action {
        ConfigAction::Init => {
            if Settings::init(&path)? {
                println!("{} {}", "Initialized:".green(), path.display());
            } else {
                println!("{} {}", "Already exists:".yellow(), path.display());
            }
        }
        ConfigAction::Show => {
            let settings = Settings::load(&path)?;
            println!();
            println!("{} = {}", "official_repo".cyan(), settings.official_repo);
            println!("{} = {}", "repo_type_tag".cyan(), settings.repo_type_tag);
            println!("{} = {}", "bug_report_url".cyan(), settings.bug_report_url);
            println!(
                "{} = {}",
                "launcher_download_url".cyan(),
                settings.launcher_download_url
            );
            println!("{} = {}", "http.timeout_secs".cyan(), settings.http.timeout_secs);
            println!("{} = {}", "http.user_agent".cyan(), settings.http.user_agent);
            println!();
            println!("{}", "Plugins:".bold());
            for plugin in &settings.plugins {
                println!("  {} {}", plugin.name.green(), plugin.repo.dimmed());
            }
            println!();
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Add { name, repo } => {
            let mut settings = Settings::load(&path)?;
            settings.upsert_plugin(&name, &repo);
            settings.save(&path)?;
            println!("{} {} ({})", "Added:".green(), name, repo);
        }
        ConfigAction::Remove { name } => {
            let mut settings = Settings::load(&path)?;
            if !settings.remove_plugin(&name) {
                println!("{} {} is not in the install set", "[SKIP]".yellow(), name);
                return Ok(());
            }
            settings.save(&path)?;
            println!("{} {}", "Removed:".green(), name);
        }
    }

    Ok(())
}

fn handle_install(
    settings: Option<PathBuf>,
    dalamud_dir: Option<PathBuf>,
    quiet: bool,
) -> Result<ExitCode> {
    let settings_path = resolve_settings_path(settings)?;
    let launcher_dir = resolve_dalamud_dir(dalamud_dir)?;
    tracing::debug!(
        settings = %settings_path.display(),
        launcher = %launcher_dir.display(),
        "Resolved paths"
    );

    let settings = Settings::load(&settings_path)?;
    let paths = InstallPaths::from_launcher_dir(launcher_dir);
    let launcher_url = settings.launcher_download_url.clone();
    let bug_report_url = settings.bug_report_url.clone();

    let session = Session::new(settings, paths)?;

    if !quiet {
        println!();
        println!(
            "{} {}",
            "Dalamud config:".cyan(),
            session.paths().config_file.display()
        );
        println!(
            "{} {}",
            "Plugin folder: ".cyan(),
            session.paths().plugin_root.display()
        );
        println!();
    }

    let summary = match session.run() {
        Ok(summary) => summary,
        Err(e) => {
            if is_missing_config(&e) {
                eprintln!(
                    "{} Dalamud is not installed. Run XIVLauncher once, or download it from:",
                    "[HINT]".yellow().bold()
                );
                eprintln!("  {}", launcher_url);
            }
            return Err(e);
        }
    };

    if !quiet {
        print_merge(&summary.merge);
        print_plugins(&summary);
    }
    print_totals(&summary, &bug_report_url);

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_merge(report: &MergeReport) {
    println!("{}", "Repositories:".bold());
    if !report.changed() {
        println!("  {} already up to date", "[OK]".green());
    }
    for url in &report.normalized {
        println!("  {} {}", "[NORMALIZED]".cyan(), url);
    }
    for url in &report.force_enabled {
        println!("  {} {}", "[ENABLED]".green(), url);
    }
    for url in &report.duplicates_removed {
        println!("  {} {}", "[DUPLICATE]".yellow(), url);
    }
    for url in &report.added {
        println!("  {} {}", "[ADDED]".green(), url);
    }
    println!();
}

fn print_plugins(summary: &RunSummary) {
    for repo in &summary.repositories {
        if let Err(e) = &repo.result {
            let cause = e.chain().last().cloned().unwrap_or_default();
            println!("{} {} ({})", "[WARN]".yellow().bold(), repo.url, cause);
        }
    }

    println!("{}", "Plugins:".bold());
    for plugin in &summary.plugins {
        match &plugin.result {
            Ok(InstallOutcome::AlreadyInstalled { version, .. }) => {
                println!(
                    "  {} {} v{} already installed",
                    "[SKIP]".yellow(),
                    plugin.name,
                    version
                );
            }
            Ok(InstallOutcome::Installed(details)) => {
                println!(
                    "  {} {} v{} ({} files, {} bytes)",
                    "[OK]".green(),
                    plugin.name,
                    details.version,
                    details.files,
                    details.archive_size
                );
                println!("       {} {}", "sha256".dimmed(), details.sha256.dimmed());
            }
            Err(e) => {
                println!("  {} {}", "[FAILED]".red().bold(), plugin.name);
                for (depth, cause) in e.chain().iter().enumerate() {
                    println!("{}{}", "  ".repeat(depth + 2), cause);
                }
            }
        }
    }
    println!();
}

fn print_totals(summary: &RunSummary, bug_report_url: &str) {
    let line = format!(
        "{} downloads completed successfully, {} failed",
        summary.succeeded(),
        summary.failed()
    );

    if summary.is_success() {
        println!("{}", line.green());
        return;
    }

    println!("{}", line.red().bold());
    println!();
    println!("If this keeps happening, please report it at:");
    println!("  {}", bug_report_url);
}
