//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{course_site_slug, Course};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::ContentSubstrate;
use crate::infrastructure::{InfraError, SiteDocument};

/// Run the command selected on the command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see --help".to_string(),
        ));
    };

    match command {
        Commands::Scaffold {
            course_file,
            dry_run,
            format,
        } => cmd_scaffold(course_file, *dry_run, *format, cli.verbose),
        Commands::Slug { course_file } => cmd_slug(course_file),
        Commands::List => cmd_list(),
        Commands::Show { slug } => cmd_show(slug),
        Commands::Config { command } => cmd_config(command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn load_settings() -> CliResult<Settings> {
    Ok(Settings::load()?)
}

/// Read and validate a course record.
fn read_course(path: &Path) -> CliResult<Course> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read course {}", path.display()), e))?;
    let course = Course::from_toml(&content)?;
    debug!("read_course: {}", course.reference());
    Ok(course)
}

#[instrument]
fn cmd_scaffold(
    course_file: &Path,
    dry_run: bool,
    format: OutputFormat,
    verbose: bool,
) -> CliResult<()> {
    let course = read_course(course_file)?;
    let settings = load_settings()?;
    let container = if dry_run {
        ServiceContainer::dry_run(settings)?
    } else {
        ServiceContainer::new(settings)?
    };

    let builder = container.course_site_builder()?;
    let site = builder.create(&course)?;

    match format {
        OutputFormat::Tree => output::info(&output::site_tree(&site, verbose)),
        OutputFormat::Toml => {
            let document = SiteDocument::from_site(&site)?;
            output::info(&to_toml(&document)?);
        }
    }

    if dry_run {
        output::action("Dry run", "site not published");
        return Ok(());
    }
    container.store.publish(&site)?;
    output::success(&format!(
        "published {} ({} pages)",
        site.slug().unwrap_or_default(),
        site.page_count()
    ));
    Ok(())
}

fn cmd_slug(course_file: &Path) -> CliResult<()> {
    let course = read_course(course_file)?;
    output::info(&course_site_slug(&course));
    Ok(())
}

fn cmd_list() -> CliResult<()> {
    let container = ServiceContainer::new(load_settings()?)?;
    let slugs = container.store.list()?;
    if slugs.is_empty() {
        output::warning(&format!(
            "no sites in {}",
            container.store.sites_dir().display()
        ));
        return Ok(());
    }
    for slug in slugs {
        output::info(&slug);
    }
    Ok(())
}

fn cmd_show(slug: &str) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings()?)?;
    let document = container.store.load(slug)?;
    output::info(&to_toml(&document)?);
    Ok(())
}

fn cmd_config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings()?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let state = if path.exists() { "exists" } else { "not found" };
                output::header("Global config");
                output::detail(&format!("{} ({})", path.display(), state));
            }
            None => output::warning("cannot determine config directory"),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

fn to_toml(document: &SiteDocument) -> CliResult<String> {
    toml::to_string_pretty(document).map_err(|e| {
        CliError::Infra(InfraError::Format {
            message: format!("serialize site {}: {}", document.slug, e),
        })
    })
}
