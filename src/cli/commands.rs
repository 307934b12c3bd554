//! Command dispatch
//!
//! Maps parsed CLI arguments onto services from the container and writes
//! their output to stdout.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::{
    NewItem, PackageRequest, ResultListBuilder, SetupRequest, SubtitleVariants, TextVariants,
};
use crate::cli::args::{Cli, Commands, ConfigCommands, ItemArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::XmlNode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Execute the parsed command against the given container.
pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    let project_dir = project_dir(cli)?;
    match &cli.command {
        Some(Commands::Date { format }) => cmd_date(container, format.as_deref()),
        Some(Commands::Item(args)) => cmd_item(container, args),
        Some(Commands::Package {
            name,
            source,
            config_dir,
            out_dir,
        }) => cmd_package(
            container,
            &project_dir,
            name,
            source.as_deref(),
            config_dir.as_deref(),
            out_dir.as_deref(),
        ),
        Some(Commands::Setup {
            user,
            repo,
            branch,
            dir,
            subdirectory,
        }) => cmd_setup(
            container,
            SetupRequest {
                user: user.clone(),
                repo: repo.clone(),
                branch: branch.clone(),
                dir: dir.clone(),
                subdirectory: subdirectory.clone(),
                cwd: project_dir,
            },
        ),
        Some(Commands::Config { command }) => cmd_config(container, command, &project_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "wfxml", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `wfxml --help`".to_string(),
        )),
    }
}

/// Resolve `-C` or fall back to the current directory.
pub fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("current directory", e))),
    }
}

fn print_xml(settings: &Settings, node: &XmlNode) -> CliResult<()> {
    let xml = if settings.xml_declaration {
        node.to_xml_document()
    } else {
        node.to_xml_string()
    }
    .map_err(|e| CliError::Infra(InfraError::Application(e.into())))?;
    output::info(&xml);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_date(container: &ServiceContainer, format: Option<&str>) -> CliResult<()> {
    let format = format.unwrap_or(&container.settings.format);
    let now = Local::now().fixed_offset();
    let node = container
        .date_service()
        .render(format, &now)
        .map_err(InfraError::from)?;
    print_xml(&container.settings, &node)
}

/// Result list with one item built from `args`.
pub fn build_item_list(container: &ServiceContainer, args: &ItemArgs) -> CliResult<ResultListBuilder> {
    let mut new = NewItem::new(&args.title, &args.icon);
    new.icon_type = args.icon_type;
    // With modifier variants the plain subtitle joins them, so one call adds all subtitles.
    if args.mod_subtitles.is_empty() {
        new.subtitle = args.subtitle.clone();
    }
    new.attrs.uid = args.uid.clone();
    new.attrs.arg = args.arg.clone();
    new.attrs.valid = args.valid.map(bool::from);
    new.attrs.autocomplete = args.autocomplete.clone();
    new.attrs.item_type = args.item_type.clone();

    let mut list = container.result_list().map_err(InfraError::from)?;
    let index = list.add_item(new).map_err(InfraError::from)?;

    if !args.mod_subtitles.is_empty() {
        let mut variants = args
            .mod_subtitles
            .iter()
            .fold(SubtitleVariants::new(), |v, (m, text)| v.modifier(*m, text));
        if let Some(plain) = &args.subtitle {
            variants = variants.subtitle(plain);
        }
        list.add_subtitle_variants(index, variants)
            .map_err(InfraError::from)?;
    }

    if args.copy.is_some() || args.largetype.is_some() {
        let mut texts = TextVariants::new();
        if let Some(copy) = &args.copy {
            texts = texts.copy(copy);
        }
        if let Some(large) = &args.largetype {
            texts = texts.largetype(large);
        }
        list.add_text(index, texts).map_err(InfraError::from)?;
    }

    debug!("build_item_list: {} items", list.len());
    Ok(list)
}

fn cmd_item(container: &ServiceContainer, args: &ItemArgs) -> CliResult<()> {
    let list = build_item_list(container, args)?;
    print_xml(&container.settings, &list.build())
}

#[instrument(skip(container))]
fn cmd_package(
    container: &ServiceContainer,
    project_dir: &Path,
    name: &str,
    source: Option<&Path>,
    config_dir: Option<&Path>,
    out_dir: Option<&Path>,
) -> CliResult<()> {
    let request = PackageRequest {
        name: name.to_string(),
        source_dir: source
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_dir.join(name)),
        config_dir: config_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_dir.join("config")),
        out_dir: out_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_dir.to_path_buf()),
    };
    let archive = container
        .package_service()
        .package(&request)
        .map_err(InfraError::from)?;
    output::action("Packaged", &archive.display());
    Ok(())
}

fn cmd_setup(container: &ServiceContainer, request: SetupRequest) -> CliResult<()> {
    output::header(&format!("setup {}/{}", request.user, request.repo));
    let repo_dir = container
        .repo_service()
        .setup(&request)
        .map_err(InfraError::from)?;
    output::success(&format!("ready: {}", repo_dir.display()));
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let text = container.settings.to_toml().map_err(InfraError::from)?;
            output::info(&text);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::warning("no global config directory on this platform"),
            }
            output::detail(&format!("local:  {}", local_config_path(project_dir).display()));
        }
    }
    Ok(())
}
