use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use release_check::{checks, config, ConfigOverrides};
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(
    name = "release-check",
    version,
    about = "Verify that the declared version is ready to be released"
)]
struct Args {
    #[arg(
        short = 'C',
        long,
        env = "RELEASE_CHECK_PROJECT_DIR",
        default_value = ".",
        help = "Project root directory"
    )]
    project_dir: PathBuf,

    #[arg(
        short,
        long,
        env = "RELEASE_CHECK_CONFIG",
        help = "Custom configuration file path, relative to the working directory"
    )]
    config: Option<PathBuf>,

    #[arg(long, env = "RELEASE_CHECK_PROJECT", help = "Project name on the package index")]
    project: Option<String>,

    #[arg(long, env = "RELEASE_CHECK_VERSION_FILE", help = "File declaring version and root_version")]
    version_file: Option<PathBuf>,

    #[arg(long, env = "RELEASE_CHECK_CHANGELOG", help = "Changelog that must mention the version")]
    changelog: Option<PathBuf>,

    #[arg(
        long,
        env = "RELEASE_CHECK_ROOT_VERSION_COMMAND",
        help = "Command printing the actual root version"
    )]
    root_version_command: Option<String>,

    #[arg(long, env = "RELEASE_CHECK_TAG_PREFIX", help = "Prefix of release tags")]
    tag_prefix: Option<String>,

    #[arg(
        long,
        env = "RELEASE_CHECK_INDEX_URL",
        help = "Package index JSON URL, {project} is substituted"
    )]
    index_url: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            project: self.project.clone(),
            version_file: self.version_file.clone(),
            changelog: self.changelog.clone(),
            root_version_command: self
                .root_version_command
                .as_deref()
                .map(|cmd| cmd.split_whitespace().map(str::to_string).collect()),
            tag_prefix: self.tag_prefix.clone(),
            index_url: self.index_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = config::load_settings(&args.project_dir, args.config.as_deref(), args.overrides())
        .context("Failed to load release-check configuration")?;

    info!("Checking release of {} in {:?}", settings.project, settings.project_dir);

    let mut stdout = std::io::stdout();
    match checks::run(&settings, &mut stdout).await {
        Ok(report) => {
            info!("{} {} is ready for release", settings.project, report.declared);
            Ok(())
        }
        Err(e) => {
            error!("Release check failed: {}", e);
            Err(e).context(format!("{} is not ready for release", settings.project))
        }
    }
}
