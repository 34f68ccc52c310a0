use crate::normalizer::VersionTag;
use anyhow::Result;
use chrono::Utc;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

pub struct Config {
    /// Graph root containing `pages/` and `assets/`.
    pub source_root: PathBuf,
    pub destination: PathBuf,
    pub template: PathBuf,
    pub version_tag: VersionTag,
    pub verbosity: u8,
    /// When set, `source_root` is ignored and the graph is cloned from here.
    #[cfg(feature = "git")]
    pub git_url: Option<String>,
    #[cfg(feature = "git")]
    pub git_branch: Option<String>,
}

impl Config {
    /// A config with the default version tag and no git source.
    pub fn new(source_root: PathBuf, destination: PathBuf, template: PathBuf) -> Self {
        Self {
            source_root,
            destination,
            template,
            version_tag: VersionTag::from_timestamp(Utc::now()),
            verbosity: 0,
            #[cfg(feature = "git")]
            git_url: None,
            #[cfg(feature = "git")]
            git_branch: None,
        }
    }
}

pub fn build_cli() -> Command {
    let cmd = Command::new("logseq2course")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Matias Hiltunen")
        .about("Reorganizes outline markdown pages and assets into a course directory tree")
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .help("Source directory containing the pages and assets")
                .required(true),
        )
        .arg(
            Arg::new("destination")
                .value_name("DESTINATION")
                .help("Destination directory for reorganized files (wiped first)")
                .required(true),
        )
        .arg(
            Arg::new("template")
                .value_name("TEMPLATE")
                .help("Template directory to populate the destination before processing")
                .required(true),
        )
        .arg(
            Arg::new("uid")
                .short('u')
                .long("uid")
                .value_name("TAG")
                .help("Version tag stamped on every document (defaults to a timestamp)")
                .num_args(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log output (-v debug, -vv trace)")
                .action(ArgAction::Count),
        );

    #[cfg(feature = "git")]
    let cmd = cmd
        .arg(
            Arg::new("git")
                .long("git")
                .help("Treat SOURCE as a git repository URL and clone it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("branch")
                .long("branch")
                .value_name("NAME")
                .help("Branch to check out when cloning with --git")
                .requires("git")
                .num_args(1),
        );

    cmd
}

pub fn parse_args() -> Result<Config> {
    config_from_matches(&build_cli().get_matches())
}

pub fn config_from_matches(matches: &ArgMatches) -> Result<Config> {
    let required = |id: &str| -> Result<String> {
        matches
            .get_one::<String>(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing argument: {id}"))
    };

    let source = required("source")?;
    let destination = PathBuf::from(required("destination")?);
    let template = PathBuf::from(required("template")?);

    let version_tag = matches
        .get_one::<String>("uid")
        .map(VersionTag::new)
        .unwrap_or_else(|| VersionTag::from_timestamp(Utc::now()));

    let verbosity = matches.get_count("verbose");

    #[cfg(feature = "git")]
    let (source_root, git_url) = if matches.get_flag("git") {
        (PathBuf::new(), Some(source))
    } else {
        (PathBuf::from(source), None)
    };
    #[cfg(not(feature = "git"))]
    let source_root = PathBuf::from(source);

    Ok(Config {
        source_root,
        destination,
        template,
        version_tag,
        verbosity,
        #[cfg(feature = "git")]
        git_url,
        #[cfg(feature = "git")]
        git_branch: matches.get_one::<String>("branch").cloned(),
    })
}
