//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// minstall - local repository artifact installer
///
/// Installs pre-built artifacts into a local Maven-layout repository.
#[derive(Parser, Debug)]
#[command(
    name = "minstall",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install pre-built artifacts into a local Maven-layout repository",
    long_about = "minstall copies a build's artifacts (jars, poms, classified attachments) \
                  into the local artifact repository, addressed by \
                  groupId:artifactId:version[:classifier] coordinates.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  minstall install\n    \
                  minstall install --file target/app-1.0.jar\n    \
                  minstall install-file --file lib.jar --group-id com.x --artifact-id lib --version 1.0 --packaging jar\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://github.com/minstall/minstall"
)]
pub struct Cli {
    /// Local repository directory (defaults to ~/.m2/repository)
    #[arg(long, short = 'r', global = true)]
    pub local_repository: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a built module (POM, main artifact, attachments)
    Install(InstallArgs),

    /// Install a standalone file under explicit coordinates
    InstallFile(InstallFileArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install the module in the current directory:\n    minstall install --file target/app-1.0.jar\n\n\
                  Install a pom-packaged module:\n    minstall install --pom pom.xml\n\n\
                  Install with attachments:\n    minstall install --file target/app-1.0.jar --attach sources=target/app-1.0-sources.jar\n\n\
                  Defer installation to the end of the build:\n    minstall install --file target/app-1.0.jar --install-at-end\n\n\
                  Skip installation:\n    minstall install --skip")]
pub struct InstallArgs {
    /// Project descriptor to install (defaults to ./pom.xml)
    #[arg(long, default_value = "pom.xml")]
    pub pom: PathBuf,

    /// Main artifact file produced by the build
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Attached artifact as classifier[:extension]=path (extension defaults to jar)
    #[arg(long = "attach", value_name = "SPEC")]
    pub attach: Vec<String>,

    /// Bypass artifact installation entirely
    #[arg(long)]
    pub skip: bool,

    /// Defer the store call until every module of the build has reported
    #[arg(long)]
    pub install_at_end: bool,

    /// Install the POM and attachments even without a main artifact file
    #[arg(long)]
    pub allow_incomplete: bool,
}

/// Arguments for the install-file command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install a plain jar:\n    minstall install-file --file lib.jar --group-id com.x --artifact-id lib --version 1.0 --packaging jar\n\n\
                  Take coordinates from the jar's embedded POM:\n    minstall install-file --file lib.jar\n\n\
                  Install with an explicit POM:\n    minstall install-file --file lib.jar --pom-file lib.pom\n\n\
                  Force a generated POM:\n    minstall install-file --file lib.jar --group-id com.x --artifact-id lib --version 1.0 --packaging jar --generate-pom\n\n\
                  Install sources and javadoc alongside:\n    minstall install-file --file lib.jar --sources lib-sources.jar --javadoc lib-javadoc.jar")]
pub struct InstallFileArgs {
    /// The file to install in the local repository
    #[arg(long, required = true)]
    pub file: PathBuf,

    /// GroupId of the artifact; taken from the POM if one is found
    #[arg(long)]
    pub group_id: Option<String>,

    /// ArtifactId of the artifact; taken from the POM if one is found
    #[arg(long)]
    pub artifact_id: Option<String>,

    /// Version of the artifact; taken from the POM if one is found
    #[arg(long)]
    pub version: Option<String>,

    /// Packaging type (e.g. jar, war, pom); taken from the POM if one is found
    #[arg(long)]
    pub packaging: Option<String>,

    /// Classifier such as "sources" or "javadoc"; defaults to none
    #[arg(long)]
    pub classifier: Option<String>,

    /// Existing POM file to install alongside the main artifact
    #[arg(long)]
    pub pom_file: Option<PathBuf>,

    /// Bundled sources jar for the artifact
    #[arg(long)]
    pub sources: Option<PathBuf>,

    /// Bundled API docs jar for the artifact
    #[arg(long)]
    pub javadoc: Option<PathBuf>,

    /// Generate a minimal POM; without a value defaults to true.
    /// Unset, a POM is generated only if the local repository has none yet.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub generate_pom: Option<bool>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    minstall completions --shell bash > ~/.bash_completion.d/minstall\n\n\
                  Generate zsh completions:\n    minstall completions --shell zsh > ~/.zfunc/_minstall")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_install_defaults() {
        let cli = Cli::try_parse_from(["minstall", "install"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.pom, PathBuf::from("pom.xml"));
                assert!(args.file.is_none());
                assert!(!args.skip);
                assert!(!args.install_at_end);
                assert!(!args.allow_incomplete);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_install_with_attachments() {
        let cli = Cli::try_parse_from([
            "minstall",
            "install",
            "--file",
            "target/app-1.0.jar",
            "--attach",
            "sources=target/app-1.0-sources.jar",
            "--attach",
            "javadoc=target/app-1.0-javadoc.jar",
        ])
        .unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.file, Some(PathBuf::from("target/app-1.0.jar")));
                assert_eq!(args.attach.len(), 2);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_install_file() {
        let cli = Cli::try_parse_from([
            "minstall",
            "install-file",
            "--file",
            "lib.jar",
            "--group-id",
            "com.x",
            "--artifact-id",
            "lib",
            "--version",
            "1.0",
            "--packaging",
            "jar",
        ])
        .unwrap();
        match cli.command {
            Commands::InstallFile(args) => {
                assert_eq!(args.file, PathBuf::from("lib.jar"));
                assert_eq!(args.group_id.as_deref(), Some("com.x"));
                assert_eq!(args.packaging.as_deref(), Some("jar"));
                assert!(args.generate_pom.is_none());
            }
            _ => panic!("Expected InstallFile command"),
        }
    }

    #[test]
    fn test_cli_parsing_install_file_requires_file() {
        let result = Cli::try_parse_from(["minstall", "install-file"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parsing_generate_pom_flag_forms() {
        let cli = Cli::try_parse_from([
            "minstall",
            "install-file",
            "--file",
            "lib.jar",
            "--generate-pom",
        ])
        .unwrap();
        match cli.command {
            Commands::InstallFile(args) => assert_eq!(args.generate_pom, Some(true)),
            _ => panic!("Expected InstallFile command"),
        }

        let cli = Cli::try_parse_from([
            "minstall",
            "install-file",
            "--file",
            "lib.jar",
            "--generate-pom",
            "false",
        ])
        .unwrap();
        match cli.command {
            Commands::InstallFile(args) => assert_eq!(args.generate_pom, Some(false)),
            _ => panic!("Expected InstallFile command"),
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli =
            Cli::try_parse_from(["minstall", "-v", "-r", "/tmp/repo", "install"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.local_repository, Some(PathBuf::from("/tmp/repo")));
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["minstall", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["minstall", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "zsh"),
            _ => panic!("Expected Completions command"),
        }
    }
}
