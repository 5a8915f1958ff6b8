use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use oag_client_bundle::source_root::derive_source_root;
use oag_client_bundle::{
    BundleOutcome, ModuleResolver, client_module_path, generate_client, select_resolver,
};
use oag_core::config::{self, CONFIG_FILE_NAME, OagConfig, ResolverKind};

#[derive(Parser)]
#[command(name = "oag", about = "Bundle standalone API clients into generated output", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the client package sources into <output>/client
    Bundle {
        /// Generated output directory (defaults to `output` from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Client package to bundle (defaults to `client.name` from config)
        #[arg(short, long)]
        module: Option<String>,

        /// Module resolution backend
        #[arg(long)]
        resolver: Option<ResolverArg>,
    },

    /// Print where a client package resolves and its source root
    Resolve {
        /// Client package identifier
        module: String,

        /// Module resolution backend
        #[arg(long)]
        resolver: Option<ResolverArg>,
    },

    /// Initialize a new oag configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResolverArg {
    Auto,
    Native,
    Node,
}

impl From<ResolverArg> for ResolverKind {
    fn from(arg: ResolverArg) -> Self {
        match arg {
            ResolverArg::Auto => ResolverKind::Auto,
            ResolverArg::Native => ResolverKind::Native,
            ResolverArg::Node => ResolverKind::Node,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bundle {
            output,
            module,
            resolver,
        } => cmd_bundle(output, module, resolver),

        Commands::Resolve { module, resolver } => cmd_resolve(module, resolver),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oag", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OagConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let cfg = config::load_config(&config_path)?;
    if cfg.is_some() {
        log::debug!("loaded {}", config_path.display());
    }
    Ok(cfg)
}

fn resolver_kind(cfg: &OagConfig, arg: Option<ResolverArg>) -> ResolverKind {
    arg.map(ResolverKind::from).unwrap_or(cfg.client.resolver)
}

fn cmd_bundle(
    output: Option<PathBuf>,
    module: Option<String>,
    resolver: Option<ResolverArg>,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let module = module.unwrap_or_else(|| cfg.client.name.clone());

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let resolver = select_resolver(resolver_kind(&cfg, resolver), &cwd);

    let outcome = generate_client(&cfg, &output, &module, &*resolver)
        .with_context(|| format!("failed to bundle client '{module}'"))?;

    match outcome {
        BundleOutcome::Skipped => {
            eprintln!(
                "Client bundling is disabled; generated code imports from '{}'.",
                client_module_path(&cfg)
            );
        }
        BundleOutcome::Bundled { dir, files } => {
            for file in &files {
                eprintln!("  wrote {}", file.display());
            }
            eprintln!(
                "Bundled {} into {} ({} files)",
                module,
                dir.display(),
                files.len()
            );
        }
    }
    Ok(())
}

fn cmd_resolve(module: String, resolver: Option<ResolverArg>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let resolver = select_resolver(resolver_kind(&cfg, resolver), &cwd);

    let (entry, source_root) = resolve_client(&*resolver, &module)?;
    println!("entry: {}", entry.display());
    println!("source: {}", source_root.display());
    Ok(())
}

/// Resolve `module` to its entry file and the source root bundling would copy from.
fn resolve_client(resolver: &dyn ModuleResolver, module: &str) -> Result<(PathBuf, PathBuf)> {
    let entry = resolver
        .resolve(module)
        .with_context(|| format!("failed to resolve '{module}'"))?;
    let source_root = derive_source_root(&entry)
        .with_context(|| format!("failed to locate sources of '{module}'"))?;
    Ok((entry, source_root))
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
