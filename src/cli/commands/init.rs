//! `plancache init` command - Initialize a new workspace

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::{ProjectId, Workspace, WorkspaceError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Force initialization even if .plancache/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let workspace = if args.force {
        Workspace::init_force(&path)
    } else {
        Workspace::init(&path)
    };

    match workspace {
        Ok(workspace) => {
            if let Some(raw) = &global.project_id {
                let project: ProjectId = raw.parse().map_err(|e| miette::miette!("{}", e))?;
                set_default_project(&workspace, &project)?;
            }

            if !global.quiet {
                println!(
                    "{} Initialized plancache workspace at {}",
                    style("✓").green(),
                    style(workspace.root().display()).cyan()
                );
                println!();
                println!("Next steps:");
                println!(
                    "  {} Ingest a captured response",
                    style("plancache capture --url <URL> <FILE>").yellow()
                );
                println!(
                    "  {} Search drawings and RFIs",
                    style("plancache search <QUERY>").yellow()
                );
            }
            Ok(())
        }
        Err(WorkspaceError::AlreadyExists(path)) => {
            println!(
                "{} plancache workspace already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("plancache init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn set_default_project(workspace: &Workspace, project: &ProjectId) -> Result<()> {
    let path = workspace.config_path();
    let mut contents = std::fs::read_to_string(&path).into_diagnostic()?;
    // A JSON string literal is also a valid YAML scalar
    let quoted = serde_json::to_string(project.as_str()).into_diagnostic()?;
    contents.push_str(&format!("\ndefault_project: {}\n", quoted));
    std::fs::write(&path, contents).into_diagnostic()
}
