//! `plancache recent` command - Recently opened drawings

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{print_structured, Session};
use crate::cli::GlobalOpts;
use crate::entities::MAX_RECENTS;

#[derive(Subcommand, Debug)]
pub enum RecentCommands {
    /// Record a drawing as just opened
    Touch {
        /// Drawing number
        num: String,
    },

    /// List recent drawings, most recent first
    List,
}

pub fn run(cmd: RecentCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.project(global)?;

    match cmd {
        RecentCommands::Touch { num } => {
            let num = num.trim();
            if num.is_empty() {
                return Err(miette::miette!("drawing number cannot be empty"));
            }
            let recents = session.cache.touch_recent(&project, num)?;
            if !global.quiet {
                println!(
                    "{} {} is now most recent ({} of {})",
                    style("✓").green(),
                    style(num).cyan(),
                    recents.len(),
                    MAX_RECENTS
                );
            }
        }
        RecentCommands::List => {
            let recents = session.cache.recents(&project)?;
            if print_structured(&recents, session.format(global))? {
                return Ok(());
            }
            for num in recents.as_slice() {
                println!("{}", num);
            }
        }
    }
    Ok(())
}
