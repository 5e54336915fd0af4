//! `plancache fav` command - Favorite folders
//!
//! Folders are addressed by id or by (case-insensitive) name. Drawings are
//! addressed by drawing number and need not be cached yet.

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{now_ms, print_structured, Session};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::entities::Favorites;

#[derive(Subcommand, Debug)]
pub enum FavCommands {
    /// Create a folder
    New {
        /// Folder name
        name: String,
    },

    /// Rename a folder
    Rename {
        /// Folder id or name
        folder: String,
        /// New name
        name: String,
    },

    /// Delete a folder
    Delete {
        /// Folder id or name
        folder: String,
    },

    /// Add drawings to a folder
    Add {
        /// Folder id or name
        folder: String,
        /// Drawing numbers
        #[arg(required = true)]
        nums: Vec<String>,
    },

    /// Remove drawings from a folder
    Remove {
        /// Folder id or name
        folder: String,
        /// Drawing numbers
        #[arg(required = true)]
        nums: Vec<String>,
    },

    /// List folders, or the drawings of one folder
    List {
        /// Folder id or name
        folder: Option<String>,
    },
}

const FOLDER_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 30),
    ColumnDef::new("count", "DRAWINGS", 10),
];

pub fn run(cmd: FavCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.project(global)?;
    let mut favorites = session.cache.favorites(&project)?;

    let message = match cmd {
        FavCommands::List { folder } => {
            return list(&favorites, folder.as_deref(), &session, global);
        }
        FavCommands::New { name } => {
            let folder = favorites.create(&name, now_ms()).map_err(|e| miette::miette!("{}", e))?;
            format!(
                "Created folder {} {}",
                style(&folder.name).cyan(),
                style(format!("(id {})", folder.id)).dim()
            )
        }
        FavCommands::Rename { folder, name } => {
            favorites.rename(&folder, &name).map_err(|e| miette::miette!("{}", e))?;
            format!("Renamed folder to {}", style(&name).cyan())
        }
        FavCommands::Delete { folder } => {
            let removed = favorites.delete(&folder).map_err(|e| miette::miette!("{}", e))?;
            format!(
                "Deleted folder {} ({} drawing(s))",
                style(&removed.name).cyan(),
                removed.drawings.len()
            )
        }
        FavCommands::Add { folder, nums } => {
            let mut added = 0;
            for num in &nums {
                if favorites.add_drawing(&folder, num.trim()).map_err(|e| miette::miette!("{}", e))? {
                    added += 1;
                }
            }
            format!("Added {} drawing(s) to {}", style(added).cyan(), style(&folder).cyan())
        }
        FavCommands::Remove { folder, nums } => {
            let mut removed = 0;
            for num in &nums {
                if favorites.remove_drawing(&folder, num.trim()).map_err(|e| miette::miette!("{}", e))? {
                    removed += 1;
                }
            }
            format!("Removed {} drawing(s) from {}", style(removed).cyan(), style(&folder).cyan())
        }
    };

    session.cache.save_favorites(&project, &favorites)?;
    if !global.quiet {
        println!("{} {}", style("✓").green(), message);
    }
    Ok(())
}

fn list(favorites: &Favorites, folder: Option<&str>, session: &Session, global: &GlobalOpts) -> Result<()> {
    let format = session.format(global);

    if let Some(key) = folder {
        let folder = favorites
            .find(key)
            .ok_or_else(|| miette::miette!("no favorite folder matches '{}'", key))?;
        if print_structured(folder, format)? {
            return Ok(());
        }
        for num in &folder.drawings {
            println!("{}", num);
        }
        return Ok(());
    }

    if print_structured(favorites, format)? {
        return Ok(());
    }
    if favorites.is_empty() {
        if !global.quiet {
            println!("No favorite folders. Create one with {}", style("plancache fav new <NAME>").yellow());
        }
        return Ok(());
    }

    let rows: Vec<TableRow> = favorites
        .folders()
        .iter()
        .map(|f| {
            TableRow::new()
                .cell("id", CellValue::Id(f.id.to_string()))
                .cell("name", CellValue::Text(f.name.clone()))
                .cell("count", CellValue::Number(f.drawings.len() as i64))
        })
        .collect();
    TableFormatter::new(FOLDER_COLUMNS, "folder").output(&rows, format)
}
