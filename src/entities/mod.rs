//! Normalized record model
//!
//! Plancache stores the following record types, keyed per project:
//!
//! - [`Drawing`] - drawing log sheets, indexed by drawing number
//! - [`Rfi`] - requests for information
//! - [`Commitment`] - subcontracts and purchase orders
//! - [`Specification`] - project manual sections
//!
//! Alongside them it keeps the [`TaxonomyMap`] lookup tables for disciplines
//! and divisions, plus per-project [`Favorites`] and a [`RecentsList`].

pub mod commitment;
pub mod drawing;
pub mod favorites;
pub mod rfi;
pub mod specification;
pub mod taxonomy;

pub use commitment::Commitment;
pub use drawing::Drawing;
pub use favorites::{FavoriteFolder, Favorites, FavoritesError, RecentsList, MAX_RECENTS};
pub use rfi::Rfi;
pub use specification::Specification;
pub use taxonomy::{DisciplineMap, DivisionMap, TaxonomyEntry, TaxonomyMap, UNSORTED_INDEX};
