// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![cfg_attr(not(test), deny(clippy::wildcard_imports))]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Fragment resource lifecycle and display synchronization for the water
//! atlas viewer.
//!
//! A fragment is one dinucleotide class and sequence, for example
//! `AA00`/`A_A`. Its bundle holds four structures (reference geometry and
//! base/step/phos water peaks) and three density maps (base/step/phos).
//! This crate downloads bundles, registers them with a [`Renderer`],
//! assigns each fragment a color palette and keeps the renderer's live
//! representations in step with the per-fragment display state.
//!
//! # Key entry points
//!
//! - [`sync::DisplaySynchronizer`] - load, add, remove and unload fragments
//!   and edit individual resources of displayed ones
//! - [`api::Api`] - synchronizer instances addressed by id
//! - [`renderer::Renderer`] - the seam to a viewer, with
//!   [`renderer::HeadlessRenderer`] as an in-memory implementation
//! - [`download::Fetcher`] - where bundle bytes come from
//! - [`options::Options`] - runtime configuration (links, colors, maps)
//!
//! # Lifecycle
//!
//! A fragment is absent, loaded (data registered, nothing drawn) or
//! displayed (loaded, with a [`state::FragmentState`]). Loading a fragment
//! is all-or-nothing: if any of its seven resources fails to download,
//! none is registered.
//!
//! [`Renderer`]: renderer::Renderer

pub mod api;
pub mod cache;
pub mod color;
pub mod download;
pub mod error;
pub mod iso;
pub mod options;
pub mod renderer;
pub mod resources;
pub mod state;
pub mod sync;

#[cfg(test)]
mod testing;

pub use api::Api;
pub use error::AtlasError;
pub use resources::{FragmentKey, ResourceKind, ResourceType};
pub use sync::DisplaySynchronizer;
