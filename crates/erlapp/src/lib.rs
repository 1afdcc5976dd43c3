//! # erlapp Architecture
//!
//! erlapp holds the state and rules behind a layout-region field widget: an
//! editor composes a page region out of content items placed into named
//! regions of layout sections, with inline add/edit/remove and drag reorder.
//! It is a library first; the `erl` binary is just one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (editor.rs)                                         │
//! │  - Drag and drop, up/down moves, add controls               │
//! │  - Keeps hidden weight/region fields in step with the tree  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ FormSubmission
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Placement sync, then the triggering action               │
//! │  - Render projection and persistence on request             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Session transitions: add, edit, remove, save, sync       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collaborators (store/)                                     │
//! │  - EntityStore and LayoutRegistry traits, in-memory impls   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Deltas
//!
//! Items are identified by their position in the session list, their
//! `delta`. Every rendered control refers to items by the deltas of the render
//! it came from, which is why a submission is always synced before its action
//! runs and why removal leaves a tombstone instead of shifting the list.
//!
//! ## No I/O in the Core
//!
//! Nothing in this crate writes to stdout/stderr or touches the filesystem
//! except [`config::WidgetSettings::load`]. Diagnostics go through `tracing`.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade a host drives a widget through
//! - [`commands`]: Session transitions
//! - [`config`]: Widget settings
//! - [`editor`]: The client-side structural editor
//! - [`error`]: Error types
//! - [`model`]: Items, entities and layout plugins
//! - [`persist`]: Stored field values
//! - [`placement`]: The structural tree and its rules
//! - [`session`]: Per-form session state
//! - [`store`]: Entity storage and layout registry abstractions
//! - [`view`]: The render projection

pub mod api;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod persist;
pub mod placement;
pub mod session;
pub mod store;
pub mod view;
