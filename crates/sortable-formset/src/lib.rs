//! Row-management core for Django-style sortable formsets.
//!
//! A formset is a server-rendered table of form rows whose field names
//! follow the `<stepPrefix>-<formIndex>-<fieldName>` convention, plus a
//! management input (`...TOTAL_FORMS`) the server reads on submit. This
//! crate owns the row bookkeeping: renumbering after drag reorder,
//! adding rows (template clone or server fetch), and deleting rows
//! (soft delete via the `DELETE` marker field, hard delete otherwise)
//! while keeping the management count in sync.
//!
//! The crate is browser-free. The DOM and the network are reached only
//! through the [`dom::FormsetDom`] and [`net::FormsetNet`] traits, so
//! the whole state machine runs natively under plain unit tests. The
//! `sortable-formset-zoon` crate supplies the real browser
//! implementations.

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod naming;
pub mod net;

pub use config::FormsetConfig;
pub use controller::FormsetController;
pub use dom::FormsetDom;
pub use error::FormsetError;
pub use net::{FetchRowError, FormsetNet, NewRowRequest, RowDeleteNotice};
