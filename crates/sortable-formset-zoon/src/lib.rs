//! Browser side of the sortable formset: implements the core crate's
//! DOM and network boundaries over zoon/web-sys, drives drag
//! reordering, and mounts one controller per declared container.
//!
//! Wire a page by marking each formset container with
//! `data-formset-type` (plus the optional `data-max-forms`,
//! `data-ajax-url`, `data-has-ghost-points`, `data-item-name`,
//! `data-display-name`, `data-delete-notify-url`) and calling
//! [`mount::mount_all`] once the document is in place.

pub use zoon;

pub mod dom;
pub mod mount;
pub mod net;
pub mod sortable;

pub use dom::BrowserDom;
pub use mount::{mount_all, unmount_all, MountedFormset, CONTAINER_SELECTOR};
pub use net::BrowserNet;
pub use sortable::{DragDriver, DragGuard, Html5Drag};
