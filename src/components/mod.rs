//! DOM widgets.
//!
//! - [`nav`] - marks the navigation link of the current page
//! - [`toast`] - toast notification stack

pub mod nav;
pub mod toast;

pub use toast::{Notifier, ToastHandle};
