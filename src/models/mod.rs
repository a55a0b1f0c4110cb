//! Data models shared by the UI components.

mod toast;

pub use toast::{Severity, ToastPhase, ToastSpec, Treatment};
