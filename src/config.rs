//! Application configuration.
//!
//! Centralizes all configuration constants shared by the page helpers.

// =============================================================================
// Network Configuration
// =============================================================================

/// Fixed API root every endpoint is appended to.
pub const API_BASE: &str = "/api/v1";

/// Header name sent with every request unless the caller overrides it.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Default value for [`CONTENT_TYPE_HEADER`].
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// Logging
// =============================================================================

/// Console log level installed at startup.
pub const LOG_LEVEL: log::Level = log::Level::Info;

// =============================================================================
// Navigation
// =============================================================================

/// Navigation highlighting configuration.
pub mod nav {
    /// Selector for the navigation anchors to scan.
    pub const LINK_SELECTOR: &str = ".navbar-links a";
    /// Class toggled on the anchor matching the current page.
    pub const ACTIVE_CLASS: &str = "active";
    /// Document name assumed when the URL path has no file segment.
    pub const INDEX_DOCUMENT: &str = "index.html";
}

// =============================================================================
// Toast Notifications
// =============================================================================

/// Toast notifier configuration.
pub mod toast {
    /// Element id of the singleton toast stack.
    pub const CONTAINER_ID: &str = "toast-container";

    /// How long a toast stays on screen before it starts fading out.
    pub const DEFAULT_DURATION_MS: u32 = 3500;

    /// Entrance animation length.
    pub const ENTER_MS: u32 = 300;

    /// Exit animation length; the element is detached once it elapses.
    pub const EXIT_MS: u32 = 300;

    /// Inline style of the stack container.
    pub const CONTAINER_STYLE: &str = "position:fixed;bottom:1.5rem;right:1.5rem;z-index:9999;\
         display:flex;flex-direction:column;gap:.5rem;";

    /// Inline style shared by every toast element.
    pub const TOAST_STYLE: &str = "padding:.75rem 1.25rem;border-radius:10px;font-size:.875rem;\
         font-weight:500;box-shadow:0 4px 16px rgba(0,0,0,.15);max-width:320px;\
         display:flex;align-items:center;gap:.5rem;";

    /// Inline style of the glyph span.
    pub const GLYPH_STYLE: &str = "font-size:1rem";

    /// Keyframes injected next to the container.
    pub const KEYFRAMES: &str = "@keyframes slideToast{from{opacity:0;transform:translateX(20px)}\
         to{opacity:1;transform:none}} \
         @keyframes fadeOut{to{opacity:0;transform:translateX(20px)}}";

    /// Entrance animation shorthand.
    pub const ENTER_ANIMATION: &str = "slideToast .3s ease";

    /// Exit animation shorthand.
    pub const EXIT_ANIMATION: &str = "fadeOut .3s ease forwards";
}
