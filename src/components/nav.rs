//! Active navigation link highlighting.
//!
//! Compares the file name of the current page with the file name of each
//! `.navbar-links a` target and toggles the `active` class. Runs once after
//! the document structure is loaded; client-side history changes are not
//! observed.
//!
//! An anchor whose target file name is empty (`href=""`, `href="/"`) is never
//! marked active, even on the site root: the root resolves to
//! [`INDEX_DOCUMENT`] first and only that name matches.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::Element;

use crate::config::nav::{ACTIVE_CLASS, INDEX_DOCUMENT, LINK_SELECTOR};
use crate::utils::dom;

/// A navigation link that can be marked active.
pub trait NavAnchor {
    /// Raw `href` attribute, if present.
    fn href(&self) -> Option<String>;

    fn set_active(&self, active: bool);
}

impl NavAnchor for Element {
    fn href(&self) -> Option<String> {
        self.get_attribute("href")
    }

    fn set_active(&self, active: bool) {
        if let Err(e) = self.class_list().toggle_with_force(ACTIVE_CLASS, active) {
            log::warn!(
                "failed to toggle .{ACTIVE_CLASS}: {}",
                dom::js_error_message(&e)
            );
        }
    }
}

/// File name of the current page; the site root maps to [`INDEX_DOCUMENT`].
pub fn current_page(pathname: &str) -> &str {
    match last_segment(pathname) {
        "" => INDEX_DOCUMENT,
        name => name,
    }
}

/// File name an anchor points at.
pub fn link_target(href: &str) -> &str {
    last_segment(href)
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}

/// Whether a link to `target` is the link for `page`.
pub fn is_active(page: &str, target: &str) -> bool {
    target == page || (page.is_empty() && target == INDEX_DOCUMENT)
}

/// Mark every anchor whose target matches `pathname`, clearing the rest.
///
/// Returns how many anchors ended up active.
pub fn highlight<A: NavAnchor>(pathname: &str, anchors: &[A]) -> usize {
    let page = current_page(pathname);
    let mut marked = 0;
    for anchor in anchors {
        let active = anchor
            .href()
            .is_some_and(|href| is_active(page, link_target(&href)));
        anchor.set_active(active);
        marked += usize::from(active);
    }
    marked
}

/// Highlight the navigation of the current document right now.
pub fn highlight_document() -> usize {
    let Some(document) = dom::document() else {
        return 0;
    };
    let anchors: Vec<Element> = match document.query_selector_all(LINK_SELECTOR) {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect(),
        Err(e) => {
            log::warn!("bad nav selector: {}", dom::js_error_message(&e));
            return 0;
        }
    };

    let marked = highlight(&dom::pathname(), &anchors);
    log::debug!("nav: {marked} of {} links active", anchors.len());
    marked
}

/// Run [`highlight_document`] once the DOM is parsed.
///
/// Defers to `DOMContentLoaded` while the document is still loading,
/// otherwise highlights immediately.
pub fn install() {
    let Some(document) = dom::document() else {
        return;
    };

    if document.ready_state() != "loading" {
        highlight_document();
        return;
    }

    let callback = Closure::once_into_js(|| {
        highlight_document();
    });
    if let Err(e) =
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
    {
        log::warn!(
            "failed to register nav highlighter: {}",
            dom::js_error_message(&e)
        );
    }
}
