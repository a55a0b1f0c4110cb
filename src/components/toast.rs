//! Toast notifications.
//!
//! A [`Notifier`] appends transient banners to a singleton on-screen stack and
//! drives each one through its [`ToastPhase`] lifecycle with two chained
//! timers: the first starts the exit animation after the display duration,
//! the second detaches the element once the animation is over.
//!
//! Rendering and timing are injected ([`ToastHost`], [`Scheduler`]) so the
//! lifecycle can be exercised without a browser or real clocks.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use crate::config::toast::{
    CONTAINER_ID, CONTAINER_STYLE, DEFAULT_DURATION_MS, ENTER_ANIMATION, ENTER_MS, EXIT_ANIMATION,
    EXIT_MS, GLYPH_STYLE, KEYFRAMES, TOAST_STYLE,
};
use crate::models::{Severity, ToastPhase, ToastSpec};
use crate::utils::dom;
use crate::utils::timer::{Scheduler, TimeoutScheduler};

// =============================================================================
// Host
// =============================================================================

/// Surface toasts are rendered onto.
pub trait ToastHost {
    /// Handle to one rendered toast.
    type Element: 'static;

    /// Make sure the stack exists and append a toast to it.
    ///
    /// Returns `None` when nothing could be rendered.
    fn mount(&self, spec: &ToastSpec) -> Option<Self::Element>;

    /// Switch the toast to its exit animation.
    fn begin_exit(&self, element: &Self::Element);

    /// Detach the toast.
    fn remove(&self, element: &Self::Element);
}

/// Renders toasts into `#toast-container` of a document.
///
/// The container is looked up or created on the first toast and reused
/// afterwards.
#[derive(Debug)]
pub struct DomToastHost {
    document: Document,
    container: RefCell<Option<HtmlElement>>,
}

impl DomToastHost {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            container: RefCell::new(None),
        }
    }

    /// Host for the current window's document.
    pub fn from_window() -> Option<Self> {
        dom::document().map(Self::new)
    }

    /// The stack container, creating it if needed.
    pub fn container(&self) -> Result<HtmlElement, JsValue> {
        if let Some(container) = self.container.borrow().as_ref()
            && container.is_connected()
        {
            return Ok(container.clone());
        }

        let container = match self
            .document
            .get_element_by_id(CONTAINER_ID)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            Some(existing) => existing,
            None => self.create_container()?,
        };
        *self.container.borrow_mut() = Some(container.clone());
        Ok(container)
    }

    fn create_container(&self) -> Result<HtmlElement, JsValue> {
        let container = self
            .document
            .create_element("div")?
            .unchecked_into::<HtmlElement>();
        container.set_id(CONTAINER_ID);
        container.style().set_css_text(CONTAINER_STYLE);

        let keyframes = self.document.create_element("style")?;
        keyframes.set_text_content(Some(KEYFRAMES));
        match self.document.head() {
            Some(head) => {
                head.append_child(&keyframes)?;
            }
            None => log::warn!("document has no <head>; toast animations unavailable"),
        }

        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no <body>"))?;
        body.append_child(&container)?;
        log::debug!("created #{CONTAINER_ID}");
        Ok(container)
    }

    fn render(&self, spec: &ToastSpec) -> Result<HtmlElement, JsValue> {
        let container = self.container()?;
        let treatment = spec.treatment();

        let toast = self
            .document
            .create_element("div")?
            .unchecked_into::<HtmlElement>();
        let style = toast.style();
        style.set_css_text(TOAST_STYLE);
        style.set_property("animation", ENTER_ANIMATION)?;
        style.set_property("background", treatment.background)?;
        style.set_property("color", treatment.color)?;
        toast.set_attribute("data-severity", spec.severity.as_str())?;

        let glyph = self.document.create_element("span")?;
        glyph.set_attribute("style", GLYPH_STYLE)?;
        glyph.set_text_content(Some(treatment.glyph));
        toast.append_child(&glyph)?;

        // Text node, so messages are never interpreted as markup.
        let text = self.document.create_text_node(&format!(" {}", spec.message));
        toast.append_child(&text)?;

        container.append_child(&toast)?;
        Ok(toast)
    }
}

impl ToastHost for DomToastHost {
    type Element = HtmlElement;

    fn mount(&self, spec: &ToastSpec) -> Option<HtmlElement> {
        match self.render(spec) {
            Ok(element) => Some(element),
            Err(e) => {
                log::warn!("failed to render toast: {}", dom::js_error_message(&e));
                None
            }
        }
    }

    fn begin_exit(&self, element: &HtmlElement) {
        if let Err(e) = element.style().set_property("animation", EXIT_ANIMATION) {
            log::warn!(
                "failed to start toast exit animation: {}",
                dom::js_error_message(&e)
            );
        }
    }

    fn remove(&self, element: &HtmlElement) {
        element.remove();
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Read-only view of a toast that was shown. Toasts cannot be dismissed early.
#[derive(Clone, Debug)]
pub struct ToastHandle {
    id: u64,
    phase: Rc<Cell<ToastPhase>>,
}

impl ToastHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn phase(&self) -> ToastPhase {
        self.phase.get()
    }
}

/// Shows toasts on a [`ToastHost`] using a [`Scheduler`] for timing.
pub struct Notifier<H, S> {
    host: Rc<H>,
    scheduler: Rc<S>,
    next_id: Cell<u64>,
}

impl Notifier<DomToastHost, TimeoutScheduler> {
    /// Notifier for the current document using `setTimeout`.
    pub fn browser() -> Option<Self> {
        Some(Self::new(DomToastHost::from_window()?, TimeoutScheduler))
    }
}

impl<H, S> Notifier<H, S>
where
    H: ToastHost + 'static,
    S: Scheduler + 'static,
{
    pub fn new(host: H, scheduler: S) -> Self {
        Self {
            host: Rc::new(host),
            scheduler: Rc::new(scheduler),
            next_id: Cell::new(0),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Info toast with the default duration.
    pub fn notify_default(&self, message: &str) -> ToastHandle {
        self.notify(message, Severity::Info, DEFAULT_DURATION_MS)
    }

    /// Toast from loosely typed input, as page scripts pass it.
    ///
    /// Unknown severity names render as info; a missing duration uses the
    /// default.
    pub fn notify_named(
        &self,
        message: &str,
        severity: &str,
        duration_ms: Option<u32>,
    ) -> ToastHandle {
        self.notify(
            message,
            Severity::from_name(severity),
            duration_ms.unwrap_or(DEFAULT_DURATION_MS),
        )
    }

    /// Show a toast for `duration_ms`, then fade it out and remove it.
    pub fn notify(&self, message: &str, severity: Severity, duration_ms: u32) -> ToastHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let spec = ToastSpec {
            id,
            message: message.to_string(),
            severity,
            duration_ms,
        };
        let phase = Rc::new(Cell::new(ToastPhase::Entering));
        let handle = ToastHandle {
            id,
            phase: phase.clone(),
        };

        let Some(element) = self.host.mount(&spec) else {
            phase.set(ToastPhase::Removed);
            return handle;
        };
        log::debug!("toast {id} ({severity}) shown for {duration_ms}ms");

        let entering = phase.clone();
        self.scheduler.schedule(
            ENTER_MS,
            Box::new(move || entering.set(entering.get().settle())),
        );

        let host = self.host.clone();
        let scheduler = self.scheduler.clone();
        self.scheduler.schedule(
            duration_ms,
            Box::new(move || {
                phase.set(phase.get().begin_exit());
                host.begin_exit(&element);
                scheduler.schedule(
                    EXIT_MS,
                    Box::new(move || {
                        host.remove(&element);
                        phase.set(phase.get().finish());
                        log::debug!("toast {id} removed");
                    }),
                );
            }),
        );

        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::timer::ManualScheduler;

    #[derive(Debug, Clone, PartialEq)]
    struct Rendered {
        id: u64,
        text: String,
        glyph: &'static str,
        background: &'static str,
        exiting: bool,
    }

    /// In-memory stack standing in for `#toast-container`.
    #[derive(Default)]
    struct RecordingHost {
        stack: RefCell<Vec<Rendered>>,
    }

    impl RecordingHost {
        fn ids(&self) -> Vec<u64> {
            self.stack.borrow().iter().map(|t| t.id).collect()
        }

        fn get(&self, id: u64) -> Option<Rendered> {
            self.stack.borrow().iter().find(|t| t.id == id).cloned()
        }
    }

    impl ToastHost for RecordingHost {
        type Element = u64;

        fn mount(&self, spec: &ToastSpec) -> Option<u64> {
            let treatment = spec.treatment();
            self.stack.borrow_mut().push(Rendered {
                id: spec.id,
                text: spec.message.clone(),
                glyph: treatment.glyph,
                background: treatment.background,
                exiting: false,
            });
            Some(spec.id)
        }

        fn begin_exit(&self, element: &u64) {
            if let Some(t) = self.stack.borrow_mut().iter_mut().find(|t| t.id == *element) {
                t.exiting = true;
            }
        }

        fn remove(&self, element: &u64) {
            self.stack.borrow_mut().retain(|t| t.id != *element);
        }
    }

    /// Host with no document to render into.
    struct DetachedHost;

    impl ToastHost for DetachedHost {
        type Element = ();

        fn mount(&self, _spec: &ToastSpec) -> Option<()> {
            None
        }

        fn begin_exit(&self, _element: &()) {}

        fn remove(&self, _element: &()) {}
    }

    fn notifier() -> Notifier<RecordingHost, ManualScheduler> {
        Notifier::new(RecordingHost::default(), ManualScheduler::new())
    }

    #[test]
    fn test_success_toast_lifecycle() {
        let n = notifier();
        let toast = n.notify("Saved", Severity::Success, DEFAULT_DURATION_MS);

        let rendered = n.host().get(toast.id()).unwrap();
        assert_eq!(rendered.text, "Saved");
        assert_eq!(rendered.glyph, "✓");
        assert_eq!(n.host().ids().len(), 1);
        assert_eq!(toast.phase(), ToastPhase::Entering);

        n.scheduler().advance(300);
        assert_eq!(toast.phase(), ToastPhase::Visible);

        n.scheduler().advance(3199);
        assert_eq!(toast.phase(), ToastPhase::Visible);
        assert!(!n.host().get(toast.id()).unwrap().exiting);

        n.scheduler().advance(1);
        assert_eq!(toast.phase(), ToastPhase::Exiting);
        assert!(n.host().get(toast.id()).unwrap().exiting);

        n.scheduler().advance(299);
        assert!(n.host().get(toast.id()).is_some());

        n.scheduler().advance(1);
        assert_eq!(n.scheduler().now(), 3800);
        assert_eq!(toast.phase(), ToastPhase::Removed);
        assert!(n.host().ids().is_empty());
        assert_eq!(n.scheduler().pending(), 0);
    }

    #[test]
    fn test_default_is_info_for_3500ms() {
        let n = notifier();
        let toast = n.notify_default("Loading");
        assert_eq!(
            n.host().get(toast.id()).unwrap().glyph,
            Severity::Info.treatment().glyph
        );

        n.scheduler().advance(3799);
        assert!(toast.phase().is_attached());
        n.scheduler().advance(1);
        assert!(!toast.phase().is_attached());
    }

    #[test]
    fn test_unknown_severity_renders_as_info() {
        let n = notifier();
        let bogus = n.notify_named("Huh", "bogus", None);
        let info = n.notify_named("Huh", "info", None);

        let bogus = n.host().get(bogus.id()).unwrap();
        let info = n.host().get(info.id()).unwrap();
        assert_eq!(
            (bogus.glyph, bogus.background),
            (info.glyph, info.background)
        );
    }

    #[test]
    fn test_concurrent_toasts_stack_in_order_and_expire_independently() {
        let n = notifier();
        let a = n.notify("a", Severity::Info, 1000);
        n.scheduler().advance(500);
        let b = n.notify("b", Severity::Error, 1000);
        let c = n.notify("c", Severity::Warning, 200);

        assert_eq!(n.host().ids(), vec![a.id(), b.id(), c.id()]);

        // c: exits at 700, removed at 1000
        n.scheduler().advance(500);
        assert_eq!(n.host().ids(), vec![a.id(), b.id()]);
        assert_eq!(a.phase(), ToastPhase::Exiting);

        // a: removed at 1300
        n.scheduler().advance(300);
        assert_eq!(n.host().ids(), vec![b.id()]);

        // b: removed at 1800
        n.scheduler().advance(500);
        assert!(n.host().ids().is_empty());
        assert_eq!(
            [a.phase(), b.phase(), c.phase()],
            [ToastPhase::Removed; 3]
        );
    }

    #[test]
    fn test_duration_shorter_than_entrance_never_visible() {
        let n = notifier();
        let toast = n.notify("quick", Severity::Info, 100);

        n.scheduler().advance(100);
        assert_eq!(toast.phase(), ToastPhase::Exiting);
        n.scheduler().advance(200);
        assert_eq!(toast.phase(), ToastPhase::Exiting);
        n.scheduler().advance(100);
        assert_eq!(toast.phase(), ToastPhase::Removed);
    }

    #[test]
    fn test_duplicate_messages_are_not_merged() {
        let n = notifier();
        n.notify("Saved", Severity::Success, 1000);
        n.notify("Saved", Severity::Success, 1000);
        assert_eq!(n.host().ids(), vec![0, 1]);
    }

    #[test]
    fn test_unrenderable_toast_is_removed_immediately() {
        let n = Notifier::new(DetachedHost, ManualScheduler::new());
        let toast = n.notify_default("nowhere");
        assert_eq!(toast.phase(), ToastPhase::Removed);
        assert_eq!(n.scheduler().pending(), 0);
    }
}
