//! Chart Mount
//!
//! Element handles the loader mutates. They are injected rather than looked
//! up by id so a loader can run against any host: a browser binding, a
//! terminal front-end, or the in-memory elements used by tests.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Class that hides an element (Bootstrap's `display: none`)
pub const HIDDEN_CLASS: &str = "d-none";

/// Mutable handle to one page element
pub trait Element: Send + Sync {
    /// Replace the content with plain text
    fn set_text(&self, text: &str);

    /// Replace the content with markup
    fn set_html(&self, html: &str);

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    fn has_class(&self, class: &str) -> bool;

    fn is_hidden(&self) -> bool {
        self.has_class(HIDDEN_CLASS)
    }
}

/// The two elements a chart page provides
#[derive(Clone)]
pub struct ChartMount {
    loader: Arc<dyn Element>,
    canvas: Arc<dyn Element>,
}

impl ChartMount {
    pub fn new(loader: Arc<dyn Element>, canvas: Arc<dyn Element>) -> Self {
        Self { loader, canvas }
    }

    pub fn loader(&self) -> &dyn Element {
        self.loader.as_ref()
    }

    /// Swap visibility after a successful render
    pub fn reveal_chart(&self) {
        self.loader.add_class(HIDDEN_CLASS);
        self.canvas.remove_class(HIDDEN_CLASS);
    }
}

/// Snapshot of a [`MemoryElement`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementState {
    pub id: String,
    pub content: String,
    /// Whether `content` was set as markup
    pub is_html: bool,
    pub classes: BTreeSet<String>,
}

/// Element kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    state: Arc<Mutex<ElementState>>,
}

impl MemoryElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ElementState {
                id: id.into(),
                ..Default::default()
            })),
        }
    }

    /// Start with the given content and classes, like server-rendered markup
    pub fn with_markup(id: impl Into<String>, content: &str, classes: &[&str]) -> Self {
        let element = Self::new(id);
        {
            let mut state = element.lock();
            state.content = content.to_string();
            state.classes = classes.iter().map(|c| c.to_string()).collect();
        }
        element
    }

    pub fn snapshot(&self) -> ElementState {
        self.lock().clone()
    }

    pub fn content(&self) -> String {
        self.lock().content.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ElementState> {
        // A panic while holding the lock cannot leave the state half-written
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Element for MemoryElement {
    fn set_text(&self, text: &str) {
        let mut state = self.lock();
        state.content = text.to_string();
        state.is_html = false;
    }

    fn set_html(&self, html: &str) {
        let mut state = self.lock();
        state.content = html.to_string();
        state.is_html = true;
    }

    fn add_class(&self, class: &str) {
        self.lock().classes.insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.lock().classes.remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.lock().classes.contains(class)
    }
}

/// Loader and canvas as a host page renders them before any data arrives
pub fn memory_mount(canvas_id: &str) -> (MemoryElement, MemoryElement, ChartMount) {
    let loader = MemoryElement::with_markup("chartLoader", "Loading...", &[]);
    let canvas = MemoryElement::with_markup(canvas_id, "", &[HIDDEN_CLASS]);
    let mount = ChartMount::new(Arc::new(loader.clone()), Arc::new(canvas.clone()));
    (loader, canvas, mount)
}
