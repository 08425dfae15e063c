//! Element lookup and the binder operations the refresh runs on top of.
//!
//! A page is anything that can hand out elements by id. Elements carry a
//! set of classes, a text, and an image source whose load outcome is
//! reported back through the `on_load`/`on_error` handlers.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use log::trace;

pub const LOADING_CLASS: &str = "img-loading";

pub type Handler = Box<dyn FnOnce() + Send>;

pub trait Element: Send + Sync {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;

    fn set_text(&self, text: &str);

    fn on_load(&self, handler: Handler);
    fn on_error(&self, handler: Handler);
    /// Assigning a source starts loading it.
    fn set_src(&self, url: &str);
}

pub trait ElementRegistry: Send + Sync {
    fn element(&self, id: &str) -> Option<Arc<dyn Element>>;
}

/// Shows a message to whoever is looking at the page.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

pub fn set_loading(registry: &dyn ElementRegistry, id: &str, loading: bool) {
    if let Some(el) = registry.element(id) {
        if loading {
            el.add_class(LOADING_CLASS);
        } else {
            el.remove_class(LOADING_CLASS);
        }
    }
}

/// Points the image element `id` at `url`. The loading flag goes away once
/// the image either loads or fails to.
pub fn bind_image(registry: &dyn ElementRegistry, id: &str, url: &str) {
    let Some(el) = registry.element(id) else {
        trace!("bind_image: no element '{}'", id);
        return;
    };

    let loaded = Arc::downgrade(&el);
    el.on_load(Box::new(move || {
        if let Some(el) = loaded.upgrade() {
            el.remove_class(LOADING_CLASS);
        }
    }));

    let failed = Arc::downgrade(&el);
    el.on_error(Box::new(move || {
        if let Some(el) = failed.upgrade() {
            el.remove_class(LOADING_CLASS);
        }
    }));

    el.set_src(url);
}

pub fn bind_text(registry: &dyn ElementRegistry, id: &str, text: &str) {
    let Some(el) = registry.element(id) else {
        trace!("bind_text: no element '{}'", id);
        return;
    };

    el.set_text(text);
}

/// What a [`MemoryElement`] does when its source is assigned.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoadBehavior {
    /// Keep the handlers until `fire_load`/`fire_error` is called.
    Manual,
    Load,
    Error,
}

#[derive(Default)]
struct ElementState {
    classes: BTreeSet<String>,
    text: String,
    src: Option<String>,
    on_load: Option<Handler>,
    on_error: Option<Handler>,
}

pub struct MemoryElement {
    behavior: LoadBehavior,
    state: Mutex<ElementState>,
}

impl MemoryElement {
    pub fn new(behavior: LoadBehavior) -> Self {
        Self {
            behavior,
            state: Mutex::new(ElementState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ElementState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn src(&self) -> Option<String> {
        self.lock().src.clone()
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    /// True while an assigned source has neither loaded nor failed.
    pub fn is_pending(&self) -> bool {
        let state = self.lock();
        state.on_load.is_some() || state.on_error.is_some()
    }

    fn take_handlers(&self) -> (Option<Handler>, Option<Handler>) {
        let mut state = self.lock();
        (state.on_load.take(), state.on_error.take())
    }

    pub fn fire_load(&self) {
        let (on_load, _) = self.take_handlers();
        if let Some(handler) = on_load {
            handler();
        }
    }

    pub fn fire_error(&self) {
        let (_, on_error) = self.take_handlers();
        if let Some(handler) = on_error {
            handler();
        }
    }
}

impl Element for MemoryElement {
    fn add_class(&self, class: &str) {
        self.lock().classes.insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.lock().classes.remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.lock().classes.contains(class)
    }

    fn set_text(&self, text: &str) {
        self.lock().text = text.to_string();
    }

    fn on_load(&self, handler: Handler) {
        self.lock().on_load = Some(handler);
    }

    fn on_error(&self, handler: Handler) {
        self.lock().on_error = Some(handler);
    }

    fn set_src(&self, url: &str) {
        self.lock().src = Some(url.to_string());

        match self.behavior {
            LoadBehavior::Manual => {}
            LoadBehavior::Load => self.fire_load(),
            LoadBehavior::Error => self.fire_error(),
        }
    }
}

/// A page kept entirely in memory. Also records every notification.
#[derive(Default)]
pub struct MemoryPage {
    elements: HashMap<String, Arc<MemoryElement>>,
    notifications: Mutex<Vec<String>>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, behavior: LoadBehavior) -> Arc<MemoryElement> {
        let el = Arc::new(MemoryElement::new(behavior));
        self.elements.insert(id.to_string(), el.clone());
        el
    }

    pub fn get(&self, id: &str) -> Option<Arc<MemoryElement>> {
        self.elements.get(id).cloned()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(|id| id.as_str())
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl ElementRegistry for MemoryPage {
    fn element(&self, id: &str) -> Option<Arc<dyn Element>> {
        self.elements
            .get(id)
            .map(|el| el.clone() as Arc<dyn Element>)
    }
}

impl Notifier for MemoryPage {
    fn notify(&self, message: &str) {
        self.notifications
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_image_clears_loading_on_load() {
        let mut page = MemoryPage::new();
        let el = page.insert("card-img-1", LoadBehavior::Manual);

        set_loading(&page, "card-img-1", true);
        bind_image(&page, "card-img-1", "http://x/a.jpg");

        assert_eq!(el.src().as_deref(), Some("http://x/a.jpg"));
        assert!(el.has_class(LOADING_CLASS));
        assert!(el.is_pending());

        el.fire_load();
        assert!(!el.has_class(LOADING_CLASS));
        assert!(!el.is_pending());
    }

    #[test]
    fn bind_image_clears_loading_on_error() {
        let mut page = MemoryPage::new();
        let el = page.insert("hero-bg", LoadBehavior::Error);

        set_loading(&page, "hero-bg", true);
        bind_image(&page, "hero-bg", "http://x/broken.jpg");

        assert_eq!(el.src().as_deref(), Some("http://x/broken.jpg"));
        assert!(!el.has_class(LOADING_CLASS));
    }

    #[test]
    fn missing_elements_are_ignored() {
        let page = MemoryPage::new();

        set_loading(&page, "nope", true);
        bind_image(&page, "nope", "http://x/a.jpg");
        bind_text(&page, "nope", "text");

        assert!(page.element("nope").is_none());
    }

    #[test]
    fn bind_text_sets_text() {
        let mut page = MemoryPage::new();
        let el = page.insert("card-title-2", LoadBehavior::Manual);

        bind_text(&page, "card-title-2", "Fiona Apple");
        assert_eq!(el.text(), "Fiona Apple");
    }

    #[test]
    fn firing_twice_runs_handler_once() {
        let mut page = MemoryPage::new();
        let el = page.insert("card-img-2", LoadBehavior::Manual);

        bind_image(&page, "card-img-2", "http://x/a.jpg");
        el.fire_load();
        el.add_class(LOADING_CLASS);
        el.fire_error();

        assert!(el.has_class(LOADING_CLASS));
    }

    #[test]
    fn notifications_are_recorded() {
        let page = MemoryPage::new();
        page.notify("hello");
        assert_eq!(page.notifications(), vec!["hello".to_string()]);
    }
}
