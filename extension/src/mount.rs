// What the popup owns in the page, and the one way it leaves
//
// Generic over the element and handle types so the sequencing runs in host
// tests; `content` instantiates it with DOM elements and listener handles.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;

/// Something inserted into the page that must be taken out again.
pub trait Injected {
    fn remove(&self);
}

/// The page as far as claiming it is concerned.
pub trait Page {
    type Element: Injected;

    fn has_element(&self, id: &str) -> bool;

    /// Insert an invisible marker element carrying `id`.
    fn insert_marker(&self, id: &str) -> Result<Self::Element>;
}

/// id of the marker that reserves the page while the popup loads.
pub fn claim_id(container_id: &str) -> String {
    format!("{}-claim", container_id)
}

/// Reserve the page for one popup. `None` if a popup is already there or
/// another activation is still loading one.
pub fn claim<P: Page>(page: &P, container_id: &str) -> Result<Option<P::Element>> {
    let marker = claim_id(container_id);
    if page.has_element(container_id) || page.has_element(&marker) {
        return Ok(None);
    }
    page.insert_marker(&marker).map(Some)
}

/// Elements and live handles of one mounted popup.
pub struct Mount<E, H> {
    container: E,
    elements: Vec<E>,
    handles: Vec<H>,
}

impl<E: Injected, H> Mount<E, H> {
    pub fn new(container: E) -> Self {
        Self {
            container,
            elements: Vec::new(),
            handles: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: E) -> Self {
        self.elements.push(element);
        self
    }

    /// Handles are dropped on teardown, before any element goes.
    pub fn with_handle(mut self, handle: H) -> Self {
        self.handles.push(handle);
        self
    }

    pub fn container(&self) -> &E {
        &self.container
    }

    fn teardown(self) {
        let Mount {
            container,
            elements,
            handles,
        } = self;
        drop(handles);
        container.remove();
        for element in &elements {
            element.remove();
        }
    }
}

/// `None` before injection finished and after teardown.
pub type MountSlot<E, H> = Rc<RefCell<Option<Mount<E, H>>>>;

pub fn is_mounted<E, H>(slot: &MountSlot<E, H>) -> bool {
    slot.borrow().is_some()
}

/// Tear the popup down if it is still mounted; false if it already left.
pub fn release<E: Injected, H>(slot: &MountSlot<E, H>) -> bool {
    let mount = slot.borrow_mut().take();
    match mount {
        Some(mount) => {
            mount.teardown();
            log::info!("Popup removed");
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::storage_update;
    use serde_json::json;
    use std::collections::HashSet;

    type Log = Rc<RefCell<Vec<String>>>;

    #[derive(Clone)]
    struct FakeElement {
        id: String,
        page: Rc<RefCell<HashSet<String>>>,
        log: Log,
    }

    impl Injected for FakeElement {
        fn remove(&self) {
            self.page.borrow_mut().remove(&self.id);
            self.log.borrow_mut().push(format!("remove {}", self.id));
        }
    }

    struct FakeHandle {
        name: &'static str,
        log: Log,
    }

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            self.log.borrow_mut().push(format!("drop {}", self.name));
        }
    }

    #[derive(Default)]
    struct FakePage {
        ids: Rc<RefCell<HashSet<String>>>,
        log: Log,
    }

    impl FakePage {
        fn element(&self, id: &str) -> FakeElement {
            self.ids.borrow_mut().insert(id.to_string());
            FakeElement {
                id: id.to_string(),
                page: self.ids.clone(),
                log: self.log.clone(),
            }
        }

        fn handle(&self, name: &'static str) -> FakeHandle {
            FakeHandle {
                name,
                log: self.log.clone(),
            }
        }
    }

    impl Page for FakePage {
        type Element = FakeElement;

        fn has_element(&self, id: &str) -> bool {
            self.ids.borrow().contains(id)
        }

        fn insert_marker(&self, id: &str) -> Result<FakeElement> {
            Ok(self.element(id))
        }
    }

    #[test]
    fn test_second_activation_while_loading_backs_off() {
        let page = FakePage::default();
        let first = claim(&page, "pomodoro-app").unwrap();
        assert!(first.is_some());
        assert!(claim(&page, "pomodoro-app").unwrap().is_none());
    }

    #[test]
    fn test_existing_popup_blocks_claim() {
        let page = FakePage::default();
        page.element("pomodoro-app");
        assert!(claim(&page, "pomodoro-app").unwrap().is_none());
    }

    #[test]
    fn test_teardown_releases_everything_once() {
        let page = FakePage::default();
        let marker = claim(&page, "pomodoro-app").unwrap().unwrap();
        let mount = Mount::new(page.element("pomodoro-app"))
            .with_element(page.element("stylesheet"))
            .with_element(page.element("script"))
            .with_element(marker)
            .with_handle(page.handle("outside-click"))
            .with_handle(page.handle("storage"));
        let slot: MountSlot<FakeElement, FakeHandle> = Rc::new(RefCell::new(Some(mount)));
        assert!(is_mounted(&slot));

        assert!(release(&slot));
        assert_eq!(
            *page.log.borrow(),
            vec![
                "drop outside-click",
                "drop storage",
                "remove pomodoro-app",
                "remove stylesheet",
                "remove script",
                "remove pomodoro-app-claim",
            ]
        );
        assert!(page.ids.borrow().is_empty());

        assert!(!release(&slot));
        assert_eq!(page.log.borrow().len(), 6);

        let changes = json!({"remainingSec": {"newValue": 9}});
        assert!(storage_update(is_mounted(&slot), changes.as_object().unwrap()).is_none());

        assert!(claim(&page, "pomodoro-app").unwrap().is_some());
    }
}
