// Content relay: runs in the page's content-script world
//
// Injects the popup (markup, stylesheet, popup script), answers the popup's
// requests through `Relay`, forwards storage changes, and removes everything
// again after an outside click. Everything the popup owns in the page lives
// in one `PopupMount`, released by `mount::release`.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, EventTarget, HtmlElement, HtmlLinkElement, HtmlScriptElement, Node};

use crate::closer::{ClickOutcome, OutsideClickGate};
use crate::config::ExtensionConfig;
use crate::error::{ExtensionError, Result};
use crate::mount::{self, Injected, Mount, MountSlot, Page};
use crate::protocol::{signal, Envelope, ReadySignal, Reply};
use crate::relay::{storage_update, Relay};
use crate::services::dom::{self, ListenerHandle};
use crate::services::{runtime, ChromeBackground, ChromeStorage, StorageSubscription};

type ChromeRelay = Relay<ChromeStorage, ChromeBackground>;

/// The popup's footprint in the page: its elements plus the listeners and
/// storage subscription that must go with them.
type PopupMount = Mount<Element, Box<dyn Any>>;
type PopupSlot = MountSlot<Element, Box<dyn Any>>;

impl Injected for Element {
    fn remove(&self) {
        Element::remove(self);
    }
}

struct DomPage<'a>(&'a Document);

impl Page for DomPage<'_> {
    type Element = Element;

    fn has_element(&self, id: &str) -> bool {
        self.0.get_element_by_id(id).is_some()
    }

    fn insert_marker(&self, id: &str) -> Result<Element> {
        let marker = self.0.create_element("template")?;
        marker.set_id(id);
        self.0
            .document_element()
            .ok_or_else(|| ExtensionError::Js("no document element".to_string()))?
            .append_child(&marker)?;
        Ok(marker)
    }
}

/// Container to dispatch on, if still mounted.
fn mounted_target(slot: &PopupSlot) -> Option<EventTarget> {
    slot.borrow()
        .as_ref()
        .map(|popup| popup.container().clone().unchecked_into())
}

fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ExtensionError::Js("no document".to_string()))
}

/// Entry point. At most one popup per page.
pub fn start(config: ExtensionConfig) -> Result<()> {
    let document = document()?;
    let Some(claim) = mount::claim(&DomPage(&document), &config.container_id)? else {
        log::info!("Popup already present, nothing to do");
        return Ok(());
    };

    spawn_local(async move {
        if let Err(e) = inject(document, config, claim.clone()).await {
            log::error!("Error loading popup content: {}", e);
            Injected::remove(&claim);
        }
    });
    Ok(())
}

async fn fetch_text(url: &str) -> Result<String> {
    let window = web_sys::window().ok_or_else(|| ExtensionError::Js("no window".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into::<web_sys::Response>()?;
    if !response.ok() {
        return Err(ExtensionError::Js(format!(
            "{} answered {}",
            url,
            response.status()
        )));
    }
    let text = JsFuture::from(response.text()?).await?;
    text.as_string()
        .ok_or_else(|| ExtensionError::Js(format!("{} is not text", url)))
}

async fn inject(document: Document, config: ExtensionConfig, claim: Element) -> Result<()> {
    let markup = fetch_text(&runtime::resource_url(&config.markup_path)).await?;

    let body = document
        .body()
        .ok_or_else(|| ExtensionError::Js("page has no body".to_string()))?;
    body.insert_adjacent_html("beforeend", &markup)?;
    let container = document
        .get_element_by_id(&config.container_id)
        .ok_or(ExtensionError::NotMounted)?;

    let stylesheet = document
        .create_element("link")?
        .dyn_into::<HtmlLinkElement>()
        .map_err(JsValue::from)?;
    stylesheet.set_rel("stylesheet");
    stylesheet.set_href(&runtime::resource_url(&config.stylesheet_path));
    document
        .head()
        .ok_or_else(|| ExtensionError::Js("page has no head".to_string()))?
        .append_child(&stylesheet)?;

    let relay = Rc::new(Relay::new(ChromeStorage::new(), ChromeBackground));
    let slot: PopupSlot = Rc::new(RefCell::new(None));

    // Popup listeners go in before the script so its ready signal is heard.
    let target: &EventTarget = container.as_ref();
    let listeners = vec![
        ListenerHandle::on_detail(target, signal::POPUP_READY, {
            let (relay, slot) = (relay.clone(), slot.clone());
            move |ready: ReadySignal| send_initial(relay.clone(), slot.clone(), ready)
        })?,
        ListenerHandle::on_detail(target, signal::POPUP_REQUEST, {
            let (relay, slot) = (relay.clone(), slot.clone());
            move |envelope: Envelope| answer(relay.clone(), slot.clone(), envelope)
        })?,
        close_on_outside_click(&document, &config, slot.clone())?,
    ];

    let storage = StorageSubscription::subscribe({
        let slot = slot.clone();
        move |changes| {
            let Some(patch) = storage_update(mount::is_mounted(&slot), &changes) else {
                return;
            };
            if let Some(target) = mounted_target(&slot) {
                if let Err(e) = dom::dispatch(&target, signal::STORAGE_UPDATE, &patch) {
                    log::error!("Failed to forward storage change: {}", e);
                }
            }
        }
    });

    let script = document
        .create_element("script")?
        .dyn_into::<HtmlScriptElement>()
        .map_err(JsValue::from)?;
    script.set_type("module");
    script.set_src(&runtime::resource_url(&config.script_path));

    body.append_child(&script)?;

    let mut popup = PopupMount::new(container)
        .with_element(stylesheet.into())
        .with_element(script.into())
        .with_element(claim);
    for listener in listeners {
        popup = popup.with_handle(Box::new(listener));
    }
    *slot.borrow_mut() = Some(popup.with_handle(Box::new(storage)));

    log::info!("Popup injected");
    Ok(())
}

fn send_initial(relay: Rc<ChromeRelay>, slot: PopupSlot, ready: ReadySignal) {
    spawn_local(async move {
        let settings = match relay.initial_settings(&ready).await {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load initial settings: {}", e);
                return;
            }
        };
        match mounted_target(&slot) {
            Some(target) => {
                if let Err(e) = dom::dispatch(&target, signal::INITIAL_SETTINGS, &settings) {
                    log::error!("Failed to deliver initial settings: {}", e);
                }
            }
            None => log::debug!("Popup gone before initial settings arrived"),
        }
    });
}

fn answer(relay: Rc<ChromeRelay>, slot: PopupSlot, envelope: Envelope) {
    spawn_local(async move {
        let Envelope { id, request } = envelope;
        let response = relay.handle(request).await;
        let Some(target) = mounted_target(&slot) else {
            log::debug!("Popup gone, dropping reply {}", id);
            return;
        };
        if let Err(e) = dom::dispatch(&target, signal::RELAY_RESPONSE, &Reply { id, response }) {
            log::error!("Failed to deliver reply {}: {}", id, e);
        }
    });
}

/// Capture-phase pointer-down listener feeding [`OutsideClickGate`].
fn close_on_outside_click(
    document: &Document,
    config: &ExtensionConfig,
    slot: PopupSlot,
) -> Result<ListenerHandle> {
    let mut gate = OutsideClickGate::new();
    let fade_out_ms = config.fade_out_ms;

    ListenerHandle::attach(document.as_ref(), &config.close_event, true, move |event| {
        if gate.is_closing() {
            return;
        }
        let Some(container) = slot.borrow().as_ref().map(|m| m.container().clone()) else {
            return;
        };
        let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
        let inside = container.contains(target.as_ref());

        if gate.on_pointer_down(inside) == ClickOutcome::Ignore {
            return;
        }

        let faded = container
            .dyn_ref::<HtmlElement>()
            .map(|el| el.style().set_property("opacity", "0"));
        if !matches!(faded, Some(Ok(()))) {
            log::warn!("Could not fade popup");
        }
        let slot = slot.clone();
        spawn_local(async move {
            TimeoutFuture::new(fade_out_ms).await;
            mount::release(&slot);
        });
    })
}

#[wasm_bindgen]
pub fn start_content(config: Option<String>) -> std::result::Result<(), JsValue> {
    crate::init_logging();
    let config = ExtensionConfig::from_json(config.as_deref())?;
    start(config)?;
    Ok(())
}
