// Popup Controller: runs from the injected popup script in the page world
// and only talks to the relay through custom events on its container.

pub mod bridge;
pub mod controller;

#[cfg(all(feature = "dioxus", target_arch = "wasm32"))]
mod context;

pub use controller::{PopupController, PopupEvent};

#[cfg(all(feature = "dioxus", target_arch = "wasm32"))]
pub use app::start_popup;
#[cfg(all(feature = "dioxus", target_arch = "wasm32"))]
pub(crate) use context::PopupContext;

#[cfg(all(feature = "dioxus", target_arch = "wasm32"))]
mod app {
    use dioxus::prelude::*;
    use futures::StreamExt;
    use wasm_bindgen::prelude::*;

    use super::bridge::Bridge;
    use super::context::PopupContext;
    use crate::components::{AdjustView, SettingsView, TimerView};
    use crate::config::ExtensionConfig;
    use crate::view::View;

    #[component]
    fn App() -> Element {
        let ctx = use_context_provider(PopupContext::new);

        use_hook(move || {
            let (tx, mut rx) = futures::channel::mpsc::unbounded();
            match Bridge::connect(&ExtensionConfig::default().container_id, tx) {
                Ok(bridge) => ctx.connect(bridge),
                Err(e) => log::error!("Popup cannot reach the relay: {}", e),
            }

            spawn(async move {
                while let Some(event) = rx.next().await {
                    ctx.apply(event);
                }
            });
        });

        let view = ctx.controller.read().view();

        rsx! {
            div { class: "pomodoro-popup",
                match view {
                    View::Timer => rsx! { TimerView {} },
                    View::Settings => rsx! { SettingsView {} },
                    View::Adjust(setting) => rsx! { AdjustView { setting: setting } },
                }
            }
        }
    }

    #[wasm_bindgen]
    pub fn start_popup() {
        crate::init_logging();
        let config = ExtensionConfig::default();
        log::info!("Pomodoro popup starting in #{}", config.mount_id);
        LaunchBuilder::web()
            .with_cfg(dioxus_web::Config::new().rootname(config.mount_id))
            .launch(App);
    }
}
