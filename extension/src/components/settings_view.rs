use dioxus::prelude::*;

use crate::format::label_case;
use crate::icons;
use crate::popup::PopupContext;
use crate::settings::SettingKey;
use crate::view::Nav;

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<PopupContext>();
    let rows: Vec<(SettingKey, String, String)> = {
        let controller = ctx.controller.read();
        SettingKey::ADJUSTABLE
            .into_iter()
            .map(|key| {
                (
                    key,
                    label_case(Some(key.as_str())),
                    controller.setting_label(key),
                )
            })
            .collect()
    };

    rsx! {
        div { id: "view-settings", class: "view active",
            div { class: "header",
                h2 { "Settings" }
                button {
                    id: "btn-close-settings",
                    class: "icon-button",
                    title: "Close",
                    onclick: move |_| ctx.navigate(Nav::CloseSettings),
                    icons::X { class: Some("icon".to_string()) }
                }
            }

            ul { class: "setting-list",
                for (key, title, value) in rows {
                    li {
                        key: "{key}",
                        class: "setting-item",
                        "data-key": "{key}",
                        onclick: move |_| ctx.navigate(Nav::OpenAdjust(key)),
                        span { class: "setting-name", "{title}" }
                        span { id: "label-{key}", class: "setting-value", "{value}" }
                        icons::ChevronRight { class: Some("icon-small".to_string()) }
                    }
                }
            }
        }
    }
}
