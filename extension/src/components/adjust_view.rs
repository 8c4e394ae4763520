use dioxus::prelude::*;

use crate::format::{adjust_title, unit_label};
use crate::icons;
use crate::popup::controller::ADJUST_MIN;
use crate::popup::PopupContext;
use crate::settings::SettingKey;
use crate::view::Nav;

#[component]
pub fn AdjustView(setting: SettingKey) -> Element {
    let ctx = use_context::<PopupContext>();
    let value = ctx.controller.read().adjust_input();
    let title = adjust_title(setting);
    let unit = unit_label(setting);

    rsx! {
        div { id: "view-adjust", class: "view active",
            div { class: "header",
                button {
                    id: "btn-back-adjust",
                    class: "icon-button",
                    title: "Back",
                    onclick: move |_| ctx.navigate(Nav::Back),
                    icons::ChevronLeft { class: Some("icon".to_string()) }
                }
                h2 { id: "adjust-title", "{title}" }
            }

            div { class: "adjust-row",
                button {
                    id: "decrease",
                    class: "icon-button",
                    onclick: move |_| ctx.step(-1),
                    icons::Minus { class: Some("icon".to_string()) }
                }
                input {
                    id: "adjust-input",
                    r#type: "number",
                    min: "{ADJUST_MIN}",
                    value: "{value}",
                    onchange: move |e| ctx.input(&e.value()),
                }
                span { id: "adjust-unit", class: "unit", "{unit}" }
                button {
                    id: "increase",
                    class: "icon-button",
                    onclick: move |_| ctx.step(1),
                    icons::Plus { class: Some("icon".to_string()) }
                }
            }
        }
    }
}
