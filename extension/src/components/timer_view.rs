use dioxus::prelude::*;

use crate::format::RING_CIRCUMFERENCE;
use crate::icons;
use crate::popup::PopupContext;
use crate::view::Nav;

#[component]
pub fn TimerView() -> Element {
    let ctx = use_context::<PopupContext>();
    let controller = ctx.controller.read();

    if !controller.is_loaded() {
        return rsx! {
            div { id: "view-timer", class: "view active",
                p { class: "loading", "Loading..." }
            }
        };
    }

    let clock = controller.clock();
    let label = controller.session_label();
    let offset = controller.ring_offset();
    let start_label = controller.start_label();
    let dots: Vec<&str> = controller
        .dots()
        .into_iter()
        .map(|done| if done { "dot completed" } else { "dot" })
        .collect();
    let running = controller.settings().timer_running.unwrap_or(false);

    rsx! {
        div { id: "view-timer", class: "view active",
            p { id: "session-label", class: "session-label", "{label}" }

            div { id: "donut", class: "donut",
                svg {
                    width: "120",
                    height: "120",
                    view_box: "0 0 120 120",
                    circle { class: "track", cx: "60", cy: "60", r: "50" }
                    circle {
                        class: "progress",
                        cx: "60",
                        cy: "60",
                        r: "50",
                        stroke_dasharray: "{RING_CIRCUMFERENCE}",
                        stroke_dashoffset: "{offset}",
                    }
                }
                span { id: "time-display", class: "time-display", "{clock}" }
            }

            div { id: "status-indicators", class: "status-indicators",
                for (i, class) in dots.into_iter().enumerate() {
                    span { key: "{i}", class: "{class}" }
                }
            }

            div { class: "controls",
                button {
                    id: "btn-reset",
                    class: "icon-button",
                    title: "Reset",
                    onclick: move |_| ctx.reset(),
                    icons::RotateCcw { class: Some("icon".to_string()) }
                }
                button {
                    id: "btn-start-pause",
                    class: "primary",
                    onclick: move |_| ctx.toggle(),
                    if running {
                        icons::Pause { class: Some("icon".to_string()) }
                    } else {
                        icons::Play { class: Some("icon".to_string()) }
                    }
                    span { "{start_label}" }
                }
                button {
                    id: "btn-skip-fwd",
                    class: "icon-button",
                    title: "Skip session",
                    onclick: move |_| ctx.skip(),
                    icons::SkipForward { class: Some("icon".to_string()) }
                }
            }

            div { class: "footer",
                button {
                    id: "btn-settings",
                    class: "icon-button",
                    title: "Settings",
                    onclick: move |_| ctx.navigate(Nav::OpenSettings),
                    icons::Settings { class: Some("icon".to_string()) }
                }
            }
        }
    }
}
