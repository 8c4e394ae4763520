// Lucide icon components for Dioxus
// SVG icons inlined for better performance

use dioxus::prelude::*;

/// Shared 24x24 stroke frame every icon draws into.
#[component]
fn Icon(class: Option<String>, children: Element) -> Element {
    rsx! {
        svg {
            class: "{class.unwrap_or_default()}",
            xmlns: "http://www.w3.org/2000/svg",
            width: "24",
            height: "24",
            view_box: "0 0 24 24",
            fill: "none",
            stroke: "currentColor",
            stroke_width: "2",
            stroke_linecap: "round",
            stroke_linejoin: "round",
            {children}
        }
    }
}

#[component]
pub fn Play(class: Option<String>) -> Element {
    rsx! {
        Icon { class: class,
            polygon { points: "6 3 20 12 6 21 6 3" }
        }
    }
}

#[component]
pub fn Pause(class: Option<String>) -> Element {
    rsx! {
        Icon { class: class,
            rect { x: "14", y: "4", width: "4", height: "16", rx: "1" }
            rect { x: "6", y: "4", width: "4", height: "16", rx: "1" }
        }
    }
}

#[component]
pub fn RotateCcw(class: Option<String>) -> Element {
    rsx! {
        Icon { class: class,
            path { d: "M3 12a9 9 0 1 0 9-9 9.75 9.75 0 0 0-6.74 2.74L3 8" }
            path { d: "M3 3v5h5" }
        }
    }
}

#[component]
pub fn SkipForward(class: Option<String>) -> Element {
    rsx! {
        Icon { class: class,
            polygon { points: "5 4 15 12 5 20 5 4" }
            line { x1: "19", x2: "19", y1: "5", y2: "19" }
        }
    }
}

#[component]
pub fn Settings(class: Option<String>) -> Element {
    rsx! {
        Icon { class: class,
            path { d: "M12.22 2h-.44a2 2 0 0 0-2 2v.18a2 2 0 0 1-1 1.73l-.43.25a2 2 0 0 1-2 0l-.15-.08a2 2 0 0 0-2.73.73l-.22.38a2 2 0 0 0 .73 2.73l.15.1a2 2 0 0 1 1 1.72v.51a2 2 0 0 1-1 1.74l-.15.09a2 2 0 0 0-.73 2.73l.22.38a2 2 0 0 0 2.73.73l.15-.08a2 2 0 0 1 2 0l.43.25a2 2 0 0 1 1 1.73V20a2 2 0 0 0 2 2h.44a2 2 0 0 0 2-2v-.18a2 2 0 0 1 1-1.73l.43-.25a2 2 0 0 1 2 0l.15.08a2 2 0 0 0 2.73-.73l.22-.39a2 2 0 0 0-.73-2.73l-.15-.08a2 2 0 0 1-1-1.74v-.5a2 2 0 0 1 1-1.74l.15-.09a2 2 0 0 0 .73-2.73l-.22-.38a2 2 0 0 0-2.73-.73l-.15.08a2 2 0 0 1-2 0l-.43-.25a2 2 0 0 1-1-1.73V4a2 2 0 0 0-2-2z" }
            circle { cx: "12", cy: "12", r: "3" }
        }
    }
}

#[component]
pub fn X(class: Option<String>) -> Element {
    rsx! {
        Icon { class: class,
            path { d: "M18 6 6 18" }
            path { d: "m6 6 12 12" }
        }
    }
}

#[component]
pub fn ChevronLeft(class: Option<String>) -> Element {
    rsx! {
        Icon { class: class,
            path { d: "m15 18-6-6 6-6" }
        }
    }
}

#[component]
pub fn ChevronRight(class: Option<String>) -> Element {
    rsx! {
        Icon { class: class,
            path { d: "m9 18 6-6-6-6" }
        }
    }
}

#[component]
pub fn Minus(class: Option<String>) -> Element {
    rsx! {
        Icon { class: class,
            path { d: "M5 12h14" }
        }
    }
}

#[component]
pub fn Plus(class: Option<String>) -> Element {
    rsx! {
        Icon { class: class,
            path { d: "M5 12h14" }
            path { d: "M12 5v14" }
        }
    }
}
