mod adjust_view;
mod settings_view;
mod timer_view;

pub use adjust_view::AdjustView;
pub use settings_view::SettingsView;
pub use timer_view::TimerView;
