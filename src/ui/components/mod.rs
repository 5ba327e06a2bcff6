pub mod content_pane;
pub mod disclaimer;
pub mod nav_bar;
pub mod progress_bar;
pub mod sidebar;
