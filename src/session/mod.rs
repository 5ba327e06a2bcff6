pub mod content;
pub mod sidebar;
