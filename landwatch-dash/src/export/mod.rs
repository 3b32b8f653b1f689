//! Modules d'export (scène JSON, page HTML)

pub mod html;
pub mod scene;

pub use html::{write_dashboard, DashboardPage};
pub use scene::write_scene;
