pub mod agent;
pub mod api;
pub mod containers;
pub mod dashboard;
pub mod error;
pub mod intent;
pub mod mock_data;
pub mod narration;
pub mod speech;
pub mod state;
pub mod types;
pub mod view;

pub use error::DashboardError;
pub use state::AdvisorSession;
