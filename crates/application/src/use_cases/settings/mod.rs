pub mod get_status;
pub mod restore_router_state;
pub mod set_upstream;

pub use get_status::{GetStatusUseCase, RouterStatus};
pub use restore_router_state::RestoreRouterStateUseCase;
pub use set_upstream::SetUpstreamUseCase;
