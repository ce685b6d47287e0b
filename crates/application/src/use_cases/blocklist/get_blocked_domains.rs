use crate::state::SharedState;

pub struct GetBlockedDomainsUseCase {
    state: SharedState,
}

impl GetBlockedDomainsUseCase {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    pub fn execute(&self) -> Vec<String> {
        self.state.read(|s| s.blocklist.domains().to_vec())
    }
}
