pub mod districts;
pub mod ensemble;
pub mod precincts;

use anyhow::{Context, Result};

use crate::states::{StateInfo, state_info, supported_states};

/// Resolve a postal code argument to the state registry, with the
/// supported set in the error message.
pub(crate) fn resolve_state(code: &str) -> Result<&'static StateInfo> {
    state_info(code).with_context(|| {
        format!("Unsupported state: {code} (supported: {})", supported_states().join(", "))
    })
}
