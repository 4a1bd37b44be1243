// Viewer selection (student + month) and dropdown suggestions.

pub mod generation;
pub mod handlers;
pub mod suggest;

use serde::Deserialize;

use crate::models::month::Month;

/// Query parameters shared by every per-student panel endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelQuery {
    pub month: Option<Month>,
    /// Selection generation the client issued this request under.
    pub generation: Option<u64>,
}
