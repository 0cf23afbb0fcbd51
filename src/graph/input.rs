use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::host::SelectionHandle;

pub(super) const ROLE_SOURCE: &str = "source_node";
pub(super) const ROLE_TARGET: &str = "target_node";
pub(super) const ROLE_SOURCE_FILL: &str = "source_fill";
pub(super) const ROLE_SOURCE_SIZE: &str = "source_size";
pub(super) const ROLE_DISTANCE: &str = "distance";
pub(super) const ROLE_LINK_COLOR: &str = "link_color";

/// Data handed over by the host on every update.
///
/// Exactly one of the two shapes is expected; when both are present the
/// table wins.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataView {
    #[serde(default)]
    pub table: Option<TableInput>,
    #[serde(default)]
    pub categorical: Option<CategoricalInput>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub roles: HashMap<String, bool>,
}

impl Column {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.get(role).copied().unwrap_or(false)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TableInput {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
    /// Per-row selection handles, aligned with `rows`.
    #[serde(default)]
    pub identities: Vec<SelectionHandle>,
}

impl TableInput {
    pub fn column_index(&self, role: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.has_role(role))
    }

    pub(super) fn row_handle(&self, index: usize) -> SelectionHandle {
        self.identities
            .get(index)
            .cloned()
            .unwrap_or_else(|| SelectionHandle::for_row(index))
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CategoryColumn {
    pub values: Vec<Value>,
    #[serde(default)]
    pub identities: Vec<SelectionHandle>,
}

impl CategoryColumn {
    pub(super) fn handle(&self, index: usize) -> SelectionHandle {
        self.identities
            .get(index)
            .cloned()
            .unwrap_or_else(|| SelectionHandle::for_category(index))
    }
}

/// One measure group; `values` is aligned by index with the categories.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ValueGroup {
    #[serde(default)]
    pub source: Value,
    #[serde(default)]
    pub values: Vec<Value>,
    #[serde(default)]
    pub identity: Option<SelectionHandle>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CategoricalInput {
    #[serde(default)]
    pub categories: Option<CategoryColumn>,
    #[serde(default)]
    pub values: Vec<ValueGroup>,
}
