use log::{debug, warn};

use crate::config::Settings;
use crate::error::VisualError;
use crate::host::SelectionHandle;
use crate::util::{cell_label, cell_number, cell_text, is_truthy};

use super::input::{
    CategoricalInput, DataView, ROLE_DISTANCE, ROLE_LINK_COLOR, ROLE_SOURCE, ROLE_SOURCE_FILL,
    ROLE_SOURCE_SIZE, ROLE_TARGET, TableInput,
};
use super::{Graph, Link, Node};

/// Incrementally merges node and link references into a [`Graph`].
///
/// Repeated labels reuse the existing node and only fill attributes that
/// are still empty. Repeated link keys do the same for distance and color.
pub struct GraphBuilder {
    graph: Graph,
    separator: String,
}

impl GraphBuilder {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            graph: Graph::default(),
            separator: separator.into(),
        }
    }

    pub fn link_key(&self, source: &str, target: &str) -> String {
        format!("{source}{}{target}", self.separator)
    }

    pub fn touch_node(
        &mut self,
        label: &str,
        fill: Option<String>,
        radius: Option<f32>,
        handle: Option<SelectionHandle>,
    ) -> usize {
        let index = match self.graph.index_of(label) {
            Some(index) => index,
            None => {
                let node = Node::new(label.to_owned());
                self.graph.insert_node(node)
            }
        };

        let node = &mut self.graph.nodes[index];
        if node.fill.is_none() {
            node.fill = fill;
        }
        if node.radius.is_none() {
            node.radius = radius.filter(|radius| *radius > 0.0);
        }
        if let Some(handle) = handle
            && !node.selection.contains(&handle)
        {
            node.selection.push(handle);
        }
        index
    }

    /// Adds the link `source -> target`, or fills the empty attributes of
    /// an existing one. Returns `None` for self-links and unknown endpoints.
    pub fn touch_link(
        &mut self,
        source: &str,
        target: &str,
        distance: Option<f32>,
        color: Option<String>,
    ) -> Option<usize> {
        let source_index = self.graph.index_of(source)?;
        let target_index = self.graph.index_of(target)?;
        if source_index == target_index {
            return None;
        }

        let distance = distance.filter(|distance| *distance > 0.0);
        let key = self.link_key(source, target);
        if let Some(&existing) = self.graph.link_index.get(&key) {
            let link = &mut self.graph.links[existing];
            if link.distance.is_none() {
                link.distance = distance;
            }
            if link.color.is_none() {
                link.color = color;
            }
            return Some(existing);
        }

        Some(self.graph.insert_link(Link {
            key,
            source: source_index,
            target: target_index,
            distance,
            color,
        }))
    }

    pub fn finish(self) -> Graph {
        self.graph
    }
}

pub fn build_graph(data: &DataView, settings: &Settings) -> Result<Graph, VisualError> {
    let separator = settings.advanced.separator.as_str();
    let graph = if let Some(table) = &data.table {
        build_from_table(table, separator)?
    } else if let Some(categorical) = &data.categorical {
        build_from_categorical(categorical, separator)?
    } else {
        return Err(VisualError::parameter(
            "Data view carries neither a table nor a categorical shape",
        ));
    };

    debug!(
        "graph built: {} nodes, {} links",
        graph.node_count(),
        graph.link_count()
    );
    Ok(graph)
}

fn build_from_table(table: &TableInput, separator: &str) -> Result<Graph, VisualError> {
    let Some(source_column) = table.column_index(ROLE_SOURCE) else {
        return Err(VisualError::parameter("Sources column is required"));
    };
    let target_column = table.column_index(ROLE_TARGET);
    let fill_column = table.column_index(ROLE_SOURCE_FILL);
    let size_column = table.column_index(ROLE_SOURCE_SIZE);
    let distance_column = table.column_index(ROLE_DISTANCE);
    let color_column = table.column_index(ROLE_LINK_COLOR);

    let mut builder = GraphBuilder::new(separator);
    for (row_index, row) in table.rows.iter().enumerate() {
        let cell = |column: Option<usize>| column.and_then(|column| row.get(column));

        let Some(source) = cell(Some(source_column)).and_then(cell_label) else {
            warn!("row {row_index} has no source label, skipping");
            continue;
        };
        let handle = table.row_handle(row_index);

        builder.touch_node(
            &source,
            cell(fill_column).and_then(cell_text),
            cell(size_column).and_then(cell_number),
            Some(handle.clone()),
        );

        let Some(target) = cell(target_column)
            .filter(|value| is_truthy(value))
            .and_then(cell_label)
        else {
            continue;
        };
        builder.touch_node(&target, None, None, Some(handle));
        builder.touch_link(
            &source,
            &target,
            cell(distance_column).and_then(cell_number),
            cell(color_column).and_then(cell_text),
        );
    }

    Ok(builder.finish())
}

fn build_from_categorical(
    categorical: &CategoricalInput,
    separator: &str,
) -> Result<Graph, VisualError> {
    let Some(categories) = categorical.categories.as_ref() else {
        return Err(VisualError::parameter("Categories are required"));
    };

    let mut builder = GraphBuilder::new(separator);
    for (group_index, group) in categorical.values.iter().enumerate() {
        let group_name = is_truthy(&group.source)
            .then(|| cell_label(&group.source))
            .flatten();
        if let Some(name) = &group_name {
            let handle = group
                .identity
                .clone()
                .unwrap_or_else(|| SelectionHandle::for_group(group_index));
            builder.touch_node(name, None, None, Some(handle));
        }

        for (category_index, category) in categories.values.iter().enumerate() {
            let Some(weight) = group.values.get(category_index) else {
                break;
            };
            if !is_truthy(weight) {
                continue;
            }
            let Some(label) = cell_label(category) else {
                continue;
            };

            builder.touch_node(&label, None, None, Some(categories.handle(category_index)));
            if let Some(name) = &group_name {
                builder.touch_link(name, &label, cell_number(weight), None);
            }
        }
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::graph::DataView;

    const SEP: &str = "<SEPARATOR>";

    fn table(columns: Value, rows: Value) -> DataView {
        serde_json::from_value(json!({ "table": { "columns": columns, "rows": rows } }))
            .expect("valid table")
    }

    fn source_target_distance() -> Value {
        json!([
            { "displayName": "From", "roles": { "source_node": true } },
            { "displayName": "To", "roles": { "target_node": true } },
            { "displayName": "Distance", "roles": { "distance": true } },
        ])
    }

    #[test]
    fn duplicate_rows_collapse_first_distance_wins() {
        let data = table(
            source_target_distance(),
            json!([["A", "B", 50], ["A", "B", 99]]),
        );
        let graph = build_graph(&data, &Settings::default()).expect("graph");

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.link_count(), 1);
        let link = graph.link(&format!("A{SEP}B")).expect("link A-B");
        assert_eq!(link.distance, Some(50.0));
    }

    #[test]
    fn repeated_link_rows_fill_missing_attributes_only() {
        let columns = json!([
            { "displayName": "From", "roles": { "source_node": true } },
            { "displayName": "To", "roles": { "target_node": true } },
            { "displayName": "Distance", "roles": { "distance": true } },
            { "displayName": "Color", "roles": { "link_color": true } },
        ]);
        let data = table(
            columns,
            json!([
                ["A", "B", null, null],
                ["A", "B", 99, "#ff0000"],
                ["A", "B", 12, "#00ff00"],
            ]),
        );
        let graph = build_graph(&data, &Settings::default()).expect("graph");

        assert_eq!(graph.link_count(), 1);
        let link = graph.link(&format!("A{SEP}B")).expect("link A-B");
        assert_eq!(link.distance, Some(99.0));
        assert_eq!(link.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn missing_source_column_is_parameter_error() {
        let data = table(
            json!([{ "displayName": "To", "roles": { "target_node": true } }]),
            json!([["B"]]),
        );
        let error = build_graph(&data, &Settings::default()).unwrap_err();
        assert!(error.is_parameter());
    }

    #[test]
    fn empty_data_view_is_parameter_error() {
        let error = build_graph(&DataView::default(), &Settings::default()).unwrap_err();
        assert!(error.is_parameter());
    }

    #[test]
    fn node_attributes_fill_gaps_only() {
        let data = table(
            json!([
                { "roles": { "source_node": true } },
                { "roles": { "source_fill": true } },
                { "roles": { "source_size": true } },
            ]),
            json!([["A", null, 4], ["A", "#ff0000", 9], ["A", "#00ff00", null]]),
        );
        let graph = build_graph(&data, &Settings::default()).expect("graph");

        let node = graph.node("A").expect("node A");
        assert_eq!(node.fill.as_deref(), Some("#ff0000"));
        assert_eq!(node.radius, Some(4.0));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn non_string_labels_are_coerced() {
        let data = table(source_target_distance(), json!([[1, 2, null], [1, "2", null]]));
        let graph = build_graph(&data, &Settings::default()).expect("graph");

        assert_eq!(graph.node_count(), 2);
        assert!(graph.node("1").is_some());
        assert_eq!(graph.link_count(), 1);
        assert_eq!(graph.links()[0].distance, None);
    }

    #[test]
    fn null_or_empty_targets_create_no_link() {
        let data = table(
            source_target_distance(),
            json!([["A", null, 10], ["B", "", 10], [null, "C", 10]]),
        );
        let graph = build_graph(&data, &Settings::default()).expect("graph");

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn self_links_are_dropped() {
        let data = table(source_target_distance(), json!([["A", "A", 10]]));
        let graph = build_graph(&data, &Settings::default()).expect("graph");
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn links_to_unknown_nodes_are_not_built() {
        let mut builder = GraphBuilder::new(SEP);
        builder.touch_node("A", None, None, None);
        assert!(builder.touch_link("A", "ghost", None, None).is_none());
        assert_eq!(builder.finish().link_count(), 0);
    }

    #[test]
    fn selection_handles_accumulate_distinct() {
        let data = table(
            source_target_distance(),
            json!([["A", "B", 1], ["A", "C", 1], ["C", "A", 1]]),
        );
        let graph = build_graph(&data, &Settings::default()).expect("graph");
        let handles = &graph.node("A").expect("A").selection;
        assert_eq!(
            handles,
            &vec![
                SelectionHandle::for_row(0),
                SelectionHandle::for_row(1),
                SelectionHandle::for_row(2),
            ]
        );
    }

    #[test]
    fn categorical_skips_falsy_weights() {
        let data: DataView = serde_json::from_value(json!({
            "categorical": {
                "categories": { "values": ["X", "Y"] },
                "values": [{ "source": "G1", "values": [5, 0] }],
            }
        }))
        .expect("categorical");
        let graph = build_graph(&data, &Settings::default()).expect("graph");

        let labels = graph
            .nodes()
            .iter()
            .map(|node| node.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["G1", "X"]);
        assert_eq!(graph.link_count(), 1);
        assert_eq!(graph.link(&format!("G1{SEP}X")).and_then(|l| l.distance), Some(5.0));
    }

    #[test]
    fn categorical_without_group_name_adds_nodes_only() {
        let data: DataView = serde_json::from_value(json!({
            "categorical": {
                "categories": { "values": ["X", "Y"] },
                "values": [{ "source": null, "values": [1, 2] }],
            }
        }))
        .expect("categorical");
        let graph = build_graph(&data, &Settings::default()).expect("graph");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn categorical_without_categories_is_parameter_error() {
        let data: DataView =
            serde_json::from_value(json!({ "categorical": { "values": [] } })).expect("shape");
        assert!(build_graph(&data, &Settings::default()).unwrap_err().is_parameter());
    }

    #[test]
    fn custom_separator_is_used_in_keys() {
        let mut settings = Settings::default();
        settings.advanced.separator = "->".to_owned();
        let data = table(source_target_distance(), json!([["A", "B", null]]));
        let graph = build_graph(&data, &settings).expect("graph");
        assert!(graph.link("A->B").is_some());
    }
}
