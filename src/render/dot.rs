//! DOT output
//!
//! The drawable graph is assembled in a petgraph `DiGraph` (one node per
//! component ID, one edge per dependency) and then printed node by node and
//! edge by edge, in insertion order.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::label::expand_label;
use super::{Face, RenderError};
use crate::config::Config;
use crate::domain::{Component, ComponentId, Components, Selection};

type Attributes = BTreeMap<String, String>;

#[derive(Debug)]
struct DotNode {
    id: ComponentId,
    attributes: Attributes,
}

/// Nodes and edges to be printed
#[derive(Debug, Default)]
struct DotGraph {
    graph: DiGraph<DotNode, Attributes>,

    /// Map from component ID to node index
    node_map: HashMap<ComponentId, NodeIndex>,
}

impl DotGraph {
    /// Adds a node unless one with the same ID exists
    fn add_node(&mut self, id: &ComponentId, attributes: Attributes) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(DotNode {
            id: id.clone(),
            attributes,
        });
        self.node_map.insert(id.clone(), idx);
        idx
    }

    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, attributes: Attributes) {
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, attributes);
        }
    }

    fn write(&self, graph_attributes: &Attributes) -> Result<String, RenderError> {
        let mut out = String::new();
        writeln!(out, "digraph G {{")?;
        for (key, value) in graph_attributes {
            writeln!(out, "\t{}={};", key, quote(value))?;
        }
        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            writeln!(
                out,
                "\t{}{};",
                quote(node.id.as_str()),
                attribute_list(&node.attributes)
            )?;
        }
        for edge in self.graph.edge_references() {
            let from = &self.graph[edge.source()];
            let to = &self.graph[edge.target()];
            writeln!(
                out,
                "\t{}->{}{};",
                quote(from.id.as_str()),
                quote(to.id.as_str()),
                attribute_list(edge.weight())
            )?;
        }
        writeln!(out, "}}")?;
        Ok(out)
    }
}

/// Renders `result` as DOT
///
/// Dependency targets are looked up in `all_components`; unknown ones become
/// placeholder nodes styled with the configured `undefined` attributes.
pub fn render_dot(
    result: &Selection<'_>,
    all_components: &Components,
    faces: &[Face],
    config: &Config,
) -> Result<String, RenderError> {
    let mut graph = DotGraph::default();

    for component in result.iter() {
        let from = graph.add_node(component.id(), node_attributes(component, faces, config)?);

        for (dependency_id, relation) in component.dependencies().iter() {
            let (dependency, _) = all_components.get_or_undefined(dependency_id);
            let to = graph.add_node(
                dependency.id(),
                node_attributes(&dependency, faces, config)?,
            );

            let mut edge_attributes = Attributes::from([
                ("arrowsize".to_string(), config.arrowsize.clone()),
                ("penwidth".to_string(), config.penwidth.clone()),
            ]);
            if !relation.is_empty() {
                edge_attributes.insert("label".to_string(), relation.description.clone());
            }
            graph.add_edge(from, to, edge_attributes);
        }
    }

    let graph_attributes = Attributes::from([
        ("fontsize".to_string(), config.fontsize.clone()),
        ("rankdir".to_string(), config.rankdir.clone()),
    ]);
    graph.write(&graph_attributes)
}

/// Collects the attributes of every matching face, later faces winning
fn node_attributes(
    component: &Component,
    faces: &[Face],
    config: &Config,
) -> Result<Attributes, RenderError> {
    let mut attributes = Attributes::new();
    for face in faces.iter().filter(|f| f.matches(component)) {
        for (key, value) in &face.attributes {
            let value = if key == "label" {
                expand_label(value, component)?
            } else {
                value.clone()
            };
            attributes.insert(key.clone(), value);
        }
    }

    attributes.insert("penwidth".to_string(), config.penwidth.clone());
    if component.is_undefined() {
        attributes.extend(config.undefined.clone());
    }

    Ok(attributes)
}

fn attribute_list(attributes: &Attributes) -> String {
    if attributes.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = attributes
        .iter()
        .map(|(key, value)| format!("{}={}", key, quote(value)))
        .collect();
    format!(" [ {} ]", pairs.join(", "))
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AllPassFilter, Filter, LabelsFilter, Relation};

    fn components() -> Components {
        let mut cs = Components::new();
        let mut api = Component::new(None, ComponentId::new("api"));
        api.add_label("tier", "web");
        api.add_label("name", "Orders");
        api.depend_on(ComponentId::new("db"), Relation::new("reads"));
        api.depend_on(ComponentId::new("ghost"), Relation::default());
        let mut db = Component::new(None, ComponentId::new("db"));
        db.add_label("tier", "data");
        cs.add(api);
        cs.add(db);
        cs.complement().unwrap();
        cs
    }

    #[test]
    fn renders_nodes_and_edges() {
        let cs = components();
        let result = AllPassFilter.filter(&cs);
        let dot = render_dot(&result, &cs, &[], &Config::default()).unwrap();

        assert!(dot.starts_with("digraph G {\n"));
        assert!(dot.contains("\trankdir=\"LR\";\n"));
        assert!(dot.contains("\tfontsize=\"11.0\";\n"));
        assert!(dot.contains("\t\"api\" [ penwidth=\"0.75\" ];\n"));
        assert!(dot.contains(
            "\t\"api\"->\"db\" [ arrowsize=\"0.75\", label=\"reads\", penwidth=\"0.75\" ];\n"
        ));
        assert!(dot.contains("\t\"api\"->\"ghost\" [ arrowsize=\"0.75\", penwidth=\"0.75\" ];\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn each_node_is_printed_once() {
        let cs = components();
        let result = AllPassFilter.filter(&cs);
        let dot = render_dot(&result, &cs, &[], &Config::default()).unwrap();

        assert_eq!(dot.matches("\t\"db\" [").count(), 1);
    }

    #[test]
    fn undefined_targets_get_placeholder_style() {
        let cs = components();
        let result = AllPassFilter.filter(&cs);
        let dot = render_dot(&result, &cs, &[], &Config::default()).unwrap();

        assert!(dot.contains("\t\"ghost\" [ penwidth=\"0.75\", style=\"dashed\" ];\n"));
    }

    #[test]
    fn faces_style_matching_nodes() {
        let cs = components();
        let result = AllPassFilter.filter(&cs);
        let faces = vec![
            Face::new(
                LabelsFilter::new([("tier".to_string(), "web".to_string())]),
                Attributes::from([
                    ("shape".to_string(), "box".to_string()),
                    ("label".to_string(), "{name} API".to_string()),
                ]),
            ),
            Face::new(
                LabelsFilter::new([("tier".to_string(), "web".to_string())]),
                Attributes::from([("shape".to_string(), "ellipse".to_string())]),
            ),
        ];

        let dot = render_dot(&result, &cs, &faces, &Config::default()).unwrap();
        assert!(dot.contains(
            "\t\"api\" [ label=\"Orders API\", penwidth=\"0.75\", shape=\"ellipse\" ];\n"
        ));
        assert!(dot.contains("\t\"db\" [ penwidth=\"0.75\" ];\n"));
    }

    #[test]
    fn label_template_errors_propagate() {
        let cs = components();
        let result = AllPassFilter.filter(&cs);
        let faces = vec![Face::new(
            LabelsFilter::new([("tier".to_string(), "data".to_string())]),
            Attributes::from([("label".to_string(), "{name}".to_string())]),
        )];

        let err = render_dot(&result, &cs, &faces, &Config::default()).unwrap_err();
        assert!(matches!(err, RenderError::UndefinedLabel { .. }));
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }
}
