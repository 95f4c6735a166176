//! Shape a graph snapshot for the frontend visualization.

use std::collections::HashSet;

use mailgraph_core::{GraphElement, GraphSnapshot, SentEmail};

/// Flatten a snapshot into visualization elements: every node first, then
/// every edge, each wrapped as `{"data": {...}}`.
pub fn to_elements(snapshot: GraphSnapshot) -> Vec<GraphElement> {
    let GraphSnapshot { nodes, edges } = snapshot;
    let mut elements = Vec::with_capacity(nodes.len() + edges.len());
    elements.extend(nodes.into_iter().map(GraphElement::node));
    elements.extend(edges.into_iter().map(GraphElement::edge));
    elements
}

/// Edges whose source or target id is not among the snapshot's nodes.
///
/// The two reads behind a snapshot are not isolated from each other, so a
/// write landing between them can leave an edge pointing at a node the
/// snapshot never saw.
pub fn dangling_edges(snapshot: &GraphSnapshot) -> Vec<&SentEmail> {
    let ids: HashSet<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
    snapshot
        .edges
        .iter()
        .filter(|e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use mailgraph_core::{Person, Timestamp};

    use super::*;

    fn person(id: &str, email: &str) -> Person {
        Person {
            id: id.to_string(),
            email: Some(email.to_string()),
        }
    }

    fn sent(source: &str, target: &str, subject: &str) -> SentEmail {
        SentEmail {
            source: source.to_string(),
            target: target.to_string(),
            subject: Some(subject.to_string()),
            timestamp: Some(Timestamp::from("t1")),
        }
    }

    #[test]
    fn nodes_come_before_edges() {
        let snapshot = GraphSnapshot {
            nodes: vec![person("0", "a@x.com"), person("1", "b@x.com")],
            edges: vec![sent("0", "1", "Hi")],
        };

        let elements = to_elements(snapshot);
        assert_eq!(elements.len(), 3);
        assert!(elements[0].is_node());
        assert!(elements[1].is_node());
        assert!(!elements[2].is_node());

        let json = serde_json::to_value(&elements).unwrap();
        assert_eq!(json[0]["data"]["email"], "a@x.com");
        assert_eq!(json[2]["data"]["subject"], "Hi");
        assert_eq!(json[2]["data"]["source"], "0");
    }

    #[test]
    fn empty_graph_has_no_elements() {
        assert!(to_elements(GraphSnapshot::default()).is_empty());
    }

    #[test]
    fn store_order_is_preserved() {
        let snapshot = GraphSnapshot {
            nodes: vec![person("9", "z@x.com"), person("2", "a@x.com")],
            edges: vec![],
        };
        let elements = to_elements(snapshot);
        let json = serde_json::to_value(&elements).unwrap();
        assert_eq!(json[0]["data"]["id"], "9");
        assert_eq!(json[1]["data"]["id"], "2");
    }

    #[test]
    fn detects_dangling_edges() {
        let snapshot = GraphSnapshot {
            nodes: vec![person("0", "a@x.com"), person("1", "b@x.com")],
            edges: vec![sent("0", "1", "ok"), sent("0", "7", "orphan")],
        };
        let dangling = dangling_edges(&snapshot);
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].subject.as_deref(), Some("orphan"));
    }
}
