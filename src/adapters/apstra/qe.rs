// Copyright (c) 2025 - Cowboy AI, Inc.

//! Rendering of typed traversals into Apstra query-engine expressions
//!
//! ```text
//! node('system', id='leaf-1', tag=has_any(['border1']))
//!   .out('hosted_interfaces').node('interface', if_name='xe-0/0/10')
//!   ...
//!   .in_().node('domain', name='bgp')
//! ```

use crate::topology::{Direction, NodePattern, TraversalSpec};

/// Render a traversal as a single QE expression
pub fn render(spec: &TraversalSpec) -> String {
    let mut query = render_node(&spec.anchor);
    for step in &spec.steps {
        let method = match step.direction {
            Direction::Out => "out",
            Direction::In => "in_",
        };
        match &step.edge {
            Some(edge) => query.push_str(&format!(".{}({})", method, quote(edge))),
            None => query.push_str(&format!(".{}()", method)),
        }
        query.push('.');
        query.push_str(&render_node(&step.node));
    }
    query
}

fn render_node(pattern: &NodePattern) -> String {
    let mut args = vec![quote(&pattern.node_type)];
    if let Some(name) = &pattern.bind_as {
        args.push(format!("name={}", quote(name)));
    }
    for (key, value) in &pattern.properties {
        args.push(format!("{}={}", key, quote(value)));
    }
    if !pattern.tags_any.is_empty() {
        let tags: Vec<String> = pattern.tags_any.iter().map(|t| quote(t)).collect();
        args.push(format!("tag=has_any([{}])", tags.join(", ")));
    }
    format!("node({})", args.join(", "))
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
