// {{{ Copyright (c) Paul R. Tagliamonte <paultag@debian.org>, 2024
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE. }}}

//! Stable topological sort over a DAG given as `node -> predecessors`,
//! used to expand seed inheritance into a linear growth order.

use std::collections::{HashMap, HashSet};

/// Errors produced while sorting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The graph contains a cycle; the offending nodes are listed in
    /// first-seen order.
    Cycle(Vec<String>),
}
crate::errors::error_enum!(Error);

/// Return `nodes` in an order where every node appears after all nodes
/// listed as its predecessor in `inherit`. Ties (nodes with no
/// remaining unsorted predecessor) are broken by `nodes`' input order,
/// so the result is deterministic and stable rather than dependent on
/// `inherit`'s hash iteration order.
pub fn topo_sort(
    nodes: &[String],
    inherit: &HashMap<String, Vec<String>>,
) -> Result<Vec<String>, Error> {
    let empty: Vec<String> = Vec::new();
    let mut sorted: Vec<String> = Vec::with_capacity(nodes.len());
    let mut done: HashSet<&str> = HashSet::with_capacity(nodes.len());
    let mut in_progress: HashSet<&str> = HashSet::new();

    fn visit<'a>(
        node: &'a str,
        nodes_set: &HashSet<&'a str>,
        inherit: &'a HashMap<String, Vec<String>>,
        empty: &'a [String],
        done: &mut HashSet<&'a str>,
        in_progress: &mut HashSet<&'a str>,
        sorted: &mut Vec<String>,
        stack: &mut Vec<String>,
    ) -> Result<(), Error> {
        if done.contains(node) {
            return Ok(());
        }
        if in_progress.contains(node) {
            stack.push(node.to_string());
            return Err(Error::Cycle(stack.clone()));
        }
        in_progress.insert(node);
        stack.push(node.to_string());

        for predecessor in inherit.get(node).map(Vec::as_slice).unwrap_or(empty) {
            if nodes_set.contains(predecessor.as_str()) {
                visit(
                    predecessor,
                    nodes_set,
                    inherit,
                    empty,
                    done,
                    in_progress,
                    sorted,
                    stack,
                )?;
            }
        }

        stack.pop();
        in_progress.remove(node);
        done.insert(node);
        sorted.push(node.to_string());
        Ok(())
    }

    let nodes_set: HashSet<&str> = nodes.iter().map(String::as_str).collect();
    for node in nodes {
        let mut stack = Vec::new();
        visit(
            node,
            &nodes_set,
            inherit,
            &empty,
            &mut done,
            &mut in_progress,
            &mut sorted,
            &mut stack,
        )?;
    }

    Ok(sorted)
}

#[cfg(test)]
mod test {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn simple_chain() {
        let nodes = names(&["a", "b", "c"]);
        let mut inherit = HashMap::new();
        inherit.insert("a".to_string(), names(&["b"]));
        inherit.insert("b".to_string(), names(&["c"]));

        let sorted = topo_sort(&nodes, &inherit).unwrap();
        assert_eq!(names(&["c", "b", "a"]), sorted);
    }

    #[test]
    fn independent_nodes_keep_input_order() {
        let nodes = names(&["a", "b", "c"]);
        let inherit = HashMap::new();

        let sorted = topo_sort(&nodes, &inherit).unwrap();
        assert_eq!(names(&["a", "b", "c"]), sorted);
    }

    #[test]
    fn detects_cycle() {
        let nodes = names(&["a", "b"]);
        let mut inherit = HashMap::new();
        inherit.insert("a".to_string(), names(&["b"]));
        inherit.insert("b".to_string(), names(&["a"]));

        assert!(topo_sort(&nodes, &inherit).is_err());
    }

    #[test]
    fn diamond_dependency() {
        let nodes = names(&["a", "b", "c", "d"]);
        let mut inherit = HashMap::new();
        inherit.insert("a".to_string(), names(&["b", "c"]));
        inherit.insert("b".to_string(), names(&["d"]));
        inherit.insert("c".to_string(), names(&["d"]));

        let sorted = topo_sort(&nodes, &inherit).unwrap();
        let pos = |n: &str| sorted.iter().position(|x| x == n).unwrap();
        assert!(pos("d") < pos("b"));
        assert!(pos("d") < pos("c"));
        assert!(pos("b") < pos("a"));
        assert!(pos("c") < pos("a"));
    }
}

// vim: foldmethod=marker
