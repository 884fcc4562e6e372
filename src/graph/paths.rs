//! Root-to-package path enumeration.
//!
//! Walks the recorded edges depth-first from the root, following each
//! node's edges in the order the builder recorded them. A package already
//! on the current path is never entered again, which keeps cycle-closing
//! edges from looping while diamonds still yield one path per branch.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;

use super::dependency_graph::DependencyGraph;

/// Returns every simple path from the root to `target`.
///
/// Unknown or unreachable targets yield an empty list.
///
/// # Example
///
/// ```rust
/// use depgraph::graph::{build, find_paths};
/// use depgraph::parser::{DependencyRef, PackageDescriptor, Registry};
///
/// let app = PackageDescriptor::new("app", "app")
///     .with_dependency(DependencyRef::new("a", "a"))
///     .with_dependency(DependencyRef::new("b", "b"));
/// let a = PackageDescriptor::new("a", "a").with_dependency(DependencyRef::new("c", "c"));
/// let b = PackageDescriptor::new("b", "b").with_dependency(DependencyRef::new("c", "c"));
/// let registry: Registry = vec![app.clone(), a, b].into_iter().collect();
///
/// let graph = build(&app, &registry, None).unwrap();
/// assert_eq!(
///     find_paths(&graph, "c"),
///     vec![vec!["app", "a", "c"], vec!["app", "b", "c"]]
/// );
/// assert!(find_paths(&graph, "nope").is_empty());
/// ```
pub fn find_paths(graph: &DependencyGraph, target: &str) -> Vec<Vec<String>> {
    find_paths_limited(graph, target, None)
}

/// Like [`find_paths`], but stops after `limit` paths when one is given.
pub fn find_paths_limited(
    graph: &DependencyGraph,
    target: &str,
    limit: Option<usize>,
) -> Vec<Vec<String>> {
    let Some(target_idx) = graph.index_of(target) else {
        return Vec::new();
    };
    if limit == Some(0) {
        return Vec::new();
    }

    let root = graph.root_index();
    if root == target_idx {
        return vec![vec![graph.root().id.clone()]];
    }

    let mut paths: Vec<Vec<String>> = Vec::new();
    let mut on_path: HashSet<NodeIndex> = HashSet::from([root]);
    let mut stack = vec![PathFrame::open(graph, root)];

    while let Some(frame) = stack.last_mut() {
        let Some(&next) = frame.successors.get(frame.next) else {
            on_path.remove(&frame.index);
            stack.pop();
            continue;
        };
        frame.next += 1;

        if on_path.contains(&next) {
            continue;
        }

        if next == target_idx {
            paths.push(
                stack
                    .iter()
                    .map(|open| open.index)
                    .chain(std::iter::once(next))
                    .filter_map(|idx| graph.node_at(idx).map(|node| node.id.clone()))
                    .collect(),
            );
            if limit.is_some_and(|max| paths.len() >= max) {
                break;
            }
            continue;
        }

        on_path.insert(next);
        stack.push(PathFrame::open(graph, next));
    }

    paths
}

struct PathFrame {
    index: NodeIndex,
    successors: Vec<NodeIndex>,
    next: usize,
}

impl PathFrame {
    fn open(graph: &DependencyGraph, index: NodeIndex) -> Self {
        Self {
            index,
            successors: graph.successors_in_order(index),
            next: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use crate::parser::{DependencyRef, PackageDescriptor, Registry};

    fn pkg(id: &str, deps: &[&str]) -> PackageDescriptor {
        deps.iter().fold(PackageDescriptor::new(id, id), |pkg, dep| {
            pkg.with_dependency(DependencyRef::new(*dep, *dep))
        })
    }

    fn graph_of(pkgs: &[PackageDescriptor]) -> DependencyGraph {
        let registry: Registry = pkgs.iter().cloned().collect();
        build(&pkgs[0], &registry, None).unwrap()
    }

    #[test]
    fn test_path_to_root_is_trivial() {
        let graph = graph_of(&[pkg("app", &["a"]), pkg("a", &[])]);
        assert_eq!(find_paths(&graph, "app"), vec![vec!["app"]]);
    }

    #[test]
    fn test_unknown_target() {
        let graph = graph_of(&[pkg("app", &["a"])]);
        assert!(find_paths(&graph, "missing").is_empty());
    }

    #[test]
    fn test_single_chain_path() {
        let graph = graph_of(&[pkg("app", &["a"]), pkg("a", &["b"]), pkg("b", &[])]);
        assert_eq!(find_paths(&graph, "b"), vec![vec!["app", "a", "b"]]);
    }

    #[test]
    fn test_diamond_yields_two_paths() {
        let graph = graph_of(&[
            pkg("app", &["a", "b"]),
            pkg("a", &["c"]),
            pkg("b", &["c"]),
            pkg("c", &[]),
        ]);

        assert_eq!(
            find_paths(&graph, "c"),
            vec![vec!["app", "a", "c"], vec!["app", "b", "c"]]
        );
    }

    #[test]
    fn test_cycle_edges_do_not_loop() {
        // app -> a -> b -> a, b -> c
        let graph = graph_of(&[
            pkg("app", &["a"]),
            pkg("a", &["b"]),
            pkg("b", &["a", "c"]),
            pkg("c", &[]),
        ]);

        assert!(graph.has_cycles());
        assert_eq!(find_paths(&graph, "c"), vec![vec!["app", "a", "b", "c"]]);
        assert_eq!(find_paths(&graph, "a"), vec![vec!["app", "a"]]);
    }

    #[test]
    fn test_paths_follow_shortcut_edges() {
        // c is first reached through a -> b -> c, then root -> c is recorded
        let graph = graph_of(&[
            pkg("app", &["a", "c"]),
            pkg("a", &["b"]),
            pkg("b", &["c"]),
            pkg("c", &[]),
        ]);

        assert_eq!(
            find_paths(&graph, "c"),
            vec![vec!["app", "a", "b", "c"], vec!["app", "c"]]
        );
    }

    #[test]
    fn test_every_path_is_simple() {
        let graph = graph_of(&[
            pkg("app", &["a", "b"]),
            pkg("a", &["b", "c"]),
            pkg("b", &["a", "c"]),
            pkg("c", &["app"]),
        ]);

        let paths = find_paths(&graph, "c");
        assert!(!paths.is_empty());
        for path in &paths {
            let unique: HashSet<_> = path.iter().collect();
            assert_eq!(unique.len(), path.len());
            assert_eq!(path.first().map(String::as_str), Some("app"));
            assert_eq!(path.last().map(String::as_str), Some("c"));
        }
    }

    #[test]
    fn test_limit_stops_early() {
        let graph = graph_of(&[
            pkg("app", &["a", "b"]),
            pkg("a", &["c"]),
            pkg("b", &["c"]),
            pkg("c", &[]),
        ]);

        assert_eq!(
            find_paths_limited(&graph, "c", Some(1)),
            vec![vec!["app", "a", "c"]]
        );
        assert!(find_paths_limited(&graph, "c", Some(0)).is_empty());
    }
}
