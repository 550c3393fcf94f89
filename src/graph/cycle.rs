use super::DependencyGraph;
use crate::errors::{ScheduleError, ScheduleResult};
use tracing::warn;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Find one cycle, returned as node names in edge order.
///
/// Depth-first search over every node in insertion order; an edge into a node
/// that is still on the stack closes a cycle. The traversal keeps its own
/// stack so long dependency chains cannot overflow the call stack.
pub fn find_cycle(graph: &DependencyGraph) -> Option<Vec<String>> {
    let mut marks = vec![Mark::Unvisited; graph.len()];
    // (node, position of the next successor to visit)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..graph.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::OnStack;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let successors = &graph.node(node).successors;
            if frame.1 == successors.len() {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            }
            let succ = successors[frame.1];
            frame.1 += 1;

            match marks[succ] {
                Mark::Unvisited => {
                    marks[succ] = Mark::OnStack;
                    stack.push((succ, 0));
                }
                Mark::OnStack => {
                    let start = stack
                        .iter()
                        .position(|&(n, _)| n == succ)
                        .unwrap_or_default();
                    return Some(
                        stack[start..]
                            .iter()
                            .map(|&(n, _)| graph.name(n).to_string())
                            .collect(),
                    );
                }
                Mark::Done => {}
            }
        }
    }
    None
}

pub fn is_acyclic(graph: &DependencyGraph) -> bool {
    find_cycle(graph).is_none()
}

pub fn ensure_acyclic(graph: &DependencyGraph) -> ScheduleResult<()> {
    match find_cycle(graph) {
        None => Ok(()),
        Some(cycle) => {
            warn!(?cycle, "dependency graph contains a cycle");
            Err(ScheduleError::InvalidDependencyGraph { cycle })
        }
    }
}
