/// Depth-first walk over a forest
///
/// [`Walk`] visits every node exactly once in pre-order and reports leaving
/// each node exactly once, after its whole subtree. It keeps an explicit stack
/// of frames instead of recursing, so arbitrarily deep trees cannot exhaust
/// the call stack.
///
/// # Examples
///
/// ```
/// use route_tree::tree::{Step, Walk};
///
/// struct Node(&'static str, Vec<Node>);
///
/// let forest = vec![Node("a", vec![Node("b", vec![]), Node("c", vec![])]), Node("d", vec![])];
///
/// let trace: Vec<String> = Walk::new(&forest, |node| node.1.as_slice())
///     .map(|step| match step {
///         Step::Enter { node, .. } => format!("+{}", node.0),
///         Step::Leave { node, .. } => format!("-{}", node.0),
///     })
///     .collect();
///
/// assert_eq!(trace, ["+a", "+b", "-b", "+c", "-c", "-a", "+d", "-d"]);
/// ```

use std::iter::Enumerate;
use std::slice;

/// One event of a [`Walk`]
#[derive(Debug)]
pub enum Step<'a, T> {
    /// Entering `node`, the `index`-th child of its parent (or root list)
    Enter {
        index: usize,
        depth: usize,
        node: &'a T,
    },
    /// Leaving `node`; its whole subtree has been visited
    Leave { depth: usize, node: &'a T },
}

struct Frame<'a, T> {
    children: Enumerate<slice::Iter<'a, T>>,
    // None for the root list
    parent: Option<&'a T>,
}

/// Iterative pre-order traversal with leave notifications
pub struct Walk<'a, T, F> {
    stack: Vec<Frame<'a, T>>,
    // Leaves are left right after being entered
    pending_leave: Option<(usize, &'a T)>,
    children: F,
}

impl<'a, T, F> Walk<'a, T, F>
where
    F: Fn(&'a T) -> &'a [T],
{
    /// Walks `roots` and their descendants as reported by `children`
    pub fn new(roots: &'a [T], children: F) -> Self {
        Self {
            stack: vec![Frame {
                children: roots.iter().enumerate(),
                parent: None,
            }],
            pending_leave: None,
            children,
        }
    }
}

impl<'a, T, F> Iterator for Walk<'a, T, F>
where
    F: Fn(&'a T) -> &'a [T],
{
    type Item = Step<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((depth, node)) = self.pending_leave.take() {
            return Some(Step::Leave { depth, node });
        }

        loop {
            let depth = self.stack.len().checked_sub(1)?;
            let frame = self.stack.last_mut()?;

            match frame.children.next() {
                Some((index, node)) => {
                    let children = (self.children)(node);

                    if children.is_empty() {
                        self.pending_leave = Some((depth, node));
                    } else {
                        self.stack.push(Frame {
                            children: children.iter().enumerate(),
                            parent: Some(node),
                        });
                    }

                    return Some(Step::Enter { index, depth, node });
                }
                None => {
                    // Backtrack: the frame's parent is complete
                    let parent = self.stack.pop().and_then(|frame| frame.parent);

                    if let Some(node) = parent {
                        return Some(Step::Leave {
                            depth: depth - 1,
                            node,
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Node {
        name: &'static str,
        children: Vec<Node>,
    }

    fn node(name: &'static str, children: Vec<Node>) -> Node {
        Node { name, children }
    }

    fn children(node: &Node) -> &[Node] {
        &node.children
    }

    fn trace(forest: &[Node]) -> Vec<String> {
        Walk::new(forest, children)
            .map(|step| match step {
                Step::Enter { index, depth, node } => {
                    format!("enter {} #{} @{}", node.name, index, depth)
                }
                Step::Leave { depth, node } => format!("leave {} @{}", node.name, depth),
            })
            .collect()
    }

    #[test]
    fn test_empty_forest() {
        assert!(trace(&[]).is_empty());
    }

    #[test]
    fn test_nested_forest() {
        let forest = vec![
            node("root", vec![node("a", vec![node("a1", vec![])]), node("b", vec![])]),
            node("other", vec![]),
        ];

        assert_eq!(
            trace(&forest),
            vec![
                "enter root #0 @0",
                "enter a #0 @1",
                "enter a1 #0 @2",
                "leave a1 @2",
                "leave a @1",
                "enter b #1 @1",
                "leave b @1",
                "leave root @0",
                "enter other #1 @0",
                "leave other @0",
            ]
        );
    }

    #[test]
    fn test_every_node_entered_and_left_once() {
        let forest = vec![node(
            "r",
            vec![
                node("x", vec![node("x1", vec![]), node("x2", vec![node("x21", vec![])])]),
                node("y", vec![]),
            ],
        )];

        let steps: Vec<_> = Walk::new(&forest, children).collect();
        let enters = steps.iter().filter(|s| matches!(s, Step::Enter { .. })).count();
        let leaves = steps.iter().filter(|s| matches!(s, Step::Leave { .. })).count();

        assert_eq!(enters, 6);
        assert_eq!(leaves, 6);
    }

    #[test]
    fn test_deep_tree_does_not_recurse() {
        let mut deep = node("leaf", vec![]);
        for _ in 0..10_000 {
            deep = node("n", vec![deep]);
        }

        let forest = vec![deep];
        let max_depth = Walk::new(&forest, children)
            .filter_map(|step| match step {
                Step::Enter { depth, .. } => Some(depth),
                Step::Leave { .. } => None,
            })
            .max();

        assert_eq!(max_depth, Some(10_000));

        // Drop iteratively; the derived drop glue would recurse
        let mut stack = forest;
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}
