//! Diagnostics rendering of codes and pairs as drawn trees.

use termtree::Tree;

use crate::code::PrefixCode;
use crate::pair::TreePair;

pub trait ToTreeString {
    fn to_tree_string(&self) -> Tree<String>;
}

impl ToTreeString for PrefixCode {
    fn to_tree_string(&self) -> Tree<String> {
        build_node(self, &[])
    }
}

fn build_node(code: &PrefixCode, node: &[u8]) -> Tree<String> {
    let alphabet = code.alphabet();
    if let Some(label) = code.label_at_leaf(node) {
        return Tree::new(format!("[{} {}]", alphabet.render_path(node), label));
    }

    let name = if node.is_empty() {
        "·".to_string()
    } else {
        alphabet.render_path(node)
    };
    let children: Vec<_> = (0..alphabet.arity() as u8)
        .map(|a| {
            let mut child = node.to_vec();
            child.push(a);
            build_node(code, &child)
        })
        .collect();
    Tree::new(name).with_leaves(children)
}

impl ToTreeString for TreePair {
    fn to_tree_string(&self) -> Tree<String> {
        Tree::new(format!("tree pair, {} leaves", self.size())).with_leaves(vec![
            Tree::new("D".to_string()).with_leaves(vec![self.domain().to_tree_string()]),
            Tree::new("R".to_string()).with_leaves(vec![self.range().to_tree_string()]),
        ])
    }
}
