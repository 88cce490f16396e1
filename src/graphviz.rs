use std::fmt::Debug;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::index::{IndexType, NodeIndex};
use crate::node::{Color, Node};
use crate::treemap::TreeMap;

impl<K, V, C, Ix> TreeMap<K, V, C, Ix>
where
    K: Debug,
    V: Debug,
    Ix: IndexType,
{
    /// Dump the tree as a graphviz digraph, labelling nodes with key and value.
    ///
    /// # Errors
    ///
    /// Returns any error raised while creating or writing the file.
    pub fn draw(&self, path: impl AsRef<Path>) -> io::Result<()> {
        self.draw_with(path, |node| format!("{:?}: {:?}", node.key(), node.value()))
    }

    /// Dump the tree as a graphviz digraph, labelling nodes with the key only.
    ///
    /// # Errors
    ///
    /// Returns any error raised while creating or writing the file.
    pub fn draw_without_value(&self, path: impl AsRef<Path>) -> io::Result<()> {
        self.draw_with(path, |node| format!("{:?}", node.key()))
    }

    fn draw_with<F>(&self, path: impl AsRef<Path>, label: F) -> io::Result<()>
    where
        F: Fn(&Node<K, V, Ix>) -> String,
    {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "digraph {{")?;
        writeln!(out, "    node [style=filled, fontcolor=white];")?;
        if !self.root.is_sentinel() {
            self.draw_node(&mut out, self.root, &label)?;
        }
        writeln!(out, "}}")?;
        out.flush()
    }

    fn draw_node<W, F>(&self, out: &mut W, x: NodeIndex<Ix>, label: &F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&Node<K, V, Ix>) -> String,
    {
        let node = &self.nodes[x.index()];
        let fill = match node.color() {
            Color::Red => "red",
            Color::Black => "black",
        };
        writeln!(
            out,
            "    n{} [label={:?}, fillcolor={fill}];",
            x.index(),
            label(node)
        )?;
        for child in [node.left(), node.right()] {
            if child.is_sentinel() {
                continue;
            }
            writeln!(out, "    n{} -> n{};", x.index(), child.index())?;
            self.draw_node(out, child, label)?;
        }
        Ok(())
    }
}
