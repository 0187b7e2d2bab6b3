//! Groups the tokenizer's flat block sequence under headings.
//!
//! Every heading owns all subsequent content until a heading of equal or
//! lower level appears. The result is an arena of nodes with index-based
//! children; a synthetic level-0 root owns whatever precedes the first
//! heading. No validation happens here — content at the root, for example,
//! is judged by the document assembler.

use crate::tokenize::{BlockKind, BlockNode, SourceSpan};

pub type NodeId = usize;

/// One heading and everything it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineNode {
    /// Heading depth; 0 only for the synthetic root.
    pub level: u8,
    /// The heading block that opened this node; `None` only for the root.
    pub heading: Option<BlockNode>,
    /// Non-heading blocks owned directly by this heading.
    pub content: Vec<BlockNode>,
    /// Direct subheadings, in document order.
    pub children: Vec<NodeId>,
}

impl OutlineNode {
    /// Depth, text and span of this node's heading. `None` for the root.
    pub fn heading_parts(&self) -> Option<(u8, &str, SourceSpan)> {
        let heading = self.heading.as_ref()?;
        match &heading.kind {
            BlockKind::Heading { depth, text } => Some((*depth, text.as_str(), heading.span)),
            _ => None,
        }
    }
}

/// Arena-backed heading-ownership tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    nodes: Vec<OutlineNode>,
}

impl Outline {
    /// Build the tree with an explicit stack of open headings, seeded with
    /// the root, which is never popped.
    pub fn build(blocks: Vec<BlockNode>) -> Self {
        let mut nodes = vec![OutlineNode {
            level: 0,
            heading: None,
            content: Vec::new(),
            children: Vec::new(),
        }];
        let mut stack: Vec<NodeId> = vec![0];

        for block in blocks {
            let top = stack.last().copied().unwrap_or(0);
            match &block.kind {
                BlockKind::Heading { depth, .. } => {
                    let depth = *depth;
                    while stack.len() > 1 && nodes[stack[stack.len() - 1]].level >= depth {
                        stack.pop();
                    }
                    let parent = stack.last().copied().unwrap_or(0);
                    let id = nodes.len();
                    nodes.push(OutlineNode {
                        level: depth,
                        heading: Some(block),
                        content: Vec::new(),
                        children: Vec::new(),
                    });
                    nodes[parent].children.push(id);
                    stack.push(id);
                }
                _ => nodes[top].content.push(block),
            }
        }

        Self { nodes }
    }

    pub fn root(&self) -> &OutlineNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &OutlineNode {
        &self.nodes[id]
    }
}
