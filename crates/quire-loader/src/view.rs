//! Loaded modules and the view trees they render.

use std::fmt::Write;

use quire_site::{ChunkModule, ChunkReference, PageDataRecord, StaticView};
use serde::Serialize;

/// A decoded page chunk, cached by the loader and shared between callers.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModule {
    chunk: ChunkReference,
    page_data: PageDataRecord,
    view: StaticView,
}

impl LoadedModule {
    pub(crate) fn new(chunk: ChunkReference, module: ChunkModule) -> Self {
        Self {
            chunk,
            page_data: module.page_data,
            view: module.view,
        }
    }

    /// Chunk the module was loaded from.
    #[must_use]
    pub fn chunk(&self) -> &ChunkReference {
        &self.chunk
    }

    /// Page-data record exported by the chunk.
    #[must_use]
    pub fn page_data(&self) -> &PageDataRecord {
        &self.page_data
    }

    /// Render the page view for `page_data`.
    ///
    /// Pure: no I/O, no side effects, equal inputs give equal trees.
    #[must_use]
    pub fn render(&self, page_data: &PageDataRecord) -> ViewTree {
        ViewTree {
            title: page_data.title.clone(),
            description: page_data.description.clone(),
            root: ViewNode::Element {
                tag: self.view.tag.clone(),
                children: vec![ViewNode::Static {
                    html: self.view.html.clone(),
                    nodes: self.view.nodes,
                }],
            },
        }
    }
}

/// Rendered page body plus head metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewTree {
    /// Document title.
    pub title: String,
    /// Document description.
    pub description: String,
    /// Body root.
    pub root: ViewNode,
}

/// One node of a view tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewNode {
    /// Element wrapping child nodes.
    Element {
        /// Tag name.
        tag: String,
        /// Children in order.
        children: Vec<ViewNode>,
    },
    /// Pre-rendered HTML fragment of `nodes` top-level nodes.
    Static {
        /// HTML fragment.
        html: String,
        /// Top-level node count.
        nodes: usize,
    },
}

impl ViewTree {
    /// Serialize the body to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.root.write_html(&mut out);
        out
    }
}

impl ViewNode {
    fn write_html(&self, out: &mut String) {
        match self {
            Self::Element { tag, children } => {
                let _ = write!(out, "<{tag}>");
                for child in children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{tag}>");
            }
            Self::Static { html, .. } => out.push_str(html),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn loaded() -> LoadedModule {
        let page_data = PageDataRecord {
            title: "渲染策略".to_owned(),
            relative_path: "framework/rendering-strategies.md".to_owned(),
            ..Default::default()
        };
        let module = ChunkModule {
            page_data,
            view: StaticView {
                tag: "div".to_owned(),
                html: "<h1 id=\"渲染策略\">渲染策略</h1>\n<p>Text</p>\n".to_owned(),
                nodes: 2,
            },
        };
        let chunk = ChunkReference::for_content(
            "framework/rendering-strategies.md",
            &module.to_bytes().unwrap(),
        );
        LoadedModule::new(chunk, module)
    }

    #[test]
    fn test_render_wraps_static_fragment() {
        let module = loaded();
        let tree = module.render(module.page_data());

        assert_eq!(tree.title, "渲染策略");
        assert_eq!(
            tree.root,
            ViewNode::Element {
                tag: "div".to_owned(),
                children: vec![ViewNode::Static {
                    html: "<h1 id=\"渲染策略\">渲染策略</h1>\n<p>Text</p>\n".to_owned(),
                    nodes: 2,
                }],
            }
        );
    }

    #[test]
    fn test_render_is_pure() {
        let module = loaded();
        let record = module.page_data().clone();
        assert_eq!(module.render(&record), module.render(&record));
    }

    #[test]
    fn test_render_uses_given_record() {
        let module = loaded();
        let record = PageDataRecord {
            title: "Other".to_owned(),
            description: "d".to_owned(),
            ..Default::default()
        };
        let tree = module.render(&record);
        assert_eq!(tree.title, "Other");
        assert_eq!(tree.description, "d");
    }

    #[test]
    fn test_to_html() {
        let tree = loaded().render(&PageDataRecord::default());
        assert_eq!(
            tree.to_html(),
            "<div><h1 id=\"渲染策略\">渲染策略</h1>\n<p>Text</p>\n</div>"
        );
    }

    #[test]
    fn test_tree_json_shape() {
        let tree = loaded().render(&PageDataRecord::default());
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["root"]["type"], "element");
        assert_eq!(json["root"]["children"][0]["type"], "static");
        assert_eq!(json["root"]["children"][0]["nodes"], 2);
    }
}
