//! The live document: an HTML tree the host mutates, plus a mutation feed
//! that observers drain in batches.

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Non-owning reference to a node. It stays valid after the node is removed,
/// but every lookup through [`Document`] treats a detached node as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(NodeId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// One childList change below an observed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeHandle,
    pub added_nodes: usize,
    pub removed_nodes: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomError {
    #[error("invalid selector {selector:?}")]
    InvalidSelector { selector: String },
    #[error("no element matches {selector:?}")]
    NoMatch { selector: String },
    #[error("node is not attached to the document")]
    Detached,
    #[error("the document element cannot be removed")]
    RootRemoval,
}

/// Event source the change watcher subscribes to.
pub trait MutationSource {
    /// First element matching `selector`, if the selector parses and matches.
    fn find_container(&self, selector: &str) -> Option<NodeHandle>;
    /// Root used when no container matches.
    fn fallback_root(&self) -> NodeHandle;
    fn observe(&mut self, root: NodeHandle) -> ObserverId;
    fn disconnect(&mut self, observer: ObserverId);
    /// Drains the records queued for `observer` since the last call.
    fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord>;
}

struct Observer {
    id: ObserverId,
    root: NodeHandle,
    queue: Vec<MutationRecord>,
}

pub struct Document {
    html: Html,
    observers: Vec<Observer>,
    next_observer: u64,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            observers: Vec::new(),
            next_observer: 1,
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn root_element(&self) -> NodeHandle {
        NodeHandle(self.html.root_element().id())
    }

    pub fn body(&self) -> Option<NodeHandle> {
        self.html
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .map(|el| NodeHandle(el.id()))
    }

    /// `<body>`, or the document element for body-less documents.
    pub fn content_root(&self) -> NodeHandle {
        self.body().unwrap_or_else(|| self.root_element())
    }

    pub fn is_attached(&self, handle: NodeHandle) -> bool {
        let root_id = self.html.tree.root().id();
        match self.html.tree.get(handle.0) {
            Some(node) => node.id() == root_id || node.ancestors().any(|a| a.id() == root_id),
            None => false,
        }
    }

    /// Element view of an attached node.
    pub fn element(&self, handle: NodeHandle) -> Option<ElementRef<'_>> {
        if !self.is_attached(handle) {
            return None;
        }
        self.html.tree.get(handle.0).and_then(ElementRef::wrap)
    }

    pub fn select_first(&self, selector: &str) -> Result<Option<NodeHandle>, DomError> {
        let parsed = parse_selector(selector)?;
        let first = self.attached_matches(&parsed).next();
        Ok(first)
    }

    pub fn select_all(&self, selector: &str) -> Result<Vec<NodeHandle>, DomError> {
        let parsed = parse_selector(selector)?;
        let all = self.attached_matches(&parsed).collect();
        Ok(all)
    }

    // The arena keeps removed nodes around, so raw selection would see them.
    fn attached_matches<'a>(
        &'a self,
        selector: &'a Selector,
    ) -> impl Iterator<Item = NodeHandle> + 'a {
        self.html
            .select(selector)
            .map(|el| NodeHandle(el.id()))
            .filter(|handle| self.is_attached(*handle))
    }

    /// Text of an attached element with whitespace collapsed.
    pub fn text_of(&self, handle: NodeHandle) -> Option<String> {
        self.element(handle)
            .map(|el| el.text().collect::<Vec<_>>().join(" "))
            .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// Parses `fragment` and appends its top-level nodes to `parent`.
    pub fn append_html(
        &mut self,
        parent: NodeHandle,
        fragment: &str,
    ) -> Result<Vec<NodeHandle>, DomError> {
        if !self.is_attached(parent) {
            return Err(DomError::Detached);
        }
        let parsed = Html::parse_fragment(fragment);
        let mut added = Vec::new();
        for child in parsed.root_element().children() {
            if let Some(id) = graft(&mut self.html.tree, parent.0, child) {
                added.push(NodeHandle(id));
            }
        }
        if !added.is_empty() {
            self.notify(parent, added.len(), 0);
        }
        Ok(added)
    }

    /// Appends to the first element matching `selector`.
    pub fn append_html_to(
        &mut self,
        selector: &str,
        fragment: &str,
    ) -> Result<Vec<NodeHandle>, DomError> {
        let parent = self
            .select_first(selector)?
            .ok_or_else(|| DomError::NoMatch {
                selector: selector.to_string(),
            })?;
        self.append_html(parent, fragment)
    }

    pub fn remove(&mut self, node: NodeHandle) -> Result<(), DomError> {
        if !self.is_attached(node) {
            return Err(DomError::Detached);
        }
        if node == self.root_element() || node.0 == self.html.tree.root().id() {
            return Err(DomError::RootRemoval);
        }
        let parent = self
            .html
            .tree
            .get(node.0)
            .and_then(|n| n.parent())
            .map(|p| NodeHandle(p.id()));
        if let Some(mut target) = self.html.tree.get_mut(node.0) {
            target.detach();
        }
        if let Some(parent) = parent {
            self.notify(parent, 0, 1);
        }
        Ok(())
    }

    /// Removes every element matching `selector`; returns how many went.
    pub fn remove_matching(&mut self, selector: &str) -> Result<usize, DomError> {
        let targets = self.select_all(selector)?;
        let mut removed = 0;
        for target in targets {
            // An earlier match may have taken this one with it.
            if self.is_attached(target) {
                self.remove(target)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn notify(&mut self, target: NodeHandle, added_nodes: usize, removed_nodes: usize) {
        let lineage: Vec<NodeId> = match self.html.tree.get(target.0) {
            Some(node) => std::iter::once(node.id())
                .chain(node.ancestors().map(|a| a.id()))
                .collect(),
            None => return,
        };
        for observer in &mut self.observers {
            if lineage.contains(&observer.root.0) {
                observer.queue.push(MutationRecord {
                    target,
                    added_nodes,
                    removed_nodes,
                });
            }
        }
    }
}

impl MutationSource for Document {
    fn find_container(&self, selector: &str) -> Option<NodeHandle> {
        self.select_first(selector).ok().flatten()
    }

    fn fallback_root(&self) -> NodeHandle {
        self.content_root()
    }

    fn observe(&mut self, root: NodeHandle) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push(Observer {
            id,
            root,
            queue: Vec::new(),
        });
        id
    }

    fn disconnect(&mut self, observer: ObserverId) {
        self.observers.retain(|o| o.id != observer);
    }

    fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .iter_mut()
            .find(|o| o.id == observer)
            .map(|o| std::mem::take(&mut o.queue))
            .unwrap_or_default()
    }
}

fn parse_selector(selector: &str) -> Result<Selector, DomError> {
    Selector::parse(selector).map_err(|_| DomError::InvalidSelector {
        selector: selector.to_string(),
    })
}

/// Deep-copies `source` under `parent`.
fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) -> Option<NodeId> {
    let mut parent_node = tree.get_mut(parent)?;
    let id = parent_node.append(source.value().clone()).id();
    for child in source.children() {
        graft(tree, id, child);
    }
    Some(id)
}

pub(crate) fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Descendant elements, excluding `element` itself.
pub(crate) fn descendant_elements<'a>(
    element: ElementRef<'a>,
) -> impl Iterator<Item = ElementRef<'a>> {
    element.descendants().skip(1).filter_map(ElementRef::wrap)
}

pub(crate) fn has_any_class(element: ElementRef<'_>, classes: &[String]) -> bool {
    element
        .value()
        .classes()
        .any(|class| classes.iter().any(|wanted| class.eq_ignore_ascii_case(wanted)))
}

pub(crate) fn handle_of(element: ElementRef<'_>) -> NodeHandle {
    NodeHandle(element.id())
}
