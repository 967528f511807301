//! Host view hierarchy abstraction.
//!
//! The tooltip refers to views through [`ViewId`] handles and never owns
//! them. Every use goes through [`ViewTree::contains`] first, so a handle
//! whose view has been removed behaves like a dropped weak reference.
//!
//! [`ViewArena`] is a small in-memory tree used by the command-line renderer
//! and the tests.

use crate::layout::{Rectangle, Size};

/// Non-owning handle to a view.
///
/// The generation distinguishes a removed view from a new view that
/// reused its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId {
    index: u32,
    generation: u32,
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view#{}v{}", self.index, self.generation)
    }
}

/// Queries and mutations the tooltip needs from its host.
pub trait ViewTree {
    /// The top-level view, used when no container is given.
    fn root(&self) -> ViewId;

    /// Whether `view` is still part of the tree.
    fn contains(&self, view: ViewId) -> bool;

    fn parent(&self, view: ViewId) -> Option<ViewId>;

    /// Frame of `view` in its parent's coordinates.
    fn frame(&self, view: ViewId) -> Option<Rectangle>;

    /// Scrollable content size, for views that scroll.
    fn content_size(&self, view: ViewId) -> Option<Size>;

    /// Attach a new overlay child to `container`. Returns `None` when the
    /// container is gone.
    fn add_overlay(&mut self, container: ViewId, frame: Rectangle) -> Option<ViewId>;

    /// Move or resize a view. Returns false when the view is gone.
    fn set_frame(&mut self, view: ViewId, frame: Rectangle) -> bool;

    /// Detach `view` and its descendants. Returns false when already gone.
    fn remove(&mut self, view: ViewId) -> bool;

    /// Whether `candidate` is a direct or indirect parent of `view`.
    fn is_ancestor_of(&self, candidate: ViewId, view: ViewId) -> bool {
        let mut current = view;
        while let Some(parent) = self.parent(current) {
            if parent == candidate {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Bounds of `view` expressed in `ancestor`'s coordinate space.
    ///
    /// Returns `None` when either view is gone or `ancestor` is not above
    /// `view` (or `view` itself).
    fn bounding_rect_in_ancestor(&self, view: ViewId, ancestor: ViewId) -> Option<Rectangle> {
        let frame = self.frame(view)?;
        if view == ancestor {
            return Some(Rectangle::new(0.0, 0.0, frame.width, frame.height));
        }

        let (mut x, mut y) = (frame.x, frame.y);
        let mut current = self.parent(view)?;
        while current != ancestor {
            let parent_frame = self.frame(current)?;
            x += parent_frame.x;
            y += parent_frame.y;
            current = self.parent(current)?;
        }
        Some(Rectangle::new(x, y, frame.width, frame.height))
    }

    /// Bounds the bubble is clamped into: the container's frame, with the
    /// content size substituted for scrollable containers.
    fn container_bounds(&self, container: ViewId) -> Option<Rectangle> {
        let frame = self.frame(container)?;
        Some(match self.content_size(container) {
            Some(content) => Rectangle::from_origin_size(frame.position(), content),
            None => frame,
        })
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    frame: Rectangle,
    content_size: Option<Size>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// In-memory view tree with generational handles.
#[derive(Debug, Clone)]
pub struct ViewArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ViewId,
}

impl ViewArena {
    /// Create a tree whose root covers `(0, 0, size)`.
    pub fn new(size: Size) -> Self {
        let root = ViewId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node {
                    parent: None,
                    children: Vec::new(),
                    frame: Rectangle::from_origin_size(Default::default(), size),
                    content_size: None,
                }),
            }],
            free: Vec::new(),
            root,
        }
    }

    fn node(&self, view: ViewId) -> Option<&Node> {
        self.slots
            .get(view.index as usize)
            .filter(|slot| slot.generation == view.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, view: ViewId) -> Option<&mut Node> {
        self.slots
            .get_mut(view.index as usize)
            .filter(|slot| slot.generation == view.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Add a child view under `parent`. Returns `None` if the parent is gone.
    pub fn add_view(&mut self, parent: ViewId, frame: Rectangle) -> Option<ViewId> {
        self.node(parent)?;

        let node = Node {
            parent: Some(parent),
            children: Vec::new(),
            frame,
            content_size: None,
        };
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                ViewId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                ViewId {
                    index,
                    generation: 0,
                }
            }
        };

        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(id);
        }
        Some(id)
    }

    /// Make `view` scrollable with the given content size.
    pub fn set_content_size(&mut self, view: ViewId, size: Option<Size>) -> bool {
        match self.node_mut(view) {
            Some(node) => {
                node.content_size = size;
                true
            }
            None => false,
        }
    }

    /// Children of `view`, in insertion order.
    pub fn children(&self, view: ViewId) -> &[ViewId] {
        self.node(view).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of live views, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove_subtree(&mut self, view: ViewId) {
        let Some(slot) = self.slots.get_mut(view.index as usize) else {
            return;
        };
        if slot.generation != view.generation {
            return;
        }
        let Some(node) = slot.node.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(view.index);

        for child in node.children {
            self.remove_subtree(child);
        }
    }
}

impl ViewTree for ViewArena {
    fn root(&self) -> ViewId {
        self.root
    }

    fn contains(&self, view: ViewId) -> bool {
        self.node(view).is_some()
    }

    fn parent(&self, view: ViewId) -> Option<ViewId> {
        self.node(view)?.parent
    }

    fn frame(&self, view: ViewId) -> Option<Rectangle> {
        self.node(view).map(|n| n.frame)
    }

    fn content_size(&self, view: ViewId) -> Option<Size> {
        self.node(view)?.content_size
    }

    fn add_overlay(&mut self, container: ViewId, frame: Rectangle) -> Option<ViewId> {
        self.add_view(container, frame)
    }

    fn set_frame(&mut self, view: ViewId, frame: Rectangle) -> bool {
        match self.node_mut(view) {
            Some(node) => {
                node.frame = frame;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, view: ViewId) -> bool {
        if view == self.root || !self.contains(view) {
            return false;
        }
        if let Some(parent) = self.parent(view) {
            if let Some(parent) = self.node_mut(parent) {
                parent.children.retain(|c| *c != view);
            }
        }
        self.remove_subtree(view);
        true
    }
}
