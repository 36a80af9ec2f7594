//! Tree diffing
//!
//! Computes the [`MutationPlan`] that brings a loaded generated graph in line
//! with a source outline. Matching is by source path: each engine-owned node
//! records the outline path that produced it, and a source node claims the
//! graph node indexed under the same path. Claimed nodes are kept (updated
//! only when their content drifted), unclaimed engine nodes are deleted, and
//! unmatched source nodes become creations.
//!
//! Excluded and user-included nodes are never part of the match. Their
//! subtrees are not even walked; when a dying subtree contains one, it is
//! rescued to the nearest surviving ancestor before the deletion runs.
//!
//! The resulting plan is ordered so it can be applied front to back:
//! rescues, then deletions, then creations (parent before child), then
//! moves, then updates, then reorders.

use std::collections::{BTreeMap, BTreeSet};

use menu_tree::{GeneratedGraph, MenuPath, NodeContent, NodeHandle, SourceNode, SourceTree};

use crate::error::{Error, Result};
use crate::plan::{Mutation, MutationPlan, NodeRef};

/// Path-keyed diff over one source outline and one graph snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeDiffEngine;

impl TreeDiffEngine {
    pub fn new() -> Self {
        Self
    }

    /// Plan the mutations that reconcile `graph` with `source`.
    ///
    /// Both inputs are validated first; a malformed outline or a corrupted
    /// graph aborts the diff before anything is planned. The graph must
    /// already contain its root container.
    pub fn diff(&self, source: &SourceTree, graph: &GeneratedGraph) -> Result<MutationPlan> {
        source.validate().map_err(Error::InvalidSourceTree)?;
        graph.validate()?;
        let root = graph.generated_root()?.ok_or(Error::MissingRoot)?;

        let region = EngineRegion::collect(graph, root)?;
        tracing::debug!(
            graph_nodes = graph.len(),
            candidates = region.walked.len(),
            source_nodes = source.node_count(),
            "collected engine region"
        );

        let mut matcher = Matcher {
            graph,
            region: &region,
            document: source.document.as_deref(),
            claimed: BTreeMap::new(),
            source_order: BTreeMap::new(),
            creates: Vec::new(),
            updates: Vec::new(),
        };
        matcher.walk(&source.nodes, &MenuPath::root(), &NodeRef::Existing(root))?;
        let Matcher {
            claimed,
            source_order,
            creates,
            updates,
            ..
        } = matcher;

        let mut pruner = Pruner {
            graph,
            region: &region,
            claimed: &claimed,
            deletes: Vec::new(),
            rescues: Vec::new(),
        };
        pruner.scan_surviving(root)?;
        let Pruner {
            deletes, rescues, ..
        } = pruner;

        let moves = plan_moves(graph, &claimed, &rescues)?;
        let parts = PlanParts {
            rescues,
            deletes,
            creates,
            moves,
            updates,
        };
        let reorders = plan_reorders(graph, root, &claimed, &parts, source_order)?;

        let mut plan = MutationPlan::new();
        for (node, survivor) in parts.rescues {
            plan.push(Mutation::Reparent {
                node,
                new_parent: NodeRef::Existing(survivor),
            });
        }
        for node in parts.deletes {
            plan.push(Mutation::Delete { node });
        }
        for create in parts.creates {
            plan.push(create);
        }
        for (node, new_parent) in parts.moves {
            plan.push(Mutation::Reparent { node, new_parent });
        }
        for update in parts.updates {
            plan.push(update);
        }
        for reorder in reorders {
            plan.push(reorder);
        }

        tracing::debug!(mutations = plan.len(), summary = %plan.summary(), "computed mutation plan");
        Ok(plan)
    }
}

/// The part of the graph the engine is allowed to reconcile: every
/// engine-owned node reachable from the root without crossing a protected
/// node. Protected subtrees are left out wholesale, including any
/// engine-owned nodes buried inside them.
#[derive(Debug, Default)]
struct EngineRegion {
    walked: BTreeSet<NodeHandle>,
    /// Source path to the first node (in preorder) recorded under it.
    /// Later carriers of the same path stay unclaimed and get deleted.
    index: BTreeMap<MenuPath, NodeHandle>,
}

impl EngineRegion {
    fn collect(graph: &GeneratedGraph, root: NodeHandle) -> Result<Self> {
        let mut region = Self::default();
        let mut stack: Vec<NodeHandle> = graph.children(root)?.iter().rev().copied().collect();
        while let Some(handle) = stack.pop() {
            let node = graph.node(handle)?;
            if node.classification.is_protected() {
                continue;
            }
            region.walked.insert(handle);
            if let Some(path) = node.metadata.source_path.clone() {
                region.index.entry(path).or_insert(handle);
            }
            for &child in node.children().iter().rev() {
                stack.push(child);
            }
        }
        Ok(region)
    }
}

/// Walks the outline, claiming indexed graph nodes and recording what must
/// be created or refreshed.
struct Matcher<'a> {
    graph: &'a GeneratedGraph,
    region: &'a EngineRegion,
    document: Option<&'a str>,
    /// Claimed graph node to the parent its source entry places it under.
    claimed: BTreeMap<NodeHandle, NodeRef>,
    /// Desired order of engine-owned children per parent.
    source_order: BTreeMap<NodeRef, Vec<NodeRef>>,
    creates: Vec<Mutation>,
    updates: Vec<Mutation>,
}

impl Matcher<'_> {
    fn walk(&mut self, nodes: &[SourceNode], parent_path: &MenuPath, parent: &NodeRef) -> Result<()> {
        for source_node in nodes {
            let path = parent_path.join(&source_node.name);
            let mut content = NodeContent::new(source_node.label(), path.clone());
            if let Some(document) = self.document {
                content = content.with_aux(document);
            }

            match self.region.index.get(&path).copied() {
                Some(handle) => {
                    self.claimed.insert(handle, parent.clone());
                    self.source_order
                        .entry(parent.clone())
                        .or_default()
                        .push(NodeRef::Existing(handle));
                    let node = self.graph.node(handle)?;
                    if node.metadata.has_drifted(&content) || node.name != content.name {
                        self.updates.push(Mutation::Update {
                            node: handle,
                            content,
                        });
                    }
                    self.walk(&source_node.children, &path, &NodeRef::Existing(handle))?;
                }
                None => {
                    let here = NodeRef::Planned(path.clone());
                    self.source_order
                        .entry(parent.clone())
                        .or_default()
                        .push(here.clone());
                    self.creates.push(Mutation::Create {
                        parent: parent.clone(),
                        path: path.clone(),
                        content,
                    });
                    self.walk(&source_node.children, &path, &here)?;
                }
            }
        }
        Ok(())
    }
}

/// Walks the graph side, splitting the engine region into survivors and
/// dying subtrees. A dying subtree can still shelter protected or claimed
/// nodes; those are rescued to the nearest surviving ancestor before the
/// subtree goes.
struct Pruner<'a> {
    graph: &'a GeneratedGraph,
    region: &'a EngineRegion,
    claimed: &'a BTreeMap<NodeHandle, NodeRef>,
    /// Topmost dying nodes, each a direct child of a survivor.
    deletes: Vec<NodeHandle>,
    /// Node to the surviving ancestor it is moved under.
    rescues: Vec<(NodeHandle, NodeHandle)>,
}

impl Pruner<'_> {
    fn scan_surviving(&mut self, survivor: NodeHandle) -> Result<()> {
        for &child in self.graph.children(survivor)? {
            if !self.region.walked.contains(&child) {
                continue;
            }
            if self.claimed.contains_key(&child) {
                self.scan_surviving(child)?;
            } else {
                self.deletes.push(child);
                self.scan_dying(child, survivor)?;
            }
        }
        Ok(())
    }

    fn scan_dying(&mut self, dying: NodeHandle, survivor: NodeHandle) -> Result<()> {
        for &child in self.graph.children(dying)? {
            let protected = !self.region.walked.contains(&child);
            let claimed = self.claimed.contains_key(&child);
            if protected || claimed {
                self.rescues.push((child, survivor));
                if claimed {
                    self.scan_surviving(child)?;
                }
            } else {
                self.scan_dying(child, survivor)?;
            }
        }
        Ok(())
    }
}

struct PlanParts {
    rescues: Vec<(NodeHandle, NodeHandle)>,
    deletes: Vec<NodeHandle>,
    creates: Vec<Mutation>,
    moves: Vec<(NodeHandle, NodeRef)>,
    updates: Vec<Mutation>,
}

/// A claimed node whose parent after rescues differs from the parent its
/// source entry wants gets moved there. Nodes already in place produce
/// nothing, which is what keeps a clean pass empty.
fn plan_moves(
    graph: &GeneratedGraph,
    claimed: &BTreeMap<NodeHandle, NodeRef>,
    rescues: &[(NodeHandle, NodeHandle)],
) -> Result<Vec<(NodeHandle, NodeRef)>> {
    let rescued: BTreeMap<NodeHandle, NodeHandle> = rescues.iter().copied().collect();
    let mut moves = Vec::new();
    for (&handle, target) in claimed {
        let post_rescue = match rescued.get(&handle) {
            Some(&survivor) => Some(survivor),
            None => graph.parent(handle)?,
        };
        let stays = matches!(target, NodeRef::Existing(parent) if post_rescue == Some(*parent));
        if !stays {
            moves.push((handle, target.clone()));
        }
    }
    Ok(moves)
}

struct Slot {
    node: NodeRef,
    engine: bool,
}

/// Predicts each parent's child list as it will stand after every other
/// mutation has applied, then compares the engine-owned subsequence with
/// the source order. Protected and unclaimed slots keep their positions;
/// only engine slots are refilled. Parents already in source order produce
/// no mutation.
fn plan_reorders(
    graph: &GeneratedGraph,
    root: NodeHandle,
    claimed: &BTreeMap<NodeHandle, NodeRef>,
    parts: &PlanParts,
    mut source_order: BTreeMap<NodeRef, Vec<NodeRef>>,
) -> Result<Vec<Mutation>> {
    let deleted: BTreeSet<NodeHandle> = parts.deletes.iter().copied().collect();
    let moved: BTreeSet<NodeHandle> = parts.moves.iter().map(|(node, _)| *node).collect();

    // Surviving children keep their relative order; rescues, creations and
    // moves append, in apply order.
    let mut assembled: BTreeMap<NodeRef, Vec<Slot>> = BTreeMap::new();
    for parent in std::iter::once(root).chain(claimed.keys().copied()) {
        let slots = assembled.entry(NodeRef::Existing(parent)).or_default();
        for &child in graph.children(parent)? {
            if deleted.contains(&child) || moved.contains(&child) {
                continue;
            }
            slots.push(Slot {
                node: NodeRef::Existing(child),
                engine: claimed.contains_key(&child),
            });
        }
    }
    for &(node, survivor) in &parts.rescues {
        if moved.contains(&node) {
            continue;
        }
        assembled
            .entry(NodeRef::Existing(survivor))
            .or_default()
            .push(Slot {
                node: NodeRef::Existing(node),
                engine: claimed.contains_key(&node),
            });
    }
    for create in &parts.creates {
        if let Mutation::Create { parent, path, .. } = create {
            assembled.entry(parent.clone()).or_default().push(Slot {
                node: NodeRef::Planned(path.clone()),
                engine: true,
            });
        }
    }
    for (node, target) in &parts.moves {
        assembled.entry(target.clone()).or_default().push(Slot {
            node: NodeRef::Existing(*node),
            engine: true,
        });
    }

    let mut reorders = Vec::new();
    for (parent, slots) in assembled {
        let desired = source_order.remove(&parent).unwrap_or_default();
        let predicted: Vec<NodeRef> = slots
            .iter()
            .filter(|slot| slot.engine)
            .map(|slot| slot.node.clone())
            .collect();
        if predicted == desired {
            continue;
        }
        if predicted.len() != desired.len() {
            tracing::warn!(parent = %parent, "engine slots do not line up with the outline, leaving order as is");
            continue;
        }
        let mut queue = desired.into_iter();
        let order: Vec<NodeRef> = slots
            .iter()
            .map(|slot| {
                if slot.engine {
                    queue.next().unwrap_or_else(|| slot.node.clone())
                } else {
                    slot.node.clone()
                }
            })
            .collect();
        reorders.push(Mutation::Reorder { parent, order });
    }
    Ok(reorders)
}
