//! Chains: singly linked node lists stored in a generational arena.
//!
//! A chain is addressed by its head (`Option<NodeKey>`); every node owns
//! the key of its successor. Freed node slots go back to the arena's free
//! list and are reused by later pushes, and stale keys never resolve.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena handle of one chain node.
    pub(crate) struct NodeKey;
}

/// Head of a chain; `None` for an empty bucket.
pub(crate) type Head = Option<NodeKey>;

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // Hash of `key` as computed when it was stored; rehash reuses it.
    pub(crate) hash: u64,
    next: Head,
}

/// Node storage shared by all chains of one bucket array.
#[derive(Debug)]
pub(crate) struct Chains<K, V> {
    nodes: SlotMap<NodeKey, Node<K, V>>,
}

impl<K, V> Chains<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, k: NodeKey) -> &Node<K, V> {
        &self.nodes[k]
    }

    pub(crate) fn node_mut(&mut self, k: NodeKey) -> &mut Node<K, V> {
        &mut self.nodes[k]
    }

    /// Allocate a node and make it the new head of `head`'s chain.
    pub(crate) fn push_front(&mut self, head: &mut Head, key: K, value: V, hash: u64) -> NodeKey {
        let k = self.nodes.insert(Node {
            key,
            value,
            hash,
            next: *head,
        });
        *head = Some(k);
        k
    }

    /// Detach the head node without freeing it. The node must be relinked
    /// with `relink_front` or freed by the caller.
    pub(crate) fn pop_front(&mut self, head: &mut Head) -> Option<NodeKey> {
        let k = (*head)?;
        *head = self.nodes[k].next.take();
        Some(k)
    }

    /// Make an already allocated, detached node the head of `head`'s chain.
    pub(crate) fn relink_front(&mut self, head: &mut Head, k: NodeKey) {
        self.nodes[k].next = *head;
        *head = Some(k);
    }

    /// Detach and free the head node, handing back its contents.
    pub(crate) fn take_front(&mut self, head: &mut Head) -> Option<Node<K, V>> {
        let k = self.pop_front(head)?;
        self.nodes.remove(k)
    }

    pub(crate) fn find<F>(&self, head: Head, mut matches: F) -> Option<NodeKey>
    where
        F: FnMut(&K) -> bool,
    {
        self.walk(head)
            .find(|(_, n)| matches(&n.key))
            .map(|(k, _)| k)
    }

    /// Unlink `target` from the chain starting at `head` and free its slot.
    ///
    /// Patches either the head itself or the predecessor's link. Returns
    /// `None` if `target` is not on this chain.
    pub(crate) fn unlink(&mut self, head: &mut Head, target: NodeKey) -> Option<Node<K, V>> {
        let next = self.nodes.get(target)?.next;
        if *head == Some(target) {
            *head = next;
        } else {
            let (prev, _) = self
                .walk(*head)
                .find(|(_, n)| n.next == Some(target))?;
            self.nodes[prev].next = next;
        }
        self.nodes.remove(target)
    }

    pub(crate) fn walk(&self, head: Head) -> Walk<'_, K, V> {
        Walk {
            nodes: &self.nodes,
            cur: head,
        }
    }

    /// All nodes in arena order.
    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node<K, V>> {
        self.nodes.values_mut()
    }
}

/// Iterator over one chain, head first.
pub(crate) struct Walk<'a, K, V> {
    nodes: &'a SlotMap<NodeKey, Node<K, V>>,
    cur: Head,
}

impl<'a, K, V> Walk<'a, K, V> {
    pub(crate) fn empty(nodes: &'a Chains<K, V>) -> Self {
        nodes.walk(None)
    }
}

impl<'a, K, V> Iterator for Walk<'a, K, V> {
    type Item = (NodeKey, &'a Node<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        // Links only ever point at live nodes; a stale one is corruption.
        let n = &self.nodes[k];
        self.cur = n.next;
        Some((k, n))
    }
}
