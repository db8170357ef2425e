//! Slab-indexed doubly linked list of cache entries.
//!
//! Nodes live in a `Vec` and link to each other by slot index, so a slot stays
//! valid until the entry is removed and every move is O(1). Freed slots are
//! recycled on the next push.
//!
//! ```text
//!   head ─► [slot 2] ◄──► [slot 0] ◄──► [slot 3] ◄── tail
//!   free:   [1]
//! ```

#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
pub(crate) struct EntryList<V> {
    slots: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<V> EntryList<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn front(&self) -> Option<usize> {
        self.head
    }

    pub(crate) fn back(&self) -> Option<usize> {
        self.tail
    }

    pub(crate) fn value(&self, slot: usize) -> &V {
        &self.node(slot).value
    }

    /// Swaps in a new value and hands back the old one.
    pub(crate) fn replace(&mut self, slot: usize, value: V) -> V {
        std::mem::replace(&mut self.node_mut(slot).value, value)
    }

    pub(crate) fn push_front(&mut self, key: String, value: V) -> usize {
        let slot = self.allocate(key, value);
        self.attach_front(slot);
        slot
    }

    pub(crate) fn push_back(&mut self, key: String, value: V) -> usize {
        let slot = self.allocate(key, value);
        self.attach_back(slot);
        slot
    }

    pub(crate) fn move_to_front(&mut self, slot: usize) {
        if self.head == Some(slot) {
            return;
        }
        self.detach(slot);
        self.attach_front(slot);
    }

    pub(crate) fn move_to_back(&mut self, slot: usize) {
        if self.tail == Some(slot) {
            return;
        }
        self.detach(slot);
        self.attach_back(slot);
    }

    /// Unlinks the slot and returns its entry. The slot index may be reused afterwards.
    pub(crate) fn remove(&mut self, slot: usize) -> (String, V) {
        self.detach(slot);
        let node = self.slots[slot]
            .take()
            .unwrap_or_else(|| panic!("list slot {slot} is vacant"));
        self.free.push(slot);
        self.len -= 1;
        (node.key, node.value)
    }

    /// Keys from front to back.
    pub(crate) fn keys(&self) -> Keys<'_, V> {
        Keys {
            list: self,
            cursor: self.head,
        }
    }

    fn allocate(&mut self, key: String, value: V) -> usize {
        let node = Node {
            key,
            value,
            prev: None,
            next: None,
        };
        self.len += 1;
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn attach_front(&mut self, slot: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(slot);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head) => self.node_mut(head).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    fn attach_back(&mut self, slot: usize) {
        let old_tail = self.tail;
        {
            let node = self.node_mut(slot);
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(tail) => self.node_mut(tail).next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
    }

    fn detach(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.node(slot);
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
        let node = self.node_mut(slot);
        node.prev = None;
        node.next = None;
    }

    fn node(&self, slot: usize) -> &Node<V> {
        self.slots[slot]
            .as_ref()
            .unwrap_or_else(|| panic!("list slot {slot} is vacant"))
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node<V> {
        self.slots[slot]
            .as_mut()
            .unwrap_or_else(|| panic!("list slot {slot} is vacant"))
    }
}

pub(crate) struct Keys<'a, V> {
    list: &'a EntryList<V>,
    cursor: Option<usize>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let list = self.list;
        let node = list.node(slot);
        self.cursor = node.next;
        Some(node.key.as_str())
    }
}
