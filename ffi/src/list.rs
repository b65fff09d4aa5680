//! Intrusive singly linked list for C callers.
//!
//! # Design
//! A record joins a list by placing a `ListNode` as its first field, so a
//! pointer to the record is also a pointer to its node. The list never
//! allocates or frees: the embedding record owns its node.
//!
//! `append_node` walks to the tail and does not clear the new node's
//! `next`; the caller must hand in a node whose `next` is already null.
//! `iterate_list` reads `next` before invoking the callback, so a callback
//! may free the node it is given.

use std::os::raw::{c_int, c_void};

/// Base unit of the list. Embed as the first field of a `#[repr(C)]` record.
#[repr(C)]
#[derive(Debug)]
pub struct ListNode {
    pub next: *mut ListNode,
}

/// Callback shared by `find_node` and `iterate_list`. For `find_node`,
/// returning 0 means "match".
pub type ListCallback = Option<unsafe extern "C" fn(node: *mut ListNode, uptr: *mut c_void) -> c_int>;

/// Append `node` at the tail of the list whose head is stored in `*root`.
/// If `*root` is null the node becomes the head. Null arguments are ignored.
#[unsafe(no_mangle)]
pub extern "C" fn append_node(root: *mut *mut ListNode, node: *mut ListNode) {
    if root.is_null() || node.is_null() {
        return;
    }
    unsafe {
        if (*root).is_null() {
            *root = node;
            return;
        }
        let mut tail = *root;
        while !(*tail).next.is_null() {
            tail = (*tail).next;
        }
        (*tail).next = node;
    }
}

/// Return the first node for which `callback(node, key)` returns 0, or null.
#[unsafe(no_mangle)]
pub extern "C" fn find_node(root: *mut ListNode, key: *mut c_void, callback: ListCallback) -> *mut ListNode {
    let Some(callback) = callback else {
        return std::ptr::null_mut();
    };
    let mut cursor = root;
    while !cursor.is_null() {
        if unsafe { callback(cursor, key) } == 0 {
            return cursor;
        }
        cursor = unsafe { (*cursor).next };
    }
    std::ptr::null_mut()
}

/// Call `callback(node, uptr)` on every node in order. Return values are
/// ignored. A null root or callback is a no-op.
#[unsafe(no_mangle)]
pub extern "C" fn iterate_list(root: *mut ListNode, callback: ListCallback, uptr: *mut c_void) {
    let Some(callback) = callback else {
        return;
    };
    let mut cursor = root;
    while !cursor.is_null() {
        let next = unsafe { (*cursor).next };
        unsafe { callback(cursor, uptr) };
        cursor = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    struct Handler {
        node: ListNode,
        id: c_int,
    }

    fn handler(id: c_int) -> Handler {
        Handler {
            node: ListNode {
                next: std::ptr::null_mut(),
            },
            id,
        }
    }

    unsafe extern "C" fn match_id(node: *mut ListNode, key: *mut c_void) -> c_int {
        let handler = unsafe { &*(node as *const Handler) };
        let key = unsafe { *(key as *const c_int) };
        if handler.id == key {
            0
        } else {
            1
        }
    }

    unsafe extern "C" fn collect_id(node: *mut ListNode, uptr: *mut c_void) -> c_int {
        let handler = unsafe { &*(node as *const Handler) };
        let ids = unsafe { &mut *(uptr as *mut Vec<c_int>) };
        ids.push(handler.id);
        // Non-zero must not stop iteration.
        1
    }

    fn collect(root: *mut ListNode) -> Vec<c_int> {
        let mut ids: Vec<c_int> = Vec::new();
        iterate_list(root, Some(collect_id), &mut ids as *mut Vec<c_int> as *mut c_void);
        ids
    }

    #[test]
    fn append_to_null_root_sets_head() {
        let mut a = handler(1);
        let mut root: *mut ListNode = std::ptr::null_mut();
        append_node(&mut root, &mut a.node);
        assert_eq!(root, &mut a.node as *mut ListNode);
    }

    #[test]
    fn append_keeps_insertion_order() {
        let (mut a, mut b, mut c) = (handler(1), handler(2), handler(3));
        let mut root: *mut ListNode = std::ptr::null_mut();
        append_node(&mut root, &mut a.node);
        append_node(&mut root, &mut b.node);
        append_node(&mut root, &mut c.node);
        assert_eq!(collect(root), vec![1, 2, 3]);
    }

    #[test]
    fn find_returns_first_match() {
        let (mut a, mut b, mut c) = (handler(1), handler(2), handler(2));
        let mut root: *mut ListNode = std::ptr::null_mut();
        append_node(&mut root, &mut a.node);
        append_node(&mut root, &mut b.node);
        append_node(&mut root, &mut c.node);

        let mut key: c_int = 2;
        let found = find_node(root, &mut key as *mut c_int as *mut c_void, Some(match_id));
        assert_eq!(found, &mut b.node as *mut ListNode);

        let mut missing: c_int = 9;
        let found = find_node(root, &mut missing as *mut c_int as *mut c_void, Some(match_id));
        assert!(found.is_null());
    }

    #[test]
    fn null_root_is_empty() {
        let mut key: c_int = 1;
        let found = find_node(std::ptr::null_mut(), &mut key as *mut c_int as *mut c_void, Some(match_id));
        assert!(found.is_null());
        assert!(collect(std::ptr::null_mut()).is_empty());
    }

    #[test]
    fn null_callback_is_noop() {
        let mut a = handler(1);
        assert!(find_node(&mut a.node, std::ptr::null_mut(), None).is_null());
        iterate_list(&mut a.node, None, std::ptr::null_mut());
    }

    #[test]
    fn null_root_ref_or_node_is_ignored() {
        let mut a = handler(1);
        append_node(std::ptr::null_mut(), &mut a.node);
        let mut root: *mut ListNode = std::ptr::null_mut();
        append_node(&mut root, std::ptr::null_mut());
        assert!(root.is_null());
    }
}
