mod common;

use xfast_rs::XFastSet;

fn byte_set() -> XFastSet {
    common::init_tracing();
    XFastSet::with_key_bits(8).unwrap()
}

fn assert_empty(set: &XFastSet) {
    assert!(set.is_empty());
    assert_eq!(set.leftmost(), None);
    assert_eq!(set.rightmost(), None);
    for k in [0, 1, 128, 255] {
        assert!(!set.contains(k));
        assert_eq!(set.predecessor(k), Ok(None));
        assert_eq!(set.successor(k), Ok(None));
    }
}

#[test]
fn test_insert_zero() {
    let mut set = byte_set();
    assert_eq!(set.insert(0), Ok(true));
    assert!(set.contains(0));
    assert!(!set.contains(1));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_insert_and_remove_zero() {
    let mut set = byte_set();
    set.insert(0).unwrap();
    assert_eq!(set.remove(0), Ok(true));
    assert!(!set.contains(0));
    assert_empty(&set);
}

#[test]
fn test_insert_zero_and_one() {
    let mut set = byte_set();
    set.insert(0).unwrap();
    set.insert(1).unwrap();
    assert!(set.contains(0));
    assert!(set.contains(1));
    assert_eq!(set.predecessor(1), Ok(Some(0)));
    assert_eq!(set.successor(0), Ok(Some(1)));
}

#[test]
fn test_insert_and_remove_zero_and_one() {
    let mut set = byte_set();
    set.insert(0).unwrap();
    set.insert(1).unwrap();
    set.remove(0).unwrap();
    assert_eq!(set.leftmost(), Some(1));
    set.remove(1).unwrap();
    assert_empty(&set);
}

#[test]
fn test_leftmost_and_rightmost_empty() {
    assert_empty(&byte_set());
}

#[test]
fn test_leftmost_and_rightmost_zero() {
    let mut set = byte_set();
    set.insert(0).unwrap();
    assert_eq!(set.leftmost(), Some(0));
    assert_eq!(set.rightmost(), Some(0));
}

#[test]
fn test_leftmost_and_rightmost_one() {
    let mut set = byte_set();
    set.insert(1).unwrap();
    assert_eq!(set.leftmost(), Some(1));
    assert_eq!(set.rightmost(), Some(1));
}

#[test]
fn test_leftmost_and_rightmost_zero_and_one() {
    let mut set = byte_set();
    set.insert(1).unwrap();
    set.insert(0).unwrap();
    assert_eq!(set.leftmost(), Some(0));
    assert_eq!(set.rightmost(), Some(1));
}

#[test]
fn test_pred_succ_one() {
    let mut set = byte_set();
    set.insert(5).unwrap();
    assert_eq!(set.predecessor(5), Ok(None));
    assert_eq!(set.successor(5), Ok(None));
    assert_eq!(set.predecessor(6), Ok(Some(5)));
    assert_eq!(set.successor(4), Ok(Some(5)));
}

#[test]
fn test_duplicate_insert_and_missing_remove_are_no_ops() {
    let mut set = byte_set();
    set.insert(9).unwrap();
    let before = set.clone();
    assert_eq!(set.insert(9), Ok(false));
    assert_eq!(set, before);
    assert_eq!(set.remove(10), Ok(false));
    assert_eq!(set, before);
}
