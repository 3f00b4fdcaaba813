//! Unit tests for environment helpers.

use super::*;

fn current(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[test]
fn guards_restore_prior_values_in_lifo_order() {
    let key = "FLAGBIND_HELPERS_LIFO";
    let outer = set_var(key, "one");
    let inner = set_var(key, "two");
    assert_eq!(current(key).as_deref(), Some("two"));
    drop(inner);
    assert_eq!(current(key).as_deref(), Some("one"));
    drop(outer);
    assert_eq!(current(key), None);
}

#[test]
fn removal_is_undone_on_drop() {
    let key = "FLAGBIND_HELPERS_REMOVE";
    let _original = set_var(key, "kept");
    {
        let _gone = remove_var(key);
        assert_eq!(current(key), None);
    }
    assert_eq!(current(key).as_deref(), Some("kept"));
}

#[test]
fn vars_sets_and_clears_for_the_scope() {
    let set = "FLAGBIND_HELPERS_SET";
    let cleared = "FLAGBIND_HELPERS_CLEARED";
    let _before = set_var(cleared, "present");
    {
        let _scope = vars(&[(set, "value")], &[cleared]);
        assert_eq!(current(set).as_deref(), Some("value"));
        assert_eq!(current(cleared), None);
    }
    assert_eq!(current(set), None);
    assert_eq!(current(cleared).as_deref(), Some("present"));
}

#[test]
fn lock_is_reentrant() {
    let key = "FLAGBIND_HELPERS_REENTRANT";
    let _held = lock();
    let _guard = set_var(key, "inside");
    assert_eq!(current(key).as_deref(), Some("inside"));
}
