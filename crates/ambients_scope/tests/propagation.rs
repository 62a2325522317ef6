//! Propagation tests for `ambients_scope`.
//!
//! These tests verify which branches observe a scope: child tasks, sibling
//! tasks, threads, and branches holding a snapshot of a released scope.

use std::sync::Arc;
use std::thread;

use ambients_scope::{
    AmbientLocation, AmbientResourceGroup, AmbientSubscription, Branch, ScopeError,
};
use tokio::sync::{Barrier, oneshot};

fn current_location() -> Option<String> {
    AmbientLocation::current().map(|location| location.as_str().to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tasks
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn spawned_child_inherits_parent_scope() {
    let _location = AmbientLocation::new("westus").unwrap();

    let seen = ambients_scope::spawn(async {
        tokio::task::yield_now().await;
        current_location()
    })
    .await
    .unwrap();

    assert_eq!(seen.as_deref(), Some("westus"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scope_opened_in_child_is_invisible_to_parent() {
    let (opened_tx, opened_rx) = oneshot::channel();
    let (done_tx, done_rx) = oneshot::channel::<()>();

    let child = ambients_scope::spawn(async move {
        let _location = AmbientLocation::new("eastus").unwrap();
        opened_tx.send(()).unwrap();
        done_rx.await.unwrap();
        current_location()
    });

    opened_rx.await.unwrap();
    assert_eq!(current_location(), None);
    done_tx.send(()).unwrap();

    assert_eq!(child.await.unwrap().as_deref(), Some("eastus"));
    assert_eq!(current_location(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scope_opened_after_spawn_is_invisible_to_sibling() {
    let barrier = Arc::new(Barrier::new(2));
    let task_barrier = Arc::clone(&barrier);

    let sibling = ambients_scope::spawn(async move {
        task_barrier.wait().await;
        current_location()
    });

    let _location = AmbientLocation::new("westus").unwrap();
    barrier.wait().await;

    assert_eq!(sibling.await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn release_in_parent_hides_scope_from_earlier_child() {
    let mut location = AmbientLocation::new("westus").unwrap();
    let (released_tx, released_rx) = oneshot::channel::<()>();

    let child = ambients_scope::spawn(async move {
        let before = current_location();
        released_rx.await.unwrap();
        (before, current_location())
    });

    tokio::task::yield_now().await;
    location.release().unwrap();
    released_tx.send(()).unwrap();

    let (before, after) = child.await.unwrap();
    assert!(before.is_none() || before.as_deref() == Some("westus"));
    assert_eq!(after, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tasks_hold_independent_scopes() {
    let tasks: Vec<_> = ["westus", "eastus", "northeurope", "japaneast"]
        .into_iter()
        .map(|name| {
            Branch::empty().scope(async move {
                let _location = AmbientLocation::new(name).unwrap();
                for _ in 0..10 {
                    tokio::task::yield_now().await;
                    assert_eq!(current_location().as_deref(), Some(name));
                }
                name
            })
        })
        .map(tokio::spawn)
        .collect();

    for task in tasks {
        task.await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn child_sees_inherited_scope_as_conflict() {
    let _group = AmbientResourceGroup::new("rg1", "westus").unwrap();

    let result = ambients_scope::spawn(async {
        AmbientSubscription::new("sub-1").map(|_| ())
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(ScopeError::ConflictingScope(_))));
}

// ─────────────────────────────────────────────────────────────────────────────
// Plain tokio tasks
// ─────────────────────────────────────────────────────────────────────────────

/// One plain task tries to open a scope while a sibling already waits; the
/// sibling and the parent see nothing.
async fn plain_siblings_share_nothing() {
    let _location = AmbientLocation::new("westus").unwrap();
    let (opened_tx, opened_rx) = oneshot::channel::<()>();
    let (read_tx, read_rx) = oneshot::channel::<()>();

    let sibling = tokio::spawn(async move {
        let inherited = current_location();
        opened_rx.await.unwrap();
        let group = AmbientResourceGroup::current().map(|group| group.name().to_string());
        read_tx.send(()).unwrap();
        (inherited, group)
    });

    let opener = tokio::spawn(async move {
        let opened = AmbientResourceGroup::new("rg-secret", "westus");
        opened_tx.send(()).unwrap();
        read_rx.await.unwrap();
        opened.map(|_| ())
    });

    let (inherited, group) = sibling.await.unwrap();
    assert_eq!(inherited, None);
    assert_eq!(group, None);
    assert!(matches!(opener.await.unwrap(), Err(ScopeError::InvalidState(_))));
    assert!(AmbientResourceGroup::current().is_none());
    assert_eq!(current_location().as_deref(), Some("westus"));
}

#[tokio::test(flavor = "current_thread")]
async fn plain_spawned_tasks_are_isolated_on_current_thread() {
    plain_siblings_share_nothing().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn plain_spawned_tasks_are_isolated_on_multi_thread() {
    plain_siblings_share_nothing().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scoped_task_keeps_its_scope_across_workers() {
    let tasks: Vec<_> = (0..8)
        .map(|i| {
            tokio::spawn(Branch::empty().scope(async move {
                let name = format!("rg-{i}");
                let mut group = AmbientResourceGroup::without_location(name.as_str()).unwrap();
                for _ in 0..50 {
                    tokio::task::yield_now().await;
                    assert_eq!(AmbientResourceGroup::current().unwrap().name(), name);
                }
                group.release()
            }))
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }
}

#[tokio::test(flavor = "current_thread")]
async fn plain_task_can_enter_a_branch() {
    let seen = tokio::spawn(async {
        Branch::empty().enter(|| {
            let _location = AmbientLocation::new("eastus").unwrap();
            current_location()
        })
    })
    .await
    .unwrap();

    assert_eq!(seen.as_deref(), Some("eastus"));
    assert_eq!(current_location(), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Threads and release failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn threads_do_not_share_scopes() {
    let _location = AmbientLocation::new("westus").unwrap();

    let seen = thread::spawn(current_location).join().unwrap();
    assert_eq!(seen, None);

    let snapshot = Branch::capture();
    let seen = thread::spawn(move || snapshot.enter(current_location))
        .join()
        .unwrap();
    assert_eq!(seen.as_deref(), Some("westus"));
}

#[test]
fn release_on_branch_without_scope_is_invalid_state() {
    let location = AmbientLocation::new("westus").unwrap();

    let (location, result) = thread::spawn(move || {
        let mut location = location;
        let result = location.release();
        (location, result)
    })
    .join()
    .unwrap();

    assert!(matches!(result, Err(ScopeError::InvalidState(_))));
    assert!(!location.is_released());
    assert_eq!(current_location().as_deref(), Some("westus"));
}

#[test]
fn release_of_another_scope_is_invalid_state() {
    let first = AmbientLocation::new("westus").unwrap();

    let result = thread::spawn(move || {
        let mut first = first;
        let _second = AmbientLocation::new("eastus").unwrap();
        let result = first.release();
        assert_eq!(current_location().as_deref(), Some("eastus"));
        result
    })
    .join()
    .unwrap();

    assert!(matches!(result, Err(ScopeError::InvalidState(_))));
    // The guard was dropped on the other thread: the scope is dead everywhere
    assert_eq!(current_location(), None);
}
