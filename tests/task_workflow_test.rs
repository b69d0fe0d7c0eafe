mod common;

use common::{list_of, sample_skeletons};
use poolcare::models::task::{
    DEFAULT_ESTIMATED_MINUTES, TaskList, TaskPatch, TaskStatus, instantiate_from_template,
};

// ============================================================================
// add_task
// ============================================================================

#[test]
fn test_add_task_appends_pending_with_sequential_order() {
    let mut list = TaskList::default();
    list.add_task("Vacuum pool floor", 40);
    list.add_task("Clean skimmer baskets", 15);

    assert_eq!(list.len(), 2);
    let first = &list.0[0];
    let second = &list.0[1];
    assert_eq!(first.description, "Vacuum pool floor");
    assert_eq!(first.estimated_minutes, 40);
    assert_eq!(first.status, TaskStatus::Pending);
    assert_eq!(first.order, 1);
    assert!(first.completed_at.is_none());
    assert_eq!(second.order, 2);
    assert_ne!(first.id, second.id);
}

#[test]
fn test_add_task_empty_description_is_noop() {
    let mut list = list_of(3);
    let before = list.clone();

    list.add_task("", 30);
    list.add_task("   ", 30);
    list.add_task("\t\n", 30);

    assert_eq!(list, before);
}

#[test]
fn test_add_task_trims_description() {
    let mut list = TaskList::default();
    list.add_task("  Brush walls  ", 25);
    assert_eq!(list.0[0].description, "Brush walls");
}

// ============================================================================
// update_task / completed_at stamping
// ============================================================================

#[test]
fn test_update_status_completed_stamps_completed_at() {
    let mut list = list_of(2);
    let id = list.0[0].id.clone();

    list.update_task(
        &id,
        TaskPatch {
            status: Some(TaskStatus::Completed),
            ..TaskPatch::default()
        },
    );

    let task = list.get(&id).unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert!(task.completed_at.is_some());

    // Leaving the completed state clears the timestamp.
    list.update_task(
        &id,
        TaskPatch {
            status: Some(TaskStatus::Pending),
            ..TaskPatch::default()
        },
    );
    let task = list.get(&id).unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.completed_at.is_none());
}

#[test]
fn test_update_without_status_preserves_completed_at() {
    let mut list = list_of(1);
    let id = list.0[0].id.clone();
    list.toggle_status(&id);
    let stamped = list.get(&id).unwrap().completed_at;
    assert!(stamped.is_some());

    // A notes-only patch must not disturb the completion timestamp.
    list.update_task(
        &id,
        TaskPatch {
            notes: Some(Some("Used extra chlorine".to_string())),
            ..TaskPatch::default()
        },
    );
    let task = list.get(&id).unwrap();
    assert_eq!(task.completed_at, stamped);
    assert_eq!(task.notes.as_deref(), Some("Used extra chlorine"));
}

#[test]
fn test_update_unknown_id_is_noop() {
    let mut list = list_of(2);
    let before = list.clone();
    list.update_task(
        "does-not-exist",
        TaskPatch {
            status: Some(TaskStatus::Completed),
            ..TaskPatch::default()
        },
    );
    assert_eq!(list, before);
}

#[test]
fn test_update_can_clear_assignment() {
    let mut list = list_of(1);
    let id = list.0[0].id.clone();
    list.update_task(
        &id,
        TaskPatch {
            assigned_to: Some(Some(7)),
            ..TaskPatch::default()
        },
    );
    assert_eq!(list.get(&id).unwrap().assigned_to, Some(7));

    list.update_task(
        &id,
        TaskPatch {
            assigned_to: Some(None),
            ..TaskPatch::default()
        },
    );
    assert_eq!(list.get(&id).unwrap().assigned_to, None);
}

// ============================================================================
// toggle_status
// ============================================================================

#[test]
fn test_toggle_flips_between_completed_and_pending() {
    let mut list = list_of(1);
    let id = list.0[0].id.clone();

    list.toggle_status(&id);
    assert_eq!(list.get(&id).unwrap().status, TaskStatus::Completed);

    list.toggle_status(&id);
    assert_eq!(list.get(&id).unwrap().status, TaskStatus::Pending);
}

#[test]
fn test_toggle_from_in_progress_completes() {
    let mut list = list_of(1);
    let id = list.0[0].id.clone();
    list.update_task(
        &id,
        TaskPatch {
            status: Some(TaskStatus::InProgress),
            ..TaskPatch::default()
        },
    );

    list.toggle_status(&id);
    assert_eq!(list.get(&id).unwrap().status, TaskStatus::Completed);
}

// ============================================================================
// delete_task
// ============================================================================

#[test]
fn test_delete_removes_without_renumbering() {
    let mut list = list_of(3);
    let id = list.0[1].id.clone();

    list.delete_task(&id);

    assert_eq!(list.len(), 2);
    let orders: Vec<i64> = list.0.iter().map(|t| t.order).collect();
    assert_eq!(orders, vec![1, 3]);
}

#[test]
fn test_delete_unknown_id_is_noop() {
    let mut list = list_of(3);
    let before = list.clone();
    list.delete_task("does-not-exist");
    assert_eq!(list, before);
}

// ============================================================================
// instantiate_from_template
// ============================================================================

#[test]
fn test_instantiate_defaults_estimate_and_order() {
    let tasks = instantiate_from_template(&sample_skeletons());

    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].estimated_minutes, DEFAULT_ESTIMATED_MINUTES);
    assert_eq!(tasks[0].order, 1);
    assert_eq!(tasks[1].estimated_minutes, 45);
    assert_eq!(tasks[1].order, 2);
    // Explicit order on the skeleton wins over the positional default.
    assert_eq!(tasks[2].order, 10);

    for task in &tasks {
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.completed_at.is_none());
    }

    let mut ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3, "ids must be freshly generated and distinct");
}

#[test]
fn test_instantiate_does_not_touch_existing_list() {
    let list = list_of(2);
    let before = list.clone();
    let _fresh = instantiate_from_template(&sample_skeletons());
    assert_eq!(list, before);
}

#[test]
fn test_instantiate_empty_template() {
    assert!(instantiate_from_template(&[]).is_empty());
}

// ============================================================================
// Derived aggregates
// ============================================================================

#[test]
fn test_empty_list_aggregates_are_zero() {
    let list = TaskList::default();
    assert_eq!(list.completed_count(), 0);
    assert_eq!(list.progress(), 0.0);
    assert_eq!(list.progress_percent(), 0);
    assert_eq!(list.total_estimated_minutes(), 0);
    assert_eq!(list.completed_minutes(), 0);
}

#[test]
fn test_progress_fraction_and_percent() {
    let mut list = list_of(3);
    let id = list.0[0].id.clone();
    list.toggle_status(&id);

    assert_eq!(list.completed_count(), 1);
    let progress = list.progress();
    assert!(progress > 0.333 && progress < 0.334);
    // The stored fraction stays unrounded; rounding is display-only.
    assert_eq!(list.progress_percent(), 33);
}

#[test]
fn test_progress_is_bounded() {
    let mut list = list_of(4);
    let ids: Vec<String> = list.0.iter().map(|t| t.id.clone()).collect();
    for id in &ids {
        list.toggle_status(id);
        let p = list.progress();
        assert!((0.0..=1.0).contains(&p));
    }
    assert_eq!(list.progress(), 1.0);
    assert_eq!(list.progress_percent(), 100);
}

#[test]
fn test_time_aggregates_sum_only_completed() {
    let mut list = TaskList::default();
    list.add_task("A", 10);
    list.add_task("B", 20);
    list.add_task("C", 30);
    let id = list.0[2].id.clone();
    list.toggle_status(&id);

    assert_eq!(list.total_estimated_minutes(), 60);
    assert_eq!(list.completed_minutes(), 30);
}

// ============================================================================
// Display ordering
// ============================================================================

#[test]
fn test_sorted_for_display_ascending_and_stable() {
    let mut list = TaskList::default();
    list.add_task("first", 10);
    list.add_task("second", 10);
    list.add_task("third", 10);
    // Scramble the orders, with a duplicate to exercise stability.
    list.0[0].order = 5;
    list.0[1].order = 2;
    list.0[2].order = 5;

    let sorted = list.sorted_for_display();
    assert_eq!(sorted[0].description, "second");
    // Ties keep source order: "first" was pushed before "third".
    assert_eq!(sorted[1].description, "first");
    assert_eq!(sorted[2].description, "third");

    // Sorting is a read; the list itself is untouched.
    assert_eq!(list.0[0].description, "first");
}

// ============================================================================
// Persistence boundary
// ============================================================================

#[test]
fn test_blob_round_trip() {
    let mut list = list_of(2);
    let id = list.0[0].id.clone();
    list.toggle_status(&id);
    list.update_task(
        &id,
        TaskPatch {
            notes: Some(Some("rinse twice".to_string())),
            assigned_to: Some(Some(3)),
            ..TaskPatch::default()
        },
    );

    let blob = list.to_value();
    let decoded = TaskList::from_value(&blob);
    assert_eq!(decoded, list);
}

#[test]
fn test_malformed_blob_degrades_to_empty() {
    let blob = serde_json::json!({"not": "a list"});
    assert!(TaskList::from_value(&blob).is_empty());

    let blob = serde_json::json!([{"id": 42, "bogus": true}]);
    assert!(TaskList::from_value(&blob).is_empty());
}

#[test]
fn test_blob_skeleton_fields_optional() {
    // Template blobs straight from the store may omit estimate and order.
    let blob = serde_json::json!([
        {"description": "A"},
        {"description": "B", "estimated_minutes": 45}
    ]);
    let skeletons: Vec<poolcare::models::task::TaskSkeleton> =
        serde_json::from_value(blob).unwrap();
    let tasks = instantiate_from_template(&skeletons);
    assert_eq!(tasks[0].estimated_minutes, 30);
    assert_eq!(tasks[0].order, 1);
    assert_eq!(tasks[1].estimated_minutes, 45);
    assert_eq!(tasks[1].order, 2);
}
