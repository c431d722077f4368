//! Page push and pop tests

use pagestack::{Transition, view::PageId};

use crate::helpers::*;

#[tokio::test]
async fn test_push_then_pop_scenario() {
    let ctx = TestContext::new().with_pages(&["a"]).await;
    let mut popped = ctx.navigator().page_popped();

    ctx.navigator()
        .push_page(screen("b"), None, false, false)
        .await
        .unwrap();
    assert_eq!(ctx.active_ids().await, vec!["a", "b"]);
    assert_no_event(&mut popped);

    ctx.navigator().pop_page(false).await.unwrap();
    assert_eq!(ctx.active_ids().await, vec!["a"]);

    let event = next_event(&mut popped).await;
    assert_eq!(popped_id(&event), "b");
    assert_no_event(&mut popped);
}

#[tokio::test]
async fn test_push_grows_active_context_by_one() {
    let ctx = TestContext::new().with_pages(&["a", "b"]).await;
    let vm = screen("c");

    ctx.navigator()
        .push_page(vm.clone(), None, false, false)
        .await
        .unwrap();

    let snapshot = ctx.snapshot().await;
    let active = snapshot.active().unwrap();
    assert_eq!(active.pages.len(), 3);
    let top = active.pages.last().unwrap();
    assert_eq!(top.view_model.as_deref(), Some("c"));
    assert_eq!(top.title.as_deref(), Some("c"));
    assert_eq!(top.view_type, "ScreenPage");
}

#[tokio::test]
async fn test_push_with_contract() {
    let ctx = TestContext::new().with_pages(&["a"]).await;

    ctx.navigator()
        .push_page(screen("b"), Some("compact"), false, false)
        .await
        .unwrap();

    let snapshot = ctx.snapshot().await;
    let top = snapshot.active().unwrap().pages.last().unwrap().clone();
    assert_eq!(top.view_type, "CompactScreenPage");
}

#[tokio::test]
async fn test_reset_stack_discards_history() {
    let ctx = TestContext::new().with_pages(&["a", "b", "c"]).await;
    let mut popped = ctx.navigator().page_popped();

    ctx.navigator()
        .push_page(screen("d"), None, true, false)
        .await
        .unwrap();

    assert_eq!(ctx.active_ids().await, vec!["d"]);
    // Discarded pages are not pops
    assert_no_event(&mut popped);

    let root = ctx.snapshot().await.root().unwrap().id;
    let calls = ctx.platform().set_pages_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].context, root);
    assert!(calls[0].pages.is_empty());
}

#[tokio::test]
async fn test_animate_flag_reaches_platform() {
    let ctx = TestContext::new();

    ctx.navigator()
        .push_page(screen("a"), None, false, true)
        .await
        .unwrap();
    ctx.navigator()
        .push_page(screen("b"), None, false, false)
        .await
        .unwrap();
    ctx.navigator().pop_page(true).await.unwrap();

    let animated: Vec<bool> = ctx
        .platform()
        .transitions()
        .into_iter()
        .map(|(_, animate)| animate)
        .collect();
    assert_eq!(animated, vec![true, false, true]);
}

#[tokio::test]
async fn test_pop_transition_names_the_leaving_page() {
    let ctx = TestContext::new().with_pages(&["a", "b"]).await;
    let before = ctx.snapshot().await;
    let leaving: PageId = before.active().unwrap().pages[1].id;

    ctx.navigator().pop_page(false).await.unwrap();

    let transitions = ctx.platform().transitions();
    match &transitions.last().unwrap().0 {
        Transition::Pop { context, page } => {
            assert_eq!(*context, before.root().unwrap().id);
            assert_eq!(page.id(), leaving);
        }
        other => panic!("expected a pop transition, got {other:?}"),
    }
}

#[tokio::test]
async fn test_root_page_cannot_be_popped() {
    let ctx = TestContext::new();

    let err = ctx.navigator().pop_page(false).await.unwrap_err();
    assert!(err.is_invalid_state());

    ctx.navigator()
        .push_page(screen("a"), None, false, false)
        .await
        .unwrap();
    let err = ctx.navigator().pop_page(false).await.unwrap_err();
    assert!(err.is_invalid_state());
    assert_eq!(ctx.active_ids().await, vec!["a"]);
    assert_eq!(ctx.platform().transition_kinds(), vec!["push"]);
}

#[tokio::test]
async fn test_resolution_error_leaves_state_unchanged() {
    let ctx = TestContext::new().with_pages(&["a"]).await;
    let before = ctx.snapshot().await;

    let err = ctx
        .navigator()
        .push_page(std::sync::Arc::new(Unregistered), None, true, false)
        .await
        .unwrap_err();
    assert!(err.is_not_registered());

    let err = ctx
        .navigator()
        .push_page(std::sync::Arc::new(Headline), None, false, false)
        .await
        .unwrap_err();
    assert!(err.is_type_mismatch());

    assert_eq!(ctx.snapshot().await, before);
    assert_eq!(ctx.platform().transitions().len(), 1);
    assert!(ctx.platform().set_pages_calls().is_empty());
}
