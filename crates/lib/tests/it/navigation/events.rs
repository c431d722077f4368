//! Popped-page stream tests
//!
//! Every pop from every context surfaces exactly once, in the order the transitions
//! finished.

use pagestack::Transition;

use crate::helpers::*;

#[tokio::test]
async fn test_pop_event_is_published_before_completion() {
    let ctx = TestContext::new().with_pages(&["a", "b"]).await;
    let mut popped = ctx.navigator().page_popped();

    ctx.navigator().pop_page(false).await.unwrap();

    // No waiting: the event is already on the channel when the pop completes
    let event = popped.try_recv().unwrap();
    assert_eq!(popped_id(&event), "b");
    assert_eq!(event.context, ctx.snapshot().await.root().unwrap().id);
    assert_no_event(&mut popped);
}

#[tokio::test]
async fn test_events_follow_finish_order_not_call_order() {
    let ctx = TestContext::manual().with_pages(&["a", "b", "c"]).await;
    let mut popped = ctx.navigator().page_popped();

    let first = ctx.navigator().pop_page(true);
    ctx.platform().wait_for_pending(1).await;
    let second = ctx.navigator().pop_page(true);
    ctx.platform().wait_for_pending(2).await;

    // The model already moved on at request time
    assert_eq!(ctx.active_ids().await, vec!["a"]);

    let leaving: Vec<String> = ctx
        .platform()
        .transitions()
        .iter()
        .filter_map(|(t, _)| match t {
            Transition::Pop { page, .. } => page.view_model().map(|vm| vm.id().to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(leaving, vec!["c", "b"]);

    // Finish the second pop first
    assert!(ctx.platform().finish(1));
    second.await.unwrap();
    assert!(ctx.platform().finish_next());
    first.await.unwrap();

    assert_eq!(popped_id(&next_event(&mut popped).await), "b");
    assert_eq!(popped_id(&next_event(&mut popped).await), "c");
    assert_no_event(&mut popped);
}

#[tokio::test]
async fn test_pops_from_every_context_share_one_stream() {
    let ctx = TestContext::new().with_pages(&["a", "b"]).await;
    let root = ctx.snapshot().await.root().unwrap().id;
    let mut popped = ctx.navigator().page_popped();

    ctx.navigator()
        .push_modal(screen("m"), None, true)
        .await
        .unwrap();
    let modal_context = ctx.snapshot().await.active().unwrap().id;
    ctx.navigator()
        .push_page(screen("n"), None, false, false)
        .await
        .unwrap();

    ctx.navigator().pop_page(false).await.unwrap();
    ctx.navigator().pop_modal().await.unwrap();
    ctx.navigator().pop_page(false).await.unwrap();

    let first = next_event(&mut popped).await;
    let second = next_event(&mut popped).await;
    assert_eq!((popped_id(&first), first.context), ("n".to_string(), modal_context));
    assert_eq!((popped_id(&second), second.context), ("b".to_string(), root));
    assert_no_event(&mut popped);
}

#[tokio::test]
async fn test_subscribers_each_receive_every_pop() {
    let ctx = TestContext::new().with_pages(&["a", "b", "c"]).await;
    let mut early = ctx.navigator().page_popped();

    ctx.navigator().pop_page(false).await.unwrap();
    let mut late = ctx.navigator().page_popped();
    ctx.navigator().pop_page(false).await.unwrap();

    assert_eq!(popped_id(&next_event(&mut early).await), "c");
    assert_eq!(popped_id(&next_event(&mut early).await), "b");
    // Subscribing does not replay earlier pops
    assert_eq!(popped_id(&next_event(&mut late).await), "b");
    assert_no_event(&mut late);
}

#[tokio::test]
async fn test_interactive_pop_is_published() {
    let ctx = TestContext::new().with_pages(&["a", "b"]).await;
    let root = ctx.snapshot().await.root().unwrap().id;
    let mut popped = ctx.navigator().page_popped();

    ctx.navigator()
        .platform_handle()
        .page_popped_interactively(root)
        .unwrap();

    let event = next_event(&mut popped).await;
    assert_eq!(popped_id(&event), "b");
    assert_eq!(event.context, root);
    assert_eq!(ctx.active_ids().await, vec!["a"]);
    // The page already left the screen; no transition is requested
    assert_eq!(ctx.platform().transition_kinds(), vec!["push", "push"]);
}

#[tokio::test]
async fn test_interactive_pop_of_root_page_is_ignored() {
    let ctx = TestContext::new().with_pages(&["a"]).await;
    let root = ctx.snapshot().await.root().unwrap().id;
    let mut popped = ctx.navigator().page_popped();

    ctx.navigator()
        .platform_handle()
        .page_popped_interactively(root)
        .unwrap();

    assert_eq!(ctx.active_ids().await, vec!["a"]);
    assert_no_event(&mut popped);
}

#[tokio::test]
async fn test_interactive_pop_in_modal_context() {
    let ctx = TestContext::new().with_pages(&["a"]).await;
    ctx.navigator()
        .push_modal(screen("m"), None, true)
        .await
        .unwrap();
    ctx.navigator()
        .push_page(screen("n"), None, false, false)
        .await
        .unwrap();
    let modal_context = ctx.snapshot().await.active().unwrap().id;
    let mut popped = ctx.navigator().page_popped();

    ctx.navigator()
        .platform_handle()
        .page_popped_interactively(modal_context)
        .unwrap();

    let event = next_event(&mut popped).await;
    assert_eq!(popped_id(&event), "n");
    assert_eq!(event.context, modal_context);
    assert_eq!(ctx.active_ids().await, vec!["m"]);
}

#[tokio::test]
async fn test_slow_subscriber_receives_every_pop() {
    const PAGES: usize = 300;
    let ctx = TestContext::new().with_pages(&["root"]).await;
    let mut popped = ctx.navigator().page_popped();

    for i in 0..PAGES {
        ctx.navigator()
            .push_page(screen(&format!("p{i}")), None, false, false)
            .await
            .unwrap();
    }
    for _ in 0..PAGES {
        ctx.navigator().pop_page(false).await.unwrap();
    }

    // Nothing was read while popping; every pop is still queued, newest first
    let ids: Vec<String> = drain_events(&mut popped).iter().map(popped_id).collect();
    let expected: Vec<String> = (0..PAGES).rev().map(|i| format!("p{i}")).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_slow_subscriber_receives_every_dismissal() {
    const MODALS: usize = 300;
    let ctx = TestContext::new().with_pages(&["root"]).await;
    let mut dismissed = ctx.navigator().modal_popped();

    for _ in 0..MODALS {
        ctx.navigator()
            .push_modal(screen("alert"), None, false)
            .await
            .unwrap();
        ctx.navigator().pop_modal().await.unwrap();
    }

    assert_eq!(drain_events(&mut dismissed).len(), MODALS);
}

#[tokio::test]
async fn test_dropped_subscriber_does_not_block_others() {
    let ctx = TestContext::new().with_pages(&["a", "b", "c"]).await;
    let mut kept = ctx.navigator().page_popped();
    drop(ctx.navigator().page_popped());

    ctx.navigator().pop_page(false).await.unwrap();
    ctx.navigator().pop_page(false).await.unwrap();

    let ids: Vec<String> = drain_events(&mut kept).iter().map(popped_id).collect();
    assert_eq!(ids, vec!["c", "b"]);
}
