//! View resolution tests through the public registry.

use std::sync::Arc;

use pagestack::{
    PageViewModel,
    view::{locate_page_for, resolve_page},
};

use crate::helpers::*;

#[test]
fn test_contract_selects_registration() {
    let registry = test_registry();
    let vm = screen("orders");

    let plain = resolve_page(&registry, &vm, None).unwrap();
    let compact = resolve_page(&registry, &vm, Some("compact")).unwrap();

    assert_eq!(plain.view_type(), "ScreenPage");
    assert_eq!(compact.view_type(), "CompactScreenPage");
    assert_eq!(plain.title(), Some("orders"));
    assert!(Arc::ptr_eq(compact.view_model().unwrap(), &vm));
}

#[test]
fn test_resolution_failures_are_classified() {
    let registry = test_registry();

    let unregistered: Arc<dyn PageViewModel> = Arc::new(Unregistered);
    let err = resolve_page(&registry, &unregistered, None).unwrap_err();
    assert!(err.is_resolution_error());
    assert!(err.is_not_registered());
    assert_eq!(err.module(), "view");

    let unknown_contract = resolve_page(&registry, &screen("orders"), Some("wide")).unwrap_err();
    assert!(unknown_contract.is_not_registered());

    let headline: Arc<dyn PageViewModel> = Arc::new(Headline);
    let err = resolve_page(&registry, &headline, None).unwrap_err();
    assert!(err.is_resolution_error());
    assert!(err.is_type_mismatch());
}

#[test]
fn test_locate_does_not_title() {
    let registry = test_registry();
    let page = locate_page_for(&registry, &screen("orders"), None).unwrap();
    assert_eq!(page.title(), None);
    assert!(page.view_model().is_some());
}
