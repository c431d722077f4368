//! Demo command - drives a scripted navigation session and reports what happened.

use std::{sync::Arc, time::Duration};

use pagestack::{
    ModalPopped, Navigator, PageViewModel, PoppedPage, ViewRegistry, navigation::NavigationSnapshot,
};
use tokio::sync::mpsc;
use tracing::info;

use crate::{
    cli::{DemoArgs, Format},
    commands::config,
    output::print_snapshot,
    platform::LoggingPlatform,
};

/// Contract for screens shown as modals.
const MODAL: &str = "modal";

#[derive(Debug)]
struct DemoScreen {
    id: &'static str,
}

impl PageViewModel for DemoScreen {
    fn id(&self) -> &str {
        self.id
    }
}

fn screen(id: &'static str) -> Arc<dyn PageViewModel> {
    Arc::new(DemoScreen { id })
}

fn registry() -> ViewRegistry {
    let mut registry = ViewRegistry::new();
    registry
        .register_page::<DemoScreen>(None, "ScreenPage")
        .register_page::<DemoScreen>(Some(MODAL), "ModalPage");
    registry
}

/// Run the demo command
pub async fn run(args: &DemoArgs, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load(&args.config)?;
    let platform = LoggingPlatform::new(Duration::from_millis(args.transition_ms));
    let navigator = Navigator::start(config, Arc::new(registry()), platform)?;

    let mut popped = navigator.page_popped();
    let mut dismissed = navigator.modal_popped();

    script(&navigator, args.animate).await?;

    let snapshot = navigator.snapshot().await?;
    navigator.shutdown().await?;

    let pops = drain(&mut popped);
    let dismissals = drain(&mut dismissed);
    report(format, &pops, &dismissals, &snapshot)?;
    Ok(())
}

/// The navigation session: a back-stack, a modal flow with its own stack, an alert and
/// some back-stack surgery.
async fn script(navigator: &Navigator, animate: bool) -> pagestack::Result<()> {
    info!("Building the back-stack");
    navigator.push_page(screen("home"), None, false, animate).await?;
    navigator.push_page(screen("orders"), None, false, animate).await?;
    navigator.push_page(screen("order-detail"), None, false, animate).await?;
    navigator.insert_page(1, screen("search"), None).await?;

    info!("Running the checkout flow");
    navigator.push_modal(screen("checkout"), Some(MODAL), true).await?;
    navigator.push_page(screen("payment"), Some(MODAL), false, animate).await?;
    navigator.pop_page(animate).await?;
    navigator.pop_modal().await?;

    info!("Showing an alert");
    navigator.push_modal(screen("alert"), Some(MODAL), false).await?;
    navigator.pop_modal().await?;

    info!("Unwinding");
    navigator.remove_page(1).await?;
    navigator.pop_page(animate).await?;
    navigator.push_page(screen("home"), None, true, animate).await?;
    Ok(())
}

fn drain<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn popped_title(popped: &PoppedPage) -> String {
    popped.page.title().unwrap_or_default().to_string()
}

fn report(
    format: Format,
    pops: &[PoppedPage],
    dismissals: &[ModalPopped],
    snapshot: &NavigationSnapshot,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Human => {
            for popped in pops {
                println!("popped     {} (context {})", popped_title(popped), popped.context);
            }
            for modal in dismissals {
                println!("dismissed  {:?} modal", modal.kind);
            }
            println!();
            print_snapshot(snapshot);
        }
        Format::Json => {
            let value = serde_json::json!({
                "popped": pops
                    .iter()
                    .map(|p| serde_json::json!({
                        "context": p.context,
                        "title": popped_title(p),
                    }))
                    .collect::<Vec<_>>(),
                "dismissed": dismissals.iter().map(|m| m.kind).collect::<Vec<_>>(),
                "snapshot": snapshot,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}
