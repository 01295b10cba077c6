//! Application bootstrap
//!
//! Registers the page table once the router host is defined, marks the
//! document as initialized after the first completed navigation, then walks
//! a few paths.
//!
//! Run with: `RUST_LOG=debug cargo run --example bootstrap`

use slot_navigator::{
    EventBus, EventKind, LifecycleEvent, NavigationController, RouteDefinition, RouteTable,
    RouterHost, SubscribeOptions,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Elements,
    GetStarted,
    Home,
}

async fn load(page: Page) -> Result<Page, String> {
    log::debug!("Loading {:?} page", page);
    Ok(page)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let initialized = Arc::new(AtomicBool::new(false));
    let marker = Arc::clone(&initialized);
    EventBus::global().once(EventKind::NavigationEnd, move |_| {
        marker.store(true, Ordering::SeqCst);
    });

    EventBus::global().subscribe(
        EventKind::NavigationError,
        SubscribeOptions::always(),
        |event| {
            if let LifecycleEvent::NavigationError { path, error } = event {
                log::warn!("Navigation to '{}' failed: {}", path, error);
            }
        },
    );

    let host = RouterHost::<Page>::new();
    let ready = host.when_ready();

    let register = async move {
        let router = ready.wait().await?;
        router.add(vec![
            RouteDefinition::lazy("demo", || load(Page::Elements)),
            RouteDefinition::lazy("get-started", || load(Page::GetStarted)),
            RouteDefinition::lazy("", || load(Page::Home)),
            RouteDefinition::redirect("**", "home"),
        ])?;
        Ok::<_, slot_navigator::RouterError>(router)
    };

    if let Err(error) = host.define(NavigationController::new(
        RouteTable::empty(),
        EventBus::global().clone(),
    )) {
        log::error!("{}", error);
        return;
    }

    let router = match pollster::block_on(register) {
        Ok(router) => router,
        Err(error) => {
            log::error!("Route registration failed: {}", error);
            return;
        }
    };

    for path in ["", "demo", "get-started", "unknown"] {
        let outcome = pollster::block_on(router.push(path));
        log::info!(
            "{:>13} -> {:?} (mounted: {:?}, initialized: {})",
            format!("'{}'", path),
            outcome,
            router.mounted_component(),
            initialized.load(Ordering::SeqCst)
        );
    }

    if let Some(back) = router.back() {
        pollster::block_on(back);
        log::info!("After back: {:?}", router.mounted_component());
    }
}
