// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Demonstrates using `LazyGroup` to hold per-tenant state that is expensive to build.
//!
//! Several worker threads serve requests for a few tenants. Each tenant's state is built the
//! first time any worker needs it and shared afterwards. Halfway through, the configuration
//! changes and the group is reset so every tenant gets rebuilt with the new settings.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use lazy_group::LazyGroup;

#[derive(Debug)]
struct TenantState {
    build: usize,
    pool_size: usize,
}

fn tenant_constructor(builds: Arc<AtomicUsize>, pool_size: usize) -> impl Fn() -> Arc<TenantState> + Send + Sync + 'static {
    move || {
        // Simulate connecting to the tenant's backing store.
        thread::sleep(Duration::from_millis(50));
        Arc::new(TenantState {
            build: builds.fetch_add(1, Ordering::SeqCst) + 1,
            pool_size,
        })
    }
}

fn serve(group: &Arc<LazyGroup<Arc<TenantState>>>, worker: usize) {
    for tenant in ["contoso", "fabrikam", "contoso", "northwind"] {
        let state = group.get(tenant);
        println!(
            "  [worker {worker}] {tenant}: build #{}, pool size {}",
            state.build, state.pool_size
        );
    }
}

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let builds = Arc::new(AtomicUsize::new(0));
    let group = Arc::new(
        LazyGroup::builder()
            .name("tenants")
            .capacity(3)
            .constructor(tenant_constructor(Arc::clone(&builds), 4))
            .build(),
    );

    println!("Serving with pool size 4...");
    let workers: Vec<_> = (1..=4)
        .map(|worker| {
            let group = Arc::clone(&group);
            thread::spawn(move || serve(&group, worker))
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    println!("\nConfiguration changed, resetting tenant state...\n");
    group.reset(tenant_constructor(Arc::clone(&builds), 16));
    serve(&group, 0);

    println!(
        "\nDone: {} tenant states built across {} generations.",
        builds.load(Ordering::SeqCst),
        group.generation() + 1
    );
}
