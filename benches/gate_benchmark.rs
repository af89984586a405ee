use chrono::{Duration, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use roxhub::db::{keys, KvStoreExt, MemoryStore};
use roxhub::models::{Feature, SubscriptionRecord, Tier};
use roxhub::services::{is_feature_enabled, Entitlements, LoginForm, SubscriptionResolver};
use roxhub::time_utils::SystemClock;
use std::hint::black_box;
use std::sync::Arc;

fn benchmark_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_gate");

    group.bench_function("capability_table", |b| {
        b.iter(|| {
            for tier in Tier::ALL {
                for feature in Feature::ALL {
                    black_box(is_feature_enabled(black_box(tier), black_box(feature)));
                }
            }
        })
    });

    let store = MemoryStore::new().shared();
    let record = SubscriptionRecord::start(Tier::Pro.plan(), Utc::now() - Duration::days(1));
    store
        .set_json(&keys::subscription("1"), &record)
        .expect("Failed to seed subscription");

    let mut entitlements = Entitlements::init(store.clone(), Arc::new(SystemClock));
    entitlements
        .login(&LoginForm {
            email: "max@rox.fit".to_string(),
            password: "secret".to_string(),
        })
        .expect("Failed to log in");

    group.bench_function("check_access_cached", |b| {
        b.iter(|| black_box(entitlements.check_feature_access(black_box(Feature::RoxPartner))))
    });

    group.bench_function("check_access_by_id", |b| {
        b.iter(|| black_box(entitlements.check_feature_id(black_box("community-forum"))))
    });

    let user = entitlements.user().cloned().expect("Logged in");
    let mut resolver = SubscriptionResolver::new(store, Arc::new(SystemClock));

    group.bench_function("resolve_tier_uncached", |b| {
        b.iter(|| {
            resolver.invalidate();
            black_box(resolver.resolve_tier(black_box(Some(&user))))
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_gate);
criterion_main!(benches);
