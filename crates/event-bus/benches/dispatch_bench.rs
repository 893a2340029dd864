use std::fmt;
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::EventId;
use criterion::{Criterion, criterion_group, criterion_main};
use event_bus::{DomainEvent, EventDispatcher, EventMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Tick,
    Tock,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone)]
struct BenchEvent {
    meta: EventMeta,
    kind: Kind,
    value: u64,
}

impl DomainEvent for BenchEvent {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        self.kind
    }

    fn event_id(&self) -> EventId {
        self.meta.event_id
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.meta.occurred_at
    }
}

fn make_events(count: u64) -> Vec<BenchEvent> {
    (0..count)
        .map(|value| BenchEvent {
            meta: EventMeta::now(),
            kind: if value % 2 == 0 { Kind::Tick } else { Kind::Tock },
            value,
        })
        .collect()
}

fn make_dispatcher(total: &Arc<AtomicU64>) -> EventDispatcher<BenchEvent> {
    let mut dispatcher = EventDispatcher::new();
    for name in ["a", "b", "c"] {
        let total = Arc::clone(total);
        dispatcher.subscribe(Kind::Tick, name, move |event: &BenchEvent| {
            total.fetch_add(event.value, Ordering::Relaxed);
            Ok(())
        });
    }
    let total = Arc::clone(total);
    dispatcher.subscribe_when(
        Kind::Tock,
        "odd_only",
        move |event: &BenchEvent| {
            total.fetch_add(event.value, Ordering::Relaxed);
            Ok(())
        },
        |event: &BenchEvent| event.value % 4 == 1,
    );
    dispatcher
}

fn bench_dispatch_batch(c: &mut Criterion) {
    let total = Arc::new(AtomicU64::new(0));
    let dispatcher = make_dispatcher(&total);
    let events = make_events(1_000);

    c.bench_function("event_bus/dispatch_1000", |b| {
        b.iter(|| dispatcher.dispatch(black_box(&events)).unwrap());
    });
}

fn bench_dispatch_single(c: &mut Criterion) {
    let total = Arc::new(AtomicU64::new(0));
    let dispatcher = make_dispatcher(&total);
    let events = make_events(1);

    c.bench_function("event_bus/dispatch_single", |b| {
        b.iter(|| dispatcher.dispatch(black_box(&events)).unwrap());
    });
}

fn bench_dispatch_no_subscribers(c: &mut Criterion) {
    let dispatcher: EventDispatcher<BenchEvent> = EventDispatcher::new();
    let events = make_events(1_000);

    c.bench_function("event_bus/dispatch_unsubscribed_1000", |b| {
        b.iter(|| dispatcher.dispatch(black_box(&events)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_dispatch_batch,
    bench_dispatch_single,
    bench_dispatch_no_subscribers
);
criterion_main!(benches);
