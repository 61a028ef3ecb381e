use chainable::{exists, wrap_with, ChainOptions, ClassBuilder, ObjectRef, Value};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_push_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_chain");

    for steps in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(steps as u64));
        group.bench_with_input(BenchmarkId::new("strict", steps), &steps, |b, &steps| {
            b.iter(|| {
                let mut chain = wrap_with(Value::array(Vec::<Value>::new()), ChainOptions::strict());
                for i in 0..steps {
                    chain.call("push", &[Value::from(i)]).unwrap();
                }
                black_box(chain.ledger().len())
            });
        });
        group.bench_with_input(BenchmarkId::new("lenient", steps), &steps, |b, &steps| {
            b.iter(|| {
                let mut chain = wrap_with(Value::array(Vec::<Value>::new()), ChainOptions::lenient());
                for i in 0..steps {
                    chain.call("push", &[Value::from(i)]).unwrap();
                }
                black_box(chain.ledger().len())
            });
        });
    }

    group.finish();
}

fn bench_map_store(c: &mut Criterion) {
    c.bench_function("map_set_get", |b| {
        b.iter(|| {
            let mut chain = wrap_with(Value::map(), ChainOptions::strict());
            for i in 0..64 {
                let key = Value::from(format!("key{}", i));
                chain.call("set", &[key.clone(), Value::from(i)]).unwrap();
                chain.call("get", &[key]).unwrap();
            }
            black_box(chain.chain_value_at(127))
        });
    });
}

fn bench_resolver_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver_depth");

    for depth in [1usize, 8, 32] {
        let mut class = ClassBuilder::new("Level0")
            .method("base", |_, _| Ok(Value::Undefined))
            .build();
        for level in 1..depth {
            class = ClassBuilder::new(format!("Level{}", level)).extends(&class).build();
        }
        let instance = Value::Object(ObjectRef::instance(&class));

        group.bench_with_input(BenchmarkId::new("inherited", depth), &instance, |b, instance| {
            b.iter(|| exists(black_box(instance), black_box("base")));
        });
        group.bench_with_input(BenchmarkId::new("missing", depth), &instance, |b, instance| {
            b.iter(|| exists(black_box(instance), black_box("nope")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_chain, bench_map_store, bench_resolver_depth);
criterion_main!(benches);
