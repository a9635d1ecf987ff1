// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use offboard_model::{generate::PoolGenerator, instance::Instance};
use offboard_search::config::OptimizerConfig;
use offboard_solver::optimizer::{Optimizer, StrategyKind};
use std::hint::black_box;

/// Pool sizes and needed volumes, from exhaustive-sized pools to large ones.
const POOLS: [(usize, u64); 4] = [
    (16, 150_000),
    (1_000, 100_000),
    (10_000, 100_000),
    (100_000, 100_000),
];

fn generate(num_devices: usize, needed_volume: u64) -> Instance<u64> {
    PoolGenerator::new()
        .instance::<u64>(num_devices, needed_volume)
        .unwrap_or_else(|e| panic!("failed to generate a pool of {}: {}", num_devices, e))
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_benchmark");
    group.sample_size(10);

    for (num_devices, needed_volume) in POOLS {
        let instance = generate(num_devices, needed_volume);
        let mut optimizer = Optimizer::<u64>::new(OptimizerConfig::default());

        group.throughput(Throughput::Elements(num_devices as u64));

        let kinds: &[StrategyKind] = if num_devices <= 20 {
            &[
                StrategyKind::Exhaustive,
                StrategyKind::Greedy,
                StrategyKind::ScaledDynamicProgram,
            ]
        } else {
            &[StrategyKind::Greedy, StrategyKind::ScaledDynamicProgram]
        };

        for &kind in kinds {
            group.bench_with_input(
                BenchmarkId::new(kind.to_string(), num_devices),
                &instance,
                |b, instance| {
                    b.iter(|| {
                        let outcome = optimizer.optimize(black_box(instance), kind);
                        black_box(outcome.result().cost())
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
