use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gp_lite::{Config, Engine, GenerationCtx, GenerationExtra, Problem, Rng};

#[derive(Clone)]
struct Bits256(Vec<bool>);

struct OneMax {
    len: usize,
}

impl Problem<Bits256> for OneMax {
    fn create_random(&self, rng: &mut dyn Rng) -> Bits256 {
        Bits256((0..self.len).map(|_| rng.next_f64() < 0.5).collect())
    }

    fn fitness(&self, genome: &Bits256) -> f64 {
        genome.0.iter().filter(|&&b| b).count() as f64
    }

    fn mutate(&self, mut genome: Bits256, rng: &mut dyn Rng) -> Bits256 {
        let idx = rng.next_index(self.len as u64) as usize;
        genome.0[idx] = !genome.0[idx];
        genome
    }

    fn crossover(&self, a: &Bits256, b: &Bits256, rng: &mut dyn Rng) -> (Bits256, Bits256) {
        let point = rng.next_index(self.len as u64) as usize;
        let mut c1 = a.0.clone();
        let mut c2 = b.0.clone();
        c1[point..].clone_from_slice(&b.0[point..]);
        c2[point..].clone_from_slice(&a.0[point..]);
        (Bits256(c1), Bits256(c2))
    }
}

fn bench_one_max_run(c: &mut Criterion) {
    c.bench_function("one_max_256_100gen", |b| {
        b.iter(|| {
            let config = Config::default()
                .with_pop_size(100)
                .with_generations(100)
                .with_seed(42);
            let mut engine = Engine::new(OneMax { len: 256 }, config).unwrap();
            let result = engine.run(None::<fn(GenerationCtx, GenerationExtra)>);
            black_box(result.best_fitness)
        })
    });
}

criterion_group!(benches, bench_one_max_run);
criterion_main!(benches);
