//! Population-based corner search used when a slice is appended by hand.
//!
//! Individuals are labeled quadrilaterals in global coordinates. Fitness is a
//! saturating function of the boundary fit minus a penalty for area below a
//! fraction of the window area. Each generation keeps the elite, mutates half
//! of the remainder with an annealed jitter and fills the rest by uniform
//! per-coordinate crossover of elite parents.
use crate::budget::SearchBudget;
use crate::detect::{canonicalize, fit_score};
use crate::geometry::Quad;
use crate::window::Window;
use log::{debug, trace};
use rand::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParams {
    pub population: usize,
    pub elite: usize,
    /// Generations without improvement before the search stops.
    pub stall_generations: usize,
    pub max_generations: usize,
    /// Area floor as a fraction of `window²`.
    pub area_floor: f32,
    /// Half-width of the uniform jitter applied to the initial population.
    pub initial_jitter: f32,
    /// Mutation jitter relative to `initial_jitter` in the first generation.
    pub mutation_scale: f32,
    /// Per-generation decay of the mutation jitter.
    pub annealing: f32,
    pub crossover_retries: usize,
    /// Rate of the saturating fit term `1 - exp(-rate·fit)`.
    pub saturation: f32,
    pub area_penalty: f32,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population: 500,
            elite: 50,
            stall_generations: 250,
            max_generations: 1000,
            area_floor: 0.35,
            initial_jitter: 10.0,
            mutation_scale: 1.5,
            annealing: 0.995,
            crossover_retries: 10,
            saturation: 0.005,
            area_penalty: 1.0,
        }
    }
}

/// Best individual of a run.
#[derive(Clone, Copy, Debug)]
pub struct GeneticOutcome {
    pub quad: Quad,
    pub fit: u32,
    pub fitness: f32,
    pub generations: usize,
}

struct Scorer<'a> {
    window: &'a Window,
    params: &'a GeneticParams,
    floor: f32,
    norm: f32,
}

impl Scorer<'_> {
    fn fitness(&self, quad: &Quad) -> f32 {
        let fit = fit_score(self.window, quad);
        let deficit = (self.floor - quad.area()).max(0.0);
        1.0 - (-self.params.saturation * fit as f32).exp()
            - self.params.area_penalty * deficit / self.norm
    }
}

fn jitter<R: Rng>(window: &Window, quad: &Quad, amplitude: f32, rng: &mut R) -> Quad {
    if amplitude <= 0.0 {
        return *quad;
    }
    quad.map(|p| {
        let moved = [
            p[0] + rng.gen_range(-amplitude..=amplitude),
            p[1] + rng.gen_range(-amplitude..=amplitude),
        ];
        window.clamp_global(moved)
    })
}

fn crossover<R: Rng>(a: &Quad, b: &Quad, rng: &mut R) -> Quad {
    let (va, vb) = (a.vertices(), b.vertices());
    let v = std::array::from_fn(|i| {
        [
            if rng.gen_bool(0.5) { va[i][0] } else { vb[i][0] },
            if rng.gen_bool(0.5) { va[i][1] } else { vb[i][1] },
        ]
    });
    Quad::from_vertices(v)
}

/// Refines `seed` (global coordinates) inside `window`.
///
/// The unjittered seed is part of the first generation and the best
/// individual ever seen is returned, so the result never scores below the
/// seed. The returned shape is relabeled when its corners allow it.
pub fn refine_genetic<R: Rng>(
    window: &Window,
    seed: &Quad,
    params: &GeneticParams,
    rng: &mut R,
    budget: &SearchBudget,
) -> GeneticOutcome {
    let norm = (window.size() * window.size()) as f32;
    let scorer = Scorer {
        window,
        params,
        floor: params.area_floor * norm,
        norm,
    };
    let population = params.population.max(2);
    let elite = params.elite.clamp(1, population);

    let start = seed.map(|p| window.clamp_global(p));
    let mut current: Vec<Quad> = std::iter::once(start)
        .chain((1..population).map(|_| jitter(window, &start, params.initial_jitter, rng)))
        .collect();

    let mut best = start;
    let mut best_fitness = f32::NEG_INFINITY;
    let mut stall = 0;
    let mut generation = 0;

    loop {
        let scores: Vec<f32> = current.par_iter().map(|q| scorer.fitness(q)).collect();
        let mut order: Vec<usize> = (0..current.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let top = order[0];
        if scores[top] > best_fitness {
            best_fitness = scores[top];
            best = current[top];
            stall = 0;
        } else {
            stall += 1;
        }
        generation += 1;
        trace!("generation {generation}: best fitness {best_fitness:.4}, stall {stall}");
        if stall >= params.stall_generations
            || generation >= params.max_generations
            || budget.is_exhausted()
        {
            break;
        }

        let parents: Vec<Quad> = order[..elite].iter().map(|&i| current[i]).collect();
        let amplitude = params.initial_jitter
            * params.mutation_scale
            * params.annealing.powi(generation as i32);
        let mutants = (population - elite) / 2;

        let mut next = parents.clone();
        for _ in 0..mutants {
            let parent = &parents[rng.gen_range(0..parents.len())];
            next.push(jitter(window, parent, amplitude, rng));
        }
        while next.len() < population {
            let a = &parents[rng.gen_range(0..parents.len())];
            let b = &parents[rng.gen_range(0..parents.len())];
            let mut child = crossover(a, b, rng);
            for _ in 1..params.crossover_retries.max(1) {
                if child.area() >= scorer.floor {
                    break;
                }
                child = crossover(a, b, rng);
            }
            next.push(child);
        }
        current = next;
    }

    let quad = canonicalize(&best).unwrap_or(best);
    let fit = fit_score(window, &quad);
    debug!("genetic refinement: fit {fit} after {generation} generations");
    GeneticOutcome {
        quad,
        fit,
        fitness: best_fitness,
        generations: generation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::distance;
    use crate::image::{EdgeMap, EDGE};

    fn outline() -> (Vec<u8>, Quad) {
        let truth = Quad::new([40.0, 45.0], [80.0, 45.0], [80.0, 75.0], [40.0, 75.0]);
        let mut data = vec![0u8; 120 * 120];
        for x in 40..=80 {
            data[45 * 120 + x] = EDGE;
            data[75 * 120 + x] = EDGE;
        }
        for y in 45..=75 {
            data[y * 120 + 40] = EDGE;
            data[y * 120 + 80] = EDGE;
        }
        (data, truth)
    }

    fn small() -> GeneticParams {
        GeneticParams {
            population: 120,
            elite: 12,
            stall_generations: 30,
            max_generations: 150,
            ..GeneticParams::default()
        }
    }

    #[test]
    fn recovers_shifted_outline() {
        let (data, truth) = outline();
        let edges = EdgeMap::new(120, 120, &data).unwrap();
        let window = Window::extract(&edges, [60.0, 60.0], 56);
        let seed = truth.translated([3.0, -3.0]);
        let seed_fit = fit_score(&window, &seed);
        let mut rng = StdRng::seed_from_u64(5);
        let out = refine_genetic(&window, &seed, &small(), &mut rng, &SearchBudget::unlimited());
        assert!(out.fit > seed_fit);
        assert!(out.fit > 100, "fit {}", out.fit);
        for (a, b) in out.quad.vertices().iter().zip(truth.vertices()) {
            assert!(distance(*a, b) < 5.0, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn cancelled_budget_returns_after_one_generation() {
        let (data, truth) = outline();
        let edges = EdgeMap::new(120, 120, &data).unwrap();
        let window = Window::extract(&edges, [60.0, 60.0], 56);
        let token = crate::budget::CancelToken::new();
        token.cancel();
        let budget = SearchBudget::unlimited().with_cancel(token);
        let mut rng = StdRng::seed_from_u64(1);
        let out = refine_genetic(&window, &truth, &small(), &mut rng, &budget);
        assert_eq!(out.generations, 1);
        assert!(out.fit >= 130);
    }

    #[test]
    fn same_seed_same_result() {
        let (data, truth) = outline();
        let edges = EdgeMap::new(120, 120, &data).unwrap();
        let window = Window::extract(&edges, [60.0, 60.0], 56);
        let seed = truth.translated([2.0, 2.0]);
        let params = GeneticParams {
            max_generations: 20,
            ..small()
        };
        let run = |s| {
            let mut rng = StdRng::seed_from_u64(s);
            refine_genetic(&window, &seed, &params, &mut rng, &SearchBudget::unlimited())
        };
        let (a, b) = (run(9), run(9));
        assert_eq!(a.quad, b.quad);
        assert_eq!(a.fit, b.fit);
    }
}
