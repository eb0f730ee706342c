//! An exact solver specialized to basis selection models.
//!
//! Once a basis is fixed, every target is independently best reconstructed by the smallest
//! subset of the basis summing to it. The cost of a basis $B$ is therefore
//! $$
//!     w\_k |B| + w\_l \sum\_i \min \\{ |S| : S \subseteq B, \Sigma S = t\_i \\}
//! $$
//! and the solver enumerates bases by increasing size, skipping every size for which a lower
//! bound of this cost cannot beat the best basis found so far.
//!
//! Within a size, bases are grown one rotation at a time in candidate order. The subset sums of a
//! partial basis are shared by all of its extensions, and a partial basis is dropped as soon as a
//! target lies out of reach of its sums plus the rotations which may still be added.
//!
//! The search starts from two bases which are always cheap to evaluate: materializing every
//! target, and materializing the signed powers of two of their non-adjacent forms.

use super::model::BasisSelectionModel;
use super::parameters::CostWeights;
use super::solver::{Assignment, SolveStatus, Solver, SolverOutput};
use crate::config::SearchConfig;
use crate::sdr::encode_bitwise;
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

// Costs closer than this are considered equal, the earliest basis wins
const COST_EPSILON: f64 = 1e-9;
// Number of explored partial bases between two checks of the time limit
const TIME_CHECK_PERIOD: usize = 256;

// Smallest subset of a partial basis reaching each sum, as (size, bitmask of basis members)
type SubsetSums = BTreeMap<i64, (u32, u64)>;

/// Exhaustive search over the bases of a [`BasisSelectionModel`].
///
/// The result is [`SolveStatus::Optimal`] unless the search was cut short by the time limit or
/// the maximal basis size of its [`SearchConfig`], in which case the best basis found is returned
/// as [`SolveStatus::Feasible`].
///
/// The rotation by zero is never materialized: it costs key material and reconstructs nothing.
/// Among bases of equal cost, the first one in candidate order is returned.
#[derive(Clone, Debug, Default)]
pub struct SubsetSearchSolver {
    config: SearchConfig,
}

impl SubsetSearchSolver {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl Solver for SubsetSearchSolver {
    #[instrument(
        level = "debug",
        skip_all,
        fields(candidates = model.candidates().len(), targets = model.targets().len())
    )]
    fn solve(&self, model: &BasisSelectionModel) -> SolverOutput {
        let mut search = Search::new(model, &self.config);
        let status = search.run();
        debug!(?status, visited = search.visited, "Basis search done");
        match search.best {
            Some(best) if status.is_success() => {
                SolverOutput::new(status, best.to_assignment(model))
            }
            _ => SolverOutput::failure(status),
        }
    }
}

/// A basis and the reconstruction of every target, as indices into the model candidates.
#[derive(Clone, Debug)]
struct Incumbent {
    basis: Vec<usize>,
    reconstructions: Vec<Vec<usize>>,
    cost: f64,
}

impl Incumbent {
    fn new(basis: Vec<usize>, reconstructions: Vec<Vec<usize>>, weights: CostWeights) -> Self {
        let uses: usize = reconstructions.iter().map(Vec::len).sum();
        let cost = weights.key_material * basis.len() as f64 + weights.latency * uses as f64;
        Self {
            basis,
            reconstructions,
            cost,
        }
    }

    fn to_assignment(&self, model: &BasisSelectionModel) -> Assignment {
        let mut assignment = Assignment::for_model(model);
        for &candidate_index in &self.basis {
            assignment.set(model.choose_variable(candidate_index), true);
        }
        for (target, members) in self.reconstructions.iter().enumerate() {
            let terms = model.representation_terms(target);
            for &candidate_index in members {
                assignment.set(terms[candidate_index].1, true);
            }
        }
        assignment
    }
}

pub(super) struct Search<'a> {
    model: &'a BasisSelectionModel,
    config: &'a SearchConfig,
    weights: CostWeights,
    // Indices of the candidates worth materializing
    pool: Vec<usize>,
    index_of: HashMap<i64, usize>,
    // Occurrences of each distinct nonzero target, most frequent first
    multiplicities: Vec<usize>,
    nonzero_targets: usize,
    distinct_targets: Vec<i64>,
    best: Option<Incumbent>,
    started: Instant,
    visited: usize,
}

impl<'a> Search<'a> {
    pub(super) fn new(model: &'a BasisSelectionModel, config: &'a SearchConfig) -> Self {
        let pool = model
            .candidates()
            .iter()
            .positions(|&candidate| candidate != 0)
            .collect();
        let index_of = model
            .candidates()
            .iter()
            .enumerate()
            .map(|(index, &candidate)| (candidate, index))
            .collect();

        let mut occurrences: HashMap<i64, usize> = HashMap::new();
        for &target in model.targets().iter().filter(|&&target| target != 0) {
            *occurrences.entry(target).or_default() += 1;
        }
        let multiplicities = occurrences
            .into_values()
            .sorted_unstable_by(|a, b| b.cmp(a))
            .collect_vec();
        let nonzero_targets = multiplicities.iter().sum();
        let distinct_targets = model
            .targets()
            .iter()
            .copied()
            .filter(|&target| target != 0)
            .sorted_unstable()
            .dedup()
            .collect();

        Self {
            model,
            config,
            weights: model.weights(),
            pool,
            index_of,
            multiplicities,
            nonzero_targets,
            distinct_targets,
            best: None,
            started: Instant::now(),
            visited: 0,
        }
    }

    pub(super) fn run(&mut self) -> SolveStatus {
        if !self.all_targets_reachable() {
            debug!("A target is out of reach of the candidate rotations");
            return SolveStatus::Infeasible;
        }

        if let Some(seed) = self.singleton_basis() {
            self.offer(seed);
        }
        if let Some(seed) = self.power_of_two_basis() {
            self.offer(seed);
        }

        let max_size = self
            .config
            .max_basis_size
            .min(SearchConfig::MAX_BASIS_SIZE)
            .min(self.pool.len());
        let empty = SubsetSums::from([(0, (0, 0))]);
        for size in 1..=max_size {
            if !self.can_improve(size) {
                trace!(size, "Skipping basis size");
                continue;
            }
            trace!(size, "Enumerating bases");
            if !self.explore(size, 0, &mut Vec::with_capacity(size), &empty) {
                warn!(size, visited = self.visited, "Basis search ran out of time");
                return self.partial_status();
            }
        }

        // Larger bases were not explored, the result is only optimal if none of them can win
        if (max_size + 1..=self.pool.len()).any(|size| self.can_improve(size)) {
            debug!(max_size, "Basis search truncated by the maximal basis size");
            return self.partial_status();
        }
        match self.best {
            Some(_) => SolveStatus::Optimal,
            None => SolveStatus::Infeasible,
        }
    }

    /// Number of partial bases explored so far.
    #[cfg(test)]
    pub(super) fn visited(&self) -> usize {
        self.visited
    }

    fn partial_status(&self) -> SolveStatus {
        match self.best {
            Some(_) => SolveStatus::Feasible,
            None => SolveStatus::Error,
        }
    }

    fn is_timed_out(&self) -> bool {
        self.config
            .time_limit()
            .is_some_and(|limit| self.started.elapsed() >= limit)
    }

    fn offer(&mut self, incumbent: Incumbent) {
        let is_better = self
            .best
            .as_ref()
            .map_or(true, |best| incumbent.cost < best.cost - COST_EPSILON);
        if is_better {
            info!(
                cost = incumbent.cost,
                size = incumbent.basis.len(),
                "Found a better rotation basis"
            );
            self.best = Some(incumbent);
        }
    }

    // Candidates are contiguous, so subset sums cover everything between the extremes
    fn all_targets_reachable(&self) -> bool {
        let candidates = self.model.candidates();
        let (min, max) = self.pool.iter().fold((0i128, 0i128), |(min, max), &index| {
            let candidate = i128::from(candidates[index]);
            if candidate < 0 {
                (min + candidate, max)
            } else {
                (min, max + candidate)
            }
        });
        self.model
            .targets()
            .iter()
            .all(|&target| (min..=max).contains(&i128::from(target)))
    }

    fn can_improve(&self, size: usize) -> bool {
        // A basis of `size` rotations has at most 2^size - 1 distinct nonzero subset sums
        if size < usize::BITS as usize && self.multiplicities.len() > (1usize << size) - 1 {
            return false;
        }
        // Every nonzero target needs a rotation, and two unless it is itself in the basis
        let singletons: usize = self.multiplicities.iter().take(size).sum();
        let uses = 2 * self.nonzero_targets - singletons;
        let lower_bound =
            self.weights.key_material * size as f64 + self.weights.latency * uses as f64;
        self.best
            .as_ref()
            .map_or(true, |best| lower_bound < best.cost - COST_EPSILON)
    }

    /// Materialize every distinct nonzero target.
    fn singleton_basis(&self) -> Option<Incumbent> {
        let reconstructions = self
            .model
            .targets()
            .iter()
            .map(|&target| match target {
                0 => Some(Vec::new()),
                _ => self.index_of.get(&target).map(|&index| vec![index]),
            })
            .collect::<Option<Vec<_>>>()?;
        let basis = reconstructions.iter().flatten().copied().sorted().dedup();
        Some(Incumbent::new(
            basis.collect(),
            reconstructions,
            self.weights,
        ))
    }

    /// Materialize the signed powers of two of the non-adjacent form of every target.
    fn power_of_two_basis(&self) -> Option<Incumbent> {
        let reconstructions = self
            .model
            .targets()
            .iter()
            .map(|&target| {
                encode_bitwise(target.unsigned_abs())
                    .terms()
                    .into_iter()
                    .map(|term| {
                        let term = if target < 0 { -term } else { term };
                        let term = i64::try_from(term).ok()?;
                        self.index_of.get(&term).copied()
                    })
                    .collect::<Option<Vec<_>>>()
                    .map(|members| members.into_iter().sorted().collect_vec())
            })
            .collect::<Option<Vec<_>>>()?;
        let basis = reconstructions.iter().flatten().copied().sorted().dedup();
        Some(Incumbent::new(
            basis.collect(),
            reconstructions,
            self.weights,
        ))
    }

    /// Explore the bases of `size` rotations extending `basis` with pool members from `start`
    /// on, in candidate order. Returns `false` once the time limit is reached.
    fn explore(
        &mut self,
        size: usize,
        start: usize,
        basis: &mut Vec<usize>,
        sums: &SubsetSums,
    ) -> bool {
        if self.visited % TIME_CHECK_PERIOD == 0 && self.is_timed_out() {
            return false;
        }
        self.visited += 1;
        if basis.len() == size {
            if let Some(incumbent) = self.complete(basis, sums) {
                self.offer(incumbent);
            }
            return true;
        }

        // Rotations to add after the next one
        let remaining = size - basis.len() - 1;
        for position in start..self.pool.len() - remaining {
            let index = self.pool[position];
            let extended = extend_sums(sums, self.model.candidates()[index], basis.len());
            if !self.within_reach(&extended, position + 1, remaining) {
                continue;
            }
            basis.push(index);
            let finished = self.explore(size, position + 1, basis, &extended);
            basis.pop();
            if !finished {
                return false;
            }
            // The incumbent may have improved past the bound of this size
            if !self.can_improve(size) {
                return true;
            }
        }
        true
    }

    /// Whether every target is one of `sums` plus a subset of `remaining` more rotations taken
    /// from the pool members after `start`.
    fn within_reach(&self, sums: &SubsetSums, start: usize, remaining: usize) -> bool {
        let candidates = self.model.candidates();
        // The pool is sorted, so the extreme sums use its first and last members
        let addable = &self.pool[start..];
        let low: i128 = addable
            .iter()
            .take(remaining)
            .map(|&index| i128::from(candidates[index].min(0)))
            .sum();
        let high: i128 = addable
            .iter()
            .rev()
            .take(remaining)
            .map(|&index| i128::from(candidates[index].max(0)))
            .sum();
        self.distinct_targets.iter().all(|&target| {
            let target = i128::from(target);
            let range = saturate(target - high)..=saturate(target - low);
            sums.range(range).next().is_some()
        })
    }

    /// Reconstruct every target with as few rotations of the complete `basis` as possible.
    fn complete(&self, basis: &[usize], sums: &SubsetSums) -> Option<Incumbent> {
        let reconstructions = self
            .model
            .targets()
            .iter()
            .map(|target| {
                let &(_, members) = sums.get(target)?;
                Some(
                    (0..basis.len())
                        .filter(|bit| (members >> bit) & 1 == 1)
                        .map(|bit| basis[bit])
                        .collect_vec(),
                )
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Incumbent::new(
            basis.to_vec(),
            reconstructions,
            self.weights,
        ))
    }
}

/// Add `candidate`, the member number `bit` of a basis, to the subset sums of the members before
/// it.
fn extend_sums(sums: &SubsetSums, candidate: i64, bit: usize) -> SubsetSums {
    let mut extended = sums.clone();
    for (&sum, &(count, members)) in sums {
        let Some(sum) = sum.checked_add(candidate) else {
            continue;
        };
        let subset = (count + 1, members | (1 << bit));
        extended
            .entry(sum)
            .and_modify(|best| {
                if subset.0 < best.0 {
                    *best = subset;
                }
            })
            .or_insert(subset);
    }
    extended
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
