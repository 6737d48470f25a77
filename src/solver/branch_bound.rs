//! Exact 0/1 branch-and-bound solver.
//!
//! # Algorithm
//!
//! 1. Presolve: fix every variable that only one value keeps feasible
//!    (e.g. players excluded by an `= 0` rule, or priced above the cap)
//! 2. Classify rows for bounding: unit-coefficient `<=`/`=` rows become
//!    *count rows* (a variable-disjoint set of them), unit `>=` rows inside a
//!    count row become its *nested minimum*, and the remaining non-negative
//!    `<=`/`=` rows become *budget rows*
//! 3. Depth-first search, trying `1` before `0`. Variables are ordered by
//!    their root Lagrangian value `c_j - λ·a_j` against the first budget row
//!    (plain objective coefficient when there is none), ties by index
//! 4. After each assignment, prune if some row can no longer reach its bound
//!    given the unassigned variables (activity interval test), or if the
//!    cheapest completion of the count rows already breaks a budget row
//! 5. Prune if the node's upper bound cannot beat the incumbent. The bound
//!    is the tightest of:
//!    - all remaining positive coefficients
//!    - the fractional knapsack relaxation of each packing row
//!      (`<=`/`=` rows with non-negative coefficients)
//!    - the Lagrangian relaxation of each budget row: `λ·room` plus the best
//!      `c_j - λ·a_j` picks that respect every count row and nested minimum,
//!      minimized over `λ >= 0` by bisection on the budget slack
//!
//! The first optimum met in search order is kept; later lineups of equal
//! value never replace it, so results are deterministic for a given model.
//!
//! # Reference
//!
//! Land, A. H. & Doig, A. G. (1960). "An Automatic Method of Solving Discrete
//! Programming Problems", *Econometrica* 28(3), 497-520.
//! Fisher, M. L. (1981). "The Lagrangian Relaxation Method for Solving
//! Integer Programming Problems", *Management Science* 27(1), 1-18.

use super::types::{IlpSolution, IlpSolver, SolutionAssignment, SolveStatus, SolverConfig};
use crate::model::{Comparison, LineupModel, Sense, VarId};
use std::time::Instant;
use tracing::{debug, warn};

/// Nodes between two time-limit / cancellation checks.
const CHECK_INTERVAL: u64 = 1024;

/// Bisection steps per Lagrangian bound.
const MULTIPLIER_STEPS: usize = 20;

/// Doublings allowed while bracketing the multiplier.
const MAX_WIDENINGS: usize = 60;

/// Marks a variable outside every count row.
const NO_ROW: usize = usize::MAX;

/// Depth-first branch and bound for binary linear programs.
///
/// # Examples
///
/// ```
/// use lineup_ilp::catalog::{PlayerCatalog, PlayerId, PlayerRecord, Position};
/// use lineup_ilp::model::{standard_rules, DecisionVariableSet, LineupConfig, LineupModel};
/// use lineup_ilp::solver::{BranchAndBoundSolver, IlpSolver, SolveStatus, SolverConfig};
///
/// let catalog = PlayerCatalog::from_records(vec![
///     PlayerRecord::new(PlayerId(0), Position::Qb, "A", 10_000.0, 20.0),
///     PlayerRecord::new(PlayerId(1), Position::Wr, "B", 20_000.0, 25.0),
///     PlayerRecord::new(PlayerId(2), Position::Te, "C", 5_000.0, 10.0),
/// ])
/// .unwrap();
/// let config = LineupConfig::default()
///     .with_salary_cap(30_000.0)
///     .with_offense_count(2)
///     .with_defense_count(0)
///     .with_min_running_backs(0);
/// let variables = DecisionVariableSet::from_catalog(&catalog, true).unwrap();
/// let model =
///     LineupModel::build("example", &catalog, variables, &standard_rules(&config)).unwrap();
///
/// let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
/// assert_eq!(solution.status, SolveStatus::Optimal);
/// assert_eq!(solution.objective_value(), Some(45.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBoundSolver;

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self
    }
}

impl IlpSolver for BranchAndBoundSolver {
    fn solve(&self, model: &LineupModel, config: &SolverConfig) -> IlpSolution {
        if let Err(reason) = model.validate().and_then(|_| config.validate()) {
            warn!(model = %model.name, %reason, "rejecting invalid model");
            return IlpSolution::empty(SolveStatus::ModelInvalid);
        }

        let started = Instant::now();
        let mut search = Search::new(model, config, started);
        let status = search.run();

        let assignment = search.best.as_ref().map(|best| {
            let values = (0..model.variable_count())
                .map(|j| (VarId(j), best[j]))
                .collect();
            SolutionAssignment {
                values,
                objective_value: model.objective_value(|v| best[v.0]),
            }
        });

        let solution = IlpSolution {
            status,
            assignment,
            nodes_explored: search.nodes,
            solve_time_ms: started.elapsed().as_millis() as u64,
        };
        debug!(
            model = %model.name,
            status = ?solution.status,
            nodes = solution.nodes_explored,
            elapsed_ms = solution.solve_time_ms,
            objective = ?solution.objective_value(),
            "branch and bound finished"
        );
        solution
    }
}

/// Bookkeeping for one constraint row.
#[derive(Debug, Clone)]
struct Row {
    comparison: Comparison,
    bound: f64,
    /// Sum of coefficients of variables assigned 1.
    activity: f64,
    /// Sum of negative coefficients of unassigned variables.
    rest_min: f64,
    /// Sum of positive coefficients of unassigned variables.
    rest_max: f64,
}

impl Row {
    fn is_viable(&self, tol: f64) -> bool {
        let lo = self.activity + self.rest_min;
        let hi = self.activity + self.rest_max;
        match self.comparison {
            Comparison::Le => lo <= self.bound + tol,
            Comparison::Ge => hi >= self.bound - tol,
            Comparison::Eq => lo <= self.bound + tol && hi >= self.bound - tol,
        }
    }

    fn room(&self) -> f64 {
        self.bound - self.activity
    }
}

/// A `<=`/`=` row with non-negative coefficients over the free variables.
#[derive(Debug, Clone)]
struct PackingRow {
    row: usize,
    /// Free variables with positive objective, best ratio first.
    items: Vec<(usize, f64)>,
}

/// A `<=`/`=` row whose free variables all have coefficient 1.
#[derive(Debug, Clone)]
struct CountRow {
    row: usize,
    exact: bool,
    /// Unit `>=` row over a subset of this row's free variables.
    nested: Option<usize>,
}

/// A non-negative `<=`/`=` row relaxed into the objective.
#[derive(Debug, Clone)]
struct BudgetRow {
    row: usize,
    /// Coefficient of every variable, zero outside the row.
    cost: Vec<f64>,
    /// Multiplier of the last bound computed; the next one starts there.
    lambda: f64,
    /// First upper bracket for the multiplier search.
    scale: f64,
}

/// Head counts a count row still needs at the current node.
#[derive(Debug, Clone, Copy, Default)]
struct Need {
    /// Picks left (exact for `=` rows, at most for `<=` rows).
    picks: usize,
    /// Picks that must come from the nested minimum.
    nested: usize,
}

/// One candidate kept by the per-row selection: (value, cost, variable).
type Pick = (f64, f64, usize);

/// Saved row state for undo.
#[derive(Debug, Clone, Copy)]
struct TrailEntry {
    row: usize,
    activity: f64,
    rest_min: f64,
    rest_max: f64,
}

struct Search<'a> {
    config: &'a SolverConfig,
    started: Instant,
    tol: f64,

    /// Objective coefficients in maximization form.
    obj: Vec<f64>,
    /// Per variable: (row index, coefficient).
    columns: Vec<Vec<(usize, f64)>>,
    rows: Vec<Row>,
    trail: Vec<TrailEntry>,

    values: Vec<bool>,
    fixed: Vec<bool>,
    /// Unfixed variables in branching order.
    free: Vec<usize>,
    /// Index of each free variable within `free`.
    position: Vec<usize>,
    /// `suffix[d]` = sum of positive objective over `free[d..]`.
    suffix: Vec<f64>,
    packing: Vec<PackingRow>,
    /// Indices into `packing` forming a variable-disjoint cover.
    cover: Vec<usize>,

    count_rows: Vec<CountRow>,
    /// Count row of each variable, or [`NO_ROW`].
    count_of: Vec<usize>,
    /// Whether the variable belongs to its count row's nested minimum.
    in_nested: Vec<bool>,
    budgets: Vec<BudgetRow>,
    // per count row scratch for the relaxation
    needs: Vec<Need>,
    members: Vec<(usize, usize)>,
    top_nested: Vec<Vec<Pick>>,
    top_all: Vec<Vec<Pick>>,

    best: Option<Vec<bool>>,
    best_value: f64,
    nodes: u64,
    stop: Option<SolveStatus>,
}

impl<'a> Search<'a> {
    fn new(model: &'a LineupModel, config: &'a SolverConfig, started: Instant) -> Self {
        let n = model.variable_count();
        let sign = match model.objective.sense {
            Sense::Maximize => 1.0,
            Sense::Minimize => -1.0,
        };

        let mut obj = vec![0.0; n];
        for &(var, coefficient) in &model.objective.expr.terms {
            obj[var.0] += sign * coefficient;
        }

        let mut columns = vec![Vec::new(); n];
        let rows = model
            .constraints
            .iter()
            .enumerate()
            .map(|(r, c)| {
                let mut rest_min = 0.0;
                let mut rest_max = 0.0;
                for &(var, a) in &c.expr.terms {
                    columns[var.0].push((r, a));
                    if a > 0.0 {
                        rest_max += a;
                    } else {
                        rest_min += a;
                    }
                }
                Row {
                    comparison: c.comparison,
                    bound: c.bound,
                    activity: 0.0,
                    rest_min,
                    rest_max,
                }
            })
            .collect();

        Self {
            config,
            started,
            tol: config.tolerance,
            obj,
            columns,
            rows,
            trail: Vec::new(),
            values: vec![false; n],
            fixed: vec![false; n],
            free: Vec::new(),
            position: vec![usize::MAX; n],
            suffix: Vec::new(),
            packing: Vec::new(),
            cover: Vec::new(),
            count_rows: Vec::new(),
            count_of: vec![NO_ROW; n],
            in_nested: vec![false; n],
            budgets: Vec::new(),
            needs: Vec::new(),
            members: Vec::new(),
            top_nested: Vec::new(),
            top_all: Vec::new(),
            best: None,
            best_value: f64::NEG_INFINITY,
            nodes: 0,
            stop: None,
        }
    }

    fn run(&mut self) -> SolveStatus {
        if self.config.is_cancelled() {
            return SolveStatus::Cancelled;
        }
        if !self.rows.iter().all(|r| r.is_viable(self.tol)) || !self.presolve() {
            return SolveStatus::Infeasible;
        }
        if !self.prepare() {
            return SolveStatus::Infeasible;
        }

        let base: f64 = (0..self.values.len())
            .filter(|&j| self.fixed[j] && self.values[j])
            .map(|j| self.obj[j])
            .sum();
        debug!(
            free = self.free.len(),
            fixed = self.values.len() - self.free.len(),
            count_rows = self.count_rows.len(),
            budget_rows = self.budgets.len(),
            multipliers = ?self.budgets.iter().map(|b| b.lambda).collect::<Vec<_>>(),
            "presolve done"
        );

        self.descend(0, base);

        match self.stop {
            Some(status) => status,
            None if self.best.is_some() => SolveStatus::Optimal,
            None => SolveStatus::Infeasible,
        }
    }

    /// Sets `var` and updates its rows. Returns `false` as soon as one row
    /// becomes unreachable; the caller must still [`undo`](Self::undo).
    fn assign(&mut self, var: usize, value: bool) -> bool {
        self.values[var] = value;
        for &(r, a) in &self.columns[var] {
            let row = &mut self.rows[r];
            self.trail.push(TrailEntry {
                row: r,
                activity: row.activity,
                rest_min: row.rest_min,
                rest_max: row.rest_max,
            });
            if value {
                row.activity += a;
            }
            if a > 0.0 {
                row.rest_max -= a;
            } else {
                row.rest_min -= a;
            }
            if !row.is_viable(self.tol) {
                return false;
            }
        }
        true
    }

    fn undo(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some(entry) = self.trail.pop() {
                let row = &mut self.rows[entry.row];
                row.activity = entry.activity;
                row.rest_min = entry.rest_min;
                row.rest_max = entry.rest_max;
            }
        }
    }

    /// Tries `var = value` and rolls it back.
    fn admits(&mut self, var: usize, value: bool) -> bool {
        let mark = self.trail.len();
        let ok = self.assign(var, value);
        self.undo(mark);
        ok
    }

    /// Fixes variables that only one value keeps feasible, to a fixpoint.
    /// Returns `false` if some variable admits neither value.
    fn presolve(&mut self) -> bool {
        let n = self.values.len();
        loop {
            let mut changed = false;
            for j in 0..n {
                if self.fixed[j] {
                    continue;
                }
                let value = match (self.admits(j, true), self.admits(j, false)) {
                    (false, false) => return false,
                    (true, false) => true,
                    (false, true) => false,
                    (true, true) => continue,
                };
                self.assign(j, value);
                self.fixed[j] = true;
                changed = true;
            }
            if !changed {
                break;
            }
        }
        self.trail.clear();
        true
    }

    /// Classifies rows, orders the free variables and precomputes bounding
    /// data. Returns `false` if the root relaxation is already infeasible.
    fn prepare(&mut self) -> bool {
        let n = self.obj.len();
        self.free = (0..n).filter(|&j| !self.fixed[j]).collect();

        let mut terms = vec![Vec::new(); self.rows.len()];
        for &j in &self.free {
            for &(r, a) in &self.columns[j] {
                terms[r].push((j, a));
            }
        }
        let unit = |r: usize| !terms[r].is_empty() && terms[r].iter().all(|&(_, a)| a == 1.0);

        // Count rows: widest first, variable-disjoint.
        let mut candidates: Vec<usize> = (0..self.rows.len())
            .filter(|&r| self.rows[r].comparison != Comparison::Ge && unit(r))
            .collect();
        candidates.sort_by_key(|&r| (std::cmp::Reverse(terms[r].len()), r));
        for r in candidates {
            if terms[r].iter().any(|&(j, _)| self.count_of[j] != NO_ROW) {
                continue;
            }
            let c = self.count_rows.len();
            for &(j, _) in &terms[r] {
                self.count_of[j] = c;
            }
            self.count_rows.push(CountRow {
                row: r,
                exact: self.rows[r].comparison == Comparison::Eq,
                nested: None,
            });
        }

        for r in 0..self.rows.len() {
            if self.rows[r].comparison != Comparison::Ge || !unit(r) {
                continue;
            }
            let c = self.count_of[terms[r][0].0];
            if c == NO_ROW
                || self.count_rows[c].nested.is_some()
                || terms[r].iter().any(|&(j, _)| self.count_of[j] != c)
            {
                continue;
            }
            self.count_rows[c].nested = Some(r);
            for &(j, _) in &terms[r] {
                self.in_nested[j] = true;
            }
        }

        for r in 0..self.rows.len() {
            let row = &self.rows[r];
            if row.comparison == Comparison::Ge
                || terms[r].is_empty()
                || self.count_rows.iter().any(|c| c.row == r)
                || terms[r].iter().any(|&(_, a)| a < 0.0)
                || terms[r].iter().all(|&(_, a)| a == 0.0)
            {
                continue;
            }
            let mut cost = vec![0.0; n];
            let mut scale: f64 = 0.0;
            for &(j, a) in &terms[r] {
                cost[j] = a;
                if a > 0.0 {
                    scale = scale.max(self.obj[j] / a);
                }
            }
            self.budgets.push(BudgetRow {
                row: r,
                cost,
                lambda: 0.0,
                scale: if scale > 0.0 { scale } else { 1.0 },
            });
        }

        let k = self.count_rows.len();
        self.needs = vec![Need::default(); k];
        self.members = vec![(0, 0); k];
        self.top_nested = vec![Vec::new(); k];
        self.top_all = vec![Vec::new(); k];

        // Root multipliers; the first budget row also sets the branching order.
        if !self.completion_feasible(0) {
            return false;
        }
        for b in 0..self.budgets.len() {
            match self.lagrangian_bound(0, b, f64::NEG_INFINITY) {
                Some((_, lambda)) => self.budgets[b].lambda = lambda,
                None => return false,
            }
        }
        let key: Vec<f64> = match self.budgets.first() {
            Some(budget) => (0..n)
                .map(|j| self.obj[j] - budget.lambda * budget.cost[j])
                .collect(),
            None => self.obj.clone(),
        };
        self.free
            .sort_by(|&a, &b| key[b].total_cmp(&key[a]).then(a.cmp(&b)));

        for (i, &j) in self.free.iter().enumerate() {
            self.position[j] = i;
        }

        let obj = &self.obj;
        let mut suffix = vec![0.0; self.free.len() + 1];
        for i in (0..self.free.len()).rev() {
            suffix[i] = suffix[i + 1] + obj[self.free[i]].max(0.0);
        }

        let mut packing = Vec::new();
        for (r, row) in self.rows.iter().enumerate() {
            if row.comparison == Comparison::Ge || terms[r].iter().any(|&(_, a)| a < 0.0) {
                continue;
            }
            let mut items: Vec<(usize, f64)> = terms[r]
                .iter()
                .copied()
                .filter(|&(j, _)| obj[j] > 0.0)
                .collect();
            if items.is_empty() {
                continue;
            }
            let ratio = |&(j, a): &(usize, f64)| {
                if a > 0.0 {
                    obj[j] / a
                } else {
                    f64::INFINITY
                }
            };
            items.sort_by(|x, y| ratio(y).total_cmp(&ratio(x)).then(x.0.cmp(&y.0)));
            packing.push(PackingRow { row: r, items });
        }

        // Greedy disjoint cover, narrowest rows first.
        let mut by_size: Vec<usize> = (0..packing.len()).collect();
        by_size.sort_by_key(|&k| (packing[k].items.len(), k));
        let mut covered = vec![false; n];
        let mut cover = Vec::new();
        for k in by_size {
            if packing[k].items.iter().any(|&(j, _)| covered[j]) {
                continue;
            }
            for &(j, _) in &packing[k].items {
                covered[j] = true;
            }
            cover.push(k);
        }

        self.suffix = suffix;
        self.packing = packing;
        self.cover = cover;
        true
    }

    /// Upper bound on the objective still collectable from `free[depth..]`.
    fn remaining_bound(&self, depth: usize) -> f64 {
        let open = self.suffix[depth];
        let mut bound = open;
        let mut cover_value = 0.0;
        let mut cover_covered = 0.0;

        for (k, pk) in self.packing.iter().enumerate() {
            let row = &self.rows[pk.row];
            let mut capacity = row.room().max(0.0);
            let mut value = 0.0;
            let mut covered = 0.0;
            for &(j, a) in &pk.items {
                if self.position[j] < depth {
                    continue;
                }
                let gain = self.obj[j];
                covered += gain;
                if a <= capacity {
                    value += gain;
                    capacity -= a;
                } else if capacity > 0.0 {
                    value += gain * capacity / a;
                    capacity = 0.0;
                }
            }
            bound = bound.min(value + (open - covered));
            if self.cover.contains(&k) {
                cover_value += value;
                cover_covered += covered;
            }
        }

        if !self.cover.is_empty() {
            bound = bound.min(cover_value + (open - cover_covered));
        }
        bound
    }

    /// Relaxation over `free[depth..]` keeping only the count rows.
    ///
    /// Each variable is worth `weight * c_j - lambda * a_j`, where `a` is the
    /// cost in `budget`. Every count row takes its best picks, nested minimum
    /// first; variables outside the count rows are taken when worth more
    /// than zero. Returns `(lambda * room + total worth, budget slack of the
    /// picks)`, or `None` when the count rows admit no completion.
    fn relaxation(
        &mut self,
        depth: usize,
        budget: Option<usize>,
        weight: f64,
        lambda: f64,
    ) -> Option<(f64, f64)> {
        let room = budget.map_or(0.0, |b| self.rows[self.budgets[b].row].room());
        let mut value = lambda * room;
        let mut slack = room;
        let available = (self.free.len() - depth) as f64;

        for c in 0..self.count_rows.len() {
            let count = &self.count_rows[c];
            let left = self.rows[count.row].room();
            let picks = if count.exact {
                let exact = left.round();
                if (left - exact).abs() > self.tol {
                    return None;
                }
                exact
            } else {
                (left + self.tol).floor()
            };
            if picks < 0.0 {
                return None;
            }
            let nested = count
                .nested
                .map_or(0.0, |g| (self.rows[g].room() - self.tol).ceil().max(0.0));
            if nested > picks || nested > available || (count.exact && picks > available) {
                return None;
            }
            self.needs[c] = Need {
                picks: picks.min(available) as usize,
                nested: nested.min(available) as usize,
            };
            self.members[c] = (0, 0);
            self.top_nested[c].clear();
            self.top_all[c].clear();
        }

        for i in depth..self.free.len() {
            let j = self.free[i];
            let cost = budget.map_or(0.0, |b| self.budgets[b].cost[j]);
            let worth = weight * self.obj[j] - lambda * cost;
            let c = self.count_of[j];
            if c == NO_ROW {
                if worth > 0.0 {
                    value += worth;
                    slack -= cost;
                }
                continue;
            }
            let need = self.needs[c];
            self.members[c].0 += 1;
            if self.in_nested[j] {
                self.members[c].1 += 1;
                push_top(&mut self.top_nested[c], need.nested, (worth, cost, j));
            }
            push_top(&mut self.top_all[c], need.picks, (worth, cost, j));
        }

        for c in 0..self.count_rows.len() {
            let need = self.needs[c];
            let (total, nested) = self.members[c];
            let exact = self.count_rows[c].exact;
            if nested < need.nested || (exact && total < need.picks) {
                return None;
            }
            for &(worth, cost, _) in &self.top_nested[c] {
                value += worth;
                slack -= cost;
            }
            let mut left = need.picks - need.nested;
            for &(worth, cost, j) in &self.top_all[c] {
                if left == 0 || (!exact && worth <= 0.0) {
                    break;
                }
                if self.in_nested[j] && self.top_nested[c].iter().any(|p| p.2 == j) {
                    continue;
                }
                value += worth;
                slack -= cost;
                left -= 1;
            }
        }
        Some((value, slack))
    }

    /// Whether the cheapest completion of the count rows fits every budget row.
    fn completion_feasible(&mut self, depth: usize) -> bool {
        if self.count_rows.is_empty() {
            return true;
        }
        if self.budgets.is_empty() {
            return self.relaxation(depth, None, 0.0, 0.0).is_some();
        }
        (0..self.budgets.len()).all(|b| {
            self.relaxation(depth, Some(b), 0.0, 1.0)
                .is_some_and(|(spare, _)| spare >= -self.tol)
        })
    }

    /// Lagrangian bound of `budgets[b]` over `free[depth..]` and the
    /// multiplier that reached it.
    ///
    /// Every `λ >= 0` gives a valid bound, so the search stops as soon as one
    /// falls to `threshold`. `None` means the count rows admit no completion.
    fn lagrangian_bound(&mut self, depth: usize, b: usize, threshold: f64) -> Option<(f64, f64)> {
        let start = self.budgets[b].lambda;
        let (value, slope) = self.relaxation(depth, Some(b), 1.0, start)?;
        let mut best = (value, start);

        // A positive slope at zero means the budget is slack: zero is optimal.
        let at_floor = slope > 0.0 && start <= 0.0;
        if value > threshold && slope.abs() > self.tol && !at_floor {
            let (mut lo, mut hi) = (0.0, start);
            let mut bracketed = slope > 0.0;
            if !bracketed {
                lo = start;
                hi = (2.0 * start).max(self.budgets[b].scale);
                for _ in 0..MAX_WIDENINGS {
                    let (value, slope) = self.relaxation(depth, Some(b), 1.0, hi)?;
                    if value < best.0 {
                        best = (value, hi);
                    }
                    if value <= threshold {
                        break;
                    }
                    if slope >= 0.0 {
                        bracketed = true;
                        break;
                    }
                    lo = hi;
                    hi *= 2.0;
                }
            }
            if bracketed && best.0 > threshold {
                for _ in 0..MULTIPLIER_STEPS {
                    let mid = 0.5 * (lo + hi);
                    let (value, slope) = self.relaxation(depth, Some(b), 1.0, mid)?;
                    if value < best.0 {
                        best = (value, mid);
                    }
                    if value <= threshold || slope.abs() <= self.tol {
                        break;
                    }
                    if slope > 0.0 {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }
            }
        }

        self.budgets[b].lambda = best.1;
        Some(best)
    }

    /// Whether no completion of `free[depth..]` can beat the incumbent.
    fn dominated(&mut self, depth: usize, current: f64) -> bool {
        let threshold = self.best_value + self.tol - current;
        if self.remaining_bound(depth) <= threshold {
            return true;
        }
        if self.budgets.is_empty() {
            return self
                .relaxation(depth, None, 1.0, 0.0)
                .is_none_or(|(value, _)| value <= threshold);
        }
        (0..self.budgets.len()).any(|b| {
            self.lagrangian_bound(depth, b, threshold)
                .is_none_or(|(value, _)| value <= threshold)
        })
    }

    fn check_limits(&mut self) {
        if self.config.is_cancelled() {
            self.stop = Some(SolveStatus::Cancelled);
        } else if self
            .config
            .time_limit
            .is_some_and(|limit| self.started.elapsed() >= limit)
        {
            self.stop = Some(SolveStatus::Timeout);
        }
    }

    fn descend(&mut self, depth: usize, current: f64) {
        self.nodes += 1;
        if self.nodes % CHECK_INTERVAL == 1 {
            self.check_limits();
        }
        if self.stop.is_some() {
            return;
        }

        if depth < self.free.len() {
            if !self.completion_feasible(depth) {
                return;
            }
            if self.best.is_some() && self.dominated(depth, current) {
                return;
            }
        }

        // Variables that can no longer be 1 go to 0 without re-bounding.
        let mark = self.trail.len();
        let mut depth = depth;
        while depth < self.free.len() && !self.admits(self.free[depth], true) {
            if !self.assign(self.free[depth], false) {
                self.undo(mark);
                return;
            }
            depth += 1;
        }

        if depth == self.free.len() {
            if self.best.is_none() || current > self.best_value + self.tol {
                self.best = Some(self.values.clone());
                self.best_value = current;
                if self.config.stop_after_first {
                    self.stop = Some(SolveStatus::Feasible);
                }
            }
            self.undo(mark);
            return;
        }

        let var = self.free[depth];
        for value in [true, false] {
            let branch = self.trail.len();
            if self.assign(var, value) {
                let next = if value { current + self.obj[var] } else { current };
                self.descend(depth + 1, next);
            }
            self.undo(branch);
            if self.stop.is_some() {
                break;
            }
        }
        self.undo(mark);
    }
}

/// Keeps the `cap` largest picks in `top`, best first; earlier picks win ties.
fn push_top(top: &mut Vec<Pick>, cap: usize, pick: Pick) {
    if cap == 0 || (top.len() == cap && pick.0 <= top[cap - 1].0) {
        return;
    }
    let at = top.partition_point(|p| p.0 >= pick.0);
    top.insert(at, pick);
    top.truncate(cap);
}
