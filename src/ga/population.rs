//! Population of candidate timetables.
//!
//! A population carries its members and the capacity it was sized for.
//! Operators build the next generation into an [`empty_like`] copy of the
//! current one, so capacity travels across generations.
//!
//! # Ordering
//! [`Population::sort_by_fitness`] puts elites ahead of non-elites, each
//! block by descending fitness. Ties keep their previous order.
//!
//! [`empty_like`]: Population::empty_like

use rayon::prelude::*;

use super::Timetable;
use crate::fitness::FitnessEvaluator;

/// A generation of candidate timetables.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Timetable>,
    capacity: usize,
}

impl Population {
    /// Creates an empty population sized for `capacity` members.
    pub fn new(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Creates a population from members; capacity is the member count.
    pub fn from_members(members: Vec<Timetable>) -> Self {
        let capacity = members.len();
        Self { members, capacity }
    }

    /// An empty population with the same capacity.
    pub fn empty_like(&self) -> Self {
        Self::new(self.capacity)
    }

    /// Members in current order.
    #[inline]
    pub fn members(&self) -> &[Timetable] {
        &self.members
    }

    /// Mutable member list.
    #[inline]
    pub fn members_mut(&mut self) -> &mut Vec<Timetable> {
        &mut self.members
    }

    /// Replaces the member list.
    pub fn set_members(&mut self, members: Vec<Timetable>) {
        self.members = members;
    }

    /// Appends a member. The population may exceed its capacity.
    pub fn push(&mut self, member: Timetable) {
        self.members.push(member);
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the population has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Size the population was built for.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Gene sequence length of the members (0 if empty).
    pub fn chromosome_len(&self) -> usize {
        self.members.first().map_or(0, Timetable::len)
    }

    /// Iterates over non-elite members.
    pub fn non_elites(&self) -> impl Iterator<Item = &Timetable> {
        self.members.iter().filter(|m| !m.is_elite())
    }

    /// Number of non-elite members.
    pub fn non_elite_count(&self) -> usize {
        self.non_elites().count()
    }

    /// Number of elite members.
    pub fn elite_count(&self) -> usize {
        self.members.len() - self.non_elite_count()
    }

    /// Sorts elites first, then by descending fitness.
    pub fn sort_by_fitness(&mut self) {
        self.members.sort_by(|a, b| {
            b.is_elite()
                .cmp(&a.is_elite())
                .then_with(|| b.fitness().total_cmp(&a.fitness()))
        });
    }

    /// The `k` fittest members, best first (elite flag ignored).
    pub fn top(&self, k: usize) -> Vec<&Timetable> {
        let mut ranked: Vec<&Timetable> = self.members.iter().collect();
        ranked.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
        ranked.truncate(k);
        ranked
    }

    /// Fittest member.
    pub fn fittest(&self) -> Option<&Timetable> {
        self.members
            .iter()
            .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
    }

    /// Member at percentile `p` (0–100) of ascending fitness.
    ///
    /// Rank index is `round((len - 1) · p / 100)`, so `p = 100` is the
    /// fittest and `p = 50` the median.
    pub fn percentile(&self, p: f64) -> Option<&Timetable> {
        if self.members.is_empty() {
            return None;
        }
        let mut ranked: Vec<&Timetable> = self.members.iter().collect();
        ranked.sort_by(|a, b| a.fitness().total_cmp(&b.fitness()));
        let last = ranked.len() - 1;
        let idx = ((last as f64 * p.clamp(0.0, 100.0) / 100.0).round() as usize).min(last);
        Some(ranked[idx])
    }

    /// Mean fitness (0.0 if empty).
    pub fn mean_fitness(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.members.iter().map(Timetable::fitness).sum();
        sum / self.members.len() as f64
    }

    /// Median fitness (0.0 if empty).
    pub fn median_fitness(&self) -> f64 {
        self.percentile(50.0).map_or(0.0, Timetable::fitness)
    }

    /// Evaluates every member without cached fitness.
    ///
    /// Returns the number of evaluations performed.
    pub fn evaluate_pending(&mut self, evaluator: &FitnessEvaluator, parallel: bool) -> usize {
        if parallel {
            self.members
                .par_iter_mut()
                .filter(|m| !m.is_evaluated())
                .map(|m| {
                    m.evaluate(evaluator);
                    1
                })
                .sum()
        } else {
            let mut count = 0;
            for m in self.members.iter_mut().filter(|m| !m.is_evaluated()) {
                m.evaluate(evaluator);
                count += 1;
            }
            count
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::catalog::Catalog;
    use crate::models::{Course, CourseDay, ScheduledSection, StudentDemand};

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            Course::new("A").with_teacher("Kim"),
            Course::new("B").with_teacher("Lee"),
        ]))
    }

    /// Timetable with A fixed at MonWed 9:30 and B at `b_day`/`b_begin`.
    fn member(catalog: &Catalog, b_day: CourseDay, b_begin: f64) -> Timetable {
        Timetable::from_genes(vec![
            ScheduledSection::placed(Arc::clone(&catalog.courses()[0]), CourseDay::MonWed, 9.5, 11.0),
            ScheduledSection::placed(Arc::clone(&catalog.courses()[1]), b_day, b_begin, b_begin + 1.5),
        ])
    }

    fn evaluated_population() -> Population {
        let cat = catalog();
        let evaluator = FitnessEvaluator::new(Arc::clone(&cat), vec![StudentDemand::new(["A", "B"])]);
        let mut members = vec![
            member(&cat, CourseDay::MonWed, 9.5),  // full overlap: 0.0
            member(&cat, CourseDay::TueThu, 9.5),  // no overlap: 1.0
            member(&cat, CourseDay::MonWed, 11.0), // touching: 1.0
            member(&cat, CourseDay::MonWed, 10.0), // overlap: 0.0
        ];
        for m in &mut members {
            m.evaluate(&evaluator);
        }
        Population::from_members(members)
    }

    #[test]
    fn test_population_shape() {
        let pop = evaluated_population();
        assert_eq!(pop.len(), 4);
        assert_eq!(pop.capacity(), 4);
        assert_eq!(pop.chromosome_len(), 2);

        let empty = pop.empty_like();
        assert!(empty.is_empty());
        assert_eq!(empty.capacity(), 4);
        assert_eq!(empty.chromosome_len(), 0);
    }

    #[test]
    fn test_sort_elites_first() {
        let mut pop = evaluated_population();
        pop.members_mut()[3].set_elite(true);
        pop.sort_by_fitness();

        let fitness: Vec<f64> = pop.members().iter().map(Timetable::fitness).collect();
        assert!(pop.members()[0].is_elite());
        assert!((fitness[0] - 0.0).abs() < 1e-10);
        assert!((fitness[1] - 1.0).abs() < 1e-10);
        assert!((fitness[2] - 1.0).abs() < 1e-10);
        assert!((fitness[3] - 0.0).abs() < 1e-10);
        assert_eq!(pop.elite_count(), 1);
        assert_eq!(pop.non_elite_count(), 3);
    }

    #[test]
    fn test_top_and_percentile() {
        let pop = evaluated_population();
        let top = pop.top(2);
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|m| (m.fitness() - 1.0).abs() < 1e-10));
        assert_eq!(pop.top(10).len(), 4);

        assert!((pop.percentile(0.0).unwrap().fitness() - 0.0).abs() < 1e-10);
        assert!((pop.percentile(100.0).unwrap().fitness() - 1.0).abs() < 1e-10);
        assert!((pop.fittest().unwrap().fitness() - 1.0).abs() < 1e-10);
        assert!(Population::new(3).percentile(50.0).is_none());
    }

    #[test]
    fn test_mean_and_median() {
        let pop = evaluated_population();
        assert!((pop.mean_fitness() - 0.5).abs() < 1e-10);
        // Ascending [0, 0, 1, 1], index round(1.5) = 2.
        assert!((pop.median_fitness() - 1.0).abs() < 1e-10);
        assert!((Population::new(0).mean_fitness() - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_evaluate_pending() {
        let cat = catalog();
        let evaluator = FitnessEvaluator::new(Arc::clone(&cat), vec![]);
        let mut pop = Population::from_members(vec![
            member(&cat, CourseDay::MonWed, 9.5),
            member(&cat, CourseDay::TueThu, 9.5),
        ]);
        pop.members_mut()[0].evaluate(&evaluator);

        assert_eq!(pop.evaluate_pending(&evaluator, false), 1);
        assert_eq!(pop.evaluate_pending(&evaluator, true), 0);
        assert!(pop.members().iter().all(Timetable::is_evaluated));
    }

    #[test]
    fn test_evaluate_pending_parallel() {
        let cat = catalog();
        let evaluator = FitnessEvaluator::new(Arc::clone(&cat), vec![]);
        let mut pop = Population::from_members(
            (0..16).map(|_| member(&cat, CourseDay::TueThu, 14.0)).collect(),
        );
        assert_eq!(pop.evaluate_pending(&evaluator, true), 16);
        assert!(pop.members().iter().all(|m| (m.fitness() - 1.0).abs() < 1e-10));
    }
}
