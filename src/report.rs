//! Search progress reporting.
//!
//! Per-generation statistics, the observer hook the search loop notifies,
//! and a tab-separated run log writer.
//!
//! # Run log layout
//!
//! | Section | Lines |
//! |---------|-------|
//! | Header | `generation  fittest  average  median` |
//! | Progress | one line per generation |
//! | Result | fittest fitness, validity, one line per violation |
//! | Placement | `DAY  HH:MM-HH:MM  id  name  section  teacher` per section |
//!
//! Columns are separated by tabs.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::constraints::ConstraintChecker;
use crate::error::Result;
use crate::ga::{Population, SearchOutcome, Timetable};
use crate::models::format_hour;

/// Fitness summary of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number (0 = initial population).
    pub generation: usize,
    /// Fitness of the best member.
    pub fittest: f64,
    /// Mean member fitness.
    pub mean: f64,
    /// Median member fitness.
    pub median: f64,
    /// Fitness evaluations performed so far in the run.
    pub evaluations: usize,
}

impl GenerationStats {
    /// Summarizes an evaluated population.
    pub fn from_population(generation: usize, population: &Population, evaluations: usize) -> Self {
        Self {
            generation,
            fittest: population.fittest().map_or(0.0, Timetable::fitness),
            mean: population.mean_fitness(),
            median: population.median_fitness(),
            evaluations,
        }
    }
}

/// Receives search progress. Purely observational.
pub trait SearchObserver {
    /// Called once per generation after fitness recomputation.
    fn on_generation(&mut self, stats: &GenerationStats) -> Result<()> {
        let _ = stats;
        Ok(())
    }

    /// Called once when the run ends.
    fn on_complete(&mut self, outcome: &SearchOutcome, checker: &ConstraintChecker) -> Result<()> {
        let _ = (outcome, checker);
        Ok(())
    }
}

/// Ignores every notification.
impl SearchObserver for () {}

/// Writes the run log to any [`Write`] sink.
#[derive(Debug)]
pub struct RunLog<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> RunLog<W> {
    /// Creates a log writing to `writer`. The header is written with the first entry.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            writeln!(self.writer, "generation\tfittest\taverage\tmedian")?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Writes one line per section of a timetable.
    pub fn write_placements(&mut self, timetable: &Timetable) -> Result<()> {
        for gene in timetable.genes() {
            let course = gene.course();
            writeln!(
                self.writer,
                "{}\t{}-{}\t{}\t{}\t{}\t{}",
                gene.day(),
                format_hour(gene.begin()),
                format_hour(gene.end()),
                course.id,
                course.name,
                course.section,
                course.teacher
            )?;
        }
        Ok(())
    }
}

impl<W: Write> SearchObserver for RunLog<W> {
    fn on_generation(&mut self, stats: &GenerationStats) -> Result<()> {
        self.write_header()?;
        writeln!(
            self.writer,
            "{}\t{:.6}\t{:.6}\t{:.6}",
            stats.generation, stats.fittest, stats.mean, stats.median
        )?;
        Ok(())
    }

    fn on_complete(&mut self, outcome: &SearchOutcome, checker: &ConstraintChecker) -> Result<()> {
        self.write_header()?;
        let best = &outcome.best;
        let violations = checker.violations(best.genes());

        writeln!(self.writer)?;
        writeln!(self.writer, "fittest\t{:.6}", best.fitness())?;
        writeln!(self.writer, "valid\t{}", violations.is_empty())?;
        for v in &violations {
            writeln!(
                self.writer,
                "violation\t{:?}\t{}\t{}",
                v.violation_type, v.entity_id, v.message
            )?;
        }
        writeln!(self.writer)?;
        self.write_placements(best)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::catalog::Catalog;
    use crate::fitness::FitnessEvaluator;
    use crate::models::{Course, CourseDay, ScheduledSection, StudentDemand};

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            Course::new("CSE101")
                .with_name("Programming")
                .with_section(1)
                .with_teacher("Kim"),
            Course::new("CSE102")
                .with_name("Discrete Math")
                .with_section(1)
                .with_teacher("Kim"),
        ]))
    }

    fn timetable(catalog: &Catalog, b_day: CourseDay) -> Timetable {
        Timetable::from_genes(vec![
            ScheduledSection::placed(Arc::clone(&catalog.courses()[0]), CourseDay::MonWed, 9.5, 11.0),
            ScheduledSection::placed(Arc::clone(&catalog.courses()[1]), b_day, 9.5, 11.0),
        ])
    }

    #[test]
    fn test_stats_from_population() {
        let cat = catalog();
        let evaluator = FitnessEvaluator::new(Arc::clone(&cat), vec![StudentDemand::new(["CSE101"])]);
        let mut members = vec![timetable(&cat, CourseDay::MonWed), timetable(&cat, CourseDay::TueThu)];
        for m in &mut members {
            m.evaluate(&evaluator);
        }
        let pop = Population::from_members(members);
        let stats = GenerationStats::from_population(3, &pop, 40);

        assert_eq!(stats.generation, 3);
        assert_eq!(stats.evaluations, 40);
        assert!((stats.fittest - 1.0).abs() < 1e-10);
        assert!((stats.mean - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_run_log_lines() {
        let mut log = RunLog::new(Vec::new());
        for g in 0..2 {
            log.on_generation(&GenerationStats {
                generation: g,
                fittest: 0.9,
                mean: 0.5,
                median: 0.25,
                evaluations: 10,
            })
            .unwrap();
        }
        let text = String::from_utf8(log.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "generation\tfittest\taverage\tmedian");
        assert_eq!(lines[1], "0\t0.900000\t0.500000\t0.250000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_final_block() {
        let cat = catalog();
        let checker = ConstraintChecker::new(Arc::clone(&cat));
        let evaluator = FitnessEvaluator::new(Arc::clone(&cat), vec![]);
        let mut best = timetable(&cat, CourseDay::MonWed);
        best.evaluate(&evaluator);
        let outcome = SearchOutcome {
            best,
            generations: 0,
            evaluations: 1,
            history: Vec::new(),
        };

        let mut log = RunLog::new(Vec::new());
        log.on_complete(&outcome, &checker).unwrap();
        let text = String::from_utf8(log.into_inner()).unwrap();

        assert!(text.starts_with("generation\tfittest\taverage\tmedian\n"));
        assert!(text.contains("fittest\t0.500000"));
        assert!(text.contains("valid\tfalse"));
        assert!(text.contains("violation\tTeacherConflict\tKim"));
        assert!(text.contains("AC\t09:30-11:00\tCSE101\tProgramming\t1\tKim"));
        assert!(text.contains("AC\t09:30-11:00\tCSE102\tDiscrete Math\t1\tKim"));
    }

    #[test]
    fn test_unit_observer_is_silent() {
        let mut observer = ();
        let stats = GenerationStats {
            generation: 0,
            fittest: 1.0,
            mean: 1.0,
            median: 1.0,
            evaluations: 0,
        };
        assert!(observer.on_generation(&stats).is_ok());
    }
}
