//! Course catalog and index maps.
//!
//! The catalog fixes the gene order shared by every candidate timetable:
//! index `i` always refers to the same course. Fixed-time courses come
//! first; otherwise input order is kept.
//!
//! # Index Maps
//!
//! Built once from the ordered course list:
//! - teacher → section indices
//! - year level → section indices
//! - course identifier → section indices (parallel sections of one course)
//!
//! A group whose members all carry the same fixed-time specifier is pruned
//! to its first index: those sections sit at one immovable time and are
//! treated as a single session.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::Course;

/// Index groups keyed by teacher, year, and course identifier.
///
/// `BTreeMap` keeps iteration order stable, so constraint checks and
/// violation listings are reproducible.
#[derive(Debug, Clone, Default)]
pub struct IndexMaps {
    /// Teacher → indices of sections they teach.
    pub by_teacher: BTreeMap<String, Vec<usize>>,
    /// Year level → indices of sections for that year.
    pub by_year: BTreeMap<i32, Vec<usize>>,
    /// Course identifier → indices of its parallel sections.
    pub by_course: BTreeMap<String, Vec<usize>>,
}

impl IndexMaps {
    /// Builds the maps from an ordered course list.
    pub fn build(courses: &[Arc<Course>]) -> Self {
        let mut maps = Self::default();
        for (idx, course) in courses.iter().enumerate() {
            maps.by_teacher
                .entry(course.teacher.clone())
                .or_default()
                .push(idx);
            maps.by_year.entry(course.year).or_default().push(idx);
            maps.by_course
                .entry(course.id.clone())
                .or_default()
                .push(idx);
        }

        for group in maps
            .by_teacher
            .values_mut()
            .chain(maps.by_year.values_mut())
            .chain(maps.by_course.values_mut())
        {
            prune_identical_fixed(group, courses);
        }
        maps
    }
}

fn prune_identical_fixed(group: &mut Vec<usize>, courses: &[Arc<Course>]) {
    if group.len() < 2 {
        return;
    }
    let first = &courses[group[0]].fixed_time;
    if first.is_some() && group.iter().all(|&i| courses[i].fixed_time == *first) {
        group.truncate(1);
    }
}

/// Ordered, read-only course list plus its index maps.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Arc<Course>>,
    maps: IndexMaps,
}

impl Catalog {
    /// Orders the courses (fixed-time first, stable) and builds index maps.
    pub fn new(courses: Vec<Course>) -> Self {
        let mut courses: Vec<Arc<Course>> = courses.into_iter().map(Arc::new).collect();
        courses.sort_by_key(|c| !c.is_fixed());
        let maps = IndexMaps::build(&courses);
        Self { courses, maps }
    }

    /// Courses in gene order.
    #[inline]
    pub fn courses(&self) -> &[Arc<Course>] {
        &self.courses
    }

    /// Course at a gene index.
    #[inline]
    pub fn course(&self, index: usize) -> Option<&Arc<Course>> {
        self.courses.get(index)
    }

    /// Index maps.
    #[inline]
    pub fn maps(&self) -> &IndexMaps {
        &self.maps
    }

    /// Section indices of a course identifier, if the catalog offers it.
    pub fn sections_of(&self, course_id: &str) -> Option<&[usize]> {
        self.maps.by_course.get(course_id).map(Vec::as_slice)
    }

    /// Number of courses (gene sequence length).
    #[inline]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
