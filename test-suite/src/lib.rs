//! TUIO Test Suite Library
//!
//! End-to-end checks of the TUIO client against a simulated tracker sending
//! real OSC over UDP. Checks are grouped by the part of the client they
//! exercise, and the summary reports each group separately.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

pub mod tests;

/// Area of client behaviour a check belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// connect, disconnect, add/remove round trips
    Lifecycle,
    /// fseq commit, stale and restarted frames
    Frames,
    /// per-source isolation and "source" announcements
    Sources,
    /// synthesized touch batches
    Touches,
    /// profile addresses and the unrecognized catch-all
    Routing,
    /// throughput and snapshot consistency under load
    Load,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Lifecycle => "lifecycle",
            Category::Frames => "frames",
            Category::Sources => "sources",
            Category::Touches => "touches",
            Category::Routing => "routing",
            Category::Load => "load",
        };
        f.pad(name)
    }
}

/// Outcome of one check
#[derive(Debug, Clone)]
pub struct TestResult {
    pub category: Category,
    pub name: String,
    pub duration: Duration,
    /// `None` on success, otherwise why the check failed
    pub failure: Option<String>,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Results collected over a run
#[derive(Debug, Default)]
pub struct TestSuite {
    results: Vec<TestResult>,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Results grouped by category, in run order within each group
    pub fn by_category(&self) -> BTreeMap<Category, Vec<&TestResult>> {
        let mut groups: BTreeMap<Category, Vec<&TestResult>> = BTreeMap::new();
        for result in &self.results {
            groups.entry(result.category).or_default().push(result);
        }
        groups
    }

    pub fn print_summary(&self) {
        let groups = self.by_category();

        println!(
            "\nTUIO client checks: {} run in {} categories\n",
            self.results.len(),
            groups.len()
        );

        for (category, results) in &groups {
            let passed = results.iter().filter(|r| r.passed()).count();
            let elapsed: Duration = results.iter().map(|r| r.duration).sum();
            println!(
                "  {:<10} {}/{}  {:>9.2}ms",
                category,
                passed,
                results.len(),
                elapsed.as_secs_f64() * 1000.0
            );
            for result in results {
                let mark = if result.passed() { "ok  " } else { "FAIL" };
                println!("    {} {}", mark, result.name);
            }
        }

        let failures: Vec<&TestResult> = self.results.iter().filter(|r| !r.passed()).collect();
        if !failures.is_empty() {
            println!("\nFailures:");
            for result in failures {
                if let Some(reason) = &result.failure {
                    println!("  [{}] {}: {}", result.category, result.name, reason);
                }
            }
        }

        println!(
            "\n{} passed, {} failed\n",
            self.passed(),
            self.failed()
        );
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn result(category: Category, name: &str, failure: Option<&str>) -> TestResult {
        TestResult {
            category,
            name: name.to_string(),
            duration: Duration::from_millis(1),
            failure: failure.map(str::to_string),
        }
    }

    #[test]
    fn test_groups_by_category() {
        let mut suite = TestSuite::new();
        suite.add_result(result(Category::Load, "throughput", None));
        suite.add_result(result(Category::Frames, "stale", Some("frame 4 committed")));
        suite.add_result(result(Category::Frames, "restart", None));

        let groups = suite.by_category();
        let order: Vec<Category> = groups.keys().copied().collect();
        assert_eq!(order, vec![Category::Frames, Category::Load]);
        assert_eq!(groups[&Category::Frames][0].name, "stale");
        assert_eq!(suite.passed(), 2);
        assert_eq!(suite.failed(), 1);
        assert!(!suite.all_passed());
    }

    #[test]
    fn test_category_display_pads() {
        assert_eq!(format!("{:<8}|", Category::Load), "load    |");
    }
}
