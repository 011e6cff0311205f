//! Function reports built on the scanner: overly long functions, functions
//! without a `Test<Name>` counterpart, and header lookup across a project.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::{AppContext, LongArgs, UntestedArgs, WhereArgs};
use crate::core::{
    error::Outcome,
    scan::{FunctionRecord, base_name, scan},
    unit::{SourceRepository, SourceUnit},
};
use crate::infra::{config::load_config, repo::DirRepository};

/// Naming conventions that decide what counts as a test or an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRules {
    /// Case-sensitive prefix of test functions ("Test")
    pub test_prefix: String,
    /// Names never expected to have a test ("main", "init")
    pub reserved: Vec<String>,
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            test_prefix: "Test".to_string(),
            reserved: vec!["main".to_string(), "init".to_string()],
        }
    }
}

impl NamingRules {
    pub fn is_test_name(&self, name: &str) -> bool {
        name.starts_with(&self.test_prefix)
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.iter().any(|r| r == name)
    }
}

/// A function record together with the unit it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedRecord {
    pub unit: String,
    pub record: FunctionRecord,
}

impl LocatedRecord {
    /// `file:line` of the header.
    pub fn location(&self) -> String {
        format!("{}:{}", self.unit, self.record.signature.line + 1)
    }
}

/// Scan every unit, keeping unit order then line order.
pub fn collect(units: &[SourceUnit]) -> Vec<LocatedRecord> {
    units
        .iter()
        .flat_map(|unit| {
            let name = unit.name();
            scan(unit).map(move |record| LocatedRecord {
                unit: name.clone(),
                record,
            })
        })
        .collect()
}

/// Records whose body is strictly longer than `threshold` lines, test
/// functions excluded, shortest first (ties keep encounter order).
pub fn filter_by_body_size(
    records: impl IntoIterator<Item = LocatedRecord>,
    threshold: usize,
    rules: &NamingRules,
) -> Vec<LocatedRecord> {
    let mut kept: Vec<LocatedRecord> = records
        .into_iter()
        .filter(|r| r.record.body_len() > threshold && !rules.is_test_name(r.record.name()))
        .collect();
    // sort_by_key is stable
    kept.sort_by_key(|r| r.record.body_len());
    kept
}

/// JSON/text row of the long-functions report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongFunction {
    pub name: String,
    pub location: String,
    pub lines: usize,
}

impl From<&LocatedRecord> for LongFunction {
    fn from(r: &LocatedRecord) -> Self {
        Self {
            name: r.record.qualified_name(),
            location: r.location(),
            lines: r.record.body_len(),
        }
    }
}

/// One function with no test counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntestedEntry {
    pub name: String,
    pub location: String,
}

/// Result of the untested cross-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntestedReport {
    pub untested: Vec<UntestedEntry>,
    /// Every function discovered in the non-test units
    pub total: usize,
}

impl UntestedReport {
    /// Untested share of `total`, rounded to the nearest integer.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.untested.len() as f64 * 100.0 / self.total as f64).round() as u32
    }
}

/// Cross-reference `sources` against the test functions found in `tests`.
///
/// A test named `<prefix>Foo` covers any function named `foo`, ignoring
/// case. Test-prefixed and reserved names are never reported but still
/// count toward `total`.
pub fn find_untested(
    sources: &[SourceUnit],
    tests: &[SourceUnit],
    rules: &NamingRules,
) -> UntestedReport {
    let tested: Vec<String> = tests
        .iter()
        .flat_map(scan)
        .filter_map(|r| {
            r.name()
                .strip_prefix(rules.test_prefix.as_str())
                .map(str::to_lowercase)
        })
        .collect();

    let mut report = UntestedReport {
        untested: Vec::new(),
        total: 0,
    };

    for located in collect(sources) {
        report.total += 1;
        let name = located.record.name();
        if rules.is_test_name(name) || rules.is_reserved(name) {
            continue;
        }

        let lowered = name.to_lowercase();
        if !tested.iter().any(|t| *t == lowered) {
            report.untested.push(UntestedEntry {
                name: located.record.qualified_name(),
                location: located.location(),
            });
        }
    }

    report
}

/// First header matching `target` across `units`, as `file:line`.
pub fn locate(units: &[SourceUnit], target: &str) -> Option<String> {
    let name = base_name(target);
    collect(units)
        .into_iter()
        .find(|r| r.record.name() == name)
        .map(|r| r.location())
}

fn widest<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(|v| v.chars().count()).max().unwrap_or(0)
}

/// `location  size  name` rows, location left- and size right-justified.
pub fn render_long(rows: &[LongFunction]) -> Vec<String> {
    let loc_w = widest(rows.iter().map(|r| r.location.as_str()));
    let size_w = rows
        .iter()
        .map(|r| r.lines.to_string().len())
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|r| {
            format!(
                "{:<loc_w$}  {:>size_w$}  {}",
                r.location, r.lines, r.name
            )
        })
        .collect()
}

/// `untested: name @ location` rows, name right- and location
/// left-justified. Trailing padding is trimmed.
pub fn render_untested(entries: &[UntestedEntry]) -> Vec<String> {
    let name_w = widest(entries.iter().map(|e| e.name.as_str()));
    let loc_w = widest(entries.iter().map(|e| e.location.as_str()));

    entries
        .iter()
        .map(|e| {
            format!("untested: {:>name_w$} @ {:<loc_w$}", e.name, e.location)
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Source units of the project at `ctx.root`, split into (sources, tests).
fn project_units(ctx: &AppContext) -> Result<(Vec<SourceUnit>, Vec<SourceUnit>, NamingRules)> {
    let config = load_config(&ctx.root)?;
    let repo = DirRepository::new(&ctx.root, &config)?;
    let suffix = &config.source.test_suffix;
    let (tests, sources): (Vec<_>, Vec<_>) = repo
        .list_units()?
        .into_iter()
        .partition(|u| u.is_test_unit(suffix));
    Ok((sources, tests, config.source.naming_rules()))
}

fn print_summary(ctx: &AppContext, line: &str) {
    if ctx.no_color {
        println!("{line}");
    } else {
        println!("{}", line.bold());
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `ffdev where NAME`
pub fn run_where(args: WhereArgs, ctx: &AppContext) -> Result<Outcome> {
    let (mut units, tests, _) = project_units(ctx)?;
    units.extend(tests);
    units.sort_by(|a, b| a.path.cmp(&b.path));

    let found = locate(&units, &args.name);
    if args.json {
        print_json(&serde_json::json!({ "name": args.name, "location": found }))?;
    } else if let Some(location) = &found {
        println!("{location}");
    } else if !ctx.quiet {
        eprintln!("signature for {} not found", args.name);
    }

    Ok(match found {
        Some(_) => Outcome::Clean,
        None => Outcome::Findings,
    })
}

/// `ffdev long THRESHOLD`
pub fn run_long(args: LongArgs, ctx: &AppContext) -> Result<Outcome> {
    let (mut units, tests, rules) = project_units(ctx)?;
    units.extend(tests);
    units.sort_by(|a, b| a.path.cmp(&b.path));

    let rows: Vec<LongFunction> = filter_by_body_size(collect(&units), args.threshold, &rules)
        .iter()
        .map(LongFunction::from)
        .collect();
    tracing::info!(threshold = args.threshold, found = rows.len(), "long functions");

    if args.json {
        print_json(&rows)?;
    } else if !rows.is_empty() && !ctx.quiet {
        for line in render_long(&rows) {
            println!("{line}");
        }
        print_summary(
            ctx,
            &format!(
                "{} function(s) longer than {} lines",
                rows.len(),
                args.threshold
            ),
        );
    }

    Ok(if rows.is_empty() {
        Outcome::Clean
    } else {
        Outcome::Findings
    })
}

/// `ffdev untested`
pub fn run_untested(args: UntestedArgs, ctx: &AppContext) -> Result<Outcome> {
    let (sources, tests, rules) = project_units(ctx)?;
    let report = find_untested(&sources, &tests, &rules);
    tracing::info!(untested = report.untested.len(), total = report.total, "untested functions");

    if args.json {
        print_json(&report)?;
    } else if !ctx.quiet {
        if report.untested.is_empty() {
            println!("everything's tested");
        } else {
            for line in render_untested(&report.untested) {
                println!("{line}");
            }
            print_summary(
                ctx,
                &format!(
                    "{} function(s) untested out of {} ({}%)",
                    report.untested.len(),
                    report.total,
                    report.percentage()
                ),
            );
        }
    }

    Ok(if report.untested.is_empty() {
        Outcome::Clean
    } else {
        Outcome::Findings
    })
}
