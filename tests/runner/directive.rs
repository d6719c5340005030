use std::ops::Range;
use std::sync::LazyLock;

use derive_more::From;
use miette::Diagnostic;
use regex::{Regex, RegexSet};

use crate::{TestResult, TestRunData};

#[derive(From)]
pub enum Directive {
    Fail(DirectiveFail),
    Pass(DirectivePass),
}

impl Directive {
    pub fn check(&self, run_data: &TestRunData) -> TestResult {
        match self {
            Self::Fail(d) => d.check(run_data),
            Self::Pass(d) => d.check(run_data),
        }
    }
}

/// The script must stop with an error reported on the selected line.
pub struct DirectiveFail {
    line: usize,
    fail_line: (usize, Range<usize>),
    code: Option<String>,
}

static DIRECTIVE_FAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^FAIL(?:\((?<code>[[:word:]]+::[[:word:]]+)\))?$"#).unwrap()
});

impl DirectiveFail {
    fn parse(directive: &str, line: usize, fail_line: (usize, Range<usize>)) -> Self {
        let captures = DIRECTIVE_FAIL_REGEX.captures(directive).unwrap();
        let code = captures.name("code").map(|m| m.as_str().into());

        Self {
            line,
            fail_line,
            code,
        }
    }

    pub fn check(&self, run_data: &TestRunData) -> TestResult {
        let (fail_line, range) = &self.fail_line;

        let Some(error) = &run_data.error else {
            eprintln!(
                "The directive at line {} expected line {fail_line} to fail, but the script passed",
                self.line,
            );

            return TestResult::Failed;
        };

        let on_line = range.contains(&error.span.start) || range.end == error.span.start;
        let code_matches = self.code.as_ref().is_none_or(|code| {
            error
                .code()
                .is_some_and(|actual| actual.to_string() == *code)
        });

        if on_line && code_matches {
            TestResult::Passed
        } else {
            eprintln!(
                "The error does not match the directive at line {}: expected {} at line {fail_line}",
                self.line,
                self.code.as_deref().unwrap_or("any error"),
            );

            TestResult::Failed
        }
    }
}

pub struct DirectivePass;

static DIRECTIVE_PASS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^PASS$"#).unwrap());

impl DirectivePass {
    pub fn check(&self, run_data: &TestRunData) -> TestResult {
        if run_data.error.is_some() {
            eprintln!("The script failed unexpectedly!");

            TestResult::Failed
        } else {
            TestResult::Passed
        }
    }
}

static DIRECTIVE_REGEX: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([DIRECTIVE_FAIL_REGEX.as_str(), DIRECTIVE_PASS_REGEX.as_str()]).unwrap()
});

fn split_lines(s: &str) -> Vec<(Range<usize>, &str)> {
    let mut start = 0;
    let mut result = vec![];

    for raw in s.split_inclusive('\n') {
        let line = raw.trim_end_matches('\n').trim_end_matches('\r');
        result.push((start..start + line.len(), line));
        start += raw.len();
    }

    result
}

/// Collects `#!` directives.
///
/// A directive applies to the next line by default; `#!<` selects its own
/// line and `#!^` the line above.
pub fn parse_directives(s: &str) -> Result<Vec<Directive>, String> {
    let lines = split_lines(s);
    let mut directives = vec![];

    for (idx, (_, line)) in lines.iter().enumerate() {
        let Some((_, directive)) = line.split_once("#!") else {
            continue;
        };

        let (directive, selected_line_idx) = if let Some(d) = directive.strip_prefix('<') {
            (d, idx)
        } else if let Some(d) = directive.strip_prefix('^') {
            (d, idx.saturating_sub(1))
        } else {
            (directive, idx + 1)
        };

        let directive = directive.trim();
        let matches = DIRECTIVE_REGEX.matches(directive);

        if !matches.matched_any() {
            return Err(format!("unrecognized directive at line {}", idx + 1));
        }

        let selected_line = (
            selected_line_idx + 1,
            lines
                .get(selected_line_idx)
                .map(|(r, _)| r.clone())
                .unwrap_or(s.len()..s.len()),
        );

        let directive = if matches.matched(0) {
            DirectiveFail::parse(directive, idx + 1, selected_line).into()
        } else if matches.matched(1) {
            DirectivePass.into()
        } else {
            unreachable!();
        };

        directives.push(directive);
    }

    if directives.is_empty() {
        directives.push(DirectivePass.into());
    }

    Ok(directives)
}
