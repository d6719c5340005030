mod cli;
mod directive;

use std::path::Path;
use std::process::ExitCode;
use std::{fs, mem};

use ascii_byte_stream::script::{ScriptError, Session, Step};
use ascii_byte_stream::util::format_iter;
use fxhash::FxHashSet;
use glob::glob;
use miette::{NamedSource, Report};
use yansi::Paint;

use self::cli::Args;
use self::directive::{Directive, parse_directives};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TestResult {
    Passed,
    Failed,
}

struct Test {
    path: String,
    contents: String,
    directives: Vec<Directive>,
}

struct TestRunData {
    steps: Vec<Step>,
    error: Option<ScriptError>,
}

impl Test {
    pub fn run(&self, ctx: &TestCtx) -> TestResult {
        let mut session = Session::default();

        let run_data = match session.run(&self.contents) {
            Ok(steps) => TestRunData { steps, error: None },

            Err(e) => TestRunData {
                steps: vec![],
                error: Some(e),
            },
        };

        let mut result = TestResult::Passed;

        for directive in &self.directives {
            if directive.check(&run_data) == TestResult::Failed {
                result = TestResult::Failed;

                if ctx.stop_on_first_failure {
                    break;
                }
            }
        }

        if result == TestResult::Failed || ctx.all_diagnostics {
            for step in &run_data.steps {
                eprintln!("{:>4}: {} => {}", step.line, step.command, step.outcome);
            }

            match &run_data.error {
                Some(e) => {
                    let report = Report::new(e.clone())
                        .with_source_code(NamedSource::new(&self.path, self.contents.clone()));
                    eprintln!("Reported error:\n{report:?}");
                }

                None => eprintln!("No error reported"),
            }
        }

        result
    }
}

struct TestCtx {
    stop_on_first_failure: bool,
    all_diagnostics: bool,
    quiet: bool,
    tests: Vec<Test>,
    passed: FxHashSet<String>,
    failed: FxHashSet<String>,
    ignored: FxHashSet<String>,
}

impl TestCtx {
    pub fn new(args: &Args, tests: Vec<Test>) -> Result<Self, String> {
        let mut result = Self {
            stop_on_first_failure: args.first_failure,
            all_diagnostics: args.all_diagnostics,
            quiet: args.quiet,
            tests,
            passed: Default::default(),
            failed: Default::default(),
            ignored: Default::default(),
        };

        if let Some(selected_tests) = &args.tests {
            let mut selected_tests = selected_tests.iter().collect::<FxHashSet<_>>();

            for test in &result.tests {
                if !selected_tests.remove(&test.path) {
                    result.ignored.insert(test.path.clone());
                }
            }

            if !selected_tests.is_empty() {
                return Err(format!(
                    "unknown tests: {}",
                    format_iter(
                        selected_tests.iter().map(|name| format!("`{name}`")),
                        "and",
                        "",
                    ),
                ));
            }
        }

        Ok(result)
    }

    pub fn run(mut self) -> ExitCode {
        let tests = mem::take(&mut self.tests);

        for test in tests {
            if self.ignored.contains(&test.path) {
                continue;
            }

            if !self.quiet {
                eprintln!("{} script `{}`...", "Running".bright_cyan().bold(), test.path);
            }

            match test.run(&self) {
                TestResult::Passed => {
                    self.passed.insert(test.path);
                }

                TestResult::Failed => {
                    self.failed.insert(test.path.clone());
                    eprintln!(
                        "{}",
                        format_args!("Script `{}` {}!", test.path, "failed").bright_red()
                    );

                    if self.stop_on_first_failure {
                        break;
                    }
                }
            };
        }

        eprintln!();

        eprintln!(
            "Test status: {}",
            if self.failed.is_empty() {
                "passed".bright_green().bold()
            } else {
                "failed".bright_red().bold()
            },
        );

        let run_test_count = (self.passed.len() + self.failed.len()).max(1);
        eprintln!(
            "Details: {passed} passed ({passed_perc:.2}%), {failed} failed ({failed_perc:.2}%), and {ignored} ignored",
            passed = self.passed.len().bright_green(),
            passed_perc = self.passed.len() as f64 * 100. / run_test_count as f64,
            failed = self.failed.len().bright_red(),
            failed_perc = self.failed.len() as f64 * 100. / run_test_count as f64,
            ignored = self.ignored.len().white(),
        );

        if self.failed.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

fn load_test(path: impl AsRef<Path>) -> Result<Test, String> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("could not read `{}`: {e}", path.display()))?;
    let directives = parse_directives(&contents)
        .map_err(|e| format!("could not parse directives in `{}`: {e}", path.display()))?;

    Ok(Test {
        path: path.display().to_string(),
        contents,
        directives,
    })
}

fn load_tests() -> Result<Vec<Test>, String> {
    let mut tests = vec![];
    let pattern = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/scripts/**/*.script");

    for entry in glob(pattern).map_err(|e| e.to_string())? {
        tests.push(load_test(entry.map_err(|e| e.to_string())?)?);
    }

    Ok(tests)
}

fn main() -> ExitCode {
    fn load_ctx() -> Result<TestCtx, String> {
        let args = Args::parse();
        let tests = load_tests()?;

        TestCtx::new(&args, tests)
    }

    let ctx = match load_ctx() {
        Ok(ctx) => ctx,

        Err(e) => {
            eprintln!("{}: {e}", "Error".bright_red().bold());

            return ExitCode::from(2);
        }
    };

    ctx.run()
}
