use colored::Colorize;

use crate::{
    Booster,
    Result,
    WeakLearner,
};
use super::{IterationReport, Research};

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::time::Instant;

pub(super) const DEFAULT_ROUND: usize = 100;
pub(super) const DEFAULT_TIMELIMIT_MILLIS: u128 = u128::MAX;
const WIDTH: usize = 8;
const PREC_WIDTH: usize = 5;
const FULL_WIDTH: usize = 60;
const STAT_WIDTH: usize = (FULL_WIDTH - 4) / 2;
const HEADER: &str
    = "Iteration,Edge,Loss,LogLoss,TrainError,ValidationError,Time\n";


/// Struct `Logger` runs a boosting algorithm
/// and logs the weak edge, the reweighting loss,
/// the training/validation errors, and the running time
/// of each iteration.
///
/// The log is printed to the standard output every `round` iterations
/// and written to a CSV file.
///
/// # Example
/// ```no_run
/// use exprboost::prelude::*;
///
/// let train = DataTable::from_csv("/path/to/train.csv", true)
///     .unwrap()
///     .set_target("class")
///     .unwrap();
/// let mut arena = ExpressionArena::new();
/// let inputs = arena.variables(&train);
///
/// let booster = AdaBoost::init(&train, arena)
///     .max_iterations(100);
/// let weak_learner = StumpLearner::new(inputs);
///
/// let mut logger = Logger::new(booster, weak_learner)
///     .time_limit_as_secs(60)
///     .print_every(10);
/// let model = logger.run("adaboost.csv").unwrap();
/// ```
pub struct Logger<B, W> {
    pub(super) booster: B,
    pub(super) weak_learner: W,
    pub(super) time_limit: u128,
    pub(super) round: usize,
}


impl<B, W> Logger<B, W> {
    /// Create a new instance of `Logger`.
    pub fn new(booster: B, weak_learner: W) -> Self {
        Self {
            booster,
            weak_learner,
            time_limit: DEFAULT_TIMELIMIT_MILLIS,
            round: DEFAULT_ROUND,
        }
    }


    /// Set the time limit for boosting algorithm as milliseconds.
    /// If the boosting algorithm reaches this limit,
    /// breaks immediately.
    #[inline(always)]
    pub fn time_limit_as_millis(mut self, time_limit: u128) -> Self {
        self.time_limit = time_limit;
        self
    }


    /// Set the time limit for boosting algorithm as seconds.
    #[inline(always)]
    pub fn time_limit_as_secs(mut self, time_limit: u64) -> Self {
        self.time_limit = (time_limit as u128).saturating_mul(1_000);
        self
    }


    /// Set the time limit for boosting algorithm as minutes.
    #[inline(always)]
    pub fn time_limit_as_mins(mut self, time_limit: u64) -> Self {
        self.time_limit = (time_limit as u128).saturating_mul(60_000);
        self
    }


    /// Set the interval to print the current status.
    /// By default, the method `run` prints its status every `100` rounds.
    /// If you don't want to print the log,
    /// set `usize::MAX`.
    #[inline(always)]
    pub fn print_every(mut self, round: usize) -> Self {
        self.round = round;
        self
    }
}


impl<B, W> Logger<B, W>
    where B: Booster + Research,
          W: WeakLearner,
{
    #[inline(always)]
    fn print_log_header(&self) {
        println!(
            "      {:>WIDTH$}\t\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}",
            "".bold().red(),
            "WEAK".bold().blue(),
            "REWEIGHT".bold().magenta(),
            "TRAIN".bold().green(),
            "VALID.".bold().yellow(),
            "ACC.".bold().cyan(),
        );
        println!(
            "      {:>WIDTH$}\t\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}\n",
            "ROUND".bold().red(),
            "EDGE".bold().blue(),
            "LOSS".bold().magenta(),
            "ERROR".bold().green(),
            "ERROR".bold().yellow(),
            "TIME".bold().cyan(),
        );
    }


    /// print current settings.
    #[inline(always)]
    fn print_stats(&self) {
        let limit = if self.time_limit != u128::MAX {
            time_format(self.time_limit)
        } else {
            "Nothing".into()
        };
        let header = format!(
            "{:=>FULL_WIDTH$}\n{:^FULL_WIDTH$}\n{:->FULL_WIDTH$}",
            "", "STATS".bold(), "",
        );
        println!(
            "\n{header}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}",
            "Booster".bold(),
            self.booster.name().bold().green(),
        );
        if let Some(info) = self.booster.info() {
            println!("{}", info_lines(info));
        }

        println!(
            "+ {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}",
            "Weak Learner".bold(),
            self.weak_learner.name().bold().green(),
        );
        if let Some(info) = self.weak_learner.info() {
            println!("{}", info_lines(info));
        }
        println!(
            "\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            {:=^FULL_WIDTH$}\n\
            ",
            "Time Limit".bold(),
            limit.bold().green(),
            "".bold(),
        );
    }


    /// Run the given boosting algorithm with logging.
    /// Note that this method is almost the same as `Booster::run`.
    /// This method measures running time per iteration.
    pub fn run<P: AsRef<Path>>(&mut self, filename: P) -> Result<B::Output> {
        // Open file
        let mut file = File::create(filename)?;

        // Write header to the file
        file.write_all(HEADER.as_bytes())?;

        // ---------------------------------------------------------------------
        // Pre-processing
        self.booster.preprocess()?;
        if self.round != usize::MAX { self.print_stats(); }

        // Cumulative time
        let mut time_acc = 0;

        // ---------------------------------------------------------------------
        // Boosting step
        if self.round != usize::MAX { self.print_log_header(); }
        for iter in 1.. {
            // Start measuring time
            let now = Instant::now();

            let flow = self.booster.boost(&self.weak_learner, iter)?;

            // Stop measuring and convert `Duration` to Milliseconds.
            let time = now.elapsed().as_millis();

            // Update the cumulative time
            time_acc += time;

            // An iteration that stops before learning reports nothing.
            let report = self.booster.last_report()
                .filter(|report| report.iteration == iter)
                .cloned();
            let Some(report) = report else {
                if flow.is_break() { break; }
                continue;
            };

            // Write the results to `file`.
            file.write_all(csv_line(&report, time_acc).as_bytes())?;

            if time_acc > self.time_limit {
                println!("{} {}\n", "[TLE]".bold().bright_red(), log_line(&report, time_acc));
                break;
            }

            if self.round != usize::MAX && iter % self.round == 0 {
                println!("{} {}", "[LOG]".bold().magenta(), log_line(&report, time_acc));
            }

            if flow.is_break() {
                if self.round != usize::MAX {
                    println!("{} {}\n", "[FIN]".bold().bright_green(), log_line(&report, time_acc));
                }
                break;
            }
        }

        self.booster.postprocess()
    }
}


fn info_lines(info: Vec<(&str, String)>) -> String {
    info.into_iter()
        .map(|(key, val)| {
            format!(
                "    + {:<STAT_WIDTH$}\t{:>width$}",
                key,
                val.bold().yellow(),
                width = STAT_WIDTH - 8
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}


fn log_line(report: &IterationReport, time_acc: u128) -> String {
    let validation = report.validation_error
        .map(|e| format!("{:>WIDTH$.PREC_WIDTH$}", e))
        .unwrap_or_else(|| format!("{:>WIDTH$}", "-"));
    format!(
        "{}\t\t{}\t{}\t{}\t{}\t{}",
        format!("{:>WIDTH$}", report.iteration).red(),
        format!("{:>WIDTH$.PREC_WIDTH$}", report.edge).blue(),
        format!("{:>WIDTH$.PREC_WIDTH$}", report.loss).magenta(),
        format!("{:>WIDTH$.PREC_WIDTH$}", report.train_error).green(),
        validation.yellow(),
        time_format(time_acc).bold().cyan(),
    )
}


fn csv_line(report: &IterationReport, time_acc: u128) -> String {
    let validation = report.validation_error
        .map(|e| e.to_string())
        .unwrap_or_default();
    format!(
        "{},{},{},{},{},{},{}\n",
        report.iteration,
        report.edge,
        report.loss,
        report.log_loss,
        report.train_error,
        validation,
        time_acc,
    )
}


fn time_format(millisec: u128) -> String {
    if millisec < 1_000 {
        return format!("  0.{:0>3}s", millisec);
    }
    let sec = millisec / 1_000;
    let millisec = millisec % 1_000;
    if sec < 60 {
        return format!(" {:0>2}.{:0>3}s", sec, millisec);
    }
    let min = sec / 60;
    let sec = sec % 60;
    if min < 60 {
        return format!(" {:0>2}m {:0>2}s", min, sec);
    }
    let hours = min / 60;
    let min = min % 60;
    format!(" {:0>2}h {:0>2}m", hours, min)
}
