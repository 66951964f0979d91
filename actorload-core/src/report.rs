use crate::{AggregateError, AggregatedSummary, DriverResult};
use std::fmt;

pub const REPORT_HEADER: &str = "Id, TotalReads, TotalWrites, TotalElapsedMillis, MinReadMillis, MaxReadMillis, MinWriteMillis, MaxWriteMillis";

/// Console rendering of a finished run: one line per driver followed by the summary.
#[derive(Debug)]
pub struct Report<'a> {
    results: &'a [DriverResult],
    summary: AggregatedSummary,
}

impl<'a> Report<'a> {
    pub fn new(results: &'a [DriverResult]) -> Result<Self, AggregateError> {
        let summary = AggregatedSummary::from_results(results)?;
        Ok(Self { results, summary })
    }

    pub fn summary(&self) -> &AggregatedSummary {
        &self.summary
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_HEADER}")?;
        for result in self.results {
            writeln!(f, "{}", DriverLine(result))?;
        }

        let s = &self.summary;
        writeln!(f)?;
        writeln!(f, "Total Operations   = {}", s.total_operations())?;
        writeln!(f, "\tTotal Reads      = {}", s.total_reads)?;
        writeln!(f, "\tTotal Writes     = {}", s.total_writes)?;
        writeln!(f, "\tPercentage Reads = {:.2}", s.read_percentage)?;
        writeln!(f)?;
        writeln!(f, "Max Elapsed Time Wall Clock = {} milliseconds", s.max_elapsed_ms)?;
        writeln!(f, "Min Elapsed Time Wall Clock = {} milliseconds", s.min_elapsed_ms)?;
        writeln!(f, "Avg Elapsed Time Wall Clock = {} milliseconds", s.avg_elapsed_ms)?;
        writeln!(f)?;
        writeln!(f, "Max Throughput = {}", Throughput(s.max_throughput))?;
        writeln!(f, "Min Throughput = {}", Throughput(s.min_throughput))?;
        write!(f, "Avg Throughput = {}", Throughput(s.avg_throughput))
    }
}

struct DriverLine<'a>(&'a DriverResult);

impl fmt::Display for DriverLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        write!(
            f,
            "{}, {}, {}, {}, {}, {}, {}, {}",
            r.driver_id,
            r.read.count,
            r.write.count,
            r.elapsed_millis(),
            r.read.min_millis(),
            r.read.max_millis(),
            r.write.min_millis(),
            r.write.max_millis(),
        )
    }
}

struct Throughput(Option<f64>);

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(tps) => write!(f, "{tps:.2} op/seconds"),
            None => write!(f, "n/a (elapsed time below 1 millisecond)"),
        }
    }
}
