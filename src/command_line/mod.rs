//! Host-side command line: argument parsing and the benchmark driver.

pub(crate) mod cli;
