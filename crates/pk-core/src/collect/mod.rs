//! Reading and parsing the per-process records of the process table.

pub mod clock;
pub mod proc_parsers;
pub mod proc_reader;

pub use clock::{clock_ticks_per_second, cpu_seconds};
pub use proc_parsers::{
    normalize_cmdline, parse_proc_stat, parse_proc_status, status_value, ProcStat, ProcStatus,
    StatParseError, EMPTY_CMDLINE, PROCESSOR_FIELD_INDEX,
};
pub use proc_reader::ProcReader;
