//! Diagnostics printed to stderr.

//! `warn!` is always enabled. `trace!` is only enabled if the
//! `CROSSMAP_TRACE` env var is set to a truthy value or
//! `trace_set(true)` was called. Both can be statically disabled
//! (compiled out completely) by prefixing their names with `no`.

use std::{os::unix::prelude::OsStrExt,
          sync::atomic::{AtomicBool, Ordering}};

use lazy_static::lazy_static;

fn trace_env_get() -> bool {
    match std::env::var_os("CROSSMAP_TRACE") {
        Some(v) => match v.as_bytes() {
            b"0" | b"" | b"off" | b"false" | b"no" => false,
            _ => true
        }
        None => false
    }
}

lazy_static!{
    static ref TRACE: AtomicBool = AtomicBool::new(trace_env_get());
}

/// Enable or disable `trace!` for the whole process.
pub fn trace_set(on: bool) {
    TRACE.store(on, Ordering::Relaxed)
}

pub fn trace_enabled() -> bool {
    TRACE.load(Ordering::Relaxed)
}

#[macro_export]
macro_rules! warn {
    ($formatstr:expr $(,$arg:expr)*) => { {
        use std::io::Write;
        let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
        let _ = write!(&mut outp, "W: ");
        let _ = write!(&mut outp, $formatstr $(,$arg)*);
        let _ = writeln!(&mut outp, " at {:?} line {}", file!(), line!());
        let _ = outp.flush();
    } }
}

#[macro_export]
macro_rules! nowarn {
    ($formatstr:expr $(,$arg:expr)*) => {
    }
}

#[macro_export]
macro_rules! trace {
    ($formatstr:expr $(,$arg:expr)*) => { {
        if $crate::warn::trace_enabled() {
            use std::io::Write;
            let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
            let _ = write!(&mut outp, "T: ");
            let _ = write!(&mut outp, $formatstr $(,$arg)*);
            let _ = writeln!(&mut outp);
            let _ = outp.flush();
        }
    } }
}

#[macro_export]
macro_rules! notrace {
    ($formatstr:expr $(,$arg:expr)*) => {
    }
}
