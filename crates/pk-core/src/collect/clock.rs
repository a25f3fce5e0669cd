//! Clock tick rate and tick-to-seconds conversion.

/// Kernel clock ticks per second (`USER_HZ`), or `None` if unavailable.
pub fn clock_ticks_per_second() -> Option<u64> {
    // SAFETY: sysconf has no preconditions and only reads system configuration.
    let hz = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    u64::try_from(hz).ok().filter(|&hz| hz > 0)
}

/// Convert CPU ticks to seconds. An unknown tick rate yields `0.0`.
pub fn cpu_seconds(ticks: u64, ticks_per_second: Option<u64>) -> f64 {
    match ticks_per_second {
        Some(hz) if hz > 0 => ticks as f64 / hz as f64,
        _ => 0.0,
    }
}
