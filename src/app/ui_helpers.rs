pub fn wrap_prev_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

pub fn wrap_next_index(current: usize, len: usize) -> usize {
    if len == 0 || current + 1 >= len {
        0
    } else {
        current + 1
    }
}

pub fn progress_ratio(configured_secs: u32, remaining_secs: u32) -> f64 {
    if configured_secs == 0 {
        return 0.0;
    }
    let elapsed = configured_secs.saturating_sub(remaining_secs);
    (f64::from(elapsed) / f64::from(configured_secs)).clamp(0.0, 1.0)
}
