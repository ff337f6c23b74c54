use super::CliError;

const ARG: &str = "position";

/// Parse a seek target into milliseconds.
///
/// Accepts seconds (`30`), `mm:ss` (`1:30`), a percentage of the track
/// (`50%`) or an offset from the current position (`+10`, `-10`). The
/// result is clamped to the track length when it is known.
///
/// # Errors
///
/// Returns [`CliError::InvalidArgument`] for malformed input, or when a
/// percentage is given for a track of unknown length.
pub fn parse_position(input: &str, current_ms: u64, duration_ms: u64) -> Result<u64, CliError> {
    let input = input.trim();

    let target = if let Some(percentage) = input.strip_suffix('%') {
        let percentage = percentage
            .parse::<f64>()
            .map_err(|_| CliError::invalid(ARG, "Invalid percentage format"))?;

        if !(0.0..=100.0).contains(&percentage) {
            return Err(CliError::invalid(ARG, "Percentage must be between 0 and 100"));
        }
        if duration_ms == 0 {
            return Err(CliError::invalid(
                ARG,
                "Cannot use percentage - track length unknown",
            ));
        }

        (duration_ms as f64 * percentage / 100.0).round() as u64
    } else if let Some(delta) = input.strip_prefix('+') {
        current_ms.saturating_add(parse_relative(delta)?)
    } else if let Some(delta) = input.strip_prefix('-') {
        current_ms.saturating_sub(parse_relative(delta)?)
    } else if let Some((minutes, seconds)) = input.split_once(':') {
        let minutes = minutes
            .parse::<u64>()
            .map_err(|_| CliError::invalid(ARG, "Invalid minutes value"))?;
        let seconds = seconds
            .parse::<u64>()
            .map_err(|_| CliError::invalid(ARG, "Invalid seconds value"))?;

        if seconds >= 60 {
            return Err(CliError::invalid(ARG, "Seconds must be less than 60"));
        }

        minutes
            .checked_mul(60)
            .and_then(|total| total.checked_add(seconds))
            .and_then(seconds_to_ms)
            .ok_or_else(too_large)?
    } else {
        let seconds = input.parse::<u64>().map_err(|_| {
            CliError::invalid(
                ARG,
                "Invalid position format. Use seconds, mm:ss, percentage (50%), or relative (+10, -10)",
            )
        })?;

        seconds_to_ms(seconds).ok_or_else(too_large)?
    };

    Ok(if duration_ms > 0 {
        target.min(duration_ms)
    } else {
        target
    })
}

fn seconds_to_ms(seconds: u64) -> Option<u64> {
    seconds.checked_mul(1000)
}

fn too_large() -> CliError {
    CliError::invalid(ARG, "Position is too large")
}

fn parse_relative(delta: &str) -> Result<u64, CliError> {
    delta
        .parse::<u64>()
        .map(|seconds| seconds.saturating_mul(1000))
        .map_err(|_| CliError::invalid(ARG, "Invalid relative seek format"))
}
