/// A benchmarked transfer direction, from the host's point of view.
///
/// `R` in `--operation_type` benchmarks host-to-device transfer (the device
/// reads host-initialized data), `W` benchmarks device-to-host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HostToDevice,
    DeviceToHost,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::HostToDevice => "host-to-device",
            Direction::DeviceToHost => "device-to-host",
        }
    }
}

/// Parse an `--operation_type` value, a comma-separated subset of `{R,W}`.
/// The returned directions are ordered host-to-device first, regardless of
/// the order given.
pub fn parse_operation_types(list: &str) -> core::result::Result<Vec<Direction>, OpsParseError> {
    if list.is_empty() {
        return Err(OpsParseError::Empty);
    }

    let mut read = false;
    let mut write = false;
    for token in list.split(',') {
        match token {
            "R" => read = true,
            "W" => write = true,
            _ => return Err(OpsParseError::InvalidToken),
        }
    }

    let mut directions = Vec::new();
    if read {
        directions.push(Direction::HostToDevice);
    }
    if write {
        directions.push(Direction::DeviceToHost);
    }
    Ok(directions)
}

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub enum OpsParseError {
    Empty,
    InvalidToken,
}

impl OpsParseError {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpsParseError::Empty => "operation type list is empty",
            OpsParseError::InvalidToken => "operation type must be a comma-separated subset of {R,W}",
        }
    }
}

impl core::fmt::Debug for OpsParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl core::fmt::Display for OpsParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for OpsParseError {}
